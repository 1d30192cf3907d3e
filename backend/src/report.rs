//! Writing the analysis out: three JSON tables and two text reports.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tinytemplate::TinyTemplate;

use crate::analysis::CorpusAnalysis;
use crate::attribution::parse_attribution;
use crate::grouping::{SourceCommentaries, TranslationGroup, TypeGroup};
use crate::settings::AnalysisSettings;
use crate::types::TextType;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Failed to write {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to serialize JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Failed to render report template: {0}")]
    Template(#[from] tinytemplate::error::Error),
}

static ZHUSHU_SUMMARY_TMPL: &str = "注疏类经书汇总报告
{rule}

注疏类多版本组数: {zhushu_group_count}

{{ for group in zhushu_groups }}【注疏】: {group.name}
【版本数】: {group.count}
【版本列表】:
{{ for m in group.members }}  - ID: {m.id} 标题: {m.title} 作者: {m.author}
{{ endfor }}
{{ endfor }}
{rule}
经书-注疏关联关系
{rule}

注疏总数: {total_zhushu}
成功关联到源经典的注疏: {matched_zhushu}
有注疏的经典数量: {sources_with_zhushu}

{{ for source in sources }}【经典】: {source.title} ({source.id})
【类型】: {source.source_type}
【注疏数量】: {source.count}
【注疏列表】:
{{ for m in source.zhushus }}  - ID: {m.id} 标题: {m.title} 作者: {m.author}
{{ endfor }}
{{ endfor }}{{ if sources_omitted }}
... 还有 {sources_omitted} 部经典有注疏（只显示前{sources_shown}个）
{{ endif }}
{rule}
同经不同翻译版本关联
{rule}

有多译本的经书组数: {translation_group_count}

{{ for group in translations }}【经典】: {group.base_title}
【译本数】: {group.count}
【译本列表】:
{{ for m in group.translations }}  - ID: {m.id} 标题: {m.title} 译者: {m.author}
{{ endfor }}
{{ endfor }}{{ if translations_omitted }}
... 还有 {translations_omitted} 部经书有多个译本（只显示前{translations_shown}个）
{{ endif }}";

static GROUPS_REPORT_TMPL: &str = "CBETA 经书版本关联分析报告
{rule}

数据来源: {data_label}
生成时间: {generated_at}
经书总数: {total_records}
{{ for s in type_stats }}
{s.name}:
  总数: {s.total}
  多版本组数: {s.multi_groups}
  多版本经书数: {s.multi_records}
  单版本经书数: {s.single_records}
{{ endfor }}
{rule}
多版本经书详细列表
{rule}

{{ for group in groups }}【{group.label}】: {group.name}
【组ID】: {group.group_id}
【版本数】: {group.count}
【版本列表】:
{{ for m in group.members }}  - ID: {m.id} 标题: {m.title} 作者: {m.author}
{{ endfor }}
{{ endfor }}";

#[derive(Serialize)]
struct MemberLine {
    id: String,
    title: String,
    author: String,
}

impl MemberLine {
    fn padded(id: &str, title: &str, author: &str, title_width: usize) -> Self {
        MemberLine {
            id: format!("{:<15}", id),
            title: format!("{:<width$}", title, width = title_width),
            author: author.to_string(),
        }
    }
}

#[derive(Serialize)]
struct GroupBlock {
    label: String,
    name: String,
    group_id: u32,
    count: usize,
    members: Vec<MemberLine>,
}

#[derive(Serialize)]
struct SourceBlock {
    id: String,
    title: String,
    source_type: String,
    count: usize,
    zhushus: Vec<MemberLine>,
}

#[derive(Serialize)]
struct TranslationBlock {
    base_title: String,
    count: usize,
    translations: Vec<MemberLine>,
}

#[derive(Serialize)]
struct ZhushuSummaryContext {
    rule: String,
    zhushu_group_count: usize,
    zhushu_groups: Vec<GroupBlock>,
    total_zhushu: usize,
    matched_zhushu: usize,
    sources_with_zhushu: usize,
    sources: Vec<SourceBlock>,
    sources_shown: usize,
    sources_omitted: usize,
    translation_group_count: usize,
    translations: Vec<TranslationBlock>,
    translations_shown: usize,
    translations_omitted: usize,
}

#[derive(Serialize)]
struct TypeStatsBlock {
    name: String,
    total: usize,
    multi_groups: usize,
    multi_records: usize,
    single_records: usize,
}

#[derive(Serialize)]
struct GroupsReportContext {
    rule: String,
    data_label: String,
    generated_at: String,
    total_records: usize,
    type_stats: Vec<TypeStatsBlock>,
    groups: Vec<GroupBlock>,
}

/// Where `write_analysis` put its files.
#[derive(Debug, Clone)]
pub struct ReportPaths {
    pub groups_json: PathBuf,
    pub commentary_json: PathBuf,
    pub translations_json: PathBuf,
    pub zhushu_summary: PathBuf,
    pub groups_report: PathBuf,
}

fn rule() -> String {
    "=".repeat(80)
}

fn group_block(analysis: &CorpusAnalysis, group: &TypeGroup) -> GroupBlock {
    let mut members: Vec<MemberLine> = group
        .member_ids
        .iter()
        .filter_map(|id| analysis.type_grouping.assignments.get(id).map(|a| (id, a)))
        .map(|(id, a)| MemberLine::padded(id, &a.title, &a.author, 50))
        .collect();
    members.sort_by(|a, b| a.id.cmp(&b.id));

    GroupBlock {
        label: group.text_type.label().to_string(),
        name: group.group_name.clone(),
        group_id: group.group_id,
        count: group.version_count(),
        members,
    }
}

fn render(name: &'static str, template: &'static str, ctx: &impl Serialize) -> Result<String, ReportError> {
    let mut tt = TinyTemplate::new();
    tt.set_default_formatter(&tinytemplate::format_unescaped);
    tt.add_template(name, template)?;
    Ok(tt.render(name, ctx)?)
}

/// Commentary groups, best-covered sources and translation groups as text.
pub fn render_zhushu_summary(analysis: &CorpusAnalysis, settings: &AnalysisSettings) -> Result<String, ReportError> {
    let mut zhushu_groups: Vec<GroupBlock> = analysis
        .multi_version_groups(TextType::Zhushu)
        .into_iter()
        .map(|g| group_block(analysis, g))
        .collect();
    zhushu_groups.sort_by(|a, b| a.name.cmp(&b.name));

    let mut sources: Vec<(&String, &SourceCommentaries)> =
        analysis.commentary_mapping.iter().collect();
    sources.sort_by(|a, b| b.1.zhushus.len().cmp(&a.1.zhushus.len()));
    let sources_total = sources.len();

    let source_blocks: Vec<SourceBlock> = sources
        .into_iter()
        .take(settings.report_top_sources)
        .map(|(id, s)| {
            let mut zhushus: Vec<MemberLine> = s
                .zhushus
                .iter()
                .map(|z| MemberLine::padded(&z.id, &z.title, &z.author, 40))
                .collect();
            zhushus.sort_by(|a, b| a.id.cmp(&b.id));
            SourceBlock {
                id: id.clone(),
                title: s.title.clone(),
                source_type: s.source_type.to_string(),
                count: s.zhushus.len(),
                zhushus,
            }
        })
        .collect();

    let mut translations: Vec<&TranslationGroup> =
        analysis.translation_groups.values().collect();
    translations.sort_by(|a, b| b.total_versions.cmp(&a.total_versions));
    let translations_total = translations.len();

    let translation_blocks: Vec<TranslationBlock> = translations
        .into_iter()
        .take(settings.report_top_translations)
        .map(|g| TranslationBlock {
            base_title: g.base_title.clone(),
            count: g.total_versions,
            translations: g
                .translations
                .iter()
                .map(|t| {
                    let who = parse_attribution(&t.author).display_name(&t.author);
                    MemberLine::padded(&t.id, &t.title, &who, 45)
                })
                .collect(),
        })
        .collect();

    let ctx = ZhushuSummaryContext {
        rule: rule(),
        zhushu_group_count: zhushu_groups.len(),
        zhushu_groups,
        total_zhushu: analysis.summary.total_zhushu,
        matched_zhushu: analysis.summary.matched_zhushu,
        sources_with_zhushu: analysis.summary.sources_with_zhushu,
        sources_shown: source_blocks.len(),
        sources_omitted: sources_total - source_blocks.len(),
        sources: source_blocks,
        translation_group_count: translations_total,
        translations_shown: translation_blocks.len(),
        translations_omitted: translations_total - translation_blocks.len(),
        translations: translation_blocks,
    };

    render("zhushu_summary", ZHUSHU_SUMMARY_TMPL, &ctx)
}

/// Per-type statistics and every multi-version group, largest first.
pub fn render_groups_report(analysis: &CorpusAnalysis, data_label: &str) -> Result<String, ReportError> {
    let type_stats = analysis
        .summary
        .type_stats
        .iter()
        .map(|s| TypeStatsBlock {
            name: format!("{}({})", s.text_type.label(), s.text_type),
            total: s.total,
            multi_groups: s.multi_version_groups,
            multi_records: s.multi_version_records,
            single_records: s.single_version_records,
        })
        .collect();

    let mut groups: Vec<GroupBlock> = TextType::GROUPED
        .into_iter()
        .flat_map(|t| analysis.multi_version_groups(t))
        .map(|g| group_block(analysis, g))
        .collect();
    groups.sort_by(|a, b| b.count.cmp(&a.count));

    let ctx = GroupsReportContext {
        rule: rule(),
        data_label: data_label.to_string(),
        generated_at: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        total_records: analysis.summary.total_records,
        type_stats,
        groups,
    };

    render("groups_report", GROUPS_REPORT_TMPL, &ctx)
}

fn write_file(path: &Path, content: &str) -> Result<(), ReportError> {
    fs::write(path, content).map_err(|e| ReportError::Io {
        path: path.to_path_buf(),
        source: e,
    })
}

fn write_json(path: &Path, value: &impl Serialize) -> Result<(), ReportError> {
    let s = serde_json::to_string_pretty(value)?;
    write_file(path, &s)
}

/// Write the JSON tables and the text reports into `output_dir`, creating it if needed.
pub fn write_analysis(
    analysis: &CorpusAnalysis,
    output_dir: &Path,
    data_label: &str,
    settings: &AnalysisSettings,
) -> Result<ReportPaths, ReportError> {
    fs::create_dir_all(output_dir).map_err(|e| ReportError::Io {
        path: output_dir.to_path_buf(),
        source: e,
    })?;

    let paths = ReportPaths {
        groups_json: output_dir.join(&settings.groups_file),
        commentary_json: output_dir.join(&settings.commentary_mapping_file),
        translations_json: output_dir.join(&settings.translations_file),
        zhushu_summary: output_dir.join(&settings.zhushu_summary_file),
        groups_report: output_dir.join(&settings.groups_report_file),
    };

    write_json(&paths.groups_json, &analysis.type_grouping.assignments)?;
    write_json(&paths.commentary_json, &analysis.commentary_mapping)?;
    write_json(&paths.translations_json, &analysis.translation_groups)?;
    write_file(&paths.zhushu_summary, &render_zhushu_summary(analysis, settings)?)?;
    write_file(&paths.groups_report, &render_groups_report(analysis, data_label)?)?;

    tracing::info!("Reports written to {:?}", output_dir);

    Ok(paths)
}

/// The numbered list of unique titles.
pub fn render_title_list(titles: &[String]) -> String {
    let mut out = format!("经书标题列表（共 {} 部）\n", titles.len());
    out.push_str(&"=".repeat(60));
    out.push_str("\n\n");
    for (i, title) in titles.iter().enumerate() {
        out.push_str(&format!("{:4}. {}\n", i + 1, title));
    }
    out
}

pub fn write_title_list(titles: &[String], path: &Path) -> Result<(), ReportError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| ReportError::Io {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }
    write_file(path, &render_title_list(titles))
}
