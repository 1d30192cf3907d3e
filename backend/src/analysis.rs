//! The whole pipeline over one corpus snapshot.

use indexmap::IndexMap;
use serde::{Serialize, Deserialize};

use crate::grouping::{
    build_commentary_mapping, build_translation_groups, build_type_groups, CommentaryMapping,
    GroupIdCounters, TranslationGroup, TypeGroup, TypeGrouping,
};
use crate::title_patterns::TitleRules;
use crate::types::{ClassifiedRecord, Record, TextType};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeStats {
    pub text_type: TextType,
    pub total: usize,
    pub multi_version_groups: usize,
    pub multi_version_records: usize,
    pub single_version_records: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    pub total_records: usize,
    pub type_stats: Vec<TypeStats>,
    pub total_zhushu: usize,
    pub matched_zhushu: usize,
    pub sources_with_zhushu: usize,
    pub translation_groups: usize,
}

impl AnalysisSummary {
    pub fn stats_for(&self, text_type: TextType) -> Option<&TypeStats> {
        self.type_stats.iter().find(|s| s.text_type == text_type)
    }
}

#[derive(Debug, Clone)]
pub struct CorpusAnalysis {
    pub records: Vec<ClassifiedRecord>,
    pub type_grouping: TypeGrouping,
    pub commentary_mapping: CommentaryMapping,
    pub translation_groups: IndexMap<String, TranslationGroup>,
    pub summary: AnalysisSummary,
}

impl CorpusAnalysis {
    /// Groups of `text_type` with two or more members, largest first.
    /// Groups of equal size keep allocation order.
    pub fn multi_version_groups(&self, text_type: TextType) -> Vec<&TypeGroup> {
        let mut groups: Vec<&TypeGroup> = self
            .type_grouping
            .groups
            .iter()
            .filter(|g| g.text_type == text_type && g.is_multi_version())
            .collect();
        groups.sort_by(|a, b| b.version_count().cmp(&a.version_count()));
        groups
    }
}

pub fn classify_records(records: Vec<Record>, rules: &TitleRules) -> Vec<ClassifiedRecord> {
    records
        .into_iter()
        .map(|r| {
            let c = rules.classify(&r.title);
            ClassifiedRecord::new(r, c)
        })
        .collect()
}

fn summarize(
    records: &[ClassifiedRecord],
    grouping: &TypeGrouping,
    mapping: &CommentaryMapping,
    translations: &IndexMap<String, TranslationGroup>,
) -> AnalysisSummary {
    let type_stats = TextType::ALL
        .into_iter()
        .map(|t| {
            let total = records.iter().filter(|r| r.text_type == t).count();
            let multi: Vec<&TypeGroup> = grouping
                .groups
                .iter()
                .filter(|g| g.text_type == t && g.is_multi_version())
                .collect();
            let multi_version_records: usize = multi.iter().map(|g| g.version_count()).sum();

            TypeStats {
                text_type: t,
                total,
                multi_version_groups: multi.len(),
                multi_version_records,
                single_version_records: total - multi_version_records,
            }
        })
        .collect();

    AnalysisSummary {
        total_records: records.len(),
        type_stats,
        total_zhushu: records.iter().filter(|r| r.text_type == TextType::Zhushu).count(),
        matched_zhushu: mapping.values().map(|s| s.zhushus.len()).sum(),
        sources_with_zhushu: mapping.len(),
        translation_groups: translations.len(),
    }
}

/// Classify every record, then build the three group views and the summary.
pub fn analyze_corpus(records: Vec<Record>, rules: &TitleRules) -> CorpusAnalysis {
    let records = classify_records(records, rules);
    tracing::info!("Classified {} records", records.len());

    let (type_grouping, counters) = build_type_groups(&records, rules, GroupIdCounters::new());
    tracing::debug!("Group id counters after allocation: {:?}", counters);

    let commentary_mapping = build_commentary_mapping(&records, rules);
    let translation_groups = build_translation_groups(&records, rules);
    let summary = summarize(&records, &type_grouping, &commentary_mapping, &translation_groups);

    tracing::info!(
        "Commentaries matched to a source: {} of {}, translation groups: {}",
        summary.matched_zhushu,
        summary.total_zhushu,
        summary.translation_groups
    );

    CorpusAnalysis {
        records,
        type_grouping,
        commentary_mapping,
        translation_groups,
        summary,
    }
}
