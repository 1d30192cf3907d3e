//! Heuristic suffix and marker lists used to classify and normalize titles.
//!
//! Every list is ordered data: earlier entries win over later ones. Suffix
//! lists are kept longest-first so that a two-character suffix such as `义疏`
//! is preferred over the single `疏` it ends with. The lists can be replaced
//! from a JSON file; fields left out of the file keep the built-in values.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use regex::Regex;
use serde::{Serialize, Deserialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PatternsError {
    #[error("Failed to read patterns file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse patterns JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid marker pattern '{pattern}': {source}")]
    InvalidMarker {
        pattern: String,
        #[source]
        source: regex::Error,
    },
    #[error("Pattern list '{0}' must not be empty")]
    EmptyList(&'static str),
}

const ZHUSHU_SUFFIXES: &[&str] = &[
    "疏", "释", "记", "钞", "述记", "演秘", "注", "注疏", "注解", "释论", "义疏",
    "科文", "科注", "科疏", "大意", "论疏", "述", "序", "后记",
    "玄义", "义记", "解义", "解", "解疏", "会疏", "义", "略",
    "传", "撰", "集", "要钞", "要解", "要义", "手诀", "抉择",
    "分章", "科判", "别传", "本传", "内传",
    "旁通", "问难", "问答", "辨", "辨惑", "析疑", "发微", "探微", "微旨",
    "指归", "指要", "指掌",
    "决疑", "决择", "决科", "钞义", "疏记", "疏钞", "疏略", "疏科",
    "注说", "注记", "注略", "别注", "重注", "新注", "详注", "集注",
    "合注", "音义", "音注", "音释", "略释", "略解", "略注", "略钞",
];

const SOURCE_SUFFIXES: &[&str] = &[
    "述记", "演秘", "注疏", "科文", "科注", "科疏", "义疏", "论疏", "论释",
    "玄义", "义记", "解义", "解疏", "会疏", "要钞", "要解", "要义", "手诀", "抉择",
    "分章", "科判", "疏记", "疏钞", "疏略", "疏科", "钞义",
    "注说", "注记", "注略", "别注", "重注", "新注", "详注", "集注", "合注",
    "音义", "音注", "音释", "略释", "略解", "略注", "略钞",
    "疏", "释", "记", "钞", "注", "解", "述", "序", "后记", "义", "略", "撰", "集",
];

const EDITORIAL_PREFIXES: &[&str] = &[
    "新编", "重刊", "校正", "大明", "大宋", "唐", "宋", "元", "明", "清",
];

const SUTRA_TITLE_PREFIXES: &[&str] = &[
    "佛说", "大方广", "大乘", "新编", "重刊", "校正",
    "大明", "大宋", "唐", "宋", "元", "明", "清",
];

fn owned(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

/// Drop repeated entries and order by length, longest first.
///
/// The sort is stable, so entries of equal length keep their relative order.
pub fn longest_first(list: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out: Vec<String> = list
        .iter()
        .filter(|s| !s.is_empty() && seen.insert(s.as_str()))
        .cloned()
        .collect();
    out.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()));
    out
}

fn dedup_in_order(list: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    list.iter()
        .filter(|s| !s.is_empty() && seen.insert(s.as_str()))
        .cloned()
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TitlePatterns {
    /// Title endings that mark a commentary. Checked longest-first.
    pub zhushu_suffixes: Vec<String>,
    /// Ending that blocks the commentary rule ("经论", a compound canonical title).
    pub sutra_treatise_exclusion: String,
    /// Infixes that mark a commentary anywhere in the title.
    pub treatise_commentary_infixes: Vec<String>,
    /// Trailing regex patterns for treatises.
    pub lun_markers: Vec<String>,
    /// Trailing regex patterns for canonical sutras.
    pub jing_markers: Vec<String>,
    /// Trailing regex patterns for biographies, records, rituals, etc.
    pub other_markers: Vec<String>,
    /// Commentary suffixes stripped to recover the commented work.
    pub source_suffixes: Vec<String>,
    /// Dynasty and editorial epithets stripped from a recovered source name.
    pub source_prefixes: Vec<String>,
    /// Honorific and dynasty prefixes stripped for translation grouping.
    pub sutra_title_prefixes: Vec<String>,
    /// Endings appended to a candidate when looking for a known title.
    pub completion_suffixes: Vec<String>,
    /// The completion suffix that also gets the paramita form.
    pub sutra_suffix: String,
    pub paramita_marker: String,
}

impl Default for TitlePatterns {
    fn default() -> Self {
        TitlePatterns {
            zhushu_suffixes: longest_first(&owned(ZHUSHU_SUFFIXES)),
            sutra_treatise_exclusion: "经论".to_string(),
            treatise_commentary_infixes: owned(&["论释", "论疏"]),
            lun_markers: owned(&["偈颂", "论", "颂"]),
            jing_markers: owned(&["经", "咒", "陀罗尼"]),
            other_markers: owned(&[
                "传", "录", "史", "谱", "志", "表", "目", "要", "法", "规", "仪", "轨",
            ]),
            source_suffixes: longest_first(&owned(SOURCE_SUFFIXES)),
            source_prefixes: owned(EDITORIAL_PREFIXES),
            sutra_title_prefixes: owned(SUTRA_TITLE_PREFIXES),
            completion_suffixes: owned(&["经", "论"]),
            sutra_suffix: "经".to_string(),
            paramita_marker: "波罗蜜".to_string(),
        }
    }
}

impl TitlePatterns {
    pub fn from_json_str(s: &str) -> Result<Self, PatternsError> {
        let patterns: TitlePatterns = serde_json::from_str(s)?;
        patterns.prepared()
    }

    pub fn from_json_file(path: &Path) -> Result<Self, PatternsError> {
        let content = fs::read_to_string(path).map_err(|e| PatternsError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_json_str(&content)
    }

    /// Put the lists in the order the matching code relies on.
    pub fn prepared(mut self) -> Result<Self, PatternsError> {
        self.zhushu_suffixes = longest_first(&self.zhushu_suffixes);
        self.source_suffixes = longest_first(&self.source_suffixes);
        self.treatise_commentary_infixes = dedup_in_order(&self.treatise_commentary_infixes);
        self.lun_markers = dedup_in_order(&self.lun_markers);
        self.jing_markers = dedup_in_order(&self.jing_markers);
        self.other_markers = dedup_in_order(&self.other_markers);
        self.source_prefixes = dedup_in_order(&self.source_prefixes);
        self.sutra_title_prefixes = dedup_in_order(&self.sutra_title_prefixes);
        self.completion_suffixes = dedup_in_order(&self.completion_suffixes);

        if self.zhushu_suffixes.is_empty() {
            return Err(PatternsError::EmptyList("zhushu_suffixes"));
        }
        if self.source_suffixes.is_empty() {
            return Err(PatternsError::EmptyList("source_suffixes"));
        }
        Ok(self)
    }
}

/// A trailing marker compiled to a regex anchored at the end of the title.
#[derive(Debug, Clone)]
pub struct Marker {
    pub pattern: String,
    regex: Regex,
}

impl Marker {
    pub fn new(pattern: &str) -> Result<Self, PatternsError> {
        let regex = Regex::new(&format!("(?:{})$", pattern)).map_err(|e| {
            PatternsError::InvalidMarker {
                pattern: pattern.to_string(),
                source: e,
            }
        })?;
        Ok(Marker {
            pattern: pattern.to_string(),
            regex,
        })
    }

    /// The matched trailing text, if the title ends with this marker.
    pub fn find<'a>(&self, title: &'a str) -> Option<&'a str> {
        self.regex.find(title).map(|m| m.as_str())
    }
}

fn compile_markers(list: &[String]) -> Result<Vec<Marker>, PatternsError> {
    list.iter().map(|p| Marker::new(p)).collect()
}

/// Patterns with the marker lists compiled, ready for matching.
#[derive(Debug, Clone)]
pub struct TitleRules {
    pub patterns: TitlePatterns,
    pub lun_markers: Vec<Marker>,
    pub jing_markers: Vec<Marker>,
    pub other_markers: Vec<Marker>,
}

impl TitleRules {
    pub fn new(patterns: TitlePatterns) -> Result<Self, PatternsError> {
        let patterns = patterns.prepared()?;
        Ok(TitleRules {
            lun_markers: compile_markers(&patterns.lun_markers)?,
            jing_markers: compile_markers(&patterns.jing_markers)?,
            other_markers: compile_markers(&patterns.other_markers)?,
            patterns,
        })
    }
}

impl Default for TitleRules {
    fn default() -> Self {
        // The built-in markers are plain CJK literals.
        TitleRules::new(TitlePatterns::default()).expect("built-in title patterns must compile")
    }
}

/// Strip the first prefix of `prefixes` that `s` starts with. Never strips twice.
pub fn strip_first_prefix<'a>(s: &'a str, prefixes: &[String]) -> &'a str {
    prefixes
        .iter()
        .find_map(|p| s.strip_prefix(p.as_str()))
        .unwrap_or(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_longest_first_is_stable_and_dedups() {
        let list = owned(&["疏", "义疏", "记", "疏", "述记"]);
        assert_eq!(longest_first(&list), owned(&["义疏", "述记", "疏", "记"]));
    }

    #[test]
    fn test_default_suffixes_are_longest_first() {
        let p = TitlePatterns::default();
        let lens: Vec<usize> = p.source_suffixes.iter().map(|s| s.chars().count()).collect();
        assert!(lens.windows(2).all(|w| w[0] >= w[1]));
        let pos_yishu = p.zhushu_suffixes.iter().position(|s| s == "义疏").unwrap();
        let pos_shu = p.zhushu_suffixes.iter().position(|s| s == "疏").unwrap();
        assert!(pos_yishu < pos_shu);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let p = TitlePatterns::from_json_str(r#"{ "jing_markers": ["经", "神咒"] }"#).unwrap();
        assert_eq!(p.jing_markers, owned(&["经", "神咒"]));
        assert_eq!(p.lun_markers, TitlePatterns::default().lun_markers);
    }

    #[test]
    fn test_invalid_marker_is_rejected() {
        let p = TitlePatterns::from_json_str(r#"{ "other_markers": ["(录"] }"#).unwrap();
        let err = TitleRules::new(p).unwrap_err();
        assert!(matches!(err, PatternsError::InvalidMarker { .. }));
    }

    #[test]
    fn test_empty_suffix_list_is_rejected() {
        let err = TitlePatterns::from_json_str(r#"{ "source_suffixes": [] }"#).unwrap_err();
        assert!(matches!(err, PatternsError::EmptyList("source_suffixes")));
    }

    #[test]
    fn test_strip_first_prefix_once() {
        let prefixes = owned(&["佛说", "大乘"]);
        assert_eq!(strip_first_prefix("佛说大乘无量寿经", &prefixes), "大乘无量寿经");
        assert_eq!(strip_first_prefix("无量寿经", &prefixes), "无量寿经");
    }
}
