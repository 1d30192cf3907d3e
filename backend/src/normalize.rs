//! Title normalization into grouping keys.

use lazy_static::lazy_static;
use regex::Regex;

use crate::title_patterns::{strip_first_prefix, TitleRules};
use crate::types::TextType;

lazy_static! {
    /// Volume range in brackets: (第1-3卷), (1至5卷), (-2卷)
    static ref VOLUME_RANGE_RE: Regex = Regex::new(r"[(（]第?\d*[-至]\d*卷[)）]").unwrap();
    /// Any bracketed annotation: (唐玄奘译)
    static ref PARENTHETICAL_RE: Regex = Regex::new(r"[(（][^)）]*[)）]").unwrap();
    /// Bracketed chapter reference: (上卷), (第三卷)
    static ref CHAPTER_PAREN_RE: Regex = Regex::new(r"[(（][^)）]*卷[)）]").unwrap();
    /// Bare chapter number: 卷12
    static ref CHAPTER_NUMBER_RE: Regex = Regex::new(r"卷\d+").unwrap();
    /// Spelled-out chapter ordinal: 第三卷
    static ref CHAPTER_ORDINAL_RE: Regex = Regex::new(r"第[一二三四五六七八九十]+卷").unwrap();
}

/// Shortest key accepted from `normalize_sutra_title`, in characters.
pub const MIN_SUTRA_KEY_CHARS: usize = 3;

fn strip_volume_annotations(title: &str) -> String {
    let s = VOLUME_RANGE_RE.replace_all(title, "");
    PARENTHETICAL_RE.replace_all(&s, "").into_owned()
}

impl TitleRules {
    /// Key used to group records of the same type that denote the same work.
    ///
    /// - `Jing`: volume ranges and bracketed annotations are removed.
    /// - `Lun`, `Other`, `Unknown`: the title itself.
    /// - `Zhushu`: a title ending in 论释 / 论疏 loses the final commentary
    ///   character and keeps 论.
    pub fn normalize_for_grouping(&self, title: &str, text_type: TextType) -> String {
        match text_type {
            TextType::Jing => strip_volume_annotations(title).trim().to_string(),
            TextType::Zhushu => {
                let trimmed = title.trim();
                let drop_last = self
                    .patterns
                    .treatise_commentary_infixes
                    .iter()
                    .any(|s| trimmed.ends_with(s.as_str()));

                if drop_last {
                    let mut chars = trimmed.chars();
                    chars.next_back();
                    chars.as_str().trim().to_string()
                } else {
                    trimmed.to_string()
                }
            }
            TextType::Lun | TextType::Other | TextType::Unknown => title.trim().to_string(),
        }
    }

    /// Aggressive key for spotting alternate translations of one sutra.
    ///
    /// Removes volume and chapter markers and bracketed annotations, then at
    /// most one honorific or dynasty prefix. A key shorter than three
    /// characters is rejected and the trimmed title is returned instead.
    pub fn normalize_sutra_title(&self, title: &str) -> String {
        let mut s = VOLUME_RANGE_RE.replace_all(title, "").into_owned();
        s = CHAPTER_PAREN_RE.replace_all(&s, "").into_owned();
        s = CHAPTER_NUMBER_RE.replace_all(&s, "").into_owned();
        s = CHAPTER_ORDINAL_RE.replace_all(&s, "").into_owned();
        s = PARENTHETICAL_RE.replace_all(&s, "").into_owned();

        let stripped = strip_first_prefix(s.trim(), &self.patterns.sutra_title_prefixes).trim();

        if stripped.chars().count() < MIN_SUTRA_KEY_CHARS {
            return title.trim().to_string();
        }
        stripped.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jing_grouping_strips_volume_and_annotation() {
        let rules = TitleRules::default();
        assert_eq!(
            rules.normalize_for_grouping("大般若波罗蜜多经(第1-200卷)", TextType::Jing),
            "大般若波罗蜜多经"
        );
        assert_eq!(
            rules.normalize_for_grouping("金刚般若波罗蜜经（唐玄奘译）", TextType::Jing),
            "金刚般若波罗蜜经"
        );
    }

    #[test]
    fn test_lun_grouping_keeps_title() {
        let rules = TitleRules::default();
        assert_eq!(rules.normalize_for_grouping("大智度论(上)", TextType::Lun), "大智度论(上)");
    }

    #[test]
    fn test_zhushu_grouping_keeps_treatise_char() {
        let rules = TitleRules::default();
        assert_eq!(rules.normalize_for_grouping("法华经疏", TextType::Zhushu), "法华经疏");
        assert_eq!(rules.normalize_for_grouping("十地经论释", TextType::Zhushu), "十地经论");
        assert_eq!(rules.normalize_for_grouping("百论疏", TextType::Zhushu), "百论");
    }

    #[test]
    fn test_sutra_title_chapter_markers() {
        let rules = TitleRules::default();
        assert_eq!(rules.normalize_sutra_title("华严经卷12"), "华严经");
        assert_eq!(rules.normalize_sutra_title("华严经第三卷"), "华严经");
        assert_eq!(rules.normalize_sutra_title("华严经(上卷)"), "华严经");
    }

    #[test]
    fn test_sutra_title_single_prefix() {
        let rules = TitleRules::default();
        assert_eq!(rules.normalize_sutra_title("佛说阿弥陀经"), "阿弥陀经");
        assert_eq!(rules.normalize_sutra_title("佛说大乘无量寿经"), "大乘无量寿经");
    }

    #[test]
    fn test_sutra_title_too_short_falls_back() {
        let rules = TitleRules::default();
        assert_eq!(rules.normalize_sutra_title(" 佛说法经 "), "佛说法经");
        assert_eq!(rules.normalize_sutra_title("大乘经(卷1)"), "大乘经(卷1)");
    }
}
