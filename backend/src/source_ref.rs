//! Recovering the name of the work a commentary is written about.
//!
//! "金刚经疏" -> "金刚经", "成唯识论演秘" -> "成唯识论"

use crate::title_patterns::{strip_first_prefix, TitleRules};
use crate::types::TextType;

impl TitleRules {
    /// Candidate source name for a commentary title.
    ///
    /// Only `Zhushu` titles are considered. The first (longest) commentary
    /// suffix the title ends with is removed, then at most one dynasty or
    /// editorial prefix. Returns `None` when no suffix matches or nothing is left.
    pub fn extract_source(&self, title: &str, text_type: TextType) -> Option<String> {
        if text_type != TextType::Zhushu {
            return None;
        }

        let suffix = self
            .patterns
            .source_suffixes
            .iter()
            .find(|s| title.ends_with(s.as_str()))?;

        let base = &title[..title.len() - suffix.len()];
        let candidate = strip_first_prefix(base, &self.patterns.source_prefixes).trim();

        if candidate.is_empty() {
            None
        } else {
            Some(candidate.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_longest_suffix() {
        let rules = TitleRules::default();
        assert_eq!(
            rules.extract_source("成唯识论述记", TextType::Zhushu),
            Some("成唯识论".to_string())
        );
        assert_eq!(
            rules.extract_source("金刚般若波罗蜜经疏", TextType::Zhushu),
            Some("金刚般若波罗蜜经".to_string())
        );
    }

    #[test]
    fn test_strips_one_prefix() {
        let rules = TitleRules::default();
        assert_eq!(
            rules.extract_source("重刊大明仁王经疏", TextType::Zhushu),
            Some("大明仁王经".to_string())
        );
    }

    #[test]
    fn test_only_commentaries() {
        let rules = TitleRules::default();
        assert_eq!(rules.extract_source("金刚经疏", TextType::Jing), None);
    }

    #[test]
    fn test_nothing_left() {
        let rules = TitleRules::default();
        assert_eq!(rules.extract_source("疏", TextType::Zhushu), None);
        assert_eq!(rules.extract_source("唐疏", TextType::Zhushu), None);
        // No extractor suffix ends this title.
        assert_eq!(rules.extract_source("高僧传", TextType::Zhushu), None);
    }
}
