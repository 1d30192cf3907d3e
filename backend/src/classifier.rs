//! Title classification by suffix, infix and trailing marker.

use crate::title_patterns::{Marker, TitleRules};
use crate::types::{Classification, TextType};

fn first_marker(title: &str, markers: &[Marker]) -> Option<String> {
    markers.iter().find_map(|m| m.find(title)).map(|s| s.to_string())
}

impl TitleRules {
    /// Classify a title. Rules are tried in priority order and the first hit wins:
    ///
    /// 1. commentary suffix, unless the title ends with the sutra-treatise exclusion
    /// 2. treatise-commentary infix
    /// 3. treatise marker
    /// 4. canonical marker
    /// 5. other marker
    ///
    /// A title matching none of them is `Unknown` with an empty suffix.
    pub fn classify(&self, title: &str) -> Classification {
        let p = &self.patterns;

        let excluded = !p.sutra_treatise_exclusion.is_empty()
            && title.ends_with(p.sutra_treatise_exclusion.as_str());

        if !excluded {
            if let Some(suffix) = p.zhushu_suffixes.iter().find(|s| title.ends_with(s.as_str())) {
                return Classification {
                    text_type: TextType::Zhushu,
                    matched_suffix: suffix.clone(),
                };
            }
        }

        if let Some(infix) = p.treatise_commentary_infixes.iter().find(|s| title.contains(s.as_str())) {
            return Classification {
                text_type: TextType::Zhushu,
                matched_suffix: infix.clone(),
            };
        }

        let by_marker = [
            (TextType::Lun, &self.lun_markers),
            (TextType::Jing, &self.jing_markers),
            (TextType::Other, &self.other_markers),
        ];

        for (text_type, markers) in by_marker {
            if let Some(matched) = first_marker(title, markers) {
                return Classification {
                    text_type,
                    matched_suffix: matched,
                };
            }
        }

        Classification::unknown()
    }
}
