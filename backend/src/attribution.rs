//! Parsing the free-text author field: "唐 玄奘译" -> dynasty 唐, translator 玄奘, role 译

use serde::{Serialize, Deserialize};

pub const DYNASTIES: &[&str] = &[
    "唐", "宋", "元", "明", "清", "隋", "晋", "南北朝", "印度", "西藏", "日本", "高丽", "新罗",
];

/// Translate, compose, narrate, compile, author.
pub const ROLE_KEYWORDS: &[&str] = &["译", "撰", "述", "集", "造"];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribution {
    pub dynasty: Option<String>,
    pub translator: Option<String>,
    pub role: Option<String>,
}

impl Attribution {
    /// "玄奘(唐)" style label for reports, falling back to the raw author field.
    pub fn display_name(&self, author: &str) -> String {
        match (&self.translator, &self.dynasty) {
            (Some(t), Some(d)) => format!("{}({})", t, d),
            (Some(t), None) => t.clone(),
            _ => author.trim().to_string(),
        }
    }
}

pub fn parse_attribution(author: &str) -> Attribution {
    let dynasty = DYNASTIES
        .iter()
        .find(|d| author.contains(*d))
        .map(|d| d.to_string());

    let Some(role) = ROLE_KEYWORDS.iter().find(|k| author.contains(*k)) else {
        return Attribution { dynasty, translator: None, role: None };
    };

    let mut name_part = author.split(role).next().unwrap_or("");
    for d in DYNASTIES {
        if let Some(pos) = name_part.rfind(d) {
            name_part = &name_part[pos + d.len()..];
        }
    }
    let name = name_part.trim();

    Attribution {
        dynasty,
        translator: if name.is_empty() { None } else { Some(name.to_string()) },
        role: Some(role.to_string()),
    }
}
