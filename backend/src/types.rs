use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Deserialize};
use thiserror::Error;

/// Kind of text a title denotes, derived from its suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TextType {
    /// Canonical sutra, a translated scripture.
    #[serde(rename = "jing")]
    Jing,
    /// Treatise, an original doctrinal composition.
    #[serde(rename = "lun")]
    Lun,
    /// Commentary or exegesis on a jing or lun.
    #[serde(rename = "zhushu")]
    Zhushu,
    #[serde(rename = "other")]
    Other,
    #[serde(rename = "unknown")]
    Unknown,
}

impl TextType {
    /// Types that take part in group-id allocation, in allocation order.
    pub const GROUPED: [TextType; 4] = [
        TextType::Jing,
        TextType::Lun,
        TextType::Zhushu,
        TextType::Other,
    ];

    pub const ALL: [TextType; 5] = [
        TextType::Jing,
        TextType::Lun,
        TextType::Zhushu,
        TextType::Other,
        TextType::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TextType::Jing => "jing",
            TextType::Lun => "lun",
            TextType::Zhushu => "zhushu",
            TextType::Other => "other",
            TextType::Unknown => "unknown",
        }
    }

    /// Chinese label used in the text reports.
    pub fn label(&self) -> &'static str {
        match self {
            TextType::Jing => "经典",
            TextType::Lun => "论著",
            TextType::Zhushu => "注疏",
            TextType::Other => "其他",
            TextType::Unknown => "未知",
        }
    }
}

impl fmt::Display for TextType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("Invalid TextType value: {0}")]
pub struct ParseTextTypeError(String);

impl FromStr for TextType {
    type Err = ParseTextTypeError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "jing" => Ok(TextType::Jing),
            "lun" => Ok(TextType::Lun),
            "zhushu" => Ok(TextType::Zhushu),
            "other" => Ok(TextType::Other),
            "unknown" => Ok(TextType::Unknown),
            _ => Err(ParseTextTypeError(s.to_string())),
        }
    }
}

/// A corpus entry as handed over by the corpus reader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub source: String,
}

impl Record {
    pub fn new(id: &str, title: &str, author: &str, source: &str) -> Self {
        Record {
            id: id.to_string(),
            title: title.to_string(),
            author: author.to_string(),
            source: source.to_string(),
        }
    }
}

/// Result of classifying a title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub text_type: TextType,
    /// The suffix, infix or marker that decided the type. Empty for `Unknown`.
    pub matched_suffix: String,
}

impl Classification {
    pub fn unknown() -> Self {
        Classification {
            text_type: TextType::Unknown,
            matched_suffix: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedRecord {
    #[serde(flatten)]
    pub record: Record,
    pub text_type: TextType,
    #[serde(rename = "suffix")]
    pub matched_suffix: String,
}

impl ClassifiedRecord {
    pub fn new(record: Record, classification: Classification) -> Self {
        ClassifiedRecord {
            record,
            text_type: classification.text_type,
            matched_suffix: classification.matched_suffix,
        }
    }

    pub fn id(&self) -> &str {
        &self.record.id
    }

    pub fn title(&self) -> &str {
        &self.record.title
    }
}
