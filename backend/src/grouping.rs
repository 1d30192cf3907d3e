//! Group building over a classified record set.
//!
//! Three independent views are computed from the same records:
//!
//! - type groups: records of one type sharing a grouping key
//! - commentary mapping: source text id -> commentaries matched to it
//! - translation groups: sutras sharing a normalized name

use std::collections::HashMap;

use indexmap::IndexMap;
use serde::{Serialize, Deserialize};

use crate::title_patterns::TitleRules;
use crate::types::{ClassifiedRecord, TextType};

pub const GROUP_BAND_WIDTH: u32 = 1000;
pub const JING_GROUP_BASE: u32 = 1000;
pub const LUN_GROUP_BASE: u32 = 2000;
pub const ZHUSHU_GROUP_BASE: u32 = 3000;
pub const OTHER_GROUP_BASE: u32 = 4000;
/// Group id shared by every `Unknown` record.
pub const UNKNOWN_GROUP_ID: u32 = 0;

fn band_base(text_type: TextType) -> Option<u32> {
    match text_type {
        TextType::Jing => Some(JING_GROUP_BASE),
        TextType::Lun => Some(LUN_GROUP_BASE),
        TextType::Zhushu => Some(ZHUSHU_GROUP_BASE),
        TextType::Other => Some(OTHER_GROUP_BASE),
        TextType::Unknown => None,
    }
}

/// Recover the text type a group id was allocated for.
pub fn text_type_for_group_id(group_id: u32) -> TextType {
    TextType::GROUPED
        .into_iter()
        .find(|t| {
            band_base(*t)
                .map(|base| group_id >= base && group_id < base + GROUP_BAND_WIDTH)
                .unwrap_or(false)
        })
        .unwrap_or(TextType::Unknown)
}

/// Next group id per text type. Passed into and returned from the group builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupIdCounters {
    pub jing: u32,
    pub lun: u32,
    pub zhushu: u32,
    pub other: u32,
}

impl Default for GroupIdCounters {
    fn default() -> Self {
        GroupIdCounters {
            jing: JING_GROUP_BASE,
            lun: LUN_GROUP_BASE,
            zhushu: ZHUSHU_GROUP_BASE,
            other: OTHER_GROUP_BASE,
        }
    }
}

impl GroupIdCounters {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&mut self, text_type: TextType) -> Option<&mut u32> {
        match text_type {
            TextType::Jing => Some(&mut self.jing),
            TextType::Lun => Some(&mut self.lun),
            TextType::Zhushu => Some(&mut self.zhushu),
            TextType::Other => Some(&mut self.other),
            TextType::Unknown => None,
        }
    }

    /// Take the next id of the type's band. `Unknown` always gets 0.
    pub fn allocate(&mut self, text_type: TextType) -> u32 {
        let Some(slot) = self.slot(text_type) else {
            return UNKNOWN_GROUP_ID;
        };
        let id = *slot;
        *slot += 1;

        if let Some(base) = band_base(text_type) {
            if id == base + GROUP_BAND_WIDTH {
                tracing::warn!(
                    "Group id band for '{}' is exhausted, ids from {} overlap the next band",
                    text_type, id
                );
            }
        }
        id
    }
}

/// One row of the grouping table handed to the report layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupAssignment {
    pub group_id: u32,
    pub group_name: String,
    pub text_type: TextType,
    pub title: String,
    pub author: String,
    pub source: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeGroup {
    pub group_id: u32,
    pub group_name: String,
    pub text_type: TextType,
    /// The grouping key shared by the members.
    pub key: String,
    /// Member record ids in input order.
    pub member_ids: Vec<String>,
}

impl TypeGroup {
    pub fn version_count(&self) -> usize {
        self.member_ids.len()
    }

    pub fn is_multi_version(&self) -> bool {
        self.member_ids.len() >= 2
    }
}

#[derive(Debug, Clone, Default)]
pub struct TypeGrouping {
    /// Groups in allocation order, then one singleton per `Unknown` record.
    pub groups: Vec<TypeGroup>,
    /// Record id -> assignment, in input order.
    pub assignments: IndexMap<String, GroupAssignment>,
}

/// Partition records by (text type, grouping key) and number the groups.
///
/// For each type in the order jing, lun, zhushu, other, ids are taken from
/// the type's counter in two passes: first the multi-member groups, then the
/// singletons, each pass in the order the key is first seen. A multi-member
/// group is named by its key, a singleton by the record title. `Unknown`
/// records are never grouped: each gets id 0 and an empty name.
pub fn build_type_groups(
    records: &[ClassifiedRecord],
    rules: &TitleRules,
    mut counters: GroupIdCounters,
) -> (TypeGrouping, GroupIdCounters) {
    let mut buckets: IndexMap<(TextType, String), Vec<usize>> = IndexMap::new();

    for (idx, rec) in records.iter().enumerate() {
        if rec.text_type == TextType::Unknown {
            continue;
        }
        let key = rules.normalize_for_grouping(rec.title(), rec.text_type);
        buckets.entry((rec.text_type, key)).or_default().push(idx);
    }

    let mut groups: Vec<TypeGroup> = Vec::new();
    let mut group_of_record: HashMap<usize, usize> = HashMap::new();

    for text_type in TextType::GROUPED {
        let (multi, single): (Vec<_>, Vec<_>) = buckets
            .iter()
            .filter(|((t, _), _)| *t == text_type)
            .partition(|(_, members)| members.len() >= 2);

        for ((_, key), members) in multi.into_iter().chain(single) {
            let group_id = counters.allocate(text_type);
            let group_name = if members.len() >= 2 {
                key.clone()
            } else {
                records[members[0]].title().to_string()
            };

            for idx in members {
                group_of_record.insert(*idx, groups.len());
            }
            groups.push(TypeGroup {
                group_id,
                group_name,
                text_type,
                key: key.clone(),
                member_ids: members.iter().map(|i| records[*i].id().to_string()).collect(),
            });
        }
    }

    for (idx, rec) in records.iter().enumerate() {
        if rec.text_type != TextType::Unknown {
            continue;
        }
        group_of_record.insert(idx, groups.len());
        groups.push(TypeGroup {
            group_id: UNKNOWN_GROUP_ID,
            group_name: String::new(),
            text_type: TextType::Unknown,
            key: rec.title().to_string(),
            member_ids: vec![rec.id().to_string()],
        });
    }

    let mut assignments = IndexMap::new();
    for (idx, rec) in records.iter().enumerate() {
        let Some(group) = group_of_record.get(&idx).map(|g| &groups[*g]) else {
            continue;
        };
        assignments.insert(
            rec.id().to_string(),
            GroupAssignment {
                group_id: group.group_id,
                group_name: group.group_name.clone(),
                text_type: rec.text_type,
                title: rec.record.title.clone(),
                author: rec.record.author.clone(),
                source: rec.record.source.clone(),
            },
        );
    }

    (TypeGrouping { groups, assignments }, counters)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentaryRef {
    pub id: String,
    pub title: String,
    pub author: String,
    pub suffix: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceCommentaries {
    pub title: String,
    pub source_type: TextType,
    pub zhushus: Vec<CommentaryRef>,
}

/// Source record id -> commentaries matched to it.
pub type CommentaryMapping = IndexMap<String, SourceCommentaries>;

/// Title -> record over the jing and lun records, the matcher's lookup universe.
///
/// Jing records go in first, then lun, each in input order. A repeated title
/// keeps its first position and points at the later record.
pub fn known_source_titles(records: &[ClassifiedRecord]) -> IndexMap<String, &ClassifiedRecord> {
    let mut known = IndexMap::new();
    for text_type in [TextType::Jing, TextType::Lun] {
        for rec in records.iter().filter(|r| r.text_type == text_type) {
            known.insert(rec.title().to_string(), rec);
        }
    }
    known
}

/// Link each commentary to the sutra or treatise it annotates.
///
/// Commentaries whose source cannot be recovered or matched are left out.
pub fn build_commentary_mapping(records: &[ClassifiedRecord], rules: &TitleRules) -> CommentaryMapping {
    let known = known_source_titles(records);
    let mut mapping = CommentaryMapping::new();

    for rec in records.iter().filter(|r| r.text_type == TextType::Zhushu) {
        let Some(candidate) = rules.extract_source(rec.title(), rec.text_type) else {
            continue;
        };
        let Some(source) = rules.find_best_match(&candidate, &known) else {
            tracing::debug!("No source found for commentary {} '{}'", rec.id(), rec.title());
            continue;
        };

        mapping
            .entry(source.id().to_string())
            .or_insert_with(|| SourceCommentaries {
                title: source.record.title.clone(),
                source_type: source.text_type,
                zhushus: Vec::new(),
            })
            .zhushus
            .push(CommentaryRef {
                id: rec.record.id.clone(),
                title: rec.record.title.clone(),
                author: rec.record.author.clone(),
                suffix: rec.matched_suffix.clone(),
            });
    }

    mapping
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationEntry {
    pub id: String,
    pub title: String,
    pub author: String,
    pub source: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationGroup {
    pub base_title: String,
    /// Sorted by record id.
    pub translations: Vec<TranslationEntry>,
    pub total_versions: usize,
}

/// Group jing records by normalized sutra name, keeping names with two or more records.
pub fn build_translation_groups(
    records: &[ClassifiedRecord],
    rules: &TitleRules,
) -> IndexMap<String, TranslationGroup> {
    let mut by_name: IndexMap<String, Vec<&ClassifiedRecord>> = IndexMap::new();

    for rec in records.iter().filter(|r| r.text_type == TextType::Jing) {
        by_name
            .entry(rules.normalize_sutra_title(rec.title()))
            .or_default()
            .push(rec);
    }

    by_name
        .into_iter()
        .filter(|(_, members)| members.len() >= 2)
        .map(|(name, members)| {
            let mut translations: Vec<TranslationEntry> = members
                .iter()
                .map(|r| TranslationEntry {
                    id: r.record.id.clone(),
                    title: r.record.title.clone(),
                    author: r.record.author.clone(),
                    source: r.record.source.clone(),
                })
                .collect();
            translations.sort_by(|a, b| a.id.cmp(&b.id));

            let group = TranslationGroup {
                base_title: name.clone(),
                total_versions: translations.len(),
                translations,
            };
            (name, group)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_allocate_in_bands() {
        let mut c = GroupIdCounters::new();
        assert_eq!(c.allocate(TextType::Jing), 1000);
        assert_eq!(c.allocate(TextType::Jing), 1001);
        assert_eq!(c.allocate(TextType::Other), 4000);
        assert_eq!(c.allocate(TextType::Unknown), 0);
        assert_eq!(c.allocate(TextType::Unknown), 0);
        assert_eq!(c.jing, 1002);
    }

    #[test]
    fn test_text_type_for_group_id() {
        assert_eq!(text_type_for_group_id(0), TextType::Unknown);
        assert_eq!(text_type_for_group_id(1000), TextType::Jing);
        assert_eq!(text_type_for_group_id(2999), TextType::Lun);
        assert_eq!(text_type_for_group_id(3000), TextType::Zhushu);
        assert_eq!(text_type_for_group_id(4010), TextType::Other);
        assert_eq!(text_type_for_group_id(5000), TextType::Unknown);
    }
}
