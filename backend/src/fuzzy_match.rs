//! Resolving a recovered source name against the known sutra and treatise titles.

use std::collections::HashSet;

use indexmap::IndexMap;
use serde::{Serialize, Deserialize};

use crate::title_patterns::TitleRules;

/// A known title may run this many characters past the candidate in the prefix tier.
pub const MAX_PREFIX_EXTRA_CHARS: usize = 6;
/// Lowest similarity score accepted in the scoring tier.
pub const MIN_SIMILARITY: f64 = 0.5;
/// Shared characters needed before two unrelated titles get a nonzero score.
pub const MIN_COMMON_CHARS: usize = 3;

/// Which tier produced a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchTier {
    Exact,
    SuffixCompletion,
    Prefix,
    Similarity,
}

/// Similarity of a candidate to a known title, between 0.0 and 1.0.
///
/// Containment either way scores the length ratio. Otherwise the shared
/// character set counts, if it has at least three characters.
pub fn similarity_score(candidate: &str, known: &str) -> f64 {
    let cand_len = candidate.chars().count();
    let known_len = known.chars().count();

    if cand_len == 0 || known_len == 0 {
        return 0.0;
    }

    if known.contains(candidate) {
        return cand_len as f64 / known_len as f64;
    }
    if candidate.contains(known) {
        return known_len as f64 / cand_len as f64;
    }

    let cand_chars: HashSet<char> = candidate.chars().collect();
    let known_chars: HashSet<char> = known.chars().collect();
    let common = cand_chars.intersection(&known_chars).count();

    if common >= MIN_COMMON_CHARS {
        common as f64 / cand_len.max(known_len) as f64
    } else {
        0.0
    }
}

impl TitleRules {
    /// Titles tried in the suffix-completion tier, in order.
    pub fn completions(&self, candidate: &str) -> Vec<String> {
        let p = &self.patterns;
        let mut out = Vec::new();

        for suffix in &p.completion_suffixes {
            if candidate.ends_with(suffix.as_str()) {
                continue;
            }
            out.push(format!("{}{}", candidate, suffix));
            if *suffix == p.sutra_suffix && !candidate.ends_with(p.paramita_marker.as_str()) {
                out.push(format!("{}{}{}", candidate, p.paramita_marker, suffix));
            }
        }

        out
    }

    /// Like `find_best_match`, also reporting the tier that matched.
    ///
    /// Iteration over `known` follows its insertion order. In the prefix tier
    /// the first qualifying title wins; in the scoring tier a tie keeps the
    /// earlier title.
    pub fn find_best_match_with_tier<'a, V>(
        &self,
        candidate: &str,
        known: &'a IndexMap<String, V>,
    ) -> Option<(MatchTier, &'a V)> {
        if candidate.is_empty() {
            return None;
        }

        if let Some(v) = known.get(candidate) {
            return Some((MatchTier::Exact, v));
        }

        for completed in self.completions(candidate) {
            if let Some(v) = known.get(&completed) {
                return Some((MatchTier::SuffixCompletion, v));
            }
        }

        let cand_len = candidate.chars().count();
        let prefix_hit = known.iter().find(|(title, _)| {
            title.starts_with(candidate) && title.chars().count() - cand_len <= MAX_PREFIX_EXTRA_CHARS
        });
        if let Some((_, v)) = prefix_hit {
            return Some((MatchTier::Prefix, v));
        }

        let mut best: Option<&'a V> = None;
        let mut best_score = 0.0;

        for (title, v) in known {
            let score = similarity_score(candidate, title);
            if score > best_score && score >= MIN_SIMILARITY {
                best_score = score;
                best = Some(v);
            }
        }

        best.map(|v| (MatchTier::Similarity, v))
    }

    /// Resolve `candidate` against `known` (title -> value).
    ///
    /// Tiers, first hit wins: exact title, candidate + completion suffix,
    /// known title extending the candidate by at most six characters,
    /// best similarity score of at least 0.5.
    pub fn find_best_match<'a, V>(&self, candidate: &str, known: &'a IndexMap<String, V>) -> Option<&'a V> {
        self.find_best_match_with_tier(candidate, known).map(|(_, v)| v)
    }
}
