//! Query to canned response resolution.
//!
//! The query is lowercased and compared against every `(category, phrase, response)`
//! triple of the catalog. Three conditions select a triple, checked as tiers:
//!
//! 1. the query contains the whole phrase,
//! 2. the query contains the category name,
//! 3. the query contains any single word of the phrase.
//!
//! Within a tier the first triple in declaration order wins. Nothing is scored.

use crate::catalog::Catalog;
use log::debug;
use serde::Serialize;
use std::fmt;

/// Category reported for the fallback reply
pub const GENERAL_CATEGORY: &str = "general";

/// Which condition selected the reply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    Phrase,
    Category,
    Keyword,
    Fallback,
}

impl fmt::Display for MatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MatchKind::Phrase => "phrase",
            MatchKind::Category => "category",
            MatchKind::Keyword => "keyword",
            MatchKind::Fallback => "fallback",
        };
        write!(f, "{}", label)
    }
}

/// Reply chosen for a query, borrowed from the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MatchResult<'a> {
    pub content: &'a str,
    pub category: &'a str,
    pub kind: MatchKind,
}

impl MatchResult<'_> {
    pub fn is_fallback(&self) -> bool {
        self.kind == MatchKind::Fallback
    }
}

// Keys are lowercased here too, so hand-built catalogs that skipped
// `Catalog::normalized` still match.
fn tier_hit(kind: MatchKind, query: &str, category: &str, phrase: &str) -> bool {
    match kind {
        MatchKind::Phrase => query.contains(&phrase.to_lowercase()),
        MatchKind::Category => query.contains(&category.to_lowercase()),
        MatchKind::Keyword => phrase
            .to_lowercase()
            .split_whitespace()
            .any(|word| query.contains(word)),
        MatchKind::Fallback => false,
    }
}

/// Picks the canned reply for `query`. Never fails: unmatched queries get the fallback.
pub fn find_relevant_info<'a>(catalog: &'a Catalog, query: &str) -> MatchResult<'a> {
    let query = query.to_lowercase();

    for kind in [MatchKind::Phrase, MatchKind::Category, MatchKind::Keyword] {
        let found = catalog
            .triples()
            .find(|(category, phrase, _)| tier_hit(kind, &query, category, phrase));

        if let Some((category, phrase, content)) = found {
            debug!("Matched '{}' in '{}' on {}", phrase, category, kind);
            return MatchResult {
                content,
                category,
                kind,
            };
        }
    }

    debug!("No match for query, using fallback");
    MatchResult {
        content: &catalog.fallback,
        category: GENERAL_CATEGORY,
        kind: MatchKind::Fallback,
    }
}
