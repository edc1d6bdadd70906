//! Free-text search over pharmacy, mask and user names.
//!
//! Matching happens in SQL (case-insensitive substring), scoring in Rust, so
//! the relevance ladder stays in one place and is unit-testable.

use sea_orm::{
    QueryFilter, QuerySelect,
    sea_query::{Expr, Func},
    prelude::*,
};
use unicode_normalization::UnicodeNormalization;

use crate::{EngineError, ResultEngine, masks, pharmacies, users};

use super::Engine;

/// Per-kind cap on candidate rows fetched for scoring.
const SEARCH_ROW_CAP: u64 = 50;

/// Which catalogs to search.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SearchKind {
    Pharmacy,
    Mask,
    User,
    #[default]
    All,
}

impl SearchKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pharmacy => "pharmacy",
            Self::Mask => "mask",
            Self::User => "user",
            Self::All => "all",
        }
    }
}

impl TryFrom<&str> for SearchKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "pharmacy" => Ok(Self::Pharmacy),
            "mask" => Ok(Self::Mask),
            "user" => Ok(Self::User),
            "all" => Ok(Self::All),
            other => Err(EngineError::InvalidInput(format!(
                "invalid search type: {other}"
            ))),
        }
    }
}

/// One scored search result.
#[derive(Clone, Debug)]
pub struct SearchHit {
    pub kind: &'static str,
    pub id: i64,
    pub name: String,
    /// Only set for masks.
    pub price_cents: Option<i64>,
    /// Only set for masks.
    pub pharmacy_id: Option<i64>,
    pub relevance: f64,
}

impl Engine {
    /// Searches pharmacies, masks and/or users by name, ranked by descending
    /// relevance to the query.
    pub async fn search(&self, query: &str, kind: SearchKind) -> ResultEngine<Vec<SearchHit>> {
        let query = normalize_query(query);
        let pattern = format!("%{}%", query.to_lowercase());
        let mut results = Vec::new();

        if matches!(kind, SearchKind::Pharmacy | SearchKind::All) {
            let rows = pharmacies::Entity::find()
                .filter(
                    Expr::expr(Func::lower(Expr::col((
                        pharmacies::Entity,
                        pharmacies::Column::Name,
                    ))))
                    .like(pattern.as_str()),
                )
                .limit(SEARCH_ROW_CAP)
                .all(&self.database)
                .await?;
            results.extend(rows.into_iter().map(|row| SearchHit {
                kind: "pharmacy",
                id: row.id,
                relevance: relevance(&query, &row.name),
                name: row.name,
                price_cents: None,
                pharmacy_id: None,
            }));
        }

        if matches!(kind, SearchKind::User | SearchKind::All) {
            let rows = users::Entity::find()
                .filter(
                    Expr::expr(Func::lower(Expr::col((
                        users::Entity,
                        users::Column::Name,
                    ))))
                    .like(pattern.as_str()),
                )
                .limit(SEARCH_ROW_CAP)
                .all(&self.database)
                .await?;
            results.extend(rows.into_iter().map(|row| SearchHit {
                kind: "user",
                id: row.id,
                relevance: relevance(&query, &row.name),
                name: row.name,
                price_cents: None,
                pharmacy_id: None,
            }));
        }

        if matches!(kind, SearchKind::Mask | SearchKind::All) {
            let rows = masks::Entity::find()
                .filter(
                    Expr::expr(Func::lower(Expr::col((
                        masks::Entity,
                        masks::Column::Name,
                    ))))
                    .like(pattern.as_str()),
                )
                .limit(SEARCH_ROW_CAP)
                .all(&self.database)
                .await?;
            results.extend(rows.into_iter().map(|row| SearchHit {
                kind: "mask",
                id: row.id,
                relevance: relevance(&query, &row.name),
                name: row.name,
                price_cents: Some(row.price_cents),
                pharmacy_id: Some(row.pharmacy_id),
            }));
        }

        results.sort_by(|a, b| {
            b.relevance
                .partial_cmp(&a.relevance)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        Ok(results)
    }
}

/// Trims and NFKC-normalizes a raw query so visually equivalent inputs match
/// the same rows.
pub(crate) fn normalize_query(query: &str) -> String {
    query.trim().nfkc().collect()
}

/// Relevance of `target` for `query`, in descending ladder order: exact
/// match, prefix, suffix, whole word, substring, then a character-overlap
/// ratio.
pub(crate) fn relevance(query: &str, target: &str) -> f64 {
    let query = query.trim().to_lowercase();
    let target = target.trim().to_lowercase();

    if query.is_empty() || target.is_empty() {
        return 0.0;
    }
    if query == target {
        return 100.0;
    }
    if target.starts_with(&query) {
        return 90.0;
    }
    if target.ends_with(&query) {
        return 80.0;
    }
    if format!(" {target} ").contains(&format!(" {query} ")) {
        return 70.0;
    }
    if target.contains(&query) {
        return 60.0;
    }

    let common = query.chars().filter(|c| target.contains(*c)).count();
    if common > 0 {
        return common as f64 / query.chars().count() as f64 * 40.0;
    }

    0.0
}
