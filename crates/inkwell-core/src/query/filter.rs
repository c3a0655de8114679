//! Optional list filters. Malformed values degrade to "filter not applied".

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use uuid::Uuid;

use super::params::ListPostsParams;
use super::predicate::{DateRange, Predicate, TagMode, TextField};

/// Typed filters extracted from raw list parameters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostFilters {
    pub dates: DateRange,
    pub categories: Vec<Uuid>,
    pub tags: Option<(TagMode, Vec<String>)>,
    pub search: Option<String>,
}

impl PostFilters {
    pub fn from_params(params: &ListPostsParams) -> Self {
        Self {
            dates: DateRange {
                from: params.date_from.as_deref().and_then(day_start),
                to: params.date_to.as_deref().and_then(day_end),
            },
            categories: category_ids(&params.categories),
            tags: tag_terms(&params.tags, params.match_mode.as_deref()),
            search: params
                .q
                .as_deref()
                .map(str::trim)
                .filter(|q| !q.is_empty())
                .map(String::from),
        }
    }

    /// Category and tag predicates, AND-combined by the caller.
    pub fn narrowing(&self) -> Vec<Predicate> {
        let mut out = Vec::new();
        if !self.categories.is_empty() {
            out.push(Predicate::CategoryAnyOf(self.categories.clone()));
        }
        if let Some((mode, terms)) = &self.tags {
            out.push(Predicate::TagMatch {
                mode: *mode,
                terms: terms.clone(),
            });
        }
        out
    }

    pub fn search_predicate(&self) -> Option<Predicate> {
        self.search.as_ref().map(|needle| Predicate::TextContains {
            fields: vec![TextField::Title, TextField::Author],
            needle: needle.clone(),
        })
    }
}

fn parse_day(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

/// `YYYY-MM-DD` at 00:00:00.000 UTC.
pub fn day_start(raw: &str) -> Option<DateTime<Utc>> {
    parse_day(raw).map(|d| d.and_time(NaiveTime::MIN).and_utc())
}

/// `YYYY-MM-DD` at 23:59:59.999 UTC.
pub fn day_end(raw: &str) -> Option<DateTime<Utc>> {
    let end_of_day = NaiveTime::from_hms_milli_opt(23, 59, 59, 999)?;
    parse_day(raw).map(|d| d.and_time(end_of_day).and_utc())
}

/// Well-formed, deduplicated ids; malformed entries are dropped.
pub fn category_ids(raw: &[String]) -> Vec<Uuid> {
    let mut ids = Vec::new();
    for value in raw {
        if let Ok(id) = Uuid::parse_str(value.trim()) {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
    }
    ids
}

/// Lowercased non-blank terms with their mode, or `None` when nothing remains.
pub fn tag_terms(raw: &[String], mode: Option<&str>) -> Option<(TagMode, Vec<String>)> {
    let mut terms: Vec<String> = Vec::new();
    for term in raw {
        let term = term.trim().to_lowercase();
        if !term.is_empty() && !terms.contains(&term) {
            terms.push(term);
        }
    }
    if terms.is_empty() {
        None
    } else {
        Some((TagMode::parse(mode), terms))
    }
}
