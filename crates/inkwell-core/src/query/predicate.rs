//! Typed predicate tree over posts.
//!
//! Built from validated inputs only; persistence adapters translate it into
//! their own query language, and [`Predicate::matches`] evaluates it in memory.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{Post, PostStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateField {
    PublishedAt,
    CreatedAt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextField {
    Title,
    Author,
}

/// How tag terms are matched against a post's tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TagMode {
    /// Any term is a substring of any tag.
    #[default]
    Contains,
    /// Any term equals some tag.
    Exact,
    /// Every term is a substring of at least one tag.
    All,
}

impl TagMode {
    /// `any` is an alias of `contains`; unknown values fall back to `contains`.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(|m| m.trim().to_ascii_lowercase()).as_deref() {
            Some("exact") => TagMode::Exact,
            Some("all") => TagMode::All,
            _ => TagMode::Contains,
        }
    }
}

/// Inclusive timestamp bounds. At least one side is set when used in a predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DateRange {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl DateRange {
    pub fn is_unbounded(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }

    pub fn contains(&self, value: Option<DateTime<Utc>>) -> bool {
        if self.is_unbounded() {
            return true;
        }
        let Some(value) = value else {
            return false;
        };
        self.from.is_none_or(|from| value >= from) && self.to.is_none_or(|to| value <= to)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Conjunction; empty is always true.
    All(Vec<Predicate>),
    /// Disjunction; empty is always false.
    Any(Vec<Predicate>),
    StatusIs(PostStatus),
    OwnerIs(Uuid),
    DateWithin { field: DateField, range: DateRange },
    CategoryAnyOf(Vec<Uuid>),
    /// Terms are lowercased and non-empty.
    TagMatch { mode: TagMode, terms: Vec<String> },
    /// Case-insensitive literal substring match on any of `fields`.
    TextContains { fields: Vec<TextField>, needle: String },
}

impl Predicate {
    /// AND-combine, flattening nested conjunctions.
    pub fn and(self, other: Predicate) -> Predicate {
        let mut parts = match self {
            Predicate::All(parts) => parts,
            single => vec![single],
        };
        match other {
            Predicate::All(more) => parts.extend(more),
            single => parts.push(single),
        }
        Predicate::All(parts)
    }

    pub fn matches(&self, post: &Post) -> bool {
        match self {
            Predicate::All(parts) => parts.iter().all(|p| p.matches(post)),
            Predicate::Any(parts) => parts.iter().any(|p| p.matches(post)),
            Predicate::StatusIs(status) => post.status == *status,
            Predicate::OwnerIs(owner) => post.user_id == *owner,
            Predicate::DateWithin { field, range } => {
                let value = match field {
                    DateField::PublishedAt => post.published_at,
                    DateField::CreatedAt => Some(post.created_at),
                };
                range.contains(value)
            }
            Predicate::CategoryAnyOf(ids) => post.categories.iter().any(|c| ids.contains(c)),
            Predicate::TagMatch { mode, terms } => {
                let tags: Vec<String> = post.tags.iter().map(|t| t.to_lowercase()).collect();
                match mode {
                    TagMode::Contains => terms
                        .iter()
                        .any(|term| tags.iter().any(|tag| tag.contains(term.as_str()))),
                    TagMode::Exact => terms.iter().any(|term| tags.contains(term)),
                    TagMode::All => terms
                        .iter()
                        .all(|term| tags.iter().any(|tag| tag.contains(term.as_str()))),
                }
            }
            Predicate::TextContains { fields, needle } => {
                let needle = needle.to_lowercase();
                fields.iter().any(|field| {
                    let haystack = match field {
                        TextField::Title => &post.title,
                        TextField::Author => &post.author,
                    };
                    haystack.to_lowercase().contains(&needle)
                })
            }
        }
    }
}
