//! Which posts a caller may see in a listing.

use uuid::Uuid;

use super::predicate::{DateField, DateRange, Predicate};
use crate::domain::PostStatus;
use crate::error::DomainError;

/// Resolved visibility context of a list request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// Anonymous caller: published posts only.
    Public,
    /// Authenticated caller: published posts plus the caller's own.
    PublishedOrOwn { caller: Uuid },
    /// `owner=me`: the caller's own posts, optionally narrowed by status.
    OwnerOnly {
        caller: Uuid,
        status: Option<PostStatus>,
    },
}

impl Visibility {
    /// Fails with `Unauthorized` for owner-only listings without a caller.
    pub fn resolve(
        caller: Option<Uuid>,
        owner_only: bool,
        status: Option<&str>,
    ) -> Result<Self, DomainError> {
        match (caller, owner_only) {
            (None, true) => Err(DomainError::Unauthorized),
            (Some(caller), true) => {
                // Only draft/published narrow the listing; anything else is ignored.
                let status = match status.map(str::trim) {
                    Some("draft") => Some(PostStatus::Draft),
                    Some("published") => Some(PostStatus::Published),
                    _ => None,
                };
                Ok(Visibility::OwnerOnly { caller, status })
            }
            (Some(caller), false) => Ok(Visibility::PublishedOrOwn { caller }),
            (None, false) => Ok(Visibility::Public),
        }
    }

    pub fn is_owner_only(&self) -> bool {
        matches!(self, Visibility::OwnerOnly { .. })
    }

    /// Base predicate with the date bound applied per branch.
    ///
    /// Published branches bound `publishedAt`; owned branches bound `createdAt`
    /// unless the owner explicitly asked for published posts.
    pub fn predicate(&self, dates: DateRange) -> Predicate {
        match *self {
            Visibility::Public => published_branch(dates),
            Visibility::PublishedOrOwn { caller } => Predicate::Any(vec![
                published_branch(dates),
                with_dates(Predicate::OwnerIs(caller), DateField::CreatedAt, dates),
            ]),
            Visibility::OwnerOnly { caller, status } => {
                let mut base = Predicate::OwnerIs(caller);
                if let Some(status) = status {
                    base = base.and(Predicate::StatusIs(status));
                }
                let field = match status {
                    Some(PostStatus::Published) => DateField::PublishedAt,
                    _ => DateField::CreatedAt,
                };
                with_dates(base, field, dates)
            }
        }
    }
}

fn published_branch(dates: DateRange) -> Predicate {
    with_dates(
        Predicate::StatusIs(PostStatus::Published),
        DateField::PublishedAt,
        dates,
    )
}

fn with_dates(base: Predicate, field: DateField, dates: DateRange) -> Predicate {
    if dates.is_unbounded() {
        base
    } else {
        base.and(Predicate::DateWithin {
            field,
            range: dates,
        })
    }
}
