//! Post listing query composition.
//!
//! A list request flows through the visibility resolver, the filter composer
//! and the sort/paginate composer, producing a [`PostQuery`] that repositories
//! execute without knowing anything about HTTP parameters.

mod filter;
mod params;
mod predicate;
mod sort;
mod visibility;

use std::cmp::Ordering;

use uuid::Uuid;

use crate::domain::Post;
use crate::error::DomainError;

pub use filter::{PostFilters, category_ids, day_end, day_start, tag_terms};
pub use params::ListPostsParams;
pub use predicate::{DateField, DateRange, Predicate, TagMode, TextField};
pub use sort::{
    DEFAULT_LIMIT, Direction, MAX_LIMIT, MAX_OFFSET, Paging, SortKey, SortRequest, SortTerm,
};
pub use visibility::Visibility;

/// A fully resolved listing: what to match, how to order, which slice.
#[derive(Debug, Clone, PartialEq)]
pub struct PostQuery {
    pub predicate: Predicate,
    pub order: Vec<SortTerm>,
    pub paging: Paging,
}

impl PostQuery {
    /// Compose a listing for `caller` from raw parameters.
    ///
    /// Only an owner-only listing without a caller fails; every other
    /// malformed parameter is dropped.
    pub fn compose(caller: Option<Uuid>, params: &ListPostsParams) -> Result<Self, DomainError> {
        let visibility =
            Visibility::resolve(caller, params.owner_only(), params.status.as_deref())?;
        let filters = PostFilters::from_params(params);

        let mut predicate = visibility.predicate(filters.dates);

        // Free text extends an existing visibility OR-clause instead of narrowing it.
        if let Some(search) = filters.search_predicate() {
            predicate = match predicate {
                Predicate::Any(mut branches) => {
                    branches.push(search);
                    Predicate::Any(branches)
                }
                other => other.and(search),
            };
        }

        for narrowing in filters.narrowing() {
            predicate = predicate.and(narrowing);
        }

        let order = SortRequest::from_params(params).order(visibility.is_owner_only());

        Ok(Self {
            predicate,
            order,
            paging: Paging::from_params(params),
        })
    }

    /// Compare two posts under this query's ordering.
    pub fn compare(&self, a: &Post, b: &Post) -> Ordering {
        for term in &self.order {
            let ord = match term.key {
                SortKey::PublishedAt => a.published_at.cmp(&b.published_at),
                SortKey::CreatedAt => a.created_at.cmp(&b.created_at),
                SortKey::Id => a.id.cmp(&b.id),
            };
            let ord = match term.direction {
                Direction::Asc => ord,
                Direction::Desc => ord.reverse(),
            };
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PostStatus;

    fn params(pairs: &[(&str, &str)]) -> ListPostsParams {
        ListPostsParams::from_pairs(pairs.iter().copied())
    }

    #[test]
    fn test_owner_me_without_caller_is_unauthorized() {
        let result = PostQuery::compose(None, &params(&[("owner", "me")]));
        assert!(matches!(result, Err(DomainError::Unauthorized)));
    }

    #[test]
    fn test_anonymous_search_narrows() {
        let query = PostQuery::compose(None, &params(&[("q", " rust ")])).unwrap();
        assert_eq!(
            query.predicate,
            Predicate::All(vec![
                Predicate::StatusIs(PostStatus::Published),
                Predicate::TextContains {
                    fields: vec![TextField::Title, TextField::Author],
                    needle: "rust".into(),
                },
            ])
        );
    }

    #[test]
    fn test_mixed_search_extends_visibility_clause() {
        let me = Uuid::new_v4();
        let query = PostQuery::compose(Some(me), &params(&[("q", "rust"), ("tags", "go")])).unwrap();
        let Predicate::All(parts) = query.predicate else {
            panic!("expected conjunction");
        };
        assert_eq!(parts.len(), 2);
        let Predicate::Any(branches) = &parts[0] else {
            panic!("expected visibility disjunction first");
        };
        assert_eq!(branches.len(), 3);
        assert!(matches!(branches[2], Predicate::TextContains { .. }));
        assert!(matches!(parts[1], Predicate::TagMatch { .. }));
    }

    #[test]
    fn test_owner_listing_order_and_paging() {
        let me = Uuid::new_v4();
        let query = PostQuery::compose(
            Some(me),
            &params(&[("owner", "me"), ("limit", "5"), ("page", "2")]),
        )
        .unwrap();
        assert_eq!(query.predicate, Predicate::OwnerIs(me));
        assert_eq!(query.order[0].key, SortKey::CreatedAt);
        assert_eq!(query.paging.skip(), 10);
    }
}
