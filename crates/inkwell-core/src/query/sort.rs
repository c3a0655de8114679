//! Sort order and offset pagination.

use super::params::ListPostsParams;

pub const DEFAULT_LIMIT: u64 = 20;
pub const MAX_LIMIT: u64 = 100;
/// Largest row offset a SQL backend accepts (`BIGINT`).
pub const MAX_OFFSET: u64 = i64::MAX as u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    PublishedAt,
    CreatedAt,
    Id,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    /// `asc` is ascending; anything else is descending.
    fn parse(raw: Option<&str>) -> Self {
        match raw.map(|d| d.trim().to_ascii_lowercase()).as_deref() {
            Some("asc") => Direction::Asc,
            _ => Direction::Desc,
        }
    }
}

/// One level of the ordering. Null values sort as the lowest value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortTerm {
    pub key: SortKey,
    pub direction: Direction,
}

impl SortTerm {
    const fn desc(key: SortKey) -> Self {
        Self {
            key,
            direction: Direction::Desc,
        }
    }
}

/// Explicit sort requested by the client, if any was recognised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortRequest {
    #[default]
    Default,
    CreatedAt(Direction),
}

impl SortRequest {
    /// `sort=field:direction` takes precedence over `sortBy` + `order`.
    pub fn from_params(params: &ListPostsParams) -> Self {
        let (field, direction) = match params.sort.as_deref().filter(|s| !s.trim().is_empty()) {
            Some(compact) => {
                let mut parts = compact.splitn(2, ':');
                let field = parts.next().map(str::trim);
                let direction = parts.next();
                (field, Direction::parse(direction))
            }
            None => (
                params.sort_by.as_deref().map(str::trim),
                Direction::parse(params.order.as_deref()),
            ),
        };
        match field {
            Some("createdAt") => SortRequest::CreatedAt(direction),
            _ => SortRequest::Default,
        }
    }

    /// Full ordering with the identity tie-break last.
    pub fn order(self, owner_only: bool) -> Vec<SortTerm> {
        match self {
            SortRequest::CreatedAt(direction) => vec![
                SortTerm {
                    key: SortKey::CreatedAt,
                    direction,
                },
                SortTerm::desc(SortKey::Id),
            ],
            SortRequest::Default if owner_only => {
                vec![SortTerm::desc(SortKey::CreatedAt), SortTerm::desc(SortKey::Id)]
            }
            SortRequest::Default => vec![
                SortTerm::desc(SortKey::PublishedAt),
                SortTerm::desc(SortKey::CreatedAt),
                SortTerm::desc(SortKey::Id),
            ],
        }
    }
}

/// Zero-based offset pagination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paging {
    pub limit: u64,
    pub page: u64,
}

impl Default for Paging {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            page: 0,
        }
    }
}

impl Paging {
    /// `limit` clamped to [1, 100] (default 20), `page` to >= 0 (default 0).
    pub fn from_params(params: &ListPostsParams) -> Self {
        let limit = params
            .limit
            .as_deref()
            .and_then(|l| l.trim().parse::<i64>().ok())
            .map(|l| l.clamp(1, MAX_LIMIT as i64) as u64)
            .unwrap_or(DEFAULT_LIMIT);
        let page = params
            .page
            .as_deref()
            .and_then(|p| p.trim().parse::<i64>().ok())
            .map(|p| p.max(0) as u64)
            .unwrap_or(0);
        Self { limit, page }
    }

    /// Rows before this page, capped at [`MAX_OFFSET`].
    pub fn skip(&self) -> u64 {
        self.page.saturating_mul(self.limit).min(MAX_OFFSET)
    }
}
