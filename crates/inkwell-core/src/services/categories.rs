use std::sync::Arc;

use chrono::Utc;

use crate::domain::{Category, CategoryInput};
use crate::error::DomainError;
use crate::ports::CategoryRepository;
use crate::query::MAX_OFFSET;

const DEFAULT_PER_PAGE: u64 = 50;
const MAX_PER_PAGE: u64 = 200;

pub struct CategoryService {
    categories: Arc<dyn CategoryRepository>,
}

impl CategoryService {
    pub fn new(categories: Arc<dyn CategoryRepository>) -> Self {
        Self { categories }
    }

    /// One-based pages of categories sorted by name.
    ///
    /// `limit` is clamped to [1, 200] (default 50); zero or unparsable values
    /// fall back to the defaults.
    pub async fn list(
        &self,
        search: Option<&str>,
        limit: Option<&str>,
        page: Option<&str>,
    ) -> Result<Vec<Category>, DomainError> {
        let per_page = parse_positive(limit)
            .unwrap_or(DEFAULT_PER_PAGE)
            .clamp(1, MAX_PER_PAGE);
        let page = parse_positive(page).unwrap_or(1).max(1);
        let term = search.map(str::trim).filter(|s| !s.is_empty());
        let offset = (page - 1).saturating_mul(per_page).min(MAX_OFFSET);

        Ok(self.categories.search(term, per_page, offset).await?)
    }

    pub async fn create(&self, input: CategoryInput) -> Result<Category, DomainError> {
        let category = Category::create(input, Utc::now())?;
        let saved = self.categories.save(category).await?;
        tracing::info!(category_id = %saved.id, name = %saved.name, "Category created");
        Ok(saved)
    }
}

fn parse_positive(raw: Option<&str>) -> Option<u64> {
    raw.and_then(|v| v.trim().parse::<i64>().ok())
        .filter(|v| *v != 0)
        .map(|v| v.max(1) as u64)
}
