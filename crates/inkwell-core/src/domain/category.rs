use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{DomainError, Violations};

/// Category entity - a topic posts can be filed under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Raw category payload.
#[derive(Debug, Clone, Default)]
pub struct CategoryInput {
    pub name: String,
    pub description: Option<String>,
}

impl Category {
    /// Validate the payload and build a new category.
    pub fn create(input: CategoryInput, now: DateTime<Utc>) -> Result<Self, DomainError> {
        let mut violations = Violations::new();

        let name = input.name.trim().to_string();
        let name_len = name.chars().count();
        if name_len < 2 {
            violations.push("name", "Name must be at least 2 characters");
        } else if name_len > 60 {
            violations.push("name", "Name must be at most 60 characters");
        }

        let description = input
            .description
            .map(|d| d.trim().to_string())
            .unwrap_or_default();
        if description.chars().count() > 500 {
            violations.push("description", "Description must be at most 500 characters");
        }

        violations.finish(Self {
            id: Uuid::new_v4(),
            name,
            description,
            created_at: now,
            updated_at: now,
        })
    }

    /// Case-insensitive match against name or description.
    pub fn matches_search(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.name.to_lowercase().contains(&needle)
            || self.description.to_lowercase().contains(&needle)
    }
}
