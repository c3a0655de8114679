//! Raw list parameters as they arrive on the query string.

/// Untyped `GET /posts` parameters.
///
/// Scalars keep their first occurrence. `categories` and `tags` accept both
/// comma-separated values and repeated keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListPostsParams {
    pub owner: Option<String>,
    pub status: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub categories: Vec<String>,
    pub tags: Vec<String>,
    pub match_mode: Option<String>,
    pub sort: Option<String>,
    pub sort_by: Option<String>,
    pub order: Option<String>,
    pub q: Option<String>,
    pub limit: Option<String>,
    pub page: Option<String>,
}

impl ListPostsParams {
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut params = Self::default();
        for (key, value) in pairs {
            let value = value.into();
            let slot = match key.as_ref() {
                "owner" => &mut params.owner,
                "status" => &mut params.status,
                "dateFrom" => &mut params.date_from,
                "dateTo" => &mut params.date_to,
                "match" => &mut params.match_mode,
                "sort" => &mut params.sort,
                "sortBy" => &mut params.sort_by,
                "order" => &mut params.order,
                "q" => &mut params.q,
                "limit" => &mut params.limit,
                "page" => &mut params.page,
                "categories" | "categories[]" => {
                    params.categories.extend(split_list(&value));
                    continue;
                }
                "tags" | "tags[]" => {
                    params.tags.extend(split_list(&value));
                    continue;
                }
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        params
    }

    pub fn owner_only(&self) -> bool {
        self.owner.as_deref() == Some("me")
    }
}

fn split_list(raw: &str) -> impl Iterator<Item = String> + '_ {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}
