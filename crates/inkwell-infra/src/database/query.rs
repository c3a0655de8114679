//! Translation of listing predicates and orderings into SQL.
//!
//! Tag and text matches are custom expressions whose `$n` placeholders are
//! local to each expression; category overlap binds a single array value.

use sea_orm::sea_query::extension::postgres::PgBinOper;
use sea_orm::sea_query::{Expr, NullOrdering, SimpleExpr};
use sea_orm::{ColumnTrait, Condition, Order, QueryOrder, Select, Value};
use uuid::Uuid;

use inkwell_core::query::{DateField, Direction, Predicate, SortKey, SortTerm, TagMode, TextField};

use super::entity::post;

const LIKE_ESCAPE: char = '!';

/// Escape LIKE wildcards so user input matches literally.
pub fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE) {
            escaped.push(LIKE_ESCAPE);
        }
        escaped.push(c);
    }
    escaped
}

fn contains_pattern(term: &str) -> String {
    format!("%{}%", escape_like(term))
}

/// Build the WHERE condition for a post predicate.
pub fn post_condition(predicate: &Predicate) -> Condition {
    match predicate {
        Predicate::All(parts) => parts
            .iter()
            .fold(Condition::all(), |cond, part| cond.add(post_condition(part))),
        Predicate::Any(parts) => parts
            .iter()
            .fold(Condition::any(), |cond, part| cond.add(post_condition(part))),
        Predicate::StatusIs(status) => {
            Condition::all().add(post::Column::Status.eq(status.as_str()))
        }
        Predicate::OwnerIs(owner) => Condition::all().add(post::Column::UserId.eq(*owner)),
        Predicate::DateWithin { field, range } => {
            let column = match field {
                DateField::PublishedAt => post::Column::PublishedAt,
                DateField::CreatedAt => post::Column::CreatedAt,
            };
            let mut cond = Condition::all();
            if let Some(from) = range.from {
                cond = cond.add(column.gte(from));
            }
            if let Some(to) = range.to {
                cond = cond.add(column.lte(to));
            }
            cond
        }
        Predicate::CategoryAnyOf(ids) => Condition::all().add(category_overlap(ids)),
        Predicate::TagMatch { mode, terms } => {
            let base = match mode {
                TagMode::All => Condition::all(),
                TagMode::Contains | TagMode::Exact => Condition::any(),
            };
            terms
                .iter()
                .fold(base, |cond, term| cond.add(tag_expr(*mode, term)))
        }
        Predicate::TextContains { fields, needle } => fields
            .iter()
            .fold(Condition::any(), |cond, field| cond.add(text_expr(*field, needle))),
    }
}

/// The ids are bound as one `uuid[]` value.
fn category_overlap(ids: &[Uuid]) -> SimpleExpr {
    Expr::col((post::Entity, post::Column::CategoryIds))
        .binary(PgBinOper::Overlap, Value::from(ids.to_vec()))
}

fn tag_expr(mode: TagMode, term: &str) -> SimpleExpr {
    match mode {
        TagMode::Exact => {
            Expr::cust_with_values(r#"$1 = ANY("posts"."tags")"#, [term.to_lowercase()])
        }
        TagMode::Contains | TagMode::All => Expr::cust_with_values(
            r#"EXISTS (SELECT 1 FROM unnest("posts"."tags") AS t(tag) WHERE t.tag ILIKE $1 ESCAPE '!')"#,
            [contains_pattern(term)],
        ),
    }
}

fn text_expr(field: TextField, needle: &str) -> SimpleExpr {
    let column = match field {
        TextField::Title => r#""posts"."title""#,
        TextField::Author => r#""posts"."author""#,
    };
    Expr::cust_with_values(
        format!("{column} ILIKE $1 ESCAPE '!'"),
        [contains_pattern(needle)],
    )
}

/// Apply a listing order. Missing publication dates sort lowest.
pub fn apply_order(mut select: Select<post::Entity>, order: &[SortTerm]) -> Select<post::Entity> {
    for term in order {
        let (ord, nulls) = match term.direction {
            Direction::Asc => (Order::Asc, NullOrdering::First),
            Direction::Desc => (Order::Desc, NullOrdering::Last),
        };
        select = match term.key {
            SortKey::PublishedAt => {
                select.order_by_with_nulls(post::Column::PublishedAt, ord, nulls)
            }
            SortKey::CreatedAt => select.order_by(post::Column::CreatedAt, ord),
            SortKey::Id => select.order_by(post::Column::Id, ord),
        };
    }
    select
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("50%_off!"), "50!%!_off!!");
        assert_eq!(escape_like("plain"), "plain");
    }

    #[test]
    fn test_contains_pattern_wraps_escaped_term() {
        assert_eq!(contains_pattern("a_b"), "%a!_b%");
    }
}
