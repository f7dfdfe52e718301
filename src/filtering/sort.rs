use sea_orm::sea_query::{Expr, Order, SimpleExpr};

use super::conditions::{is_sql_identifier, json_text_expr, quote_identifier};
use super::spec::SortSpec;

/// ORDER BY term for a sort spec.
///
/// Both flat columns and JSON paths are compared as `lower(unaccent(text))` so the
/// ordering agrees with how filters match text. Returns `None` when the column name
/// is not a plain identifier.
#[must_use]
pub fn sort_expr(sort: &SortSpec, unaccent: &str) -> Option<(SimpleExpr, Order)> {
    if !is_sql_identifier(sort.field.root()) {
        tracing::warn!(field = %sort.field, "skipping sort on unsafe field name");
        return None;
    }

    let sql = if sort.field.is_json() {
        format!("lower({unaccent}(({})::TEXT))", json_text_expr(&sort.field))
    } else {
        format!("lower({unaccent}({}::TEXT))", quote_identifier(sort.field.root()))
    };

    tracing::debug!(field = %sort.field, direction = sort.direction.as_sql(), "applied sort criterion");
    Some((Expr::cust(sql), sort.direction.into()))
}
