//! Filter spec → `sea_orm::Condition` translation.
//!
//! Flat fields compare the column directly. Dotted fields are JSON paths: the first
//! segment is the column, intermediate segments are walked with `->` and the last one
//! is extracted as text with `->>`. Text comparisons are case and accent insensitive
//! (`lower(unaccent(x)) = lower(unaccent($1))`) and always bound as parameters.
//!
//! Column predicates other than text go through `Expr::col`, so they render on every
//! `sea_query` backend; JSON paths and unaccent are PostgreSQL features.

use std::sync::LazyLock;

use regex::Regex;
use sea_orm::{
    Condition, Value,
    sea_query::{Alias, Expr, SimpleExpr},
};
use serde_json::Number;

use super::spec::{FieldFilter, FieldPath, FilterSpec};
use super::value::{FilterValue, Scalar};

static SQL_IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\A[A-Za-z_][A-Za-z0-9_]*\z").expect("identifier pattern is valid"));

const MAX_FIELD_PATH_LENGTH: usize = 255;

/// Plain unquoted SQL identifier (`users`, `id_primary`)
#[must_use]
pub fn is_sql_identifier(name: &str) -> bool {
    name.len() <= MAX_FIELD_PATH_LENGTH && SQL_IDENTIFIER.is_match(name)
}

/// Column must be an identifier; JSON keys are quoted, so any non-empty text works.
fn is_valid_field_path(path: &FieldPath) -> bool {
    path.as_str().len() <= MAX_FIELD_PATH_LENGTH && is_sql_identifier(path.root())
}

fn quote_literal(segment: &str) -> String {
    format!("'{}'", segment.replace('\'', "''"))
}

/// `"userName"`; quoted so custom fragments address the same column as `Expr::col`
#[must_use]
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// `"data" ->> 'city'` or `"data" -> 'address' -> 'geo' ->> 'lat'`
#[must_use]
pub fn json_text_expr(path: &FieldPath) -> String {
    let mut expr = quote_identifier(path.root());
    let Some((last, middle)) = path.segments()[1..].split_last() else {
        return expr;
    };
    for segment in middle {
        expr.push_str(" -> ");
        expr.push_str(&quote_literal(segment));
    }
    expr.push_str(" ->> ");
    expr.push_str(&quote_literal(last));
    expr
}

/// What a predicate compares against
enum Target {
    Column(String),
    Json(String),
}

impl Target {
    fn for_path(path: &FieldPath) -> Self {
        if path.is_json() {
            Self::Json(json_text_expr(path))
        } else {
            Self::Column(path.root().to_string())
        }
    }

    /// Numeric view of the target; JSON text must be cast first
    fn numeric(&self) -> Expr {
        match self {
            Self::Column(col) => Expr::col(Alias::new(col)),
            Self::Json(expr) => Expr::expr(Expr::cust(format!("({expr})::numeric"))),
        }
    }
}

fn number_value(n: &Number) -> Value {
    if let Some(i) = n.as_i64() {
        Value::from(i)
    } else if let Some(u) = n.as_u64() {
        Value::from(u)
    } else {
        Value::from(n.as_f64().unwrap_or_default())
    }
}

fn scalar_expr(target: &Target, scalar: &Scalar, unaccent: &str) -> SimpleExpr {
    match (target, scalar) {
        (Target::Column(col), Scalar::Bool(b)) => Expr::col(Alias::new(col)).eq(*b),
        (Target::Column(col), Scalar::Number(n)) => Expr::col(Alias::new(col)).eq(number_value(n)),
        (Target::Column(col), Scalar::Null) => Expr::col(Alias::new(col)).is_null(),
        (Target::Json(expr), Scalar::Bool(b)) => Expr::cust(format!("({expr})::boolean = {b}")),
        // serde_json numbers only ever print digits, sign, dot and exponent
        (Target::Json(expr), Scalar::Number(n)) => Expr::cust(format!("({expr})::numeric = {n}")),
        (Target::Json(expr), Scalar::Null) => Expr::cust(format!("{expr} IS NULL")),
        (Target::Column(col), Scalar::Text(text)) => Expr::cust_with_values(
            format!("lower({unaccent}({}::TEXT)) = lower({unaccent}($1))", quote_identifier(col)),
            [Value::from(text.as_str())],
        ),
        (Target::Json(expr), Scalar::Text(text)) => Expr::cust_with_values(
            format!("lower({unaccent}({expr})) = lower({unaccent}($1))"),
            [Value::from(text.as_str())],
        ),
    }
}

/// Predicate for one field, or `None` when the field name is unsafe to splice into SQL
#[must_use]
pub fn field_condition(filter: &FieldFilter, unaccent: &str) -> Option<Condition> {
    if !is_valid_field_path(&filter.path) {
        tracing::warn!(field = %filter.display_name(), "skipping filter on unsafe field name");
        return None;
    }

    let target = Target::for_path(&filter.path);
    let condition = match &filter.value {
        FilterValue::Eq(scalar) => Condition::all().add(scalar_expr(&target, scalar, unaccent)),
        FilterValue::AtLeast(n) => Condition::all().add(target.numeric().gte(*n)),
        FilterValue::AtMost(n) => Condition::all().add(target.numeric().lte(*n)),
        FilterValue::Range(lo, hi) => Condition::all().add(target.numeric().between(*lo, *hi)),
        FilterValue::Set(values) if values.is_empty() => Condition::all().add(Expr::cust("1=0")),
        FilterValue::Set(values) => values
            .iter()
            .fold(Condition::any(), |any, scalar| any.add(scalar_expr(&target, scalar, unaccent))),
    };

    tracing::debug!(field = %filter.path, "applied filter criterion");
    Some(condition)
}

/// AND across fields, OR within one field's multiple values
#[must_use]
pub fn filter_condition(spec: &FilterSpec, unaccent: &str) -> Condition {
    spec.iter()
        .filter_map(|filter| field_condition(filter, unaccent))
        .fold(Condition::all(), Condition::add)
}
