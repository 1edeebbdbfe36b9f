//! Filter-to-SQL compilation
//!
//! Turns validated filter conditions into one `AND`-joined boolean
//! expression with `?` placeholders, appending bound parameters in emission
//! order. A condition whose value does not fit its operator is never an
//! error here — it compiles to an explicit skip that callers can log, so the
//! permissive behavior stays observable.

use stockroom::table::types::{Filter, FilterOperator, FilterValue, Scalar};

use super::fields::FieldMap;
use crate::utils::sql::escape_like_pattern;

/// A parameter bound to a `?` placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Text(String),
    Number(f64),
}

impl From<&Scalar> for SqlValue {
    fn from(scalar: &Scalar) -> Self {
        match scalar {
            Scalar::Text(s) => SqlValue::Text(s.clone()),
            Scalar::Number(n) => SqlValue::Number(*n),
        }
    }
}

/// Collects SQL parameters during query building (maintains insertion order)
#[derive(Debug, Default)]
pub struct SqlParams {
    pub values: Vec<SqlValue>,
}

/// Why a condition produced no SQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// `in`/`not_in` with an empty list: dropped, not an always-false clause.
    EmptyValueList,
    /// Pattern operators need a string value.
    PatternNotText,
    /// The value's shape does not fit the operator.
    ValueShapeMismatch,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::EmptyValueList => write!(f, "empty value list"),
            SkipReason::PatternNotText => write!(f, "pattern value is not a string"),
            SkipReason::ValueShapeMismatch => write!(f, "value shape does not fit operator"),
        }
    }
}

/// Result of compiling one condition.
#[derive(Debug, Clone, PartialEq)]
pub enum CompiledFilter {
    Fragment(String),
    Skipped { field: String, reason: SkipReason },
}

/// Compiled WHERE expression plus every condition that was skipped.
#[derive(Debug, Default)]
pub struct WhereClause {
    /// `AND`-joined fragments; empty when no condition compiled, in which
    /// case the caller omits the WHERE keyword entirely.
    pub sql: String,
    pub skipped: Vec<(String, SkipReason)>,
}

/// Compile one filter condition against a field map.
pub fn compile_filter(
    filter: &Filter,
    fields: &FieldMap,
    params: &mut SqlParams,
) -> CompiledFilter {
    let col = fields.resolve(&filter.field);

    let skip = |reason: SkipReason| CompiledFilter::Skipped {
        field: filter.field.clone(),
        reason,
    };

    match filter.operator {
        FilterOperator::Equals => match &filter.value {
            FilterValue::Null => CompiledFilter::Fragment(format!("{} IS NULL", col)),
            FilterValue::Scalar(s) => {
                params.values.push(s.into());
                CompiledFilter::Fragment(format!("{} = ?", col))
            }
            FilterValue::List(_) => skip(SkipReason::ValueShapeMismatch),
        },
        FilterOperator::NotEquals => match &filter.value {
            FilterValue::Null => CompiledFilter::Fragment(format!("{} IS NOT NULL", col)),
            FilterValue::Scalar(s) => {
                params.values.push(s.into());
                CompiledFilter::Fragment(format!("{} != ?", col))
            }
            FilterValue::List(_) => skip(SkipReason::ValueShapeMismatch),
        },
        FilterOperator::Contains
        | FilterOperator::NotContains
        | FilterOperator::StartsWith
        | FilterOperator::EndsWith => match &filter.value {
            FilterValue::Scalar(Scalar::Text(text)) => {
                let escaped = escape_like_pattern(text);
                let (verb, pattern) = match filter.operator {
                    FilterOperator::Contains => ("LIKE", format!("%{}%", escaped)),
                    FilterOperator::NotContains => ("NOT LIKE", format!("%{}%", escaped)),
                    FilterOperator::StartsWith => ("LIKE", format!("{}%", escaped)),
                    _ => ("LIKE", format!("%{}", escaped)),
                };
                params.values.push(SqlValue::Text(pattern));
                CompiledFilter::Fragment(format!("{} {} ? ESCAPE '\\'", col, verb))
            }
            _ => skip(SkipReason::PatternNotText),
        },
        FilterOperator::GreaterThan
        | FilterOperator::LessThan
        | FilterOperator::GreaterThanOrEqual
        | FilterOperator::LessThanOrEqual => match &filter.value {
            FilterValue::Scalar(s) => {
                params.values.push(s.into());
                let op = match filter.operator {
                    FilterOperator::GreaterThan => ">",
                    FilterOperator::LessThan => "<",
                    FilterOperator::GreaterThanOrEqual => ">=",
                    _ => "<=",
                };
                CompiledFilter::Fragment(format!("{} {} ?", col, op))
            }
            _ => skip(SkipReason::ValueShapeMismatch),
        },
        FilterOperator::In | FilterOperator::NotIn => match &filter.value {
            FilterValue::List(items) if items.is_empty() => skip(SkipReason::EmptyValueList),
            FilterValue::List(items) => {
                let placeholders: Vec<&str> = items.iter().map(|_| "?").collect();
                params.values.extend(items.iter().map(SqlValue::from));
                let verb = if filter.operator == FilterOperator::In {
                    "IN"
                } else {
                    "NOT IN"
                };
                CompiledFilter::Fragment(format!("{} {} ({})", col, verb, placeholders.join(", ")))
            }
            _ => skip(SkipReason::ValueShapeMismatch),
        },
        FilterOperator::IsNull => CompiledFilter::Fragment(format!("{} IS NULL", col)),
        FilterOperator::IsNotNull => CompiledFilter::Fragment(format!("{} IS NOT NULL", col)),
    }
}

/// Compile a filter list into a single boolean expression.
pub fn compile_filters(
    filters: &[Filter],
    fields: &FieldMap,
    params: &mut SqlParams,
) -> WhereClause {
    let mut fragments = Vec::new();
    let mut skipped = Vec::new();

    for filter in filters {
        match compile_filter(filter, fields, params) {
            CompiledFilter::Fragment(sql) => fragments.push(sql),
            CompiledFilter::Skipped { field, reason } => skipped.push((field, reason)),
        }
    }

    WhereClause {
        sql: fragments.join(" AND "),
        skipped,
    }
}

/// Compile the free-text search term into an OR of LIKE probes.
pub fn compile_search(term: &str, columns: &[&str], params: &mut SqlParams) -> String {
    let pattern = format!("%{}%", escape_like_pattern(term));
    let probes: Vec<String> = columns
        .iter()
        .map(|col| {
            params.values.push(SqlValue::Text(pattern.clone()));
            format!("{} LIKE ? ESCAPE '\\'", col)
        })
        .collect();
    format!("({})", probes.join(" OR "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::query::fields::PRODUCT_FIELDS;

    fn filter(field: &str, operator: FilterOperator, value: FilterValue) -> Filter {
        Filter::new(field, operator, value)
    }

    fn text(s: &str) -> FilterValue {
        FilterValue::Scalar(Scalar::Text(s.into()))
    }

    fn number(n: f64) -> FilterValue {
        FilterValue::Scalar(Scalar::Number(n))
    }

    #[test]
    fn equals_binds_one_param() {
        let mut params = SqlParams::default();
        let compiled = compile_filter(
            &filter("category", FilterOperator::Equals, text("Electronics")),
            &PRODUCT_FIELDS,
            &mut params,
        );
        assert_eq!(compiled, CompiledFilter::Fragment("category = ?".into()));
        assert_eq!(params.values, vec![SqlValue::Text("Electronics".into())]);
    }

    #[test]
    fn equals_null_compiles_to_is_null_without_params() {
        let mut params = SqlParams::default();
        let compiled = compile_filter(
            &filter("category", FilterOperator::Equals, FilterValue::Null),
            &PRODUCT_FIELDS,
            &mut params,
        );
        assert_eq!(compiled, CompiledFilter::Fragment("category IS NULL".into()));
        assert!(params.values.is_empty());
    }

    #[test]
    fn not_equals_null_compiles_to_is_not_null() {
        let mut params = SqlParams::default();
        let compiled = compile_filter(
            &filter("category", FilterOperator::NotEquals, FilterValue::Null),
            &PRODUCT_FIELDS,
            &mut params,
        );
        assert_eq!(
            compiled,
            CompiledFilter::Fragment("category IS NOT NULL".into())
        );
        assert!(params.values.is_empty());
    }

    #[test]
    fn contains_wraps_and_escapes_the_pattern() {
        let mut params = SqlParams::default();
        let compiled = compile_filter(
            &filter("name", FilterOperator::Contains, text("100%")),
            &PRODUCT_FIELDS,
            &mut params,
        );
        assert_eq!(
            compiled,
            CompiledFilter::Fragment(r"name LIKE ? ESCAPE '\'".into())
        );
        assert_eq!(params.values, vec![SqlValue::Text("%100\\%%".into())]);
    }

    #[test]
    fn starts_with_and_ends_with_anchor_the_pattern() {
        let mut params = SqlParams::default();
        compile_filter(
            &filter("name", FilterOperator::StartsWith, text("wid")),
            &PRODUCT_FIELDS,
            &mut params,
        );
        compile_filter(
            &filter("name", FilterOperator::EndsWith, text("get")),
            &PRODUCT_FIELDS,
            &mut params,
        );
        assert_eq!(
            params.values,
            vec![SqlValue::Text("wid%".into()), SqlValue::Text("%get".into())]
        );
    }

    #[test]
    fn contains_with_number_is_skipped() {
        let mut params = SqlParams::default();
        let compiled = compile_filter(
            &filter("name", FilterOperator::Contains, number(5.0)),
            &PRODUCT_FIELDS,
            &mut params,
        );
        assert_eq!(
            compiled,
            CompiledFilter::Skipped {
                field: "name".into(),
                reason: SkipReason::PatternNotText,
            }
        );
        assert!(params.values.is_empty());
    }

    #[test]
    fn comparisons_resolve_camel_case_fields() {
        let mut params = SqlParams::default();
        let compiled = compile_filter(
            &filter("stockQuantity", FilterOperator::GreaterThanOrEqual, number(10.0)),
            &PRODUCT_FIELDS,
            &mut params,
        );
        assert_eq!(
            compiled,
            CompiledFilter::Fragment("stock_quantity >= ?".into())
        );
        assert_eq!(params.values, vec![SqlValue::Number(10.0)]);
    }

    #[test]
    fn in_emits_one_placeholder_per_element() {
        let mut params = SqlParams::default();
        let compiled = compile_filter(
            &filter(
                "category",
                FilterOperator::In,
                FilterValue::List(vec![Scalar::Text("Toys".into()), Scalar::Text("Games".into())]),
            ),
            &PRODUCT_FIELDS,
            &mut params,
        );
        assert_eq!(
            compiled,
            CompiledFilter::Fragment("category IN (?, ?)".into())
        );
        assert_eq!(params.values.len(), 2);
    }

    #[test]
    fn empty_in_list_is_dropped_with_zero_params() {
        let mut params = SqlParams::default();
        let compiled = compile_filter(
            &filter("category", FilterOperator::In, FilterValue::List(vec![])),
            &PRODUCT_FIELDS,
            &mut params,
        );
        assert_eq!(
            compiled,
            CompiledFilter::Skipped {
                field: "category".into(),
                reason: SkipReason::EmptyValueList,
            }
        );
        assert!(params.values.is_empty());
    }

    #[test]
    fn is_null_ignores_the_value() {
        let mut params = SqlParams::default();
        let compiled = compile_filter(
            &filter("storeId", FilterOperator::IsNull, text("ignored")),
            &PRODUCT_FIELDS,
            &mut params,
        );
        assert_eq!(compiled, CompiledFilter::Fragment("store_id IS NULL".into()));
        assert!(params.values.is_empty());
    }

    #[test]
    fn compile_filters_joins_with_and_and_collects_skips() {
        let mut params = SqlParams::default();
        let clause = compile_filters(
            &[
                filter("category", FilterOperator::Equals, text("Electronics")),
                filter("price", FilterOperator::In, FilterValue::List(vec![])),
                filter("stockQuantity", FilterOperator::LessThan, number(5.0)),
            ],
            &PRODUCT_FIELDS,
            &mut params,
        );
        assert_eq!(clause.sql, "category = ? AND stock_quantity < ?");
        assert_eq!(clause.skipped, vec![("price".into(), SkipReason::EmptyValueList)]);
        assert_eq!(params.values.len(), 2);
    }

    #[test]
    fn all_conditions_skipped_yields_empty_sql() {
        let mut params = SqlParams::default();
        let clause = compile_filters(
            &[
                filter("a", FilterOperator::In, FilterValue::List(vec![])),
                filter("b", FilterOperator::Contains, number(1.0)),
            ],
            &PRODUCT_FIELDS,
            &mut params,
        );
        assert!(clause.sql.is_empty());
        assert_eq!(clause.skipped.len(), 2);
        assert!(params.values.is_empty());
    }

    #[test]
    fn params_follow_fragment_emission_order() {
        let mut params = SqlParams::default();
        let clause = compile_filters(
            &[
                filter("name", FilterOperator::StartsWith, text("a")),
                filter("price", FilterOperator::GreaterThan, number(2.0)),
            ],
            &PRODUCT_FIELDS,
            &mut params,
        );
        assert_eq!(clause.sql, r"name LIKE ? ESCAPE '\' AND price > ?");
        assert_eq!(
            params.values,
            vec![SqlValue::Text("a%".into()), SqlValue::Number(2.0)]
        );
    }

    #[test]
    fn search_probes_every_column_with_the_same_pattern() {
        let mut params = SqlParams::default();
        let sql = compile_search("wid_get", &["name", "category"], &mut params);
        assert_eq!(
            sql,
            r"(name LIKE ? ESCAPE '\' OR category LIKE ? ESCAPE '\')"
        );
        assert_eq!(
            params.values,
            vec![
                SqlValue::Text("%wid\\_get%".into()),
                SqlValue::Text("%wid\\_get%".into())
            ]
        );
    }
}
