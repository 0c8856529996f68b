use contracts::shared::table_query::Condition;
use sea_orm::sea_query::SimpleExpr;
use sea_orm::ColumnTrait;

/// Errors raised while translating a `FilterSpec` into a register query.
#[derive(Debug, thiserror::Error)]
pub enum FilterError {
    #[error("unknown filter field: {0}")]
    UnknownField(String),
}

/// Translate one condition against a resolved column into a query
/// expression. Returns `None` for conditions that constrain nothing.
pub fn condition_expr<C: ColumnTrait>(column: C, condition: &Condition) -> Option<SimpleExpr> {
    match condition {
        Condition::Equals { value } => Some(column.eq(value.as_str())),
        Condition::Contains { pattern } => Some(column.contains(pattern.as_str())),
        Condition::Range { from, to } => match (from, to) {
            (Some(f), Some(t)) => Some(column.gte(f.as_str()).and(column.lte(t.as_str()))),
            (Some(f), None) => Some(column.gte(f.as_str())),
            (None, Some(t)) => Some(column.lte(t.as_str())),
            (None, None) => None,
        },
        Condition::InList { values } => {
            if values.is_empty() {
                None
            } else {
                Some(column.is_in(values.iter().map(String::as_str)))
            }
        }
    }
}
