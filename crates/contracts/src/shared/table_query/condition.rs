use serde::{Deserialize, Serialize};

/// Single predicate over a register column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Condition {
    /// Exact match.
    Equals { value: String },

    /// Substring match (case-insensitive on SQLite).
    Contains { pattern: String },

    /// Inclusive range; an open bound means unbounded on that side.
    Range {
        from: Option<String>,
        to: Option<String>,
    },

    /// Membership in a value list.
    InList { values: Vec<String> },
}

impl Condition {
    /// True when the condition constrains nothing and can be dropped.
    pub fn is_noop(&self) -> bool {
        match self {
            Condition::Equals { value } => value.trim().is_empty(),
            Condition::Contains { pattern } => pattern.trim().is_empty(),
            Condition::Range { from, to } => from.is_none() && to.is_none(),
            Condition::InList { values } => values.is_empty(),
        }
    }

    /// Human-readable text for filter chips and logs.
    pub fn display_text(&self, field_name: &str) -> String {
        match self {
            Condition::Equals { value } => format!("{} = {}", field_name, value),
            Condition::Contains { pattern } => format!("{} contains \"{}\"", field_name, pattern),
            Condition::Range { from, to } => match (from, to) {
                (Some(f), Some(t)) => format!("{}: {} to {}", field_name, f, t),
                (Some(f), None) => format!("{} >= {}", field_name, f),
                (None, Some(t)) => format!("{} <= {}", field_name, t),
                (None, None) => format!("{}: any", field_name),
            },
            Condition::InList { values } => {
                format!("{} in [{}]", field_name, values.join(", "))
            }
        }
    }
}

/// A condition bound to the field it constrains.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldCondition {
    pub field: String,
    pub condition: Condition,
}

/// Ordered conjunction of predicates.
///
/// Built once per request and handed by reference to every query serving
/// that request, so the key-discovery and row-fetch phases of a bucketed
/// page can never see different predicates. An empty or blank value is not
/// a constraint: the `_opt` builders silently drop it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterSpec {
    conditions: Vec<FieldCondition>,
}

impl FilterSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn conditions(&self) -> &[FieldCondition] {
        &self.conditions
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    fn push(mut self, field: &str, condition: Condition) -> Self {
        if !condition.is_noop() {
            self.conditions.push(FieldCondition {
                field: field.to_string(),
                condition,
            });
        }
        self
    }

    pub fn equals(self, field: &str, value: impl Into<String>) -> Self {
        self.push(
            field,
            Condition::Equals {
                value: value.into(),
            },
        )
    }

    /// Adds an equality constraint unless the value is absent or blank.
    pub fn equals_opt(self, field: &str, value: Option<String>) -> Self {
        match value {
            Some(v) => self.equals(field, v),
            None => self,
        }
    }

    pub fn contains(self, field: &str, pattern: impl Into<String>) -> Self {
        self.push(
            field,
            Condition::Contains {
                pattern: pattern.into(),
            },
        )
    }

    /// Adds a substring constraint unless the pattern is absent or blank.
    pub fn contains_opt(self, field: &str, pattern: Option<String>) -> Self {
        match pattern {
            Some(p) => self.contains(field, p),
            None => self,
        }
    }

    /// Adds an inclusive range; both bounds absent constrains nothing.
    pub fn range(self, field: &str, from: Option<String>, to: Option<String>) -> Self {
        self.push(field, Condition::Range { from, to })
    }

    /// Adds a list-membership constraint unless the list is empty.
    pub fn in_list(self, field: &str, values: Vec<String>) -> Self {
        self.push(field, Condition::InList { values })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_values_are_not_constraints() {
        let spec = FilterSpec::new()
            .equals_opt("dealer", None)
            .equals_opt("status", Some("  ".to_string()))
            .contains_opt("order_no", Some(String::new()))
            .range("schedule_date", None, None)
            .in_list("status", vec![]);
        assert!(spec.is_empty());
    }

    #[test]
    fn conditions_keep_insertion_order() {
        let spec = FilterSpec::new()
            .equals("dealer", "Maple & Co")
            .range("schedule_date", Some("2024-01-01".into()), None)
            .contains("order_no", "SO-1");
        let fields: Vec<&str> = spec.conditions().iter().map(|c| c.field.as_str()).collect();
        assert_eq!(fields, vec!["dealer", "schedule_date", "order_no"]);
    }

    #[test]
    fn half_open_range_is_kept() {
        let spec = FilterSpec::new().range("schedule_date", None, Some("2024-06-30".into()));
        assert_eq!(spec.conditions().len(), 1);
        assert_eq!(
            spec.conditions()[0].condition.display_text("schedule_date"),
            "schedule_date <= 2024-06-30"
        );
    }
}
