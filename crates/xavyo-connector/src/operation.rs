//! Connector Framework operation types
//!
//! Types describing a table scan: qualifiers pushed down by the host and the
//! rows streamed back to it.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Comparison operator of a qualifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QualOperator {
    #[serde(rename = "=")]
    Eq,
    #[serde(rename = "<>")]
    NotEq,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "<=")]
    LtEq,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = ">=")]
    GtEq,
}

impl QualOperator {
    /// The SQL symbol for this operator.
    pub fn symbol(&self) -> &'static str {
        match self {
            QualOperator::Eq => "=",
            QualOperator::NotEq => "<>",
            QualOperator::Lt => "<",
            QualOperator::LtEq => "<=",
            QualOperator::Gt => ">",
            QualOperator::GtEq => ">=",
        }
    }
}

impl std::fmt::Display for QualOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A single `column <op> value` restriction supplied by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Qualifier {
    pub column: String,
    pub operator: QualOperator,
    pub value: Value,
}

impl Qualifier {
    /// Create a qualifier.
    pub fn new(column: impl Into<String>, operator: QualOperator, value: impl Into<Value>) -> Self {
        Self {
            column: column.into(),
            operator,
            value: value.into(),
        }
    }

    /// Shorthand for an equality qualifier.
    pub fn equal(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(column, QualOperator::Eq, value)
    }

    /// Shorthand for an inequality qualifier.
    pub fn not_equal(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(column, QualOperator::NotEq, value)
    }
}

/// The qualifiers of one scan.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Quals {
    items: Vec<Qualifier>,
}

impl Quals {
    /// Create an empty qualifier set.
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Add a qualifier.
    pub fn push(&mut self, qual: Qualifier) {
        self.items.push(qual);
    }

    /// Add a qualifier using builder pattern.
    pub fn with(mut self, qual: Qualifier) -> Self {
        self.push(qual);
        self
    }

    /// Value of the first equality qualifier on a column.
    pub fn equals(&self, column: &str) -> Option<&Value> {
        self.items
            .iter()
            .find(|q| q.column == column && q.operator == QualOperator::Eq)
            .map(|q| &q.value)
    }

    /// String value of the first equality qualifier on a column.
    ///
    /// Returns `Some("")` for an explicitly blank value; callers decide
    /// whether blank counts as absent.
    pub fn equals_str(&self, column: &str) -> Option<&str> {
        self.equals(column).and_then(Value::as_str)
    }

    /// Non-blank string value of the first equality qualifier on a column.
    pub fn equals_non_blank(&self, column: &str) -> Option<&str> {
        self.equals_str(column).filter(|v| !v.trim().is_empty())
    }

    /// Boolean value of the first equality qualifier on a column.
    pub fn equals_bool(&self, column: &str) -> Option<bool> {
        self.equals(column).and_then(Value::as_bool)
    }

    /// Boolean a column is restricted to, folding `<>` into its negation.
    ///
    /// `col = b` yields `b` and `col <> b` yields `!b`. The first `=` or `<>`
    /// qualifier with a boolean value wins.
    pub fn bool_restriction(&self, column: &str) -> Option<bool> {
        self.items.iter().find_map(|q| {
            if q.column != column {
                return None;
            }
            let value = q.value.as_bool()?;
            match q.operator {
                QualOperator::Eq => Some(value),
                QualOperator::NotEq => Some(!value),
                _ => None,
            }
        })
    }

    /// Whether there are no qualifiers.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of qualifiers.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Iterate over all qualifiers.
    pub fn iter(&self) -> impl Iterator<Item = &Qualifier> {
        self.items.iter()
    }
}

impl FromIterator<Qualifier> for Quals {
    fn from_iter<T: IntoIterator<Item = Qualifier>>(iter: T) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

/// One output row: column name to JSON value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row {
    columns: Map<String, Value>,
}

impl Row {
    /// Create an empty row.
    pub fn new() -> Self {
        Self {
            columns: Map::new(),
        }
    }

    /// Set a column value.
    pub fn set(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        self.columns.insert(column.into(), value.into());
    }

    /// Set a column using builder pattern.
    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(column, value);
        self
    }

    /// Get a column value.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns.get(column)
    }

    /// Get a string column value.
    pub fn get_str(&self, column: &str) -> Option<&str> {
        self.get(column).and_then(Value::as_str)
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Whether the row has no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Column names.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }
}
