//! Connector Framework schema types
//!
//! Table definitions advertised to the host: columns, key columns accepted
//! for pushdown, and the ignore lists of each entry point.

use serde::{Deserialize, Serialize};

use crate::operation::{QualOperator, Quals};

/// Data type of a column as seen by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    String,
    Bool,
    Int,
    Timestamp,
    Json,
}

impl std::fmt::Display for ColumnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ColumnType::String => "string",
            ColumnType::Bool => "bool",
            ColumnType::Int => "int",
            ColumnType::Timestamp => "timestamp",
            ColumnType::Json => "json",
        };
        f.write_str(s)
    }
}

/// A column of a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDefinition {
    pub name: String,
    pub column_type: ColumnType,
    pub description: String,
}

impl ColumnDefinition {
    /// Create a column definition.
    pub fn new(
        name: impl Into<String>,
        column_type: ColumnType,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            column_type,
            description: description.into(),
        }
    }

    pub fn string(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(name, ColumnType::String, description)
    }

    pub fn bool(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(name, ColumnType::Bool, description)
    }

    pub fn int(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(name, ColumnType::Int, description)
    }

    pub fn timestamp(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(name, ColumnType::Timestamp, description)
    }

    pub fn json(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(name, ColumnType::Json, description)
    }
}

/// Whether a key column must be supplied for the entry point to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyRequirement {
    Optional,
    Required,
}

/// A column the host may push down as a qualifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyColumn {
    pub name: String,
    pub operators: Vec<QualOperator>,
    pub require: KeyRequirement,
}

impl KeyColumn {
    /// An optional key column accepting `=` only.
    pub fn optional(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            operators: vec![QualOperator::Eq],
            require: KeyRequirement::Optional,
        }
    }

    /// A required key column accepting `=` only.
    pub fn required(name: impl Into<String>) -> Self {
        Self {
            require: KeyRequirement::Required,
            ..Self::optional(name)
        }
    }

    /// Replace the accepted operators.
    pub fn with_operators(mut self, operators: &[QualOperator]) -> Self {
        self.operators = operators.to_vec();
        self
    }

    /// Whether the key column accepts an operator.
    pub fn accepts(&self, operator: QualOperator) -> bool {
        self.operators.contains(&operator)
    }
}

/// Key columns identifying a single object for a get call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "columns", rename_all = "snake_case")]
pub enum GetKeyColumns {
    /// Exactly this column.
    Single(String),
    /// Any one of these columns, the earliest listed winning.
    AnyColumn(Vec<String>),
    /// Every one of these columns.
    AllColumns(Vec<String>),
}

impl GetKeyColumns {
    pub fn single(column: impl Into<String>) -> Self {
        GetKeyColumns::Single(column.into())
    }

    pub fn any(columns: &[&str]) -> Self {
        GetKeyColumns::AnyColumn(columns.iter().map(|c| c.to_string()).collect())
    }

    pub fn all(columns: &[&str]) -> Self {
        GetKeyColumns::AllColumns(columns.iter().map(|c| c.to_string()).collect())
    }

    /// Column names involved.
    pub fn columns(&self) -> Vec<&str> {
        match self {
            GetKeyColumns::Single(c) => vec![c.as_str()],
            GetKeyColumns::AnyColumn(cs) | GetKeyColumns::AllColumns(cs) => {
                cs.iter().map(String::as_str).collect()
            }
        }
    }

    /// Resolve the key values from the qualifiers.
    ///
    /// Returns `None` when the keys are unusable: blank or missing for a
    /// single column, all blank for `AnyColumn`, any blank for `AllColumns`.
    /// The resolved pairs are returned in definition order; `AnyColumn`
    /// resolves to the first non-blank column only.
    pub fn resolve<'a>(&'a self, quals: &'a Quals) -> Option<Vec<(&'a str, &'a str)>> {
        match self {
            GetKeyColumns::Single(c) => quals.equals_non_blank(c).map(|v| vec![(c.as_str(), v)]),
            GetKeyColumns::AnyColumn(cs) => cs
                .iter()
                .find_map(|c| quals.equals_non_blank(c).map(|v| vec![(c.as_str(), v)])),
            GetKeyColumns::AllColumns(cs) => cs
                .iter()
                .map(|c| quals.equals_non_blank(c).map(|v| (c.as_str(), v)))
                .collect(),
        }
    }
}

/// List entry point of a table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListConfig {
    pub key_columns: Vec<KeyColumn>,
    /// Upstream HTTP statuses that mean "no rows" rather than failure.
    #[serde(default)]
    pub ignore_statuses: Vec<u16>,
}

impl ListConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_key_column(mut self, key: KeyColumn) -> Self {
        self.key_columns.push(key);
        self
    }

    pub fn ignoring(mut self, statuses: &[u16]) -> Self {
        self.ignore_statuses.extend_from_slice(statuses);
        self
    }

    /// Find the key column for a column name.
    pub fn key_column(&self, name: &str) -> Option<&KeyColumn> {
        self.key_columns.iter().find(|k| k.name == name)
    }
}

/// Get entry point of a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetConfig {
    pub key_columns: GetKeyColumns,
    /// Upstream HTTP statuses that mean "no row" rather than failure.
    #[serde(default)]
    pub ignore_statuses: Vec<u16>,
}

impl GetConfig {
    pub fn new(key_columns: GetKeyColumns) -> Self {
        Self {
            key_columns,
            ignore_statuses: Vec::new(),
        }
    }

    pub fn ignoring(mut self, statuses: &[u16]) -> Self {
        self.ignore_statuses.extend_from_slice(statuses);
        self
    }
}

/// A table served by a plugin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDefinition {
    pub name: String,
    pub description: String,
    pub columns: Vec<ColumnDefinition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list: Option<ListConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub get: Option<GetConfig>,
}

impl TableDefinition {
    /// Create a table with no columns and no entry points.
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            columns: Vec::new(),
            list: None,
            get: None,
        }
    }

    #[must_use]
    pub fn with_column(mut self, column: ColumnDefinition) -> Self {
        self.columns.push(column);
        self
    }

    #[must_use]
    pub fn with_columns(mut self, columns: impl IntoIterator<Item = ColumnDefinition>) -> Self {
        self.columns.extend(columns);
        self
    }

    #[must_use]
    pub fn with_list(mut self, list: ListConfig) -> Self {
        self.list = Some(list);
        self
    }

    #[must_use]
    pub fn with_get(mut self, get: GetConfig) -> Self {
        self.get = Some(get);
        self
    }

    /// Find a column by name.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&ColumnDefinition> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Check if a column exists.
    #[must_use]
    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// Column names in declaration order.
    #[must_use]
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Check internal consistency of the definition.
    ///
    /// Every key column must name a declared column and column names must be
    /// unique. Returns the list of problems found.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        for (i, column) in self.columns.iter().enumerate() {
            if self.columns[..i].iter().any(|c| c.name == column.name) {
                errors.push(format!("{}: duplicate column '{}'", self.name, column.name));
            }
        }

        if let Some(list) = &self.list {
            for key in &list.key_columns {
                if !self.has_column(&key.name) {
                    errors.push(format!(
                        "{}: list key column '{}' is not a column",
                        self.name, key.name
                    ));
                }
            }
        }

        if let Some(get) = &self.get {
            for name in get.key_columns.columns() {
                if !self.has_column(name) {
                    errors.push(format!(
                        "{}: get key column '{}' is not a column",
                        self.name, name
                    ));
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
