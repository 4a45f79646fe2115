//! Transform operators and their parameters.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Transform operator of a TRANSFORMED data table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Operator {
    /// Stack rows of two tables.
    Concat,
    /// Join two tables on their shared labels.
    Join,
    /// Filter rows by conditions.
    Query,
    /// Add computed columns.
    Eval,
    /// Group and aggregate.
    Aggregate,
    /// Pivot a label column into data columns.
    Pivot,
    /// Add constant label columns.
    AddLabels,
    /// Map label values onto new values.
    ValueMapping,
}

impl Operator {
    /// Every operator.
    pub const ALL: [Self; 8] = [
        Self::Concat,
        Self::Join,
        Self::Query,
        Self::Eval,
        Self::Aggregate,
        Self::Pivot,
        Self::AddLabels,
        Self::ValueMapping,
    ];

    /// Wire name of the operator.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Concat => "CONCAT",
            Self::Join => "JOIN",
            Self::Query => "QUERY",
            Self::Eval => "EVAL",
            Self::Aggregate => "AGGREGATE",
            Self::Pivot => "PIVOT",
            Self::AddLabels => "ADD_LABELS",
            Self::ValueMapping => "VALUE_MAPPING",
        }
    }

    /// Check if the operator combines two upstream tables.
    #[must_use]
    pub const fn is_binary(&self) -> bool {
        matches!(self, Self::Concat | Self::Join)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Join type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JoinType {
    /// Keep every row of the left table.
    #[default]
    Left,
    /// Keep every row of the right table.
    Right,
    /// Keep every row of both tables.
    Outer,
    /// Keep matching rows only.
    Inner,
}

/// How query conditions combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConditionOperator {
    /// Every condition holds.
    #[default]
    And,
    /// Any condition holds.
    Or,
}

/// CONCAT parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConcatOptions {
    /// The two upstream tables.
    pub data_tables: Vec<String>,
}

/// JOIN parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JoinOptions {
    /// The two upstream tables, left first.
    pub data_tables: Vec<String>,
    /// Join type.
    pub how: JoinType,
}

/// One QUERY condition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryCondition {
    /// Condition expression, e.g. `cost > 100`.
    pub value: String,
}

/// QUERY parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryOptions {
    /// Upstream table.
    pub data_table_id: Option<String>,
    /// Conditions.
    pub conditions: Vec<QueryCondition>,
    /// How conditions combine.
    pub operator: ConditionOperator,
}

/// Kind of column an EVAL expression produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EvalFieldType {
    /// A data column.
    #[default]
    Data,
    /// A label column.
    Label,
}

/// One EVAL expression.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalExpression {
    /// Name of the produced column.
    pub name: String,
    /// Kind of the produced column.
    pub field_type: EvalFieldType,
    /// Expression text.
    pub expression: String,
}

/// EVAL parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalOptions {
    /// Upstream table.
    pub data_table_id: Option<String>,
    /// Expressions, evaluated in order.
    pub expressions: Vec<EvalExpression>,
}

/// AGGREGATE parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregateOptions {
    /// Upstream table.
    pub data_table_id: Option<String>,
    /// Label columns to group by.
    pub group_by: Vec<String>,
    /// Data column to aggregation function (`sum`, `average`, ...).
    pub function: IndexMap<String, String>,
}

/// Column roles of a PIVOT.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PivotFields {
    /// Label columns kept as rows.
    pub labels: Vec<String>,
    /// Label column spread into columns.
    pub column: String,
    /// Data column filling the cells.
    pub data: String,
}

/// PIVOT parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PivotOptions {
    /// Upstream table.
    pub data_table_id: Option<String>,
    /// Column roles.
    pub fields: PivotFields,
    /// Maximum number of produced columns.
    pub limit: Option<u32>,
    /// Aggregation applied to the cells.
    pub function: Option<String>,
}

/// ADD_LABELS parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AddLabelsOptions {
    /// Upstream table.
    pub data_table_id: Option<String>,
    /// Label name to constant value.
    pub labels: IndexMap<String, String>,
}

/// One VALUE_MAPPING case.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValueMappingCase {
    /// Source value or expression.
    pub key: String,
    /// Mapped value.
    pub value: String,
}

/// VALUE_MAPPING parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValueMappingOptions {
    /// Upstream table.
    pub data_table_id: Option<String>,
    /// Name of the produced label column.
    pub name: String,
    /// Source label column.
    pub key: String,
    /// Mapping cases, first match wins.
    pub cases: Vec<ValueMappingCase>,
    /// Value used when no case matches.
    #[serde(rename = "else")]
    pub else_value: Option<String>,
}

/// Operator parameters of a TRANSFORMED table, externally tagged by operator.
///
/// ```json
/// {"JOIN": {"data_tables": ["T1", "T2"], "how": "LEFT"}}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransformOptions {
    /// CONCAT parameters.
    Concat(ConcatOptions),
    /// JOIN parameters.
    Join(JoinOptions),
    /// QUERY parameters.
    Query(QueryOptions),
    /// EVAL parameters.
    Eval(EvalOptions),
    /// AGGREGATE parameters.
    Aggregate(AggregateOptions),
    /// PIVOT parameters.
    Pivot(PivotOptions),
    /// ADD_LABELS parameters.
    AddLabels(AddLabelsOptions),
    /// VALUE_MAPPING parameters.
    ValueMapping(ValueMappingOptions),
}

impl TransformOptions {
    /// Empty parameters for a freshly created transform.
    #[must_use]
    pub fn default_for(operator: Operator) -> Self {
        match operator {
            Operator::Concat => Self::Concat(ConcatOptions::default()),
            Operator::Join => Self::Join(JoinOptions::default()),
            Operator::Query => Self::Query(QueryOptions::default()),
            Operator::Eval => Self::Eval(EvalOptions::default()),
            Operator::Aggregate => Self::Aggregate(AggregateOptions::default()),
            Operator::Pivot => Self::Pivot(PivotOptions::default()),
            Operator::AddLabels => Self::AddLabels(AddLabelsOptions::default()),
            Operator::ValueMapping => Self::ValueMapping(ValueMappingOptions::default()),
        }
    }

    /// The operator these parameters belong to.
    #[must_use]
    pub const fn operator(&self) -> Operator {
        match self {
            Self::Concat(_) => Operator::Concat,
            Self::Join(_) => Operator::Join,
            Self::Query(_) => Operator::Query,
            Self::Eval(_) => Operator::Eval,
            Self::Aggregate(_) => Operator::Aggregate,
            Self::Pivot(_) => Operator::Pivot,
            Self::AddLabels(_) => Operator::AddLabels,
            Self::ValueMapping(_) => Operator::ValueMapping,
        }
    }

    /// Upstream table ids in declared order. Blank ids are skipped.
    #[must_use]
    pub fn upstream_ids(&self) -> Vec<&str> {
        let ids: Vec<&str> = match self {
            Self::Concat(o) => o.data_tables.iter().map(String::as_str).collect(),
            Self::Join(o) => o.data_tables.iter().map(String::as_str).collect(),
            Self::Query(QueryOptions { data_table_id, .. })
            | Self::Eval(EvalOptions { data_table_id, .. })
            | Self::Aggregate(AggregateOptions { data_table_id, .. })
            | Self::Pivot(PivotOptions { data_table_id, .. })
            | Self::AddLabels(AddLabelsOptions { data_table_id, .. })
            | Self::ValueMapping(ValueMappingOptions { data_table_id, .. }) => {
                data_table_id.as_deref().into_iter().collect()
            }
        };
        ids.into_iter().filter(|id| !id.trim().is_empty()).collect()
    }

    /// Check operator parameters; the error describes the first defect.
    pub fn validate_params(&self) -> Result<(), String> {
        let upstream = self.upstream_ids();
        if self.operator().is_binary() {
            if upstream.len() != 2 {
                return Err(format!(
                    "{} needs exactly two upstream tables, got {}",
                    self.operator(),
                    upstream.len()
                ));
            }
            if upstream[0] == upstream[1] {
                return Err(format!("{} upstream tables must differ", self.operator()));
            }
        } else if upstream.is_empty() {
            return Err(format!("{} needs an upstream table", self.operator()));
        }

        match self {
            Self::Concat(_) | Self::Join(_) => Ok(()),
            Self::Query(o) => {
                if o.conditions.is_empty() {
                    return Err("QUERY needs at least one condition".into());
                }
                if o.conditions.iter().any(|c| c.value.trim().is_empty()) {
                    return Err("QUERY condition is empty".into());
                }
                Ok(())
            }
            Self::Eval(o) => {
                if o.expressions.is_empty() {
                    return Err("EVAL needs at least one expression".into());
                }
                for expr in &o.expressions {
                    if expr.name.trim().is_empty() || expr.expression.trim().is_empty() {
                        return Err("EVAL expression needs a name and a body".into());
                    }
                }
                let mut names: Vec<&str> = o.expressions.iter().map(|e| e.name.as_str()).collect();
                names.sort_unstable();
                if names.windows(2).any(|w| w[0] == w[1]) {
                    return Err("EVAL expression names must be unique".into());
                }
                Ok(())
            }
            Self::Aggregate(o) => {
                if o.function.is_empty() {
                    return Err("AGGREGATE needs at least one function".into());
                }
                if o.function.values().any(|f| f.trim().is_empty()) {
                    return Err("AGGREGATE function is empty".into());
                }
                Ok(())
            }
            Self::Pivot(o) => {
                if o.fields.column.trim().is_empty() || o.fields.data.trim().is_empty() {
                    return Err("PIVOT needs a column and a data field".into());
                }
                if o.limit == Some(0) {
                    return Err("PIVOT limit must be positive".into());
                }
                Ok(())
            }
            Self::AddLabels(o) => {
                if o.labels.is_empty() {
                    return Err("ADD_LABELS needs at least one label".into());
                }
                if o.labels.keys().any(|k| k.trim().is_empty()) {
                    return Err("ADD_LABELS label name is empty".into());
                }
                Ok(())
            }
            Self::ValueMapping(o) => {
                if o.name.trim().is_empty() || o.key.trim().is_empty() {
                    return Err("VALUE_MAPPING needs a name and a key".into());
                }
                if o.cases.is_empty() {
                    return Err("VALUE_MAPPING needs at least one case".into());
                }
                Ok(())
            }
        }
    }
}
