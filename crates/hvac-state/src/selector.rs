//! Rich-query selectors.
//!
//! A [`Selector`] is a conjunction of per-field conditions over a JSON
//! document. Its wire form is the Mango subset understood by CouchDB-style
//! state databases:
//!
//! ```text
//! {"selector":{"Installer Id":"0005679"}}
//! {"selector":{"Date Installed":{"$lt":1542900000}}}
//! {"selector":{"$and":[{"n":{"$gt":1}},{"n":{"$gt":3}}]}}
//! ```
//!
//! The `$and` form is used only when one field carries the same operator
//! more than once, which the per-field object cannot express.
//!
//! Selectors are built as values and rendered through `serde_json`, so field
//! values never need manual quoting.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde_json::{Map, Value};

use crate::error::StateError;

/// A single comparison against a document field.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Eq(Value),
    Lt(Value),
    Gt(Value),
}

#[derive(Debug, Clone, PartialEq)]
struct Clause {
    field: String,
    condition: Condition,
}

/// Conjunction of field conditions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selector {
    clauses: Vec<Clause>,
}

impl Condition {
    fn operator(&self) -> &'static str {
        match self {
            Condition::Eq(_) => "$eq",
            Condition::Lt(_) => "$lt",
            Condition::Gt(_) => "$gt",
        }
    }

    fn operand(&self) -> &Value {
        match self {
            Condition::Eq(v) | Condition::Lt(v) | Condition::Gt(v) => v,
        }
    }

    fn from_operator(op: &str, operand: Value) -> Result<Self, StateError> {
        match op {
            "$eq" => Ok(Condition::Eq(operand)),
            "$lt" => Ok(Condition::Lt(operand)),
            "$gt" => Ok(Condition::Gt(operand)),
            other => Err(StateError::Query(format!("unsupported operator {other}"))),
        }
    }

    /// Whether the field value `actual` satisfies this condition.
    pub fn matches(&self, actual: &Value) -> bool {
        match self {
            Condition::Eq(expected) => {
                compare(actual, expected).map_or(actual == expected, Ordering::is_eq)
            }
            Condition::Lt(bound) => compare(actual, bound) == Some(Ordering::Less),
            Condition::Gt(bound) => compare(actual, bound) == Some(Ordering::Greater),
        }
    }
}

/// Order two scalars of the same JSON type. Mixed types are unordered.
fn compare(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            if let (Some(x), Some(y)) = (x.as_i64(), y.as_i64()) {
                return Some(x.cmp(&y));
            }
            if let (Some(x), Some(y)) = (x.as_u64(), y.as_u64()) {
                return Some(x.cmp(&y));
            }
            x.as_f64()?.partial_cmp(&y.as_f64()?)
        }
        (Value::String(x), Value::String(y)) => Some(x.as_str().cmp(y.as_str())),
        (Value::Bool(x), Value::Bool(y)) => Some(x.cmp(y)),
        (Value::Null, Value::Null) => Some(Ordering::Equal),
        _ => None,
    }
}

impl Selector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a clause on `field`.
    pub fn with(mut self, field: impl Into<String>, condition: Condition) -> Self {
        self.clauses.push(Clause {
            field: field.into(),
            condition,
        });
        self
    }

    pub fn where_eq(self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.with(field, Condition::Eq(value.into()))
    }

    pub fn where_lt(self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.with(field, Condition::Lt(value.into()))
    }

    pub fn where_gt(self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.with(field, Condition::Gt(value.into()))
    }

    /// Whether `doc` satisfies every clause. Non-object documents and
    /// missing fields never match.
    pub fn matches(&self, doc: &Value) -> bool {
        let Some(obj) = doc.as_object() else {
            return false;
        };
        self.clauses.iter().all(|clause| {
            obj.get(&clause.field)
                .is_some_and(|actual| clause.condition.matches(actual))
        })
    }

    /// Like [`Selector::matches`] for raw stored bytes; undecodable values
    /// never match.
    pub fn matches_bytes(&self, bytes: &[u8]) -> bool {
        serde_json::from_slice::<Value>(bytes).is_ok_and(|doc| self.matches(&doc))
    }

    /// Render the `{"selector": {...}}` wire form.
    pub fn to_value(&self) -> Value {
        let fields = if self.has_repeated_operator() {
            let conjuncts = self
                .clauses
                .iter()
                .map(|clause| Value::Object(group_fields(std::slice::from_ref(clause))))
                .collect();
            let mut fields = Map::new();
            fields.insert(AND.to_string(), Value::Array(conjuncts));
            fields
        } else {
            group_fields(&self.clauses)
        };
        let mut root = Map::new();
        root.insert("selector".to_string(), Value::Object(fields));
        Value::Object(root)
    }

    fn has_repeated_operator(&self) -> bool {
        self.clauses.iter().enumerate().any(|(i, clause)| {
            self.clauses[..i].iter().any(|earlier| {
                earlier.field == clause.field
                    && earlier.condition.operator() == clause.condition.operator()
            })
        })
    }

    pub fn to_query_string(&self) -> String {
        self.to_value().to_string()
    }

    /// Parse the wire form produced by [`Selector::to_value`].
    pub fn from_value(value: &Value) -> Result<Self, StateError> {
        let fields = value
            .get("selector")
            .and_then(Value::as_object)
            .ok_or_else(|| StateError::Query("missing selector object".to_string()))?;
        parse_fields(Selector::new(), fields)
    }
}

const AND: &str = "$and";

/// Group clauses into one operator object per field. A lone scalar equality
/// collapses to `"field": value`.
fn group_fields(clauses: &[Clause]) -> Map<String, Value> {
    let mut fields = Map::new();
    for clause in clauses {
        let ops = fields
            .entry(clause.field.clone())
            .or_insert_with(|| Value::Object(Map::new()));
        if let Value::Object(ops) = ops {
            ops.insert(
                clause.condition.operator().to_string(),
                clause.condition.operand().clone(),
            );
        }
    }
    for condition in fields.values_mut() {
        let collapsed = match condition {
            Value::Object(ops) if ops.len() == 1 => match ops.get("$eq") {
                Some(v) if !v.is_object() => Some(v.clone()),
                _ => None,
            },
            _ => None,
        };
        if let Some(v) = collapsed {
            *condition = v;
        }
    }
    fields
}

fn parse_fields(
    mut selector: Selector,
    fields: &Map<String, Value>,
) -> Result<Selector, StateError> {
    for (field, condition) in fields {
        if field == AND {
            let conjuncts = condition
                .as_array()
                .ok_or_else(|| StateError::Query("$and expects an array".to_string()))?;
            for conjunct in conjuncts {
                let conjunct = conjunct.as_object().ok_or_else(|| {
                    StateError::Query("$and members must be objects".to_string())
                })?;
                selector = parse_fields(selector, conjunct)?;
            }
            continue;
        }
        match condition {
            Value::Object(ops) if ops.keys().any(|k| k.starts_with('$')) => {
                for (op, operand) in ops {
                    selector =
                        selector.with(field.clone(), Condition::from_operator(op, operand.clone())?);
                }
            }
            other => selector = selector.where_eq(field.clone(), other.clone()),
        }
    }
    Ok(selector)
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_query_string())
    }
}

impl FromStr for Selector {
    type Err = StateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: Value =
            serde_json::from_str(s).map_err(|e| StateError::Query(e.to_string()))?;
        Self::from_value(&value)
    }
}
