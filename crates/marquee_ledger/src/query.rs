//! Selector-based rich queries.
//!
//! A query is a JSON document of the form
//! `{"selector": {...}, "limit": n}`. Selector keys are dotted field paths
//! (`show.theatreNo`) mapped either to a literal, which must be equal, or to
//! an operator object such as `{"$gte": 10}`. `$and`/`$or` take arrays of
//! selectors.

use crate::error::{LedgerError, LedgerResult};
use serde_json::{Map, Value};
use std::cmp::Ordering;

/// A single field condition.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// `$eq`, or a bare literal.
    Eq(Value),
    /// `$ne`
    Ne(Value),
    /// `$gt`
    Gt(Value),
    /// `$gte`
    Gte(Value),
    /// `$lt`
    Lt(Value),
    /// `$lte`
    Lte(Value),
    /// `$in`
    In(Vec<Value>),
    /// `$exists`
    Exists(bool),
}

/// A parsed selector tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// All conditions hold for the value at `path`.
    Field {
        /// Field path segments.
        path: Vec<String>,
        /// Conditions on the field value.
        conditions: Vec<Condition>,
    },
    /// Every sub-predicate holds.
    And(Vec<Predicate>),
    /// At least one sub-predicate holds.
    Or(Vec<Predicate>),
}

/// A parsed rich query.
#[derive(Debug, Clone, PartialEq)]
pub struct RichQuery {
    predicate: Predicate,
    limit: Option<usize>,
}

impl RichQuery {
    /// Parses a query string.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InvalidQuery`] if the string is not a JSON
    /// object with a `selector` object, or uses an unknown operator.
    pub fn parse(query: &str) -> LedgerResult<Self> {
        let root: Value = serde_json::from_str(query)
            .map_err(|e| LedgerError::invalid_query(format!("not JSON: {e}")))?;
        let root = root
            .as_object()
            .ok_or_else(|| LedgerError::invalid_query("query must be a JSON object"))?;

        let mut predicate = None;
        let mut limit = None;
        for (key, value) in root {
            match key.as_str() {
                "selector" => {
                    let selector = value
                        .as_object()
                        .ok_or_else(|| LedgerError::invalid_query("selector must be an object"))?;
                    predicate = Some(parse_selector(selector)?);
                }
                "limit" => {
                    let n = value
                        .as_u64()
                        .ok_or_else(|| LedgerError::invalid_query("limit must be a non-negative integer"))?;
                    limit = Some(usize::try_from(n).unwrap_or(usize::MAX));
                }
                "use_index" => {}
                other => {
                    return Err(LedgerError::invalid_query(format!(
                        "unsupported query field: {other}"
                    )))
                }
            }
        }

        let predicate = predicate.ok_or_else(|| LedgerError::invalid_query("missing selector"))?;
        Ok(Self { predicate, limit })
    }

    /// Returns the result limit, if any.
    #[must_use]
    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Returns the parsed selector.
    #[must_use]
    pub fn predicate(&self) -> &Predicate {
        &self.predicate
    }

    /// Checks whether a document satisfies the selector.
    #[must_use]
    pub fn matches(&self, doc: &Value) -> bool {
        self.predicate.matches(doc)
    }
}

impl Predicate {
    /// Evaluates the predicate against a document.
    #[must_use]
    pub fn matches(&self, doc: &Value) -> bool {
        match self {
            Self::Field { path, conditions } => {
                let value = resolve(doc, path);
                conditions.iter().all(|c| c.matches(value))
            }
            Self::And(all) => all.iter().all(|p| p.matches(doc)),
            Self::Or(any) => any.iter().any(|p| p.matches(doc)),
        }
    }
}

impl Condition {
    fn parse(op: &str, operand: &Value) -> LedgerResult<Self> {
        Ok(match op {
            "$eq" => Self::Eq(operand.clone()),
            "$ne" => Self::Ne(operand.clone()),
            "$gt" => Self::Gt(operand.clone()),
            "$gte" => Self::Gte(operand.clone()),
            "$lt" => Self::Lt(operand.clone()),
            "$lte" => Self::Lte(operand.clone()),
            "$in" => Self::In(
                operand
                    .as_array()
                    .ok_or_else(|| LedgerError::invalid_query("$in expects an array"))?
                    .clone(),
            ),
            "$exists" => Self::Exists(
                operand
                    .as_bool()
                    .ok_or_else(|| LedgerError::invalid_query("$exists expects a boolean"))?,
            ),
            other => {
                return Err(LedgerError::invalid_query(format!(
                    "unknown operator: {other}"
                )))
            }
        })
    }

    fn matches(&self, value: Option<&Value>) -> bool {
        let Some(value) = value else {
            return matches!(self, Self::Exists(false));
        };
        match self {
            Self::Eq(expected) => equals(value, expected),
            Self::Ne(expected) => !equals(value, expected),
            Self::Gt(bound) => compare(value, bound) == Some(Ordering::Greater),
            Self::Gte(bound) => matches!(
                compare(value, bound),
                Some(Ordering::Greater | Ordering::Equal)
            ),
            Self::Lt(bound) => compare(value, bound) == Some(Ordering::Less),
            Self::Lte(bound) => matches!(
                compare(value, bound),
                Some(Ordering::Less | Ordering::Equal)
            ),
            Self::In(options) => options.iter().any(|o| equals(value, o)),
            Self::Exists(expected) => *expected,
        }
    }
}

fn parse_selector(selector: &Map<String, Value>) -> LedgerResult<Predicate> {
    let mut parts = Vec::with_capacity(selector.len());
    for (key, value) in selector {
        match key.as_str() {
            "$and" | "$or" => {
                let items = value
                    .as_array()
                    .ok_or_else(|| LedgerError::invalid_query(format!("{key} expects an array")))?;
                let mut nested = Vec::with_capacity(items.len());
                for item in items {
                    let obj = item.as_object().ok_or_else(|| {
                        LedgerError::invalid_query(format!("{key} members must be objects"))
                    })?;
                    nested.push(parse_selector(obj)?);
                }
                parts.push(if key == "$and" {
                    Predicate::And(nested)
                } else {
                    Predicate::Or(nested)
                });
            }
            op if op.starts_with('$') => {
                return Err(LedgerError::invalid_query(format!(
                    "unknown operator: {op}"
                )))
            }
            field => parts.push(Predicate::Field {
                path: field.split('.').map(str::to_string).collect(),
                conditions: parse_conditions(value)?,
            }),
        }
    }
    Ok(Predicate::And(parts))
}

fn parse_conditions(value: &Value) -> LedgerResult<Vec<Condition>> {
    let Some(obj) = value.as_object() else {
        return Ok(vec![Condition::Eq(value.clone())]);
    };

    let operators = obj.keys().filter(|k| k.starts_with('$')).count();
    if operators == 0 {
        return Ok(vec![Condition::Eq(value.clone())]);
    }
    if operators != obj.len() {
        return Err(LedgerError::invalid_query(
            "cannot mix operators and fields in one condition",
        ));
    }
    obj.iter()
        .map(|(op, operand)| Condition::parse(op, operand))
        .collect()
}

fn resolve<'a>(doc: &'a Value, path: &[String]) -> Option<&'a Value> {
    path.iter().try_fold(doc, |current, segment| current.get(segment))
}

fn equals(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(_), Value::Number(_)) => compare(a, b) == Some(Ordering::Equal),
        _ => a == b,
    }
}

fn compare(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            if let (Some(x), Some(y)) = (x.as_i64(), y.as_i64()) {
                return Some(x.cmp(&y));
            }
            x.as_f64()?.partial_cmp(&y.as_f64()?)
        }
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        (Value::Bool(x), Value::Bool(y)) => Some(x.cmp(y)),
        _ => None,
    }
}
