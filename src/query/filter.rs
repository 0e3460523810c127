//! Query predicates

use chrono::{DateTime, SecondsFormat, Utc};
use indexmap::IndexMap;
use serde_json::Value;
use std::cmp::Ordering;

use super::lookup;
use crate::error::{Error, Result};
use crate::helpers::parse_datetime;

/// Right-hand side of a comparison
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Literal(Value),
    /// A `$name` parameter bound at execution time
    Param(String),
    /// `now()`, evaluated when the query runs
    Now,
}

impl Operand {
    pub fn literal(value: impl Into<Value>) -> Self {
        Operand::Literal(value.into())
    }

    pub fn param(name: &str) -> Self {
        Operand::Param(name.to_string())
    }

    fn to_groq(&self) -> String {
        match self {
            Operand::Literal(v) => v.to_string(),
            Operand::Param(name) => format!("${}", name),
            Operand::Now => "now()".to_string(),
        }
    }

    fn resolve(&self, scope: &Scope<'_>) -> Result<Value> {
        match self {
            Operand::Literal(v) => Ok(v.clone()),
            Operand::Param(name) => scope
                .params
                .get(name)
                .cloned()
                .ok_or_else(|| Error::Query(format!("missing parameter ${}", name))),
            Operand::Now => Ok(Value::String(
                scope.now.to_rfc3339_opts(SecondsFormat::Secs, true),
            )),
        }
    }
}

/// A predicate over a document
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Eq(String, Operand),
    Gt(String, Operand),
    Defined(String),
    Not(Box<Filter>),
    And(Vec<Filter>),
    Or(Vec<Filter>),
    /// Verbatim GROQ, only understood by the remote store
    Raw(String),
}

impl Filter {
    pub fn eq(field: &str, operand: Operand) -> Self {
        Filter::Eq(field.to_string(), operand)
    }

    pub fn gt(field: &str, operand: Operand) -> Self {
        Filter::Gt(field.to_string(), operand)
    }

    pub fn defined(field: &str) -> Self {
        Filter::Defined(field.to_string())
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(filter: Filter) -> Self {
        Filter::Not(Box::new(filter))
    }

    pub fn and(filters: Vec<Filter>) -> Self {
        Filter::And(filters)
    }

    pub fn or(filters: Vec<Filter>) -> Self {
        Filter::Or(filters)
    }

    pub fn raw(groq: &str) -> Self {
        Filter::Raw(groq.to_string())
    }

    /// Render as GROQ
    pub fn to_groq(&self) -> String {
        match self {
            Filter::Eq(field, op) => format!("{} == {}", field, op.to_groq()),
            Filter::Gt(field, op) => format!("{} > {}", field, op.to_groq()),
            Filter::Defined(field) => format!("defined({})", field),
            Filter::Not(inner) => match inner.as_ref() {
                Filter::Defined(_) => format!("!{}", inner.to_groq()),
                _ => format!("!({})", inner.to_groq()),
            },
            Filter::And(parts) => parts
                .iter()
                .map(|f| match f {
                    Filter::Or(_) | Filter::Raw(_) => format!("({})", f.to_groq()),
                    _ => f.to_groq(),
                })
                .collect::<Vec<_>>()
                .join(" && "),
            Filter::Or(parts) => parts
                .iter()
                .map(|f| match f {
                    Filter::And(_) | Filter::Raw(_) => format!("({})", f.to_groq()),
                    _ => f.to_groq(),
                })
                .collect::<Vec<_>>()
                .join(" || "),
            Filter::Raw(groq) => groq.clone(),
        }
    }

    /// Evaluate against a single document
    pub fn matches(&self, doc: &Value, scope: &Scope<'_>) -> Result<bool> {
        Ok(match self {
            Filter::Eq(field, op) => lookup(doc, field) == &op.resolve(scope)?,
            Filter::Gt(field, op) => {
                compare(lookup(doc, field), &op.resolve(scope)?) == Some(Ordering::Greater)
            }
            Filter::Defined(field) => !lookup(doc, field).is_null(),
            Filter::Not(inner) => !inner.matches(doc, scope)?,
            Filter::And(parts) => {
                for part in parts {
                    if !part.matches(doc, scope)? {
                        return Ok(false);
                    }
                }
                true
            }
            Filter::Or(parts) => {
                for part in parts {
                    if part.matches(doc, scope)? {
                        return Ok(true);
                    }
                }
                false
            }
            Filter::Raw(groq) => return Err(Error::UnsupportedFilter(groq.clone())),
        })
    }
}

/// Bindings available while evaluating a query in memory
pub struct Scope<'a> {
    pub params: &'a IndexMap<String, Value>,
    pub now: DateTime<Utc>,
}

/// Ordering between two values of the same kind
///
/// Strings that both parse as dates compare chronologically, so a plain
/// `2030-01-31` can be compared with `now()`. Mixed kinds do not compare.
pub(crate) fn compare(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64()?.partial_cmp(&y.as_f64()?),
        (Value::String(x), Value::String(y)) => match (parse_datetime(x), parse_datetime(y)) {
            (Some(dx), Some(dy)) => Some(dx.cmp(&dy)),
            _ => Some(x.cmp(y)),
        },
        (Value::Bool(x), Value::Bool(y)) => Some(x.cmp(y)),
        _ => None,
    }
}
