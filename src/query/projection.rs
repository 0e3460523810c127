//! Field projections

use serde_json::{Map, Value};

use super::lookup;

/// How one projected key is produced
#[derive(Debug, Clone, PartialEq)]
pub enum Field {
    /// A (possibly dotted) path, copied as is
    Path(String),
    /// An array whose items are projected
    Array(String, Projection),
    /// A nested object, projected
    Object(String, Projection),
    /// A reference followed to its document, then projected
    Deref(String, Projection),
}

/// Ordered set of projected keys
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Projection {
    /// Keep every stored field (`...`) before applying the listed ones
    spread: bool,
    fields: Vec<(String, Field)>,
}

impl Projection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from all stored fields
    pub fn all() -> Self {
        Self {
            spread: true,
            fields: Vec::new(),
        }
    }

    pub fn field(mut self, name: &str) -> Self {
        self.fields
            .push((name.to_string(), Field::Path(name.to_string())));
        self
    }

    pub fn fields(self, names: &[&str]) -> Self {
        names.iter().fold(self, |p, name| p.field(name))
    }

    /// Project `path` under a different key
    pub fn alias(mut self, alias: &str, path: &str) -> Self {
        self.fields
            .push((alias.to_string(), Field::Path(path.to_string())));
        self
    }

    pub fn array(mut self, name: &str, items: Projection) -> Self {
        self.fields
            .push((name.to_string(), Field::Array(name.to_string(), items)));
        self
    }

    pub fn object(mut self, name: &str, inner: Projection) -> Self {
        self.fields
            .push((name.to_string(), Field::Object(name.to_string(), inner)));
        self
    }

    pub fn deref(mut self, name: &str, target: Projection) -> Self {
        self.fields
            .push((name.to_string(), Field::Deref(name.to_string(), target)));
        self
    }

    /// Render as a GROQ projection block
    pub fn to_groq(&self) -> String {
        let mut parts = Vec::new();
        if self.spread {
            parts.push("...".to_string());
        }
        for (alias, field) in &self.fields {
            let (path, expr) = match field {
                Field::Path(path) => (path, path.clone()),
                Field::Array(path, sub) => (path, format!("{}[]{}", path, sub.to_groq())),
                Field::Object(path, sub) => (path, format!("{}{}", path, sub.to_groq())),
                Field::Deref(path, sub) => (path, format!("{}->{}", path, sub.to_groq())),
            };
            if path == alias {
                parts.push(expr);
            } else {
                parts.push(format!("\"{}\": {}", alias, expr));
            }
        }
        format!("{{{}}}", parts.join(", "))
    }

    /// Apply to an in-memory document
    ///
    /// `resolve` looks a document up by `_id` for dereferencing.
    pub fn apply(&self, doc: &Value, resolve: &dyn Fn(&str) -> Option<Value>) -> Value {
        let Value::Object(source) = doc else {
            return Value::Null;
        };
        let mut out = if self.spread {
            source.clone()
        } else {
            Map::new()
        };
        for (alias, field) in &self.fields {
            let value = match field {
                Field::Path(path) => lookup(doc, path).clone(),
                Field::Array(path, sub) => match lookup(doc, path) {
                    Value::Array(items) => Value::Array(
                        items
                            .iter()
                            .map(|item| {
                                if item.is_object() {
                                    sub.apply(item, resolve)
                                } else {
                                    item.clone()
                                }
                            })
                            .collect(),
                    ),
                    _ => Value::Null,
                },
                Field::Object(path, sub) => match lookup(doc, path) {
                    v @ Value::Object(_) => sub.apply(v, resolve),
                    _ => Value::Null,
                },
                Field::Deref(path, sub) => lookup(doc, path)
                    .get("_ref")
                    .and_then(Value::as_str)
                    .and_then(resolve)
                    .map(|target| sub.apply(&target, resolve))
                    .unwrap_or(Value::Null),
            };
            out.insert(alias.clone(), value);
        }
        Value::Object(out)
    }
}
