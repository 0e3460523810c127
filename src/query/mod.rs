//! Declarative content queries
//!
//! A [`Query`] is plain data until it runs. The same definition renders to
//! GROQ for the remote store ([`Query::to_groq`]) and evaluates against an
//! in-memory document set ([`Query::evaluate`]), so published and draft reads
//! share one query no matter which source answers them.

pub mod catalog;
mod filter;
mod projection;

pub use filter::{Filter, Operand, Scope};
pub use projection::{Field, Projection};

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde_json::Value;
use std::collections::HashMap;

use crate::error::Result;
use filter::compare;

static NULL: Value = Value::Null;

/// Follow a dotted path; anything missing is `null`
pub(crate) fn lookup<'a>(doc: &'a Value, path: &str) -> &'a Value {
    path.split('.')
        .try_fold(doc, |value, key| value.get(key))
        .unwrap_or(&NULL)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    fn as_str(self) -> &'static str {
        match self {
            Direction::Asc => "asc",
            Direction::Desc => "desc",
        }
    }
}

/// Which part of the ordered result to keep
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slice {
    /// A single document (or `null`)
    Index(usize),
    /// Documents `start..end`, end exclusive
    Range(usize, usize),
}

/// A read query over typed documents
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    filters: Vec<Filter>,
    order: Vec<(String, Direction)>,
    slice: Option<Slice>,
    projection: Option<Projection>,
    params: IndexMap<String, Value>,
}

impl Query {
    /// Every document in the dataset
    pub fn star() -> Self {
        Self::default()
    }

    pub fn filter_by_type(self, doc_type: &str) -> Self {
        self.filter(Filter::eq("_type", Operand::literal(doc_type)))
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Verbatim GROQ predicate; only the remote store can run it
    pub fn filter_raw(self, groq: &str) -> Self {
        self.filter(Filter::raw(groq))
    }

    pub fn order(mut self, field: &str, direction: Direction) -> Self {
        self.order.push((field.to_string(), direction));
        self
    }

    pub fn slice(mut self, slice: Slice) -> Self {
        self.slice = Some(slice);
        self
    }

    pub fn project(mut self, projection: Projection) -> Self {
        self.projection = Some(projection);
        self
    }

    pub fn param(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.params.insert(name.to_string(), value.into());
        self
    }

    pub fn params(&self) -> &IndexMap<String, Value> {
        &self.params
    }

    /// True when the result is one document rather than a list
    pub fn is_single(&self) -> bool {
        matches!(self.slice, Some(Slice::Index(_)))
    }

    /// Render the GROQ text
    pub fn to_groq(&self) -> String {
        let mut groq = String::from("*");
        if !self.filters.is_empty() {
            groq.push_str(&format!("[{}]", Filter::And(self.filters.clone()).to_groq()));
        }
        if !self.order.is_empty() {
            let order: Vec<String> = self
                .order
                .iter()
                .map(|(field, dir)| format!("{} {}", field, dir.as_str()))
                .collect();
            groq.push_str(&format!(" | order({})", order.join(", ")));
        }
        match self.slice {
            Some(Slice::Index(i)) => groq.push_str(&format!("[{}]", i)),
            Some(Slice::Range(start, end)) => groq.push_str(&format!("[{}...{}]", start, end)),
            None => {}
        }
        if let Some(projection) = &self.projection {
            groq.push(' ');
            groq.push_str(&projection.to_groq());
        }
        groq
    }

    /// Run the query against documents held in memory
    ///
    /// References are resolved against the same document set.
    pub fn evaluate(&self, docs: &[Value], now: DateTime<Utc>) -> Result<Value> {
        let scope = Scope {
            params: &self.params,
            now,
        };

        let mut matched = Vec::new();
        for doc in docs {
            let mut keep = true;
            for filter in &self.filters {
                if !filter.matches(doc, &scope)? {
                    keep = false;
                    break;
                }
            }
            if keep {
                matched.push(doc);
            }
        }

        if !self.order.is_empty() {
            matched.sort_by(|a, b| {
                self.order
                    .iter()
                    .map(|(field, dir)| {
                        let ord = order_values(lookup(a, field), lookup(b, field));
                        match dir {
                            Direction::Asc => ord,
                            Direction::Desc => ord.reverse(),
                        }
                    })
                    .find(|ord| ord.is_ne())
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
        }

        let by_id: HashMap<&str, &Value> = docs
            .iter()
            .filter_map(|d| d.get("_id").and_then(Value::as_str).map(|id| (id, d)))
            .collect();
        let resolve = |id: &str| by_id.get(id).map(|d| (*d).clone());
        let shape = |doc: &Value| match &self.projection {
            Some(p) => p.apply(doc, &resolve),
            None => doc.clone(),
        };

        Ok(match self.slice {
            Some(Slice::Index(i)) => matched.get(i).map(|d| shape(*d)).unwrap_or(Value::Null),
            Some(Slice::Range(start, end)) => Value::Array(
                matched
                    .iter()
                    .skip(start)
                    .take(end.saturating_sub(start))
                    .map(|d| shape(*d))
                    .collect(),
            ),
            None => Value::Array(matched.iter().map(|d| shape(*d)).collect()),
        })
    }
}

/// Sort order for arbitrary values: `null` first, then comparable values
fn order_values(a: &Value, b: &Value) -> std::cmp::Ordering {
    use std::cmp::Ordering;
    match (a.is_null(), b.is_null()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        _ => compare(a, b).unwrap_or(Ordering::Equal),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn docs() -> Vec<Value> {
        vec![
            json!({"_id": "a", "_type": "page", "title": "A", "rank": 2, "slug": {"current": "a"}}),
            json!({"_id": "b", "_type": "page", "title": "B", "rank": 5, "slug": {"current": "b"}}),
            json!({"_id": "c", "_type": "page", "title": "C", "rank": 2}),
            json!({"_id": "s", "_type": "siteSettings", "siteName": "Acme"}),
        ]
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_lookup() {
        let doc = json!({"seo": {"noIndex": true}});
        assert_eq!(lookup(&doc, "seo.noIndex"), &json!(true));
        assert!(lookup(&doc, "seo.title").is_null());
        assert!(lookup(&doc, "missing.deep").is_null());
    }

    #[test]
    fn test_groq_rendering() {
        let query = Query::star()
            .filter_by_type("page")
            .filter_raw("slug.current == $slug")
            .order("publishDate", Direction::Asc)
            .order("_updatedAt", Direction::Desc)
            .slice(Slice::Index(0))
            .project(Projection::new().fields(&["_id", "title"]))
            .param("slug", "about");
        assert_eq!(
            query.to_groq(),
            r#"*[_type == "page" && (slug.current == $slug)] | order(publishDate asc, _updatedAt desc)[0] {_id, title}"#
        );
        assert_eq!(query.params()["slug"], "about");
        assert!(query.is_single());
    }

    #[test]
    fn test_evaluate_order_slice_project() {
        let query = Query::star()
            .filter_by_type("page")
            .filter(Filter::defined("slug.current"))
            .order("rank", Direction::Desc)
            .slice(Slice::Range(0, 10))
            .project(Projection::new().field("title").alias("slug", "slug.current"));
        let result = query.evaluate(&docs(), now()).unwrap();
        assert_eq!(
            result,
            json!([{"title": "B", "slug": "b"}, {"title": "A", "slug": "a"}])
        );
    }

    #[test]
    fn test_evaluate_single() {
        let found = Query::star()
            .filter_by_type("siteSettings")
            .slice(Slice::Index(0))
            .evaluate(&docs(), now())
            .unwrap();
        assert_eq!(found["siteName"], "Acme");

        let missing = Query::star()
            .filter_by_type("navigation")
            .slice(Slice::Index(0))
            .evaluate(&docs(), now())
            .unwrap();
        assert!(missing.is_null());
    }

    #[test]
    fn test_stable_tie_break() {
        let result = Query::star()
            .filter_by_type("page")
            .order("rank", Direction::Asc)
            .order("title", Direction::Desc)
            .project(Projection::new().field("title"))
            .evaluate(&docs(), now())
            .unwrap();
        let titles: Vec<_> = result
            .as_array()
            .unwrap()
            .iter()
            .map(|d| d["title"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(titles, vec!["C", "A", "B"]);
    }
}
