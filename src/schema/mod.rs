//! Typed content documents and their field rules
//!
//! Each document type mirrors the store's camelCase wire form and implements
//! [`Document`] so it can be checked the same way the editor checks it.

mod author;
mod category;
mod common;
mod legal;
mod navigation;
mod page;
mod post;
mod redirect;
mod rules;
mod seo;
mod settings;

pub use author::*;
pub use category::*;
pub use common::*;
pub use legal::*;
pub use navigation::*;
pub use page::*;
pub use post::*;
pub use redirect::*;
pub use rules::*;
pub use seo::*;
pub use settings::*;

use serde::de::DeserializeOwned;
use serde_json::Value;

/// Document types that can be validated from raw JSON
pub const DOCUMENT_TYPES: &[&str] = &[
    Page::TYPE,
    Post::TYPE,
    Author::TYPE,
    Category::TYPE,
    Legal::TYPE,
    Navigation::TYPE,
    SiteSettings::TYPE,
    Redirect::TYPE,
];

/// Validate a raw document by dispatching on its `_type`
///
/// Returns `None` for types this crate does not model (assets, plugins).
/// A document that cannot even be decoded yields a single error issue.
pub fn validate_document(doc: &Value) -> Option<Vec<Issue>> {
    let doc_type = doc.get("_type").and_then(Value::as_str)?;
    let issues = match doc_type {
        Page::TYPE => check::<Page>(doc),
        Post::TYPE => check::<Post>(doc),
        Author::TYPE => check::<Author>(doc),
        Category::TYPE => check::<Category>(doc),
        Legal::TYPE => check::<Legal>(doc),
        Navigation::TYPE => check::<Navigation>(doc),
        SiteSettings::TYPE => check::<SiteSettings>(doc),
        Redirect::TYPE => check::<Redirect>(doc),
        _ => return None,
    };
    Some(issues)
}

fn check<T: Document + DeserializeOwned>(doc: &Value) -> Vec<Issue> {
    match T::deserialize(doc) {
        Ok(parsed) => parsed.validate(),
        Err(e) => vec![Issue {
            field: String::new(),
            message: e.to_string(),
            severity: Severity::Error,
        }],
    }
}
