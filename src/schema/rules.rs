//! Field validation rules
//!
//! Every document type checks itself by running its fields through a
//! [`Rules`] accumulator. Each rule is a plain function over the field value;
//! failures are recorded as [`Issue`]s keyed by the dotted field path.

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

lazy_static! {
    static ref EMAIL_RE: Regex =
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex");
}

/// How serious a validation issue is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Blocks publishing
    Error,
    /// Advisory only
    Warning,
}

/// A single validation finding
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Issue {
    pub field: String,
    pub message: String,
    pub severity: Severity,
}

impl std::fmt::Display for Issue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let level = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{}: {} ({})", self.field, self.message, level)
    }
}

/// A typed content document with validation rules
pub trait Document {
    /// The `_type` tag in the content store
    const TYPE: &'static str;

    /// Run every field rule and collect the findings
    fn validate(&self) -> Vec<Issue>;
}

/// True when at least one issue blocks publishing
pub fn has_errors(issues: &[Issue]) -> bool {
    issues.iter().any(|i| i.severity == Severity::Error)
}

/// Accumulates issues while walking a document's fields
#[derive(Debug, Default)]
pub struct Rules {
    prefix: String,
    issues: Vec<Issue>,
}

impl Rules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` against a nested object; its issues get `name.` prefixed
    pub fn scope(&mut self, name: &str, f: impl FnOnce(&mut Rules)) {
        let mut child = Rules {
            prefix: self.path(name),
            issues: Vec::new(),
        };
        f(&mut child);
        self.issues.append(&mut child.issues);
    }

    pub fn error(&mut self, field: &str, message: impl Into<String>) {
        self.push(field, message, Severity::Error);
    }

    pub fn warning(&mut self, field: &str, message: impl Into<String>) {
        self.push(field, message, Severity::Warning);
    }

    /// String must be present and non-blank
    pub fn required_str(&mut self, field: &str, value: Option<&str>) -> bool {
        match value {
            Some(v) if !v.trim().is_empty() => true,
            _ => {
                self.error(field, "Required");
                false
            }
        }
    }

    /// Value must be present
    pub fn required<T>(&mut self, field: &str, value: Option<&T>) -> bool {
        if value.is_none() {
            self.error(field, "Required");
            return false;
        }
        true
    }

    /// At most `max` characters
    pub fn max_chars(
        &mut self,
        field: &str,
        value: Option<&str>,
        max: usize,
        severity: Severity,
        message: &str,
    ) {
        if let Some(v) = value {
            if v.chars().count() > max {
                self.push(field, message, severity);
            }
        }
    }

    /// Inclusive numeric range
    pub fn range(&mut self, field: &str, value: Option<i64>, min: i64, max: i64) {
        if let Some(v) = value {
            if v < min {
                self.error(field, format!("Must be greater than or equal to {}", min));
            } else if v > max {
                self.error(field, format!("Must be less than or equal to {}", max));
            }
        }
    }

    pub fn min_items<T>(&mut self, field: &str, items: &[T], min: usize) {
        if items.len() < min {
            self.error(field, format!("Must have at least {} item(s)", min));
        }
    }

    /// Value must be one of the listed options
    pub fn one_of(&mut self, field: &str, value: Option<&str>, allowed: &[&str]) {
        if let Some(v) = value {
            if !allowed.contains(&v) {
                self.error(
                    field,
                    format!("Value {:?} is not one of: {}", v, allowed.join(", ")),
                );
            }
        }
    }

    /// Absolute URL with one of the given schemes
    pub fn url(&mut self, field: &str, value: Option<&str>, schemes: &[&str]) {
        let Some(v) = value else { return };
        match url::Url::parse(v) {
            Ok(parsed) if schemes.is_empty() || schemes.contains(&parsed.scheme()) => {}
            Ok(parsed) => self.error(
                field,
                format!(
                    "URL scheme {:?} is not allowed (expected {})",
                    parsed.scheme(),
                    schemes.join(" or ")
                ),
            ),
            Err(_) => self.error(field, "Not a valid URL"),
        }
    }

    pub fn email(&mut self, field: &str, value: Option<&str>) {
        if let Some(v) = value {
            if !EMAIL_RE.is_match(v) {
                self.error(field, "Must be a valid email address");
            }
        }
    }

    /// Must match `re`
    pub fn pattern(
        &mut self,
        field: &str,
        value: Option<&str>,
        re: &Regex,
        severity: Severity,
        message: &str,
    ) {
        if let Some(v) = value {
            if !re.is_match(v) {
                self.push(field, message, severity);
            }
        }
    }

    /// Must parse as JSON
    pub fn json(&mut self, field: &str, value: Option<&str>) {
        if let Some(v) = value {
            if serde_json::from_str::<serde_json::Value>(v).is_err() {
                self.error(field, "Invalid JSON format");
            }
        }
    }

    /// Must parse as a calendar date (YYYY-MM-DD)
    pub fn date(&mut self, field: &str, value: Option<&str>) {
        if let Some(v) = value {
            if chrono::NaiveDate::parse_from_str(v, "%Y-%m-%d").is_err() {
                self.error(field, "Must be a date in YYYY-MM-DD format");
            }
        }
    }

    pub fn finish(self) -> Vec<Issue> {
        self.issues
    }

    fn push(&mut self, field: &str, message: impl Into<String>, severity: Severity) {
        self.issues.push(Issue {
            field: self.path(field),
            message: message.into(),
            severity,
        });
    }

    fn path(&self, field: &str) -> String {
        if self.prefix.is_empty() {
            field.to_string()
        } else {
            format!("{}.{}", self.prefix, field)
        }
    }
}
