//! Site artifacts derived from the settings document
//!
//! Every generator accepts missing settings and falls back to fixed
//! defaults instead of failing.

pub mod images;
pub mod manifest;
pub mod robots;

pub use images::{render as render_image, ImageKind};
pub use manifest::{manifest, WebManifest};
pub use robots::{policy as robots_policy, RobotsPolicy};

pub const FALLBACK_NAME: &str = "My Site";
pub const FALLBACK_SHORT_NAME: &str = "Site";
pub const FALLBACK_DESCRIPTION: &str = "Generated with Lakesite";
