//! Helper functions shared by the renderers
//!
//! URL building, escaping, date handling and image URLs. Everything here is
//! a pure function of its inputs.

mod date;
mod html;
pub mod image;
mod url;

pub use date::*;
pub use html::*;
pub use image::{Fit, ImageUrlBuilder};
pub use self::url::*;
