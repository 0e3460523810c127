//! Search and social metadata
//!
//! [`metadata`] resolves titles, descriptions, robots flags and social cards
//! from documents and site settings; [`structured_data`] builds the JSON-LD
//! blocks; [`head`] renders both into HTML.

pub mod head;
pub mod metadata;
pub mod structured_data;

pub use head::render_head;
pub use metadata::{
    detail_metadata, layout_metadata, not_found_metadata, Metadata, Robots, SeoContext, SeoSource,
    Title,
};
pub use structured_data::{merge_fragments, organization, script_tag, web_page};
