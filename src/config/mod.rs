//! Configuration module

mod site;

pub use site::CacheConfig;
pub use site::PreviewConfig;
pub use site::SiteConfig;
pub use site::StoreConfig;
pub use site::SITE_URL_ENV;
