//! Show how a path would be redirected

use anyhow::Result;

use crate::client::FetchMode;
use crate::Site;

pub async fn run(site: &Site, path: &str) -> Result<()> {
    let path = if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    };

    match site.redirects().lookup(&path, FetchMode::Published).await? {
        Some(redirect) => {
            println!(
                "{} -> {} ({})",
                redirect.source,
                redirect.destination,
                redirect.status().code()
            );
            println!("  priority: {}", redirect.priority());
            if let Some(expiry) = redirect.expiry_date {
                println!("  expires: {}", expiry);
            }
            if let Some(description) = &redirect.description {
                println!("  {}", description);
            }
        }
        None => println!("{}: no redirect", path),
    }
    Ok(())
}
