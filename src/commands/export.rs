//! Write the generated site artifacts to a directory

use anyhow::Result;
use chrono::Utc;
use std::fs;
use std::path::{Path, PathBuf};

use crate::artifacts::{self, ImageKind};
use crate::client::FetchMode;
use crate::sitemap;
use crate::Site;

/// Write sitemap, robots, manifest and images into `out_dir`
///
/// Returns the written paths in write order.
pub async fn run(site: &Site, out_dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(out_dir)?;

    let client = &site.client;
    let settings = client.site_settings(FetchMode::Published).await;
    let entries = sitemap::generate(client, Utc::now()).await?;

    let mut files = vec![
        ("sitemap.xml", sitemap::render_xml(&entries)),
        (
            "robots.txt",
            artifacts::robots_policy(settings.as_ref()).to_txt(),
        ),
        (
            "manifest.webmanifest",
            serde_json::to_string_pretty(&artifacts::manifest(
                settings.as_ref(),
                client.images(),
            ))?,
        ),
    ];
    for kind in ImageKind::ALL {
        files.push((
            kind.file_name(),
            artifacts::render_image(kind, settings.as_ref(), client.images()),
        ));
    }

    let mut written = Vec::with_capacity(files.len());
    for (name, content) in files {
        let path = out_dir.join(name);
        fs::write(&path, content)?;
        tracing::info!("Generated: {:?}", path);
        written.push(path);
    }

    println!("Exported {} files to {:?}", written.len(), out_dir);
    Ok(written)
}
