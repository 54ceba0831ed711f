//! Content-tree enumeration.
//!
//! The article tree has a fixed shape:
//!
//! ```text
//! docs/articles/
//! └── new-expensify/           # platform
//!     └── billing/             # hub
//!         ├── overview.md      # article
//!         └── cards/           # section
//!             └── limits.md    # section article
//! ```
//!
//! Every listing is sorted by file name so the generated manifest does not
//! depend on the filesystem's own ordering. Hidden entries are ignored.

use crate::error::{Error, Result};
use crate::models::{Article, Section};
use crate::utils::{article_descriptor, is_hidden, is_markdown, title_from_href};
use std::path::Path;
use tokio::fs;
use tracing::{debug, instrument, warn};

/// What a directory entry turned out to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    File,
}

/// One visible entry of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub name: String,
    pub kind: EntryKind,
}

/// Articles and sections found in one hub directory, in listing order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HubContents {
    pub articles: Vec<Article>,
    pub sections: Vec<Section>,
}

/// List a directory, skipping hidden entries, sorted by name.
///
/// Symlinks are followed so a linked hub or section behaves like a real one.
pub async fn list_dir(dir: &Path) -> Result<Vec<Entry>> {
    let mut read_dir = fs::read_dir(dir).await.map_err(|e| Error::io(dir, e))?;
    let mut entries = Vec::new();

    while let Some(entry) = read_dir.next_entry().await.map_err(|e| Error::io(dir, e))? {
        let Ok(name) = entry.file_name().into_string() else {
            warn!(path = %entry.path().display(), "Skipping entry with a non UTF-8 name");
            continue;
        };
        if is_hidden(&name) {
            debug!(%name, "Skipping hidden entry");
            continue;
        }
        let path = entry.path();
        let metadata = fs::metadata(&path).await.map_err(|e| Error::io(&path, e))?;
        let kind = if metadata.is_dir() {
            EntryKind::Directory
        } else {
            EntryKind::File
        };
        entries.push(Entry { name, kind });
    }

    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}

/// Names of the hub directories under a platform directory.
#[instrument(level = "debug", skip_all, fields(dir = %platform_dir.display()))]
pub async fn list_hubs(platform_dir: &Path) -> Result<Vec<String>> {
    let hubs = list_dir(platform_dir)
        .await?
        .into_iter()
        .filter_map(|entry| match entry.kind {
            EntryKind::Directory => Some(entry.name),
            EntryKind::File => {
                warn!(name = %entry.name, "Ignoring file at platform level; hubs must be directories");
                None
            }
        })
        .collect::<Vec<_>>();
    debug!(count = hubs.len(), "Listed hubs");
    Ok(hubs)
}

/// Collect the articles and sections of one hub directory.
///
/// Markdown files become articles. Directories become sections whose
/// articles are the markdown files directly inside them. Anything else is
/// skipped.
#[instrument(level = "debug", skip_all, fields(dir = %hub_dir.display()))]
pub async fn scan_hub(hub_dir: &Path) -> Result<HubContents> {
    let mut contents = HubContents::default();

    for entry in list_dir(hub_dir).await? {
        match entry.kind {
            EntryKind::File if is_markdown(&entry.name) => {
                contents.articles.push(article_descriptor(&entry.name));
            }
            EntryKind::File => {
                warn!(name = %entry.name, "Skipping non-markdown file in hub");
            }
            EntryKind::Directory => {
                let articles = scan_section(&hub_dir.join(&entry.name)).await?;
                contents.sections.push(Section {
                    title: title_from_href(&entry.name),
                    href: entry.name,
                    articles,
                });
            }
        }
    }

    debug!(
        articles = contents.articles.len(),
        sections = contents.sections.len(),
        "Scanned hub"
    );
    Ok(contents)
}

/// Article descriptors for the markdown files of a section directory.
pub async fn scan_section(section_dir: &Path) -> Result<Vec<Article>> {
    let mut articles = Vec::new();
    for entry in list_dir(section_dir).await? {
        match entry.kind {
            EntryKind::File if is_markdown(&entry.name) => {
                articles.push(article_descriptor(&entry.name));
            }
            EntryKind::Directory => {
                warn!(
                    section = %section_dir.display(),
                    name = %entry.name,
                    "Sections cannot be nested; skipping directory"
                );
            }
            EntryKind::File => {
                warn!(
                    section = %section_dir.display(),
                    name = %entry.name,
                    "Skipping non-markdown file in section"
                );
            }
        }
    }
    Ok(articles)
}
