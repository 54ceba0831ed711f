//! Data model for the navigation manifest.
//!
//! The manifest is a tree: platforms own hubs, hubs own articles and
//! sections, sections own articles. Only the keys the synchronizer touches
//! are typed; everything else a maintainer puts in `_routes.yml` (titles,
//! icons, descriptions) rides along in an `extra` mapping so it survives the
//! round trip in its original order.

use serde::{Deserialize, Serialize};
use serde_yaml::Mapping;

/// The whole routes manifest.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Manifest {
    /// Platforms in declaration order.
    pub platforms: Vec<Platform>,
    /// Any other top-level keys.
    #[serde(flatten)]
    pub extra: Mapping,
}

impl Manifest {
    /// Find a platform by its href.
    pub fn platform_mut(&mut self, href: &str) -> Option<&mut Platform> {
        self.platforms.iter_mut().find(|p| p.href == href)
    }

    pub fn platform(&self, href: &str) -> Option<&Platform> {
        self.platforms.iter().find(|p| p.href == href)
    }
}

/// One product platform, e.g. `new-expensify`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Platform {
    pub href: String,
    #[serde(flatten)]
    pub extra: Mapping,
    #[serde(default)]
    pub hubs: Vec<Hub>,
}

/// A top-level navigation group; one directory under the platform's article tree.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Hub {
    pub href: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(flatten)]
    pub extra: Mapping,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub articles: Option<Vec<Article>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sections: Option<Vec<Section>>,
}

impl Hub {
    /// Append an article, creating the list if the hub has none yet.
    pub fn push_article(&mut self, article: Article) {
        self.articles.get_or_insert_with(Vec::new).push(article);
    }

    /// Append a section, creating the list if the hub has none yet.
    pub fn push_section(&mut self, section: Section) {
        self.sections.get_or_insert_with(Vec::new).push(section);
    }
}

/// A subdirectory of a hub, grouping its own articles.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Section {
    pub href: String,
    pub title: String,
    pub articles: Vec<Article>,
}

/// The `{href, title}` descriptor of one markdown file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Article {
    pub href: String,
    pub title: String,
}
