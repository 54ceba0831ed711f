//! The route synchronizer.
//!
//! A run is a single pass in four phases:
//!
//! 1. **Load**: parse `_routes.yml` into a [`Manifest`]
//! 2. **Validate**: list hub directories for every platform and check their
//!    count against the manifest, for all platforms, before touching anything
//! 3. **Scan**: collect each hub's articles and sections into a plan
//! 4. **Apply & write**: append the plan to the manifest and persist it
//!
//! Nothing is written unless every phase succeeds.

use crate::cli::Cli;
use crate::error::{Error, Result};
use crate::models::{Hub, Manifest};
use crate::outputs::manifest::{check_manifest, render, write_manifest};
use crate::scanner::{self, HubContents};
use itertools::Itertools;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, error, info, instrument};

/// Hub positions by href for one platform.
#[derive(Debug, Clone, Default)]
pub struct HubIndex {
    platform: String,
    positions: HashMap<String, usize>,
}

impl HubIndex {
    /// Index a platform's hubs.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateHub`] if two hubs share an href.
    pub fn build(platform: &str, hubs: &[Hub]) -> Result<Self> {
        if let Some(dup) = hubs.iter().map(|h| h.href.as_str()).duplicates().next() {
            return Err(Error::DuplicateHub {
                platform: platform.to_string(),
                hub: dup.to_string(),
            });
        }
        let positions = hubs
            .iter()
            .enumerate()
            .map(|(i, h)| (h.href.clone(), i))
            .collect();
        Ok(Self {
            platform: platform.to_string(),
            positions,
        })
    }

    /// Position of `hub` in the platform's hub list.
    ///
    /// # Errors
    ///
    /// Returns [`Error::HubNotFound`] if the manifest has no such hub.
    pub fn position(&self, hub: &str) -> Result<usize> {
        self.positions
            .get(hub)
            .copied()
            .ok_or_else(|| Error::HubNotFound {
                platform: self.platform.clone(),
                hub: hub.to_string(),
            })
    }
}

/// Scanned contents of every hub of one platform, ready to apply.
#[derive(Debug)]
pub struct PlatformPlan {
    pub platform: String,
    pub index: HubIndex,
    pub hubs: Vec<(String, HubContents)>,
}

/// What a successful run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub output: PathBuf,
    pub hubs: usize,
    pub articles: usize,
    pub sections: usize,
    /// False in check mode.
    pub written: bool,
}

/// Parse the hand-maintained manifest.
///
/// # Errors
///
/// [`Error::Io`] if the file cannot be read, [`Error::ManifestParse`] if it
/// is not a valid manifest.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn load_manifest(path: &Path) -> Result<Manifest> {
    let text = fs::read_to_string(path)
        .await
        .map_err(|e| Error::io(path, e))?;
    let manifest: Manifest = serde_yaml::from_str(&text).map_err(|source| Error::ManifestParse {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(platforms = manifest.platforms.len(), "Loaded manifest");
    Ok(manifest)
}

/// True if the platform has as many hub directories as declared hubs.
///
/// Logs the mismatch, naming the platform, when it does not.
pub fn validate_hub_parity(disk_hubs: &[String], manifest_hubs: &[Hub], platform: &str) -> bool {
    if disk_hubs.len() == manifest_hubs.len() {
        return true;
    }
    error!(
        platform,
        on_disk = disk_hubs.len(),
        declared = manifest_hubs.len(),
        "Number of hubs in _routes.yml does not match number of hubs in docs/{platform}/articles. Please update _routes.yml with hub info."
    );
    false
}

/// Append a hub's scanned articles and sections to its manifest entry.
///
/// Lists are created on first use, so a hub with only articles ends up with
/// no `sections` key and vice versa.
pub fn populate_hub(
    manifest_hubs: &mut [Hub],
    index: &HubIndex,
    hub: &str,
    contents: HubContents,
) -> Result<()> {
    let entry = manifest_hubs
        .get_mut(index.position(hub)?)
        .ok_or_else(|| Error::HubNotFound {
            platform: index.platform.clone(),
            hub: hub.to_string(),
        })?;
    for article in contents.articles {
        entry.push_article(article);
    }
    for section in contents.sections {
        entry.push_section(section);
    }
    Ok(())
}

/// Check hub parity for every platform and return the hub directories found.
///
/// All platforms are checked so every mismatch gets reported; the first one
/// is returned as the error.
pub async fn discover_hubs(
    manifest: &Manifest,
    articles_dir: &Path,
    platforms: &[String],
) -> Result<Vec<(String, Vec<String>)>> {
    let mut discovered = Vec::with_capacity(platforms.len());
    let mut mismatch = None;

    for platform in platforms {
        let route = manifest
            .platform(platform)
            .ok_or_else(|| Error::PlatformNotFound {
                platform: platform.clone(),
            })?;
        let disk_hubs = scanner::list_hubs(&articles_dir.join(platform)).await?;

        if !validate_hub_parity(&disk_hubs, &route.hubs, platform) && mismatch.is_none() {
            mismatch = Some(Error::HubCountMismatch {
                platform: platform.clone(),
                on_disk: disk_hubs.len(),
                declared: route.hubs.len(),
            });
        }
        discovered.push((platform.clone(), disk_hubs));
    }

    match mismatch {
        Some(err) => Err(err),
        None => Ok(discovered),
    }
}

/// Scan every discovered hub of one platform.
#[instrument(level = "info", skip_all, fields(%platform))]
pub async fn plan_platform(
    manifest: &Manifest,
    articles_dir: &Path,
    platform: &str,
    disk_hubs: Vec<String>,
) -> Result<PlatformPlan> {
    let route = manifest
        .platform(platform)
        .ok_or_else(|| Error::PlatformNotFound {
            platform: platform.to_string(),
        })?;
    let index = HubIndex::build(platform, &route.hubs)?;

    let platform_dir = articles_dir.join(platform);
    let mut hubs = Vec::with_capacity(disk_hubs.len());
    for hub in disk_hubs {
        index.position(&hub)?;
        let contents = scanner::scan_hub(&platform_dir.join(&hub)).await?;
        hubs.push((hub, contents));
    }

    info!(hubs = hubs.len(), "Scanned platform");
    Ok(PlatformPlan {
        platform: platform.to_string(),
        index,
        hubs,
    })
}

/// Apply a platform plan to the manifest.
pub fn apply_plan(manifest: &mut Manifest, plan: PlatformPlan) -> Result<()> {
    let route = manifest
        .platform_mut(&plan.platform)
        .ok_or_else(|| Error::PlatformNotFound {
            platform: plan.platform.clone(),
        })?;
    for (hub, contents) in plan.hubs {
        populate_hub(&mut route.hubs, &plan.index, &hub, contents)?;
    }
    Ok(())
}

/// Regenerate the routes manifest as configured by `args`.
///
/// Loads the input manifest, validates and scans every platform, populates
/// the hubs, then writes the output (or, with `--check`, compares it with the
/// file already on disk).
pub async fn run(args: &Cli) -> Result<SyncReport> {
    let mut manifest = load_manifest(&args.input_path()).await?;
    let articles_dir = args.articles_dir();

    let discovered = discover_hubs(&manifest, &articles_dir, &args.platforms).await?;

    let mut plans = Vec::with_capacity(discovered.len());
    for (platform, disk_hubs) in discovered {
        plans.push(plan_platform(&manifest, &articles_dir, &platform, disk_hubs).await?);
    }

    let (mut hubs, mut articles, mut sections) = (0, 0, 0);
    for plan in &plans {
        hubs += plan.hubs.len();
        for (_, contents) in &plan.hubs {
            articles += contents.articles.len()
                + contents.sections.iter().map(|s| s.articles.len()).sum::<usize>();
            sections += contents.sections.len();
        }
    }

    for plan in plans {
        apply_plan(&mut manifest, plan)?;
    }

    let rendered = render(&manifest)?;
    let output = args.output_path();
    if args.check {
        check_manifest(&output, &rendered).await?;
    } else {
        write_manifest(&output, &rendered).await?;
    }

    Ok(SyncReport {
        output,
        hubs,
        articles,
        sections,
        written: !args.check,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::fs as stdfs;
    use tempfile::TempDir;

    const ROUTES: &str = r#"home:
  href: home
  title: Expensify Help
platforms:
  - href: expensify-classic
    title: Expensify Classic
    hub-title: Expensify Classic - Help & Resources
    hubs:
      - href: billing
        title: Billing
        icon: /assets/images/money-wings.svg
        description: Learn about billing.
      - href: getting-started
        title: Getting Started
        icon: /assets/images/accounting.svg
        description: Set up your account.
  - href: new-expensify
    title: New Expensify
    hub-title: New Expensify - Help & Resources
    hubs:
      - href: chat
        title: Chat
"#;

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            stdfs::create_dir_all(parent).unwrap();
        }
        stdfs::write(path, "# stub\n").unwrap();
    }

    /// A docs tree matching [`ROUTES`].
    fn docs_fixture() -> TempDir {
        let tmp = TempDir::new().unwrap();
        let docs = tmp.path();
        touch(&docs.join("_data/_routes.yml"));
        stdfs::write(docs.join("_data/_routes.yml"), ROUTES).unwrap();

        let classic = docs.join("articles/expensify-classic");
        touch(&classic.join("billing/overview.md"));
        touch(&classic.join("billing/faq.md"));
        touch(&classic.join("getting-started/quick-start.md"));
        touch(&classic.join("getting-started/section-a/first-steps.md"));
        touch(&classic.join("getting-started/section-a/invite-members.md"));

        touch(&docs.join("articles/new-expensify/chat/introducing-chat.md"));
        tmp
    }

    fn args_for(docs: &Path, extra: &[&str]) -> Cli {
        let mut argv = vec!["docs_routes", "--docs-dir", docs.to_str().unwrap()];
        argv.extend_from_slice(extra);
        Cli::parse_from(argv)
    }

    fn hub<'a>(manifest: &'a Manifest, platform: &str, href: &str) -> &'a Hub {
        manifest
            .platform(platform)
            .unwrap()
            .hubs
            .iter()
            .find(|h| h.href == href)
            .unwrap()
    }

    #[test]
    fn test_hub_index_duplicate() {
        let hubs = vec![
            Hub {
                href: "billing".to_string(),
                ..Default::default()
            },
            Hub {
                href: "billing".to_string(),
                ..Default::default()
            },
        ];
        let err = HubIndex::build("new-expensify", &hubs).unwrap_err();
        assert!(matches!(err, Error::DuplicateHub { ref hub, .. } if hub == "billing"));
    }

    #[test]
    fn test_hub_index_missing() {
        let hubs = vec![Hub {
            href: "billing".to_string(),
            ..Default::default()
        }];
        let index = HubIndex::build("new-expensify", &hubs).unwrap();
        assert_eq!(index.position("billing").unwrap(), 0);
        let err = index.position("travel").unwrap_err();
        assert!(matches!(err, Error::HubNotFound { ref hub, .. } if hub == "travel"));
    }

    #[test]
    fn test_validate_hub_parity() {
        let hubs = vec![Hub::default(), Hub::default()];
        let disk = vec!["a".to_string(), "b".to_string()];
        assert!(validate_hub_parity(&disk, &hubs, "new-expensify"));
        assert!(!validate_hub_parity(&disk[..1], &hubs, "new-expensify"));
    }

    #[tokio::test]
    async fn test_run_populates_hubs() {
        let tmp = docs_fixture();
        let report = run(&args_for(tmp.path(), &[])).await.unwrap();

        assert!(report.written);
        assert_eq!(report.hubs, 3);
        assert_eq!(report.sections, 1);
        assert_eq!(report.articles, 6);

        let text = stdfs::read_to_string(tmp.path().join("_data/routes.yml")).unwrap();
        assert!(text.starts_with(crate::outputs::manifest::DISCLAIMER));
        let manifest: Manifest = serde_yaml::from_str(&text).unwrap();

        // markdown-only hub: articles, no sections
        let billing = hub(&manifest, "expensify-classic", "billing");
        assert!(billing.sections.is_none());
        let hrefs: Vec<_> = billing
            .articles
            .as_ref()
            .unwrap()
            .iter()
            .map(|a| a.href.as_str())
            .collect();
        assert_eq!(hrefs, vec!["faq", "overview"]);
        assert!(billing.extra.contains_key("icon"));

        // hub with one section of two articles
        let started = hub(&manifest, "expensify-classic", "getting-started");
        let sections = started.sections.as_ref().unwrap();
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].href, "section-a");
        assert_eq!(sections[0].title, "Section A");
        assert_eq!(sections[0].articles.len(), 2);
        assert_eq!(sections[0].articles[1].title, "Invite Members");
        assert_eq!(
            started.articles.as_ref().unwrap()[0].title,
            "Quick Start"
        );

        assert!(manifest.extra.contains_key("home"));
    }

    #[tokio::test]
    async fn test_run_is_idempotent() {
        let tmp = docs_fixture();
        let output = tmp.path().join("_data/routes.yml");

        run(&args_for(tmp.path(), &[])).await.unwrap();
        let first = stdfs::read(&output).unwrap();
        run(&args_for(tmp.path(), &[])).await.unwrap();
        let second = stdfs::read(&output).unwrap();

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_run_mismatch_writes_nothing() {
        let tmp = docs_fixture();
        stdfs::create_dir_all(tmp.path().join("articles/new-expensify/travel")).unwrap();

        let err = run(&args_for(tmp.path(), &[])).await.unwrap_err();
        assert!(matches!(err, Error::HubCountMismatch { ref platform, .. } if platform == "new-expensify"));
        assert!(err.to_string().contains("new-expensify"));
        assert!(!tmp.path().join("_data/routes.yml").exists());
    }

    #[tokio::test]
    async fn test_run_reports_first_mismatch_after_checking_all() {
        let tmp = docs_fixture();
        stdfs::create_dir_all(tmp.path().join("articles/new-expensify/travel")).unwrap();
        stdfs::remove_dir_all(tmp.path().join("articles/expensify-classic/billing")).unwrap();

        let err = run(&args_for(tmp.path(), &[])).await.unwrap_err();
        assert!(matches!(err, Error::HubCountMismatch { ref platform, on_disk: 2, declared: 1 } if platform == "new-expensify"));
        assert!(!tmp.path().join("_data/routes.yml").exists());
    }

    #[tokio::test]
    async fn test_run_unknown_hub_directory() {
        let tmp = docs_fixture();
        stdfs::rename(
            tmp.path().join("articles/new-expensify/chat"),
            tmp.path().join("articles/new-expensify/messaging"),
        )
        .unwrap();

        let err = run(&args_for(tmp.path(), &[])).await.unwrap_err();
        assert!(matches!(err, Error::HubNotFound { ref hub, .. } if hub == "messaging"));
        assert!(!tmp.path().join("_data/routes.yml").exists());
    }

    #[tokio::test]
    async fn test_run_missing_platform_directory() {
        let tmp = docs_fixture();
        stdfs::remove_dir_all(tmp.path().join("articles/new-expensify")).unwrap();

        let err = run(&args_for(tmp.path(), &[])).await.unwrap_err();
        assert!(err.is_io());
    }

    #[tokio::test]
    async fn test_run_platform_not_in_manifest() {
        let tmp = docs_fixture();
        let err = run(&args_for(tmp.path(), &["-p", "expensify-classic", "-p", "travel"]))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::PlatformNotFound { ref platform } if platform == "travel"));
    }

    #[tokio::test]
    async fn test_run_single_platform_leaves_others_untouched() {
        let tmp = docs_fixture();
        run(&args_for(tmp.path(), &["-p", "new-expensify"])).await.unwrap();

        let text = stdfs::read_to_string(tmp.path().join("_data/routes.yml")).unwrap();
        let manifest: Manifest = serde_yaml::from_str(&text).unwrap();
        assert!(hub(&manifest, "expensify-classic", "billing").articles.is_none());
        assert!(hub(&manifest, "new-expensify", "chat").articles.is_some());
    }

    #[tokio::test]
    async fn test_load_manifest_malformed() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("_routes.yml");
        stdfs::write(&path, "platforms: [unterminated").unwrap();

        let err = load_manifest(&path).await.unwrap_err();
        assert!(matches!(err, Error::ManifestParse { .. }));
    }

    #[tokio::test]
    async fn test_run_check_mode() {
        let tmp = docs_fixture();

        let err = run(&args_for(tmp.path(), &["--check"])).await.unwrap_err();
        assert!(matches!(err, Error::OutputStale { .. }));
        assert!(!tmp.path().join("_data/routes.yml").exists());

        run(&args_for(tmp.path(), &[])).await.unwrap();
        let report = run(&args_for(tmp.path(), &["--check"])).await.unwrap();
        assert!(!report.written);

        touch(&tmp.path().join("articles/new-expensify/chat/new-article.md"));
        let err = run(&args_for(tmp.path(), &["--check"])).await.unwrap_err();
        assert!(matches!(err, Error::OutputStale { .. }));
    }
}
