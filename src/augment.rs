//! Build-time orchestrator applying page patches to rendered HTML on disk.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde::Serialize;
use url::Url;

use crate::config::SiteConfig;
use crate::dom::{Document, Page};
use crate::filter::{FilterError, MemoryHistory, SelectWidget, TagFilterController};
use crate::paths::fix_blog_urls;
use crate::patches::{fix_edit_link, fix_home_hero};

/// Changes made to a single page.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageReport {
  /// Image sources rewritten on a blog page.
  pub blog_images: usize,
  /// Post links rewritten on a blog page.
  pub blog_links: usize,
  /// The edit link was hidden or retargeted.
  pub edit_link: bool,
  /// The home page hero background was prefixed.
  pub hero: bool,
}

impl PageReport {
  /// Whether anything on the page changed.
  pub fn changed(&self) -> bool {
    self.blog_images + self.blog_links > 0 || self.edit_link || self.hero
  }
}

/// Summary of a directory run.
#[derive(Debug, Default, Clone, Serialize)]
pub struct SiteReport {
  /// Number of HTML pages visited.
  pub pages: usize,
  /// Site-relative paths of the pages that were rewritten.
  pub changed: Vec<String>,
  /// Total image sources rewritten.
  pub blog_images: usize,
  /// Total post links rewritten.
  pub blog_links: usize,
}

/// Applies the configured page patches to documents, HTML strings, files and directories.
pub struct SiteAugmenter {
  config: SiteConfig,
}

impl SiteAugmenter {
  /// Create an augmenter for the provided configuration.
  pub fn new(config: SiteConfig) -> Self {
    Self { config }
  }

  /// Configuration in use.
  pub fn config(&self) -> &SiteConfig {
    &self.config
  }

  /// Apply the hero, edit-link and blog path fixes to `document` rendered at `url`.
  pub fn augment_document<D: Document + ?Sized>(&self, document: &mut D, url: &Url) -> PageReport {
    let path = url.path();
    let hero = fix_home_hero(
      document,
      path,
      &self.config.site_prefix,
      &self.config.home_path_fragment,
    );
    let edit = fix_edit_link(document, path, &self.config.api_reference_fragment);
    let blog = fix_blog_urls(&self.config.paths, document, url.as_str());

    PageReport {
      blog_images: blog.images,
      blog_links: blog.links,
      edit_link: edit.hidden || edit.rewritten,
      hero,
    }
  }

  /// Patch an HTML string, returning the rendered result and what changed.
  pub fn augment_html(&self, html: &str, url: &Url) -> (String, PageReport) {
    let mut page = Page::parse(html);
    let report = self.augment_document(&mut page, url);
    (page.render(), report)
  }

  /// Render the tag filter state `url` describes into `html`: selected options and hidden
  /// cards.
  pub fn prerender_filter(&self, html: &str, url: &Url) -> Result<String, FilterError> {
    let mut page = Page::parse(html);
    let widget = SelectWidget::attach(&page)?;
    let history = MemoryHistory::new(url.clone());
    let controller =
      TagFilterController::init(&mut page, widget, history, self.config.tags_param.as_str());
    tracing::info!(selection = ?controller.selection(), "prerendered tag filter");
    Ok(page.render())
  }

  /// Patch a single file rendered at `url`, writing to `output` or back in place.
  ///
  /// Unchanged pages are not rewritten when patching in place.
  pub fn augment_file(&self, path: &Path, url: &Url, output: Option<&Path>) -> Result<PageReport> {
    let html =
      fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let (rendered, report) = self.augment_html(&html, url);

    let target = output.unwrap_or(path);
    if report.changed() || output.is_some() {
      fs::write(target, rendered).with_context(|| format!("failed to write {}", target.display()))?;
    }

    Ok(report)
  }

  /// Patch every `.html` page under `root`, deriving page URLs from `base_url`.
  pub fn augment_dir(&self, root: &Path, base_url: &Url) -> Result<SiteReport> {
    let base_url = directory_url(base_url);
    let mut pages = Vec::new();
    collect_html_files(root, &mut pages)?;
    pages.sort();

    let mut report = SiteReport::default();
    for file in pages {
      let relative = relative_page_path(root, &file)?;
      let url = page_url(&base_url, &relative)?;
      let page = self.augment_file(&file, &url, None)?;

      report.pages += 1;
      report.blog_images += page.blog_images;
      report.blog_links += page.blog_links;
      if page.changed() {
        tracing::info!(page = %relative, "patched");
        report.changed.push(relative);
      }
    }

    Ok(report)
  }
}

fn collect_html_files(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
  let entries =
    fs::read_dir(dir).with_context(|| format!("failed to read directory {}", dir.display()))?;
  for entry in entries {
    let entry = entry?;
    let file_name = entry.file_name();
    if file_name.to_string_lossy().starts_with('.') {
      continue;
    }

    let path = entry.path();
    let file_type = entry.file_type()?;
    if file_type.is_dir() {
      collect_html_files(&path, files)?;
    } else if file_type.is_file() && path.extension().is_some_and(|ext| ext == "html") {
      files.push(path);
    }
  }
  Ok(())
}

fn relative_page_path(root: &Path, file: &Path) -> Result<String> {
  let relative = file
    .strip_prefix(root)
    .map_err(|_| anyhow!("{} is outside {}", file.display(), root.display()))?;
  Ok(relative.to_string_lossy().replace('\\', "/"))
}

fn directory_url(base_url: &Url) -> Url {
  let mut base = base_url.clone();
  if !base.path().ends_with('/') {
    let path = format!("{}/", base.path());
    base.set_path(&path);
  }
  base
}

/// URL a page is served at: `dir/index.html` is served as `dir/`.
fn page_url(base_url: &Url, relative: &str) -> Result<Url> {
  let served = if relative == "index.html" {
    ""
  } else {
    relative.strip_suffix("/index.html").unwrap_or(relative)
  };
  let served = if served.is_empty() || served.ends_with(".html") {
    served.to_string()
  } else {
    format!("{served}/")
  };
  base_url
    .join(&served)
    .with_context(|| format!("failed to derive page URL for {relative}"))
}
