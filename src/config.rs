//! Site configuration loader describing the documentation layout assumptions.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::paths::PathLayout;

/// File name searched for when discovering configuration next to a rendered site.
pub const DEFAULT_CONFIG_FILE: &str = "docs_augment.config.json";

/// Discoverable configuration describing the site topology and page patch settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
  /// Directory depths used when rewriting syndicated relative paths.
  pub paths: PathLayout,
  /// Query parameter carrying the comma separated tag selection.
  pub tags_param: String,
  /// Path segment identifying pages that host the card gallery.
  pub gallery_path_segment: String,
  /// Prefix the site is deployed under, used for the home page hero background.
  pub site_prefix: String,
  /// Path fragment identifying the home page.
  pub home_path_fragment: String,
  /// Path fragment for API reference pages whose edit link gets hidden.
  pub api_reference_fragment: String,
}

impl Default for SiteConfig {
  fn default() -> Self {
    Self {
      paths: PathLayout::default(),
      tags_param: "tags".into(),
      gallery_path_segment: "/use-cases".into(),
      site_prefix: "/ag2".into(),
      home_path_fragment: "/docs/home/".into(),
      api_reference_fragment: "/docs/api-reference/".into(),
    }
  }
}

impl SiteConfig {
  /// Attempt to load configuration from the provided directory.
  ///
  /// A missing or unparsable file yields the defaults so a bare site can still be processed.
  pub fn discover(site_dir: &Path) -> Self {
    let candidate = site_dir.join(DEFAULT_CONFIG_FILE);
    Self::from_path(&candidate).unwrap_or_default()
  }

  /// Read configuration from a specific JSON file.
  pub fn from_path(path: &Path) -> Option<Self> {
    let content = fs::read_to_string(path).ok()?;
    match serde_json::from_str(&content) {
      Ok(config) => Some(config),
      Err(err) => {
        tracing::warn!("ignoring invalid configuration {}: {err}", path.display());
        None
      }
    }
  }
}
