use std::sync::OnceLock;

use regex::Regex;
use serde::Deserialize;

const ASCENT: &str = "../";

/// Directory topology of the syndicated locations a page can be re-hosted under.
///
/// Syndicated pages live at a different depth than their source, and content included from
/// the snippets directory sits one level deeper than directly authored content.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PathLayout {
  /// URL suffix identifying the blog index root.
  pub blog_root: String,
  /// URL fragment identifying a blog category listing.
  pub category_fragment: String,
  /// Leading directory marking content included from the shared snippets tree.
  pub snippets_dir: String,
  /// Ascent depth for authored content on the blog root.
  pub blog_root_depth: usize,
  /// Ascent depth for snippet content on the blog root.
  pub blog_root_snippet_depth: usize,
  /// Ascent depth for authored content on every other syndicated page.
  pub page_depth: usize,
  /// Ascent depth for snippet content on every other syndicated page.
  pub page_snippet_depth: usize,
  /// Ascent depth for date-prefixed images, independent of page and origin.
  pub dated_image_depth: usize,
}

impl Default for PathLayout {
  fn default() -> Self {
    Self {
      blog_root: "/docs/blog/".into(),
      category_fragment: "/blog/category/".into(),
      snippets_dir: "snippets/".into(),
      blog_root_depth: 1,
      blog_root_snippet_depth: 2,
      page_depth: 3,
      page_snippet_depth: 4,
      dated_image_depth: 2,
    }
  }
}

fn dated_name_pattern() -> &'static Regex {
  static PATTERN: OnceLock<Regex> = OnceLock::new();
  PATTERN.get_or_init(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}-").expect("invalid date regex"))
}

/// Date-prefixed images are published flat, so a dated file name drops its directory.
fn dated_image_name(clean_path: &str) -> Option<&str> {
  if dated_name_pattern().is_match(clean_path) {
    return Some(clean_path);
  }
  let (_, file_name) = clean_path.rsplit_once('/')?;
  dated_name_pattern().is_match(file_name).then_some(file_name)
}

/// Remove every leading `../` segment from a path.
pub fn strip_ascents(path: &str) -> &str {
  let mut rest = path;
  while let Some(stripped) = rest.strip_prefix(ASCENT) {
    rest = stripped;
  }
  rest
}

/// Returns `true` for references that start with `../` or `./`.
pub fn is_relative_reference(value: &str) -> bool {
  value.starts_with(ASCENT) || value.starts_with("./")
}

impl PathLayout {
  /// Whether a raw reference points into the snippets tree once its ascents are removed.
  pub fn is_from_snippets(&self, path: &str) -> bool {
    strip_ascents(path).starts_with(self.snippets_dir.as_str())
  }

  /// Compute the corrected relative path for a reference rendered on `current_url`.
  ///
  /// Malformed input is never rejected; the result is the best-effort concatenation of the
  /// computed ascent and the stripped path.
  pub fn normalize(
    &self,
    path: &str,
    is_from_snippets: bool,
    current_url: &str,
    is_image: bool,
  ) -> String {
    let clean_path = strip_ascents(path);

    if is_image && let Some(dated) = dated_image_name(clean_path) {
      return format!("{}{dated}", ASCENT.repeat(self.dated_image_depth));
    }

    let depth = match (current_url.ends_with(self.blog_root.as_str()), is_from_snippets) {
      (true, true) => self.blog_root_snippet_depth,
      (true, false) => self.blog_root_depth,
      (false, true) => self.page_snippet_depth,
      (false, false) => self.page_depth,
    };
    format!("{}{clean_path}", ASCENT.repeat(depth))
  }
}

/// Normalize a path against the default site layout.
pub fn normalize_path(
  path: &str,
  is_from_snippets: bool,
  current_url: &str,
  is_image: bool,
) -> String {
  PathLayout::default().normalize(path, is_from_snippets, current_url, is_image)
}
