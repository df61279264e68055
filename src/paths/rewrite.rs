use crate::dom::{Compound, Document, Selector};

use super::{PathLayout, is_relative_reference};

const RELATIVE_PREFIXES: &[&str] = &["../", "./"];

/// Counts of rewritten references on a blog page.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BlogRewriteReport {
  /// Image sources rewritten inside the main content area.
  pub images: usize,
  /// Post body links rewritten.
  pub links: usize,
}

impl BlogRewriteReport {
  /// Total number of rewritten attributes.
  pub fn total(&self) -> usize {
    self.images + self.links
  }
}

/// Relative image sources inside the main content area.
pub fn blog_image_selector() -> Selector {
  Selector::new(Compound::tag("img").with_attr_prefix("src", RELATIVE_PREFIXES))
    .within(Compound::tag("main"))
}

/// Relative links inside post bodies, leaving table of contents, metadata and action bar
/// links alone.
pub fn blog_link_selector() -> Selector {
  Selector::new(Compound::tag("a").with_attr_prefix("href", RELATIVE_PREFIXES))
    .within(Compound::class("md-post"))
    .excluding(Compound::class("toclink"))
    .excluding(Compound::class("md-meta__link"))
    .not_child_of(Compound::tag("nav").with_class("md-post__action"))
}

/// Rewrite `attribute` on every element matching `selector` through the path normalizer.
///
/// Elements lacking the attribute or holding a non-relative reference are skipped. Returns
/// the number of elements whose attribute was written.
pub fn process_elements<D: Document + ?Sized>(
  layout: &PathLayout,
  document: &mut D,
  selector: &Selector,
  attribute: &str,
  current_url: &str,
  is_image: bool,
) -> usize {
  let mut rewritten = 0;

  for element in document.query_all(selector) {
    let Some(path) = document.attribute(element, attribute) else {
      continue;
    };
    if !is_relative_reference(path) {
      continue;
    }

    let is_from_snippets = layout.is_from_snippets(path);
    let normalized = layout.normalize(path, is_from_snippets, current_url, is_image);
    tracing::debug!(attribute, from = path, to = %normalized, "rewriting relative reference");
    document.set_attribute(element, attribute, &normalized);
    rewritten += 1;
  }

  rewritten
}

/// Rewrite relative image sources and post links when `current_url` is a blog page.
///
/// Rewriting is idempotent: ascents are stripped before the page depth is applied, so an
/// already corrected reference maps to itself.
pub fn fix_blog_urls<D: Document + ?Sized>(
  layout: &PathLayout,
  document: &mut D,
  current_url: &str,
) -> BlogRewriteReport {
  if !layout.is_blog_url(current_url) {
    return BlogRewriteReport::default();
  }

  let images = process_elements(layout, document, &blog_image_selector(), "src", current_url, true);
  let links = process_elements(layout, document, &blog_link_selector(), "href", current_url, false);

  BlogRewriteReport { images, links }
}
