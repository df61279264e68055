use std::sync::OnceLock;

use regex::Regex;

use super::PathLayout;

fn paginated_listing_pattern() -> &'static Regex {
  static PATTERN: OnceLock<Regex> = OnceLock::new();
  PATTERN.get_or_init(|| Regex::new(r"/blog/page/[0-9]+/").expect("invalid pagination regex"))
}

impl PathLayout {
  /// Returns `true` when `url` is a page that syndicates blog content.
  ///
  /// That is the blog index root, any category listing, or a numbered page of the listing.
  pub fn is_blog_url(&self, url: &str) -> bool {
    url.ends_with(self.blog_root.as_str())
      || url.contains(self.category_fragment.as_str())
      || paginated_listing_pattern().is_match(url)
  }
}

/// Classify `url` against the default site layout.
pub fn is_blog_url(url: &str) -> bool {
  PathLayout::default().is_blog_url(url)
}
