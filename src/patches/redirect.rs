use std::sync::OnceLock;

use regex::Regex;
use url::Url;

const INDEX_SUFFIX: &str = "/index";

fn dated_post_pattern() -> &'static Regex {
  static PATTERN: OnceLock<Regex> = OnceLock::new();
  PATTERN.get_or_init(|| {
    Regex::new(r"/docs/blog/([0-9]{4})-([0-9]{2})-([0-9]{2})-(.*)")
      .expect("invalid blog post regex")
  })
}

/// Canonical location for legacy blog and user story URLs.
///
/// Blog posts addressed as `/docs/blog/YYYY-MM-DD-title` move to `/docs/blog/YYYY/MM/DD/title`,
/// and user stories drop a trailing `/index`. Query and fragment are not carried over.
pub fn redirect_target(url: &Url) -> Option<Url> {
  let path = url.path();
  canonical_blog_path(path)
    .or_else(|| canonical_user_story_path(path))
    .map(|canonical| {
      let mut target = url.clone();
      target.set_path(&canonical);
      target.set_query(None);
      target.set_fragment(None);
      target
    })
}

fn canonical_blog_path(path: &str) -> Option<String> {
  if !path.contains("/docs/blog") {
    return None;
  }
  let path = path.strip_suffix(INDEX_SUFFIX).unwrap_or(path);
  dated_post_pattern()
    .is_match(path)
    .then(|| dated_post_pattern().replace(path, "/docs/blog/$1/$2/$3/$4").into_owned())
}

fn canonical_user_story_path(path: &str) -> Option<String> {
  if !path.contains("/docs/user-stories") {
    return None;
  }
  path.strip_suffix(INDEX_SUFFIX).map(str::to_string)
}
