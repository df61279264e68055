use crate::dom::{Compound, Document, Selector};

const HERO_CLASS: &str = "homepage-hero-section";
const ASSETS_SEGMENT: &str = "/assets";

/// Prefix the home page hero background with the deployment prefix.
///
/// Only applies to pages under `{site_prefix}/` whose path contains `home_fragment`. Returns
/// `true` when the hero's inline style was changed.
///
/// Only the inline `style` attribute is patched. A background set by a stylesheet is never
/// seen here and has to carry the deployment prefix itself.
pub fn fix_home_hero<D: Document + ?Sized>(
  document: &mut D,
  page_path: &str,
  site_prefix: &str,
  home_fragment: &str,
) -> bool {
  let prefix = site_prefix.trim_end_matches('/');
  if prefix.is_empty()
    || !page_path.starts_with(&format!("{prefix}/"))
    || !page_path.contains(home_fragment)
  {
    tracing::trace!(page_path, "not on the home page, skipping hero fix");
    return false;
  }

  let Some(hero) = document.query(&Selector::from(Compound::class(HERO_CLASS))) else {
    return false;
  };
  let Some(style) = document.attribute(hero, "style") else {
    return false;
  };

  let prefixed = format!("{prefix}{ASSETS_SEGMENT}");
  if style.contains(&prefixed) || !style.contains(ASSETS_SEGMENT) {
    return false;
  }

  let updated = style.replacen(ASSETS_SEGMENT, &prefixed, 1);
  document.set_attribute(hero, "style", &updated);
  true
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::dom::Page;

  const HOME: &str = r#"<section class="homepage-hero-section" style="background-image: url('/assets/img/hero.png')"></section>"#;

  #[test]
  fn prefixes_hero_background_once() {
    let mut page = Page::parse(HOME);
    assert!(fix_home_hero(&mut page, "/ag2/docs/home/home/", "/ag2", "/docs/home/"));
    assert_eq!(
      page.render(),
      r#"<section class="homepage-hero-section" style="background-image: url('/ag2/assets/img/hero.png')"></section>"#
    );
    assert!(!fix_home_hero(&mut page, "/ag2/docs/home/home/", "/ag2", "/docs/home/"));
  }

  #[test]
  fn other_pages_are_skipped() {
    let mut page = Page::parse(HOME);
    assert!(!fix_home_hero(&mut page, "/docs/home/", "/ag2", "/docs/home/"));
    assert!(!fix_home_hero(&mut page, "/ag2/docs/blog/", "/ag2", "/docs/home/"));
    assert!(!page.is_modified());
  }

  #[test]
  fn hero_without_inline_style_is_left_alone() {
    let mut page = Page::parse(r#"<section class="homepage-hero-section"></section>"#);
    assert!(!fix_home_hero(&mut page, "/ag2/docs/home/", "/ag2", "/docs/home/"));
  }
}
