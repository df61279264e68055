//! Page session for card galleries: one-time initialization, clickable cards and the tag
//! filter controller.

use crate::config::SiteConfig;
use crate::dom::{Compound, Document, ElementId, Selector};
use crate::filter::{
  CARD_CLASS, FilterError, History, TAG_CHIP_CLASS, TagFilterController, TagWidget,
};

/// Optional scripts and styles the gallery needs before it can initialize.
#[derive(Debug, thiserror::Error)]
pub enum DependencyError {
  /// A required script could not be loaded.
  #[error("required dependency `{0}` failed to load")]
  Unavailable(String),
}

/// Resolves the gallery's optional dependencies.
pub trait DependencyProbe {
  /// Succeeds once every dependency is available.
  fn ensure_ready(&mut self) -> Result<(), DependencyError>;
}

impl<F> DependencyProbe for F
where
  F: FnMut() -> Result<(), DependencyError>,
{
  fn ensure_ready(&mut self) -> Result<(), DependencyError> {
    self()
  }
}

/// Where a card click should navigate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationTarget {
  /// Destination taken from `data-rel-link`.
  pub href: String,
  /// Browsing context taken from `data-link-target`.
  pub target: Option<String>,
}

/// Gallery state for one page session.
#[derive(Debug, Clone)]
pub struct Gallery {
  initialized: bool,
  path_segment: String,
  tags_param: String,
}

impl Gallery {
  /// Create an uninitialized session using the gallery settings of `config`.
  pub fn new(config: &SiteConfig) -> Self {
    Self {
      initialized: false,
      path_segment: config.gallery_path_segment.clone(),
      tags_param: config.tags_param.clone(),
    }
  }

  /// Whether [`Gallery::on_page_ready`] already completed once.
  pub fn is_initialized(&self) -> bool {
    self.initialized
  }

  /// Whether a change to the page structure at `path` should trigger initialization.
  pub fn on_region_changed(&self, path: &str) -> bool {
    !self.initialized && path.contains(self.path_segment.as_str())
  }

  /// Initialize the gallery once dependencies are ready.
  ///
  /// Subsequent calls are no-ops. A dependency failure leaves the session uninitialized so
  /// a later signal can retry; a widget failure disables filtering but keeps the cards
  /// clickable.
  pub fn on_page_ready<D, W, H, P, A>(
    &mut self,
    document: &mut D,
    probe: &mut P,
    attach_widget: A,
    history: H,
  ) -> Option<TagFilterController<W, H>>
  where
    D: Document + ?Sized,
    W: TagWidget<D>,
    H: History,
    P: DependencyProbe,
    A: FnOnce(&D) -> Result<W, FilterError>,
  {
    if self.initialized {
      return None;
    }

    if let Err(err) = probe.ensure_ready() {
      tracing::error!("gallery dependencies unavailable: {err}");
      return None;
    }

    self.initialized = true;
    tracing::info!("initializing gallery");
    let cards = mark_cards_clickable(document);
    tracing::debug!(cards, "cards marked clickable");

    match attach_widget(&*document) {
      Ok(widget) => Some(TagFilterController::init(
        document,
        widget,
        history,
        self.tags_param.as_str(),
      )),
      Err(err) => {
        tracing::error!("tag filtering disabled: {err}");
        None
      }
    }
  }
}

/// Give every card a pointer cursor, returning the number of cards.
pub fn mark_cards_clickable<D: Document + ?Sized>(document: &mut D) -> usize {
  let cards = document.query_all(&Selector::from(Compound::class(CARD_CLASS)));
  for &card in &cards {
    document.set_style_property(card, "cursor", Some("pointer"));
  }
  cards.len()
}

/// Decide where a click on `card` that landed on `clicked` navigates.
///
/// Clicks on links and tag chips inside the card keep their own behavior, and cards without
/// a link (or linking to `#`) are inert.
pub fn card_click_target<D: Document + ?Sized>(
  document: &D,
  card: ElementId,
  clicked: ElementId,
) -> Option<NavigationTarget> {
  if document.closest(clicked, &Compound::tag("a")).is_some()
    || document.closest(clicked, &Compound::class(TAG_CHIP_CLASS)).is_some()
  {
    return None;
  }

  let href = document
    .attribute(card, "data-rel-link")
    .filter(|link| !link.is_empty() && *link != "#")?;

  Some(NavigationTarget {
    href: href.to_string(),
    target: document.attribute(card, "data-link-target").map(str::to_string),
  })
}

#[cfg(test)]
mod tests {
  use url::Url;

  use super::*;
  use crate::dom::Page;
  use crate::filter::{MemoryHistory, SelectWidget};

  const PAGE: &str = r##"
    <select class="tag-filter" multiple><option value="ai">AI</option></select>
    <div class="card" data-tags="ai" data-rel-link="../agents/" data-link-target="_blank" style="color: red;">
      <h3>Agents</h3>
      <a href="https://github.com/x">repo</a>
      <span class="tag" data-tag="ai">ai</span>
    </div>
    <div class="card" data-tags="web" data-rel-link="#"><h3>Web</h3></div>
  "##;

  fn history(url: &str) -> MemoryHistory {
    MemoryHistory::new(Url::parse(url).unwrap())
  }

  fn first(page: &Page, compound: Compound) -> ElementId {
    page.query(&Selector::from(compound)).unwrap()
  }

  #[test]
  fn initializes_once() {
    let mut page = Page::parse(PAGE);
    let mut gallery = Gallery::new(&SiteConfig::default());
    let mut probe = || -> Result<(), DependencyError> { Ok(()) };

    let controller = gallery.on_page_ready(
      &mut page,
      &mut probe,
      |doc: &Page| SelectWidget::attach(doc),
      history("https://x.dev/use-cases/?tags=ai"),
    );
    let controller = controller.expect("controller should be created");
    assert_eq!(controller.selection(), ["ai".to_string()].as_slice());
    assert!(gallery.is_initialized());
    assert!(!gallery.on_region_changed("/use-cases/gallery/"));

    let again = gallery.on_page_ready(
      &mut page,
      &mut probe,
      |doc: &Page| SelectWidget::attach(doc),
      history("https://x.dev/use-cases/"),
    );
    assert!(again.is_none());
  }

  #[test]
  fn dependency_failure_allows_retry() {
    let mut page = Page::parse(PAGE);
    let mut gallery = Gallery::new(&SiteConfig::default());
    let mut failing =
      || -> Result<(), DependencyError> { Err(DependencyError::Unavailable("chosen".into())) };

    let controller = gallery.on_page_ready(
      &mut page,
      &mut failing,
      |doc: &Page| SelectWidget::attach(doc),
      history("https://x.dev/use-cases/"),
    );
    assert!(controller.is_none());
    assert!(!gallery.is_initialized());
    assert!(!page.is_modified());
    assert!(gallery.on_region_changed("/docs/use-cases/community/"));
    assert!(!gallery.on_region_changed("/docs/home/"));
  }

  #[test]
  fn missing_widget_keeps_cards_clickable() {
    let mut page = Page::parse(r#"<div class="card" data-tags="a"></div>"#);
    let mut gallery = Gallery::new(&SiteConfig::default());

    let controller = gallery.on_page_ready(
      &mut page,
      &mut || -> Result<(), DependencyError> { Ok(()) },
      |doc: &Page| SelectWidget::attach(doc),
      history("https://x.dev/use-cases/?tags=b"),
    );
    assert!(controller.is_none());
    assert!(gallery.is_initialized());
    assert_eq!(
      page.render(),
      r#"<div class="card" data-tags="a" style="cursor: pointer"></div>"#
    );
  }

  #[test]
  fn appends_cursor_to_existing_style() {
    let mut page = Page::parse(PAGE);
    assert_eq!(mark_cards_clickable(&mut page), 2);
    let card = first(&page, Compound::class(CARD_CLASS));
    assert_eq!(page.attribute(card, "style"), Some("color: red; cursor: pointer"));

    let snapshot = page.render();
    mark_cards_clickable(&mut page);
    assert_eq!(page.render(), snapshot);
  }

  #[test]
  fn card_clicks_navigate_unless_on_link_or_tag() {
    let page = Page::parse(PAGE);
    let card = first(&page, Compound::class(CARD_CLASS));
    let heading = first(&page, Compound::tag("h3"));
    let link = first(&page, Compound::tag("a"));
    let chip = first(&page, Compound::class(TAG_CHIP_CLASS));

    assert_eq!(
      card_click_target(&page, card, heading),
      Some(NavigationTarget {
        href: "../agents/".into(),
        target: Some("_blank".into()),
      })
    );
    assert_eq!(card_click_target(&page, card, link), None);
    assert_eq!(card_click_target(&page, card, chip), None);
  }

  #[test]
  fn placeholder_links_are_inert() {
    let page = Page::parse(PAGE);
    let cards = page.query_all(&Selector::from(Compound::class(CARD_CLASS)));
    assert_eq!(card_click_target(&page, cards[1], cards[1]), None);
  }
}
