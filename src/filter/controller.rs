use crate::dom::{Compound, Document, ElementId, Selector};

use super::history::History;
use super::query::{tags_from_url, url_with_tags};
use super::widget::TagWidget;

/// Class marking filterable cards.
pub const CARD_CLASS: &str = "card";
/// Class marking inline tag chips inside cards.
pub const TAG_CHIP_CLASS: &str = "tag";

/// Events that mutate the tag selection after initialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterEvent {
  /// The user edited the multi-select widget directly.
  WidgetChange,
  /// The user activated an inline tag chip carrying this tag.
  TagChipClick(String),
  /// The browser moved back or forward through history.
  HistoryNavigate,
}

/// Keeps the tag selection, the widget, the URL and card visibility consistent.
///
/// Every handler runs to completion against the document it is given, so the four views
/// agree again before the next event is processed.
#[derive(Debug)]
pub struct TagFilterController<W, H> {
  widget: W,
  history: H,
  tags_param: String,
  selection: Vec<String>,
}

impl<W, H: History> TagFilterController<W, H> {
  /// Initialize from the `tags_param` query parameter of the current location.
  ///
  /// An absent parameter leaves the selection empty without touching the URL or the cards.
  pub fn init<D>(document: &mut D, widget: W, history: H, tags_param: impl Into<String>) -> Self
  where
    D: Document + ?Sized,
    W: TagWidget<D>,
  {
    let mut controller = Self {
      widget,
      history,
      tags_param: tags_param.into(),
      selection: Vec::new(),
    };

    let initial = tags_from_url(controller.history.location(), &controller.tags_param);
    if !initial.is_empty() {
      tracing::info!(tags = ?initial, "restoring tag selection from URL");
      controller.replace_selection(document, initial);
    }

    controller
  }

  /// Dispatch `event` to its handler.
  pub fn handle<D>(&mut self, document: &mut D, event: FilterEvent)
  where
    D: Document + ?Sized,
    W: TagWidget<D>,
  {
    match event {
      FilterEvent::WidgetChange => self.on_widget_change(document),
      FilterEvent::TagChipClick(tag) => self.on_tag_chip_click(document, &tag),
      FilterEvent::HistoryNavigate => self.on_history_navigate(document),
    }
  }

  /// Adopt the widget's current value as the selection.
  pub fn on_widget_change<D>(&mut self, document: &mut D)
  where
    D: Document + ?Sized,
    W: TagWidget<D>,
  {
    self.selection = dedup(self.widget.value(document));
    self.propagate(document);
  }

  /// Append `tag` to the selection unless it is already selected.
  pub fn on_tag_chip_click<D>(&mut self, document: &mut D, tag: &str)
  where
    D: Document + ?Sized,
    W: TagWidget<D>,
  {
    if tag.is_empty() || self.selection.iter().any(|selected| selected == tag) {
      return;
    }

    self.selection.push(tag.to_string());
    self.sync_widget(document);
    self.propagate(document);
  }

  /// Resolve the chip enclosing a clicked element and treat it as a chip click.
  ///
  /// Returns `true` when the click landed on a tag chip, whether or not it changed the
  /// selection, so the caller can stop the click from reaching the card.
  pub fn on_element_click<D>(&mut self, document: &mut D, target: ElementId) -> bool
  where
    D: Document + ?Sized,
    W: TagWidget<D>,
  {
    let Some(chip) = document.closest(target, &Compound::class(TAG_CHIP_CLASS)) else {
      return false;
    };
    if let Some(tag) = document.attribute(chip, "data-tag").map(str::to_string) {
      self.on_tag_chip_click(document, &tag);
    }
    true
  }

  /// Replace the selection with the tags of the location the browser moved to.
  pub fn on_history_navigate<D>(&mut self, document: &mut D)
  where
    D: Document + ?Sized,
    W: TagWidget<D>,
  {
    let tags = tags_from_url(self.history.location(), &self.tags_param);
    self.replace_selection(document, tags);
  }

  /// The authoritative selection, in selection order.
  pub fn selection(&self) -> &[String] {
    &self.selection
  }

  /// The history collaborator.
  pub fn history(&self) -> &H {
    &self.history
  }

  /// Mutable access to the history collaborator, e.g. to drive back and forward.
  pub fn history_mut(&mut self) -> &mut H {
    &mut self.history
  }

  /// The widget collaborator.
  pub fn widget(&self) -> &W {
    &self.widget
  }

  fn replace_selection<D>(&mut self, document: &mut D, tags: Vec<String>)
  where
    D: Document + ?Sized,
    W: TagWidget<D>,
  {
    self.selection = dedup(tags);
    self.sync_widget(document);
    self.propagate(document);
  }

  fn sync_widget<D>(&mut self, document: &mut D)
  where
    D: Document + ?Sized,
    W: TagWidget<D>,
  {
    self.widget.set_value(document, &self.selection);
    self.widget.notify_updated(document);
  }

  fn propagate<D: Document + ?Sized>(&mut self, document: &mut D) {
    self.write_location();
    let hidden = apply_card_visibility(document, &self.selection);
    tracing::debug!(selection = ?self.selection, hidden, "tag filter applied");
  }

  fn write_location(&mut self) {
    let current = self.history.location();
    // Navigating to a location already describing the selection must not push a duplicate,
    // otherwise back/forward would clear the forward entries.
    if tags_from_url(current, &self.tags_param) == self.selection {
      return;
    }
    let next = url_with_tags(current, &self.tags_param, &self.selection);
    self.history.push(next);
  }
}

/// Tags listed in a card's `data-tags`; a card without the attribute has none.
pub fn card_tags<D: Document + ?Sized>(document: &D, card: ElementId) -> Vec<&str> {
  document
    .attribute(card, "data-tags")
    .map(|tags| tags.split(',').collect())
    .unwrap_or_default()
}

/// Whether a card with `tags` is shown for `selection`.
pub fn is_card_visible(tags: &[&str], selection: &[String]) -> bool {
  selection.is_empty() || selection.iter().any(|selected| tags.contains(&selected.as_str()))
}

/// Show or hide every card for `selection`, returning the number of hidden cards.
pub fn apply_card_visibility<D: Document + ?Sized>(
  document: &mut D,
  selection: &[String],
) -> usize {
  let mut hidden = 0;
  for card in document.query_all(&Selector::from(Compound::class(CARD_CLASS))) {
    let visible = is_card_visible(&card_tags(document, card), selection);
    document.set_hidden(card, !visible);
    if !visible {
      hidden += 1;
    }
  }
  hidden
}

fn dedup(tags: Vec<String>) -> Vec<String> {
  let mut unique: Vec<String> = Vec::with_capacity(tags.len());
  for tag in tags {
    if !unique.contains(&tag) {
      unique.push(tag);
    }
  }
  unique
}

#[cfg(test)]
mod tests {
  use url::Url;

  use super::*;
  use crate::dom::Page;
  use crate::filter::{MemoryHistory, SelectWidget};

  const GALLERY: &str = r#"
    <select class="tag-filter" multiple>
      <option value="ai">AI</option>
      <option value="ml">ML</option>
      <option value="robotics">Robotics</option>
      <option value="security">Security</option>
      <option value="web">Web</option>
      <option value="x">X</option>
      <option value="y">Y</option>
    </select>
    <div class="card" id="one" data-tags="ai,ml"><span class="tag" data-tag="security"><b>security</b></span></div>
    <div class="card" id="two" data-tags="web"><span class="tag" data-tag="web">web</span></div>
    <div class="card" id="three" data-tags="security,x"></div>
    <div class="card" id="four"></div>
  "#;

  type Controller = TagFilterController<SelectWidget, MemoryHistory>;

  fn start(url: &str) -> (Page, Controller) {
    let mut page = Page::parse(GALLERY);
    let widget = SelectWidget::attach(&page).unwrap();
    let history = MemoryHistory::new(Url::parse(url).unwrap());
    let controller = TagFilterController::init(&mut page, widget, history, "tags");
    (page, controller)
  }

  fn visible_ids(page: &Page) -> Vec<String> {
    page
      .query_all(&Selector::from(Compound::class(CARD_CLASS)))
      .into_iter()
      .filter(|&card| !page.is_hidden(card))
      .filter_map(|card| page.attribute(card, "id").map(str::to_string))
      .collect()
  }

  fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
  }

  fn assert_consistent(page: &Page, controller: &Controller) {
    let selection = controller.selection().to_vec();
    assert_eq!(tags_from_url(controller.history().location(), "tags"), selection);

    let mut shown = controller.widget().value(page);
    let mut expected = selection.clone();
    shown.sort();
    expected.sort();
    assert_eq!(shown, expected);

    for card in page.query_all(&Selector::from(Compound::class(CARD_CLASS))) {
      let visible = is_card_visible(&card_tags(page, card), &selection);
      assert_eq!(page.is_hidden(card), !visible);
    }
  }

  #[test]
  fn init_restores_selection_from_url() {
    let (page, controller) = start("https://site.dev/use-cases/gallery/?tags=ai,robotics");

    assert_eq!(controller.selection(), strings(&["ai", "robotics"]).as_slice());
    assert_eq!(controller.widget().value(&page), strings(&["ai", "robotics"]));
    assert_eq!(visible_ids(&page), vec!["one"]);
    assert_eq!(controller.history().len(), 1);
    assert_consistent(&page, &controller);
  }

  #[test]
  fn init_without_parameter_leaves_page_untouched() {
    let (page, controller) = start("https://site.dev/use-cases/gallery/");

    assert!(controller.selection().is_empty());
    assert!(!page.is_modified());
    assert_eq!(controller.history().len(), 1);
  }

  #[test]
  fn chip_click_adds_tag_and_pushes_url() {
    let (mut page, mut controller) = start("https://site.dev/use-cases/gallery/");
    controller.handle(&mut page, FilterEvent::TagChipClick("security".into()));

    assert_eq!(
      controller.history().location().as_str(),
      "https://site.dev/use-cases/gallery/?tags=security"
    );
    assert_eq!(controller.widget().value(&page), strings(&["security"]));
    assert_eq!(visible_ids(&page), vec!["three"]);
    assert_consistent(&page, &controller);
  }

  #[test]
  fn chip_clicks_are_idempotent() {
    let (mut page, mut controller) = start("https://site.dev/g/");
    controller.on_tag_chip_click(&mut page, "web");
    let once = controller.selection().to_vec();
    let entries = controller.history().len();

    controller.on_tag_chip_click(&mut page, "web");
    assert_eq!(controller.selection(), once.as_slice());
    assert_eq!(controller.history().len(), entries);
  }

  #[test]
  fn chip_clicks_append_in_click_order() {
    let (mut page, mut controller) = start("https://site.dev/g/?tags=web");
    controller.on_tag_chip_click(&mut page, "ai");
    assert_eq!(controller.selection(), strings(&["web", "ai"]).as_slice());
    assert_eq!(tags_from_url(controller.history().location(), "tags"), strings(&["web", "ai"]));
    assert_eq!(visible_ids(&page), vec!["one", "two"]);
  }

  #[test]
  fn clicks_inside_a_chip_resolve_its_tag() {
    let (mut page, mut controller) = start("https://site.dev/g/");
    let bold = page.query(&Selector::from(Compound::tag("b"))).unwrap();
    assert!(controller.on_element_click(&mut page, bold));
    assert_eq!(controller.selection(), strings(&["security"]).as_slice());

    let card = page.query(&Selector::from(Compound::class(CARD_CLASS))).unwrap();
    assert!(!controller.on_element_click(&mut page, card));
  }

  #[test]
  fn widget_change_replaces_selection() {
    let (mut page, mut controller) = start("https://site.dev/g/?tags=ai");
    let mut widget = *controller.widget();
    widget.set_value(&mut page, &strings(&["web", "x"]));
    controller.handle(&mut page, FilterEvent::WidgetChange);

    assert_eq!(controller.selection(), strings(&["web", "x"]).as_slice());
    assert_eq!(visible_ids(&page), vec!["two", "three"]);
    assert_consistent(&page, &controller);
  }

  #[test]
  fn clearing_the_widget_shows_every_card_and_drops_parameter() {
    let (mut page, mut controller) = start("https://site.dev/g/?tags=ai&view=grid");
    let mut widget = *controller.widget();
    widget.set_value(&mut page, &[]);
    controller.on_widget_change(&mut page);

    assert!(controller.selection().is_empty());
    assert_eq!(controller.history().location().as_str(), "https://site.dev/g/?view=grid");
    assert_eq!(visible_ids(&page), vec!["one", "two", "three", "four"]);
  }

  #[test]
  fn back_to_unfiltered_state_clears_selection() {
    let (mut page, mut controller) = start("https://site.dev/g/");
    controller.on_tag_chip_click(&mut page, "x");
    controller.on_tag_chip_click(&mut page, "y");
    assert_eq!(controller.selection(), strings(&["x", "y"]).as_slice());

    assert!(controller.history_mut().back());
    assert!(controller.history_mut().back());
    controller.handle(&mut page, FilterEvent::HistoryNavigate);

    assert!(controller.selection().is_empty());
    assert_eq!(visible_ids(&page), vec!["one", "two", "three", "four"]);
    assert_consistent(&page, &controller);

    assert!(controller.history_mut().forward());
    controller.handle(&mut page, FilterEvent::HistoryNavigate);
    assert_eq!(controller.selection(), strings(&["x"]).as_slice());
    assert_eq!(controller.history().len(), 3);
  }

  #[test]
  fn propagated_url_round_trips_through_init() {
    let (mut page, mut controller) = start("https://site.dev/g/");
    controller.on_tag_chip_click(&mut page, "b");
    controller.on_tag_chip_click(&mut page, "a");
    let written = controller.history().location().as_str().to_string();

    let (_, restored) = start(&written);
    assert_eq!(restored.selection(), strings(&["b", "a"]).as_slice());
  }

  #[test]
  fn visibility_law() {
    let selections: [&[&str]; 4] = [&[], &["ai"], &["web", "nope"], &["nope"]];
    let cards: [&[&str]; 3] = [&["ai", "ml"], &["web"], &[]];
    for selection in selections {
      let selection = strings(selection);
      for tags in cards {
        let expected = selection.is_empty()
          || tags.iter().any(|tag| selection.iter().any(|s| s.as_str() == *tag));
        assert_eq!(is_card_visible(tags, &selection), expected);
      }
    }
  }
}
