//! Tag filtering for card galleries, kept in sync with the `tags` query parameter.

mod controller;
mod history;
mod query;
mod widget;

pub use controller::{
  CARD_CLASS, FilterEvent, TAG_CHIP_CLASS, TagFilterController, apply_card_visibility, card_tags,
  is_card_visible,
};
pub use history::{History, MemoryHistory};
pub use query::{tags_from_url, url_with_tags};
pub use widget::{SelectWidget, TAG_FILTER_CLASS, TagWidget};

/// Failures that disable tag filtering without affecting the rest of the page.
#[derive(Debug, thiserror::Error)]
pub enum FilterError {
  /// The multi-select widget could not be attached.
  #[error("tag filter widget `{0}` is not available")]
  WidgetUnavailable(String),
}
