use crate::dom::{Compound, Document, ElementId, Selector};

use super::FilterError;

/// Multi-select collaborator displaying the current tag selection.
///
/// The document is passed on every call because a markup-backed widget keeps its state in
/// the page itself; script-backed widgets can ignore it.
pub trait TagWidget<D: Document + ?Sized> {
  /// Tags currently selected in the widget.
  fn value(&self, document: &D) -> Vec<String>;

  /// Replace the displayed selection.
  fn set_value(&mut self, document: &mut D, tags: &[String]);

  /// Tell the widget its value changed programmatically so it can redraw.
  fn notify_updated(&mut self, _document: &mut D) {}
}

/// Class of the `<select multiple>` element enhanced into the tag filter.
pub const TAG_FILTER_CLASS: &str = "tag-filter";

/// Widget backed by a `select.tag-filter` element whose options carry `selected`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectWidget {
  select: ElementId,
}

impl SelectWidget {
  /// Attach to the first `select.tag-filter` in the document.
  pub fn attach<D: Document + ?Sized>(document: &D) -> Result<Self, FilterError> {
    let selector = Selector::from(Compound::tag("select").with_class(TAG_FILTER_CLASS));
    document
      .query(&selector)
      .map(|select| Self { select })
      .ok_or_else(|| FilterError::WidgetUnavailable(format!("select.{TAG_FILTER_CLASS}")))
  }

  fn options<D: Document + ?Sized>(&self, document: &D) -> Vec<ElementId> {
    let select = Compound::tag("select");
    document
      .query_all(&Selector::from(Compound::tag("option")))
      .into_iter()
      .filter(|&option| {
        document
          .parent(option)
          .and_then(|parent| document.closest(parent, &select))
          == Some(self.select)
      })
      .collect()
  }
}

impl<D: Document + ?Sized> TagWidget<D> for SelectWidget {
  fn value(&self, document: &D) -> Vec<String> {
    self
      .options(document)
      .into_iter()
      .filter(|&option| document.attribute(option, "selected").is_some())
      .filter_map(|option| document.attribute(option, "value").map(str::to_string))
      .collect()
  }

  fn set_value(&mut self, document: &mut D, tags: &[String]) {
    for option in self.options(document) {
      let selected = document
        .attribute(option, "value")
        .is_some_and(|value| tags.iter().any(|tag| tag == value));
      if selected {
        document.set_attribute(option, "selected", "");
      } else {
        document.remove_attribute(option, "selected");
      }
    }
  }

  fn notify_updated(&mut self, _document: &mut D) {
    tracing::trace!("tag filter options updated");
  }
}
