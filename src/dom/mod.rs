//! Element query capability shared by the path rewriter, the tag filter and the page patches.
//!
//! Everything that reads or mutates markup goes through the [`Document`] trait so the same
//! logic runs against a parsed [`Page`] at build time or a browser binding at runtime.

mod page;
mod selector;

pub use page::Page;
pub use selector::{AttributeTest, Compound, Selector};

/// Opaque handle to an element owned by a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub(crate) usize);

/// Minimal DOM surface the augmentation logic depends on.
pub trait Document {
  /// All elements in document order.
  fn elements(&self) -> Vec<ElementId>;

  /// Lower-case tag name of the element.
  fn tag_name(&self, element: ElementId) -> &str;

  /// Parent element, `None` for top-level elements.
  fn parent(&self, element: ElementId) -> Option<ElementId>;

  /// Attribute value; bare attributes read as the empty string.
  fn attribute(&self, element: ElementId, name: &str) -> Option<&str>;

  /// Set or replace an attribute value.
  fn set_attribute(&mut self, element: ElementId, name: &str, value: &str);

  /// Remove an attribute; absent attributes are ignored.
  fn remove_attribute(&mut self, element: ElementId, name: &str);

  /// Elements matching `selector`, in document order.
  fn query_all(&self, selector: &Selector) -> Vec<ElementId> {
    self
      .elements()
      .into_iter()
      .filter(|&element| selector.matches(self, element))
      .collect()
  }

  /// First element matching `selector`.
  fn query(&self, selector: &Selector) -> Option<ElementId> {
    self
      .elements()
      .into_iter()
      .find(|&element| selector.matches(self, element))
  }

  /// The element itself or its nearest ancestor matching `compound`.
  fn closest(&self, element: ElementId, compound: &Compound) -> Option<ElementId> {
    let mut current = Some(element);
    while let Some(candidate) = current {
      if compound.matches(self, candidate) {
        return Some(candidate);
      }
      current = self.parent(candidate);
    }
    None
  }

  /// Whether the element's `class` list contains `class`.
  fn has_class(&self, element: ElementId, class: &str) -> bool {
    self
      .attribute(element, "class")
      .is_some_and(|classes| classes.split_ascii_whitespace().any(|value| value == class))
  }

  /// Append `class` to the element's class list unless already present.
  fn add_class(&mut self, element: ElementId, class: &str) {
    if self.has_class(element, class) {
      return;
    }
    let updated = match self.attribute(element, "class") {
      Some(existing) if !existing.trim().is_empty() => format!("{} {class}", existing.trim()),
      _ => class.to_string(),
    };
    self.set_attribute(element, "class", &updated);
  }

  /// Value of one inline `style` declaration.
  fn style_property(&self, element: ElementId, property: &str) -> Option<&str> {
    let style = self.attribute(element, "style")?;
    style_declarations(style)
      .into_iter()
      .find(|(name, _)| name.eq_ignore_ascii_case(property))
      .map(|(_, value)| value)
  }

  /// Set (`Some`) or drop (`None`) one inline `style` declaration, keeping the others.
  fn set_style_property(&mut self, element: ElementId, property: &str, value: Option<&str>) {
    if self.style_property(element, property) == value {
      return;
    }
    let existing = self.attribute(element, "style").unwrap_or_default();
    let mut declarations: Vec<String> = style_declarations(existing)
      .into_iter()
      .filter(|(name, _)| !name.eq_ignore_ascii_case(property))
      .map(|(name, current)| format!("{name}: {current}"))
      .collect();
    if let Some(value) = value {
      declarations.push(format!("{property}: {value}"));
    }

    if declarations.is_empty() {
      self.remove_attribute(element, "style");
    } else {
      self.set_attribute(element, "style", &declarations.join("; "));
    }
  }

  /// Show or hide the element through an inline `display: none` declaration.
  fn set_hidden(&mut self, element: ElementId, hidden: bool) {
    if hidden {
      self.set_style_property(element, "display", Some("none"));
    } else if self.is_hidden(element) {
      self.set_style_property(element, "display", None);
    }
  }

  /// Whether the element is hidden by an inline `display: none` declaration.
  fn is_hidden(&self, element: ElementId) -> bool {
    self
      .style_property(element, "display")
      .is_some_and(|display| display.eq_ignore_ascii_case("none"))
  }
}

/// Split an inline style into trimmed `(property, value)` pairs.
///
/// Semicolons inside quotes or parentheses (`url(data:...;base64,...)`) do not end a
/// declaration. Chunks without a colon are dropped.
fn style_declarations(style: &str) -> Vec<(&str, &str)> {
  fn declaration(chunk: &str) -> Option<(&str, &str)> {
    let (name, value) = chunk.split_once(':')?;
    let name = name.trim();
    (!name.is_empty()).then(|| (name, value.trim()))
  }

  let mut declarations = Vec::new();
  let mut depth = 0usize;
  let mut quote: Option<char> = None;
  let mut start = 0;
  for (index, ch) in style.char_indices() {
    match (quote, ch) {
      (Some(open), _) if ch == open => quote = None,
      (Some(_), _) => {}
      (None, '"' | '\'') => quote = Some(ch),
      (None, '(') => depth += 1,
      (None, ')') => depth = depth.saturating_sub(1),
      (None, ';') if depth == 0 => {
        declarations.extend(declaration(&style[start..index]));
        start = index + 1;
      }
      _ => {}
    }
  }
  declarations.extend(declaration(&style[start..]));
  declarations
}
