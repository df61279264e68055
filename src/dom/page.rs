//! In-memory document parsed from rendered HTML.
//!
//! The tokenizer only understands what generated documentation markup needs: start and end
//! tags, attributes, comments, declarations and raw-text elements. Rendering splices
//! regenerated start tags for modified elements into the parsed source, so untouched
//! markup round-trips byte for byte.

use std::ops::Range;
use std::sync::OnceLock;

use regex::Regex;

use super::{Document, ElementId};

const VOID_ELEMENTS: &[&str] = &[
  "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
  "track", "wbr",
];

const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style", "textarea", "title"];

fn markup_pattern() -> &'static Regex {
  static PATTERN: OnceLock<Regex> = OnceLock::new();
  PATTERN.get_or_init(|| {
    // Start tags are matched attribute by attribute; unquoted values run to whitespace or
    // `>` and may contain quote characters.
    Regex::new(concat!(
      r#"(?s)<!--.*?-->|<[!?][^>]*>|</([A-Za-z][A-Za-z0-9:-]*)\s*>"#,
      r#"|<([A-Za-z][A-Za-z0-9:-]*)"#,
      r#"((?:\s*[^\s"'>/=]+(?:\s*=\s*(?:"[^"]*"|'[^']*'|[^\s>]+))?|\s*/|\s+)*)>"#,
    ))
    .expect("invalid markup regex")
  })
}

fn attribute_pattern() -> &'static Regex {
  static PATTERN: OnceLock<Regex> = OnceLock::new();
  PATTERN.get_or_init(|| {
    Regex::new(r#"([^\s"'>/=]+)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s>]+)))?"#)
      .expect("invalid attribute regex")
  })
}

#[derive(Debug, Clone)]
struct Attribute {
  name: String,
  value: String,
}

#[derive(Debug, Clone)]
struct Element {
  tag: String,
  attributes: Vec<Attribute>,
  parent: Option<ElementId>,
  start_tag: Range<usize>,
  self_closing: bool,
  modified: bool,
}

/// Parsed HTML page implementing [`Document`].
///
/// Attribute values are kept exactly as written, character references included.
#[derive(Debug, Clone)]
pub struct Page {
  source: String,
  elements: Vec<Element>,
}

impl Page {
  /// Parse rendered HTML. Unbalanced end tags are ignored and unclosed elements are closed at
  /// the end of the input, so the result is always a usable tree.
  pub fn parse(html: &str) -> Self {
    let mut elements: Vec<Element> = Vec::new();
    let mut open: Vec<ElementId> = Vec::new();
    let mut position = 0;

    while let Some(captures) = markup_pattern().captures_at(html, position) {
      let whole = captures.get(0).expect("match has a full capture");
      position = whole.end();

      if let Some(end_tag) = captures.get(1) {
        let tag = end_tag.as_str().to_ascii_lowercase();
        if let Some(index) = open.iter().rposition(|id| elements[id.0].tag == tag) {
          open.truncate(index);
        }
        continue;
      }

      let Some(start_tag) = captures.get(2) else {
        continue;
      };
      let tag = start_tag.as_str().to_ascii_lowercase();
      let raw_attributes = captures.get(3).map_or("", |m| m.as_str());
      let self_closing = raw_attributes.trim_end().ends_with('/');

      let id = ElementId(elements.len());
      elements.push(Element {
        attributes: parse_attributes(raw_attributes),
        parent: open.last().copied(),
        start_tag: whole.range(),
        self_closing,
        modified: false,
        tag: tag.clone(),
      });

      if RAW_TEXT_ELEMENTS.contains(&tag.as_str()) {
        position = raw_text_end(html, position, &tag);
        continue;
      }

      if !self_closing && !VOID_ELEMENTS.contains(&tag.as_str()) {
        open.push(id);
      }
    }

    Self {
      source: html.to_string(),
      elements,
    }
  }

  /// Whether any element has been modified since parsing.
  pub fn is_modified(&self) -> bool {
    self.elements.iter().any(|element| element.modified)
  }

  /// Serialize the page, regenerating only the start tags of modified elements.
  pub fn render(&self) -> String {
    let mut output = String::with_capacity(self.source.len());
    let mut cursor = 0;

    for element in self.elements.iter().filter(|element| element.modified) {
      output.push_str(&self.source[cursor..element.start_tag.start]);
      output.push_str(&render_start_tag(element));
      cursor = element.start_tag.end;
    }

    output.push_str(&self.source[cursor..]);
    output
  }

  fn element(&self, id: ElementId) -> &Element {
    &self.elements[id.0]
  }

  fn element_mut(&mut self, id: ElementId) -> &mut Element {
    &mut self.elements[id.0]
  }
}

impl Document for Page {
  fn elements(&self) -> Vec<ElementId> {
    (0..self.elements.len()).map(ElementId).collect()
  }

  fn tag_name(&self, element: ElementId) -> &str {
    &self.element(element).tag
  }

  fn parent(&self, element: ElementId) -> Option<ElementId> {
    self.element(element).parent
  }

  fn attribute(&self, element: ElementId, name: &str) -> Option<&str> {
    self
      .element(element)
      .attributes
      .iter()
      .find(|attribute| attribute.name.eq_ignore_ascii_case(name))
      .map(|attribute| attribute.value.as_str())
  }

  fn set_attribute(&mut self, element: ElementId, name: &str, value: &str) {
    let element = self.element_mut(element);
    match element
      .attributes
      .iter()
      .position(|attribute| attribute.name.eq_ignore_ascii_case(name))
    {
      Some(index) if element.attributes[index].value == value => return,
      Some(index) => element.attributes[index].value = value.to_string(),
      None => element.attributes.push(Attribute {
        name: name.to_ascii_lowercase(),
        value: value.to_string(),
      }),
    }
    element.modified = true;
  }

  fn remove_attribute(&mut self, element: ElementId, name: &str) {
    let element = self.element_mut(element);
    let before = element.attributes.len();
    element
      .attributes
      .retain(|attribute| !attribute.name.eq_ignore_ascii_case(name));
    if element.attributes.len() != before {
      element.modified = true;
    }
  }
}

fn parse_attributes(raw: &str) -> Vec<Attribute> {
  let mut attributes: Vec<Attribute> = Vec::new();
  for captures in attribute_pattern().captures_iter(raw) {
    let name = captures[1].to_ascii_lowercase();
    // Duplicate attributes keep the first occurrence, as browsers do.
    if attributes.iter().any(|attribute| attribute.name == name) {
      continue;
    }
    let value = captures
      .get(2)
      .or_else(|| captures.get(3))
      .or_else(|| captures.get(4))
      .map_or(String::new(), |m| m.as_str().to_string());
    attributes.push(Attribute { name, value });
  }
  attributes
}

fn raw_text_end(html: &str, from: usize, tag: &str) -> usize {
  let closing = format!("</{tag}");
  html[from..]
    .to_ascii_lowercase()
    .find(&closing)
    .map_or(html.len(), |offset| from + offset)
}

fn render_start_tag(element: &Element) -> String {
  let mut tag = format!("<{}", element.tag);
  for attribute in &element.attributes {
    tag.push(' ');
    tag.push_str(&attribute.name);
    if attribute.value.is_empty() {
      continue;
    }
    if attribute.value.contains('"') {
      tag.push_str(&format!("='{}'", attribute.value));
    } else {
      tag.push_str(&format!("=\"{}\"", attribute.value));
    }
  }
  if element.self_closing {
    tag.push_str(" /");
  }
  tag.push('>');
  tag
}
