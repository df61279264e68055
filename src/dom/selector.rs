use super::{Document, ElementId};

/// Attribute condition of a [`Compound`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeTest {
  /// `[name]`
  Exists(String),
  /// `[name="value"]`
  Equals(String, String),
  /// `[name^="a"], [name^="b"]` folded into one test.
  StartsWithAny(String, Vec<String>),
}

impl AttributeTest {
  fn matches<D: Document + ?Sized>(&self, document: &D, element: ElementId) -> bool {
    match self {
      Self::Exists(name) => document.attribute(element, name).is_some(),
      Self::Equals(name, expected) => document.attribute(element, name) == Some(expected.as_str()),
      Self::StartsWithAny(name, prefixes) => document
        .attribute(element, name)
        .is_some_and(|value| prefixes.iter().any(|prefix| value.starts_with(prefix.as_str()))),
    }
  }
}

/// A single compound selector such as `nav.md-post__action` or `img[src]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Compound {
  tag: Option<String>,
  classes: Vec<String>,
  attributes: Vec<AttributeTest>,
}

impl Compound {
  /// Matches every element.
  pub fn any() -> Self {
    Self::default()
  }

  /// Matches elements with the given tag name.
  pub fn tag(tag: &str) -> Self {
    Self {
      tag: Some(tag.to_ascii_lowercase()),
      ..Self::default()
    }
  }

  /// Matches elements carrying the given class.
  pub fn class(class: &str) -> Self {
    Self::any().with_class(class)
  }

  /// Additionally require `class`.
  pub fn with_class(mut self, class: &str) -> Self {
    self.classes.push(class.to_string());
    self
  }

  /// Additionally require the attribute to be present.
  pub fn with_attr(mut self, name: &str) -> Self {
    self.attributes.push(AttributeTest::Exists(name.to_string()));
    self
  }

  /// Additionally require an exact attribute value.
  pub fn with_attr_eq(mut self, name: &str, value: &str) -> Self {
    self
      .attributes
      .push(AttributeTest::Equals(name.to_string(), value.to_string()));
    self
  }

  /// Additionally require the attribute to start with one of `prefixes`.
  pub fn with_attr_prefix(mut self, name: &str, prefixes: &[&str]) -> Self {
    self.attributes.push(AttributeTest::StartsWithAny(
      name.to_string(),
      prefixes.iter().map(|prefix| prefix.to_string()).collect(),
    ));
    self
  }

  /// Whether `element` satisfies the tag, class and attribute conditions.
  pub fn matches<D: Document + ?Sized>(&self, document: &D, element: ElementId) -> bool {
    if let Some(tag) = &self.tag
      && document.tag_name(element) != tag.as_str()
    {
      return false;
    }

    self
      .classes
      .iter()
      .all(|class| document.has_class(element, class))
      && self
        .attributes
        .iter()
        .all(|test| test.matches(document, element))
  }
}

/// Subject compound plus the descendant and negation constraints the page patches need.
///
/// Covers selectors of the form `scope subject:not(a):not(b):not(parent > *)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
  subject: Compound,
  within: Option<Compound>,
  excluding: Vec<Compound>,
  not_child_of: Vec<Compound>,
}

impl Selector {
  /// Selector matching `subject` anywhere in the document.
  pub fn new(subject: Compound) -> Self {
    Self {
      subject,
      within: None,
      excluding: Vec::new(),
      not_child_of: Vec::new(),
    }
  }

  /// Require an ancestor matching `scope`.
  pub fn within(mut self, scope: Compound) -> Self {
    self.within = Some(scope);
    self
  }

  /// Reject subjects that also match `compound`.
  pub fn excluding(mut self, compound: Compound) -> Self {
    self.excluding.push(compound);
    self
  }

  /// Reject subjects whose direct parent matches `parent`.
  pub fn not_child_of(mut self, parent: Compound) -> Self {
    self.not_child_of.push(parent);
    self
  }

  /// Whether `element` matches the subject and every constraint.
  pub fn matches<D: Document + ?Sized>(&self, document: &D, element: ElementId) -> bool {
    if !self.subject.matches(document, element) {
      return false;
    }

    if self
      .excluding
      .iter()
      .any(|compound| compound.matches(document, element))
    {
      return false;
    }

    let parent = document.parent(element);
    if let Some(parent) = parent
      && self
        .not_child_of
        .iter()
        .any(|compound| compound.matches(document, parent))
    {
      return false;
    }

    match &self.within {
      Some(scope) => parent.is_some_and(|parent| document.closest(parent, scope).is_some()),
      None => true,
    }
  }
}

impl From<Compound> for Selector {
  fn from(subject: Compound) -> Self {
    Self::new(subject)
  }
}
