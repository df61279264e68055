use url::Url;

/// Browser navigation primitives the tag filter relies on.
pub trait History {
  /// The current location.
  fn location(&self) -> &Url;

  /// Push a new entry without reloading the page.
  fn push(&mut self, url: Url);
}

/// Session history kept in memory, with back and forward traversal.
#[derive(Debug, Clone)]
pub struct MemoryHistory {
  entries: Vec<Url>,
  index: usize,
}

impl MemoryHistory {
  /// Start a session at `url`.
  pub fn new(url: Url) -> Self {
    Self {
      entries: vec![url],
      index: 0,
    }
  }

  /// Step back one entry. Returns `false` at the start of the session.
  pub fn back(&mut self) -> bool {
    if self.index == 0 {
      return false;
    }
    self.index -= 1;
    true
  }

  /// Step forward one entry. Returns `false` at the newest entry.
  pub fn forward(&mut self) -> bool {
    if self.index + 1 >= self.entries.len() {
      return false;
    }
    self.index += 1;
    true
  }

  /// Number of entries in the session.
  pub fn len(&self) -> usize {
    self.entries.len()
  }

  /// Whether the session has no entries; never true since a session starts at a location.
  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }
}

impl History for MemoryHistory {
  fn location(&self) -> &Url {
    &self.entries[self.index]
  }

  fn push(&mut self, url: Url) {
    self.entries.truncate(self.index + 1);
    self.entries.push(url);
    self.index = self.entries.len() - 1;
  }
}
