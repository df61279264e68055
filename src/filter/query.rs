use url::Url;

/// Read the comma separated tag list from the first `param` occurrence of the query string.
///
/// A missing or empty parameter yields an empty list, and empty entries are dropped.
pub fn tags_from_url(url: &Url, param: &str) -> Vec<String> {
  url
    .query_pairs()
    .find(|(key, _)| key == param)
    .map(|(_, value)| {
      value
        .split(',')
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
    })
    .unwrap_or_default()
}

/// Return `url` with `param` set to the comma joined `tags`, or removed when `tags` is empty.
///
/// Other parameters keep their order; the first `param` occurrence keeps its position and
/// later duplicates are dropped. The fragment is discarded.
pub fn url_with_tags(url: &Url, param: &str, tags: &[String]) -> Url {
  let mut pairs: Vec<(String, String)> = Vec::new();
  let mut placed = false;

  for (key, value) in url.query_pairs() {
    if key != param {
      pairs.push((key.into_owned(), value.into_owned()));
    } else if !placed && !tags.is_empty() {
      pairs.push((key.into_owned(), tags.join(",")));
      placed = true;
    }
  }

  if !placed && !tags.is_empty() {
    pairs.push((param.to_string(), tags.join(",")));
  }

  let mut updated = url.clone();
  updated.set_fragment(None);
  if pairs.is_empty() {
    updated.set_query(None);
  } else {
    updated.query_pairs_mut().clear().extend_pairs(pairs);
  }
  updated
}
