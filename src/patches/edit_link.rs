use crate::dom::{Compound, Document, Selector};

const EDIT_LINK_TITLE: &str = "Edit this page";
const HIDDEN_EDIT_LINK_CLASS: &str = "hide-edit-link";
const NOTEBOOK_SOURCE: &str = "/website/docs/use-cases/notebooks/notebooks/";
const BLOG_SOURCE: &str = "/blog/posts/";
const USER_STORIES_SOURCE: &str = "/docs/user-stories/";

/// Point an "edit this page" URL at the file that actually holds the source.
///
/// Returns `None` when the URL already points at the right file.
pub fn rewrite_edit_href(href: &str) -> Option<String> {
  if href.contains(NOTEBOOK_SOURCE) {
    let moved = href.replacen(NOTEBOOK_SOURCE, "/notebook/", 1);
    return Some(replace_extension(&moved, ".ipynb"));
  }

  if href.contains(BLOG_SOURCE) {
    let moved = href.replacen(BLOG_SOURCE, "/_blogs/", 1);
    return Some(replace_extension(&moved, ".mdx"));
  }

  if href.contains(USER_STORIES_SOURCE) {
    let rewritten = match href.rsplit_once('/') {
      Some((parent, _)) => format!("{parent}/index.mdx"),
      None => "index.mdx".to_string(),
    };
    return (rewritten != href).then_some(rewritten);
  }

  href
    .ends_with(".md")
    .then(|| replace_extension(href, ".mdx"))
}

fn replace_extension(href: &str, extension: &str) -> String {
  match href.strip_suffix(".md") {
    Some(stem) => format!("{stem}{extension}"),
    None => href.to_string(),
  }
}

/// Outcome of patching the edit link of a page.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct EditLinkPatch {
  /// The link was marked hidden.
  pub hidden: bool,
  /// The link target was rewritten.
  pub rewritten: bool,
}

/// Hide the edit link on API reference pages and fix its target everywhere.
pub fn fix_edit_link<D: Document + ?Sized>(
  document: &mut D,
  page_path: &str,
  api_reference_fragment: &str,
) -> EditLinkPatch {
  let selector = Selector::from(Compound::tag("a").with_attr_eq("title", EDIT_LINK_TITLE));
  let Some(link) = document.query(&selector) else {
    return EditLinkPatch::default();
  };

  let mut patch = EditLinkPatch::default();
  if page_path.contains(api_reference_fragment)
    && !document.has_class(link, HIDDEN_EDIT_LINK_CLASS)
  {
    document.add_class(link, HIDDEN_EDIT_LINK_CLASS);
    patch.hidden = true;
  }

  if let Some(updated) = document.attribute(link, "href").and_then(rewrite_edit_href) {
    tracing::debug!(href = %updated, "rewriting edit link");
    document.set_attribute(link, "href", &updated);
    patch.rewritten = true;
  }

  patch
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::dom::Page;

  const REPO: &str = "https://github.com/org/repo/edit/main";

  #[test]
  fn notebooks_point_at_ipynb_sources() {
    assert_eq!(
      rewrite_edit_href(&format!(
        "{REPO}/website/docs/use-cases/notebooks/notebooks/agentchat_auto.md"
      )),
      Some(format!("{REPO}/notebook/agentchat_auto.ipynb"))
    );
  }

  #[test]
  fn blog_posts_point_at_mdx_sources() {
    assert_eq!(
      rewrite_edit_href(&format!("{REPO}/website/blog/posts/2024-01-01-hello/index.md")),
      Some(format!("{REPO}/website/_blogs/2024-01-01-hello/index.mdx"))
    );
  }

  #[test]
  fn user_stories_point_at_index_mdx() {
    assert_eq!(
      rewrite_edit_href(&format!("{REPO}/website/docs/user-stories/2025-02-01-story/story.md")),
      Some(format!("{REPO}/website/docs/user-stories/2025-02-01-story/index.mdx"))
    );
    assert_eq!(
      rewrite_edit_href(&format!("{REPO}/website/docs/user-stories/x/index.mdx")),
      None
    );
  }

  #[test]
  fn markdown_becomes_mdx() {
    assert_eq!(
      rewrite_edit_href(&format!("{REPO}/website/docs/intro.md")),
      Some(format!("{REPO}/website/docs/intro.mdx"))
    );
    assert_eq!(rewrite_edit_href(&format!("{REPO}/website/docs/intro.mdx")), None);
    assert_eq!(rewrite_edit_href(&format!("{REPO}/website/docs/readme.md.bak")), None);
  }

  #[test]
  fn hides_link_on_api_reference_pages() {
    let mut page = Page::parse(
      r#"<a class="md-icon" title="Edit this page" href="https://x/y/docs/api.md">e</a>"#,
    );
    let page_path = "/docs/api-reference/autogen/Agent/";
    let patch = fix_edit_link(&mut page, page_path, "/docs/api-reference/");

    assert_eq!(patch, EditLinkPatch { hidden: true, rewritten: true });
    assert_eq!(
      page.render(),
      r#"<a class="md-icon hide-edit-link" title="Edit this page" href="https://x/y/docs/api.mdx">e</a>"#
    );

    let again = fix_edit_link(&mut page, page_path, "/docs/api-reference/");
    assert_eq!(again, EditLinkPatch::default());
  }

  #[test]
  fn pages_without_edit_link_are_ignored() {
    let mut page = Page::parse(r#"<a title="Edit" href="x.md">e</a>"#);
    let patch = fix_edit_link(&mut page, "/docs/", "/docs/api-reference/");
    assert_eq!(patch, EditLinkPatch::default());
    assert!(!page.is_modified());
  }
}
