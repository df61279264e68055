//! Relative path correction for content syndicated onto blog listing pages.
//!
//! Blog listings re-host post bodies at a different directory depth than the post itself,
//! which breaks every relative `src` and `href`. The submodules split the pure depth
//! calculation, the page classification and the element rewriting so each can be tested
//! without markup.

mod detect;
mod normalize;
mod rewrite;

pub use detect::is_blog_url;
pub use normalize::{PathLayout, is_relative_reference, normalize_path, strip_ascents};
pub use rewrite::{
  BlogRewriteReport, blog_image_selector, blog_link_selector, fix_blog_urls, process_elements,
};
