//! Page-level fixes applied to rendered documentation pages.

mod edit_link;
mod hero;
mod redirect;

pub use edit_link::{EditLinkPatch, fix_edit_link, rewrite_edit_href};
pub use hero::fix_home_hero;
pub use redirect::redirect_target;
