#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod augment;
pub mod config;
pub mod dom;
pub mod filter;
pub mod gallery;
pub mod logging;
pub mod paths;
pub mod patches;

pub use augment::{PageReport, SiteAugmenter, SiteReport};
pub use config::SiteConfig;
pub use dom::{Document, Page};
pub use filter::{FilterEvent, TagFilterController};
pub use gallery::Gallery;
pub use paths::{PathLayout, is_blog_url, normalize_path};
