//! File I/O and text helpers

mod fs;
mod slug;

pub use fs::{FsError, LocalFs, SiteFs, decode_source, read_source};
pub use slug::{HeadingIds, slugify};
