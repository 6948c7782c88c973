//! Turning a completion into a post on disk.

pub mod slug;
pub mod writer;

pub use slug::{MAX_SLUG_LEN, slugify};
pub use writer::{post_file_name, strip_code_fence, write_post};
