//! Git operations using git2-rs.

pub mod context;

pub use context::{
    CommitContext, RepoLocation, extract_commit_context, locate_repository, read_head_context,
};
