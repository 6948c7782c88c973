//! Persist a generated post.

use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Local;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::WriteError;
use crate::git::CommitContext;

use super::slug::slugify;

/// Fallback slug when neither the subject nor the hash yields one.
const FALLBACK_SLUG: &str = "commit";

/// Remove a code fence wrapping the whole completion.
///
/// Only a matched pair is removed: an opening fence line (optionally with a
/// language tag such as `markdown`) and a closing fence line. Anything else
/// is returned trimmed but otherwise untouched.
pub fn strip_code_fence(raw: &str) -> String {
    let text = raw.trim();

    let Some((first, rest)) = text.split_once('\n') else {
        return text.to_string();
    };

    let opening = first.trim_end();
    let is_opening_fence = opening
        .strip_prefix("```")
        .is_some_and(|tag| tag.chars().all(|c| c.is_ascii_alphanumeric() || c == '-'));

    if !is_opening_fence {
        return text.to_string();
    }

    let rest = rest.trim_end();
    match rest.strip_suffix("```") {
        Some(inner) if inner.is_empty() || inner.ends_with('\n') => inner.trim().to_string(),
        _ => text.to_string(),
    }
}

/// `<YYYY-MM-DD>-<slug>.md` for the commit.
pub fn post_file_name(ctx: &CommitContext) -> String {
    let date = match ctx.short_date() {
        "" => Local::now().format("%Y-%m-%d").to_string(),
        date => date.to_string(),
    };

    let slug = match slugify(&ctx.subject) {
        s if !s.is_empty() => s,
        _ => match slugify(&ctx.hash) {
            h if !h.is_empty() => h,
            _ => FALLBACK_SLUG.to_string(),
        },
    };

    format!("{}-{}.md", date, slug)
}

/// Write the post for `ctx` into `output_dir`, returning its path.
///
/// The directory is created if needed. The file is replaced atomically so
/// a reader never sees a half-written post; re-running on the same commit
/// overwrites it.
pub fn write_post(output_dir: &Path, ctx: &CommitContext, raw: &str) -> Result<PathBuf, WriteError> {
    std::fs::create_dir_all(output_dir).map_err(|source| WriteError::CreateDir {
        path: output_dir.to_path_buf(),
        source,
    })?;

    let path = output_dir.join(post_file_name(ctx));
    let mut content = strip_code_fence(raw);
    content.push('\n');

    let write_failed = |source| WriteError::WriteFile {
        path: path.clone(),
        source,
    };

    let mut tmp = NamedTempFile::new_in(output_dir).map_err(write_failed)?;
    tmp.write_all(content.as_bytes()).map_err(write_failed)?;
    tmp.as_file().sync_all().map_err(write_failed)?;
    tmp.persist(&path).map_err(|e| write_failed(e.error))?;

    debug!("Wrote {} bytes to {}", content.len(), path.display());
    Ok(path)
}
