//! Snapshot of the most recent commit.
//!
//! Every field is gathered by an independent query against HEAD. A query
//! that fails (root commit with no parent, unborn branch, unreadable blob)
//! leaves its field empty instead of aborting the whole extraction, so a
//! first commit simply produces an empty diff.

use std::path::{Path, PathBuf};

use chrono::{DateTime, FixedOffset, SecondsFormat};
use git2::{Commit, Diff, DiffFormat, DiffStatsFormat, Repository, Time};
use tracing::{debug, warn};

use crate::error::GitError;

/// Width used when rendering the diff stat summary.
const DIFF_STAT_WIDTH: usize = 80;

/// Length of the abbreviated hash when git2 cannot compute a unique one.
const SHORT_HASH_LEN: usize = 7;

/// Read-only view of the commit a post is written about.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitContext {
    /// First line of the commit message.
    pub subject: String,
    /// Message body after the subject paragraph.
    pub body: String,
    pub author: String,
    /// Author date, RFC 3339 with the author's UTC offset.
    pub date: String,
    /// Abbreviated commit hash.
    pub hash: String,
    /// Current branch, or `HEAD` when detached.
    pub branch: String,
    /// Unified diff against the first parent.
    pub diff: String,
    /// `git diff --stat` style summary.
    pub diff_stat: String,
    pub files_changed: Vec<String>,
}

impl CommitContext {
    /// The `YYYY-MM-DD` prefix of the author date.
    pub fn short_date(&self) -> &str {
        self.date.get(..10).unwrap_or(&self.date)
    }
}

/// Where a repository lives on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoLocation {
    /// Working tree root.
    pub root: PathBuf,
    /// The `.git` directory (or worktree git dir).
    pub git_dir: PathBuf,
}

/// Find the repository containing `path`.
pub fn locate_repository(path: &Path) -> Result<RepoLocation, GitError> {
    let repo = Repository::discover(path).map_err(|source| GitError::OpenRepository {
        path: path.to_path_buf(),
        source,
    })?;

    let root = repo
        .workdir()
        .map(Path::to_path_buf)
        .ok_or_else(|| GitError::BareRepository {
            path: repo.path().to_path_buf(),
        })?;

    Ok(RepoLocation {
        root,
        git_dir: repo.path().to_path_buf(),
    })
}

/// Open the repository and snapshot its HEAD commit.
///
/// The repository handle is dropped before returning; callers only ever
/// see the owned snapshot.
pub fn read_head_context(location: &RepoLocation) -> Result<CommitContext, GitError> {
    let repo = Repository::open(&location.git_dir).map_err(|source| GitError::OpenRepository {
        path: location.git_dir.clone(),
        source,
    })?;
    Ok(extract_commit_context(&repo))
}

/// Snapshot the HEAD commit of `repo`.
pub fn extract_commit_context(repo: &Repository) -> CommitContext {
    let branch = current_branch(repo);

    let commit = match repo.head().and_then(|head| head.peel_to_commit()) {
        Ok(commit) => commit,
        Err(e) => {
            warn!("Could not resolve HEAD commit: {e}");
            return CommitContext {
                branch,
                ..CommitContext::default()
            };
        }
    };

    let author = commit.author();
    let diff = first_parent_diff(repo, &commit);

    CommitContext {
        subject: commit.summary().unwrap_or_default().to_string(),
        body: commit.body().unwrap_or_default().trim().to_string(),
        author: author.name().unwrap_or_default().to_string(),
        date: format_git_time(author.when()).unwrap_or_default(),
        hash: short_hash(&commit),
        branch,
        diff: diff.as_ref().map(diff_text).unwrap_or_default(),
        diff_stat: diff.as_ref().map(diff_stat).unwrap_or_default(),
        files_changed: diff.as_ref().map(changed_paths).unwrap_or_default(),
    }
}

fn current_branch(repo: &Repository) -> String {
    match repo.head() {
        Ok(head) if head.is_branch() => head.shorthand().unwrap_or("HEAD").to_string(),
        Ok(_) => "HEAD".to_string(),
        // Unborn branch: HEAD still names the branch it will create.
        Err(_) => repo
            .find_reference("HEAD")
            .ok()
            .and_then(|r| r.symbolic_target().map(str::to_string))
            .map(|target| target.trim_start_matches("refs/heads/").to_string())
            .unwrap_or_default(),
    }
}

fn short_hash(commit: &Commit<'_>) -> String {
    match commit.as_object().short_id() {
        Ok(buf) => buf.as_str().unwrap_or_default().to_string(),
        Err(e) => {
            debug!("short_id failed, truncating full hash: {e}");
            commit.id().to_string().chars().take(SHORT_HASH_LEN).collect()
        }
    }
}

/// Render a git timestamp as RFC 3339 in the author's own offset.
fn format_git_time(time: Time) -> Option<String> {
    let offset = FixedOffset::east_opt(time.offset_minutes() * 60)?;
    let utc = DateTime::from_timestamp(time.seconds(), 0)?;
    Some(
        utc.with_timezone(&offset)
            .to_rfc3339_opts(SecondsFormat::Secs, false),
    )
}

fn first_parent_diff<'r>(repo: &'r Repository, commit: &Commit<'r>) -> Option<Diff<'r>> {
    let parent = match commit.parent(0) {
        Ok(parent) => parent,
        Err(e) => {
            debug!("Commit {} has no parent, diff is empty: {e}", commit.id());
            return None;
        }
    };

    let trees = parent.tree().and_then(|old| commit.tree().map(|new| (old, new)));
    let (old_tree, new_tree) = match trees {
        Ok(trees) => trees,
        Err(e) => {
            warn!("Failed to read trees for {}: {e}", commit.id());
            return None;
        }
    };

    repo.diff_tree_to_tree(Some(&old_tree), Some(&new_tree), None)
        .map_err(|e| warn!("Failed to diff {} against its parent: {e}", commit.id()))
        .ok()
}

fn diff_text(diff: &Diff<'_>) -> String {
    let mut text = String::new();

    let printed = diff.print(DiffFormat::Patch, |_delta, _hunk, line| {
        let origin = line.origin();
        if origin == '+' || origin == '-' || origin == ' ' {
            text.push(origin);
        }
        text.push_str(&String::from_utf8_lossy(line.content()));
        true
    });

    match printed {
        Ok(()) => text,
        Err(e) => {
            warn!("Failed to render diff text: {e}");
            String::new()
        }
    }
}

fn diff_stat(diff: &Diff<'_>) -> String {
    diff.stats()
        .and_then(|stats| stats.to_buf(DiffStatsFormat::FULL, DIFF_STAT_WIDTH))
        .map(|buf| buf.as_str().unwrap_or_default().trim_end().to_string())
        .unwrap_or_else(|e| {
            warn!("Failed to compute diff stat: {e}");
            String::new()
        })
}

fn changed_paths(diff: &Diff<'_>) -> Vec<String> {
    diff.deltas()
        .filter_map(|delta| {
            delta
                .new_file()
                .path()
                .or_else(|| delta.old_file().path())
                .map(|p| p.to_string_lossy().to_string())
        })
        .collect()
}
