//! Shared test utilities for integration tests.
//!
//! Not all functions are used by every test file, but they're shared across tests.
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use git2::{Oid, Repository, Signature, Time};

use commit_blog::error::GenerationError;
use commit_blog::git::{RepoLocation, locate_repository};
use commit_blog::llm::generate::GeneratorFactory;
use commit_blog::llm::{ProviderSpec, TextGenerator};
use commit_blog::progress::Notifier;

/// 2025-02-10T10:00:00Z
pub const COMMIT_TIME: i64 = 1_739_181_600;

pub const AUTHOR: &str = "Jane Doe";

/// A test git repository builder for integration tests.
pub struct TestRepo {
    pub dir: tempfile::TempDir,
    pub repo: Repository,
}

impl TestRepo {
    /// Create a new empty git repository in a temp directory.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp directory");
        let repo = Repository::init(dir.path()).expect("Failed to init git repo");
        Self { dir, repo }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn location(&self) -> RepoLocation {
        locate_repository(self.path()).expect("Failed to locate test repo")
    }

    /// Fixed author signature so dates and names are predictable.
    fn signature(&self) -> Signature<'static> {
        Signature::new(AUTHOR, "jane@example.com", &Time::new(COMMIT_TIME, 0))
            .expect("Failed to create signature")
    }

    /// Write `content` to `name`, stage it and commit. Returns the commit OID.
    pub fn commit_file(&self, name: &str, content: &str, message: &str) -> Oid {
        let file_path = self.path().join(name);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent dir");
        }
        std::fs::write(&file_path, content).expect("Failed to write test file");

        let mut index = self.repo.index().expect("Failed to get index");
        index.add_path(Path::new(name)).expect("Failed to add file");
        index.write().expect("Failed to write index");

        self.commit_index(message)
    }

    /// Commit the current index unchanged (an empty commit after the first).
    pub fn commit_empty(&self, message: &str) -> Oid {
        self.commit_index(message)
    }

    fn commit_index(&self, message: &str) -> Oid {
        let sig = self.signature();
        let mut index = self.repo.index().expect("Failed to get index");
        let tree_id = index.write_tree().expect("Failed to write tree");
        let tree = self.repo.find_tree(tree_id).expect("Failed to find tree");

        let parent = self.repo.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<&git2::Commit> = parent.iter().collect();

        self.repo
            .commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .expect("Failed to create commit")
    }

    /// Write the repository-local config file.
    pub fn write_config(&self, json: &str) {
        std::fs::write(self.path().join(".commit-blog.json"), json)
            .expect("Failed to write config");
    }

    /// Markdown files under `dir` (relative to the repo root), sorted.
    pub fn posts_in(&self, dir: &str) -> Vec<PathBuf> {
        let Ok(entries) = std::fs::read_dir(self.path().join(dir)) else {
            return Vec::new();
        };
        let mut posts: Vec<PathBuf> = entries
            .filter_map(|e| e.ok().map(|e| e.path()))
            .filter(|p| p.extension().is_some_and(|ext| ext == "md"))
            .collect();
        posts.sort();
        posts
    }
}

/// Write a secrets file into `dir` and return its path.
pub fn write_secrets(dir: &Path, contents: &str) -> PathBuf {
    let path = dir.join(".env");
    std::fs::write(&path, contents).expect("Failed to write secrets file");
    path
}

/// A generator that returns a canned post and records what it was sent.
pub struct FakeGenerator {
    response: Result<String, String>,
    prompts: Arc<Mutex<Vec<(String, String)>>>,
}

#[async_trait]
impl TextGenerator for FakeGenerator {
    async fn generate(&self, system: &str, prompt: &str) -> Result<String, GenerationError> {
        self.prompts
            .lock()
            .unwrap()
            .push((system.to_string(), prompt.to_string()));
        self.response
            .clone()
            .map_err(|message| GenerationError::Network {
                provider: "fake".to_string(),
                message,
            })
    }

    fn provider_name(&self) -> &'static str {
        "fake"
    }
}

/// Factory handing out [`FakeGenerator`]s and recording each build.
#[derive(Clone)]
pub struct FakeFactory {
    response: Result<String, String>,
    pub builds: Arc<Mutex<Vec<(String, String)>>>,
    pub prompts: Arc<Mutex<Vec<(String, String)>>>,
}

impl FakeFactory {
    pub fn returning(post: &str) -> Self {
        Self::with(Ok(post.to_string()))
    }

    pub fn failing(message: &str) -> Self {
        Self::with(Err(message.to_string()))
    }

    fn with(response: Result<String, String>) -> Self {
        Self {
            response,
            builds: Arc::new(Mutex::new(Vec::new())),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn build_count(&self) -> usize {
        self.builds.lock().unwrap().len()
    }
}

impl GeneratorFactory for FakeFactory {
    fn build(
        &self,
        spec: &ProviderSpec,
        api_key: &str,
    ) -> Result<Box<dyn TextGenerator>, GenerationError> {
        self.builds
            .lock()
            .unwrap()
            .push((spec.to_string(), api_key.to_string()));
        Ok(Box::new(FakeGenerator {
            response: self.response.clone(),
            prompts: Arc::clone(&self.prompts),
        }))
    }
}

/// A post the way a well-behaved provider returns it.
/// Collects notification messages instead of showing them.
#[derive(Default)]
pub struct RecordingNotifier {
    pub messages: Mutex<Vec<String>>,
}

impl Notifier for RecordingNotifier {
    fn notify(&self, _title: &str, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }
}

pub const JWT_POST: &str = r#"---
title: "Stateless sessions with signed JWTs"
date: "2025-02-10"
author: "Jane Doe"
tags: ["rust", "jwt", "auth"]
description: "Replacing server-side sessions with signed tokens."
---

## Why tokens

Sessions lived in memory, which made scaling out painful."#;
