//! One pass of the pipeline, from configuration to the written post.

use std::path::PathBuf;

use async_trait::async_trait;
use tracing::debug;

use crate::blog::write_post;
use crate::commit::{SkipDecision, SkipReason, SkipRules, truncate_diff};
use crate::config::{Secrets, load_config};
use crate::error::PipelineError;
use crate::git::{RepoLocation, read_head_context};
use crate::llm::{
    DefaultFactory, GeneratorFactory, HOUSE_STYLE_VERSION, ProviderKind, ProviderSpec, build_prompt,
    generate_post,
};
use crate::progress::ProgressReporter;

/// Successful end of an attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attempt {
    /// A post was written at this path.
    Written(PathBuf),
    /// The commit was deliberately ignored.
    Skipped(SkipReason),
}

/// Something that can run a single pipeline attempt.
///
/// The retry loop only sees this seam, so it can be driven by scripted
/// attempts in tests.
#[async_trait]
pub trait AttemptRunner: Send + Sync {
    async fn run_attempt(&self, reporter: &ProgressReporter) -> Result<Attempt, PipelineError>;
}

/// Everything an attempt needs that is fixed for the whole invocation.
pub struct PipelineEnv {
    location: RepoLocation,
    secrets_file: PathBuf,
    factory: Box<dyn GeneratorFactory>,
}

impl PipelineEnv {
    /// Environment that calls the real provider endpoints.
    pub fn new(location: RepoLocation, secrets_file: PathBuf) -> Self {
        Self {
            location,
            secrets_file,
            factory: Box::new(DefaultFactory),
        }
    }

    /// Replace how generators are built.
    pub fn with_factory(mut self, factory: impl GeneratorFactory + 'static) -> Self {
        self.factory = Box::new(factory);
        self
    }
}

#[async_trait]
impl AttemptRunner for PipelineEnv {
    async fn run_attempt(&self, reporter: &ProgressReporter) -> Result<Attempt, PipelineError> {
        run_once(self, reporter).await
    }
}

/// Run every stage once.
///
/// Secrets and configuration are re-read on each call so an operator can
/// fix them between retries. The commit is read exactly once per call. The
/// provider secret is checked before any generator is built.
pub async fn run_once(env: &PipelineEnv, reporter: &ProgressReporter) -> Result<Attempt, PipelineError> {
    let root = &env.location.root;

    reporter.step("Loading configuration");
    let secrets = Secrets::load(&env.secrets_file, &ProviderKind::secret_names())?;
    let config = load_config(root)?;
    let rules = SkipRules::compile(&config.skip_patterns)?;
    debug!("Using model {} and output dir {}", config.model, config.output_dir);

    reporter.step("Reading latest commit");
    let ctx = read_head_context(&env.location)?;
    reporter.step(format!(
        "Commit {} on {}: {}",
        ctx.hash, ctx.branch, ctx.subject
    ));

    if let SkipDecision::Skip(reason) = rules.evaluate(&ctx.subject, &ctx.diff) {
        reporter.step(format!("Skipping: {}", reason));
        return Ok(Attempt::Skipped(reason));
    }

    let diff = truncate_diff(&ctx.diff, config.max_diff_lines);
    if diff.was_truncated() {
        reporter.step(format!(
            "Diff truncated to {} lines ({} omitted)",
            config.max_diff_lines, diff.omitted
        ));
    }

    reporter.step("Building prompt");
    let prompt = build_prompt(&ctx, &diff);
    debug!("House style v{}, {} prompt chars", HOUSE_STYLE_VERSION, prompt.user.len());

    let spec = ProviderSpec::parse(&config.model)?;
    let api_key = spec.require_secret(&secrets)?;

    reporter.step(format!("Generating post with {}", spec));
    let generator = env.factory.build(&spec, api_key)?;
    let raw = generate_post(generator.as_ref(), &prompt).await?;

    reporter.step("Writing post");
    let path = write_post(&config.output_path(root), &ctx, &raw)?;
    reporter.step(format!("Wrote {}", path.display()));

    Ok(Attempt::Written(path))
}
