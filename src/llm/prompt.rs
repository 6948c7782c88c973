//! Prompt construction for blog post generation.

use std::sync::LazyLock;

use regex_lite::Regex;

use crate::commit::TruncatedDiff;
use crate::git::CommitContext;

/// Bumped whenever the house style text changes meaning.
pub const HOUSE_STYLE_VERSION: &str = "2";

/// System instruction every provider receives.
pub const HOUSE_STYLE: &str = r#"You are a senior engineer writing a short technical blog post about a single commit you just made.

## Voice
- First person, conversational, confident. Write like you are explaining the change to a colleague over coffee.
- Lead with the problem or motivation, then the approach, then what you learned or what comes next.
- No marketing language, no filler ("In this post we will..."), no exclamation marks.

## Structure
- A frontmatter block, then 3 to 6 short sections with `##` headings.
- 400 to 900 words of prose.
- At most one or two small code snippets (under 15 lines each) taken from or closely based on the diff. Only include code when it makes the idea clearer.
- Optionally one diagram as a ```mermaid block when the change has a flow or structure worth drawing. Never more than one.

## Frontmatter
The post MUST start with exactly this block, using double-quoted strings:

---
title: "<specific, descriptive title>"
date: "<YYYY-MM-DD>"
author: "<author name>"
tags: ["<tag>", "<tag>", "<tag>"]
description: "<one sentence summary>"
---

## Formatting
- Output raw markdown only.
- Do NOT wrap the post in a code fence.
- Do NOT add any commentary before or after the post."#;

/// The two instructions sent to a provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

/// Build the house-style system instruction and the per-commit user
/// instruction.
///
/// Author and date are passed through literally so the frontmatter matches
/// the commit rather than whatever the model guesses.
pub fn build_prompt(ctx: &CommitContext, diff: &TruncatedDiff) -> Prompt {
    let body = if ctx.body.trim().is_empty() {
        "(none)".to_string()
    } else {
        sanitize_text(&ctx.body)
    };

    let diff_stat = if ctx.diff_stat.trim().is_empty() {
        "(unavailable)".to_string()
    } else {
        sanitize_text(ctx.diff_stat.trim_end())
    };

    let sanitized_diff = sanitize_diff(&diff.text);

    let truncation_note = if diff.was_truncated() {
        format!(
            "\n\nNote: {} lines were omitted from the middle of this diff. Focus on the visible changes and do not speculate about the missing part.",
            diff.omitted
        )
    } else {
        String::new()
    };

    let user = format!(
        r#"Write a blog post about the following commit.

## Commit
Subject: {subject}
Branch: {branch}
Author: {author}
Date: {date}

### Message body
{body}

## Files changed
{diff_stat}

## Diff
```diff
{sanitized_diff}
```{truncation_note}

## Instructions
1. Explain the idea behind the change and why it matters. Do NOT walk through the files one by one or list every file that changed.
2. Derive `title`, `tags` and `description` from the technology and concepts visible in the diff (languages, libraries, patterns), not from file names.
3. In the frontmatter use exactly `author: "{author}"` and `date: "{date}"`. Do not invent or reformat either value.
4. Follow the house style."#,
        subject = sanitize_text(&ctx.subject),
        branch = sanitize_text(&ctx.branch),
        author = ctx.author,
        date = ctx.short_date(),
    );

    Prompt {
        system: HOUSE_STYLE.to_string(),
        user,
    }
}

/// Prepare diff text for embedding inside a fenced block.
///
/// Strips ANSI escapes and control characters (keeping newlines and tabs),
/// and defuses triple backticks so the diff cannot close the fence early.
pub fn sanitize_diff(text: &str) -> String {
    sanitize_text(text).replace("```", "'''")
}

fn sanitize_text(text: &str) -> String {
    remove_control_chars(&remove_ansi_escapes(text))
}

fn ansi_escape() -> Option<&'static Regex> {
    static ANSI: LazyLock<Option<Regex>> =
        LazyLock::new(|| Regex::new(r"\x1b\[[0-9;?]*[ -/]*[@-~]").ok());
    ANSI.as_ref()
}

fn remove_ansi_escapes(text: &str) -> String {
    match ansi_escape() {
        Some(re) => re.replace_all(text, "").into_owned(),
        None => text.to_string(),
    }
}

fn remove_control_chars(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
        .collect()
}
