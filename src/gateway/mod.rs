//! Task gateway for medscribe
//!
//! Pairs a transcript with the prompt for the requested action, runs one
//! completion, and turns the outcome into an HTML fragment. Backend failures
//! never reach the caller as errors: they become a generic, task-named
//! message while the detail goes to the log.

use std::borrow::Cow;
use std::sync::Arc;

use tracing::{error, info, warn};

use crate::llm::{lookup, Action, CompletionClient};
use crate::render::{escape_html, MarkdownRenderer};

/// Appended to diagnosis replies that arrive without a disclaimer.
pub const DISCLAIMER_MARKDOWN: &str = "**Disclaimer:** This is an AI-generated suggestion \
for informational purposes only and is not a substitute for a professional medical opinion.";

/// A closing paragraph counts as a disclaimer only if it says the text is
/// machine-generated and also limits its use.
const AI_ORIGIN_MARKERS: [&str; 2] = ["ai-generated", "ai generated"];
const LIMITATION_MARKERS: [&str; 2] = ["not a substitute", "informational"];

/// The transcript submitted with one request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranscriptInput {
    pub text: String,
}

impl TranscriptInput {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// HTML produced for one request. Empty means nothing to show.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedOutput {
    pub html: String,
}

impl RenderedOutput {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.html.is_empty()
    }
}

/// Outcome of a raw form submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Submission {
    /// `None` when the submitted action was not recognized.
    pub action: Option<Action>,
    pub output: RenderedOutput,
}

pub struct TaskGateway {
    client: Arc<dyn CompletionClient>,
    renderer: MarkdownRenderer,
}

impl TaskGateway {
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self {
            client,
            renderer: MarkdownRenderer::new(),
        }
    }

    /// Run `action` against the transcript and render the result.
    pub async fn handle(&self, action: Action, input: &TranscriptInput) -> RenderedOutput {
        if input.text.is_empty() {
            return RenderedOutput::empty();
        }

        let template = lookup(action);
        info!(
            task = action.as_str(),
            "Asking the backend to generate a {}",
            action.task_label()
        );

        match self
            .client
            .complete(template.system_instruction, &input.text)
            .await
        {
            Ok(raw) => {
                let markdown = post_process(action, &raw);
                RenderedOutput {
                    html: self.renderer.render(&markdown),
                }
            }
            Err(failure) => {
                error!(
                    task = action.as_str(),
                    kind = %failure.kind,
                    "Completion failed: {}",
                    failure.detail
                );
                RenderedOutput {
                    html: error_fragment(action),
                }
            }
        }
    }

    /// Like [`TaskGateway::handle`], but takes the action as submitted by the
    /// form. Unrecognized actions produce empty output without a backend call.
    pub async fn handle_submission(&self, raw_action: &str, input: &TranscriptInput) -> Submission {
        let action = match raw_action.parse::<Action>() {
            Ok(action) => action,
            Err(e) => {
                warn!("Ignoring submission: {}", e);
                return Submission::default();
            }
        };

        Submission {
            action: Some(action),
            output: self.handle(action, input).await,
        }
    }
}

/// Apply per-action guarantees to a backend reply before rendering.
pub fn post_process(action: Action, raw: &str) -> Cow<'_, str> {
    match action {
        Action::Summarize => Cow::Borrowed(raw),
        Action::Diagnose if has_disclaimer(raw) => Cow::Borrowed(raw),
        Action::Diagnose => Cow::Owned(format!(
            "{}\n\n---\n\n{}\n",
            raw.trim_end(),
            DISCLAIMER_MARKDOWN
        )),
    }
}

fn has_disclaimer(text: &str) -> bool {
    let closing = last_paragraph(text).to_lowercase();
    AI_ORIGIN_MARKERS.iter().any(|m| closing.contains(m))
        && LIMITATION_MARKERS.iter().any(|m| closing.contains(m))
}

/// The final blank-line-delimited block of `text`, joined onto one line.
fn last_paragraph(text: &str) -> String {
    let mut lines: Vec<&str> = text
        .lines()
        .rev()
        .skip_while(|line| line.trim().is_empty())
        .take_while(|line| !line.trim().is_empty())
        .collect();
    lines.reverse();
    lines.join(" ")
}

/// User-facing failure message. Names the task only.
fn error_fragment(action: Action) -> String {
    format!(
        "<p class=\"error\">An error occurred while generating the {}. Please try again later.</p>\n",
        escape_html(action.task_label())
    )
}
