//! Fixed task prompts for the two supported actions.

use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;

/// A task the gateway knows how to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Action {
    /// Structured SOAP note
    Summarize,
    /// Differential diagnosis list
    Diagnose,
}

impl Action {
    pub const ALL: [Action; 2] = [Action::Summarize, Action::Diagnose];

    /// Form value for this action.
    pub fn as_str(self) -> &'static str {
        match self {
            Action::Summarize => "summarize",
            Action::Diagnose => "diagnose",
        }
    }

    /// Human-readable name of what the action produces.
    pub fn task_label(self) -> &'static str {
        match self {
            Action::Summarize => "summary",
            Action::Diagnose => "diagnosis",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a form value names no known action.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown action '{0}'")]
pub struct UnknownAction(pub String);

impl FromStr for Action {
    type Err = UnknownAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "summarize" => Ok(Action::Summarize),
            "diagnose" => Ok(Action::Diagnose),
            other => Err(UnknownAction(other.to_string())),
        }
    }
}

/// A system instruction bound to the action it serves.
#[derive(Debug, PartialEq, Eq)]
pub struct PromptTemplate {
    pub action: Action,
    pub system_instruction: &'static str,
}

static SUMMARIZE: PromptTemplate = PromptTemplate {
    action: Action::Summarize,
    system_instruction: "You are an expert medical assistant. \
Summarize the following doctor-patient consultation transcript as a structured SOAP note.\n\
\n\
Return Markdown with exactly these four headings, in this order:\n\
## Subjective\n\
## Objective\n\
## Assessment\n\
## Plan\n\
\n\
Rules:\n\
- Use only information present in the transcript.\n\
- If a section has no supporting content, write 'None documented'.",
};

static DIAGNOSE: PromptTemplate = PromptTemplate {
    action: Action::Diagnose,
    system_instruction: "You are an expert medical diagnostic assistant. \
Analyze the following doctor-patient consultation transcript.\n\
\n\
Rules:\n\
- Base your analysis ONLY on information present in the transcript.\n\
- Return a numbered Markdown list of possible differential diagnoses, most likely first.\n\
- For each diagnosis, give a brief rationale citing evidence from the transcript.\n\
- End with a disclaimer stating that this is an AI-generated suggestion for informational \
purposes only and is not a substitute for a professional medical opinion.",
};

/// Resolve the template for an action.
pub fn lookup(action: Action) -> &'static PromptTemplate {
    match action {
        Action::Summarize => &SUMMARIZE,
        Action::Diagnose => &DIAGNOSE,
    }
}
