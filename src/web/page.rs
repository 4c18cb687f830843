//! The single HTML page served by the front-end

use crate::llm::Action;
use crate::render::escape_html;

/// Inline styles only; no scripts are ever served.
pub const CONTENT_SECURITY_POLICY: &str = "default-src 'none'; style-src 'unsafe-inline'; \
form-action 'self'; base-uri 'none'; frame-ancestors 'none'";

/// What the page shows for one request.
#[derive(Debug, Default)]
pub struct PageView<'a> {
    /// Echoed back into the textarea, escaped.
    pub transcript: &'a str,
    /// Pre-rendered, already-safe HTML fragments.
    pub summary: &'a str,
    pub diagnosis: &'a str,
}

impl<'a> PageView<'a> {
    /// Place a rendered fragment in the slot belonging to `action`.
    pub fn with_result(transcript: &'a str, action: Option<Action>, html: &'a str) -> Self {
        let mut view = Self {
            transcript,
            ..Self::default()
        };
        match action {
            Some(Action::Summarize) => view.summary = html,
            Some(Action::Diagnose) => view.diagnosis = html,
            None => {}
        }
        view
    }
}

pub fn render_page(view: &PageView<'_>) -> String {
    let mut sections = String::new();
    for (title, html) in [("Summary", view.summary), ("Diagnosis", view.diagnosis)] {
        if html.is_empty() {
            continue;
        }
        sections.push_str(&format!(
            "<section class=\"result\">\n<h2>{}</h2>\n{}</section>\n",
            title, html
        ));
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{app} - consultation assistant</title>
<style>
body {{ font-family: sans-serif; max-width: 52rem; margin: 2rem auto; padding: 0 1rem; }}
textarea {{ width: 100%; min-height: 16rem; }}
.result {{ border-top: 1px solid #ccc; margin-top: 1.5rem; }}
.error {{ color: #a00; }}
</style>
</head>
<body>
<h1>Consultation assistant</h1>
<form method="post" action="/">
<label for="transcript">Consultation transcript</label>
<textarea id="transcript" name="transcript">{transcript}</textarea>
<button type="submit" name="action" value="{summarize}">Generate SOAP note</button>
<button type="submit" name="action" value="{diagnose}">Suggest diagnoses</button>
</form>
{sections}</body>
</html>
"#,
        app = crate::APP_NAME,
        transcript = escape_html(view.transcript),
        summarize = Action::Summarize.as_str(),
        diagnose = Action::Diagnose.as_str(),
        sections = sections,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_view_has_form_and_no_results() {
        let html = render_page(&PageView::default());
        assert!(html.contains(r#"<form method="post" action="/">"#));
        assert!(html.contains(r#"value="summarize""#));
        assert!(html.contains(r#"value="diagnose""#));
        assert!(!html.contains("class=\"result\""));
    }

    #[test]
    fn transcript_echo_is_escaped() {
        let html = render_page(&PageView {
            transcript: "</textarea><script>alert(1)</script>",
            ..PageView::default()
        });
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;/textarea&gt;&lt;script&gt;"));
    }

    #[test]
    fn result_lands_in_matching_slot() {
        let html = render_page(&PageView::with_result(
            "t",
            Some(Action::Diagnose),
            "<ol>\n<li>Asthma</li>\n</ol>\n",
        ));
        assert!(html.contains("<h2>Diagnosis</h2>\n<ol>"));
        assert!(!html.contains("<h2>Summary</h2>"));
    }

    #[test]
    fn unknown_action_shows_no_result() {
        let html = render_page(&PageView::with_result("t", None, "<p>x</p>"));
        assert!(!html.contains("<p>x</p>"));
    }
}
