use std::fmt::Write;

use story_llm::GenerationOutcome;

use crate::{
    prompts::story_idea_prompt::StoryIdeaPrompt,
    session::session_echo::SessionEcho,
    story_idea::{genre::Genre, story_idea_request::MAX_KEYWORD_CHARS},
};

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; margin: 0; display: flex; color: #1f2933; }
aside { width: 18rem; min-height: 100vh; background: #f0f2f6; padding: 1.5rem; box-sizing: border-box; }
main { flex: 1; padding: 1.5rem 3rem; }
.columns { display: flex; gap: 3rem; }
.inputs { flex: 1; }
.output { flex: 2; }
label { display: block; margin: 1rem 0 0.3rem; }
select, input[type=text] { width: 100%; padding: 0.5rem; box-sizing: border-box; }
button { margin-top: 1rem; padding: 0.6rem 1rem; cursor: pointer; }
button.primary { width: 100%; background: #ff4b4b; color: white; border: none; border-radius: 0.4rem; }
pre { white-space: pre-wrap; background: white; padding: 0.6rem; border-radius: 0.3rem; }
.notice { padding: 1rem; border-radius: 0.4rem; margin: 1rem 0; }
.info { background: #e8f2fc; }
.success { background: #dff5e3; }
.warning { background: #fff6d5; }
.error { background: #fde4e4; }
#pending { display: none; font-style: italic; }
"#;

const SCRIPT: &str = r#"
document.querySelectorAll("form[data-pending]").forEach(function (form) {
  form.addEventListener("submit", function () {
    var genre = form.dataset.pending;
    var select = form.querySelector("select[name=genre]");
    if (select) { genre = select.value; }
    var pending = document.getElementById("pending");
    pending.textContent = form.dataset.verb.replace("{genre}", genre);
    pending.style.display = "block";
    document.querySelectorAll("button").forEach(function (b) { b.disabled = true; });
  });
});
"#;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Warning(String),
    Error(String),
}

/// Everything the page needs. Rendering is a pure function of this value.
#[derive(Debug, Clone)]
pub struct PageView<'a> {
    pub echo: Option<&'a SessionEcho>,
    pub selected_genre: Genre,
    pub keyword: &'a str,
    pub model_name: &'a str,
    pub notice: Option<Notice>,
}

impl<'a> PageView<'a> {
    /// A view that preselects the form from the last request, if any.
    pub fn from_echo(echo: Option<&'a SessionEcho>, model_name: &'a str) -> Self {
        Self {
            echo,
            selected_genre: echo.map(|echo| echo.request.genre()).unwrap_or_default(),
            keyword: echo
                .and_then(|echo| echo.request.keyword())
                .unwrap_or_default(),
            model_name,
            notice: None,
        }
    }
}

pub fn render_page(view: &PageView) -> String {
    let mut html = String::with_capacity(4096);

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str("<title>AI Story Idea Generator</title>\n");
    let _ = writeln!(html, "<style>{}</style>\n</head>\n<body>", STYLE);

    render_sidebar(&mut html, view);

    html.push_str("<main>\n<h1>🚀 AI Creative Story Idea Generator</h1>\n");
    html.push_str("<p>Let AI spark your next narrative masterpiece! Choose a genre and optionally add a keyword.</p>\n");
    html.push_str("<div class=\"columns\">\n");

    render_inputs(&mut html, view);
    render_output(&mut html, view);

    html.push_str("</div>\n<hr>\n");
    html.push_str("<p>Built with ❤️ using Rust and the Google Gemini API.</p>\n</main>\n");
    let _ = writeln!(html, "<script>{}</script>\n</body>\n</html>", SCRIPT);

    html
}

fn render_sidebar(html: &mut String, view: &PageView) {
    html.push_str("<aside>\n<h2>Configuration</h2>\n");
    html.push_str("<div class=\"notice success\">Gemini API Key Loaded!</div>\n");
    let _ = writeln!(html, "<p>Model: <code>{}</code></p>", escape(view.model_name));

    if let Some(echo) = view.echo {
        let prompt = StoryIdeaPrompt::get_prompt(&echo.request);
        html.push_str("<h3>Full Prompt Sent to AI:</h3>\n");
        let _ = writeln!(html, "<pre>{}</pre>", escape(&prompt));
    }

    html.push_str("</aside>\n");
}

fn render_inputs(html: &mut String, view: &PageView) {
    html.push_str("<section class=\"inputs\">\n<h2>Your Preferences</h2>\n");
    html.push_str(
        "<form method=\"post\" action=\"/generate\" data-pending=\"\" data-verb=\"🧠 Generating a {genre} story idea...\">\n",
    );
    html.push_str("<label for=\"genre\">Choose a Genre:</label>\n<select id=\"genre\" name=\"genre\">\n");
    for genre in Genre::ALL {
        let selected = if genre == view.selected_genre { " selected" } else { "" };
        let _ = writeln!(
            html,
            "<option value=\"{0}\"{1}>{0}</option>",
            escape(genre.name()),
            selected
        );
    }
    html.push_str("</select>\n");

    html.push_str("<label for=\"keyword\">Optional: Enter a Keyword or Theme (e.g., 'time travel', 'hidden artifact')</label>\n");
    let _ = writeln!(
        html,
        "<input type=\"text\" id=\"keyword\" name=\"keyword\" maxlength=\"{}\" value=\"{}\">",
        MAX_KEYWORD_CHARS,
        escape(view.keyword)
    );
    html.push_str("<button type=\"submit\" class=\"primary\">✨ Generate Story Idea ✨</button>\n</form>\n");
    html.push_str("<p id=\"pending\"></p>\n");

    match &view.notice {
        Some(Notice::Warning(message)) => {
            let _ = writeln!(html, "<div class=\"notice warning\">{}</div>", escape(message));
        }
        Some(Notice::Error(message)) => {
            let _ = writeln!(html, "<div class=\"notice error\">{}</div>", escape(message));
        }
        None => {}
    }

    html.push_str("</section>\n");
}

fn render_output(html: &mut String, view: &PageView) {
    html.push_str("<section class=\"output\">\n<h2>💡 Your Generated Story Idea</h2>\n");

    let Some(echo) = view.echo else {
        html.push_str("<p>Your story idea will appear here once generated.</p>\n</section>\n");
        return;
    };

    let genre = echo.request.genre();
    let _ = writeln!(html, "<p><strong>Genre:</strong> {}</p>", escape(genre.name()));
    if let Some(keyword) = echo.request.keyword() {
        let _ = writeln!(html, "<p><strong>Keyword:</strong> {}</p>", escape(keyword));
    }

    match &echo.outcome {
        GenerationOutcome::Text(text) => {
            let _ = writeln!(html, "<div class=\"notice info\">{}</div>", escape(text));
        }
        GenerationOutcome::Blocked(reason) => {
            let _ = writeln!(
                html,
                "<div class=\"notice warning\">Content generation might have been blocked. Reason: {}</div>",
                escape(reason)
            );
        }
        GenerationOutcome::Failed(message) => {
            let _ = writeln!(
                html,
                "<div class=\"notice error\">An error occurred during story idea generation: {}</div>",
                escape(message)
            );
        }
    }

    let _ = writeln!(
        html,
        "<form method=\"post\" action=\"/regenerate\" data-pending=\"{}\" data-verb=\"🧠 Generating another {{genre}} story idea...\">",
        escape(genre.name())
    );
    html.push_str("<button type=\"submit\">🔄 Generate Another One (Same Settings)</button>\n</form>\n");
    html.push_str("</section>\n");
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::story_idea::story_idea_request::GenerationRequest;

    fn echo(outcome: GenerationOutcome) -> SessionEcho {
        SessionEcho::new(
            GenerationRequest::new(Genre::Mystery, Some("hidden artifact".to_string())),
            outcome,
        )
    }

    #[test]
    fn empty_session_shows_placeholder_and_no_regenerate() {
        let html = render_page(&PageView::from_echo(None, "gemini-1.5-flash"));
        assert!(html.contains("Your story idea will appear here once generated."));
        assert!(!html.contains("/regenerate"));
        assert!(html.contains("<option value=\"Science Fiction\" selected>"));
    }

    #[test]
    fn lists_all_twelve_genres() {
        let html = render_page(&PageView::from_echo(None, "m"));
        assert_eq!(html.matches("<option ").count(), 12);
    }

    #[test]
    fn text_outcome_shows_genre_keyword_text_and_prompt() {
        let echo = echo(GenerationOutcome::Text("A map that redraws itself.".to_string()));
        let html = render_page(&PageView::from_echo(Some(&echo), "m"));

        assert!(html.contains("<strong>Genre:</strong> Mystery"));
        assert!(html.contains("<strong>Keyword:</strong> hidden artifact"));
        assert!(html.contains("<div class=\"notice info\">A map that redraws itself.</div>"));
        assert!(html.contains("incorporate the keyword: &#39;hidden artifact&#39;"));
        assert!(html.contains("action=\"/regenerate\""));
        assert!(html.contains("<option value=\"Mystery\" selected>"));
    }

    #[test]
    fn blocked_and_failed_outcomes_render_notices() {
        let blocked = echo(GenerationOutcome::Blocked("SAFETY".to_string()));
        let html = render_page(&PageView::from_echo(Some(&blocked), "m"));
        assert!(html.contains("might have been blocked. Reason: SAFETY"));

        let failed = echo(GenerationOutcome::Failed("network down".to_string()));
        let html = render_page(&PageView::from_echo(Some(&failed), "m"));
        assert!(html.contains("An error occurred during story idea generation: network down"));
    }

    #[test]
    fn keyword_line_is_omitted_without_keyword() {
        let echo = SessionEcho::new(
            GenerationRequest::new(Genre::Horror, None),
            GenerationOutcome::Text("Boo.".to_string()),
        );
        let html = render_page(&PageView::from_echo(Some(&echo), "m"));
        assert!(!html.contains("<strong>Keyword:</strong>"));
    }

    #[test]
    fn model_text_is_escaped() {
        let echo = echo(GenerationOutcome::Text("<script>alert(1)</script>".to_string()));
        let html = render_page(&PageView::from_echo(Some(&echo), "m"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(!html.contains("<script>alert(1)"));
    }

    #[test]
    fn keyword_field_is_length_limited() {
        let html = render_page(&PageView::from_echo(None, "m"));
        assert!(html.contains("name=\"keyword\" maxlength=\"200\""));
    }

    #[test]
    fn warning_notice_is_rendered() {
        let mut view = PageView::from_echo(None, "m");
        view.notice = Some(Notice::Warning("Please select a genre.".to_string()));
        assert!(render_page(&view).contains("<div class=\"notice warning\">Please select a genre.</div>"));
    }
}
