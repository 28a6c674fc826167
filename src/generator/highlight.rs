use std::sync::OnceLock;

use syntect::{
    easy::HighlightLines,
    highlighting::{Theme, ThemeSet},
    html::{styled_line_to_highlighted_html, IncludeBackground},
    parsing::SyntaxSet,
    util::LinesWithEndings,
};

pub(crate) const THEME: &str = "base16-mocha.dark";

static SYNTAX_SET: OnceLock<SyntaxSet> = OnceLock::new();
static THEME_SET: OnceLock<ThemeSet> = OnceLock::new();

fn syntax_set() -> &'static SyntaxSet {
    SYNTAX_SET.get_or_init(SyntaxSet::load_defaults_newlines)
}

fn theme() -> anyhow::Result<&'static Theme> {
    THEME_SET
        .get_or_init(ThemeSet::load_defaults)
        .themes
        .get(THEME)
        .ok_or_else(|| anyhow::anyhow!("theme {THEME} is not bundled with syntect"))
}

fn escape_attr(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Renders a fenced code block as inline-styled HTML, wrapper included.
pub(crate) fn highlight_block(language: &str, code: &str) -> anyhow::Result<String> {
    let ss = syntax_set();
    let theme = theme()?;
    // the fence info string may carry extra words after the language
    let language = language.split_whitespace().next().unwrap_or("");

    let syntax = ss
        .find_syntax_by_token(language)
        .or_else(|| ss.find_syntax_by_name(language))
        .or_else(|| ss.find_syntax_by_first_line(code))
        .unwrap_or_else(|| ss.find_syntax_plain_text());

    let mut html = String::from("<pre");
    if let Some(bg) = theme.settings.background {
        html.push_str(&format!(
            " style=\"background-color:#{:02x}{:02x}{:02x};\"",
            bg.r, bg.g, bg.b
        ));
    }
    let lang_attr = if language.is_empty() {
        String::new()
    } else {
        format!(" data-language=\"{}\"", escape_attr(language))
    };
    html.push_str(&lang_attr);
    html.push_str("><code");
    html.push_str(&lang_attr);
    html.push('>');

    let mut h = HighlightLines::new(syntax, theme);
    for line in LinesWithEndings::from(code) {
        let regions = h.highlight_line(line, ss)?;
        html.push_str(&styled_line_to_highlighted_html(
            &regions,
            IncludeBackground::No,
        )?);
    }
    html.push_str("</code></pre>\n");

    Ok(html)
}
