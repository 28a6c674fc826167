use std::sync::OnceLock;

use chrono::DateTime;
use handlebars::{handlebars_helper, Handlebars, TemplateError};
use regex::Regex;

use crate::{error::SiteError, page::Page};

pub const INDEX: &str = "index";
pub const BLOG: &str = "blog";
pub const POST: &str = "post";
pub const NOT_FOUND: &str = "404";

const TEMPLATES: [(&str, &str); 4] = [
    (INDEX, include_str!("../templates/index.hbs")),
    (BLOG, include_str!("../templates/blog.hbs")),
    (POST, include_str!("../templates/post.hbs")),
    (NOT_FOUND, include_str!("../templates/404.hbs")),
];

const PARTIALS: [(&str, &str); 2] = [
    ("layout", include_str!("../templates/layout.hbs")),
    ("post_item", include_str!("../templates/post_item.hbs")),
];

const WORDS_PER_MINUTE: usize = 200;

static REGISTRY: OnceLock<Handlebars<'static>> = OnceLock::new();
static TAG_PATTERN: OnceLock<Regex> = OnceLock::new();

/// Medium date, e.g. `1 Jan 2024`. Anything that is not RFC 3339 is echoed back.
pub fn format_date(value: &str) -> String {
    match DateTime::parse_from_rfc3339(value) {
        Ok(date) => date.format("%-d %b %Y").to_string(),
        Err(_) => value.to_string(),
    }
}

pub fn reading_time(html: &str) -> String {
    let tags = TAG_PATTERN.get_or_init(|| Regex::new(r"<[^>]*>").unwrap());
    let words = tags.replace_all(html, " ").split_whitespace().count();
    let minutes = words.div_ceil(WORDS_PER_MINUTE).max(1);
    format!("{minutes} min read")
}

handlebars_helper!(is_active_helper: |path: str, href: str| crate::page::is_active(path, href));
handlebars_helper!(format_date_helper: |date: str| format_date(date));
handlebars_helper!(reading_time_helper: |html: str| reading_time(html));

fn build_registry() -> Result<Handlebars<'static>, TemplateError> {
    let mut handlebars = Handlebars::new();
    handlebars.register_helper("is_active", Box::new(is_active_helper));
    handlebars.register_helper("format_date", Box::new(format_date_helper));
    handlebars.register_helper("reading_time", Box::new(reading_time_helper));
    for (name, source) in PARTIALS {
        handlebars.register_partial(name, source)?;
    }
    for (name, source) in TEMPLATES {
        handlebars.register_template_string(name, source)?;
    }

    Ok(handlebars)
}

fn registry() -> Result<&'static Handlebars<'static>, TemplateError> {
    if let Some(handlebars) = REGISTRY.get() {
        return Ok(handlebars);
    }
    let handlebars = build_registry()?;
    Ok(REGISTRY.get_or_init(|| handlebars))
}

/// Compiles the bundled templates. Later calls are no-ops.
pub fn init() -> Result<(), SiteError> {
    registry()?;
    Ok(())
}

pub fn render(name: &str, page: &Page) -> Result<String, SiteError> {
    Ok(registry()?.render(name, page)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{parse_date, Meta, Post};

    fn meta(slug: &str, title: &str, date: &str) -> Meta {
        Meta {
            slug: slug.to_string(),
            title: title.to_string(),
            description: format!("about {slug}"),
            date: parse_date(date).unwrap(),
            snippet: format!("snippet of {slug}"),
        }
    }

    #[test]
    fn bundled_templates_compile() {
        init().unwrap();
    }

    #[test]
    fn formats_medium_dates() {
        assert_eq!(format_date("2024-01-01T00:00:00Z"), "1 Jan 2024");
        assert_eq!(format_date("2023-11-25T13:00:00.000Z"), "25 Nov 2023");
        assert_eq!(format_date("garbage"), "garbage");
    }

    #[test]
    fn reading_time_counts_words_not_markup() {
        assert_eq!(reading_time(""), "1 min read");
        let body = format!("<p>{}</p>", "word ".repeat(401));
        assert_eq!(reading_time(&body), "3 min read");
        assert_eq!(reading_time("<p class=\"a b c d\">one</p>"), "1 min read");
    }

    #[test]
    fn home_lists_given_posts_and_marks_nav() {
        let page = Page::new("/").with_metas(vec![meta("first", "First Post", "2024-01-01")]);
        let html = render(INDEX, &page).unwrap();
        assert!(html.contains("href=\"/blog/first\""));
        assert!(html.contains("First Post"));
        assert!(html.contains("1 Jan 2024"));
        assert!(html.contains("class=\"button active\" href=\"/\""));
        assert!(html.contains("class=\"button\" href=\"/blog\""));
    }

    #[test]
    fn listing_items_keep_their_own_titles() {
        let page = Page::new("/blog").with_metas(vec![
            meta("first", "First Post", "2024-01-01"),
            meta("second", "Second Post", "2023-01-01"),
        ]);
        let html = render(BLOG, &page).unwrap();
        assert!(html.contains("<p class=\"post-item-title\">First Post</p>"));
        assert!(html.contains("<p class=\"post-item-title\">Second Post</p>"));
        assert!(html.contains("<p>about second</p>"));
        assert!(!html.contains("<p class=\"post-item-title\">Blog - Daniel Westbrook</p>"));
        assert!(html.contains("<title>Blog - Daniel Westbrook</title>"));
        assert!(!html.contains("name=\"description\""));
    }

    #[test]
    fn post_page_title_and_description_come_from_the_post() {
        let post = Post::new(meta("x", "Post X", "2024-01-01"), "<p>x</p>".to_string());
        let html = render(POST, &Page::new("/blog/x").with_post(post)).unwrap();
        assert!(html.contains("<title>Post X</title>"));
        assert!(html.contains("<meta name=\"description\" content=\"about x\" />"));
        assert!(html.contains("<h1>Post X</h1>"));
    }

    #[test]
    fn post_content_is_not_escaped_but_title_is() {
        let post = Post::new(
            meta("x", "Fish & <Chips>", "2024-01-01"),
            "<h1>Hello</h1>".to_string(),
        );
        let html = render(POST, &Page::new("/blog/x").with_post(post)).unwrap();
        assert!(html.contains("<h1>Hello</h1>"));
        assert!(html.contains("Fish &amp; &lt;Chips&gt;"));
        assert!(html.contains("snippet of x"));
        assert!(html.contains("class=\"button active\" href=\"/blog\""));
    }

    #[test]
    fn not_found_renders_without_data() {
        let html = render(NOT_FOUND, &Page::new("/missing")).unwrap();
        assert!(html.contains("Not Found"));
    }
}
