use anyhow::{bail, Context};
use pulldown_cmark::{html, CodeBlockKind, Event, Options, Parser, Tag, TagEnd};

use super::highlight::highlight_block;
use crate::metadata::FrontMatter;

#[derive(Debug)]
pub struct Rendered {
    pub html: String,
    /// raw YAML of the leading metadata block, empty when there is none
    pub front_matter: String,
}

impl Rendered {
    pub fn front_matter(&self) -> anyhow::Result<FrontMatter> {
        if self.front_matter.trim().is_empty() {
            bail!("Missing front-matter block");
        }
        serde_yaml::from_str(&self.front_matter).context("Invalid front-matter")
    }
}

fn options() -> Options {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_YAML_STYLE_METADATA_BLOCKS);
    options
}

/// Converts markdown to an HTML fragment, splitting off the front-matter.
pub fn render_markdown(source: &str) -> anyhow::Result<Rendered> {
    let mut front_matter = String::new();
    let mut in_front_matter = false;
    // (language, buffered code) of the fenced block being read
    let mut code_block: Option<(String, String)> = None;
    let mut events = Vec::new();

    for event in Parser::new_ext(source, options()) {
        match event {
            Event::Start(Tag::MetadataBlock(_)) => in_front_matter = true,
            Event::End(TagEnd::MetadataBlock(_)) => in_front_matter = false,
            Event::Text(text) if in_front_matter => front_matter.push_str(&text),
            Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(ref fence))) => {
                code_block = Some((fence.to_string(), String::new()));
            }
            Event::Text(ref text) if code_block.is_some() => {
                if let Some((_, code)) = code_block.as_mut() {
                    code.push_str(text);
                }
            }
            Event::End(TagEnd::CodeBlock) if code_block.is_some() => {
                if let Some((language, code)) = code_block.take() {
                    events.push(Event::Html(highlight_block(&language, &code)?.into()));
                }
            }
            _ => events.push(event),
        }
    }

    let mut body = String::new();
    html::push_html(&mut body, events.into_iter());

    Ok(Rendered {
        html: body,
        front_matter,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const POST: &str = "---
title: Hi
description: A greeting
date: 2024-01-01T00:00:00.000Z
snippet: Short
---

# Hello
";

    #[test]
    fn splits_front_matter_from_body() {
        let rendered = render_markdown(POST).unwrap();
        assert!(rendered.html.contains("<h1>Hello</h1>"));
        assert!(!rendered.html.contains("title:"));

        let front = rendered.front_matter().unwrap();
        assert_eq!(front.title, "Hi");
        assert_eq!(front.description, "A greeting");
        assert_eq!(front.date, "2024-01-01T00:00:00.000Z");
        assert_eq!(front.snippet, "Short");
    }

    #[test]
    fn optional_fields_default_to_empty() {
        let rendered = render_markdown("---\ntitle: Hi\ndate: 2024-01-01\n---\nbody\n").unwrap();
        let front = rendered.front_matter().unwrap();
        assert_eq!(front.description, "");
        assert_eq!(front.snippet, "");
    }

    #[test]
    fn missing_front_matter_is_an_error() {
        let rendered = render_markdown("# Just a heading\n").unwrap();
        let err = rendered.front_matter().unwrap_err();
        assert!(err.to_string().contains("Missing front-matter"));
    }

    #[test]
    fn missing_title_is_an_error() {
        let rendered = render_markdown("---\ndate: 2024-01-01\n---\nbody\n").unwrap();
        assert!(rendered.front_matter().is_err());
    }

    #[test]
    fn renders_tables_strikethrough_and_tasks() {
        let source = "---\ntitle: t\ndate: 2024-01-01\n---\n\n| a | b |\n|---|---|\n| 1 | 2 |\n\n~~gone~~\n\n- [x] done\n";
        let html = render_markdown(source).unwrap().html;
        assert!(html.contains("<table>"));
        assert!(html.contains("<del>gone</del>"));
        assert!(html.contains("type=\"checkbox\""));
    }

    #[test]
    fn fenced_code_is_highlighted() {
        let source = "---\ntitle: t\ndate: 2024-01-01\n---\n\n```rust\nlet x = 1;\n```\n";
        let html = render_markdown(source).unwrap().html;
        assert!(html.contains("data-language=\"rust\""));
        assert!(html.contains("<span style="));
        assert!(!html.contains("class=\"language-rust\""));
    }

    #[test]
    fn indented_code_is_left_alone() {
        let source = "---\ntitle: t\ndate: 2024-01-01\n---\n\n    plain code\n";
        let html = render_markdown(source).unwrap().html;
        assert!(html.contains("<pre><code>plain code"));
    }
}
