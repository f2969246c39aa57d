//! Markdown rendering: GitHub-flavored markdown to sanitized HTML

use lazy_static::lazy_static;
use pulldown_cmark::{html, CowStr, Event, Options, Parser, Tag, TagEnd};
use regex::{Captures, Regex};
use std::collections::HashMap;

use crate::helpers::html::{html_unescape, strip_html};

lazy_static! {
    // ![alt](./images/file.png) and ![alt](../images/file.png)
    static ref MD_IMAGE_SIBLING: Regex = Regex::new(r"!\[(.*?)\]\(\./images/(.*?)\)").unwrap();
    static ref MD_IMAGE_PARENT: Regex = Regex::new(r"!\[(.*?)\]\(\.\./images/(.*?)\)").unwrap();
    // <img src="./images/file.png"> and <img src="../images/file.png">
    static ref HTML_SRC_SIBLING: Regex = Regex::new(r#"src=["']\./images/([^"']+)["']"#).unwrap();
    static ref HTML_SRC_PARENT: Regex = Regex::new(r#"src=["']\.\./images/([^"']+)["']"#).unwrap();

    static ref EMOJI_SHORTCODE: Regex = Regex::new(r":([a-z0-9_+\-]+):").unwrap();
    static ref HEADING: Regex = Regex::new(r"(?s)<h([1-6])>(.*?)</h[1-6]>").unwrap();
}

/// Markdown renderer producing sanitized HTML with linked headings
pub struct MarkdownRenderer {
    asset_root: String,
    sanitizer: ammonia::Builder<'static>,
}

impl MarkdownRenderer {
    /// Create a renderer that resolves relative images under `asset_root`
    pub fn new(asset_root: &str) -> Self {
        Self {
            asset_root: asset_root.trim_end_matches('/').to_string(),
            sanitizer: sanitizer(),
        }
    }

    /// Render markdown to HTML
    pub fn render(&self, markdown: &str) -> String {
        let markdown = self.rewrite_image_paths(markdown);

        let options = Options::ENABLE_TABLES
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_GFM;
        let parser = Parser::new_ext(&markdown, options);

        let mut events: Vec<Event> = Vec::new();
        let mut in_code_block = false;
        let mut text = String::new();

        for event in parser {
            match event {
                // Adjacent text events are merged so a shortcode split by
                // the parser is still recognised
                Event::Text(t) if !in_code_block => text.push_str(&t),
                event => {
                    flush_text(&mut text, &mut events);
                    match &event {
                        Event::Start(Tag::CodeBlock(_)) => in_code_block = true,
                        Event::End(TagEnd::CodeBlock) => in_code_block = false,
                        _ => {}
                    }
                    events.push(event);
                }
            }
        }
        flush_text(&mut text, &mut events);

        // Raw HTML blocks pass through here and are parsed with the rest of
        // the document by the sanitizer
        let mut html_output = String::new();
        html::push_html(&mut html_output, events.into_iter());

        let clean = self.sanitizer.clean(&html_output).to_string();
        link_headings(&clean)
    }

    /// Point `./images/` and `../images/` references at the site-rooted
    /// asset directory
    pub fn rewrite_image_paths(&self, content: &str) -> String {
        let root = &self.asset_root;
        let content = MD_IMAGE_SIBLING.replace_all(content, format!("![${{1}}]({}/images/${{2}})", root));
        let content = MD_IMAGE_PARENT.replace_all(&content, format!("![${{1}}]({}/images/${{2}})", root));
        let content = HTML_SRC_SIBLING.replace_all(&content, format!(r#"src="{}/images/${{1}}""#, root));
        let content = HTML_SRC_PARENT.replace_all(&content, format!(r#"src="{}/images/${{1}}""#, root));
        content.into_owned()
    }
}

fn flush_text<'a>(text: &mut String, events: &mut Vec<Event<'a>>) {
    if text.is_empty() {
        return;
    }
    let expanded = expand_emoji(text);
    events.push(Event::Text(CowStr::from(expanded)));
    text.clear();
}

/// Replace `:shortcode:` with the emoji it names; unknown codes are kept
pub fn expand_emoji(text: &str) -> String {
    EMOJI_SHORTCODE
        .replace_all(text, |caps: &Captures| match emojis::get_by_shortcode(&caps[1]) {
            Some(emoji) => emoji.as_str().to_string(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

/// Allow-list used for rendered posts. Scripts, styles, event handlers and
/// `javascript:` URLs are dropped; task list checkboxes and code language
/// classes survive.
fn sanitizer() -> ammonia::Builder<'static> {
    let mut builder = ammonia::Builder::default();
    builder
        .add_tags(&["input"])
        .add_tag_attributes("input", &["type", "checked", "disabled"])
        .add_tag_attributes("code", &["class"])
        .add_tag_attributes("img", &["width", "height", "loading"]);
    builder
}

/// Give every heading a unique id and prepend an empty self-link, so links
/// already inside the heading are never nested
fn link_headings(html: &str) -> String {
    let mut slugger = HeadingSlugger::default();
    HEADING
        .replace_all(html, |caps: &Captures| {
            let level = &caps[1];
            let inner = &caps[2];
            let id = slugger.slug(&html_unescape(&strip_html(inner)));
            if id.is_empty() {
                return caps[0].to_string();
            }
            format!(
                r##"<h{level} id="{id}"><a aria-hidden="true" tabindex="-1" href="#{id}"></a>{inner}</h{level}>"##,
                level = level,
                id = id,
                inner = inner
            )
        })
        .into_owned()
}

/// Heading id generator following GitHub's anchor rules: lower-case, drop
/// punctuation, spaces become hyphens, repeats get `-1`, `-2`, ...
#[derive(Debug, Default)]
pub struct HeadingSlugger {
    seen: HashMap<String, usize>,
}

impl HeadingSlugger {
    pub fn slug(&mut self, text: &str) -> String {
        let base: String = text
            .trim()
            .to_lowercase()
            .chars()
            .filter_map(|c| {
                if c.is_alphanumeric() || c == '-' || c == '_' {
                    Some(c)
                } else if c == ' ' {
                    Some('-')
                } else {
                    None
                }
            })
            .collect();

        if base.is_empty() {
            return base;
        }

        let mut slug = base.clone();
        while let Some(count) = self.seen.get_mut(&slug) {
            *count += 1;
            slug = format!("{}-{}", base, count);
        }
        self.seen.insert(slug.clone(), 0);
        slug
    }
}
