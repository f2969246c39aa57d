//! Metadata ledger: a single markdown file indexing every post
//!
//! ```text
//! ### Lead Capture Workflow
//! - Sl No- 1
//! - Title- Lead Capture Workflow
//! - Description- Capture leads - then nurture them
//! - Image_path- /blog/posts/images/lead.png
//! - Markdownfile_Path- /blog/posts/lead-capture.md
//! - Date- 2024-01-15
//! - Tags- Sales, crm, email
//! ```
//!
//! Each `###` heading opens a section. A field line is a list item whose
//! text starts with a known key followed by `-` or `:`; the value is the rest
//! of the line, so values may contain hyphens.

use lazy_static::lazy_static;
use regex::Regex;
use std::fs;
use std::io;
use std::path::Path;

use super::frontmatter::split_tags;

/// Written when the ledger is first accessed and does not exist yet
pub const LEDGER_STUB: &str = "# Blog Posts Metadata

This file contains metadata for all blog posts.

## Posts

";

lazy_static! {
    static ref FIELD_LINE: Regex = Regex::new(
        r"(?i)^[-*+]\s*(sl\s*no|title|description|image_path|markdownfile_path|date|tags|slug)\s*[-:]\s?(.*)$"
    )
    .unwrap();
    static ref NON_WORD: Regex = Regex::new(r"[^A-Za-z0-9_\s]").unwrap();
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
}

/// One ledger section, as written
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LedgerEntry {
    /// 1-based position of the section in the file
    pub position: usize,
    /// Text of the `###` heading
    pub heading: String,
    pub serial: Option<String>,
    pub title: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub image_path: Option<String>,
    pub markdown_path: Option<String>,
    pub date: Option<String>,
    pub tags: Vec<String>,
}

impl LedgerEntry {
    /// `post-<Sl No>`, or `post-<position>` when no serial is recorded
    pub fn id(&self) -> String {
        match self.serial.as_deref().filter(|s| !s.is_empty()) {
            Some(serial) => format!("post-{}", serial),
            None => format!("post-{}", self.position),
        }
    }

    /// Display title: the `Title` field, else the heading
    pub fn title(&self) -> &str {
        self.title
            .as_deref()
            .filter(|t| !t.is_empty())
            .unwrap_or(&self.heading)
    }

    /// Lookup key: the `Slug` field, else derived from the heading, else
    /// from the title, else the id when nothing usable is left
    pub fn slug(&self) -> String {
        if let Some(slug) = self.slug.as_deref().filter(|s| !s.is_empty()) {
            return slug.to_string();
        }
        let derived = if self.heading.is_empty() {
            slug_from_title(self.title())
        } else {
            slug_from_title(&self.heading)
        };
        if derived.is_empty() {
            self.id()
        } else {
            derived
        }
    }
}

/// Lower-case, drop anything but ASCII word characters and whitespace,
/// collapse whitespace runs into `-`
pub fn slug_from_title(title: &str) -> String {
    let lowered = title.trim().to_lowercase();
    let stripped = NON_WORD.replace_all(&lowered, "");
    WHITESPACE
        .replace_all(stripped.trim(), "-")
        .into_owned()
}

/// Parse ledger text into entries. Sections missing fields still produce an
/// entry; nothing here fails.
pub fn parse(content: &str) -> Vec<LedgerEntry> {
    let mut entries = Vec::new();
    let mut current: Option<LedgerEntry> = None;

    for line in content.lines() {
        let trimmed = line.trim();

        if let Some(heading) = section_heading(trimmed) {
            if let Some(entry) = current.take() {
                entries.push(entry);
            }
            current = Some(LedgerEntry {
                position: entries.len() + 1,
                heading: heading.to_string(),
                ..Default::default()
            });
            continue;
        }

        let Some(entry) = current.as_mut() else {
            // Preamble before the first section
            continue;
        };

        let Some(caps) = FIELD_LINE.captures(trimmed) else {
            continue;
        };
        let key = caps[1].to_lowercase();
        let value = caps[2].trim().to_string();

        match key.split_whitespace().collect::<String>().as_str() {
            "slno" => entry.serial = Some(value),
            "title" => entry.title = Some(value),
            "slug" => entry.slug = Some(value),
            "description" => entry.description = Some(value),
            "image_path" => entry.image_path = Some(value),
            "markdownfile_path" => entry.markdown_path = Some(value),
            "date" => entry.date = Some(value),
            "tags" => entry.tags = split_tags(&value),
            _ => {}
        }
    }

    if let Some(entry) = current.take() {
        entries.push(entry);
    }

    entries
}

/// `### Heading` opens a section; deeper headings do not
fn section_heading(line: &str) -> Option<&str> {
    let rest = line.strip_prefix("###")?;
    if rest.starts_with('#') {
        return None;
    }
    Some(rest.trim())
}

/// Read the ledger, writing the stub first if the file does not exist
pub fn load_or_init(path: &Path) -> io::Result<Vec<LedgerEntry>> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(parse(&content)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, LEDGER_STUB)?;
            tracing::info!("Created metadata ledger stub at {:?}", path);
            Ok(Vec::new())
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEDGER: &str = "# Blog Posts Metadata

This file contains metadata for all blog posts.

## Posts

### Lead Capture Workflow
- Sl No- 7
- Title- Lead Capture Workflow
- Description- Capture leads - then nurture them
- Image_path- /blog/posts/images/lead.png
- Markdownfile_Path- /blog/posts/lead-capture.md
- Date- 2024-01-15
- Tags- Sales, crm, email

### Invoice Reminders
- Description: Chase unpaid invoices
- Tags: Finance
- Notes- this line is ignored
";

    #[test]
    fn test_parse_sections() {
        let entries = parse(LEDGER);
        assert_eq!(entries.len(), 2);

        let first = &entries[0];
        assert_eq!(first.id(), "post-7");
        assert_eq!(first.title(), "Lead Capture Workflow");
        assert_eq!(first.slug(), "lead-capture-workflow");
        assert_eq!(
            first.description.as_deref(),
            Some("Capture leads - then nurture them")
        );
        assert_eq!(first.image_path.as_deref(), Some("/blog/posts/images/lead.png"));
        assert_eq!(first.markdown_path.as_deref(), Some("/blog/posts/lead-capture.md"));
        assert_eq!(first.date.as_deref(), Some("2024-01-15"));
        assert_eq!(first.tags, vec!["Sales", "crm", "email"]);

        let second = &entries[1];
        assert_eq!(second.id(), "post-2");
        assert_eq!(second.title(), "Invoice Reminders");
        assert_eq!(second.description.as_deref(), Some("Chase unpaid invoices"));
        assert_eq!(second.tags, vec!["Finance"]);
        assert!(second.markdown_path.is_none());
    }

    #[test]
    fn test_section_without_title_does_not_stop_parsing() {
        let content = "###\n- Description- orphan\n\n### Next One\n- Title- Next One\n";
        let entries = parse(content);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].title(), "");
        assert_eq!(entries[0].description.as_deref(), Some("orphan"));
        assert!(entries[0].tags.is_empty());
        assert_eq!(entries[1].title(), "Next One");
    }

    #[test]
    fn test_unusable_heading_slug_falls_back_to_id() {
        let entries = parse("###\n- Description- one\n\n### 日本語ガイド\n- Sl No- 9\n");
        assert_eq!(entries[0].slug(), "post-1");
        assert_eq!(entries[1].slug(), "post-9");
    }

    #[test]
    fn test_explicit_slug_wins() {
        let entries = parse("### Something Else\n- Slug- custom-slug\n");
        assert_eq!(entries[0].slug(), "custom-slug");
    }

    #[test]
    fn test_slug_from_title() {
        assert_eq!(slug_from_title("Hello, World!"), "hello-world");
        assert_eq!(slug_from_title("  CRM   Sync  v2 "), "crm-sync-v2");
        assert_eq!(slug_from_title("snake_case stays"), "snake_case-stays");
    }

    #[test]
    fn test_deeper_headings_are_not_sections() {
        let entries = parse("### One\n#### Details\n- Title- One\n");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title(), "One");
    }

    #[test]
    fn test_stub_has_no_sections() {
        assert!(parse(LEDGER_STUB).is_empty());
    }

    #[test]
    fn test_load_or_init_writes_stub() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blog").join("metadata.md");

        let entries = load_or_init(&path).unwrap();
        assert!(entries.is_empty());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), LEDGER_STUB);

        // Second access reads the stub back without rewriting it
        let entries = load_or_init(&path).unwrap();
        assert!(entries.is_empty());
    }
}
