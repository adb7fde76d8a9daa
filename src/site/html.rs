use std::fmt::Write as _;
use std::fs;
use std::io::Write as _;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Local, TimeZone};
use log::debug;

use crate::domain::page::Page;
use crate::site::SiteBuilder;

pub struct StaticHtmlSite {
    output_dir: PathBuf,
}

impl StaticHtmlSite {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Filename for a page: its id with `@` and `.` removed, plus `.html`.
    fn page_filename(page: &Page) -> String {
        page.id.replace('@', "").replace('.', "") + ".html"
    }

    fn write_page(&self, page: &Page) -> Result<String> {
        let filename = Self::page_filename(page);
        let path = self.output_dir.join(&filename);
        let mut f = fs::File::create(&path)
            .with_context(|| format!("creating {}", path.display()))?;
        f.write_all(page.body.as_bytes())?;

        // Trailer with the original headers, for audit and debugging.
        f.write_all(b"\n<!--\n")?;
        for h in &page.headers {
            writeln!(f, "{}: {}", h.name, h.value)?;
        }
        f.write_all(b"-->\n")?;
        Ok(filename)
    }
}

impl SiteBuilder for StaticHtmlSite {
    fn build_site(&self, pages: &[Page]) -> Result<()> {
        debug!("creating a static site in {}", self.output_dir.display());
        fs::create_dir_all(&self.output_dir)
            .with_context(|| format!("creating {}", self.output_dir.display()))?;

        let mut index = String::new();
        write!(
            index,
            "<!doctype html><html lang=\"en\">\n\
             <head>\n\
             <meta charset=\"utf-8\">\n\
             <title>News {}</title>\n\
             <style>\n* {{ line-height: 200%; }}\n</style>\n\
             </head>\n\
             <body>\n\
             <ul>\n",
            Local::now().format("%Y-%m-%d %H:%M")
        )?;

        for page in pages {
            let filename = self.write_page(page)?;
            writeln!(
                index,
                "<li>{}: <a href=\"./{}\">{}</a> <br/> {}</li>",
                escape_html(display_name(&page.sender)),
                filename,
                escape_html(&page.subject),
                format_timestamp(page.timestamp),
            )?;
        }

        index.push_str("</ul>\n</body></html>\n");

        debug!("writing index file with a list of {} pages", pages.len());
        fs::write(self.output_dir.join("index.html"), index)
            .with_context(|| format!("writing index in {}", self.output_dir.display()))?;
        Ok(())
    }
}

/// Display-name part of a From value: whatever precedes the angle-bracketed
/// address. An address-only sender comes back unchanged.
fn display_name(sender: &str) -> &str {
    match sender.split_once('<') {
        Some((name, _)) => name.trim(),
        None => sender.trim(),
    }
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn format_timestamp(ts: i64) -> String {
    Local
        .timestamp_opt(ts, 0)
        .single()
        .map(|d| d.format("%A, %d %b, %Y %H:%M").to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::page::{ContentKind, Header, PageBody};

    fn test_page(id: &str, subject: &str, sender: &str) -> Page {
        Page {
            id: id.to_string(),
            timestamp: 1577836800,
            sender: sender.to_string(),
            subject: subject.to_string(),
            kind: ContentKind::Plain,
            headers: vec![Header {
                name: "X-Mailer".to_string(),
                value: "test".to_string(),
            }],
            body: PageBody::Text("Hi there".to_string()),
        }
    }

    #[test]
    fn sanitizes_page_filenames() {
        let page = test_page("abc@example.com", "s", "a");
        assert_eq!(StaticHtmlSite::page_filename(&page), "abcexamplecom.html");
    }

    #[test]
    fn writes_page_files_and_index() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("site");
        let site = StaticHtmlSite::new(&out);

        site.build_site(&[test_page("abc@example.com", "Hello", "Alice <a@x.com>")])
            .unwrap();

        let body = fs::read_to_string(out.join("abcexamplecom.html")).unwrap();
        assert!(body.starts_with("Hi there"));
        assert!(body.contains("X-Mailer: test"));

        let index = fs::read_to_string(out.join("index.html")).unwrap();
        assert!(index.contains("<a href=\"./abcexamplecom.html\">Hello</a>"));
        assert!(index.contains("Alice:"));
    }

    #[test]
    fn escapes_subject_and_sender_in_index() {
        let dir = tempfile::tempdir().unwrap();
        let site = StaticHtmlSite::new(dir.path());

        site.build_site(&[test_page(
            "xss@example.com",
            "<script>alert(1)</script>",
            "Mallory & Co <m@x.com>",
        )])
        .unwrap();

        let index = fs::read_to_string(dir.path().join("index.html")).unwrap();
        assert!(index.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(index.contains("Mallory &amp; Co"));
        assert!(!index.contains("<script>"));
    }

    #[test]
    fn index_lists_pages_in_given_order() {
        let dir = tempfile::tempdir().unwrap();
        let site = StaticHtmlSite::new(dir.path());

        site.build_site(&[
            test_page("first@example.com", "First", "A"),
            test_page("second@example.com", "Second", "B"),
        ])
        .unwrap();

        let index = fs::read_to_string(dir.path().join("index.html")).unwrap();
        let first = index.find("First").unwrap();
        let second = index.find("Second").unwrap();
        assert!(first < second);
    }

    #[test]
    fn binary_body_is_written_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let site = StaticHtmlSite::new(dir.path());

        let mut page = test_page("bin@example.com", "binary", "A");
        page.kind = ContentKind::Binary;
        page.body = PageBody::Binary(vec![0xde, 0xad, 0xbe, 0xef]);
        site.build_site(std::slice::from_ref(&page)).unwrap();

        let bytes = fs::read(dir.path().join("binexamplecom.html")).unwrap();
        assert!(bytes.starts_with(&[0xde, 0xad, 0xbe, 0xef]));
    }

    #[test]
    fn display_name_extraction() {
        assert_eq!(display_name("Alice <a@x.com>"), "Alice");
        assert_eq!(display_name("a@x.com"), "a@x.com");
        assert_eq!(display_name("  Bob  <b@x.com>"), "Bob");
    }

    #[test]
    fn escape_html_covers_markup_characters() {
        assert_eq!(
            escape_html(r#"<a href="x">&'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&amp;&#39;&lt;/a&gt;"
        );
    }
}
