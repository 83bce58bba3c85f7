//! # PDF Export
//!
//! Renders the text report onto US-letter pages using Typst.
//!
//! ## Architecture
//!
//! - One embedded Typst template: fixed 1 in origin, 12 pt monospace text
//! - Report lines are injected as Typst string literals, so report content
//!   is never interpreted as markup
//! - Fonts come from `typst-assets` and are loaded once per process
//! - Output is raw PDF bytes (`Vec<u8>`)
//!
//! A report longer than one page continues on the next page.
//!
//! ## Example
//!
//! ```rust,no_run
//! use pave_core::pdf::{export_report_to_pdf, REPORT_FILE_NAME};
//!
//! let bytes = export_report_to_pdf("Mechanistic-Empirical Pavement Design Report\n").unwrap();
//! std::fs::write(REPORT_FILE_NAME, bytes).unwrap();
//! ```

use std::path::Path;

use chrono::Utc;
use once_cell::sync::Lazy;
use tracing::{error, info};
use typst::diag::{FileError, FileResult};
use typst::foundations::{Bytes, Datetime};
use typst::layout::PagedDocument;
use typst::syntax::{FileId, Source};
use typst::text::{Font, FontBook};
use typst::utils::LazyHash;
use typst::{Library, LibraryExt, World};
use typst_pdf::PdfOptions;

use crate::errors::{PaveError, PaveResult};
use crate::file_io::write_bytes_atomic;

/// Download file name for the exported report
pub const REPORT_FILE_NAME: &str = "pavement_design_report.pdf";

/// MIME type served with the exported report
pub const REPORT_MIME_TYPE: &str = "application/octet-stream";

// ============================================================================
// Typst World Implementation
// ============================================================================

static FONTS: Lazy<Vec<Font>> = Lazy::new(|| {
    typst_assets::fonts()
        .flat_map(|font_bytes| Font::iter(Bytes::new(font_bytes.to_vec())))
        .collect()
});

/// A minimal Typst world for compiling documents without external files.
struct PdfWorld {
    main: Source,
    book: LazyHash<FontBook>,
    library: LazyHash<Library>,
}

impl PdfWorld {
    fn new(source: String) -> Self {
        PdfWorld {
            main: Source::detached(source),
            book: LazyHash::new(FontBook::from_fonts(FONTS.iter())),
            library: LazyHash::new(Library::default()),
        }
    }
}

impl World for PdfWorld {
    fn library(&self) -> &LazyHash<Library> {
        &self.library
    }

    fn book(&self) -> &LazyHash<FontBook> {
        &self.book
    }

    fn main(&self) -> FileId {
        self.main.id()
    }

    fn source(&self, id: FileId) -> FileResult<Source> {
        if id == self.main.id() {
            Ok(self.main.clone())
        } else {
            Err(FileError::NotFound(id.vpath().as_rootless_path().into()))
        }
    }

    fn file(&self, id: FileId) -> FileResult<Bytes> {
        Err(FileError::NotFound(id.vpath().as_rootless_path().into()))
    }

    fn font(&self, index: usize) -> Option<Font> {
        FONTS.get(index).cloned()
    }

    fn today(&self, _offset: Option<i64>) -> Option<Datetime> {
        let now = Utc::now().date_naive();
        Datetime::from_ymd(
            now.format("%Y").to_string().parse().ok()?,
            now.format("%m").to_string().parse().ok()?,
            now.format("%d").to_string().parse().ok()?,
        )
    }
}

// ============================================================================
// Template
// ============================================================================

/// Page layout: US letter, text origin 1 in from the top-left corner
const REPORT_TEMPLATE: &str = r##"
#set page(paper: "us-letter", margin: 1in)
#set text(font: "DejaVu Sans Mono", size: 12pt)
#set par(justify: false, leading: 0.5em)

#let report-lines = {{LINES}}

#for line in report-lines [#line \ ]
"##;

/// Quote a line as a Typst string literal
fn typst_string(line: &str) -> String {
    let mut quoted = String::with_capacity(line.len() + 2);
    quoted.push('"');
    for c in line.chars() {
        match c {
            '\\' => quoted.push_str("\\\\"),
            '"' => quoted.push_str("\\\""),
            '\r' => {}
            _ => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}

fn build_source(report_content: &str) -> String {
    let items: String = report_content
        .lines()
        .map(|line| format!("{},", typst_string(line)))
        .collect::<Vec<_>>()
        .join(" ");
    REPORT_TEMPLATE.replace("{{LINES}}", &format!("({})", items))
}

// ============================================================================
// Rendering
// ============================================================================

/// Render report text to PDF bytes.
///
/// # Returns
///
/// * `Ok(Vec<u8>)` - PDF file as bytes
/// * `Err(PaveError::RenderFailed)` - Typst compilation or PDF export failed
pub fn export_report_to_pdf(report_content: &str) -> PaveResult<Vec<u8>> {
    let world = PdfWorld::new(build_source(report_content));

    let warned = typst::compile::<PagedDocument>(&world);
    let document = warned.output.map_err(|errors| {
        let error_msgs: Vec<String> = errors.iter().map(|e| e.message.to_string()).collect();
        PaveError::render_failed(format!("Typst compilation failed: {}", error_msgs.join("; ")))
    })?;

    let pdf_bytes = typst_pdf::pdf(&document, &PdfOptions::default()).map_err(|errors| {
        let error_msgs: Vec<String> = errors.iter().map(|e| e.message.to_string()).collect();
        PaveError::render_failed(format!("PDF rendering failed: {}", error_msgs.join("; ")))
    })?;

    info!("Report rendered to PDF ({} pages, {} bytes).", document.pages.len(), pdf_bytes.len());
    Ok(pdf_bytes)
}

/// Render report text and write it to `path`.
pub fn save_report_pdf(report_content: &str, path: &Path) -> PaveResult<()> {
    let bytes = export_report_to_pdf(report_content)?;
    write_bytes_atomic(&bytes, path)
        .inspect(|_| info!("Report exported to PDF at {}", path.display()))
        .inspect_err(|e| error!("Failed to export report to PDF: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::performance::DistressResult;
    use crate::report::generate_report;

    #[test]
    fn test_typst_string_escaping() {
        assert_eq!(typst_string("Cost: $5"), "\"Cost: $5\"");
        assert_eq!(typst_string("a \"b\" \\c"), "\"a \\\"b\\\" \\\\c\"");
    }

    #[test]
    fn test_source_has_one_item_per_line() {
        let source = build_source("one\n\nthree");
        assert!(source.contains("(\"one\", \"\", \"three\",)"));
    }

    #[test]
    fn test_pdf_generation() {
        let results = DistressResult {
            fatigue_cracking: 0.00012,
            rutting: 0.05,
            thermal_cracking: 0.001,
        };
        let report = generate_report(&results, 1_086_260.88);
        let pdf = export_report_to_pdf(&report);

        assert!(pdf.is_ok(), "PDF generation failed: {:?}", pdf.err());
        let pdf_bytes = pdf.unwrap();
        assert!(pdf_bytes.starts_with(b"%PDF"), "Output is not a valid PDF");
        assert!(pdf_bytes.len() > 1000, "PDF seems too small");
    }

    #[test]
    fn test_long_report_still_renders() {
        let report: String = (0..200).map(|i| format!("Line {i} with #markup *chars* _here_ $x$\n")).collect();
        let pdf_bytes = export_report_to_pdf(&report).unwrap();
        assert!(pdf_bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_save_report_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(REPORT_FILE_NAME);
        save_report_pdf("Report\n", &path).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
