// Text extraction from PDF documents.

use log::{debug, warn};
use lopdf::Document;
use snafu::ResultExt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::Path;

use crate::fairness::{DfResult, ExtractingPdfSnafu, OpeningPdfSnafu};

/// The text of all the pages, concatenated in page order.
///
/// The layout lines of the pages are kept as text lines: a duty line placed
/// below the previous one with a text move starts a new line even when both
/// are drawn in the same text object.
///
/// A file that lopdf cannot open is an `OpeningPdf` error, a document whose
/// text cannot be extracted is an `ExtractingPdf` error.
pub fn read_pdf_text(path: &Path) -> DfResult<String> {
    let p = path.display().to_string();
    let doc = Document::load(path).context(OpeningPdfSnafu { path: p.clone() })?;
    debug!("read_pdf_text: {}: {} pages", p, doc.get_pages().len());

    // pdf_extract panics on some malformed documents.
    let extracted = catch_unwind(AssertUnwindSafe(|| pdf_extract::extract_text(path)));
    match extracted {
        Ok(Ok(text)) => {
            debug!("read_pdf_text: {}: {} chars", p, text.len());
            Ok(text)
        }
        Ok(Err(e)) => ExtractingPdfSnafu {
            path: p,
            reason: e.to_string(),
        }
        .fail(),
        Err(_) => {
            warn!("read_pdf_text: {}: text extraction panicked", p);
            ExtractingPdfSnafu {
                path: p,
                reason: "malformed document",
            }
            .fail()
        }
    }
}

/// Writes a PDF with one page per entry of `pages`. All the lines of a page
/// are drawn in a single text object, each one moved below the previous one.
#[cfg(test)]
pub(crate) fn write_roster_pdf(path: &Path, pages: &[&[&str]]) {
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Object, Stream};

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });

    let mut kids: Vec<Object> = Vec::new();
    for lines in pages.iter() {
        let mut operations = vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 12.into()]),
            Operation::new("Td", vec![50.into(), 780.into()]),
        ];
        for (i, line) in lines.iter().enumerate() {
            if i > 0 {
                operations.push(Operation::new("Td", vec![0.into(), (-20).into()]));
            }
            operations.push(Operation::new("Tj", vec![Object::string_literal(*line)]));
        }
        operations.push(Operation::new("ET", vec![]));
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => dictionary! { "Font" => dictionary! { "F1" => font_id } },
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.save(path).unwrap();
}
