//! PDF serialization of laid-out pages using lopdf.

use chrono::{DateTime, Local};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Bookmark, Dictionary, Document as LopdfDocument, Object, ObjectId, Stream};

use crate::error::Result;

use super::font::{encode_win_ansi, Font};
use super::layout::{LaidOutPage, PageGeometry};
use super::two_pass::Rendered;

/// PDF version written.
const PDF_VERSION: &str = "1.5";

/// Document information dictionary values.
#[derive(Debug, Clone)]
pub struct PdfInfo {
    /// Document title
    pub title: String,
    /// Producer application
    pub producer: String,
    /// Creation time
    pub created: DateTime<Local>,
}

impl PdfInfo {
    /// Create info with the crate as producer and the current time.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            producer: format!("reportbook {}", env!("CARGO_PKG_VERSION")),
            created: Local::now(),
        }
    }
}

/// Serialize the final pass to PDF bytes.
///
/// Every table of contents entry also becomes an outline bookmark pointing at
/// the heading's page.
pub fn write_pdf(rendered: &Rendered, geometry: &PageGeometry, info: &PdfInfo) -> Result<Vec<u8>> {
    let mut doc = LopdfDocument::with_version(PDF_VERSION);
    let pages_id = doc.new_object_id();

    let mut fonts = Dictionary::new();
    for font in Font::ALL {
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => font.base_name(),
            "Encoding" => "WinAnsiEncoding",
        });
        fonts.set(font.resource_name(), font_id);
    }
    let resources_id = doc.add_object(dictionary! {
        "Font" => fonts,
    });

    let mut page_ids = Vec::with_capacity(rendered.pages.len());
    for page in &rendered.pages {
        let content = page_content(page);
        let content_id = doc.add_object(Stream::new(Dictionary::new(), content.encode()?));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        page_ids.push(page_id);
    }

    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => page_ids.iter().map(|id| Object::Reference(*id)).collect::<Vec<_>>(),
        "Count" => Object::Integer(page_ids.len() as i64),
        "Resources" => resources_id,
        "MediaBox" => vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Real(geometry.width),
            Object::Real(geometry.height),
        ],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    for entry in &rendered.toc {
        if let Some(page_id) = page_id_for(&page_ids, entry.page) {
            doc.add_bookmark(
                Bookmark::new(entry.text.clone(), [0.0, 0.0, 0.0], 0, page_id),
                None,
            );
        }
    }

    let mut catalog = dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    };
    if let Some(outline_id) = doc.build_outline() {
        catalog.set("Outlines", outline_id);
        catalog.set("PageMode", "UseOutlines");
    }
    let catalog_id = doc.add_object(catalog);
    doc.trailer.set("Root", catalog_id);

    let info_id = doc.add_object(dictionary! {
        "Title" => Object::string_literal(encode_win_ansi(&info.title)),
        "Producer" => Object::string_literal(info.producer.clone()),
        "CreationDate" => Object::string_literal(pdf_date(&info.created)),
    });
    doc.trailer.set("Info", info_id);

    doc.compress();

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)?;
    log::debug!("Serialized {} pages into {} bytes", page_ids.len(), bytes.len());
    Ok(bytes)
}

fn page_id_for(page_ids: &[ObjectId], page: u32) -> Option<ObjectId> {
    let index = usize::try_from(page).ok()?.checked_sub(1)?;
    page_ids.get(index).copied()
}

/// Content stream drawing every run of a page.
fn page_content(page: &LaidOutPage) -> Content {
    let mut operations = Vec::with_capacity(page.lines.len() * 5 + 2);
    operations.push(Operation::new("BT", vec![]));

    for line in &page.lines {
        if line.text.is_empty() {
            continue;
        }
        operations.push(Operation::new(
            "Tf",
            vec![line.font.resource_name().into(), Object::Real(line.size)],
        ));
        // Absolute positioning via the text matrix
        operations.push(Operation::new(
            "Tm",
            vec![
                Object::Integer(1),
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(1),
                Object::Real(line.x),
                Object::Real(line.y),
            ],
        ));
        operations.push(Operation::new(
            "Tj",
            vec![Object::string_literal(encode_win_ansi(&line.text))],
        ));
    }

    operations.push(Operation::new("ET", vec![]));
    Content { operations }
}

/// PDF date string, e.g. `D:20240105143000+01'00'`.
fn pdf_date(time: &DateTime<Local>) -> String {
    let offset = time.format("%z").to_string();
    let (hours, minutes) = offset.split_at(offset.len().saturating_sub(2));
    format!("D:{}{}'{}'", time.format("%Y%m%d%H%M%S"), hours, minutes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Margins;
    use crate::model::TocEntry;
    use crate::render::layout::PlacedLine;
    use chrono::TimeZone;

    fn sample() -> (Rendered, PageGeometry) {
        let geometry = PageGeometry::new(595.28, 841.89, Margins::cm(2.0)).unwrap();
        let mut first = LaidOutPage::new(1);
        first.lines.push(PlacedLine {
            text: "Caf\u{00e9} (draft)".into(),
            x: 56.7,
            y: 770.0,
            font: Font::HelveticaBold,
            size: 18.0,
        });
        let mut second = LaidOutPage::new(2);
        second.lines.push(PlacedLine {
            text: "a.txt".into(),
            x: 56.7,
            y: 770.0,
            font: Font::HelveticaBold,
            size: 14.0,
        });
        let toc = vec![TocEntry::new(0, "a.txt", 2)];
        let rendered = Rendered {
            pages: vec![first, second],
            toc: toc.clone(),
            index: toc,
        };
        (rendered, geometry)
    }

    #[test]
    fn test_write_pdf_loads_back() {
        let (rendered, geometry) = sample();
        let bytes = write_pdf(&rendered, &geometry, &PdfInfo::new("Reports")).unwrap();

        assert!(bytes.starts_with(b"%PDF-1.5"));
        let doc = LopdfDocument::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 2);
    }

    #[test]
    fn test_catalog_has_outline() {
        let (rendered, geometry) = sample();
        let bytes = write_pdf(&rendered, &geometry, &PdfInfo::new("Reports")).unwrap();

        let doc = LopdfDocument::load_mem(&bytes).unwrap();
        let catalog = doc.catalog().unwrap();
        assert!(catalog.get(b"Outlines").is_ok());
    }

    #[test]
    fn test_page_content_operations() {
        let (rendered, _) = sample();
        let content = page_content(&rendered.pages[0]);
        let ops: Vec<_> = content
            .operations
            .iter()
            .map(|op| op.operator.as_str())
            .collect();
        assert_eq!(ops, vec!["BT", "Tf", "Tm", "Tj", "ET"]);
    }

    #[test]
    fn test_page_id_for() {
        let ids = vec![(3, 0), (5, 0)];
        assert_eq!(page_id_for(&ids, 1), Some((3, 0)));
        assert_eq!(page_id_for(&ids, 2), Some((5, 0)));
        assert_eq!(page_id_for(&ids, 0), None);
        assert_eq!(page_id_for(&ids, 3), None);
    }

    #[test]
    fn test_pdf_date() {
        let time = Local.with_ymd_and_hms(2024, 1, 5, 14, 30, 0).unwrap();
        let date = pdf_date(&time);
        assert!(date.starts_with("D:20240105143000"));
        assert!(date.ends_with('\''));
    }
}
