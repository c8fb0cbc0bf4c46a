//! Integration tests for pdf-core
//!
//! These tests verify end-to-end functionality with real PDF operations.

use lopdf::content::Content;
use lopdf::{dictionary, Object};
use pdf_core::{Color, PdfDocument, PdfError, Point, Rect, StandardFont, StrokeStyle};
use pretty_assertions::assert_eq;

/// Create a minimal valid PDF with the given pages for testing
///
/// Each page gets its own (possibly empty) content stream.
fn create_test_pdf_with_contents(contents: &[&[u8]], media_box: [f32; 4]) -> Vec<u8> {
    let mut doc = lopdf::Document::new();

    let pages_id = doc.new_object_id();

    let mut page_ids = Vec::new();
    for content in contents {
        let contents_id = doc.add_object(lopdf::Stream::new(dictionary! {}, content.to_vec()));

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => media_box.iter().map(|v| Object::Real(*v)).collect::<Vec<_>>(),
            "Resources" => dictionary! {},
            "Contents" => contents_id,
        });
        page_ids.push(page_id);
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Count" => page_ids.len() as i64,
            "Kids" => page_ids.into_iter().map(Object::Reference).collect::<Vec<_>>(),
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).unwrap();
    buffer
}

/// One empty A4 page
fn create_test_pdf() -> Vec<u8> {
    create_test_pdf_with_contents(&[b""], [0.0, 0.0, 595.28, 841.89])
}

/// A one-page PDF whose page already uses font resource F1
fn create_test_pdf_with_font() -> Vec<u8> {
    let mut doc = lopdf::Document::new();
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });
    let contents_id = doc.add_object(lopdf::Stream::new(
        dictionary! {},
        b"BT /F1 12 Tf 50 700 Td (ORIGINAL) Tj ET".to_vec(),
    ));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => contents_id,
    });

    // Resources and MediaBox are inherited from the page tree node
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Count" => 1,
            "Kids" => vec![Object::Reference(page_id)],
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).unwrap();
    buffer
}

fn number(object: &Object) -> f64 {
    match object {
        Object::Integer(i) => *i as f64,
        Object::Real(r) => *r as f64,
        other => panic!("not a number: {other:?}"),
    }
}

fn page_operations(bytes: &[u8], page: u32) -> Vec<lopdf::content::Operation> {
    let doc = lopdf::Document::load_mem(bytes).unwrap();
    let page_id = doc.get_pages()[&page];
    let content = doc.get_page_content(page_id).unwrap();
    Content::decode(&content).unwrap().operations
}

/// Text shown on a page as (font resource, text, x, y)
fn text_runs(bytes: &[u8], page: u32) -> Vec<(String, String, f64, f64)> {
    let mut runs = Vec::new();
    let mut font = String::new();
    let mut position = (0.0, 0.0);

    for op in page_operations(bytes, page) {
        match op.operator.as_str() {
            "Tf" => font = String::from_utf8(op.operands[0].as_name().unwrap().to_vec()).unwrap(),
            "Td" => position = (number(&op.operands[0]), number(&op.operands[1])),
            "Tj" => {
                let text = match &op.operands[0] {
                    Object::String(bytes, _) => bytes.iter().map(|b| *b as char).collect(),
                    other => panic!("unexpected Tj operand: {other:?}"),
                };
                runs.push((font.clone(), text, position.0, position.1));
            }
            _ => {}
        }
    }

    runs
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 0.01,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn test_open_save_roundtrip() {
    let pdf_data = create_test_pdf();

    let mut doc = PdfDocument::open_from_bytes(&pdf_data).unwrap();
    assert_eq!(doc.page_count(), 1);

    let saved_data = doc.to_bytes().unwrap();
    let doc2 = PdfDocument::open_from_bytes(&saved_data).unwrap();
    assert_eq!(doc2.page_count(), 1);
}

#[test]
fn test_open_invalid_bytes() {
    let result = PdfDocument::open_from_bytes(b"definitely not a pdf");
    assert!(matches!(result, Err(PdfError::OpenError(_))));
}

#[test]
fn test_open_missing_file() {
    let result = PdfDocument::open("/nonexistent/template.pdf");
    assert!(matches!(result, Err(PdfError::OpenError(_))));
}

#[test]
fn test_page_size() {
    let pdf_data = create_test_pdf_with_contents(&[b""], [0.0, 0.0, 612.0, 792.0]);
    let doc = PdfDocument::open_from_bytes(&pdf_data).unwrap();

    let (width, height) = doc.page_size(1).unwrap();
    assert_close(width, 612.0);
    assert_close(height, 792.0);
}

#[test]
fn test_page_size_inherited() {
    let doc = PdfDocument::open_from_bytes(&create_test_pdf_with_font()).unwrap();

    let (width, height) = doc.page_size(1).unwrap();
    assert_close(width, 612.0);
    assert_close(height, 792.0);
}

#[test]
fn test_insert_text_converts_to_bottom_origin() {
    let pdf_data = create_test_pdf_with_contents(&[b""], [0.0, 0.0, 612.0, 792.0]);

    let mut doc = PdfDocument::open_from_bytes(&pdf_data).unwrap();
    doc.set_font(StandardFont::Helvetica, 10.0);
    doc.insert_text("GARCIA", 1, 75.0, 163.0).unwrap();

    let saved_data = doc.to_bytes().unwrap();
    let runs = text_runs(&saved_data, 1);

    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].1, "GARCIA");
    assert_close(runs[0].2, 75.0);
    assert_close(runs[0].3, 792.0 - 163.0);
}

#[test]
fn test_insert_text_box_baseline() {
    let pdf_data = create_test_pdf_with_contents(&[b""], [0.0, 0.0, 612.0, 792.0]);

    let mut doc = PdfDocument::open_from_bytes(&pdf_data).unwrap();
    doc.set_font(StandardFont::Helvetica, 10.0);
    doc.insert_text_box("1234567890", 1, &Rect::new(130.0, 171.0, 330.0, 191.0))
        .unwrap();

    let saved_data = doc.to_bytes().unwrap();
    let runs = text_runs(&saved_data, 1);

    assert_eq!(runs.len(), 1);
    assert_close(runs[0].2, 130.0);
    // Baseline one font size below the top of the box
    assert_close(runs[0].3, 792.0 - 181.0);
}

#[test]
fn test_font_registered_in_resources() {
    let mut doc = PdfDocument::open_from_bytes(&create_test_pdf()).unwrap();
    doc.insert_text("Hello", 1, 100.0, 100.0).unwrap();

    let saved_data = doc.to_bytes().unwrap();
    let saved = lopdf::Document::load_mem(&saved_data).unwrap();
    let page_id = saved.get_pages()[&1];
    let page = saved.get_object(page_id).unwrap().as_dict().unwrap();
    let resources = page.get(b"Resources").unwrap().as_dict().unwrap();
    let fonts = resources.get(b"Font").unwrap().as_dict().unwrap();
    let font_id = fonts.get(b"F1").unwrap().as_reference().unwrap();
    let font = saved.get_object(font_id).unwrap().as_dict().unwrap();

    assert_eq!(font.get(b"BaseFont").unwrap().as_name().unwrap(), b"Helvetica");
}

#[test]
fn test_existing_font_names_are_not_shadowed() {
    let mut doc = PdfDocument::open_from_bytes(&create_test_pdf_with_font()).unwrap();
    doc.insert_text("NEW", 1, 100.0, 100.0).unwrap();

    let saved_data = doc.to_bytes().unwrap();
    let runs = text_runs(&saved_data, 1);

    assert_eq!(runs.len(), 2);
    assert_eq!(runs[0], ("F1".to_string(), "ORIGINAL".to_string(), 50.0, 700.0));
    assert_eq!(runs[1].0, "F2");
    assert_eq!(runs[1].1, "NEW");

    // The inherited F1 is kept next to the new font
    let saved = lopdf::Document::load_mem(&saved_data).unwrap();
    let page_id = saved.get_pages()[&1];
    let page = saved.get_object(page_id).unwrap().as_dict().unwrap();
    let resources = page.get(b"Resources").unwrap().as_dict().unwrap();
    let fonts = resources.get(b"Font").unwrap().as_dict().unwrap();
    assert!(fonts.get(b"F1").is_ok());
    assert!(fonts.get(b"F2").is_ok());
}

#[test]
fn test_existing_content_wrapped_in_saved_state() {
    let mut doc = PdfDocument::open_from_bytes(&create_test_pdf_with_font()).unwrap();
    doc.insert_text("NEW", 1, 100.0, 100.0).unwrap();

    let saved_data = doc.to_bytes().unwrap();
    let operators: Vec<String> = page_operations(&saved_data, 1)
        .into_iter()
        .map(|op| op.operator)
        .collect();

    assert_eq!(operators.first().map(String::as_str), Some("q"));
    let restore = operators.iter().position(|op| op == "Q").unwrap();
    let overlay = operators.iter().rposition(|op| op == "Tj").unwrap();
    assert!(restore < overlay);
}

#[test]
fn test_draw_line() {
    let pdf_data = create_test_pdf_with_contents(&[b""], [0.0, 0.0, 612.0, 792.0]);

    let mut doc = PdfDocument::open_from_bytes(&pdf_data).unwrap();
    let style = StrokeStyle {
        color: Color::black(),
        width: 1.5,
    };
    doc.draw_line(1, Point::new(299.0, 173.0), Point::new(306.0, 180.0), &style)
        .unwrap();

    let saved_data = doc.to_bytes().unwrap();
    let ops = page_operations(&saved_data, 1);

    let move_to = ops.iter().find(|op| op.operator == "m").unwrap();
    assert_close(number(&move_to.operands[0]), 299.0);
    assert_close(number(&move_to.operands[1]), 792.0 - 173.0);

    let line_to = ops.iter().find(|op| op.operator == "l").unwrap();
    assert_close(number(&line_to.operands[0]), 306.0);
    assert_close(number(&line_to.operands[1]), 792.0 - 180.0);

    let width = ops.iter().find(|op| op.operator == "w").unwrap();
    assert_close(number(&width.operands[0]), 1.5);
    assert!(ops.iter().any(|op| op.operator == "S"));
}

#[test]
fn test_fill_circle() {
    let mut doc = PdfDocument::open_from_bytes(&create_test_pdf()).unwrap();
    doc.fill_circle(1, Point::new(50.0, 50.0), 5.0, Color::red())
        .unwrap();

    let saved_data = doc.to_bytes().unwrap();
    let ops = page_operations(&saved_data, 1);

    assert_eq!(ops.iter().filter(|op| op.operator == "c").count(), 4);
    assert!(ops.iter().any(|op| op.operator == "f"));
    let fill = ops.iter().find(|op| op.operator == "rg").unwrap();
    assert_close(number(&fill.operands[0]), 1.0);
}

#[test]
fn test_text_on_second_page_only() {
    let pdf_data = create_test_pdf_with_contents(&[b"", b""], [0.0, 0.0, 595.28, 841.89]);

    let mut doc = PdfDocument::open_from_bytes(&pdf_data).unwrap();
    assert_eq!(doc.page_count(), 2);
    doc.insert_text("Page 2", 2, 100.0, 100.0).unwrap();

    let saved_data = doc.to_bytes().unwrap();
    assert!(text_runs(&saved_data, 1).is_empty());
    assert_eq!(text_runs(&saved_data, 2).len(), 1);
}

#[test]
fn test_empty_text() {
    let mut doc = PdfDocument::open_from_bytes(&create_test_pdf()).unwrap();
    doc.insert_text("", 1, 100.0, 700.0).unwrap();

    let saved_data = doc.to_bytes().unwrap();
    assert!(text_runs(&saved_data, 1).is_empty());
}

#[test]
fn test_very_long_text() {
    let mut doc = PdfDocument::open_from_bytes(&create_test_pdf()).unwrap();

    let long_text = "A".repeat(1000);
    doc.insert_text_box(&long_text, 1, &Rect::new(500.0, 100.0, 700.0, 120.0))
        .unwrap();

    let saved_data = doc.to_bytes().unwrap();
    let runs = text_runs(&saved_data, 1);
    assert_eq!(runs[0].1.len(), 1000);
}

#[test]
fn test_latin1_text_is_win_ansi_encoded() {
    let mut doc = PdfDocument::open_from_bytes(&create_test_pdf()).unwrap();
    doc.insert_text("GARCÍA PEÑA", 1, 100.0, 100.0).unwrap();

    let saved_data = doc.to_bytes().unwrap();
    let runs = text_runs(&saved_data, 1);
    assert_eq!(runs[0].1, "GARCÍA PEÑA");
}

#[test]
fn test_invalid_page_number() {
    let mut doc = PdfDocument::open_from_bytes(&create_test_pdf()).unwrap();

    let result = doc.insert_text("Test", 999, 100.0, 700.0);
    match result {
        Err(PdfError::InvalidPage(page, total)) => {
            assert_eq!(page, 999);
            assert_eq!(total, 1);
        }
        other => panic!("expected InvalidPage, got {other:?}"),
    }

    assert!(matches!(
        doc.draw_line(0, Point::new(0.0, 0.0), Point::new(1.0, 1.0), &StrokeStyle::default()),
        Err(PdfError::InvalidPage(0, 1))
    ));
}

#[test]
fn test_save_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.pdf");

    let mut doc = PdfDocument::open_from_bytes(&create_test_pdf()).unwrap();
    doc.insert_text("Saved", 1, 100.0, 100.0).unwrap();
    doc.save(&output).unwrap();

    let reopened = PdfDocument::open(&output).unwrap();
    assert_eq!(reopened.page_count(), 1);
}

#[test]
fn test_offset_media_box() {
    // Page box starts at (30, 50) rather than the origin
    let pdf_data = create_test_pdf_with_contents(&[b""], [30.0, 50.0, 642.0, 842.0]);

    let mut doc = PdfDocument::open_from_bytes(&pdf_data).unwrap();
    let (width, height) = doc.page_size(1).unwrap();
    assert_close(width, 612.0);
    assert_close(height, 792.0);

    doc.insert_text("X", 1, 100.0, 100.0).unwrap();
    doc.draw_line(1, Point::new(10.0, 20.0), Point::new(15.0, 25.0), &StrokeStyle::default())
        .unwrap();
    doc.fill_circle(1, Point::new(0.0, 0.0), 2.0, Color::red())
        .unwrap();

    let saved_data = doc.to_bytes().unwrap();
    let runs = text_runs(&saved_data, 1);
    assert_close(runs[0].2, 130.0);
    assert_close(runs[0].3, 742.0);

    let ops = page_operations(&saved_data, 1);
    let move_to: Vec<_> = ops.iter().filter(|op| op.operator == "m").collect();

    // Line start
    assert_close(number(&move_to[0].operands[0]), 40.0);
    assert_close(number(&move_to[0].operands[1]), 822.0);

    let line_to = ops.iter().find(|op| op.operator == "l").unwrap();
    assert_close(number(&line_to.operands[0]), 45.0);
    assert_close(number(&line_to.operands[1]), 817.0);

    // Circle path starts on its right edge, at the top-left corner of the box
    assert_close(number(&move_to[1].operands[0]), 32.0);
    assert_close(number(&move_to[1].operands[1]), 842.0);
}

#[test]
fn test_undecodable_content_kept_verbatim() {
    let original_ops = b"BT /F1 12 Tf 50 700 Td (ORIGINAL) Tj ET";
    let hex: String = original_ops.iter().map(|b| format!("{b:02X}")).collect();
    let encoded = format!("{hex}>").into_bytes();

    let mut doc = lopdf::Document::new();
    let pages_id = doc.new_object_id();
    let contents_id = doc.add_object(lopdf::Stream::new(
        dictionary! { "Filter" => "ASCIIHexDecode" },
        encoded.clone(),
    ));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        "Resources" => dictionary! {},
        "Contents" => contents_id,
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Count" => 1,
            "Kids" => vec![Object::Reference(page_id)],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    let mut pdf_data = Vec::new();
    doc.save_to(&mut pdf_data).unwrap();

    let mut doc = PdfDocument::open_from_bytes(&pdf_data).unwrap();
    doc.insert_text("NEW", 1, 100.0, 100.0).unwrap();
    let saved_data = doc.to_bytes().unwrap();

    let saved = lopdf::Document::load_mem(&saved_data).unwrap();
    let page_id = saved.get_pages()[&1];
    let streams: Vec<&lopdf::Stream> = saved
        .get_page_contents(page_id)
        .into_iter()
        .map(|id| saved.get_object(id).unwrap().as_stream().unwrap())
        .collect();

    assert_eq!(streams.len(), 3);
    assert_eq!(streams[0].content, b"q\n");

    // The original stream is still the filtered one, byte for byte
    assert_eq!(
        streams[1].dict.get(b"Filter").unwrap().as_name().unwrap(),
        b"ASCIIHexDecode"
    );
    assert_eq!(streams[1].content, encoded);

    let overlay = Content::decode(&streams[2].content).unwrap();
    let operators: Vec<&str> = overlay.operations.iter().map(|op| op.operator.as_str()).collect();
    assert_eq!(operators.first(), Some(&"Q"));
    assert!(operators.contains(&"Tj"));
}
