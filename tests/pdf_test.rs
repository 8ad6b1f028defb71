//! Integration tests for the PDF container layer.

use std::collections::BTreeMap;

use lopdf::{dictionary, Document, Object};

use pdfmeta::codec::OutlineCodec;
use pdfmeta::{io, Attachment, Destination, Error, OutlineNode, PdfFile};

/// Minimal in-memory document with the given number of pages.
fn sample_doc(page_count: usize) -> Document {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let kids: Vec<Object> = (0..page_count)
        .map(|_| {
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            });
            Object::Reference(page_id)
        })
        .collect();

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count as i64,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc
}

fn entries(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn outline_lines(file: &PdfFile) -> Vec<String> {
    OutlineCodec::new().to_lines(&file.outline(), &file.resolver(), &file.named_destinations())
}

#[test]
fn test_page_count_and_version() {
    let file = PdfFile::from_document(sample_doc(3)).unwrap();
    assert_eq!(file.page_count(), 3);
    assert_eq!(file.version(), "1.5");
}

#[test]
fn test_metadata_round_trip() {
    let mut file = PdfFile::from_document(sample_doc(1)).unwrap();
    assert!(file.metadata().is_empty());

    // the non-ASCII title exercises the UTF-16BE text string path
    let expected = entries(&[("Author", "Jane Doe"), ("Title", "Ünïcode – title")]);
    file.set_metadata(&expected).unwrap();
    assert_eq!(file.metadata(), expected);
}

#[test]
fn test_set_metadata_replaces_all_entries() {
    let mut file = PdfFile::from_document(sample_doc(1)).unwrap();
    file.set_metadata(&entries(&[("Title", "Old"), ("Subject", "Stale")]))
        .unwrap();
    file.set_metadata(&entries(&[("Title", "New")])).unwrap();
    assert_eq!(file.metadata(), entries(&[("Title", "New")]));
}

#[test]
fn test_outline_round_trip_through_document() {
    let mut file = PdfFile::from_document(sample_doc(5)).unwrap();
    assert!(file.outline().is_empty());

    let lines = [
        "Bookmarks",
        "    Title 1|1",
        "        Title 1.1|2",
        "        Title 1.2|3",
        "    Title 2|5",
    ];
    let roots = OutlineCodec::new().parse(&lines);
    file.set_outline(&roots).unwrap();

    assert_eq!(outline_lines(&file), lines);
}

#[test]
fn test_set_outline_replaces_previous_outline() {
    let mut file = PdfFile::from_document(sample_doc(2)).unwrap();
    let codec = OutlineCodec::new();

    file.set_outline(&codec.parse(&["Old A|1", "Old B|2"])).unwrap();
    file.set_outline(&codec.parse(&["Only|1"])).unwrap();

    assert_eq!(outline_lines(&file), ["Only|1"]);
}

#[test]
fn test_set_outline_rejects_page_past_end() {
    let mut file = PdfFile::from_document(sample_doc(3)).unwrap();
    let roots = OutlineCodec::new().parse(&["Beyond|99"]);
    assert!(matches!(
        file.set_outline(&roots),
        Err(Error::PageNotFound(99))
    ));
}

#[test]
fn test_named_destinations_from_catalog_dests() {
    let mut doc = sample_doc(3);
    let page2 = doc.get_pages()[&2];

    let dests = dictionary! {
        "intro" => vec![
            Object::Reference(page2),
            "XYZ".into(),
            Object::Null,
            Object::Null,
            Object::Null,
        ],
    };
    let root_id = doc.trailer.get(b"Root").unwrap().as_reference().unwrap();
    let catalog = doc.get_object_mut(root_id).unwrap().as_dict_mut().unwrap();
    catalog.set("Dests", Object::Dictionary(dests));

    let mut file = PdfFile::from_document(doc).unwrap();
    let named = file.named_destinations();
    assert_eq!(
        named.get("intro").map(String::as_str),
        Some(format!("{} {} R", page2.0, page2.1).as_str())
    );

    // a bookmark pointing at the named destination lands on page 2
    let roots =
        vec![OutlineNode::with_destination("Intro", Destination::Named("intro".into())).unwrap()];
    file.set_outline(&roots).unwrap();
    assert_eq!(outline_lines(&file), ["Intro|2"]);
}

#[test]
fn test_attachments_add_list_remove() {
    let mut file = PdfFile::from_document(sample_doc(1)).unwrap();
    assert!(file.attachments().is_empty());

    let files = [
        Attachment::new("notes.txt", b"some notes".to_vec()),
        Attachment::new("data.csv", b"a,b\n1,2\n".to_vec()),
    ];
    file.add_attachments(&files).unwrap();

    // listed in name order, regardless of insertion order
    let got = file.attachments();
    assert_eq!(
        got.iter().map(|a| a.name.as_str()).collect::<Vec<_>>(),
        ["data.csv", "notes.txt"]
    );
    assert_eq!(got[0].data, b"a,b\n1,2\n");
    assert_eq!(got[1].data, b"some notes");

    file.remove_attachments().unwrap();
    assert!(file.attachments().is_empty());
}

#[test]
fn test_remove_attachments_without_any_is_noop() {
    let mut file = PdfFile::from_document(sample_doc(1)).unwrap();
    file.remove_attachments().unwrap();
    assert!(file.attachments().is_empty());
}

#[test]
fn test_save_and_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("doc.pdf");

    let expected = entries(&[("Title", "Saved")]);
    let mut file = PdfFile::from_document(sample_doc(2)).unwrap();
    file.set_metadata(&expected).unwrap();
    file.save(&path).unwrap();

    let reopened = PdfFile::open(&path).unwrap();
    assert_eq!(reopened.page_count(), 2);
    assert_eq!(reopened.metadata(), expected);
}

#[test]
fn test_file_level_outline_update_and_save() {
    let dir = tempfile::tempdir().unwrap();
    let pdf = dir.path().join("book.pdf");
    sample_doc(4).save(&pdf).unwrap();

    let lines = vec![
        "Contents".to_string(),
        "Chapter 1|1".to_string(),
        "    Section 1.1|2".to_string(),
        "Chapter 2|4".to_string(),
    ];
    let outline_file = dir.path().join("outlines.txt");
    io::write_lines(&outline_file, &lines).unwrap();

    pdfmeta::update_outlines(&pdf, &outline_file).unwrap();

    let saved = dir.path().join("saved.txt");
    pdfmeta::save_outlines(&pdf, &saved).unwrap();
    assert_eq!(io::read_lines(&saved).unwrap(), lines);
}

#[test]
fn test_file_level_metadata_update_and_save() {
    let dir = tempfile::tempdir().unwrap();
    let pdf = dir.path().join("book.pdf");
    sample_doc(1).save(&pdf).unwrap();

    let metadata_file = dir.path().join("metadata.txt");
    io::write_lines(
        &metadata_file,
        &["Author|J. Doe".to_string(), "Title|A Book".to_string()],
    )
    .unwrap();

    pdfmeta::update_metadata(&pdf, &metadata_file).unwrap();

    let saved = dir.path().join("saved.txt");
    pdfmeta::save_metadata(&pdf, &saved).unwrap();
    assert_eq!(
        io::read_lines(&saved).unwrap(),
        ["Author|J. Doe", "Title|A Book"]
    );
}

#[test]
fn test_file_level_attachments() {
    let dir = tempfile::tempdir().unwrap();
    let pdf = dir.path().join("book.pdf");
    sample_doc(1).save(&pdf).unwrap();

    let attachment = dir.path().join("readme.txt");
    std::fs::write(&attachment, b"hello").unwrap();

    pdfmeta::add_attachments(&pdf, &[&attachment]).unwrap();

    let out_dir = dir.path().join("extracted");
    pdfmeta::save_attachments(&pdf, &out_dir).unwrap();
    assert_eq!(
        std::fs::read(out_dir.join("readme.txt")).unwrap(),
        b"hello"
    );

    pdfmeta::remove_attachments(&pdf).unwrap();
    let file = PdfFile::open(&pdf).unwrap();
    assert!(file.attachments().is_empty());
}
