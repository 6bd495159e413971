//! End-to-end export tests.

use std::fs;
use std::io::Cursor;

use chatdoc::error::Warning;
use chatdoc::export::{ExportOptions, Exporter, OutputFormat};
use chatdoc::layout::Viewer;
use chatdoc::media::DirectoryResolver;
use chatdoc::model::{Attachment, AttachmentKind, CallEvent, CallStatus, CallType, Message, Transcript};
use chatdoc::{export_transcript, export_transcript_with};
use chrono::{DateTime, TimeZone, Utc};

fn at(day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, day, hour, minute, 0).unwrap()
}

fn png(width: u32, height: u32) -> Vec<u8> {
    let img = image::DynamicImage::ImageRgb8(image::RgbImage::new(width, height));
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

fn transcript() -> Transcript {
    let mut t = Transcript::new();
    t.add_participant("buyer", "Dana");
    t.add_participant("agent", "Sam");

    t.add_message(Message::text("m1", "buyer", at(1, 9, 0), "Is the **flat** still available?"));
    t.add_message(
        Message::text("m2", "agent", at(1, 9, 5), "Yes! Photos at www.homes.example.com/42")
            .replying_to("m1")
            .with_reaction("👍", "buyer"),
    );
    t.add_message(Message::media(
        "m3",
        "agent",
        at(1, 9, 6),
        Attachment::image("https://cdn.example.com/u/7/kitchen.png?sig=abc").with_name("kitchen.png"),
    ));
    t.add_message(
        Message::text("m4", "agent", at(1, 9, 7), "Floor plan attached")
            .with_attachment(Attachment::new(AttachmentKind::Document, "https://cdn.example.com/plan.pdf").with_name("plan.pdf")),
    );
    t.add_call(
        CallEvent::new("c1", "buyer", "agent", CallType::Video, CallStatus::Completed, at(2, 18, 0))
            .with_duration(312),
    );
    t.add_message(Message::text("m5", "buyer", at(2, 18, 10), "Thanks, ~~maybe~~ *definitely* interested").mark_edited());
    t.add_message(Message::text("m6", "agent", at(2, 18, 11), "oops").mark_deleted());
    t.add_message(Message::text("m7", "buyer", at(2, 18, 12), "re: that").replying_to("nope"));
    t
}

fn options() -> ExportOptions {
    ExportOptions::new()
        .with_app_name("Homely")
        .with_subject("deal-42")
        .with_viewer(Viewer::participant("buyer"))
        .with_exported_at(at(3, 12, 0))
        .with_parallel_media(false)
}

#[test]
fn test_text_export_content() {
    let result = export_transcript(&transcript(), options().with_format(OutputFormat::Text)).unwrap();

    assert_eq!(result.filename, "Homely_deal-42_TextOnly_2024-03-03.txt");
    assert_eq!(result.mime_type, "text/plain");

    let text = String::from_utf8(result.bytes.clone()).unwrap();
    assert!(text.contains("Chat transcript: deal-42"));
    assert!(text.contains("Viewed by Dana | text only"));
    assert!(text.contains("Friday, March 1, 2024"));
    assert!(text.contains("Saturday, March 2, 2024"));
    assert!(text.contains("Video call: You called Sam (5m 12s)"));
    assert!(text.contains("Reply to You: Is the flat still available?"));
    assert!(text.contains("+1"));
    assert!(text.contains("(edited)"));
    assert!(text.contains("[Document] plan.pdf"));
    assert!(text.contains("https://cdn.example.com/plan.pdf?download=1"));
    assert!(!text.contains("oops"));
    assert!(text.contains("Page 1 of 1 | Homely | Exported 2024-03-03 12:00"));
}

#[test]
fn test_stats_and_warnings() {
    let result = export_transcript(&transcript(), options()).unwrap();

    assert_eq!(result.stats.message_count, 6);
    assert_eq!(result.stats.call_count, 1);
    assert_eq!(result.stats.divider_count, 2);
    assert_eq!(result.stats.media_count, 2);
    assert_eq!(result.stats.embedded_image_count, 0);
    assert_eq!(
        result.warnings,
        vec![Warning::DanglingReply {
            message_id: "m7".to_string(),
            reply_to_id: "nope".to_string(),
        }]
    );
    assert_eq!(result.stats.warning_count, 1);
}

#[test]
fn test_embedded_image_from_directory() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("kitchen.png"), png(400, 300)).unwrap();
    let resolver = DirectoryResolver::new(dir.path());

    let result = export_transcript_with(&transcript(), options().with_media(true), &resolver).unwrap();
    assert_eq!(result.filename, "Homely_deal-42_WithMedia_2024-03-03.json");
    assert_eq!(result.stats.embedded_image_count, 1);
    assert!(result.metadata.include_media);

    let log: serde_json::Value = serde_json::from_slice(&result.bytes).unwrap();
    let ops = log["pages"][0]["ops"].as_array().unwrap();
    let image = ops.iter().find(|op| op["op"] == "image").unwrap();
    // 400x300 px at 96 dpi is about 105.8 x 79.4, scaled into 60 x 60
    assert!((image["width"].as_f64().unwrap() - 60.0).abs() < 0.01);
    assert!((image["height"].as_f64().unwrap() - 45.0).abs() < 0.01);
    assert!(ops.iter().any(|op| op["op"] == "link"
        && op["url"] == "https://cdn.example.com/u/7/kitchen.png?sig=abc&download=1"));
}

#[test]
fn test_unresolvable_image_becomes_placeholder() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("kitchen.png"), b"not an image").unwrap();
    let resolver = DirectoryResolver::new(dir.path());

    let result = export_transcript_with(&transcript(), options().with_media(true), &resolver).unwrap();
    assert_eq!(result.stats.embedded_image_count, 0);
    assert!(result.warnings.iter().any(|w| matches!(
        w,
        Warning::MediaFetchFailed { url, .. } if url.ends_with("kitchen.png?sig=abc")
    )));
}

#[test]
fn test_observer_view_left_aligned() {
    let options = options().with_viewer(Viewer::Observer);
    let (doc, _) = Exporter::new(options).build_document(&transcript()).unwrap();

    let left_margin = 15.0;
    for page in doc.pages() {
        for placed in page.blocks() {
            assert_eq!(placed.x, left_margin);
        }
    }
    assert_eq!(doc.metadata.perspective, "observer");
}

#[test]
fn test_long_transcript_paginates() {
    let mut t = Transcript::new();
    for i in 0..200 {
        t.add_message(Message::text(
            format!("m{}", i),
            if i % 3 == 0 { "buyer" } else { "agent" },
            at(1 + (i / 50) as u32, 8, (i % 50) as u32),
            "A reasonably long message body that will wrap over more than one line in a bubble.",
        ));
    }

    let result = export_transcript(&t, options()).unwrap();
    assert!(result.page_count() > 5);

    let log: serde_json::Value = serde_json::from_slice(&result.bytes).unwrap();
    assert_eq!(log["page_count"].as_u64().unwrap(), result.page_count() as u64);

    let last = result.page_count();
    let footer = format!("Page {} of {} | Homely", last, last);
    let pages = log["pages"].as_array().unwrap();
    assert!(pages[last as usize - 1]["ops"]
        .as_array()
        .unwrap()
        .iter()
        .any(|op| op["text"].as_str().is_some_and(|t| t.starts_with(&footer))));
}

#[test]
fn test_write_to_directory() {
    let dir = tempfile::tempdir().unwrap();
    let result = export_transcript(&transcript(), options().with_format(OutputFormat::Text)).unwrap();

    let path = result.write_to(dir.path()).unwrap();
    assert!(path.ends_with("Homely_deal-42_TextOnly_2024-03-03.txt"));
    assert_eq!(fs::read(&path).unwrap(), result.bytes);
}

#[test]
fn test_batch_export_independent() {
    let first = transcript();
    let mut second = Transcript::new();
    second.add_message(Message::text("x", "agent", at(5, 10, 0), "hello"));

    let results = Exporter::new(options()).export_batch(&[("deal-42", &first), ("deal-43", &second)]);
    let results: Vec<_> = results.into_iter().map(Result::unwrap).collect();

    assert_eq!(results[0].stats.message_count, 6);
    assert_eq!(results[1].stats.message_count, 1);
    assert!(results[1].warnings.is_empty());
    assert!(results[1].filename.starts_with("Homely_deal-43_"));
}

#[test]
fn test_invalid_transcript_json() {
    let err = Transcript::from_json("{\"messages\": [{\"id\": 1}]}").unwrap_err();
    assert!(matches!(err, chatdoc::Error::InvalidInput(_)));
}
