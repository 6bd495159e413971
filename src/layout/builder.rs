//! Block construction for timeline entries.
//!
//! Each message, call or divider becomes one [`LayoutBlock`] whose height is
//! known before pagination starts. Attached media are resolved against the
//! prefetched [`MediaCache`]; failures degrade to placeholders and are
//! reported as [`Warning`]s.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};

use super::merge::utc;
use super::{truncate_to_width, LayoutOptions, LineWrapper, TextMeasure};
use crate::error::Warning;
use crate::media::{FetchedImage, MediaCache, MediaEntry};
use crate::model::{
    plain_text, Alignment, Attachment, BlockBody, CallEvent, InlineRun, LayoutBlock,
    MediaDescriptor, MediaRendering, Message, Reaction, Resource, RunStyle, TimelineEntry,
    TimelineItem, Transcript, WrappedLine,
};
use crate::parser;

/// Millimetres per pixel at 96 dpi.
const MM_PER_PIXEL: f32 = 0.264_583;

/// Whose perspective the transcript is rendered from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Viewer {
    /// A chat member; their own items are right-aligned and first-person
    Participant(String),
    /// Someone outside the chat; everything left-aligned, third-person
    #[default]
    Observer,
}

impl Viewer {
    /// Create a participant viewer.
    pub fn participant(id: impl Into<String>) -> Self {
        Viewer::Participant(id.into())
    }

    /// Check if `user_id` is the viewer.
    pub fn is(&self, user_id: &str) -> bool {
        matches!(self, Viewer::Participant(id) if id == user_id)
    }
}

/// Builds sized blocks for one export.
pub struct BlockBuilder<'a> {
    options: &'a LayoutOptions,
    transcript: &'a Transcript,
    media: &'a MediaCache,
    messages: HashMap<&'a str, &'a Message>,
    viewer: Viewer,
    offset: FixedOffset,
    include_media: bool,
    force_download: bool,
    resources: BTreeMap<String, Resource>,
    resource_ids: HashMap<String, String>,
    warnings: Vec<Warning>,
}

impl<'a> BlockBuilder<'a> {
    /// Create a builder over a transcript and its prefetched media.
    pub fn new(options: &'a LayoutOptions, transcript: &'a Transcript, media: &'a MediaCache) -> Self {
        let messages = transcript
            .messages
            .iter()
            .map(|msg| (msg.id.as_str(), msg))
            .collect();

        Self {
            options,
            transcript,
            media,
            messages,
            viewer: Viewer::default(),
            offset: utc(),
            include_media: false,
            force_download: true,
            resources: BTreeMap::new(),
            resource_ids: HashMap::new(),
            warnings: Vec::new(),
        }
    }

    /// Set the viewer.
    pub fn with_viewer(mut self, viewer: Viewer) -> Self {
        self.viewer = viewer;
        self
    }

    /// Set the offset used for time labels.
    pub fn with_offset(mut self, offset: FixedOffset) -> Self {
        self.offset = offset;
        self
    }

    /// Embed fetched images instead of placeholders.
    pub fn with_media(mut self, include: bool) -> Self {
        self.include_media = include;
        self
    }

    /// Rewrite media links to force a download.
    pub fn with_forced_downloads(mut self, force: bool) -> Self {
        self.force_download = force;
        self
    }

    /// Warnings recorded so far.
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Hand over registered resources and recorded warnings.
    pub fn into_parts(self) -> (BTreeMap<String, Resource>, Vec<Warning>) {
        (self.resources, self.warnings)
    }

    fn measure(&self) -> &'a dyn TextMeasure {
        &self.options.font
    }

    /// Build the block for a merged timeline entry.
    pub fn build_entry(&mut self, entry: &TimelineEntry) -> LayoutBlock {
        match entry {
            TimelineEntry::DateDivider { date } => self.divider(*date),
            TimelineEntry::Item(item) => self.build(item, None),
        }
    }

    /// Build the block for an item.
    ///
    /// `wrapped` lets callers supply pre-wrapped message text; when absent
    /// the body is parsed and wrapped here.
    pub fn build(&mut self, item: &TimelineItem, wrapped: Option<Vec<WrappedLine>>) -> LayoutBlock {
        match item {
            TimelineItem::Message(msg) => self.message(msg, wrapped),
            TimelineItem::Call(call) => self.call(call),
        }
    }

    /// Parse and wrap a message body to the bubble text width.
    pub fn wrap_body(&self, msg: &Message) -> Vec<WrappedLine> {
        let Some(body) = msg.body() else {
            return Vec::new();
        };
        let runs = parser::parse(&parser::normalize(body));
        LineWrapper::new(self.measure()).wrap(&runs, self.options.max_text_width())
    }

    /// A date divider.
    pub fn divider(&self, date: NaiveDate) -> LayoutBlock {
        LayoutBlock::new(
            BlockBody::Divider {
                label: date.format("%A, %B %-d, %Y").to_string(),
            },
            Alignment::Left,
            self.options.content_width(),
            self.options.divider_height,
        )
    }

    fn message(&mut self, msg: &Message, wrapped: Option<Vec<WrappedLine>>) -> LayoutBlock {
        let own = self.viewer.is(&msg.sender_id);
        let alignment = if own { Alignment::Right } else { Alignment::Left };
        let sender = self.person(&msg.sender_id);
        let time = self.time_label(msg.timestamp, msg.edited);

        let lines = wrapped.unwrap_or_else(|| self.wrap_body(msg));
        let reply_context = self.reply_context(msg);
        let reactions = summarize_reactions(&msg.reactions)
            .map(|summary| self.fit_text(&summary, RunStyle::Plain));

        // attachment-only messages without context rows are just media
        if lines.is_empty() && reply_context.is_none() && reactions.is_none() {
            if let Some(attachment) = &msg.attachment {
                return self.media_block(attachment, alignment, Some((sender, time)));
            }
        }

        let opts = self.options;
        let mut height = lines.len() as f32 * opts.line_height + opts.vertical_padding();
        if reply_context.is_some() {
            height += opts.reply_row_height;
        }
        if reactions.is_some() {
            height += opts.reactions_row_height;
        }

        let measure = self.measure();
        let content_width = lines
            .iter()
            .map(|line| line.width)
            .chain(std::iter::once(self.meta_width(&sender, &time)))
            .chain(reply_context.iter().map(|r| measure.width(r, RunStyle::Italic)))
            .chain(reactions.iter().map(|r| measure.width(r, RunStyle::Plain)))
            .fold(0.0_f32, f32::max);
        let width = self.bubble_width(content_width);

        let mut block = LayoutBlock::new(
            BlockBody::Message {
                reply_context,
                lines,
                reactions,
            },
            alignment,
            width,
            height,
        )
        .with_labels(Some(sender), Some(time));

        if let Some(attachment) = &msg.attachment {
            let media = self.media_block(attachment, alignment, None);
            block = block.with_sub_block(media);
        }

        block
    }

    fn call(&mut self, call: &CallEvent) -> LayoutBlock {
        let label = self.call_label(call);
        let alignment = if self.viewer.is(&call.caller_id) {
            Alignment::Right
        } else {
            Alignment::Left
        };
        let sender = self.person(&call.caller_id);
        let time = self.time_label(call.start_time, false);

        let lines = LineWrapper::new(self.measure())
            .wrap(&[InlineRun::italic(label)], self.options.max_text_width());
        let height = lines.len() as f32 * self.options.line_height + self.options.vertical_padding();
        let content_width = lines
            .iter()
            .map(|line| line.width)
            .fold(self.meta_width(&sender, &time), f32::max);

        LayoutBlock::new(
            BlockBody::Call { lines },
            alignment,
            self.bubble_width(content_width),
            height,
        )
        .with_labels(Some(sender), Some(time))
    }

    /// Label for a call, phrased for the viewer.
    pub fn call_label(&self, call: &CallEvent) -> String {
        let caller = self.transcript.display_name(&call.caller_id);
        let receiver = self.transcript.display_name(&call.receiver_id);

        let core = if self.viewer.is(&call.caller_id) {
            format!("You called {}", receiver)
        } else if self.viewer.is(&call.receiver_id) {
            format!("{} called you", caller)
        } else {
            format!("{} called {}", caller, receiver)
        };

        let mut label = format!("{} call: {}{}", call.call_type.label(), core, call.status.suffix());
        if call.duration_seconds > 0 {
            label.push_str(&format!(" ({})", crate::model::format_duration(call.duration_seconds)));
        }
        label
    }

    fn media_block(
        &mut self,
        attachment: &Attachment,
        alignment: Alignment,
        labels: Option<(String, String)>,
    ) -> LayoutBlock {
        let opts = self.options;
        let link_url = if self.force_download {
            force_download_url(&attachment.url)
        } else {
            attachment.url.clone()
        };
        let link_text = self.fit_text(&link_url, RunStyle::Link);
        let label = match &attachment.name {
            Some(name) => format!("[{}] {}", attachment.kind.label(), name),
            None => format!("[{}]", attachment.kind.label()),
        };

        let rendering = match self.embedded_image(attachment) {
            Some((resource_id, width, height)) => MediaRendering::Embedded {
                resource_id,
                width,
                height,
            },
            None => MediaRendering::Placeholder {
                height: opts.placeholder_height,
            },
        };

        let visual_width = match &rendering {
            MediaRendering::Embedded { width, .. } => *width,
            MediaRendering::Placeholder { .. } => opts.media_max_width,
        };
        let measure = self.measure();
        let mut content_width = visual_width
            .max(measure.width(&link_text, RunStyle::Link))
            .max(measure.width(&label, RunStyle::Plain));

        let mut height = 2.0 * opts.bubble_padding + rendering.height() + opts.link_row_height;
        if let Some((sender, time)) = &labels {
            height += opts.meta_row_height;
            content_width = content_width.max(self.meta_width(sender, time));
        }

        let block = LayoutBlock::new(
            BlockBody::Media(MediaDescriptor {
                kind: attachment.kind,
                label,
                link_url,
                link_text,
                rendering,
            }),
            alignment,
            self.bubble_width(content_width),
            height,
        );

        match labels {
            Some((sender, time)) => block.with_labels(Some(sender), Some(time)),
            None => block,
        }
    }

    /// Resource id and drawn size for an image that can be embedded.
    fn embedded_image(&mut self, attachment: &Attachment) -> Option<(String, f32, f32)> {
        if !attachment.is_image() || !self.include_media {
            return None;
        }

        let image = match self.media.get(&attachment.url) {
            Some(MediaEntry::Ready(image)) => image,
            Some(MediaEntry::Failed(reason)) => {
                self.warn(Warning::MediaFetchFailed {
                    url: attachment.url.clone(),
                    reason: reason.clone(),
                });
                return None;
            }
            None => {
                self.warn(Warning::MediaFetchFailed {
                    url: attachment.url.clone(),
                    reason: "not prefetched".to_string(),
                });
                return None;
            }
        };

        let (width, height) = fit_image(
            image,
            self.options.media_max_width,
            self.options.media_max_height,
        );
        let resource_id = self.register(&attachment.url, image);
        Some((resource_id, width, height))
    }

    fn register(&mut self, url: &str, image: &FetchedImage) -> String {
        if let Some(id) = self.resource_ids.get(url) {
            return id.clone();
        }
        let id = format!("img{}", self.resource_ids.len() + 1);
        let resource = Resource::image(image.bytes.clone(), image.mime_type.clone(), url)
            .with_dimensions(image.width, image.height);
        self.resources.insert(id.clone(), resource);
        self.resource_ids.insert(url.to_string(), id.clone());
        id
    }

    fn reply_context(&mut self, msg: &Message) -> Option<String> {
        let reply_to = msg.reply_to_id.as_deref()?;

        let Some(target) = self.messages.get(reply_to).copied() else {
            self.warn(Warning::DanglingReply {
                message_id: msg.id.clone(),
                reply_to_id: reply_to.to_string(),
            });
            return None;
        };

        // empty targets are dropped from the timeline, same as deleted ones
        let snippet = match (target.deleted, target.body(), &target.attachment) {
            (false, Some(body), _) => plain_text(&parser::parse(&parser::normalize(body))).replace('\n', " "),
            (false, None, Some(attachment)) => format!("[{}]", attachment.kind.label()),
            _ => "[deleted message]".to_string(),
        };

        let context = format!("Reply to {}: {}", self.person(&target.sender_id), snippet);
        Some(self.fit_text(&context, RunStyle::Italic))
    }

    /// "You" for the viewer, otherwise the display name.
    fn person(&self, user_id: &str) -> String {
        if self.viewer.is(user_id) {
            "You".to_string()
        } else {
            self.transcript.display_name(user_id).to_string()
        }
    }

    fn time_label(&self, at: DateTime<Utc>, edited: bool) -> String {
        let time = at.with_timezone(&self.offset).format("%H:%M").to_string();
        if edited {
            format!("{} (edited)", time)
        } else {
            time
        }
    }

    fn meta_width(&self, sender: &str, time: &str) -> f32 {
        let measure = self.measure();
        measure.width(sender, RunStyle::Bold)
            + measure.width("  ", RunStyle::Plain)
            + measure.width(time, RunStyle::Plain)
    }

    fn bubble_width(&self, content_width: f32) -> f32 {
        (content_width + 2.0 * self.options.horizontal_padding).min(self.options.max_bubble_width())
    }

    fn fit_text(&self, text: &str, style: RunStyle) -> String {
        truncate_to_width(self.measure(), text, style, self.options.max_text_width())
    }

    fn warn(&mut self, warning: Warning) {
        warning.log();
        self.warnings.push(warning);
    }
}

/// Scale an image down (never up) into the bounding box, at 96 dpi.
fn fit_image(image: &FetchedImage, max_width: f32, max_height: f32) -> (f32, f32) {
    let width = image.width as f32 * MM_PER_PIXEL;
    let height = image.height as f32 * MM_PER_PIXEL;
    let scale = (max_width / width).min(max_height / height).min(1.0);
    (width * scale, height * scale)
}

/// Append `download=1` to a URL unless it already asks for a download.
pub fn force_download_url(url: &str) -> String {
    let (base, fragment) = match url.find('#') {
        Some(i) => url.split_at(i),
        None => (url, ""),
    };
    if base.contains("download=") {
        return url.to_string();
    }
    let separator = if base.contains('?') { '&' } else { '?' };
    format!("{}{}download=1{}", base, separator, fragment)
}

/// Group reactions by emoji in first-seen order, e.g. `+1 x2, <3`.
pub fn summarize_reactions(reactions: &[Reaction]) -> Option<String> {
    if reactions.is_empty() {
        return None;
    }

    let mut groups: Vec<(&str, usize)> = Vec::new();
    for reaction in reactions {
        match groups.iter_mut().find(|(emoji, _)| *emoji == reaction.emoji) {
            Some((_, count)) => *count += 1,
            None => groups.push((&reaction.emoji, 1)),
        }
    }

    let parts: Vec<String> = groups
        .into_iter()
        .map(|(emoji, count)| {
            let text = emoji_fallback(emoji);
            if count > 1 {
                format!("{} x{}", text, count)
            } else {
                text
            }
        })
        .collect();
    Some(parts.join(", "))
}

/// ASCII stand-in for an emoji; the output fonts carry no emoji glyphs.
pub fn emoji_fallback(emoji: &str) -> String {
    let base = emoji.trim_end_matches('\u{FE0F}');
    let known = match base {
        "👍" => "+1",
        "👎" => "-1",
        "❤" => "<3",
        "😂" => "haha",
        "😮" => "wow",
        "😢" => "sad",
        "😡" => "angry",
        "🙏" => "thanks",
        "🔥" => "fire",
        "🎉" => "party",
        "👌" => "ok",
        _ if base.is_ascii() => base,
        _ => {
            return base
                .chars()
                .filter(|ch| *ch != '\u{FE0F}' && *ch != '\u{200D}')
                .map(|ch| format!("U+{:04X}", ch as u32))
                .collect::<Vec<_>>()
                .join(" ");
        }
    };
    known.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AttachmentKind, BlockKind, CallStatus, CallType};
    use chrono::TimeZone;
    use std::sync::Arc;

    fn at(hour: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, hour, min, 0).unwrap()
    }

    fn transcript() -> Transcript {
        let mut t = Transcript::new();
        t.add_participant("u1", "Alice");
        t.add_participant("u2", "Bob");
        t.add_message(Message::text("m1", "u1", at(9, 0), "Is the flat still available?"));
        t.add_message(Message::text("m2", "u2", at(9, 5), "gone").mark_deleted());
        t
    }

    fn fetched(width: u32, height: u32) -> FetchedImage {
        FetchedImage {
            bytes: Arc::new(vec![0; 4]),
            width,
            height,
            mime_type: "image/png".to_string(),
        }
    }

    #[test]
    fn test_message_bubble_height() {
        let options = LayoutOptions::default();
        let t = transcript();
        let media = MediaCache::new();
        let mut builder = BlockBuilder::new(&options, &t, &media).with_viewer(Viewer::participant("u1"));

        let block = builder.build(&TimelineItem::Message(t.messages[0].clone()), None);
        assert_eq!(block.kind(), BlockKind::MessageBubble);
        assert_eq!(block.alignment, Alignment::Right);
        assert_eq!(block.sender_label.as_deref(), Some("You"));
        assert_eq!(block.timestamp_label.as_deref(), Some("09:00"));
        assert_eq!(block.line_count(), 1);
        assert_eq!(block.height, 5.0 + options.vertical_padding());
        assert!(block.width <= options.max_bubble_width());
    }

    #[test]
    fn test_supplied_lines_are_used() {
        let options = LayoutOptions::default();
        let t = transcript();
        let media = MediaCache::new();
        let mut builder = BlockBuilder::new(&options, &t, &media);

        let lines = vec![
            WrappedLine::new(vec![InlineRun::plain("a")], 1.0),
            WrappedLine::new(vec![InlineRun::plain("b")], 1.0),
            WrappedLine::new(vec![InlineRun::plain("c")], 1.0),
        ];
        let block = builder.build(&TimelineItem::Message(t.messages[0].clone()), Some(lines));
        assert_eq!(block.line_count(), 3);
        assert_eq!(block.height, 15.0 + options.vertical_padding());
        assert_eq!(block.alignment, Alignment::Left);
        assert_eq!(block.sender_label.as_deref(), Some("Alice"));
    }

    #[test]
    fn test_reply_and_reactions_rows() {
        let options = LayoutOptions::default();
        let mut t = transcript();
        t.add_message(
            Message::text("m3", "u2", at(9, 10), "Yes it is")
                .replying_to("m1")
                .with_reaction("👍", "u1")
                .with_reaction("👍", "u2")
                .with_reaction("❤️", "u1")
                .mark_edited(),
        );
        let media = MediaCache::new();
        let mut builder = BlockBuilder::new(&options, &t, &media).with_viewer(Viewer::participant("u1"));

        let block = builder.build(&TimelineItem::Message(t.messages[2].clone()), None);
        let BlockBody::Message {
            reply_context,
            reactions,
            ..
        } = &block.body
        else {
            panic!("expected message body");
        };
        assert_eq!(
            reply_context.as_deref(),
            Some("Reply to You: Is the flat still available?")
        );
        assert_eq!(reactions.as_deref(), Some("+1 x2, <3"));
        assert_eq!(block.timestamp_label.as_deref(), Some("09:10 (edited)"));
        assert_eq!(block.height, 5.0 + options.vertical_padding() + 5.0 + 5.0);
        assert!(builder.warnings().is_empty());
    }

    #[test]
    fn test_reply_to_deleted_and_dangling() {
        let options = LayoutOptions::default();
        let mut t = transcript();
        t.add_message(Message::text("m4", "u1", at(9, 20), "what?").replying_to("m2"));
        t.add_message(Message::text("m5", "u1", at(9, 21), "hm").replying_to("nope"));
        let media = MediaCache::new();
        let mut builder = BlockBuilder::new(&options, &t, &media);

        let deleted = builder.build(&TimelineItem::Message(t.messages[2].clone()), None);
        match &deleted.body {
            BlockBody::Message { reply_context, .. } => {
                assert_eq!(reply_context.as_deref(), Some("Reply to Bob: [deleted message]"));
            }
            other => panic!("unexpected body {:?}", other),
        }

        let dangling = builder.build(&TimelineItem::Message(t.messages[3].clone()), None);
        assert_eq!(dangling.height, 5.0 + options.vertical_padding());
        assert_eq!(
            builder.warnings(),
            &[Warning::DanglingReply {
                message_id: "m5".to_string(),
                reply_to_id: "nope".to_string()
            }]
        );
    }

    #[test]
    fn test_reply_to_blank_message() {
        let options = LayoutOptions::default();
        let mut t = transcript();
        t.add_message(Message::text("m3", "u2", at(9, 10), "  \n "));
        t.add_message(Message::text("m4", "u1", at(9, 11), "sorry?").replying_to("m3"));
        let media = MediaCache::new();
        let mut builder = BlockBuilder::new(&options, &t, &media);

        let block = builder.build(&TimelineItem::Message(t.messages[3].clone()), None);
        match &block.body {
            BlockBody::Message { reply_context, .. } => {
                assert_eq!(reply_context.as_deref(), Some("Reply to Bob: [deleted message]"));
            }
            other => panic!("unexpected body {:?}", other),
        }
        assert!(builder.warnings().is_empty());
    }

    #[test]
    fn test_call_labels() {
        let options = LayoutOptions::default();
        let t = transcript();
        let media = MediaCache::new();
        let missed = CallEvent::new("c1", "u1", "u2", CallType::Audio, CallStatus::Missed, at(10, 0));
        let completed = CallEvent::new("c2", "u2", "u1", CallType::Video, CallStatus::Completed, at(11, 0))
            .with_duration(312);

        let receiver = BlockBuilder::new(&options, &t, &media).with_viewer(Viewer::participant("u2"));
        let label = receiver.call_label(&missed);
        assert_eq!(label, "Audio call: Alice called you (Missed)");
        assert!(label.ends_with("(Missed)"));

        let caller = BlockBuilder::new(&options, &t, &media).with_viewer(Viewer::participant("u1"));
        assert_eq!(caller.call_label(&missed), "Audio call: You called Bob (Missed)");
        assert_eq!(
            caller.call_label(&completed),
            "Video call: Bob called you (5m 12s)"
        );

        let observer = BlockBuilder::new(&options, &t, &media);
        assert_eq!(
            observer.call_label(&completed),
            "Video call: Bob called Alice (5m 12s)"
        );
    }

    #[test]
    fn test_call_alignment() {
        let options = LayoutOptions::default();
        let t = transcript();
        let media = MediaCache::new();
        let call = TimelineItem::Call(CallEvent::new(
            "c1",
            "u1",
            "u2",
            CallType::Audio,
            CallStatus::Completed,
            at(10, 0),
        ));

        let mut caller = BlockBuilder::new(&options, &t, &media).with_viewer(Viewer::participant("u1"));
        assert_eq!(caller.build(&call, None).alignment, Alignment::Right);

        let mut receiver = BlockBuilder::new(&options, &t, &media).with_viewer(Viewer::participant("u2"));
        assert_eq!(receiver.build(&call, None).alignment, Alignment::Left);

        let mut observer = BlockBuilder::new(&options, &t, &media);
        let block = observer.build(&call, None);
        assert_eq!(block.alignment, Alignment::Left);
        assert_eq!(block.kind(), BlockKind::CallBubble);
    }

    #[test]
    fn test_embedded_image_scaled_into_box() {
        let options = LayoutOptions::default();
        let t = transcript();
        let mut media = MediaCache::new();
        media.insert("https://x.test/big.png", MediaEntry::Ready(fetched(1200, 600)));
        let mut builder = BlockBuilder::new(&options, &t, &media).with_media(true);

        let msg = Message::media("m9", "u1", at(12, 0), Attachment::image("https://x.test/big.png"));
        let block = builder.build(&TimelineItem::Message(msg), None);
        assert_eq!(block.kind(), BlockKind::MediaBlock);

        let BlockBody::Media(descriptor) = &block.body else {
            panic!("expected media body");
        };
        match &descriptor.rendering {
            MediaRendering::Embedded {
                resource_id,
                width,
                height,
            } => {
                assert_eq!(resource_id, "img1");
                assert!((width - 60.0).abs() < 1e-3);
                assert!((height - 30.0).abs() < 1e-3);
            }
            other => panic!("expected embedded image, got {:?}", other),
        }
        assert_eq!(descriptor.link_url, "https://x.test/big.png?download=1");

        let (resources, warnings) = builder.into_parts();
        assert_eq!(resources.len(), 1);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_small_image_not_upscaled() {
        let (w, h) = fit_image(&fetched(96, 48), 60.0, 60.0);
        assert!((w - 25.4).abs() < 0.01);
        assert!((h - 12.7).abs() < 0.01);
    }

    #[test]
    fn test_failed_image_falls_back_to_placeholder() {
        let options = LayoutOptions::default();
        let t = transcript();
        let mut media = MediaCache::new();
        media.insert("https://x.test/bad.png", MediaEntry::Failed("decode: bad".to_string()));
        let mut builder = BlockBuilder::new(&options, &t, &media).with_media(true);

        let msg = Message::text("m9", "u1", at(12, 0), "look")
            .with_attachment(Attachment::image("https://x.test/bad.png").with_name("bad.png"));
        let block = builder.build(&TimelineItem::Message(msg), None);
        assert_eq!(block.kind(), BlockKind::MessageBubble);
        assert_eq!(block.sub_blocks.len(), 1);

        let sub = &block.sub_blocks[0];
        let BlockBody::Media(descriptor) = &sub.body else {
            panic!("expected media body");
        };
        assert_eq!(descriptor.label, "[Image] bad.png");
        assert!(!descriptor.rendering.is_embedded());
        assert_eq!(
            sub.height,
            2.0 * options.bubble_padding + options.placeholder_height + options.link_row_height
        );
        assert!(matches!(
            builder.warnings(),
            [Warning::MediaFetchFailed { .. }]
        ));
    }

    #[test]
    fn test_non_image_never_embedded() {
        let options = LayoutOptions::default();
        let t = transcript();
        let media = MediaCache::new();
        let mut builder = BlockBuilder::new(&options, &t, &media)
            .with_media(true)
            .with_forced_downloads(false);

        let clip = Attachment::new(AttachmentKind::Video, "https://x.test/clip.mp4");
        let block = builder.build(&TimelineItem::Message(Message::media("m9", "u2", at(12, 0), clip)), None);
        let BlockBody::Media(descriptor) = &block.body else {
            panic!("expected media body");
        };
        assert_eq!(descriptor.label, "[Video]");
        assert_eq!(descriptor.link_url, "https://x.test/clip.mp4");
        assert!(builder.warnings().is_empty());
    }

    #[test]
    fn test_divider_label() {
        let options = LayoutOptions::default();
        let t = Transcript::new();
        let media = MediaCache::new();
        let builder = BlockBuilder::new(&options, &t, &media);
        let block = builder.divider(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(
            block.body,
            BlockBody::Divider {
                label: "Monday, January 1, 2024".to_string()
            }
        );
        assert_eq!(block.height, options.divider_height);
    }

    #[test]
    fn test_force_download_url() {
        assert_eq!(force_download_url("https://x.test/a.pdf"), "https://x.test/a.pdf?download=1");
        assert_eq!(
            force_download_url("https://x.test/a.pdf?sig=1#p2"),
            "https://x.test/a.pdf?sig=1&download=1#p2"
        );
        assert_eq!(
            force_download_url("https://x.test/a.pdf?download=0"),
            "https://x.test/a.pdf?download=0"
        );
    }

    #[test]
    fn test_emoji_fallback() {
        assert_eq!(emoji_fallback("👍"), "+1");
        assert_eq!(emoji_fallback("❤️"), "<3");
        assert_eq!(emoji_fallback(":)"), ":)");
        assert_eq!(emoji_fallback("🦄"), "U+1F984");
        assert_eq!(summarize_reactions(&[]), None);
    }
}
