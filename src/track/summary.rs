use crate::message::Message;
use std::collections::BTreeSet;

/// The general character of a track, judged from its channel messages
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TrackType {
    /// No messages
    #[default]
    Unknown,
    /// Channel messages, none on the drum channel
    Note,
    /// At least one channel message on channel 10 (index 9)
    Drum,
    /// Only meta and sysex messages
    Meta,
}

/// Zero-based channel reserved for percussion by General MIDI
pub const DRUM_CHANNEL: u8 = 9;

/// Facts derived from a track's messages. Never written to the file.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TrackSummary {
    /// What the track mostly carries
    pub track_type: TrackType,
    /// Lowest note of any Note On/Off
    pub min_note: Option<u8>,
    /// Highest note of any Note On/Off
    pub max_note: Option<u8>,
    /// Channels with any channel message
    pub channels_used: BTreeSet<u8>,
    /// Channels with Note On/Off messages
    pub channels_with_notes: BTreeSet<u8>,
    /// Distinct note numbers of Note On/Off messages
    pub note_values: BTreeSet<u8>,
}

impl TrackSummary {
    pub(crate) fn from_messages(messages: &[Message]) -> Self {
        let mut summary = Self::default();
        if messages.is_empty() {
            return summary;
        }
        for channel_msg in messages.iter().filter_map(Message::as_channel) {
            let channel = channel_msg.channel();
            summary.channels_used.insert(channel);
            if channel_msg.is_note() {
                if let Some(note) = channel_msg.note() {
                    summary.note_values.insert(note);
                }
                summary.channels_with_notes.insert(channel);
            }
        }
        summary.min_note = summary.note_values.first().copied();
        summary.max_note = summary.note_values.last().copied();
        summary.track_type = if summary.channels_used.contains(&DRUM_CHANNEL) {
            TrackType::Drum
        } else if summary.channels_used.is_empty() {
            TrackType::Meta
        } else {
            TrackType::Note
        };
        summary
    }
}
