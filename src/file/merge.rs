#![doc = r#"
Merging the tracks of a file into one tick-ordered sequence

[`TickMerge`] walks every track at once and always yields the earliest
pending message. When several tracks have a message at the same tick, the
track with the lowest index goes first. Within a track the stored order is
kept. The tracks themselves are never modified.

[`PlayableSequence`] is the collected result, together with the warnings
found along the way.
"#]

use crate::{
    message::{Message, MessageKind, meta::MetaMessage},
    track::Track,
};
use thiserror::Error;

/// Receives raw MIDI bytes, one complete message per call
pub trait MidiSink {
    /// Deliver one message
    fn send(&mut self, bytes: &[u8]);
}

impl<F> MidiSink for F
where
    F: FnMut(&[u8]),
{
    fn send(&mut self, bytes: &[u8]) {
        self(bytes)
    }
}

/// A message together with the track it came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergedMessage<'a> {
    /// Index of the source track
    pub track: u32,
    /// The message
    pub message: &'a Message,
}

/// Problems noticed while merging. None of them stop the merge.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MergeWarning {
    /// A track's last message is not End of Track.
    #[error("Track {track} ends with status {last_status:#04X} instead of End of Track")]
    MissingEndOfTrack {
        /// Index of the track
        track: u32,
        /// Status byte of its last message
        last_status: u8,
        /// Type byte, if the last message is a meta message
        meta_type: Option<u8>,
    },
    /// The file has no tracks.
    #[error("No tracks in file")]
    NoTracks,
}

/// A lazy k-way merge over several tracks
#[derive(Debug, Clone)]
pub struct TickMerge<'a> {
    cursors: Vec<(u32, &'a [Message])>,
    remaining: usize,
}

impl<'a> TickMerge<'a> {
    /// Merge `tracks`, given with their indices.
    ///
    /// Ties between tracks are broken by index, so the tracks may be given
    /// in any order.
    pub fn new(tracks: impl IntoIterator<Item = (u32, &'a Track)>) -> Self {
        let mut cursors: Vec<(u32, &'a [Message])> = tracks
            .into_iter()
            .map(|(index, track)| (index, track.messages()))
            .filter(|(_, messages)| !messages.is_empty())
            .collect();
        cursors.sort_by_key(|(index, _)| *index);
        let remaining = cursors.iter().map(|(_, m)| m.len()).sum();
        Self { cursors, remaining }
    }
}

impl<'a> Iterator for TickMerge<'a> {
    type Item = MergedMessage<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut best: Option<(usize, u64)> = None;
        for (slot, (_, messages)) in self.cursors.iter().enumerate() {
            let Some(first) = messages.first() else {
                continue;
            };
            match best {
                Some((_, tick)) if first.tick() >= tick => {}
                _ => best = Some((slot, first.tick())),
            }
        }
        let (slot, _) = best?;

        let (track, messages) = &mut self.cursors[slot];
        let track = *track;
        let current: &'a [Message] = *messages;
        let (message, rest) = current.split_first()?;
        *messages = rest;
        if rest.is_empty() {
            self.cursors.remove(slot);
        }
        self.remaining -= 1;
        Some(MergedMessage { track, message })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for TickMerge<'_> {}

/// Every message of a file in playback order
#[derive(Debug, Clone, Default)]
pub struct PlayableSequence<'a> {
    messages: Vec<MergedMessage<'a>>,
    warnings: Vec<MergeWarning>,
}

impl<'a> PlayableSequence<'a> {
    /// Merge `tracks` and check that each ends with End of Track
    pub fn new(tracks: impl IntoIterator<Item = (u32, &'a Track)> + Clone) -> Self {
        let mut warnings = Vec::new();
        let mut track_count = 0;
        for (index, track) in tracks.clone() {
            track_count += 1;
            let Some(last) = track.messages().last() else {
                continue;
            };
            if !last.is_end_of_track() {
                let warning = MergeWarning::MissingEndOfTrack {
                    track: index,
                    last_status: last.status(),
                    meta_type: last.as_meta().map(MetaMessage::meta_type),
                };
                #[cfg(feature = "tracing")]
                tracing::warn!("{warning}");
                warnings.push(warning);
            }
        }
        if track_count == 0 {
            #[cfg(feature = "tracing")]
            tracing::warn!("{}", MergeWarning::NoTracks);
            warnings.push(MergeWarning::NoTracks);
        }

        Self {
            messages: TickMerge::new(tracks).collect(),
            warnings,
        }
    }

    /// The merged messages
    pub fn messages(&self) -> &[MergedMessage<'a>] {
        &self.messages
    }

    /// Iterate the merged messages
    pub fn iter(&self) -> std::slice::Iter<'_, MergedMessage<'a>> {
        self.messages.iter()
    }

    /// Number of merged messages
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// True if there are no messages
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Warnings found while merging
    pub fn warnings(&self) -> &[MergeWarning] {
        &self.warnings
    }

    /// Send every channel and sysex message, in order, to `sink`.
    ///
    /// Meta messages are file-only and are skipped. Sysex messages are sent
    /// in device form (see [`SysexMessage::transmit_bytes`](crate::message::SysexMessage::transmit_bytes)).
    /// Returns the number of messages sent.
    pub fn dispatch(&self, sink: &mut impl MidiSink) -> usize {
        let mut buf = Vec::new();
        let mut sent = 0;
        for merged in &self.messages {
            match merged.message.kind() {
                MessageKind::Channel(_) => {
                    buf.clear();
                    merged.message.write_wire_bytes(&mut buf);
                    sink.send(&buf);
                }
                MessageKind::Sysex(sysex) => sink.send(&sysex.transmit_bytes()),
                MessageKind::Meta(_) => continue,
            }
            sent += 1;
        }
        sent
    }
}

impl<'s, 'a> IntoIterator for &'s PlayableSequence<'a> {
    type Item = &'s MergedMessage<'a>;
    type IntoIter = std::slice::Iter<'s, MergedMessage<'a>>;
    fn into_iter(self) -> Self::IntoIter {
        self.messages.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{SysexKind, SysexMessage, channel::ChannelMessage};
    use pretty_assertions::assert_eq;

    fn track(index: u32, ticks: &[u64], end: bool) -> Track {
        let mut track = Track::new(index);
        for (key, &tick) in ticks.iter().enumerate() {
            track.push(Message::new(
                tick,
                ChannelMessage::note_on(index as u8, key as u8, 100),
            ));
        }
        if end {
            let last = ticks.last().copied().unwrap_or(0);
            track.push(Message::new(last, MetaMessage::end_of_track()));
        }
        track
    }

    #[test]
    fn earliest_tick_first_and_ties_to_lowest_track() {
        let a = track(0, &[0, 100, 200], false);
        let b = track(1, &[50, 100, 300], false);
        let merged: Vec<(u64, u32)> = TickMerge::new([(1, &b), (0, &a)])
            .map(|m| (m.message.tick(), m.track))
            .collect();
        assert_eq!(
            merged,
            vec![(0, 0), (50, 1), (100, 0), (100, 1), (200, 0), (300, 1)]
        );
    }

    #[test]
    fn exact_size() {
        let a = track(0, &[0, 10], true);
        let empty = Track::new(1);
        let mut merge = TickMerge::new([(0, &a), (1, &empty)]);
        assert_eq!(merge.len(), 3);
        merge.next();
        assert_eq!(merge.len(), 2);
    }

    #[test]
    fn warnings() {
        let a = track(0, &[0], true);
        let b = track(1, &[5], false);
        let sequence = PlayableSequence::new([(0, &a), (1, &b)]);
        assert_eq!(sequence.len(), 3);
        assert_eq!(
            sequence.warnings(),
            &[MergeWarning::MissingEndOfTrack {
                track: 1,
                last_status: 0x91,
                meta_type: None
            }]
        );

        let none: [(u32, &Track); 0] = [];
        let sequence = PlayableSequence::new(none);
        assert!(sequence.is_empty());
        assert_eq!(sequence.warnings(), &[MergeWarning::NoTracks]);
    }

    #[test]
    fn dispatch_skips_meta() {
        let mut t = track(0, &[0], true);
        t.push(Message::new(
            0,
            SysexMessage::new(SysexKind::Start, vec![0x7E, 0xF7]),
        ));
        let sequence = PlayableSequence::new([(0, &t)]);

        let mut sent = Vec::new();
        let count = sequence.dispatch(&mut |bytes: &[u8]| sent.push(bytes.to_vec()));
        assert_eq!(count, 2);
        assert_eq!(sent, vec![vec![0x90, 0, 100], vec![0xF0, 0x7E, 0xF7]]);
    }
}
