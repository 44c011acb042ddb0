use pretty_assertions::assert_eq;
use smf_codec::prelude::*;
use std::path::PathBuf;

fn temp_path(name: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("smf_codec_{}_{name}", std::process::id()));
    let _ = std::fs::remove_file(&path);
    path
}

fn sample_file() -> MidiFile {
    let mut file = MidiFile::new(
        Format::Simultaneous,
        Timing::new_ticks_per_quarter_note(96).unwrap(),
    );

    let mut conductor = Track::new(0);
    conductor.push(Message::new(0, MetaMessage::set_tempo(600_000)));
    conductor.push(Message::new(
        0,
        MetaMessage::text_event(MetaType::TrackName, "Conductor"),
    ));
    conductor.push(Message::new(384, MetaMessage::end_of_track()));
    file.add_track(conductor);

    let mut lead = Track::new(0);
    lead.push(Message::new(0, ChannelMessage::program_change(0, 73)));
    lead.push(Message::new(0, ChannelMessage::note_on(0, 72, 90)));
    lead.push(Message::new(96, ChannelMessage::note_on(0, 72, 0)));
    lead.push(Message::new(
        96,
        SysexMessage::new(SysexKind::Start, vec![0x7E, 0x7F, 0x09, 0x01, 0xF7]),
    ));
    lead.push(Message::new(200_000, MetaMessage::end_of_track()));
    file.add_track(lead);
    file
}

#[test]
fn memory_round_trip() {
    let mut file = sample_file();
    assert!(file.has_unsaved_edits());

    let mut stream = ByteStream::memory();
    file.write_to(&mut stream).unwrap();
    assert!(!file.has_unsaved_edits());
    assert_eq!(file.declared_track_count(), 2);

    let bytes = stream.into_bytes();
    assert_eq!(&bytes[..14], b"MThd\0\0\0\x06\0\x01\0\x02\0\x60");

    let read = MidiFile::parse(bytes.clone()).unwrap();
    assert!(read.warnings().is_empty());
    assert_eq!(read.tracks().len(), 2);
    for (index, track) in file.tracks() {
        assert_eq!(read.track(*index).unwrap().messages(), track.messages());
    }

    // a second pass reproduces the bytes exactly
    let mut read = read;
    let mut again = ByteStream::memory();
    read.write_to(&mut again).unwrap();
    assert_eq!(again.into_bytes(), bytes);
}

#[test]
fn running_status_is_expanded_on_write() {
    let original = [
        b'M', b'T', b'h', b'd', 0, 0, 0, 6, 0, 0, 0, 1, 0, 96, //
        b'M', b'T', b'r', b'k', 0, 0, 0, 11, //
        0x00, 0x90, 0x3C, 0x64, //
        0x10, 0x3C, 0x00, //
        0x00, 0xFF, 0x2F, 0x00,
    ];
    let mut file = MidiFile::parse(original).unwrap();
    let mut stream = ByteStream::memory();
    file.write_to(&mut stream).unwrap();
    let bytes = stream.into_bytes();
    assert_eq!(&bytes[14..22], b"MTrk\0\0\0\x0C");
    assert_eq!(&bytes[22..], &[
        0x00, 0x90, 0x3C, 0x64, //
        0x10, 0x90, 0x3C, 0x00, //
        0x00, 0xFF, 0x2F, 0x00,
    ]);
}

#[test]
fn filesystem_round_trip() {
    let path = temp_path("round_trip.mid");
    let mut file = sample_file();
    file.write(&path, false).unwrap();
    assert_eq!(file.path(), Some(path.as_path()));
    assert!(!file.has_unsaved_edits());

    let read = MidiFile::read(&path).unwrap();
    assert_eq!(read.file_name(), path.file_name().and_then(|n| n.to_str()));
    assert_eq!(read.track(1).unwrap().messages(), file.track(1).unwrap().messages());
    assert_eq!(read.track(0).unwrap().get(0).unwrap().as_meta().unwrap().tempo(), Some(600_000));

    std::fs::remove_file(&path).unwrap();
}

#[test]
fn existing_file_is_not_overwritten() {
    let path = temp_path("existing.mid");
    std::fs::write(&path, b"keep me").unwrap();

    let mut file = sample_file();
    assert!(matches!(
        file.write(&path, false),
        Err(FileError::Stream(StreamError::AlreadyExists))
    ));
    assert!(file.has_unsaved_edits());
    assert_eq!(std::fs::read(&path).unwrap(), b"keep me");

    file.write(&path, true).unwrap();
    assert!(MidiFile::read(&path).is_ok());

    std::fs::remove_file(&path).unwrap();
}

#[test]
fn open_stream_cannot_be_reopened() {
    let path = temp_path("in_use.mid");
    sample_file().write(&path, false).unwrap();

    let mut stream = ByteStream::read_file(&path).unwrap();
    assert!(matches!(
        stream.open_read(&path),
        Err(StreamError::AlreadyInUse)
    ));
    assert!(matches!(
        stream.write_u8(0),
        Err(StreamError::WrongMode { expected: StreamMode::Write })
    ));
    assert!(stream.close().unwrap());
    assert!(matches!(stream.read_u8(), Err(StreamError::Closed)));

    std::fs::remove_file(&path).unwrap();
}

#[test]
fn track_management() {
    let mut file = sample_file();
    let mut stream = ByteStream::memory();
    file.write_to(&mut stream).unwrap();

    let removed = file.remove_track(0).unwrap();
    assert!(file.has_unsaved_edits());
    assert_eq!(file.add_track(removed), 2);
    assert_eq!(file.track(2).unwrap().index(), 2);
    assert_eq!(file.tracks().keys().copied().collect::<Vec<_>>(), vec![1, 2]);

    // gaps in the indices are closed up on write
    let mut stream = ByteStream::memory();
    file.write_to(&mut stream).unwrap();
    let read = MidiFile::parse(stream.into_bytes()).unwrap();
    assert_eq!(read.tracks().keys().copied().collect::<Vec<_>>(), vec![0, 1]);
    assert_eq!(read.track(1).unwrap().messages(), file.track(2).unwrap().messages());

    let track = file.track_mut(1).unwrap();
    let id = track.get(1).unwrap().id();
    track.remove(id).unwrap();
    assert!(file.has_unsaved_edits());
}

#[test]
fn oversized_delta_is_clamped() {
    let mut file = MidiFile::new(Format::SingleMultiChannel, Timing::default());
    let mut track = Track::new(0);
    track.push(Message::new(u64::MAX, MetaMessage::end_of_track()));
    file.add_track(track);

    let mut stream = ByteStream::memory();
    file.write_to(&mut stream).unwrap();
    let read = MidiFile::parse(stream.into_bytes()).unwrap();
    assert_eq!(read.track(0).unwrap().get(0).unwrap().tick(), 0x0FFF_FFFF);
}
