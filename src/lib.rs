#![doc = r#"
A reader and writer for Standard MIDI Files.

`smf-codec` converts between the SMF binary wire format and an in-memory
event model. Reading a file and writing it back reproduces every event
byte-for-byte, with one exception: running-status compression is never
re-introduced on write, so each track stays independently decodable.

# Layout

```text
MidiFile ── Track ── Message
   │          │         ├─ ChannelMessage
   │          │         ├─ MetaMessage
   │          │         └─ SysexMessage
   │          └─ read/write against a ByteStream
   └─ MThd header, tick-ordered merge of all tracks
```

# Reading a file

```rust,no_run
use smf_codec::prelude::*;

let file = MidiFile::read("song.mid").unwrap();
for warning in file.warnings() {
    eprintln!("{warning}");
}

let sequence = file.merge_tracks_by_tick();
for merged in sequence.iter() {
    println!("{:>8} track {} {:02X?}", merged.message.tick(), merged.track, merged.message.wire_bytes());
}
```

# Features

- `tracing` (default): log skipped tracks and file anomalies through [`tracing`](https://docs.rs/tracing).
- `serde`: derive `Serialize`/`Deserialize` for the value types.
"#]
#![warn(missing_docs)]

mod error;
pub use error::*;

pub mod file;
pub mod message;
pub mod reader;
pub mod stream;
pub mod track;
pub mod vlq;

mod micros;
pub use micros::*;

/// Commonly used types
pub mod prelude {
    pub use crate::{
        error::*,
        file::{chunk::*, *},
        message::{channel::*, meta::*, *},
        micros::*,
        reader::{ReadResult, Reader, ReaderError, ReaderErrorKind},
        stream::*,
        track::*,
    };
}
