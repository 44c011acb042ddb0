#![doc = r#"
Sequential binary access to a file or an in-memory buffer.

A [`ByteStream`] is opened in exactly one [`StreamMode`]. Reading streams
capture their length when opened and never return short reads; writing
streams track how many bytes have been written. All multi-byte integers are
big-endian, as the Standard MIDI File format requires.

The stream is released when it is [closed](ByteStream::close) or dropped,
so every exit path of a caller gives the handle back.
"#]

mod error;
pub use error::*;

use crate::vlq;
use std::{
    fs::{File, OpenOptions},
    io::{BufReader, BufWriter, ErrorKind, Read, Write},
    path::{Path, PathBuf},
};

/// The direction a [`ByteStream`] was opened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamMode {
    /// Bytes are consumed from the start of the source
    Read,
    /// Bytes are appended to the target
    Write,
}

#[derive(Default)]
enum Backing {
    #[default]
    Closed,
    FileReader(BufReader<File>),
    FileWriter(BufWriter<File>),
    MemoryReader(Vec<u8>),
    MemoryWriter(Vec<u8>),
}

impl Backing {
    const fn mode(&self) -> Option<StreamMode> {
        match self {
            Backing::Closed => None,
            Backing::FileReader(_) | Backing::MemoryReader(_) => Some(StreamMode::Read),
            Backing::FileWriter(_) | Backing::MemoryWriter(_) => Some(StreamMode::Write),
        }
    }
}

/// A single-pass reader or writer over a file or byte buffer.
#[derive(Default)]
pub struct ByteStream {
    backing: Backing,
    /// read mode: total length captured at open. write mode: bytes written so far.
    length: u64,
    position: u64,
    path: Option<PathBuf>,
}

impl core::fmt::Debug for ByteStream {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ByteStream")
            .field("mode", &self.mode())
            .field("length", &self.length)
            .field("position", &self.position)
            .field("path", &self.path)
            .finish()
    }
}

impl ByteStream {
    /// Opens the file at `path` for reading.
    pub fn read_file(path: impl AsRef<Path>) -> StreamResult<Self> {
        let mut stream = Self::default();
        stream.open_read(path)?;
        Ok(stream)
    }

    /// Opens the file at `path` for writing.
    ///
    /// Fails with [`StreamError::AlreadyExists`] if the file exists and
    /// `overwrite` is false.
    pub fn write_file(path: impl AsRef<Path>, overwrite: bool) -> StreamResult<Self> {
        let mut stream = Self::default();
        stream.open_write(path, overwrite)?;
        Ok(stream)
    }

    /// Creates a reading stream over an in-memory buffer.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        let bytes = bytes.into();
        Self {
            length: bytes.len() as u64,
            backing: Backing::MemoryReader(bytes),
            position: 0,
            path: None,
        }
    }

    /// Creates a writing stream that collects its output in memory.
    ///
    /// Retrieve the output with [`ByteStream::into_bytes`].
    pub fn memory() -> Self {
        Self {
            backing: Backing::MemoryWriter(Vec::new()),
            length: 0,
            position: 0,
            path: None,
        }
    }

    /// Opens `path` for reading on a closed stream.
    ///
    /// # Errors
    /// - [`StreamError::AlreadyInUse`] if this stream is already open
    /// - [`StreamError::NotFound`] if `path` does not exist
    /// - [`StreamError::Io`] for any other failure to open
    pub fn open_read(&mut self, path: impl AsRef<Path>) -> StreamResult<()> {
        if self.is_open() {
            return Err(StreamError::AlreadyInUse);
        }
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => StreamError::NotFound,
            _ => StreamError::Io(e),
        })?;
        let length = file.metadata()?.len();

        self.backing = Backing::FileReader(BufReader::new(file));
        self.length = length;
        self.position = 0;
        self.path = Some(path.to_path_buf());
        Ok(())
    }

    /// Opens `path` for writing on a closed stream.
    ///
    /// # Errors
    /// - [`StreamError::AlreadyInUse`] if this stream is already open
    /// - [`StreamError::AlreadyExists`] if `path` exists and `overwrite` is false
    /// - [`StreamError::Io`] for any other failure to create the file
    pub fn open_write(&mut self, path: impl AsRef<Path>, overwrite: bool) -> StreamResult<()> {
        if self.is_open() {
            return Err(StreamError::AlreadyInUse);
        }
        let path = path.as_ref();
        let mut options = OpenOptions::new();
        options.write(true);
        if overwrite {
            options.create(true).truncate(true);
        } else {
            options.create_new(true);
        }
        let file = options.open(path).map_err(|e| match e.kind() {
            ErrorKind::AlreadyExists => StreamError::AlreadyExists,
            _ => StreamError::Io(e),
        })?;

        self.backing = Backing::FileWriter(BufWriter::new(file));
        self.length = 0;
        self.position = 0;
        self.path = Some(path.to_path_buf());
        Ok(())
    }

    /// Flushes and releases the underlying target.
    ///
    /// Returns false if the stream was not open. Bytes collected by an
    /// in-memory writer are discarded; use [`ByteStream::into_bytes`] to keep them.
    pub fn close(&mut self) -> StreamResult<bool> {
        let backing = core::mem::take(&mut self.backing);
        self.length = 0;
        self.position = 0;
        self.path = None;
        match backing {
            Backing::Closed => Ok(false),
            Backing::FileWriter(mut writer) => {
                writer.flush()?;
                Ok(true)
            }
            _ => Ok(true),
        }
    }

    /// Consumes an in-memory writer, returning everything written to it.
    ///
    /// Any other kind of stream is closed and yields an empty buffer.
    pub fn into_bytes(mut self) -> Vec<u8> {
        match core::mem::take(&mut self.backing) {
            Backing::MemoryWriter(bytes) => bytes,
            other => {
                self.backing = other;
                Vec::new()
            }
        }
    }

    /// The mode the stream was opened in, or `None` if closed.
    pub const fn mode(&self) -> Option<StreamMode> {
        self.backing.mode()
    }

    /// True while the stream has an open target.
    pub const fn is_open(&self) -> bool {
        self.mode().is_some()
    }

    /// The path of the open file, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Total length in read mode, bytes written in write mode.
    pub const fn length(&self) -> u64 {
        self.length
    }

    /// Bytes consumed (read mode) or written (write mode) so far.
    pub const fn position(&self) -> u64 {
        self.position
    }

    /// Bytes left to read. Always zero for writing or closed streams.
    pub fn bytes_remaining(&self) -> u64 {
        match self.mode() {
            Some(StreamMode::Read) => self.length - self.position,
            _ => 0,
        }
    }

    /// True if at least `count` more bytes can be read.
    pub fn can_read(&self, count: u64) -> bool {
        self.bytes_remaining() >= count
    }

    fn ensure_mode(&self, expected: StreamMode) -> StreamResult<()> {
        match self.mode() {
            None => Err(StreamError::Closed),
            Some(mode) if mode != expected => Err(StreamError::WrongMode { expected }),
            Some(_) => Ok(()),
        }
    }

    fn ensure_readable(&self, count: u64) -> StreamResult<()> {
        self.ensure_mode(StreamMode::Read)?;
        let remaining = self.bytes_remaining();
        if count > remaining {
            return Err(StreamError::Unavailable {
                requested: count,
                remaining,
            });
        }
        Ok(())
    }

    /// `buf.len()` must already be checked against the remaining length.
    fn fill(&mut self, buf: &mut [u8]) -> StreamResult<()> {
        match &mut self.backing {
            Backing::FileReader(reader) => reader.read_exact(buf)?,
            Backing::MemoryReader(bytes) => {
                let start = self.position as usize;
                buf.copy_from_slice(&bytes[start..start + buf.len()]);
            }
            _ => {
                return Err(StreamError::WrongMode {
                    expected: StreamMode::Read,
                });
            }
        }
        self.position += buf.len() as u64;
        Ok(())
    }

    fn read_array<const N: usize>(&mut self) -> StreamResult<[u8; N]> {
        self.ensure_readable(N as u64)?;
        let mut buf = [0; N];
        self.fill(&mut buf)?;
        Ok(buf)
    }

    /// Reads exactly `count` bytes.
    ///
    /// Fails with [`StreamError::Unavailable`] without consuming anything if
    /// fewer than `count` bytes remain.
    pub fn read_exact(&mut self, count: u64) -> StreamResult<Vec<u8>> {
        self.ensure_readable(count)?;
        let mut buf = vec![0; count as usize];
        self.fill(&mut buf)?;
        Ok(buf)
    }

    /// Discards exactly `count` bytes.
    pub fn skip(&mut self, count: u64) -> StreamResult<()> {
        self.ensure_readable(count)?;
        if let Backing::FileReader(reader) = &mut self.backing {
            let skipped = std::io::copy(&mut reader.by_ref().take(count), &mut std::io::sink())?;
            if skipped != count {
                return Err(std::io::Error::from(ErrorKind::UnexpectedEof).into());
            }
        }
        self.position += count;
        Ok(())
    }

    /// Reads one byte.
    pub fn read_u8(&mut self) -> StreamResult<u8> {
        self.read_array::<1>().map(|[b]| b)
    }

    /// Reads a big-endian u16.
    pub fn read_u16(&mut self) -> StreamResult<u16> {
        self.read_array().map(u16::from_be_bytes)
    }

    /// Reads a big-endian u32.
    pub fn read_u32(&mut self) -> StreamResult<u32> {
        self.read_array().map(u32::from_be_bytes)
    }

    /// Reads a four byte chunk tag.
    pub fn read_tag(&mut self) -> StreamResult<[u8; 4]> {
        self.read_array()
    }

    /// Reads a variable-length quantity, returning its value and encoded size.
    pub fn read_vlq(&mut self) -> StreamResult<(u32, u32)> {
        vlq::decode_with(|| self.read_u8(), || StreamError::MalformedVlq)
    }

    /// Appends `bytes` to the target.
    pub fn write_all(&mut self, bytes: &[u8]) -> StreamResult<()> {
        self.ensure_mode(StreamMode::Write)?;
        match &mut self.backing {
            Backing::FileWriter(writer) => writer.write_all(bytes)?,
            Backing::MemoryWriter(buf) => buf.extend_from_slice(bytes),
            _ => {
                return Err(StreamError::WrongMode {
                    expected: StreamMode::Write,
                });
            }
        }
        self.length += bytes.len() as u64;
        self.position += bytes.len() as u64;
        Ok(())
    }

    /// Writes one byte.
    pub fn write_u8(&mut self, value: u8) -> StreamResult<()> {
        self.write_all(&[value])
    }

    /// Writes a big-endian u16.
    pub fn write_u16(&mut self, value: u16) -> StreamResult<()> {
        self.write_all(&value.to_be_bytes())
    }

    /// Writes a big-endian u32.
    pub fn write_u32(&mut self, value: u32) -> StreamResult<()> {
        self.write_all(&value.to_be_bytes())
    }

    /// Writes a variable-length quantity, returning the number of bytes written.
    pub fn write_vlq(&mut self, value: u32) -> StreamResult<u32> {
        let mut buf = Vec::with_capacity(vlq::MAX_BYTES as usize);
        let written = vlq::encode_into(value, &mut buf);
        self.write_all(&buf)?;
        Ok(written)
    }
}

impl Drop for ByteStream {
    fn drop(&mut self) {
        // flush errors on this path are unreportable
        let _ = self.close();
    }
}
