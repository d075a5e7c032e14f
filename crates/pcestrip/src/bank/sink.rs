//! Output targets for the bank-splitting encoder.
use std::fs;
use std::io;
use std::path::PathBuf;

/// File name of the index text emitted next to the segments.
pub const INDEX_FILE_NAME: &str = "music.inc";

/// File name of segment `index`.
pub fn segment_file_name(index: usize) -> String {
    format!("vgm_{:04}.bin", index)
}

/// Destination for encoder output: numbered binary segments plus one
/// textual index.
///
/// The encoder hands over each segment as soon as it is full, and the index
/// text once, after the last segment. A failed write aborts the run, so a
/// sink never sees the index of a run whose segments did not all succeed.
pub trait SegmentSink {
    /// Store the contents of segment `index`.
    fn segment(&mut self, index: usize, bytes: &[u8]) -> io::Result<()>;

    /// Store the rendered index text.
    fn index(&mut self, text: &str) -> io::Result<()>;

    /// The string the index text uses to reference segment `index`,
    /// typically a path.
    fn segment_ref(&self, index: usize) -> String {
        segment_file_name(index)
    }
}

/// Sink writing segments and [`INDEX_FILE_NAME`] into one directory.
#[derive(Debug)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    /// The directory must already exist.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        DirectorySink { dir: dir.into() }
    }
}

impl SegmentSink for DirectorySink {
    fn segment(&mut self, index: usize, bytes: &[u8]) -> io::Result<()> {
        fs::write(self.dir.join(segment_file_name(index)), bytes)
    }

    fn index(&mut self, text: &str) -> io::Result<()> {
        fs::write(self.dir.join(INDEX_FILE_NAME), text)
    }

    fn segment_ref(&self, index: usize) -> String {
        self.dir.join(segment_file_name(index)).display().to_string()
    }
}
