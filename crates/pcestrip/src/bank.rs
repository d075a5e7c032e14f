//! Packing of converted tracks into fixed-size banked segments.
pub mod encoder;
pub mod sink;

pub use encoder::{BANK_SIZE, EncodeSummary, encode};
pub use sink::{DirectorySink, INDEX_FILE_NAME, SegmentSink, segment_file_name};
