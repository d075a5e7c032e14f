//! VGM source side: header parsing, command opcodes, and the bounds-checked
//! cursor the converter reads from.
pub mod command;
pub mod header;
pub mod source;

pub use header::VgmHeader;
pub use source::VgmSource;
