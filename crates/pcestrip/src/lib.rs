#![doc = include_str!("../README.md")]
//! pcestrip: PC Engine VGM to bank-split PSG track converter
//!
//! `pcestrip` reads VGM (Video Game Music) register-write logs recorded
//! from the PC Engine's HuC6280 PSG and converts them into per-channel
//! command tracks packed into fixed-size banks, ready to be assembled into
//! a HuC6280 program alongside a small replayer.
//!
//! Key pieces:
//! - `vgm`: header parsing and a bounds-checked cursor over the command
//!   data region (`VgmSource`).
//! - `pce`: the output command set (`TrackOp`), per-channel tracks, the
//!   deduplicated waveform pool, and the converters (`Song`, `Music`).
//! - `bank`: the encoder that packs tracks into 8192-byte segments and
//!   renders the assembler index (`encode`, `SegmentSink`).
//! - `meta`: GD3 tag reading, for reporting.
//!
//! Example: convert a minimal in-memory log
//!
//! ```rust
//! use pcestrip::pce::Music;
//! use pcestrip::vgm::VgmSource;
//!
//! // Minimal VGM image: a bare 1.61 header plus a four-command stream.
//! let mut bytes = vec![0u8; 0xA8];
//! bytes[0x00..0x04].copy_from_slice(b"Vgm ");
//! bytes[0x08..0x0C].copy_from_slice(&0x161u32.to_le_bytes());
//! bytes[0x34..0x38].copy_from_slice(&(0xA8u32 - 0x34).to_le_bytes());
//! bytes[0xA4..0xA8].copy_from_slice(&3_579_545u32.to_le_bytes());
//! bytes.extend_from_slice(&[
//!     0xB9, 0x00, 0x02, // select channel 2
//!     0xB9, 0x07, 0x1F, // channel 2 noise frequency
//!     0x62,             // wait one frame
//!     0x66,             // end of data
//! ]);
//! let eof = bytes.len() as u32 - 4;
//! bytes[0x04..0x08].copy_from_slice(&eof.to_le_bytes());
//!
//! let mut source = VgmSource::from_bytes(&bytes)?;
//! let mut music = Music::new();
//! music.add_song(&mut source)?;
//!
//! // Channel 2 carries the write, the frame delay, and the end marker.
//! let song = &music.songs()[0];
//! assert_eq!(song.tracks()[2].as_bytes(), &[0x07, 0x1F, 0x00, 0xFF]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Packing the result into segment files goes through [`bank::encode`] with
//! a [`bank::SegmentSink`]; [`bank::DirectorySink`] writes `vgm_NNNN.bin`
//! files plus a `music.inc` index into a directory.
mod binutil;
pub mod bank;
pub mod meta;
pub mod pce;
pub mod vgm;

pub use binutil::ParseError;
pub use pce::{ConvertError, Music, Song};
pub use vgm::{VgmHeader, VgmSource};
