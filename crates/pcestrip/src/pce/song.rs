//! Conversion of one VGM command stream into a six-channel song.
//!
//! The converter makes a single forward pass over the source. HuC6280
//! register writes are re-emitted as track commands on the currently
//! selected channel, VGM waits collapse into lazily flushed per-channel
//! frame delays, and waveform uploads (a register 4 start followed by
//! register 6 data bytes) are captured whole and replaced by an index into
//! the shared [`WavePool`].
use std::fmt;

use crate::pce::command::TrackOp;
use crate::pce::track::ChannelTrack;
use crate::pce::wave::{WAVE_SIZE, WavePool};
use crate::vgm::command;
use crate::vgm::source::VgmSource;

/// Number of PSG channels on the HuC6280.
pub const CHANNEL_COUNT: usize = 6;

/// Samples per playback frame at the target refresh rate.
pub const SAMPLES_PER_FRAME: u16 = 733;

// HuC6280 register indices with converter-side behavior. Everything else
// passes through as a verbatim (register, data) pair.
const REG_CHANNEL_SELECT: u8 = 0x00;
const REG_CHANNEL_CONTROL: u8 = 0x04;
const REG_WAVE_DATA: u8 = 0x06;

/// Error raised while decoding a command stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConvertError {
    /// The stream ended inside a command, or without an end-of-data command.
    ///
    /// `offset` is the data-region-relative position of the command being
    /// decoded when the stream ran out.
    TruncatedStream { offset: usize },

    /// A command byte the converter does not understand.
    ///
    /// Operand lengths of unknown commands are unknowable, so decoding
    /// cannot resync and fails on the spot.
    UnknownOpcode { opcode: u8, offset: usize },

    /// More distinct waveforms than the one-byte wave-op operand can index.
    WavePoolOverflow,

    /// A subtrack extraction asked for a channel the chip does not have.
    ChannelOutOfRange { channel: usize },
}

impl fmt::Display for ConvertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConvertError::TruncatedStream { offset } => {
                write!(f, "command stream truncated at offset 0x{:X}", offset)
            }
            ConvertError::UnknownOpcode { opcode, offset } => {
                write!(
                    f,
                    "unsupported command 0x{:02X} at offset 0x{:X}",
                    opcode, offset
                )
            }
            ConvertError::WavePoolOverflow => {
                write!(f, "waveform pool exceeds 256 entries")
            }
            ConvertError::ChannelOutOfRange { channel } => {
                write!(f, "channel {} out of range (0-5)", channel)
            }
        }
    }
}

impl std::error::Error for ConvertError {}

/// A fully converted song: one frozen command track per channel, plus the
/// per-channel loop entry offsets when the source declared a loop point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Song {
    tracks: [ChannelTrack; CHANNEL_COUNT],
    loop_marks: Option<[usize; CHANNEL_COUNT]>,
}

impl Song {
    /// Convert the command stream of `source` into a song, interning
    /// waveforms into `waves`.
    ///
    /// The source is rewound first, so a source already used for another
    /// conversion can be passed again. On failure nothing of the partial
    /// song survives; `waves` may have grown, which is harmless because a
    /// failed conversion fails its whole run.
    pub fn convert(source: &mut VgmSource, waves: &mut WavePool) -> Result<Song, ConvertError> {
        Converter::new(waves).run(source)
    }

    /// The frozen per-channel tracks, channel 0 first.
    pub fn tracks(&self) -> &[ChannelTrack; CHANNEL_COUNT] {
        &self.tracks
    }

    /// Loop entry offsets into each channel's track, or `None` when the
    /// source declared no loop point.
    pub fn loop_marks(&self) -> Option<[usize; CHANNEL_COUNT]> {
        self.loop_marks
    }
}

/// Transient state of one conversion pass.
struct Converter<'a> {
    waves: &'a mut WavePool,
    tracks: [ChannelTrack; CHANNEL_COUNT],
    /// Frames owed to each channel since its last emitted command.
    delays: [u64; CHANNEL_COUNT],
    loop_marks: Option<[usize; CHANNEL_COUNT]>,
    /// Channel addressed by register writes, set via register 0.
    channel: usize,
    /// Waveform upload scratch; `wave_len > 0` means an upload is open.
    wave: [u8; WAVE_SIZE],
    wave_len: usize,
}

impl<'a> Converter<'a> {
    fn new(waves: &'a mut WavePool) -> Self {
        Converter {
            waves,
            tracks: Default::default(),
            delays: [0; CHANNEL_COUNT],
            loop_marks: None,
            channel: 0,
            wave: [0; WAVE_SIZE],
            wave_len: 0,
        }
    }

    fn run(mut self, source: &mut VgmSource) -> Result<Song, ConvertError> {
        source.rewind();
        let loop_at = source.loop_position();

        loop {
            // The loop point is matched against the position before the
            // command byte, so the captured track sizes exclude anything the
            // upcoming command will emit.
            if let Some(mark) = loop_at
                && source.position() == mark
                && self.loop_marks.is_none()
            {
                self.loop_marks = Some(std::array::from_fn(|ch| self.tracks[ch].len()));
            }

            let offset = source.position();
            let Some(opcode) = source.read_u8() else {
                return Err(ConvertError::TruncatedStream { offset });
            };

            match opcode {
                command::HUC6280_WRITE => {
                    let register = source
                        .read_u8()
                        .ok_or(ConvertError::TruncatedStream { offset })?;
                    let data = source
                        .read_u8()
                        .ok_or(ConvertError::TruncatedStream { offset })?;
                    self.chip_write(register, data)?;
                }
                command::WAIT_SAMPLES => {
                    self.finish_open_wave()?;
                    let samples = source
                        .read_u16_le()
                        .ok_or(ConvertError::TruncatedStream { offset })?;
                    self.add_delay((samples / SAMPLES_PER_FRAME) as u64);
                }
                command::WAIT_FRAME => {
                    self.finish_open_wave()?;
                    self.add_delay(1);
                }
                command::END_OF_DATA => {
                    self.finish_open_wave()?;
                    return Ok(self.finish());
                }
                opcode => {
                    if let Some(len) = command::dac_operand_len(opcode) {
                        // DAC streams have no PSG counterpart; drop the
                        // operands and move on.
                        self.finish_open_wave()?;
                        source
                            .skip(len)
                            .ok_or(ConvertError::TruncatedStream { offset })?;
                    } else {
                        return Err(ConvertError::UnknownOpcode { opcode, offset });
                    }
                }
            }
        }
    }

    /// Translate one HuC6280 register write.
    fn chip_write(&mut self, register: u8, data: u8) -> Result<(), ConvertError> {
        self.flush_delay(self.channel);
        if register != REG_WAVE_DATA {
            self.finish_open_wave()?;
        }

        match register {
            REG_CHANNEL_SELECT => self.select_channel(data),
            REG_CHANNEL_CONTROL if data & 0xC0 == 0 => {
                // Enable and DDA bits both clear: the following register 6
                // writes are a waveform upload, not playback control.
                self.wave = [0; WAVE_SIZE];
                self.wave_len = 0;
            }
            REG_WAVE_DATA => {
                self.wave[self.wave_len % WAVE_SIZE] = data;
                self.wave_len += 1;
            }
            _ => self.tracks[self.channel].push_register(register, data),
        }

        Ok(())
    }

    /// Handle a channel select write (bits 0-2; out-of-range selects fall
    /// back to channel 0).
    fn select_channel(&mut self, value: u8) {
        let mut selected = (value & 0x07) as usize;
        if selected >= CHANNEL_COUNT {
            selected = 0;
        }
        self.channel = selected;
    }

    /// Close an open waveform upload: intern the scratch buffer and emit a
    /// wave op referencing it on the current channel. No-op when no upload
    /// is open.
    fn finish_open_wave(&mut self) -> Result<(), ConvertError> {
        if self.wave_len == 0 {
            return Ok(());
        }
        let index = self.waves.intern(&self.wave);
        if index > u8::MAX as usize {
            return Err(ConvertError::WavePoolOverflow);
        }
        self.tracks[self.channel].push_op_data(TrackOp::Wave, index as u8);
        self.wave = [0; WAVE_SIZE];
        self.wave_len = 0;
        Ok(())
    }

    fn add_delay(&mut self, frames: u64) {
        for delay in &mut self.delays {
            *delay += frames;
        }
    }

    /// Commit a channel's pending frames to its track before new content.
    fn flush_delay(&mut self, channel: usize) {
        let frames = std::mem::take(&mut self.delays[channel]);
        push_delay_ops(&mut self.tracks[channel], frames);
    }

    /// Flush every channel and terminate every track.
    fn finish(mut self) -> Song {
        for channel in 0..CHANNEL_COUNT {
            self.flush_delay(channel);
            self.tracks[channel].push_op(TrackOp::DataEnd);
        }
        Song {
            tracks: self.tracks,
            loop_marks: self.loop_marks,
        }
    }
}

/// Serialize a delay of `frames` onto `track`.
///
/// A single frame is a bare frame-end op. Longer delays emit
/// `(frames - 1) / 255` maximum-length sleep ops followed by one op for the
/// remainder, which is itself a frame-end op when the remainder is a single
/// frame. The encoded frame counts always sum to exactly `frames`.
fn push_delay_ops(track: &mut ChannelTrack, frames: u64) {
    match frames {
        0 => {}
        1 => track.push_op(TrackOp::FrameEnd),
        n => {
            let full = (n - 1) / 255;
            let rest = (n - full * 255) as u8;
            for _ in 0..full {
                track.push_op_data(TrackOp::Sleep, u8::MAX);
            }
            if rest == 1 {
                track.push_op(TrackOp::FrameEnd);
            } else {
                track.push_op_data(TrackOp::Sleep, rest);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Sum the frame counts of a pure delay byte sequence.
    fn decoded_frames(bytes: &[u8]) -> u64 {
        let mut frames = 0;
        let mut i = 0;
        while i < bytes.len() {
            if bytes[i] == TrackOp::FrameEnd.byte() {
                frames += 1;
                i += 1;
            } else if bytes[i] == TrackOp::Sleep.byte() {
                frames += bytes[i + 1] as u64;
                i += 2;
            } else {
                panic!("unexpected op 0x{:02X}", bytes[i]);
            }
        }
        frames
    }

    #[test]
    fn test_delay_flush_sums_to_exact_frame_count() {
        for n in [0, 1, 2, 3, 254, 255, 256, 257, 509, 510, 511, 765, 10_000] {
            let mut track = ChannelTrack::new();
            push_delay_ops(&mut track, n);
            assert_eq!(decoded_frames(track.as_bytes()), n, "frames = {}", n);
        }
    }

    #[test]
    fn test_delay_flush_encodings() {
        let cases: [(u64, &[u8]); 6] = [
            (0, &[]),
            (1, &[0x00]),
            (2, &[0xE0, 2]),
            (255, &[0xE0, 255]),
            (256, &[0xE0, 255, 0x00]),
            (511, &[0xE0, 255, 0xE0, 255, 0x00]),
        ];
        for (frames, expected) in cases {
            let mut track = ChannelTrack::new();
            push_delay_ops(&mut track, frames);
            assert_eq!(track.as_bytes(), expected, "frames = {}", frames);
        }
    }

    #[test]
    fn test_register_write_targets_selected_channel() {
        let mut waves = WavePool::new();
        let mut conv = Converter::new(&mut waves);

        conv.chip_write(REG_CHANNEL_SELECT, 2).unwrap();
        conv.chip_write(0x07, 0x30).unwrap();

        assert_eq!(conv.tracks[2].as_bytes(), &[0x07, 0x30]);
        for channel in [0, 1, 3, 4, 5] {
            assert!(conv.tracks[channel].is_empty());
        }
    }

    #[test]
    fn test_channel_select_masks_to_valid_range() {
        let mut waves = WavePool::new();
        let mut conv = Converter::new(&mut waves);

        conv.chip_write(REG_CHANNEL_SELECT, 0x05).unwrap();
        assert_eq!(conv.channel, 5);

        // Bits above the select field are ignored.
        conv.chip_write(REG_CHANNEL_SELECT, 0x0A).unwrap();
        assert_eq!(conv.channel, 2);

        // A masked value of 6 or 7 names no channel; fall back to 0.
        conv.chip_write(REG_CHANNEL_SELECT, 0x06).unwrap();
        assert_eq!(conv.channel, 0);
    }

    #[test]
    fn test_wave_upload_interns_and_emits_index() {
        let mut waves = WavePool::new();
        let mut conv = Converter::new(&mut waves);

        conv.chip_write(REG_CHANNEL_CONTROL, 0x00).unwrap();
        for i in 0..32u8 {
            conv.chip_write(REG_WAVE_DATA, i).unwrap();
        }
        // Any write off the wave port closes the upload.
        conv.chip_write(0x02, 0x10).unwrap();

        assert_eq!(conv.waves.len(), 1);
        let expected: [u8; WAVE_SIZE] = std::array::from_fn(|i| i as u8);
        assert_eq!(conv.waves.get(0), Some(&expected));
        // Wave op with pool index 0, then the closing register write.
        assert_eq!(conv.tracks[0].as_bytes(), &[0x06, 0x00, 0x02, 0x10]);
    }

    #[test]
    fn test_wave_upload_wraps_past_32_bytes() {
        let mut waves = WavePool::new();
        let mut conv = Converter::new(&mut waves);

        conv.chip_write(REG_CHANNEL_CONTROL, 0x00).unwrap();
        for i in 0..33u8 {
            conv.chip_write(REG_WAVE_DATA, i).unwrap();
        }
        conv.finish_open_wave().unwrap();

        let mut expected: [u8; WAVE_SIZE] = std::array::from_fn(|i| i as u8);
        expected[0] = 32;
        assert_eq!(conv.waves.get(0), Some(&expected));
    }

    #[test]
    fn test_control_write_with_enable_bits_passes_through() {
        let mut waves = WavePool::new();
        let mut conv = Converter::new(&mut waves);

        conv.chip_write(REG_CHANNEL_CONTROL, 0x9F).unwrap();

        assert_eq!(conv.tracks[0].as_bytes(), &[0x04, 0x9F]);
        assert_eq!(conv.wave_len, 0);
    }

    #[test]
    fn test_restarted_upload_finalizes_previous_one() {
        let mut waves = WavePool::new();
        let mut conv = Converter::new(&mut waves);

        conv.chip_write(REG_CHANNEL_CONTROL, 0x00).unwrap();
        for _ in 0..32 {
            conv.chip_write(REG_WAVE_DATA, 0x11).unwrap();
        }
        // Restart: closes the first upload before resetting the scratch.
        conv.chip_write(REG_CHANNEL_CONTROL, 0x00).unwrap();
        for _ in 0..32 {
            conv.chip_write(REG_WAVE_DATA, 0x22).unwrap();
        }
        conv.finish_open_wave().unwrap();

        assert_eq!(conv.waves.len(), 2);
        assert_eq!(conv.tracks[0].as_bytes(), &[0x06, 0x00, 0x06, 0x01]);
    }

    #[test]
    fn test_pending_delay_flushes_before_register_write() {
        let mut waves = WavePool::new();
        let mut conv = Converter::new(&mut waves);

        conv.chip_write(REG_CHANNEL_SELECT, 1).unwrap();
        conv.add_delay(2);
        conv.chip_write(0x05, 0xFF).unwrap();

        // Channel 1 got its delay flushed ahead of the write; the others
        // still owe two frames.
        assert_eq!(conv.tracks[1].as_bytes(), &[0xE0, 2, 0x05, 0xFF]);
        assert_eq!(conv.delays, [2, 0, 2, 2, 2, 2]);
    }
}
