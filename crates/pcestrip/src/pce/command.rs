//! Track opcodes consumed by the playback driver.
//!
//! A track is a flat byte stream: an opcode byte, followed by one data byte
//! for every op except `FrameEnd` and `DataEnd`. Register-shaped ops share
//! their value with the HuC6280 register index they carry, so a verbatim
//! register write serializes as the register byte itself plus its data.

/// One-byte opcodes of the emitted track format.
///
/// # Register-shaped ops
///
/// `GlobalVolume` through `LfoControl` are the HuC6280 register indices
/// 0x01..=0x09 passed through unchanged:
/// - 0x01: master volume (left/right nibbles)
/// - 0x02: frequency low (8 bits)
/// - 0x03: frequency high (4 bits)
/// - 0x04: channel enable / DDA / volume
/// - 0x05: channel pan (left/right nibbles)
/// - 0x06: wave RAM data, replaced by a pool index during conversion
/// - 0x07: noise enable and frequency
/// - 0x08: LFO frequency
/// - 0x09: LFO control
///
/// # Timing and framing ops
///
/// - `FrameEnd` (0x00): advance exactly one frame.
/// - `Sleep` (0xE0): advance by the operand's frame count (1..=255).
/// - `DataEnd` (0xFF): end of track.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum TrackOp {
    FrameEnd = 0x00,
    GlobalVolume = 0x01,
    FineFrequency = 0x02,
    RoughFrequency = 0x03,
    Volume = 0x04,
    Pan = 0x05,
    Wave = 0x06,
    NoiseFrequency = 0x07,
    LfoFrequency = 0x08,
    LfoControl = 0x09,
    Sleep = 0xE0,
    DataEnd = 0xFF,
}

impl TrackOp {
    /// The opcode byte as it appears in a serialized track.
    pub const fn byte(self) -> u8 {
        self as u8
    }
}
