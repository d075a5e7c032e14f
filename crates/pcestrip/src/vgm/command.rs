//! Opcode bytes of the VGM commands the converter understands.
//!
//! Anything not listed here is a hard decode error; the converter never
//! guesses operand lengths for unknown commands.

/// HuC6280 register write: `0xB9 reg data`.
pub const HUC6280_WRITE: u8 = 0xB9;

/// Wait: `0x61 nn nn`, a little-endian 16-bit sample count.
pub const WAIT_SAMPLES: u8 = 0x61;

/// Wait one 60 Hz frame, no operand.
pub const WAIT_FRAME: u8 = 0x62;

/// End of command data, no operand.
pub const END_OF_DATA: u8 = 0x66;

/// DAC stream control setup: `0x90` + 4 operand bytes.
pub const SETUP_STREAM_CONTROL: u8 = 0x90;

/// DAC stream data bank assignment: `0x91` + 4 operand bytes.
pub const SET_STREAM_DATA: u8 = 0x91;

/// DAC stream frequency: `0x92` + 5 operand bytes.
pub const SET_STREAM_FREQUENCY: u8 = 0x92;

/// DAC stream start: `0x93` + 10 operand bytes.
pub const START_STREAM: u8 = 0x93;

/// DAC stream stop: `0x94` + 1 operand byte.
pub const STOP_STREAM: u8 = 0x94;

/// DAC stream fast start: `0x95` + 4 operand bytes.
pub const START_STREAM_FAST_CALL: u8 = 0x95;

/// Operand byte count for the DAC stream command family.
///
/// Returns `None` for opcodes outside `0x90..=0x95`. The converter discards
/// these operands wholesale; DAC streams have no PSG-channel counterpart.
pub fn dac_operand_len(opcode: u8) -> Option<usize> {
    match opcode {
        SETUP_STREAM_CONTROL => Some(4),
        SET_STREAM_DATA => Some(4),
        SET_STREAM_FREQUENCY => Some(5),
        START_STREAM => Some(10),
        STOP_STREAM => Some(1),
        START_STREAM_FAST_CALL => Some(4),
        _ => None,
    }
}
