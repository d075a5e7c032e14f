//! Per-channel command buffer.
use crate::pce::command::TrackOp;

/// Growable byte buffer holding the serialized commands of one channel.
///
/// Tracks only ever grow during conversion and are frozen afterwards; the
/// encoder reads them back as plain byte slices.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelTrack {
    data: Vec<u8>,
}

impl ChannelTrack {
    pub fn new() -> Self {
        ChannelTrack { data: Vec::new() }
    }

    /// Append a bare op with no data byte (`FrameEnd`, `DataEnd`).
    pub(crate) fn push_op(&mut self, op: TrackOp) {
        self.data.push(op.byte());
    }

    /// Append an op followed by its data byte.
    pub(crate) fn push_op_data(&mut self, op: TrackOp, data: u8) {
        self.data.push(op.byte());
        self.data.push(data);
    }

    /// Append a verbatim register write; the register index is the opcode.
    pub(crate) fn push_register(&mut self, register: u8, data: u8) {
        self.data.push(register);
        self.data.push(data);
    }

    /// Append another track's bytes wholesale.
    pub(crate) fn extend_from(&mut self, other: &ChannelTrack) {
        self.data.extend_from_slice(&other.data);
    }

    /// Serialized length in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True when nothing has been emitted yet.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The serialized command bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }
}
