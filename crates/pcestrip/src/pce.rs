//! PC Engine PSG track model: output command set, per-channel tracks,
//! waveform pool, and the VGM-to-track converters.
pub mod command;
pub mod music;
pub mod song;
pub mod track;
pub mod wave;

pub use command::TrackOp;
pub use music::{Music, Subtrack};
pub use song::{CHANNEL_COUNT, ConvertError, SAMPLES_PER_FRAME, Song};
pub use track::ChannelTrack;
pub use wave::{WAVE_SIZE, WavePool};
