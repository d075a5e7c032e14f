//! Collection of converted songs and subtracks sharing one waveform pool.
use crate::pce::command::TrackOp;
use crate::pce::song::{CHANNEL_COUNT, ConvertError, Song};
use crate::pce::track::ChannelTrack;
use crate::pce::wave::WavePool;
use crate::vgm::source::VgmSource;

/// A single-channel track cut out of a full conversion, typically a sound
/// effect authored on one channel of an otherwise silent log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subtrack {
    track: ChannelTrack,
}

impl Subtrack {
    /// The track bytes, including the volume-restore prefix.
    pub fn as_bytes(&self) -> &[u8] {
        self.track.as_bytes()
    }

    pub fn len(&self) -> usize {
        self.track.len()
    }

    pub fn is_empty(&self) -> bool {
        self.track.is_empty()
    }
}

/// Everything destined for one output image: songs, subtracks, and the
/// waveforms they reference.
///
/// All conversions added to one `Music` intern into the same pool, so a
/// wave op operand means the same thing no matter which track it appears
/// in.
#[derive(Debug, Default)]
pub struct Music {
    songs: Vec<Song>,
    subtracks: Vec<Subtrack>,
    waves: WavePool,
}

impl Music {
    pub fn new() -> Self {
        Music::default()
    }

    /// Convert `source` as a full six-channel song and append it.
    pub fn add_song(&mut self, source: &mut VgmSource) -> Result<(), ConvertError> {
        let song = Song::convert(source, &mut self.waves)?;
        self.songs.push(song);
        Ok(())
    }

    /// Convert `source` and keep only `channel` as a subtrack.
    ///
    /// The conversion runs over all six channels so that waveform interning
    /// and channel-select handling behave exactly as for a song; the other
    /// five tracks are discarded. The kept track is prefixed with a
    /// full-volume global volume op so a subtrack triggered mid-song starts
    /// audible regardless of what the song last set.
    pub fn add_subtrack(
        &mut self,
        source: &mut VgmSource,
        channel: usize,
    ) -> Result<(), ConvertError> {
        if channel >= CHANNEL_COUNT {
            return Err(ConvertError::ChannelOutOfRange { channel });
        }
        let song = Song::convert(source, &mut self.waves)?;

        let mut track = ChannelTrack::new();
        track.push_op_data(TrackOp::GlobalVolume, 0xFF);
        track.extend_from(&song.tracks()[channel]);
        self.subtracks.push(Subtrack { track });
        Ok(())
    }

    pub fn songs(&self) -> &[Song] {
        &self.songs
    }

    pub fn subtracks(&self) -> &[Subtrack] {
        &self.subtracks
    }

    pub fn waves(&self) -> &WavePool {
        &self.waves
    }

    pub fn is_empty(&self) -> bool {
        self.songs.is_empty() && self.subtracks.is_empty()
    }
}
