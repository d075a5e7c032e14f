//! Serialization of a [`Music`] into fixed-size segments plus an index.
//!
//! Tracks are packed back to back into 8192-byte segments, songs first
//! (channels 0..5 each), then subtracks. The segment fill level carries
//! across track boundaries, so where a track lands depends only on the
//! cumulative byte total. Layout records captured during streaming drive
//! the index text, which binds assembler symbols and bank/offset tables to
//! the packed positions; the index is rendered only after every segment has
//! been written out.
use std::io;

use crate::bank::sink::SegmentSink;
use crate::pce::music::Music;
use crate::pce::song::CHANNEL_COUNT;

/// Byte capacity of one segment, the target's bank window size.
pub const BANK_SIZE: usize = 8192;

/// What one encoder run produced.
#[derive(Debug, Clone, Copy)]
pub struct EncodeSummary {
    /// Number of segments handed to the sink.
    pub segment_count: usize,
    /// Total track bytes packed into them.
    pub total_bytes: usize,
}

/// Bank and in-bank offset of one byte position in the packed output.
#[derive(Debug, Clone, Copy, Default)]
struct Placement {
    bank: usize,
    offset: usize,
}

impl Placement {
    fn at(total: usize) -> Self {
        Placement {
            bank: total / BANK_SIZE,
            offset: total % BANK_SIZE,
        }
    }
}

/// Packed positions of one channel's track start and loop entry.
#[derive(Debug, Clone, Copy, Default)]
struct ChannelLayout {
    start: Placement,
    loop_at: Placement,
}

#[derive(Debug, Clone, Copy, Default)]
struct SongLayout {
    channels: [ChannelLayout; CHANNEL_COUNT],
}

/// Running write state of one encoder pass.
struct OutputCursor<'a, S: SegmentSink> {
    sink: &'a mut S,
    segment: Vec<u8>,
    segments_written: usize,
    total: usize,
}

impl<'a, S: SegmentSink> OutputCursor<'a, S> {
    fn new(sink: &'a mut S) -> Self {
        OutputCursor {
            sink,
            segment: Vec::with_capacity(BANK_SIZE),
            segments_written: 0,
            total: 0,
        }
    }

    /// Append a track to the packed output, handing full segments to the
    /// sink as they close. Returns the cumulative byte position of the
    /// track's first byte.
    fn write_track(&mut self, bytes: &[u8]) -> io::Result<usize> {
        let start = self.total;
        let mut rest = bytes;
        while !rest.is_empty() {
            let room = BANK_SIZE - self.segment.len();
            let n = room.min(rest.len());
            self.segment.extend_from_slice(&rest[..n]);
            rest = &rest[n..];
            self.total += n;
            if self.segment.len() == BANK_SIZE {
                self.flush_segment()?;
            }
        }
        Ok(start)
    }

    fn flush_segment(&mut self) -> io::Result<()> {
        self.sink.segment(self.segments_written, &self.segment)?;
        self.segments_written += 1;
        self.segment.clear();
        Ok(())
    }

    /// Write out the trailing partial segment, if any.
    fn finish(mut self) -> io::Result<usize> {
        if !self.segment.is_empty() {
            self.flush_segment()?;
        }
        Ok(self.segments_written)
    }
}

/// Pack `music` into segments and write segments plus index through `sink`.
pub fn encode<S: SegmentSink>(music: &Music, sink: &mut S) -> io::Result<EncodeSummary> {
    let mut cursor = OutputCursor::new(&mut *sink);

    let mut song_layouts = Vec::with_capacity(music.songs().len());
    for song in music.songs() {
        let marks = song.loop_marks();
        let mut layout = SongLayout::default();
        for (ch, track) in song.tracks().iter().enumerate() {
            let start = cursor.write_track(track.as_bytes())?;
            // Without a declared loop the song loops back to its own start.
            let loop_total = start + marks.map_or(0, |m| m[ch]);
            layout.channels[ch] = ChannelLayout {
                start: Placement::at(start),
                loop_at: Placement::at(loop_total),
            };
        }
        song_layouts.push(layout);
    }

    let mut subtrack_layouts = Vec::with_capacity(music.subtracks().len());
    for subtrack in music.subtracks() {
        let start = cursor.write_track(subtrack.as_bytes())?;
        subtrack_layouts.push(Placement::at(start));
    }

    let total_bytes = cursor.total;
    let segment_count = cursor.finish()?;

    let text = render_index(music, &song_layouts, &subtrack_layouts, segment_count, sink);
    sink.index(&text)?;

    Ok(EncodeSummary {
        segment_count,
        total_bytes,
    })
}

/// Render the index text: song pointer table, subtrack and per-song
/// bank/offset tables, the waveform table, track-start symbols, and the
/// `.data` section including every segment.
///
/// The text references two symbols the including project defines:
/// `vgm_data_bank`, the first bank assigned to the packed data, and
/// `vgm_data_addr`, the address of the bank window.
fn render_index<S: SegmentSink>(
    music: &Music,
    songs: &[SongLayout],
    subtracks: &[Placement],
    segment_count: usize,
    sink: &S,
) -> String {
    let mut out = String::new();

    out.push_str("song:\n");
    for i in 0..songs.len() {
        out.push_str(&format!("    .dw song{:02}\n", i));
    }

    out.push_str("subtracks.bank:\n");
    for p in subtracks {
        out.push_str(&format!("    .db vgm_data_bank+${:03x}\n", p.bank));
    }
    out.push_str("subtracks.hi:\n");
    for p in subtracks {
        out.push_str(&format!("    .dwh vgm_data_addr+${:04x}\n", p.offset));
    }
    out.push_str("subtracks.lo:\n");
    for p in subtracks {
        out.push_str(&format!("    .dwl vgm_data_addr+${:04x}\n", p.offset));
    }

    for (i, song) in songs.iter().enumerate() {
        out.push_str(&format!("song{:02}:\n", i));
        out.push_str(&format!("song{:02}.bank:\n", i));
        for ch in &song.channels {
            out.push_str(&format!("    .db vgm_data_bank+${:03x}\n", ch.start.bank));
        }
        out.push_str(&format!("song{:02}.hi:\n", i));
        for ch in &song.channels {
            out.push_str(&format!("    .dwh vgm_data_addr+${:04x}\n", ch.start.offset));
        }
        out.push_str(&format!("song{:02}.lo:\n", i));
        for ch in &song.channels {
            out.push_str(&format!("    .dwl vgm_data_addr+${:04x}\n", ch.start.offset));
        }
        out.push_str(&format!("song{:02}_loop.bank:\n", i));
        for ch in &song.channels {
            out.push_str(&format!("    .db vgm_data_bank+${:03x}\n", ch.loop_at.bank));
        }
        out.push_str(&format!("song{:02}_loop.hi:\n", i));
        for ch in &song.channels {
            out.push_str(&format!("    .dwh vgm_data_addr+${:04x}\n", ch.loop_at.offset));
        }
        out.push_str(&format!("song{:02}_loop.lo:\n", i));
        for ch in &song.channels {
            out.push_str(&format!("    .dwl vgm_data_addr+${:04x}\n", ch.loop_at.offset));
        }
    }

    out.push_str("wav:\n");
    for i in 0..music.waves().len() {
        out.push_str(&format!("    .dw wav{:02x}\n", i));
    }
    for (i, sample) in music.waves().iter().enumerate() {
        out.push_str(&format!("wav{:02x}:\n", i));
        for row in sample.chunks(8) {
            let bytes: Vec<String> = row.iter().map(|b| format!("${:02x}", b)).collect();
            out.push_str(&format!("    .db {}\n", bytes.join(",")));
        }
    }

    for (i, song) in songs.iter().enumerate() {
        for (ch, layout) in song.channels.iter().enumerate() {
            out.push_str(&format!(
                "song{:02}_{:04} = vgm_data_addr+${:04x} ; bank vgm_data_bank+${:03x}\n",
                i, ch, layout.start.offset, layout.start.bank
            ));
        }
    }
    for (i, p) in subtracks.iter().enumerate() {
        out.push_str(&format!(
            "subtrack_{:04} = vgm_data_addr+${:04x} ; bank vgm_data_bank+${:03x}\n",
            i, p.offset, p.bank
        ));
    }

    out.push_str("    .data\n");
    for i in 0..segment_count {
        out.push_str(&format!("    .bank vgm_data_bank+${:03x}\n", i));
        out.push_str("    .org vgm_data_addr\n");
        out.push_str(&format!("    .incbin \"{}\"\n", sink.segment_ref(i)));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Sink keeping everything in memory, in arrival order.
    #[derive(Default)]
    struct MemorySink {
        segments: Vec<(usize, Vec<u8>)>,
        index: Option<String>,
    }

    impl SegmentSink for MemorySink {
        fn segment(&mut self, index: usize, bytes: &[u8]) -> io::Result<()> {
            self.segments.push((index, bytes.to_vec()));
            Ok(())
        }

        fn index(&mut self, text: &str) -> io::Result<()> {
            self.index = Some(text.to_string());
            Ok(())
        }
    }

    #[test]
    fn test_cursor_splits_at_segment_capacity() {
        let mut sink = MemorySink::default();
        let mut cursor = OutputCursor::new(&mut sink);

        let start = cursor.write_track(&[0xAA; BANK_SIZE + 100]).unwrap();
        assert_eq!(start, 0);
        let start = cursor.write_track(&[0xBB; 50]).unwrap();
        assert_eq!(start, BANK_SIZE + 100);

        let count = cursor.finish().unwrap();
        assert_eq!(count, 2);
        assert_eq!(sink.segments[0].1.len(), BANK_SIZE);
        assert_eq!(sink.segments[1].1.len(), 150);
        // The second track's head shares the trailing partial segment.
        assert_eq!(&sink.segments[1].1[100..], &[0xBB; 50]);
    }

    #[test]
    fn test_cursor_exact_multiple_leaves_no_partial_segment() {
        let mut sink = MemorySink::default();
        let mut cursor = OutputCursor::new(&mut sink);

        cursor.write_track(&[0x11; BANK_SIZE * 2]).unwrap();
        let count = cursor.finish().unwrap();

        assert_eq!(count, 2);
        assert!(sink.segments.iter().all(|(_, s)| s.len() == BANK_SIZE));
    }

    #[test]
    fn test_placement_accounting() {
        let p = Placement::at(0);
        assert_eq!((p.bank, p.offset), (0, 0));
        let p = Placement::at(BANK_SIZE - 1);
        assert_eq!((p.bank, p.offset), (0, BANK_SIZE - 1));
        let p = Placement::at(BANK_SIZE);
        assert_eq!((p.bank, p.offset), (1, 0));
        let p = Placement::at(3 * BANK_SIZE + 17);
        assert_eq!((p.bank, p.offset), (3, 17));
    }

    #[test]
    fn test_empty_music_emits_index_only() {
        let music = Music::new();
        let mut sink = MemorySink::default();

        let summary = encode(&music, &mut sink).unwrap();

        assert_eq!(summary.segment_count, 0);
        assert_eq!(summary.total_bytes, 0);
        assert!(sink.segments.is_empty());
        let text = sink.index.unwrap();
        assert!(text.contains("song:\n"));
        assert!(text.contains("wav:\n"));
        assert!(text.ends_with("    .data\n"));
    }
}
