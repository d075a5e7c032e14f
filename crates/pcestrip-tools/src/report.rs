//! Conversion summary rendering.
use comfy_table::{Cell, ContentArrangement, Table, presets::NOTHING};
use unicode_width::UnicodeWidthStr;

use pcestrip::bank::EncodeSummary;
use pcestrip::meta::Gd3;
use pcestrip::pce::CHANNEL_COUNT;

/// One converted input, as shown in the summary table.
pub struct InputRow {
    pub what: String,
    pub file: String,
    pub title: String,
    /// Per-channel sizes for a song, the single track size for a subtrack.
    pub bytes: String,
}

/// Per-channel track sizes joined into one table cell, channel 0 first.
pub fn channel_sizes(sizes: [usize; CHANNEL_COUNT]) -> String {
    sizes.map(|n| n.to_string()).join("/")
}

/// Display title for an input, from its GD3 tag when one was present.
pub fn title_of(gd3: Option<&Gd3>) -> String {
    gd3.and_then(|g| {
        g.track_name_en
            .clone()
            .or_else(|| g.track_name_jp.clone())
            .or_else(|| g.game_name_en.clone())
            .or_else(|| g.game_name_jp.clone())
    })
    .unwrap_or_else(|| "-".to_string())
}

/// Pad a &str to a target display width (columns) using unicode-width so
/// fullwidth characters (e.g. Japanese titles) stay aligned.
fn pad_to_width(s: &str, width: usize) -> String {
    let w = UnicodeWidthStr::width(s);
    if w >= width {
        s.to_string()
    } else {
        format!("{}{}", s, " ".repeat(width - w))
    }
}

/// Print the conversion summary: one row per input, then pool and output
/// totals.
pub fn print_summary(rows: &[InputRow], wave_count: usize, summary: &EncodeSummary) {
    let mut table = Table::new();
    table.load_preset(NOTHING);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Input"),
        Cell::new("File"),
        Cell::new("Title"),
        Cell::new("Bytes"),
    ]);
    for row in rows {
        table.add_row(vec![
            Cell::new(&row.what),
            Cell::new(&row.file),
            Cell::new(&row.title),
            Cell::new(&row.bytes),
        ]);
    }
    println!("{}", table);

    let totals = [
        ("waveforms", wave_count.to_string()),
        ("segments", summary.segment_count.to_string()),
        ("total bytes", summary.total_bytes.to_string()),
    ];
    let col0 = totals
        .iter()
        .map(|(k, _)| UnicodeWidthStr::width(*k))
        .max()
        .unwrap_or(0);
    for (k, v) in &totals {
        println!("{}  {}", pad_to_width(k, col0), v);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_sizes_lists_all_six_channels() {
        assert_eq!(channel_sizes([10001, 1, 1, 1, 1, 1]), "10001/1/1/1/1/1");
        assert_eq!(channel_sizes([0; CHANNEL_COUNT]), "0/0/0/0/0/0");
    }
}
