use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use log::info;

use pcestrip::bank::{self, DirectorySink};
use pcestrip::pce::Music;
use pcestrip::vgm::VgmSource;

mod input;
mod report;

use input::read_vgm_as_vec;
use report::{InputRow, channel_sizes, print_summary, title_of};

/// Convert PC Engine VGM logs to bank-split PSG track data
#[derive(Parser)]
#[command(
    name = env!("CARGO_PKG_NAME"),
    version = env!("CARGO_PKG_VERSION"),
    about = env!("CARGO_PKG_DESCRIPTION"),
    long_about = None
)]
struct Cli {
    /// Convert FILE as a full six-channel song (accepts .vgm or .vgz)
    #[arg(short = 's', long = "song", value_name = "FILE")]
    song: Vec<PathBuf>,

    /// Extract channel CHANNEL (0-5) of FILE as a subtrack
    #[arg(
        short = 't',
        long = "subtrack",
        num_args = 2,
        value_names = ["CHANNEL", "FILE"]
    )]
    subtrack: Vec<String>,

    /// Directory receiving the segment files and the music.inc index
    #[arg(value_name = "OUTPUT_DIR")]
    output: PathBuf,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    if cli.song.is_empty() && cli.subtrack.is_empty() {
        bail!("nothing to convert: pass at least one --song or --subtrack");
    }

    let mut music = Music::new();
    let mut rows = Vec::new();

    for (i, path) in cli.song.iter().enumerate() {
        let bytes = read_vgm_as_vec(path)?;
        let mut source = VgmSource::from_bytes(&bytes)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        music
            .add_song(&mut source)
            .with_context(|| format!("failed to convert {}", path.display()))?;
        info!(
            "song {:02}: {} ({} data bytes)",
            i,
            path.display(),
            source.len()
        );
        rows.push(InputRow {
            what: format!("song {:02}", i),
            file: path.display().to_string(),
            title: title_of(source.gd3()),
            bytes: channel_sizes(std::array::from_fn(|ch| music.songs()[i].tracks()[ch].len())),
        });
    }

    for (i, pair) in cli.subtrack.chunks(2).enumerate() {
        let [channel, file] = pair else {
            bail!("--subtrack takes a CHANNEL FILE pair");
        };
        let channel: usize = channel
            .parse()
            .with_context(|| format!("invalid subtrack channel '{}'", channel))?;
        let path = PathBuf::from(file);
        let bytes = read_vgm_as_vec(&path)?;
        let mut source = VgmSource::from_bytes(&bytes)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        music
            .add_subtrack(&mut source, channel)
            .with_context(|| format!("failed to convert {}", path.display()))?;
        info!("subtrack {:02}: channel {} of {}", i, channel, path.display());
        rows.push(InputRow {
            what: format!("subtrack {:02} (ch {})", i, channel),
            file: path.display().to_string(),
            title: title_of(source.gd3()),
            bytes: music.subtracks()[i].len().to_string(),
        });
    }

    std::fs::create_dir_all(&cli.output)
        .with_context(|| format!("failed to create {}", cli.output.display()))?;
    let mut sink = DirectorySink::new(&cli.output);
    let summary = bank::encode(&music, &mut sink)
        .with_context(|| format!("failed to write output to {}", cli.output.display()))?;

    print_summary(&rows, music.waves().len(), &summary);
    Ok(())
}
