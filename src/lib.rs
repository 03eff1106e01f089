mod cmd;
mod constraints;
mod dispatch;
mod display;
mod error;
mod ffmpeg;
mod ffprobe;
mod fs;
mod job;
mod media;
mod options;
mod pipeline;
mod prelude;
mod selection;
mod strategy;
mod target;
mod util;
mod validate;

use clap::Parser;
use target::TargetType;

/// Converts media into Telegram sticker/emoji artifacts via ffmpeg/ffprobe,
/// retrying with progressively more aggressive parameters until the output
/// conforms.
#[derive(Parser, Debug)]
#[command(version)]
enum Args {
    VideoSticker(cmd::Convert),
    StaticSticker(cmd::Convert),
    Emoji(cmd::Convert),
}

pub async fn run() -> anyhow::Result<()> {
    match Args::parse() {
        Args::VideoSticker(convert) => convert.run(TargetType::VideoSticker).await,
        Args::StaticSticker(convert) => convert.run(TargetType::StaticSticker).await,
        Args::Emoji(convert) => convert.run(TargetType::Emoji).await,
    }
}
