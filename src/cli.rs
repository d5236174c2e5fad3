use std::path::PathBuf;

use clap::Parser;

use crate::api::{AudioFormat, DownloadMode, DownloadRequest, FilenameStyle, VideoQuality};
use crate::application::DownloadJob;
use crate::config::DEFAULT_CONFIG_FILE;

const DEFAULT_ALWAYS_PROXY: bool = true;
const DEFAULT_TWITTER_GIF: bool = true;

/// Cobalt.tools CLI wrapper.
///
/// Asks a cobalt instance to resolve a media URL, then downloads the
/// resulting file with a progress bar.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// URL of video to download
    pub url: String,

    /// Cobalt instance to use; saved as the default for later runs
    #[arg(long)]
    pub instance: Option<String>,

    /// Output file name. Defaults to the name suggested by the instance.
    #[arg(short, long)]
    pub output: Option<String>,

    /// Video quality to download
    #[arg(long, value_enum, default_value_t = VideoQuality::P720)]
    pub video_quality: VideoQuality,

    /// Audio format
    #[arg(long, value_enum, default_value_t = AudioFormat::Best)]
    pub audio_format: AudioFormat,

    /// Download mode
    #[arg(long, value_enum, default_value_t = DownloadMode::Auto)]
    pub download_mode: DownloadMode,

    /// Tunnel all downloads through the processing server, even when not necessary [default: true]
    #[arg(long, value_name = "BOOL", num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    pub always_proxy: Option<bool>,

    /// Download Twitter videos as GIFs [default: true]
    #[arg(long, value_name = "BOOL", num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    pub twitter_gif: Option<bool>,

    /// File name style
    #[arg(long, value_enum, default_value_t = FilenameStyle::Pretty)]
    pub file_name_style: FilenameStyle,

    /// File holding the saved instance
    #[arg(long, env = "COBALT_CLI_CONFIG", default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// More log output (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    pub fn download_request(&self) -> DownloadRequest {
        DownloadRequest {
            url: self.url.clone(),
            video_quality: self.video_quality,
            audio_format: self.audio_format,
            download_mode: self.download_mode,
            always_proxy: self.always_proxy.unwrap_or(DEFAULT_ALWAYS_PROXY),
            twitter_gif: self.twitter_gif.unwrap_or(DEFAULT_TWITTER_GIF),
            filename_style: self.file_name_style,
        }
    }

    pub fn job(&self) -> DownloadJob {
        DownloadJob {
            instance: self.instance.clone(),
            output: self.output.clone(),
            request: self.download_request(),
        }
    }
}
