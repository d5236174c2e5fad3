use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Video resolution requested from the instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum VideoQuality {
    #[serde(rename = "144")]
    #[value(name = "144")]
    P144,
    #[serde(rename = "240")]
    #[value(name = "240")]
    P240,
    #[serde(rename = "360")]
    #[value(name = "360")]
    P360,
    #[serde(rename = "480")]
    #[value(name = "480")]
    P480,
    #[serde(rename = "720")]
    #[value(name = "720")]
    P720,
    #[serde(rename = "1080")]
    #[value(name = "1080")]
    P1080,
    #[serde(rename = "max")]
    #[value(name = "max")]
    Max,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    Best,
    Mp3,
    Ogg,
    Wav,
    Opus,
}

/// Whether the media keeps video+audio, audio only, or muted video
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DownloadMode {
    Auto,
    Audio,
    Mute,
}

/// Preset the instance uses when it builds the suggested filename
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FilenameStyle {
    Classic,
    Pretty,
    Basic,
    Nerdy,
}

/// Body of the resolution call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadRequest {
    pub url: String,
    pub video_quality: VideoQuality,
    pub audio_format: AudioFormat,
    pub download_mode: DownloadMode,
    pub always_proxy: bool,
    pub twitter_gif: bool,
    pub filename_style: FilenameStyle,
}

/// Response from the resolution call
///
/// Only `url` and `filename` are required; anything else the instance
/// sends is ignored apart from `status`, which is kept for logging.
#[derive(Debug, Clone, Deserialize)]
pub struct ResolutionResponse {
    pub url: String,
    pub filename: String,
    #[serde(default)]
    pub status: Option<String>,
}

/// Configuration for the API client
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self { timeout_secs: 30 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(
        video_quality: VideoQuality,
        audio_format: AudioFormat,
        download_mode: DownloadMode,
        filename_style: FilenameStyle,
    ) -> DownloadRequest {
        DownloadRequest {
            url: "https://example.com/v".to_string(),
            video_quality,
            audio_format,
            download_mode,
            always_proxy: true,
            twitter_gif: true,
            filename_style,
        }
    }

    #[test]
    fn test_default_request_body() {
        let body = serde_json::to_value(request(
            VideoQuality::P720,
            AudioFormat::Best,
            DownloadMode::Auto,
            FilenameStyle::Pretty,
        ))
        .unwrap();

        assert_eq!(
            body,
            json!({
                "url": "https://example.com/v",
                "videoQuality": "720",
                "audioFormat": "best",
                "downloadMode": "auto",
                "alwaysProxy": true,
                "twitterGif": true,
                "filenameStyle": "pretty"
            })
        );
    }

    #[test]
    fn test_enum_values_pass_through_unchanged() {
        // Every CLI spelling must reach the wire as-is.
        for quality in VideoQuality::value_variants() {
            for format in AudioFormat::value_variants() {
                for mode in DownloadMode::value_variants() {
                    for style in FilenameStyle::value_variants() {
                        let body =
                            serde_json::to_value(request(*quality, *format, *mode, *style))
                                .unwrap();
                        let name = |v: Option<clap::builder::PossibleValue>| {
                            v.unwrap().get_name().to_string()
                        };

                        assert_eq!(body["videoQuality"], name(quality.to_possible_value()));
                        assert_eq!(body["audioFormat"], name(format.to_possible_value()));
                        assert_eq!(body["downloadMode"], name(mode.to_possible_value()));
                        assert_eq!(body["filenameStyle"], name(style.to_possible_value()));
                    }
                }
            }
        }
    }

    #[test]
    fn test_response_ignores_extra_fields() {
        let response: ResolutionResponse = serde_json::from_value(json!({
            "status": "tunnel",
            "url": "http://cdn/x.mp4",
            "filename": "x.mp4",
            "extra": 1
        }))
        .unwrap();

        assert_eq!(response.url, "http://cdn/x.mp4");
        assert_eq!(response.filename, "x.mp4");
        assert_eq!(response.status.as_deref(), Some("tunnel"));
    }

    #[test]
    fn test_response_requires_filename() {
        let result = serde_json::from_value::<ResolutionResponse>(json!({ "url": "http://cdn/x" }));
        assert!(result.unwrap_err().to_string().contains("filename"));
    }
}
