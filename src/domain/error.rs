use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::api::ApiError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(
        "No instance specified and no {} found{}.\nTo set a default instance, use the --instance argument.",
        .0.display(),
        location_suffix(.0)
    )]
    ConfigMissing(PathBuf),

    #[error("Invalid instance setting in {}: {reason}", .path.display())]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Failed to save instance to {}: {source}", .path.display())]
    ConfigWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cancelled before the download started")]
    Interrupted,

    #[error("Download cancelled; partial file left at {}", .0.display())]
    Cancelled(PathBuf),
}

fn location_suffix(path: &Path) -> &'static str {
    if path.is_relative() {
        " in current directory"
    } else {
        ""
    }
}

impl AppError {
    /// Process exit code for a fatal error.
    pub fn exit_code(&self) -> u8 {
        match self {
            AppError::Interrupted | AppError::Cancelled(_) => 130,
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_missing_has_two_line_guidance() {
        let message = AppError::ConfigMissing(PathBuf::from("cobalt.ini")).to_string();
        let lines: Vec<&str> = message.lines().collect();

        assert_eq!(
            lines,
            vec![
                "No instance specified and no cobalt.ini found in current directory.",
                "To set a default instance, use the --instance argument.",
            ]
        );
    }

    #[test]
    fn test_config_missing_names_absolute_path_only() {
        let message = AppError::ConfigMissing(PathBuf::from("/etc/cobalt/cobalt.ini")).to_string();

        assert_eq!(
            message.lines().next(),
            Some("No instance specified and no /etc/cobalt/cobalt.ini found.")
        );
    }

    #[test]
    fn test_exit_codes_are_non_zero() {
        assert_ne!(AppError::ConfigMissing(PathBuf::from("cobalt.ini")).exit_code(), 0);
        assert_eq!(AppError::Cancelled(PathBuf::from("x.mp4")).exit_code(), 130);
        assert_eq!(AppError::Interrupted.exit_code(), 130);
    }
}
