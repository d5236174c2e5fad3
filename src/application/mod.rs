pub mod download_coordinator;
pub mod transfer;

pub use download_coordinator::{DownloadCoordinator, DownloadJob};
pub use transfer::ProgressSink;
