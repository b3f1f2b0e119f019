use crate::worker::fetch::{AssetRequest, AssetResponse};
use crate::worker::policy::InstallReport;

pub enum WorkerCommand {
    Install,
    Activate,
    Fetch(AssetRequest),
}

#[derive(Debug)]
pub enum WorkerEvent {
    Installed(InstallReport),
    Activated { deleted: Vec<String> },
    Fetched(AssetResponse),
    /// Install/activate could not touch cache storage, or a passthrough
    /// request failed outright.
    Failed { what: String, reason: String },
}
