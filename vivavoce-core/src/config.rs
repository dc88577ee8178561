use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the interview service, e.g. `http://localhost:5000`.
    pub base_url: String,

    /// Preferred capture device name; `None` means the system default.
    #[serde(default)]
    pub microphone_device: Option<String>,
}
