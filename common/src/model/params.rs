use crate::model::file::FileDescriptor;
use serde::{Deserialize, Serialize};

/// Delay before the click listener is attached when the page does not say otherwise.
pub const DEFAULT_LISTENER_DELAY_MS: u32 = 500;

/// Page-global parameters, produced once per page render by the server and
/// embedded in the page as `amanote_params`.
///
/// The client never mutates this value; it is handed to the component through
/// its properties at bootstrap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterModel {
    #[serde(rename = "siteURL")]
    pub site_url: String,
    /// Two-letter language code used in the outbound route.
    pub language: String,
    /// Per-user namespace where annotated files are stored, ending with `/`.
    pub private_file_path: String,
    #[serde(default)]
    pub files: Vec<FileDescriptor>,
    pub moodle: HostInfo,
    pub plugin: PluginConfig,
    pub strings: UiStrings,
    #[serde(default = "default_listener_delay")]
    pub listener_delay_ms: u32,
}

fn default_listener_delay() -> u32 {
    DEFAULT_LISTENER_DELAY_MS
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostInfo {
    /// Host platform release, trimmed to `major.minor[.patch]` when possible.
    pub version: String,
}

/// Admin settings of the plugin plus the values derived from its installation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginConfig {
    pub version: String,
    /// Minutes between automatic saves, `0` disables auto-save.
    pub autosave_period: u32,
    pub save_in_provider: bool,
    /// Activation key; advanced features stay hidden while it is absent.
    #[serde(default)]
    pub key: Option<String>,
    pub logo: String,
}

impl PluginConfig {
    /// An empty key counts as no key.
    pub fn has_key(&self) -> bool {
        self.key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }
}

/// Localized labels rendered by the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiStrings {
    pub open_in_amanote: String,
    pub download_notes: String,
    pub open_analytics: String,
    pub open_podcast_creator: String,
    pub teacher: String,
}

impl ParameterModel {
    /// Parses the page-global payload.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}
