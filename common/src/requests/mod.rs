use serde::{Deserialize, Serialize};

/// Page being rendered, as reported by the host for `POST /api/filter/setup`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageContext {
    pub course_id: u64,
    pub user_id: u64,
    /// Host page type, e.g. `course-view-topics` or `mod-folder-view`.
    pub page_type: String,
    #[serde(default)]
    pub editing: bool,
    /// Identifies one page render. Requests sharing it get the script once;
    /// without it every request counts as its own render.
    #[serde(default)]
    pub render_id: Option<String>,
}

/// What the host appends to a qualifying page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Injection {
    /// Inline script defining the page-global `amanote_params`.
    pub footer_html: String,
    pub amd: AmdCall,
}

/// Module initialization call the host queues for the page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmdCall {
    pub module: String,
    pub function: String,
    /// Single argument: the serialized user parameters.
    pub args: Vec<String>,
}
