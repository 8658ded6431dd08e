//! Outbound links into the annotation application.
//!
//! A link is `<scheme>://app.amanote.com/<language>/moodle/<route>?<query>` where
//! the query carries the site, the user's token and the file location. Values
//! are concatenated as they are, without percent-encoding; the receiving side
//! parses them back verbatim and the exact output is relied upon in tests.

use crate::file_index::url_location;
use crate::model::file::FileDescriptor;
use crate::model::params::ParameterModel;
use crate::model::user::{UserParameterModel, UserToken};

pub const AMANOTE_HOST: &str = "app.amanote.com";

const REVISION_ZERO: &str = "content/0/";
const REVISION_LATEST: &str = "content/1/";

/// Route fragment of the annotation application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    NoteTaking,
    /// Learning analytics of one resource.
    Analytics,
    PodcastCreator,
}

impl Route {
    pub fn path(&self, file: &FileDescriptor) -> String {
        match self {
            Route::NoteTaking => "note-taking".to_string(),
            Route::Analytics => format!("document-analytics/{}/view", file.ama_resource_id),
            Route::PodcastCreator => "podcast/creator".to_string(),
        }
    }
}

/// Everything besides the file needed to build a link.
///
/// Only exists for a user holding a token: without one the annotation
/// application cannot reach the host, so no link is offered at all.
#[derive(Debug, Clone, Copy)]
pub struct UrlContext<'a> {
    params: &'a ParameterModel,
    user: &'a UserParameterModel,
    token: &'a UserToken,
}

impl<'a> UrlContext<'a> {
    pub fn new(params: &'a ParameterModel, user: &'a UserParameterModel) -> Option<Self> {
        let token = user.token.as_ref()?;
        Some(Self {
            params,
            user,
            token,
        })
    }

    pub fn params(&self) -> &'a ParameterModel {
        self.params
    }

    pub fn user(&self) -> &'a UserParameterModel {
        self.user
    }
}

/// Location of the PDF as the annotation application fetches it: the part of
/// the stored URL after the marker, pointing at the latest revision.
pub fn pdf_path(file: &FileDescriptor) -> Option<String> {
    url_location(&file.url).map(|location| location.replacen(REVISION_ZERO, REVISION_LATEST, 1))
}

/// Location of the companion annotation file in the user's private files.
pub fn ama_path(params: &ParameterModel, file: &FileDescriptor) -> String {
    format!("{}{}.ama", params.private_file_path, file.ama_resource_id)
}

/// `https` unless the site itself is recorded without it.
pub fn scheme_for(site_url: &str) -> &'static str {
    if site_url.contains("https") {
        "https"
    } else {
        "http"
    }
}

/// Builds the link opening `file` on `route`.
///
/// Returns an empty string for a missing file or for a stored URL lacking the
/// `pluginfile.php` marker; neither can be opened remotely.
pub fn build_external_url(file: Option<&FileDescriptor>, route: &Route, ctx: &UrlContext) -> String {
    let Some(file) = file else {
        return String::new();
    };
    let Some(pdf_path) = pdf_path(file) else {
        return String::new();
    };

    let params = ctx.params;
    let query = [
        ("siteURL", params.site_url.clone()),
        ("accessToken", ctx.token.value.clone()),
        ("tokenExpDate", ctx.token.expiration.to_string()),
        ("userId", ctx.user.id.clone()),
        ("pdfPath", pdf_path),
        ("amaPath", ama_path(params, file)),
        ("resourceId", file.ama_resource_id.to_string()),
        ("autosavePeriod", params.plugin.autosave_period.to_string()),
        ("saveInProvider", flag(params.plugin.save_in_provider).to_string()),
        ("providerVersion", params.moodle.version.clone()),
        ("pluginVersion", params.plugin.version.clone()),
    ]
    .iter()
    .map(|(key, value)| format!("{}={}", key, value))
    .collect::<Vec<_>>()
    .join("&");

    format!(
        "{}://{}/{}/moodle/{}?{}",
        scheme_for(&params.site_url),
        AMANOTE_HOST,
        params.language,
        route.path(file),
        query
    )
}

fn flag(value: bool) -> &'static str {
    if value { "1" } else { "0" }
}
