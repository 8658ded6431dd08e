//! Contracts of the host platform services the filter relies on.
//!
//! The filter never owns users, files or tokens; it asks the host. Each
//! concern is a small trait so the payload assembly in
//! `services::filter::params` can run against the real host tables
//! (`sqlite::SqliteHost`) or against fixtures in tests.
//!
//! - `SiteDirectory`: site root, release string, user language and contexts.
//! - `FileRepository`: course modules of a component and the files of their
//!   `content` area.
//! - `TokenIssuer`: bearer token of a user for a named web service.
//! - `CapabilityChecker`: capability lookups in a context.
//! - `FilterRegistry`: whether a text filter is active for a course.

pub mod probe;
pub mod sqlite;

use crate::error::Result;

/// Short name of the web service the annotation application talks to.
pub const MOBILE_SERVICE: &str = "moodle_mobile_app";

/// Capability making a user privileged in a course.
pub const COURSE_UPDATE_CAPABILITY: &str = "moodle/course:update";

/// Context levels of the host.
pub const CONTEXT_SYSTEM: u64 = 1;
pub const CONTEXT_LEVEL_USER: i64 = 30;
pub const CONTEXT_LEVEL_COURSE: i64 = 50;
pub const CONTEXT_LEVEL_MODULE: i64 = 70;

/// Module kinds whose files can be annotated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleComponent {
    Resource,
    Folder,
}

impl ModuleComponent {
    pub const ALL: [ModuleComponent; 2] = [ModuleComponent::Resource, ModuleComponent::Folder];

    /// Frankenstyle component name, e.g. `mod_resource`.
    pub fn component(&self) -> &'static str {
        match self {
            ModuleComponent::Resource => "mod_resource",
            ModuleComponent::Folder => "mod_folder",
        }
    }

    /// Module name as stored on course modules, e.g. `resource`.
    pub fn modname(&self) -> &'static str {
        self.component().trim_start_matches("mod_")
    }
}

/// A course module instance with its context.
#[derive(Debug, Clone, PartialEq)]
pub struct CourseModule {
    pub id: u64,
    pub context_id: u64,
    pub name: String,
}

/// A file of a module's `content` area.
#[derive(Debug, Clone, PartialEq)]
pub struct AreaFile {
    pub id: u64,
    pub filepath: String,
    pub filename: String,
    pub mimetype: String,
    /// Web service download URL of the file.
    pub fileurl: String,
}

/// Token handed out by the host for a user and a service.
#[derive(Debug, Clone, PartialEq)]
pub struct IssuedToken {
    pub token: String,
    /// Unix epoch, `0` for tokens without expiry.
    pub valid_until: u64,
}

pub trait SiteDirectory {
    /// Site root URL as configured on the host.
    fn wwwroot(&self) -> Result<String>;
    /// Full release string, e.g. `4.1.2 (Build: 20230313)`.
    fn release(&self) -> Result<String>;
    fn user_language(&self, user_id: u64) -> Result<String>;
    fn user_context_id(&self, user_id: u64) -> Result<u64>;
    fn course_context_id(&self, course_id: u64) -> Result<u64>;
}

pub trait FileRepository {
    fn course_modules(&self, course_id: u64, component: ModuleComponent) -> Result<Vec<CourseModule>>;
    fn area_files(&self, context_id: u64, component: ModuleComponent) -> Result<Vec<AreaFile>>;
}

pub trait TokenIssuer {
    /// Returns `None` when the service does not exist or is disabled.
    fn token_for_user(&self, user_id: u64, service: &str) -> Result<Option<IssuedToken>>;
}

pub trait CapabilityChecker {
    fn has_capability(&self, user_id: u64, capability: &str, context_id: u64) -> Result<bool>;
}

pub trait FilterRegistry {
    fn is_filter_active(&self, filter: &str, course_context_id: u64) -> Result<bool>;
}

/// Everything the filter needs from the host.
pub trait HostServices:
    SiteDirectory + FileRepository + TokenIssuer + CapabilityChecker + FilterRegistry
{
}

impl<T> HostServices for T where
    T: SiteDirectory + FileRepository + TokenIssuer + CapabilityChecker + FilterRegistry
{
}

/// Web service download URL of a stored file. Every segment of the path and
/// the file name is percent-encoded, as in the links the host renders.
pub fn pluginfile_url(
    wwwroot: &str,
    context_id: u64,
    component: &str,
    filearea: &str,
    itemid: u64,
    filepath: &str,
    filename: &str,
) -> String {
    format!(
        "{}/webservice/pluginfile.php/{}/{}/{}/{}{}{}",
        wwwroot.trim_end_matches('/'),
        context_id,
        component,
        filearea,
        itemid,
        encode_segments(filepath),
        urlencoding::encode(filename)
    )
}

/// `/week 1/` becomes `/week%201/`; separators are kept.
fn encode_segments(path: &str) -> String {
    path.split('/')
        .map(urlencoding::encode)
        .collect::<Vec<_>>()
        .join("/")
}
