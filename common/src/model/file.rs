use serde::{Deserialize, Serialize};
use std::fmt;

/// Host-side identifier of a stored file.
///
/// The DOM hands file ids around as attribute strings while the server emits
/// them as numbers. `FileId::parse` is the single place where the two meet, so
/// every lookup after that compares typed values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileId(pub u64);

impl FileId {
    /// Parses an id read from a `file-id` attribute. Surrounding whitespace is
    /// ignored; anything that is not a plain unsigned integer yields `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        raw.trim().parse::<u64>().ok().map(FileId)
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Composite resource key understood by the annotation application:
/// `<courseId>.<moduleId>.<fileId>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AmaResourceId(String);

impl AmaResourceId {
    pub fn new(course_id: u64, module_id: u64, file_id: FileId) -> Self {
        Self(format!("{}.{}.{}", course_id, module_id, file_id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AmaResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The course module a file belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleRef {
    pub id: u64,
    pub context_id: u64,
    pub name: String,
    /// Host component, `mod_resource` or `mod_folder`.
    pub component: String,
}

/// One PDF file of the current course, as emitted by the server once per
/// page render. Never mutated after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileDescriptor {
    pub module: ModuleRef,
    pub id: FileId,
    pub name: String,
    pub path: String,
    #[serde(default = "default_mimetype")]
    pub mimetype: String,
    pub url: String,
    pub ama_resource_id: AmaResourceId,
}

fn default_mimetype() -> String {
    PDF_MIMETYPE.to_string()
}

/// The only mimetype that makes it into the file list.
pub const PDF_MIMETYPE: &str = "application/pdf";
