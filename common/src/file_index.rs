//! Lookup of file descriptors by the keys the page exposes.
//!
//! Course pages show files in two shapes: resource cards carry the module id in
//! their `id` attribute, folder entries only expose a download link. Buttons are
//! later tagged with the file id. Each key gets its own lookup here.
//!
//! Every lookup is a linear scan over the descriptor list (courses hold a few
//! dozen files) and returns the first match. `None` means "leave the element
//! alone", never an error.

use crate::model::file::{FileDescriptor, FileId};

/// Marker preceding the file location inside a host download URL.
pub const PLUGINFILE_MARKER: &str = "pluginfile.php";

/// Identifying token extracted from a page element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CandidateKey {
    /// Resource card, keyed by its module id.
    ModuleId(u64),
    /// Folder entry, keyed by the href of its file link.
    Url(String),
}

/// Read-only view over the page's descriptor list.
#[derive(Debug, Clone, Copy)]
pub struct FileIndex<'a> {
    files: &'a [FileDescriptor],
}

impl<'a> FileIndex<'a> {
    pub fn new(files: &'a [FileDescriptor]) -> Self {
        Self { files }
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn find_by_module_id(&self, module_id: u64) -> Option<&'a FileDescriptor> {
        self.files.iter().find(|f| f.module.id == module_id)
    }

    /// Matches on the location after the `pluginfile.php` marker. The query
    /// string of `url` is dropped first since download links carry transient
    /// parameters such as `forcedownload=1`.
    pub fn find_by_url(&self, url: &str) -> Option<&'a FileDescriptor> {
        let wanted = url_location(url).map(strip_query)?;
        if wanted.is_empty() {
            return None;
        }

        self.files
            .iter()
            .find(|f| url_location(&f.url).is_some_and(|stored| stored == wanted))
    }

    pub fn find_by_id(&self, file_id: FileId) -> Option<&'a FileDescriptor> {
        self.files.iter().find(|f| f.id == file_id)
    }

    pub fn resolve(&self, key: &CandidateKey) -> Option<&'a FileDescriptor> {
        match key {
            CandidateKey::ModuleId(id) => self.find_by_module_id(*id),
            CandidateKey::Url(url) => self.find_by_url(url),
        }
    }
}

/// Returns what follows the first `pluginfile.php` marker, if anything does.
pub fn url_location(url: &str) -> Option<&str> {
    let (_, rest) = url.split_once(PLUGINFILE_MARKER)?;
    // A second marker ends the location.
    let rest = rest.split(PLUGINFILE_MARKER).next().unwrap_or(rest);
    (!rest.is_empty()).then_some(rest)
}

fn strip_query(location: &str) -> &str {
    location.split('?').next().unwrap_or(location)
}

/// Extracts the module id from a resource card id such as `module-12`.
pub fn parse_module_element_id(element_id: &str) -> Option<u64> {
    let (_, rest) = element_id.split_once("module-")?;
    let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}
