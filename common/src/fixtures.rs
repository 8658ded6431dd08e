use crate::model::file::{AmaResourceId, FileDescriptor, FileId, ModuleRef, PDF_MIMETYPE};
use crate::model::params::{HostInfo, ParameterModel, PluginConfig, UiStrings};
use crate::model::user::{UserParameterModel, UserToken};

pub fn descriptor(course_id: u64, module_id: u64, file_id: u64, url: &str) -> FileDescriptor {
    let component = if url.contains("mod_folder") { "mod_folder" } else { "mod_resource" };
    let name = url.rsplit('/').next().unwrap_or_default().to_string();
    FileDescriptor {
        module: ModuleRef {
            id: module_id,
            context_id: module_id + 100,
            name: format!("Module {}", module_id),
            component: component.to_string(),
        },
        id: FileId(file_id),
        name,
        path: "/".to_string(),
        mimetype: PDF_MIMETYPE.to_string(),
        url: url.to_string(),
        ama_resource_id: AmaResourceId::new(course_id, module_id, FileId(file_id)),
    }
}

pub fn page_params(files: Vec<FileDescriptor>) -> ParameterModel {
    ParameterModel {
        site_url: "https://lms.test".to_string(),
        language: "en".to_string(),
        private_file_path: "/21/user/private/Amanote/".to_string(),
        files,
        moodle: HostInfo {
            version: "4.1.2".to_string(),
        },
        plugin: PluginConfig {
            version: "2020101900".to_string(),
            autosave_period: 5,
            save_in_provider: true,
            key: None,
            logo: "https://lms.test/theme/image.php/boost/filter_amanote/1/amanote-logo".to_string(),
        },
        strings: UiStrings {
            open_in_amanote: "Open in Amanote".to_string(),
            download_notes: "Download annotated file".to_string(),
            open_analytics: "Open Learning Analytics".to_string(),
            open_podcast_creator: "Open Podcast Creator".to_string(),
            teacher: "Teacher".to_string(),
        },
        listener_delay_ms: 500,
    }
}

pub fn user_params(is_teacher: bool) -> UserParameterModel {
    UserParameterModel {
        id: "3".to_string(),
        token: Some(UserToken {
            value: "T".to_string(),
            expiration: 1700000000,
        }),
        is_teacher,
    }
}
