//! # Parameter Assembly
//!
//! Builds the two payloads handed to the client for one page render:
//!
//! - the page-global `ParameterModel` (site, language, private file path, PDF
//!   inventory of the course, plugin settings and labels);
//! - the per-user `UserParameterModel` (user id, web service token, privileged
//!   flag).
//!
//! Both are computed from the host services only; nothing here is cached
//! across requests.

use crate::config::PluginSettings;
use crate::error::Result;
use crate::host::probe::{resolve_site_url, SiteProbe};
use crate::host::{
    FileRepository, HostServices, ModuleComponent, COURSE_UPDATE_CAPABILITY, MOBILE_SERVICE,
};
use crate::lang::{short_language, strings_for};
use common::model::file::{AmaResourceId, FileDescriptor, FileId, ModuleRef, PDF_MIMETYPE};
use common::model::params::{HostInfo, ParameterModel, PluginConfig};
use common::model::user::{UserParameterModel, UserToken};
use common::requests::PageContext;
use regex::Regex;
use std::sync::OnceLock;

/// Page-global parameters for `page`.
pub async fn generate_params<H, P>(
    host: &H,
    probe: &P,
    page: &PageContext,
    plugin: &PluginSettings,
) -> Result<ParameterModel>
where
    H: HostServices,
    P: SiteProbe,
{
    let wwwroot = host.wwwroot()?;
    let site_url = resolve_site_url(&wwwroot, probe).await;
    let lang = host.user_language(page.user_id)?;
    let user_context = host.user_context_id(page.user_id)?;

    Ok(ParameterModel {
        site_url,
        language: short_language(&lang),
        private_file_path: private_file_path(user_context),
        files: get_course_files(host, page.course_id)?,
        moodle: HostInfo {
            version: trim_release(&host.release()?),
        },
        plugin: PluginConfig {
            version: plugin.version.clone(),
            autosave_period: plugin.autosave_period,
            save_in_provider: plugin.save_in_provider,
            key: plugin.key.clone(),
            logo: format!("{}{}", wwwroot.trim_end_matches('/'), plugin.logo_path),
        },
        strings: strings_for(&lang),
        listener_delay_ms: plugin.listener_delay_ms,
    })
}

/// Per-user parameters for `page`.
pub fn generate_user_params<H: HostServices>(host: &H, page: &PageContext) -> Result<UserParameterModel> {
    let course_context = host.course_context_id(page.course_id)?;
    let is_teacher = host.has_capability(page.user_id, COURSE_UPDATE_CAPABILITY, course_context)?;
    let token = host
        .token_for_user(page.user_id, MOBILE_SERVICE)?
        .map(|issued| UserToken {
            value: issued.token,
            expiration: issued.valid_until,
        });

    Ok(UserParameterModel {
        id: page.user_id.to_string(),
        token,
        is_teacher,
    })
}

/// PDF files of the course: resource modules first, then folders.
pub fn get_course_files<H: FileRepository>(host: &H, course_id: u64) -> Result<Vec<FileDescriptor>> {
    let mut files = Vec::new();
    for component in ModuleComponent::ALL {
        files.extend(get_files_by_module(host, course_id, component)?);
    }
    Ok(files)
}

fn get_files_by_module<H: FileRepository>(
    host: &H,
    course_id: u64,
    component: ModuleComponent,
) -> Result<Vec<FileDescriptor>> {
    let mut files = Vec::new();

    for module in host.course_modules(course_id, component)? {
        for file in host.area_files(module.context_id, component)? {
            if file.mimetype != PDF_MIMETYPE {
                continue;
            }

            let file_id = FileId(file.id);
            files.push(FileDescriptor {
                module: ModuleRef {
                    id: module.id,
                    context_id: module.context_id,
                    name: module.name.clone(),
                    component: component.component().to_string(),
                },
                id: file_id,
                name: file.filename,
                path: file.filepath,
                mimetype: file.mimetype,
                url: file.fileurl,
                ama_resource_id: AmaResourceId::new(course_id, module.id, file_id),
            });
        }
    }

    Ok(files)
}

fn private_file_path(user_context_id: u64) -> String {
    format!("/{}/user/private/Amanote/", user_context_id)
}

/// Drops the build suffix of a release string: `4.1.2 (Build: 20230313)`
/// becomes `4.1.2`. Strings that do not fit the pattern are kept whole.
pub fn trim_release(release: &str) -> String {
    static RELEASE_RE: OnceLock<Regex> = OnceLock::new();
    let re = RELEASE_RE
        .get_or_init(|| Regex::new(r"(\d+\.\d+(\.\d+)?) .*$").expect("valid release pattern"));
    re.replace(release, "$1").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::probe::tests::StubProbe;
    use crate::host::sqlite::tests::seeded_host;
    use common::file_index::FileIndex;

    fn page(user_id: u64) -> PageContext {
        PageContext {
            course_id: 5,
            user_id,
            page_type: "course-view-topics".to_string(),
            editing: false,
            render_id: None,
        }
    }

    #[test]
    fn release_trimming() {
        assert_eq!(trim_release("4.1.2 (Build: 20230313)"), "4.1.2");
        assert_eq!(trim_release("3.9 (Build: 20200615)"), "3.9");
        assert_eq!(trim_release("3.9.2+ (Build: 20200929)"), "3.9.2+ (Build: 20200929)");
        assert_eq!(trim_release("4.0"), "4.0");
    }

    #[test]
    fn course_files_are_pdf_only_resources_first() {
        let host = seeded_host();
        let files = get_course_files(&host, 5).unwrap();

        let ids: Vec<_> = files.iter().map(|f| f.id).collect();
        assert_eq!(ids, vec![FileId(99), FileId(100)]);
        assert_eq!(files[0].ama_resource_id.as_str(), "5.12.99");
        assert_eq!(files[0].module.component, "mod_resource");
        assert_eq!(files[1].module.component, "mod_folder");
        assert_eq!(
            files[0].url,
            "http://lms.test/webservice/pluginfile.php/7/mod_resource/content/0/doc.pdf"
        );
    }

    #[test]
    fn folder_link_with_encoded_name_resolves() {
        let host = seeded_host();
        host.connection()
            .execute("UPDATE mdl_files SET filename = 'week 1.pdf' WHERE id = 100", [])
            .unwrap();

        let files = get_course_files(&host, 5).unwrap();
        let index = FileIndex::new(&files);
        let href = "http://lms.test/pluginfile.php/8/mod_folder/content/0/week%201.pdf?forcedownload=1";

        assert_eq!(index.find_by_url(href).map(|f| f.id), Some(FileId(100)));
        assert_eq!(files[1].name, "week 1.pdf");
    }

    #[actix_web::test]
    async fn page_params_from_host() {
        let host = seeded_host();
        let probe = StubProbe::new(true);
        let plugin = PluginSettings::default();

        let params = generate_params(&host, &probe, &page(3), &plugin).await.unwrap();

        assert_eq!(params.site_url, "https://lms.test");
        assert_eq!(params.language, "fr");
        assert_eq!(params.private_file_path, "/21/user/private/Amanote/");
        assert_eq!(params.moodle.version, "4.1.2");
        assert_eq!(params.files.len(), 2);
        assert_eq!(params.strings.open_in_amanote, "Ouvrir dans Amanote");
        assert_eq!(
            params.plugin.logo,
            "http://lms.test/filter/amanote/pix/amanote-logo.png"
        );
        assert_eq!(params.plugin.key, None);
    }

    #[test]
    fn user_params_from_host() {
        let host = seeded_host();

        let student = generate_user_params(&host, &page(3)).unwrap();
        let teacher = generate_user_params(&host, &page(4)).unwrap();

        assert_eq!(student.id, "3");
        assert!(!student.is_teacher);
        assert!(student.token.is_some());
        assert!(teacher.is_teacher);
    }

    #[test]
    fn user_params_without_service() {
        let host = seeded_host();
        host.connection()
            .execute("DELETE FROM mdl_external_services", [])
            .unwrap();

        let user = generate_user_params(&host, &page(3)).unwrap();
        assert!(user.token.is_none());
    }
}
