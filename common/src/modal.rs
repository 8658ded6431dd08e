//! Content of the dialog opened from a file button.

use crate::model::file::FileDescriptor;
use crate::url_builder::{build_external_url, Route, UrlContext};

/// Dialog title.
pub const MODAL_TITLE: &str = "Amanote";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    Open,
    Download,
    Analytics,
    PodcastCreator,
}

/// One full-width button of the dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkSpec {
    pub kind: LinkKind,
    pub href: String,
    pub label: String,
}

/// Links offered for `file`, in display order: open, download, then for
/// privileged users analytics and, when a key is configured, the podcast
/// creator.
pub fn link_specs(file: &FileDescriptor, ctx: &UrlContext) -> Vec<LinkSpec> {
    let params = ctx.params();
    let strings = &params.strings;

    let open_url = build_external_url(Some(file), &Route::NoteTaking, ctx);
    if open_url.is_empty() {
        return Vec::new();
    }
    let download_url = format!("{}&downloadNotes", open_url);

    let mut links = vec![
        LinkSpec {
            kind: LinkKind::Open,
            href: open_url,
            label: strings.open_in_amanote.clone(),
        },
        LinkSpec {
            kind: LinkKind::Download,
            href: download_url,
            label: strings.download_notes.clone(),
        },
    ];

    if ctx.user().is_teacher {
        links.push(LinkSpec {
            kind: LinkKind::Analytics,
            href: build_external_url(Some(file), &Route::Analytics, ctx),
            label: strings.open_analytics.clone(),
        });

        if params.plugin.has_key() {
            links.push(LinkSpec {
                kind: LinkKind::PodcastCreator,
                href: build_external_url(Some(file), &Route::PodcastCreator, ctx),
                label: strings.open_podcast_creator.clone(),
            });
        }
    }

    links
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{descriptor, page_params, user_params};

    const DOC_URL: &str = "https://lms.test/webservice/pluginfile.php/7/mod_resource/content/0/doc.pdf";

    fn kinds(links: &[LinkSpec]) -> Vec<LinkKind> {
        links.iter().map(|l| l.kind).collect()
    }

    #[test]
    fn student_gets_open_and_download() {
        let params = page_params(vec![descriptor(5, 12, 99, DOC_URL)]);
        let user = user_params(false);
        let ctx = UrlContext::new(&params, &user).unwrap();

        let links = link_specs(&params.files[0], &ctx);

        assert_eq!(kinds(&links), vec![LinkKind::Open, LinkKind::Download]);
        assert_eq!(links[1].href, format!("{}&downloadNotes", links[0].href));
        assert_eq!(links[0].label, "Open in Amanote");
    }

    #[test]
    fn teacher_without_key_gets_analytics() {
        let params = page_params(vec![descriptor(5, 12, 99, DOC_URL)]);
        let user = user_params(true);
        let ctx = UrlContext::new(&params, &user).unwrap();

        let links = link_specs(&params.files[0], &ctx);

        assert_eq!(
            kinds(&links),
            vec![LinkKind::Open, LinkKind::Download, LinkKind::Analytics]
        );
        assert!(links[2].href.contains("/document-analytics/5.12.99/view?"));
    }

    #[test]
    fn teacher_with_key_gets_all_four_in_order() {
        let mut params = page_params(vec![descriptor(5, 12, 99, DOC_URL)]);
        params.plugin.key = Some("activation-key".to_string());
        let user = user_params(true);
        let ctx = UrlContext::new(&params, &user).unwrap();

        let links = link_specs(&params.files[0], &ctx);

        assert_eq!(
            kinds(&links),
            vec![
                LinkKind::Open,
                LinkKind::Download,
                LinkKind::Analytics,
                LinkKind::PodcastCreator
            ]
        );
        assert!(links[3].href.contains("/moodle/podcast/creator?"));
    }

    #[test]
    fn blank_key_counts_as_missing() {
        let mut params = page_params(vec![descriptor(5, 12, 99, DOC_URL)]);
        params.plugin.key = Some("  ".to_string());
        let user = user_params(true);
        let ctx = UrlContext::new(&params, &user).unwrap();

        assert_eq!(link_specs(&params.files[0], &ctx).len(), 3);
    }

    #[test]
    fn student_with_key_still_gets_two() {
        let mut params = page_params(vec![descriptor(5, 12, 99, DOC_URL)]);
        params.plugin.key = Some("activation-key".to_string());
        let user = user_params(false);
        let ctx = UrlContext::new(&params, &user).unwrap();

        assert_eq!(link_specs(&params.files[0], &ctx).len(), 2);
    }
}
