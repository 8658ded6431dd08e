//! # Filter Setup Service
//!
//! Decides whether a page gets the client script and, when it does, produces
//! the injection for the host to append. Backs `POST /api/filter/setup`.
//!
//! ## Workflow
//!
//! 1.  **Activation**: the `amanote` filter must be active in the course context.
//! 2.  **Once per page**: a `FilterSetup` lives for one page render; the host may
//!     call it for every text area it filters, only the first call inserts.
//! 3.  **Page type**: course pages (`course-view*`) and folder pages
//!     (`mod-folder-view`) qualify, and never while the user is editing.
//! 4.  **Payloads**: page and user parameters are assembled (`params`) and
//!     rendered (`render`).
//!
//! Any failure along the way is logged at debug level and the page is simply
//! skipped; nothing is ever reported to the end user.

use crate::config::PluginSettings;
use crate::error::Result;
use crate::host::probe::SiteProbe;
use crate::host::sqlite::SqliteHost;
use crate::host::HostServices;
use crate::services::filter::params::{generate_params, generate_user_params};
use crate::services::filter::render::render_injection;
use crate::state::AppState;
use actix_web::{web, HttpResponse, Responder};
use common::requests::{Injection, PageContext};
use log::debug;

/// Name of the filter in the host's activation table.
pub const FILTER_NAME: &str = "amanote";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    FilterInactive,
    AlreadyInserted,
    PageType,
    Editing,
    Failed,
}

#[derive(Debug)]
pub enum SetupOutcome {
    Inserted(Injection),
    Skipped(SkipReason),
}

/// Injection state of one page render.
#[derive(Debug, Default)]
pub struct FilterSetup {
    script_inserted: bool,
}

impl FilterSetup {
    /// Setup for a render that may already have received the script.
    pub fn resumed(script_inserted: bool) -> Self {
        Self { script_inserted }
    }

    pub async fn setup<H, P>(
        &mut self,
        page: &PageContext,
        host: &H,
        probe: &P,
        plugin: &PluginSettings,
    ) -> SetupOutcome
    where
        H: HostServices,
        P: SiteProbe,
    {
        match self.try_setup(page, host, probe, plugin).await {
            Ok(outcome) => outcome,
            Err(e) => {
                debug!("An error occurred: {}", e);
                SetupOutcome::Skipped(SkipReason::Failed)
            }
        }
    }

    async fn try_setup<H, P>(
        &mut self,
        page: &PageContext,
        host: &H,
        probe: &P,
        plugin: &PluginSettings,
    ) -> Result<SetupOutcome>
    where
        H: HostServices,
        P: SiteProbe,
    {
        let course_context = host.course_context_id(page.course_id)?;
        if !host.is_filter_active(FILTER_NAME, course_context)? {
            return Ok(SetupOutcome::Skipped(SkipReason::FilterInactive));
        }

        if self.script_inserted {
            return Ok(SetupOutcome::Skipped(SkipReason::AlreadyInserted));
        }
        if !is_qualifying_page(&page.page_type) {
            return Ok(SetupOutcome::Skipped(SkipReason::PageType));
        }
        if page.editing {
            return Ok(SetupOutcome::Skipped(SkipReason::Editing));
        }

        let params = generate_params(host, probe, page, plugin).await?;
        let user = generate_user_params(host, page)?;
        let injection = render_injection(&params, &user)?;

        self.script_inserted = true;
        Ok(SetupOutcome::Inserted(injection))
    }
}

/// Course pages and folder pages carry file listings.
pub fn is_qualifying_page(page_type: &str) -> bool {
    page_type.starts_with("course-view") || page_type == "mod-folder-view"
}

/// Actix web handler for `POST /api/filter/setup`.
///
/// # Returns
/// - `200 OK` with the `Injection` as JSON when the page qualifies.
/// - `204 No Content` whenever the page is skipped, failures included, and
///   for every later request carrying the same `renderId`.
pub async fn process(page: web::Json<PageContext>, state: web::Data<AppState>) -> impl Responder {
    let page = page.into_inner();

    let host = match SqliteHost::open(&state.settings.database) {
        Ok(host) => host,
        Err(e) => {
            debug!("An error occurred: {}", e);
            return HttpResponse::NoContent().finish();
        }
    };

    let render_id = page.render_id.as_deref();
    let mut setup = FilterSetup::resumed(render_id.is_some_and(|id| state.renders.is_inserted(id)));
    let outcome = setup
        .setup(&page, &host, &state.probe, &state.settings.plugin)
        .await;

    // Concurrent requests of one render race here; the first claim wins.
    let outcome = match (outcome, render_id) {
        (SetupOutcome::Inserted(_), Some(id)) if !state.renders.claim(id) => {
            SetupOutcome::Skipped(SkipReason::AlreadyInserted)
        }
        (outcome, _) => outcome,
    };

    match outcome {
        SetupOutcome::Inserted(injection) => HttpResponse::Ok().json(injection),
        SetupOutcome::Skipped(reason) => {
            debug!(
                "Skipping course {} page '{}': {:?}",
                page.course_id, page.page_type, reason
            );
            HttpResponse::NoContent().finish()
        }
    }
}
