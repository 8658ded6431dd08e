//! # Filter Service Module
//!
//! Routes under `/api/filter` used by the host while it renders a page.
//!
//! ## Sub-modules:
//! - `setup`: injection decision and HTTP handler.
//! - `params`: page and user parameter assembly from the host services.
//! - `render`: footer script and module initialization call.

mod params;
mod render;
mod setup;

use actix_web::web::{post, scope};
use actix_web::Scope;

/// The base path for all filter-related API endpoints.
const API_PATH: &str = "/api/filter";

/// Configures and returns the Actix `Scope` for the filter routes.
///
/// # Registered Routes:
///
/// *   **`POST /setup`**:
///     - **Handler**: `setup::process`
///     - **Description**: Receives the `PageContext` of the page being rendered
///       (course, user, page type, editing flag). Answers `200 OK` with the
///       `Injection` to append when the page qualifies, `204 No Content` otherwise.
pub fn configure_routes() -> Scope {
    scope(API_PATH).route("/setup", post().to(setup::process))
}
