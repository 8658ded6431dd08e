//! Client bundle embedded at build time (see `build.rs`).
//!
//! The host page loads `frontend.js`, which fetches `frontend_bg.wasm` next to
//! it. Unknown paths answer `404 Not Found`.

use actix_web::{HttpRequest, HttpResponse};
use include_dir::{include_dir, Dir};
use mime_guess::from_path;

static STATIC_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/static/dist");

/// Base path the bundle is served under.
pub const ASSETS_PATH: &str = "/amanote";

pub async fn serve_embedded(req: HttpRequest) -> HttpResponse {
    let path = req
        .path()
        .trim_start_matches(ASSETS_PATH)
        .trim_start_matches('/');

    match STATIC_DIR.get_file(path) {
        Some(file) if !path.is_empty() => {
            let mime = from_path(path).first_or_octet_stream();
            HttpResponse::Ok()
                .content_type(mime.as_ref())
                .body(file.contents().to_vec())
        }
        _ => HttpResponse::NotFound().body("Not Found"),
    }
}
