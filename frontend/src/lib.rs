//! Browser client of the Amanote filter.
//!
//! The host queues `init(<user params JSON>)` on qualifying course pages and
//! defines the page-global `amanote_params` in the footer. `init` reads both
//! once, then hands them to the `AugmenterComponent`, which adds a button to
//! every supported PDF on the page and opens the link dialog on click.

use std::rc::Rc;

use common::model::params::ParameterModel;
use common::model::user::UserParameterModel;
use gloo_console::{error, log};
use wasm_bindgen::prelude::*;

mod components;
pub mod injector;
mod tops_sheet;

use components::augmenter::{AugmenterComponent, AugmenterProps};
use components::augmenter::helpers::read_page_params;

/// Id of the element the component is mounted on.
const ROOT_ID: &str = "amanote-root";

/// Entry point called by the host with the serialized user parameters.
#[wasm_bindgen]
pub fn init(raw_user_params: &str) {
    // Absent page parameters mean the feature is off for this page.
    let Some(params) = read_page_params() else {
        log!("amanote: no page parameters, nothing to do");
        return;
    };

    let Some(user) = parse_user_params(raw_user_params) else {
        return;
    };
    if user.token.is_none() {
        log!("amanote: no web service token for the current user");
        return;
    }

    mount(params, user);
}

fn parse_user_params(raw: &str) -> Option<UserParameterModel> {
    match UserParameterModel::parse(raw) {
        Ok(user) => Some(user),
        Err(e) => {
            error!(format!("amanote: invalid user parameters: {}", e));
            None
        }
    }
}

fn mount(params: ParameterModel, user: UserParameterModel) {
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return;
    };
    // Initialization is not re-entrant.
    if document.get_element_by_id(ROOT_ID).is_some() {
        return;
    }
    let (Ok(root), Some(body)) = (document.create_element("div"), document.body()) else {
        return;
    };
    root.set_id(ROOT_ID);
    if body.append_child(&root).is_err() {
        return;
    }

    yew::Renderer::<AugmenterComponent>::with_root_and_props(
        root,
        AugmenterProps {
            params: Rc::new(params),
            user: Rc::new(user),
        },
    )
    .render();
}
