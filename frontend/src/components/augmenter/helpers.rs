//! DOM plumbing of the augmenter: reading the page payload, scanning the
//! host page and wiring document-level listeners.

use common::file_index::FileIndex;
use common::model::params::ParameterModel;
use gloo_console::error;
use js_sys::Reflect;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Element, MouseEvent, MutationObserver, MutationObserverInit};
use yew::html::Scope;

use crate::injector::{button_file_id, inject_buttons, FolderEntry, ResourceCard};

use super::messages::Msg;
use super::state::{AugmenterComponent, ClickListener, MutationCallback};

/// Name of the page-global defined by the footer script.
pub const PARAMS_GLOBAL: &str = "amanote_params";

/// Reads `window.amanote_params`. Returns `None` when it is not defined or
/// does not hold a valid payload.
pub fn read_page_params() -> Option<ParameterModel> {
    let window = web_sys::window()?;
    let value = Reflect::get(&window, &JsValue::from_str(PARAMS_GLOBAL)).ok()?;
    if value.is_undefined() || value.is_null() {
        return None;
    }

    let raw: String = js_sys::JSON::stringify(&value).ok()?.into();
    match ParameterModel::from_json(&raw) {
        Ok(params) => Some(params),
        Err(e) => {
            error!(format!("amanote: invalid page parameters: {}", e));
            None
        }
    }
}

/// Runs every layout over the current document and returns the number of
/// buttons added.
pub fn scan_page(params: &ParameterModel) -> usize {
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return 0;
    };
    let index = FileIndex::new(&params.files);
    if index.is_empty() {
        return 0;
    }

    inject_buttons(
        &document,
        &index,
        &params.plugin.logo,
        &[&ResourceCard, &FolderEntry],
    )
}

/// `file-id` of the button an event originated from, if any.
///
/// Resolved at click time so buttons added by later scans are covered.
pub fn clicked_file_id(event: &MouseEvent) -> Option<String> {
    let target = event.target()?.dyn_into::<Element>().ok()?;
    button_file_id(&target)
}

/// Registers one click listener on the document for all buttons.
pub fn attach_click_listener(link: Scope<AugmenterComponent>) -> Option<ClickListener> {
    let document = web_sys::window()?.document()?;
    let listener = Closure::<dyn FnMut(MouseEvent)>::new(move |event: MouseEvent| {
        if let Some(file_id) = clicked_file_id(&event) {
            event.prevent_default();
            link.send_message(Msg::ButtonClicked(file_id));
        }
    });

    document
        .add_event_listener_with_callback("click", listener.as_ref().unchecked_ref())
        .ok()?;
    Some(listener)
}

pub fn detach_click_listener(listener: &ClickListener) {
    if let Some(document) = web_sys::window().and_then(|w| w.document()) {
        let _ = document
            .remove_event_listener_with_callback("click", listener.as_ref().unchecked_ref());
    }
}

/// Watches the body for added nodes so files rendered after the first scan
/// get their button too.
pub fn observe_page(link: Scope<AugmenterComponent>) -> Option<(MutationObserver, MutationCallback)> {
    let body = web_sys::window()?.document()?.body()?;
    let callback = Closure::<dyn FnMut(js_sys::Array, MutationObserver)>::new(
        move |_records: js_sys::Array, _observer: MutationObserver| {
            link.send_message(Msg::PageMutated);
        },
    );

    let observer = MutationObserver::new(callback.as_ref().unchecked_ref()).ok()?;
    let options = MutationObserverInit::new();
    options.set_child_list(true);
    options.set_subtree(true);
    observer.observe_with_options(&body, &options).ok()?;

    Some((observer, callback))
}
