//! Update function of the augmenter.
//!
//! Follows the same Elm-style contract as the other components: mutate the
//! state for `msg` and return whether the view must re-render.

use common::file_index::FileIndex;
use common::model::file::FileId;
use gloo_console::{log, warn};
use gloo_timers::future::TimeoutFuture;
use yew::platform::spawn_local;
use yew::prelude::*;

use crate::tops_sheet::modal_sheet::{close_modal_sheet, open_modal_sheet};

use super::helpers::{attach_click_listener, observe_page, scan_page};
use super::messages::Msg;
use super::state::{AugmenterComponent, Phase, PhaseEvent};

pub fn update(
    component: &mut AugmenterComponent,
    ctx: &Context<AugmenterComponent>,
    msg: Msg,
) -> bool {
    match msg {
        Msg::Scan => {
            let params = &ctx.props().params;
            component.injected += scan_page(params);

            if component.phase == Phase::Uninitialized {
                component.advance(PhaseEvent::Scanned);
                log!(format!(
                    "amanote: {} button(s) added for {} file(s)",
                    component.injected,
                    params.files.len()
                ));

                let link = ctx.link().clone();
                let delay = params.listener_delay_ms;
                spawn_local(async move {
                    TimeoutFuture::new(delay).await;
                    link.send_message(Msg::AttachListener);
                });

                component.observer = observe_page(ctx.link().clone());
            }
            false
        }
        Msg::PageMutated => {
            component.injected += scan_page(&ctx.props().params);
            false
        }
        Msg::AttachListener => {
            if component.click_listener.is_none() {
                component.click_listener = attach_click_listener(ctx.link().clone());
            }
            component.advance(PhaseEvent::ListenerAttached);
            false
        }
        Msg::ButtonClicked(raw_id) => {
            let params = &ctx.props().params;
            let file = FileId::parse(&raw_id)
                .and_then(|id| FileIndex::new(&params.files).find_by_id(id));

            match file {
                Some(file) => {
                    component.open_file = Some(file.id);
                    component.advance(PhaseEvent::DialogOpened);
                    open_modal_sheet(component.dialog_ref.clone());
                    true
                }
                None => {
                    warn!(format!("amanote: no file for button id '{}'", raw_id));
                    false
                }
            }
        }
        Msg::CloseDialog => {
            if component.phase != Phase::DialogOpen {
                return false;
            }
            component.open_file = None;
            component.advance(PhaseEvent::DialogClosed);
            close_modal_sheet(component.dialog_ref.clone());
            true
        }
    }
}
