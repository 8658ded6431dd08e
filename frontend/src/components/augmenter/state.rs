//! Runtime state of the augmenter.
//!
//! The component moves through `Phase` as follows:
//!
//! ```text
//! Uninitialized --scan--> Scanned --listener attached--> Idle <--> DialogOpen
//! ```
//!
//! Rescans triggered by page mutations never change the phase.

use common::model::file::FileId;
use wasm_bindgen::closure::Closure;
use web_sys::{MouseEvent, MutationObserver};
use yew::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Uninitialized,
    Scanned,
    Idle,
    DialogOpen,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseEvent {
    Scanned,
    ListenerAttached,
    DialogOpened,
    DialogClosed,
}

impl Phase {
    pub fn next(self, event: PhaseEvent) -> Phase {
        match (self, event) {
            (Phase::Uninitialized, PhaseEvent::Scanned) => Phase::Scanned,
            (Phase::Scanned, PhaseEvent::ListenerAttached) => Phase::Idle,
            (Phase::Idle | Phase::DialogOpen, PhaseEvent::DialogOpened) => Phase::DialogOpen,
            (Phase::DialogOpen, PhaseEvent::DialogClosed) => Phase::Idle,
            (phase, _) => phase,
        }
    }
}

pub type ClickListener = Closure<dyn FnMut(MouseEvent)>;
pub type MutationCallback = Closure<dyn FnMut(js_sys::Array, MutationObserver)>;

pub struct AugmenterComponent {
    pub phase: Phase,

    /// File whose dialog is shown.
    pub open_file: Option<FileId>,

    /// Buttons added so far, all scans included.
    pub injected: usize,

    pub dialog_ref: NodeRef,

    /// Delegated click listener on the document, kept alive while mounted.
    pub click_listener: Option<ClickListener>,

    pub observer: Option<(MutationObserver, MutationCallback)>,
}

impl AugmenterComponent {
    pub fn new() -> Self {
        Self {
            phase: Phase::Uninitialized,
            open_file: None,
            injected: 0,
            dialog_ref: NodeRef::default(),
            click_listener: None,
            observer: None,
        }
    }

    pub fn advance(&mut self, event: PhaseEvent) {
        self.phase = self.phase.next(event);
    }
}
