use gloo_timers::future::TimeoutFuture;
use uuid::Uuid;
use yew::events::{KeyboardEvent, MouseEvent};
use yew::{html, Callback, Component, Context, Html, NodeRef, Properties};

/// Delay before the `show` class is toggled, so the fade transition runs.
const TRANSITION_DELAY_MS: u32 = 50;

/// Bootstrap-styled modal container. Visibility is driven by `open`; the
/// `show` class is toggled afterwards through `open_modal_sheet` and
/// `close_modal_sheet`.
pub struct ModalSheet {
    pub id: String,
}

#[derive(Properties, PartialEq)]
pub struct Props {
    #[prop_or_default]
    pub children: Html,
    pub node_ref: NodeRef,
    pub title: String,
    pub open: bool,
    pub on_close: Callback<()>,
}

impl ModalSheet {
    pub fn title_id(&self) -> String {
        format!("{}-title", self.id)
    }
}

impl Component for ModalSheet {
    type Message = ();
    type Properties = Props;

    fn create(_ctx: &Context<Self>) -> Self {
        Self {
            id: format!("id-{}", Uuid::new_v4()),
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let props = ctx.props();
        let display = if props.open { "display: block" } else { "display: none" };

        let close_on_backdrop = {
            let on_close = props.on_close.clone();
            Callback::from(move |_: MouseEvent| on_close.emit(()))
        };
        let close_on_button = {
            let on_close = props.on_close.clone();
            Callback::from(move |_: MouseEvent| on_close.emit(()))
        };
        let close_on_escape = {
            let on_close = props.on_close.clone();
            Callback::from(move |e: KeyboardEvent| {
                if e.key() == "Escape" {
                    on_close.emit(());
                }
            })
        };
        // Clicks inside the dialog must not reach the backdrop handler.
        let keep_open = Callback::from(|e: MouseEvent| e.stop_propagation());

        html! {
            <div class="modal fade"
                 id={self.id.clone()}
                 ref={props.node_ref.clone()}
                 style={display}
                 tabindex="-1"
                 role="dialog"
                 aria-labelledby={self.title_id()}
                 aria-hidden={(!props.open).to_string()}
                 onclick={close_on_backdrop}
                 onkeydown={close_on_escape}>
                <div class="modal-dialog modal-dialog-centered" role="document" onclick={keep_open}>
                    <div class="modal-content">
                        <div class="modal-header">
                            <h5 class="modal-title" id={self.title_id()}>{ props.title.clone() }</h5>
                            <button type="button" class="close" aria-label="Close" onclick={close_on_button}>
                                <span aria-hidden="true">{ "\u{00d7}" }</span>
                            </button>
                        </div>
                        <div class="modal-body">
                            { props.children.clone() }
                        </div>
                    </div>
                </div>
            </div>
        }
    }
}

pub fn open_modal_sheet(sheet_ref: NodeRef) {
    toggle_show(sheet_ref, true);
}

pub fn close_modal_sheet(sheet_ref: NodeRef) {
    toggle_show(sheet_ref, false);
}

fn toggle_show(sheet_ref: NodeRef, show: bool) {
    if let Some(sheet) = sheet_ref.cast::<web_sys::HtmlElement>() {
        wasm_bindgen_futures::spawn_local(async move {
            TimeoutFuture::new(TRANSITION_DELAY_MS).await;
            let classes = sheet.class_list();
            let _ = if show {
                classes.add_1("show")
            } else {
                classes.remove_1("show")
            };
            if show {
                // Focus so that Escape reaches the keydown handler.
                let _ = sheet.focus();
            }
        });
    }
}
