//! Page augmenter: root module wiring the Yew `Component` implementation
//! with submodules for state, update logic, view rendering, and helpers.
//!
//! Responsibilities
//! - Scan the host page on first render and add a button to every known PDF.
//! - Attach the delegated click listener once the listener delay elapsed.
//! - Open the link dialog for the clicked file and close it on demand.

use yew::prelude::*;

pub mod helpers;
mod messages;
mod props;
mod state;
mod update;
mod view;

use helpers::detach_click_listener;
pub use messages::Msg;
pub use props::AugmenterProps;
pub use state::AugmenterComponent;

impl Component for AugmenterComponent {
    type Message = Msg;
    type Properties = AugmenterProps;

    fn create(_ctx: &Context<Self>) -> Self {
        AugmenterComponent::new()
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        update::update(self, ctx, msg)
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        view::view(self, ctx)
    }

    fn rendered(&mut self, ctx: &Context<Self>, first_render: bool) {
        if first_render {
            ctx.link().send_message(Msg::Scan);
        }
    }

    fn destroy(&mut self, _ctx: &Context<Self>) {
        if let Some(listener) = self.click_listener.take() {
            detach_click_listener(&listener);
        }
        if let Some((observer, _callback)) = self.observer.take() {
            observer.disconnect();
        }
    }
}
