//! View of the augmenter: the link dialog. Buttons live in the host page and
//! are handled by the injector, so nothing is rendered while no dialog is
//! open apart from the hidden sheet.

use common::file_index::FileIndex;
use common::modal::{link_specs, LinkSpec, MODAL_TITLE};
use common::url_builder::UrlContext;
use yew::prelude::*;

use crate::tops_sheet::modal_sheet::ModalSheet;

use super::messages::Msg;
use super::state::{AugmenterComponent, Phase};

pub fn view(component: &AugmenterComponent, ctx: &Context<AugmenterComponent>) -> Html {
    let props = ctx.props();
    let on_close = ctx.link().callback(|_: ()| Msg::CloseDialog);

    let links = component
        .open_file
        .and_then(|id| FileIndex::new(&props.params.files).find_by_id(id))
        .zip(UrlContext::new(&props.params, &props.user))
        .map(|(file, url_ctx)| link_specs(file, &url_ctx))
        .unwrap_or_default();

    html! {
        <ModalSheet
            node_ref={component.dialog_ref.clone()}
            title={MODAL_TITLE.to_string()}
            open={component.phase == Phase::DialogOpen}
            {on_close}>
            <>{ for links.iter().map(view_link) }</>
        </ModalSheet>
    }
}

fn view_link(link: &LinkSpec) -> Html {
    html! {
        <a class="btn btn-secondary mt-3"
           style="width: 100%"
           href={link.href.clone()}
           target="_blank">
            { link.label.clone() }
        </a>
    }
}
