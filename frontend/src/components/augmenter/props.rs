//! Properties of the `AugmenterComponent`.

use std::rc::Rc;

use common::model::params::ParameterModel;
use common::model::user::UserParameterModel;
use yew::prelude::*;

/// Both payloads are read once at bootstrap and never change afterwards.
#[derive(Properties, PartialEq, Clone)]
pub struct AugmenterProps {
    /// Page-global parameters (`amanote_params`).
    pub params: Rc<ParameterModel>,
    /// Current user, guaranteed to carry a token.
    pub user: Rc<UserParameterModel>,
}
