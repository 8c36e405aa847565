//! Boundary to whatever renders the dialogs.
//!
//! A frontend sees the typed request of a form and answers with a decision;
//! controls, layout and event wiring stay on its side of the boundary.

use crate::forms::debug::{DebugDecision, DebugRequest};
use crate::forms::item::{ItemDecision, ItemRequest};
use crate::forms::options::{OptionsDecision, OptionsRequest};
use crate::forms::redo::{RedoDecision, RedoRequest, RedoSelection};
use crate::FormError;

pub trait Frontend {
    fn item(&mut self, request: &ItemRequest) -> Result<ItemDecision, FormError>;

    fn redo(&mut self, request: &RedoRequest) -> Result<RedoDecision, FormError>;

    fn debug(&mut self, request: &DebugRequest) -> Result<DebugDecision, FormError>;

    fn options(&mut self, request: &OptionsRequest) -> Result<OptionsDecision, FormError>;
}

/// Non-interactive frontend that confirms every form with its preset values.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptFrontend;

impl Frontend for AcceptFrontend {
    fn item(&mut self, request: &ItemRequest) -> Result<ItemDecision, FormError> {
        Ok(ItemDecision::Ok(request.values.clone()))
    }

    fn redo(&mut self, _request: &RedoRequest) -> Result<RedoDecision, FormError> {
        Ok(RedoDecision::Ok(RedoSelection::default()))
    }

    fn debug(&mut self, request: &DebugRequest) -> Result<DebugDecision, FormError> {
        if request.can_accept() {
            Ok(DebugDecision::Ok {
                create_debug_folder: false,
            })
        } else {
            Ok(DebugDecision::Cancel)
        }
    }

    fn options(&mut self, request: &OptionsRequest) -> Result<OptionsDecision, FormError> {
        Ok(OptionsDecision::Save(request.current.clone()))
    }
}
