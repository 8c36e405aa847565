//! Frontend replaying a fixed decision, for handler tests.

use crate::forms::debug::{DebugDecision, DebugRequest};
use crate::forms::item::{ItemDecision, ItemRequest};
use crate::forms::options::{OptionsDecision, OptionsRequest};
use crate::forms::redo::{RedoDecision, RedoRequest};
use crate::frontend::Frontend;
use crate::FormError;

#[derive(Debug, Default)]
pub(crate) struct Scripted {
    item: Option<ItemDecision>,
    redo: Option<RedoDecision>,
    debug: Option<DebugDecision>,
    options: Option<OptionsDecision>,
}

impl Scripted {
    pub(crate) fn item(decision: ItemDecision) -> Self {
        Self {
            item: Some(decision),
            ..Self::default()
        }
    }

    pub(crate) fn redo(decision: RedoDecision) -> Self {
        Self {
            redo: Some(decision),
            ..Self::default()
        }
    }

    pub(crate) fn debug(decision: DebugDecision) -> Self {
        Self {
            debug: Some(decision),
            ..Self::default()
        }
    }

    pub(crate) fn options(decision: OptionsDecision) -> Self {
        Self {
            options: Some(decision),
            ..Self::default()
        }
    }
}

fn take<T>(slot: &mut Option<T>, form: &str) -> Result<T, FormError> {
    slot.take()
        .ok_or_else(|| FormError::Frontend(format!("no scripted {form} decision")))
}

impl Frontend for Scripted {
    fn item(&mut self, _request: &ItemRequest) -> Result<ItemDecision, FormError> {
        take(&mut self.item, "item")
    }

    fn redo(&mut self, _request: &RedoRequest) -> Result<RedoDecision, FormError> {
        take(&mut self.redo, "redo")
    }

    fn debug(&mut self, _request: &DebugRequest) -> Result<DebugDecision, FormError> {
        take(&mut self.debug, "debug")
    }

    fn options(&mut self, _request: &OptionsRequest) -> Result<OptionsDecision, FormError> {
        take(&mut self.options, "options")
    }
}
