//! Form dispatch and the response envelope.
//!
//! Each form module owns the attribute names of its request and response,
//! so host and dialog read and write them through the same types.

pub mod debug;
pub mod echo;
pub mod item;
pub mod options;
pub mod redo;

use param_tree::ParameterTree;
use tracing::debug;

use crate::frontend::Frontend;
use crate::wire::{wire_enum, WireValue};
use crate::FormError;

/// Root tag of a request document.
pub const REQUEST_ROOT: &str = "form_request";
/// Root tag of a response document.
pub const RESPONSE_ROOT: &str = "form_response";
/// Reserved attribute on the response root holding the [`FormResult`].
pub const RESULT_ATTRIBUTE: &str = "form_result";
/// Child of the response root carrying the outcome payload.
pub const PAYLOAD_TAG: &str = "payload";

wire_enum! {
    /// Closed set of dialogs a host can launch.
    pub enum FormKind ("form type") {
        Item => "item",
        Redo => "redo",
        Debug => "debug",
        Options => "options",
        /// Communication self-test: answers with the request itself.
        Echo => "echo",
    }
}

impl FormKind {
    /// Resolve a dispatch tag. There is no fallback handler.
    pub fn from_tag(tag: &str) -> Result<Self, FormError> {
        Self::from_wire(tag).ok_or_else(|| FormError::UnknownFormType(tag.to_string()))
    }
}

wire_enum! {
    /// Response discriminator.
    pub enum FormResult ("form result") {
        Ok => "ok",
        Cancel => "cancel",
        RedoBoundaryBox => "redo_boundary_box",
        RedoLatex => "redo_latex",
        CreateDefaultHeader => "create_default_header",
    }
}

/// Typed request that knows which form it is addressed to.
pub trait FormRequest {
    const KIND: FormKind;

    fn to_tree(&self) -> ParameterTree;
}

/// Outcome of one dialog run as written to the response file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormResponse {
    pub result: FormResult,
    pub payload: ParameterTree,
}

impl FormResponse {
    pub fn new(result: FormResult, payload: ParameterTree) -> Self {
        Self { result, payload }
    }

    /// Outcome without payload values.
    pub fn bare(result: FormResult) -> Self {
        Self::new(result, ParameterTree::new())
    }

    pub fn is_cancelled(&self) -> bool {
        self.result == FormResult::Cancel
    }

    pub fn to_tree(&self) -> ParameterTree {
        let mut tree = ParameterTree::new();
        tree.set_attribute(RESULT_ATTRIBUTE, self.result.as_str());
        tree.set_child(PAYLOAD_TAG, self.payload.clone());
        tree
    }

    /// Parse a decoded response root. An unknown discriminator is fatal.
    pub fn from_tree(mut tree: ParameterTree) -> Result<Self, FormError> {
        let value = tree.attribute(RESULT_ATTRIBUTE)?;
        let result = FormResult::from_wire(value)
            .ok_or_else(|| FormError::UnknownResult(value.to_string()))?;
        let payload = tree.take_child(PAYLOAD_TAG)?;
        Ok(Self { result, payload })
    }
}

/// Run the handler registered for `kind`.
pub fn dispatch(
    kind: FormKind,
    request: &ParameterTree,
    frontend: &mut dyn Frontend,
) -> Result<FormResponse, FormError> {
    debug!(form = %kind, "dispatching form");
    match kind {
        FormKind::Item => item::run(request, frontend),
        FormKind::Redo => redo::run(request, frontend),
        FormKind::Debug => debug::run(request, frontend),
        FormKind::Options => options::run(request, frontend),
        FormKind::Echo => echo::run(request),
    }
}

/// Resolve `tag` and dispatch.
pub fn dispatch_tag(
    tag: &str,
    request: &ParameterTree,
    frontend: &mut dyn Frontend,
) -> Result<FormResponse, FormError> {
    dispatch(FormKind::from_tag(tag)?, request, frontend)
}
