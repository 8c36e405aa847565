//! Batch redo of items in the current document.

use param_tree::ParameterTree;

use super::{FormKind, FormRequest, FormResponse, FormResult};
use crate::frontend::Frontend;
use crate::wire::{self, wire_enum};
use crate::FormError;

pub const N_ALL_ITEMS: &str = "n_all_items";
pub const N_SELECTED_ITEMS: &str = "n_selected_items";
pub const REDO_LATEX: &str = "redo_latex";
pub const REDO_BOUNDARY: &str = "redo_boundary";
pub const ITEM_TYPE: &str = "item_type";

wire_enum! {
    /// Which items the redo applies to.
    pub enum ItemScope ("item type") {
        All => "all",
        Selected => "selected",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RedoRequest {
    pub n_all_items: usize,
    pub n_selected_items: usize,
}

impl RedoRequest {
    pub fn from_tree(tree: &ParameterTree) -> Result<Self, FormError> {
        Ok(Self {
            n_all_items: wire::read_count(tree, N_ALL_ITEMS)?,
            n_selected_items: wire::read_count(tree, N_SELECTED_ITEMS)?,
        })
    }
}

impl FormRequest for RedoRequest {
    const KIND: FormKind = FormKind::Redo;

    fn to_tree(&self) -> ParameterTree {
        let mut tree = ParameterTree::new();
        tree.set_attribute(N_ALL_ITEMS, self.n_all_items.to_string())
            .set_attribute(N_SELECTED_ITEMS, self.n_selected_items.to_string());
        tree
    }
}

/// `ok` payload. Redoing the LaTeX always redoes the boundary box as well.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RedoSelection {
    pub redo_latex: bool,
    pub redo_boundary: bool,
    pub scope: ItemScope,
}

impl Default for RedoSelection {
    fn default() -> Self {
        Self {
            redo_latex: false,
            redo_boundary: true,
            scope: ItemScope::All,
        }
    }
}

impl RedoSelection {
    pub fn from_tree(tree: &ParameterTree) -> Result<Self, FormError> {
        Ok(Self {
            redo_latex: tree.flag(REDO_LATEX)?,
            redo_boundary: tree.flag(REDO_BOUNDARY)?,
            scope: wire::read(tree, ITEM_TYPE)?,
        })
    }

    pub fn to_tree(&self) -> ParameterTree {
        let mut tree = ParameterTree::new();
        tree.set_flag(REDO_LATEX, self.redo_latex)
            .set_flag(REDO_BOUNDARY, self.redo_boundary || self.redo_latex);
        wire::write(&mut tree, ITEM_TYPE, self.scope);
        tree
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedoDecision {
    Ok(RedoSelection),
    Cancel,
}

pub(crate) fn run(
    tree: &ParameterTree,
    frontend: &mut dyn Frontend,
) -> Result<FormResponse, FormError> {
    let request = RedoRequest::from_tree(tree)?;
    match frontend.redo(&request)? {
        RedoDecision::Ok(selection) => {
            Ok(FormResponse::new(FormResult::Ok, selection.to_tree()))
        }
        RedoDecision::Cancel => Ok(FormResponse::bare(FormResult::Cancel)),
    }
}
