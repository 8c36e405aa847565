//! Create/edit dialog for a single LaTeX item.

use param_tree::ParameterTree;
use tracing::debug;

use super::{FormKind, FormRequest, FormResponse, FormResult};
use crate::frontend::Frontend;
use crate::wire::{self, wire_enum};
use crate::FormError;

pub const TEXT_ALIGN_HORIZONTAL: &str = "text_align_horizontal";
pub const TEXT_ALIGN_VERTICAL: &str = "text_align_vertical";
pub const PLACED_OPTION: &str = "placed_option";
pub const BOUNDARY_BOX_STATE: &str = "boundary_box_state";
pub const LATEX_EXISTS: &str = "latex_exists";
pub const LATEX: &str = "latex";
pub const CURSOR_POSITION: &str = "cursor_position";

wire_enum! {
    pub enum HorizontalAlign ("horizontal alignment") {
        Left => "left",
        Centre => "centreH",
        Right => "right",
    }
}

wire_enum! {
    pub enum VerticalAlign ("vertical alignment") {
        Top => "top",
        Centre => "centreV",
        Baseline => "baseline",
        Bottom => "bottom",
    }
}

wire_enum! {
    /// How the rendered item is scaled into its boundary box.
    pub enum PlacedOption ("placement option") {
        FillToBoundaryBox => "fill_to_boundary_box",
        KeepScale => "keep_scale",
        KeepScaleClip => "keep_scale_clip",
    }
}

wire_enum! {
    /// Host's assessment of the item's boundary box.
    pub enum BoundaryBoxState ("boundary box state") {
        /// New item, no boundary box yet.
        Absent => "none",
        Fits => "ok",
        Stretched => "streched",
        Diamond => "diamond",
    }
}

/// Anchor point of the item, always stored as an attribute pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub horizontal: HorizontalAlign,
    pub vertical: VerticalAlign,
}

impl Placement {
    pub fn new(horizontal: HorizontalAlign, vertical: VerticalAlign) -> Self {
        Self {
            horizontal,
            vertical,
        }
    }

    pub fn read_from(tree: &ParameterTree) -> Result<Self, FormError> {
        Ok(Self {
            horizontal: wire::read(tree, TEXT_ALIGN_HORIZONTAL)?,
            vertical: wire::read(tree, TEXT_ALIGN_VERTICAL)?,
        })
    }

    pub fn write_to(&self, tree: &mut ParameterTree) {
        wire::write(tree, TEXT_ALIGN_HORIZONTAL, self.horizontal);
        wire::write(tree, TEXT_ALIGN_VERTICAL, self.vertical);
    }
}

/// LaTeX source of the item together with the editor cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LatexCode {
    pub code: String,
    pub cursor_position: usize,
}

impl LatexCode {
    pub fn new(code: impl Into<String>, cursor_position: usize) -> Self {
        Self {
            code: code.into(),
            cursor_position,
        }
    }

    /// Read the `latex` child. A child without text holds empty code.
    pub fn read_from(tree: &ParameterTree) -> Result<Self, FormError> {
        let latex = tree.child(LATEX)?;
        Ok(Self {
            code: latex.text().unwrap_or_default().to_string(),
            cursor_position: wire::read_count(latex, CURSOR_POSITION)?,
        })
    }

    pub fn write_to(&self, tree: &mut ParameterTree) {
        tree.new_child(LATEX)
            .set_text(self.code.as_str())
            .set_attribute(CURSOR_POSITION, self.cursor_position.to_string());
    }
}

/// Values the user edits; also the `ok` payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemValues {
    pub placement: Placement,
    pub placed_option: PlacedOption,
    pub latex: LatexCode,
}

impl ItemValues {
    pub fn from_tree(tree: &ParameterTree) -> Result<Self, FormError> {
        Ok(Self {
            placement: Placement::read_from(tree)?,
            placed_option: wire::read(tree, PLACED_OPTION)?,
            latex: LatexCode::read_from(tree)?,
        })
    }

    pub fn write_to(&self, tree: &mut ParameterTree) {
        self.placement.write_to(tree);
        wire::write(tree, PLACED_OPTION, self.placed_option);
        self.latex.write_to(tree);
    }

    pub fn to_tree(&self) -> ParameterTree {
        let mut tree = ParameterTree::new();
        self.write_to(&mut tree);
        tree
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemRequest {
    pub values: ItemValues,
    pub boundary_box_state: BoundaryBoxState,
    pub latex_exists: bool,
}

impl ItemRequest {
    pub fn from_tree(tree: &ParameterTree) -> Result<Self, FormError> {
        Ok(Self {
            values: ItemValues::from_tree(tree)?,
            boundary_box_state: wire::read(tree, BOUNDARY_BOX_STATE)?,
            latex_exists: tree.flag(LATEX_EXISTS)?,
        })
    }

    /// Redoing the boundary box is offered for distorted boxes only.
    pub fn can_redo_boundary_box(&self) -> bool {
        matches!(
            self.boundary_box_state,
            BoundaryBoxState::Stretched | BoundaryBoxState::Diamond
        )
    }

    pub fn can_redo_latex(&self) -> bool {
        self.latex_exists
    }
}

impl FormRequest for ItemRequest {
    const KIND: FormKind = FormKind::Item;

    fn to_tree(&self) -> ParameterTree {
        let mut tree = self.values.to_tree();
        wire::write(&mut tree, BOUNDARY_BOX_STATE, self.boundary_box_state);
        tree.set_flag(LATEX_EXISTS, self.latex_exists);
        tree
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemDecision {
    Ok(ItemValues),
    Cancel,
    RedoBoundaryBox,
    RedoLatex,
}

pub(crate) fn run(
    tree: &ParameterTree,
    frontend: &mut dyn Frontend,
) -> Result<FormResponse, FormError> {
    let request = ItemRequest::from_tree(tree)?;
    debug!(
        state = %request.boundary_box_state,
        latex_exists = request.latex_exists,
        "item form request"
    );
    let response = match frontend.item(&request)? {
        ItemDecision::Ok(values) => FormResponse::new(FormResult::Ok, values.to_tree()),
        ItemDecision::Cancel => FormResponse::bare(FormResult::Cancel),
        ItemDecision::RedoBoundaryBox => {
            if !request.can_redo_boundary_box() {
                return Err(FormError::decision(
                    "item",
                    format!(
                        "boundary box is '{}' and cannot be redone",
                        request.boundary_box_state
                    ),
                ));
            }
            FormResponse::bare(FormResult::RedoBoundaryBox)
        }
        ItemDecision::RedoLatex => {
            if !request.can_redo_latex() {
                return Err(FormError::decision("item", "no LaTeX file to redo"));
            }
            FormResponse::bare(FormResult::RedoLatex)
        }
    };
    Ok(response)
}
