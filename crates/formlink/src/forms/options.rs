//! Global compiler options and the document header.

use std::path::{Path, PathBuf};

use param_tree::ParameterTree;

use super::{FormKind, FormRequest, FormResponse, FormResult};
use crate::frontend::Frontend;
use crate::wire::{self, wire_enum};
use crate::FormError;

pub const VERSION: &str = "version";
pub const GIT_SHA: &str = "git_sha";
pub const DOCUMENT_HEADER_PATH: &str = "document_header_path";
pub const DEFAULT_OPTIONS: &str = "default_options";
pub const COMMAND_LATEX: &str = "command_latex";
pub const PATH_LATEX: &str = "path_latex";
pub const COMMAND_LATEX_OPTIONS: &str = "command_latex_options";
pub const COMMAND_GS: &str = "command_gs";
pub const WARNING_AI_NOT_SAVED: &str = "warning_ai_not_saved";
pub const WARNING_BOUNDARY_BOXES: &str = "warning_boundary_boxes";

const NO_DOCUMENTS: &str = "no_documents";
const NOT_SAVED: &str = "not_saved";

wire_enum! {
    pub enum LatexCommand ("LaTeX command") {
        Pdflatex => "pdflatex",
        Lualatex => "lualatex",
        Xelatex => "xelatex",
    }
}

/// Compiler settings, stored flat on the tree they belong to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LatexSettings {
    pub command_latex: LatexCommand,
    pub path_latex: String,
    pub command_latex_options: String,
    pub command_gs: String,
    pub warning_ai_not_saved: bool,
    pub warning_boundary_boxes: bool,
}

impl LatexSettings {
    pub fn read_from(tree: &ParameterTree) -> Result<Self, FormError> {
        Ok(Self {
            command_latex: wire::read(tree, COMMAND_LATEX)?,
            path_latex: tree.attribute(PATH_LATEX)?.to_string(),
            command_latex_options: tree.attribute(COMMAND_LATEX_OPTIONS)?.to_string(),
            command_gs: tree.attribute(COMMAND_GS)?.to_string(),
            warning_ai_not_saved: tree.flag(WARNING_AI_NOT_SAVED)?,
            warning_boundary_boxes: tree.flag(WARNING_BOUNDARY_BOXES)?,
        })
    }

    pub fn write_to(&self, tree: &mut ParameterTree) {
        wire::write(tree, COMMAND_LATEX, self.command_latex);
        tree.set_attribute(PATH_LATEX, self.path_latex.as_str())
            .set_attribute(COMMAND_LATEX_OPTIONS, self.command_latex_options.as_str())
            .set_attribute(COMMAND_GS, self.command_gs.as_str())
            .set_flag(WARNING_AI_NOT_SAVED, self.warning_ai_not_saved)
            .set_flag(WARNING_BOUNDARY_BOXES, self.warning_boundary_boxes);
    }

    pub fn to_tree(&self) -> ParameterTree {
        let mut tree = ParameterTree::new();
        self.write_to(&mut tree);
        tree
    }
}

/// Where the active document's LaTeX header lives, if anywhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderLocation {
    NoDocuments,
    NotSaved,
    Path(PathBuf),
}

impl HeaderLocation {
    pub fn from_wire(value: &str) -> Self {
        match value {
            NO_DOCUMENTS => HeaderLocation::NoDocuments,
            NOT_SAVED => HeaderLocation::NotSaved,
            path => HeaderLocation::Path(PathBuf::from(path)),
        }
    }

    pub fn to_wire(&self) -> String {
        match self {
            HeaderLocation::NoDocuments => NO_DOCUMENTS.to_string(),
            HeaderLocation::NotSaved => NOT_SAVED.to_string(),
            HeaderLocation::Path(path) => path.to_string_lossy().into_owned(),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            HeaderLocation::Path(path) => Some(path),
            _ => None,
        }
    }

    /// A saved document whose header file has not been written yet.
    pub fn can_create(&self) -> bool {
        self.path().is_some_and(|path| !path.is_file())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionsRequest {
    pub version: String,
    pub git_sha: String,
    pub header: HeaderLocation,
    pub current: LatexSettings,
    /// Factory settings the user can reset to.
    pub defaults: LatexSettings,
}

impl OptionsRequest {
    pub fn from_tree(tree: &ParameterTree) -> Result<Self, FormError> {
        Ok(Self {
            version: tree.attribute(VERSION)?.to_string(),
            git_sha: tree.attribute(GIT_SHA)?.to_string(),
            header: HeaderLocation::from_wire(tree.attribute(DOCUMENT_HEADER_PATH)?),
            current: LatexSettings::read_from(tree)?,
            defaults: LatexSettings::read_from(tree.child(DEFAULT_OPTIONS)?)?,
        })
    }
}

impl FormRequest for OptionsRequest {
    const KIND: FormKind = FormKind::Options;

    fn to_tree(&self) -> ParameterTree {
        let mut tree = self.current.to_tree();
        tree.set_attribute(VERSION, self.version.as_str())
            .set_attribute(GIT_SHA, self.git_sha.as_str())
            .set_attribute(DOCUMENT_HEADER_PATH, self.header.to_wire());
        tree.set_child(DEFAULT_OPTIONS, self.defaults.to_tree());
        tree
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionsDecision {
    Save(LatexSettings),
    Cancel,
    /// Ask the host to write a default header, then reopen the form with
    /// these settings.
    CreateDefaultHeader(LatexSettings),
}

pub(crate) fn run(
    tree: &ParameterTree,
    frontend: &mut dyn Frontend,
) -> Result<FormResponse, FormError> {
    let request = OptionsRequest::from_tree(tree)?;
    match frontend.options(&request)? {
        OptionsDecision::Save(settings) => {
            Ok(FormResponse::new(FormResult::Ok, settings.to_tree()))
        }
        OptionsDecision::Cancel => Ok(FormResponse::bare(FormResult::Cancel)),
        OptionsDecision::CreateDefaultHeader(settings) => {
            if !request.header.can_create() {
                return Err(FormError::decision(
                    "options",
                    format!("no header can be created for '{}'", request.header.to_wire()),
                ));
            }
            Ok(FormResponse::new(
                FormResult::CreateDefaultHeader,
                settings.to_tree(),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::AcceptFrontend;
    use crate::testing::Scripted;

    fn settings(command: LatexCommand) -> LatexSettings {
        LatexSettings {
            command_latex: command,
            path_latex: "/usr/bin".into(),
            command_latex_options: "-interaction nonstopmode -halt-on-error".into(),
            command_gs: "/usr/bin/gs".into(),
            warning_ai_not_saved: true,
            warning_boundary_boxes: false,
        }
    }

    fn request(header: HeaderLocation) -> OptionsRequest {
        OptionsRequest {
            version: "0.1.0".into(),
            git_sha: "abc123".into(),
            header,
            current: settings(LatexCommand::Lualatex),
            defaults: settings(LatexCommand::Pdflatex),
        }
    }

    #[test]
    fn request_keeps_defaults_in_a_child() {
        let tree = request(HeaderLocation::NotSaved).to_tree();
        assert_eq!(tree.attribute(COMMAND_LATEX).unwrap(), "lualatex");
        assert_eq!(tree.attribute(DOCUMENT_HEADER_PATH).unwrap(), "not_saved");
        assert_eq!(
            tree.child(DEFAULT_OPTIONS).unwrap().attribute(COMMAND_LATEX).unwrap(),
            "pdflatex"
        );
        assert_eq!(
            OptionsRequest::from_tree(&tree).unwrap(),
            request(HeaderLocation::NotSaved)
        );
    }

    #[test]
    fn missing_defaults_are_a_missing_child() {
        let mut tree = request(HeaderLocation::NoDocuments).to_tree();
        tree.remove_child(DEFAULT_OPTIONS);
        assert!(matches!(
            OptionsRequest::from_tree(&tree),
            Err(FormError::Tree(param_tree::TreeError::MissingChild { .. }))
        ));
    }

    #[test]
    fn save_writes_every_setting() {
        let tree = request(HeaderLocation::NoDocuments).to_tree();
        let response = run(&tree, &mut AcceptFrontend).unwrap();
        assert_eq!(response.result, FormResult::Ok);
        for key in [
            COMMAND_LATEX,
            PATH_LATEX,
            COMMAND_LATEX_OPTIONS,
            COMMAND_GS,
            WARNING_AI_NOT_SAVED,
            WARNING_BOUNDARY_BOXES,
        ] {
            assert!(response.payload.has_attribute(key), "missing {key}");
        }
        assert_eq!(
            LatexSettings::read_from(&response.payload).unwrap(),
            settings(LatexCommand::Lualatex)
        );
    }

    #[test]
    fn default_header_only_for_a_missing_file() {
        let missing = std::env::temp_dir().join("formlink-options-test-no-such-header.tex");
        let tree = request(HeaderLocation::Path(missing)).to_tree();
        let mut frontend = Scripted::options(OptionsDecision::CreateDefaultHeader(settings(
            LatexCommand::Xelatex,
        )));
        let response = run(&tree, &mut frontend).unwrap();
        assert_eq!(response.result, FormResult::CreateDefaultHeader);
        assert_eq!(response.payload.attribute(COMMAND_LATEX).unwrap(), "xelatex");

        let tree = request(HeaderLocation::NoDocuments).to_tree();
        let mut frontend = Scripted::options(OptionsDecision::CreateDefaultHeader(settings(
            LatexCommand::Xelatex,
        )));
        assert!(matches!(
            run(&tree, &mut frontend),
            Err(FormError::InvalidDecision { form: "options", .. })
        ));
    }

    #[test]
    fn header_location_wire_values() {
        assert_eq!(HeaderLocation::from_wire("no_documents"), HeaderLocation::NoDocuments);
        assert_eq!(HeaderLocation::from_wire("not_saved"), HeaderLocation::NotSaved);
        let path = HeaderLocation::from_wire("/doc/header.tex");
        assert_eq!(path.path(), Some(Path::new("/doc/header.tex")));
        assert_eq!(path.to_wire(), "/doc/header.tex");
    }
}
