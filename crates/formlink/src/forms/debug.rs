//! Shown when LaTeX compilation failed.

use std::path::PathBuf;

use param_tree::ParameterTree;

use super::{FormKind, FormRequest, FormResponse, FormResult};
use crate::frontend::Frontend;
use crate::wire::{self, wire_enum};
use crate::FormError;

pub const CREATION_TYPE: &str = "creation_type";
pub const LOG_FILE: &str = "log_file";
pub const CREATE_DEBUG_FOLDER: &str = "create_debug_folder";

wire_enum! {
    /// What the host was doing when compilation failed.
    pub enum CreationType ("creation type") {
        Create => "create",
        Edit => "edit",
        RedoAll => "redo_all",
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebugRequest {
    pub creation_type: CreationType,
    pub log_file: PathBuf,
}

impl DebugRequest {
    pub fn from_tree(tree: &ParameterTree) -> Result<Self, FormError> {
        Ok(Self {
            creation_type: wire::read(tree, CREATION_TYPE)?,
            log_file: PathBuf::from(tree.attribute(LOG_FILE)?),
        })
    }

    /// A failed batch redo can only be acknowledged.
    pub fn can_accept(&self) -> bool {
        self.creation_type != CreationType::RedoAll
    }
}

impl FormRequest for DebugRequest {
    const KIND: FormKind = FormKind::Debug;

    fn to_tree(&self) -> ParameterTree {
        let mut tree = ParameterTree::new();
        wire::write(&mut tree, CREATION_TYPE, self.creation_type);
        tree.set_attribute(LOG_FILE, self.log_file.to_string_lossy());
        tree
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebugDecision {
    /// Keep the item as is, optionally collecting the build in a debug folder.
    Ok { create_debug_folder: bool },
    /// Abort the creation/edit, or continue after a failed batch redo.
    Cancel,
}

pub(crate) fn run(
    tree: &ParameterTree,
    frontend: &mut dyn Frontend,
) -> Result<FormResponse, FormError> {
    let request = DebugRequest::from_tree(tree)?;
    match frontend.debug(&request)? {
        DebugDecision::Ok { create_debug_folder } => {
            if !request.can_accept() {
                return Err(FormError::decision(
                    "debug",
                    "a failed redo of all items can only be continued",
                ));
            }
            let mut payload = ParameterTree::new();
            payload.set_flag(CREATE_DEBUG_FOLDER, create_debug_folder);
            Ok(FormResponse::new(FormResult::Ok, payload))
        }
        DebugDecision::Cancel => Ok(FormResponse::bare(FormResult::Cancel)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::AcceptFrontend;
    use crate::testing::Scripted;

    fn request(creation_type: CreationType) -> ParameterTree {
        DebugRequest {
            creation_type,
            log_file: PathBuf::from("/tmp/build/item.log"),
        }
        .to_tree()
    }

    #[test]
    fn request_round_trips_through_the_tree() {
        let tree = request(CreationType::Edit);
        let parsed = DebugRequest::from_tree(&tree).unwrap();
        assert_eq!(parsed.creation_type, CreationType::Edit);
        assert_eq!(parsed.log_file, PathBuf::from("/tmp/build/item.log"));
    }

    #[test]
    fn debug_folder_flag_is_always_written_on_ok() {
        let response = run(&request(CreationType::Create), &mut AcceptFrontend).unwrap();
        assert_eq!(response.result, FormResult::Ok);
        assert_eq!(response.payload.attribute(CREATE_DEBUG_FOLDER).unwrap(), "0");

        let mut frontend = Scripted::debug(DebugDecision::Ok {
            create_debug_folder: true,
        });
        let response = run(&request(CreationType::Edit), &mut frontend).unwrap();
        assert!(response.payload.flag(CREATE_DEBUG_FOLDER).unwrap());
    }

    #[test]
    fn redo_all_only_continues() {
        let response = run(&request(CreationType::RedoAll), &mut AcceptFrontend).unwrap();
        assert!(response.is_cancelled());

        let mut frontend = Scripted::debug(DebugDecision::Ok {
            create_debug_folder: false,
        });
        assert!(matches!(
            run(&request(CreationType::RedoAll), &mut frontend),
            Err(FormError::InvalidDecision { form: "debug", .. })
        ));
    }

    #[test]
    fn unknown_creation_type_is_rejected() {
        let mut tree = request(CreationType::Create);
        tree.set_attribute(CREATION_TYPE, "compile");
        assert!(matches!(
            run(&tree, &mut AcceptFrontend),
            Err(FormError::InvalidValue { .. })
        ));
    }
}
