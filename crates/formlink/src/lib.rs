#![cfg_attr(docsrs, feature(doc_cfg))]
//! Parameter exchange between a long-lived host and a short-lived dialog
//! process.
//!
//! The host writes a request tree to a file, launches the dialog with a fixed
//! argument layout and reads the dialog's response file after it exits. Both
//! binaries must carry the same [`BuildIdentity`]; the dialog refuses to run
//! otherwise.
//!
//! ```rust,no_run
//! use formlink::forms::redo::RedoRequest;
//! use formlink::{FormError, Host};
//! use std::time::Duration;
//!
//! # async fn run() -> Result<(), FormError> {
//! let host = Host::builder("formlink-dialog")
//!     .timeout(Duration::from_secs(600))
//!     .build();
//! let response = host
//!     .request(&RedoRequest {
//!         n_all_items: 12,
//!         n_selected_items: 3,
//!     })
//!     .await?;
//! println!("result={} payload={:?}", response.result, response.payload);
//! # Ok(())
//! # }
//! ```
//!
//! ```rust,no_run
//! use formlink::{run_dialog, AcceptFrontend, BuildIdentity, DialogArgs};
//!
//! # fn main() -> Result<(), formlink::FormError> {
//! let args = DialogArgs::parse(std::env::args_os().skip(1))?;
//! let result = run_dialog(&args, &BuildIdentity::current(), &mut AcceptFrontend)?;
//! eprintln!("answered {result}");
//! # Ok(())
//! # }
//! ```

pub use param_tree::{ParameterTree, TreeError};
pub use param_xml as xml;

pub mod args;
pub mod dialog;
pub mod error;
pub mod forms;
pub mod frontend;
pub mod host;
pub mod identity;
pub mod wire;

#[cfg(test)]
mod testing;

pub use args::{DialogArgs, ARGUMENT_COUNT};
pub use dialog::run_dialog;
pub use error::FormError;
pub use forms::{dispatch, FormKind, FormRequest, FormResponse, FormResult};
pub use frontend::{AcceptFrontend, Frontend};
pub use host::{Host, HostBuilder};
pub use identity::{BuildIdentity, BuildKind};
pub use wire::WireValue;
