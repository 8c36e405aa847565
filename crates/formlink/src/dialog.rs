//! Dialog side of one invocation.

use std::fs;
use std::path::{Path, PathBuf};

use param_tree::ParameterTree;
use tracing::{debug, info};

use crate::args::DialogArgs;
use crate::forms::{self, FormKind, FormResponse, FormResult, REQUEST_ROOT, RESPONSE_ROOT};
use crate::frontend::Frontend;
use crate::identity::BuildIdentity;
use crate::FormError;

/// Run one dialog invocation: handshake, read the request, dispatch, write
/// the response.
///
/// The handshake is checked before any file is touched. Once a handler has
/// produced an outcome, cancel included, a response file is always written.
pub fn run_dialog(
    args: &DialogArgs,
    identity: &BuildIdentity,
    frontend: &mut dyn Frontend,
) -> Result<FormResult, FormError> {
    identity.verify(&args.expected_hash, &args.expected_kind)?;
    let kind = FormKind::from_tag(&args.form)?;
    let request = read_request(&args.request)?;
    let response = forms::dispatch(kind, &request, frontend)?;
    write_response(&args.response, &response)?;
    info!(form = %kind, result = %response.result, "dialog finished");
    Ok(response.result)
}

/// Read and decode a request file.
pub fn read_request(path: &Path) -> Result<ParameterTree, FormError> {
    if !path.is_file() {
        return Err(FormError::RequestMissing(path.to_path_buf()));
    }
    let document =
        fs::read_to_string(path).map_err(|err| FormError::io("read request", path, err))?;
    debug!(path = %path.display(), bytes = document.len(), "read request");
    Ok(param_xml::decode_expecting(&document, REQUEST_ROOT)?)
}

/// Encode `response` and write it to `path`.
///
/// The document is written next to the target and renamed into place, so
/// the host never reads a half-written response.
pub fn write_response(path: &Path, response: &FormResponse) -> Result<(), FormError> {
    let document = param_xml::encode(&response.to_tree(), RESPONSE_ROOT)?;
    let partial = partial_path(path);
    let written = fs::write(&partial, document)
        .map_err(|err| FormError::io("write response", path, err))
        .and_then(|()| {
            fs::rename(&partial, path)
                .map_err(|err| FormError::io("move response into place", path, err))
        });
    if let Err(err) = written {
        let _ = fs::remove_file(&partial);
        return Err(err);
    }
    debug!(path = %path.display(), result = %response.result, "wrote response");
    Ok(())
}

/// Scratch file a response is written to before it is renamed to `response`.
pub(crate) fn partial_path(response: &Path) -> PathBuf {
    let mut partial = response.as_os_str().to_owned();
    partial.push(".partial");
    PathBuf::from(partial)
}
