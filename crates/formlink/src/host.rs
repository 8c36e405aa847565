//! Host side of the invocation contract.
//!
//! A [`Host`] publishes a request file, launches the dialog executable with
//! the fixed argument layout, waits for it to exit and reads back the
//! response. Each invocation gets its own file pair inside the work
//! directory, so concurrent invocations from one host never collide.

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use param_tree::ParameterTree;
use tokio::fs;
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::args::DialogArgs;
use crate::dialog::partial_path;
use crate::forms::{FormKind, FormRequest, FormResponse, REQUEST_ROOT, RESPONSE_ROOT};
use crate::identity::BuildIdentity;
use crate::wire::WireValue;
use crate::FormError;

static NEXT_INVOCATION: AtomicU64 = AtomicU64::new(0);

/// Builder for configuring a [`Host`].
#[derive(Debug, Clone)]
pub struct HostBuilder {
    program: PathBuf,
    leading_args: Vec<OsString>,
    work_dir: Option<PathBuf>,
    identity: BuildIdentity,
    timeout: Option<Duration>,
    envs: Vec<(OsString, OsString)>,
    keep_files: bool,
}

impl HostBuilder {
    /// Start from the dialog executable to launch.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            leading_args: Vec::new(),
            work_dir: None,
            identity: BuildIdentity::current(),
            timeout: None,
            envs: Vec::new(),
            keep_files: false,
        }
    }

    /// Arguments placed before the dialog arguments, for launchers and
    /// interpreters.
    pub fn leading_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.leading_args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Directory holding the request/response files (defaults to
    /// `$TMPDIR/formlink`).
    pub fn work_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.work_dir = Some(dir.into());
        self
    }

    /// Identity the dialog must match (defaults to this binary's own).
    pub fn identity(mut self, identity: BuildIdentity) -> Self {
        self.identity = identity;
        self
    }

    /// Kill the dialog if it has not exited after `timeout`. Unbounded by default.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Extra environment variable for the dialog process.
    pub fn env(mut self, key: impl Into<OsString>, value: impl Into<OsString>) -> Self {
        self.envs.push((key.into(), value.into()));
        self
    }

    /// Leave the file pair in place after the invocation.
    pub fn keep_files(mut self, keep: bool) -> Self {
        self.keep_files = keep;
        self
    }

    pub fn build(self) -> Host {
        let work_dir = self
            .work_dir
            .unwrap_or_else(|| std::env::temp_dir().join("formlink"));
        Host {
            program: self.program,
            leading_args: self.leading_args,
            work_dir,
            identity: self.identity,
            timeout: self.timeout,
            envs: self.envs,
            keep_files: self.keep_files,
        }
    }
}

/// Launches dialogs and collects their responses.
#[derive(Debug, Clone)]
pub struct Host {
    program: PathBuf,
    leading_args: Vec<OsString>,
    work_dir: PathBuf,
    identity: BuildIdentity,
    timeout: Option<Duration>,
    envs: Vec<(OsString, OsString)>,
    keep_files: bool,
}

impl Host {
    pub fn builder(program: impl Into<PathBuf>) -> HostBuilder {
        HostBuilder::new(program)
    }

    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    pub fn identity(&self) -> &BuildIdentity {
        &self.identity
    }

    /// Run the form addressed by a typed request.
    pub async fn request<R: FormRequest>(&self, request: &R) -> Result<FormResponse, FormError> {
        self.invoke(R::KIND, &request.to_tree()).await
    }

    /// Run form `kind` with `request` and return the decoded response.
    pub async fn invoke(
        &self,
        kind: FormKind,
        request: &ParameterTree,
    ) -> Result<FormResponse, FormError> {
        let (request_path, response_path) = self.file_pair(kind);
        let partial = partial_path(&response_path);
        fs::create_dir_all(&self.work_dir)
            .await
            .map_err(|err| FormError::io("create work directory", &self.work_dir, err))?;
        remove_stale(&request_path).await?;
        remove_stale(&response_path).await?;
        remove_stale(&partial).await?;

        let document = param_xml::encode(request, REQUEST_ROOT)?;
        fs::write(&request_path, document)
            .await
            .map_err(|err| FormError::io("write request", &request_path, err))?;

        let result = self.launch(kind, &request_path, &response_path).await;
        if !self.keep_files {
            cleanup(&request_path).await;
            cleanup(&response_path).await;
        }
        // A dialog that died mid-write leaves only the partial file.
        cleanup(&partial).await;
        result
    }

    fn file_pair(&self, kind: FormKind) -> (PathBuf, PathBuf) {
        let seq = NEXT_INVOCATION.fetch_add(1, Ordering::Relaxed);
        let stem = format!("{}-{}-{seq}", kind.as_str(), std::process::id());
        (
            self.work_dir.join(format!("{stem}-request.xml")),
            self.work_dir.join(format!("{stem}-response.xml")),
        )
    }

    async fn launch(
        &self,
        kind: FormKind,
        request_path: &Path,
        response_path: &Path,
    ) -> Result<FormResponse, FormError> {
        let args = DialogArgs::new(kind, request_path, response_path, &self.identity);
        let mut command = Command::new(&self.program);
        command
            .args(&self.leading_args)
            .args(args.to_args())
            .envs(self.envs.iter().map(|(key, value)| (key, value)))
            .stdin(Stdio::inherit())
            .kill_on_drop(true);

        info!(form = %kind, program = %self.program.display(), "launching dialog");
        let mut child = command
            .spawn()
            .map_err(|err| FormError::io("launch dialog", &self.program, err))?;

        let waited = match self.timeout {
            Some(limit) => {
                let bounded = tokio::time::timeout(limit, child.wait()).await;
                match bounded {
                    Ok(waited) => waited,
                    Err(_) => {
                        warn!(form = %kind, ?limit, "dialog timed out, killing it");
                        if let Err(err) = child.kill().await {
                            warn!(error = %err, "failed to kill dialog");
                        }
                        return Err(FormError::Timeout(limit));
                    }
                }
            }
            None => child.wait().await,
        };
        let status = waited.map_err(|err| FormError::io("wait for dialog", &self.program, err))?;

        if !status.success() {
            warn!(form = %kind, %status, "dialog exited unsuccessfully");
        }

        let document = match fs::read_to_string(response_path).await {
            Ok(document) => document,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(FormError::ResponseMissing(response_path.to_path_buf()));
            }
            Err(err) => return Err(FormError::io("read response", response_path, err)),
        };
        let tree = param_xml::decode_expecting(&document, RESPONSE_ROOT)?;
        let response = FormResponse::from_tree(tree)?;
        info!(form = %kind, result = %response.result, "dialog answered");
        Ok(response)
    }
}

async fn remove_stale(path: &Path) -> Result<(), FormError> {
    match fs::remove_file(path).await {
        Ok(()) => {
            debug!(path = %path.display(), "removed stale file");
            Ok(())
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(FormError::io("remove stale file", path, err)),
    }
}

async fn cleanup(path: &Path) {
    match fs::remove_file(path).await {
        Ok(()) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => warn!(path = %path.display(), error = %err, "failed to remove file"),
    }
}
