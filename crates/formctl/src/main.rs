use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use formlink::FormKind;

use formctl::cmd_check;
use formctl::cmd_identity;
use formctl::cmd_invoke::{self, InvokeArgs};
use formctl::common;

#[derive(Parser, Debug)]
#[command(name = "formctl", version, about = "Host-side form invocation CLI")]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    /// Output JSON where applicable
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Run a form through a dialog executable
    Invoke {
        /// Form tag (item, redo, debug, options, echo)
        #[arg(value_parser = common::parse_form_kind)]
        form: FormKind,
        /// Request document with a <form_request> root
        request: PathBuf,
        #[arg(long, env = "FORMLINK_DIALOG", default_value = "formlink-dialog")]
        dialog: PathBuf,
        /// Directory for the request/response files
        #[arg(long)]
        work_dir: Option<PathBuf>,
        /// Kill the dialog after this many seconds
        #[arg(long)]
        timeout_s: Option<u64>,
        #[arg(long)]
        keep_files: bool,
        /// Frontend the dialog should use (e.g. "accept")
        #[arg(long)]
        frontend: Option<String>,
    },
    /// Decode a parameter document and print it
    Check {
        path: PathBuf,
        /// Fail unless the root element has this tag
        #[arg(long)]
        root: Option<String>,
    },
    /// Print the build identity dialogs are checked against
    Identity,
}

#[tokio::main]
async fn main() -> Result<()> {
    let Cli { verbose, json, cmd } = Cli::parse();
    common::init_tracing(verbose, "info");

    match cmd {
        Cmd::Invoke {
            form,
            request,
            dialog,
            work_dir,
            timeout_s,
            keep_files,
            frontend,
        } => {
            let args = InvokeArgs {
                form,
                request,
                dialog,
                work_dir,
                timeout_s,
                keep_files,
                frontend,
            };
            cmd_invoke::run(args, json).await?
        }
        Cmd::Check { path, root } => cmd_check::run(&path, root.as_deref(), json)?,
        Cmd::Identity => cmd_identity::run(json)?,
    };

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_invoke_defaults() {
        let cli = Cli::parse_from(["formctl", "invoke", "item", "req.xml", "--dialog", "./dlg"]);
        match cli.cmd {
            Cmd::Invoke {
                form,
                request,
                dialog,
                timeout_s,
                keep_files,
                ..
            } => {
                assert_eq!(form, FormKind::Item);
                assert_eq!(request, PathBuf::from("req.xml"));
                assert_eq!(dialog, PathBuf::from("./dlg"));
                assert_eq!(timeout_s, None);
                assert!(!keep_files);
            }
            other => panic!("unexpected variant: {other:?}"),
        }
    }

    #[test]
    fn parse_rejects_unknown_forms() {
        assert!(Cli::try_parse_from(["formctl", "invoke", "l2a_item", "req.xml"]).is_err());
    }

    #[test]
    fn parse_global_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "formctl",
            "check",
            "doc.xml",
            "--root",
            "form_request",
            "--json",
            "-vv",
        ]);
        assert!(cli.json);
        assert_eq!(cli.verbose, 2);
        match cli.cmd {
            Cmd::Check { path, root } => {
                assert_eq!(path, PathBuf::from("doc.xml"));
                assert_eq!(root.as_deref(), Some("form_request"));
            }
            other => panic!("unexpected variant: {other:?}"),
        }
    }
}
