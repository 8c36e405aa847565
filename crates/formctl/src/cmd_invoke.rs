use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use formlink::forms::REQUEST_ROOT;
use formlink::{FormKind, Host, ParameterTree, WireValue};
use serde::Serialize;
use tracing::info;

use crate::common;

pub struct InvokeArgs {
    pub form: FormKind,
    pub request: PathBuf,
    pub dialog: PathBuf,
    pub work_dir: Option<PathBuf>,
    pub timeout_s: Option<u64>,
    pub keep_files: bool,
    pub frontend: Option<String>,
}

#[derive(Serialize)]
struct InvokeOutput<'a> {
    form: &'a str,
    result: &'a str,
    payload: &'a ParameterTree,
}

pub async fn run(args: InvokeArgs, json: bool) -> Result<()> {
    let document = common::read_document(&args.request)?;
    let request = param_xml::decode_expecting(&document, REQUEST_ROOT)
        .with_context(|| format!("decode request {}", args.request.display()))?;

    let mut builder = Host::builder(&args.dialog).keep_files(args.keep_files);
    if let Some(dir) = args.work_dir {
        builder = builder.work_dir(dir);
    }
    if let Some(secs) = args.timeout_s {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    if let Some(frontend) = args.frontend {
        builder = builder.env("FORMLINK_FRONTEND", frontend);
    }
    let host = builder.build();

    info!(form = %args.form, dialog = %args.dialog.display(), "invoking form");
    let response = host
        .invoke(args.form, &request)
        .await
        .with_context(|| format!("invoke {} form", args.form))?;

    if json {
        common::print_json(&InvokeOutput {
            form: args.form.as_str(),
            result: response.result.as_str(),
            payload: &response.payload,
        })?;
    } else {
        println!("result: {}", response.result);
        if !response.payload.is_empty() {
            let payload = param_xml::encode(&response.payload, formlink::forms::PAYLOAD_TAG)
                .context("encode payload")?;
            println!("{payload}");
        }
    }

    Ok(())
}
