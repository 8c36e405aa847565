//! Runs the redo form through a shell script standing in for a dialog.
//!
//! `cargo run --example redo_via_shell` (unix only).

use std::error::Error;
use std::time::Duration;

use formlink::forms::redo::{RedoRequest, RedoSelection};
use formlink::Host;
use tracing::info;

const SCRIPT: &str = r#"echo "dialog got form=$1 request=$2" >&2
printf '%s' '<form_response form_result="ok">' \
    '<payload item_type="selected" redo_boundary="1" redo_latex="1"/>' \
    '</form_response>' > "$3""#;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt().with_target(false).init();

    let host = Host::builder("/bin/sh")
        .leading_args(["-c", SCRIPT, "dialog"])
        .timeout(Duration::from_secs(10))
        .build();

    let response = host
        .request(&RedoRequest {
            n_all_items: 12,
            n_selected_items: 3,
        })
        .await?;
    let selection = RedoSelection::from_tree(&response.payload)?;
    info!(result = %response.result, scope = %selection.scope, "redo form answered");
    println!("result={} selection={selection:?}", response.result);
    Ok(())
}
