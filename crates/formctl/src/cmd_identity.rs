use anyhow::Result;
use formlink::{BuildIdentity, WireValue};
use serde::Serialize;

use crate::common;

#[derive(Serialize)]
struct IdentityOutput<'a> {
    content_hash: &'a str,
    build_kind: &'a str,
}

pub fn run(json: bool) -> Result<()> {
    let identity = BuildIdentity::current();
    if json {
        common::print_json(&IdentityOutput {
            content_hash: identity.content_hash(),
            build_kind: identity.kind().as_str(),
        })?;
    } else {
        println!("{} {}", identity.content_hash(), identity.kind());
    }
    Ok(())
}
