use std::path::Path;

use anyhow::{Context, Result};
use formlink::ParameterTree;
use serde::Serialize;
use tracing::info;

use crate::common;

#[derive(Serialize)]
struct CheckedDocument<'a> {
    root: &'a str,
    tree: &'a ParameterTree,
}

/// Decode a document and print it back.
pub fn run(path: &Path, root: Option<&str>, json: bool) -> Result<()> {
    let document = common::read_document(path)?;
    let (tag, tree) =
        param_xml::decode(&document).with_context(|| format!("decode {}", path.display()))?;
    if let Some(expected) = root {
        anyhow::ensure!(
            tag == expected,
            "root element is <{tag}>, expected <{expected}>"
        );
    }
    info!(root = %tag, "document is well formed");

    if json {
        common::print_json(&CheckedDocument {
            root: &tag,
            tree: &tree,
        })?;
    } else {
        let mut out = String::new();
        outline(&tag, &tree, 0, &mut out);
        print!("{out}");
    }
    Ok(())
}

/// Indented listing: one line per node, then its attributes and text.
pub fn outline(tag: &str, tree: &ParameterTree, depth: usize, out: &mut String) {
    let indent = "  ".repeat(depth);
    out.push_str(&format!("{indent}<{tag}>\n"));
    for (key, value) in tree.attributes() {
        out.push_str(&format!("{indent}  @{key} = {value:?}\n"));
    }
    if let Some(text) = tree.text() {
        out.push_str(&format!("{indent}  #text = {text:?}\n"));
    }
    for (child_tag, child) in tree.children() {
        outline(child_tag, child, depth + 1, out);
    }
}
