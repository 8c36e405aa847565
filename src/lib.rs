//! Aggregator re-exporting the workspace crates.

pub use formlink;
pub use param_tree;
pub use param_xml;
