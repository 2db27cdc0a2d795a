use crate::cli::{load_methods, write_output};
use crate::error::{Error, Result};
use petgraph::graph::NodeIndex;
use std::path::Path;

/// Export the CFG of one method to DOT, handler entries highlighted
pub fn dot(input_path: &Path, method: &str, output_path: Option<&Path>) -> Result<()> {
    let methods = load_methods(input_path, Some(method))?;
    let method = methods.into_iter().next().ok_or_else(|| Error::UnknownMethod {
        name: method.to_string(),
    })?;

    let handler_blocks: Vec<NodeIndex> = method
        .try_blocks
        .iter()
        .flat_map(|tb| tb.handlers().iter().map(|h| h.handler_block))
        .collect();

    write_output(output_path, &method.cfg.to_dot(&handler_blocks))?;
    if let Some(path) = output_path {
        log::info!("DOT exported to: {}", path.display());
    }
    Ok(())
}
