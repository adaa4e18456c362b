use serde::Serialize;
use std::io::Write;
use thiserror::Error;

use crate::graph::{GraphStore, Node};

#[derive(Debug, Error)]
pub enum ExportError {
    /// Exporting an empty graph is reported rather than silently producing
    /// an empty file.
    #[error("no devices to export")]
    EmptyGraph,
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// One device inventory row, derived read-only from the canonical graph.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InventoryRow {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Type")]
    pub kind: String,
    #[serde(rename = "Model")]
    pub model: String,
    #[serde(rename = "IP")]
    pub ip: String,
    #[serde(rename = "Area")]
    pub area: String,
    #[serde(rename = "Mode")]
    pub mode: String,
}

pub fn inventory_rows(store: &GraphStore) -> Vec<InventoryRow> {
    store.nodes().values().map(row).collect()
}

fn row(node: &Node) -> InventoryRow {
    InventoryRow {
        name: node.label.clone(),
        kind: node.kind.label().to_string(),
        model: node.model.clone(),
        ip: node.ip.clone(),
        area: node.area.clone(),
        // The connection-mode column only means something for routers.
        mode: match node.profile.router_mode() {
            Some(mode) => mode.wire_name().to_string(),
            None => "-".to_string(),
        },
    }
}

pub fn write_csv<W: Write>(store: &GraphStore, writer: W) -> Result<(), ExportError> {
    if store.is_empty() {
        return Err(ExportError::EmptyGraph);
    }
    let mut out = csv::Writer::from_writer(writer);
    for row in inventory_rows(store) {
        out.serialize(row)?;
    }
    out.flush()?;
    Ok(())
}
