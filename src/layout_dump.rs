use crate::ir::{NodePath, NodeStyle, Region, Side};
use crate::layout::Layout;
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct LayoutDump {
    pub width: f32,
    pub height: f32,
    pub right_branches: usize,
    pub left_branches: usize,
    pub nodes: Vec<NodeDump>,
}

#[derive(Debug, Serialize)]
pub struct NodeDump {
    pub path: NodePath,
    pub layout_path: NodePath,
    pub text: String,
    pub parent: Option<NodePath>,
    pub side: Option<Side>,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub bottom: f32,
    pub left_region: Region,
    pub right_region: Region,
    pub style: NodeStyle,
}

impl LayoutDump {
    pub fn from_layout(layout: &Layout) -> Self {
        let nodes = layout
            .tree
            .nodes
            .iter()
            .map(|node| NodeDump {
                path: node.path.clone(),
                layout_path: node.layout_path.clone(),
                text: node.text.clone(),
                parent: node.path.parent(),
                side: node.side,
                x: node.x,
                y: node.y,
                width: node.width,
                height: node.height,
                bottom: node.bottom,
                left_region: node.left_region,
                right_region: node.right_region,
                style: node.style.clone(),
            })
            .collect();

        LayoutDump {
            width: layout.width,
            height: layout.height,
            right_branches: layout.split.right,
            left_branches: layout.split.left,
            nodes,
        }
    }
}

pub fn write_layout_dump(path: &Path, layout: &Layout) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let dump = LayoutDump::from_layout(layout);
    serde_json::to_writer_pretty(writer, &dump)?;
    Ok(())
}
