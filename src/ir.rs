use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

/// Index of a node inside a [`Tree`] arena.
pub type NodeId = usize;

/// Sibling indices from the root down to a node. The root is `[0]`; its
/// third child is `[0, 2]`. Ordering is lexicographic, which matches the
/// pre-order of the outline.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct NodePath(Vec<usize>);

impl NodePath {
    pub fn root() -> Self {
        Self(vec![0])
    }

    pub fn from_segments(segments: Vec<usize>) -> Self {
        Self(segments)
    }

    pub fn segments(&self) -> &[usize] {
        &self.0
    }

    /// Number of segments; the root has depth 1.
    pub fn depth(&self) -> usize {
        self.0.len()
    }

    pub fn parent(&self) -> Option<NodePath> {
        if self.0.len() <= 1 {
            return None;
        }
        Some(Self(self.0[..self.0.len() - 1].to_vec()))
    }

    pub fn child(&self, index: usize) -> NodePath {
        let mut segments = self.0.clone();
        segments.push(index);
        Self(segments)
    }

    pub fn sibling_index(&self) -> usize {
        self.0.last().copied().unwrap_or(0)
    }

    /// Path of the sibling right before this one, `None` for a first child.
    pub fn previous_sibling(&self) -> Option<NodePath> {
        let last = *self.0.last()?;
        if last == 0 {
            return None;
        }
        let mut segments = self.0.clone();
        let len = segments.len();
        segments[len - 1] = last - 1;
        Some(Self(segments))
    }

    /// Index of the depth-2 branch this path belongs to.
    pub fn branch_index(&self) -> Option<usize> {
        self.0.get(1).copied()
    }

    /// Copy of the path with the branch segment shifted down by `offset`.
    pub fn renumber_branch(&self, offset: usize) -> NodePath {
        let mut segments = self.0.clone();
        if let Some(branch) = segments.get_mut(1) {
            *branch = branch.saturating_sub(offset);
        }
        Self(segments)
    }

    pub fn is_descendant_of(&self, other: &NodePath) -> bool {
        self.0.len() > other.0.len() && self.0.starts_with(&other.0)
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, segment) in self.0.iter().enumerate() {
            if idx > 0 {
                f.write_str("-")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

impl FromStr for NodePath {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let segments = s
            .split(['-', '.'])
            .map(|part| part.trim().parse::<usize>())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self(segments))
    }
}

impl Serialize for NodePath {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Half of the canvas a depth-2 subtree is drawn on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

/// Bounding box a subtree claims on one side of its node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Region {
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NodeStyle {
    pub font_size: f32,
    pub text_color: String,
    pub background_color: String,
    pub border_color: String,
    pub border_width: f32,
}

#[derive(Debug, Clone)]
pub struct Node {
    pub id: NodeId,
    pub text: String,
    /// Path as written in the outline. Never rewritten.
    pub path: NodePath,
    /// Path used by the position solver; left branches are renumbered from 0.
    pub layout_path: NodePath,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub side: Option<Side>,
    /// Left edge.
    pub x: f32,
    /// Vertical center.
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub bottom: f32,
    pub label_width: f32,
    pub left_region: Region,
    pub right_region: Region,
    pub style: NodeStyle,
}

impl Node {
    pub fn new(id: NodeId, text: String, path: NodePath, parent: Option<NodeId>) -> Self {
        Self {
            id,
            text,
            layout_path: path.clone(),
            path,
            parent,
            children: Vec::new(),
            side: None,
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
            bottom: 0.0,
            label_width: 0.0,
            left_region: Region::default(),
            right_region: Region::default(),
            style: NodeStyle::default(),
        }
    }

    pub fn depth(&self) -> usize {
        self.path.depth()
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub fn region(&self, side: Side) -> Region {
        match side {
            Side::Left => self.left_region,
            Side::Right => self.right_region,
        }
    }

    pub fn region_mut(&mut self, side: Side) -> &mut Region {
        match side {
            Side::Left => &mut self.left_region,
            Side::Right => &mut self.right_region,
        }
    }

    /// Height the node and its subtree occupy on `side`.
    pub fn effective_height(&self, side: Side) -> f32 {
        self.height.max(self.region(side).height)
    }

    pub fn top(&self) -> f32 {
        self.y - self.height / 2.0
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }
}

/// Arena of outline nodes in input order (pre-order: parents precede children).
#[derive(Debug, Clone, Default)]
pub struct Tree {
    pub nodes: Vec<Node>,
    index: HashMap<NodePath, NodeId>,
}

impl Tree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, text: String, path: NodePath, parent: Option<NodeId>) -> NodeId {
        let id = self.nodes.len();
        self.index.insert(path.clone(), id);
        if let Some(parent) = parent
            && let Some(parent_node) = self.nodes.get_mut(parent)
        {
            parent_node.children.push(id);
        }
        self.nodes.push(Node::new(id, text, path, parent));
        id
    }

    pub fn lookup(&self, path: &NodePath) -> Option<NodeId> {
        self.index.get(path).copied()
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn root(&self) -> Option<&Node> {
        self.nodes.first()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Writes the tree back as an outline, one space of indent per level.
    pub fn to_outline(&self) -> String {
        let mut out = String::new();
        for node in &self.nodes {
            out.push_str(&" ".repeat(node.depth().saturating_sub(1)));
            out.push_str(&node.text);
            out.push('\n');
        }
        out
    }
}
