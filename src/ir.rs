use serde::{Deserialize, Serialize};
use std::fmt;

/// Bend angle in degrees implied by a bare `bend left` / `bend right`.
pub const DEFAULT_BEND: u32 = 30;

/// Opaque node identity, issued by [`crate::id::IdGenerator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u64);

impl NodeId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<[i32; 2]> for Position {
    fn from([x, y]: [i32; 2]) -> Self {
        Self { x, y }
    }
}

impl From<Position> for [i32; 2] {
    fn from(pos: Position) -> Self {
        [pos.x, pos.y]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub id: NodeId,
    pub position: Position,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub from: NodeId,
    pub to: NodeId,
    pub value: Option<String>,
    pub label_position: Option<LabelPosition>,
    pub head: Option<Head>,
    pub tail: Option<Tail>,
    pub line: Option<LineStyle>,
    pub bend: Option<i32>,
}

impl Edge {
    pub fn new(from: NodeId, to: NodeId) -> Self {
        Self {
            from,
            to,
            value: None,
            label_position: None,
            head: None,
            tail: None,
            line: None,
            bend: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelPosition {
    Left,
    Right,
    Inside,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Head {
    None,
    Harpoon,
    HarpoonAlt,
    TwoHeads,
    Default,
}

impl Head {
    pub fn token(self) -> Option<&'static str> {
        match self {
            Self::None => Some("no head"),
            Self::Harpoon => Some("harpoon"),
            Self::HarpoonAlt => Some("harpoon'"),
            Self::TwoHeads => Some("two heads"),
            Self::Default => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tail {
    Hook,
    HookAlt,
    MapsTo,
    Tail,
    Default,
}

impl Tail {
    pub fn token(self) -> Option<&'static str> {
        match self {
            Self::Hook => Some("hook"),
            Self::HookAlt => Some("hook'"),
            Self::MapsTo => Some("maps to"),
            Self::Tail => Some("tail"),
            Self::Default => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineStyle {
    Dashed,
    Dotted,
    Solid,
}

impl LineStyle {
    pub fn token(self) -> Option<&'static str> {
        match self {
            Self::Dashed => Some("dashed"),
            Self::Dotted => Some("dotted"),
            Self::Solid => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagram {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl Diagram {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn node_index(&self, id: NodeId) -> Option<usize> {
        self.nodes.iter().position(|node| node.id == id)
    }

    /// Top-left corner of the bounding box, `None` for a diagram without nodes.
    pub fn min_position(&self) -> Option<Position> {
        let min_x = self.nodes.iter().map(|node| node.position.x).min()?;
        let min_y = self.nodes.iter().map(|node| node.position.y).min()?;
        Some(Position::new(min_x, min_y))
    }

    pub fn max_position(&self) -> Option<Position> {
        let max_x = self.nodes.iter().map(|node| node.position.x).max()?;
        let max_y = self.nodes.iter().map(|node| node.position.y).max()?;
        Some(Position::new(max_x, max_y))
    }
}
