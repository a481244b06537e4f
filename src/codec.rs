//! JSON and base64 wire form of a [`Diagram`].
//!
//! The wire form addresses edge endpoints by node index instead of identity
//! and translates all positions so the top-left-most node sits at `[0, 0]`.
//! Identities are never written; decoding assigns fresh ones.

use crate::error::{EdgeEnd, Endpoint, Error, Result};
use crate::id::IdGenerator;
use crate::ir::{Diagram, Edge, Head, LabelPosition, LineStyle, Node, NodeId, Position, Tail};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use log::{debug, trace};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireDiagram {
    pub nodes: Vec<WireNode>,
    pub edges: Vec<WireEdge>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireNode {
    pub position: [i32; 2],
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireEdge {
    pub from: usize,
    pub to: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_position: Option<LabelPosition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub head: Option<Head>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tail: Option<Tail>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<LineStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bend: Option<i32>,
}

impl WireEdge {
    pub fn new(from: usize, to: usize) -> Self {
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

pub fn to_wire(diagram: &Diagram) -> Result<WireDiagram> {
    let origin = diagram.min_position().unwrap_or_default();
    let mut nodes = Vec::with_capacity(diagram.nodes.len());
    for node in &diagram.nodes {
        let (Some(x), Some(y)) = (
            node.position.x.checked_sub(origin.x),
            node.position.y.checked_sub(origin.y),
        ) else {
            let max = diagram.max_position().unwrap_or_default();
            return Err(Error::grid(origin, max));
        };
        nodes.push(WireNode {
            position: [x, y],
            value: node.value.clone(),
        });
    }

    let mut edges = Vec::with_capacity(diagram.edges.len());
    for (idx, edge) in diagram.edges.iter().enumerate() {
        let from = index_of(diagram, idx, EdgeEnd::From, edge.from)?;
        let to = index_of(diagram, idx, EdgeEnd::To, edge.to)?;
        let mut wire = WireEdge::new(from, to);
        wire.value = edge.value.clone();
        wire.label_position = edge.label_position;
        wire.head = edge.head;
        wire.tail = edge.tail;
        wire.line = edge.line;
        wire.bend = edge.bend;
        edges.push(wire);
    }

    Ok(WireDiagram { nodes, edges })
}

fn index_of(diagram: &Diagram, edge: usize, endpoint: EdgeEnd, id: NodeId) -> Result<usize> {
    diagram
        .node_index(id)
        .ok_or(Error::UnresolvedEdgeEndpoint {
            edge,
            endpoint,
            target: Endpoint::Id(id),
        })
}

/// Builds a model from the wire form, issuing one fresh identity per node in
/// array order.
pub fn from_wire(wire: WireDiagram, ids: &IdGenerator) -> Result<Diagram> {
    let nodes: Vec<Node> = wire
        .nodes
        .into_iter()
        .map(|node| Node {
            id: ids.next_id(),
            position: Position::from(node.position),
            value: node.value,
        })
        .collect();

    let mut edges = Vec::with_capacity(wire.edges.len());
    for (idx, edge) in wire.edges.into_iter().enumerate() {
        let resolve = |endpoint: EdgeEnd, index: usize| {
            nodes
                .get(index)
                .map(|node| node.id)
                .ok_or(Error::UnresolvedEdgeEndpoint {
                    edge: idx,
                    endpoint,
                    target: Endpoint::Index(index),
                })
        };
        let mut resolved = Edge::new(resolve(EdgeEnd::From, edge.from)?, resolve(EdgeEnd::To, edge.to)?);
        resolved.value = edge.value;
        resolved.label_position = edge.label_position;
        resolved.head = edge.head;
        resolved.tail = edge.tail;
        resolved.line = edge.line;
        resolved.bend = edge.bend;
        edges.push(resolved);
    }

    Ok(Diagram { nodes, edges })
}

pub fn to_json(diagram: &Diagram) -> Result<String> {
    let wire = to_wire(diagram)?;
    let json = serde_json::to_string(&wire).map_err(Error::wire)?;
    debug!(nodes = wire.nodes.len(), edges = wire.edges.len(); "Encoded diagram");
    Ok(json)
}

pub fn from_json(json: &str) -> Result<Diagram> {
    from_json_with(json, IdGenerator::global())
}

pub fn from_json_with(json: &str, ids: &IdGenerator) -> Result<Diagram> {
    let wire: WireDiagram = serde_json::from_str(json).map_err(Error::wire)?;
    trace!(wire:?; "Decoded wire form");
    from_wire(wire, ids)
}

pub fn to_base64(diagram: &Diagram) -> Result<String> {
    Ok(STANDARD.encode(to_json(diagram)?))
}

pub fn from_base64(base64: &str) -> Result<Diagram> {
    from_base64_with(base64, IdGenerator::global())
}

pub fn from_base64_with(base64: &str, ids: &IdGenerator) -> Result<Diagram> {
    let bytes = STANDARD.decode(base64.trim()).map_err(Error::wire)?;
    let json = String::from_utf8(bytes).map_err(Error::wire)?;
    from_json_with(&json, ids)
}
