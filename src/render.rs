use crate::config::TexConfig;
use crate::error::{EdgeEnd, Endpoint, Error, Result};
use crate::ir::{DEFAULT_BEND, Diagram, Edge, Head, LabelPosition, LineStyle, NodeId, Position, Tail};
use log::debug;
use std::cmp::Ordering;

/// Largest grid, in cells, the renderer lays out.
pub const MAX_GRID_CELLS: u64 = 1 << 20;

pub fn to_tex(diagram: &Diagram) -> Result<String> {
    to_tex_with_config(diagram, &TexConfig::default())
}

pub fn to_tex_with_config(diagram: &Diagram, config: &TexConfig) -> Result<String> {
    let mut out = String::from("\\begin{tikzcd}");
    if let Some(options) = &config.environment_options {
        out.push_str(&format!("[{options}]"));
    }
    out.push('\n');

    let rows = layout_cells(diagram)?;
    let last = rows.len().saturating_sub(1);
    for (idx, row) in rows.iter().enumerate() {
        let line = join_cells(row);
        out.push_str(&config.indent);
        out.push_str(&line);
        if idx < last {
            if !line.is_empty() {
                out.push(' ');
            }
            out.push_str("\\\\");
        }
        out.push('\n');
    }

    out.push_str("\\end{tikzcd}");
    debug!(nodes = diagram.nodes.len(), edges = diagram.edges.len(), rows = rows.len(); "Rendered tikzcd markup");
    Ok(out)
}

/// Places node values and arrow directives on the grid, one entry per cell.
///
/// The grid always includes the origin so markup re-parsed from the output
/// puts every node back at its original coordinates.
fn layout_cells(diagram: &Diagram) -> Result<Vec<Vec<String>>> {
    let (Some(min), Some(max)) = (diagram.min_position(), diagram.max_position()) else {
        return Ok(Vec::new());
    };
    let origin = Position::new(min.x.min(0), min.y.min(0));
    let span = |lo: i32, hi: i32| (i64::from(hi) - i64::from(lo) + 1) as u64;
    let (width, height) = (span(origin.x, max.x), span(origin.y, max.y));
    if width.checked_mul(height).is_none_or(|cells| cells > MAX_GRID_CELLS) {
        return Err(Error::grid(origin, max));
    }
    let mut rows = vec![vec![String::new(); width as usize]; height as usize];

    // Every position lies within the bounded grid, so these offsets fit.
    let cell = |pos: Position| ((pos.y - origin.y) as usize, (pos.x - origin.x) as usize);

    for node in &diagram.nodes {
        let (row, col) = cell(node.position);
        if !rows[row][col].is_empty() {
            debug!(value = node.value.as_str(), x = node.position.x, y = node.position.y; "Nodes share a cell and will merge on re-parse");
        }
        append(&mut rows[row][col], &node.value);
    }

    for (idx, edge) in diagram.edges.iter().enumerate() {
        let from = position_of(diagram, idx, EdgeEnd::From, edge.from)?;
        let to = position_of(diagram, idx, EdgeEnd::To, edge.to)?;
        let (row, col) = cell(from);
        append(&mut rows[row][col], &arrow_directive(edge, from, to));
    }

    for row in &mut rows {
        while row.last().is_some_and(String::is_empty) {
            row.pop();
        }
    }

    Ok(rows)
}

fn position_of(diagram: &Diagram, edge: usize, endpoint: EdgeEnd, id: NodeId) -> Result<Position> {
    diagram
        .node(id)
        .map(|node| node.position)
        .ok_or(Error::UnresolvedEdgeEndpoint {
            edge,
            endpoint,
            target: Endpoint::Id(id),
        })
}

/// Space-joins entries of one cell. Two node values in a cell read back as a
/// single node.
fn append(cell: &mut String, text: &str) {
    if !cell.is_empty() {
        cell.push(' ');
    }
    cell.push_str(text);
}

fn join_cells(cells: &[String]) -> String {
    let mut line = String::new();
    for (idx, cell) in cells.iter().enumerate() {
        if idx > 0 {
            line.push_str(if line.is_empty() || line.ends_with(' ') { "& " } else { " & " });
        }
        line.push_str(cell);
    }
    line
}

pub fn arrow_directive(edge: &Edge, from: Position, to: Position) -> String {
    let mut fields = vec![direction_code(to.x - from.x, to.y - from.y)];

    if let Some(value) = &edge.value {
        let suffix = match edge.label_position {
            Some(LabelPosition::Right) => "'",
            Some(LabelPosition::Inside) => " description",
            Some(LabelPosition::Left) | None => "",
        };
        fields.push(format!("\"{value}\"{suffix}"));
    }

    let tokens = [
        edge.head.and_then(Head::token),
        edge.line.and_then(LineStyle::token),
        edge.tail.and_then(Tail::token),
    ];
    fields.extend(tokens.into_iter().flatten().map(str::to_string));

    if let Some(bend) = edge.bend.and_then(bend_token) {
        fields.push(bend);
    }

    format!("\\arrow[{}]", fields.join(", "))
}

pub fn direction_code(dx: i32, dy: i32) -> String {
    let horizontal = if dx < 0 { "l" } else { "r" };
    let vertical = if dy < 0 { "u" } else { "d" };
    format!(
        "{}{}",
        horizontal.repeat(dx.unsigned_abs() as usize),
        vertical.repeat(dy.unsigned_abs() as usize)
    )
}

pub fn bend_token(bend: i32) -> Option<String> {
    let side = match bend.cmp(&0) {
        Ordering::Greater => "left",
        Ordering::Less => "right",
        Ordering::Equal => return None,
    };
    let magnitude = bend.unsigned_abs();
    if magnitude == DEFAULT_BEND {
        Some(format!("bend {side}"))
    } else {
        Some(format!("bend {side}={magnitude}"))
    }
}
