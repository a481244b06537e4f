//! `tikzcd` markup parser.
//!
//! The parser walks the text with a grid cursor. `&` moves one column right,
//! `\\` starts a new row, every other run of text up to the next delimiter is
//! a node at the cursor. Arrow directives are recorded with grid coordinates
//! and resolved to nodes once the whole text has been read.

use crate::codec::{WireDiagram, WireEdge, WireNode, from_wire};
use crate::error::{EdgeEnd, Endpoint, Error, Result};
use crate::id::IdGenerator;
use crate::ir::{DEFAULT_BEND, Diagram, Head, LabelPosition, LineStyle, Position, Tail};
use log::{debug, trace};
use once_cell::sync::Lazy;
use regex::Regex;

static BEND_LEFT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"bend left=(\d+)").unwrap());
static BEND_RIGHT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"bend right=(\d+)").unwrap());

const BEGIN: &str = "\\begin{tikzcd}";
const END: &str = "\\end{tikzcd}";
const ARROW: &str = "\\arrow[";
const ROW_SEPARATOR: &str = "\\\\";
const NODE_DELIMITERS: [&str; 5] = ["&", "\n", ROW_SEPARATOR, "\\arrow", END];

type Matcher = fn(&mut ParseState<'_>) -> Result<bool>;

/// Tried in order against the start of the remaining text.
const MATCHERS: [Matcher; 6] = [
    match_begin,
    match_end,
    match_column_separator,
    match_row_separator,
    match_arrow,
    match_node,
];

#[derive(Debug, Clone, PartialEq, Eq)]
struct PendingEdge {
    from: Position,
    to: Position,
    options: ArrowOptions,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArrowOptions {
    pub value: Option<String>,
    pub label_position: Option<LabelPosition>,
    pub head: Option<Head>,
    pub tail: Option<Tail>,
    pub line: Option<LineStyle>,
    pub bend: Option<i32>,
}

#[derive(Debug)]
struct ParseState<'a> {
    input: &'a str,
    rest: &'a str,
    x: i32,
    y: i32,
    nodes: Vec<WireNode>,
    edges: Vec<PendingEdge>,
}

impl<'a> ParseState<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            rest: input,
            x: 0,
            y: 0,
            nodes: Vec::new(),
            edges: Vec::new(),
        }
    }

    fn offset(&self) -> usize {
        self.input.len() - self.rest.len()
    }

    fn error(&self, message: &str) -> Error {
        Error::markup(message, self.offset())
    }

    fn cursor(&self) -> Position {
        Position::new(self.x, self.y)
    }

    /// Looks up the last node declared at `pos`.
    fn node_at(&self, pos: Position) -> Option<usize> {
        self.nodes.iter().rposition(|node| node.position == <[i32; 2]>::from(pos))
    }

    fn resolve(self) -> Result<WireDiagram> {
        let mut edges = Vec::with_capacity(self.edges.len());
        for (idx, pending) in self.edges.iter().enumerate() {
            let lookup = |endpoint: EdgeEnd, pos: Position| {
                self.node_at(pos).ok_or(Error::UnresolvedEdgeEndpoint {
                    edge: idx,
                    endpoint,
                    target: Endpoint::Position(pos),
                })
            };
            let options = pending.options.clone();
            let from = lookup(EdgeEnd::From, pending.from)?;
            let to = lookup(EdgeEnd::To, pending.to)?;
            let mut edge = WireEdge::new(from, to);
            edge.value = options.value;
            edge.label_position = options.label_position;
            edge.head = options.head;
            edge.tail = options.tail;
            edge.line = options.line;
            edge.bend = options.bend;
            edges.push(edge);
        }
        Ok(WireDiagram {
            nodes: self.nodes,
            edges,
        })
    }
}

pub fn from_code(code: &str) -> Result<Diagram> {
    from_code_with(code, IdGenerator::global())
}

pub fn from_code_with(code: &str, ids: &IdGenerator) -> Result<Diagram> {
    let mut state = ParseState::new(code);
    loop {
        state.rest = state.rest.trim_start();
        if state.rest.is_empty() {
            break;
        }
        let mut consumed = false;
        for matcher in MATCHERS {
            if matcher(&mut state)? {
                consumed = true;
                break;
            }
        }
        if !consumed {
            return Err(state.error("cannot consume remaining input"));
        }
    }

    debug!(nodes = state.nodes.len(), edges = state.edges.len(); "Parsed tikzcd markup");
    let wire = state.resolve()?;
    from_wire(wire, ids)
}

fn match_begin(state: &mut ParseState<'_>) -> Result<bool> {
    let Some(after) = state.rest.strip_prefix(BEGIN) else {
        return Ok(false);
    };
    state.rest = after;
    if let Some(options) = after.strip_prefix('[') {
        let Some(close) = options.find(']') else {
            return Err(state.error("unterminated environment options"));
        };
        trace!(options = &options[..close]; "Skipping environment options");
        state.rest = &options[close + 1..];
    }
    Ok(true)
}

fn match_end(state: &mut ParseState<'_>) -> Result<bool> {
    let Some(after) = state.rest.strip_prefix(END) else {
        return Ok(false);
    };
    state.rest = after;
    Ok(true)
}

fn match_column_separator(state: &mut ParseState<'_>) -> Result<bool> {
    let Some(after) = state.rest.strip_prefix('&') else {
        return Ok(false);
    };
    state.rest = after;
    state.x += 1;
    trace!(x = state.x; "New column");
    Ok(true)
}

fn match_row_separator(state: &mut ParseState<'_>) -> Result<bool> {
    let Some(after) = state.rest.strip_prefix(ROW_SEPARATOR) else {
        return Ok(false);
    };
    state.rest = after;
    state.y += 1;
    state.x = 0;
    trace!(y = state.y; "New row");
    Ok(true)
}

fn match_arrow(state: &mut ParseState<'_>) -> Result<bool> {
    let Some(after) = state.rest.strip_prefix(ARROW) else {
        return Ok(false);
    };
    let Some(close) = after.find(']') else {
        return Err(state.error("unterminated arrow directive"));
    };
    let content = &after[..close];

    let direction = content.split(',').next().unwrap_or_default();
    let (dx, dy) = displacement(direction);
    let from = state.cursor();
    let to = Position::new(from.x + dx, from.y + dy);
    let options = parse_arrow_options(content).map_err(|message| state.error(message))?;

    trace!(content, from:?, to:?; "New edge");
    state.edges.push(PendingEdge { from, to, options });
    state.rest = &after[close + 1..];
    Ok(true)
}

fn match_node(state: &mut ParseState<'_>) -> Result<bool> {
    let rest = state.rest;
    let Some(split) = NODE_DELIMITERS
        .iter()
        .filter_map(|delimiter| rest.find(delimiter))
        .min()
    else {
        return Err(state.error("cannot find node delimiter"));
    };
    let value = rest[..split].trim();
    if value.is_empty() {
        return Err(state.error("no node value found"));
    }

    trace!(value, x = state.x, y = state.y; "New node");
    state.nodes.push(WireNode {
        position: [state.x, state.y],
        value: value.to_string(),
    });
    state.rest = &rest[split..];
    Ok(true)
}

/// Grid displacement encoded by a direction code such as `rrd` or `lu`.
pub fn displacement(direction: &str) -> (i32, i32) {
    let count = |letter: char| direction.chars().filter(|&ch| ch == letter).count() as i32;
    (count('r') - count('l'), count('d') - count('u'))
}

/// Decodes label and style options from the text between `\arrow[` and `]`.
///
/// Style keywords are searched in the whole content; a later keyword in each
/// slot overrides an earlier one, so `harpoon'` wins over `harpoon`.
pub fn parse_arrow_options(content: &str) -> std::result::Result<ArrowOptions, &'static str> {
    let mut options = ArrowOptions::default();

    if let Some(field) = content.split(',').skip(1).find(|field| field.contains('"')) {
        let quoted = field.split('"').nth(1).unwrap_or_default();
        options.value = Some(quoted.to_string());
        let field = field.trim_end();
        if field.ends_with('\'') {
            options.label_position = Some(LabelPosition::Right);
        }
        if field.ends_with("description") {
            options.label_position = Some(LabelPosition::Inside);
        }
    }

    let head_keywords = [
        ("harpoon", Head::Harpoon),
        ("harpoon'", Head::HarpoonAlt),
        ("two heads", Head::TwoHeads),
        ("no head", Head::None),
    ];
    for (keyword, head) in head_keywords {
        if content.contains(keyword) {
            options.head = Some(head);
        }
    }

    let tail_keywords = [
        ("tail", Tail::Tail),
        ("hook", Tail::Hook),
        ("hook'", Tail::HookAlt),
        ("maps to", Tail::MapsTo),
    ];
    for (keyword, tail) in tail_keywords {
        if content.contains(keyword) {
            options.tail = Some(tail);
        }
    }

    for (keyword, line) in [("dashed", LineStyle::Dashed), ("dotted", LineStyle::Dotted)] {
        if content.contains(keyword) {
            options.line = Some(line);
        }
    }

    if content.contains("bend left") {
        options.bend = Some(bend_angle(content, &BEND_LEFT_RE)?);
    }
    if content.contains("bend right") {
        options.bend = Some(-bend_angle(content, &BEND_RIGHT_RE)?);
    }
    // A zero angle draws a straight arrow and renders without a bend token.
    options.bend = options.bend.filter(|&angle| angle != 0);

    Ok(options)
}

fn bend_angle(content: &str, re: &Regex) -> std::result::Result<i32, &'static str> {
    match re.captures(content).and_then(|caps| caps.get(1)) {
        Some(angle) => angle.as_str().parse().map_err(|_| "bend angle out of range"),
        None => Ok(DEFAULT_BEND as i32),
    }
}
