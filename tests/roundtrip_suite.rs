use std::path::Path;

use tikzcd_rs::{
    Diagram, Head, IdGenerator, LabelPosition, LineStyle, Tail, from_code_with, from_json_with,
    to_json, to_tex,
};

type EdgeShape = (
    usize,
    usize,
    Option<String>,
    Option<LabelPosition>,
    Option<Head>,
    Option<Tail>,
    Option<LineStyle>,
    Option<i32>,
);

/// Identity-free view of a diagram: node values and positions, edges by index.
fn shape(diagram: &Diagram) -> (Vec<(String, i32, i32)>, Vec<EdgeShape>) {
    let nodes = diagram
        .nodes
        .iter()
        .map(|node| (node.value.clone(), node.position.x, node.position.y))
        .collect();
    let edges = diagram
        .edges
        .iter()
        .map(|edge| {
            (
                diagram.node_index(edge.from).expect("edge source"),
                diagram.node_index(edge.to).expect("edge target"),
                edge.value.clone(),
                edge.label_position,
                edge.head,
                edge.tail,
                edge.line,
                edge.bend,
            )
        })
        .collect();
    (nodes, edges)
}

fn parse_fixture(path: &Path, ids: &IdGenerator) -> Diagram {
    let input = std::fs::read_to_string(path).expect("fixture read failed");
    from_code_with(&input, ids).expect("parse failed")
}

#[test]
fn round_trip_all_fixtures() {
    let root = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures");

    // Keep this list explicit so new fixtures must be added intentionally.
    let fixtures = [
        "bends.tex",
        "inline.tex",
        "pullback.tex",
        "sparse.tex",
        "square.tex",
        "styles.tex",
    ];

    for rel in fixtures {
        let path = root.join(rel);
        assert!(path.exists(), "fixture missing: {}", rel);
        let ids = IdGenerator::new();
        let parsed = parse_fixture(&path, &ids);
        assert!(!parsed.nodes.is_empty(), "{rel}: no nodes");
        assert!(!parsed.edges.is_empty(), "{rel}: no edges");

        let tex = to_tex(&parsed).unwrap_or_else(|err| panic!("{rel}: render failed: {err}"));
        let reparsed = from_code_with(&tex, &ids).unwrap_or_else(|err| panic!("{rel}: reparse failed: {err}\n{tex}"));
        assert_eq!(shape(&parsed), shape(&reparsed), "{rel}: markup round trip\n{tex}");
        assert_eq!(to_tex(&reparsed).unwrap(), tex, "{rel}: rendering is not stable");

        let json = to_json(&parsed).unwrap();
        let decoded = from_json_with(&json, &ids).unwrap();
        assert_eq!(shape(&parsed), shape(&decoded), "{rel}: json round trip");
        assert!(
            decoded
                .nodes
                .iter()
                .all(|node| parsed.nodes.iter().all(|other| other.id != node.id)),
            "{rel}: identities were reused"
        );
    }
}

#[test]
fn pullback_fixture_structure() {
    let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures");
    let diagram = parse_fixture(&root.join("pullback.tex"), &IdGenerator::new());
    let (nodes, edges) = shape(&diagram);
    assert_eq!(
        nodes,
        vec![
            ("T".to_string(), 0, 0),
            ("X \\times_Z Y".to_string(), 1, 1),
            ("X".to_string(), 2, 1),
            ("Y".to_string(), 1, 2),
            ("Z".to_string(), 2, 2),
        ]
    );
    assert_eq!(edges.len(), 7);
    assert_eq!((edges[0].0, edges[0].1, edges[0].7), (0, 2, Some(30)));
    assert_eq!((edges[1].0, edges[1].1, edges[1].7), (0, 3, Some(-30)));
    assert_eq!(edges[2].3, Some(LabelPosition::Inside));
    assert_eq!(edges[2].6, Some(LineStyle::Dotted));
    assert_eq!(edges[4].3, Some(LabelPosition::Right));
}

#[test]
fn styles_fixture_structure() {
    let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures");
    let diagram = parse_fixture(&root.join("styles.tex"), &IdGenerator::new());
    let (_, edges) = shape(&diagram);
    let styles: Vec<_> = edges.iter().map(|edge| (edge.4, edge.5, edge.6)).collect();
    assert_eq!(
        styles,
        vec![
            (None, Some(Tail::Hook), None),
            (Some(Head::TwoHeads), None, None),
            (None, Some(Tail::MapsTo), None),
            (Some(Head::HarpoonAlt), None, Some(LineStyle::Dashed)),
            (Some(Head::None), None, None),
            (Some(Head::Harpoon), Some(Tail::Tail), None),
        ]
    );
}
