use std::fmt::Write as _;
use std::fs;

use ccx_inp::Deck;
use ccx_model::{Element, Group, GroupKind, Mesh, MeshBuilder, Node};
use ccx_unv::{ConversionReport, UnvWriter, convert, output_path_for, translate};

fn render(mesh: &Mesh) -> String {
    let translation = translate(mesh).expect("translation succeeds");
    let mut writer = UnvWriter::new(Vec::new());
    writer.write_mesh(mesh, &translation).expect("write to memory");
    String::from_utf8(writer.into_inner()).expect("ascii output")
}

/// Lines of the dataset introduced by `tag`, without the tag line.
fn dataset<'a>(text: &'a str, tag: &str) -> Vec<&'a str> {
    text.lines()
        .skip_while(|line| *line != tag)
        .skip(1)
        .take_while(|line| *line != "    -1")
        .collect()
}

fn brick_deck() -> String {
    let mut deck = String::from("*NODE, NSET=NALL\n");
    for id in 101..=120 {
        writeln!(deck, "{id}, {}.0, 0.0, 0.0", id - 100).expect("write to string");
    }
    deck.push_str("*ELEMENT, TYPE=C3D20, ELSET=SOLID\n1, ");
    let ids: Vec<String> = (101..=120).map(|id| id.to_string()).collect();
    deck.push_str(&ids[..15].join(", "));
    deck.push_str(",\n");
    deck.push_str(&ids[15..].join(", "));
    deck.push('\n');
    deck
}

#[test]
fn quadratic_brick_is_written_in_unv_node_order() {
    let deck = Deck::parse_str(&brick_deck()).expect("parse deck");
    let mesh = MeshBuilder::build_from_deck(&deck);
    let text = render(&mesh);

    let lines = dataset(&text, "  2412");
    assert_eq!(
        lines[0],
        "         1       116         2         1         7        20"
    );

    let written: Vec<i32> = lines[1..]
        .iter()
        .flat_map(|line| line.split_whitespace())
        .map(|field| field.parse().expect("node id"))
        .collect();
    let permutation = [
        1, 9, 2, 10, 3, 11, 4, 12, 17, 18, 19, 20, 5, 13, 6, 14, 7, 15, 8, 16,
    ];
    let expected: Vec<i32> = permutation.iter().map(|p| 100 + p).collect();
    assert_eq!(written, expected);
    assert_eq!(lines.len(), 4, "20 node ids take three lines");
}

#[test]
fn node_record_uses_fixed_columns() {
    let mut mesh = Mesh::new();
    mesh.add_node(Node::new(5, [1.0, 2.0, 3.0]));
    let text = render(&mesh);

    let lines = dataset(&text, "  2411");
    assert_eq!(lines[0], "         5         1         1        11");
    assert_eq!(lines[1].len(), 75);
    for (field, expected) in lines[1]
        .as_bytes()
        .chunks(25)
        .zip(["1.0000000000000000E+00", "2.0000000000000000E+00", "3.0000000000000000E+00"])
    {
        let field = std::str::from_utf8(field).expect("ascii field");
        assert_eq!(field.trim_start(), expected);
    }
}

#[test]
fn element_group_members_are_paired_per_line() {
    let mut mesh = Mesh::new();
    for id in 1..=4 {
        mesh.add_node(Node::new(id, [f64::from(id), 0.0, 0.0]));
    }
    for id in 1..=3 {
        mesh.add_element(Element::new(id, "B31", vec![id, id + 1]));
    }
    mesh.extend_group(GroupKind::Element, "LOAD", &[1, 2, 3]);

    let text = render(&mesh);
    let lines = dataset(&text, "  2467");
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0].split_whitespace().last(), Some("3"));
    assert_eq!(lines[1], "LOAD");
    assert_eq!(
        lines[2],
        "         8         1         0         0         8         2         0         0"
    );
    assert_eq!(lines[3], "         8         3         0         0");
    assert!(text.ends_with("         8         3         0         0\n    -1\n"));
}

#[test]
fn unclassifiable_element_is_skipped_and_the_rest_emitted() {
    let mut mesh = Mesh::new();
    for id in 1..=4 {
        mesh.add_node(Node::new(id, [0.0, f64::from(id), 0.0]));
    }
    mesh.add_element(Element::new(1, "C3D4", vec![1, 2, 3, 4]));
    mesh.add_element(Element::new(2, "T3D2", vec![1, 2]));
    mesh.add_element(Element::new(3, "S3", vec![2, 3, 4]));

    let translation = translate(&mesh).expect("translation succeeds");
    assert_eq!(translation.skipped.len(), 1);
    assert_eq!(translation.skipped[0].id, 2);
    assert_eq!(translation.skipped[0].element_type, "T3D2");

    let text = render(&mesh);
    let lines = dataset(&text, "  2412");
    assert_eq!(
        lines,
        vec![
            "         1       111         2         1         7         4",
            "         1         2         3         4",
            "         3        91         2         1         7         3",
            "         2         3         4",
        ]
    );
}

#[test]
fn groups_follow_node_groups_then_element_groups() {
    let mut mesh = Mesh::new();
    mesh.add_node(Node::new(1, [0.0, 0.0, 0.0]));
    mesh.add_node(Node::new(2, [1.0, 0.0, 0.0]));
    mesh.add_element(Element::new(1, "B32", vec![1, 2, 1]));
    mesh.extend_group(GroupKind::Element, "BEAM", &[1]);
    mesh.extend_group(GroupKind::Node, "ENDS", &[1, 2]);

    let text = render(&mesh);
    let names: Vec<&str> = dataset(&text, "  2467")
        .into_iter()
        .filter(|line| !line.starts_with(' '))
        .collect();
    assert_eq!(names, vec!["ENDS", "BEAM"]);

    let group = Group::new("BEAM", GroupKind::Element, vec![1]);
    assert_eq!(mesh.element_group("beam"), Some(&group));
}

#[test]
fn converts_deck_with_include_and_reports() {
    let dir = tempfile::tempdir().expect("temp dir");
    fs::write(
        dir.path().join("nodes.inp"),
        "*NODE, NSET=NALL\n1, 0, 0, 0\n2, 1, 0, 0\n3, 0, 1, 0\n4, 1, 1, 0\n",
    )
    .expect("write include");
    let input = dir.path().join("plate.inp");
    fs::write(
        &input,
        "*HEADING\nplate\n*INCLUDE, INPUT=nodes.inp\n\
         *ELEMENT, TYPE=S4R, ELSET=PLATE\n1, 1, 2, 4, 3\n\
         *ELEMENT, TYPE=T3D2, ELSET=TRUSS\n2, 1, 4\n\
         *NSET, NSET=FIX\n1, 3\n",
    )
    .expect("write deck");

    let output = output_path_for(&input);
    let report = convert(&input, &output).expect("conversion succeeds");

    assert!(report.written);
    assert_eq!(report.input.as_deref(), Some(input.as_path()));
    assert_eq!(report.mesh.nodes, 4);
    assert_eq!(report.mesh.elements, 2);
    assert_eq!(report.elements_written, 1);
    assert_eq!(report.groups_written, 4);
    assert_eq!(report.skipped[0].element_type, "T3D2");

    let text = fs::read_to_string(&output).expect("read output");
    assert!(text.contains("         1        94         2         1         7         4\n"));
    assert!(text.contains("\nFIX\n         7         1         0         0         7         3         0         0\n"));

    let report_path = dir.path().join("report.json");
    report.write_json(&report_path).expect("write report");
    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&report_path).expect("read report"))
            .expect("valid json");
    assert_eq!(json["elements_written"], 1);
    assert_eq!(json["skipped"][0]["id"], 2);
}

#[test]
fn deck_without_mesh_produces_no_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    let input = dir.path().join("empty.inp");
    fs::write(&input, "*HEADING\nnothing here\n").expect("write deck");

    let output = output_path_for(&input);
    let report: ConversionReport = convert(&input, &output).expect("empty deck is not an error");
    assert!(!report.written);
    assert!(!output.exists());
}

#[test]
fn missing_input_is_nothing_to_convert() {
    let dir = tempfile::tempdir().expect("temp dir");
    let input = dir.path().join("absent.inp");
    let output = output_path_for(&input);

    let report = convert(&input, &output).expect("missing input is logged, not raised");
    assert!(!report.written);
    assert_eq!(report.mesh.nodes, 0);
    assert_eq!(report.mesh.elements, 0);
    assert!(!output.exists());
}
