use fast_steiner::parser::parse_steinlib;
use fast_steiner::Error;
use std::io::Cursor;

fn parse(text: &str) -> fast_steiner::Result<fast_steiner::SteinerInstance> {
    parse_steinlib(Cursor::new(text))
}

const VALID: &str = "\
33d32945 steinlib format
section comment
name \"toy\"
end

section graph
nodes 4
edges 4
e 1 2 1
e 2 3 1
e 3 4 1
e 1 4 10
end

section terminals
terminals 2
t 1
t 3
end

eof
";

#[test]
fn parses_a_complete_document() {
    let inst = parse(VALID).unwrap();
    assert_eq!(inst.num_vertices(), 4);
    assert_eq!(inst.num_edges(), 4);
    assert_eq!(inst.terminals(), &[0, 2]);
    assert_eq!(inst.edges()[0], (0, 1, 1));
    assert_eq!(inst.edges()[3], (0, 3, 10));
    assert_eq!(inst.declared_cost(), None);
}

#[test]
fn parses_declared_cost() {
    let text = VALID.replace("eof", "cost 2\neof");
    let inst = parse(&text).unwrap();
    assert_eq!(inst.declared_cost(), Some(2));
}

#[test]
fn ignores_coordinates_and_unknown_lines() {
    let text = VALID.replace(
        "eof",
        "section coordinates\ndd 1 0 0\ndd 2 1 0\nend\nsomething unrecognised\neof",
    );
    let inst = parse(&text).unwrap();
    assert_eq!(inst.num_vertices(), 4);
}

#[test]
fn rejects_nested_sections() {
    let text = "section graph\nsection comment\nend\nend\n";
    match parse(text) {
        Err(Error::Parse { line, msg }) => {
            assert_eq!(line, 2);
            assert!(msg.contains("nested"));
        }
        other => panic!("expected a parse error, got {other:?}"),
    }
}

#[test]
fn rejects_end_without_section() {
    let text = "end\n";
    assert!(matches!(parse(text), Err(Error::Parse { line: 1, .. })));
}

#[test]
fn rejects_unknown_section_names() {
    let text = "section nonsense\nend\n";
    assert!(parse(text).is_err());
}

#[test]
fn rejects_terminal_before_terminals_count() {
    let text = "\
section graph
nodes 2
edges 1
e 1 2 1
end
section terminals
t 1
terminals 1
end
";
    assert!(matches!(parse(text), Err(Error::Parse { line: 7, .. })));
}

#[test]
fn rejects_malformed_edge_line() {
    let text = VALID.replace("e 1 2 1", "e 1 2");
    assert!(parse(&text).is_err());
}

#[test]
fn rejects_zero_based_ids() {
    let text = VALID.replace("e 1 2 1", "e 0 2 1");
    assert!(parse(&text).is_err());
}

#[test]
fn rejects_edge_count_mismatch() {
    let text = VALID.replace("edges 4", "edges 5");
    assert!(parse(&text).is_err());
}

#[test]
fn rejects_terminal_count_mismatch() {
    let text = VALID.replace("terminals 2", "terminals 3");
    assert!(parse(&text).is_err());
}

#[test]
fn rejects_missing_terminals_section() {
    let text = "\
section graph
nodes 2
edges 1
e 1 2 1
end
";
    assert!(parse(text).is_err());
}

#[test]
fn rejects_out_of_range_vertex() {
    let text = VALID.replace("e 3 4 1", "e 3 9 1");
    assert!(parse(&text).is_err());
}

#[test]
fn rejects_empty_input() {
    assert!(parse("").is_err());
}
