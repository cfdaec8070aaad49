/*
MIT License

Copyright (c) 2026 Raja Lehtihet and Wael El Oraiby

Permission is hereby granted, free of charge, to any person obtaining a copy
of this software and associated documentation files (the "Software"), to deal
in the Software without restriction, including without limitation the rights
to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
copies of the Software, and to permit persons to whom the Software is
furnished to do so, subject to the following conditions:

The above copyright notice and this permission notice shall be included in all
copies or substantial portions of the Software.

THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
SOFTWARE.
*/

//! Crate unit tests.

use super::*;
use crate::inspect::{
    collect_equation_applications, contains_derivative, derivative_order,
    equation_derivative_orders, find_derivative_or_application,
};
use crate::term::Term;

fn first_caret_column(pointer: &str) -> Option<usize> {
    pointer.chars().position(|ch| ch == '^').map(|idx| idx + 1)
}

fn assert_parse_error_case(case_name: &str, source: &str, expected_line: usize) {
    let err = parse_problem_source(source).expect_err("parse should fail");
    assert_eq!(err.line, expected_line, "{case_name}: unexpected error line");
    assert!(err.column > 0, "{case_name}: expected non-zero column");
    assert!(
        err.message.contains("Syntax error") || err.message.contains("Incomplete input"),
        "{case_name}: unexpected message '{}'",
        err.message
    );
}

/// Heat equation with Dirichlet edges and an initial condition.
fn heat_source() -> &'static str {
    r#"
    problem heat {
        coord x in (0.0, 1.0);
        time t in (0.0, 2.0);
        param nu;
        unknown u(t, x);
        eq D(u(t, x), t) == nu * D(u(t, x), x, 2);
        bc u(t, 0.0) == 0.0;
        bc D(u(t, 1.0), x) == 0.0;
        bc u(0.0, x) == sin(x);
    }
    "#
}

/// Periodic heat equation: one interface condition, no edges.
fn periodic_source() -> &'static str {
    r#"
    problem ring {
        coord x in (0.0, 1.0);
        time t in (0.0, 2.0);
        unknown u(t, x);
        eq D(u(t, x), t) == D(u(t, x), x, 2);
        bc u(t, 0.0) == u(t, 1.0);
        bc D(u(t, 0.0), x) == D(u(t, 1.0), x);
        bc u(0.0, x) == cos(x);
    }
    "#
}

/// Genuine application of `u` over `(t, x)`.
fn u_of(t: Term, x: Term) -> Term {
    Term::apply("u", [t, x])
}

// ---------------------------------------------------------------------------
// Parser
// ---------------------------------------------------------------------------

#[test]
fn parses_problem_block_structure() {
    let program = parse_problem_source(heat_source()).expect("parse should succeed");
    assert_eq!(program.problems.len(), 1);
    let problem = &program.problems[0];
    assert_eq!(problem.name, "heat");
    assert_eq!(problem.body.len(), 8);
}

#[test]
fn parses_comments_as_trivia() {
    let src = "// heading\nproblem p {\n  # note\n  coord x in (0.0, 1.0); // tail\n}\n";
    let program = parse_problem_source(src).expect("parse should succeed");
    assert_eq!(program.problems[0].body.len(), 1);
}

#[test]
fn reports_parse_errors_for_exhaustive_invalid_forms() {
    let cases = vec![
        ("missing problem name", "problem { coord x in (0.0, 1.0); }", 1usize),
        ("missing opening brace", "problem p coord x in (0.0, 1.0); }", 1),
        ("missing closing brace", "problem p { coord x in (0.0, 1.0);", 1),
        (
            "missing semicolon after coord",
            "problem p { coord x in (0.0, 1.0) }",
            1,
        ),
        ("missing domain interval", "problem p { coord x; }", 1),
        (
            "missing comma in interval",
            "problem p { coord x in (0.0 1.0); }",
            1,
        ),
        (
            "missing 'in' keyword",
            "problem p { coord x (0.0, 1.0); }",
            1,
        ),
        ("missing unknown arguments", "problem p { unknown u; }", 1),
        (
            "missing equation rhs",
            "problem p { coord x in (0.0, 1.0); unknown u(x); eq u(x) == ; }",
            1,
        ),
        (
            "missing '==' in equation",
            "problem p { coord x in (0.0, 1.0); unknown u(x); eq u(x) 0.0; }",
            1,
        ),
        (
            "missing bc semicolon",
            "problem p { coord x in (0.0, 1.0); unknown u(x); bc u(0.0) == 0.0 }",
            1,
        ),
        (
            "unclosed bc group",
            "problem p { coord x in (0.0, 1.0); unknown u(x); bc { u(0.0) == 0.0; }",
            1,
        ),
        (
            "unclosed call arguments",
            "problem p { coord x in (0.0, 1.0); unknown u(x); bc u(0.0 == 0.0; }",
            1,
        ),
        ("trailing garbage", "problem p { } trailing", 1),
        ("random garbage input", "@@@", 1),
        (
            "multiline missing rhs",
            "problem p {\ncoord x in (0.0, 1.0);\nunknown u(x);\neq u(x) == ;\n}",
            1,
        ),
    ];

    for (case_name, source, expected_line) in cases {
        assert_parse_error_case(case_name, source, expected_line);
    }
}

// ---------------------------------------------------------------------------
// Compilation (AST lowering)
// ---------------------------------------------------------------------------

#[test]
fn compiles_heat_problem() {
    let problem = compile_problem(heat_source()).expect("compile should succeed");
    assert_eq!(problem.name, "heat");
    assert_eq!(problem.coordinates, ["x"]);
    assert_eq!(problem.time.as_deref(), Some("t"));
    assert_eq!(problem.parameters, ["nu"]);
    assert_eq!(problem.unknowns, ["u"]);
    assert_eq!(problem.equations.len(), 1);
    assert_eq!(problem.flattened_conditions().len(), 3);
    assert_eq!(problem.domains["x"], Domain::new(0.0, 1.0));
    assert_eq!(problem.domains["t"], Domain::new(0.0, 2.0));
}

#[test]
fn reports_line_and_column_for_unknown_identifier() {
    let src = "problem p {\n  coord x in (0.0, 1.0);\n  unknown u(x);\n  eq u(x) == y;\n}";
    let err = compile_problem(src).expect_err("compile should fail");
    assert_eq!(err.line, 4);
    assert!(err.column > 0);
    assert!(err.to_string().contains("Unknown identifier 'y'"));
    assert_eq!(err.snippet, "  eq u(x) == y;");
    assert_eq!(first_caret_column(&err.pointer), Some(err.column));
}

#[test]
fn rejects_duplicate_declarations() {
    let src = "problem p { coord x in (0.0, 1.0); param x; }";
    let err = compile_problem(src).expect_err("compile should fail");
    assert!(err.message.contains("Duplicate declaration for 'x'"));
}

#[test]
fn rejects_second_time_coordinate() {
    let src = "problem p { time t in (0.0, 1.0); time s in (0.0, 1.0); }";
    let err = compile_problem(src).expect_err("compile should fail");
    assert!(err.message.contains("at most one time coordinate"));
}

#[test]
fn rejects_unknown_function_call() {
    let src = "problem p { coord x in (0.0, 1.0); unknown u(x); eq u(x) == g(x); }";
    let err = compile_problem(src).expect_err("compile should fail");
    assert!(err.message.contains("Unknown function 'g'"));
}

#[test]
fn rejects_unknown_with_undeclared_coordinate() {
    let src = "problem p { coord x in (0.0, 1.0); unknown u(x, y); }";
    let err = compile_problem(src).expect_err("compile should fail");
    assert!(err.message.contains("undeclared coordinate 'y'"));
}

#[test]
fn rejects_derivative_with_bad_target() {
    let src = "problem p { coord x in (0.0, 1.0); unknown u(x); eq D(u(x), 2.0) == 0.0; }";
    let err = compile_problem(src).expect_err("compile should fail");
    assert!(err.message.contains("Derivative target must be a declared coordinate"));
}

#[test]
fn rejects_derivative_with_bad_order() {
    let src = "problem p { coord x in (0.0, 1.0); unknown u(x); eq D(u(x), x, 1.5) == 0.0; }";
    let err = compile_problem(src).expect_err("compile should fail");
    assert!(err.message.contains("Derivative order must be a positive integer literal"));
}

#[test]
fn rejects_non_literal_domain_bound() {
    let src = "problem p { param a; coord x in (a, 1.0); }";
    let err = compile_problem(src).expect_err("compile should fail");
    assert!(err.message.contains("Domain bound must be a numeric literal"));
}

#[test]
fn selects_problem_by_name() {
    let src = "problem a { coord x in (0.0, 1.0); }\nproblem b { coord y in (0.0, 2.0); }";
    let err = compile_problem(src).expect_err("ambiguous source should fail");
    assert!(err.message.contains("Multiple problems found"));

    let problem = compile_named_problem(src, "b").expect("selection should succeed");
    assert_eq!(problem.coordinates, ["y"]);

    let err = compile_named_problem(src, "c").expect_err("unknown name should fail");
    assert!(err.message.contains("Requested problem 'c' was not found"));
}

#[test]
fn negative_domain_bounds_lower() {
    let src = "problem p { coord x in (-1.0, 1.0); unknown u(x); }";
    let problem = compile_problem(src).expect("compile should succeed");
    assert_eq!(problem.domains["x"], Domain::new(-1.0, 1.0));
}

#[test]
fn flattens_nested_condition_groups_in_order() {
    let src = r#"
    problem p {
        coord x in (0.0, 1.0);
        unknown u(x);
        bc u(0.0) == 0.0;
        bc {
            D(u(0.0), x) == 0.0;
            { D(u(1.0), x) == 0.0; }
        }
        bc u(1.0) == 0.0;
    }
    "#;
    let problem = compile_problem(src).expect("compile should succeed");
    let flat = problem.flattened_conditions();
    let rendered: Vec<String> = flat.iter().map(|eq| eq.to_string()).collect();
    assert_eq!(
        rendered,
        [
            "u(0) == 0",
            "D(u(0), x) == 0",
            "D(u(1), x) == 0",
            "u(1) == 0",
        ]
    );
}

// ---------------------------------------------------------------------------
// Expression inspection
// ---------------------------------------------------------------------------

#[test]
fn derivative_order_sums_nested_operators() {
    let term = Term::diff(
        Term::diff(u_of(Term::coord("t"), Term::coord("x")), "x"),
        "x",
    );
    assert_eq!(derivative_order(&term, "x"), 2);
    assert_eq!(derivative_order(&term, "t"), 0);

    let mixed = Term::diff_n(Term::diff(u_of(Term::coord("t"), Term::coord("x")), "t"), "x", 2);
    assert_eq!(derivative_order(&mixed, "x"), 2);
    assert_eq!(derivative_order(&mixed, "t"), 1);
}

#[test]
fn equation_orders_union_both_sides() {
    let u = u_of(Term::coord("t"), Term::coord("x"));
    let equation = Equation::new(
        Term::diff(u.clone(), "x") + Term::diff_n(u.clone(), "x", 2),
        Term::diff(u, "t"),
    );
    let orders: Vec<u32> = equation_derivative_orders(&equation, "x").into_iter().collect();
    assert_eq!(orders, [1, 2]);
    let t_orders: Vec<u32> = equation_derivative_orders(&equation, "t").into_iter().collect();
    assert_eq!(t_orders, [1]);
}

#[test]
fn equation_orders_accumulate_chains() {
    let u = u_of(Term::coord("t"), Term::coord("x"));
    let equation = Equation::new(Term::diff(Term::diff(u, "x"), "x"), Term::num(0.0));
    let orders: Vec<u32> = equation_derivative_orders(&equation, "x").into_iter().collect();
    assert_eq!(orders, [2]);
}

#[test]
fn detects_derivative_presence() {
    let u = u_of(Term::coord("t"), Term::coord("x"));
    assert!(!contains_derivative(&u));
    assert!(contains_derivative(&(Term::num(2.0) * Term::diff(u, "x"))));
}

#[test]
fn finds_first_derivative_or_application() {
    let u = u_of(Term::coord("t"), Term::coord("x"));
    let term = Term::num(3.0) * (Term::param("nu") + u.clone());
    let found = find_derivative_or_application(&term, "u").expect("application should be found");
    assert_eq!(found, &u);

    let derivative = Term::diff(u.clone(), "x");
    let term = Term::num(1.0) + derivative.clone();
    let found = find_derivative_or_application(&term, "v").expect("derivative should be found");
    assert_eq!(found, &derivative);

    assert!(find_derivative_or_application(&Term::num(1.0), "u").is_none());
}

#[test]
fn collects_applications_structurally() {
    let tags = vec!["u".to_string(), "v".to_string()];
    let pinned = Term::apply("u", [Term::coord("t"), Term::num(0.0)]);
    // The same structural application on both sides is reported once.
    let equation = Equation::new(
        pinned.clone() + Term::apply("v", [Term::coord("t"), Term::coord("x")]),
        Term::diff(pinned.clone(), "x"),
    );
    let apps = collect_equation_applications(&equation, &tags);
    assert_eq!(apps.len(), 2);
    assert!(apps.contains(&pinned));
}

// ---------------------------------------------------------------------------
// Variable map
// ---------------------------------------------------------------------------

#[test]
fn coordinate_index_table_is_a_bijection() {
    let src = r#"
    problem plate {
        coord x in (0.0, 1.0);
        coord y in (0.0, 1.0);
        time t in (0.0, 1.0);
        unknown u(t, x, y);
        eq D(u(t, x, y), t) == D(u(t, x, y), x, 2) + D(u(t, x, y), y, 2);
        bc u(t, 0.0, y) == 0.0;
        bc u(t, 1.0, y) == 0.0;
        bc u(t, x, 0.0) == 0.0;
        bc u(t, x, 1.0) == 0.0;
        bc u(0.0, x, y) == 0.0;
    }
    "#;
    let metadata = discretization_metadata(src).expect("analysis should succeed");
    let map = metadata.variable_map();

    assert_eq!(map.dimension_count(), 2);
    assert_eq!(map.spatial_coordinates(), ["x", "y"]);
    for (position, coord) in map.spatial_coordinates().iter().enumerate() {
        let index = map.coordinate_index(coord).expect("index should exist");
        assert_eq!(index, position + 1);
        assert_eq!(map.index_coordinate(index), Some(coord.as_str()));
    }
    assert_eq!(map.index_coordinate(0), None);
    assert_eq!(map.index_coordinate(3), None);
    assert_eq!(map.all_coordinates(), ["t", "x", "y"]);
}

#[test]
fn signature_is_recorded_from_genuine_applications() {
    let metadata = discretization_metadata(heat_source()).expect("analysis should succeed");
    let map = metadata.variable_map();
    assert_eq!(map.unknowns(), ["u"]);
    assert_eq!(map.signature("u").expect("signature should exist"), ["t", "x"]);
    assert_eq!(map.spatial_signature("u").expect("signature should exist"), ["x"]);
    assert_eq!(map.parameters(), ["nu"]);
}

#[test]
fn rejects_inconsistent_signatures() {
    let mut problem = PdeProblem::new("inconsistent");
    problem.coordinates = vec!["x".into()];
    problem.time = Some("t".into());
    problem.unknowns = vec!["u".into()];
    problem.domains.insert("x".into(), Domain::new(0.0, 1.0));
    problem.domains.insert("t".into(), Domain::new(0.0, 1.0));
    problem.equations.push(Equation::new(
        u_of(Term::coord("t"), Term::coord("x")),
        Term::num(0.0),
    ));
    // Same tag, swapped coordinate order.
    problem.equations.push(Equation::new(
        u_of(Term::coord("x"), Term::coord("t")),
        Term::num(0.0),
    ));

    let err = analyze_problem(&problem).expect_err("analysis should fail");
    match err {
        AnalysisError::SignatureInconsistency {
            function,
            first,
            second,
        } => {
            assert_eq!(function, "u");
            assert_eq!(first, ["t", "x"]);
            assert_eq!(second, ["x", "t"]);
        }
        other => panic!("expected SignatureInconsistency, got {other:?}"),
    }
}

#[test]
fn analysis_is_idempotent_over_frozen_input() {
    let problem = compile_problem(heat_source()).expect("compile should succeed");
    let first = analyze_problem(&problem).expect("analysis should succeed");
    let second = analyze_problem(&problem).expect("analysis should succeed");
    assert_eq!(first, second);
}

#[test]
fn missing_domain_fails_before_classification() {
    let mut problem = PdeProblem::new("undomained");
    problem.time = Some("t".into());
    problem.unknowns = vec!["u".into()];
    problem.domains.insert("t".into(), Domain::new(0.0, 1.0));
    // `x` is used by the unknown but never given a domain.
    problem.equations.push(Equation::new(
        Term::diff(u_of(Term::coord("t"), Term::coord("x")), "t"),
        Term::num(0.0),
    ));
    // This condition would be an interior-value error, but the domain failure
    // must surface first.
    problem
        .conditions
        .push(ConditionItem::Equation(Equation::new(
            Term::apply("u", [Term::coord("t"), Term::num(0.5)]),
            Term::num(0.0),
        )));

    let err = analyze_problem(&problem).expect_err("analysis should fail");
    match err {
        AnalysisError::DomainResolution { coordinate, .. } => assert_eq!(coordinate, "x"),
        other => panic!("expected DomainResolution, got {other:?}"),
    }
}

#[test]
fn rejects_infinite_and_degenerate_domains() {
    let mut problem = PdeProblem::new("bad-domains");
    problem.unknowns = vec!["u".into()];
    problem.domains.insert("x".into(), Domain::new(0.0, f64::INFINITY));
    problem.equations.push(Equation::new(
        Term::apply("u", [Term::coord("x")]),
        Term::num(0.0),
    ));
    let err = analyze_problem(&problem).expect_err("infinite bound should fail");
    assert!(matches!(err, AnalysisError::DomainResolution { ref coordinate, .. } if coordinate == "x"));

    problem.domains.insert("x".into(), Domain::new(0.0, 1e-12));
    let err = analyze_problem(&problem).expect_err("degenerate width should fail");
    assert!(matches!(err, AnalysisError::DomainResolution { ref coordinate, .. } if coordinate == "x"));
}

#[test]
fn register_unknown_appends_without_renumbering() {
    let problem = compile_problem(heat_source()).expect("compile should succeed");
    let mut metadata = analyze_problem(&problem).expect("analysis should succeed");

    let index_before = metadata.variable_map().coordinate_index("x");
    metadata
        .variable_map_mut()
        .register_unknown("flux", vec!["t".into(), "x".into()])
        .expect("registration should succeed");

    let map = metadata.variable_map();
    assert_eq!(map.unknowns(), ["u", "flux"]);
    assert_eq!(map.signature("flux").expect("signature should exist"), ["t", "x"]);
    assert_eq!(map.coordinate_index("x"), index_before);

    // Re-registering with the recorded signature is a no-op.
    metadata
        .variable_map_mut()
        .register_unknown("flux", vec!["t".into(), "x".into()])
        .expect("idempotent registration should succeed");
    assert_eq!(metadata.variable_map().unknowns(), ["u", "flux"]);

    // A conflicting signature is flagged, not resolved by guessing.
    let err = metadata
        .variable_map_mut()
        .register_unknown("flux", vec!["x".into(), "t".into()])
        .expect_err("conflicting signature should fail");
    assert!(matches!(err, AnalysisError::SignatureInconsistency { .. }));

    // An unknown over an unresolved coordinate is rejected.
    let err = metadata
        .variable_map_mut()
        .register_unknown("w", vec!["z".into()])
        .expect_err("unresolved coordinate should fail");
    assert!(matches!(err, AnalysisError::DomainResolution { ref coordinate, .. } if coordinate == "z"));
}

// ---------------------------------------------------------------------------
// Boundary classification
// ---------------------------------------------------------------------------

#[test]
fn classifies_lower_edge_condition() {
    let metadata = discretization_metadata(heat_source()).expect("analysis should succeed");
    let boundaries = metadata.boundary_map().boundaries("u", "x");
    assert_eq!(boundaries.len(), 2);

    match &boundaries[0] {
        Boundary::Edge {
            function,
            coordinate,
            upper,
            order,
            ..
        } => {
            assert_eq!(function, "u");
            assert_eq!(coordinate, "x");
            assert!(!upper);
            assert_eq!(*order, 0);
        }
        other => panic!("expected Edge, got {other:?}"),
    }
}

#[test]
fn classifies_upper_edge_with_derivative_order() {
    let metadata = discretization_metadata(heat_source()).expect("analysis should succeed");
    let boundaries = metadata.boundary_map().boundaries("u", "x");
    match &boundaries[1] {
        Boundary::Edge { upper, order, .. } => {
            assert!(upper);
            assert_eq!(*order, 1);
        }
        other => panic!("expected Edge, got {other:?}"),
    }
}

#[test]
fn classifies_initial_condition_under_time() {
    let metadata = discretization_metadata(heat_source()).expect("analysis should succeed");
    let boundaries = metadata.boundary_map().boundaries("u", "t");
    assert_eq!(boundaries.len(), 1);
    match &boundaries[0] {
        Boundary::Edge {
            coordinate, upper, order, ..
        } => {
            assert_eq!(coordinate, "t");
            assert!(!upper);
            assert_eq!(*order, 0);
        }
        other => panic!("expected Edge, got {other:?}"),
    }
}

#[test]
fn tangential_derivatives_do_not_affect_edge_order() {
    // The condition is first-order in t but pins x; the edge order is 0.
    let src = r#"
    problem advect {
        coord x in (0.0, 1.0);
        time t in (0.0, 1.0);
        unknown u(t, x);
        eq D(u(t, x), t) == D(u(t, x), x);
        bc D(u(t, 0.0), t) == 0.0;
        bc u(0.0, x) == 0.0;
    }
    "#;
    let metadata = discretization_metadata(src).expect("analysis should succeed");
    match &metadata.boundary_map().boundaries("u", "x")[0] {
        Boundary::Edge { order, upper, .. } => {
            assert_eq!(*order, 0);
            assert!(!upper);
        }
        other => panic!("expected Edge, got {other:?}"),
    }
}

#[test]
fn robin_condition_takes_higher_order_of_both_sides() {
    let src = r#"
    problem robin {
        coord x in (0.0, 1.0);
        time t in (0.0, 1.0);
        unknown u(t, x);
        eq D(u(t, x), t) == D(u(t, x), x, 2);
        bc D(u(t, 0.0), x) == u(t, 0.0);
        bc u(t, 1.0) == 0.0;
        bc u(0.0, x) == 0.0;
    }
    "#;
    let metadata = discretization_metadata(src).expect("analysis should succeed");
    match &metadata.boundary_map().boundaries("u", "x")[0] {
        Boundary::Edge { order, upper, .. } => {
            assert_eq!(*order, 1);
            assert!(!upper);
        }
        other => panic!("expected Edge, got {other:?}"),
    }
}

#[test]
fn classifies_periodic_interface() {
    let metadata = discretization_metadata(periodic_source()).expect("analysis should succeed");
    let boundaries = metadata.boundary_map().boundaries("u", "x");
    assert_eq!(boundaries.len(), 2);

    match &boundaries[0] {
        Boundary::Interface { ends, .. } => {
            assert_eq!(ends[0].function, "u");
            assert_eq!(ends[1].function, "u");
            assert_eq!(ends[0].coordinate, "x");
            assert!(!ends[0].upper);
            assert!(ends[1].upper);
        }
        other => panic!("expected Interface, got {other:?}"),
    }

    assert!(metadata.periodic_map().is_periodic("u", "x"));
    assert!(!metadata.periodic_map().is_periodic("u", "t"));
    assert!(metadata.periodic_map().any_periodic());
}

#[test]
fn classifies_higher_order_interface() {
    let metadata = discretization_metadata(periodic_source()).expect("analysis should succeed");
    let boundaries = metadata.boundary_map().boundaries("u", "x");
    match &boundaries[1] {
        Boundary::HigherOrderInterface {
            ends,
            functions,
            coordinates,
            order,
            ..
        } => {
            assert_eq!(*order, 1);
            assert!(functions.contains("u"));
            assert_eq!(functions.len(), 1);
            assert!(coordinates.contains("x"));
            assert_eq!(coordinates.len(), 1);
            assert!(ends[0].upper != ends[1].upper);
        }
        other => panic!("expected HigherOrderInterface, got {other:?}"),
    }
    assert!(metadata.periodic_map().is_periodic("u", "x"));
}

#[test]
fn two_region_interface_files_under_both_functions() {
    let src = r#"
    problem coupled {
        coord x in (0.0, 1.0);
        time t in (0.0, 1.0);
        unknown u(t, x);
        unknown v(t, x);
        eq D(u(t, x), t) == D(u(t, x), x, 2);
        eq D(v(t, x), t) == D(v(t, x), x, 2);
        bc u(t, 1.0) == v(t, 0.0);
        bc u(t, 0.0) == 0.0;
        bc v(t, 1.0) == 0.0;
        bc u(0.0, x) == 0.0;
        bc v(0.0, x) == 0.0;
    }
    "#;
    let metadata = discretization_metadata(src).expect("analysis should succeed");
    let map = metadata.boundary_map();

    let under_u = map.boundaries("u", "x");
    let under_v = map.boundaries("v", "x");
    assert!(matches!(&under_u[0], Boundary::Interface { .. }));
    assert!(matches!(&under_v[0], Boundary::Interface { .. }));

    match &under_u[0] {
        Boundary::Interface { ends, .. } => {
            assert_eq!(ends[0].function, "u");
            assert!(ends[0].upper);
            assert_eq!(ends[1].function, "v");
            assert!(!ends[1].upper);
        }
        other => panic!("expected Interface, got {other:?}"),
    }

    // Coupling two different functions is not a periodic pairing.
    assert!(!metadata.periodic_map().is_periodic("u", "x"));
    assert!(!metadata.periodic_map().is_periodic("v", "x"));
    assert!(!metadata.periodic_map().any_periodic());
}

#[test]
fn interior_point_condition_is_unclassifiable() {
    let src = r#"
    problem interior {
        coord x in (0.0, 1.0);
        time t in (0.0, 1.0);
        unknown u(t, x);
        eq D(u(t, x), t) == D(u(t, x), x, 2);
        bc u(t, 0.5) == 0.0;
    }
    "#;
    let problem = compile_problem(src).expect("compile should succeed");
    let err = analyze_problem(&problem).expect_err("analysis should fail");
    match err {
        AnalysisError::UnclassifiableBoundary { equation, reason } => {
            assert_eq!(equation.to_string(), "u(t, 0.5) == 0");
            match reason {
                UnclassifiableReason::InteriorValue { coordinate, value } => {
                    assert_eq!(coordinate, "x");
                    assert_eq!(value, 0.5);
                }
                other => panic!("expected InteriorValue, got {other:?}"),
            }
        }
        other => panic!("expected UnclassifiableBoundary, got {other:?}"),
    }
}

#[test]
fn terminal_time_condition_is_unclassifiable() {
    let src = r#"
    problem terminal {
        coord x in (0.0, 1.0);
        time t in (0.0, 2.0);
        unknown u(t, x);
        eq D(u(t, x), t) == D(u(t, x), x, 2);
        bc u(2.0, x) == 0.0;
    }
    "#;
    let problem = compile_problem(src).expect("compile should succeed");
    let err = analyze_problem(&problem).expect_err("analysis should fail");
    match err {
        AnalysisError::UnclassifiableBoundary { reason, .. } => {
            assert!(matches!(
                reason,
                UnclassifiableReason::TerminalTimeCondition { ref coordinate } if coordinate == "t"
            ));
        }
        other => panic!("expected UnclassifiableBoundary, got {other:?}"),
    }
}

#[test]
fn corner_condition_is_unclassifiable() {
    let src = r#"
    problem corner {
        coord x in (0.0, 1.0);
        time t in (0.0, 1.0);
        unknown u(t, x);
        eq D(u(t, x), t) == D(u(t, x), x, 2);
        bc u(0.0, 0.0) == 0.0;
    }
    "#;
    let problem = compile_problem(src).expect("compile should succeed");
    let err = analyze_problem(&problem).expect_err("analysis should fail");
    match err {
        AnalysisError::UnclassifiableBoundary { reason, .. } => {
            assert!(matches!(
                reason,
                UnclassifiableReason::MultipleFixedCoordinates { ref function } if function == "u"
            ));
        }
        other => panic!("expected UnclassifiableBoundary, got {other:?}"),
    }
}

#[test]
fn free_condition_is_unclassifiable() {
    let src = r#"
    problem free {
        coord x in (0.0, 1.0);
        time t in (0.0, 1.0);
        unknown u(t, x);
        eq D(u(t, x), t) == D(u(t, x), x, 2);
        bc u(t, x) == 0.0;
    }
    "#;
    let problem = compile_problem(src).expect("compile should succeed");
    let err = analyze_problem(&problem).expect_err("analysis should fail");
    match err {
        AnalysisError::UnclassifiableBoundary { reason, .. } => {
            assert!(matches!(reason, UnclassifiableReason::NoFixedCoordinate));
        }
        other => panic!("expected UnclassifiableBoundary, got {other:?}"),
    }
}

#[test]
fn more_than_two_pinned_applications_are_unclassifiable() {
    let src = r#"
    problem crowded {
        coord x in (0.0, 1.0);
        time t in (0.0, 1.0);
        unknown u(t, x);
        unknown v(t, x);
        unknown w(t, x);
        eq D(u(t, x), t) == D(u(t, x), x, 2);
        eq D(v(t, x), t) == D(v(t, x), x, 2);
        eq D(w(t, x), t) == D(w(t, x), x, 2);
        bc u(t, 0.0) + v(t, 0.0) == w(t, 1.0);
    }
    "#;
    let problem = compile_problem(src).expect("compile should succeed");
    let err = analyze_problem(&problem).expect_err("analysis should fail");
    match err {
        AnalysisError::UnclassifiableBoundary { reason, .. } => {
            assert!(matches!(
                reason,
                UnclassifiableReason::TooManyApplications { count: 3 }
            ));
        }
        other => panic!("expected UnclassifiableBoundary, got {other:?}"),
    }
}

#[test]
fn unpinned_second_function_is_unclassifiable() {
    let src = r#"
    problem stray {
        coord x in (0.0, 1.0);
        time t in (0.0, 1.0);
        unknown u(t, x);
        unknown v(t, x);
        eq D(u(t, x), t) == D(u(t, x), x, 2);
        eq D(v(t, x), t) == D(v(t, x), x, 2);
        bc u(t, 0.0) == v(t, x);
    }
    "#;
    let problem = compile_problem(src).expect("compile should succeed");
    let err = analyze_problem(&problem).expect_err("analysis should fail");
    match err {
        AnalysisError::UnclassifiableBoundary { reason, .. } => {
            assert!(matches!(
                reason,
                UnclassifiableReason::UnpinnedFunctionReference { ref function } if function == "v"
            ));
        }
        other => panic!("expected UnclassifiableBoundary, got {other:?}"),
    }
}

#[test]
fn mismatched_interface_ends_are_unclassifiable() {
    let mut problem = PdeProblem::new("mismatched");
    problem.coordinates = vec!["x".into(), "y".into()];
    problem.time = Some("t".into());
    problem.unknowns = vec!["u".into()];
    problem.domains.insert("t".into(), Domain::new(0.0, 1.0));
    problem.domains.insert("x".into(), Domain::new(0.0, 1.0));
    problem.domains.insert("y".into(), Domain::new(0.0, 1.0));
    problem.equations.push(Equation::new(
        Term::diff(
            Term::apply("u", [Term::coord("t"), Term::coord("x"), Term::coord("y")]),
            "t",
        ),
        Term::num(0.0),
    ));
    // The free coordinates disagree: (t, _, y) versus (t, _, x).
    problem
        .conditions
        .push(ConditionItem::Equation(Equation::new(
            Term::apply("u", [Term::coord("t"), Term::num(0.0), Term::coord("y")]),
            Term::apply("u", [Term::coord("t"), Term::num(1.0), Term::coord("x")]),
        )));

    let err = analyze_problem(&problem).expect_err("analysis should fail");
    match err {
        AnalysisError::UnclassifiableBoundary { reason, .. } => {
            assert!(matches!(reason, UnclassifiableReason::MismatchedEnds));
        }
        other => panic!("expected UnclassifiableBoundary, got {other:?}"),
    }
}

#[test]
fn arity_mismatch_is_unclassifiable() {
    let mut problem = PdeProblem::new("arity");
    problem.coordinates = vec!["x".into()];
    problem.time = Some("t".into());
    problem.unknowns = vec!["u".into()];
    problem.domains.insert("t".into(), Domain::new(0.0, 1.0));
    problem.domains.insert("x".into(), Domain::new(0.0, 1.0));
    problem.equations.push(Equation::new(
        Term::diff(u_of(Term::coord("t"), Term::coord("x")), "t"),
        Term::num(0.0),
    ));
    problem
        .conditions
        .push(ConditionItem::Equation(Equation::new(
            Term::apply("u", [Term::num(0.0)]),
            Term::num(0.0),
        )));

    let err = analyze_problem(&problem).expect_err("analysis should fail");
    match err {
        AnalysisError::UnclassifiableBoundary { reason, .. } => {
            assert!(matches!(
                reason,
                UnclassifiableReason::ArityMismatch { ref function } if function == "u"
            ));
        }
        other => panic!("expected UnclassifiableBoundary, got {other:?}"),
    }
}

#[test]
fn same_point_on_both_sides_stays_an_edge() {
    // u(t,0) appears on both sides with different derivative orders; the
    // condition pins one point and keeps the higher order.
    let src = r#"
    problem both_sides {
        coord x in (0.0, 1.0);
        time t in (0.0, 1.0);
        unknown u(t, x);
        eq D(u(t, x), t) == D(u(t, x), x, 2);
        bc D(u(t, 0.0), x, 2) == D(u(t, 0.0), x);
        bc u(0.0, x) == 0.0;
    }
    "#;
    let metadata = discretization_metadata(src).expect("analysis should succeed");
    match &metadata.boundary_map().boundaries("u", "x")[0] {
        Boundary::Edge { order, upper, .. } => {
            assert_eq!(*order, 2);
            assert!(!upper);
        }
        other => panic!("expected Edge, got {other:?}"),
    }
}

#[test]
fn bound_matching_honors_tolerance() {
    let src = r#"
    problem tolerant {
        coord x in (0.0, 1.0);
        time t in (0.0, 1.0);
        unknown u(t, x);
        eq D(u(t, x), t) == D(u(t, x), x, 2);
        bc u(t, 0.9999) == 0.0;
        bc u(0.0, x) == 0.0;
    }
    "#;
    let problem = compile_problem(src).expect("compile should succeed");

    // Default tolerance treats 0.9999 as interior.
    let err = analyze_problem(&problem).expect_err("default tolerance should fail");
    assert!(matches!(err, AnalysisError::UnclassifiableBoundary { .. }));

    // A loose tolerance snaps it onto the upper bound.
    let options = AnalysisOptions {
        bound_tolerance: 1e-3,
        ..AnalysisOptions::default()
    };
    let metadata = analyze_problem_with(&problem, &options, &NoValidation)
        .expect("loose tolerance should succeed");
    match &metadata.boundary_map().boundaries("u", "x")[0] {
        Boundary::Edge { upper, .. } => assert!(upper),
        other => panic!("expected Edge, got {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// Assembly and validation
// ---------------------------------------------------------------------------

#[test]
fn boundary_map_preserves_input_order_per_pair() {
    let src = r#"
    problem ordered {
        coord x in (0.0, 1.0);
        unknown u(x);
        eq D(u(x), x, 2) == 0.0;
        bc u(0.0) == 0.0;
        bc {
            D(u(0.0), x) == 0.0;
            { D(u(1.0), x) == 0.0; }
        }
        bc u(1.0) == 0.0;
    }
    "#;
    let metadata = discretization_metadata(src).expect("analysis should succeed");
    let rendered: Vec<String> = metadata
        .boundary_map()
        .boundaries("u", "x")
        .iter()
        .map(|b| b.equation().to_string())
        .collect();
    assert_eq!(
        rendered,
        [
            "u(0) == 0",
            "D(u(0), x) == 0",
            "D(u(1), x) == 0",
            "u(1) == 0",
        ]
    );
}

#[test]
fn edge_coverage_validation_accepts_complete_maps() {
    let problem = compile_problem(heat_source()).expect("compile should succeed");
    analyze_problem_with(
        &problem,
        &AnalysisOptions::default(),
        &EdgeCoverageValidation,
    )
    .expect("covered map should validate");
}

#[test]
fn edge_coverage_validation_rejects_missing_edges() {
    let src = r#"
    problem uncovered {
        coord x in (0.0, 1.0);
        time t in (0.0, 1.0);
        unknown u(t, x);
        eq D(u(t, x), t) == D(u(t, x), x, 2);
        bc u(t, 0.0) == 0.0;
        bc u(0.0, x) == 0.0;
    }
    "#;
    let problem = compile_problem(src).expect("compile should succeed");
    let err = analyze_problem_with(
        &problem,
        &AnalysisOptions::default(),
        &EdgeCoverageValidation,
    )
    .expect_err("uncovered map should fail");
    match err {
        AnalysisError::Validation { message } => {
            assert!(message.contains("'u'"));
            assert!(message.contains("upper edge condition"));
            assert!(message.contains("'x'"));
        }
        other => panic!("expected Validation, got {other:?}"),
    }
}

#[test]
fn edge_coverage_validation_accepts_periodic_coverage() {
    let problem = compile_problem(periodic_source()).expect("compile should succeed");
    analyze_problem_with(
        &problem,
        &AnalysisOptions::default(),
        &EdgeCoverageValidation,
    )
    .expect("interface coverage should validate");
}

#[test]
fn max_derivative_orders_come_from_governing_equations() {
    let metadata = discretization_metadata(heat_source()).expect("analysis should succeed");
    assert_eq!(metadata.max_derivative_order("x"), 2);
    assert_eq!(metadata.max_derivative_order("t"), 1);
    assert_eq!(metadata.max_derivative_order("missing"), 0);
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

#[test]
fn terms_render_compactly() {
    let u = u_of(Term::coord("t"), Term::coord("x"));
    let equation = Equation::new(
        Term::diff(u.clone(), "t"),
        Term::param("nu") * Term::diff_n(u, "x", 2),
    );
    assert_eq!(
        equation.to_string(),
        "D(u(t, x), t) == (nu * D(u(t, x), x, 2))"
    );
    assert_eq!(Term::call("sin", [Term::coord("x")]).to_string(), "sin(x)");
    assert_eq!((-Term::num(2.0)).to_string(), "(-2)");
}

#[test]
fn analysis_errors_render_with_context() {
    let err = AnalysisError::DomainResolution {
        coordinate: "x".into(),
        detail: "no domain interval is declared".to_string(),
    };
    assert_eq!(
        err.to_string(),
        "Cannot resolve domain for coordinate 'x': no domain interval is declared"
    );

    let err = AnalysisError::UnclassifiableBoundary {
        equation: Equation::new(
            Term::apply("u", [Term::coord("t"), Term::num(0.5)]),
            Term::num(0.0),
        ),
        reason: UnclassifiableReason::InteriorValue {
            coordinate: "x".into(),
            value: 0.5,
        },
    };
    let rendered = err.to_string();
    assert!(rendered.contains("u(t, 0.5) == 0"));
    assert!(rendered.contains("matches neither domain bound"));
}

#[test]
fn problem_error_wraps_both_stages() {
    let compile_err = discretization_metadata("problem p {").expect_err("parse should fail");
    assert!(matches!(compile_err, ProblemError::Compile(_)));

    let analysis_err = discretization_metadata(
        r#"
        problem p {
            coord x in (0.0, 1.0);
            unknown u(x);
            bc u(0.5) == 0.0;
        }
        "#,
    )
    .expect_err("classification should fail");
    assert!(matches!(analysis_err, ProblemError::Analysis(_)));
}
