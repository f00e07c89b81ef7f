//! Tests for the grammar: sequences, combinators and branch normalization.
mod common;
use common::*;
use flowdsl::prelude::*;

#[test]
fn test_parse_plain_flow() {
    let flow = parse_ok("a -> b -> c");
    assert_eq!(flow, vec![plain("a"), plain("b"), plain("c")]);
    assert!(flow.iter().all(|n| n.params().is_none()));
}

#[test]
fn test_parse_single_plain_node() {
    assert_eq!(parse_ok("start"), vec![plain("start")]);
}

#[test]
fn test_parse_iteration_node_with_flow() {
    let flow = parse_ok("(iteration, a, b -> c)");
    assert_eq!(flow, vec![iteration("a", vec![seq(&["b", "c"])])]);
}

#[test]
fn test_parse_parallel_node_with_flow() {
    let flow = parse_ok("a -> (parallel, b, c -> d, e)");
    assert_eq!(
        flow,
        vec![
            plain("a"),
            // single node branches are not wrapped in a sequence
            parallel("b", vec![seq(&["c", "d"]), single(plain("e"))]),
        ]
    );
}

#[test]
fn test_parse_retry() {
    let flow = parse_ok("(retry, a, 3)");
    assert_eq!(flow, vec![retry("a", 3)]);
    assert_eq!(flow[0].params().unwrap()[0].as_count(), Some(3));
}

#[test]
fn test_parse_nested_complex_nodes() {
    let flow = parse_ok("(iteration, a, b -> (parallel, e, f -> g, h))");
    assert_eq!(
        flow,
        vec![iteration(
            "a",
            vec![Param::Sequence(vec![
                plain("b"),
                parallel("e", vec![seq(&["f", "g"]), single(plain("h"))]),
            ])]
        )]
    );
}

#[test]
fn test_single_element_branch_is_unwrapped() {
    let flow = parse_ok("(iteration, a, b)");
    assert_eq!(flow, vec![iteration("a", vec![single(plain("b"))])]);
}

#[test]
fn test_single_combinator_branch_is_unwrapped() {
    let flow = parse_ok("(parallel, p, (retry, r, 2), x -> y)");
    assert_eq!(
        flow,
        vec![parallel("p", vec![single(retry("r", 2)), seq(&["x", "y"])])]
    );
}

#[test]
fn test_combinators_in_sequence() {
    let flow = parse_ok("(retry, a, 1) -> (retry, b, 2) -> c");
    assert_eq!(flow, vec![retry("a", 1), retry("b", 2), plain("c")]);
}

#[test]
fn test_whitespace_is_insignificant() {
    let compact = parse_ok("a->(parallel,b,c->d,e)");
    let spaced = parse_ok("  a \n ->\t( parallel , b ,\n c -> d , e )  ");
    assert_eq!(compact, spaced);
}

#[test]
fn test_params_keep_source_order() {
    let flow = parse_ok("(parallel, p, a, b, c, d)");
    let ids: Vec<_> = flow[0]
        .params()
        .unwrap()
        .iter()
        .flat_map(|p| p.nodes())
        .map(|n| n.node_id())
        .collect();
    assert_eq!(ids, vec!["a", "b", "c", "d"]);
}

#[test]
fn test_node_ids_are_not_checked_for_uniqueness() {
    let flow = parse_ok("a -> a -> (iteration, a, a)");
    assert_eq!(flow.len(), 3);
    assert_eq!(flow.node_count(), 4);
}

#[test]
fn test_numeric_node_ids() {
    let flow = parse_ok("1711528914102 -> (retry, 1711528915811, 2)");
    assert_eq!(flow, vec![plain("1711528914102"), retry("1711528915811", 2)]);
}

#[test]
fn test_retry_count_zero_is_accepted() {
    assert_eq!(parse_ok("(retry, a, 0)"), vec![retry("a", 0)]);
}

#[test]
fn test_deep_nesting_matches_source_depth() {
    let flow = parse_ok(&nested_iterations(64));
    assert_eq!(flow.depth(), 64);

    let mut node = &flow[0];
    for level in 0..64 {
        assert_eq!(node.node_id(), format!("l{}", level));
        match &node.params().unwrap()[0] {
            Param::Node(inner) => node = inner,
            other => panic!("Expected an unwrapped branch, got {:?}", other),
        }
    }
    assert_eq!(node, &plain("leaf"));
}

#[test]
fn test_parallel_inside_iteration_inside_parallel() {
    let flow = parse_ok("(parallel, p1, (iteration, i, (parallel, p2, a, b -> c)), d)");
    assert_eq!(
        flow,
        vec![parallel(
            "p1",
            vec![
                single(iteration(
                    "i",
                    vec![single(parallel("p2", vec![single(plain("a")), seq(&["b", "c"])]))]
                )),
                single(plain("d")),
            ]
        )]
    );
    assert_eq!(flow.depth(), 3);
}

#[test]
fn test_parser_is_reusable_and_shareable() {
    let parser = std::sync::Arc::new(FlowParser::new());
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let parser = parser.clone();
            std::thread::spawn(move || parser.parse(&format!("a{} -> (retry, b, {})", i, i)))
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let flow = handle.join().unwrap().unwrap();
        assert_eq!(
            flow,
            vec![plain(&format!("a{}", i)), retry("b", i as u32)]
        );
    }
}
