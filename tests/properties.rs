//! Property tests for the general grammar guarantees.
mod common;
use common::*;
use flowdsl::prelude::*;
use proptest::prelude::*;

/// Identifiers that start with a letter or underscore, so they never lex as numbers.
fn node_id() -> impl Strategy<Value = String> {
    "[a-z_][a-z0-9_]{0,6}"
}

fn node_tree() -> impl Strategy<Value = Node> {
    let leaf = node_id().prop_map(Node::plain);
    leaf.prop_recursive(6, 64, 4, |inner| {
        let branch = prop::collection::vec(inner, 1..4).prop_map(Param::from_branch);
        prop_oneof![
            (node_id(), prop::collection::vec(branch.clone(), 1..4))
                .prop_map(|(id, params)| Node::combinator(NodeType::Parallel, id, params)),
            (node_id(), branch)
                .prop_map(|(id, body)| Node::combinator(NodeType::Iteration, id, vec![body])),
            (node_id(), any::<u32>())
                .prop_map(|(id, count)| Node::combinator(NodeType::Retry, id, vec![count.into()])),
        ]
    })
}

proptest! {
    #[test]
    fn plain_chain_parses_to_plain_nodes(ids in prop::collection::vec(node_id(), 1..20)) {
        let flow = parse_ok(&ids.join(" -> "));

        prop_assert_eq!(flow.len(), ids.len());
        for (node, id) in flow.iter().zip(&ids) {
            prop_assert_eq!(node.node_id(), id.as_str());
            prop_assert_eq!(node.node_type(), &NodeType::Plain);
            prop_assert!(node.params().is_none());
        }
    }

    #[test]
    fn single_element_branch_is_a_bare_node(id in node_id(), inner in node_tree()) {
        let flow = parse_ok(&format!("(iteration, {}, {})", id, inner));
        let params = flow[0].params().unwrap();
        prop_assert_eq!(params, &[Param::Node(inner)][..]);
    }

    #[test]
    fn multi_element_branch_is_an_ordered_sequence(ids in prop::collection::vec(node_id(), 2..10)) {
        let flow = parse_ok(&format!("(parallel, p, {}, tail)", ids.join(" -> ")));
        let params = flow[0].params().unwrap();

        match &params[0] {
            Param::Sequence(nodes) => {
                let got: Vec<_> = nodes.iter().map(|n| n.node_id()).collect();
                prop_assert_eq!(got, ids.iter().map(String::as_str).collect::<Vec<_>>());
            }
            other => prop_assert!(false, "Expected a sequence, got {:?}", other),
        }
        prop_assert_eq!(&params[1], &single(plain("tail")));
    }

    #[test]
    fn retry_count_is_a_raw_number(count in any::<u32>()) {
        let flow = parse_ok(&format!("(retry, r, {})", count));
        prop_assert_eq!(flow[0].params().unwrap(), &[Param::Count(count)][..]);
    }

    #[test]
    fn nesting_depth_is_preserved(depth in 0usize..120) {
        prop_assert_eq!(parse_ok(&nested_iterations(depth)).depth(), depth);
    }

    #[test]
    fn canonical_text_reparses_to_same_tree(nodes in prop::collection::vec(node_tree(), 1..4)) {
        let flow = Flow::new(nodes);
        let text = flow.to_string();
        prop_assert_eq!(parse_ok(&text), flow);
    }
}
