//! Property-based tests over random sequences and random documents.
//!
//! Small alphabets keep the inputs full of repeated tokens, which is where
//! the algorithms disagree most.

use diffx::operations;
use diffx::{
    Algorithm, BalanceCheck, DefaultEquality, DiffConfig, DiffHandler, DiffProcessor, MuxHandler,
    OperationBuffer, XmlToken,
};
use proptest::prelude::*;

fn sequence() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(0u8..5, 0..24)
}

fn lcs_length(a: &[u8], b: &[u8]) -> usize {
    let mut row = vec![0; b.len() + 1];
    for x in a {
        let mut diagonal = 0;
        for (j, y) in b.iter().enumerate() {
            let above = row[j + 1];
            row[j + 1] = if x == y {
                diagonal + 1
            } else {
                row[j + 1].max(row[j])
            };
            diagonal = above;
        }
    }
    row[b.len()]
}

/// A generated document node.
#[derive(Debug, Clone)]
enum Node {
    Text(u8),
    Element {
        name: u8,
        id: Option<u8>,
        children: Vec<Node>,
    },
}

fn node() -> impl Strategy<Value = Node> {
    let leaf = (0u8..4).prop_map(Node::Text);
    leaf.prop_recursive(4, 32, 4, |inner| {
        (0u8..3, prop::option::of(0u8..2), prop::collection::vec(inner, 0..4)).prop_map(
            |(name, id, children)| Node::Element { name, id, children },
        )
    })
}

fn document() -> impl Strategy<Value = Vec<XmlToken>> {
    prop::collection::vec(node(), 0..5).prop_map(|children| {
        let mut tokens = Vec::new();
        flatten(
            &Node::Element {
                name: 9,
                id: None,
                children,
            },
            &mut tokens,
        );
        tokens
    })
}

fn flatten(node: &Node, out: &mut Vec<XmlToken>) {
    match node {
        Node::Text(text) => out.push(XmlToken::text(format!("t{}", text))),
        Node::Element { name, id, children } => {
            let name = format!("e{}", name);
            out.push(XmlToken::start(name.as_str()));
            if let Some(id) = id {
                out.push(XmlToken::attribute("id", id.to_string()));
            }
            for child in children {
                flatten(child, out);
            }
            out.push(XmlToken::end(name));
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn scripts_rebuild_target(from in sequence(), to in sequence()) {
        for algorithm in Algorithm::ALL.into_iter().filter(|a| !a.is_structured()) {
            let mut buffer = OperationBuffer::new();
            algorithm
                .create(DefaultEquality, false)
                .unwrap()
                .diff(&from, &to, &mut buffer)
                .unwrap();
            let ops = buffer.into_operations();
            prop_assert_eq!(operations::apply(&from, &ops).unwrap(), to.clone());
            prop_assert_eq!(operations::generate(&ops, false), from.clone());
        }
    }

    #[test]
    fn minimal_algorithms_agree_with_lcs(from in sequence(), to in sequence()) {
        let expected = from.len() + to.len() - 2 * lcs_length(&from, &to);
        for algorithm in Algorithm::ALL.into_iter().filter(|a| a.is_minimal()) {
            let mut buffer = OperationBuffer::new();
            DiffProcessor::new(DiffConfig::new(algorithm))
                .diff(&from, &to, &mut buffer)
                .unwrap();
            prop_assert_eq!(buffer.edit_count(), expected, "{}", algorithm);
        }
    }

    #[test]
    fn flipped_script_rebuilds_source(from in sequence(), to in sequence()) {
        for algorithm in Algorithm::ALL.into_iter().filter(|a| !a.is_structured()) {
            let mut buffer = OperationBuffer::new();
            DiffProcessor::new(DiffConfig::new(algorithm))
                .diff(&from, &to, &mut buffer)
                .unwrap();
            let back = operations::flip(buffer.operations());
            prop_assert_eq!(operations::apply(&to, &back).unwrap(), from.clone());
        }
    }

    #[test]
    fn identical_input_is_all_matches(tokens in sequence()) {
        for algorithm in Algorithm::ALL.into_iter().filter(|a| !a.is_structured()) {
            let mut buffer = OperationBuffer::new();
            DiffProcessor::new(DiffConfig::new(algorithm).with_slice(false))
                .diff(&tokens, &tokens, &mut buffer)
                .unwrap();
            prop_assert_eq!(buffer.edit_count(), 0);
            prop_assert_eq!(buffer.len(), tokens.len());
        }
    }

    #[test]
    fn structured_scripts_are_well_formed(from in document(), to in document(), slice: bool) {
        for algorithm in Algorithm::ALL.into_iter().filter(|a| a.is_structured()) {
            let mut mux = MuxHandler::new(OperationBuffer::new(), BalanceCheck::new());
            DiffProcessor::new(DiffConfig::new(algorithm).with_slice(slice))
                .diff_structured(&from, &to, &mut mux)
                .unwrap();
            let (buffer, check) = mux.into_inner();
            prop_assert!(check.is_balanced(), "{}: {:?}", algorithm, check.errors());
            prop_assert_eq!(
                operations::apply(&from, buffer.operations()).unwrap(),
                to.clone()
            );
        }
    }

    #[test]
    fn balance_check_accepts_generated_documents(tokens in document()) {
        let mut check = BalanceCheck::new();
        let ops: Vec<_> = tokens.iter().cloned().map(diffx::Operation::matched).collect();
        operations::replay(&ops, &mut check);
        prop_assert!(check.is_balanced());
        prop_assert!(diffx::xml::is_balanced(&tokens));
    }
}

#[test]
fn balance_check_resets_between_runs() {
    let mut check = BalanceCheck::new();
    check.handle(diffx::Operator::Insert, &XmlToken::start("open"));
    check.end();
    assert!(!check.is_balanced());
    operations::replay(&[diffx::Operation::matched(XmlToken::text("x"))], &mut check);
    assert!(check.is_balanced());
}
