//! Behaviour shared by every unstructured algorithm.
//!
//! Each case runs all six algorithms through [`Algorithm::create`] and checks
//! the script against the inputs: it must rebuild both sides, and the
//! minimal algorithms must reach the LCS bound.

use diffx::operations;
use diffx::{
    Algorithm, DefaultEquality, DiffConfig, DiffProcessor, Operation, OperationBuffer, Operator,
};

fn plain_algorithms() -> impl Iterator<Item = Algorithm> {
    Algorithm::ALL.into_iter().filter(|a| !a.is_structured())
}

fn chars(s: &str) -> Vec<char> {
    s.chars().collect()
}

fn run(algorithm: Algorithm, from: &[char], to: &[char]) -> Vec<Operation<char>> {
    let mut buffer = OperationBuffer::new();
    algorithm
        .create(DefaultEquality, false)
        .unwrap()
        .diff(from, to, &mut buffer)
        .unwrap();
    buffer.into_operations()
}

/// Plain dynamic-programming LCS length.
fn lcs_length(a: &[char], b: &[char]) -> usize {
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

const PAIRS: &[(&str, &str)] = &[
    ("abcabba", "cbabac"),
    ("kitten", "sitting"),
    ("axbxc", "bxaxc"),
    ("the quick brown fox", "the quick red fox jumps"),
    ("aaaa", "aa"),
    ("abcdef", "fedcba"),
    ("ab", "ab"),
    ("xyz", "abc"),
    ("a", ""),
    ("", "a"),
    ("", ""),
    ("mississippi", "missouri"),
];

#[test]
fn test_scripts_rebuild_both_sides() {
    for algorithm in plain_algorithms() {
        for (from, to) in PAIRS {
            let (from, to) = (chars(from), chars(to));
            let ops = run(algorithm, &from, &to);
            assert_eq!(
                operations::apply(&from, &ops).unwrap(),
                to,
                "{} on {:?} -> {:?}",
                algorithm,
                from,
                to
            );
            assert_eq!(operations::generate(&ops, false), from, "{}", algorithm);
            assert_eq!(operations::generate(&ops, true), to, "{}", algorithm);
        }
    }
}

#[test]
fn test_minimal_algorithms_reach_lcs_bound() {
    for algorithm in plain_algorithms().filter(|a| a.is_minimal()) {
        for (from, to) in PAIRS {
            let (from, to) = (chars(from), chars(to));
            let ops = run(algorithm, &from, &to);
            let expected = from.len() + to.len() - 2 * lcs_length(&from, &to);
            assert_eq!(
                operations::edit_count(&ops),
                expected,
                "{} on {:?} -> {:?}",
                algorithm,
                from,
                to
            );
        }
    }
}

#[test]
fn test_identical_inputs_only_match() {
    let text = chars("unchanged");
    for algorithm in plain_algorithms() {
        let ops = run(algorithm, &text, &text);
        assert_eq!(ops.len(), text.len());
        assert!(ops.iter().all(|op| op.operator == Operator::Match));
    }
}

#[test]
fn test_empty_sides() {
    for algorithm in plain_algorithms() {
        assert!(run(algorithm, &[], &[]).is_empty());
        let ops = run(algorithm, &[], &chars("abc"));
        assert_eq!(
            ops,
            vec![
                Operation::insert('a'),
                Operation::insert('b'),
                Operation::insert('c')
            ]
        );
        let ops = run(algorithm, &chars("abc"), &[]);
        assert_eq!(
            ops,
            vec![
                Operation::delete('a'),
                Operation::delete('b'),
                Operation::delete('c')
            ]
        );
    }
}

#[test]
fn test_repeated_token_either_order() {
    let from = vec!["x", "x"];
    let to = vec!["x"];
    for algorithm in plain_algorithms() {
        let mut buffer = OperationBuffer::new();
        algorithm
            .create(DefaultEquality, false)
            .unwrap()
            .diff(&from, &to, &mut buffer)
            .unwrap();
        let mut operators = buffer.operators();
        operators.sort_by_key(|op| op.symbol());
        assert_eq!(operators, vec![Operator::Delete, Operator::Match], "{}", algorithm);
    }
}

#[test]
fn test_flipped_script_undoes() {
    for algorithm in plain_algorithms() {
        for (from, to) in PAIRS {
            let (from, to) = (chars(from), chars(to));
            let ops = run(algorithm, &from, &to);
            let back = operations::flip(&ops);
            assert_eq!(operations::apply(&to, &back).unwrap(), from, "{}", algorithm);
        }
    }
}

#[test]
fn test_reverse_direction_same_cost() {
    for algorithm in plain_algorithms().filter(|a| a.is_minimal()) {
        for (from, to) in PAIRS {
            let (from, to) = (chars(from), chars(to));
            let forward = run(algorithm, &from, &to);
            let backward = run(algorithm, &to, &from);
            assert_eq!(
                operations::edit_count(&forward),
                operations::edit_count(&backward),
                "{}",
                algorithm
            );
        }
    }
}

#[test]
fn test_repeatable() {
    let (from, to) = (chars("abcabba"), chars("cbabac"));
    for algorithm in plain_algorithms() {
        assert_eq!(run(algorithm, &from, &to), run(algorithm, &from, &to));
    }
}

#[test]
fn test_match_token_side() {
    let from = vec!["Alpha", "beta", "Gamma"];
    let to = vec!["alpha", "BETA", "delta"];
    let eq = |a: &&str, b: &&str| a.eq_ignore_ascii_case(b);
    for algorithm in plain_algorithms() {
        for prefer_from in [false, true] {
            let mut buffer = OperationBuffer::new();
            algorithm
                .create(eq, prefer_from)
                .unwrap()
                .diff(&from, &to, &mut buffer)
                .unwrap();
            let matched: Vec<&str> = buffer
                .operations()
                .iter()
                .filter(|op| op.operator == Operator::Match)
                .map(|op| op.token)
                .collect();
            let expected = if prefer_from {
                vec!["Alpha", "beta"]
            } else {
                vec!["alpha", "BETA"]
            };
            assert_eq!(matched, expected, "{} prefer_from={}", algorithm, prefer_from);
        }
    }
}

#[test]
fn test_processor_slicing_keeps_results() {
    let from = chars("header: the quick brown fox :footer");
    let to = chars("header: a quick brown dog :footer");
    for algorithm in plain_algorithms() {
        let mut sliced = OperationBuffer::new();
        DiffProcessor::new(DiffConfig::new(algorithm))
            .diff(&from, &to, &mut sliced)
            .unwrap();
        let mut whole = OperationBuffer::new();
        DiffProcessor::new(DiffConfig::new(algorithm).with_slice(false))
            .diff(&from, &to, &mut whole)
            .unwrap();
        assert_eq!(
            operations::apply(&from, sliced.operations()).unwrap(),
            to,
            "{}",
            algorithm
        );
        if algorithm.is_minimal() {
            assert_eq!(sliced.edit_count(), whole.edit_count(), "{}", algorithm);
        }
    }
}

#[test]
fn test_line_tokens() {
    let from: Vec<String> = "fn main() {\n    println!(\"hi\");\n}\n"
        .lines()
        .map(String::from)
        .collect();
    let to: Vec<String> = "fn main() {\n    let x = 1;\n    println!(\"hi {}\", x);\n}\n"
        .lines()
        .map(String::from)
        .collect();
    let ops = diffx::diff(&from, &to).unwrap();
    assert_eq!(operations::apply(&from, &ops).unwrap(), to);
    assert_eq!(operations::edit_count(&ops), 3);
}
