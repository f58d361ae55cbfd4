//! Shared builders for integration tests
//!
//! Each builder constructs the raw line-tagged tree an external parser would
//! produce for a small workflow document; the YAML it mirrors is reproduced
//! above each builder with its line numbers.

#![allow(dead_code)]

use wflint::{Key, Node, Scalar, Workflow};

/// Mirrors:
///
/// ```yaml
/// on:                                              # line 1
///   pull_request                                   # line 2
///
/// jobs:                                            # line 4
///   deploy:                                        # line 5
///     steps:                                       # line 6
///       - id: merge this pull request              # line 7
///         name: automerge                          # line 8
///         uses: "pascalgn/automerge-action@v0.15.5" # line 9
///         with:                                    # line 10
///           type_string: "string"                  # line 11
///           type_bool: true                        # line 12
///           type_integer: 1                        # line 13
///           type_nil: null                         # line 14
///           type_float: 1.2                        # line 15
/// ```
pub fn automerge_doc() -> Node {
    Node::mapping(
        1,
        vec![
            (Key::new("on", 1), Node::str(2, "pull_request")),
            (
                Key::new("jobs", 4),
                Node::mapping(
                    5,
                    vec![(
                        Key::new("deploy", 5),
                        Node::mapping(
                            6,
                            vec![(
                                Key::new("steps", 6),
                                Node::sequence(7, vec![automerge_step()]),
                            )],
                        ),
                    )],
                ),
            ),
        ],
    )
}

fn automerge_step() -> Node {
    Node::mapping(
        7,
        vec![
            (Key::new("id", 7), Node::str(7, "merge this pull request")),
            (Key::new("name", 8), Node::str(8, "automerge")),
            (
                Key::new("uses", 9),
                Node::str(9, "pascalgn/automerge-action@v0.15.5"),
            ),
            (
                Key::new("with", 10),
                Node::mapping(
                    11,
                    vec![
                        (Key::new("type_string", 11), Node::str(11, "string")),
                        (
                            Key::new("type_bool", 12),
                            Node::scalar(12, Scalar::Bool(true)),
                        ),
                        (
                            Key::new("type_integer", 13),
                            Node::scalar(13, Scalar::Int(1)),
                        ),
                        (Key::new("type_nil", 14), Node::null(14)),
                        (
                            Key::new("type_float", 15),
                            Node::scalar(15, Scalar::Float(1.2)),
                        ),
                    ],
                ),
            ),
        ],
    )
}

pub fn automerge_workflow() -> Workflow {
    Workflow::from_node(automerge_doc()).unwrap()
}

/// Mirrors:
///
/// ```yaml
/// name: test                         # line 1
///
/// on: push                           # line 3
///
/// jobs:                              # line 5
///   build:                           # line 6
///     defaults:                      # line 7
///       run:                         # line 8
///         working-directory: ./app   # line 9
///     runs-on: ubuntu-latest         # line 10
///     steps:                         # line 11
///       - run: echo hello            # line 12
/// ```
pub fn defaults_doc() -> Node {
    Node::mapping(
        1,
        vec![
            (Key::new("name", 1), Node::str(1, "test")),
            (Key::new("on", 3), Node::str(3, "push")),
            (
                Key::new("jobs", 5),
                Node::mapping(
                    6,
                    vec![(
                        Key::new("build", 6),
                        Node::mapping(
                            7,
                            vec![
                                (
                                    Key::new("defaults", 7),
                                    Node::mapping(
                                        8,
                                        vec![(
                                            Key::new("run", 8),
                                            Node::mapping(
                                                9,
                                                vec![(
                                                    Key::new("working-directory", 9),
                                                    Node::str(9, "./app"),
                                                )],
                                            ),
                                        )],
                                    ),
                                ),
                                (Key::new("runs-on", 10), Node::str(10, "ubuntu-latest")),
                                (
                                    Key::new("steps", 11),
                                    Node::sequence(
                                        12,
                                        vec![Node::mapping(
                                            12,
                                            vec![(
                                                Key::new("run", 12),
                                                Node::str(12, "echo hello"),
                                            )],
                                        )],
                                    ),
                                ),
                            ],
                        ),
                    )],
                ),
            ),
        ],
    )
}

pub fn defaults_workflow() -> Workflow {
    Workflow::from_node(defaults_doc()).unwrap()
}
