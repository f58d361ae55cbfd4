#![forbid(unsafe_code)]

//! Document normalization
//!
//! Consumes the raw tree produced by the external parser and rewrites two
//! shapes into canonical forms, without losing position information:
//!
//! 1. The top-level `on` trigger declaration (a single string, a sequence of
//!    strings, or a mapping of trigger-name → config) becomes an ordered
//!    sequence of trigger-name strings stored under `meta.triggers`. When no
//!    trigger field is declared at all, `triggers` is present as an empty
//!    sequence.
//! 2. Mapping keys containing hyphens are rewritten to the underscore-joined
//!    form (`runs-on` → `runs_on`), recursively at every depth, keeping the
//!    original source line of each key occurrence.
//!
//! The normalized root is a mapping with exactly two entries: `meta` (every
//! top-level entry except `jobs`, with `on` replaced by `triggers`) and
//! `jobs`. Synthesized keys take the nearest original line. The name
//! `triggers` is reserved at the top level: a raw document that already
//! carries one would collide with the normalized entry, so it is rejected as
//! a duplicate key. A root that is already in canonical shape passes through
//! unchanged, making normalization idempotent.

use crate::document::node::{Key, Node, NodeKind, Scalar};
use crate::error::NormalizationError;

/// Name of the top-level trigger field in the raw document
const TRIGGER_KEY: &str = "on";

/// Name of the normalized trigger entry under `meta`
const TRIGGERS_KEY: &str = "triggers";

/// Normalizes a raw parsed tree into the canonical workflow shape
///
/// # Errors
///
/// Returns `NormalizationError` if:
/// - The root (or the `jobs` entry) is not a mapping
/// - The trigger declaration has a shape that cannot be normalized
/// - A hyphenated key rewrite collides with an existing key
/// - The raw document declares a top-level `triggers` key of its own
pub fn normalize(raw: Node) -> Result<Node, NormalizationError> {
    let root_line = raw.line();
    let raw = normalize_keys(raw)?;

    if is_canonical(&raw) {
        return Ok(raw);
    }

    let (_, kind) = raw.into_parts();
    let entries = match kind {
        NodeKind::Mapping(entries) => entries,
        _ => {
            return Err(NormalizationError::NotAMapping {
                key: "workflow".to_string(),
                line: root_line,
            });
        }
    };

    let mut meta_entries: Vec<(Key, Node)> = Vec::new();
    let mut jobs_entry: Option<(Key, Node)> = None;
    let mut saw_trigger = false;

    for (key, value) in entries {
        if key.text() == "jobs" {
            jobs_entry = Some((key, value));
        } else if key.text() == TRIGGER_KEY {
            saw_trigger = true;
            let triggers_key = Key::new(TRIGGERS_KEY, key.line());
            meta_entries.push((triggers_key, normalize_trigger_value(value)?));
        } else if key.text() == TRIGGERS_KEY {
            // Reserved: would collide with the entry synthesized from `on`.
            return Err(NormalizationError::DuplicateKey {
                key: key.text().to_string(),
                line: key.line(),
            });
        } else {
            meta_entries.push((key, value));
        }
    }

    if !saw_trigger {
        let triggers_key = Key::new(TRIGGERS_KEY, root_line);
        meta_entries.push((triggers_key, Node::sequence(root_line, Vec::new())));
    }

    let (jobs_key, jobs_node) = match jobs_entry {
        Some((key, value)) => {
            if !value.is_mapping() {
                return Err(NormalizationError::NotAMapping {
                    key: key.text().to_string(),
                    line: value.line(),
                });
            }
            (key, value)
        }
        None => (
            Key::new("jobs", root_line),
            Node::mapping(root_line, Vec::new()),
        ),
    };

    let meta = Node::mapping(root_line, meta_entries);
    Ok(Node::mapping(
        root_line,
        vec![
            (Key::new("meta", root_line), meta),
            (jobs_key, jobs_node),
        ],
    ))
}

/// Reports whether a tree already has the canonical normalized shape
///
/// Canonical means the root mapping holds exactly `meta` and `jobs`, with
/// `jobs` a mapping and `meta` a mapping whose `triggers` entry is a
/// sequence. Such a tree is passed through untouched.
fn is_canonical(node: &Node) -> bool {
    if !node.is_mapping() || node.len() != 2 {
        return false;
    }
    let (Some(meta), Some(jobs)) = (node.get("meta"), node.get("jobs")) else {
        return false;
    };
    jobs.is_mapping()
        && meta.is_mapping()
        && meta.get(TRIGGERS_KEY).is_some_and(Node::is_sequence)
}

/// Rewrites hyphenated mapping keys to underscore form, recursively
///
/// Key rewriting is idempotent and never changes a key's source line. A
/// rewrite colliding with a sibling key is an error rather than a silent
/// merge, keeping mapping keys unique.
///
/// # Errors
///
/// Returns `NormalizationError::DuplicateKey` on a collision.
pub fn normalize_keys(node: Node) -> Result<Node, NormalizationError> {
    let (line, kind) = node.into_parts();
    match kind {
        NodeKind::Scalar(value) => Ok(Node::scalar(line, value)),
        NodeKind::Sequence(items) => {
            let items = items
                .into_iter()
                .map(normalize_keys)
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Node::sequence(line, items))
        }
        NodeKind::Mapping(entries) => {
            let mut normalized: Vec<(Key, Node)> = Vec::with_capacity(entries.len());
            for (key, value) in entries {
                let key = if key.text().contains('-') {
                    Key::new(key.text().replace('-', "_"), key.line())
                } else {
                    key
                };
                if normalized.iter().any(|(k, _)| k.text() == key.text()) {
                    return Err(NormalizationError::DuplicateKey {
                        key: key.text().to_string(),
                        line: key.line(),
                    });
                }
                normalized.push((key, normalize_keys(value)?));
            }
            Ok(Node::mapping(line, normalized))
        }
    }
}

/// Normalizes the value of the `on` entry into a sequence of trigger names
///
/// Each trigger name keeps the source line of its original occurrence: the
/// scalar's line for string/sequence shapes, the key's line for the mapping
/// shape. A bare `on:` with no value (null) normalizes to an empty sequence.
fn normalize_trigger_value(value: Node) -> Result<Node, NormalizationError> {
    let (line, kind) = value.into_parts();
    match kind {
        NodeKind::Scalar(Scalar::Str(name)) => {
            Ok(Node::sequence(line, vec![Node::str(line, name)]))
        }
        NodeKind::Scalar(Scalar::Null) => Ok(Node::sequence(line, Vec::new())),
        NodeKind::Scalar(other) => Err(NormalizationError::MalformedTrigger {
            key: TRIGGER_KEY.to_string(),
            line,
            message: format!("expected a trigger name, found scalar '{}'", other),
        }),
        NodeKind::Sequence(items) => {
            let mut names = Vec::with_capacity(items.len());
            for item in items {
                let (item_line, item_kind) = item.into_parts();
                match item_kind {
                    NodeKind::Scalar(Scalar::Str(name)) => {
                        names.push(Node::str(item_line, name));
                    }
                    _ => {
                        return Err(NormalizationError::MalformedTrigger {
                            key: TRIGGER_KEY.to_string(),
                            line: item_line,
                            message: "trigger list entries must be trigger names".to_string(),
                        });
                    }
                }
            }
            Ok(Node::sequence(line, names))
        }
        NodeKind::Mapping(entries) => {
            let names = entries
                .into_iter()
                .map(|(key, _)| Node::str(key.line(), key.text()))
                .collect();
            Ok(Node::sequence(line, names))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_doc(on_value: Option<Node>) -> Node {
        let mut entries = vec![(Key::new("name", 1), Node::str(1, "deploy"))];
        if let Some(on) = on_value {
            entries.push((Key::new("on", 3), on));
        }
        entries.push((
            Key::new("jobs", 5),
            Node::mapping(
                6,
                vec![(
                    Key::new("deploy", 6),
                    Node::mapping(
                        7,
                        vec![(Key::new("runs-on", 7), Node::str(7, "ubuntu-latest"))],
                    ),
                )],
            ),
        ));
        Node::mapping(1, entries)
    }

    fn trigger_names(root: &Node) -> Vec<String> {
        root.get("meta")
            .unwrap()
            .get("triggers")
            .unwrap()
            .items()
            .map(|n| n.as_str().unwrap().to_string())
            .collect()
    }

    #[test]
    fn test_single_scalar_trigger_becomes_sequence() {
        let root = normalize(raw_doc(Some(Node::str(3, "pull_request")))).unwrap();
        assert_eq!(trigger_names(&root), vec!["pull_request"]);
    }

    #[test]
    fn test_sequence_trigger_preserves_order() {
        let on = Node::sequence(
            3,
            vec![
                Node::str(3, "pull_request"),
                Node::str(3, "pull_request_target"),
            ],
        );
        let root = normalize(raw_doc(Some(on))).unwrap();
        assert_eq!(
            trigger_names(&root),
            vec!["pull_request", "pull_request_target"]
        );
    }

    #[test]
    fn test_mapping_trigger_takes_keys_in_order() {
        let on = Node::mapping(
            4,
            vec![
                (Key::new("pull_request", 4), Node::null(4)),
                (
                    Key::new("push", 5),
                    Node::mapping(6, vec![(Key::new("branches", 6), Node::str(6, "main"))]),
                ),
            ],
        );
        let root = normalize(raw_doc(Some(on))).unwrap();
        assert_eq!(trigger_names(&root), vec!["pull_request", "push"]);
    }

    #[test]
    fn test_absent_trigger_is_empty_sequence() {
        let root = normalize(raw_doc(None)).unwrap();
        assert_eq!(trigger_names(&root), Vec::<String>::new());
    }

    #[test]
    fn test_null_trigger_is_empty_sequence() {
        let root = normalize(raw_doc(Some(Node::null(3)))).unwrap();
        assert_eq!(trigger_names(&root), Vec::<String>::new());
    }

    #[test]
    fn test_malformed_trigger_scalar() {
        let err = normalize(raw_doc(Some(Node::scalar(3, Scalar::Bool(true))))).unwrap_err();
        match err {
            NormalizationError::MalformedTrigger { key, line, .. } => {
                assert_eq!(key, "on");
                assert_eq!(line, 3);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_malformed_trigger_sequence_entry() {
        let on = Node::sequence(
            3,
            vec![
                Node::str(3, "push"),
                Node::mapping(4, vec![(Key::new("nested", 4), Node::null(4))]),
            ],
        );
        let err = normalize(raw_doc(Some(on))).unwrap_err();
        match err {
            NormalizationError::MalformedTrigger { line, .. } => assert_eq!(line, 4),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_key_rewrite_preserves_line() {
        let root = normalize(raw_doc(Some(Node::str(3, "push")))).unwrap();
        let job = root.get("jobs").unwrap().get("deploy").unwrap();
        let runs_on = job.keys().find(|k| k.text() == "runs_on").unwrap();
        assert_eq!(runs_on.line(), 7);
        assert!(job.get("runs-on").is_none());
    }

    #[test]
    fn test_key_normalization_is_idempotent() {
        let once = normalize_keys(raw_doc(Some(Node::str(3, "push")))).unwrap();
        let twice = normalize_keys(once.clone()).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_existing_triggers_key_is_rejected() {
        let doc = Node::mapping(
            1,
            vec![
                (Key::new("triggers", 2), Node::str(2, "bogus")),
                (Key::new("on", 3), Node::str(3, "push")),
                (Key::new("jobs", 4), Node::mapping(4, vec![])),
            ],
        );
        let err = normalize(doc).unwrap_err();
        match err {
            NormalizationError::DuplicateKey { key, line } => {
                assert_eq!(key, "triggers");
                assert_eq!(line, 2);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_existing_triggers_key_without_on_is_rejected() {
        let doc = Node::mapping(
            1,
            vec![(
                Key::new("triggers", 2),
                Node::sequence(2, vec![Node::str(2, "push")]),
            )],
        );
        let err = normalize(doc).unwrap_err();
        assert!(matches!(
            err,
            NormalizationError::DuplicateKey { line: 2, .. }
        ));
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let once = normalize(raw_doc(Some(Node::str(3, "push")))).unwrap();
        let twice = normalize(once.clone()).unwrap();
        assert_eq!(once, twice);

        let once = normalize(raw_doc(None)).unwrap();
        let twice = normalize(once.clone()).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_key_collision_is_an_error() {
        let doc = Node::mapping(
            1,
            vec![
                (Key::new("jobs", 1), Node::mapping(2, vec![
                    (Key::new("build", 2), Node::mapping(3, vec![
                        (Key::new("runs_on", 3), Node::str(3, "ubuntu-latest")),
                        (Key::new("runs-on", 4), Node::str(4, "macos-latest")),
                    ])),
                ])),
            ],
        );
        let err = normalize(doc).unwrap_err();
        match err {
            NormalizationError::DuplicateKey { key, line } => {
                assert_eq!(key, "runs_on");
                assert_eq!(line, 4);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_root_must_be_mapping() {
        let err = normalize(Node::str(1, "not a workflow")).unwrap_err();
        assert!(matches!(err, NormalizationError::NotAMapping { .. }));
    }

    #[test]
    fn test_jobs_must_be_mapping() {
        let doc = Node::mapping(
            1,
            vec![(Key::new("jobs", 1), Node::sequence(1, vec![]))],
        );
        let err = normalize(doc).unwrap_err();
        match err {
            NormalizationError::NotAMapping { key, .. } => assert_eq!(key, "jobs"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_absent_jobs_is_empty_mapping() {
        let doc = Node::mapping(1, vec![(Key::new("on", 1), Node::str(1, "push"))]);
        let root = normalize(doc).unwrap();
        assert!(root.get("jobs").unwrap().is_mapping());
        assert!(root.get("jobs").unwrap().is_empty());
    }
}
