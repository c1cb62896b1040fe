// SPDX-License-Identifier: MIT OR Apache-2.0

//! Property-based tests using proptest.
//!
//! Random scope trees are compiled and every lookup is checked against a
//! plain walk up the chain of declaration maps.

use proptest::prelude::*;
use scopecfg::domain::KeyName;
use scopecfg::prelude::*;
use std::collections::BTreeMap;

const NAMES: &[&str] = &["a", "b", "c", "d", "e"];

#[derive(Debug, Clone)]
struct Node {
    decls: BTreeMap<String, String>,
    children: Vec<Node>,
}

fn decls() -> impl Strategy<Value = BTreeMap<String, String>> {
    prop::collection::btree_map("[a-e]", "[a-z0-9]{0,3}", 0..4)
}

fn leaf() -> impl Strategy<Value = Node> {
    decls().prop_map(|decls| Node {
        decls,
        children: Vec::new(),
    })
}

fn with_children(
    children: impl Strategy<Value = Node>,
    max: usize,
) -> impl Strategy<Value = Node> {
    (decls(), prop::collection::vec(children, 0..max)).prop_map(|(decls, children)| Node {
        decls,
        children,
    })
}

/// global → groups → routes → nested routes
fn tree() -> impl Strategy<Value = Node> {
    let route = with_children(leaf(), 3);
    let group = with_children(route, 3);
    with_children(group, 4)
}

fn label(depth: usize, index: usize) -> String {
    if depth == 1 {
        format!("g{index}")
    } else {
        format!("/r{depth}_{index}")
    }
}

fn to_spec(node: &Node, depth: usize, index: usize) -> ScopeSpec {
    let mut spec = match depth {
        0 => ScopeSpec::global(),
        1 => ScopeSpec::group(label(depth, index)),
        _ => ScopeSpec::route(label(depth, index)),
    };
    for (name, value) in &node.decls {
        // Declare with a mixed-case spelling to exercise folding.
        spec = spec.declare(name.to_uppercase(), value.as_str());
    }
    for (i, child) in node.children.iter().enumerate() {
        spec = spec.child(to_spec(child, depth + 1, i));
    }
    spec
}

/// Visits every scope with its label path and the chain of maps from the
/// root down to it.
fn visit<'a>(
    node: &'a Node,
    depth: usize,
    path: &mut Vec<String>,
    chain: &mut Vec<&'a BTreeMap<String, String>>,
    f: &mut dyn FnMut(&[String], &[&BTreeMap<String, String>]),
) {
    chain.push(&node.decls);
    f(path, chain);
    for (i, child) in node.children.iter().enumerate() {
        path.push(label(depth + 1, i));
        visit(child, depth + 1, path, chain, f);
        path.pop();
    }
    chain.pop();
}

fn chained_lookup<'a>(chain: &[&'a BTreeMap<String, String>], name: &str) -> Option<&'a str> {
    chain
        .iter()
        .rev()
        .find_map(|decls| decls.get(name).map(String::as_str))
}

proptest! {
    #[test]
    fn test_resolution_matches_chained_lookup(root in tree()) {
        let generation = to_spec(&root, 0, 0).build().unwrap();

        let mut failures = Vec::new();
        visit(&root, 0, &mut Vec::new(), &mut Vec::new(), &mut |path: &[String], chain: &[&BTreeMap<String, String>]| {
            let labels: Vec<&str> = path.iter().map(String::as_str).collect();
            let Some(scope) = generation.find(&labels) else {
                failures.push(format!("scope {labels:?} not found"));
                return;
            };
            for name in NAMES {
                let want = chained_lookup(chain, name);
                for spelling in [name.to_string(), name.to_uppercase()] {
                    let got = generation
                        .resolve(Some(scope), &spelling)
                        .unwrap()
                        .map(|v| v.to_string_lossy());
                    if got.as_deref() != want {
                        failures.push(format!("{labels:?} {spelling}: got {got:?}, want {want:?}"));
                    }
                }
            }
        });
        prop_assert!(failures.is_empty(), "{:?}", failures);
    }
}

proptest! {
    #[test]
    fn test_root_lookup_matches_default_scope(root in tree()) {
        let generation = to_spec(&root, 0, 0).build().unwrap();
        for name in NAMES {
            let from_none = generation.resolve(None, name).unwrap().cloned();
            let from_root = generation.resolve(Some(generation.root()), name).unwrap().cloned();
            prop_assert_eq!(from_none, from_root);
        }
    }
}

proptest! {
    #[test]
    fn test_valid_names_are_folded_to_lowercase(s in "[A-Za-z0-9_]{1,24}") {
        let name = KeyName::parse(&s).unwrap();
        prop_assert_eq!(name.as_str(), s.to_ascii_lowercase());
    }
}

proptest! {
    #[test]
    fn test_names_with_foreign_characters_are_rejected(
        prefix in "[a-z]{0,4}",
        bad in "[^A-Za-z0-9_]",
        suffix in "[a-z]{0,4}",
    ) {
        let name = format!("{prefix}{bad}{suffix}");
        let generation = ScopeSpec::global().declare("ok", "1").build().unwrap();
        let is_invalid_name = matches!(
            generation.resolve(None, &name),
            Err(ConfigError::InvalidName { .. })
        );
        prop_assert!(is_invalid_name);

        let load = ScopeSpec::global().declare(name, "1").build();
        let is_invalid_name = matches!(load, Err(ConfigError::InvalidName { .. }));
        prop_assert!(is_invalid_name);
    }
}

proptest! {
    #[test]
    fn test_every_declared_key_is_found(
        keys in prop::collection::btree_set("[a-z_][a-z0-9_]{0,15}", 1..200)
    ) {
        let mut builder = ScopeTreeBuilder::new();
        let root = builder.root();
        builder.set_hash_max_size(root, 4096).unwrap();
        builder.set_hash_bucket_size(root, 128).unwrap();
        for key in &keys {
            builder.declare(root, key, key.as_str()).unwrap();
        }
        let generation = builder.build().unwrap();
        for key in &keys {
            let value = generation.resolve(None, &key.to_uppercase()).unwrap();
            prop_assert_eq!(value.and_then(|v| v.as_str()), Some(key.as_str()));
        }
    }
}
