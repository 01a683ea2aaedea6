use std::collections::BTreeSet;

use proptest::prelude::*;

use super::*;
use crate::error::LinkError;

fn catalog(edges: &[(&str, &[&str])]) -> ModuleCatalog {
    ModuleCatalog::new(
        edges
            .iter()
            .map(|(name, requires)| Module::new(*name).with_requires(requires.iter().copied())),
    )
    .unwrap()
}

fn names<'c>(resolved: &ResolvedSet<'c>) -> Vec<&'c str> {
    resolved.names().collect()
}

// ── catalog ────────────────────────────────────────────────

#[test]
fn test_catalog_lookup() {
    let c = catalog(&[("base", &[]), ("app", &["base"])]);
    assert_eq!(c.len(), 2);
    assert_eq!(c.lookup("app").map(|m| m.requires()), Some(&["base".to_string()][..]));
    assert!(c.lookup("missing").is_none());
    assert!(c.contains("base"));
}

#[test]
fn test_catalog_lists_modules_by_name() {
    let c = catalog(&[("zeta", &[]), ("alpha", &[]), ("mid", &[])]);
    let listed: Vec<&str> = c.all_modules().map(|m| m.name()).collect();
    assert_eq!(listed, vec!["alpha", "mid", "zeta"]);
}

#[test]
fn test_catalog_duplicate_fails_in_any_order() {
    let orders = [
        vec![Module::new("a"), Module::new("b"), Module::new("a")],
        vec![Module::new("a"), Module::new("a"), Module::new("b")],
        vec![Module::new("b").with_requires(["a"]), Module::new("a"), Module::new("a")],
    ];
    for modules in orders {
        let err = ModuleCatalog::new(modules).unwrap_err();
        assert!(
            matches!(&err, LinkError::DuplicateModule { name } if name == "a"),
            "got {:?}",
            err
        );
    }
}

#[test]
fn test_requires_are_deduplicated() {
    let m = Module::new("app").with_requires(["a", "b", "a"]).with_requires(["b", "c"]);
    assert_eq!(m.requires(), &["a", "b", "c"]);
}

// ── resolve ────────────────────────────────────────────────

#[test]
fn test_resolve_transitive_closure() {
    let c = catalog(&[
        ("app", &["lib"]),
        ("lib", &["base"]),
        ("base", &[]),
        ("extra", &["base"]),
    ]);
    let resolved = resolve(&c, ["app"]).unwrap();
    assert_eq!(names(&resolved), vec!["app", "base", "lib"]);
    assert!(!resolved.contains("extra"));
    assert_eq!(resolved.roots(), &["app"]);
}

#[test]
fn test_resolve_diamond_includes_shared_once() {
    let c = catalog(&[
        ("app", &["left", "right"]),
        ("left", &["base"]),
        ("right", &["base"]),
        ("base", &[]),
    ]);
    let resolved = resolve(&c, ["app"]).unwrap();
    assert_eq!(resolved.len(), 4);
}

#[test]
fn test_resolve_cycle_terminates() {
    let c = catalog(&[("a", &["b"]), ("b", &["a"])]);
    let resolved = resolve(&c, ["a"]).unwrap();
    assert_eq!(names(&resolved), vec!["a", "b"]);
}

#[test]
fn test_resolve_self_cycle() {
    let c = catalog(&[("a", &["a"])]);
    let resolved = resolve(&c, ["a"]).unwrap();
    assert_eq!(names(&resolved), vec!["a"]);
    assert_eq!(resolved.graph().cycles(), vec![vec!["a"]]);
}

#[test]
fn test_resolve_missing_root() {
    let c = catalog(&[("a", &[])]);
    let err = resolve(&c, ["a", "ghost"]).unwrap_err();
    assert!(
        matches!(&err, LinkError::UnresolvedRoot { name } if name == "ghost"),
        "got {:?}",
        err
    );
}

#[test]
fn test_missing_root_reported_before_missing_dependency() {
    let c = catalog(&[("broken", &["nowhere"])]);
    let err = resolve(&c, ["broken", "ghost"]).unwrap_err();
    assert!(matches!(err, LinkError::UnresolvedRoot { .. }), "got {:?}", err);
}

#[test]
fn test_resolve_missing_dependency_names_requirer() {
    let c = catalog(&[("app", &["lib"]), ("lib", &["nowhere"])]);
    let err = resolve(&c, ["app"]).unwrap_err();
    match err {
        LinkError::UnresolvedDependency { module, missing } => {
            assert_eq!(module, "lib");
            assert_eq!(missing, "nowhere");
        }
        other => panic!("expected UnresolvedDependency, got {:?}", other),
    }
}

#[test]
fn test_resolve_ignores_unreachable_broken_modules() {
    let c = catalog(&[("app", &[]), ("broken", &["nowhere"])]);
    assert!(resolve(&c, ["app"]).is_ok());
}

#[test]
fn test_resolve_empty_roots() {
    let c = catalog(&[("app", &[])]);
    let resolved = resolve(&c, Vec::<String>::new()).unwrap();
    assert!(resolved.is_empty());
}

#[test]
fn test_resolve_duplicate_roots() {
    let c = catalog(&[("app", &[])]);
    let resolved = resolve(&c, ["app", "app"]).unwrap();
    assert_eq!(resolved.roots(), &["app"]);
    assert_eq!(resolved.len(), 1);
}

#[test]
fn test_resolve_each_in_parallel() {
    let c = catalog(&[("a", &["b"]), ("b", &[]), ("c", &[])]);
    let results = resolve_each(&c, &[vec!["a"], vec!["c"], vec!["ghost"]]);
    assert_eq!(results.len(), 3);
    assert_eq!(names(results[0].as_ref().unwrap()), vec!["a", "b"]);
    assert_eq!(names(results[1].as_ref().unwrap()), vec!["c"]);
    assert!(matches!(results[2], Err(LinkError::UnresolvedRoot { .. })));
}

// ── load order ─────────────────────────────────────────────

#[test]
fn test_load_order_groups_cycles() {
    let c = catalog(&[
        ("app", &["lib", "log", "x"]),
        ("lib", &["base"]),
        ("log", &["base"]),
        ("x", &["y"]),
        ("y", &["x", "base"]),
        ("base", &[]),
    ]);
    let resolved = resolve(&c, ["app"]).unwrap();
    let graph = resolved.graph();
    assert_eq!(
        graph.load_order(),
        vec![
            vec!["base"],
            vec!["lib"],
            vec!["log"],
            vec!["x", "y"],
            vec!["app"]
        ]
    );
    assert_eq!(graph.cycles(), vec![vec!["x", "y"]]);
    insta::assert_snapshot!(graph.render(), @r"
    base
    lib
    log
    x, y (cycle)
    app
    ");
}

#[test]
fn test_load_order_puts_dependencies_first() {
    let c = catalog(&[("d", &["c"]), ("c", &["b"]), ("b", &["a"]), ("a", &[])]);
    let resolved = resolve(&c, ["d"]).unwrap();
    assert_eq!(resolved.graph().ordered_names(), vec!["a", "b", "c", "d"]);
}

// ── properties ─────────────────────────────────────────────

proptest! {
    #[test]
    fn prop_resolution_is_exact_closure(
        edges in prop::collection::vec(prop::collection::vec(0usize..16, 0..4), 1..16),
        roots in prop::collection::vec(0usize..16, 1..4),
    ) {
        let n = edges.len();
        let modules = edges.iter().enumerate().map(|(i, reqs)| {
            Module::new(format!("m{}", i)).with_requires(reqs.iter().map(|r| format!("m{}", r % n)))
        });
        let catalog = ModuleCatalog::new(modules).unwrap();
        let root_names: Vec<String> = roots.iter().map(|r| format!("m{}", r % n)).collect();

        let resolved = resolve(&catalog, &root_names).unwrap();
        for module in resolved.modules() {
            for required in module.requires() {
                prop_assert!(resolved.contains(required));
            }
        }

        let mut reachable: BTreeSet<String> = root_names.iter().cloned().collect();
        loop {
            let before = reachable.len();
            for name in reachable.clone() {
                for required in catalog.lookup(&name).unwrap().requires() {
                    reachable.insert(required.clone());
                }
            }
            if reachable.len() == before {
                break;
            }
        }
        let members: BTreeSet<String> = resolved.names().map(String::from).collect();
        prop_assert_eq!(&members, &reachable);

        let mut reversed = root_names.clone();
        reversed.reverse();
        let again = resolve(&catalog, &reversed).unwrap();
        prop_assert_eq!(names(&again), names(&resolved));
        prop_assert_eq!(resolved.graph().ordered_names().len(), resolved.len());
    }
}
