//! Property tests for the resource graph.

use proptest::prelude::*;

use cascade_core::graph::{Boundary, DeclineReason, Propagation};
use cascade_core::{ResourceGraph, ResourceUpdate};

const NODES: usize = 8;

fn name(index: usize) -> String {
    format!("http://localhost/n{index}.js")
}

#[derive(Debug, Clone)]
enum Op {
    Reconcile {
        node: usize,
        deps: Vec<usize>,
        declines: Option<bool>,
        self_accepts: Option<bool>,
        accepts: Option<Vec<usize>>,
    },
    Remove(usize),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        8 => (
            0..NODES,
            prop::collection::vec(0..NODES, 0..4),
            prop::option::of(prop::bool::weighted(0.15)),
            prop::option::of(prop::bool::weighted(0.25)),
            prop::option::of(prop::collection::vec(0..NODES, 0..2)),
        )
            .prop_map(|(node, deps, declines, self_accepts, accepts)| Op::Reconcile {
                node,
                deps,
                declines,
                self_accepts,
                accepts,
            }),
        1 => (0..NODES).prop_map(Op::Remove),
    ]
}

fn apply(ops: &[Op]) -> ResourceGraph {
    let mut graph = ResourceGraph::new();
    for op in ops {
        match op {
            Op::Reconcile {
                node,
                deps,
                declines,
                self_accepts,
                accepts,
            } => {
                let update = ResourceUpdate {
                    kind: Some("js_module".into()),
                    dependency_urls: Some(deps.iter().copied().map(name).collect()),
                    declines_hot_update: *declines,
                    self_accepts_update: *self_accepts,
                    accepted_dependency_urls: accepts
                        .as_ref()
                        .map(|urls| urls.iter().copied().map(name).collect()),
                };
                graph.reconcile(&name(*node), update);
            }
            Op::Remove(node) => {
                graph.remove(&name(*node));
            }
        }
    }
    graph
}

proptest! {
    /// Every dependency edge has its dependent edge and the other way round.
    #[test]
    fn edges_stay_symmetric(ops in prop::collection::vec(op(), 0..40)) {
        let graph = apply(&ops);

        for node in graph.nodes() {
            for dep in node.dependencies() {
                let target = graph.get(dep);
                prop_assert!(target.is_some(), "{dep} is referenced but not registered");
                prop_assert!(target.unwrap().dependents().contains(node.url()));
            }
            for dependent in node.dependents() {
                let source = graph.get(dependent);
                prop_assert!(source.is_some(), "{dependent} depends on {} but is not registered", node.url());
                prop_assert!(source.unwrap().dependencies().contains(node.url()));
            }
        }
    }

    /// Propagation terminates on any graph, cycles included, and only ever
    /// reports boundaries that exist.
    #[test]
    fn propagation_terminates(ops in prop::collection::vec(op(), 0..40)) {
        let graph = apply(&ops);

        for node in graph.nodes() {
            if let Propagation::Accepted { boundaries } = graph.propagate(node) {
                prop_assert!(!boundaries.is_empty());
                for boundary in &boundaries {
                    prop_assert!(graph.contains(&boundary.boundary_url));
                    prop_assert!(graph.contains(&boundary.accepted_by_url));
                }
            }
        }
    }

    /// Unreferenced resources that cannot update themselves have no importer.
    #[test]
    fn unreferenced_node_has_no_importer(ops in prop::collection::vec(op(), 0..40)) {
        let graph = apply(&ops);

        for node in graph.nodes() {
            if node.is_unreferenced() && !node.self_accepts_update() && !node.declines_hot_update() {
                prop_assert_eq!(
                    graph.propagate(node),
                    Propagation::declined(DeclineReason::NoImporter, node.url())
                );
            }
        }
    }

    /// A self-accepting resource is its own single boundary whatever depends on it.
    #[test]
    fn self_accept_is_a_single_boundary(ops in prop::collection::vec(op(), 0..40)) {
        let graph = apply(&ops);

        for node in graph.nodes() {
            if node.self_accepts_update() && !node.declines_hot_update() {
                prop_assert_eq!(
                    graph.propagate(node),
                    Propagation::Accepted { boundaries: vec![Boundary::new(node.url(), node.url())] }
                );
            }
        }
    }

    /// A ring of resources with no hot flags is a circular dependency.
    #[test]
    fn ring_is_circular(len in 1..12usize) {
        let mut graph = ResourceGraph::new();
        for i in 0..len {
            graph.reconcile(&name(i), ResourceUpdate::new().dependencies([name((i + 1) % len)]));
        }

        for i in 0..len {
            let outcome = graph.propagate_url(&name(i)).unwrap();
            prop_assert_eq!(outcome.decline_reason(), Some(DeclineReason::CircularDependency));
        }
    }
}
