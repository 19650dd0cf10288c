//! Extension routines for graph handling with `petgraph`.

use petgraph::algo::tarjan_scc;
use petgraph::graph::{IndexType, NodeIndex};
use petgraph::prelude::*;
use petgraph::visit::{depth_first_search, Control, DfsEvent};
use std::collections::HashSet;

/// Finds one simple cycle in every strongly connected component that has any.
///
/// Each cycle is listed in edge order starting from its smallest node: every node has an edge
/// to the next one, and the last one has an edge to the first. Cycles are ordered by their
/// first node.
pub fn find_cycles<N, E, Ix: IndexType>(graph: &DiGraph<N, E, Ix>) -> Vec<Vec<NodeIndex<Ix>>> {
    let mut cycles: Vec<_> = tarjan_scc(graph)
        .into_iter()
        .filter(|component| {
            component.len() > 1 || graph.contains_edge(component[0], component[0])
        })
        .map(|component| {
            let start = component.iter().copied().min().unwrap_or(component[0]);
            let members: HashSet<_> = component.into_iter().collect();
            cycle_through(graph, start, &members)
        })
        .collect();

    cycles.sort_by_key(|cycle| cycle[0]);
    cycles
}

/// Finds a simple cycle through `start`, using only nodes from `component`, which must be the
/// strongly connected component containing `start`.
fn cycle_through<N, E, Ix: IndexType>(
    graph: &DiGraph<N, E, Ix>,
    start: NodeIndex<Ix>,
    component: &HashSet<NodeIndex<Ix>>,
) -> Vec<NodeIndex<Ix>> {
    if graph.contains_edge(start, start) {
        return vec![start];
    }

    let mut predecessor = vec![NodeIndex::end(); graph.node_count()];
    let mut closing = None;

    depth_first_search(graph, Some(start), |event| match event {
        DfsEvent::TreeEdge(u, v) if component.contains(&v) => {
            predecessor[v.index()] = u;
            Control::<()>::Continue
        }
        DfsEvent::TreeEdge(_, _) => Control::Prune,
        DfsEvent::BackEdge(u, v) if v == start => {
            closing = Some(u);
            Control::Break(())
        }
        _ => Control::Continue,
    });

    let mut cycle = Vec::new();
    let mut next = closing;
    while let Some(node) = next {
        cycle.push(node);
        next = if node == start {
            None
        } else {
            Some(predecessor[node.index()])
        };
    }

    cycle.reverse();
    cycle
}
