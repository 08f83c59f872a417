//! petgraph-based directed graph over a definition's transitions.
//!
//! Nodes are every defined state plus every name a transition points at, so dangling
//! references show up as undefined nodes instead of being dropped.

use std::collections::{BTreeSet, HashMap};

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::{Bfs, EdgeRef};

use crate::model::{Definition, TransitionKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateNode {
    pub name: String,
    /// `false` when the name only appears as a transition target or as `StartAt`.
    pub defined: bool,
}

pub struct TransitionGraph {
    pub graph: DiGraph<StateNode, TransitionKind>,
    pub node_indices: HashMap<String, NodeIndex>,
    start: NodeIndex,
}

impl TransitionGraph {
    pub fn build(definition: &Definition) -> Self {
        let mut graph = DiGraph::new();
        let mut node_indices = HashMap::new();

        for name in definition.states.keys() {
            let idx = graph.add_node(StateNode {
                name: name.clone(),
                defined: true,
            });
            node_indices.insert(name.clone(), idx);
        }

        let mut node_for = |graph: &mut DiGraph<StateNode, TransitionKind>, name: &str| {
            *node_indices.entry(name.to_owned()).or_insert_with(|| {
                graph.add_node(StateNode {
                    name: name.to_owned(),
                    defined: false,
                })
            })
        };

        let start = node_for(&mut graph, &definition.start_at);
        for (name, state) in &definition.states {
            let source = node_for(&mut graph, name);
            for (kind, target) in state.labelled_transitions() {
                let target = node_for(&mut graph, target);
                graph.add_edge(source, target, kind);
            }
        }

        TransitionGraph {
            graph,
            node_indices,
            start,
        }
    }

    pub fn start(&self) -> &str {
        &self.graph[self.start].name
    }

    /// Outgoing transitions in declaration order.
    pub fn successors(&self, name: &str) -> Vec<(&str, TransitionKind)> {
        let Some(&idx) = self.node_indices.get(name) else {
            return vec![];
        };
        let mut out: Vec<_> = self
            .graph
            .edges_directed(idx, Direction::Outgoing)
            .map(|edge| (edge.id(), self.graph[edge.target()].name.as_str(), *edge.weight()))
            .collect();
        // petgraph walks a node's edge list newest first.
        out.sort_by_key(|(id, _, _)| *id);
        out.into_iter().map(|(_, target, kind)| (target, kind)).collect()
    }

    /// States with at least one transition into `name`, each listed once.
    pub fn predecessors(&self, name: &str) -> Vec<&str> {
        let Some(&idx) = self.node_indices.get(name) else {
            return vec![];
        };
        let sources: BTreeSet<&str> = self
            .graph
            .neighbors_directed(idx, Direction::Incoming)
            .map(|n| self.graph[n].name.as_str())
            .collect();
        sources.into_iter().collect()
    }

    /// Number of transitions into `name`; two rules naming the same target count twice.
    pub fn incoming_count(&self, name: &str) -> usize {
        self.node_indices.get(name).map_or(0, |&idx| {
            self.graph.edges_directed(idx, Direction::Incoming).count()
        })
    }

    /// Names that are referenced but never declared.
    pub fn undefined_references(&self) -> BTreeSet<&str> {
        self.graph
            .node_weights()
            .filter(|node| !node.defined)
            .map(|node| node.name.as_str())
            .collect()
    }

    /// `StartAt` plus every transition target.
    pub fn referenced(&self) -> BTreeSet<&str> {
        let mut referenced = BTreeSet::from([self.start()]);
        referenced.extend(
            self.graph
                .edge_references()
                .map(|edge| self.graph[edge.target()].name.as_str()),
        );
        referenced
    }

    /// Names reached by following transitions from `StartAt`, `StartAt` included.
    pub fn reachable_from_start(&self) -> BTreeSet<&str> {
        let mut reachable = BTreeSet::new();
        let mut bfs = Bfs::new(&self.graph, self.start);
        while let Some(nx) = bfs.next(&self.graph) {
            reachable.insert(self.graph[nx].name.as_str());
        }
        reachable
    }
}
