//! Dependency graph construction and cycle search using petgraph.
//!
//! Edges point from **dependent -> dependency**: if task `a` lists `b` in its
//! dependencies, the graph holds `a -> b`. A task listing itself produces a
//! self-loop edge.
//!
//! # Ordering
//!
//! Node indices are assigned in input order and edge indices in declaration
//! order, so traversal is fully determined by the input. petgraph yields a
//! node's outgoing edges newest-first; [`TaskGraph::successors`] re-sorts
//! them by [`EdgeIndex`] to restore declaration order.

use crate::domain::{Cycle, TaskId, TaskRecord};
use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;
use std::collections::HashMap;

/// Directed dependency graph over one batch of tasks.
pub(crate) struct TaskGraph {
    /// Nodes hold task IDs; edges carry no weight.
    graph: DiGraph<TaskId, ()>,
}

impl TaskGraph {
    /// Build the graph from already-filtered records.
    ///
    /// On duplicate IDs the first record owns the node and later records'
    /// edges attach to it.
    ///
    /// Dependencies that do not resolve to a node are skipped, so the
    /// graph is well-formed even if the existence filter was not applied.
    pub(crate) fn build(tasks: &[TaskRecord]) -> Self {
        let mut graph = DiGraph::with_capacity(tasks.len(), 0);
        let mut node_map = HashMap::with_capacity(tasks.len());

        for task in tasks {
            node_map
                .entry(task.id.clone())
                .or_insert_with(|| graph.add_node(task.id.clone()));
        }

        for task in tasks {
            let from = node_map[&task.id];
            for dep in &task.dependencies {
                if let Some(&to) = node_map.get(dep) {
                    graph.add_edge(from, to, ());
                }
            }
        }

        Self { graph }
    }

    /// Number of distinct task IDs in the graph
    pub(crate) fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of dependency edges in the graph
    pub(crate) fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Node for a task ID, if present
    #[cfg(test)]
    pub(crate) fn node(&self, id: &TaskId) -> Option<NodeIndex> {
        self.graph.node_indices().find(|&n| &self.graph[n] == id)
    }

    /// Outgoing neighbours of `node` in declaration order.
    fn successors(&self, node: NodeIndex) -> Vec<NodeIndex> {
        let mut edges: Vec<(EdgeIndex, NodeIndex)> = self
            .graph
            .edges(node)
            .map(|edge| (edge.id(), edge.target()))
            .collect();
        edges.sort_unstable_by_key(|(id, _)| *id);
        edges.into_iter().map(|(_, target)| target).collect()
    }

    /// Find every cycle reachable in the graph.
    ///
    /// Runs a depth-first search from each unvisited node in input order and
    /// records one [`Cycle`] per back-edge, i.e. every time an edge reaches a
    /// node that is still on the current path.
    pub(crate) fn find_cycles(&self) -> Vec<Cycle> {
        let mut traversal = Traversal::new(self);
        for start in self.graph.node_indices() {
            if !traversal.visited[start.index()] {
                traversal.explore(start);
            }
        }
        traversal.cycles
    }
}

/// One stack frame of the iterative DFS: a node, its successors and the
/// position of the next successor to try.
struct Frame {
    node: NodeIndex,
    successors: Vec<NodeIndex>,
    next: usize,
}

/// Per-call traversal state. Owned by a single `find_cycles` call.
struct Traversal<'g> {
    graph: &'g TaskGraph,
    /// Nodes that have been entered at least once
    visited: Vec<bool>,
    /// Nodes on the current path
    on_path: Vec<bool>,
    /// Current path from the root, in order
    path: Vec<NodeIndex>,
    cycles: Vec<Cycle>,
}

impl<'g> Traversal<'g> {
    fn new(graph: &'g TaskGraph) -> Self {
        let n = graph.node_count();
        Self {
            graph,
            visited: vec![false; n],
            on_path: vec![false; n],
            path: Vec::new(),
            cycles: Vec::new(),
        }
    }

    fn enter(&mut self, node: NodeIndex, stack: &mut Vec<Frame>) {
        self.visited[node.index()] = true;
        self.on_path[node.index()] = true;
        self.path.push(node);
        stack.push(Frame {
            node,
            successors: self.graph.successors(node),
            next: 0,
        });
    }

    fn explore(&mut self, start: NodeIndex) {
        let mut stack = Vec::new();
        self.enter(start, &mut stack);

        while let Some(frame) = stack.last_mut() {
            let Some(&child) = frame.successors.get(frame.next) else {
                let node = frame.node;
                stack.pop();
                self.path.pop();
                self.on_path[node.index()] = false;
                continue;
            };
            frame.next += 1;

            if self.on_path[child.index()] {
                self.record_cycle(child);
            } else if !self.visited[child.index()] {
                self.enter(child, &mut stack);
            }
        }
    }

    /// Record the path segment from `repeated` to the path tip, closed by
    /// `repeated` itself.
    fn record_cycle(&mut self, repeated: NodeIndex) {
        let Some(pos) = self.path.iter().position(|&n| n == repeated) else {
            return;
        };
        let graph = &self.graph.graph;
        let mut ids: Vec<TaskId> = self.path[pos..]
            .iter()
            .map(|&n| graph[n].clone())
            .collect();
        ids.push(graph[repeated].clone());
        tracing::trace!(cycle = ?ids, "back-edge found");
        self.cycles.push(Cycle(ids));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(cycle: &Cycle) -> Vec<&str> {
        cycle.ids().iter().map(TaskId::as_str).collect()
    }

    #[test]
    fn successors_follow_declaration_order() {
        let tasks = vec![
            TaskRecord::new("a", ["c", "b", "d"]),
            TaskRecord::new("b", Vec::<&str>::new()),
            TaskRecord::new("c", Vec::<&str>::new()),
            TaskRecord::new("d", Vec::<&str>::new()),
        ];
        let graph = TaskGraph::build(&tasks);
        let a = graph.node(&"a".into()).unwrap();
        let names: Vec<&str> = graph
            .successors(a)
            .into_iter()
            .map(|n| graph.graph[n].as_str())
            .collect();
        assert_eq!(names, vec!["c", "b", "d"]);
    }

    #[test]
    fn unresolved_dependencies_are_not_edges() {
        let tasks = vec![TaskRecord::new("a", ["ghost"])];
        let graph = TaskGraph::build(&tasks);
        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn duplicate_ids_share_first_node() {
        let tasks = vec![
            TaskRecord::new("a", Vec::<&str>::new()),
            TaskRecord::new("b", Vec::<&str>::new()),
            TaskRecord::new("a", ["b"]),
        ];
        let graph = TaskGraph::build(&tasks);
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.node(&"a".into()).unwrap().index(), 0);
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn three_node_cycle_is_closed() {
        let tasks = vec![
            TaskRecord::new("a", ["b"]),
            TaskRecord::new("b", ["c"]),
            TaskRecord::new("c", ["a"]),
        ];
        let cycles = TaskGraph::build(&tasks).find_cycles();
        assert_eq!(cycles.len(), 1);
        assert_eq!(ids(&cycles[0]), vec!["a", "b", "c", "a"]);
    }

    #[test]
    fn cycle_starts_at_repeated_node_not_root() {
        // root -> x -> y -> x: the root is not part of the cycle
        let tasks = vec![
            TaskRecord::new("root", ["x"]),
            TaskRecord::new("x", ["y"]),
            TaskRecord::new("y", ["x"]),
        ];
        let cycles = TaskGraph::build(&tasks).find_cycles();
        assert_eq!(cycles.len(), 1);
        assert_eq!(ids(&cycles[0]), vec!["x", "y", "x"]);
    }

    #[test]
    fn overlapping_cycles_through_same_node_are_all_reported() {
        // a -> b -> a and a -> c -> a
        let tasks = vec![
            TaskRecord::new("a", ["b", "c"]),
            TaskRecord::new("b", ["a"]),
            TaskRecord::new("c", ["a"]),
        ];
        let cycles = TaskGraph::build(&tasks).find_cycles();
        assert_eq!(cycles.len(), 2);
        assert_eq!(ids(&cycles[0]), vec!["a", "b", "a"]);
        assert_eq!(ids(&cycles[1]), vec!["a", "c", "a"]);
    }

    #[test]
    fn fully_visited_nodes_are_not_re_explored() {
        // b -> c -> b is found from a; starting again at b must not repeat it
        let tasks = vec![
            TaskRecord::new("a", ["b"]),
            TaskRecord::new("b", ["c"]),
            TaskRecord::new("c", ["b"]),
        ];
        let cycles = TaskGraph::build(&tasks).find_cycles();
        assert_eq!(cycles.len(), 1);
        assert_eq!(ids(&cycles[0]), vec!["b", "c", "b"]);
    }

    #[test]
    fn disjoint_cycles_are_reported_in_input_order() {
        let tasks = vec![
            TaskRecord::new("p", ["q"]),
            TaskRecord::new("q", ["p"]),
            TaskRecord::new("x", ["x"]),
        ];
        let cycles = TaskGraph::build(&tasks).find_cycles();
        assert_eq!(cycles.len(), 2);
        assert_eq!(ids(&cycles[0]), vec!["p", "q", "p"]);
        assert_eq!(ids(&cycles[1]), vec!["x", "x"]);
    }
}
