//! Evaluation order for solver passes.
//!
//! Devices are grouped into strongly connected components. Components are
//! visited in topological order; devices inside one component (a loop) are
//! visited in ascending id order, every pass, so identical inputs always give
//! identical results.

use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use pn_core::DeviceId;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EvaluationOrder {
    sequence: Vec<DeviceId>,
    /// Components with more than one device
    cycles: Vec<Vec<DeviceId>>,
}

impl EvaluationOrder {
    /// Build from `device_count` devices and directed device-level edges.
    pub fn from_edges(
        device_count: usize,
        edges: impl IntoIterator<Item = (DeviceId, DeviceId)>,
    ) -> Self {
        let mut g: DiGraph<DeviceId, ()> = DiGraph::with_capacity(device_count, 0);
        for i in 0..device_count {
            g.add_node(DeviceId::from_index(i as u32));
        }
        for (from, to) in edges {
            g.update_edge(NodeIndex::new(from.slot()), NodeIndex::new(to.slot()), ());
        }

        let mut sequence = Vec::with_capacity(device_count);
        let mut cycles = Vec::new();

        // tarjan_scc yields components in reverse topological order
        for scc in tarjan_scc(&g).into_iter().rev() {
            let mut members: Vec<DeviceId> = scc.into_iter().map(|n| g[n]).collect();
            members.sort();
            if members.len() > 1 {
                cycles.push(members.clone());
            }
            sequence.extend(members);
        }

        Self { sequence, cycles }
    }

    /// Devices in evaluation order.
    pub fn sequence(&self) -> &[DeviceId] {
        &self.sequence
    }

    /// Groups of devices that feed back into each other.
    pub fn cycles(&self) -> &[Vec<DeviceId>] {
        &self.cycles
    }

    pub fn is_acyclic(&self) -> bool {
        self.cycles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(i: u32) -> DeviceId {
        DeviceId::from_index(i)
    }

    fn pos(order: &EvaluationOrder, d: DeviceId) -> usize {
        order.sequence().iter().position(|&x| x == d).unwrap()
    }

    #[test]
    fn chain_is_topological_even_when_ids_are_reversed() {
        // 2 -> 1 -> 0
        let order = EvaluationOrder::from_edges(3, [(id(2), id(1)), (id(1), id(0))]);
        assert_eq!(order.sequence(), &[id(2), id(1), id(0)]);
        assert!(order.is_acyclic());
    }

    #[test]
    fn diamond_respects_dependencies() {
        // 0 -> {1, 2} -> 3
        let order = EvaluationOrder::from_edges(
            4,
            [(id(0), id(1)), (id(0), id(2)), (id(1), id(3)), (id(2), id(3))],
        );
        assert_eq!(pos(&order, id(0)), 0);
        assert_eq!(pos(&order, id(3)), 3);
        assert!(order.is_acyclic());
    }

    #[test]
    fn loop_members_are_sorted_by_id() {
        // 0 -> 3 -> 1 -> 2 -> 3 (loop {1, 2, 3}), 2 -> 4
        let order = EvaluationOrder::from_edges(
            5,
            [
                (id(0), id(3)),
                (id(3), id(1)),
                (id(1), id(2)),
                (id(2), id(3)),
                (id(2), id(4)),
            ],
        );
        assert_eq!(order.sequence(), &[id(0), id(1), id(2), id(3), id(4)]);
        assert_eq!(order.cycles(), &[vec![id(1), id(2), id(3)]]);
        assert!(!order.is_acyclic());
    }

    #[test]
    fn order_is_reproducible() {
        let edges = [(id(0), id(1)), (id(1), id(2)), (id(2), id(1)), (id(2), id(3))];
        let a = EvaluationOrder::from_edges(4, edges);
        let b = EvaluationOrder::from_edges(4, edges);
        assert_eq!(a, b);
    }
}
