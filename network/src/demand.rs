use std::collections::HashMap;

use record::{NodeId, UpdateChannel};

use serde_derive::Serialize;

use super::graph::{Network, Edge};

/// What is attributed to the destination node of an edge.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum DemandMetric {
    /// One unit per update seen on the edge.
    UpdateCount,
    /// The sum of every drop of the edge capacity between consecutive updates.
    CapacityDecrease,
}

impl Default for DemandMetric {
    fn default() -> Self {
        DemandMetric::UpdateCount
    }
}

impl DemandMetric {
    fn measure(self, edge: &Edge) -> u64 {
        match self {
            DemandMetric::UpdateCount => edge.updates().count() as u64,
            DemandMetric::CapacityDecrease => {
                let mut previous: Option<u64> = None;
                let mut total = 0u64;
                for capacity in edge.updates().map(UpdateChannel::capacity).map(u64::from) {
                    if let Some(previous) = previous {
                        total = total.saturating_add(previous.saturating_sub(capacity));
                    }
                    previous = Some(capacity);
                }
                total
            },
        }
    }
}

/// Accumulated demand per node. A node without any demand is absent,
/// `get` reads it as zero.
#[derive(Serialize, Debug, Clone, Default, Eq, PartialEq)]
pub struct DemandMap(HashMap<NodeId, u64>);

impl DemandMap {
    pub fn get(&self, id: &NodeId) -> u64 {
        self.0.get(id).cloned().unwrap_or(0)
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.0.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Highest demand first, ties broken by id.
    pub fn ranked(&self) -> Vec<(&NodeId, u64)> {
        let mut ranked = self.0.iter().map(|(id, &amount)| (id, amount)).collect::<Vec<_>>();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked
    }

    fn add(&mut self, id: &NodeId, amount: u64) {
        let entry = self.0.entry(id.clone()).or_insert(0);
        *entry = entry.saturating_add(amount);
    }
}

/// Walks the incident channels of every node and attributes the activity
/// of the edges terminating at that node.
pub fn estimate(network: &Network, metric: DemandMetric) -> DemandMap {
    let mut demand = DemandMap::default();

    for node in network.nodes() {
        let incoming = node
            .channels()
            .iter()
            .filter_map(|id| network.channel(id))
            .flat_map(|channel| channel.edges().to_vec())
            .filter(|edge| edge.destination() == Some(node.id()));

        for edge in incoming {
            if edge.updates().next().is_none() {
                continue;
            }
            let amount = metric.measure(&edge);
            if amount > 0 {
                demand.add(node.id(), amount);
            }
        }
    }

    demand
}
