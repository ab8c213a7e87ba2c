use serde_derive::Serialize;

use record::{NodeId, ShortChannelId, MilliSatoshi, Direction};
use network::{Network, NetworkStats, DemandMap, Summary, Channel};

#[derive(Serialize, Debug)]
pub struct NodeRow {
    pub id: NodeId,
    pub channels: usize,
}

#[derive(Serialize, Debug)]
pub struct ChannelRow {
    pub id: ShortChannelId,
    pub node_1: Option<NodeId>,
    pub node_2: Option<NodeId>,
    pub updates: usize,
    pub capacity_forward: Option<MilliSatoshi>,
    pub capacity_backward: Option<MilliSatoshi>,
}

impl From<&Channel> for ChannelRow {
    fn from(channel: &Channel) -> Self {
        ChannelRow {
            id: channel.id().clone(),
            node_1: channel.node_1().cloned(),
            node_2: channel.node_2().cloned(),
            updates: channel.update_count(),
            capacity_forward: channel.edge(Direction::Forward).capacity(),
            capacity_backward: channel.edge(Direction::Backward).capacity(),
        }
    }
}

#[derive(Serialize, Debug)]
pub struct DemandRow {
    pub id: NodeId,
    pub demand: u64,
}

#[derive(Serialize, Debug)]
pub struct SummaryReport {
    pub network: NetworkStats,
    pub top_nodes: Vec<NodeRow>,
    pub top_channels: Vec<ChannelRow>,
    pub top_demand: Vec<DemandRow>,
}

fn take<T>(rows: Vec<T>, limit: Option<usize>) -> Vec<T> {
    match limit {
        Some(limit) => rows.into_iter().take(limit).collect(),
        None => rows,
    }
}

pub fn nodes(network: &Network, limit: Option<usize>) -> Vec<NodeRow> {
    let rows = network
        .nodes_by_channel_count()
        .into_iter()
        .map(|node| NodeRow { id: node.id().clone(), channels: node.channel_count() })
        .collect();
    take(rows, limit)
}

pub fn channels(network: &Network, limit: Option<usize>) -> Vec<ChannelRow> {
    let rows = network
        .channels_by_update_count()
        .into_iter()
        .map(ChannelRow::from)
        .collect();
    take(rows, limit)
}

pub fn demand(demand: &DemandMap, limit: Option<usize>) -> Vec<DemandRow> {
    let rows = demand
        .ranked()
        .into_iter()
        .map(|(id, demand)| DemandRow { id: id.clone(), demand })
        .collect();
    take(rows, limit)
}

// The summary already holds the demand computed when the load finished.
pub fn summary(network: &Network, summary: &Summary, limit: Option<usize>) -> SummaryReport {
    let limit = Some(limit.unwrap_or(10));
    SummaryReport {
        network: summary.network,
        top_nodes: nodes(network, limit),
        top_channels: channels(network, limit),
        top_demand: demand(&summary.demand, limit),
    }
}
