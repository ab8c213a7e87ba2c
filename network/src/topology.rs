use std::collections::{HashSet, VecDeque};

use record::{NodeId, ShortChannelId, MilliSatoshi, Direction};

use serde_derive::Serialize;

use super::graph::{Network, Node, Edge};

/// Size of the drawing area. Only carried through for the renderer.
#[derive(Serialize, Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct LayoutHints {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone)]
pub struct TopologyRequest {
    pub root: NodeId,
    pub depth: usize,
    pub hints: LayoutHints,
}

#[derive(Serialize, Debug, Clone, Eq, PartialEq)]
pub struct TopologyEdge {
    pub channel: ShortChannelId,
    pub direction: Direction,
    pub source: NodeId,
    pub destination: NodeId,
    pub capacity: MilliSatoshi,
}

/// Subgraph prepared for drawing: the included nodes, the open directed
/// edges between them and the largest capacity among those edges.
#[derive(Serialize, Debug, Clone, Default)]
pub struct Topology {
    root: Option<NodeId>,
    nodes: Vec<NodeId>,
    edges: Vec<TopologyEdge>,
    max_capacity: MilliSatoshi,
    hints: LayoutHints,
}

impl Topology {
    fn empty(root: Option<NodeId>, hints: LayoutHints) -> Self {
        Topology {
            root,
            hints,
            ..Default::default()
        }
    }

    /// Breadth first walk from the root, following only open edges,
    /// at most `depth` hops away. `None` if the root is not in the network.
    pub fn build(network: &Network, request: &TopologyRequest) -> Option<Self> {
        let root = network.node(&request.root)?;
        let mut topology = Topology::empty(Some(root.id().clone()), request.hints);
        topology.nodes.push(root.id().clone());

        let mut seen_nodes: HashSet<&NodeId> = HashSet::new();
        let mut seen_channels: HashSet<&ShortChannelId> = HashSet::new();
        let mut queue: VecDeque<(&Node, usize)> = VecDeque::new();
        seen_nodes.insert(root.id());
        queue.push_back((root, 0));

        while let Some((node, depth)) = queue.pop_front() {
            if depth >= request.depth {
                continue;
            }

            for id in node.channels() {
                if seen_channels.contains(id) {
                    continue;
                }
                let channel = match network.channel(id) {
                    Some(channel) => channel,
                    None => continue,
                };
                let far = match channel.other(node.id()) {
                    Some(far) => far,
                    None => continue,
                };

                let mut represented = false;
                for edge in channel.edges().iter() {
                    represented |= topology.include(edge);
                }
                if !represented {
                    continue;
                }
                seen_channels.insert(id);

                // no way back to the node being expanded, it covers self loops
                if far != node.id() && seen_nodes.insert(far) {
                    topology.nodes.push(far.clone());
                    if let Some(far_node) = network.node(far) {
                        queue.push_back((far_node, depth + 1));
                    }
                }
            }
        }

        Some(topology)
    }

    /// Every open edge of the network, each channel visited once.
    pub fn whole_network(network: &Network, hints: LayoutHints) -> Self {
        let mut topology = Topology::empty(None, hints);
        let mut seen_nodes: HashSet<&NodeId> = HashSet::new();

        for channel in network.channels() {
            let mut represented = false;
            for edge in channel.edges().iter() {
                represented |= topology.include(edge);
            }
            if !represented {
                continue;
            }
            for id in channel.node_1().into_iter().chain(channel.node_2()) {
                if seen_nodes.insert(id) {
                    topology.nodes.push(id.clone());
                }
            }
        }

        topology
    }

    // Edges with undefined or zero capacity are closed or never announced a policy.
    fn include(&mut self, edge: &Edge) -> bool {
        let capacity = match edge.capacity() {
            Some(capacity) if edge.is_open() => capacity,
            _ => return false,
        };
        let (source, destination) = match (edge.source(), edge.destination()) {
            (Some(source), Some(destination)) => (source, destination),
            _ => return false,
        };

        if capacity > self.max_capacity {
            self.max_capacity = capacity;
        }
        self.edges.push(TopologyEdge {
            channel: edge.channel().id().clone(),
            direction: edge.direction(),
            source: source.clone(),
            destination: destination.clone(),
            capacity,
        });
        true
    }

    pub fn root(&self) -> Option<&NodeId> {
        self.root.as_ref()
    }

    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    pub fn edges(&self) -> &[TopologyEdge] {
        &self.edges
    }

    pub fn max_capacity(&self) -> MilliSatoshi {
        self.max_capacity
    }

    pub fn hints(&self) -> LayoutHints {
        self.hints
    }

    pub fn contains_node(&self, id: &NodeId) -> bool {
        self.nodes.contains(id)
    }

    pub fn edge_between(&self, source: &NodeId, destination: &NodeId) -> Option<&TopologyEdge> {
        self.edges
            .iter()
            .find(|edge| edge.source == *source && edge.destination == *destination)
    }
}
