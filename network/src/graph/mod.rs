use std::collections::HashSet;

use dependencies::log::{debug, warn};

use record::{
    NodeId, ShortChannelId, MilliSatoshi, Direction, RecordKind,
    AnnouncementChannel, UpdateChannel,
};

use serde_derive::Serialize;

use super::store::Store;

mod channel;
mod node;

pub use self::channel::{Channel, Edge};
pub use self::node::Node;

pub const DEFAULT_NODE_BUCKETS: usize = 10_000;
pub const DEFAULT_CHANNEL_BUCKETS: usize = 100_000;

#[derive(Serialize, Clone, Copy, Default, Eq, PartialEq, Debug)]
pub struct NetworkStats {
    pub nodes: usize,
    pub channels: usize,
    pub updates: usize,
    pub orphan_updates: usize,
}

/// Owns every node and channel of one load session.
///
/// Nodes and channels refer to each other by id only, all references
/// are resolved through the two stores.
#[derive(Debug)]
pub struct Network {
    nodes: Store<NodeId, Node>,
    channels: Store<ShortChannelId, Channel>,
    loaded: HashSet<RecordKind>,
    orphan_updates: usize,
}

impl Default for Network {
    fn default() -> Self {
        Network::with_capacity(DEFAULT_NODE_BUCKETS, DEFAULT_CHANNEL_BUCKETS)
    }
}

impl Network {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(node_buckets: usize, channel_buckets: usize) -> Self {
        Network {
            nodes: Store::new(node_buckets),
            channels: Store::new(channel_buckets),
            loaded: HashSet::new(),
            orphan_updates: 0,
        }
    }

    /// Creates the channel and both its nodes if they are not known yet and links them.
    pub fn add_announcement(&mut self, announcement: &AnnouncementChannel) {
        let id = announcement.id();
        let (ref left, ref right) = announcement.node_id;

        let channel = self.channels.insert_or_get(id, || Channel::new(id.clone()));
        if !channel.set_endpoints(left, right) {
            warn!(
                "channel {} announced again with other endpoints {} {}, keeping the first ones",
                id, left, right,
            );
        }
        // link the endpoints the channel really has, they may come from an earlier announcement
        let endpoints = channel.node_1().cloned().into_iter().chain(channel.node_2().cloned());

        for node_id in endpoints {
            self.nodes
                .insert_or_get(&node_id, || Node::new(node_id.clone()))
                .link(id);
        }
    }

    /// Appends the update to the channel history.
    ///
    /// An update for a channel that was never announced is dropped,
    /// the return value tells whether it was applied.
    pub fn add_channel_update(&mut self, id: &ShortChannelId, update: UpdateChannel) -> bool {
        match self.channels.get_mut(id) {
            Some(channel) => {
                channel.push_update(update);
                true
            },
            None => {
                debug!("dropping update for unknown channel {}", id);
                self.orphan_updates += 1;
                false
            },
        }
    }

    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn channel(&self, id: &ShortChannelId) -> Option<&Channel> {
        self.channels.get(id)
    }

    pub fn edge(&self, id: &ShortChannelId, direction: Direction) -> Option<Edge> {
        self.channel(id).map(|channel| channel.edge(direction))
    }

    pub fn capacity_of(&self, id: &ShortChannelId, direction: Direction) -> Option<MilliSatoshi> {
        self.edge(id, direction).and_then(|edge| edge.capacity())
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().map(|(_, node)| node)
    }

    pub fn channels(&self) -> impl Iterator<Item = &Channel> {
        self.channels.iter().map(|(_, channel)| channel)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Most connected nodes first, ties broken by id.
    pub fn nodes_by_channel_count(&self) -> Vec<&Node> {
        let mut nodes = self.nodes.to_ordered_list();
        nodes.sort_by(|a, b| {
            b.channel_count()
                .cmp(&a.channel_count())
                .then_with(|| a.id().cmp(b.id()))
        });
        nodes
    }

    /// Most updated channels first, ties broken by id.
    pub fn channels_by_update_count(&self) -> Vec<&Channel> {
        let mut channels = self.channels.to_ordered_list();
        channels.sort_by(|a, b| {
            b.update_count()
                .cmp(&a.update_count())
                .then_with(|| a.id().cmp(b.id()))
        });
        channels
    }

    pub fn has_loaded(&self, kind: RecordKind) -> bool {
        self.loaded.contains(&kind)
    }

    pub(crate) fn mark_loaded(&mut self, kind: RecordKind) {
        self.loaded.insert(kind);
    }

    pub fn stats(&self) -> NetworkStats {
        NetworkStats {
            nodes: self.nodes.len(),
            channels: self.channels.len(),
            updates: self.channels().map(Channel::update_count).sum(),
            orphan_updates: self.orphan_updates,
        }
    }
}

#[cfg(test)]
pub(crate) mod test {
    use super::*;
    use dependencies::pretty_assertions;
    use pretty_assertions::assert_eq;
    use record::ChannelUpdateFlags;

    pub fn announcement(id: &str, left: &str, right: &str) -> AnnouncementChannel {
        AnnouncementChannel {
            node_signature: ("s1".to_owned(), "s2".to_owned()),
            bitcoin_signature: ("b1".to_owned(), "b2".to_owned()),
            features: String::new(),
            chain_hash: "00".to_owned(),
            short_channel_id: ShortChannelId::from(id),
            node_id: (NodeId::from(left), NodeId::from(right)),
            bitcoin_key: ("k1".to_owned(), "k2".to_owned()),
        }
    }

    pub fn update(id: &str, direction: Direction, timestamp: u32, capacity: u64) -> UpdateChannel {
        let channel_flags = match direction {
            Direction::Forward => ChannelUpdateFlags::empty(),
            Direction::Backward => ChannelUpdateFlags::DIRECTION,
        };
        UpdateChannel {
            signature: "sig".to_owned(),
            chain_hash: "00".to_owned(),
            short_channel_id: ShortChannelId::from(id),
            timestamp,
            message_flags: 1,
            channel_flags,
            time_lock_delta: 40,
            htlc_minimum: MilliSatoshi::from(1000),
            base_fee: 1000,
            fee_rate: 1,
            htlc_maximum: MilliSatoshi::from(capacity),
        }
    }

    pub fn apply(network: &mut Network, update: UpdateChannel) -> bool {
        let id = update.id().clone();
        network.add_channel_update(&id, update)
    }

    #[test]
    fn announcement_is_idempotent() {
        let mut network = Network::with_capacity(8, 8);
        network.add_announcement(&announcement("1x1x1", "aa", "bb"));
        network.add_announcement(&announcement("1x1x1", "aa", "bb"));

        assert_eq!(network.channel_count(), 1);
        assert_eq!(network.node_count(), 2);
        let node = network.node(&NodeId::from("aa")).unwrap();
        assert_eq!(node.channels(), &[ShortChannelId::from("1x1x1")]);
    }

    #[test]
    fn reannouncement_keeps_first_endpoints() {
        let mut network = Network::with_capacity(8, 8);
        network.add_announcement(&announcement("1x1x1", "aa", "bb"));
        network.add_announcement(&announcement("1x1x1", "aa", "cc"));

        let channel = network.channel(&ShortChannelId::from("1x1x1")).unwrap();
        assert_eq!(channel.node_2(), Some(&NodeId::from("bb")));
        assert!(network.node(&NodeId::from("cc")).is_none());
    }

    #[test]
    fn orphan_update_is_dropped() {
        let mut network = Network::with_capacity(8, 8);
        assert!(!apply(&mut network, update("9x9x9", Direction::Forward, 1, 100)));

        assert_eq!(network.channel_count(), 0);
        assert!(network.channel(&ShortChannelId::from("9x9x9")).is_none());
        assert_eq!(network.stats().orphan_updates, 1);
    }

    #[test]
    fn last_arrived_update_wins() {
        let mut network = Network::with_capacity(8, 8);
        network.add_announcement(&announcement("1x1x1", "aa", "bb"));
        // the second update is older but arrived later
        assert!(apply(&mut network, update("1x1x1", Direction::Forward, 2000, 100)));
        assert!(apply(&mut network, update("1x1x1", Direction::Forward, 1000, 50)));
        assert!(apply(&mut network, update("1x1x1", Direction::Backward, 3000, 70)));

        let id = ShortChannelId::from("1x1x1");
        assert_eq!(network.capacity_of(&id, Direction::Forward), Some(MilliSatoshi::from(50)));
        assert_eq!(network.capacity_of(&id, Direction::Backward), Some(MilliSatoshi::from(70)));
        assert_eq!(network.stats().updates, 3);
    }

    #[test]
    fn capacity_undefined_without_updates() {
        let mut network = Network::with_capacity(8, 8);
        network.add_announcement(&announcement("1x1x1", "aa", "bb"));
        apply(&mut network, update("1x1x1", Direction::Forward, 1, 100));

        let id = ShortChannelId::from("1x1x1");
        assert_eq!(network.capacity_of(&id, Direction::Backward), None);
        assert_eq!(network.capacity_of(&ShortChannelId::from("2x2x2"), Direction::Forward), None);
    }

    #[test]
    fn edges_are_counterparts() {
        let mut network = Network::with_capacity(8, 8);
        network.add_announcement(&announcement("1x1x1", "aa", "bb"));

        let channel = network.channel(&ShortChannelId::from("1x1x1")).unwrap();
        let [forward, backward] = channel.edges();
        assert_eq!(forward.source(), Some(&NodeId::from("aa")));
        assert_eq!(forward.destination(), Some(&NodeId::from("bb")));
        assert_eq!(backward.source(), forward.destination());
        assert_eq!(forward.counterpart().direction(), Direction::Backward);
        assert_eq!(channel.other(&NodeId::from("bb")), Some(&NodeId::from("aa")));
        assert_eq!(channel.other(&NodeId::from("cc")), None);
    }

    #[test]
    fn ordered_lists() {
        let mut network = Network::with_capacity(4, 4);
        network.add_announcement(&announcement("1x1x1", "aa", "bb"));
        network.add_announcement(&announcement("2x2x2", "bb", "cc"));
        network.add_announcement(&announcement("3x3x3", "bb", "dd"));
        apply(&mut network, update("2x2x2", Direction::Forward, 1, 100));
        apply(&mut network, update("2x2x2", Direction::Backward, 1, 100));
        apply(&mut network, update("3x3x3", Direction::Forward, 1, 100));

        let nodes = network
            .nodes_by_channel_count()
            .into_iter()
            .map(|n| n.id().as_str())
            .collect::<Vec<_>>();
        assert_eq!(nodes, vec!["bb", "aa", "cc", "dd"]);

        let channels = network
            .channels_by_update_count()
            .into_iter()
            .map(|c| c.id().as_str())
            .collect::<Vec<_>>();
        assert_eq!(channels, vec!["2x2x2", "3x3x3", "1x1x1"]);
    }
}
