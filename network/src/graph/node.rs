use record::{NodeId, ShortChannelId};

#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Node {
    id: NodeId,
    // incident channels, each at most once, in the order they were linked
    channels: Vec<ShortChannelId>,
}

impl Node {
    pub fn new(id: NodeId) -> Self {
        Node {
            id,
            channels: Vec::new(),
        }
    }

    pub fn id(&self) -> &NodeId {
        &self.id
    }

    pub fn channels(&self) -> &[ShortChannelId] {
        &self.channels
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    pub(crate) fn link(&mut self, channel: &ShortChannelId) -> bool {
        if self.channels.contains(channel) {
            false
        } else {
            self.channels.push(channel.clone());
            true
        }
    }
}
