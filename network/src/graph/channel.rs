use record::{NodeId, ShortChannelId, MilliSatoshi, Direction, UpdateChannel};

#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Channel {
    id: ShortChannelId,
    // endpoints stay `None` until an announcement names them
    node_1: Option<NodeId>,
    node_2: Option<NodeId>,
    // arrival order, not timestamp order
    updates: Vec<UpdateChannel>,
}

impl Channel {
    pub fn new(id: ShortChannelId) -> Self {
        Channel {
            id,
            node_1: None,
            node_2: None,
            updates: Vec::new(),
        }
    }

    pub fn id(&self) -> &ShortChannelId {
        &self.id
    }

    pub fn node_1(&self) -> Option<&NodeId> {
        self.node_1.as_ref()
    }

    pub fn node_2(&self) -> Option<&NodeId> {
        self.node_2.as_ref()
    }

    pub fn updates(&self) -> &[UpdateChannel] {
        &self.updates
    }

    pub fn update_count(&self) -> usize {
        self.updates.len()
    }

    /// Given one endpoint, returns the other one.
    pub fn other(&self, id: &NodeId) -> Option<&NodeId> {
        match (self.node_1.as_ref(), self.node_2.as_ref()) {
            (Some(left), Some(right)) if left == id => Some(right),
            (Some(left), Some(right)) if right == id => Some(left),
            _ => None,
        }
    }

    pub fn edge(&self, direction: Direction) -> Edge {
        Edge {
            channel: self,
            direction,
        }
    }

    pub fn edges(&self) -> [Edge; 2] {
        [self.edge(Direction::Forward), self.edge(Direction::Backward)]
    }

    /// Fills the endpoints that are still unknown.
    /// Returns `false` if a known endpoint differs from the given one.
    pub(crate) fn set_endpoints(&mut self, node_1: &NodeId, node_2: &NodeId) -> bool {
        fn fill(slot: &mut Option<NodeId>, id: &NodeId) -> bool {
            match slot {
                Some(known) => *known == *id,
                None => {
                    *slot = Some(id.clone());
                    true
                },
            }
        }

        let left = fill(&mut self.node_1, node_1);
        let right = fill(&mut self.node_2, node_2);
        left && right
    }

    pub(crate) fn push_update(&mut self, update: UpdateChannel) {
        self.updates.push(update);
    }
}

/// One direction of a channel.
///
/// Not stored anywhere, it is a view over the channel's update history
/// filtered by the direction bit of each update.
#[derive(Copy, Clone, Debug)]
pub struct Edge<'a> {
    channel: &'a Channel,
    direction: Direction,
}

impl<'a> Edge<'a> {
    pub fn channel(&self) -> &'a Channel {
        self.channel
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn source(&self) -> Option<&'a NodeId> {
        match self.direction {
            Direction::Forward => self.channel.node_1(),
            Direction::Backward => self.channel.node_2(),
        }
    }

    pub fn destination(&self) -> Option<&'a NodeId> {
        self.counterpart().source()
    }

    pub fn counterpart(&self) -> Edge<'a> {
        self.channel.edge(self.direction.opposite())
    }

    pub fn updates(&self) -> impl Iterator<Item = &'a UpdateChannel> {
        let (channel, direction) = (self.channel, self.direction);
        channel
            .updates
            .iter()
            .filter(move |update| update.direction() == direction)
    }

    pub fn latest(&self) -> Option<&'a UpdateChannel> {
        self.updates().last()
    }

    /// `htlc_maximum` of the last update that arrived for this direction.
    pub fn capacity(&self) -> Option<MilliSatoshi> {
        self.latest().map(UpdateChannel::capacity)
    }

    /// Closed or never updated edges have no positive capacity.
    pub fn is_open(&self) -> bool {
        self.capacity().map(|c| u64::from(c) > 0).unwrap_or(false)
    }
}
