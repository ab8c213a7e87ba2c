use std::fmt;

use serde_derive::{Serialize, Deserialize};

/// Identity of a node as it appears in the dump, usually a hex public key.
#[derive(Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize, Debug)]
pub struct NodeId(String);

impl NodeId {
    pub fn new<S>(s: S) -> Self where S: Into<String> {
        NodeId(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        NodeId::new(s)
    }
}

/// Short channel id as it appears in the dump, usually `BLOCKxTXxOUTPUT`.
#[derive(Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize, Debug)]
pub struct ShortChannelId(String);

impl ShortChannelId {
    pub fn new<S>(s: S) -> Self where S: Into<String> {
        ShortChannelId(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ShortChannelId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ShortChannelId {
    fn from(s: &str) -> Self {
        ShortChannelId::new(s)
    }
}

#[derive(Default, Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Serialize, Deserialize, Debug)]
#[serde(transparent)]
pub struct MilliSatoshi {
    raw: u64,
}

impl From<MilliSatoshi> for u64 {
    fn from(m: MilliSatoshi) -> Self {
        return m.raw;
    }
}

impl From<u64> for MilliSatoshi {
    fn from(s: u64) -> MilliSatoshi {
        MilliSatoshi { raw: s }
    }
}

impl fmt::Display for MilliSatoshi {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} msat", self.raw)
    }
}

/// Which of the two edges of a channel an update describes.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize, Debug)]
pub enum Direction {
    /// node1 -> node2
    Forward,
    /// node2 -> node1
    Backward,
}

impl Direction {
    pub fn opposite(self) -> Self {
        match self {
            Direction::Forward => Direction::Backward,
            Direction::Backward => Direction::Forward,
        }
    }
}
