//! Segment identifiers
//!
//! The viewer stores 64-bit segment ids as decimal strings because JSON numbers
//! lose precision above 2^53. Ids are written as strings and read back from
//! either form.

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Identifier of one segment (a traced neuron, mesh or skeleton) in a layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SegmentId(pub u64);

impl SegmentId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for SegmentId {
    fn from(id: u64) -> Self {
        SegmentId(id)
    }
}

impl fmt::Display for SegmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SegmentId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<u64>().map(SegmentId)
    }
}

impl Serialize for SegmentId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

struct SegmentIdVisitor;

impl<'de> Visitor<'de> for SegmentIdVisitor {
    type Value = SegmentId;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an unsigned segment id as a number or decimal string")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<SegmentId, E> {
        Ok(SegmentId(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<SegmentId, E> {
        u64::try_from(v)
            .map(SegmentId)
            .map_err(|_| E::invalid_value(de::Unexpected::Signed(v), &self))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<SegmentId, E> {
        v.parse()
            .map_err(|_| E::invalid_value(de::Unexpected::Str(v), &self))
    }
}

impl<'de> Deserialize<'de> for SegmentId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(SegmentIdVisitor)
    }
}
