use std::convert::TryFrom;

use dependencies::bitflags::bitflags;
use dependencies::chrono::{NaiveDateTime, TimeZone, Utc};

use super::types::{ShortChannelId, MilliSatoshi, Direction};
use super::codec::{DecodeError, split_fields, parse_field, hex_field, non_empty_field};

/// The textual timestamp form used by the dumps, interpreted as UTC.
pub const TIMESTAMP_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

bitflags! {
    pub struct ChannelUpdateFlags: u8 {
        const DIRECTION = 0b00000001;
        const DISABLED = 0b00000010;
    }
}

impl ChannelUpdateFlags {
    pub fn direction(&self) -> Direction {
        if self.contains(ChannelUpdateFlags::DIRECTION) {
            Direction::Backward
        } else {
            Direction::Forward
        }
    }

    pub fn disabled(&self) -> bool {
        self.contains(ChannelUpdateFlags::DISABLED)
    }
}

/// A `channel_update` row of the dump.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct UpdateChannel {
    pub signature: String,
    pub chain_hash: String,
    pub short_channel_id: ShortChannelId,
    /// seconds since the unix epoch
    pub timestamp: u32,
    pub message_flags: u8,
    pub channel_flags: ChannelUpdateFlags,
    pub time_lock_delta: u16,
    pub htlc_minimum: MilliSatoshi,
    pub base_fee: u32,
    pub fee_rate: u32,
    pub htlc_maximum: MilliSatoshi,
}

impl UpdateChannel {
    pub const FIELD_COUNT: usize = 11;

    pub fn decode(line: &str) -> Result<Self, DecodeError> {
        let f = split_fields(line, Self::FIELD_COUNT)?;

        hex_field(&f, 1)?;
        non_empty_field(&f, 2)?;
        let timestamp = parse_timestamp(f[3]).ok_or(DecodeError::FieldParseError(3))?;
        // 0..=3: bit 0 is the direction, bit 1 marks a disabled edge; any other bit fails
        let channel_flags = ChannelUpdateFlags::from_bits(parse_field(&f, 5)?)
            .ok_or(DecodeError::FieldParseError(5))?;

        Ok(UpdateChannel {
            signature: f[0].to_owned(),
            chain_hash: f[1].to_owned(),
            short_channel_id: ShortChannelId::new(f[2]),
            timestamp,
            message_flags: parse_field(&f, 4)?,
            channel_flags,
            time_lock_delta: parse_field(&f, 6)?,
            htlc_minimum: MilliSatoshi::from(parse_field::<u64>(&f, 7)?),
            base_fee: parse_field(&f, 8)?,
            fee_rate: parse_field(&f, 9)?,
            htlc_maximum: MilliSatoshi::from(parse_field::<u64>(&f, 10)?),
        })
    }

    pub fn id(&self) -> &ShortChannelId {
        &self.short_channel_id
    }

    pub fn direction(&self) -> Direction {
        self.channel_flags.direction()
    }

    /// The amount the directed edge can carry right after this update.
    pub fn capacity(&self) -> MilliSatoshi {
        self.htlc_maximum
    }
}

/// Tries the textual form first, then a raw epoch value.
pub fn parse_timestamp(s: &str) -> Option<u32> {
    let s = s.trim();
    let seconds = match NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT) {
        Ok(naive) => Utc.from_utc_datetime(&naive).timestamp(),
        Err(_) => s.parse::<i64>().ok()?,
    };
    u32::try_from(seconds).ok()
}
