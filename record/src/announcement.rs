use super::types::{NodeId, ShortChannelId};
use super::codec::{DecodeError, DELIMITER, split_fields, hex_field, non_empty_field};

/// A `channel_announcement` row of the dump.
///
/// Signatures, features and bitcoin keys are kept verbatim, the analyzer
/// never verifies them. Node ids are opaque, only their presence is checked.
/// The chain hash must be hex, which is what tells a header row apart.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct AnnouncementChannel {
    pub node_signature: (String, String),
    pub bitcoin_signature: (String, String),
    pub features: String,
    pub chain_hash: String,
    pub short_channel_id: ShortChannelId,
    pub node_id: (NodeId, NodeId),
    pub bitcoin_key: (String, String),
}

impl AnnouncementChannel {
    pub const FIELD_COUNT: usize = 11;

    const CHAIN_HASH: usize = 5;
    const SHORT_CHANNEL_ID: usize = 6;
    const NODE_ID_1: usize = 7;
    const NODE_ID_2: usize = 8;

    pub fn decode(line: &str) -> Result<Self, DecodeError> {
        let f = split_fields(line, Self::FIELD_COUNT)?;

        hex_field(&f, Self::CHAIN_HASH)?;
        non_empty_field(&f, Self::SHORT_CHANNEL_ID)?;
        non_empty_field(&f, Self::NODE_ID_1)?;
        non_empty_field(&f, Self::NODE_ID_2)?;

        Ok(AnnouncementChannel {
            node_signature: (f[0].to_owned(), f[1].to_owned()),
            bitcoin_signature: (f[2].to_owned(), f[3].to_owned()),
            features: f[4].to_owned(),
            chain_hash: f[5].to_owned(),
            short_channel_id: ShortChannelId::new(f[6]),
            node_id: (NodeId::new(f[7]), NodeId::new(f[8])),
            bitcoin_key: (f[9].to_owned(), f[10].to_owned()),
        })
    }

    pub fn encode(&self) -> String {
        let fields = [
            self.node_signature.0.as_str(),
            self.node_signature.1.as_str(),
            self.bitcoin_signature.0.as_str(),
            self.bitcoin_signature.1.as_str(),
            self.features.as_str(),
            self.chain_hash.as_str(),
            self.short_channel_id.as_str(),
            self.node_id.0.as_str(),
            self.node_id.1.as_str(),
            self.bitcoin_key.0.as_str(),
            self.bitcoin_key.1.as_str(),
        ];
        let delimiter = DELIMITER.to_string();
        fields.join(delimiter.as_str())
    }

    pub fn id(&self) -> &ShortChannelId {
        &self.short_channel_id
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use dependencies::pretty_assertions;
    use pretty_assertions::assert_eq;

    const CHAIN: &str = "6fe28c0ab6f1b372c1a6a246ae63f74f931e8365e15a089c68d6190000000000";

    const LINE: &str = "3045sig1,3045sig2,3044btc1,3044btc2,,\
        6fe28c0ab6f1b372c1a6a246ae63f74f931e8365e15a089c68d6190000000000,\
        556921x1734x1,\
        02eec7245d6b7d2ccb30380bfbe2a3648cd7a942653f5aa340edcea1f283686619,\
        0324653eac434488002cc06bbfb7f10fe18991e35f9fe4302dbea6d2353dc0ab1c,\
        027f31ebc5462c1fdce1b737ecff52d37d75dea43ce11c74d25aa297165faa2007,\
        032c0b7cf95324a07d05398b240174dc0c2be444d96b159aa6c7f7b1e668680991";

    #[test]
    fn announcement_decode_encode() {
        let announcement = AnnouncementChannel::decode(LINE).unwrap();
        assert_eq!(announcement.id(), &ShortChannelId::from("556921x1734x1"));
        assert_eq!(
            announcement.node_id.0,
            NodeId::from("02eec7245d6b7d2ccb30380bfbe2a3648cd7a942653f5aa340edcea1f283686619"),
        );
        assert_eq!(announcement.features, "");

        // the encoded row must be byte for byte the same
        assert_eq!(announcement.encode(), LINE);
    }

    #[test]
    fn announcement_header_is_rejected() {
        let header = "node_signature_1,node_signature_2,bitcoin_signature_1,bitcoin_signature_2,\
            features,chain_hash,short_channel_id,node_id_1,node_id_2,bitcoin_key_1,bitcoin_key_2";
        assert_eq!(AnnouncementChannel::decode(header), Err(DecodeError::FieldParseError(5)));
    }

    #[test]
    fn announcement_wrong_field_count() {
        assert_eq!(
            AnnouncementChannel::decode("a,b,c"),
            Err(DecodeError::FieldCountMismatch { expected: 11, found: 3 }),
        );
    }

    #[test]
    fn announcement_opaque_node_ids() {
        let line = format!("s1,s2,b1,b2,,{},1x1x1,A,B,k1,k2", CHAIN);
        let announcement = AnnouncementChannel::decode(&line).unwrap();
        assert_eq!(announcement.node_id, (NodeId::from("A"), NodeId::from("B")));
    }

    #[test]
    fn announcement_missing_node_id() {
        let line = format!("s1,s2,b1,b2,,{},1x1x1,A,,k1,k2", CHAIN);
        assert_eq!(AnnouncementChannel::decode(&line), Err(DecodeError::FieldParseError(8)));
    }

    #[test]
    fn announcement_round_trips() {
        let lines = vec![
            LINE.to_owned(),
            // non-empty features
            format!("s1,s2,b1,b2,0102,{},556921x1734x1,A,B,k1,k2", CHAIN),
            // short and opaque ids
            format!("s1,s2,b1,b2,,{},612345678901,A,B,k1,k2", CHAIN),
            format!("s1,s2,b1,b2,,{},7,node-a,node-b,,", CHAIN),
        ];
        for line in lines {
            let announcement = AnnouncementChannel::decode(&line).unwrap();
            assert_eq!(announcement.encode(), line);
        }
    }

    #[test]
    fn announcement_crlf_is_not_encoded() {
        let line = format!("s1,s2,b1,b2,,{},1x1x1,A,B,k1,k2", CHAIN);
        let announcement = AnnouncementChannel::decode(&format!("{}\r\n", line)).unwrap();
        assert_eq!(announcement.bitcoin_key.1, "k2");
        assert_eq!(announcement.encode(), line);
    }
}
