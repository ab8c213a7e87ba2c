use std::path::Path;

use dependencies::log::{debug, info};

use record::{decode, Record, RecordKind};

use serde_derive::Serialize;

use super::error::{LoadError, PreconditionError};
use super::graph::{Network, DEFAULT_NODE_BUCKETS, DEFAULT_CHANNEL_BUCKETS};

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct LoadSettings {
    pub node_buckets: usize,
    pub channel_buckets: usize,
    pub announcement_prefix: String,
    pub update_prefix: String,
}

impl Default for LoadSettings {
    fn default() -> Self {
        LoadSettings {
            node_buckets: DEFAULT_NODE_BUCKETS,
            channel_buckets: DEFAULT_CHANNEL_BUCKETS,
            announcement_prefix: "channel_announcement".to_owned(),
            update_prefix: "channel_update".to_owned(),
        }
    }
}

impl LoadSettings {
    pub fn prefix(&self, kind: RecordKind) -> &str {
        match kind {
            RecordKind::Announcement => &self.announcement_prefix,
            RecordKind::Update => &self.update_prefix,
        }
    }

    pub fn network(&self) -> Network {
        Network::with_capacity(self.node_buckets, self.channel_buckets)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Progress<'a> {
    pub line: &'a str,
    pub processed: usize,
    pub total: usize,
}

impl<'a> Progress<'a> {
    pub fn fraction(&self) -> f64 {
        if self.total == 0 || self.processed >= self.total {
            1.0
        } else {
            self.processed as f64 / self.total as f64
        }
    }
}

#[derive(Serialize, Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct IngestStats {
    pub lines: usize,
    pub records: usize,
    pub header_skipped: bool,
    pub orphan_updates: usize,
}

/// The file name, not the directory, must start with the prefix of its record kind.
pub fn check_file_kind(path: &Path, kind: RecordKind, settings: &LoadSettings) -> Result<(), PreconditionError> {
    let prefix = settings.prefix(kind);
    let matches = path
        .file_name()
        .map(|name| name.to_string_lossy().to_lowercase().starts_with(&prefix.to_lowercase()))
        .unwrap_or(false);

    if matches {
        Ok(())
    } else {
        Err(PreconditionError::WrongFileKind {
            path: path.to_owned(),
            expected: kind,
            prefix: prefix.to_owned(),
        })
    }
}

/// Updates refer to channels by id, so announcements must be in the network first.
pub fn check_prerequisites(network: &Network, kind: RecordKind) -> Result<(), PreconditionError> {
    match kind {
        RecordKind::Announcement => Ok(()),
        RecordKind::Update => {
            if network.has_loaded(RecordKind::Announcement) {
                Ok(())
            } else {
                Err(PreconditionError::MissingPrerequisite {
                    requested: RecordKind::Update,
                    required: RecordKind::Announcement,
                })
            }
        },
    }
}

fn apply(network: &mut Network, record: Record, stats: &mut IngestStats) {
    match record {
        Record::Announcement(announcement) => network.add_announcement(&announcement),
        Record::Update(update) => {
            let id = update.id().clone();
            if !network.add_channel_update(&id, update) {
                stats.orphan_updates += 1;
            }
        },
    }
}

/// Decodes every line as a record of `kind` and applies it to the network.
///
/// A line that does not decode aborts the load, except the very first one
/// which is taken for a header row and skipped. The network keeps whatever
/// was applied before the failure.
pub fn ingest<'a, I, F>(
    network: &mut Network,
    kind: RecordKind,
    lines: I,
    total: usize,
    mut on_progress: F,
) -> Result<IngestStats, LoadError>
where
    I: IntoIterator<Item = &'a str>,
    F: FnMut(Progress),
{
    check_prerequisites(network, kind)?;

    let mut stats = IngestStats::default();
    for (index, line) in lines.into_iter().enumerate() {
        match decode(kind, line) {
            Ok(record) => {
                apply(network, record, &mut stats);
                stats.records += 1;
            },
            Err(ref error) if index == 0 => {
                debug!("skipping header `{}`: {}", line, error);
                stats.header_skipped = true;
            },
            Err(error) => {
                return Err(LoadError::Decode {
                    line_number: index + 1,
                    line: line.to_owned(),
                    error,
                });
            },
        }
        stats.lines += 1;
        on_progress(Progress {
            line,
            processed: stats.lines,
            total,
        });
    }

    network.mark_loaded(kind);
    info!(
        "loaded {} {} records from {} lines, {} orphan updates",
        stats.records, kind, stats.lines, stats.orphan_updates,
    );
    Ok(stats)
}

#[cfg(test)]
mod test {
    use super::*;
    use dependencies::pretty_assertions;
    use pretty_assertions::assert_eq;
    use record::{DecodeError, ShortChannelId, Direction, MilliSatoshi};
    use std::path::PathBuf;

    const CHAIN: &str = "6fe28c0ab6f1b372c1a6a246ae63f74f931e8365e15a089c68d6190000000000";

    fn announcement_line(id: &str, left: &str, right: &str) -> String {
        format!("s1,s2,b1,b2,,{},{},{},{},k1,k2", CHAIN, id, left, right)
    }

    fn update_line(id: &str, flags: u8, capacity: u64) -> String {
        format!("sig,{},{},2019/01/01 00:00:00,1,{},40,1000,1000,1,{}", CHAIN, id, flags, capacity)
    }

    fn run(network: &mut Network, kind: RecordKind, lines: &[String]) -> Result<(IngestStats, Vec<f64>), LoadError> {
        let mut fractions = vec![];
        let stats = ingest(
            network,
            kind,
            lines.iter().map(String::as_str),
            lines.len(),
            |p| fractions.push(p.fraction()),
        )?;
        Ok((stats, fractions))
    }

    #[test]
    fn header_is_skipped_and_progress_reaches_one() {
        let mut network = Network::with_capacity(8, 8);
        let lines = vec![
            "node_signature_1,node_signature_2,bitcoin_signature_1,bitcoin_signature_2,features,\
             chain_hash,short_channel_id,node_id_1,node_id_2,bitcoin_key_1,bitcoin_key_2".to_owned(),
            announcement_line("1x1x1", "aa", "bb"),
            announcement_line("2x2x2", "bb", "cc"),
        ];

        let (stats, fractions) = run(&mut network, RecordKind::Announcement, &lines).unwrap();
        assert_eq!(stats, IngestStats { lines: 3, records: 2, header_skipped: true, orphan_updates: 0 });
        assert_eq!(fractions.len(), 3);
        assert!(fractions.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(fractions.last(), Some(&1.0));
        assert!(network.has_loaded(RecordKind::Announcement));
        assert_eq!(network.node_count(), 3);
    }

    #[test]
    fn bad_line_after_header_aborts() {
        let mut network = Network::with_capacity(8, 8);
        let lines = vec![
            announcement_line("1x1x1", "aa", "bb"),
            "garbage".to_owned(),
            announcement_line("2x2x2", "bb", "cc"),
        ];

        match run(&mut network, RecordKind::Announcement, &lines) {
            Err(LoadError::Decode { line_number, line, error }) => {
                assert_eq!(line_number, 2);
                assert_eq!(line, "garbage");
                assert_eq!(error, DecodeError::FieldCountMismatch { expected: 11, found: 1 });
            },
            other => panic!("unexpected {:?}", other),
        }
        // partial state stays, but the kind is not marked as loaded
        assert_eq!(network.channel_count(), 1);
        assert!(!network.has_loaded(RecordKind::Announcement));
    }

    #[test]
    fn updates_need_announcements() {
        let mut network = Network::with_capacity(8, 8);
        let lines = vec![update_line("1x1x1", 0, 100)];

        match run(&mut network, RecordKind::Update, &lines) {
            Err(LoadError::Precondition(PreconditionError::MissingPrerequisite { .. })) => (),
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(network.stats().orphan_updates, 0);
    }

    #[test]
    fn updates_are_applied_and_orphans_counted() {
        let mut network = Network::with_capacity(8, 8);
        run(&mut network, RecordKind::Announcement, &[announcement_line("1x1x1", "aa", "bb")]).unwrap();

        let lines = vec![
            update_line("1x1x1", 0, 100),
            update_line("1x1x1", 1, 300),
            update_line("7x7x7", 0, 100),
        ];
        let (stats, _) = run(&mut network, RecordKind::Update, &lines).unwrap();

        assert_eq!(stats.records, 3);
        assert_eq!(stats.orphan_updates, 1);
        assert!(!stats.header_skipped);
        let id = ShortChannelId::from("1x1x1");
        assert_eq!(network.capacity_of(&id, Direction::Backward), Some(MilliSatoshi::from(300)));
        assert!(network.channel(&ShortChannelId::from("7x7x7")).is_none());
    }

    #[test]
    fn file_kind_is_checked_by_name() {
        let settings = LoadSettings::default();
        let good = PathBuf::from("/data/channel_update/Channel_Announcements_2019.csv");
        assert_eq!(check_file_kind(&good, RecordKind::Announcement, &settings), Ok(()));

        let wrong = PathBuf::from("/data/channel_announcement/channel_updates.csv");
        assert_eq!(
            check_file_kind(&wrong, RecordKind::Announcement, &settings),
            Err(PreconditionError::WrongFileKind {
                path: wrong.clone(),
                expected: RecordKind::Announcement,
                prefix: "channel_announcement".to_owned(),
            }),
        );
        assert_eq!(check_file_kind(&wrong, RecordKind::Update, &settings), Ok(()));
    }

    #[test]
    fn empty_input_reports_nothing() {
        let mut network = Network::with_capacity(8, 8);
        let (stats, fractions) = run(&mut network, RecordKind::Announcement, &[]).unwrap();
        assert_eq!(stats, IngestStats::default());
        assert!(fractions.is_empty());
        assert!(network.has_loaded(RecordKind::Announcement));
    }
}
