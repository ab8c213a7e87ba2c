use std::{
    fs,
    path::{Path, PathBuf},
    sync::{Arc, RwLock},
    thread::{self, JoinHandle},
};

use dependencies::log::{info, warn};

use record::{NodeId, ShortChannelId, RecordKind};

use serde_derive::Serialize;

use super::demand::{estimate, DemandMap, DemandMetric};
use super::error::{LoadError, PreconditionError};
use super::graph::{Network, NetworkStats};
use super::ingestion::{ingest, check_file_kind, check_prerequisites, IngestStats, LoadSettings};

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum LoadState {
    Idle,
    Loading,
    Loaded,
    Failed,
}

/// What the foreground may look at while a load runs.
#[derive(Debug, Clone)]
pub struct Observed {
    pub state: LoadState,
    pub fraction: f64,
    pub line: String,
    pub error: Option<String>,
}

impl Default for Observed {
    fn default() -> Self {
        Observed {
            state: LoadState::Idle,
            fraction: 0.0,
            line: String::new(),
            error: None,
        }
    }
}

/// Computed once a load finishes, before the state becomes `Loaded`.
#[derive(Serialize, Debug, Clone)]
pub struct Summary {
    pub ingest: IngestStats,
    pub network: NetworkStats,
    pub nodes: Vec<NodeId>,
    pub channels: Vec<ShortChannelId>,
    pub demand: DemandMap,
}

impl Summary {
    fn new(network: &Network, ingest: IngestStats) -> Self {
        Summary {
            ingest,
            network: network.stats(),
            nodes: network.nodes_by_channel_count().into_iter().map(|n| n.id().clone()).collect(),
            channels: network.channels_by_update_count().into_iter().map(|c| c.id().clone()).collect(),
            demand: estimate(network, DemandMetric::default()),
        }
    }
}

enum Source {
    File(PathBuf),
    Lines(Vec<String>),
}

impl Source {
    fn read(self) -> Result<Vec<String>, LoadError> {
        match self {
            Source::File(path) => fs::read_to_string(&path)
                .map(|content| content.lines().map(str::to_owned).collect())
                .map_err(|inner| LoadError::Io { path, inner }),
            Source::Lines(lines) => Ok(lines),
        }
    }
}

type Outcome = (Network, Result<Summary, LoadError>);

/// Drives one load at a time on a background thread.
///
/// The network moves into the task for the duration of the load and comes
/// back on `wait`. Nothing else writes to it, once loaded it is read only.
pub struct Analyzer {
    settings: LoadSettings,
    observed: Arc<RwLock<Observed>>,
    network: Option<Network>,
    task: Option<JoinHandle<Outcome>>,
    summary: Option<Summary>,
}

impl Analyzer {
    pub fn new(settings: LoadSettings) -> Self {
        let network = settings.network();
        Self::with_network(settings, network)
    }

    /// Continues from a network built elsewhere, e.g. announcements loaded by another analyzer.
    pub fn with_network(settings: LoadSettings, network: Network) -> Self {
        Analyzer {
            settings,
            observed: Arc::new(RwLock::new(Observed::default())),
            network: Some(network),
            task: None,
            summary: None,
        }
    }

    pub fn load_announcements<P>(&mut self, path: P) -> Result<(), PreconditionError>
    where
        P: AsRef<Path>,
    {
        self.load_file(RecordKind::Announcement, path.as_ref())
    }

    pub fn load_updates<P>(&mut self, path: P) -> Result<(), PreconditionError>
    where
        P: AsRef<Path>,
    {
        self.load_file(RecordKind::Update, path.as_ref())
    }

    pub fn load_file(&mut self, kind: RecordKind, path: &Path) -> Result<(), PreconditionError> {
        self.check(kind)?;
        check_file_kind(path, kind, &self.settings)?;
        info!("loading {} records from {}", kind, path.display());
        self.start(kind, Source::File(path.to_owned()))
    }

    /// Same as `load_file`, for input already in memory; no file name to check.
    pub fn load_lines(&mut self, kind: RecordKind, lines: Vec<String>) -> Result<(), PreconditionError> {
        self.check(kind)?;
        self.start(kind, Source::Lines(lines))
    }

    fn check(&mut self, kind: RecordKind) -> Result<(), PreconditionError> {
        if self.state() == LoadState::Loading {
            return Err(PreconditionError::AlreadyLoading);
        }
        // a finished task still holds the network until it is joined,
        // its failure is already visible through `observed`
        if self.task.is_some() {
            if let Err(e) = self.wait() {
                warn!("previous load failed: {}", e);
            }
        }
        match &self.network {
            Some(network) => check_prerequisites(network, kind),
            None => Err(PreconditionError::AlreadyLoading),
        }
    }

    fn start(&mut self, kind: RecordKind, source: Source) -> Result<(), PreconditionError> {
        let mut network = match self.network.take() {
            Some(network) => network,
            None => return Err(PreconditionError::AlreadyLoading),
        };
        self.summary = None;
        self.set(|o| *o = Observed { state: LoadState::Loading, ..Observed::default() });

        let observed = self.observed.clone();
        let task = thread::spawn(move || {
            let result = source.read().and_then(|lines| {
                ingest(&mut network, kind, lines.iter().map(String::as_str), lines.len(), |progress| {
                    if let Ok(mut o) = observed.write() {
                        o.fraction = progress.fraction();
                        o.line = progress.line.to_owned();
                    }
                })
            });

            // the finishing hook runs before anybody can see `Loaded`
            let result = result.map(|stats| Summary::new(&network, stats));
            if let Ok(mut o) = observed.write() {
                match &result {
                    Ok(_) => {
                        o.state = LoadState::Loaded;
                        o.fraction = 1.0;
                    },
                    Err(e) => {
                        warn!("loading {} records failed: {}", kind, e);
                        o.state = LoadState::Failed;
                        o.error = Some(e.to_string());
                    },
                }
            }
            (network, result)
        });

        self.task = Some(task);
        Ok(())
    }

    fn set<F>(&self, f: F) where F: FnOnce(&mut Observed) {
        if let Ok(mut o) = self.observed.write() {
            f(&mut *o)
        }
    }

    /// Blocks until the running load finishes and takes the network back.
    /// Returns at once if nothing runs.
    pub fn wait(&mut self) -> Result<(), LoadError> {
        let task = match self.task.take() {
            Some(task) => task,
            None => return Ok(()),
        };
        match task.join() {
            Ok((network, result)) => {
                self.network = Some(network);
                self.summary = Some(result?);
                Ok(())
            },
            Err(_) => {
                // the network went down with the task, start over with an empty one
                self.network = Some(self.settings.network());
                self.set(|o| {
                    o.state = LoadState::Failed;
                    o.error = Some(LoadError::Interrupted.to_string());
                });
                Err(LoadError::Interrupted)
            },
        }
    }

    pub fn observed(&self) -> Observed {
        self.observed
            .read()
            .map(|o| o.clone())
            .unwrap_or_default()
    }

    pub fn state(&self) -> LoadState {
        self.observed().state
    }

    pub fn progress(&self) -> f64 {
        self.observed().fraction
    }

    /// The network, unless a load still holds it.
    pub fn network(&self) -> Option<&Network> {
        self.network.as_ref()
    }

    pub fn summary(&self) -> Option<&Summary> {
        self.summary.as_ref()
    }

    /// Drops everything loaded so far, e.g. after a failed load.
    pub fn reset(&mut self) -> Result<(), PreconditionError> {
        if self.state() == LoadState::Loading {
            return Err(PreconditionError::AlreadyLoading);
        }
        self.task = None;
        self.network = Some(self.settings.network());
        self.summary = None;
        self.set(|o| *o = Observed::default());
        Ok(())
    }

    /// Hands the network over once no load is running.
    pub fn into_network(mut self) -> Result<Network, LoadError> {
        self.wait()?;
        self.network.take().ok_or(LoadError::Interrupted)
    }
}
