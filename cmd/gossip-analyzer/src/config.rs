use std::path::PathBuf;

use dependencies::clap::{App, Arg, AppSettings, ArgMatches, SubCommand};

use network::{DemandMetric, LayoutHints, LoadSettings};

#[derive(Debug, Clone)]
pub enum Command {
    Summary,
    Nodes,
    Channels,
    Topology {
        root: Option<String>,
        depth: usize,
        hints: LayoutHints,
    },
    Demand {
        metric: DemandMetric,
    },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub announcements: PathBuf,
    pub updates: Option<PathBuf>,
    pub settings: LoadSettings,
    // how many rows the list reports print, everything if `None`
    pub limit: Option<usize>,
    pub command: Command,
}

fn number<T>(matches: &ArgMatches, name: &str, default: T) -> Result<T, String>
where
    T: std::str::FromStr,
{
    match matches.value_of(name) {
        Some(s) => s.parse().map_err(|_| format!("--{} expects a number, got `{}`", name, s)),
        None => Ok(default),
    }
}

fn metric(s: Option<&str>) -> Result<DemandMetric, String> {
    match s {
        None | Some("count") => Ok(DemandMetric::UpdateCount),
        Some("decrease") => Ok(DemandMetric::CapacityDecrease),
        Some(other) => Err(format!("unknown metric `{}`, use `count` or `decrease`", other)),
    }
}

impl Config {
    pub fn from_command_line() -> Result<Config, String> {
        let defaults = LoadSettings::default();
        let matches = App::new("gossip-analyzer")
            .version("0.1.0")
            .author("Mykola Sakhno <mykola.sakhno@bitfury.com>")
            .about("gossip-analyzer reads channel announcement and channel update dumps and reports on the channel graph")
            .setting(AppSettings::SubcommandRequired)
            .arg(
                Arg::with_name("ANNOUNCEMENTS")
                    .help("the channel announcement dump, its name must start with `channel_announcement`")
                    .required(true)
                    .index(1)
            )
            .arg(
                Arg::with_name("updates")
                    .long("updates")
                    .help("the channel update dump, its name must start with `channel_update`")
                    .takes_value(true)
            )
            .arg(
                Arg::with_name("node-buckets")
                    .long("node-buckets")
                    .help("bucket count of the node index")
                    .takes_value(true)
            )
            .arg(
                Arg::with_name("channel-buckets")
                    .long("channel-buckets")
                    .help("bucket count of the channel index")
                    .takes_value(true)
            )
            .arg(
                Arg::with_name("limit")
                    .long("limit")
                    .help("print only the first N rows of a list")
                    .takes_value(true)
            )
            .subcommand(
                SubCommand::with_name("summary")
                    .about("Counts and the top of every list")
            )
            .subcommand(
                SubCommand::with_name("nodes")
                    .about("Nodes ordered by the number of channels")
            )
            .subcommand(
                SubCommand::with_name("channels")
                    .about("Channels ordered by the number of updates")
            )
            .subcommand(
                SubCommand::with_name("topology")
                    .about("Open edges around a node, or of the whole network without --root")
                    .arg(Arg::with_name("root").long("root").takes_value(true).help("public key of the root node"))
                    .arg(Arg::with_name("depth").long("depth").takes_value(true).help("maximum number of hops, 2 by default"))
                    .arg(Arg::with_name("width").long("width").takes_value(true))
                    .arg(Arg::with_name("height").long("height").takes_value(true))
            )
            .subcommand(
                SubCommand::with_name("demand")
                    .about("Demand attributed to every node")
                    .arg(
                        Arg::with_name("metric")
                            .long("metric")
                            .takes_value(true)
                            .help("`count` of updates (default) or capacity `decrease`")
                    )
            )
            .get_matches();

        let command = match matches.subcommand() {
            ("nodes", _) => Command::Nodes,
            ("channels", _) => Command::Channels,
            ("topology", Some(sub)) => Command::Topology {
                root: sub.value_of("root").map(str::to_owned),
                depth: number(sub, "depth", 2)?,
                hints: LayoutHints {
                    width: number(sub, "width", 0)?,
                    height: number(sub, "height", 0)?,
                },
            },
            ("demand", Some(sub)) => Command::Demand {
                metric: metric(sub.value_of("metric"))?,
            },
            _ => Command::Summary,
        };

        let settings = LoadSettings {
            node_buckets: number(&matches, "node-buckets", defaults.node_buckets)?,
            channel_buckets: number(&matches, "channel-buckets", defaults.channel_buckets)?,
            ..defaults
        };

        let limit = match matches.value_of("limit") {
            Some(_) => Some(number(&matches, "limit", 0)?),
            None => None,
        };

        Ok(Config {
            announcements: PathBuf::from(matches.value_of("ANNOUNCEMENTS").unwrap_or_default()),
            updates: matches.value_of("updates").map(PathBuf::from),
            settings,
            limit,
            command,
        })
    }
}
