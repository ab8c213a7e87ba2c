use std::{error::Error, process, thread, time::Duration};

use dependencies::env_logger;
use dependencies::log::{error, info};

use network::{
    Analyzer, LoadError, LoadState, Network, Topology, TopologyRequest, estimate,
};
use record::NodeId;

mod config;
mod report;

use self::config::{Command, Config};

// Polls the observable state the way a progress bar would.
fn follow(analyzer: &mut Analyzer) -> Result<(), LoadError> {
    let mut reported = 0;
    while analyzer.state() == LoadState::Loading {
        thread::sleep(Duration::from_millis(200));
        let percent = (analyzer.progress() * 100.0) as u32;
        if percent >= reported + 10 {
            info!("{}%", percent);
            reported = percent;
        }
    }
    analyzer.wait()
}

fn render(network: &Network, analyzer: &Analyzer, config: &Config) -> Result<String, Box<dyn Error>> {
    let output = match &config.command {
        Command::Summary => {
            let summary = analyzer.summary().ok_or("nothing was loaded")?;
            serde_json::to_string_pretty(&report::summary(network, summary, config.limit))?
        },
        Command::Nodes => serde_json::to_string_pretty(&report::nodes(network, config.limit))?,
        Command::Channels => serde_json::to_string_pretty(&report::channels(network, config.limit))?,
        Command::Topology { root: Some(root), depth, hints } => {
            let request = TopologyRequest {
                root: NodeId::new(root.as_str()),
                depth: *depth,
                hints: *hints,
            };
            let topology = Topology::build(network, &request)
                .ok_or_else(|| format!("unknown node {}", root))?;
            serde_json::to_string_pretty(&topology)?
        },
        Command::Topology { root: None, hints, .. } => {
            serde_json::to_string_pretty(&Topology::whole_network(network, *hints))?
        },
        Command::Demand { metric } => {
            let demand = estimate(network, *metric);
            serde_json::to_string_pretty(&report::demand(&demand, config.limit))?
        },
    };
    Ok(output)
}

fn run(config: Config) -> Result<(), Box<dyn Error>> {
    let mut analyzer = Analyzer::new(config.settings.clone());

    analyzer.load_announcements(&config.announcements)?;
    follow(&mut analyzer)?;

    if let Some(updates) = &config.updates {
        analyzer.load_updates(updates)?;
        follow(&mut analyzer)?;
    }

    let network = analyzer.network().ok_or("the network is not available")?;
    println!("{}", render(network, &analyzer, &config)?);
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    let config = match Config::from_command_line() {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            process::exit(2);
        },
    };

    if let Err(e) = run(config) {
        error!("{}", e);
        process::exit(1);
    }
}
