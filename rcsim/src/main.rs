mod logging;
mod options;
mod pairs;

use anyhow::Error as AnyError;
use clap::Parser;
use log::{error, info};
use options::{Cli, Command as CliCmd};
use pairs::PairFile;
use rcs::{morse::Morse, plm::PlmDir, LinkConfig, RobotPair, Verdict};
use std::{path::Path, thread, time::Duration};

fn main() -> Result<(), AnyError> {
    let cli = Cli::parse();
    logging::init(&cli.log_file)?;

    let res = match cli.cmd.clone() {
        CliCmd::Run {
            pairs,
            interval,
            iterations,
        } => run(&cli, &pairs, interval, iterations),
        CliCmd::Show { pairs } => show(&pairs),
        #[cfg(feature = "gdal")]
        CliCmd::Lookup { robot, at } => lookup(&cli.plm_dir, &robot, at),
    };
    if let Err(e) = &res {
        error!("{e:#}");
    }
    res
}

fn run(
    cli: &Cli,
    pairs: &Path,
    interval: Option<f64>,
    iterations: Option<usize>,
) -> Result<(), AnyError> {
    let file = PairFile::load(pairs)?;
    let interval = Duration::try_from_secs_f64(interval.unwrap_or(file.interval_secs))?;
    let timeout = cli.timeout.map(Duration::try_from_secs_f64).transpose()?;

    let mut pairs = Vec::with_capacity(file.pairs.len());
    for spec in file.pairs {
        let mut sim = Morse::connect(&cli.host, cli.port)?;
        sim.set_timeout(timeout)?;
        let [a, b] = spec.robots;
        let pair = RobotPair::builder(sim)
            .robots(a, b)
            .specs(spec.specs)
            .maps(PlmDir::new(&cli.plm_dir))
            .build()?;
        pairs.push(pair);
    }
    if pairs.is_empty() {
        info!("no robot pairs to poll");
        return Ok(());
    }

    let mut poll = 0;
    while iterations.map_or(true, |iterations| poll < iterations) {
        if poll > 0 {
            thread::sleep(interval);
        }
        for pair in &mut pairs {
            let verdict = pair.can_communicate()?;
            let model = pair.get_model_specifications(false);
            println!("{}", poll_row(pair.names(), &model, verdict));
        }
        poll += 1;
    }
    Ok(())
}

fn show(pairs: &Path) -> Result<(), AnyError> {
    let file = PairFile::load(pairs)?;
    for spec in &file.pairs {
        let [a, b] = &spec.robots;
        let config = LinkConfig::default().apply(&spec.specs);
        println!("{a} <-> {b}: {}", config.model());
    }
    Ok(())
}

#[cfg(feature = "gdal")]
fn lookup(plm_dir: &Path, robot: &str, at: options::Xy) -> Result<(), AnyError> {
    use options::Xy;
    use rcs::{
        geo::geometry::Coord,
        plm::{MapSource, Pixel},
    };

    let map = PlmDir::new(plm_dir).load(robot)?;
    let Xy(Coord { x, y }) = at;
    let Pixel { col, row } = map.georef().pixel(at.0);
    let loss = map.path_loss(at.0)?;
    println!("{robot} ({x}, {y}) -> pixel ({col}, {row}): {loss} dB");
    Ok(())
}

/// One tab separated output line per pair and poll. Links print as
/// 1/0 and data rates in Mb/s; a failed simulator query prints
/// `unavailable` rather than a number.
fn poll_row([a, b]: [&str; 2], model: &str, verdict: Verdict) -> String {
    format!("{a}\t{b}\t{model}\t{verdict}")
}
