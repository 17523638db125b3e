#![allow(dead_code)]

use std::fs::File;
use std::path::Path;
use std::process::exit;

use clap::{Args, Parser, Subcommand};
use log::{error, info};

use serialization::report::{export_report, log_summary};
use serialization::script::{apply_script, parse_script};
use station::Station;
use test::random_samples;

mod balance;
mod col;
mod primitives;
mod query;
mod serialization;
mod station;
mod test;
mod train;

#[derive(Parser, Debug)]
#[command(
    version,
    author,
    about = "Composes, inspects and balances trains across the platforms of a station"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Clone, Debug)]
enum Commands {
    #[command(about = "Apply a shunting script and dump the resulting station")]
    Exec(ExecArgs),

    #[command(about = "Apply a shunting script and export per-platform load statistics")]
    Report(ReportArgs),

    #[command(about = "Run random shunting samples")]
    RunRandom,
}

#[derive(Args, Clone, Debug)]
struct StationArgs {
    #[arg(
        short = 's',
        long,
        default_value = "script.csv",
        help = "The shunting script to apply."
    )]
    script_path: String,

    #[arg(
        short = 'p',
        long,
        default_value_t = 10,
        help = "The number of platforms of the station."
    )]
    platforms: usize,
}

#[derive(Args, Clone, Debug)]
struct ExecArgs {
    #[clap(flatten)]
    station_args: StationArgs,

    #[arg(
        short = 'o',
        long,
        default_value = "station-dump.txt",
        help = "The file to write the station dump to."
    )]
    out_filename: String,
}

#[derive(Args, Clone, Debug)]
struct ReportArgs {
    #[clap(flatten)]
    station_args: StationArgs,

    #[arg(
        short = 'c',
        long,
        default_value_t = 3,
        help = "The run length used for the heaviest-run search."
    )]
    run_length: usize,

    #[arg(
        short = 'o',
        long,
        default_value = "station-report.csv",
        help = "The file to write the per-platform statistics to."
    )]
    out_filename: String,
}

fn load_station(args: &StationArgs) -> Station {
    let ops = parse_script(File::open(&args.script_path).unwrap()).unwrap_or_else(|it| {
        error!("Could not parse script:\n{:#?}", it);
        exit(1);
    });

    let mut station = Station::open(args.platforms);
    let stats = apply_script(&mut station, &ops).unwrap_or_else(|it| {
        error!("Could not apply script:\n{:#?}", it);
        exit(1);
    });
    info!(
        "Applied {} ops on {} platforms ({} ignored)",
        stats.applied,
        station.num_platforms(),
        stats.ignored
    );
    station
}

fn main_exec(args: &ExecArgs) {
    if Path::new(&args.out_filename).exists() {
        error!("Output file already exists: {}", args.out_filename);
        exit(1);
    }

    let station = load_station(&args.station_args);
    std::fs::write(&args.out_filename, station.describe()).unwrap();
    info!("Wrote station dump to {}", args.out_filename);
}

fn main_report(args: &ReportArgs) {
    if Path::new(&args.out_filename).exists() {
        error!("Output file already exists: {}", args.out_filename);
        exit(1);
    }

    let station = load_station(&args.station_args);
    log_summary(&station, args.run_length);
    export_report(&station, &args.out_filename).unwrap_or_else(|it| {
        error!("Could not write report:\n{:#?}", it);
        exit(1);
    });
    info!("Wrote report to {}", args.out_filename);
}

fn main() {
    env_logger::builder().parse_env("LOG").init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Exec(args) => main_exec(&args),
        Commands::Report(args) => main_report(&args),
        Commands::RunRandom => random_samples::run_samples(),
    }
}
