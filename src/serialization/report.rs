use itertools::Itertools;
use log::info;
use serde::Serialize;

use crate::col::{map_new, HashMap};
use crate::primitives::{Power, Weight};
use crate::query::{
    find_express_train, find_heaviest_run, find_optimal_train, find_overload_train,
};
use crate::station::Station;

#[derive(Debug, Serialize)]
struct PlatformRow {
    platform: u32,
    power: Option<Power>,
    cars: usize,
    total_weight: Weight,
    load: Weight,
}

/// Writes one row of load statistics per platform.
pub fn export_report(station: &Station, out_filename: &str) -> Result<(), csv::Error> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b';')
        .from_path(out_filename)?;
    for (idx, platform) in station.platforms() {
        writer.serialize(PlatformRow {
            platform: idx.0,
            power: platform.locomotive(),
            cars: platform.train().len(),
            total_weight: platform.train().total_weight(),
            load: platform.load(),
        })?;
    }
    writer.flush()?;
    Ok(())
}

/// Logs the query summary and the station-wide weight histogram.
pub fn log_summary(station: &Station, run_length: usize) {
    match find_express_train(station) {
        Some(idx) => info!("Express train: {:?}", idx),
        None => info!("Express train: none"),
    }
    match find_overload_train(station) {
        Some(idx) => info!("Overloaded train: {:?}", idx),
        None => info!("Overloaded train: none"),
    }
    match find_optimal_train(station) {
        Some(idx) => info!("Optimal train: {:?}", idx),
        None => info!("Optimal train: none"),
    }
    match find_heaviest_run(station, run_length) {
        Some(run) => info!(
            "Heaviest run of {} cars: {:?}, cars {}..{}, total weight {}",
            run_length,
            run.platform,
            run.start + 1,
            run.start + run_length,
            run.total
        ),
        None => info!("Heaviest run of {} cars: none", run_length),
    }

    let mut histogram: HashMap<Weight, usize> = map_new();
    for (_, platform) in station.platforms() {
        for weight in platform.train().weights() {
            *histogram.entry(weight).or_insert(0) += 1;
        }
    }
    for (weight, count) in histogram.into_iter().sorted() {
        info!("Cars of weight {}: {}", weight, count);
    }
}
