use crate::primitives::Weight;
use crate::station::{PlatformIdx, Station};
use crate::train::Train;

/// The heaviest contiguous run found by [`find_heaviest_run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaviestRun {
    pub platform: PlatformIdx,
    /// 0-based offset of the run's first car within its train.
    pub start: usize,
    pub total: Weight,
}

/// Platform whose train has the largest pulling margin. Ties go to the
/// lowest index. Platforms with a negative margin never qualify, so a fully
/// overloaded station has no express train.
pub fn find_express_train(station: &Station) -> Option<PlatformIdx> {
    let mut best_load: Weight = -1;
    let mut best = None;
    for (idx, platform) in station.platforms() {
        let load = platform.load();
        if load > best_load {
            best_load = load;
            best = Some(idx);
        }
    }
    best
}

/// First platform whose cars outweigh its locomotive.
pub fn find_overload_train(station: &Station) -> Option<PlatformIdx> {
    station
        .platforms()
        .find(|(_, platform)| platform.load() < 0)
        .map(|(idx, _)| idx)
}

/// Platform with the smallest non-negative pulling margin; ties go to the
/// lowest index.
pub fn find_optimal_train(station: &Station) -> Option<PlatformIdx> {
    let mut best: Option<(PlatformIdx, Weight)> = None;
    for (idx, platform) in station.platforms() {
        let load = platform.load();
        if load >= 0 && best.map_or(true, |(_, b)| load < b) {
            best = Some((idx, load));
        }
    }
    best.map(|(idx, _)| idx)
}

/// Heaviest window of exactly `cars_no` consecutive cars across all
/// platforms, found with a sliding sum. Trains shorter than `cars_no` are
/// skipped; ties go to the first platform, then the earliest start.
pub fn find_heaviest_run(station: &Station, cars_no: usize) -> Option<HeaviestRun> {
    if cars_no == 0 {
        return None;
    }
    let mut best_total: Weight = -1;
    let mut best = None;
    for (idx, platform) in station.platforms() {
        let Some((start, total)) = heaviest_window(platform.train(), cars_no) else {
            continue;
        };
        if total > best_total {
            best_total = total;
            best = Some(HeaviestRun {
                platform: idx,
                start,
                total,
            });
        }
    }
    best
}

fn heaviest_window(train: &Train, cars_no: usize) -> Option<(usize, Weight)> {
    let mut lead = train.weights();
    let mut sum: Weight = 0;
    for _ in 0..cars_no {
        sum += lead.next()?;
    }
    let trail = train.weights();
    let mut best = (0, sum);
    let mut start = 0;
    for (entering, leaving) in lead.zip(trail) {
        sum += entering - leaving;
        start += 1;
        if sum > best.1 {
            best = (start, sum);
        }
    }
    Some(best)
}
