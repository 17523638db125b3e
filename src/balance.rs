use itertools::Itertools;

use crate::primitives::Weight;
use crate::query::find_overload_train;
use crate::station::{OpStatus, PlatformIdx, Station, IDLE_POWER};

/// One removed car, reported by [`fix_overload_train`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverloadFix {
    pub platform: PlatformIdx,
    /// 0-based position the car was removed from.
    pub position: usize,
    pub weight: Weight,
}

/// Rebuilds the train on `platform` in descending weight order.
///
/// Cars with non-positive weight are dropped from the rebuilt train; cars of
/// equal weight come out in reverse coupling order. The old chain is released
/// only after the replacement is complete.
pub fn order_train(station: &mut Station, platform: PlatformIdx) -> OpStatus {
    let Some(platform) = station.platform_mut(platform) else {
        return OpStatus::NoSuchPlatform;
    };
    let train = platform.train_mut();
    if train.is_empty() {
        return OpStatus::EmptyTrain;
    }
    let mut cars = train
        .weights()
        .enumerate()
        .filter(|&(_, weight)| weight > 0)
        .collect_vec();
    if cars.is_empty() {
        return OpStatus::NoPositiveWeight;
    }
    cars.sort_by(|a, b| b.1.cmp(&a.1).then(b.0.cmp(&a.0)));
    *train = cars.into_iter().map(|(_, weight)| weight).collect();
    OpStatus::Applied
}

/// Finds the first overloaded platform and uncouples the single car whose
/// removal leaves the smallest non-negative load. If no single removal gets
/// the train back under its locomotive's power, nothing is removed and the
/// overload persists.
pub fn fix_overload_train(station: &mut Station) -> Option<OverloadFix> {
    let idx = find_overload_train(station)?;
    let platform = station.platform_mut(idx)?;
    let power = platform.locomotive().unwrap_or(IDLE_POWER);
    let total = platform.train().total_weight();

    let mut best: Option<(usize, Weight)> = None;
    for (position, weight) in platform.train().weights().enumerate() {
        let load = power - (total - weight);
        if load >= 0 && best.map_or(true, |(_, b)| load < b) {
            best = Some((position, load));
        }
    }
    let (position, _) = best?;
    let weight = platform.train_mut().remove_at(position)?;
    Some(OverloadFix {
        platform: idx,
        position,
        weight,
    })
}
