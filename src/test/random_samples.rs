use std::fmt::Write;

use itertools::Itertools;
use log::info;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::balance::{fix_overload_train, order_train};
use crate::primitives::{Power, Weight};
use crate::station::{PlatformIdx, Station};

/// Vector-backed twin of one platform, mutated alongside the real engine.
#[derive(Clone, Default)]
struct ShadowPlatform {
    power: Option<Power>,
    cars: Vec<Weight>,
}

struct ShadowStation {
    platforms: Vec<ShadowPlatform>,
}

impl ShadowStation {
    fn new(count: usize) -> Self {
        ShadowStation {
            platforms: vec![ShadowPlatform::default(); count],
        }
    }

    fn describe(&self) -> String {
        let mut out = String::new();
        for (i, platform) in self.platforms.iter().enumerate() {
            write!(out, "{}: ", i).unwrap();
            if let Some(power) = platform.power {
                write!(out, "({})", power).unwrap();
                for weight in &platform.cars {
                    write!(out, "-|{}|", weight).unwrap();
                }
            }
            out.push('\n');
        }
        out
    }
}

pub fn run(seed: u64) {
    let num_platforms: u32 = 6;
    let num_ops = 2000;
    let weight_range = -2..30;
    let power_range = 0..120;

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut station = Station::open(num_platforms as usize);
    let mut shadow = ShadowStation::new(num_platforms as usize);

    for op in 0..num_ops {
        // One platform index past the table exercises the quiet rejections.
        let p = rng.gen_range(0..num_platforms + 1);
        match rng.gen_range(0..6) {
            0 => {
                let power = rng.gen_range(power_range.clone());
                station.arrive(PlatformIdx(p), power);
                if let Some(platform) = shadow.platforms.get_mut(p as usize) {
                    if platform.power.is_none() {
                        platform.power = Some(power);
                        platform.cars.clear();
                    }
                }
            }
            1 => {
                station.depart(PlatformIdx(p));
                if let Some(platform) = shadow.platforms.get_mut(p as usize) {
                    platform.power = None;
                    platform.cars.clear();
                }
            }
            2 => {
                let weight = rng.gen_range(weight_range.clone());
                station.add_car(PlatformIdx(p), weight);
                if let Some(platform) = shadow.platforms.get_mut(p as usize) {
                    if platform.power.is_some() {
                        platform.cars.push(weight);
                    }
                }
            }
            3 => {
                let weight = rng.gen_range(weight_range.clone());
                station.remove_cars(PlatformIdx(p), weight);
                if let Some(platform) = shadow.platforms.get_mut(p as usize) {
                    platform.cars.retain(|&w| w != weight);
                }
            }
            4 => {
                let to = rng.gen_range(0..num_platforms + 1);
                let pos_a = rng.gen_range(1..8);
                let cars_no = rng.gen_range(1..4);
                let pos_b = rng.gen_range(1..8);
                let status =
                    station.move_cars(PlatformIdx(p), pos_a, cars_no, PlatformIdx(to), pos_b);
                if status.applied() {
                    let run: Vec<Weight> = shadow.platforms[p as usize]
                        .cars
                        .drain(pos_a - 1..pos_a - 1 + cars_no)
                        .collect();
                    let mut at = pos_b - 1;
                    if p == to && at >= pos_a + cars_no {
                        at -= cars_no;
                    }
                    shadow.platforms[to as usize].cars.splice(at..at, run);
                }
            }
            _ => {
                let status = order_train(&mut station, PlatformIdx(p));
                if status.applied() {
                    let cars = &mut shadow.platforms[p as usize].cars;
                    let mut pairs = cars
                        .iter()
                        .copied()
                        .enumerate()
                        .filter(|&(_, w)| w > 0)
                        .collect_vec();
                    pairs.sort_by(|a, b| b.1.cmp(&a.1).then(b.0.cmp(&a.0)));
                    *cars = pairs.into_iter().map(|(_, w)| w).collect();
                }
            }
        }

        assert_eq!(
            station.describe(),
            shadow.describe(),
            "Seed {} diverged after op {}",
            seed,
            op
        );
    }

    let total_before: Weight = station
        .platforms()
        .map(|(_, platform)| platform.train().total_weight())
        .sum();
    if let Some(fix) = fix_overload_train(&mut station) {
        let platform = station.platform(fix.platform).unwrap();
        assert!(
            platform.load() >= 0,
            "Seed {}: {:?} still overloaded after removing |{}|",
            seed,
            fix.platform,
            fix.weight
        );
        let total_after: Weight = station
            .platforms()
            .map(|(_, platform)| platform.train().total_weight())
            .sum();
        assert_eq!(total_after, total_before - fix.weight);
        info!("Removed car |{}| from {:?}", fix.weight, fix.platform);
    }

    info!("Final station:\n{}", station.describe());
}

pub fn run_samples() {
    for seed in 0..10 {
        info!("Seed: {:}", seed);
        run(seed);
    }
}

#[cfg(test)]
mod tests {
    use log::LevelFilter;

    use super::*;

    #[test]
    fn test_random_samples() {
        env_logger::builder().filter_level(LevelFilter::Info).init();
        run_samples();
    }
}
