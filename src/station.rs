use std::fmt::{Debug, Write};

use crate::primitives::{Power, Weight};
use crate::train::Train;

/// Power charged to a platform without a locomotive in load computations.
/// Keeps idle platforms ranked below every balanced train and flagged as
/// overloaded.
pub const IDLE_POWER: Power = -1;

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlatformIdx(pub u32);
impl Debug for PlatformIdx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("p#{}", self.0))
    }
}

/// Outcome of a mutating station operation. A bad request never panics and
/// never applies partially; the status says why nothing happened. Callers
/// that ignore it get the quiet no-op contract of the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpStatus {
    Applied,
    NoSuchPlatform,
    LocomotivePresent,
    NoLocomotive,
    EmptyTrain,
    BadPosition,
    NoPositiveWeight,
    NoOverload,
}

impl OpStatus {
    pub fn applied(self) -> bool {
        self == OpStatus::Applied
    }
}

/// One slot of the station: at most one locomotive and its train.
pub struct Platform {
    locomotive: Option<Power>,
    train: Train,
}

impl Platform {
    fn vacant() -> Self {
        Platform {
            locomotive: None,
            train: Train::new(),
        }
    }

    pub fn locomotive(&self) -> Option<Power> {
        self.locomotive
    }

    pub fn train(&self) -> &Train {
        &self.train
    }

    pub(crate) fn train_mut(&mut self) -> &mut Train {
        &mut self.train
    }

    /// Pulling margin of the platform: locomotive power minus the weight of
    /// its cars, with [`IDLE_POWER`] charged when no locomotive is present.
    pub fn load(&self) -> Weight {
        self.locomotive.unwrap_or(IDLE_POWER) - self.train.total_weight()
    }
}

/// A fixed table of platforms. The sole entry point for every operation.
pub struct Station {
    platforms: Vec<Platform>,
}

impl Station {
    /// Opens a station with `platform_count` vacant platforms. The table is
    /// never resized afterwards.
    pub fn open(platform_count: usize) -> Self {
        Station {
            platforms: (0..platform_count).map(|_| Platform::vacant()).collect(),
        }
    }

    pub fn num_platforms(&self) -> usize {
        self.platforms.len()
    }

    pub fn platform(&self, idx: PlatformIdx) -> Option<&Platform> {
        self.platforms.get(idx.0 as usize)
    }

    pub(crate) fn platform_mut(&mut self, idx: PlatformIdx) -> Option<&mut Platform> {
        self.platforms.get_mut(idx.0 as usize)
    }

    pub fn platforms(&self) -> impl Iterator<Item = (PlatformIdx, &Platform)> {
        self.platforms
            .iter()
            .enumerate()
            .map(|(i, platform)| (PlatformIdx(i as u32), platform))
    }

    /// Renders one line per platform: `"<index>: "`, then `"(<power>)"` if a
    /// locomotive is present, then `"-|<weight>|"` per car in coupling order.
    pub fn describe(&self) -> String {
        let mut out = String::new();
        for (idx, platform) in self.platforms() {
            write!(out, "{}: ", idx.0).unwrap();
            if let Some(power) = platform.locomotive {
                write!(out, "({})", power).unwrap();
                for weight in platform.train.weights() {
                    write!(out, "-|{}|", weight).unwrap();
                }
            }
            out.push('\n');
        }
        out
    }

    /// Parks a locomotive on a free platform and resets its train. A platform
    /// that already holds a locomotive keeps it, train included.
    pub fn arrive(&mut self, platform: PlatformIdx, power: Power) -> OpStatus {
        let Some(platform) = self.platform_mut(platform) else {
            return OpStatus::NoSuchPlatform;
        };
        if platform.locomotive.is_some() {
            return OpStatus::LocomotivePresent;
        }
        platform.locomotive = Some(power);
        platform.train = Train::new();
        OpStatus::Applied
    }

    /// Clears a platform: locomotive gone, every car released. Idempotent.
    pub fn depart(&mut self, platform: PlatformIdx) -> OpStatus {
        let Some(platform) = self.platform_mut(platform) else {
            return OpStatus::NoSuchPlatform;
        };
        platform.locomotive = None;
        platform.train = Train::new();
        OpStatus::Applied
    }

    /// Couples one car of the given weight to the end of the train.
    pub fn add_car(&mut self, platform: PlatformIdx, weight: Weight) -> OpStatus {
        let Some(platform) = self.platform_mut(platform) else {
            return OpStatus::NoSuchPlatform;
        };
        if platform.locomotive.is_none() {
            return OpStatus::NoLocomotive;
        }
        platform.train.push_back(weight);
        OpStatus::Applied
    }

    /// Uncouples and releases every car of exactly the given weight.
    pub fn remove_cars(&mut self, platform: PlatformIdx, weight: Weight) -> OpStatus {
        let Some(platform) = self.platform_mut(platform) else {
            return OpStatus::NoSuchPlatform;
        };
        if platform.train.is_empty() {
            return OpStatus::EmptyTrain;
        }
        platform.train.remove_weight(weight);
        OpStatus::Applied
    }

    /// Moves `cars_no` contiguous cars, starting at 1-based `pos_a` of
    /// platform `from`, to sit immediately before 1-based `pos_b` of platform
    /// `to`.
    ///
    /// Every precondition is checked before the first car is touched, so an
    /// impossible request leaves both trains exactly as they were. `from` and
    /// `to` may name the same platform; both positions then refer to the
    /// chain before the move.
    pub fn move_cars(
        &mut self,
        from: PlatformIdx,
        pos_a: usize,
        cars_no: usize,
        to: PlatformIdx,
        pos_b: usize,
    ) -> OpStatus {
        if self.platform(from).is_none() || self.platform(to).is_none() {
            return OpStatus::NoSuchPlatform;
        }
        if self.platforms[from.0 as usize].train.is_empty() {
            return OpStatus::EmptyTrain;
        }
        if pos_a == 0 || pos_b == 0 || cars_no == 0 {
            return OpStatus::BadPosition;
        }
        if pos_b > 1 && self.platforms[to.0 as usize].train.is_empty() {
            return OpStatus::BadPosition;
        }
        if pos_a - 1 + cars_no > self.platforms[from.0 as usize].train.len() {
            return OpStatus::BadPosition;
        }
        // The car the run is coupled in after; 0 means the new head.
        let anchor = pos_b - 1;
        if anchor > self.platforms[to.0 as usize].train.len() {
            return OpStatus::BadPosition;
        }

        let at = if from == to {
            // The anchor must not sit inside the run itself, and it shifts
            // left once the run is out.
            if anchor >= pos_a && anchor < pos_a + cars_no {
                return OpStatus::BadPosition;
            }
            if anchor >= pos_a + cars_no {
                anchor - cars_no
            } else {
                anchor
            }
        } else {
            anchor
        };

        let run = match self.platforms[from.0 as usize]
            .train
            .detach_run(pos_a - 1, cars_no)
        {
            Some(run) => run,
            None => return OpStatus::BadPosition,
        };
        self.platforms[to.0 as usize].train.splice_in(at, run);
        OpStatus::Applied
    }
}
