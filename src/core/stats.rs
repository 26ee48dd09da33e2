//! Statistic schema and the additive statistics vector.
//!
//! The schema is a durable output contract: fifteen positions, in the order
//! of [`Stat::ALL`]. The last seven positions hold squares of the seven
//! per-record measurements so that downstream consumers can recover a
//! standard deviation as `sqrt(E[X²] − E[X]²)` from summed aggregates alone.
//!
//! Vectors combine only by elementwise addition, which makes the combination
//! associative and commutative. That is what allows partial aggregates to be
//! built independently on any partitioning of the input and merged later in
//! any order.

use serde::{Deserialize, Serialize};
use stillwater::{Monoid, Semigroup};

/// Number of positions in the statistic schema.
pub const STAT_COUNT: usize = 15;

/// One named position of the statistic schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Stat {
    PingCount,
    UsageHours,
    MainCrashes,
    ContentCrashes,
    PluginCrashes,
    GmpluginCrashes,
    ContentShutdownCrashes,
    GpuCrashes,
    UsageHoursSquared,
    MainCrashesSquared,
    ContentCrashesSquared,
    PluginCrashesSquared,
    GmpluginCrashesSquared,
    ContentShutdownCrashesSquared,
    GpuCrashesSquared,
}

impl Stat {
    /// All statistics in schema order.
    pub const ALL: [Stat; STAT_COUNT] = [
        Stat::PingCount,
        Stat::UsageHours,
        Stat::MainCrashes,
        Stat::ContentCrashes,
        Stat::PluginCrashes,
        Stat::GmpluginCrashes,
        Stat::ContentShutdownCrashes,
        Stat::GpuCrashes,
        Stat::UsageHoursSquared,
        Stat::MainCrashesSquared,
        Stat::ContentCrashesSquared,
        Stat::PluginCrashesSquared,
        Stat::GmpluginCrashesSquared,
        Stat::ContentShutdownCrashesSquared,
        Stat::GpuCrashesSquared,
    ];

    /// Statistics that are measured per record and have a squared companion.
    pub const MEASURED: [Stat; 7] = [
        Stat::UsageHours,
        Stat::MainCrashes,
        Stat::ContentCrashes,
        Stat::PluginCrashes,
        Stat::GmpluginCrashes,
        Stat::ContentShutdownCrashes,
        Stat::GpuCrashes,
    ];

    /// Position in the vector.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Output column name.
    pub const fn name(self) -> &'static str {
        match self {
            Stat::PingCount => "ping_count",
            Stat::UsageHours => "usage_hours",
            Stat::MainCrashes => "main_crashes",
            Stat::ContentCrashes => "content_crashes",
            Stat::PluginCrashes => "plugin_crashes",
            Stat::GmpluginCrashes => "gmplugin_crashes",
            Stat::ContentShutdownCrashes => "content_shutdown_crashes",
            Stat::GpuCrashes => "gpu_crashes",
            Stat::UsageHoursSquared => "usage_hours_squared",
            Stat::MainCrashesSquared => "main_crashes_squared",
            Stat::ContentCrashesSquared => "content_crashes_squared",
            Stat::PluginCrashesSquared => "plugin_crashes_squared",
            Stat::GmpluginCrashesSquared => "gmplugin_crashes_squared",
            Stat::ContentShutdownCrashesSquared => "content_shutdown_crashes_squared",
            Stat::GpuCrashesSquared => "gpu_crashes_squared",
        }
    }

    /// The squared companion of a measured statistic.
    pub const fn squared(self) -> Option<Stat> {
        match self {
            Stat::UsageHours => Some(Stat::UsageHoursSquared),
            Stat::MainCrashes => Some(Stat::MainCrashesSquared),
            Stat::ContentCrashes => Some(Stat::ContentCrashesSquared),
            Stat::PluginCrashes => Some(Stat::PluginCrashesSquared),
            Stat::GmpluginCrashes => Some(Stat::GmpluginCrashesSquared),
            Stat::ContentShutdownCrashes => Some(Stat::ContentShutdownCrashesSquared),
            Stat::GpuCrashes => Some(Stat::GpuCrashesSquared),
            _ => None,
        }
    }
}

/// Per-record measurements before squares are added.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Observation {
    pub usage_hours: f64,
    pub main_crashes: f64,
    pub content_crashes: f64,
    pub plugin_crashes: f64,
    pub gmplugin_crashes: f64,
    pub content_shutdown_crashes: f64,
    pub gpu_crashes: f64,
}

impl Observation {
    fn measured(&self) -> [f64; 7] {
        [
            self.usage_hours,
            self.main_crashes,
            self.content_crashes,
            self.plugin_crashes,
            self.gmplugin_crashes,
            self.content_shutdown_crashes,
            self.gpu_crashes,
        ]
    }
}

/// Fixed-length statistics vector, indexed by [`Stat`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatsVector([f64; STAT_COUNT]);

impl Default for StatsVector {
    fn default() -> Self {
        Self::zero()
    }
}

impl StatsVector {
    pub const fn zero() -> Self {
        Self([0.0; STAT_COUNT])
    }

    /// Vector for a single record: ping count 1, the measurements, and their squares.
    pub fn from_observation(observation: &Observation) -> Self {
        let mut values = [0.0; STAT_COUNT];
        values[Stat::PingCount.index()] = 1.0;
        for (stat, value) in Stat::MEASURED.iter().zip(observation.measured()) {
            values[stat.index()] = value;
            if let Some(squared) = stat.squared() {
                values[squared.index()] = value * value;
            }
        }
        Self(values)
    }

    /// Wrap raw values. Callers are responsible for the non-negativity invariant.
    pub const fn from_values(values: [f64; STAT_COUNT]) -> Self {
        Self(values)
    }

    pub fn get(&self, stat: Stat) -> f64 {
        self.0[stat.index()]
    }

    pub fn values(&self) -> &[f64; STAT_COUNT] {
        &self.0
    }

    /// Elementwise sum.
    pub fn merge(&self, other: &Self) -> Self {
        let mut values = self.0;
        for (value, rhs) in values.iter_mut().zip(other.0.iter()) {
            *value += rhs;
        }
        Self(values)
    }

    /// `(name, value)` pairs in schema order.
    pub fn named(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        Stat::ALL.iter().map(move |stat| (stat.name(), self.get(*stat)))
    }

    /// Mean of a measured statistic per ping.
    pub fn mean(&self, stat: Stat) -> Option<f64> {
        let pings = self.get(Stat::PingCount);
        stat.squared()?;
        (pings > 0.0).then(|| self.get(stat) / pings)
    }

    /// Population standard deviation of a measured statistic per ping.
    ///
    /// Rounding can push `E[X²] − E[X]²` slightly below zero; it is floored at 0.
    pub fn std_dev(&self, stat: Stat) -> Option<f64> {
        let squared = stat.squared()?;
        let mean = self.mean(stat)?;
        let mean_of_squares = self.get(squared) / self.get(Stat::PingCount);
        Some((mean_of_squares - mean * mean).max(0.0).sqrt())
    }
}

impl Semigroup for StatsVector {
    fn combine(self, other: Self) -> Self {
        self.merge(&other)
    }
}

impl Monoid for StatsVector {
    fn empty() -> Self {
        Self::zero()
    }
}
