//! Normalised quality indicators for a finished timetable.

use super::profile::Profile;
use super::ScoringContext;
use crate::catalog::CELLS;
use crate::genome::Genome;

const W_COMPLETENESS: f64 = 0.3;
const W_AVAILABILITY: f64 = 0.25;
const W_BALANCE: f64 = 0.2;
const W_UTILIZATION: f64 = 0.1;
const W_CONCENTRATION: f64 = 0.15;

/// Every indicator lies in `[0, 1]`, higher is better.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QualityMetrics {
    /// Share of demanded subjects placed exactly as often as required.
    pub completeness: f64,
    /// Share of lessons inside their teacher's availability.
    pub availability: f64,
    /// `max(0, (3 − σ) / 3)` of the day loads.
    pub balance: f64,
    /// Share of used cells.
    pub utilization: f64,
    /// Mean over teachers of `max(0, 4 − working days) / 4`.
    pub teacher_concentration: f64,
    /// Weighted mean of the five indicators.
    pub overall: f64,
}

impl QualityMetrics {
    pub fn measure(genome: &Genome, ctx: &ScoringContext<'_>) -> Self {
        let profile = Profile::new(genome, ctx);

        let subjects = ctx.demand.subjects();
        let complete = subjects
            .iter()
            .filter(|&&s| profile.counts.get(s).copied().unwrap_or(0) == ctx.demand.required(s))
            .count();
        let completeness = if subjects.is_empty() {
            0.0
        } else {
            complete as f64 / subjects.len() as f64
        };

        let availability = profile.available as f64 / profile.placed.max(1) as f64;
        let balance = ((3.0 - profile.load_std()) / 3.0).max(0.0);
        let utilization = profile.used_cells() as f64 / CELLS as f64;

        let teachers = profile.teacher_days.len();
        let teacher_concentration = if teachers == 0 {
            0.0
        } else {
            profile
                .teacher_day_counts()
                .map(|days| 4usize.saturating_sub(days) as f64 / 4.0)
                .sum::<f64>()
                / teachers as f64
        };

        let overall = completeness * W_COMPLETENESS
            + availability * W_AVAILABILITY
            + balance * W_BALANCE
            + utilization * W_UTILIZATION
            + teacher_concentration * W_CONCENTRATION;

        Self {
            completeness,
            availability,
            balance,
            utilization,
            teacher_concentration,
            overall,
        }
    }
}
