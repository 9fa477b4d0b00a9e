//! Combinatorial loadout and museum optimizer.
//!
//! [`OptimizationRun`] is a caller-driven pump over a [`CandidateSpace`]:
//! each [`OptimizationRun::step`] scores one chunk, reports progress and
//! checks for cancellation. [`optimize_inventory`] drives a run to the end.

pub mod candidates;
pub mod config;
pub mod constraints;
pub mod progress;

pub use candidates::{CandidateSpace, RingSet, potential_score, potential_weight, ring_combinations};
pub use config::{OptimizerConfig, OptimizerConfigError};
pub use constraints::{ConstraintError, OptimizationConstraints};
pub use progress::{
    CancellationToken, NoProgress, ProgressSink, STAGE_CANCELLED, STAGE_COMPLETE,
    STAGE_EVALUATING, STAGE_PREPARING,
};

use serde::{Deserialize, Serialize};

use crate::aggregate::calculate_base_stats;
use crate::catalog::Catalog;
use crate::efficiency::efficiency_of;
use crate::events::{EventSplit, apply_event_multipliers, separate_event_multipliers};
use crate::loadout::EquipmentLoadout;
use crate::museum::{MuseumSlot, calculate_museum_bonuses, sanitize_museum};
use crate::museum_layout::{PriorityProfile, layout_for_profile};
use crate::numbers::{finite_or_zero, percent_complete};
use crate::stats::AdditiveStats;

/// A scored candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub loadout: EquipmentLoadout,
    pub museum: Vec<MuseumSlot>,
    /// Post-event stats.
    pub stats: AdditiveStats,
    pub efficiency: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationResult {
    pub loadout: EquipmentLoadout,
    pub museum: Vec<MuseumSlot>,
    pub stats: AdditiveStats,
    pub efficiency: f64,
    pub evaluated: usize,
    pub total_candidates: usize,
    pub cancelled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Running,
    Complete,
    Cancelled,
}

/// Museum choice per candidate.
#[derive(Debug, Clone)]
enum MuseumPlan {
    Fixed(Vec<MuseumSlot>),
    ByProfile {
        standard: Vec<MuseumSlot>,
        high_luck: Vec<MuseumSlot>,
    },
}

impl MuseumPlan {
    fn for_base(&self, base: &AdditiveStats) -> &[MuseumSlot] {
        match self {
            Self::Fixed(slots) => slots.as_slice(),
            Self::ByProfile {
                standard,
                high_luck,
            } => match PriorityProfile::for_base_stats(base) {
                PriorityProfile::Standard => standard.as_slice(),
                PriorityProfile::HighLuck => high_luck.as_slice(),
            },
        }
    }
}

/// Incremental optimizer state.
#[derive(Debug)]
pub struct OptimizationRun<'a> {
    catalog: &'a Catalog,
    space: CandidateSpace,
    config: OptimizerConfig,
    events: EventSplit,
    museum: MuseumPlan,
    current_loadout: EquipmentLoadout,
    cancellation: CancellationToken,
    next: usize,
    best: Option<Evaluation>,
    status: RunStatus,
}

impl<'a> OptimizationRun<'a> {
    /// Prepare the candidate space for a run.
    ///
    /// # Errors
    ///
    /// Returns [`ConstraintError`] when the constraints are inconsistent.
    pub fn new(
        catalog: &'a Catalog,
        constraints: &OptimizationConstraints,
        current_loadout: &EquipmentLoadout,
        current_museum: &[MuseumSlot],
        config: &OptimizerConfig,
    ) -> Result<Self, ConstraintError> {
        constraints.validate()?;
        let mut config = config.clone();
        config.sanitize();

        let space = CandidateSpace::build(catalog, constraints, current_loadout, &config);
        // Events are identical for every candidate.
        let events = separate_event_multipliers(catalog, &space.template().events);
        let museum = if constraints.optimize_museum {
            MuseumPlan::ByProfile {
                standard: layout_for_profile(catalog, PriorityProfile::Standard),
                high_luck: layout_for_profile(catalog, PriorityProfile::HighLuck),
            }
        } else {
            MuseumPlan::Fixed(sanitize_museum(current_museum))
        };

        log::debug!(
            "optimizer prepared {} candidates (chunk size {})",
            space.len(),
            config.chunk_size
        );

        Ok(Self {
            catalog,
            space,
            config,
            events,
            museum,
            current_loadout: current_loadout.clone(),
            cancellation: CancellationToken::new(),
            next: 0,
            best: None,
            status: RunStatus::Running,
        })
    }

    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    #[must_use]
    pub fn total_candidates(&self) -> usize {
        self.space.len()
    }

    #[must_use]
    pub const fn evaluated(&self) -> usize {
        self.next
    }

    #[must_use]
    pub const fn best(&self) -> Option<&Evaluation> {
        self.best.as_ref()
    }

    #[must_use]
    pub const fn status(&self) -> RunStatus {
        self.status
    }

    /// Museum, post-event stats and efficiency for one loadout.
    fn run_pipeline(&self, loadout: &EquipmentLoadout) -> (&[MuseumSlot], AdditiveStats, f64) {
        let base = calculate_base_stats(self.catalog, loadout);
        let museum = self.museum.for_base(&base);
        let bonuses = calculate_museum_bonuses(self.catalog, museum);
        let staged = apply_event_multipliers(&base, &bonuses, &self.events.pre, &self.events.post);
        let efficiency = finite_or_zero(efficiency_of(&staged.event_stats, &self.config.efficiency));
        (museum, staged.event_stats, efficiency)
    }

    fn evaluate(&self, loadout: EquipmentLoadout) -> Evaluation {
        let (museum, stats, efficiency) = self.run_pipeline(&loadout);
        Evaluation {
            museum: museum.to_vec(),
            loadout,
            stats,
            efficiency,
        }
    }

    fn consider(&mut self, index: usize) {
        let Some(candidate) = self.space.candidate(index) else {
            return;
        };
        let (museum, stats, efficiency) = self.run_pipeline(&candidate);
        let improved = self
            .best
            .as_ref()
            .is_none_or(|best| efficiency > best.efficiency);
        if improved {
            log::trace!("candidate {index} is the new best ({efficiency:.4})");
            let museum = museum.to_vec();
            self.best = Some(Evaluation {
                loadout: candidate,
                museum,
                stats,
                efficiency,
            });
        }
    }

    /// Evaluate the next chunk and report progress.
    pub fn step<P>(&mut self, progress: &mut P) -> RunStatus
    where
        P: ProgressSink + ?Sized,
    {
        if self.status != RunStatus::Running {
            return self.status;
        }
        let total = self.space.len();
        if self.cancellation.is_cancelled() {
            log::debug!("optimizer cancelled after {} of {total} candidates", self.next);
            self.status = RunStatus::Cancelled;
            progress.report(percent_complete(self.next, total), STAGE_CANCELLED);
            return self.status;
        }

        let end = self.next.saturating_add(self.config.chunk_size).min(total);
        for index in self.next..end {
            self.consider(index);
        }
        self.next = end;

        if end >= total {
            log::debug!(
                "optimizer finished {total} candidates, best efficiency {:.4}",
                self.best.as_ref().map_or(0.0, |best| best.efficiency)
            );
            self.status = RunStatus::Complete;
            progress.report(100, STAGE_COMPLETE);
        } else {
            progress.report(percent_complete(end, total), STAGE_EVALUATING);
        }
        self.status
    }

    /// Finish the run. Without any evaluated candidate the current loadout
    /// is scored instead.
    #[must_use]
    pub fn into_result(self) -> OptimizationResult {
        let best = match &self.best {
            Some(best) => best.clone(),
            None => self.evaluate(self.current_loadout.clone()),
        };
        OptimizationResult {
            loadout: best.loadout,
            museum: best.museum,
            stats: best.stats,
            efficiency: best.efficiency,
            evaluated: self.next,
            total_candidates: self.space.len(),
            cancelled: self.status == RunStatus::Cancelled,
        }
    }
}

/// Search for the loadout and museum with the highest luck efficiency.
///
/// # Errors
///
/// Returns [`ConstraintError`] when the constraints are inconsistent.
pub fn optimize_inventory<P>(
    catalog: &Catalog,
    constraints: &OptimizationConstraints,
    current_loadout: &EquipmentLoadout,
    current_museum: &[MuseumSlot],
    config: &OptimizerConfig,
    progress: &mut P,
) -> Result<OptimizationResult, ConstraintError>
where
    P: ProgressSink + ?Sized,
{
    progress.report(0, STAGE_PREPARING);
    let mut run = OptimizationRun::new(catalog, constraints, current_loadout, current_museum, config)?;
    while run.step(progress) == RunStatus::Running {}
    Ok(run.into_result())
}

/// Like [`optimize_inventory`], yielding to the tokio scheduler between
/// chunks and stopping early once `cancellation` fires.
///
/// # Errors
///
/// Returns [`ConstraintError`] when the constraints are inconsistent.
#[cfg(feature = "async")]
pub async fn optimize_inventory_async<P>(
    catalog: &Catalog,
    constraints: &OptimizationConstraints,
    current_loadout: &EquipmentLoadout,
    current_museum: &[MuseumSlot],
    config: &OptimizerConfig,
    progress: &mut P,
    cancellation: CancellationToken,
) -> Result<OptimizationResult, ConstraintError>
where
    P: ProgressSink + ?Sized,
{
    progress.report(0, STAGE_PREPARING);
    let mut run = OptimizationRun::new(catalog, constraints, current_loadout, current_museum, config)?
        .with_cancellation(cancellation);
    while run.step(progress) == RunStatus::Running {
        tokio::task::yield_now().await;
    }
    Ok(run.into_result())
}
