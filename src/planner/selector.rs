use std::collections::BTreeSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, warn};

use crate::catalog::{CatalogEntry, MealCatalog};
use crate::error::{PlanError, Result};
use crate::models::{DietaryConstraint, MealSlot, SlotTarget};
use crate::planner::config::{PlannerConfig, TieBreak};
use crate::planner::constants::{ADEQUACY_RATIO, PROTEIN_ERROR_WEIGHT, SCORE_TIE_EPSILON};
use crate::planner::rotation::RotationState;

/// Outcome of choosing an option for one slot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Selection {
    /// Index of the winner in the catalog.
    pub index: usize,
    pub score: f64,
    /// The rotation filters left nothing and were dropped for this slot.
    pub rotation_relaxed: bool,
}

/// Candidate option with its computed score.
#[derive(Debug)]
struct Candidate {
    index: usize,
    score: f64,
}

/// Picks one catalog option per slot under dietary and rotation constraints.
pub struct ConstraintMealSelector<'a> {
    catalog: &'a MealCatalog,
    config: &'a PlannerConfig,
    rng: Option<StdRng>,
}

impl<'a> ConstraintMealSelector<'a> {
    pub fn new(catalog: &'a MealCatalog, config: &'a PlannerConfig) -> Self {
        let rng = match config.tie_break {
            TieBreak::CatalogOrder => None,
            TieBreak::Seeded(seed) => Some(StdRng::seed_from_u64(seed)),
        };
        Self {
            catalog,
            config,
            rng,
        }
    }

    /// Score an option against a slot target. Lower is better.
    ///
    /// `|kcal error| + 10 * |protein error| - variety bonus - adequacy bonus`
    pub fn score(&self, entry: &CatalogEntry, target: SlotTarget, rotation: &RotationState) -> f64 {
        let est_kcal = entry.nutrition.calories;
        let est_protein = entry.nutrition.protein_g;

        let mut score = (est_kcal - target.calories_kcal).abs()
            + PROTEIN_ERROR_WEIGHT * (est_protein - target.protein_g).abs();

        if rotation.is_unused_bucket(&entry.option.variety_bucket) {
            score -= self.config.variety_bonus;
        }

        let adequate = est_kcal >= ADEQUACY_RATIO * target.calories_kcal
            && est_protein >= ADEQUACY_RATIO * target.protein_g;
        if adequate {
            score -= self.config.adequacy_bonus;
        }

        score
    }

    fn passes_rotation(&self, entry: &CatalogEntry, rotation: &RotationState) -> bool {
        let option = &entry.option;
        if let Some(pulse) = &option.pulse {
            if rotation.pulse_used_previous_day(pulse) {
                return false;
            }
        }
        if let Some(staple) = option.staple {
            if rotation.staple_at_cap(staple, self.config.staple_cap) {
                return false;
            }
        }
        !rotation.variety_at_cap(&option.variety_bucket, self.config.variety_cap)
    }

    /// Choose the best option for `slot` and record it in `rotation`.
    ///
    /// Stages:
    /// 1. Slot and dietary filter
    /// 2. Rotation filter, dropped entirely if it leaves nothing
    /// 3. Lowest score wins, ties broken by catalog order or the seeded source
    pub fn select(
        &mut self,
        slot: MealSlot,
        target: SlotTarget,
        rotation: &mut RotationState,
        constraints: &BTreeSet<DietaryConstraint>,
    ) -> Result<Selection> {
        let catalog = self.catalog;
        let dietary: Vec<(usize, &CatalogEntry)> = catalog
            .for_slot(slot)
            .filter(|(_, e)| e.satisfies_all(constraints))
            .collect();

        if dietary.is_empty() {
            warn!(%slot, "no dietary-valid option for slot");
            return Err(PlanError::NoCandidate { slot });
        }

        let rotated: Vec<(usize, &CatalogEntry)> = dietary
            .iter()
            .copied()
            .filter(|(_, e)| self.passes_rotation(e, rotation))
            .collect();

        let rotation_relaxed = rotated.is_empty();
        let pool = if rotation_relaxed {
            warn!(
                %slot,
                day = rotation.days_completed() + 1,
                candidates = dietary.len(),
                "rotation filters left no option, relaxing"
            );
            dietary
        } else {
            rotated
        };

        let candidates: Vec<Candidate> = pool
            .iter()
            .map(|(index, entry)| Candidate {
                index: *index,
                score: self.score(entry, target, rotation),
            })
            .collect();

        let winner = self.pick(&candidates);
        let entry = &catalog.all()[winner.index];

        debug!(
            %slot,
            option = %entry.option.name,
            score = winner.score,
            pool = candidates.len(),
            rotation_relaxed,
            "selected"
        );

        rotation.record(&entry.option);

        Ok(Selection {
            index: winner.index,
            score: winner.score,
            rotation_relaxed,
        })
    }

    fn pick<'c>(&mut self, candidates: &'c [Candidate]) -> &'c Candidate {
        let best = candidates
            .iter()
            .map(|c| c.score)
            .fold(f64::INFINITY, f64::min);

        // candidates are in catalog order, so the first tied entry is the earliest
        let tied: Vec<&Candidate> = candidates
            .iter()
            .filter(|c| c.score - best <= SCORE_TIE_EPSILON)
            .collect();

        match self.rng.as_mut() {
            Some(rng) if tied.len() > 1 => tied[rng.gen_range(0..tied.len())],
            _ => tied[0],
        }
    }
}
