//! Differential evolution engine.
//!
//! Implements a steady-state DE/rand/1 search over continuous placement
//! coordinates. Selection writes the surviving candidate back into its
//! population slot immediately, so the result for slot `i` is visible to the
//! donor sampling for slot `i + 1` within the same generation. The per-slot
//! loop is strictly sequential to keep that read-after-write chain auditable;
//! the population and the best-so-far tracker are owned exclusively by the
//! runner.

use log::debug;
use rand::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::error::{Error, Result};
use crate::geometry::{in_bounds, overlaps};
use crate::layout::Layout;
use crate::piece::{Piece, Rotation};
use crate::render::LayoutRenderer;
use crate::sheet::Sheet;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration for the differential evolution search.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DeConfig {
    /// Population size. Mutation draws three distinct donors besides the
    /// target, so at least 4 candidates are required.
    pub population_size: usize,
    /// Number of generations to run.
    pub max_generations: u32,
    /// Differential weight `F` applied to the donor difference vector.
    pub differential_weight: f64,
    /// Crossover probability `CR` (0.0 - 1.0). The same constant drives the
    /// mutation mask and the crossover mask.
    pub crossover_rate: f64,
    /// Placement attempts per piece during initialization before the whole
    /// candidate is discarded.
    pub placement_retries: u32,
    /// Total discarded candidates allowed during initialization before the
    /// run fails with [`Error::InfeasiblePopulation`].
    pub max_restarts: usize,
    /// Wall-clock limit for the generational loop (None = unlimited).
    pub time_limit: Option<Duration>,
}

impl Default for DeConfig {
    fn default() -> Self {
        Self {
            population_size: 50,
            max_generations: 200,
            differential_weight: 0.8,
            crossover_rate: 0.9,
            placement_retries: 100,
            max_restarts: 1000,
            time_limit: None,
        }
    }
}

impl DeConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the population size (floored at 4).
    pub fn with_population_size(mut self, size: usize) -> Self {
        self.population_size = size.max(4);
        self
    }

    /// Sets the number of generations.
    pub fn with_max_generations(mut self, generations: u32) -> Self {
        self.max_generations = generations;
        self
    }

    /// Sets the differential weight `F`.
    pub fn with_differential_weight(mut self, weight: f64) -> Self {
        self.differential_weight = weight;
        self
    }

    /// Sets the crossover probability `CR` (clamped to [0, 1]).
    pub fn with_crossover_rate(mut self, rate: f64) -> Self {
        self.crossover_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets the per-piece placement retry cap.
    pub fn with_placement_retries(mut self, retries: u32) -> Self {
        self.placement_retries = retries.max(1);
        self
    }

    /// Sets the initializer restart budget.
    pub fn with_max_restarts(mut self, restarts: usize) -> Self {
        self.max_restarts = restarts.max(1);
        self
    }

    /// Sets the wall-clock limit.
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }
}

/// Progress snapshot delivered once per generation.
#[derive(Debug, Clone)]
pub struct DeProgress {
    /// Generations completed so far.
    pub generation: u32,
    /// Maximum generations configured.
    pub max_generations: u32,
    /// Best fitness so far.
    pub best_fitness: f64,
    /// Elapsed time since the run started.
    pub elapsed: Duration,
    /// Whether the search is still running.
    pub running: bool,
}

/// Result of a DE run.
#[derive(Debug, Clone)]
pub struct DeResult {
    /// Best layout found (a deep copy of the winning candidate).
    pub best: Layout,
    /// Fitness of `best`.
    pub best_fitness: f64,
    /// Generations completed.
    pub generations: u32,
    /// Total elapsed time.
    pub elapsed: Duration,
    /// Best fitness after each generation.
    pub history: Vec<f64>,
}

/// One population slot: a layout plus its cached fitness.
///
/// Fitness is pure in the layout and the sheet, so the cache is refreshed
/// exactly when the layout is replaced. Selection outcomes are identical to
/// recomputing on every comparison.
#[derive(Debug, Clone)]
struct Candidate {
    layout: Layout,
    fitness: f64,
}

/// Differential evolution runner.
///
/// Owns the sheet, the piece catalog and the population for one run. The
/// catalog order defines the piece order of every candidate.
pub struct DeRunner {
    config: DeConfig,
    sheet: Sheet,
    catalog: Vec<Piece>,
    cancelled: Arc<AtomicBool>,
}

impl DeRunner {
    /// Creates a runner for the given sheet and piece catalog.
    pub fn new(config: DeConfig, sheet: Sheet, catalog: Vec<Piece>) -> Self {
        Self {
            config,
            sheet,
            catalog,
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Returns a handle that cancels the run when set.
    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        self.cancelled.clone()
    }

    /// Validates the configuration, sheet and catalog.
    ///
    /// Runs automatically before any search work; exposed so callers can
    /// fail fast without starting a run.
    pub fn validate(&self) -> Result<()> {
        self.sheet.validate()?;
        if self.config.population_size < 4 {
            return Err(Error::InvalidConfig {
                reason: format!(
                    "population size must be at least 4 (three donors plus the target), got {}",
                    self.config.population_size
                ),
            });
        }
        if self.config.max_generations == 0 {
            return Err(Error::InvalidConfig {
                reason: "max generations must be at least 1".to_string(),
            });
        }
        if !self.config.differential_weight.is_finite() {
            return Err(Error::InvalidConfig {
                reason: format!(
                    "differential weight must be finite, got {}",
                    self.config.differential_weight
                ),
            });
        }
        if !(0.0..=1.0).contains(&self.config.crossover_rate) {
            return Err(Error::InvalidConfig {
                reason: format!(
                    "crossover rate must be within [0, 1], got {}",
                    self.config.crossover_rate
                ),
            });
        }
        if self.config.placement_retries == 0 {
            return Err(Error::InvalidConfig {
                reason: "placement retries must be at least 1".to_string(),
            });
        }
        for piece in &self.catalog {
            piece.validate(&self.sheet)?;
        }
        Ok(())
    }

    /// Runs the search with a thread-local RNG.
    pub fn run(&self) -> Result<DeResult> {
        self.run_with_rng(&mut thread_rng())
    }

    /// Runs the search with a progress callback.
    pub fn run_with_progress<F>(&self, callback: F) -> Result<DeResult>
    where
        F: Fn(DeProgress),
    {
        self.run_with_rng_and_progress(&mut thread_rng(), Some(callback))
    }

    /// Runs the search with a caller-supplied RNG for reproducible runs.
    pub fn run_with_rng<R: Rng>(&self, rng: &mut R) -> Result<DeResult> {
        self.run_with_rng_and_progress::<R, fn(DeProgress)>(rng, None)
    }

    /// Runs the search with a specific RNG and optional progress callback.
    pub fn run_with_rng_and_progress<R: Rng, F>(
        &self,
        rng: &mut R,
        progress_callback: Option<F>,
    ) -> Result<DeResult>
    where
        F: Fn(DeProgress),
    {
        self.validate()?;
        let start = Instant::now();

        let mut population = self.initialize_population(rng)?;

        // The initializer only emits feasible candidates, so the tracked best
        // starts feasible and an infeasible trial (negative-infinity fitness)
        // can never displace it.
        let mut best = population
            .iter()
            .max_by(|a, b| {
                a.fitness
                    .partial_cmp(&b.fitness)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .cloned()
            .unwrap_or_else(|| population[0].clone());
        let mut best_fitness = best.fitness;

        let mut history = Vec::with_capacity(self.config.max_generations as usize);
        let mut generation = 0u32;

        while generation < self.config.max_generations {
            if self.cancelled.load(Ordering::Relaxed) {
                break;
            }
            if let Some(limit) = self.config.time_limit {
                if start.elapsed() > limit {
                    break;
                }
            }

            for target_idx in 0..population.len() {
                let mutant = self.mutate(&population, target_idx, rng);
                let trial = self.crossover(&population[target_idx].layout, &mutant, rng);
                let trial_fitness = trial.fitness(&self.sheet);

                // Steady-state selection: the slot is replaced immediately,
                // so later slots of this generation can draw the survivor as
                // a donor. Ties keep the incumbent.
                if trial_fitness > population[target_idx].fitness {
                    population[target_idx] = Candidate {
                        layout: trial,
                        fitness: trial_fitness,
                    };
                }

                if population[target_idx].fitness > best_fitness {
                    best_fitness = population[target_idx].fitness;
                    best = population[target_idx].clone();
                }
            }

            generation += 1;
            history.push(best_fitness);
            debug!(
                "generation {}/{}: best fitness {:.3}",
                generation, self.config.max_generations, best_fitness
            );

            if let Some(ref callback) = progress_callback {
                callback(DeProgress {
                    generation,
                    max_generations: self.config.max_generations,
                    best_fitness,
                    elapsed: start.elapsed(),
                    running: true,
                });
            }
        }

        if let Some(ref callback) = progress_callback {
            callback(DeProgress {
                generation,
                max_generations: self.config.max_generations,
                best_fitness,
                elapsed: start.elapsed(),
                running: false,
            });
        }

        Ok(DeResult {
            best: best.layout,
            best_fitness,
            generations: generation,
            elapsed: start.elapsed(),
            history,
        })
    }

    /// Renders the unoptimized catalog, runs the search, renders the result.
    ///
    /// The renderer is an external collaborator; a no-op implementation is
    /// fine (see [`NoopRenderer`](crate::render::NoopRenderer)).
    pub fn solve_and_render<L: LayoutRenderer + ?Sized>(&self, renderer: &L) -> Result<DeResult> {
        renderer.render(&Layout::new(self.catalog.clone()), "Initial layout");
        let result = self.run()?;
        renderer.render(&result.best, "Optimized layout");
        Ok(result)
    }

    /// Builds `population_size` feasible candidates by randomized per-piece
    /// placement.
    ///
    /// A candidate whose piece runs out of placement retries is discarded
    /// whole and rebuilt from scratch; every discard counts against the
    /// global `max_restarts` budget so an over-dense catalog fails with an
    /// error instead of looping forever.
    fn initialize_population<R: Rng>(&self, rng: &mut R) -> Result<Vec<Candidate>> {
        let mut population = Vec::with_capacity(self.config.population_size);
        let mut restarts = 0usize;

        while population.len() < self.config.population_size {
            match self.random_candidate(rng) {
                Some(layout) => {
                    let fitness = layout.fitness(&self.sheet);
                    population.push(Candidate { layout, fitness });
                }
                None => {
                    restarts += 1;
                    if restarts >= self.config.max_restarts {
                        return Err(Error::InfeasiblePopulation { attempts: restarts });
                    }
                }
            }
        }

        Ok(population)
    }

    /// Attempts to build one feasible candidate; `None` when any piece
    /// exhausts its placement retries.
    fn random_candidate<R: Rng>(&self, rng: &mut R) -> Option<Layout> {
        let mut placed: Vec<Piece> = Vec::with_capacity(self.catalog.len());

        for template in &self.catalog {
            let piece = self.place_piece(template, &placed, rng)?;
            placed.push(piece);
        }

        Some(Layout::new(placed))
    }

    /// Draws random placements for one piece until it fits against the
    /// pieces already placed in this candidate.
    ///
    /// Positions are sampled uniformly from `[0, sheet - extent]` per axis
    /// (upper extent only; the lower bound is implicit in the range) and the
    /// rotation is resampled on every draw when tracked.
    fn place_piece<R: Rng>(&self, template: &Piece, placed: &[Piece], rng: &mut R) -> Option<Piece> {
        let mut piece = template.clone();
        let max_x = (self.sheet.width - piece.extent_x()).max(0.0);
        let max_y = (self.sheet.height - piece.extent_y()).max(0.0);

        for _ in 0..self.config.placement_retries {
            piece.x = rng.gen_range(0.0..=max_x);
            piece.y = rng.gen_range(0.0..=max_y);
            if let Some(rotation) = piece.rotation.as_mut() {
                *rotation = Rotation::sample(rng);
            }

            if in_bounds(&piece, &self.sheet)
                && !placed.iter().any(|other| overlaps(&piece, other))
            {
                return Some(piece);
            }
        }

        None
    }

    /// Builds a mutant for the given target slot.
    ///
    /// Three distinct donor slots `a`, `b`, `c`, all different from the
    /// target, are drawn uniformly without replacement. The mutant starts as
    /// a copy of donor `a`; each piece selected by the `CR` draw moves to
    /// `a + F * (b - c)` clamped to the sheet rectangle and resamples its
    /// rotation when tracked. Unselected pieces stay identical to donor `a`.
    fn mutate<R: Rng>(&self, population: &[Candidate], target_idx: usize, rng: &mut R) -> Layout {
        let picked = rand::seq::index::sample(rng, population.len() - 1, 3);
        let remap = |i: usize| if i >= target_idx { i + 1 } else { i };
        let (a, b, c) = (
            remap(picked.index(0)),
            remap(picked.index(1)),
            remap(picked.index(2)),
        );

        let mut mutant = population[a].layout.clone();
        let donor_b = population[b].layout.pieces();
        let donor_c = population[c].layout.pieces();
        let weight = self.config.differential_weight;

        for (i, piece) in mutant.pieces_mut().iter_mut().enumerate() {
            if rng.gen::<f64>() < self.config.crossover_rate {
                piece.x = (piece.x + weight * (donor_b[i].x - donor_c[i].x))
                    .clamp(0.0, self.sheet.width);
                piece.y = (piece.y + weight * (donor_b[i].y - donor_c[i].y))
                    .clamp(0.0, self.sheet.height);
                if piece.rotation.is_some() {
                    piece.rotation = Some(Rotation::sample(rng));
                }
            }
        }

        mutant
    }

    /// Binomial-style crossover: each trial piece takes its whole
    /// `x, y, rotation` triple from the mutant with probability `CR`,
    /// otherwise keeps the target's triple. No partial field mixing.
    fn crossover<R: Rng>(&self, target: &Layout, mutant: &Layout, rng: &mut R) -> Layout {
        let mut trial = target.clone();

        for (piece, donor) in trial.pieces_mut().iter_mut().zip(mutant.pieces()) {
            if rng.gen::<f64>() < self.config.crossover_rate {
                piece.x = donor.x;
                piece.y = donor.y;
                if piece.rotation.is_some() {
                    piece.rotation = donor.rotation;
                }
            }
        }

        trial
    }
}
