//! Scenario runner for batch and sweep projections
//!
//! Holds a base scenario and runs variations of it. Each run is an independent
//! projection, so batches are spread across threads.

use log::info;
use rayon::prelude::*;

use crate::inputs::InputSet;
use crate::projection::{ProjectionEngine, ProjectionResult};

/// Runner around a base scenario
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::new(inputs);
///
/// // Compare selling after 5..=20 years
/// for (years, result) in runner.holding_period_sweep(5..=20) {
///     println!("{years}: {:.0}", result.summary.total_profit);
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScenarioRunner {
    base: InputSet,
}

impl ScenarioRunner {
    pub fn new(base: InputSet) -> Self {
        Self { base }
    }

    /// Project the base scenario
    pub fn run(&self) -> ProjectionResult {
        ProjectionEngine::new(self.base.clone()).project()
    }

    /// Project a copy of the base scenario after applying `adjust`
    pub fn run_with<F>(&self, adjust: F) -> ProjectionResult
    where
        F: FnOnce(&mut InputSet),
    {
        let mut inputs = self.base.clone();
        adjust(&mut inputs);
        ProjectionEngine::new(inputs).project()
    }

    /// Project independent scenarios, results in input order
    pub fn run_scenarios(&self, scenarios: &[InputSet]) -> Vec<ProjectionResult> {
        info!("running {} scenarios", scenarios.len());
        scenarios
            .par_iter()
            .map(|inputs| ProjectionEngine::new(inputs.clone()).project())
            .collect()
    }

    /// Project the base scenario for each holding period
    pub fn holding_period_sweep<I>(&self, holding_years: I) -> Vec<(u32, ProjectionResult)>
    where
        I: IntoIterator<Item = u32>,
    {
        let years: Vec<u32> = holding_years.into_iter().collect();
        info!("sweeping {} holding periods", years.len());

        years
            .par_iter()
            .map(|&years| {
                let result = self.run_with(|inputs| inputs.plan.holding_years = years);
                (years, result)
            })
            .collect()
    }

    /// Scenario every run starts from
    pub fn base(&self) -> &InputSet {
        &self.base
    }
}

/// Sweep point with the highest total profit (earliest on ties)
pub fn best_holding_period(sweep: &[(u32, ProjectionResult)]) -> Option<&(u32, ProjectionResult)> {
    sweep.iter().reduce(|best, candidate| {
        if candidate.1.summary.total_profit > best.1.summary.total_profit {
            candidate
        } else {
            best
        }
    })
}
