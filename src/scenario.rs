//! Named scenario store for comparing alternative plans
//!
//! Holds assumptions snapshots under scenario names so variants ("base",
//! "aggressive hiring", "high churn") can be projected side by side without
//! re-reading files.

use std::collections::BTreeMap;

use rayon::prelude::*;

use crate::assumptions::Assumptions;
use crate::error::ModelError;
use crate::projection::{ProjectionEngine, ProjectionResult};

/// Named collection of assumptions snapshots.
///
/// Each scenario is an independent snapshot; saving a scenario never
/// mutates another. Names are ordered, so iteration and batch output are
/// deterministic.
#[derive(Debug, Clone)]
pub struct ScenarioStore {
    scenarios: BTreeMap<String, Assumptions>,
}

impl ScenarioStore {
    pub fn new() -> Self {
        Self {
            scenarios: BTreeMap::new(),
        }
    }

    /// Store a scenario, replacing any existing one under the same name
    pub fn save(&mut self, name: impl Into<String>, assumptions: Assumptions) {
        self.scenarios.insert(name.into(), assumptions);
    }

    /// Remove a scenario, returning its assumptions if it existed
    pub fn remove(&mut self, name: &str) -> Option<Assumptions> {
        self.scenarios.remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&Assumptions> {
        self.scenarios.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.scenarios.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }

    /// Project a single stored scenario
    pub fn run(&self, name: &str) -> Result<ProjectionResult, ModelError> {
        let assumptions = self.scenarios.get(name).ok_or_else(|| {
            ModelError::invalid("scenario", format!("no scenario named '{}'", name))
        })?;
        let engine = ProjectionEngine::new(assumptions.clone())?;
        Ok(engine.run())
    }

    /// Project every stored scenario in parallel. Runs are independent, so
    /// one scenario's failure does not poison the rest.
    pub fn run_all(&self) -> BTreeMap<String, Result<ProjectionResult, ModelError>> {
        self.scenarios
            .par_iter()
            .map(|(name, assumptions)| {
                let result = ProjectionEngine::new(assumptions.clone()).map(|e| e.run());
                (name.clone(), result)
            })
            .collect()
    }
}

impl Default for ScenarioStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_and_run_named_scenario() {
        let mut store = ScenarioStore::new();
        store.save("base", Assumptions::default_plan());

        let result = store.run("base").unwrap();
        assert_eq!(result.periods.len(), 12);
    }

    #[test]
    fn test_unknown_scenario_is_an_error() {
        let store = ScenarioStore::new();
        assert!(store.run("missing").is_err());
    }

    #[test]
    fn test_save_replaces_existing() {
        let mut store = ScenarioStore::new();
        store.save("base", Assumptions::default_plan());

        let mut shorter = Assumptions::default_plan();
        shorter.horizon.periods = 4;
        store.save("base", shorter);

        assert_eq!(store.len(), 1);
        assert_eq!(store.run("base").unwrap().periods.len(), 4);
    }

    #[test]
    fn test_run_all_covers_every_scenario() {
        let mut store = ScenarioStore::new();
        store.save("base", Assumptions::default_plan());

        let mut high_churn = Assumptions::default_plan();
        for segment in high_churn.segments.values_mut() {
            segment.initial_churn = 0.10;
            segment.final_churn = 0.05;
        }
        store.save("high_churn", high_churn);

        let mut invalid = Assumptions::default_plan();
        invalid.horizon.periods = 0;
        store.save("broken", invalid);

        let results = store.run_all();
        assert_eq!(results.len(), 3);
        assert!(results["base"].is_ok());
        assert!(results["high_churn"].is_ok());
        assert!(results["broken"].is_err());

        // Heavier churn ends with fewer customers
        let base = results["base"].as_ref().unwrap().summary();
        let churned = results["high_churn"].as_ref().unwrap().summary();
        assert!(churned.final_customers < base.final_customers);
    }

    #[test]
    fn test_remove() {
        let mut store = ScenarioStore::new();
        store.save("base", Assumptions::default_plan());

        assert!(store.remove("base").is_some());
        assert!(store.is_empty());
        assert!(store.remove("base").is_none());
    }
}
