//! Annealing schedule and capacity policy.

use serde::{Deserialize, Serialize};
use u_metaheur::sa::{CoolingSchedule, SaConfig};

use crate::error::{PlanError, Result};

/// How the optimizer treats vehicle capacity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapacityPolicy {
    /// No capacity check. Relocations may move a site to another vehicle
    /// regardless of its load.
    #[default]
    Ignore,

    /// Skip any neighbor that raises a vehicle's load above its capacity
    /// (or above its current load, if it is already over capacity).
    Enforce,
}

/// Configuration of the simulated-annealing optimizer.
///
/// Temperature starts at `initial_temperature`; at each level
/// `iterations_per_temperature` neighbors are tried, then the temperature is
/// multiplied by `cooling_rate`. The run stops once the temperature is at or
/// below `min_temperature`.
///
/// # Examples
///
/// ```
/// use u_routeplan::annealing::{AnnealingConfig, CapacityPolicy};
///
/// let config = AnnealingConfig::default()
///     .with_initial_temperature(50.0)
///     .with_cooling_rate(0.9)
///     .with_iterations_per_temperature(20)
///     .with_capacity_policy(CapacityPolicy::Enforce);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnealingConfig {
    /// Starting temperature. Higher values accept more uphill moves.
    pub initial_temperature: f64,

    /// Geometric cooling factor in (0, 1).
    pub cooling_rate: f64,

    /// Neighbors tried at each temperature level.
    pub iterations_per_temperature: usize,

    /// The run stops once the temperature is at or below this value.
    pub min_temperature: f64,

    /// Capacity handling during perturbation.
    pub capacity_policy: CapacityPolicy,
}

impl Default for AnnealingConfig {
    fn default() -> Self {
        Self {
            initial_temperature: 100.0,
            cooling_rate: 0.995,
            iterations_per_temperature: 200,
            min_temperature: 0.1,
            capacity_policy: CapacityPolicy::Ignore,
        }
    }
}

impl AnnealingConfig {
    pub fn with_initial_temperature(mut self, t: f64) -> Self {
        self.initial_temperature = t;
        self
    }

    pub fn with_cooling_rate(mut self, rate: f64) -> Self {
        self.cooling_rate = rate;
        self
    }

    pub fn with_iterations_per_temperature(mut self, n: usize) -> Self {
        self.iterations_per_temperature = n;
        self
    }

    pub fn with_min_temperature(mut self, t: f64) -> Self {
        self.min_temperature = t;
        self
    }

    pub fn with_capacity_policy(mut self, policy: CapacityPolicy) -> Self {
        self.capacity_policy = policy;
        self
    }

    /// Validates the configuration.
    ///
    /// Both temperatures must be positive and finite, and the cooling rate
    /// must lie in (0, 1). A minimum temperature above the initial one is
    /// allowed and yields a run with no trials.
    pub fn validate(&self) -> Result<()> {
        if !(self.initial_temperature > 0.0 && self.initial_temperature.is_finite()) {
            return Err(PlanError::InvalidConfig(format!(
                "initial_temperature must be positive and finite, got {}",
                self.initial_temperature
            )));
        }
        if !(self.min_temperature > 0.0 && self.min_temperature.is_finite()) {
            return Err(PlanError::InvalidConfig(format!(
                "min_temperature must be positive and finite, got {}",
                self.min_temperature
            )));
        }
        if !(self.cooling_rate > 0.0 && self.cooling_rate < 1.0) {
            return Err(PlanError::InvalidConfig(format!(
                "cooling_rate must be in (0, 1), got {}",
                self.cooling_rate
            )));
        }
        Ok(())
    }

    /// Number of temperature levels the schedule visits.
    pub fn temperature_steps(&self) -> usize {
        let mut steps = 0;
        let mut t = self.initial_temperature;
        while t > self.min_temperature {
            t *= self.cooling_rate;
            steps += 1;
        }
        steps
    }

    /// The equivalent configuration for [`u_metaheur::sa::SaRunner`].
    pub fn to_sa_config(&self, seed: u64) -> SaConfig {
        SaConfig::default()
            .with_initial_temperature(self.initial_temperature)
            .with_min_temperature(self.min_temperature)
            .with_cooling(CoolingSchedule::Geometric {
                alpha: self.cooling_rate,
            })
            .with_iterations_per_temperature(self.iterations_per_temperature)
            .with_seed(seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AnnealingConfig::default();
        assert!((config.initial_temperature - 100.0).abs() < 1e-10);
        assert!((config.cooling_rate - 0.995).abs() < 1e-10);
        assert_eq!(config.iterations_per_temperature, 200);
        assert!((config.min_temperature - 0.1).abs() < 1e-10);
        assert_eq!(config.capacity_policy, CapacityPolicy::Ignore);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_bad_temperatures() {
        assert!(AnnealingConfig::default()
            .with_initial_temperature(0.0)
            .validate()
            .is_err());
        assert!(AnnealingConfig::default()
            .with_min_temperature(-1.0)
            .validate()
            .is_err());
        assert!(AnnealingConfig::default()
            .with_initial_temperature(f64::NAN)
            .validate()
            .is_err());
    }

    #[test]
    fn test_validate_infinite_temperatures() {
        assert!(matches!(
            AnnealingConfig::default()
                .with_initial_temperature(f64::INFINITY)
                .validate(),
            Err(PlanError::InvalidConfig(_))
        ));
        assert!(matches!(
            AnnealingConfig::default()
                .with_min_temperature(f64::INFINITY)
                .validate(),
            Err(PlanError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_validate_bad_cooling_rate() {
        for rate in [0.0, 1.0, 1.5, -0.3] {
            let config = AnnealingConfig::default().with_cooling_rate(rate);
            assert!(
                matches!(config.validate(), Err(PlanError::InvalidConfig(_))),
                "rate {rate} accepted"
            );
        }
    }

    #[test]
    fn test_temperature_steps() {
        let config = AnnealingConfig::default()
            .with_initial_temperature(10.0)
            .with_cooling_rate(0.5)
            .with_min_temperature(1.0);
        // 10, 5, 2.5, 1.25 are above 1.0
        assert_eq!(config.temperature_steps(), 4);

        let none = config.with_min_temperature(20.0);
        assert_eq!(none.temperature_steps(), 0);
    }

    #[test]
    fn test_to_sa_config() {
        let sa = AnnealingConfig::default().to_sa_config(7);
        assert!(sa.validate().is_ok());
        assert_eq!(sa.iterations_per_temperature, 200);
        assert_eq!(sa.seed, Some(7));
        assert!(matches!(
            sa.cooling,
            CoolingSchedule::Geometric { alpha } if (alpha - 0.995).abs() < 1e-12
        ));
    }

    #[test]
    fn test_serde_defaults() {
        let config: AnnealingConfig =
            serde_json::from_str(r#"{"cooling_rate": 0.9, "capacity_policy": "enforce"}"#).unwrap();
        assert!((config.cooling_rate - 0.9).abs() < 1e-12);
        assert_eq!(config.capacity_policy, CapacityPolicy::Enforce);
        assert_eq!(config.iterations_per_temperature, 200);
    }
}
