//! Module providing the Solution struct, the flux distribution produced by solving a model
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Flux distribution of a solved metabolic model
///
/// Solving happens elsewhere, this only carries the result: a flux value (mmol/gDW/hr) for
/// each reaction id, the solver status, and the objective value.
#[derive(Clone, Debug, PartialEq)]
pub struct Solution {
    /// Status reported by the solver which produced the fluxes
    pub status: OptimizationStatus,
    /// Optimized value of the objective, if known
    pub objective_value: Option<f64>,
    /// Map of reaction ids to flux values
    pub fluxes: IndexMap<String, f64>,
}

impl Solution {
    /// Create a solution from a map of reaction ids to fluxes, with an optimal status
    ///
    /// # Examples
    /// ```rust
    /// use indexmap::IndexMap;
    /// use gslflux_core::solution::Solution;
    /// let mut fluxes = IndexMap::new();
    /// fluxes.insert("MAR00901".to_string(), 5.0);
    /// let solution = Solution::from_fluxes(fluxes);
    /// assert_eq!(solution.flux("MAR00901"), Some(5.0));
    /// assert_eq!(solution.flux("MAR00902"), None);
    /// ```
    pub fn from_fluxes(fluxes: IndexMap<String, f64>) -> Self {
        Solution {
            status: OptimizationStatus::Optimal,
            objective_value: None,
            fluxes,
        }
    }

    /// Flux through a reaction, None if the solution has no value for it
    pub fn flux(&self, reaction_id: &str) -> Option<f64> {
        self.fluxes.get(reaction_id).copied()
    }

    /// Flux through a reaction, treating a missing value as zero flux
    pub fn flux_or_zero(&self, reaction_id: &str) -> f64 {
        self.flux(reaction_id).unwrap_or(0f64)
    }
}

impl FromIterator<(String, f64)> for Solution {
    fn from_iter<T: IntoIterator<Item = (String, f64)>>(iter: T) -> Self {
        Solution::from_fluxes(iter.into_iter().collect())
    }
}

/// Status of an optimization problem
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OptimizationStatus {
    /// Problem has been optimized
    #[default]
    Optimal,
    /// Problem can't be optimized because objective value is not bounded
    Unbounded,
    /// Problem can't be solved because it is infeasible (conflicting constraints)
    Infeasible,
    /// An approximate solution has been found
    AlmostOptimal,
    /// A numerical error occurred during solving
    NumericalError,
    /// The solver hit the maximum allowed iterations, or max time, or made insufficient progress
    SolverHalted,
    /// Any status not listed above
    #[serde(other)]
    Unknown,
}

/// Errors raised while reading a solution
#[derive(Error, Debug)]
pub enum SolutionError {
    #[error("Unable to read solution file")]
    UnableToRead(#[from] std::io::Error),
    #[error("Unable to parse solution json")]
    UnableToParseJson(#[from] serde_json::Error),
    #[error("Unable to parse solution csv")]
    UnableToParseCsv(#[from] csv::Error),
    #[error("Invalid flux value `{value}` for reaction {reaction_id}")]
    InvalidFlux { reaction_id: String, value: String },
}
