/*
MIT License

Copyright (c) 2026 Raja Lehtihet and Wael El Oraiby

Permission is hereby granted, free of charge, to any person obtaining a copy
of this software and associated documentation files (the "Software"), to deal
in the Software without restriction, including without limitation the rights
to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
copies of the Software, and to permit persons to whom the Software is
furnished to do so, subject to the following conditions:

The above copyright notice and this permission notice shall be included in all
copies or substantial portions of the Software.

THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
SOFTWARE.
*/

//! Semantic analysis pipeline: variable mapping, condition classification,
//! boundary-map assembly, and periodicity derivation.
//!
//! The pipeline is a synchronous, referentially transparent transformation
//! over an immutable [`PdeProblem`]: the same frozen input always yields
//! structurally equal metadata. Conditions are classified independently of
//! one another; the sequential walk here exists to preserve the observable
//! input order in the assembled per-pair lists.

mod assemble;
mod classify;
mod periodic;
mod variables;

use crate::inspect::equation_derivative_orders;
use crate::model::{AnalysisError, ProblemMetadata};
use crate::problem::PdeProblem;
use indexmap::IndexMap;
use log::debug;

pub use assemble::{BoundaryValidation, EdgeCoverageValidation, NoValidation};

/// Numeric tolerances for the analysis stage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalysisOptions {
    /// Tolerance when matching a fixed value against a domain bound.
    pub bound_tolerance: f64,
    /// Minimum acceptable domain width; narrower intervals are rejected.
    pub min_domain_width: f64,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            bound_tolerance: 1e-9,
            min_domain_width: 1e-6,
        }
    }
}

impl AnalysisOptions {
    /// Returns the domain-width floor actually enforced.
    ///
    /// Bounds must sit more than two tolerances apart, otherwise a fixed
    /// value could match both bounds at once and edge classification would
    /// have to guess.
    pub(crate) fn effective_min_width(&self) -> f64 {
        self.min_domain_width.max(2.0 * self.bound_tolerance)
    }
}

/// Runs the full analysis pipeline with default options and no boundary-map
/// validation.
pub fn analyze(problem: &PdeProblem) -> Result<ProblemMetadata, AnalysisError> {
    analyze_with(problem, &AnalysisOptions::default(), &NoValidation)
}

/// Runs the full analysis pipeline with explicit options and a pluggable
/// boundary-map validation strategy.
///
/// Either every raw condition classifies and validation accepts, or the run
/// aborts with the first error; no partial metadata is ever returned.
pub fn analyze_with(
    problem: &PdeProblem,
    options: &AnalysisOptions,
    validation: &dyn BoundaryValidation,
) -> Result<ProblemMetadata, AnalysisError> {
    let variable_map = variables::build_variable_map(problem, options)?;
    let max_derivative_orders = max_derivative_orders(problem, &variable_map);

    let conditions = problem.flattened_conditions();
    let mut classified = Vec::with_capacity(conditions.len());
    for equation in conditions {
        classified.push(classify::classify_condition(
            equation,
            &variable_map,
            options,
        )?);
    }
    debug!(
        "classified {} boundary/initial conditions for problem '{}'",
        classified.len(),
        problem.name
    );

    let boundary_map = assemble::assemble(classified);
    validation.validate(&boundary_map, &variable_map, &max_derivative_orders)?;

    let periodic_map = periodic::derive_periodic_map(&boundary_map, &variable_map);
    debug!(
        "problem '{}' periodicity: {}",
        problem.name,
        if periodic_map.any_periodic() {
            "at least one periodic pair"
        } else {
            "none"
        }
    );

    Ok(ProblemMetadata {
        variable_map,
        boundary_map,
        periodic_map,
        max_derivative_orders,
    })
}

/// Computes the maximum derivative order per coordinate across the governing
/// equations.
fn max_derivative_orders(
    problem: &PdeProblem,
    variable_map: &crate::model::VariableMap,
) -> IndexMap<String, u32> {
    let mut table = IndexMap::new();
    for coord in variable_map.all_coordinates() {
        let max_order = problem
            .equations
            .iter()
            .flat_map(|equation| equation_derivative_orders(equation, coord))
            .max()
            .unwrap_or(0);
        table.insert(coord.to_string(), max_order);
    }
    table
}
