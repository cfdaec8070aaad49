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

//! Boundary-condition classification and variable mapping for PDE
//! discretization backends.
//!
//! This crate turns a declarative PDE problem (unknown functions over
//! coordinates, one optionally designated time, governing equations, raw
//! boundary/initial conditions, and per-coordinate domain intervals) into
//! the metadata a numerical discretization backend consumes:
//!
//! - a [`VariableMap`] describing every unknown, its coordinate signature,
//!   and the canonical dimension indexing;
//! - a [`BoundaryMap`] filing every raw condition under the function,
//!   coordinate, and derivative order it constrains, classified into a closed
//!   taxonomy (domain edge, interface, higher-order interface, with initial
//!   conditions as edges on the time coordinate);
//! - a [`PeriodicMap`] marking periodic pairings so backends can pick
//!   wrap-around index arithmetic once, globally.
//!
//! Classification is strict: every condition either lands in exactly one
//! bucket or the run aborts with a structured error. No partial metadata is
//! ever handed downstream.
//!
//! # Pipeline
//!
//! 1. Parse the problem DSL into a spanned AST ([`parse_problem_source`]).
//! 2. Lower into a raw [`PdeProblem`] ([`compile_problem`]), or build one
//!    programmatically with the [`term`] constructors.
//! 3. Analyze into [`ProblemMetadata`] ([`analyze_problem`], or
//!    [`analyze_problem_with`] for explicit tolerances and a pluggable
//!    [`BoundaryValidation`] strategy).
//!
//! # Example
//!
//! ```
//! use pde_metadata::discretization_metadata;
//!
//! let metadata = discretization_metadata(
//!     r#"
//!     problem heat {
//!         coord x in (0.0, 1.0);
//!         time t in (0.0, 2.0);
//!         param nu;
//!         unknown u(t, x);
//!         eq D(u(t, x), t) == nu * D(u(t, x), x, 2);
//!         bc u(t, 0.0) == 0.0;
//!         bc u(t, 1.0) == 0.0;
//!         bc u(0.0, x) == sin(x);
//!     }
//!     "#,
//! )
//! .unwrap();
//!
//! assert_eq!(metadata.variable_map().spatial_coordinates(), ["x"]);
//! assert_eq!(metadata.boundary_map().boundaries("u", "x").len(), 2);
//! ```

pub mod analysis;
pub mod ast;
pub mod compile;
pub mod diagnostics;
pub mod inspect;
pub mod model;
pub mod parser;
pub mod problem;
pub mod term;

pub use analysis::{AnalysisOptions, BoundaryValidation, EdgeCoverageValidation, NoValidation};
pub use diagnostics::CompileError;
pub use model::{
    AnalysisError, Boundary, BoundaryMap, InterfaceEnd, PeriodicMap, ProblemError,
    ProblemMetadata, UnclassifiableReason, VariableMap,
};
pub use problem::{ConditionItem, Domain, PdeProblem};
pub use term::{Equation, Term, TermOp};

use crate::ast::Program;

/// Parses DSL source into a spanned AST [`Program`].
pub fn parse_problem_source(source: &str) -> Result<Program, CompileError> {
    parser::parse_program(source)
}

/// Parses and lowers the sole problem in `source` into a raw [`PdeProblem`].
///
/// # Errors
///
/// Returns [`CompileError`] with source line/column and caret highlight when
/// parsing or lowering fails, or when the source holds zero or several
/// problem definitions.
pub fn compile_problem(source: &str) -> Result<PdeProblem, CompileError> {
    compile::compile_source(source)
}

/// Parses and lowers one named problem from `source`.
pub fn compile_named_problem(source: &str, name: &str) -> Result<PdeProblem, CompileError> {
    compile::compile_named_source(source, name)
}

/// Analyzes a raw problem with default tolerances and no boundary-map
/// validation.
pub fn analyze_problem(problem: &PdeProblem) -> Result<ProblemMetadata, AnalysisError> {
    analysis::analyze(problem)
}

/// Analyzes a raw problem with explicit tolerances and a pluggable
/// validation strategy.
pub fn analyze_problem_with(
    problem: &PdeProblem,
    options: &AnalysisOptions,
    validation: &dyn BoundaryValidation,
) -> Result<ProblemMetadata, AnalysisError> {
    analysis::analyze_with(problem, options, validation)
}

/// Convenience function that compiles and analyzes in one step.
pub fn discretization_metadata(source: &str) -> Result<ProblemMetadata, ProblemError> {
    let problem = compile_problem(source)?;
    Ok(analyze_problem(&problem)?)
}

#[cfg(test)]
mod tests;
