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

//! Error types surfaced by the analysis pipeline.
//!
//! Every variant is fatal to the current run and carries enough structured
//! context (equation text, coordinate/function identifiers) to locate the
//! faulty input. Nothing is swallowed: analysis either fully succeeds for all
//! inputs or aborts before any discretization proceeds.

use crate::diagnostics::CompileError;
use crate::term::Equation;
use std::fmt;

/// Why a raw condition matched none of the classification rules.
#[derive(Debug, Clone, PartialEq)]
pub enum UnclassifiableReason {
    /// No referenced application fixes any coordinate.
    NoFixedCoordinate,
    /// A fixed value matches neither declared bound of its coordinate.
    InteriorValue {
        /// Fixed coordinate name.
        coordinate: String,
        /// Offending numeric value.
        value: f64,
    },
    /// One application fixes more than one coordinate at once.
    MultipleFixedCoordinates {
        /// Offending function tag.
        function: String,
    },
    /// More than two distinct pinned applications are referenced.
    TooManyApplications {
        /// Number of distinct pinned applications found.
        count: usize,
    },
    /// The time coordinate is fixed at its upper bound.
    TerminalTimeCondition {
        /// Time coordinate name.
        coordinate: String,
    },
    /// Two pinned applications whose free-coordinate signatures differ.
    MismatchedEnds,
    /// An application's argument count disagrees with the recorded signature.
    ArityMismatch {
        /// Offending function tag.
        function: String,
    },
    /// A second unknown is referenced without being pinned to any bound.
    UnpinnedFunctionReference {
        /// Offending function tag.
        function: String,
    },
}

impl fmt::Display for UnclassifiableReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnclassifiableReason::NoFixedCoordinate => {
                write!(f, "no coordinate is fixed to a numeric value")
            }
            UnclassifiableReason::InteriorValue { coordinate, value } => write!(
                f,
                "value {value} for coordinate '{coordinate}' matches neither domain bound"
            ),
            UnclassifiableReason::MultipleFixedCoordinates { function } => write!(
                f,
                "application of '{function}' fixes more than one coordinate"
            ),
            UnclassifiableReason::TooManyApplications { count } => write!(
                f,
                "{count} distinct pinned applications are referenced, at most 2 are supported"
            ),
            UnclassifiableReason::TerminalTimeCondition { coordinate } => write!(
                f,
                "time coordinate '{coordinate}' is fixed at its upper bound"
            ),
            UnclassifiableReason::MismatchedEnds => {
                write!(f, "the two pinned applications differ in their free coordinates")
            }
            UnclassifiableReason::ArityMismatch { function } => write!(
                f,
                "application of '{function}' disagrees with its recorded signature"
            ),
            UnclassifiableReason::UnpinnedFunctionReference { function } => write!(
                f,
                "'{function}' is referenced but not evaluated at a domain bound"
            ),
        }
    }
}

/// Errors produced by the analysis pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// A coordinate in use has no usable domain interval.
    DomainResolution {
        /// Offending coordinate name.
        coordinate: String,
        /// What is wrong with the declaration.
        detail: String,
    },
    /// A function tag was observed with incompatible coordinate signatures.
    SignatureInconsistency {
        /// Offending function tag.
        function: String,
        /// First observed signature.
        first: Vec<String>,
        /// Conflicting signature.
        second: Vec<String>,
    },
    /// A raw condition matched none of the classification rules.
    UnclassifiableBoundary {
        /// The offending condition equation.
        equation: Equation,
        /// Human-readable cause.
        reason: UnclassifiableReason,
    },
    /// The pluggable boundary-map validation rejected the assembled map.
    Validation {
        /// Strategy-defined message.
        message: String,
    },
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisError::DomainResolution { coordinate, detail } => {
                write!(f, "Cannot resolve domain for coordinate '{coordinate}': {detail}")
            }
            AnalysisError::SignatureInconsistency {
                function,
                first,
                second,
            } => write!(
                f,
                "Unknown function '{function}' is used with incompatible signatures ({}) and ({})",
                first.join(", "),
                second.join(", ")
            ),
            AnalysisError::UnclassifiableBoundary { equation, reason } => {
                write!(f, "Cannot classify boundary condition '{equation}': {reason}")
            }
            AnalysisError::Validation { message } => write!(f, "{message}"),
        }
    }
}

impl std::error::Error for AnalysisError {}

/// Errors produced by the full compile-and-analyze surface.
#[derive(Debug, Clone, PartialEq)]
pub enum ProblemError {
    /// DSL parsing or lowering failed with source diagnostics.
    Compile(CompileError),
    /// Semantic analysis failed.
    Analysis(AnalysisError),
}

impl fmt::Display for ProblemError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProblemError::Compile(err) => write!(f, "{err}"),
            ProblemError::Analysis(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for ProblemError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProblemError::Compile(err) => Some(err),
            ProblemError::Analysis(err) => Some(err),
        }
    }
}

impl From<CompileError> for ProblemError {
    fn from(value: CompileError) -> Self {
        ProblemError::Compile(value)
    }
}

impl From<AnalysisError> for ProblemError {
    fn from(value: AnalysisError) -> Self {
        ProblemError::Analysis(value)
    }
}
