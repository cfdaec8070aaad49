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

//! Metadata model consumed by discretization backends.
//!
//! Everything here is read-only for downstream stages: private fields,
//! accessor methods, and one explicit append operation
//! ([`VariableMap::register_unknown`]) for pipeline stages that introduce
//! auxiliary unknowns. All structures are transient, in-process, and scoped to
//! a single discretization run.

mod boundary;
mod errors;
mod varmap;

use indexmap::IndexMap;

pub use boundary::{Boundary, BoundaryMap, InterfaceEnd, PeriodicMap};
pub use errors::{AnalysisError, ProblemError, UnclassifiableReason};
pub use varmap::VariableMap;

/// The full analysis output for one discretization run.
///
/// Bundles the variable map, the assembled boundary map, the derived
/// periodicity table, and the per-coordinate maximum derivative orders
/// observed in the governing equations.
#[derive(Debug, Clone, PartialEq)]
pub struct ProblemMetadata {
    pub(crate) variable_map: VariableMap,
    pub(crate) boundary_map: BoundaryMap,
    pub(crate) periodic_map: PeriodicMap,
    pub(crate) max_derivative_orders: IndexMap<String, u32>,
}

impl ProblemMetadata {
    /// Returns the variable map.
    pub fn variable_map(&self) -> &VariableMap {
        &self.variable_map
    }

    /// Returns mutable access to the variable map.
    ///
    /// Needed only by stages that introduce auxiliary unknowns via
    /// [`VariableMap::register_unknown`]; the exclusive borrow is the
    /// serialization barrier against concurrent reads.
    pub fn variable_map_mut(&mut self) -> &mut VariableMap {
        &mut self.variable_map
    }

    /// Returns the assembled boundary map.
    pub fn boundary_map(&self) -> &BoundaryMap {
        &self.boundary_map
    }

    /// Returns the derived periodicity table.
    pub fn periodic_map(&self) -> &PeriodicMap {
        &self.periodic_map
    }

    /// Returns the maximum derivative order observed for `coord` across the
    /// governing equations.
    pub fn max_derivative_order(&self, coord: &str) -> u32 {
        self.max_derivative_orders.get(coord).copied().unwrap_or(0)
    }
}
