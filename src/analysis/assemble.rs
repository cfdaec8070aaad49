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

//! Boundary-map assembly and pluggable validation strategies.

use crate::model::{AnalysisError, Boundary, BoundaryMap, VariableMap};
use indexmap::IndexMap;

/// Groups the classified condition list into the two-level boundary map.
///
/// Walking the list in input order keeps each per-(function, coordinate) list
/// in that same order, which downstream indexing relies on.
pub(super) fn assemble(classified: Vec<Boundary>) -> BoundaryMap {
    let mut map = BoundaryMap::new();
    for boundary in classified {
        for (function, coordinate) in boundary.filed_keys() {
            map.push(function, coordinate, boundary.clone());
        }
    }
    map
}

/// Pluggable acceptance check over the assembled boundary map.
///
/// Backends inject the strategy they need instead of overriding hook methods;
/// the two provided strategies cover the common cases and anything else can
/// be supplied by the caller.
pub trait BoundaryValidation {
    /// Accepts or rejects an assembled boundary map.
    ///
    /// `max_derivative_orders` holds the per-coordinate maximum derivative
    /// order observed in the governing equations.
    fn validate(
        &self,
        map: &BoundaryMap,
        variable_map: &VariableMap,
        max_derivative_orders: &IndexMap<String, u32>,
    ) -> Result<(), AnalysisError>;
}

/// Accepts every boundary map.
///
/// The explicit default strategy: backends that run their own completeness
/// checks downstream use this one.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoValidation;

impl BoundaryValidation for NoValidation {
    fn validate(
        &self,
        _map: &BoundaryMap,
        _variable_map: &VariableMap,
        _max_derivative_orders: &IndexMap<String, u32>,
    ) -> Result<(), AnalysisError> {
        Ok(())
    }
}

/// Requires both domain edges of every spatially differentiated pair to be
/// constrained.
///
/// A (function, coordinate) pair passes when its condition list carries a
/// lower and an upper edge condition, or when any interface condition covers
/// the pair (periodic pairings included). Coordinates without spatial
/// derivatives in the governing equations need no conditions and are
/// skipped.
#[derive(Debug, Clone, Copy, Default)]
pub struct EdgeCoverageValidation;

impl BoundaryValidation for EdgeCoverageValidation {
    fn validate(
        &self,
        map: &BoundaryMap,
        variable_map: &VariableMap,
        max_derivative_orders: &IndexMap<String, u32>,
    ) -> Result<(), AnalysisError> {
        for function in variable_map.unknowns() {
            let Some(signature) = variable_map.spatial_signature(function) else {
                continue;
            };
            for coordinate in signature {
                let max_order = max_derivative_orders
                    .get(coordinate)
                    .copied()
                    .unwrap_or(0);
                if max_order == 0 {
                    continue;
                }

                let conditions = map.boundaries(function, coordinate);
                let covered_by_interface = conditions.iter().any(|boundary| {
                    matches!(
                        boundary,
                        Boundary::Interface { .. } | Boundary::HigherOrderInterface { .. }
                    )
                });
                if covered_by_interface {
                    continue;
                }

                let has_lower = conditions
                    .iter()
                    .any(|b| matches!(b, Boundary::Edge { upper: false, .. }));
                let has_upper = conditions
                    .iter()
                    .any(|b| matches!(b, Boundary::Edge { upper: true, .. }));
                if has_lower && has_upper {
                    continue;
                }

                let missing = match (has_lower, has_upper) {
                    (false, false) => "lower and upper edge conditions",
                    (false, true) => "a lower edge condition",
                    (true, false) => "an upper edge condition",
                    (true, true) => unreachable!("covered pairs continue above"),
                };
                return Err(AnalysisError::Validation {
                    message: format!(
                        "Unknown '{function}' is missing {missing} for coordinate '{coordinate}'"
                    ),
                });
            }
        }
        Ok(())
    }
}
