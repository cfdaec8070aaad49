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

//! Classification of raw conditions into the boundary taxonomy.
//!
//! The classifier pattern-matches over arbitrary symbolic equations without
//! assuming anything about their algebraic shape. Bucketing is exhaustive and
//! non-overlapping; anything ambiguous is surfaced as an error, never
//! defaulted or dropped.

use crate::analysis::AnalysisOptions;
use crate::inspect::{collect_equation_applications, derivative_order};
use crate::model::{AnalysisError, Boundary, InterfaceEnd, UnclassifiableReason, VariableMap};
use crate::term::{Equation, Term};
use log::trace;

/// One application evaluated at a fixed coordinate value.
struct PinnedApplication<'a> {
    /// The application node itself.
    term: &'a Term,
    /// Function tag.
    function: &'a str,
    /// Fixed coordinate (by signature position).
    coordinate: &'a str,
    /// Fixed numeric value.
    value: f64,
}

impl PinnedApplication<'_> {
    /// Returns the argument list with the fixed position removed.
    fn free_arguments(&self) -> Vec<&Term> {
        let Term::Apply { args, .. } = self.term else {
            unreachable!("pinned applications are always Apply nodes");
        };
        args.iter()
            .filter(|arg| arg.as_number().is_none())
            .collect()
    }
}

/// Classifies one raw condition equation.
pub(super) fn classify_condition(
    equation: &Equation,
    variable_map: &VariableMap,
    options: &AnalysisOptions,
) -> Result<Boundary, AnalysisError> {
    let applications = collect_equation_applications(equation, variable_map.unknowns());

    // Split references into pinned applications (at least one numeric
    // argument) and free ones; every referenced tag is tracked either way.
    let mut pinned: Vec<PinnedApplication<'_>> = Vec::new();
    let mut free_tags: Vec<&str> = Vec::new();
    for application in applications {
        let Term::Apply { func, args } = application else {
            continue;
        };

        let Some(signature) = variable_map.signature(func) else {
            // The tag never appears genuinely; its arity is unknowable.
            return Err(unclassifiable(
                equation,
                UnclassifiableReason::ArityMismatch {
                    function: func.clone(),
                },
            ));
        };
        if args.len() != signature.len() {
            return Err(unclassifiable(
                equation,
                UnclassifiableReason::ArityMismatch {
                    function: func.clone(),
                },
            ));
        }

        let fixes: Vec<(&str, f64)> = signature
            .iter()
            .zip(args.iter())
            .filter_map(|(coord, arg)| arg.as_number().map(|value| (coord.as_str(), value)))
            .collect();

        match fixes.len() {
            0 => {
                if !free_tags.contains(&func.as_str()) {
                    free_tags.push(func.as_str());
                }
            }
            1 => pinned.push(PinnedApplication {
                term: application,
                function: func,
                coordinate: fixes[0].0,
                value: fixes[0].1,
            }),
            // A corner condition pins several coordinates at once.
            _ => {
                return Err(unclassifiable(
                    equation,
                    UnclassifiableReason::MultipleFixedCoordinates {
                        function: func.clone(),
                    },
                ));
            }
        }
    }

    // A free reference to some *other* unknown alongside pinned ones means
    // the condition is not anchored to a boundary point of that function.
    if !pinned.is_empty() {
        if let Some(stray) = free_tags
            .iter()
            .find(|&&tag| !pinned.iter().any(|pin| pin.function == tag))
        {
            return Err(unclassifiable(
                equation,
                UnclassifiableReason::UnpinnedFunctionReference {
                    function: stray.to_string(),
                },
            ));
        }
    }

    match pinned.len() {
        0 => Err(unclassifiable(
            equation,
            UnclassifiableReason::NoFixedCoordinate,
        )),
        1 => classify_edge(equation, &pinned[0], variable_map, options),
        2 => classify_interface(equation, &pinned[0], &pinned[1], variable_map, options),
        count => Err(unclassifiable(
            equation,
            UnclassifiableReason::TooManyApplications { count },
        )),
    }
}

/// Classifies a single-pin condition: domain edge or initial condition.
fn classify_edge(
    equation: &Equation,
    pin: &PinnedApplication<'_>,
    variable_map: &VariableMap,
    options: &AnalysisOptions,
) -> Result<Boundary, AnalysisError> {
    let upper = match_bound(equation, pin, variable_map, options)?;

    // A condition fixing time anchors the evolution start; fixing the far end
    // of the time interval is outside the taxonomy.
    if Some(pin.coordinate) == variable_map.time_coordinate() && upper {
        return Err(unclassifiable(
            equation,
            UnclassifiableReason::TerminalTimeCondition {
                coordinate: pin.coordinate.to_string(),
            },
        ));
    }

    // Only derivatives along the fixed coordinate matter for the order;
    // tangential derivatives leave the field untouched. When both sides pin
    // the same point the higher of the two orders wins.
    let order = derivative_order(&equation.lhs, pin.coordinate)
        .max(derivative_order(&equation.rhs, pin.coordinate));

    trace!(
        "edge condition for ({}, {}): upper={upper} order={order}",
        pin.function, pin.coordinate
    );

    Ok(Boundary::Edge {
        function: pin.function.to_string(),
        coordinate: pin.coordinate.to_string(),
        upper,
        order,
        equation: equation.clone(),
    })
}

/// Classifies a two-pin condition: interface or higher-order interface.
fn classify_interface(
    equation: &Equation,
    first: &PinnedApplication<'_>,
    second: &PinnedApplication<'_>,
    variable_map: &VariableMap,
    options: &AnalysisOptions,
) -> Result<Boundary, AnalysisError> {
    // Both ends must agree on everything except the pinned position.
    if first.free_arguments() != second.free_arguments() {
        return Err(unclassifiable(equation, UnclassifiableReason::MismatchedEnds));
    }

    let first_upper = match_bound(equation, first, variable_map, options)?;
    let second_upper = match_bound(equation, second, variable_map, options)?;

    let ends = [
        InterfaceEnd {
            function: first.function.to_string(),
            coordinate: first.coordinate.to_string(),
            upper: first_upper,
        },
        InterfaceEnd {
            function: second.function.to_string(),
            coordinate: second.coordinate.to_string(),
            upper: second_upper,
        },
    ];

    // Derivative order with respect to either fixed coordinate decides the
    // variant: zero-order couplings discretize as value matches, anything
    // else needs the derivative stencil.
    let order = [first.coordinate, second.coordinate]
        .into_iter()
        .flat_map(|coord| {
            equation
                .sides()
                .into_iter()
                .map(move |side| derivative_order(side, coord))
        })
        .max()
        .unwrap_or(0);

    trace!(
        "interface condition between ({}, {}) and ({}, {}): order={order}",
        ends[0].function, ends[0].coordinate, ends[1].function, ends[1].coordinate
    );

    if order == 0 {
        Ok(Boundary::Interface {
            ends,
            equation: equation.clone(),
        })
    } else {
        let functions = [&ends[0].function, &ends[1].function]
            .into_iter()
            .cloned()
            .collect();
        let coordinates = [&ends[0].coordinate, &ends[1].coordinate]
            .into_iter()
            .cloned()
            .collect();
        Ok(Boundary::HigherOrderInterface {
            ends,
            functions,
            coordinates,
            order,
            equation: equation.clone(),
        })
    }
}

/// Matches a pinned value against the domain bounds of its coordinate.
///
/// Returns whether the upper bound was hit. A value within tolerance of
/// neither bound is a hard failure; domain-width validation keeps the two
/// bounds more than two tolerances apart, so both cannot match at once.
fn match_bound(
    equation: &Equation,
    pin: &PinnedApplication<'_>,
    variable_map: &VariableMap,
    options: &AnalysisOptions,
) -> Result<bool, AnalysisError> {
    let Some(domain) = variable_map.domain(pin.coordinate) else {
        // Coordinates reached here were resolved during map construction.
        return Err(AnalysisError::DomainResolution {
            coordinate: pin.coordinate.to_string(),
            detail: "coordinate is missing from the resolved domain table".to_string(),
        });
    };

    let tolerance = options.bound_tolerance;
    if (pin.value - domain.lower).abs() <= tolerance {
        Ok(false)
    } else if (pin.value - domain.upper).abs() <= tolerance {
        Ok(true)
    } else {
        Err(unclassifiable(
            equation,
            UnclassifiableReason::InteriorValue {
                coordinate: pin.coordinate.to_string(),
                value: pin.value,
            },
        ))
    }
}

fn unclassifiable(equation: &Equation, reason: UnclassifiableReason) -> AnalysisError {
    AnalysisError::UnclassifiableBoundary {
        equation: equation.clone(),
        reason,
    }
}
