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

//! Variable-map construction from the raw problem description.

use crate::analysis::AnalysisOptions;
use crate::inspect::{collect_equation_applications, is_genuine_application};
use crate::model::{AnalysisError, VariableMap};
use crate::problem::{Domain, PdeProblem};
use crate::term::Term;
use indexmap::{IndexMap, IndexSet};
use log::debug;

/// Builds the variable map by discovering applications across every equation.
///
/// Discovery walks the governing equations first, then the flattened
/// condition sequence, so first-discovery order (the canonical dimension
/// order) is fully determined by the input.
pub(super) fn build_variable_map(
    problem: &PdeProblem,
    options: &AnalysisOptions,
) -> Result<VariableMap, AnalysisError> {
    let mut unknowns: Vec<String> = Vec::new();
    let mut signatures: IndexMap<String, Vec<String>> = IndexMap::new();
    let mut coords_in_use: IndexSet<String> = IndexSet::new();

    let conditions = problem.flattened_conditions();
    let equations = problem.equations.iter().chain(conditions.into_iter());

    for equation in equations {
        for application in collect_equation_applications(equation, &problem.unknowns) {
            let Term::Apply { func, args } = application else {
                continue;
            };

            // Coordinate arguments of every application, genuine or
            // boundary-evaluated, contribute to the in-use set.
            for arg in args {
                if let Some(coord) = arg.as_coordinate() {
                    coords_in_use.insert(coord.to_string());
                }
            }

            if !is_genuine_application(application) {
                continue;
            }

            let signature: Vec<String> = args
                .iter()
                .map(|arg| {
                    arg.as_coordinate()
                        .expect("genuine applications carry only coordinate arguments")
                        .to_string()
                })
                .collect();

            match signatures.get(func) {
                None => {
                    unknowns.push(func.clone());
                    signatures.insert(func.clone(), signature);
                }
                Some(existing) if *existing != signature => {
                    // Two incompatible orderings are an authoring ambiguity;
                    // never resolved by preferring the first discovery.
                    return Err(AnalysisError::SignatureInconsistency {
                        function: func.clone(),
                        first: existing.clone(),
                        second: signature,
                    });
                }
                Some(_) => {}
            }
        }
    }

    // The spatial set is the in-use set minus time, in discovery order.
    let time = problem.time.clone();
    let spatial: Vec<String> = coords_in_use
        .iter()
        .filter(|coord| Some(coord.as_str()) != time.as_deref())
        .cloned()
        .collect();

    let mut domains = IndexMap::new();
    if let Some(time) = &time {
        domains.insert(time.clone(), resolve_domain(problem, time, options)?);
    }
    for coord in &spatial {
        domains.insert(coord.clone(), resolve_domain(problem, coord, options)?);
    }

    debug!(
        "variable map for '{}': {} unknowns over {} spatial dimensions{}",
        problem.name,
        unknowns.len(),
        spatial.len(),
        if time.is_some() { " plus time" } else { "" }
    );

    Ok(VariableMap::from_parts(
        unknowns,
        spatial,
        time,
        problem.parameters.clone(),
        domains,
        signatures,
    ))
}

/// Resolves a declared, finite, wide-enough domain for one coordinate in use.
fn resolve_domain(
    problem: &PdeProblem,
    coord: &str,
    options: &AnalysisOptions,
) -> Result<Domain, AnalysisError> {
    let Some(domain) = problem.domains.get(coord).copied() else {
        return Err(AnalysisError::DomainResolution {
            coordinate: coord.to_string(),
            detail: "no domain interval is declared".to_string(),
        });
    };

    if !domain.is_finite() {
        return Err(AnalysisError::DomainResolution {
            coordinate: coord.to_string(),
            detail: format!("bounds {domain} must both be finite"),
        });
    }

    let min_width = options.effective_min_width();
    if domain.width() <= min_width {
        return Err(AnalysisError::DomainResolution {
            coordinate: coord.to_string(),
            detail: format!(
                "interval {domain} is narrower than the minimum width {min_width:e}"
            ),
        });
    }

    Ok(domain)
}
