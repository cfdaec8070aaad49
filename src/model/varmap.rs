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

//! Canonical variable metadata for one discretization run.

use crate::model::errors::AnalysisError;
use crate::problem::Domain;
use indexmap::IndexMap;

/// Canonical metadata describing unknowns, coordinates, domains, and index
/// assignments.
///
/// Spatial coordinates keep their first-discovery order; that order is the
/// canonical dimension order, and the coordinate↔index table is a bijection
/// onto `1..=n` over it. The map is read-only after construction except for
/// [`VariableMap::register_unknown`].
#[derive(Debug, Clone, PartialEq)]
pub struct VariableMap {
    // Unknown function tags with at least one genuine application.
    unknowns: Vec<String>,
    // Spatial coordinates in first-discovery order.
    spatial: Vec<String>,
    time: Option<String>,
    parameters: Vec<String>,
    // Domain table over every coordinate in use, time included.
    domains: IndexMap<String, Domain>,
    // Function tag -> ordered coordinate signature from genuine applications.
    signatures: IndexMap<String, Vec<String>>,
    // Spatial coordinate -> 1-based dimension index.
    indices: IndexMap<String, usize>,
}

impl VariableMap {
    pub(crate) fn from_parts(
        unknowns: Vec<String>,
        spatial: Vec<String>,
        time: Option<String>,
        parameters: Vec<String>,
        domains: IndexMap<String, Domain>,
        signatures: IndexMap<String, Vec<String>>,
    ) -> Self {
        let indices = spatial
            .iter()
            .enumerate()
            .map(|(idx, name)| (name.clone(), idx + 1))
            .collect();
        Self {
            unknowns,
            spatial,
            time,
            parameters,
            domains,
            signatures,
            indices,
        }
    }

    /// Returns the unknown function tags in discovery order.
    pub fn unknowns(&self) -> &[String] {
        &self.unknowns
    }

    /// Returns the spatial coordinates in canonical dimension order.
    pub fn spatial_coordinates(&self) -> &[String] {
        &self.spatial
    }

    /// Returns the time coordinate when one is declared and in use.
    pub fn time_coordinate(&self) -> Option<&str> {
        self.time.as_deref()
    }

    /// Returns every coordinate in use: time first when present, then the
    /// spatial coordinates in dimension order.
    pub fn all_coordinates(&self) -> Vec<&str> {
        let mut all = Vec::with_capacity(self.spatial.len() + 1);
        if let Some(time) = self.time.as_deref() {
            all.push(time);
        }
        all.extend(self.spatial.iter().map(String::as_str));
        all
    }

    /// Returns the declared parameter names.
    pub fn parameters(&self) -> &[String] {
        &self.parameters
    }

    /// Returns the domain interval for `coord`.
    pub fn domain(&self, coord: &str) -> Option<Domain> {
        self.domains.get(coord).copied()
    }

    /// Returns the recorded coordinate signature of `func`.
    pub fn signature(&self, func: &str) -> Option<&[String]> {
        self.signatures.get(func).map(Vec::as_slice)
    }

    /// Returns the signature of `func` with the time coordinate removed.
    pub fn spatial_signature(&self, func: &str) -> Option<Vec<&str>> {
        let signature = self.signatures.get(func)?;
        let time = self.time.as_deref();
        Some(
            signature
                .iter()
                .map(String::as_str)
                .filter(|coord| Some(*coord) != time)
                .collect(),
        )
    }

    /// Returns the 1-based dimension index of a spatial coordinate.
    pub fn coordinate_index(&self, coord: &str) -> Option<usize> {
        self.indices.get(coord).copied()
    }

    /// Returns the spatial coordinate at a 1-based dimension index.
    pub fn index_coordinate(&self, index: usize) -> Option<&str> {
        index
            .checked_sub(1)
            .and_then(|idx| self.spatial.get(idx))
            .map(String::as_str)
    }

    /// Returns the number of spatial dimensions.
    pub fn dimension_count(&self) -> usize {
        self.spatial.len()
    }

    /// Registers a newly introduced auxiliary unknown.
    ///
    /// This is the only mutation the map supports: an append that never
    /// removes or renumbers existing entries. Every coordinate in the
    /// signature must already be known to the map. Re-registering a tag with
    /// its recorded signature is a no-op; a conflicting signature is an
    /// error, consistent with discovery.
    ///
    /// Callers must not interleave this with reads; the `&mut self` receiver
    /// makes that requirement structural.
    pub fn register_unknown(
        &mut self,
        func: impl Into<String>,
        signature: Vec<String>,
    ) -> Result<(), AnalysisError> {
        let func = func.into();
        for coord in &signature {
            if !self.domains.contains_key(coord) {
                return Err(AnalysisError::DomainResolution {
                    coordinate: coord.clone(),
                    detail: format!(
                        "coordinate is referenced by auxiliary unknown '{func}' but has no resolved domain"
                    ),
                });
            }
        }

        if let Some(existing) = self.signatures.get(&func) {
            if *existing == signature {
                return Ok(());
            }
            return Err(AnalysisError::SignatureInconsistency {
                function: func,
                first: existing.clone(),
                second: signature,
            });
        }

        self.unknowns.push(func.clone());
        self.signatures.insert(func, signature);
        Ok(())
    }
}
