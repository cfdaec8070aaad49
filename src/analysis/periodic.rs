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

//! Periodicity derivation from the assembled boundary map.

use crate::model::{BoundaryMap, PeriodicMap, VariableMap};
use indexmap::IndexMap;

/// Derives the per-(function, coordinate) periodicity table.
///
/// A pair is periodic when any of its interface conditions pins the same
/// function to opposite bounds of the same coordinate; the free-coordinate
/// signatures of such a pairing were already checked during classification.
/// The table covers every coordinate of every unknown's signature so that
/// backends can look up any pair without missing-key handling, and the global
/// flag lets them choose wrap-around index arithmetic once instead of
/// branching per access.
pub(super) fn derive_periodic_map(
    map: &BoundaryMap,
    variable_map: &VariableMap,
) -> PeriodicMap {
    let mut entries: IndexMap<String, IndexMap<String, bool>> = IndexMap::new();
    for function in variable_map.unknowns() {
        let Some(signature) = variable_map.signature(function) else {
            continue;
        };
        let row: IndexMap<String, bool> = signature
            .iter()
            .map(|coordinate| {
                let periodic = map
                    .boundaries(function, coordinate)
                    .iter()
                    .any(|boundary| boundary.is_periodic_pairing());
                (coordinate.clone(), periodic)
            })
            .collect();
        entries.insert(function.clone(), row);
    }
    PeriodicMap::from_entries(entries)
}
