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

//! Classified boundary conditions and their grouped lookup tables.

use crate::term::Equation;
use indexmap::IndexMap;
use std::collections::BTreeSet;

/// One side of an interface condition: which function is pinned to which
/// bound of which coordinate.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InterfaceEnd {
    /// Pinned function tag.
    pub function: String,
    /// Fixed coordinate name.
    pub coordinate: String,
    /// Whether the fixed value sits on the upper bound.
    pub upper: bool,
}

/// One classified boundary/initial condition.
///
/// The taxonomy is closed on purpose: the assembler and validators match it
/// exhaustively, so a new condition kind cannot be silently mishandled.
/// Instances are immutable once classified.
#[derive(Debug, Clone, PartialEq)]
pub enum Boundary {
    /// A condition pinning one function to one domain edge.
    ///
    /// Initial conditions are edges on the time coordinate with
    /// `upper == false`.
    Edge {
        /// Constrained function tag.
        function: String,
        /// Fixed coordinate name.
        coordinate: String,
        /// Whether the fixed value sits on the upper bound.
        upper: bool,
        /// Derivative order with respect to the fixed coordinate.
        order: u32,
        /// The raw condition equation.
        equation: Equation,
    },
    /// A zero-order condition relating two pinned applications.
    Interface {
        /// Both pinned ends in equation order.
        ends: [InterfaceEnd; 2],
        /// The raw condition equation.
        equation: Equation,
    },
    /// An interface condition involving derivatives at the pinned ends.
    HigherOrderInterface {
        /// Both pinned ends in equation order.
        ends: [InterfaceEnd; 2],
        /// Every function tag referenced by the condition.
        functions: BTreeSet<String>,
        /// Every fixed coordinate referenced by the condition.
        coordinates: BTreeSet<String>,
        /// Maximum derivative order found with respect to the fixed
        /// coordinates.
        order: u32,
        /// The raw condition equation.
        equation: Equation,
    },
}

impl Boundary {
    /// Returns the raw condition equation.
    pub fn equation(&self) -> &Equation {
        match self {
            Boundary::Edge { equation, .. }
            | Boundary::Interface { equation, .. }
            | Boundary::HigherOrderInterface { equation, .. } => equation,
        }
    }

    /// Returns the derivative order the condition constrains.
    pub fn order(&self) -> u32 {
        match self {
            Boundary::Edge { order, .. } | Boundary::HigherOrderInterface { order, .. } => *order,
            Boundary::Interface { .. } => 0,
        }
    }

    /// Returns the (function, coordinate) keys this condition is filed under.
    ///
    /// Edges file under their single pair; interfaces under each distinct
    /// end, so a periodic self-pairing files once.
    pub fn filed_keys(&self) -> Vec<(&str, &str)> {
        match self {
            Boundary::Edge {
                function,
                coordinate,
                ..
            } => vec![(function.as_str(), coordinate.as_str())],
            Boundary::Interface { ends, .. } | Boundary::HigherOrderInterface { ends, .. } => {
                let mut keys: Vec<(&str, &str)> = Vec::with_capacity(2);
                for end in ends {
                    let key = (end.function.as_str(), end.coordinate.as_str());
                    if !keys.contains(&key) {
                        keys.push(key);
                    }
                }
                keys
            }
        }
    }

    /// Returns whether this condition pairs the same function with itself at
    /// opposite bounds of the same coordinate.
    ///
    /// Free-coordinate signatures of the two ends are identical by
    /// construction, so this is the full periodicity criterion.
    pub fn is_periodic_pairing(&self) -> bool {
        match self {
            Boundary::Edge { .. } => false,
            Boundary::Interface { ends, .. } | Boundary::HigherOrderInterface { ends, .. } => {
                ends[0].function == ends[1].function
                    && ends[0].coordinate == ends[1].coordinate
                    && ends[0].upper != ends[1].upper
            }
        }
    }
}

/// Two-level lookup over classified conditions: function tag, then
/// coordinate (time included), to an order-preserving condition list.
///
/// Built once by assembly and never mutated afterwards; the per-pair list
/// order reproduces raw input order, which downstream indexing relies on.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundaryMap {
    entries: IndexMap<String, IndexMap<String, Vec<Boundary>>>,
}

impl BoundaryMap {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, function: &str, coordinate: &str, boundary: Boundary) {
        self.entries
            .entry(function.to_string())
            .or_default()
            .entry(coordinate.to_string())
            .or_default()
            .push(boundary);
    }

    /// Returns the function tags with at least one classified condition.
    pub fn functions(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Returns the coordinates with conditions recorded for `function`.
    pub fn coordinates(&self, function: &str) -> impl Iterator<Item = &str> {
        self.entries
            .get(function)
            .into_iter()
            .flat_map(|inner| inner.keys().map(String::as_str))
    }

    /// Returns the conditions filed under `(function, coordinate)` in input
    /// order.
    pub fn boundaries(&self, function: &str, coordinate: &str) -> &[Boundary] {
        self.entries
            .get(function)
            .and_then(|inner| inner.get(coordinate))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Iterates every `(function, coordinate, conditions)` entry in insertion
    /// order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, &[Boundary])> {
        self.entries.iter().flat_map(|(function, inner)| {
            inner.iter().map(move |(coordinate, boundaries)| {
                (function.as_str(), coordinate.as_str(), boundaries.as_slice())
            })
        })
    }

    /// Returns the total number of filed condition entries.
    pub fn len(&self) -> usize {
        self.entries
            .values()
            .flat_map(|inner| inner.values())
            .map(Vec::len)
            .sum()
    }

    /// Returns whether no conditions were filed.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Per-(function, coordinate) periodicity flags with a global summary.
///
/// The global flag lets a backend pick wrap-around versus truncating index
/// arithmetic once instead of branching per access.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PeriodicMap {
    entries: IndexMap<String, IndexMap<String, bool>>,
    any: bool,
}

impl PeriodicMap {
    pub(crate) fn from_entries(entries: IndexMap<String, IndexMap<String, bool>>) -> Self {
        let any = entries
            .values()
            .flat_map(|inner| inner.values())
            .any(|flag| *flag);
        Self { entries, any }
    }

    /// Returns whether `(function, coordinate)` is periodically paired.
    pub fn is_periodic(&self, function: &str, coordinate: &str) -> bool {
        self.entries
            .get(function)
            .and_then(|inner| inner.get(coordinate))
            .copied()
            .unwrap_or(false)
    }

    /// Returns whether any pair in the run is periodic.
    pub fn any_periodic(&self) -> bool {
        self.any
    }
}
