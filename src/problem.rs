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

//! Raw problem description consumed by the analysis pipeline.
//!
//! [`PdeProblem`] carries the declared lists exactly as the loader supplied
//! them: coordinates, the optional time coordinate, parameters, unknown
//! function tags, the domain table, governing equations, and raw conditions.
//! It makes no claims beyond syntax; the analysis stage re-validates the
//! coordinate/domain correspondence and fails loudly when it is broken.
//!
//! Conditions arrive possibly nested in groups (upstream pre-processing emits
//! grouped blocks); [`PdeProblem::flattened_conditions`] produces the single
//! flat, order-preserving sequence the classifier consumes.

use crate::term::Equation;
use indexmap::IndexMap;
use std::fmt;

/// One coordinate's domain interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Domain {
    /// Lower bound (inclusive end of the interval).
    pub lower: f64,
    /// Upper bound (inclusive end of the interval).
    pub upper: f64,
}

impl Domain {
    /// Creates a domain interval.
    pub fn new(lower: f64, upper: f64) -> Self {
        Self { lower, upper }
    }

    /// Returns the interval width (`upper - lower`).
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }

    /// Returns whether both bounds are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.lower.is_finite() && self.upper.is_finite()
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.lower, self.upper)
    }
}

/// One raw boundary/initial condition; groups nest arbitrarily.
#[derive(Debug, Clone, PartialEq)]
pub enum ConditionItem {
    /// A single condition equation.
    Equation(Equation),
    /// A nested group preserved from upstream pre-processing.
    Group(Vec<ConditionItem>),
}

/// The raw declared lists for one discretization run.
///
/// This is a plain data carrier: every field is public and reflects the
/// loader's input verbatim. Analysis owns all semantic validation.
#[derive(Debug, Clone, PartialEq)]
pub struct PdeProblem {
    /// Problem name (diagnostic label).
    pub name: String,
    /// Declared spatial coordinate names, declaration order.
    pub coordinates: Vec<String>,
    /// Declared time coordinate, if any.
    pub time: Option<String>,
    /// Declared scalar parameter names.
    pub parameters: Vec<String>,
    /// Declared unknown function tags.
    pub unknowns: Vec<String>,
    /// Domain table over every declared coordinate, time included.
    pub domains: IndexMap<String, Domain>,
    /// Governing equations in declaration order.
    pub equations: Vec<Equation>,
    /// Raw boundary/initial conditions, possibly in nested groups.
    pub conditions: Vec<ConditionItem>,
}

impl PdeProblem {
    /// Creates an empty problem shell with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            coordinates: Vec::new(),
            time: None,
            parameters: Vec::new(),
            unknowns: Vec::new(),
            domains: IndexMap::new(),
            equations: Vec::new(),
            conditions: Vec::new(),
        }
    }

    /// Flattens nested condition groups into one ordered equation sequence.
    ///
    /// Group structure carries no meaning downstream; only the relative order
    /// of the leaves does, and that order is preserved exactly.
    pub fn flattened_conditions(&self) -> Vec<&Equation> {
        let mut flat = Vec::new();
        flatten_into(&self.conditions, &mut flat);
        flat
    }
}

fn flatten_into<'a>(items: &'a [ConditionItem], flat: &mut Vec<&'a Equation>) {
    for item in items {
        match item {
            ConditionItem::Equation(equation) => flat.push(equation),
            ConditionItem::Group(nested) => flatten_into(nested, flat),
        }
    }
}
