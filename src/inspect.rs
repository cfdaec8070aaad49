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

//! Structural queries over symbolic terms.
//!
//! Everything here is a pure tree walk: no evaluation, no rewriting, no
//! assumptions about the algebraic shape of the expressions. All queries run
//! in time linear in the term size; repeated substructure is visited again,
//! not shared.

use crate::term::{Equation, Term};
use indexmap::IndexSet;
use std::collections::BTreeSet;

/// Sums the orders of every derivative operator targeting `coord`.
///
/// Nested derivatives accumulate: `D(D(u, x), x)` counts as order 2 with
/// respect to `x`, and derivatives targeting other coordinates contribute
/// nothing.
pub fn derivative_order(term: &Term, coord: &str) -> u32 {
    let mut total = 0;
    if let Term::Diff {
        coord: target,
        order,
        ..
    } = term
    {
        if target == coord {
            total += order;
        }
    }
    for child in term.children() {
        total += derivative_order(child, coord);
    }
    total
}

/// Collects every derivative order with respect to `coord` found anywhere in
/// the equation, excluding zero.
///
/// Each derivative chain is reported as its accumulated order: `D(D(u, x), x)`
/// contributes 2, not 1 twice.
pub fn equation_derivative_orders(equation: &Equation, coord: &str) -> BTreeSet<u32> {
    let mut orders = BTreeSet::new();
    for side in equation.sides() {
        collect_chain_orders(side, coord, 0, &mut orders);
    }
    orders
}

fn collect_chain_orders(term: &Term, coord: &str, above: u32, orders: &mut BTreeSet<u32>) {
    match term {
        Term::Diff {
            arg,
            coord: target,
            order,
        } => {
            let here = if target == coord { above + order } else { above };
            collect_chain_orders(arg, coord, here, orders);
        }
        _ => {
            // A chain ends at the first non-derivative node.
            if above > 0 {
                orders.insert(above);
            }
            for child in term.children() {
                collect_chain_orders(child, coord, 0, orders);
            }
        }
    }
}

/// Returns whether the term contains any derivative operator.
///
/// Short-circuits on the first hit.
pub fn contains_derivative(term: &Term) -> bool {
    if term.is_derivative() {
        return true;
    }
    term.children().into_iter().any(contains_derivative)
}

/// Finds the first subexpression that is either a derivative operator or an
/// application of `func`, in depth-first pre-order.
pub fn find_derivative_or_application<'a>(term: &'a Term, func: &str) -> Option<&'a Term> {
    match term {
        Term::Diff { .. } => return Some(term),
        Term::Apply { func: tag, .. } if tag == func => return Some(term),
        _ => {}
    }
    term.children()
        .into_iter()
        .find_map(|child| find_derivative_or_application(child, func))
}

/// Collects every application whose function tag matches one of `funcs`.
///
/// Matching is by tag identity only; argument values play no role. The result
/// is a structural set in first-encounter order, so `u(t, 0)` appearing on
/// both sides of an equation is reported once.
pub fn collect_applications<'a>(term: &'a Term, funcs: &[String]) -> IndexSet<&'a Term> {
    let mut found = IndexSet::new();
    collect_applications_into(term, funcs, &mut found);
    found
}

/// Collects matching applications from both sides of an equation.
pub fn collect_equation_applications<'a>(
    equation: &'a Equation,
    funcs: &[String],
) -> IndexSet<&'a Term> {
    let mut found = IndexSet::new();
    for side in equation.sides() {
        collect_applications_into(side, funcs, &mut found);
    }
    found
}

fn collect_applications_into<'a>(
    term: &'a Term,
    funcs: &[String],
    found: &mut IndexSet<&'a Term>,
) {
    if let Term::Apply { func, .. } = term {
        if funcs.iter().any(|tag| tag == func) {
            found.insert(term);
        }
    }
    for child in term.children() {
        collect_applications_into(child, funcs, found);
    }
}

/// Returns whether an application is genuine: every argument is a coordinate
/// reference.
///
/// Boundary-evaluated applications carry at least one numeric argument and
/// are rejected here.
pub fn is_genuine_application(term: &Term) -> bool {
    match term {
        Term::Apply { args, .. } => args.iter().all(|arg| arg.as_coordinate().is_some()),
        _ => false,
    }
}
