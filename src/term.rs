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

//! Symbolic term language shared by the whole pipeline.
//!
//! `Term` is a closed expression tree with structural equality, structural
//! hashing, and textual rendering. It carries no source spans: the spanned
//! AST produced by the parser is lowered into `Term` once declarations are
//! resolved, and everything downstream (inspection, classification) works on
//! this representation.
//!
//! Terms are never evaluated or simplified here. Differentiation and algebraic
//! rewriting belong to the discretization backends consuming the metadata.

use std::fmt;
use std::hash::{Hash, Hasher};

/// Binary arithmetic operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TermOp {
    /// Addition (`+`).
    Add,
    /// Subtraction (`-`).
    Sub,
    /// Multiplication (`*`).
    Mul,
    /// Division (`/`).
    Div,
}

impl TermOp {
    /// Returns the operator's surface token.
    pub fn symbol(self) -> char {
        match self {
            TermOp::Add => '+',
            TermOp::Sub => '-',
            TermOp::Mul => '*',
            TermOp::Div => '/',
        }
    }
}

/// One node of the symbolic expression tree.
///
/// The variants split into leaves (`Num`, `Coord`, `Param`), the two heads the
/// classifier cares about (`Apply` for unknown-function applications, `Diff`
/// for derivative operators), and plain arithmetic structure.
#[derive(Debug, Clone, PartialEq)]
pub enum Term {
    /// Numeric literal.
    Num(f64),
    /// Reference to a declared coordinate (spatial or time).
    Coord(String),
    /// Reference to a declared scalar parameter.
    Param(String),
    /// Application of an unknown function to ordered arguments.
    ///
    /// Arguments are arbitrary terms: `u(t, x)` is a genuine application,
    /// `u(t, 0.0)` a boundary-evaluated one.
    Apply {
        /// Function tag.
        func: String,
        /// Ordered argument list.
        args: Vec<Term>,
    },
    /// Derivative of `arg` with respect to `coord`, taken `order` times.
    Diff {
        /// Differentiated subexpression.
        arg: Box<Term>,
        /// Target coordinate name.
        coord: String,
        /// Derivative order, at least 1.
        order: u32,
    },
    /// Builtin scalar function call (`sin`, `cos`, `ln`, `exp`, `sqrt`).
    Call {
        /// Builtin name.
        name: String,
        /// Ordered argument list.
        args: Vec<Term>,
    },
    /// Unary negation.
    Neg(Box<Term>),
    /// Binary arithmetic node.
    Binary {
        /// Operator kind.
        op: TermOp,
        /// Left operand.
        lhs: Box<Term>,
        /// Right operand.
        rhs: Box<Term>,
    },
}

// Terms originate from parsed literals and programmatic construction; NaN is
// never produced, so bitwise identity on the f64 payload is a total order.
impl Eq for Term {}

impl Hash for Term {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Term::Num(v) => {
                state.write_u8(0);
                state.write_u64(v.to_bits());
            }
            Term::Coord(name) => {
                state.write_u8(1);
                name.hash(state);
            }
            Term::Param(name) => {
                state.write_u8(2);
                name.hash(state);
            }
            Term::Apply { func, args } => {
                state.write_u8(3);
                func.hash(state);
                args.hash(state);
            }
            Term::Diff { arg, coord, order } => {
                state.write_u8(4);
                arg.hash(state);
                coord.hash(state);
                order.hash(state);
            }
            Term::Call { name, args } => {
                state.write_u8(5);
                name.hash(state);
                args.hash(state);
            }
            Term::Neg(inner) => {
                state.write_u8(6);
                inner.hash(state);
            }
            Term::Binary { op, lhs, rhs } => {
                state.write_u8(7);
                op.hash(state);
                lhs.hash(state);
                rhs.hash(state);
            }
        }
    }
}

impl Term {
    /// Creates a numeric literal term.
    pub fn num(value: f64) -> Self {
        Term::Num(value)
    }

    /// Creates a coordinate reference term.
    pub fn coord(name: impl Into<String>) -> Self {
        Term::Coord(name.into())
    }

    /// Creates a parameter reference term.
    pub fn param(name: impl Into<String>) -> Self {
        Term::Param(name.into())
    }

    /// Creates an unknown-function application.
    pub fn apply(func: impl Into<String>, args: impl IntoIterator<Item = Term>) -> Self {
        Term::Apply {
            func: func.into(),
            args: args.into_iter().collect(),
        }
    }

    /// Creates a first-order derivative with respect to `coord`.
    pub fn diff(arg: Term, coord: impl Into<String>) -> Self {
        Self::diff_n(arg, coord, 1)
    }

    /// Creates an `order`-th derivative with respect to `coord`.
    pub fn diff_n(arg: Term, coord: impl Into<String>, order: u32) -> Self {
        Term::Diff {
            arg: Box::new(arg),
            coord: coord.into(),
            order,
        }
    }

    /// Creates a builtin function call.
    pub fn call(name: impl Into<String>, args: impl IntoIterator<Item = Term>) -> Self {
        Term::Call {
            name: name.into(),
            args: args.into_iter().collect(),
        }
    }

    /// Returns the boxed form used by operator overloads.
    fn boxed(self) -> Box<Term> {
        Box::new(self)
    }

    /// Returns ordered child subterms, empty for leaves.
    pub fn children(&self) -> Vec<&Term> {
        match self {
            Term::Num(_) | Term::Coord(_) | Term::Param(_) => Vec::new(),
            Term::Apply { args, .. } | Term::Call { args, .. } => args.iter().collect(),
            Term::Diff { arg, .. } => vec![arg.as_ref()],
            Term::Neg(inner) => vec![inner.as_ref()],
            Term::Binary { lhs, rhs, .. } => vec![lhs.as_ref(), rhs.as_ref()],
        }
    }

    /// Returns the numeric payload for literal terms.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Term::Num(v) => Some(*v),
            Term::Neg(inner) => inner.as_number().map(|v| -v),
            _ => None,
        }
    }

    /// Returns the coordinate name for coordinate-reference terms.
    pub fn as_coordinate(&self) -> Option<&str> {
        match self {
            Term::Coord(name) => Some(name),
            _ => None,
        }
    }

    /// Returns whether this node is an unknown-function application.
    pub fn is_application(&self) -> bool {
        matches!(self, Term::Apply { .. })
    }

    /// Returns whether this node is a derivative operator.
    pub fn is_derivative(&self) -> bool {
        matches!(self, Term::Diff { .. })
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Num(v) => write!(f, "{v}"),
            Term::Coord(name) | Term::Param(name) => write!(f, "{name}"),
            Term::Apply { func, args } => {
                write!(f, "{func}(")?;
                for (idx, arg) in args.iter().enumerate() {
                    if idx > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                write!(f, ")")
            }
            Term::Diff { arg, coord, order } => {
                if *order == 1 {
                    write!(f, "D({arg}, {coord})")
                } else {
                    write!(f, "D({arg}, {coord}, {order})")
                }
            }
            Term::Call { name, args } => {
                write!(f, "{name}(")?;
                for (idx, arg) in args.iter().enumerate() {
                    if idx > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                write!(f, ")")
            }
            Term::Neg(inner) => write!(f, "(-{inner})"),
            Term::Binary { op, lhs, rhs } => write!(f, "({lhs} {} {rhs})", op.symbol()),
        }
    }
}

impl std::ops::Add for Term {
    type Output = Term;

    fn add(self, rhs: Term) -> Term {
        Term::Binary {
            op: TermOp::Add,
            lhs: self.boxed(),
            rhs: rhs.boxed(),
        }
    }
}

impl std::ops::Sub for Term {
    type Output = Term;

    fn sub(self, rhs: Term) -> Term {
        Term::Binary {
            op: TermOp::Sub,
            lhs: self.boxed(),
            rhs: rhs.boxed(),
        }
    }
}

impl std::ops::Mul for Term {
    type Output = Term;

    fn mul(self, rhs: Term) -> Term {
        Term::Binary {
            op: TermOp::Mul,
            lhs: self.boxed(),
            rhs: rhs.boxed(),
        }
    }
}

impl std::ops::Div for Term {
    type Output = Term;

    fn div(self, rhs: Term) -> Term {
        Term::Binary {
            op: TermOp::Div,
            lhs: self.boxed(),
            rhs: rhs.boxed(),
        }
    }
}

impl std::ops::Neg for Term {
    type Output = Term;

    fn neg(self) -> Term {
        Term::Neg(self.boxed())
    }
}

/// One equation relating two symbolic terms.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Equation {
    /// Left-hand side.
    pub lhs: Term,
    /// Right-hand side.
    pub rhs: Term,
}

impl Equation {
    /// Creates an equation from both sides.
    pub fn new(lhs: Term, rhs: Term) -> Self {
        Self { lhs, rhs }
    }

    /// Returns both sides in order.
    pub fn sides(&self) -> [&Term; 2] {
        [&self.lhs, &self.rhs]
    }
}

impl fmt::Display for Equation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} == {}", self.lhs, self.rhs)
    }
}
