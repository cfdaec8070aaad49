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

//! AST definitions for the problem DSL with precise source spans.
//!
//! The parser creates this AST first. A later lowering phase resolves
//! declarations and converts spanned expressions into symbolic
//! [`crate::term::Term`] trees for analysis.

use nom_locate::LocatedSpan;

/// Parser input span type carrying byte offsets and line/column info.
pub type Span<'a> = LocatedSpan<&'a str>;

/// Source range and anchor position for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSpan {
    /// Start byte offset (inclusive).
    pub start: usize,
    /// End byte offset (exclusive).
    pub end: usize,
    /// 1-based line number.
    pub line: usize,
    /// 1-based UTF-8 column.
    pub column: usize,
}

impl SourceSpan {
    /// Creates a source span from parser start/end positions.
    pub fn from_bounds(start: Span<'_>, end: Span<'_>) -> Self {
        Self {
            start: start.location_offset(),
            end: end.location_offset(),
            line: start.location_line() as usize,
            column: start.get_utf8_column(),
        }
    }

    /// Returns span length in bytes.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Returns whether the span covers no bytes.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns a span that starts at `self` and ends at `other`.
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            start: self.start,
            end: other.end,
            line: self.line,
            column: self.column,
        }
    }
}

/// Binary arithmetic operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    /// Addition (`+`).
    Add,
    /// Subtraction (`-`).
    Sub,
    /// Multiplication (`*`).
    Mul,
    /// Division (`/`).
    Div,
}

/// Expression node variants.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    /// Numeric literal.
    Number(f64),
    /// Identifier reference (coordinate or parameter, resolved at lowering).
    Ident(String),
    /// Unary negation.
    UnaryNeg(Box<Expr>),
    /// Binary operation.
    Binary {
        /// Operator kind.
        op: BinOp,
        /// Left operand.
        left: Box<Expr>,
        /// Right operand.
        right: Box<Expr>,
    },
    /// Function call: unknown application, derivative operator `D(...)`, or
    /// builtin scalar function. Disambiguated at lowering.
    Call {
        /// Callee name.
        name: String,
        /// Call arguments.
        args: Vec<Expr>,
    },
}

/// Spanned expression node.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    /// Expression payload.
    pub kind: ExprKind,
    /// Source location for diagnostics.
    pub span: SourceSpan,
}

/// Declaration of one coordinate with its domain interval.
#[derive(Debug, Clone, PartialEq)]
pub struct CoordDecl {
    /// Coordinate name.
    pub name: String,
    /// Lower bound expression (numeric literal, possibly negated).
    pub lower: Expr,
    /// Upper bound expression (numeric literal, possibly negated).
    pub upper: Expr,
    /// Source location for diagnostics.
    pub span: SourceSpan,
}

/// Declaration of one unknown function with its listed coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct UnknownDecl {
    /// Function tag.
    pub name: String,
    /// Declared coordinate names, checked against coordinate declarations.
    pub coords: Vec<String>,
    /// Source location for diagnostics.
    pub span: SourceSpan,
}

/// One boundary/initial condition item; groups nest arbitrarily.
#[derive(Debug, Clone, PartialEq)]
pub enum BcItem {
    /// A single condition equation.
    Leaf {
        /// Left-hand side.
        lhs: Expr,
        /// Right-hand side.
        rhs: Expr,
        /// Source location for diagnostics.
        span: SourceSpan,
    },
    /// A braced group of nested items, flattened in order by the loader.
    Group {
        /// Nested items in source order.
        items: Vec<BcItem>,
        /// Source location for diagnostics.
        span: SourceSpan,
    },
}

impl BcItem {
    /// Returns the source location of this item.
    pub fn span(&self) -> &SourceSpan {
        match self {
            BcItem::Leaf { span, .. } | BcItem::Group { span, .. } => span,
        }
    }
}

/// Problem-scoped statement variants.
#[derive(Debug, Clone, PartialEq)]
pub enum ProblemStmtKind {
    /// Spatial coordinate declaration (`coord x in (a, b);`).
    Coord(CoordDecl),
    /// Time coordinate declaration (`time t in (a, b);`).
    Time(CoordDecl),
    /// Scalar parameter declaration (`param nu;`).
    Param {
        /// Parameter name.
        name: String,
    },
    /// Unknown function declaration (`unknown u(t, x);`).
    Unknown(UnknownDecl),
    /// Governing equation (`eq lhs == rhs;`).
    Equation {
        /// Left-hand side.
        lhs: Expr,
        /// Right-hand side.
        rhs: Expr,
    },
    /// Boundary/initial condition statement (`bc ...;` or `bc { ... }`).
    Condition(BcItem),
}

/// Spanned problem statement node.
#[derive(Debug, Clone, PartialEq)]
pub struct ProblemStmt {
    /// Statement payload.
    pub kind: ProblemStmtKind,
    /// Source location for diagnostics.
    pub span: SourceSpan,
}

/// Named problem definition block.
#[derive(Debug, Clone, PartialEq)]
pub struct ProblemDef {
    /// Problem name.
    pub name: String,
    /// Problem body statements.
    pub body: Vec<ProblemStmt>,
    /// Source location for diagnostics.
    pub span: SourceSpan,
}

/// Full parsed program: one or more problem definitions.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    /// Top-level problem blocks in source order.
    pub problems: Vec<ProblemDef>,
}
