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

//! Statement and problem-definition parsers.

use crate::ast::{
    BcItem, CoordDecl, Expr, ProblemDef, ProblemStmt, ProblemStmtKind, SourceSpan, Span,
    UnknownDecl,
};
use nom::Parser;
use nom::{
    branch::alt,
    bytes::complete::tag,
    combinator::map,
    error::context,
    multi::{many0, separated_list0},
    sequence::delimited,
};

use super::PResult;
use super::expr::expr;
use super::utils::{identifier, keyword, ws, ws_char};

/// Parses a top-level `problem` definition.
pub(super) fn problem_def(input: Span<'_>) -> PResult<'_, ProblemDef> {
    let start = input;
    let (input, _) = ws(context("'problem'", keyword("problem"))).parse(input)?;
    let (input, name) = context("problem name", ws(identifier)).parse(input)?;
    let (input, body) = delimited(
        context("'{'", ws_char('{')),
        many0(problem_statement),
        context("'}'", ws_char('}')),
    )
    .parse(input)?;
    let span = SourceSpan::from_bounds(start, input);
    Ok((input, ProblemDef { name, body, span }))
}

/// Parses one problem-scoped statement.
fn problem_statement(input: Span<'_>) -> PResult<'_, ProblemStmt> {
    let start = input;
    // Declarations first, then equations and conditions.
    let (input, kind) = alt((
        coord_stmt,
        time_stmt,
        param_stmt,
        unknown_stmt,
        equation_stmt,
        condition_stmt,
    ))
    .parse(input)?;
    let span = SourceSpan::from_bounds(start, input);
    Ok((input, ProblemStmt { kind, span }))
}

/// Parses `coord <name> in (<lo>, <hi>);`.
fn coord_stmt(input: Span<'_>) -> PResult<'_, ProblemStmtKind> {
    let start = input;
    let (input, _) = ws(keyword("coord")).parse(input)?;
    let (input, decl) = coord_decl_body(start, input)?;
    Ok((input, ProblemStmtKind::Coord(decl)))
}

/// Parses `time <name> in (<lo>, <hi>);`.
fn time_stmt(input: Span<'_>) -> PResult<'_, ProblemStmtKind> {
    let start = input;
    let (input, _) = ws(keyword("time")).parse(input)?;
    let (input, decl) = coord_decl_body(start, input)?;
    Ok((input, ProblemStmtKind::Time(decl)))
}

/// Parses the shared tail of coordinate declarations.
fn coord_decl_body<'a>(start: Span<'a>, input: Span<'a>) -> PResult<'a, CoordDecl> {
    let (input, name) = context("coordinate name", ws(identifier)).parse(input)?;
    let (input, _) = ws(context("'in'", keyword("in"))).parse(input)?;
    let (input, _) = context("'('", ws_char('(')).parse(input)?;
    let (input, lower) = context("lower bound", expr).parse(input)?;
    let (input, _) = context("','", ws_char(',')).parse(input)?;
    let (input, upper) = context("upper bound", expr).parse(input)?;
    let (input, _) = context("')'", ws_char(')')).parse(input)?;
    let (input, _) = context("';'", ws_char(';')).parse(input)?;
    let span = SourceSpan::from_bounds(start, input);
    Ok((
        input,
        CoordDecl {
            name,
            lower,
            upper,
            span,
        },
    ))
}

/// Parses `param <name>;`.
fn param_stmt(input: Span<'_>) -> PResult<'_, ProblemStmtKind> {
    let (input, _) = ws(keyword("param")).parse(input)?;
    let (input, name) = context("parameter name", ws(identifier)).parse(input)?;
    let (input, _) = context("';'", ws_char(';')).parse(input)?;
    Ok((input, ProblemStmtKind::Param { name }))
}

/// Parses `unknown <name>(<coords...>);`.
fn unknown_stmt(input: Span<'_>) -> PResult<'_, ProblemStmtKind> {
    let start = input;
    let (input, _) = ws(keyword("unknown")).parse(input)?;
    let (input, name) = context("function name", ws(identifier)).parse(input)?;
    let (input, coords) = delimited(
        context("'('", ws_char('(')),
        separated_list0(ws_char(','), ws(identifier)),
        context("')'", ws_char(')')),
    )
    .parse(input)?;
    let (input, _) = context("';'", ws_char(';')).parse(input)?;
    let span = SourceSpan::from_bounds(start, input);
    Ok((
        input,
        ProblemStmtKind::Unknown(UnknownDecl { name, coords, span }),
    ))
}

/// Parses `eq <expr> == <expr>;`.
fn equation_stmt(input: Span<'_>) -> PResult<'_, ProblemStmtKind> {
    let (input, _) = ws(keyword("eq")).parse(input)?;
    let (input, (lhs, rhs)) = equation_body(input)?;
    let (input, _) = context("';'", ws_char(';')).parse(input)?;
    Ok((input, ProblemStmtKind::Equation { lhs, rhs }))
}

/// Parses `bc <expr> == <expr>;` or a nested `bc { ... }` group.
fn condition_stmt(input: Span<'_>) -> PResult<'_, ProblemStmtKind> {
    let (input, _) = ws(keyword("bc")).parse(input)?;
    let (input, item) = bc_item(input)?;
    Ok((input, ProblemStmtKind::Condition(item)))
}

/// Parses one condition item: a leaf equation or a braced group.
fn bc_item(input: Span<'_>) -> PResult<'_, BcItem> {
    alt((bc_group, bc_leaf)).parse(input)
}

/// Parses a braced group of nested condition items.
fn bc_group(input: Span<'_>) -> PResult<'_, BcItem> {
    let start = input;
    let (input, items) = delimited(
        ws_char('{'),
        many0(bc_item),
        context("'}'", ws_char('}')),
    )
    .parse(input)?;
    let span = SourceSpan::from_bounds(start, input);
    Ok((input, BcItem::Group { items, span }))
}

/// Parses one condition equation and trailing semicolon.
fn bc_leaf(input: Span<'_>) -> PResult<'_, BcItem> {
    let start = input;
    let (input, (lhs, rhs)) = equation_body(input)?;
    let (input, _) = context("';'", ws_char(';')).parse(input)?;
    let span = SourceSpan::from_bounds(start, input);
    Ok((input, BcItem::Leaf { lhs, rhs, span }))
}

/// Parses an equation body (`lhs == rhs`).
fn equation_body(input: Span<'_>) -> PResult<'_, (Expr, Expr)> {
    // Grammar: `<expr> == <expr>`
    let (input, lhs) = context("left expression", expr).parse(input)?;
    let (input, _) = context("'=='", ws(equals_equals)).parse(input)?;
    let (input, rhs) = context("right expression", expr).parse(input)?;
    Ok((input, (lhs, rhs)))
}

/// Parses the `==` token.
fn equals_equals(input: Span<'_>) -> PResult<'_, ()> {
    map(tag("=="), |_| ()).parse(input)
}
