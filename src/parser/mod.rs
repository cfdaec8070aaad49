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

//! `nom` parser for the problem DSL.
//!
//! The grammar supports:
//! - top-level `problem <name> { ... }` definitions
//! - `coord <name> in (<lo>, <hi>);` and `time <name> in (<lo>, <hi>);`
//! - `param <name>;` and `unknown <name>(<coords...>);`
//! - `eq <expr> == <expr>;` governing equations
//! - `bc <expr> == <expr>;` conditions and nested `bc { ... }` groups
//!
//! Expressions support:
//! - numeric literals and identifiers
//! - unary negation
//! - binary `+ - * /`
//! - function calls, including the `D(expr, coord[, order])` derivative
//!   surface syntax

mod expr;
mod statements;
mod utils;

use crate::ast::{Program, SourceSpan, Span};
use crate::diagnostics::CompileError;
use nom::{
    IResult,
    combinator::all_consuming,
    error::{VerboseError, VerboseErrorKind},
    multi::many0,
    sequence::delimited,
};

use self::statements::problem_def;
use self::utils::ws0;

type PResult<'a, O> = IResult<Span<'a>, O, VerboseError<Span<'a>>>;

/// Parses full DSL source into a spanned AST program.
pub fn parse_program(source: &str) -> Result<Program, CompileError> {
    let input = Span::new(source);
    // `all_consuming` ensures trailing garbage is treated as syntax error.
    let (_, problems) = match all_consuming(delimited(ws0, many0(problem_def), ws0))(input) {
        Ok(v) => v,
        Err(err) => return Err(parse_error_to_compile_error(err, source)),
    };

    Ok(Program { problems })
}

/// Converts a `nom` verbose error to crate-level compile diagnostics.
fn parse_error_to_compile_error(
    err: nom::Err<VerboseError<Span<'_>>>,
    source: &str,
) -> CompileError {
    match err {
        nom::Err::Incomplete(_) => CompileError::message_only("Incomplete input"),
        nom::Err::Error(e) | nom::Err::Failure(e) => {
            // Use the deepest recorded parser error as the diagnostic anchor.
            if let Some((span, kind)) = e.errors.last() {
                let span = SourceSpan::from_bounds(*span, *span);
                let detail = match kind {
                    VerboseErrorKind::Context(ctx) => format!("Syntax error: expected {ctx}"),
                    VerboseErrorKind::Char(c) => format!("Syntax error: expected '{c}'"),
                    VerboseErrorKind::Nom(kind) => format!("Syntax error near {kind:?}"),
                };
                CompileError::from_span(detail, source, &span)
            } else {
                CompileError::message_only("Syntax error")
            }
        }
    }
}
