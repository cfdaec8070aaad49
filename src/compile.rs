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

//! Lowering from the spanned DSL AST to a raw [`PdeProblem`].
//!
//! This stage resolves declarations and converts spanned expressions into
//! symbolic terms. It enforces purely lexical rules: names must be declared
//! before use, bounds must be numeric literals, the derivative operator must
//! target a declared coordinate. Semantic validation (domain finiteness,
//! signature consistency, classification) belongs to the analysis stage.

use crate::ast::{
    BcItem, BinOp, CoordDecl, Expr, ExprKind, ProblemDef, ProblemStmtKind, Program, SourceSpan,
    UnknownDecl,
};
use crate::diagnostics::CompileError;
use crate::problem::{ConditionItem, Domain, PdeProblem};
use crate::term::{Equation, Term, TermOp};

/// Builtin scalar functions accepted in expressions.
const BUILTIN_FUNCTIONS: &[&str] = &["sin", "cos", "ln", "exp", "sqrt"];

/// Surface name of the derivative operator.
const DERIVATIVE_HEAD: &str = "D";

/// Lowers one parsed problem definition into a raw problem description.
pub fn lower_problem(source: &str, def: &ProblemDef) -> Result<PdeProblem, CompileError> {
    let mut ctx = LowerContext::new(source, &def.name);
    for stmt in &def.body {
        match &stmt.kind {
            ProblemStmtKind::Coord(decl) => ctx.declare_coordinate(decl, false)?,
            ProblemStmtKind::Time(decl) => ctx.declare_coordinate(decl, true)?,
            ProblemStmtKind::Param { name } => ctx.declare_parameter(name, &stmt.span)?,
            ProblemStmtKind::Unknown(decl) => ctx.declare_unknown(decl)?,
            ProblemStmtKind::Equation { lhs, rhs } => {
                let equation = ctx.lower_equation(lhs, rhs)?;
                ctx.problem.equations.push(equation);
            }
            ProblemStmtKind::Condition(item) => {
                let item = ctx.lower_condition(item)?;
                ctx.problem.conditions.push(item);
            }
        }
    }
    Ok(ctx.problem)
}

/// Selects the problem definition that should be lowered.
fn pick_problem<'a>(
    program: &'a Program,
    selected: Option<&str>,
) -> Result<&'a ProblemDef, CompileError> {
    if let Some(requested) = selected {
        return program
            .problems
            .iter()
            .find(|def| def.name == requested)
            .ok_or_else(|| {
                CompileError::message_only(format!("Requested problem '{requested}' was not found"))
            });
    }

    match program.problems.len() {
        0 => Err(CompileError::message_only(
            "Source contains no problem definition",
        )),
        1 => Ok(&program.problems[0]),
        _ => Err(CompileError::message_only(
            "Multiple problems found; use compile_named_problem(...) to select one",
        )),
    }
}

/// Parses and lowers the sole problem in `source`.
pub fn compile_source(source: &str) -> Result<PdeProblem, CompileError> {
    let program = crate::parser::parse_program(source)?;
    let def = pick_problem(&program, None)?;
    lower_problem(source, def)
}

/// Parses and lowers one named problem from `source`.
pub fn compile_named_source(source: &str, name: &str) -> Result<PdeProblem, CompileError> {
    let program = crate::parser::parse_program(source)?;
    let def = pick_problem(&program, Some(name))?;
    lower_problem(source, def)
}

/// Lowering context for one problem definition.
struct LowerContext<'a> {
    source: &'a str,
    problem: PdeProblem,
}

impl<'a> LowerContext<'a> {
    fn new(source: &'a str, name: &str) -> Self {
        Self {
            source,
            problem: PdeProblem::new(name),
        }
    }

    /// Creates a source-mapped compile error.
    fn error_at(&self, message: impl Into<String>, span: &SourceSpan) -> CompileError {
        CompileError::from_span(message, self.source, span)
    }

    /// Returns whether `name` is already taken in the problem namespace.
    ///
    /// Coordinates, the time coordinate, parameters, and unknown tags share
    /// one namespace so that identifier lookup stays unambiguous.
    fn is_declared(&self, name: &str) -> bool {
        self.problem.coordinates.iter().any(|c| c == name)
            || self.problem.time.as_deref() == Some(name)
            || self.problem.parameters.iter().any(|p| p == name)
            || self.problem.unknowns.iter().any(|u| u == name)
    }

    fn declare_coordinate(&mut self, decl: &CoordDecl, is_time: bool) -> Result<(), CompileError> {
        if self.is_declared(&decl.name) {
            return Err(self.error_at(
                format!("Duplicate declaration for '{}'", decl.name),
                &decl.span,
            ));
        }
        if is_time && self.problem.time.is_some() {
            return Err(self.error_at(
                "A problem may declare at most one time coordinate",
                &decl.span,
            ));
        }

        let lower = self.literal_bound(&decl.lower)?;
        let upper = self.literal_bound(&decl.upper)?;
        self.problem
            .domains
            .insert(decl.name.clone(), Domain::new(lower, upper));
        if is_time {
            self.problem.time = Some(decl.name.clone());
        } else {
            self.problem.coordinates.push(decl.name.clone());
        }
        Ok(())
    }

    fn declare_parameter(&mut self, name: &str, span: &SourceSpan) -> Result<(), CompileError> {
        if self.is_declared(name) {
            return Err(self.error_at(format!("Duplicate declaration for '{name}'"), span));
        }
        self.problem.parameters.push(name.to_string());
        Ok(())
    }

    fn declare_unknown(&mut self, decl: &UnknownDecl) -> Result<(), CompileError> {
        if self.is_declared(&decl.name) {
            return Err(self.error_at(
                format!("Duplicate declaration for '{}'", decl.name),
                &decl.span,
            ));
        }
        if decl.coords.is_empty() {
            return Err(self.error_at(
                format!("Unknown function '{}' must list at least one coordinate", decl.name),
                &decl.span,
            ));
        }
        // The listed names document the intended signature; the authoritative
        // signature is still discovered from genuine applications later.
        for coord in &decl.coords {
            if !self.is_coordinate(coord) {
                return Err(self.error_at(
                    format!(
                        "Unknown function '{}' references undeclared coordinate '{coord}'",
                        decl.name
                    ),
                    &decl.span,
                ));
            }
        }
        self.problem.unknowns.push(decl.name.clone());
        Ok(())
    }

    /// Returns whether `name` is a declared coordinate, time included.
    fn is_coordinate(&self, name: &str) -> bool {
        self.problem.coordinates.iter().any(|c| c == name)
            || self.problem.time.as_deref() == Some(name)
    }

    /// Evaluates a domain-bound expression to a numeric literal.
    fn literal_bound(&self, expr: &Expr) -> Result<f64, CompileError> {
        match &expr.kind {
            ExprKind::Number(v) => Ok(*v),
            ExprKind::UnaryNeg(inner) => Ok(-self.literal_bound(inner)?),
            _ => Err(self.error_at("Domain bound must be a numeric literal", &expr.span)),
        }
    }

    fn lower_equation(&self, lhs: &Expr, rhs: &Expr) -> Result<Equation, CompileError> {
        Ok(Equation::new(self.lower_expr(lhs)?, self.lower_expr(rhs)?))
    }

    fn lower_condition(&self, item: &BcItem) -> Result<ConditionItem, CompileError> {
        match item {
            BcItem::Leaf { lhs, rhs, .. } => {
                Ok(ConditionItem::Equation(self.lower_equation(lhs, rhs)?))
            }
            BcItem::Group { items, .. } => {
                let mut lowered = Vec::with_capacity(items.len());
                for nested in items {
                    lowered.push(self.lower_condition(nested)?);
                }
                Ok(ConditionItem::Group(lowered))
            }
        }
    }

    /// Recursively lowers an AST expression into a symbolic term.
    fn lower_expr(&self, expr: &Expr) -> Result<Term, CompileError> {
        match &expr.kind {
            ExprKind::Number(v) => Ok(Term::Num(*v)),
            ExprKind::Ident(name) => {
                if self.is_coordinate(name) {
                    Ok(Term::coord(name.clone()))
                } else if self.problem.parameters.iter().any(|p| p == name) {
                    Ok(Term::param(name.clone()))
                } else {
                    Err(self.error_at(format!("Unknown identifier '{name}'"), &expr.span))
                }
            }
            ExprKind::UnaryNeg(inner) => Ok(-self.lower_expr(inner)?),
            ExprKind::Binary { op, left, right } => {
                let lhs = self.lower_expr(left)?;
                let rhs = self.lower_expr(right)?;
                Ok(Term::Binary {
                    op: map_bin_op(*op),
                    lhs: Box::new(lhs),
                    rhs: Box::new(rhs),
                })
            }
            ExprKind::Call { name, args } => self.lower_call(name, args, &expr.span),
        }
    }

    /// Lowers a call head: derivative operator, unknown application, builtin.
    fn lower_call(
        &self,
        name: &str,
        args: &[Expr],
        span: &SourceSpan,
    ) -> Result<Term, CompileError> {
        if name == DERIVATIVE_HEAD {
            return self.lower_derivative(args, span);
        }

        if self.problem.unknowns.iter().any(|u| u == name) {
            let mut lowered = Vec::with_capacity(args.len());
            for arg in args {
                lowered.push(self.lower_expr(arg)?);
            }
            return Ok(Term::Apply {
                func: name.to_string(),
                args: lowered,
            });
        }

        if BUILTIN_FUNCTIONS.contains(&name) {
            if args.len() != 1 {
                return Err(self.error_at(
                    format!("{name} expects 1 argument, found {}", args.len()),
                    span,
                ));
            }
            return Ok(Term::call(name, [self.lower_expr(&args[0])?]));
        }

        Err(self.error_at(format!("Unknown function '{name}'"), span))
    }

    /// Lowers `D(expr, coord)` / `D(expr, coord, order)`.
    fn lower_derivative(&self, args: &[Expr], span: &SourceSpan) -> Result<Term, CompileError> {
        if !(2..=3).contains(&args.len()) {
            return Err(self.error_at(
                format!(
                    "Derivative operator expects 2 or 3 arguments, found {}",
                    args.len()
                ),
                span,
            ));
        }

        let target = match &args[1].kind {
            ExprKind::Ident(name) if self.is_coordinate(name) => name.clone(),
            _ => {
                return Err(self.error_at(
                    "Derivative target must be a declared coordinate",
                    &args[1].span,
                ));
            }
        };

        let order = match args.get(2) {
            None => 1,
            Some(arg) => match &arg.kind {
                // Orders are small positive integers written literally.
                ExprKind::Number(v) if v.fract() == 0.0 && *v >= 1.0 => *v as u32,
                _ => {
                    return Err(self.error_at(
                        "Derivative order must be a positive integer literal",
                        &arg.span,
                    ));
                }
            },
        };

        Ok(Term::diff_n(self.lower_expr(&args[0])?, target, order))
    }
}

fn map_bin_op(op: BinOp) -> TermOp {
    match op {
        BinOp::Add => TermOp::Add,
        BinOp::Sub => TermOp::Sub,
        BinOp::Mul => TermOp::Mul,
        BinOp::Div => TermOp::Div,
    }
}
