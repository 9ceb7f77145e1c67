// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Threshold resolution.
//!
//! A threshold is either a constant or a formula over the problem's declared
//! size parameters (`n / 10`, `2 * sum`, `max(1e6, n * m)`). Formulas are
//! opaque configuration: they are evaluated, never simplified or re-derived.
//!
//! Resolution is total. Arithmetic saturates, division by zero yields 0, an
//! undeclared parameter reads as 0, and the result is clamped to the
//! threshold's floor (1 unless configured otherwise), so `n = 0` still gives a
//! usable bound.
//!
//! # Formula grammar
//!
//! ```text
//! expr  := term (('+' | '-') term)*
//! term  := unary (('*' | '/') unary)*
//! unary := '-' unary | atom
//! atom  := number | ident | ident '(' expr (',' expr)* ')' | '(' expr ')'
//! number:= digits ('_' digits)* ('e' digits)?
//! ```
//!
//! Functions: `log2(x)` (floor, 0 for x <= 0), `sqrt(x)` (floor, 0 for x <= 0),
//! `min(a, b)`, `max(a, b)`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::contracts::check_bound_respects_floor;
use crate::error::GuardError;
use crate::types::Scalar;

/// Lowest value a derived threshold resolves to unless configured otherwise.
pub const DEFAULT_FLOOR: i64 = 1;

/// Deepest formula the parser accepts, counted both as tree height (operators,
/// calls, unary minus) and as nesting of groups and calls in the text.
pub const MAX_FORMULA_DEPTH: usize = 128;

// ============================================================================
// SIZE PARAMETERS
// ============================================================================

/// Named problem-size parameters (`n`, `m`, `k`, `sum`, ...).
///
/// Fixed for the duration of one run. Missing names read as 0.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeParams {
    values: BTreeMap<String, i64>,
}

impl SizeParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: &str, value: impl Into<Scalar>) -> Self {
        self.set(name, value);
        self
    }

    /// Set a parameter. Float values are truncated toward zero.
    pub fn set(&mut self, name: &str, value: impl Into<Scalar>) {
        let value = match value.into() {
            Scalar::Int(v) => v,
            // `as` saturates and maps NaN to 0
            Scalar::Float(v) => v as i64,
        };
        self.values.insert(name.to_string(), value);
    }

    pub fn get(&self, name: &str) -> i64 {
        self.values.get(name).copied().unwrap_or(0)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<(S, i64)> for SizeParams {
    fn from_iter<I: IntoIterator<Item = (S, i64)>>(iter: I) -> Self {
        let mut params = SizeParams::new();
        for (name, value) in iter {
            params.set(name.as_ref(), value);
        }
        params
    }
}

/// Parse a `name=value` assignment, as given on the command line.
pub fn parse_assignment(input: &str) -> Result<(String, i64), GuardError> {
    let invalid = || GuardError::InvalidAssignment {
        input: input.to_string(),
    };
    let (name, value) = input.split_once('=').ok_or_else(invalid)?;
    let name = name.trim();
    if !is_ident(name) {
        return Err(invalid());
    }
    let value = match value.parse::<Scalar>().map_err(|_| invalid())? {
        Scalar::Int(v) => v,
        Scalar::Float(_) => return Err(invalid()),
    };
    Ok((name.to_string(), value))
}

fn is_ident(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

// ============================================================================
// FORMULAS
// ============================================================================

/// Arithmetic over size parameters.
///
/// Serialized as its text form, so JSON tables read `"threshold": "n / 10"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Formula {
    Lit(i64),
    Param(String),
    Add(Box<Formula>, Box<Formula>),
    Sub(Box<Formula>, Box<Formula>),
    Mul(Box<Formula>, Box<Formula>),
    Div(Box<Formula>, Box<Formula>),
    Log2(Box<Formula>),
    Sqrt(Box<Formula>),
    Min(Box<Formula>, Box<Formula>),
    Max(Box<Formula>, Box<Formula>),
}

impl Formula {
    pub fn parse(input: &str) -> Result<Self, GuardError> {
        let mut parser = Parser {
            input,
            bytes: input.as_bytes(),
            pos: 0,
            depth: 0,
        };
        let (formula, _) = parser.expr()?;
        parser.skip_ws();
        if parser.pos < parser.bytes.len() {
            return Err(parser.error("unexpected trailing input"));
        }
        Ok(formula)
    }

    /// Evaluate against `sizes` with saturating arithmetic.
    pub fn eval(&self, sizes: &SizeParams) -> i64 {
        match self {
            Formula::Lit(v) => *v,
            Formula::Param(name) => sizes.get(name),
            Formula::Add(a, b) => a.eval(sizes).saturating_add(b.eval(sizes)),
            Formula::Sub(a, b) => a.eval(sizes).saturating_sub(b.eval(sizes)),
            Formula::Mul(a, b) => a.eval(sizes).saturating_mul(b.eval(sizes)),
            Formula::Div(a, b) => {
                let divisor = b.eval(sizes);
                if divisor == 0 {
                    0
                } else {
                    // only i64::MIN / -1 overflows
                    a.eval(sizes).checked_div(divisor).unwrap_or(i64::MAX)
                }
            }
            Formula::Log2(x) => ilog2(x.eval(sizes)),
            Formula::Sqrt(x) => isqrt(x.eval(sizes)),
            Formula::Min(a, b) => a.eval(sizes).min(b.eval(sizes)),
            Formula::Max(a, b) => a.eval(sizes).max(b.eval(sizes)),
        }
    }

    /// Parameter names this formula reads, in first-use order.
    pub fn params(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_params(&mut out);
        out
    }

    fn collect_params<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Formula::Lit(_) => {}
            Formula::Param(name) => {
                if !out.contains(&name.as_str()) {
                    out.push(name);
                }
            }
            Formula::Log2(x) | Formula::Sqrt(x) => x.collect_params(out),
            Formula::Add(a, b)
            | Formula::Sub(a, b)
            | Formula::Mul(a, b)
            | Formula::Div(a, b)
            | Formula::Min(a, b)
            | Formula::Max(a, b) => {
                a.collect_params(out);
                b.collect_params(out);
            }
        }
    }

    fn precedence(&self) -> u8 {
        match self {
            Formula::Add(..) | Formula::Sub(..) => 1,
            Formula::Mul(..) | Formula::Div(..) => 2,
            _ => 3,
        }
    }

    fn fmt_binary(
        &self,
        f: &mut fmt::Formatter<'_>,
        lhs: &Formula,
        op: &str,
        rhs: &Formula,
    ) -> fmt::Result {
        let prec = self.precedence();
        lhs.fmt_child(f, prec)?;
        write!(f, " {} ", op)?;
        rhs.fmt_child(f, prec + 1)
    }

    fn fmt_child(&self, f: &mut fmt::Formatter<'_>, min_prec: u8) -> fmt::Result {
        if self.precedence() < min_prec {
            write!(f, "({})", self)
        } else {
            write!(f, "{}", self)
        }
    }
}

fn ilog2(x: i64) -> i64 {
    if x <= 0 {
        0
    } else {
        i64::from(x.ilog2())
    }
}

fn isqrt(x: i64) -> i64 {
    if x <= 0 {
        return 0;
    }
    let mut r = (x as f64).sqrt() as i64;
    // f64 sqrt can be off by one near the top of the range
    while r > 0 && r.checked_mul(r).map_or(true, |sq| sq > x) {
        r -= 1;
    }
    while (r + 1).checked_mul(r + 1).is_some_and(|sq| sq <= x) {
        r += 1;
    }
    r
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Formula::Lit(v) => write!(f, "{}", v),
            Formula::Param(name) => f.write_str(name),
            Formula::Add(a, b) => self.fmt_binary(f, a, "+", b),
            Formula::Sub(a, b) => self.fmt_binary(f, a, "-", b),
            Formula::Mul(a, b) => self.fmt_binary(f, a, "*", b),
            Formula::Div(a, b) => self.fmt_binary(f, a, "/", b),
            Formula::Log2(x) => write!(f, "log2({})", x),
            Formula::Sqrt(x) => write!(f, "sqrt({})", x),
            Formula::Min(a, b) => write!(f, "min({}, {})", a, b),
            Formula::Max(a, b) => write!(f, "max({}, {})", a, b),
        }
    }
}

impl FromStr for Formula {
    type Err = GuardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Formula::parse(s)
    }
}

impl TryFrom<String> for Formula {
    type Error = GuardError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Formula::parse(&s)
    }
}

impl From<Formula> for String {
    fn from(f: Formula) -> Self {
        f.to_string()
    }
}

/// A parsed subtree and its height (leaves are 0).
type Parsed = (Formula, usize);

struct Parser<'a> {
    input: &'a str,
    bytes: &'a [u8],
    pos: usize,
    depth: usize,
}

impl Parser<'_> {
    fn error(&self, reason: &str) -> GuardError {
        GuardError::Formula {
            input: self.input.to_string(),
            position: self.pos,
            reason: reason.to_string(),
        }
    }

    fn skip_ws(&mut self) {
        while self.pos < self.bytes.len() && self.bytes[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }
    }

    fn peek(&mut self) -> Option<u8> {
        self.skip_ws();
        self.bytes.get(self.pos).copied()
    }

    fn descend(&mut self) -> Result<(), GuardError> {
        self.depth += 1;
        if self.depth > MAX_FORMULA_DEPTH {
            return Err(self.error("nesting too deep"));
        }
        Ok(())
    }

    fn ascend(&mut self) {
        self.depth -= 1;
    }

    /// Attach a node of the given height, rejecting trees that grow too tall.
    fn node(&self, formula: Formula, height: usize) -> Result<Parsed, GuardError> {
        if height > MAX_FORMULA_DEPTH {
            return Err(self.error("nesting too deep"));
        }
        Ok((formula, height))
    }

    fn expect(&mut self, byte: u8) -> Result<(), GuardError> {
        if self.peek() == Some(byte) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.error(&format!("expected '{}'", byte as char)))
        }
    }

    fn expr(&mut self) -> Result<Parsed, GuardError> {
        let (mut lhs, mut height) = self.term()?;
        while let Some(op @ (b'+' | b'-')) = self.peek() {
            self.pos += 1;
            let (rhs, rhs_height) = self.term()?;
            let (lhs_box, rhs_box) = (Box::new(lhs), Box::new(rhs));
            let formula = if op == b'+' {
                Formula::Add(lhs_box, rhs_box)
            } else {
                Formula::Sub(lhs_box, rhs_box)
            };
            (lhs, height) = self.node(formula, 1 + height.max(rhs_height))?;
        }
        Ok((lhs, height))
    }

    fn term(&mut self) -> Result<Parsed, GuardError> {
        let (mut lhs, mut height) = self.unary()?;
        while let Some(op @ (b'*' | b'/')) = self.peek() {
            self.pos += 1;
            let (rhs, rhs_height) = self.unary()?;
            let (lhs_box, rhs_box) = (Box::new(lhs), Box::new(rhs));
            let formula = if op == b'*' {
                Formula::Mul(lhs_box, rhs_box)
            } else {
                Formula::Div(lhs_box, rhs_box)
            };
            (lhs, height) = self.node(formula, 1 + height.max(rhs_height))?;
        }
        Ok((lhs, height))
    }

    fn unary(&mut self) -> Result<Parsed, GuardError> {
        if self.peek() == Some(b'-') {
            self.pos += 1;
            if matches!(self.bytes.get(self.pos), Some(b) if b.is_ascii_digit()) {
                return Ok((Formula::Lit(self.number()?.saturating_neg()), 0));
            }
            self.descend()?;
            let (operand, height) = self.unary()?;
            self.ascend();
            let negated = Formula::Sub(Box::new(Formula::Lit(0)), Box::new(operand));
            return self.node(negated, height + 1);
        }
        self.atom()
    }

    fn atom(&mut self) -> Result<Parsed, GuardError> {
        match self.peek() {
            Some(b'(') => {
                self.pos += 1;
                self.descend()?;
                let inner = self.expr()?;
                self.expect(b')')?;
                self.ascend();
                Ok(inner)
            }
            Some(b) if b.is_ascii_digit() => Ok((Formula::Lit(self.number()?), 0)),
            Some(b) if b.is_ascii_alphabetic() || b == b'_' => self.ident_or_call(),
            Some(_) => Err(self.error("unexpected character")),
            None => Err(self.error("expected operand")),
        }
    }

    fn number(&mut self) -> Result<i64, GuardError> {
        let start = self.pos;
        let mut mantissa: i64 = 0;
        while let Some(&b) = self.bytes.get(self.pos) {
            match b {
                b'0'..=b'9' => {
                    mantissa = mantissa
                        .checked_mul(10)
                        .and_then(|m| m.checked_add(i64::from(b - b'0')))
                        .ok_or_else(|| self.error("number too large"))?;
                }
                b'_' => {}
                _ => break,
            }
            self.pos += 1;
        }

        if self.bytes.get(self.pos) == Some(&b'e') {
            self.pos += 1;
            let exp_start = self.pos;
            while matches!(self.bytes.get(self.pos), Some(b) if b.is_ascii_digit()) {
                self.pos += 1;
            }
            let exponent: u32 = self.input[exp_start..self.pos]
                .parse()
                .map_err(|_| self.error("bad exponent"))?;
            mantissa = 10i64
                .checked_pow(exponent)
                .and_then(|scale| mantissa.checked_mul(scale))
                .ok_or_else(|| self.error("number too large"))?;
        }

        if self.pos == start {
            return Err(self.error("expected number"));
        }
        Ok(mantissa)
    }

    fn ident_or_call(&mut self) -> Result<Parsed, GuardError> {
        let start = self.pos;
        while matches!(self.bytes.get(self.pos), Some(b) if b.is_ascii_alphanumeric() || *b == b'_')
        {
            self.pos += 1;
        }
        let name = &self.input[start..self.pos];

        if self.peek() != Some(b'(') {
            return Ok((Formula::Param(name.to_string()), 0));
        }
        self.pos += 1;
        self.descend()?;

        let (formula, height) = match name {
            "log2" | "sqrt" => {
                let (arg, height) = self.expr()?;
                let arg = Box::new(arg);
                if name == "log2" {
                    (Formula::Log2(arg), height)
                } else {
                    (Formula::Sqrt(arg), height)
                }
            }
            "min" | "max" => {
                let (a, a_height) = self.expr()?;
                self.expect(b',')?;
                let (b, b_height) = self.expr()?;
                let (a, b) = (Box::new(a), Box::new(b));
                let height = a_height.max(b_height);
                if name == "min" {
                    (Formula::Min(a, b), height)
                } else {
                    (Formula::Max(a, b), height)
                }
            }
            _ => {
                self.pos = start;
                return Err(self.error(&format!("unknown function '{}'", name)));
            }
        };
        self.expect(b')')?;
        self.ascend();
        self.node(formula, height + 1)
    }
}

// ============================================================================
// THRESHOLDS
// ============================================================================

fn default_floor() -> i64 {
    DEFAULT_FLOOR
}

/// The bound an invariant compares against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Threshold {
    Constant {
        value: Scalar,
    },
    Derived {
        formula: Formula,
        #[serde(default = "default_floor")]
        floor: i64,
    },
}

impl Threshold {
    pub fn constant(value: impl Into<Scalar>) -> Self {
        Threshold::Constant {
            value: value.into(),
        }
    }

    pub fn derived(formula: Formula) -> Self {
        Threshold::Derived {
            formula,
            floor: DEFAULT_FLOOR,
        }
    }

    /// Change the clamp of a derived threshold. No effect on constants.
    pub fn with_floor(self, floor: i64) -> Self {
        match self {
            Threshold::Derived { formula, .. } => Threshold::Derived { formula, floor },
            constant => constant,
        }
    }

    /// Parse threshold text: a bare number is a constant, anything else a formula.
    ///
    /// Non-finite float spellings (`inf`, `nan`) are not constants; they read
    /// as parameter names.
    pub fn parse(input: &str) -> Result<Self, GuardError> {
        match input.parse::<Scalar>() {
            Ok(Scalar::Float(v)) if !v.is_finite() => {}
            Ok(value) => return Ok(Threshold::constant(value)),
            Err(_) => {}
        }
        Formula::parse(input).map(Threshold::derived)
    }

    /// Resolve against the current size parameters.
    pub fn resolve(&self, sizes: &SizeParams) -> Scalar {
        match self {
            Threshold::Constant { value } => *value,
            Threshold::Derived { formula, floor } => {
                let bound = formula.eval(sizes).max(*floor);
                check_bound_respects_floor(bound, *floor);
                Scalar::Int(bound)
            }
        }
    }
}

impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Threshold::Constant { value } => write!(f, "{}", value),
            Threshold::Derived { formula, floor } if *floor == DEFAULT_FLOOR => {
                write!(f, "{}", formula)
            }
            Threshold::Derived { formula, floor } => write!(f, "max({}, {})", formula, floor),
        }
    }
}
