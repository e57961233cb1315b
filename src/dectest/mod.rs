#![cfg(test)]

use std::{error, fmt};

use anyhow::{anyhow, bail, Context, Result};

use crate::{
    ctx::{Condition, Ctx, RoundingMode},
    decnumber::Quad,
    dpd::Dpd128,
    encode::encode,
};

/// Parses the test cases in a decTest file.
pub fn parse(s: &str) -> Result<Vec<Case<'_>>> {
    let mut ctx = Ctx::new();
    let mut cases = Vec::new();
    for (i, line) in s.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with("--") {
            continue;
        }

        if !line.contains("->") {
            let (key, v) = line
                .split_once(':')
                .with_context(|| format!("#{i}: expected a directive: `{line}`"))?;
            ctx = directive(ctx, key.trim(), v.trim()).with_context(|| format!("#{i}"))?;
            continue;
        }

        let tokens = tokenize(line).with_context(|| format!("#{i}: `{line}`"))?;
        let case = Case::parse(ctx, &tokens).with_context(|| format!("#{i}: `{line}`"))?;
        cases.push(case);
    }
    if cases.is_empty() {
        bail!("no test cases");
    }
    Ok(cases)
}

/// Applies a `key: value` directive to `ctx`.
fn directive(ctx: Ctx, key: &str, v: &str) -> Result<Ctx> {
    let ctx = match key.to_ascii_lowercase().as_str() {
        "precision" => ctx.with_precision(
            v.parse()
                .with_context(|| format!("unable to parse `precision`: `{v}`"))?,
        ),
        "rounding" => ctx.with_rounding_mode(
            RoundingMode::try_from_str(v)
                .with_context(|| format!("invalid rounding mode: `{v}`"))?,
        ),
        "maxexponent" => ctx.with_max_exp(
            v.parse()
                .with_context(|| format!("unable to parse `maxExponent`: `{v}`"))?,
        ),
        "minexponent" => ctx.with_min_exp(
            v.parse()
                .with_context(|| format!("unable to parse `minExponent`: `{v}`"))?,
        ),
        "extended" => ctx.with_extended(flag(v).context("unable to parse `extended`")?),
        "clamp" => ctx.with_clamp(flag(v).context("unable to parse `clamp`")?),
        "version" | "dectest" => ctx,
        _ => bail!("unknown directive: `{key}`"),
    };
    Ok(ctx)
}

fn flag(v: &str) -> Result<bool> {
    match v {
        "0" => Ok(false),
        "1" => Ok(true),
        _ => bail!("expected 0 or 1: `{v}`"),
    }
}

/// Splits a test case into tokens.
///
/// Tokens are separated by whitespace and may be quoted. A token
/// starting with `--` begins a comment.
fn tokenize(line: &str) -> Result<Vec<&str>> {
    let mut tokens = Vec::new();
    let mut s = line.trim_start();
    while !s.is_empty() {
        if s.starts_with("--") {
            break;
        }
        let quote = s.chars().next().filter(|c| matches!(c, '\'' | '"'));
        let (tok, rest) = match quote {
            Some(q) => s[1..]
                .split_once(q)
                .with_context(|| format!("unterminated quote: `{s}`"))?,
            None => s.split_once(char::is_whitespace).unwrap_or((s, "")),
        };
        tokens.push(tok);
        s = rest.trim_start();
    }
    Ok(tokens)
}

/// A single test case.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Case<'a> {
    pub ctx: Ctx,
    pub name: &'a str,
    pub op: Op<'a>,
    pub result: &'a str,
    pub conditions: Condition,
}

impl<'a> Case<'a> {
    fn parse(ctx: Ctx, tokens: &[&'a str]) -> Result<Self> {
        let arrow = tokens
            .iter()
            .position(|&tok| tok == "->")
            .context("missing `->`")?;
        let (lhs, rhs) = tokens.split_at(arrow);
        let (&name, rest) = lhs.split_first().context("missing test case name")?;
        let (&op, operands) = rest.split_first().context("missing op")?;
        let op = Op::parse(op, operands)?;
        let (&result, conditions) = rhs
            .get(1..)
            .and_then(|rhs| rhs.split_first())
            .context("missing result")?;
        let conditions = conditions
            .iter()
            .map(|c| condition(c))
            .collect::<Result<Condition>>()?;
        Ok(Self {
            ctx,
            name,
            op,
            result,
            conditions,
        })
    }

    pub fn run<B: Backend>(&self) -> Result<(), Error<'_>> {
        if !B::supports(&self.ctx) {
            return Err(Error::Skipped);
        }
        match self.op {
            Op::Apply { input } if !input.starts_with('#') => self
                .try_run::<B>(input)
                .map_err(|err| Failure { case: self, err }.into()),
            // Decoding and arithmetic.
            _ => Err(Error::Skipped),
        }
    }

    fn try_run<B: Backend>(&self, input: &str) -> Result<()> {
        let got = B::encode(input, &self.ctx);
        let want = self.want()?.only(B::REPORTED);
        if got != want {
            bail!("got {got}, expected {want}");
        }
        Ok(())
    }

    fn want(&self) -> Result<Outcome> {
        if self.conditions.contains(Condition::CONVERSION_SYNTAX) {
            return Ok(Outcome::Invalid);
        }
        let hex = self
            .result
            .strip_prefix('#')
            .with_context(|| format!("expected an encoding: `{}`", self.result))?;
        let bytes: [u8; 16] = hex::decode(hex)?
            .try_into()
            .map_err(|b: Vec<u8>| anyhow!("expected 16 bytes, got {}", b.len()))?;
        Ok(Outcome::Value {
            bits: u128::from_be_bytes(bytes),
            status: self.conditions,
        })
    }
}

impl fmt::Display for Case<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} -> {}", self.name, self.op, self.result)?;
        if !self.conditions.is_empty() {
            write!(f, " {:?}", self.conditions)?;
        }
        Ok(())
    }
}

/// Parses a decTest condition name.
fn condition(s: &str) -> Result<Condition> {
    let c = match s.to_ascii_lowercase().as_str() {
        "clamped" => Condition::CLAMPED,
        "conversion_syntax" => Condition::CONVERSION_SYNTAX,
        "division_by_zero" => Condition::DIVISION_BY_ZERO,
        "division_impossible" => Condition::DIVISION_IMPOSSIBLE,
        "division_undefined" => Condition::DIVISION_UNDEFINED,
        "inexact" => Condition::INEXACT,
        "insufficient_storage" => Condition::INSUFFICIENT_STORAGE,
        "invalid_context" => Condition::INVALID_CONTEXT,
        "invalid_operation" => Condition::INVALID_OPERATION,
        "overflow" => Condition::OVERFLOW,
        "rounded" => Condition::ROUNDED,
        "subnormal" => Condition::SUBNORMAL,
        "underflow" => Condition::UNDERFLOW,
        _ => bail!("unknown condition: `{s}`"),
    };
    Ok(c)
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Op<'a> {
    /// Converts `input` to or from its encoding.
    Apply { input: &'a str },
    /// Any other operation.
    Other { name: &'a str },
}

impl<'a> Op<'a> {
    fn parse(name: &'a str, operands: &[&'a str]) -> Result<Self> {
        let op = match name.to_ascii_lowercase().as_str() {
            "apply" => match operands {
                &[input] => Self::Apply { input },
                _ => bail!("`apply` takes one operand, got {}", operands.len()),
            },
            _ => Self::Other { name },
        };
        Ok(op)
    }
}

impl fmt::Display for Op<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Apply { input } => write!(f, "apply '{input}'"),
            Self::Other { name } => write!(f, "{name} ..."),
        }
    }
}

/// What a backend made of an input.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Outcome {
    Value { bits: u128, status: Condition },
    Invalid,
}

impl Outcome {
    /// Drops the conditions outside of `reported`.
    fn only(self, reported: Condition) -> Self {
        match self {
            Self::Value { bits, status } => Self::Value {
                bits,
                status: status & reported,
            },
            Self::Invalid => Self::Invalid,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value { bits, status } => write!(f, "#{bits:032x} {status:?}"),
            Self::Invalid => write!(f, "invalid"),
        }
    }
}

#[derive(Debug)]
pub enum Error<'a> {
    Skipped,
    Failure(Failure<'a>),
}

impl error::Error for Error<'_> {}

impl fmt::Display for Error<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Skipped => write!(f, "skipped"),
            Self::Failure(err) => write!(f, "{err}"),
        }
    }
}

impl<'a> From<Failure<'a>> for Error<'a> {
    fn from(err: Failure<'a>) -> Self {
        Self::Failure(err)
    }
}

/// A test case failure.
pub struct Failure<'a> {
    case: &'a Case<'a>,
    err: anyhow::Error,
}

impl error::Error for Failure<'_> {}

impl fmt::Display for Failure<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "test failure for `{}`: {}", self.case, self.err)
    }
}

impl fmt::Debug for Failure<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// A decimal128 encoder under test.
pub trait Backend {
    /// The conditions the backend raises.
    const REPORTED: Condition = Condition::all();

    /// Reports whether the backend honors `ctx`.
    fn supports(ctx: &Ctx) -> bool;

    fn encode(s: &str, ctx: &Ctx) -> Outcome;
}

impl Backend for Dpd128 {
    fn supports(_ctx: &Ctx) -> bool {
        true
    }

    fn encode(s: &str, ctx: &Ctx) -> Outcome {
        match encode(s, ctx) {
            Ok(enc) => Outcome::Value {
                bits: enc.value.to_bits(),
                status: enc.status,
            },
            Err(_) => Outcome::Invalid,
        }
    }
}

impl Backend for Quad {
    const REPORTED: Condition = Quad::REPORTED;

    /// decNumber's decQuad ignores everything but the rounding
    /// mode.
    fn supports(ctx: &Ctx) -> bool {
        let d128 = Ctx::new();
        ctx.precision() == d128.precision()
            && ctx.max_exp() == d128.max_exp()
            && ctx.min_exp() == d128.min_exp()
            && ctx.clamp()
    }

    fn encode(s: &str, _ctx: &Ctx) -> Outcome {
        let (d, status) = Quad::parse(s);
        if status.contains(Condition::CONVERSION_SYNTAX) {
            Outcome::Invalid
        } else {
            Outcome::Value {
                bits: d.to_bits(),
                status,
            }
        }
    }
}
