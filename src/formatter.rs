//! The formatter contract.
//!
//! A formatter is a mutable sink that receives expression trees (or plain text,
//! or interchange values) and exposes the materialized result through
//! [`Formatter::data`]. Trees never depend on a concrete output: formatting an
//! expression is a double dispatch, `expr.format(f, ..)` calling
//! `f.append(expr, ..)`.

use crate::{Grammar, Result, Value};
use std::hash::Hash;

pub trait Formatter<G: Grammar>: PartialEq + Hash + Sized {
    type Output;

    /// Projects an expression into this formatter's output.
    fn append(&mut self, expr: &G::Expr, syntax: &G, params: &mut G::Params) -> Result<()>;

    /// Appends already formatted text.
    fn append_str(&mut self, text: &str) -> Result<()>;

    /// Appends a sequence of interchange values.
    fn append_values(&mut self, values: &[Value]) -> Result<()>;

    /// The output materialized so far.
    fn data(&self) -> Self::Output;

    /// An empty formatter carrying the same configuration.
    #[must_use]
    fn reverse(&self) -> Self;
}

/// A node a [`Formatter`] can receive.
pub trait Expression<G: Grammar<Expr = Self>>: Sized {
    fn format<F: Formatter<G>>(
        &self,
        formatter: &mut F,
        syntax: &G,
        params: &mut G::Params,
    ) -> Result<()> {
        formatter.append(self, syntax, params)
    }
}
