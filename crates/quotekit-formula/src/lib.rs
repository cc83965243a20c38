//! Formula engine for the quotekit pricing system.
//!
//! A formula is an arithmetic expression over tokens contributed by an
//! ordered list of typed variables. Pricing is a pure, synchronous pass:
//! the resolver decides each variable's effective value (own input vs.
//! conditional default), the coercer maps effective values to per-token
//! numeric contributions, and the evaluator substitutes and folds the
//! expression, then rounds and clamps.

pub mod coerce;
pub mod engine;
pub mod eval;
pub mod parser;
pub mod resolve;
pub mod types;
