//! Core types for the quotekit pricing engine.
//!
//! A quote form is an ordered list of typed [`variable::Variable`]s; a price
//! formula references them through stable slug tokens. This crate holds the
//! variable model, raw input values, slug derivation, and structural
//! validation shared by the formula engine and the CLI.

pub mod enums;
pub mod slug;
pub mod validation;
pub mod value;
pub mod variable;
