//! URI literal construction for operation parameters.
//!
//! Two escaping strategies exist. Literals that may contain quote
//! delimiters (primitives, enums, `null`) use [`escape_quoted_literal`];
//! JSON-shaped literals of complex and collection values use
//! [`escape_data_string`].

// -----------------------------------------------------------------------------
// Modules

mod escape;
mod literal;

// -----------------------------------------------------------------------------
// Exports

pub use escape::{escape_data_string, escape_quoted_literal};

pub(crate) use literal::UriLiteral;
