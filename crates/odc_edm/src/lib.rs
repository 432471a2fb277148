#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

// -----------------------------------------------------------------------------
// no_std support

// The registry caches are guarded by `std::sync::Mutex`.
extern crate std;

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod error;
mod kind;
mod markup;
mod token;

pub mod convert;
pub mod native;
pub mod registry;
pub mod value;

// -----------------------------------------------------------------------------
// Top-Level exports

pub use error::{EdmError, FormatError, TypeResolutionError};
pub use kind::PrimitiveKind;
pub use markup::{MarkupReader, StrMarkupReader};
pub use token::ParserToken;

pub use convert::NumericParsing;
pub use native::{Native, NativeType};
pub use registry::{PrimitiveDescriptor, TypeRegistry, TypeRegistryBuilder};
pub use value::{Decimal, PrimitiveValue};
