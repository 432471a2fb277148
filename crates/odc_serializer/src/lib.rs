#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

// -----------------------------------------------------------------------------
// no_std support

extern crate alloc;

#[cfg(test)]
extern crate std;

// -----------------------------------------------------------------------------
// Modules

mod error;
mod serializer;
mod settings;

pub mod graph;
pub mod model;
pub mod node;
pub mod uri;
pub mod writer;

#[cfg(test)]
mod testing;

// -----------------------------------------------------------------------------
// Top-Level exports

pub use error::{GraphError, ProtocolUsageError, SerializeError};
pub use graph::GraphConverter;
pub use serializer::{EntryWriter, Serializer};
pub use settings::SerializerSettings;
