//! Helpers shared across layers.
//!
//! - [`code_generator`] - Short code generation and alias validation
//! - [`destination`] - Destination URL validation

pub mod code_generator;
pub mod destination;
