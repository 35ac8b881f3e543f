//! ergosig - Ergonomic field specifications for prompt signatures
//!
//! Turns compact field specs such as `"rating: float; Score 1-10"` into
//! typed, described, role-tagged fields ready for a prompting engine.
//!
//! # Architecture
//!
//! ```text
//! FieldSpec → Field Spec Parser → FieldDescriptor
//!                  ↓
//!           Type Expression Parser (list[T], dict[K, V], recursive)
//!                  ↓
//!           Signature Builder → Signature (inputs, outputs, instruction)
//! ```
//!
//! # Field spec forms
//!
//! | Spec                                   | Type            | Description   |
//! |----------------------------------------|-----------------|---------------|
//! | `"topic"`                              | `str`           | none          |
//! | `"count: int"`                         | `int`           | none          |
//! | `"tags: list[str]; Search tags"`       | `list[str]`     | `Search tags` |
//! | `"notes; Free-form notes"`             | `str`           | `Free-form notes` |
//! | `"query: 'User question'"`             | `str`           | `User question` |
//! | `("limit", FieldType::Integer)`        | `int`           | none          |
//! | `("answer", "The response")`           | `str`           | `The response` |
//! | `("n", FieldType::Integer, "Count")`   | `int`           | `Count`       |
//!
//! # Guarantees
//!
//! - **Pure**: no I/O, no shared state; every call is independent
//! - **Lenient on type names**: unknown type names become `str`
//! - **Strict on structure**: broken brackets, bad tuple arity and
//!   duplicate names are errors

pub mod config;
pub mod error;
pub mod parser;
pub mod signature;

pub use config::BuildOptions;
pub use error::{Error, Result};
pub use parser::ast::*;
pub use parser::parse_field;
pub use parser::type_expr::{parse_type_expr, MAX_TYPE_DEPTH};
pub use signature::{
    build_signature, FieldRole, Signature, SignatureBuilder, SignatureField, SpecList,
};
