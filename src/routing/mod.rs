//! Request routing module
//!
//! Decomposes raw request paths into routed forms. The parser is the only
//! component that understands the URL grammar; everything downstream works
//! with the typed `Route` value.

pub mod parser;

pub use parser::{parse, Extension, IconRequest, ParseError, Route};
