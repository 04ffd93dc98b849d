//! Primitive decoders shared by the format parsers
//!
//! - [`binary`]: fixed-width little-endian integers, floats and string fields
//! - [`text`]: line reading and `strtod`-style number scanning

pub mod binary;
pub mod text;
