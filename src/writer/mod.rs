//! Output artifacts for a compiled script.
pub mod c;
pub mod json;
