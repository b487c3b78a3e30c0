//! Unicode text utilities shared by the annotation crates.

pub mod chars;
pub mod words;
