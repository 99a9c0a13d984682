//! File manipulation.

pub mod upload;
