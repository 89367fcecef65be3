//! Data types for the stampifier library.

pub mod config;
pub mod content;
pub mod descriptors;
pub mod stamp_page;
