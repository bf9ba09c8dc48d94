//! Common utilities for the Marmot layout engine.
//!
//! This crate provides shared infrastructure used by all engine components:
//! - **Warning System** - colored terminal output for unsupported features

pub mod warning;
