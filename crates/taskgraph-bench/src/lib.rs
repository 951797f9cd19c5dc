//! Task plan generator and benchmark utilities for `taskgraph-core`.
//!
//! This crate provides deterministic generation of layered task plans for
//! benchmarking and property-based testing of the dependency graph engine.

pub mod correctness;
pub mod generator;

pub use generator::{GeneratorConfig, SizeTier, generate_plan};
