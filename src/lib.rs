//! ethutil: ABI-driven signature matching and parameter decoding for
//! Ethereum nodes, plus the node commands built on it.

pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod modules;
pub mod ui;
