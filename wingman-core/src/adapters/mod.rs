//! Adapter implementations
//!
//! Adapters implement the port traits with concrete technologies:
//! - DuckDB for the KeyValueStore port (durable local storage)
//! - An in-memory map for the KeyValueStore port (tests, throwaway sessions)
//! - Gemini HTTP client for the GenerativeModel port

pub mod duckdb;
pub mod gemini;
pub mod memory;
