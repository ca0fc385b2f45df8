//! EAN-13 decoding modules
//!
//! This module turns one scanline into a validated code:
//! - Run-length extraction and module width estimation
//! - Tolerant digit matching against the L/G/R symbol tables
//! - Guard search over start offsets, forward and reversed
//! - Check digit computation

/// EAN-13 check digit
pub mod checksum;
/// Guard search and digit decoding over a run sequence
pub mod ean13;
/// Run-width normalization and digit lookup
pub mod pattern;
/// Run lengths and module width estimate
pub mod runs;
/// L/G/R symbol tables and leading-digit parity
pub mod tables;

pub use ean13::{DecodeOptions, SymbolRead, decode_scanline, encode_modules};
pub use runs::{ModuleWidth, RunLengths};
