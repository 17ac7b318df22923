//! Index Snapshot - S&P index constituents with valuation signals
//!
//! This library fetches the member lists of two S&P indices, enriches
//! each constituent with a recent closing price and dividend yield from
//! Yahoo Finance, and serializes the combined table to CSV.

pub mod cli;
pub mod config;
pub mod constituents;
pub mod error;
pub mod export;
pub mod pipeline;
pub mod pricing;
