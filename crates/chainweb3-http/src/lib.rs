//! chainweb3-http — JSON-RPC over HTTP POST.
//!
//! # Quick start
//! ```rust,no_run
//! use chainweb3_http::HttpProvider;
//!
//! let provider = HttpProvider::connect("localhost:8545").unwrap();
//! ```

pub mod client;

pub use client::{normalize_host, HttpProvider, HttpProviderConfig};
