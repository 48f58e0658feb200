//! Hangar serves Squirrel.Windows-style application updates out of a GitHub
//! repository's latest release: a cached `RELEASES` feed plus per-asset
//! redirects to short-lived download URLs.
//!
//! The heavy lifting (fetching, validation, caching) lives in `hangar-core`;
//! this crate wires configuration, logging, and the HTTP surface around it.

pub mod config;
pub mod logging;
pub mod routes;
pub mod server;
