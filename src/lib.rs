//! `webkit-filters` compiles ABP/uBlock Origin filter lists into WebKit
//! content blocker JSON.
//!
//! The pipeline is strictly one-directional: raw text is classified into
//! typed [`filters::Filter`] records, URL patterns are translated into
//! WebKit's restricted regex dialect and validated against it, and each
//! filter is lowered into zero or more [`content_blocking::CbRule`]s.
//! Filters the target engine cannot express are dropped per-filter with an
//! accounted reason; no input line ever aborts a run.

pub mod config;
pub mod content_blocking;
pub mod convert;
pub mod fetch;
pub mod filters;
pub mod manifest;
pub mod pattern;
pub mod split;
