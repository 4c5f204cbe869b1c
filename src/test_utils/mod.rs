//! Consolidated test utilities for the fantasy price scraper.
//!
//! Fixtures for payloads and capture times, plus mock payload sources and
//! report sinks used by the pipeline and scheduler tests.

#![cfg(test)]

pub mod fixtures;
pub mod mocks;
