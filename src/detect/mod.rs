//! Content change detection.
//!
//! A payload is fingerprinted exactly as received and compared against the
//! last accepted fingerprint kept in a single-slot store.

pub mod detector;
pub mod fingerprint;
pub mod store;

pub use detector::ChangeDetector;
pub use fingerprint::Fingerprint;
pub use store::FileFingerprintStore;
