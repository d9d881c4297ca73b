//! # ccube-store
//!
//! File system access to the C-Cube QA store.
//!
//! The store is a tree of JSON files and is the only source of truth.
//! Every read goes to disk; there is no cache to invalidate. A missing
//! primary file is `NotFound`; a missing secondary file found during a scan
//! is skipped.

pub mod layout;
pub mod store;

pub use layout::Layout;
pub use store::QaStore;
