//! # xfer-core
//!
//! Core types and pure computations for transfer request tracking.
//!
//! This crate provides the foundational types shared across all xfer crates:
//! - Status, variant and audit action enums with their static lookup tables
//! - Entity structs for requests and audit entries
//! - The status flow registry (canonical stage order per variant)
//! - The progress calculator used for bulk list annotations
//! - The timeline reconstruction engine used for detail views
//! - Clock and actor directory seams for the engine
//! - Cross-cutting error types
//!
//! Nothing in this crate performs I/O. Persistence lives in `xfer-db`.

pub mod audit_detail;
pub mod clock;
pub mod directory;
pub mod entities;
pub mod enums;
pub mod errors;
pub mod flow;
pub mod progress;
pub mod timeline;
