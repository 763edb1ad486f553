//! Outbound adapters implementing domain ports.
//!
//! - **content**: course manifests and resource files on disk, read through
//!   `cap_std`.
//! - **memory**: process-local accounts, enrolments, wiki articles and an
//!   in-memory content store.
//! - **accounts_seed**: start-up provisioning of accounts from JSON.
//!
//! Adapters translate between storage representations and domain types.
//! They contain no business logic.

pub mod accounts_seed;
pub mod content;
pub mod memory;
