//! In-memory adapters.
//!
//! Accounts, enrolments and wiki articles live for the lifetime of the
//! process. Each adapter guards its state with an `RwLock`; a poisoned lock
//! surfaces as the port's `Backend` error rather than a panic.

mod accounts;
mod courses;
mod enrollments;
mod wiki;

pub use accounts::InMemoryAccountRepository;
pub use courses::InMemoryCourseStore;
pub use enrollments::InMemoryEnrollmentRepository;
pub use wiki::InMemoryWikiRepository;

const POISONED: &str = "state lock poisoned";
