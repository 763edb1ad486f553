//! HTTP inbound adapter: JSON endpoints under `/api/v1`, wiki pages and
//! health probes.

pub mod accounts;
pub mod auth;
pub mod courses;
pub mod error;
pub mod health;
pub mod session;
pub mod state;
#[cfg(any(test, feature = "test-support"))]
pub mod test_utils;
pub mod wiki;

pub use error::ApiResult;
