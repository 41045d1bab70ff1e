//! # pv-core
//!
//! Core types for post-build image validation.
//!
//! A validation run produces one [`CheckResult`] per registered check. Results
//! are appended to a [`ResultLog`], which keeps insertion order and a running
//! [`Summary`]. Once the run completes, the summary is classified into a
//! [`Verdict`]:
//!
//! | Verdict | Condition (evaluated in order) |
//! |---------|--------------------------------|
//! | Ready | `failed == 0 && passed >= 12` |
//! | Conditional | `failed <= 2 && warnings <= 3` |
//! | NotReady | otherwise |

pub mod error;
pub mod log;
pub mod result;
pub mod verdict;

pub use error::CoreError;
pub use log::{ResultLog, Summary};
pub use result::{CheckResult, Status};
pub use verdict::Verdict;
