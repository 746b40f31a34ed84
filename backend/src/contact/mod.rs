//! The validation core: raw form input, per-field validators and the
//! coordinator that aggregates them.

pub mod coordinator;
pub mod raw;
pub mod redisplay;
pub mod validators;

pub use coordinator::{accept, evaluate, submit, Evaluation, RequestContext};
pub use raw::{RawFile, RawSubmission};
