//! Wire model shared by the contact backend and its clients.
//!
//! - `model`: the form's fields, the normalized submission and the stored record.
//! - `requests`: JSON bodies and query strings accepted by the API.
//! - `responses`: payloads the API produces (redisplay, receipt, probes).

pub mod model;
pub mod requests;
pub mod responses;
