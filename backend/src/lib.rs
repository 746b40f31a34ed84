//! Contact form backend.
//!
//! A submission travels `services::contact` (multipart intake) →
//! `contact::coordinator` (runs every validator in `contact::validators`) →
//! either a redisplay payload or `storage` (SQLite, hosted table or memory).

pub mod config;
pub mod contact;
pub mod services;
pub mod state;
pub mod storage;
