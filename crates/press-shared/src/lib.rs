//! # Press Shared
//!
//! Wire types for the admin API: response envelopes and request/response DTOs.

pub mod dto;
pub mod response;

pub use response::{ApiResponse, ErrorResponse};
