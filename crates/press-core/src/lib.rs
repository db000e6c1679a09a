//! # Press Core
//!
//! The domain layer of the press admin.
//! Posts, uploads, the on-disk document format and content analysis live here;
//! nothing in this crate touches the filesystem.

pub mod analysis;
pub mod codec;
pub mod domain;
pub mod error;
pub mod ports;
pub mod slug;

pub use error::{DomainError, RepoError};
