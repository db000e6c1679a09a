//! # Press Infrastructure
//!
//! Filesystem implementations of the ports defined in `press-core`:
//! the Markdown post store and the content-addressed media store.

pub mod media;
pub mod posts;

pub use media::FsMediaStore;
pub use posts::FsPostRepository;
