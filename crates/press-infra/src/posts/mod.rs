//! Post storage.

mod fs_repository;

#[cfg(test)]
mod tests;

pub use fs_repository::FsPostRepository;
