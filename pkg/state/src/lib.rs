pub mod cache;
pub mod client;

pub use cache::{CacheSnapshot, ObjectCache};
pub use client::StateStore;
