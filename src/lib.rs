#![doc = include_str!("../README.md")]

mod builder;
mod cache;
mod entry;
mod error;
mod guard;
mod list;
mod pool;
mod store;

pub use builder::CacheBuilder;
pub use cache::Cache;
pub use error::Error;
pub use guard::Guard;
