//! Caching layer built on Redis.

pub mod cache_interface;
pub mod cache_keys;
pub mod redis_cache;

pub use cache_interface::{CacheExt, CacheInterface};
pub use redis_cache::{RedisCacheService, DEFAULT_TTL};
