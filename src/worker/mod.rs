pub mod cache;
pub mod cache_worker;
pub mod fetch;
pub mod policy;
pub mod protocol;
