pub mod sql;
pub mod username_cache;
