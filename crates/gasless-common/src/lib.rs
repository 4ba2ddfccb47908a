pub mod concurrency;
pub mod macros;
pub mod service;
