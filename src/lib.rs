// Library target: the practice engine without the terminal front-end, so the
// integration tests and benchmarks can drive it directly.

pub mod config;
pub mod feedback;
pub mod highlight;
pub mod session;
pub mod snippet;
pub mod store;
