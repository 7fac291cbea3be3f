pub mod gateway;
pub mod historical;
pub mod hours;
pub mod simulated;
pub mod snapshot;
pub mod stream;
pub mod types;

#[cfg(test)]
mod stream_tests;
