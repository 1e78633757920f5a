//! Stream statistics

pub mod store;
