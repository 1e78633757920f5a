//! Outlier suppression for streamed samples
//!
//! This module contains:
//! - Randomized rank selection over a small working array ([`select`])
//! - Per-channel windowed median filter for 9-axis samples ([`median`])

pub mod median;
pub mod select;
