//! Fixed-capacity sample storage
//!
//! - Overwrite-oldest circular buffer backing each filter channel ([`ring`])

pub mod ring;
