//! Wire protocol
//!
//! One filtered sample per frame:
//!
//! ```text
//! +------+------------------------------+-------+
//! | 0xFF | 9 x f32 little-endian (36 B) | CRC-8 |
//! +------+------------------------------+-------+
//! ```

pub mod codec;
