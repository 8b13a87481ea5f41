//! wordcopy: word-oriented memory copy for hardware which doesn't handle
//! unaligned memory accesses efficiently.

pub mod cursor;
pub mod mem;
pub mod memcpy;
