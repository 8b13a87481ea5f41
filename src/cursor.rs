//! Byte- and word-granular cursors over raw memory.
//!
//! A copy call keeps reinterpreting the same two addresses as a byte stream
//! and as a word stream. Instead of scattering pointer casts through the copy
//! loops, each side gets a cursor exposing both granularities; the
//! word-granular accessors check alignment in debug builds unless the caller
//! opts into unaligned access.
#![allow(unsafe_code)]

/// Native machine word, the bulk-transfer unit.
pub const WORD_BYTES: usize = size_of::<usize>();

/// Low address bits that must be zero for word alignment.
pub const WORD_MASK: usize = WORD_BYTES - 1;

/// Read-only cursor over the source region.
pub struct SrcCursor {
    ptr: *const u8,
}

impl SrcCursor {
    #[inline(always)]
    pub fn new(ptr: *const u8) -> Self {
        Self { ptr }
    }

    /// Byte offset of the cursor within its containing word.
    #[inline(always)]
    pub fn offset_in_word(&self) -> usize {
        self.ptr as usize & WORD_MASK
    }

    /// Read one byte and advance past it.
    ///
    /// # Safety
    ///
    /// The cursor must be readable for one byte.
    #[inline(always)]
    pub unsafe fn take_byte(&mut self) -> u8 {
        let b = *self.ptr;
        self.ptr = self.ptr.add(1);
        b
    }

    /// Step back `n` bytes.
    ///
    /// # Safety
    ///
    /// The resulting address must stay inside the same allocation.
    #[inline(always)]
    pub unsafe fn back_up(&mut self, n: usize) {
        self.ptr = self.ptr.sub(n);
    }

    /// Advance `n` bytes.
    ///
    /// # Safety
    ///
    /// The resulting address must stay inside the same allocation.
    #[inline(always)]
    pub unsafe fn skip(&mut self, n: usize) {
        self.ptr = self.ptr.add(n);
    }

    /// Read the word sitting `idx` words ahead of the cursor.
    ///
    /// With `ANY_ALIGN` the load tolerates any address; otherwise the cursor
    /// must sit on a word boundary (checked in debug builds).
    ///
    /// # Safety
    ///
    /// The addressed word must be readable.
    #[inline(always)]
    pub unsafe fn word<const ANY_ALIGN: bool>(&self, idx: usize) -> usize {
        let p = self.ptr.add(idx * WORD_BYTES) as *const usize;
        if ANY_ALIGN {
            p.read_unaligned()
        } else {
            debug_assert!(p as usize & WORD_MASK == 0, "word read from unaligned address");
            p.read()
        }
    }

    /// Advance `n` words.
    ///
    /// # Safety
    ///
    /// The resulting address must stay inside the same allocation.
    #[inline(always)]
    pub unsafe fn advance_words(&mut self, n: usize) {
        self.ptr = self.ptr.add(n * WORD_BYTES);
    }
}

/// Write cursor over the destination region.
pub struct DstCursor {
    ptr: *mut u8,
}

impl DstCursor {
    #[inline(always)]
    pub fn new(ptr: *mut u8) -> Self {
        Self { ptr }
    }

    /// Whether the cursor sits on a word boundary.
    #[inline(always)]
    pub fn is_word_aligned(&self) -> bool {
        self.ptr as usize & WORD_MASK == 0
    }

    /// Write one byte and advance past it.
    ///
    /// # Safety
    ///
    /// The cursor must be writable for one byte.
    #[inline(always)]
    pub unsafe fn put_byte(&mut self, b: u8) {
        *self.ptr = b;
        self.ptr = self.ptr.add(1);
    }

    /// Write the word slot sitting `idx` words ahead of the cursor.
    ///
    /// With `ANY_ALIGN` the store tolerates any address; otherwise the cursor
    /// must sit on a word boundary (checked in debug builds).
    ///
    /// # Safety
    ///
    /// The addressed word must be writable.
    #[inline(always)]
    pub unsafe fn set_word<const ANY_ALIGN: bool>(&mut self, idx: usize, w: usize) {
        let p = self.ptr.add(idx * WORD_BYTES) as *mut usize;
        if ANY_ALIGN {
            p.write_unaligned(w);
        } else {
            debug_assert!(p as usize & WORD_MASK == 0, "word write to unaligned address");
            p.write(w);
        }
    }

    /// Advance `n` words.
    ///
    /// # Safety
    ///
    /// The resulting address must stay inside the same allocation.
    #[inline(always)]
    pub unsafe fn advance_words(&mut self, n: usize) {
        self.ptr = self.ptr.add(n * WORD_BYTES);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[repr(align(8))]
    struct Aligned([u8; 16]);

    #[test]
    fn test_byte_and_word_views_agree() {
        let buf = Aligned(core::array::from_fn(|i| i as u8));
        let mut s = SrcCursor::new(buf.0.as_ptr());

        assert_eq!(s.offset_in_word(), 0);
        let w = unsafe { s.word::<false>(0) };
        assert_eq!(
            w,
            usize::from_ne_bytes(buf.0[..WORD_BYTES].try_into().unwrap())
        );

        unsafe {
            s.skip(1);
            assert_eq!(s.offset_in_word(), 1);
            assert_eq!(s.take_byte(), 1);
            s.back_up(2);
        }
        assert_eq!(s.offset_in_word(), 0);
    }

    #[test]
    fn test_dst_cursor_writes_and_advances() {
        let mut buf = Aligned([0u8; 16]);
        let mut d = DstCursor::new(buf.0.as_mut_ptr());

        assert!(d.is_word_aligned());
        unsafe {
            d.put_byte(0xab);
            assert!(!d.is_word_aligned());
            d.put_byte(0xcd);
        }
        assert_eq!(&buf.0[..2], &[0xab, 0xcd]);
    }

    #[test]
    fn test_word_slot_indexing() {
        let mut buf = Aligned([0u8; 16]);
        let mut d = DstCursor::new(buf.0.as_mut_ptr());
        unsafe {
            d.set_word::<false>(1, usize::MAX);
        }
        assert!(buf.0[..WORD_BYTES].iter().all(|&b| b == 0));
        assert!(buf.0[WORD_BYTES..2 * WORD_BYTES].iter().all(|&b| b == 0xff));
    }
}
