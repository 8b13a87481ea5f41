//! Word-oriented memcpy for arbitrarily aligned pointers.
//!
//! Four stages run in sequence per call: a length gate, a destination
//! aligner, a bulk word mover (shift-compensated or straight unrolled), and a
//! bytewise tail. On targets that handle unaligned word access efficiently
//! the aligner is skipped and the straight mover runs on the pointers as
//! given.
#![allow(unsafe_code)]

use crate::cursor::{DstCursor, SrcCursor, WORD_BYTES};

/// Minimum size for a word copy to be convenient.
///
/// Below this, alignment probing and distance bookkeeping cost more than the
/// bytes they would save; the whole transfer goes through the byte tail.
pub const MIN_THRESHOLD: usize = WORD_BYTES * 2;

/// Words moved per iteration of the straight path.
const GROUP_WORDS: usize = 8;
const GROUP_BYTES: usize = WORD_BYTES * GROUP_WORDS;

/// Whether the build target handles unaligned word access efficiently.
///
/// A property of the target, fixed at compile time and never re-probed per
/// call. When true, the destination aligner is skipped and the straight
/// mover runs with unaligned loads/stores, which these targets execute at
/// full speed.
pub const EFFICIENT_UNALIGNED_ACCESS: bool = cfg!(any(
    feature = "efficient-unaligned-access",
    target_arch = "x86",
    target_arch = "x86_64",
    target_arch = "aarch64",
));

/// Copy `n` bytes from `src` to `dest`, returning `dest` unchanged.
///
/// Transfers shorter than [`MIN_THRESHOLD`] are copied a byte at a time.
/// Longer transfers move whole machine words, reconstructing across the
/// source/destination misalignment boundary with bit shifts so that no
/// misaligned load is ever issued on targets that penalize them.
///
/// # Safety
///
/// - `dest` must be valid for writes of `n` bytes and `src` for reads of
///   `n` bytes
/// - The regions must not overlap
/// - On targets without efficient unaligned access, every word-aligned span
///   overlapping the source region must be readable: the shift-compensated
///   path loads whole aligned words, which can start up to `WORD_BYTES - 1`
///   bytes before `src` and end as many bytes past `src + n`
#[inline(always)]
pub unsafe fn word_memcpy(dest: *mut u8, src: *const u8, n: usize) -> *mut u8 {
    copy_forward::<EFFICIENT_UNALIGNED_ACCESS>(dest, src, n)
}

/// Position-independent alias of [`word_memcpy`] for early-boot callers that
/// need a distinct linkage name. Identical behavior; same safety contract.
#[inline(always)]
pub unsafe fn word_memcpy_pi(dest: *mut u8, src: *const u8, n: usize) -> *mut u8 {
    word_memcpy(dest, src, n)
}

unsafe fn copy_forward<const UNALIGNED_OK: bool>(
    dest: *mut u8,
    src: *const u8,
    count: usize,
) -> *mut u8 {
    let mut d = DstCursor::new(dest);
    let mut s = SrcCursor::new(src);
    let mut rem = count;

    if rem >= MIN_THRESHOLD {
        let mut distance = 0;

        if !UNALIGNED_OK {
            // Copy a byte at a time until the destination is word aligned.
            // Consumes at most WORD_BYTES - 1 bytes, which the threshold
            // guarantees are available.
            while !d.is_word_aligned() {
                d.put_byte(s.take_byte());
                rem -= 1;
            }

            distance = s.offset_in_word();
        }

        if distance != 0 {
            rem = copy_shifted(&mut d, &mut s, rem, distance);
        } else {
            rem = copy_unrolled::<UNALIGNED_OK>(&mut d, &mut s, rem);
        }
    }

    while rem > 0 {
        d.put_byte(s.take_byte());
        rem -= 1;
    }

    dest
}

/// Bulk mover for cursors skewed by `distance` bytes, `0 < distance <
/// WORD_BYTES`.
///
/// `d` sits on a word boundary while `s` trails it by `distance`. Each output
/// word is rebuilt from the two aligned source words straddling it, so the
/// source is only ever read with aligned loads. Returns the bytes left over,
/// always less than one word.
#[inline(always)]
unsafe fn copy_shifted(
    d: &mut DstCursor,
    s: &mut SrcCursor,
    mut rem: usize,
    distance: usize,
) -> usize {
    let right = distance * 8;
    let left = (WORD_BYTES - distance) * 8;

    // Step s back onto its own word boundary; the shifts below compensate.
    s.back_up(distance);

    let mut next = s.word::<false>(0);
    while rem >= WORD_BYTES {
        let last = next;
        next = s.word::<false>(1);

        let rebuilt = if cfg!(target_endian = "little") {
            last >> right | next << left
        } else {
            last << right | next >> left
        };
        d.set_word::<false>(0, rebuilt);

        d.advance_words(1);
        s.advance_words(1);
        rem -= WORD_BYTES;
    }

    // Restore the original byte offset for the tail.
    s.skip(distance);
    rem
}

/// Bulk mover for cursors with identical word offsets, eight words per
/// iteration.
///
/// All eight loads are issued before any store, exposing independent work to
/// the optimizer. The group that doesn't fill falls through to the byte tail;
/// returns the bytes left over.
#[inline(always)]
unsafe fn copy_unrolled<const ANY_ALIGN: bool>(
    d: &mut DstCursor,
    s: &mut SrcCursor,
    mut rem: usize,
) -> usize {
    while rem >= GROUP_BYTES {
        let w0 = s.word::<ANY_ALIGN>(0);
        let w1 = s.word::<ANY_ALIGN>(1);
        let w2 = s.word::<ANY_ALIGN>(2);
        let w3 = s.word::<ANY_ALIGN>(3);
        let w4 = s.word::<ANY_ALIGN>(4);
        let w5 = s.word::<ANY_ALIGN>(5);
        let w6 = s.word::<ANY_ALIGN>(6);
        let w7 = s.word::<ANY_ALIGN>(7);

        d.set_word::<ANY_ALIGN>(0, w0);
        d.set_word::<ANY_ALIGN>(1, w1);
        d.set_word::<ANY_ALIGN>(2, w2);
        d.set_word::<ANY_ALIGN>(3, w3);
        d.set_word::<ANY_ALIGN>(4, w4);
        d.set_word::<ANY_ALIGN>(5, w5);
        d.set_word::<ANY_ALIGN>(6, w6);
        d.set_word::<ANY_ALIGN>(7, w7);

        d.advance_words(GROUP_WORDS);
        s.advance_words(GROUP_WORDS);
        rem -= GROUP_BYTES;
    }
    rem
}
