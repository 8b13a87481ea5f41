//! Memory manipulation functions
//!
//! Safe slice façade over the word-oriented copy core.

use crate::memcpy::{EFFICIENT_UNALIGNED_ACCESS, word_memcpy};

/// Copy bytes from source to destination (non-overlapping)
///
/// Copies bytes from `src` to `dest`. Returns the number of bytes copied,
/// which is `min(dest.len(), src.len())`.
///
/// Overlap cannot occur here: the mutable destination borrow excludes any
/// alias of the source.
///
/// # Examples
/// ```
/// use wordcopy::mem::memcpy;
/// let mut dest = [0u8; 5];
/// let src = b"hello";
/// assert_eq!(memcpy(&mut dest, src), 5);
/// assert_eq!(&dest, b"hello");
/// ```
pub fn memcpy(dest: &mut [u8], src: &[u8]) -> usize {
    let n = dest.len().min(src.len());

    if EFFICIENT_UNALIGNED_ACCESS {
        // SAFETY: both pointers come from live slices valid for `n` bytes,
        // the borrows cannot overlap, and on these targets the copy reads
        // only the `n` source bytes.
        unsafe {
            word_memcpy(dest.as_mut_ptr(), src.as_ptr(), n);
        }
    } else {
        // The raw entry point may read whole aligned words around the source
        // region, which a borrowed slice cannot promise. Stay in bounds here;
        // raw-pointer callers get the word paths via `memcpy::word_memcpy`.
        dest[..n].copy_from_slice(&src[..n]);
    }

    n
}
