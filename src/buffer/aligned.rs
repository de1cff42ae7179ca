//! 32-byte aligned heap buffers for lane loads and stores.

use crate::error::{KernelError, Result};
use std::alloc::{self, Layout};
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::ptr::NonNull;
use std::slice;

/// Alignment of every buffer handed to a kernel. One 256-bit vector.
pub const ALIGN: usize = 32;

/// Element types a buffer may hold.
///
/// # Safety
///
/// Implementors must be plain `Copy` data for which the all-zero bit pattern
/// is a valid value, and whose alignment divides [`ALIGN`].
pub unsafe trait Scalar: Copy + Send + Sync + 'static {}

unsafe impl Scalar for i32 {}

/// Returns true if `ptr` sits on an [`ALIGN`]-byte boundary.
#[inline]
pub fn is_aligned<T>(ptr: *const T) -> bool {
    (ptr as usize) % ALIGN == 0
}

/// A fixed-length, row-major storage block whose base address is a multiple
/// of [`ALIGN`].
///
/// The buffer never grows or shrinks. Dropping it returns the memory to the
/// global allocator with the exact layout used to obtain it.
pub struct AlignedBuffer<T: Scalar> {
    ptr: NonNull<T>,
    len: usize,
    layout: Layout,
}

// The buffer uniquely owns its allocation, like a Box<[T]>.
unsafe impl<T: Scalar> Send for AlignedBuffer<T> {}
unsafe impl<T: Scalar> Sync for AlignedBuffer<T> {}

impl<T: Scalar> AlignedBuffer<T> {
    /// Allocates `len` zero-initialized elements.
    pub fn zeroed(len: usize) -> Result<Self> {
        if len == 0 {
            return Err(KernelError::EmptyBuffer);
        }

        let bytes = len.checked_mul(size_of::<T>()).ok_or(KernelError::Allocation {
            bytes: usize::MAX,
            align: ALIGN,
        })?;
        let layout = Layout::from_size_align(bytes, ALIGN)
            .map_err(|_| KernelError::Allocation { bytes, align: ALIGN })?;

        // SAFETY: layout has a non-zero size since len > 0 and T is not a ZST.
        let raw = unsafe { alloc::alloc_zeroed(layout) };
        let ptr = NonNull::new(raw.cast::<T>()).ok_or(KernelError::Allocation {
            bytes,
            align: ALIGN,
        })?;

        log::trace!("allocated {} bytes at {:p}", bytes, ptr);

        Ok(Self { ptr, len, layout })
    }

    /// Allocates `len` elements, each set to `value`.
    pub fn filled(len: usize, value: T) -> Result<Self> {
        let mut buf = Self::zeroed(len)?;
        buf.fill(value);
        Ok(buf)
    }

    /// Copies `src` into fresh aligned storage.
    ///
    /// This is how externally supplied slices of unknown alignment reach the
    /// kernels.
    pub fn from_slice(src: &[T]) -> Result<Self> {
        let mut buf = Self::zeroed(src.len())?;
        buf.copy_from_slice(src);
        Ok(buf)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    /// Always false; empty buffers cannot be constructed.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn as_ptr(&self) -> *const T {
        self.ptr.as_ptr()
    }
}

impl<T: Scalar> Deref for AlignedBuffer<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        // SAFETY: ptr is valid for len initialized elements for our lifetime.
        unsafe { slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }
}

impl<T: Scalar> DerefMut for AlignedBuffer<T> {
    fn deref_mut(&mut self) -> &mut [T] {
        // SAFETY: as above, and &mut self guarantees exclusive access.
        unsafe { slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }
}

impl<T: Scalar> Drop for AlignedBuffer<T> {
    fn drop(&mut self) {
        // SAFETY: ptr came from alloc_zeroed with exactly this layout.
        unsafe { alloc::dealloc(self.ptr.as_ptr().cast::<u8>(), self.layout) };
    }
}

impl<T: Scalar> Clone for AlignedBuffer<T> {
    fn clone(&self) -> Self {
        match Self::from_slice(self) {
            Ok(buf) => buf,
            Err(_) => alloc::handle_alloc_error(self.layout),
        }
    }
}

impl<T: Scalar + fmt::Debug> fmt::Debug for AlignedBuffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlignedBuffer")
            .field("len", &self.len)
            .field("ptr", &self.ptr)
            .field("data", &self.deref())
            .finish()
    }
}

impl<T: Scalar + PartialEq> PartialEq for AlignedBuffer<T> {
    fn eq(&self, other: &Self) -> bool {
        self.deref() == other.deref()
    }
}

impl<T: Scalar + Eq> Eq for AlignedBuffer<T> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alignment_for_odd_lengths() {
        for len in [1, 3, 7, 8, 9, 999, 3001] {
            let buf = AlignedBuffer::<i32>::zeroed(len).unwrap();
            assert!(is_aligned(buf.as_ptr()), "len {} misaligned", len);
            assert_eq!(buf.len(), len);
            assert!(buf.iter().all(|&x| x == 0));
        }
    }

    #[test]
    fn test_filled_and_from_slice() {
        let buf = AlignedBuffer::filled(10, i32::MAX).unwrap();
        assert!(buf.iter().all(|&x| x == i32::MAX));

        // An offset view of a Vec is almost never 32-byte aligned.
        let src: Vec<i32> = (0..17).collect();
        let copy = AlignedBuffer::from_slice(&src[1..]).unwrap();
        assert!(is_aligned(copy.as_ptr()));
        assert_eq!(&copy[..], &src[1..]);
    }

    #[test]
    fn test_clone_is_independent() {
        let mut a = AlignedBuffer::filled(9, 5i32).unwrap();
        let b = a.clone();
        a[0] = 1;
        assert_eq!(b[0], 5);
        assert!(is_aligned(b.as_ptr()));
    }

    #[test]
    fn test_empty_rejected() {
        assert!(matches!(
            AlignedBuffer::<i32>::zeroed(0),
            Err(KernelError::EmptyBuffer)
        ));
    }

    #[test]
    fn test_huge_request_fails_cleanly() {
        let err = AlignedBuffer::<i32>::zeroed(usize::MAX / 2).unwrap_err();
        assert!(matches!(err, KernelError::Allocation { .. }));
    }
}
