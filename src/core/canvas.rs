//! # Shared Canvas
//!
//! The "active image" slot shared by all workers of a pipeline run.
//!
//! Across one run the same bitmap is read by every worker (sampling, bicubic source),
//! written in disjoint horizontal bands (rescale target, marching stamps) and, once,
//! replaced wholesale by worker 0 (the rescale swap). Which of these is legal at any moment is
//! decided by the pipeline's rendezvous points, not by this type, so the accessors are
//! `unsafe` and each states the ordering it relies on.
//!
//! ```text
//!   phase        readers          writers
//!   rescale      all (original)   all (target bands, disjoint)
//!   swap         none             worker 0 (replace)
//!   sample       all              none
//!   march        none             all (image bands, disjoint)
//! ```

use std::cell::UnsafeCell;
use std::ops::Range;

use super::bitmap::{Bitmap, Pixel};

struct Slot {
    bitmap: Bitmap,
    // cached while the slot is exclusively owned so band access never touches the Vec header
    base: *mut Pixel,
}

impl Slot {
    fn new(mut bitmap: Bitmap) -> Self {
        let base = bitmap.pixels_mut().as_mut_ptr();
        Self { bitmap, base }
    }
}

/// Bitmap slot with phase-ordered shared access.
pub struct SharedCanvas {
    slot: UnsafeCell<Slot>,
}

// SAFETY: every access path is `unsafe` and documents the phase discipline that keeps reads
// and writes from overlapping; `Bitmap` itself is `Send`.
unsafe impl Sync for SharedCanvas {}
unsafe impl Send for SharedCanvas {}

impl SharedCanvas {
    pub fn new(bitmap: Bitmap) -> Self {
        Self {
            slot: UnsafeCell::new(Slot::new(bitmap)),
        }
    }

    /// Width of the current bitmap.
    ///
    /// # Safety
    /// No [`SharedCanvas::replace`] may run concurrently.
    pub unsafe fn width(&self) -> u32 {
        // SAFETY: plain field read through the raw slot pointer; replace is excluded by caller
        unsafe { (*self.slot.get()).bitmap.width() }
    }

    /// Shared view of the current bitmap.
    ///
    /// # Safety
    /// For as long as the returned reference lives, no worker may hold a band from
    /// [`SharedCanvas::rows_mut`] and no [`SharedCanvas::replace`] may run.
    pub unsafe fn get(&self) -> &Bitmap {
        // SAFETY: only shared access exists while the caller upholds the contract above
        unsafe { &(*self.slot.get()).bitmap }
    }

    /// Mutable band covering image rows `rows`.
    ///
    /// # Safety
    /// Bands handed out concurrently must cover disjoint row ranges, no reference from
    /// [`SharedCanvas::get`] may be alive, and no [`SharedCanvas::replace`] may run while the
    /// band lives. `rows` must lie within the bitmap's height.
    #[allow(clippy::mut_from_ref)]
    pub unsafe fn rows_mut(&self, rows: Range<u32>) -> &mut [Pixel] {
        // SAFETY: `base` points at `width * height` initialised pixels owned by the slot; the
        // caller guarantees the range is in bounds and not aliased by another band or reader
        unsafe {
            let slot = self.slot.get();
            let width = (*slot).bitmap.width() as usize;
            let height = (*slot).bitmap.height();
            assert!(rows.start <= rows.end && rows.end <= height, "band out of bounds");
            let offset = rows.start as usize * width;
            let len = (rows.end - rows.start) as usize * width;
            std::slice::from_raw_parts_mut((*slot).base.add(offset), len)
        }
    }

    /// Swap in `next` and return the previous bitmap.
    ///
    /// # Safety
    /// The caller must be the only thread touching the canvas: every other worker is parked at
    /// a rendezvous and holds no reference or band obtained before it.
    pub unsafe fn replace(&self, next: Bitmap) -> Bitmap {
        // SAFETY: exclusive access is guaranteed by the caller
        unsafe {
            let slot = &mut *self.slot.get();
            std::mem::replace(slot, Slot::new(next)).bitmap
        }
    }

    /// Take the bitmap out, leaving an empty one behind.
    ///
    /// # Safety
    /// Same contract as [`SharedCanvas::replace`].
    pub unsafe fn take(&self) -> Bitmap {
        // SAFETY: forwarded contract
        unsafe { self.replace(Bitmap::default()) }
    }

    /// Consume the canvas once all workers are gone.
    pub fn into_inner(self) -> Bitmap {
        self.slot.into_inner().bitmap
    }
}
