//! Arena Module
//!
//! Bump allocator that serves many small requests from a few large blocks.
//!
//! ## Responsibilities
//! - Hand out non-overlapping byte ranges carved from the active block
//! - Fall back to a fresh block when the active one is exhausted
//! - Give large requests a dedicated block of their own
//! - Track cumulative bytes claimed
//!
//! ## Block Policy
//! ```text
//!  request n
//!     │
//!     ├── n <= remaining ──────────────► bump active block (no system call)
//!     │
//!     ├── n >  block_size / 4 ─────────► dedicated block of exactly n bytes
//!     │                                  (active block untouched)
//!     │
//!     └── otherwise ───────────────────► new standard block becomes active,
//!                                        leftover of the old one is abandoned
//! ```
//!
//! ## Concurrency
//! Single writer. `Arena` is `Send` but not `Sync`, so allocation can never
//! race. Only the usage counter is atomic; [`MemoryUsage`] handles read it
//! from other threads with relaxed ordering.

use std::alloc::{self, Layout};
use std::cell::{Cell, RefCell};
use std::fmt;
use std::mem;
use std::ptr::NonNull;
use std::slice;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::config::Config;
use crate::error::Result;

/// Size of a standard block (in bytes)
pub const BLOCK_SIZE: usize = 4096;

/// Alignment guaranteed by [`Arena::allocate_aligned`]
pub const ALIGN: usize = if mem::size_of::<*const u8>() > 8 {
    mem::size_of::<*const u8>()
} else {
    8
};

const _: () = assert!(ALIGN.is_power_of_two(), "pointer size should be a power of 2");

/// Bookkeeping charged to the usage counter for every block
const BLOCK_OVERHEAD: usize = mem::size_of::<*mut u8>();

// =============================================================================
// Block
// =============================================================================

/// One heap allocation owned by the arena.
///
/// Blocks are never moved or resized, so addresses handed out stay valid
/// until the block is dropped together with its arena.
struct Block {
    ptr: NonNull<u8>,
    layout: Layout,
}

impl Block {
    fn new(size: usize) -> Self {
        let layout = match Layout::from_size_align(size, ALIGN) {
            Ok(layout) => layout,
            Err(_) => panic!("arena block of {} bytes exceeds the address space", size),
        };
        debug_assert!(layout.size() > 0);
        // SAFETY: the layout has a non-zero size; only requests > block_size / 4
        // or the standard block size itself reach this point.
        let raw = unsafe { alloc::alloc_zeroed(layout) };
        let ptr = NonNull::new(raw).unwrap_or_else(|| alloc::handle_alloc_error(layout));
        Self { ptr, layout }
    }
}

impl Drop for Block {
    fn drop(&mut self) {
        // SAFETY: `ptr` was returned by `alloc_zeroed` with this exact layout.
        unsafe { alloc::dealloc(self.ptr.as_ptr(), self.layout) }
    }
}

// =============================================================================
// Arena
// =============================================================================

/// Bump-allocating arena
///
/// Every range returned borrows the arena, so it stays readable and writable
/// for as long as the arena lives. Nothing is freed before the arena is dropped.
pub struct Arena {
    /// Next free byte in the active block
    alloc_ptr: Cell<NonNull<u8>>,
    /// Free bytes left in the active block
    alloc_bytes_remaining: Cell<usize>,
    /// Every block ever allocated, in allocation order
    blocks: RefCell<Vec<Block>>,
    /// Size of a standard block
    block_size: usize,
    /// Bytes handed out plus per-block overhead
    memory_usage: Arc<AtomicUsize>,
}

// SAFETY: the arena exclusively owns its blocks and holds no thread-bound
// state. It is deliberately not `Sync`: allocation mutates through `&self`.
unsafe impl Send for Arena {}

impl Arena {
    /// Create an empty arena using the standard block size
    pub fn new() -> Self {
        Self::with_block_size(BLOCK_SIZE)
    }

    /// Create an empty arena using `config.arena_block_size`
    pub fn with_config(config: &Config) -> Result<Self> {
        config.validate()?;
        Ok(Self::with_block_size(config.arena_block_size))
    }

    fn with_block_size(block_size: usize) -> Self {
        Self {
            alloc_ptr: Cell::new(NonNull::dangling()),
            alloc_bytes_remaining: Cell::new(0),
            blocks: RefCell::new(Vec::new()),
            block_size,
            memory_usage: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Allocate `bytes` bytes.
    ///
    /// `bytes` must be non-zero; this is only checked in debug builds.
    /// The contents of the returned range are unspecified.
    #[inline]
    #[allow(clippy::mut_from_ref)]
    pub fn allocate(&self, bytes: usize) -> &mut [u8] {
        debug_assert!(bytes > 0, "arena allocations must be non-empty");

        let result = if bytes <= self.alloc_bytes_remaining.get() {
            self.bump(0, bytes)
        } else {
            self.allocate_fallback(bytes)
        };
        self.memory_usage.fetch_add(bytes, Ordering::Relaxed);

        // SAFETY: `result` points at `bytes` initialized bytes inside a block
        // owned by `self` that no other returned range overlaps.
        unsafe { slice::from_raw_parts_mut(result.as_ptr(), bytes) }
    }

    /// Allocate `bytes` bytes starting at an address aligned to [`ALIGN`].
    ///
    /// Padding skipped to reach the alignment is wasted and not counted.
    #[allow(clippy::mut_from_ref)]
    pub fn allocate_aligned(&self, bytes: usize) -> &mut [u8] {
        debug_assert!(bytes > 0, "arena allocations must be non-empty");

        let current_mod = self.alloc_ptr.get().as_ptr() as usize & (ALIGN - 1);
        let slop = if current_mod == 0 { 0 } else { ALIGN - current_mod };
        let needed = bytes.saturating_add(slop);

        let result = if needed <= self.alloc_bytes_remaining.get() {
            self.bump(slop, needed)
        } else {
            // Fallback always hands out the start of a block, which is aligned.
            self.allocate_fallback(bytes)
        };
        self.memory_usage.fetch_add(bytes, Ordering::Relaxed);

        debug_assert_eq!(result.as_ptr() as usize & (ALIGN - 1), 0);
        // SAFETY: same as `allocate`; the range starts `slop` bytes into the
        // `needed` bytes just claimed.
        unsafe { slice::from_raw_parts_mut(result.as_ptr(), bytes) }
    }

    /// Cumulative bytes claimed, including per-block overhead
    pub fn memory_usage(&self) -> usize {
        self.memory_usage.load(Ordering::Relaxed)
    }

    /// A handle for reading [`Arena::memory_usage`] from other threads
    pub fn usage_handle(&self) -> MemoryUsage {
        MemoryUsage {
            counter: Arc::clone(&self.memory_usage),
        }
    }

    /// Number of blocks currently owned (standard and dedicated)
    pub fn block_count(&self) -> usize {
        self.blocks.borrow().len()
    }

    /// Size of a standard block
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Claim `needed` bytes from the active block and return the address
    /// `offset` bytes into them. Caller guarantees `needed <= remaining`.
    fn bump(&self, offset: usize, needed: usize) -> NonNull<u8> {
        let remaining = self.alloc_bytes_remaining.get();
        debug_assert!(offset <= needed && needed <= remaining);

        let start = self.alloc_ptr.get().as_ptr();
        // SAFETY: `needed <= remaining`, so both pointers stay within the
        // active block or one past its end. Neither can be null.
        let (next, result) = unsafe {
            (
                NonNull::new_unchecked(start.add(needed)),
                NonNull::new_unchecked(start.add(offset)),
            )
        };
        self.alloc_ptr.set(next);
        self.alloc_bytes_remaining.set(remaining - needed);
        result
    }

    fn allocate_fallback(&self, bytes: usize) -> NonNull<u8> {
        if bytes > self.block_size / 4 {
            // Large requests never share a block; the active one keeps its space.
            return self.allocate_new_block(bytes);
        }

        // Whatever is left in the active block is abandoned.
        let block = self.allocate_new_block(self.block_size);
        self.alloc_ptr.set(block);
        self.alloc_bytes_remaining.set(self.block_size);
        self.bump(0, bytes)
    }

    fn allocate_new_block(&self, block_bytes: usize) -> NonNull<u8> {
        let block = Block::new(block_bytes);
        let ptr = block.ptr;

        let mut blocks = self.blocks.borrow_mut();
        blocks.push(block);
        let usage = self.memory_usage.fetch_add(BLOCK_OVERHEAD, Ordering::Relaxed) + BLOCK_OVERHEAD;

        tracing::trace!(
            block_bytes,
            blocks = blocks.len(),
            usage,
            "arena allocated new block"
        );
        ptr
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Arena {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Arena")
            .field("block_size", &self.block_size)
            .field("blocks", &self.block_count())
            .field("remaining_in_block", &self.alloc_bytes_remaining.get())
            .field("memory_usage", &self.memory_usage())
            .finish()
    }
}

impl Drop for Arena {
    fn drop(&mut self) {
        let blocks = self.blocks.get_mut().len();
        let usage = self.memory_usage();
        tracing::debug!(blocks, usage, "releasing arena");
    }
}

// =============================================================================
// Usage Handle
// =============================================================================

/// Shareable read-only view of an arena's usage counter.
///
/// Reads are relaxed: a reader may see a stale value but never a torn one.
/// The handle outlives the arena; after the arena is dropped it reports the
/// final value.
#[derive(Debug, Clone)]
pub struct MemoryUsage {
    counter: Arc<AtomicUsize>,
}

impl MemoryUsage {
    pub fn get(&self) -> usize {
        self.counter.load(Ordering::Relaxed)
    }
}
