//! # kvbase
//!
//! Foundation layer for a key-value storage engine:
//! - Bump-allocating arena with a relaxed usage metric
//! - Compact status type (OK costs nothing, failures own one buffer)
//! - Borrowed byte-range views
//! - Key comparators with separator/successor shortening
//! - Non-cryptographic random source
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │             (future) MemTable / SSTable / WAL                │
//! └──────┬──────────────────┬───────────────────┬───────────────┘
//!        │                  │                   │
//!        ▼                  ▼                   ▼
//!   ┌─────────┐       ┌──────────┐       ┌────────────┐
//!   │  Arena  │       │  Status  │       │ Comparator │
//!   │ (bump)  │       │ (packed) │       │ (bytewise) │
//!   └────┬────┘       └────┬─────┘       └─────┬──────┘
//!        │                 │                   │
//!        └─────────────────┼───────────────────┘
//!                          ▼
//!                    ┌───────────┐
//!                    │   Slice   │
//!                    └───────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod slice;
pub mod arena;
pub mod status;
pub mod comparator;
pub mod random;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{KvError, Result};
pub use config::Config;
pub use slice::Slice;
pub use arena::{Arena, MemoryUsage};
pub use status::{Code, Status};
pub use comparator::{bytewise_comparator, BytewiseComparator, Comparator};
pub use random::Random;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of kvbase
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
