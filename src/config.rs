//! Configuration for kvbase
//!
//! Centralized configuration with sensible defaults.

use crate::arena::{ALIGN, BLOCK_SIZE};
use crate::error::{KvError, Result};

/// Smallest block size the arena accepts
pub const MIN_BLOCK_SIZE: usize = 64;

/// Main configuration for kvbase components
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Arena Configuration
    // -------------------------------------------------------------------------
    /// Size of a standard arena block (in bytes).
    /// Requests larger than a quarter of this get a dedicated block.
    pub arena_block_size: usize,

    // -------------------------------------------------------------------------
    // Random Configuration
    // -------------------------------------------------------------------------
    /// Seed for workload generators
    pub random_seed: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            arena_block_size: BLOCK_SIZE,
            random_seed: 301,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Check that the values can be used by the arena
    pub fn validate(&self) -> Result<()> {
        if self.arena_block_size < MIN_BLOCK_SIZE {
            return Err(KvError::Config(format!(
                "arena_block_size must be at least {} bytes, got {}",
                MIN_BLOCK_SIZE, self.arena_block_size
            )));
        }
        if self.arena_block_size % ALIGN != 0 {
            return Err(KvError::Config(format!(
                "arena_block_size must be a multiple of {}, got {}",
                ALIGN, self.arena_block_size
            )));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the standard arena block size (in bytes)
    pub fn arena_block_size(mut self, size: usize) -> Self {
        self.config.arena_block_size = size;
        self
    }

    /// Set the random seed
    pub fn random_seed(mut self, seed: u32) -> Self {
        self.config.random_seed = seed;
        self
    }

    pub fn build(self) -> Result<Config> {
        self.config.validate()?;
        Ok(self.config)
    }
}
