//! Arena Tests
//!
//! Tests verify:
//! - Fast path stays inside the active block
//! - Large requests get dedicated blocks
//! - Returned ranges never overlap and keep their contents
//! - Aligned allocations honour the arena alignment
//! - Usage accounting bounds
//! - Cross-thread reads of the usage metric

use std::mem;

use kvbase::arena::ALIGN;
use kvbase::{Arena, Config, Random};

const OVERHEAD: usize = mem::size_of::<*mut u8>();

// =============================================================================
// Basic Allocation Tests
// =============================================================================

#[test]
fn test_new_arena_is_empty() {
    let arena = Arena::new();
    assert_eq!(arena.memory_usage(), 0);
    assert_eq!(arena.block_count(), 0);
    assert_eq!(arena.block_size(), 4096);
}

#[test]
fn test_allocate_returns_requested_length() {
    let arena = Arena::new();

    let a = arena.allocate(1);
    assert_eq!(a.len(), 1);

    let b = arena.allocate(500);
    assert_eq!(b.len(), 500);
}

#[test]
fn test_fast_path_reuses_active_block() {
    let arena = Arena::new();

    arena.allocate(16);
    assert_eq!(arena.block_count(), 1);

    for _ in 0..100 {
        arena.allocate(10);
    }
    assert_eq!(arena.block_count(), 1);
    assert_eq!(arena.memory_usage(), 16 + 1000 + OVERHEAD);
}

#[test]
fn test_exhausted_block_is_replaced() {
    let arena = Arena::new();

    for _ in 0..4 {
        arena.allocate(1000);
    }
    assert_eq!(arena.block_count(), 1);

    // 96 bytes left; 200 does not fit
    arena.allocate(200);
    assert_eq!(arena.block_count(), 2);
    assert_eq!(arena.memory_usage(), 4200 + 2 * OVERHEAD);
}

// =============================================================================
// Large Request Tests
// =============================================================================

#[test]
fn test_large_request_gets_dedicated_block() {
    let arena = Arena::new();

    for _ in 0..4 {
        arena.allocate(1000);
    }
    // 96 bytes left; 2000 is above the quarter-block threshold
    let large = arena.allocate(2000);
    assert_eq!(large.len(), 2000);
    assert_eq!(arena.block_count(), 2);

    // The active block kept its free space
    arena.allocate(10);
    assert_eq!(arena.block_count(), 2);

    assert_eq!(arena.memory_usage(), 4000 + 2000 + 10 + 2 * OVERHEAD);
}

#[test]
fn test_quarter_block_threshold() {
    let arena = Arena::new();

    for _ in 0..4 {
        arena.allocate(1024);
    }
    assert_eq!(arena.block_count(), 1);

    arena.allocate(1025);
    assert_eq!(arena.block_count(), 2);

    // Exactly a quarter still starts a standard block
    arena.allocate(1024);
    assert_eq!(arena.block_count(), 3);

    // Anything that fits takes the fast path, whatever its size
    arena.allocate(3072);
    assert_eq!(arena.block_count(), 3);
}

#[test]
fn test_request_larger_than_block() {
    let arena = Arena::new();

    let big = arena.allocate(100_000);
    big.fill(0xab);
    assert!(big.iter().all(|&b| b == 0xab));
    assert_eq!(arena.memory_usage(), 100_000 + OVERHEAD);
}

#[test]
fn test_custom_block_size_moves_threshold() {
    let config = Config::builder().arena_block_size(256).build().unwrap();
    let arena = Arena::with_config(&config).unwrap();

    arena.allocate(64);
    arena.allocate(192);
    assert_eq!(arena.block_count(), 1);

    // Block is full; 65 is above 256 / 4
    arena.allocate(65);
    assert_eq!(arena.block_count(), 2);

    arena.allocate(64);
    assert_eq!(arena.block_count(), 3);
    assert_eq!(arena.memory_usage(), 64 + 192 + 65 + 64 + 3 * OVERHEAD);
}

#[test]
fn test_with_config_rejects_invalid_block_size() {
    let config = Config {
        arena_block_size: 10,
        ..Config::default()
    };
    assert!(Arena::with_config(&config).is_err());
}

// =============================================================================
// Alignment Tests
// =============================================================================

#[test]
fn test_alignment_is_power_of_two() {
    assert!(ALIGN.is_power_of_two());
    assert!(ALIGN >= 8);
    assert!(ALIGN >= mem::size_of::<*const u8>());
}

#[test]
fn test_aligned_after_odd_allocation() {
    let arena = Arena::new();

    arena.allocate(3);
    let aligned = arena.allocate_aligned(16);
    assert_eq!(aligned.as_ptr() as usize % ALIGN, 0);

    // Padding is not counted
    assert_eq!(arena.memory_usage(), 3 + 16 + OVERHEAD);
    assert_eq!(arena.block_count(), 1);
}

#[test]
fn test_aligned_on_fresh_arena() {
    let arena = Arena::new();
    let aligned = arena.allocate_aligned(1);
    assert_eq!(aligned.as_ptr() as usize % ALIGN, 0);
}

#[test]
fn test_aligned_fallback_is_aligned() {
    let arena = Arena::new();

    for _ in 0..4 {
        arena.allocate(1000);
    }
    arena.allocate(93);
    // 3 bytes left at a misaligned address
    let small = arena.allocate_aligned(8);
    assert_eq!(small.as_ptr() as usize % ALIGN, 0);
    assert_eq!(arena.block_count(), 2);

    arena.allocate(1);
    let large = arena.allocate_aligned(5000);
    assert_eq!(large.as_ptr() as usize % ALIGN, 0);
    assert_eq!(arena.block_count(), 3);
}

#[test]
fn test_interleaved_aligned_allocations() {
    let arena = Arena::new();
    let mut rnd = Random::new(17);

    for _ in 0..5_000 {
        arena.allocate(rnd.uniform(13) as usize + 1);
        let aligned = arena.allocate_aligned(rnd.uniform(40) as usize + 1);
        assert_eq!(aligned.as_ptr() as usize % ALIGN, 0);
    }
}

// =============================================================================
// Randomized Workload Tests
// =============================================================================

#[test]
fn test_randomized_workload() {
    const N: usize = 100_000;

    let arena = Arena::new();
    let mut rnd = Random::new(301);
    let mut allocated: Vec<(usize, &mut [u8])> = Vec::with_capacity(N);
    let mut bytes = 0usize;

    for i in 0..N {
        let mut s = if i % (N / 10) == 0 {
            i
        } else if rnd.one_in(4000) {
            rnd.uniform(6000) as usize
        } else if rnd.one_in(10) {
            rnd.uniform(100) as usize
        } else {
            rnd.uniform(20) as usize
        };
        if s == 0 {
            s = 1;
        }

        let r = if rnd.one_in(10) {
            arena.allocate_aligned(s)
        } else {
            arena.allocate(s)
        };
        r.fill((i % 256) as u8);

        bytes += s;
        allocated.push((i, r));

        assert!(arena.memory_usage() >= bytes);
        if i > N / 10 {
            assert!(
                arena.memory_usage() as f64 <= bytes as f64 * 1.5,
                "usage {} exceeds 1.5x of {} requested",
                arena.memory_usage(),
                bytes
            );
        }
    }

    for (i, r) in &allocated {
        assert!(r.iter().all(|&b| b == (*i % 256) as u8), "allocation {} clobbered", i);
    }
}

#[test]
fn test_ranges_never_overlap() {
    let arena = Arena::new();
    let mut rnd = Random::new(99);
    let mut ranges = Vec::new();

    for _ in 0..20_000 {
        let size = if rnd.one_in(50) {
            rnd.uniform(3000) as usize + 1
        } else {
            rnd.uniform(64) as usize + 1
        };
        let r = if rnd.one_in(3) {
            arena.allocate_aligned(size)
        } else {
            arena.allocate(size)
        };
        ranges.push((r.as_ptr() as usize, r.len()));
    }

    ranges.sort_unstable();
    for pair in ranges.windows(2) {
        let (start, len) = pair[0];
        let (next, _) = pair[1];
        assert!(start + len <= next, "ranges at {:#x} and {:#x} overlap", start, next);
    }
}

// =============================================================================
// Concurrency Tests
// =============================================================================

#[test]
fn test_usage_handle_reads_from_other_thread() {
    let arena = Arena::new();
    let handle = arena.usage_handle();
    let target = 10_000 * 8;

    crossbeam::scope(|s| {
        let reader = s.spawn(move |_| {
            let mut last = 0;
            loop {
                let seen = handle.get();
                assert!(seen >= last, "usage went backwards: {} -> {}", last, seen);
                last = seen;
                if seen >= target {
                    break;
                }
                std::hint::spin_loop();
            }
            last
        });

        for _ in 0..10_000 {
            arena.allocate(8);
        }

        let last = reader.join().unwrap();
        assert!(last >= target);
    })
    .unwrap();

    assert!(arena.memory_usage() >= target);
}

#[test]
fn test_usage_handle_outlives_arena() {
    let arena = Arena::new();
    let handle = arena.usage_handle();

    arena.allocate(100);
    let final_usage = arena.memory_usage();
    drop(arena);

    assert_eq!(handle.get(), final_usage);
}

#[test]
fn test_arena_can_move_between_threads() {
    let arena = Arena::new();
    arena.allocate(32);

    let usage = crossbeam::scope(|s| {
        s.spawn(move |_| {
            let arena = arena;
            let r = arena.allocate(64);
            r.fill(7);
            arena.memory_usage()
        })
        .join()
        .unwrap()
    })
    .unwrap();

    assert_eq!(usage, 32 + 64 + OVERHEAD);
}
