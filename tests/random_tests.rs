//! Random Tests

use kvbase::Random;

#[test]
fn test_minimal_standard_sequence() {
    let mut rnd = Random::new(1);
    assert_eq!(rnd.next(), 16_807);
    assert_eq!(rnd.next(), 282_475_249);
    assert_eq!(rnd.next(), 1_622_650_073);
}

#[test]
fn test_seeded_sequence_is_reproducible() {
    let mut a = Random::new(301);
    let mut b = Random::new(301);

    assert_eq!(a.next(), 5_058_907);
    assert_eq!(b.next(), 5_058_907);
    for _ in 0..1_000 {
        assert_eq!(a.next(), b.next());
    }
}

#[test]
fn test_degenerate_seeds_replaced() {
    let first = Random::new(1).next();
    assert_eq!(Random::new(0).next(), first);
    assert_eq!(Random::new(2_147_483_647).next(), first);
    assert_eq!(Random::new(0x8000_0000).next(), first);
}

#[test]
fn test_seed_masked_to_31_bits() {
    assert_eq!(Random::new(0x8000_0005).next(), Random::new(5).next());
}

#[test]
fn test_next_stays_in_range() {
    let mut rnd = Random::new(12_345);
    for _ in 0..10_000 {
        let v = rnd.next();
        assert!(v >= 1 && v < 2_147_483_647);
    }
}

#[test]
fn test_uniform_bounds() {
    let mut rnd = Random::new(77);
    let mut seen = [false; 10];

    for _ in 0..10_000 {
        let v = rnd.uniform(10);
        assert!(v < 10);
        seen[v as usize] = true;
    }
    assert!(seen.iter().all(|&s| s));
}

#[test]
fn test_one_in_frequency() {
    let mut rnd = Random::new(2024);
    let hits = (0..100_000).filter(|_| rnd.one_in(10)).count();
    assert!((8_000..12_000).contains(&hits), "hits = {}", hits);

    assert!((0..100).all(|_| rnd.one_in(1)));
}

#[test]
fn test_skewed_bounds() {
    let mut rnd = Random::new(5);
    let mut small = 0;

    for _ in 0..10_000 {
        let v = rnd.skewed(10);
        assert!(v < 1 << 10);
        if v < 32 {
            small += 1;
        }
    }
    // Bases 0..=5 always land below 32
    assert!(small > 5_000, "small = {}", small);
}
