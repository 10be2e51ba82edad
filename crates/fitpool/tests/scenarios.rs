//! Integration tests: end-to-end pool scenarios through the facade.
//!
//! Mirrors the classic allocator driver (string, buffer, reuse, integer,
//! zero-size, oversized request, stats, free-all, teardown) and pins the
//! exact report text at each stage.

use fitpool::prelude::*;
use fitpool::types::{POOL_HEADER_SIZE, RECORD_HEADER_SIZE};
use fitpool_test_utils::assert_invariants;
use fitpool_test_utils::fixtures::{reuse_scenario, reuse_scenario_with};

fn report(used: usize, count: usize, layout: &[&str]) -> String {
    let mut s = format!(
        "Memory Pool Visualization:\nTotal Size: 150 bytes\nUsed Memory: {used} bytes\n\
         Active Allocations: {count}\nMemory Layout:\n"
    );
    for line in layout {
        s.push_str(line);
        s.push('\n');
    }
    s
}

// ── The classic driver ──────────────────────────────────────────

#[test]
fn classic_driver_sequence() {
    let mut pool = Pool::create(150).unwrap();
    assert_eq!(pool.visualize(), report(0, 0, &["[GAP: 118 bytes]"]));

    // 1: string storage.
    let s = pool.allocate(12).unwrap();
    pool.data_mut(s).unwrap()[..12].copy_from_slice(b"Hello World\0");
    assert_eq!(&pool.data(s).unwrap()[..11], b"Hello World");
    assert_eq!(
        pool.visualize(),
        report(40, 1, &["[USED: 40 bytes]", "[GAP: 78 bytes]"])
    );

    // 2: a second buffer.
    let buffer = pool.allocate(20).unwrap();
    {
        let bytes = pool.data_mut(buffer).unwrap();
        bytes[0] = b'!';
        bytes[1..20].fill(b'X');
    }
    assert_eq!(pool.data(buffer).unwrap()[0], b'!');
    assert_eq!(&pool.data(s).unwrap()[..11], b"Hello World");
    assert_eq!(
        pool.visualize(),
        report(
            88,
            2,
            &["[USED: 40 bytes]", "[USED: 48 bytes]", "[GAP: 30 bytes]"]
        )
    );

    // 3: free the string; its span becomes the front gap.
    pool.free(s).unwrap();
    assert_eq!(
        pool.visualize(),
        report(48, 1, &["[GAP: 40 bytes]", "[USED: 48 bytes]", "[GAP: 30 bytes]"])
    );

    // 4: an integer lands in the freed span.
    let num = pool.allocate(std::mem::size_of::<i32>()).unwrap();
    pool.data_mut(num).unwrap()[..4].copy_from_slice(&0x00EE_FFC0_i32.to_le_bytes());
    assert_eq!(
        i32::from_le_bytes(pool.data(num).unwrap()[..4].try_into().unwrap()),
        0x00EE_FFC0
    );
    assert_eq!(
        pool.visualize(),
        report(
            80,
            2,
            &[
                "[USED: 32 bytes]",
                "[GAP: 8 bytes]",
                "[USED: 48 bytes]",
                "[GAP: 30 bytes]"
            ]
        )
    );

    // 5: zero-size request takes the tail (the 8-byte gap is too small).
    let empty = pool.allocate(0).unwrap();
    assert!(pool.data(empty).unwrap().is_empty());
    assert_eq!(
        pool.visualize(),
        report(
            104,
            3,
            &[
                "[USED: 32 bytes]",
                "[GAP: 8 bytes]",
                "[USED: 48 bytes]",
                "[USED: 24 bytes]",
                "[GAP: 6 bytes]"
            ]
        )
    );

    // 6: oversized request fails without touching state.
    assert!(matches!(
        pool.allocate(1000),
        Err(PoolError::OutOfBudget { .. })
    ));

    // 7: stats.
    let stats = pool.stats();
    assert_eq!(stats.capacity, 150);
    assert!(stats.used > 0);
    assert_eq!(stats.count, 3);

    // 8: free everything.
    for h in [buffer, num, empty] {
        pool.free(h).unwrap();
    }
    assert_eq!(pool.visualize(), report(0, 0, &["[GAP: 118 bytes]"]));
    assert_invariants(&pool);

    // 9: clean teardown.
    assert!(pool.destroy().is_clean());
}

// ── Reuse scenario ──────────────────────────────────────────────

#[test]
fn reuse_scenario_counters() {
    let s = reuse_scenario();
    let stats = s.pool.stats();
    assert_eq!(stats.capacity, 150);
    assert_eq!(stats.count, 2);
    let b_footprint = s.pool.record_size(s.b).unwrap() + RECORD_HEADER_SIZE;
    let c_footprint = s.pool.record_size(s.c).unwrap() + RECORD_HEADER_SIZE;
    assert_eq!(stats.used, b_footprint + c_footprint);
    assert_eq!(
        s.pool.data_offset(s.c).unwrap(),
        POOL_HEADER_SIZE + RECORD_HEADER_SIZE
    );
    assert_invariants(&s.pool);
}

#[test]
fn stale_handle_from_scenario_is_rejected_everywhere() {
    let mut s = reuse_scenario();
    let fault = PoolError::InvalidHandle {
        handle: s.a,
        fault: HandleFault::Released,
    };
    assert_eq!(s.pool.data(s.a), Err(fault.clone()));
    assert_eq!(s.pool.data_offset(s.a), Err(fault.clone()));
    assert_eq!(s.pool.record_size(s.a), Err(fault.clone()));
    assert_eq!(s.pool.free(s.a), Err(fault.clone()));
    assert_eq!(fault.class(), ErrorClass::Misuse);
    assert_invariants(&s.pool);
}

#[test]
fn handles_from_another_pool_are_foreign() {
    let mut first = reuse_scenario();
    let second = reuse_scenario();
    let err = first.pool.free(second.b).unwrap_err();
    assert_eq!(
        err,
        PoolError::InvalidHandle {
            handle: second.b,
            fault: HandleFault::ForeignPool,
        }
    );
    assert_eq!(first.pool.stats().count, 2);
}

// ── Diagnostics ─────────────────────────────────────────────────

#[test]
fn alternate_report_shows_gap_states() {
    let s = reuse_scenario_with(PoolConfig::new(150).with_free_fill(0xDD));
    let rendered = format!("{:#}", s.pool.layout());
    assert!(rendered.contains("[USED: 32 bytes]\n[GAP: 8 bytes, released]\n"));
    assert!(rendered.ends_with("[GAP: 30 bytes, pristine]\n"));
}

#[test]
fn layout_entries_carry_handles() {
    let s = reuse_scenario();
    let layout = s.pool.layout();
    let handles: Vec<_> = layout
        .entries()
        .iter()
        .filter_map(|e| match e {
            LayoutEntry::Record { handle, .. } => Some(*handle),
            LayoutEntry::Gap { .. } => None,
        })
        .collect();
    assert_eq!(handles, vec![s.c, s.b]);
    assert_eq!(layout.stats(), s.pool.stats());
}

#[test]
fn destroy_with_live_records_warns_but_completes() {
    let s = reuse_scenario();
    let report = s.pool.destroy();
    assert_eq!(report.capacity, 150);
    assert_eq!(report.leaked, 2);
    assert_eq!(report.leaked_bytes, 80);
}

#[test]
fn custom_fill_pattern_is_visible() {
    let mut pool = Pool::with_config(PoolConfig::new(128).with_fill_pattern(0x00)).unwrap();
    let h = pool.allocate(8).unwrap();
    assert_eq!(pool.data(h).unwrap(), &[0u8; 8]);
    assert!(format!("{:#}", pool.layout()).contains("pristine"));
}
