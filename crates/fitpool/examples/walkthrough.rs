//! Walk a 150-byte pool through allocation, reuse, and teardown, printing
//! the layout report after each step.
//!
//! Run with `RUST_LOG=fitpool_arena=trace` to see placement and release
//! events from the allocator.

use fitpool::prelude::*;
use fitpool::types::DEFAULT_FREE_FILL;
use tracing_subscriber::EnvFilter;

fn show(step: &str, pool: &Pool) {
    println!("--- {step} ---");
    println!("{:#}", pool.layout());
}

fn main() -> Result<(), PoolError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = PoolConfig::new(150).with_free_fill(DEFAULT_FREE_FILL);
    let mut pool = Pool::with_config(config)?;
    show("created", &pool);

    let greeting = pool.allocate(12)?;
    pool.data_mut(greeting)?[..12].copy_from_slice(b"Hello World\0");
    show("greeting", &pool);
    assert_eq!(&pool.data(greeting)?[..11], b"Hello World");

    let buffer = pool.allocate(20)?;
    let bytes = pool.data_mut(buffer)?;
    bytes[0] = b'!';
    bytes[1..20].fill(b'X');
    show("buffer", &pool);

    pool.free(greeting)?;
    show("greeting freed", &pool);

    let num = pool.allocate(std::mem::size_of::<i32>())?;
    pool.data_mut(num)?[..4].copy_from_slice(&0x00EE_FFC0_i32.to_le_bytes());
    show("number", &pool);
    tracing::info!(
        offset = pool.data_offset(num)?,
        "number reused the greeting's span"
    );

    let empty = pool.allocate(0)?;
    show("zero-size", &pool);

    match pool.allocate(1000) {
        Err(e @ PoolError::OutOfBudget { .. }) => tracing::info!(error = %e, "oversized request"),
        other => panic!("expected OutOfBudget, got {other:?}"),
    }

    if let Err(e) = pool.free(greeting) {
        tracing::info!(error = %e, class = ?e.class(), "stale handle rejected");
    }

    let stats = pool.stats();
    println!("{stats}");
    assert_eq!(stats.count, 3);

    for handle in [buffer, num, empty] {
        pool.free(handle)?;
    }
    show("all freed", &pool);

    let report = pool.destroy();
    tracing::info!(leaked = report.leaked, "pool destroyed");
    Ok(())
}
