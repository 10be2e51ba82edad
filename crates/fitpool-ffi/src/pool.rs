//! Pool lifecycle FFI: create, alloc, data, free, stats, visualize, destroy.
//!
//! Uses per-pool `Arc<Mutex<Pool>>` so the global `POOLS` table lock is
//! only held briefly (for handle lookup). Operations on different pools
//! never contend; operations on the same pool are serialised by its mutex.
//!
//! Pool handles are slot keys into `POOLS`. Record handles are
//! [`FitpoolRecord`] pairs carrying the issuing pool's id next to the slot
//! key, so a record passed to the wrong pool is rejected rather than
//! resolved against that pool's own slots.

use std::ffi::c_char;
use std::sync::{Arc, Mutex};

use fitpool_arena::Pool;
use fitpool_core::{PoolId, RecordHandle, SlotKey, SlotTable};

use crate::status::FitpoolStatus;

type PoolArc = Arc<Mutex<Pool>>;

static POOLS: Mutex<SlotTable<PoolArc>> = Mutex::new(SlotTable::new());

/// C-compatible record handle.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FitpoolRecord {
    /// Id of the issuing pool. Not the pool handle.
    pub pool: u64,
    /// Packed slot index and generation within that pool.
    pub key: u64,
}

/// Record handle that `fitpool_free` treats as "nothing to free".
///
/// Pool id 0 is never issued, so no live record compares equal.
pub const FITPOOL_NULL_RECORD: FitpoolRecord = FitpoolRecord {
    pool: 0,
    key: u64::MAX,
};

impl From<RecordHandle> for FitpoolRecord {
    fn from(handle: RecordHandle) -> Self {
        Self {
            pool: handle.pool().get(),
            key: handle.key().to_bits(),
        }
    }
}

impl From<FitpoolRecord> for RecordHandle {
    fn from(record: FitpoolRecord) -> Self {
        RecordHandle::new(PoolId::from_raw(record.pool), SlotKey::from_bits(record.key))
    }
}

/// C-compatible aggregate pool counters.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FitpoolStats {
    /// Total reserved bytes, pool header included.
    pub capacity: usize,
    /// Bytes consumed by live records, headers included.
    pub used: usize,
    /// Number of live records.
    pub count: usize,
}

/// Clone the Arc for a pool handle, briefly locking the global table.
fn get_pool(handle: u64) -> Result<PoolArc, FitpoolStatus> {
    lookup(&POOLS, handle)
}

/// `InvalidPool` for an unknown handle, `InternalError` for a poisoned table.
fn lookup(table: &Mutex<SlotTable<PoolArc>>, handle: u64) -> Result<PoolArc, FitpoolStatus> {
    let table = table.lock().map_err(|_| FitpoolStatus::InternalError)?;
    table
        .get(SlotKey::from_bits(handle))
        .cloned()
        .ok_or(FitpoolStatus::InvalidPool)
}

/// Create a pool of `capacity` bytes.
///
/// On success, writes the pool handle to `pool_out` and returns
/// `FITPOOL_STATUS_OK`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn fitpool_create(capacity: usize, pool_out: *mut u64) -> i32 {
    ffi_guard!({
        if pool_out.is_null() {
            return FitpoolStatus::InvalidArgument as i32;
        }
        let pool = match Pool::create(capacity) {
            Ok(p) => p,
            Err(e) => return FitpoolStatus::from(&e) as i32,
        };
        let key = ffi_lock!(POOLS).insert(Arc::new(Mutex::new(pool)));
        // SAFETY: pool_out is non-null and valid per caller contract.
        unsafe { *pool_out = key.to_bits() };
        FitpoolStatus::Ok as i32
    })
}

/// Allocate `size` bytes from a pool.
///
/// On success, writes the record handle to `record_out`. Fails with
/// `FITPOOL_STATUS_OUT_OF_BUDGET` or `FITPOOL_STATUS_NO_FIT` when the pool
/// cannot satisfy the request.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn fitpool_alloc(
    pool: u64,
    size: usize,
    record_out: *mut FitpoolRecord,
) -> i32 {
    ffi_guard!({
        if record_out.is_null() {
            return FitpoolStatus::InvalidArgument as i32;
        }
        let pool_arc = match get_pool(pool) {
            Ok(arc) => arc,
            Err(status) => return status as i32,
        };
        let handle = match ffi_lock!(pool_arc).allocate(size) {
            Ok(h) => h,
            Err(e) => return FitpoolStatus::from(&e) as i32,
        };
        // SAFETY: record_out is non-null and valid per caller contract.
        unsafe { *record_out = FitpoolRecord::from(handle) };
        FitpoolStatus::Ok as i32
    })
}

/// Resolve a record to its data bytes.
///
/// Writes the data pointer to `ptr_out` and its length (the aligned size,
/// possibly zero) to `len_out`. The pointer stays valid until the record
/// is freed or the pool destroyed; writes through it must not race with
/// other calls on the same pool.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn fitpool_data(
    pool: u64,
    record: FitpoolRecord,
    ptr_out: *mut *mut u8,
    len_out: *mut usize,
) -> i32 {
    ffi_guard!({
        if ptr_out.is_null() || len_out.is_null() {
            return FitpoolStatus::InvalidArgument as i32;
        }
        let pool_arc = match get_pool(pool) {
            Ok(arc) => arc,
            Err(status) => return status as i32,
        };
        let mut pool = ffi_lock!(pool_arc);
        let data = match pool.data_mut(record.into()) {
            Ok(d) => d,
            Err(e) => return FitpoolStatus::from(&e) as i32,
        };
        // SAFETY: both out-pointers are non-null and valid per caller contract.
        unsafe {
            *ptr_out = data.as_mut_ptr();
            *len_out = data.len();
        }
        FitpoolStatus::Ok as i32
    })
}

/// Free a record. `FITPOOL_NULL_RECORD` is a no-op.
///
/// Freeing a record twice returns `FITPOOL_STATUS_USE_AFTER_FREE`; a record
/// this pool never issued, including one from another pool, returns
/// `FITPOOL_STATUS_INVALID_RECORD` and leaves the pool untouched.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn fitpool_free(pool: u64, record: FitpoolRecord) -> i32 {
    ffi_guard!({
        let pool_arc = match get_pool(pool) {
            Ok(arc) => arc,
            Err(status) => return status as i32,
        };
        let mut pool = ffi_lock!(pool_arc);
        let handle = (record != FITPOOL_NULL_RECORD).then(|| RecordHandle::from(record));
        match pool.free(handle) {
            Ok(()) => FitpoolStatus::Ok as i32,
            Err(e) => FitpoolStatus::from(&e) as i32,
        }
    })
}

/// Read a pool's aggregate counters into `stats_out`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn fitpool_stats(pool: u64, stats_out: *mut FitpoolStats) -> i32 {
    ffi_guard!({
        if stats_out.is_null() {
            return FitpoolStatus::InvalidArgument as i32;
        }
        let pool_arc = match get_pool(pool) {
            Ok(arc) => arc,
            Err(status) => return status as i32,
        };
        let stats = ffi_lock!(pool_arc).stats();
        // SAFETY: stats_out is non-null and valid per caller contract.
        unsafe {
            *stats_out = FitpoolStats {
                capacity: stats.capacity,
                used: stats.used,
                count: stats.count,
            };
        }
        FitpoolStatus::Ok as i32
    })
}

/// Render the layout report into `buf` as a NUL-terminated string.
///
/// `len_out` always receives the report length excluding the terminator.
/// If `cap` cannot hold the report plus terminator, nothing is written to
/// `buf` and `FITPOOL_STATUS_BUFFER_TOO_SMALL` is returned, so a caller can pass
/// `buf = NULL, cap = 0` to query the size first.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn fitpool_visualize(
    pool: u64,
    buf: *mut c_char,
    cap: usize,
    len_out: *mut usize,
) -> i32 {
    ffi_guard!({
        if len_out.is_null() || (buf.is_null() && cap > 0) {
            return FitpoolStatus::InvalidArgument as i32;
        }
        let pool_arc = match get_pool(pool) {
            Ok(arc) => arc,
            Err(status) => return status as i32,
        };
        let report = ffi_lock!(pool_arc).visualize();
        let len = report.len();
        // SAFETY: len_out is non-null and valid per caller contract.
        unsafe { *len_out = len };
        if cap <= len {
            return FitpoolStatus::BufferTooSmall as i32;
        }
        // SAFETY: buf is non-null (cap > len >= 0) and points to cap writable bytes.
        let dst = unsafe { std::slice::from_raw_parts_mut(buf.cast::<u8>(), cap) };
        dst[..len].copy_from_slice(report.as_bytes());
        dst[len] = 0;
        FitpoolStatus::Ok as i32
    })
}

/// Destroy a pool, releasing its whole region.
///
/// Outstanding records do not prevent destruction; their count is written
/// to `leaked_out` when it is non-null.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn fitpool_destroy(pool: u64, leaked_out: *mut u64) -> i32 {
    ffi_guard!({
        let pool_arc = match ffi_lock!(POOLS).remove(SlotKey::from_bits(pool)) {
            Some(arc) => arc,
            None => return FitpoolStatus::InvalidPool as i32,
        };
        let leaked = match Arc::try_unwrap(pool_arc) {
            Ok(mutex) => match mutex.into_inner() {
                Ok(pool) => pool.destroy().leaked,
                Err(_) => return FitpoolStatus::InternalError as i32,
            },
            // Another call still holds the pool; the last holder drops it.
            Err(shared) => {
                let pool = ffi_lock!(shared);
                pool.stats().count
            }
        };
        if !leaked_out.is_null() {
            // SAFETY: leaked_out is non-null and valid per caller contract.
            unsafe { *leaked_out = leaked as u64 };
        }
        FitpoolStatus::Ok as i32
    })
}
