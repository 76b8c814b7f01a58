//! Scratch-buffer pool for diff calls.
//!
//! Every [`diff`](crate::diff::diff) call checks one [`DiffScratch`] out of
//! a process-wide pool and checks it back in on return, so steady-state
//! diffing allocates nothing for its key→index maps and LIS work arrays.
//!
//! Invariants:
//! - a scratch is fully cleared on checkin; no state from one call is ever
//!   visible to a later one
//! - the pool retains at most [`MAX_POOLED`] scratches, and never retains
//!   one whose buffers grew past [`MAX_RETAINED_CAPACITY`]

use compact_str::CompactString;
use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use crate::algo::LisScratch;

/// Upper bound on pooled scratches. Concurrent diff calls beyond this just
/// allocate fresh.
const MAX_POOLED: usize = 8;

/// A scratch whose buffers exceed this capacity is dropped instead of
/// pooled, bounding retained memory after one huge diff.
const MAX_RETAINED_CAPACITY: usize = 4096;

static POOL: Mutex<Vec<DiffScratch>> = Mutex::new(Vec::new());

/// Per-call working memory for the differ.
#[derive(Debug, Default)]
pub(crate) struct DiffScratch {
    /// Key → child index for the old side of one keyed list. Doubles as
    /// the attribute-name index, which is always drained before any child
    /// reconciliation at the same level begins.
    pub old_index: FxHashMap<CompactString, usize>,
    /// Key → child index for the new side of one keyed list.
    pub new_index: FxHashMap<CompactString, usize>,
    /// Old positions of matched children, in new order.
    pub seq: Vec<usize>,
    /// LIS work arrays.
    pub lis: LisScratch,
}

impl DiffScratch {
    fn clear(&mut self) {
        self.old_index.clear();
        self.new_index.clear();
        self.seq.clear();
        self.lis.clear();
    }

    fn retained_capacity(&self) -> usize {
        self.old_index
            .capacity()
            .max(self.new_index.capacity())
            .max(self.seq.capacity())
            .max(self.lis.retained_capacity())
    }
}

/// Take a scratch from the pool, or allocate a fresh one.
pub(crate) fn checkout() -> DiffScratch {
    POOL.lock().pop().unwrap_or_default()
}

/// Clear a scratch and return it to the pool, subject to the retention caps.
pub(crate) fn checkin(mut scratch: DiffScratch) {
    scratch.clear();
    if scratch.retained_capacity() > MAX_RETAINED_CAPACITY {
        return;
    }
    let mut pool = POOL.lock();
    if pool.len() < MAX_POOLED {
        pool.push(scratch);
    }
}
