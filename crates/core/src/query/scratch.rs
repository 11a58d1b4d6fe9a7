//! Per-thread traversal buffers, reused across queries.

use petgraph::stable_graph::NodeIndex;
use std::cell::RefCell;
use std::collections::{HashSet, VecDeque};

#[derive(Default)]
pub struct TraversalScratch {
    pub visited: HashSet<NodeIndex>,
    pub queue: VecDeque<NodeIndex>,
}

impl TraversalScratch {
    fn clear(&mut self) {
        self.visited.clear();
        self.queue.clear();
    }
}

thread_local! {
    static SCRATCH: RefCell<TraversalScratch> = RefCell::new(TraversalScratch::default());
}

/// Run `f` with this thread's scratch buffers, cleared before and after.
///
/// A nested call on the same thread gets fresh buffers instead.
pub fn with_scratch<R>(f: impl FnOnce(&mut TraversalScratch) -> R) -> R {
    SCRATCH.with(|cell| match cell.try_borrow_mut() {
        Ok(mut scratch) => {
            scratch.clear();
            let result = f(&mut scratch);
            scratch.clear();
            result
        }
        Err(_) => f(&mut TraversalScratch::default()),
    })
}
