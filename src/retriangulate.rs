//! Concurrent breadth-first search over canonical signatures (C10).
//!
//! Workers share a single priority queue (by signature length, shorter is
//! better) and a signature-to-parent map under one mutex; a condition
//! variable lets idle workers sleep until new work arrives or the search
//! is finished. This mirrors a thread pool built directly on
//! `std::sync::{Mutex, Condvar}` rather than a work-stealing executor,
//! since the action callback's contract (never re-entrant, invoked under
//! the lock, called at most once per signature) is easiest to guarantee
//! with a single shared critical section.

use crate::error::{CoreError, Result};
use crate::triangulation::PachnerMoves;
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};
use std::sync::{Arc, Condvar, Mutex};
use std::thread;

#[derive(Debug, Clone, Eq, PartialEq)]
struct QueueEntry {
    sig: String,
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap; shorter signatures are higher priority,
        // so they must compare as "greater". Ties break on the string
        // itself, arbitrarily but deterministically.
        other.sig.len().cmp(&self.sig.len()).then_with(|| self.sig.cmp(&other.sig))
    }
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

struct Controller<Obj, F, C> {
    queue: BinaryHeap<QueueEntry>,
    map: HashMap<String, String>,
    running: usize,
    done: bool,
    /// `true` only if `done` was set because `action` returned `true`, as
    /// opposed to queue exhaustion or cancellation; tracked separately
    /// from `done` since both terminate every worker the same way.
    success: bool,
    action: F,
    cancel: C,
    _marker: std::marker::PhantomData<Obj>,
}

fn lock<T>(m: &Mutex<T>) -> Result<std::sync::MutexGuard<'_, T>> {
    m.lock().map_err(|e| CoreError::WorkerPanicked { reason: e.to_string() })
}

/// Search outward from `obj` by applying legal local moves (§4.7's
/// `with_pachner`/move surface), visiting each distinct signature at most
/// once, until `action` reports success or the search is exhausted.
///
/// `max_extra` bounds how much larger than `obj` a candidate may grow
/// (`None` is unbounded). `thread_count` workers (clamped to at least one)
/// share the search queue. `action(sig, candidate)` is invoked at most once
/// per distinct signature, under the search's internal lock — it must be
/// short and must not call back into `retriangulate`. `cancel()` is polled
/// by idle workers; once it returns `true` the search stops and returns
/// `Ok(false)`.
///
/// Returns `Ok(true)` iff some invocation of `action` returned `true`.
/// Returns `Err(CoreError::WorkerPanicked)` if a worker thread panicked
/// (the shared lock is never left silently poisoned and recovered from).
pub fn retriangulate<Obj, F, C>(obj: &Obj, max_extra: Option<usize>, thread_count: usize, action: F, cancel: C) -> Result<bool>
where
    Obj: PachnerMoves + Send + 'static,
    F: FnMut(&str, &Obj) -> bool + Send + 'static,
    C: FnMut() -> bool + Send + 'static,
{
    let sig0 = obj.canonical_signature();
    let start_size = obj.size();
    let max_size = max_extra.map(|extra| start_size + extra);

    let controller = Arc::new(Mutex::new(Controller {
        queue: BinaryHeap::new(),
        map: HashMap::new(),
        running: 0,
        done: false,
        success: false,
        action,
        cancel,
        _marker: std::marker::PhantomData::<Obj>,
    }));
    let cv = Arc::new(Condvar::new());

    {
        let mut st = lock(&controller)?;
        if (st.action)(&sig0, obj) {
            st.done = true;
            st.success = true;
            tracing::debug!(signature = %sig0, "retriangulate: initial object satisfies action, stopping immediately");
            return Ok(true);
        }
        st.map.insert(sig0.clone(), sig0.clone());
        st.queue.push(QueueEntry { sig: sig0 });
    }

    let thread_count = thread_count.max(1);
    tracing::debug!(thread_count, start_size, ?max_size, "retriangulate: launching worker pool");
    let mut handles = Vec::with_capacity(thread_count);
    for _ in 0..thread_count {
        let ctl = Arc::clone(&controller);
        let cvc = Arc::clone(&cv);
        handles.push(thread::spawn(move || worker_loop(ctl, cvc, max_size)));
    }

    for handle in handles {
        if handle.join().is_err() {
            return Err(CoreError::WorkerPanicked {
                reason: "a retriangulator worker thread panicked".to_string(),
            });
        }
    }

    let st = lock(&controller)?;
    tracing::debug!(visited = st.map.len(), success = st.success, "retriangulate: search finished");
    Ok(st.success)
}

fn worker_loop<Obj, F, C>(controller: Arc<Mutex<Controller<Obj, F, C>>>, cv: Arc<Condvar>, max_size: Option<usize>)
where
    Obj: PachnerMoves,
    F: FnMut(&str, &Obj) -> bool,
    C: FnMut() -> bool,
{
    loop {
        let sig = {
            let mut st = controller.lock().expect("retriangulator mutex poisoned");
            loop {
                if st.done {
                    cv.notify_all();
                    return;
                }
                // Polled once per work item (here, before claiming the next
                // one) per §5's "workers poll it between work items".
                if (st.cancel)() {
                    st.done = true;
                    tracing::debug!("retriangulate: cancellation observed, stopping");
                    cv.notify_all();
                    return;
                }
                if let Some(entry) = st.queue.pop() {
                    st.running += 1;
                    tracing::trace!(signature = %entry.sig, queue_len = st.queue.len(), "retriangulate: popped work item");
                    break entry.sig;
                }
                if st.running == 0 {
                    st.done = true;
                    tracing::debug!("retriangulate: queue exhausted, no work in flight, stopping");
                    cv.notify_all();
                    return;
                }
                st = cv.wait(st).expect("retriangulator mutex poisoned");
            }
        };

        // Any failure here means a signature this search itself produced
        // did not round-trip through `from_signature`, which is a logic
        // error in the `PachnerMoves` implementor, not a recoverable
        // runtime condition; the resulting panic poisons the lock and is
        // reported to the caller as `CoreError::WorkerPanicked`, per §5's
        // panic-containment contract.
        let current = Obj::from_signature(&sig).expect("signature produced by this search failed to reconstruct");
        let candidates: Vec<(String, Obj)> = current
            .local_moves(max_size)
            .into_iter()
            .map(|cand| (cand.canonical_signature(), cand))
            .collect();

        let mut stop = false;
        {
            let mut st = controller.lock().expect("retriangulator mutex poisoned");
            st.running -= 1;
            for (cand_sig, cand) in candidates {
                if st.map.contains_key(&cand_sig) {
                    continue;
                }
                st.map.insert(cand_sig.clone(), sig.clone());
                st.queue.push(QueueEntry { sig: cand_sig.clone() });
                tracing::trace!(signature = %cand_sig, queue_len = st.queue.len(), "retriangulate: pushed new signature");
                if (st.action)(&cand_sig, &cand) {
                    st.done = true;
                    st.success = true;
                    stop = true;
                    break;
                }
            }
            if !stop && st.queue.is_empty() && st.running == 0 {
                st.done = true;
            }
            cv.notify_all();
        }
        if stop {
            return;
        }
    }
}
