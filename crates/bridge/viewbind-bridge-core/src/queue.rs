//! Readiness queue: operations deferred until the runtime has loaded.
//!
//! State machine (one way, no reverse transitions):
//!
//! ```text
//! NotReady --flush()--> Flushing --drained--> Ready
//!     \___________________\_____dispose()____> Disposed
//! ```
//!
//! While not `Ready`, submissions are appended to the tail of the pending list.
//! `flush` swaps the list out before running it, so anything submitted by a
//! running operation lands in a fresh list that is drained right after the
//! current batch. Each operation therefore runs at most once and in submission
//! order, no matter how submissions interleave with the flush.

use std::cell::RefCell;
use std::fmt;
use std::mem;
use std::rc::Rc;

use crate::error::RuntimeError;

pub type PendingFn = Box<dyn FnOnce() -> Result<(), RuntimeError>>;

struct PendingOperation {
    seq: u64,
    op: PendingFn,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum QueueState {
    NotReady,
    Flushing,
    Ready,
    Disposed,
}

/// What happened to a submitted operation.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Submission {
    /// Ran synchronously because the queue was ready.
    Executed,
    Queued,
    /// The queue was disposed; the operation was dropped unrun.
    Discarded,
}

/// Outcome of a `flush` call.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct FlushReport {
    pub executed: usize,
    pub failed: usize,
    /// Operations dropped because the queue was disposed mid-flush.
    pub discarded: usize,
}

struct QueueInner {
    state: QueueState,
    pending: Vec<PendingOperation>,
    next_seq: u64,
}

/// Shared handle to a readiness queue. Clones refer to the same queue.
#[derive(Clone)]
pub struct ReadinessQueue {
    inner: Rc<RefCell<QueueInner>>,
}

impl ReadinessQueue {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: Rc::new(RefCell::new(QueueInner {
                state: QueueState::NotReady,
                pending: Vec::with_capacity(capacity),
                next_seq: 0,
            })),
        }
    }

    pub fn state(&self) -> QueueState {
        self.inner.borrow().state
    }

    pub fn is_ready(&self) -> bool {
        self.state() == QueueState::Ready
    }

    /// Number of operations waiting for readiness.
    pub fn len(&self) -> usize {
        self.inner.borrow().pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append `op` unless the queue is already ready, in which case it runs
    /// immediately (appending would strand it).
    pub fn enqueue<F>(&self, op: F) -> Submission
    where
        F: FnOnce() -> Result<(), RuntimeError> + 'static,
    {
        self.submit(Box::new(op))
    }

    /// Run `op` now if ready, otherwise queue it.
    pub fn execute_when_ready<F>(&self, op: F) -> Submission
    where
        F: FnOnce() -> Result<(), RuntimeError> + 'static,
    {
        self.submit(Box::new(op))
    }

    fn submit(&self, op: PendingFn) -> Submission {
        {
            let mut inner = self.inner.borrow_mut();
            match inner.state {
                QueueState::Disposed => {
                    log::debug!("readiness queue disposed; dropping operation");
                    return Submission::Discarded;
                }
                QueueState::NotReady | QueueState::Flushing => {
                    let seq = inner.next_seq;
                    inner.next_seq += 1;
                    inner.pending.push(PendingOperation { seq, op });
                    log::debug!("queued pending operation #{seq}");
                    return Submission::Queued;
                }
                QueueState::Ready => {}
            }
        }
        if let Err(err) = op() {
            log::warn!("error executing operation: {err}");
        }
        Submission::Executed
    }

    /// Run every pending operation in submission order and become ready.
    ///
    /// Only the first call does anything. Failures are logged and isolated.
    pub fn flush(&self) -> FlushReport {
        {
            let mut inner = self.inner.borrow_mut();
            if inner.state != QueueState::NotReady {
                log::debug!("flush ignored in state {:?}", inner.state);
                return FlushReport::default();
            }
            inner.state = QueueState::Flushing;
        }

        let mut report = FlushReport::default();
        loop {
            let batch = {
                let mut inner = self.inner.borrow_mut();
                if inner.state == QueueState::Disposed {
                    break;
                }
                mem::take(&mut inner.pending)
            };
            if batch.is_empty() {
                break;
            }
            let mut ops = batch.into_iter();
            while let Some(PendingOperation { seq, op }) = ops.next() {
                match op() {
                    Ok(()) => report.executed += 1,
                    Err(err) => {
                        report.failed += 1;
                        log::warn!("error executing pending operation #{seq}: {err}");
                    }
                }
                if self.state() == QueueState::Disposed {
                    report.discarded += ops.len();
                    break;
                }
            }
        }

        let mut inner = self.inner.borrow_mut();
        if inner.state == QueueState::Flushing {
            inner.state = QueueState::Ready;
        }
        report
    }

    /// Drop pending operations without running them. Later submissions are
    /// discarded too.
    pub fn dispose(&self) -> usize {
        let dropped = {
            let mut inner = self.inner.borrow_mut();
            inner.state = QueueState::Disposed;
            mem::take(&mut inner.pending)
        };
        if !dropped.is_empty() {
            log::debug!("discarded {} pending operations", dropped.len());
        }
        dropped.len()
    }

    pub fn ptr_eq(&self, other: &ReadinessQueue) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Default for ReadinessQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ReadinessQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("ReadinessQueue")
            .field("state", &inner.state)
            .field("pending", &inner.pending.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recorder() -> (Rc<RefCell<Vec<&'static str>>>, impl Fn(&'static str) -> PendingFn) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = log.clone();
        let make = move |name: &'static str| -> PendingFn {
            let sink = sink.clone();
            Box::new(move || {
                sink.borrow_mut().push(name);
                Ok(())
            })
        };
        (log, make)
    }

    #[test]
    fn flush_runs_in_submission_order_once() {
        let (log, op) = recorder();
        let q = ReadinessQueue::new();
        assert_eq!(q.enqueue(op("op1")), Submission::Queued);
        assert_eq!(q.execute_when_ready(op("op2")), Submission::Queued);
        assert_eq!(q.enqueue(op("op3")), Submission::Queued);
        assert!(log.borrow().is_empty());

        let report = q.flush();
        assert_eq!(report.executed, 3);
        assert_eq!(*log.borrow(), vec!["op1", "op2", "op3"]);
        assert!(q.is_ready());

        // second flush is a no-op
        assert_eq!(q.flush(), FlushReport::default());
        assert_eq!(log.borrow().len(), 3);
    }

    #[test]
    fn failing_operation_does_not_stop_siblings() {
        let (log, op) = recorder();
        let q = ReadinessQueue::new();
        q.enqueue(op("op1"));
        q.enqueue(|| Err(RuntimeError::Native("boom".into())));
        q.enqueue(op("op3"));

        let report = q.flush();
        assert_eq!(report.executed, 2);
        assert_eq!(report.failed, 1);
        assert_eq!(*log.borrow(), vec!["op1", "op3"]);
    }

    #[test]
    fn ready_queue_executes_immediately() {
        let (log, op) = recorder();
        let q = ReadinessQueue::new();
        q.flush();
        assert_eq!(q.execute_when_ready(op("now")), Submission::Executed);
        assert_eq!(q.enqueue(op("also")), Submission::Executed);
        assert_eq!(*log.borrow(), vec!["now", "also"]);
        assert!(q.is_empty());
    }

    #[test]
    fn submissions_during_flush_run_after_current_batch() {
        let (log, op) = recorder();
        let q = ReadinessQueue::new();
        let inner_q = q.clone();
        let late = op("late");
        let sink = log.clone();
        q.enqueue(move || {
            sink.borrow_mut().push("first");
            assert_eq!(inner_q.execute_when_ready(late), Submission::Queued);
            Ok(())
        });
        q.enqueue(op("second"));

        let report = q.flush();
        assert_eq!(report.executed, 3);
        assert_eq!(*log.borrow(), vec!["first", "second", "late"]);
        assert_eq!(q.state(), QueueState::Ready);
    }

    #[test]
    fn dispose_discards_without_running() {
        let (log, op) = recorder();
        let q = ReadinessQueue::new();
        q.enqueue(op("a"));
        q.enqueue(op("b"));
        assert_eq!(q.dispose(), 2);
        assert_eq!(q.enqueue(op("c")), Submission::Discarded);
        assert_eq!(q.flush(), FlushReport::default());
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn dispose_mid_flush_drops_remainder() {
        let (log, op) = recorder();
        let q = ReadinessQueue::new();
        let handle = q.clone();
        q.enqueue(op("a"));
        q.enqueue(move || {
            handle.dispose();
            Ok(())
        });
        q.enqueue(op("never"));

        let report = q.flush();
        assert_eq!(report.executed, 2);
        assert_eq!(report.discarded, 1);
        assert_eq!(*log.borrow(), vec!["a"]);
        assert_eq!(q.state(), QueueState::Disposed);
    }
}
