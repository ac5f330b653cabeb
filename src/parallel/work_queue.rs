use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use crossbeam::channel::{unbounded, Receiver, Sender};
use parking_lot::{Condvar, Mutex, RwLock};
use tracing::{debug, error, warn};
use crate::core::error::{Error, ErrorKind, Result};

type Task = Box<dyn FnOnce() -> Result<()> + Send + 'static>;

/// Count of submitted tasks that have not finished running yet, plus the
/// flag telling workers to discard whatever is still queued.
struct Pending {
    count: Mutex<usize>,
    drained: Condvar,
    stopping: AtomicBool,
}

impl Pending {
    fn increment(&self) {
        *self.count.lock() += 1;
    }

    fn decrement(&self) {
        let mut count = self.count.lock();
        *count -= 1;
        if *count == 0 {
            self.drained.notify_all();
        }
    }
}

/// Fixed-size pool of worker threads pulling tasks from one shared queue.
///
/// [`finish`](Self::finish) waits for every submitted task, including tasks
/// submitted by running tasks, so it doubles as the barrier for recursive
/// work such as crawling.
pub struct WorkQueue {
    sender: RwLock<Option<Sender<Task>>>,
    pending: Arc<Pending>,
    workers: Mutex<Vec<JoinHandle<()>>>,
    size: usize,
}

impl WorkQueue {
    pub fn new(threads: usize) -> Result<Self> {
        if threads == 0 {
            return Err(Error::invalid_argument("work queue needs at least one worker"));
        }

        let (sender, receiver) = unbounded::<Task>();
        let pending = Arc::new(Pending {
            count: Mutex::new(0),
            drained: Condvar::new(),
            stopping: AtomicBool::new(false),
        });

        let mut workers = Vec::with_capacity(threads);
        for id in 0..threads {
            let receiver = receiver.clone();
            let pending = Arc::clone(&pending);
            let handle = thread::Builder::new()
                .name(format!("work-queue-{}", id))
                .spawn(move || Self::worker(id, receiver, pending))
                .map_err(|e| Error::new(ErrorKind::Internal, format!("unable to spawn worker {}: {}", id, e)))?;
            workers.push(handle);
        }

        Ok(WorkQueue {
            sender: RwLock::new(Some(sender)),
            pending,
            workers: Mutex::new(workers),
            size: threads,
        })
    }

    fn worker(id: usize, receiver: Receiver<Task>, pending: Arc<Pending>) {
        // recv fails once the queue is shut down and emptied
        while let Ok(task) = receiver.recv() {
            if pending.stopping.load(Ordering::Acquire) {
                drop(task);
                pending.decrement();
                continue;
            }
            match panic::catch_unwind(AssertUnwindSafe(task)) {
                Ok(Ok(())) => {}
                Ok(Err(e)) => warn!(worker = id, "task failed: {}", e),
                Err(_) => error!(worker = id, "task panicked"),
            }
            pending.decrement();
        }
        debug!(worker = id, "worker exiting");
    }

    /// Number of worker threads.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Submits a task without blocking. Fails once shutdown has begun.
    pub fn execute<F>(&self, task: F) -> Result<()>
    where
        F: FnOnce() -> Result<()> + Send + 'static,
    {
        let sender = self.sender.read();
        let sender = sender
            .as_ref()
            .ok_or_else(|| Error::invalid_state("work queue is shut down"))?;

        // Counted before it becomes visible, so finish() cannot see zero
        // while the task is still in flight.
        self.pending.increment();
        if sender.send(Box::new(task)).is_err() {
            self.pending.decrement();
            return Err(Error::invalid_state("work queue is shut down"));
        }
        Ok(())
    }

    /// Blocks until no submitted task is queued or running.
    ///
    /// Must not be called from inside a task: the caller's own task would
    /// never be counted as finished.
    pub fn finish(&self) {
        let mut count = self.pending.count.lock();
        while *count > 0 {
            self.pending.drained.wait(&mut count);
        }
    }

    /// Tasks submitted and not yet completed.
    pub fn pending(&self) -> usize {
        *self.pending.count.lock()
    }

    /// Stops accepting work, lets each worker finish its current task and
    /// joins them. Tasks still queued are discarded without running.
    pub fn shutdown(&self) {
        self.pending.stopping.store(true, Ordering::Release);
        // Dropping the only sender disconnects the channel.
        let discarded = self.sender.write().take().map_or(0, |sender| sender.len());
        if discarded > 0 {
            debug!(discarded, "discarding queued tasks");
        }

        let current = thread::current().id();
        let workers = std::mem::take(&mut *self.workers.lock());
        for handle in workers {
            // a worker dropping the last handle cannot join itself
            if handle.thread().id() == current {
                continue;
            }
            if handle.join().is_err() {
                error!("worker thread terminated abnormally");
            }
        }
    }

    pub fn is_shutdown(&self) -> bool {
        self.sender.read().is_none()
    }
}

impl Drop for WorkQueue {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    #[test]
    fn finish_waits_for_all_tasks() {
        let queue = WorkQueue::new(4).unwrap();
        let done = Arc::new(AtomicUsize::new(0));

        for _ in 0..100 {
            let done = Arc::clone(&done);
            queue
                .execute(move || {
                    thread::sleep(Duration::from_millis(1));
                    done.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                })
                .unwrap();
        }

        queue.finish();
        assert_eq!(done.load(Ordering::SeqCst), 100);
        assert_eq!(queue.pending(), 0);
    }

    fn spawn_tree(queue: Arc<WorkQueue>, depth: usize, done: Arc<AtomicUsize>) -> Result<()> {
        done.fetch_add(1, Ordering::SeqCst);
        if depth == 0 {
            return Ok(());
        }
        for _ in 0..2 {
            let child_queue = Arc::clone(&queue);
            let done = Arc::clone(&done);
            queue.execute(move || spawn_tree(child_queue, depth - 1, done))?;
        }
        Ok(())
    }

    #[test]
    fn finish_covers_nested_submissions() {
        let queue = Arc::new(WorkQueue::new(3).unwrap());
        let done = Arc::new(AtomicUsize::new(0));

        let root_queue = Arc::clone(&queue);
        let root_done = Arc::clone(&done);
        queue.execute(move || spawn_tree(root_queue, 6, root_done)).unwrap();
        queue.finish();

        // full binary tree of depth 6
        assert_eq!(done.load(Ordering::SeqCst), (1 << 7) - 1);
        assert_eq!(queue.pending(), 0);
    }

    #[test]
    fn failing_and_panicking_tasks_do_not_stall_the_pool() {
        let queue = WorkQueue::new(2).unwrap();
        let done = Arc::new(AtomicUsize::new(0));

        queue.execute(|| Err(Error::invalid_state("boom"))).unwrap();
        queue.execute(|| panic!("task panic")).unwrap();
        for _ in 0..10 {
            let done = Arc::clone(&done);
            queue
                .execute(move || {
                    done.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                })
                .unwrap();
        }

        queue.finish();
        assert_eq!(done.load(Ordering::SeqCst), 10);
        assert_eq!(queue.pending(), 0);
    }

    #[test]
    fn execute_after_shutdown_fails() {
        let queue = WorkQueue::new(1).unwrap();
        queue.shutdown();
        assert!(queue.is_shutdown());
        let err = queue.execute(|| Ok(())).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidState);
        assert_eq!(queue.pending(), 0);
        // second shutdown is a no-op
        queue.shutdown();
    }

    #[test]
    fn shutdown_discards_tasks_that_have_not_started() {
        let queue = Arc::new(WorkQueue::new(1).unwrap());
        let ran = Arc::new(AtomicUsize::new(0));
        let (started_tx, started_rx) = crossbeam::channel::bounded::<()>(1);
        let (release_tx, release_rx) = crossbeam::channel::bounded::<()>(1);

        // the only worker blocks here until shutdown has begun
        queue
            .execute(move || {
                started_tx.send(()).unwrap();
                release_rx.recv().unwrap();
                Ok(())
            })
            .unwrap();
        for _ in 0..20 {
            let ran = Arc::clone(&ran);
            queue
                .execute(move || {
                    ran.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                })
                .unwrap();
        }
        started_rx.recv().unwrap();

        let stopper = {
            let queue = Arc::clone(&queue);
            thread::spawn(move || queue.shutdown())
        };
        while !queue.is_shutdown() {
            thread::yield_now();
        }
        release_tx.send(()).unwrap();
        stopper.join().unwrap();

        assert_eq!(ran.load(Ordering::SeqCst), 0);
        assert_eq!(queue.pending(), 0);
        // nothing left to wait for
        queue.finish();
    }

    #[test]
    fn zero_workers_is_rejected() {
        assert!(WorkQueue::new(0).is_err());
    }
}
