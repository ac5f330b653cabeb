pub mod rw_lock;
pub mod work_queue;

pub use rw_lock::{RawReadWriteLock, ReadWriteLock};
pub use work_queue::WorkQueue;
