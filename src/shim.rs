//! Shim module to abstract over std and loom primitives.
//!
//! The blocking deque takes its mutex and condition variables from here, so
//! the same code runs on `std` in production and under `loom` in model tests.
//!
//! 阻塞双端队列从这里获取互斥锁和条件变量，生产环境使用 `std`，模型测试使用 `loom`。

#[cfg(not(feature = "loom"))]
pub(crate) mod sync {
    pub(crate) use std::sync::{Condvar, Mutex, MutexGuard};
}

#[cfg(feature = "loom")]
pub(crate) mod sync {
    pub(crate) use loom::sync::{Condvar, Mutex, MutexGuard};
}
