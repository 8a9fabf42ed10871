//! # Circular Buffer and Bounded Blocking Deque
//!
//! 环形缓冲区与有界阻塞双端队列
//!
//! `syncring` provides two layers:
//!
//! - [`CircularBuffer`] - a fixed-capacity ring container with random-access
//!   cursors, insertion and erasure at any logical position, and
//!   overwrite-on-full pushes at both ends
//! - [`BlockingDeque`] - a thread-safe bounded deque wrapping one
//!   `CircularBuffer` behind a mutex and two condition variables
//!
//! `syncring` 提供两层结构：
//!
//! - [`CircularBuffer`] - 固定容量的环形容器，支持随机访问游标、任意逻辑位置的插入和删除，
//!   以及两端满时覆盖的推送
//! - [`BlockingDeque`] - 线程安全的有界双端队列，用一个互斥锁和两个条件变量包装一个 `CircularBuffer`
//!
//! ## Quick Start
//!
//! 快速开始
//!
//! ```rust
//! use syncring::CircularBuffer;
//!
//! // Capacity 3: a fourth push evicts the oldest element
//! // 容量为 3：第四次推送会淘汰最旧的元素
//! let mut buf = CircularBuffer::with_capacity(3);
//! for i in 1..=4 {
//!     buf.push_back(i);
//! }
//! assert_eq!(buf.iter().copied().collect::<Vec<_>>(), [2, 3, 4]);
//!
//! // Pushing at the front evicts the newest instead
//! // 在头部推送则淘汰最新的元素
//! assert_eq!(buf.push_front(1), Some(4));
//! assert_eq!(buf.iter().copied().collect::<Vec<_>>(), [1, 2, 3]);
//! ```
//!
//! ## Multi-threaded Usage
//!
//! 多线程使用
//!
//! ```rust
//! use syncring::{BlockingDeque, FullPolicy};
//! use std::num::NonZero;
//! use std::sync::Arc;
//! use std::thread;
//!
//! let deque = Arc::new(BlockingDeque::new(NonZero::new(1).unwrap(), FullPolicy::Block));
//! deque.push_back(1);
//!
//! // The deque is full: this push waits for the pop below
//! // 队列已满：这次推送会等待下面的弹出
//! let producer = {
//!     let deque = Arc::clone(&deque);
//!     thread::spawn(move || deque.push_back(2))
//! };
//!
//! assert_eq!(deque.pop_front(), 1);
//! producer.join().unwrap();
//! assert_eq!(deque.pop_front(), 2);
//! ```
//!
//! ## Notes
//!
//! 注意事项
//!
//! - Pushing into a full `CircularBuffer` never fails; the displaced element is returned
//! - `insert_n` evicts from the front while `set_capacity` truncates the back
//! - Blocking operations have no timeout
//!
//! - 向已满的 `CircularBuffer` 推送永不失败；被替换的元素会被返回
//! - `insert_n` 从头部淘汰，而 `set_capacity` 从尾部截断
//! - 阻塞操作没有超时

pub mod alloc;
pub mod circular;
pub mod deque;
pub mod error;
pub mod iter;
mod raw;
mod shim;
mod trace;

pub use alloc::{Global, SlotAllocator};
pub use circular::CircularBuffer;
pub use deque::{BlockingDeque, FullPolicy};
pub use error::{AllocError, CapacityError, OutOfRange};
pub use trace::init_tracing;
