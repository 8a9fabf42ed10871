//! Bounded blocking deque
//!
//! 有界阻塞双端队列
//!
//! [`BlockingDeque`] wraps one [`CircularBuffer`] behind a mutex and two
//! condition variables so any number of threads can push and pop at both
//! ends. Pops wait while the deque is empty. Pushes into a full deque either
//! wait ([`FullPolicy::Block`]) or evict the opposite end
//! ([`FullPolicy::OverwriteOldest`]).
//!
//! [`BlockingDeque`] 用一个互斥锁和两个条件变量包装一个 [`CircularBuffer`]，
//! 允许任意数量的线程在两端推送和弹出。队列为空时弹出会等待。
//! 向已满的队列推送时，要么等待（[`FullPolicy::Block`]），要么淘汰另一端的元素
//! （[`FullPolicy::OverwriteOldest`]）。
//!
//! There is no timeout: a pop on a deque that never receives an element
//! blocks forever.
//!
//! 没有超时机制：如果队列永远收不到元素，弹出操作将永远阻塞。

use crate::alloc::{Global, SlotAllocator};
use crate::circular::CircularBuffer;
use crate::shim::sync::{Condvar, Mutex, MutexGuard};
use crate::trace::{debug, trace};
use std::fmt;
use std::num::NonZero;
use std::sync::PoisonError;

/// What a push does when the deque is full
///
/// 队列已满时推送的行为
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FullPolicy {
    /// Wait until a pop frees a slot
    ///
    /// 等待直到弹出操作释放槽位
    #[default]
    Block,

    /// Never wait; evict the element at the opposite end
    ///
    /// 从不等待；淘汰另一端的元素
    OverwriteOldest,
}

/// Bounded double-ended queue shared between threads
///
/// 线程间共享的有界双端队列
///
/// # Type Parameters
/// - `T`: Element type
/// - `A`: Allocation strategy of the underlying buffer
///
/// # 类型参数
/// - `T`: 元素类型
/// - `A`: 底层缓冲区的分配策略
///
/// # Examples
///
/// ```
/// use syncring::{BlockingDeque, FullPolicy};
/// use std::num::NonZero;
/// use std::sync::Arc;
/// use std::thread;
///
/// let deque = Arc::new(BlockingDeque::new(NonZero::new(4).unwrap(), FullPolicy::Block));
///
/// let producer = {
///     let deque = Arc::clone(&deque);
///     thread::spawn(move || {
///         for i in 0..100 {
///             deque.push_back(i);
///         }
///     })
/// };
///
/// let received: Vec<i32> = (0..100).map(|_| deque.pop_front()).collect();
/// producer.join().unwrap();
/// assert_eq!(received, (0..100).collect::<Vec<_>>());
/// ```
pub struct BlockingDeque<T, A: SlotAllocator = Global> {
    /// Behavior of pushes on a full buffer
    ///
    /// 缓冲区已满时推送的行为
    policy: FullPolicy,

    /// The only storage; never touched without holding the lock
    ///
    /// 唯一的存储；未持有锁时绝不访问
    buffer: Mutex<CircularBuffer<T, A>>,

    /// Signalled after every insertion
    ///
    /// 每次插入后通知
    not_empty: Condvar,

    /// Signalled after every removal
    ///
    /// 每次移除后通知
    not_full: Condvar,
}

/// End of the deque an operation applies to
#[derive(Debug, Clone, Copy)]
enum Side {
    Front,
    Back,
}

impl<T> BlockingDeque<T> {
    /// Create an empty deque holding up to `capacity` elements
    ///
    /// 创建最多容纳 `capacity` 个元素的空队列
    pub fn new(capacity: NonZero<usize>, policy: FullPolicy) -> Self {
        Self::new_in(capacity, policy, Global)
    }
}

impl<T, A: SlotAllocator> BlockingDeque<T, A> {
    /// Create an empty deque whose buffer allocates from `alloc`
    ///
    /// 创建使用 `alloc` 分配缓冲区的空队列
    pub fn new_in(capacity: NonZero<usize>, policy: FullPolicy, alloc: A) -> Self {
        Self {
            policy,
            buffer: Mutex::new(CircularBuffer::with_capacity_in(capacity.get(), alloc)),
            not_empty: Condvar::new(),
            not_full: Condvar::new(),
        }
    }

    #[inline]
    pub fn policy(&self) -> FullPolicy {
        self.policy
    }

    /// Lock the buffer, recovering from poisoning
    ///
    /// Every buffer operation moves its cursors before running element
    /// destructors, so a thread that panicked while holding the lock cannot
    /// leave the live range inconsistent.
    fn lock(&self) -> MutexGuard<'_, CircularBuffer<T, A>> {
        self.buffer.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn wait<'g>(
        condvar: &Condvar,
        guard: MutexGuard<'g, CircularBuffer<T, A>>,
    ) -> MutexGuard<'g, CircularBuffer<T, A>> {
        condvar.wait(guard).unwrap_or_else(PoisonError::into_inner)
    }

    /// Push an element at the back
    ///
    /// 在尾部推送一个元素
    ///
    /// # Behavior
    ///
    /// - [`FullPolicy::Block`]: waits while the deque is full, then returns `None`.
    /// - [`FullPolicy::OverwriteOldest`]: never waits; returns the front element
    ///   if one had to be evicted.
    ///
    /// The returned element is handed back after the lock is released.
    ///
    /// # 行为
    ///
    /// - [`FullPolicy::Block`]：队列已满时等待，随后返回 `None`。
    /// - [`FullPolicy::OverwriteOldest`]：从不等待；若淘汰了头部元素则返回它。
    ///
    /// 被返回的元素在释放锁之后才交还给调用者。
    pub fn push_back(&self, value: T) -> Option<T> {
        self.push(Side::Back, value)
    }

    /// Push an element at the front
    ///
    /// 在头部推送一个元素
    ///
    /// Same waiting rules as [`push_back`](Self::push_back); in overwrite mode
    /// the back element is the one evicted.
    ///
    /// 等待规则同 [`push_back`](Self::push_back)；覆盖模式下被淘汰的是尾部元素。
    pub fn push_front(&self, value: T) -> Option<T> {
        self.push(Side::Front, value)
    }

    /// Remove the front element, waiting while the deque is empty
    ///
    /// 移除头部元素，队列为空时等待
    pub fn pop_front(&self) -> T {
        self.pop(Side::Front)
    }

    /// Remove the back element, waiting while the deque is empty
    ///
    /// 移除尾部元素，队列为空时等待
    pub fn pop_back(&self) -> T {
        self.pop(Side::Back)
    }

    fn push(&self, side: Side, value: T) -> Option<T> {
        let mut buffer = self.lock();

        if self.policy == FullPolicy::Block {
            while buffer.is_full() {
                trace!(?side, "deque full, waiting for a free slot");
                buffer = Self::wait(&self.not_full, buffer);
            }
        }

        let evicted = match side {
            Side::Back => buffer.push_back(value),
            Side::Front => buffer.push_front(value),
        };
        drop(buffer);

        if evicted.is_some() {
            debug!(?side, "deque full, evicted the opposite end");
        }
        self.not_empty.notify_all();
        evicted
    }

    fn pop(&self, side: Side) -> T {
        let mut buffer = self.lock();

        let value = loop {
            let popped = match side {
                Side::Front => buffer.pop_front(),
                Side::Back => buffer.pop_back(),
            };
            match popped {
                Some(value) => break value,
                None => {
                    trace!(?side, "deque empty, waiting for an element");
                    buffer = Self::wait(&self.not_empty, buffer);
                }
            }
        };
        drop(buffer);

        // Only blocking pushes ever wait on this condition.
        if self.policy == FullPolicy::Block {
            self.not_full.notify_all();
        }
        value
    }

    // ------------------------------------------------------------------
    // Snapshots
    //
    // Each call takes the lock on its own, so the answer may already be
    // stale when it returns.
    //
    // 每次调用单独加锁，返回时结果可能已经过时。
    // ------------------------------------------------------------------

    pub fn capacity(&self) -> usize {
        self.lock().capacity()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.lock().is_full()
    }

    pub fn free_slots(&self) -> usize {
        self.lock().free_slots()
    }

    /// Take the underlying buffer back
    ///
    /// 取回底层缓冲区
    pub fn into_inner(self) -> CircularBuffer<T, A> {
        self.buffer
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T: fmt::Debug, A: SlotAllocator> fmt::Debug for BlockingDeque<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockingDeque")
            .field("policy", &self.policy)
            .field("buffer", &*self.lock())
            .finish()
    }
}

#[cfg(all(test, not(feature = "loom")))]
mod tests {
    use super::*;

    fn cap(n: usize) -> NonZero<usize> {
        NonZero::new(n).unwrap()
    }

    #[test]
    fn test_basic_push_pop() {
        let deque = BlockingDeque::new(cap(4), FullPolicy::Block);

        assert_eq!(deque.push_back(1), None);
        assert_eq!(deque.push_back(2), None);
        assert_eq!(deque.push_front(0), None);

        assert_eq!(deque.len(), 3);
        assert_eq!(deque.pop_front(), 0);
        assert_eq!(deque.pop_back(), 2);
        assert_eq!(deque.pop_front(), 1);
        assert!(deque.is_empty());
    }

    #[test]
    fn test_overwrite_never_blocks() {
        let deque = BlockingDeque::new(cap(1), FullPolicy::OverwriteOldest);

        assert_eq!(deque.push_back(1), None);
        assert_eq!(deque.push_back(2), Some(1));
        assert_eq!(deque.len(), 1);
        assert_eq!(deque.pop_front(), 2);
    }

    #[test]
    fn test_push_front_evicts_back() {
        let deque = BlockingDeque::new(cap(2), FullPolicy::OverwriteOldest);

        deque.push_back(1);
        deque.push_back(2);
        assert_eq!(deque.push_front(0), Some(2));
        assert_eq!(deque.into_inner().iter().copied().collect::<Vec<_>>(), [0, 1]);
    }

    #[test]
    fn test_snapshots() {
        let deque = BlockingDeque::new(cap(3), FullPolicy::Block);
        assert_eq!(deque.capacity(), 3);
        assert_eq!(deque.free_slots(), 3);
        assert_eq!(deque.policy(), FullPolicy::Block);

        deque.push_back("a");
        deque.push_back("b");
        deque.push_back("c");
        assert!(deque.is_full());
        assert_eq!(deque.free_slots(), 0);
    }

    #[test]
    fn test_default_policy_blocks() {
        assert_eq!(FullPolicy::default(), FullPolicy::Block);
    }
}
