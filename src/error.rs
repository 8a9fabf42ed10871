//! Error types
//!
//! 错误类型

use std::alloc::Layout;
use thiserror::Error;

/// Bounds-checked access past the live range
///
/// 越界访问错误
///
/// Returned by [`CircularBuffer::at`](crate::CircularBuffer::at) and
/// [`CircularBuffer::at_mut`](crate::CircularBuffer::at_mut) when
/// `index >= len`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("index {index} is out of range for circular buffer of length {len}")]
pub struct OutOfRange {
    /// Requested logical index
    ///
    /// 请求的逻辑索引
    pub index: usize,

    /// Length of the buffer at the time of the access
    ///
    /// 访问时缓冲区的长度
    pub len: usize,
}

/// Storage could not be obtained for the requested capacity
///
/// 无法为请求的容量分配存储
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CapacityError {
    /// `capacity + 1` slots of `T` do not fit in `isize::MAX` bytes
    ///
    /// `capacity + 1` 个槽位超出了 `isize::MAX` 字节
    #[error("capacity overflow")]
    CapacityOverflow,

    /// The allocation strategy refused the request
    ///
    /// 分配策略拒绝了请求
    #[error("allocation of {} bytes failed", layout.size())]
    AllocFailed {
        /// Layout that was requested
        layout: Layout,
    },
}

/// Returned by a [`SlotAllocator`](crate::SlotAllocator) that cannot satisfy a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Error)]
#[error("memory allocation failed")]
pub struct AllocError;
