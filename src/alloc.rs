//! Pluggable allocation strategy for slot storage
//!
//! 槽位存储的可插拔分配策略
//!
//! A [`CircularBuffer`](crate::CircularBuffer) obtains its single block of
//! slots from a [`SlotAllocator`]. The default, [`Global`], forwards to the
//! process-wide allocator.
//!
//! [`CircularBuffer`](crate::CircularBuffer) 从 [`SlotAllocator`] 获取唯一的槽位块。
//! 默认的 [`Global`] 直接使用进程级全局分配器。

use crate::error::AllocError;
use std::alloc::{self, Layout};
use std::ptr::NonNull;

/// Allocation strategy for slot storage
///
/// 槽位存储的分配策略
///
/// Zero-sized layouts are never passed to an implementation.
///
/// 零大小的布局永远不会传给实现者。
///
/// # Safety
///
/// Memory returned by `allocate` must be valid for reads and writes of
/// `layout.size()` bytes, aligned to `layout.align()`, and stay valid until
/// it is passed back to `deallocate` of the same allocator (or a clone of it).
///
/// # 安全性
///
/// `allocate` 返回的内存必须对 `layout.size()` 字节可读写、按 `layout.align()` 对齐，
/// 并且在交还给同一分配器（或其克隆）的 `deallocate` 之前一直有效。
pub unsafe trait SlotAllocator {
    /// Allocate a block for `layout`
    ///
    /// 为 `layout` 分配一块内存
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError>;

    /// Release a block previously returned by `allocate`
    ///
    /// 释放先前由 `allocate` 返回的内存块
    ///
    /// # Safety
    /// `ptr` must come from `allocate` on this allocator with the same `layout`.
    ///
    /// # 安全性
    /// `ptr` 必须来自本分配器以相同 `layout` 调用的 `allocate`。
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout);
}

/// The global allocator
///
/// 全局分配器
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Global;

unsafe impl SlotAllocator for Global {
    #[inline]
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
        debug_assert!(layout.size() != 0);
        // SAFETY: callers never pass a zero-sized layout
        let ptr = unsafe { alloc::alloc(layout) };
        NonNull::new(ptr).ok_or(AllocError)
    }

    #[inline]
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        unsafe { alloc::dealloc(ptr.as_ptr(), layout) }
    }
}

unsafe impl<A: SlotAllocator + ?Sized> SlotAllocator for &A {
    #[inline]
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
        (**self).allocate(layout)
    }

    #[inline]
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        unsafe { (**self).deallocate(ptr, layout) }
    }
}
