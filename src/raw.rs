//! Uninitialized slot storage obtained from a [`SlotAllocator`]
//!
//! 从 [`SlotAllocator`] 获取的未初始化槽位存储
//!
//! This type owns one contiguous block of `MaybeUninit<T>` slots. It knows
//! nothing about which slots hold live values and never drops elements; the
//! ring buffer on top of it tracks the live range.
//!
//! 此类型拥有一块连续的 `MaybeUninit<T>` 槽位。它不知道哪些槽位持有有效值，
//! 也从不 drop 元素；上层的环形缓冲区负责跟踪有效区间。

use crate::alloc::SlotAllocator;
use crate::error::CapacityError;
use std::alloc::{Layout, handle_alloc_error};
use std::marker::PhantomData;
use std::mem::MaybeUninit;
use std::ptr::NonNull;

pub(crate) struct RawSlots<T, A: SlotAllocator> {
    /// Start of the block (dangling when the layout is zero-sized)
    ///
    /// 内存块起始地址（布局大小为零时为悬垂指针）
    ptr: NonNull<MaybeUninit<T>>,

    /// Number of slots
    ///
    /// 槽位数量
    len: usize,

    layout: Layout,

    alloc: A,

    _marker: PhantomData<T>,
}

impl<T, A: SlotAllocator> RawSlots<T, A> {
    /// Allocate `capacity + 1` slots, the extra one being the sentinel
    ///
    /// 分配 `capacity + 1` 个槽位，多出的一个为哨兵槽位
    pub(crate) fn try_for_capacity_in(capacity: usize, alloc: A) -> Result<Self, CapacityError> {
        let len = capacity
            .checked_add(1)
            .ok_or(CapacityError::CapacityOverflow)?;
        let layout = Layout::array::<T>(len).map_err(|_| CapacityError::CapacityOverflow)?;

        let ptr = if layout.size() == 0 {
            NonNull::dangling()
        } else {
            alloc
                .allocate(layout)
                .map_err(|_| CapacityError::AllocFailed { layout })?
                .cast()
        };

        Ok(Self {
            ptr,
            len,
            layout,
            alloc,
            _marker: PhantomData,
        })
    }

    /// Infallible variant, mirroring `Vec::with_capacity`
    ///
    /// 不可失败的版本，行为与 `Vec::with_capacity` 一致
    pub(crate) fn for_capacity_in(capacity: usize, alloc: A) -> Self {
        match Self::try_for_capacity_in(capacity, alloc) {
            Ok(slots) => slots,
            Err(CapacityError::CapacityOverflow) => panic!("capacity overflow"),
            Err(CapacityError::AllocFailed { layout }) => handle_alloc_error(layout),
        }
    }

    /// Total number of slots, sentinel included
    ///
    /// 槽位总数（包含哨兵槽位）
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub(crate) fn allocator(&self) -> &A {
        &self.alloc
    }

    /// Get a pointer to the slot at `index`
    ///
    /// 获取 `index` 处槽位的指针
    ///
    /// # Safety
    /// - `index` must be < `len()`
    ///
    /// # 安全性
    /// - `index` 必须 < `len()`
    #[inline(always)]
    pub(crate) unsafe fn slot(&self, index: usize) -> *mut T {
        debug_assert!(index < self.len);
        unsafe { self.ptr.as_ptr().add(index).cast::<T>() }
    }
}

impl<T, A: SlotAllocator> Drop for RawSlots<T, A> {
    fn drop(&mut self) {
        if self.layout.size() != 0 {
            unsafe { self.alloc.deallocate(self.ptr.cast(), self.layout) }
        }
    }
}

// Note: RawSlots does NOT drop elements because it stores MaybeUninit<T>.
// The owner is responsible for dropping the live range first.
//
// 注意：RawSlots 不会 drop 元素，因为它存储的是 MaybeUninit<T>。
// 持有者负责先 drop 有效区间内的元素。

unsafe impl<T: Send, A: SlotAllocator + Send> Send for RawSlots<T, A> {}
unsafe impl<T: Sync, A: SlotAllocator + Sync> Sync for RawSlots<T, A> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alloc::Global;

    #[test]
    fn test_sentinel_slot_is_allocated() {
        let slots: RawSlots<i32, Global> = RawSlots::for_capacity_in(4, Global);
        assert_eq!(slots.len(), 5);
    }

    #[test]
    fn test_zero_capacity_keeps_sentinel() {
        let slots: RawSlots<i32, Global> = RawSlots::for_capacity_in(0, Global);
        assert_eq!(slots.len(), 1);
    }

    #[test]
    fn test_zero_sized_type() {
        let slots: RawSlots<(), Global> = RawSlots::for_capacity_in(1000, Global);
        assert_eq!(slots.len(), 1001);
        unsafe {
            slots.slot(999).write(());
        }
    }

    #[test]
    fn test_slot_write_read() {
        let slots: RawSlots<i32, Global> = RawSlots::for_capacity_in(8, Global);

        unsafe {
            slots.slot(0).write(42);
            slots.slot(8).write(99);

            assert_eq!(slots.slot(0).read(), 42);
            assert_eq!(slots.slot(8).read(), 99);
        }
    }

    #[test]
    fn test_capacity_overflow() {
        let result: Result<RawSlots<u64, Global>, _> =
            RawSlots::try_for_capacity_in(usize::MAX, Global);
        assert!(matches!(result, Err(CapacityError::CapacityOverflow)));

        let result: Result<RawSlots<u64, Global>, _> =
            RawSlots::try_for_capacity_in(usize::MAX / 4, Global);
        assert!(matches!(result, Err(CapacityError::CapacityOverflow)));
    }

    #[test]
    #[should_panic(expected = "capacity overflow")]
    fn test_capacity_overflow_panics() {
        let _slots: RawSlots<u64, Global> = RawSlots::for_capacity_in(usize::MAX, Global);
    }
}
