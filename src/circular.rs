//! Fixed-capacity circular buffer
//!
//! 固定容量的环形缓冲区
//!
//! [`CircularBuffer`] stores up to `capacity` elements in one block of
//! `capacity + 1` slots. Two physical cursors delimit the live range:
//! `first` is the slot of the oldest element and `last` is one past the
//! newest. The extra sentinel slot keeps `first == last` meaning "empty" even
//! when the buffer is full.
//!
//! [`CircularBuffer`] 在 `capacity + 1` 个槽位的内存块中最多存储 `capacity` 个元素。
//! 两个物理游标界定有效区间：`first` 指向最旧的元素，`last` 指向最新元素的下一个位置。
//! 多出的哨兵槽位保证即使缓冲区已满，`first == last` 也只表示"空"。
//!
//! Pushing at either end of a full buffer evicts the element at the opposite
//! end instead of failing.
//!
//! 在已满的缓冲区任意一端推送时，会淘汰另一端的元素而不是失败。

use crate::alloc::{Global, SlotAllocator};
use crate::error::{CapacityError, OutOfRange};
use crate::iter::{Cursor, IntoIter, Iter, IterMut};
use crate::raw::RawSlots;
use crate::trace::debug;
use std::fmt;
use std::iter;
use std::ops::{Bound, Index, IndexMut, RangeBounds};
use std::ptr;
use std::slice;

/// Fixed-capacity ring container with overwrite-on-full semantics
///
/// 满时覆盖的固定容量环形容器
///
/// # Type Parameters
/// - `T`: Element type
/// - `A`: Allocation strategy for the slot block (defaults to [`Global`])
///
/// # 类型参数
/// - `T`: 元素类型
/// - `A`: 槽位内存块的分配策略（默认 [`Global`]）
///
/// # Examples
///
/// ```
/// use syncring::CircularBuffer;
///
/// let mut buf = CircularBuffer::with_capacity(3);
/// for i in 1..=4 {
///     buf.push_back(i);
/// }
/// // The oldest element was evicted
/// assert_eq!(buf.iter().copied().collect::<Vec<_>>(), [2, 3, 4]);
/// ```
pub struct CircularBuffer<T, A: SlotAllocator = Global> {
    /// Slot block, `capacity + 1` long
    ///
    /// 槽位内存块，长度为 `capacity + 1`
    slots: RawSlots<T, A>,

    /// Physical slot of the oldest live element
    ///
    /// 最旧有效元素的物理槽位
    first: usize,

    /// Physical slot one past the newest live element
    ///
    /// 最新有效元素之后的物理槽位
    last: usize,
}

/// Which end of the buffer a removed range was moved to
enum End {
    Front,
    Back,
}

impl<T> CircularBuffer<T> {
    /// Create an empty buffer with capacity 0
    ///
    /// 创建容量为 0 的空缓冲区
    ///
    /// Every push into it is discarded.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create an empty buffer that holds up to `capacity` elements
    ///
    /// 创建最多容纳 `capacity` 个元素的空缓冲区
    ///
    /// # Panics
    ///
    /// Panics if `capacity + 1` slots of `T` exceed `isize::MAX` bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_in(capacity, Global)
    }

    /// Create a full buffer of `len` clones of `value`, capacity `len`
    ///
    /// 创建容量为 `len`、装满 `len` 个 `value` 克隆的缓冲区
    pub fn from_elem(len: usize, value: T) -> Self
    where
        T: Clone,
    {
        Self::from_elem_with_capacity(len, len, value)
    }

    /// Create a buffer of capacity `capacity` holding `len` clones of `value`
    ///
    /// 创建容量为 `capacity`、包含 `len` 个 `value` 克隆的缓冲区
    ///
    /// Only `capacity` clones are kept when `len > capacity`.
    ///
    /// 当 `len > capacity` 时只保留 `capacity` 个克隆。
    pub fn from_elem_with_capacity(capacity: usize, len: usize, value: T) -> Self
    where
        T: Clone,
    {
        let mut buf = Self::with_capacity(capacity);
        buf.resize(len, value);
        buf
    }

    /// Create a buffer of capacity `capacity` and push every item at the back
    ///
    /// 创建容量为 `capacity` 的缓冲区，并将所有元素依次推到尾部
    ///
    /// Items beyond the capacity evict the oldest ones, so the buffer ends up
    /// with the last `capacity` items.
    ///
    /// 超出容量的元素会淘汰最旧的元素，最终保留最后 `capacity` 个。
    pub fn from_iter_with_capacity<I>(capacity: usize, iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let mut buf = Self::with_capacity(capacity);
        buf.extend(iter);
        buf
    }
}

impl<T, A: SlotAllocator> CircularBuffer<T, A> {
    /// Create an empty buffer whose slots come from `alloc`
    ///
    /// 使用 `alloc` 分配槽位，创建空缓冲区
    ///
    /// # Panics
    ///
    /// Panics on capacity overflow; calls [`std::alloc::handle_alloc_error`]
    /// when the allocator fails.
    pub fn with_capacity_in(capacity: usize, alloc: A) -> Self {
        Self::from_slots(RawSlots::for_capacity_in(capacity, alloc))
    }

    /// Fallible variant of [`with_capacity_in`](Self::with_capacity_in)
    ///
    /// [`with_capacity_in`](Self::with_capacity_in) 的可失败版本
    ///
    /// # Errors
    ///
    /// - [`CapacityError::CapacityOverflow`] if the slot block size overflows
    /// - [`CapacityError::AllocFailed`] if the allocator refuses the request
    pub fn try_with_capacity_in(capacity: usize, alloc: A) -> Result<Self, CapacityError> {
        RawSlots::try_for_capacity_in(capacity, alloc).map(Self::from_slots)
    }

    fn from_slots(slots: RawSlots<T, A>) -> Self {
        Self {
            slots,
            first: 0,
            last: 0,
        }
    }

    /// Get the allocation strategy
    ///
    /// 获取分配策略
    #[inline]
    pub fn allocator(&self) -> &A {
        self.slots.allocator()
    }

    /// Maximum number of elements the buffer holds
    ///
    /// 缓冲区最多容纳的元素数量
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len() - 1
    }

    /// Number of live elements
    ///
    /// 有效元素数量
    #[inline]
    pub fn len(&self) -> usize {
        if self.last >= self.first {
            self.last - self.first
        } else {
            (self.slots.len() - self.first) + self.last
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.first == self.last
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.len() == self.capacity()
    }

    /// Number of pushes left before the buffer starts evicting
    ///
    /// 开始淘汰元素之前还能推送的数量
    #[inline]
    pub fn free_slots(&self) -> usize {
        self.capacity() - self.len()
    }

    // ------------------------------------------------------------------
    // Slot arithmetic
    // 槽位运算
    // ------------------------------------------------------------------

    #[inline]
    pub(crate) fn next_slot(&self, slot: usize) -> usize {
        if slot + 1 == self.slots.len() { 0 } else { slot + 1 }
    }

    #[inline]
    pub(crate) fn prev_slot(&self, slot: usize) -> usize {
        if slot == 0 { self.slots.len() - 1 } else { slot - 1 }
    }

    /// Move `slot` forward by `n` with wraparound, `n` < slot count
    ///
    /// 将 `slot` 向前移动 `n` 个位置（带环绕），要求 `n` < 槽位数
    #[inline]
    pub(crate) fn add(&self, slot: usize, n: usize) -> usize {
        let room = self.slots.len() - slot;
        if n >= room { n - room } else { slot + n }
    }

    /// Move `slot` backward by `n` with wraparound, `n` < slot count
    ///
    /// 将 `slot` 向后移动 `n` 个位置（带环绕），要求 `n` < 槽位数
    #[inline]
    pub(crate) fn sub(&self, slot: usize, n: usize) -> usize {
        if n > slot { self.slots.len() - (n - slot) } else { slot - n }
    }

    /// Map a physical slot to its logical index, `first` being 0
    ///
    /// 将物理槽位映射为逻辑索引（`first` 为 0）
    ///
    /// Ordering and distance between cursors go through this function, so
    /// they follow logical order regardless of where the live range wraps.
    ///
    /// 游标之间的比较和距离都通过此函数计算，因此无论有效区间在何处环绕，结果都符合逻辑顺序。
    #[inline]
    pub(crate) fn linearize(&self, slot: usize) -> usize {
        if slot >= self.first {
            slot - self.first
        } else {
            (self.slots.len() - self.first) + slot
        }
    }

    /// Physical slot of logical index `index`, `index` <= capacity
    #[inline]
    pub(crate) fn physical(&self, index: usize) -> usize {
        self.add(self.first, index)
    }

    #[inline]
    pub(crate) fn first_slot(&self) -> usize {
        self.first
    }

    #[inline]
    pub(crate) fn last_slot(&self) -> usize {
        self.last
    }

    /// # Safety
    /// `slot` must be < capacity + 1
    #[inline(always)]
    pub(crate) unsafe fn slot_ptr(&self, slot: usize) -> *mut T {
        unsafe { self.slots.slot(slot) }
    }

    // ------------------------------------------------------------------
    // Element access
    // 元素访问
    // ------------------------------------------------------------------

    /// Get the element at logical `index`
    ///
    /// 获取逻辑索引 `index` 处的元素
    #[inline]
    pub fn get(&self, index: usize) -> Option<&T> {
        if index < self.len() {
            unsafe { Some(&*self.slot_ptr(self.physical(index))) }
        } else {
            None
        }
    }

    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        if index < self.len() {
            unsafe { Some(&mut *self.slot_ptr(self.physical(index))) }
        } else {
            None
        }
    }

    /// Bounds-checked access
    ///
    /// 带边界检查的访问
    ///
    /// # Errors
    ///
    /// Returns [`OutOfRange`] exactly when `index >= len()`.
    ///
    /// # Examples
    ///
    /// ```
    /// use syncring::{CircularBuffer, OutOfRange};
    ///
    /// let buf = CircularBuffer::from_elem(2, 'x');
    /// assert_eq!(buf.at(1), Ok(&'x'));
    /// assert_eq!(buf.at(2), Err(OutOfRange { index: 2, len: 2 }));
    /// ```
    pub fn at(&self, index: usize) -> Result<&T, OutOfRange> {
        let len = self.len();
        self.get(index).ok_or(OutOfRange { index, len })
    }

    /// Mutable variant of [`at`](Self::at)
    ///
    /// [`at`](Self::at) 的可变版本
    pub fn at_mut(&mut self, index: usize) -> Result<&mut T, OutOfRange> {
        let len = self.len();
        self.get_mut(index).ok_or(OutOfRange { index, len })
    }

    #[inline]
    pub fn front(&self) -> Option<&T> {
        self.get(0)
    }

    #[inline]
    pub fn front_mut(&mut self) -> Option<&mut T> {
        self.get_mut(0)
    }

    #[inline]
    pub fn back(&self) -> Option<&T> {
        if self.is_empty() {
            None
        } else {
            unsafe { Some(&*self.slot_ptr(self.prev_slot(self.last))) }
        }
    }

    #[inline]
    pub fn back_mut(&mut self) -> Option<&mut T> {
        if self.is_empty() {
            None
        } else {
            unsafe { Some(&mut *self.slot_ptr(self.prev_slot(self.last))) }
        }
    }

    // ------------------------------------------------------------------
    // Push / pop at the ends
    // 两端的推送 / 弹出
    // ------------------------------------------------------------------

    /// Push an element at the back
    ///
    /// 在尾部推送一个元素
    ///
    /// # Behavior
    ///
    /// - Buffer full: the front (oldest) element is evicted and returned.
    /// - Capacity 0: nothing is stored and `value` itself is returned.
    ///
    /// Ignoring the return value drops the displaced element.
    ///
    /// # 行为
    ///
    /// - 缓冲区已满：淘汰并返回头部（最旧）元素。
    /// - 容量为 0：不存储任何元素，直接返回 `value`。
    ///
    /// 忽略返回值即 drop 被替换的元素。
    ///
    /// # Examples
    ///
    /// ```
    /// use syncring::CircularBuffer;
    ///
    /// let mut buf = CircularBuffer::with_capacity(2);
    /// assert_eq!(buf.push_back(1), None);
    /// assert_eq!(buf.push_back(2), None);
    /// assert_eq!(buf.push_back(3), Some(1)); // Evicted 1
    /// ```
    pub fn push_back(&mut self, value: T) -> Option<T> {
        if self.capacity() == 0 {
            return Some(value);
        }

        let evicted = if self.is_full() {
            Some(unsafe { self.take_front() })
        } else {
            None
        };

        unsafe { self.slot_ptr(self.last).write(value) };
        self.last = self.next_slot(self.last);
        evicted
    }

    /// Push an element at the front
    ///
    /// 在头部推送一个元素
    ///
    /// When full, the back (newest) element is evicted and returned. At
    /// capacity 0 `value` is returned unchanged.
    ///
    /// 已满时淘汰并返回尾部（最新）元素。容量为 0 时原样返回 `value`。
    pub fn push_front(&mut self, value: T) -> Option<T> {
        if self.capacity() == 0 {
            return Some(value);
        }

        let evicted = if self.is_full() {
            Some(unsafe { self.take_back() })
        } else {
            None
        };

        self.first = self.prev_slot(self.first);
        unsafe { self.slot_ptr(self.first).write(value) };
        evicted
    }

    /// Remove and return the front element, `None` when empty
    ///
    /// 移除并返回头部元素，为空时返回 `None`
    pub fn pop_front(&mut self) -> Option<T> {
        if self.is_empty() {
            None
        } else {
            Some(unsafe { self.take_front() })
        }
    }

    /// Remove and return the back element, `None` when empty
    ///
    /// 移除并返回尾部元素，为空时返回 `None`
    pub fn pop_back(&mut self) -> Option<T> {
        if self.is_empty() {
            None
        } else {
            Some(unsafe { self.take_back() })
        }
    }

    /// # Safety
    /// The buffer must not be empty.
    #[inline]
    unsafe fn take_front(&mut self) -> T {
        let slot = self.first;
        self.first = self.next_slot(slot);
        unsafe { self.slot_ptr(slot).read() }
    }

    /// # Safety
    /// The buffer must not be empty.
    #[inline]
    unsafe fn take_back(&mut self) -> T {
        self.last = self.prev_slot(self.last);
        unsafe { self.slot_ptr(self.last).read() }
    }

    /// Drop `count` elements from the front, `count` <= len
    ///
    /// The cursor moves before each destructor runs, so a panicking `Drop`
    /// leaves the live range consistent.
    fn evict_front(&mut self, count: usize) {
        for _ in 0..count {
            let slot = self.first;
            self.first = self.next_slot(slot);
            unsafe { ptr::drop_in_place(self.slot_ptr(slot)) };
        }
    }

    /// Drop `count` elements from the back, `count` <= len
    fn evict_back(&mut self, count: usize) {
        for _ in 0..count {
            self.last = self.prev_slot(self.last);
            unsafe { ptr::drop_in_place(self.slot_ptr(self.last)) };
        }
    }

    // ------------------------------------------------------------------
    // Insertion
    // 插入
    // ------------------------------------------------------------------

    /// Insert `value` at logical `index`
    ///
    /// 在逻辑索引 `index` 处插入 `value`
    ///
    /// Same rules as [`insert_n`](Self::insert_n) with a count of one. In
    /// particular, inserting at index 0 of a full buffer stores nothing.
    ///
    /// 规则与数量为 1 的 [`insert_n`](Self::insert_n) 相同。特别地，在已满缓冲区的索引 0 处插入不会存储任何元素。
    ///
    /// # Panics
    ///
    /// Panics if `index > len()`.
    pub fn insert(&mut self, index: usize, value: T) {
        let kept = self.insertion_kept(index, 1);
        if kept == 0 {
            return;
        }
        self.insert_exact(index, 1, iter::once(value));
    }

    /// Insert `n` clones of `value` at logical `index`
    ///
    /// 在逻辑索引 `index` 处插入 `n` 个 `value` 的克隆
    ///
    /// # Behavior
    ///
    /// Let `room = capacity - (len - index)`, the number of slots available
    /// without touching the elements after `index`.
    ///
    /// - `n >= room`: every element before `index` is evicted and the last
    ///   `room` new values fill the front, followed by the old suffix.
    /// - otherwise: if `n > free_slots()`, `n - free_slots()` elements are
    ///   evicted from the front first; then the suffix shifts back by `n` and
    ///   the new values fill the gap.
    ///
    /// Eviction always starts at the front, so the newest insertions survive.
    ///
    /// # 行为
    ///
    /// 设 `room = capacity - (len - index)`，即不移动 `index` 之后元素时的可用槽位数。
    ///
    /// - `n >= room`：淘汰 `index` 之前的所有元素，最后 `room` 个新值填充头部，后接原有后缀。
    /// - 否则：若 `n > free_slots()`，先从头部淘汰 `n - free_slots()` 个元素；
    ///   然后后缀向后移动 `n` 位，新值填入空位。
    ///
    /// 淘汰总是从头部开始，因此最新插入的元素得以保留。
    ///
    /// # Panics
    ///
    /// Panics if `index > len()`.
    ///
    /// # Examples
    ///
    /// ```
    /// use syncring::CircularBuffer;
    ///
    /// let mut buf: CircularBuffer<i32> = [1, 2, 3].into_iter().collect();
    /// buf.insert_n(1, 2, 9);
    /// assert_eq!(buf.iter().copied().collect::<Vec<_>>(), [9, 2, 3]);
    /// ```
    pub fn insert_n(&mut self, index: usize, n: usize, value: T)
    where
        T: Clone,
    {
        let kept = self.insertion_kept(index, n);
        // Clone up front so a panicking `Clone` cannot leave a half-open gap.
        let values: Vec<T> = iter::repeat_n(value, kept).collect();
        self.insert_exact(index, n, values.into_iter());
    }

    /// Insert every item of `iter` at logical `index`, in order
    ///
    /// 在逻辑索引 `index` 处按顺序插入 `iter` 的所有元素
    ///
    /// Eviction follows [`insert_n`](Self::insert_n); when not everything
    /// fits, the leading items are the ones dropped.
    ///
    /// 淘汰规则同 [`insert_n`](Self::insert_n)；放不下时丢弃的是前面的元素。
    ///
    /// # Panics
    ///
    /// Panics if `index > len()`.
    pub fn insert_iter<I>(&mut self, index: usize, iter: I)
    where
        I: IntoIterator<Item = T>,
    {
        let mut values: Vec<T> = iter.into_iter().collect();
        let n = values.len();
        let kept = self.insertion_kept(index, n);
        values.drain(..n - kept);
        self.insert_exact(index, n, values.into_iter());
    }

    /// Number of values an insertion of `n` at `index` actually stores
    fn insertion_kept(&self, index: usize, n: usize) -> usize {
        let len = self.len();
        assert!(
            index <= len,
            "insertion index (is {index}) should be <= len (is {len})"
        );
        let room = self.capacity() - (len - index);
        n.min(room)
    }

    /// Open a gap for an insertion of `n` at `index` and fill it from `values`
    ///
    /// `values` must yield exactly as many items as `insertion_kept(index, n)`
    /// without panicking: everything that can panic (clones, destructors of
    /// evicted elements) happens before the gap is opened.
    fn insert_exact<I>(&mut self, index: usize, n: usize, values: I)
    where
        I: Iterator<Item = T>,
    {
        let len = self.len();
        let room = self.capacity() - (len - index);

        let (start, count) = if n >= room {
            self.evict_front(index);
            // Only the suffix is live now; claim the `room` slots ahead of it.
            self.first = self.next_slot(self.last);
            (0, room)
        } else {
            let mut index = index;
            let free = self.free_slots();
            if n > free {
                let evicted = n - free;
                self.evict_front(evicted);
                index -= evicted;
            }
            self.shift_suffix(index, n);
            (index, n)
        };

        let mut slot = self.physical(start);
        let mut written = 0;
        for value in values.take(count) {
            unsafe { self.slot_ptr(slot).write(value) };
            slot = self.next_slot(slot);
            written += 1;
        }
        debug_assert_eq!(written, count);
    }

    /// Move logical `[index, len)` to `[index + n, len + n)`
    ///
    /// Leaves `[index, index + n)` uninitialized but inside the live range.
    /// Requires `n <= free_slots()`.
    fn shift_suffix(&mut self, index: usize, n: usize) {
        if n == 0 {
            return;
        }
        let moved = self.len() - index;
        let mut src = self.last;
        let mut dst = self.add(self.last, n);
        for _ in 0..moved {
            src = self.prev_slot(src);
            dst = self.prev_slot(dst);
            unsafe { ptr::copy_nonoverlapping(self.slot_ptr(src), self.slot_ptr(dst), 1) };
        }
        self.last = self.add(self.last, n);
    }

    // ------------------------------------------------------------------
    // Erasure
    // 删除
    // ------------------------------------------------------------------

    /// Remove and return the element at logical `index`
    ///
    /// 移除并返回逻辑索引 `index` 处的元素
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    pub fn erase(&mut self, index: usize) -> T {
        let len = self.len();
        assert!(
            index < len,
            "removal index (is {index}) should be < len (is {len})"
        );
        match self.rotate_out(index, index + 1) {
            End::Front => unsafe { self.take_front() },
            End::Back => unsafe { self.take_back() },
        }
    }

    /// Remove the elements in a logical range
    ///
    /// 移除逻辑区间内的元素
    ///
    /// The shorter side moves to close the gap, so the cost is proportional
    /// to the distance from the range to the nearer end.
    ///
    /// 由较短的一侧移动来填补空位，代价与区间到较近一端的距离成正比。
    ///
    /// # Panics
    ///
    /// Panics if the range is decreasing or ends past `len()`.
    pub fn erase_range<R>(&mut self, range: R)
    where
        R: RangeBounds<usize>,
    {
        let len = self.len();
        let start = match range.start_bound() {
            Bound::Included(&start) => start,
            Bound::Excluded(&start) => start
                .checked_add(1)
                .unwrap_or_else(|| panic!("attempted to erase from an overflowing start")),
            Bound::Unbounded => 0,
        };
        let end = match range.end_bound() {
            Bound::Included(&end) => end
                .checked_add(1)
                .unwrap_or_else(|| panic!("attempted to erase up to an overflowing end")),
            Bound::Excluded(&end) => end,
            Bound::Unbounded => len,
        };
        assert!(start <= end, "erase range starts at {start} but ends at {end}");
        assert!(end <= len, "erase range end {end} out of range for length {len}");

        let count = end - start;
        if count == 0 {
            return;
        }
        match self.rotate_out(start, end) {
            End::Front => self.evict_front(count),
            End::Back => self.evict_back(count),
        }
    }

    /// Drop the first `n` elements
    ///
    /// 删除前 `n` 个元素
    ///
    /// # Panics
    ///
    /// Panics if `n > len()`.
    pub fn erase_begin(&mut self, n: usize) {
        let len = self.len();
        assert!(n <= len, "cannot erase {n} elements from a buffer of length {len}");
        self.evict_front(n);
    }

    /// Drop the last `n` elements
    ///
    /// 删除最后 `n` 个元素
    ///
    /// # Panics
    ///
    /// Panics if `n > len()`.
    pub fn erase_end(&mut self, n: usize) {
        let len = self.len();
        assert!(n <= len, "cannot erase {n} elements from a buffer of length {len}");
        self.evict_back(n);
    }

    /// Drop every element, keeping the capacity
    ///
    /// 删除所有元素，保留容量
    pub fn clear(&mut self) {
        let len = self.len();
        self.evict_front(len);
        self.first = 0;
        self.last = 0;
    }

    /// Swap logical `[start, end)` toward the nearer end of the buffer
    ///
    /// Only swaps happen here, never drops, so the live range stays valid
    /// throughout. Returns the end now holding the range.
    fn rotate_out(&mut self, start: usize, end: usize) -> End {
        let count = end - start;
        let len = self.len();

        if start < len - end {
            // Shift the prefix back by `count`, walking from its tail.
            let mut lo = self.physical(start);
            let mut hi = self.physical(end);
            for _ in 0..start {
                lo = self.prev_slot(lo);
                hi = self.prev_slot(hi);
                unsafe { ptr::swap(self.slot_ptr(lo), self.slot_ptr(hi)) };
            }
            End::Front
        } else {
            // Shift the suffix forward by `count`, walking from its head.
            let mut lo = self.physical(start);
            let mut hi = self.physical(end);
            for _ in 0..len - end {
                unsafe { ptr::swap(self.slot_ptr(lo), self.slot_ptr(hi)) };
                lo = self.next_slot(lo);
                hi = self.next_slot(hi);
            }
            debug_assert_eq!(self.linearize(lo), len - count);
            End::Back
        }
    }

    // ------------------------------------------------------------------
    // Capacity and length management
    // 容量与长度管理
    // ------------------------------------------------------------------

    /// Reallocate with a new capacity
    ///
    /// 以新的容量重新分配
    ///
    /// When the buffer holds more than `capacity` elements, the first
    /// `capacity` survive and the back is dropped. Note that this is the
    /// opposite end from the one [`insert_n`](Self::insert_n) evicts.
    ///
    /// 当元素数多于 `capacity` 时，保留前 `capacity` 个，删除尾部。
    /// 注意这与 [`insert_n`](Self::insert_n) 淘汰的一端相反。
    pub fn set_capacity(&mut self, capacity: usize)
    where
        A: Clone,
    {
        let slots = RawSlots::for_capacity_in(capacity, self.allocator().clone());
        let keep = self.len().min(capacity);
        debug!(
            from = self.capacity(),
            to = capacity,
            dropped = self.len() - keep,
            "circular buffer reallocated"
        );

        let mut src = self.first;
        for dst in 0..keep {
            unsafe { ptr::copy_nonoverlapping(self.slot_ptr(src), slots.slot(dst), 1) };
            src = self.next_slot(src);
        }

        // What is left in the old block is the truncated tail.
        self.first = src;
        let tail = self.len();
        self.evict_front(tail);

        self.slots = slots;
        self.first = 0;
        self.last = keep;
    }

    /// Grow or shrink to `len` elements
    ///
    /// 扩展或收缩到 `len` 个元素
    ///
    /// Growing inserts clones of `value` at the back through
    /// [`insert_n`](Self::insert_n); shrinking drops from the back.
    ///
    /// 扩展时通过 [`insert_n`](Self::insert_n) 在尾部插入 `value` 的克隆；收缩时从尾部删除。
    pub fn resize(&mut self, len: usize, value: T)
    where
        T: Clone,
    {
        let current = self.len();
        if len < current {
            self.erase_end(current - len);
        } else if len > current {
            self.insert_n(current, len - current, value);
        }
    }

    // ------------------------------------------------------------------
    // Views and iteration
    // 视图与迭代
    // ------------------------------------------------------------------

    /// The live range as at most two contiguous slices, in logical order
    ///
    /// 以至多两个连续切片表示有效区间，按逻辑顺序
    pub fn as_slices(&self) -> (&[T], &[T]) {
        unsafe {
            if self.last >= self.first {
                let head = slice::from_raw_parts(self.slot_ptr(self.first), self.last - self.first);
                (head, &[])
            } else {
                let head = slice::from_raw_parts(
                    self.slot_ptr(self.first),
                    self.slots.len() - self.first,
                );
                let tail = slice::from_raw_parts(self.slot_ptr(0), self.last);
                (head, tail)
            }
        }
    }

    /// Mutable variant of [`as_slices`](Self::as_slices)
    pub fn as_mut_slices(&mut self) -> (&mut [T], &mut [T]) {
        unsafe {
            if self.last >= self.first {
                let head =
                    slice::from_raw_parts_mut(self.slot_ptr(self.first), self.last - self.first);
                (head, &mut [])
            } else {
                let head = slice::from_raw_parts_mut(
                    self.slot_ptr(self.first),
                    self.slots.len() - self.first,
                );
                let tail = slice::from_raw_parts_mut(self.slot_ptr(0), self.last);
                (head, tail)
            }
        }
    }

    /// Iterate in logical order
    ///
    /// 按逻辑顺序迭代
    pub fn iter(&self) -> Iter<'_, T> {
        let (head, tail) = self.as_slices();
        Iter::new(head, tail)
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        let (head, tail) = self.as_mut_slices();
        IterMut::new(head, tail)
    }

    /// Cursor at the oldest element
    ///
    /// 指向最旧元素的游标
    #[inline]
    pub fn begin(&self) -> Cursor<'_, T, A> {
        Cursor::new(self, self.first)
    }

    /// Cursor one past the newest element
    ///
    /// 指向最新元素之后位置的游标
    #[inline]
    pub fn end(&self) -> Cursor<'_, T, A> {
        Cursor::new(self, self.last)
    }

    /// Cursor at logical `index`, `None` when `index > len()`
    ///
    /// 指向逻辑索引 `index` 的游标，`index > len()` 时返回 `None`
    pub fn cursor(&self, index: usize) -> Option<Cursor<'_, T, A>> {
        if index <= self.len() {
            Some(Cursor::new(self, self.physical(index)))
        } else {
            None
        }
    }
}

impl<T, A: SlotAllocator> Drop for CircularBuffer<T, A> {
    fn drop(&mut self) {
        // Elements first; RawSlots releases the block afterwards.
        self.clear();
    }
}

impl<T> Default for CircularBuffer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone, A: SlotAllocator + Clone> Clone for CircularBuffer<T, A> {
    fn clone(&self) -> Self {
        let mut buf = Self::with_capacity_in(self.capacity(), self.allocator().clone());
        buf.extend(self.iter().cloned());
        buf
    }
}

impl<T: fmt::Debug, A: SlotAllocator> fmt::Debug for CircularBuffer<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: PartialEq, A: SlotAllocator, B: SlotAllocator> PartialEq<CircularBuffer<T, B>>
    for CircularBuffer<T, A>
{
    fn eq(&self, other: &CircularBuffer<T, B>) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: Eq, A: SlotAllocator> Eq for CircularBuffer<T, A> {}

impl<T, A: SlotAllocator> Index<usize> for CircularBuffer<T, A> {
    type Output = T;

    #[inline]
    fn index(&self, index: usize) -> &T {
        let len = self.len();
        match self.get(index) {
            Some(value) => value,
            None => panic!("index out of bounds: the len is {len} but the index is {index}"),
        }
    }
}

impl<T, A: SlotAllocator> IndexMut<usize> for CircularBuffer<T, A> {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut T {
        let len = self.len();
        match self.get_mut(index) {
            Some(value) => value,
            None => panic!("index out of bounds: the len is {len} but the index is {index}"),
        }
    }
}

impl<T, A: SlotAllocator> Extend<T> for CircularBuffer<T, A> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.push_back(value);
        }
    }
}

impl<'a, T: Copy + 'a, A: SlotAllocator> Extend<&'a T> for CircularBuffer<T, A> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.extend(iter.into_iter().copied());
    }
}

/// Collects into a full buffer whose capacity equals the item count
///
/// 收集为一个已满的缓冲区，容量等于元素数量
impl<T> FromIterator<T> for CircularBuffer<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let values: Vec<T> = iter.into_iter().collect();
        Self::from_iter_with_capacity(values.len(), values)
    }
}

impl<T, A: SlotAllocator> IntoIterator for CircularBuffer<T, A> {
    type Item = T;
    type IntoIter = IntoIter<T, A>;

    fn into_iter(self) -> IntoIter<T, A> {
        IntoIter::new(self)
    }
}

impl<'a, T, A: SlotAllocator> IntoIterator for &'a CircularBuffer<T, A> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<'a, T, A: SlotAllocator> IntoIterator for &'a mut CircularBuffer<T, A> {
    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T>;

    fn into_iter(self) -> IterMut<'a, T> {
        self.iter_mut()
    }
}
