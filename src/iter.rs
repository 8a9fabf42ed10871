//! Iterators and cursors over a [`CircularBuffer`]
//!
//! [`CircularBuffer`] 的迭代器与游标

use crate::alloc::SlotAllocator;
use crate::circular::CircularBuffer;
use std::cmp::Ordering;
use std::fmt;
use std::iter::FusedIterator;
use std::ops::{Add, Sub};
use std::ptr;
use std::slice;

/// Borrowing iterator, created by [`CircularBuffer::iter`]
///
/// 借用迭代器，由 [`CircularBuffer::iter`] 创建
///
/// Walks the two contiguous runs of the live range in logical order.
///
/// 按逻辑顺序遍历有效区间的两段连续内存。
pub struct Iter<'a, T> {
    head: slice::Iter<'a, T>,
    tail: slice::Iter<'a, T>,
}

impl<'a, T> Iter<'a, T> {
    pub(crate) fn new(head: &'a [T], tail: &'a [T]) -> Self {
        Self {
            head: head.iter(),
            tail: tail.iter(),
        }
    }
}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Self {
            head: self.head.clone(),
            tail: self.tail.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Iter<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    #[inline]
    fn next(&mut self) -> Option<&'a T> {
        self.head.next().or_else(|| self.tail.next())
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.len();
        (len, Some(len))
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    #[inline]
    fn next_back(&mut self) -> Option<&'a T> {
        self.tail.next_back().or_else(|| self.head.next_back())
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {
    #[inline]
    fn len(&self) -> usize {
        self.head.len() + self.tail.len()
    }
}

impl<T> FusedIterator for Iter<'_, T> {}

/// Mutable iterator, created by [`CircularBuffer::iter_mut`]
///
/// 可变迭代器，由 [`CircularBuffer::iter_mut`] 创建
pub struct IterMut<'a, T> {
    head: slice::IterMut<'a, T>,
    tail: slice::IterMut<'a, T>,
}

impl<'a, T> IterMut<'a, T> {
    pub(crate) fn new(head: &'a mut [T], tail: &'a mut [T]) -> Self {
        Self {
            head: head.iter_mut(),
            tail: tail.iter_mut(),
        }
    }
}

impl<'a, T> Iterator for IterMut<'a, T> {
    type Item = &'a mut T;

    #[inline]
    fn next(&mut self) -> Option<&'a mut T> {
        self.head.next().or_else(|| self.tail.next())
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.len();
        (len, Some(len))
    }
}

impl<'a, T> DoubleEndedIterator for IterMut<'a, T> {
    #[inline]
    fn next_back(&mut self) -> Option<&'a mut T> {
        self.tail.next_back().or_else(|| self.head.next_back())
    }
}

impl<T> ExactSizeIterator for IterMut<'_, T> {
    #[inline]
    fn len(&self) -> usize {
        self.head.len() + self.tail.len()
    }
}

impl<T> FusedIterator for IterMut<'_, T> {}

/// Owning iterator, created by `into_iter`
///
/// 所有权迭代器，由 `into_iter` 创建
///
/// Elements not yielded are dropped together with the iterator.
///
/// 未被取出的元素会随迭代器一起 drop。
pub struct IntoIter<T, A: SlotAllocator> {
    buf: CircularBuffer<T, A>,
}

impl<T, A: SlotAllocator> IntoIter<T, A> {
    pub(crate) fn new(buf: CircularBuffer<T, A>) -> Self {
        Self { buf }
    }
}

impl<T: fmt::Debug, A: SlotAllocator> fmt::Debug for IntoIter<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IntoIter").field(&self.buf).finish()
    }
}

impl<T, A: SlotAllocator> Iterator for IntoIter<T, A> {
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<T> {
        self.buf.pop_front()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.buf.len();
        (len, Some(len))
    }
}

impl<T, A: SlotAllocator> DoubleEndedIterator for IntoIter<T, A> {
    #[inline]
    fn next_back(&mut self) -> Option<T> {
        self.buf.pop_back()
    }
}

impl<T, A: SlotAllocator> ExactSizeIterator for IntoIter<T, A> {}

impl<T, A: SlotAllocator> FusedIterator for IntoIter<T, A> {}

/// Random-access position inside a [`CircularBuffer`]
///
/// [`CircularBuffer`] 内的随机访问位置
///
/// A cursor holds the buffer and a physical slot. Moving it wraps around the
/// slot block; comparing two cursors or taking their distance linearizes both
/// slots first, so results follow logical order even when the live range
/// wraps. Valid positions run from [`begin`](CircularBuffer::begin) to
/// [`end`](CircularBuffer::end) inclusive.
///
/// 游标持有缓冲区引用和一个物理槽位。移动时在槽位块内环绕；比较两个游标或计算距离时
/// 先将槽位线性化，因此即使有效区间发生环绕，结果也符合逻辑顺序。
/// 有效位置从 [`begin`](CircularBuffer::begin) 到 [`end`](CircularBuffer::end)（含）。
///
/// # Examples
///
/// ```
/// use syncring::CircularBuffer;
///
/// let mut buf = CircularBuffer::with_capacity(3);
/// for i in 0..5 {
///     buf.push_back(i);
/// }
/// assert_eq!(buf.end() - buf.begin(), 3);
///
/// let second = buf.begin() + 1;
/// assert_eq!(second.get(), Some(&3));
/// assert!(second < buf.end());
/// ```
pub struct Cursor<'a, T, A: SlotAllocator> {
    buf: &'a CircularBuffer<T, A>,
    slot: usize,
}

impl<'a, T, A: SlotAllocator> Cursor<'a, T, A> {
    #[inline]
    pub(crate) fn new(buf: &'a CircularBuffer<T, A>, slot: usize) -> Self {
        Self { buf, slot }
    }

    /// Logical index of this position, 0 being the oldest element
    ///
    /// 此位置的逻辑索引，0 表示最旧的元素
    #[inline]
    pub fn index(&self) -> usize {
        self.buf.linearize(self.slot)
    }

    /// Element under the cursor, `None` at the end position
    ///
    /// 游标处的元素，在末尾位置时为 `None`
    #[inline]
    pub fn get(&self) -> Option<&'a T> {
        if self.slot == self.buf.last_slot() {
            None
        } else {
            unsafe { Some(&*self.buf.slot_ptr(self.slot)) }
        }
    }

    /// Step forward; returns `false` and stays put at the end position
    ///
    /// 前进一步；在末尾位置时返回 `false` 并保持不动
    pub fn move_next(&mut self) -> bool {
        if self.slot == self.buf.last_slot() {
            false
        } else {
            self.slot = self.buf.next_slot(self.slot);
            true
        }
    }

    /// Step backward; returns `false` and stays put at the first position
    ///
    /// 后退一步；在起始位置时返回 `false` 并保持不动
    pub fn move_prev(&mut self) -> bool {
        if self.slot == self.buf.first_slot() {
            false
        } else {
            self.slot = self.buf.prev_slot(self.slot);
            true
        }
    }

    /// Move by `n` positions, `None` when leaving `[begin, end]`
    ///
    /// 移动 `n` 个位置，超出 `[begin, end]` 时返回 `None`
    pub fn checked_offset(&self, n: isize) -> Option<Self> {
        let target = self.index().checked_add_signed(n)?;
        if target > self.buf.len() {
            return None;
        }
        let step = n.unsigned_abs();
        let slot = if n >= 0 {
            self.buf.add(self.slot, step)
        } else {
            self.buf.sub(self.slot, step)
        };
        Some(Self::new(self.buf, slot))
    }

    /// Move by `n` positions
    ///
    /// 移动 `n` 个位置
    ///
    /// # Panics
    ///
    /// Panics when the result leaves `[begin, end]`.
    pub fn offset(&self, n: isize) -> Self {
        match self.checked_offset(n) {
            Some(cursor) => cursor,
            None => panic!(
                "cursor offset {n} from index {} leaves a buffer of length {}",
                self.index(),
                self.buf.len()
            ),
        }
    }

    /// Signed number of steps from `other` to `self`
    ///
    /// 从 `other` 到 `self` 的有符号步数
    ///
    /// # Panics
    ///
    /// Panics if the cursors belong to different buffers.
    pub fn distance(&self, other: &Self) -> isize {
        assert!(
            ptr::eq(self.buf, other.buf),
            "cursors belong to different buffers"
        );
        self.index() as isize - other.index() as isize
    }
}

impl<T, A: SlotAllocator> Clone for Cursor<'_, T, A> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, A: SlotAllocator> Copy for Cursor<'_, T, A> {}

impl<T, A: SlotAllocator> fmt::Debug for Cursor<'_, T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("index", &self.index())
            .field("slot", &self.slot)
            .finish()
    }
}

impl<T, A: SlotAllocator> PartialEq for Cursor<'_, T, A> {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.buf, other.buf) && self.slot == other.slot
    }
}

impl<T, A: SlotAllocator> Eq for Cursor<'_, T, A> {}

/// Cursors of different buffers are unordered
///
/// 不同缓冲区的游标之间无序
impl<T, A: SlotAllocator> PartialOrd for Cursor<'_, T, A> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if ptr::eq(self.buf, other.buf) {
            Some(self.index().cmp(&other.index()))
        } else {
            None
        }
    }
}

impl<'a, T, A: SlotAllocator> Add<isize> for Cursor<'a, T, A> {
    type Output = Cursor<'a, T, A>;

    fn add(self, n: isize) -> Self::Output {
        self.offset(n)
    }
}

impl<'a, T, A: SlotAllocator> Sub<isize> for Cursor<'a, T, A> {
    type Output = Cursor<'a, T, A>;

    fn sub(self, n: isize) -> Self::Output {
        let n = n
            .checked_neg()
            .unwrap_or_else(|| panic!("cursor offset overflow"));
        self.offset(n)
    }
}

impl<'a, T, A: SlotAllocator> Sub for Cursor<'a, T, A> {
    type Output = isize;

    fn sub(self, other: Self) -> isize {
        self.distance(&other)
    }
}

#[cfg(test)]
mod tests {
    use crate::CircularBuffer;

    fn wrapped() -> CircularBuffer<i32> {
        // capacity 4, first at slot 3 after wraparound
        let mut buf = CircularBuffer::with_capacity(4);
        for i in 0..4 {
            buf.push_back(i);
        }
        for _ in 0..3 {
            buf.pop_front();
        }
        for i in 4..7 {
            buf.push_back(i);
        }
        buf
    }

    #[test]
    fn test_iter_logical_order() {
        let buf = wrapped();
        assert_eq!(buf.iter().copied().collect::<Vec<_>>(), [3, 4, 5, 6]);
        assert_eq!(buf.iter().rev().copied().collect::<Vec<_>>(), [6, 5, 4, 3]);
        assert_eq!(buf.iter().len(), 4);
    }

    #[test]
    fn test_iter_mut() {
        let mut buf = wrapped();
        for value in buf.iter_mut() {
            *value *= 10;
        }
        assert_eq!(buf.iter().copied().collect::<Vec<_>>(), [30, 40, 50, 60]);
    }

    #[test]
    fn test_into_iter_both_ends() {
        let mut iter = wrapped().into_iter();
        assert_eq!(iter.next(), Some(3));
        assert_eq!(iter.next_back(), Some(6));
        assert_eq!(iter.len(), 2);
        assert_eq!(iter.collect::<Vec<_>>(), [4, 5]);
    }

    #[test]
    fn test_cursor_distance_and_order() {
        let buf = wrapped();
        let begin = buf.begin();
        let end = buf.end();
        assert_eq!(end - begin, buf.len() as isize);
        assert_eq!(begin - end, -(buf.len() as isize));
        assert!(begin < end);

        // Physical slots are not in logical order here
        let third = begin + 2;
        assert_eq!(third.get(), Some(&5));
        assert_eq!(third.index(), 2);
        assert!(begin < third && third < end);
        assert_eq!(third - 2, begin);
    }

    #[test]
    fn test_cursor_walk() {
        let buf = wrapped();
        let mut cursor = buf.begin();
        let mut seen = Vec::new();
        while let Some(value) = cursor.get() {
            seen.push(*value);
            assert!(cursor.move_next());
        }
        assert_eq!(seen, [3, 4, 5, 6]);
        assert_eq!(cursor, buf.end());
        assert!(!cursor.move_next());

        while cursor.move_prev() {}
        assert_eq!(cursor, buf.begin());
    }

    #[test]
    fn test_cursor_bounds() {
        let buf = wrapped();
        assert!(buf.begin().checked_offset(-1).is_none());
        assert!(buf.end().checked_offset(1).is_none());
        assert_eq!(buf.begin().checked_offset(4), Some(buf.end()));
        assert_eq!(buf.cursor(4), Some(buf.end()));
        assert!(buf.cursor(5).is_none());
    }

    #[test]
    #[should_panic(expected = "leaves a buffer of length")]
    fn test_cursor_offset_panics() {
        let buf = wrapped();
        let _ = buf.end() + 1;
    }
}
