//! # 惰性序列：由消费方驱动的挂起/恢复
//!
//! ## 核心意图（Why）
//! - 语言原生的惰性序列：每产出一个元素就“挂起”，只有消费方要求下一个元素时才恢复计算；
//!   在 Rust 中即 [`Iterator::next`] 驱动的显式状态机，无需线程，也无需加锁；
//! - 另提供推送式协议 [`RangeSeq::drive`]：序列把元素逐个交给回调，回调返回 `false` 即停止，
//!   剩余区间不再计算（协作式提前终止，不需要取消令牌）。
//!
//! ## 行为契约（What）
//! - [`RangeSeq`]/[`ChunkSeq`] 是可重复调用的序列描述：每次 `into_iter()` 都从头开始；
//! - [`RangeIter`]/[`ChunkIter`] 是一次性的迭代器：耗尽后保持耗尽（实现 [`FusedIterator`]），
//!   并给出精确的剩余长度（实现 [`ExactSizeIterator`]）；
//! - 步长/分块大小非法时构造返回 [`crate::SeqError::InvalidOffset`]，不会产出任何元素。

use std::iter::FusedIterator;

use crate::bounds::{ChunkPlan, Span};
use crate::error::Result;
use crate::source::{Chunk, ChunkSource};

/// 可重复迭代的区间序列 `[start, stop)`。
///
/// ```
/// use spark_seq::lazy::RangeSeq;
///
/// let seq = RangeSeq::new(-7, 10, 5)?;
/// assert_eq!(seq.into_iter().collect::<Vec<_>>(), [-7, -2, 3, 8]);
/// // 再次迭代从头开始。
/// assert_eq!(seq.into_iter().next(), Some(-7));
/// # Ok::<(), spark_seq::SeqError>(())
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct RangeSeq {
    span: Span,
}

impl RangeSeq {
    pub fn new(start: i64, stop: i64, step: i64) -> Result<Self> {
        Ok(Self {
            span: Span::new(start, stop, step)?,
        })
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn iter(&self) -> RangeIter {
        RangeIter {
            span: self.span,
            cursor: self.span.start(),
        }
    }

    /// 推送式消费：逐个把元素交给 `sink`，`sink` 返回 `false` 时立即停止。
    ///
    /// 返回值表示区间是否被完整走完。
    pub fn drive(&self, sink: impl FnMut(i64) -> bool) -> bool {
        self.iter().all(sink)
    }
}

impl IntoIterator for RangeSeq {
    type Item = i64;
    type IntoIter = RangeIter;

    fn into_iter(self) -> RangeIter {
        self.iter()
    }
}

impl IntoIterator for &RangeSeq {
    type Item = i64;
    type IntoIter = RangeIter;

    fn into_iter(self) -> RangeIter {
        self.iter()
    }
}

/// 区间序列的一次性迭代器。
#[derive(Clone, Debug)]
pub struct RangeIter {
    span: Span,
    cursor: i64,
}

impl RangeIter {
    fn remaining(&self) -> u128 {
        if !self.span.admits(self.cursor) {
            return 0;
        }
        let distance = i128::from(self.span.stop()) - i128::from(self.cursor);
        ((distance - 1) / i128::from(self.span.step()) + 1) as u128
    }
}

impl Iterator for RangeIter {
    type Item = i64;

    fn next(&mut self) -> Option<i64> {
        if !self.span.admits(self.cursor) {
            return None;
        }
        let value = self.cursor;
        self.cursor = self.span.advance(value);
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining();
        let lower = usize::try_from(remaining).unwrap_or(usize::MAX);
        (lower, usize::try_from(remaining).ok())
    }
}

// 64 位目标上区间长度总能放进 usize，`size_hint` 上下界一致。
impl ExactSizeIterator for RangeIter {}

impl FusedIterator for RangeIter {}

/// 可重复迭代的分块序列。
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ChunkSeq {
    source: ChunkSource,
    plan: ChunkPlan,
}

impl ChunkSeq {
    pub fn new(source: &ChunkSource, size: i64) -> Result<Self> {
        Ok(Self {
            plan: ChunkPlan::new(source.len(), size)?,
            source: source.clone(),
        })
    }

    pub fn plan(&self) -> ChunkPlan {
        self.plan
    }

    pub fn iter(&self) -> ChunkIter {
        ChunkIter {
            source: self.source.clone(),
            plan: self.plan,
            offset: 0,
        }
    }

    /// 推送式消费分块，语义同 [`RangeSeq::drive`]。
    pub fn drive(&self, sink: impl FnMut(Chunk) -> bool) -> bool {
        self.iter().all(sink)
    }
}

impl IntoIterator for ChunkSeq {
    type Item = Chunk;
    type IntoIter = ChunkIter;

    fn into_iter(self) -> ChunkIter {
        ChunkIter {
            source: self.source,
            plan: self.plan,
            offset: 0,
        }
    }
}

impl IntoIterator for &ChunkSeq {
    type Item = Chunk;
    type IntoIter = ChunkIter;

    fn into_iter(self) -> ChunkIter {
        self.iter()
    }
}

/// 分块序列的一次性迭代器。
#[derive(Clone, Debug)]
pub struct ChunkIter {
    source: ChunkSource,
    plan: ChunkPlan,
    offset: usize,
}

impl Iterator for ChunkIter {
    type Item = Chunk;

    fn next(&mut self) -> Option<Chunk> {
        let window = self.plan.window(self.offset)?;
        self.offset = window.end;
        Some(self.source.view(window))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        // offset 总落在分块边界或序列末尾，已产出的分块数即 offset 向上取整除以 size。
        let produced = self.offset.div_ceil(self.plan.size());
        let chunks = self.plan.count().saturating_sub(produced);
        (chunks, Some(chunks))
    }
}

impl ExactSizeIterator for ChunkIter {}

impl FusedIterator for ChunkIter {}
