//! 区间与分块的校验值类型。
//!
//! # 教案式说明
//! - **意图 (Why)**：四种策略都需要“步长/分块大小必须为正”的同一道闸门，
//!   将校验收敛到 [`Span`] 与 [`ChunkPlan`]，保证同一非法输入在所有策略下得到同一错误；
//! - **逻辑 (How)**：构造函数完成校验并记录 `warn` 日志；之后的游标推进只依赖已校验字段，
//!   推进采用饱和加法，接近 `i64::MAX` 的区间也会正常终止而不会回绕；
//! - **契约 (What)**：`Span` 表示半开区间 `[start, stop)`，`stop <= start` 时为空序列而非错误；
//!   `ChunkPlan` 描述长度为 `len` 的序列按 `size` 切分出的连续、不重叠窗口。

use std::ops::Range;

use tracing::warn;

use crate::error::{Result, SeqError};
use crate::observability::targets;

/// 已校验的步进区间 `[start, stop)`。
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Span {
    start: i64,
    stop: i64,
    step: i64,
}

impl Span {
    /// 校验 `step >= 1` 并构造区间。
    ///
    /// - **前置条件**：无；`start` 可为负，`stop` 可小于等于 `start`；
    /// - **后置条件**：成功时 `step() >= 1`；失败返回 [`SeqError::InvalidOffset`]。
    pub fn new(start: i64, stop: i64, step: i64) -> Result<Self> {
        if step < 1 {
            warn!(target: targets::BOUNDS, start, stop, step, "rejected non-positive step");
            return Err(SeqError::invalid_step(step));
        }
        Ok(Self { start, stop, step })
    }

    pub fn start(&self) -> i64 {
        self.start
    }

    pub fn stop(&self) -> i64 {
        self.stop
    }

    pub fn step(&self) -> i64 {
        self.step
    }

    /// 区间内是否没有任何元素。
    pub fn is_empty(&self) -> bool {
        self.start >= self.stop
    }

    /// 区间内的元素个数。
    ///
    /// 以 `i128` 计算差值，`[i64::MIN, i64::MAX)` 这样的极端区间也不会溢出。
    pub fn len(&self) -> u64 {
        if self.is_empty() {
            return 0;
        }
        let distance = i128::from(self.stop) - i128::from(self.start);
        let count = (distance - 1) / i128::from(self.step) + 1;
        count as u64
    }

    /// `cursor` 是否仍位于区间内（只看上界，游标单调递增）。
    pub(crate) fn admits(&self, cursor: i64) -> bool {
        cursor < self.stop
    }

    /// 游标推进一步；溢出时饱和到 `i64::MAX`，该值必然 `>= stop`。
    pub(crate) fn advance(&self, cursor: i64) -> i64 {
        cursor.saturating_add(self.step)
    }
}

/// 已校验的分块切分计划。
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct ChunkPlan {
    len: usize,
    size: usize,
}

impl ChunkPlan {
    /// 校验 `size >= 1` 并为长度为 `len` 的序列生成切分计划。
    pub fn new(len: usize, size: i64) -> Result<Self> {
        if size < 1 {
            warn!(target: targets::BOUNDS, len, size, "rejected non-positive chunk size");
            return Err(SeqError::invalid_size(size));
        }
        // 大于 usize::MAX 的分块大小与 usize::MAX 等价：整个序列落在一个分块内。
        let size = usize::try_from(size).unwrap_or(usize::MAX);
        Ok(Self { len, size })
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// 分块总数；空序列为 0。
    pub fn count(&self) -> usize {
        self.len.div_ceil(self.size)
    }

    /// 以 `offset` 为起点的分块窗口，结束位置截断到序列长度；越界返回 `None`。
    pub fn window(&self, offset: usize) -> Option<Range<usize>> {
        if offset >= self.len {
            return None;
        }
        let end = offset.saturating_add(self.size).min(self.len);
        Some(offset..end)
    }

    /// 第 `index` 个分块的窗口。
    pub fn bounds(&self, index: usize) -> Option<Range<usize>> {
        self.window(index.checked_mul(self.size)?)
    }
}
