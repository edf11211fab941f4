//! # 状态对象生成器：显式可变对象 + “是否还有”标志
//!
//! ## 核心意图（Why）
//! - 与闭包策略语义相同，但状态由显式对象持有，结束信号是布尔标志而非错误值；
//! - 方法接收 `&self`，内部以互斥锁保护游标，可以在多个线程间共享同一个实例。
//!
//! ## 行为契约（What）
//! - [`RangeGenerator::next`] 返回 `(cursor, cursor < stop)` 并在返回前推进游标：
//!   最后一个区间内的值伴随 `true` 返回，**下一次**调用才返回越界值与 `false`；
//!   消费循环应写成“拿到 `false` 即丢弃本次值并停止”，[`RangeGenerator::iter`] 即按此约定实现；
//! - [`ChunkGenerator::next_chunk`] 把分块结束位置截断到数据源长度，标志取自本次调用前的位置；
//!   耗尽后返回空分块与 `false`；
//! - 一旦标志为 `false`，此后每次调用都保持 `false`。
//!
//! ## 风险提示（Trade-offs）
//! - 标志“落后游标一拍”是有意保留的边界行为：既有消费方依赖“先取值、再看标志”的写法，
//!   修正它会让这些循环少读或多读一个元素。

use tracing::trace;

use crate::bounds::{ChunkPlan, Span};
use crate::error::Result;
use crate::observability::targets;
use crate::source::{Chunk, ChunkSource};
use crate::sync::Mutex;

#[derive(Debug)]
struct Position<T> {
    at: T,
    exhausted: bool,
}

impl<T> Position<T> {
    fn new(at: T) -> Self {
        Self {
            at,
            exhausted: false,
        }
    }
}

/// 区间状态对象。
///
/// ```
/// use spark_seq::object::RangeGenerator;
///
/// let generator = RangeGenerator::new(0, 2, 1)?;
/// assert_eq!(generator.next(), (0, true));
/// assert_eq!(generator.next(), (1, true));
/// assert_eq!(generator.next(), (2, false));
/// # Ok::<(), spark_seq::SeqError>(())
/// ```
#[derive(Debug)]
pub struct RangeGenerator {
    span: Span,
    position: Mutex<Position<i64>>,
}

impl RangeGenerator {
    /// 校验步长并构造；步长非正时返回 [`crate::SeqError::InvalidOffset`]。
    pub fn new(start: i64, stop: i64, step: i64) -> Result<Self> {
        let span = Span::new(start, stop, step)?;
        Ok(Self {
            span,
            position: Mutex::new(Position::new(span.start())),
        })
    }

    pub fn span(&self) -> Span {
        self.span
    }

    /// 返回当前游标与“游标仍在区间内”的标志，然后推进游标。
    #[allow(clippy::should_implement_trait)]
    pub fn next(&self) -> (i64, bool) {
        let mut position = self.position.lock();
        let value = position.at;
        let has_more = self.span.admits(value);
        if !has_more && !position.exhausted {
            position.exhausted = true;
            trace!(target: targets::OBJECT, cursor = value, "range object exhausted");
        }
        position.at = self.span.advance(value);
        (value, has_more)
    }

    /// 按“标志为 `true` 才接收本次值”的约定消费剩余元素。
    pub fn iter(&self) -> RangeGeneratorIter<'_> {
        RangeGeneratorIter {
            generator: self,
            done: false,
        }
    }
}

/// [`RangeGenerator::iter`] 返回的借用迭代器。
#[derive(Debug)]
pub struct RangeGeneratorIter<'a> {
    generator: &'a RangeGenerator,
    done: bool,
}

impl Iterator for RangeGeneratorIter<'_> {
    type Item = i64;

    fn next(&mut self) -> Option<i64> {
        if self.done {
            return None;
        }
        match self.generator.next() {
            (value, true) => Some(value),
            (_, false) => {
                self.done = true;
                None
            }
        }
    }
}

/// 分块状态对象。
#[derive(Debug)]
pub struct ChunkGenerator {
    source: ChunkSource,
    plan: ChunkPlan,
    position: Mutex<Position<usize>>,
}

impl ChunkGenerator {
    /// 校验分块大小并构造；数据源以引用计数共享。
    pub fn new(source: &ChunkSource, size: i64) -> Result<Self> {
        let plan = ChunkPlan::new(source.len(), size)?;
        Ok(Self {
            source: source.clone(),
            plan,
            position: Mutex::new(Position::new(0)),
        })
    }

    pub fn plan(&self) -> ChunkPlan {
        self.plan
    }

    /// 返回从当前位置开始的分块（结束位置截断到数据源长度）与“调用前位置仍在范围内”的标志。
    pub fn next_chunk(&self) -> (Chunk, bool) {
        let mut position = self.position.lock();
        let offset = position.at;
        match self.plan.window(offset) {
            Some(window) => {
                position.at = window.end;
                (self.source.view(window), true)
            }
            None => {
                if !position.exhausted {
                    position.exhausted = true;
                    trace!(target: targets::OBJECT, offset, "chunk object exhausted");
                }
                // 耗尽后 offset == len，窗口退化为空分块。
                (self.source.view(offset..offset), false)
            }
        }
    }

    /// 按“标志为 `true` 才接收本次分块”的约定消费剩余分块。
    pub fn iter(&self) -> ChunkGeneratorIter<'_> {
        ChunkGeneratorIter {
            generator: self,
            done: false,
        }
    }
}

/// [`ChunkGenerator::iter`] 返回的借用迭代器。
#[derive(Debug)]
pub struct ChunkGeneratorIter<'a> {
    generator: &'a ChunkGenerator,
    done: bool,
}

impl Iterator for ChunkGeneratorIter<'_> {
    type Item = Chunk;

    fn next(&mut self) -> Option<Chunk> {
        if self.done {
            return None;
        }
        match self.generator.next_chunk() {
            (chunk, true) => Some(chunk),
            (_, false) => {
                self.done = true;
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SeqError;

    #[test]
    fn flag_lags_cursor_by_one_call() {
        let generator = RangeGenerator::new(3, 12, 2).expect("合法区间");
        let mut seen = Vec::new();
        loop {
            let (value, has_more) = generator.next();
            if !has_more {
                assert_eq!(value, 13, "越界值随 false 一起返回");
                break;
            }
            seen.push(value);
        }
        assert_eq!(seen, vec![3, 5, 7, 9, 11]);
        assert_eq!(generator.next(), (15, false));
    }

    #[test]
    fn rejects_non_positive_step() {
        assert_eq!(
            RangeGenerator::new(0, 1, 0).err(),
            Some(SeqError::invalid_step(0))
        );
    }

    #[test]
    fn empty_range_reports_false_first() {
        let generator = RangeGenerator::new(2, 0, 1).expect("合法区间");
        assert_eq!(generator.next(), (2, false));
        assert_eq!(generator.iter().count(), 0);
    }

    #[test]
    fn saturating_cursor_keeps_flag_false() {
        let generator = RangeGenerator::new(i64::MAX - 1, i64::MAX, 5).expect("合法区间");
        assert_eq!(generator.next(), (i64::MAX - 1, true));
        assert_eq!(generator.next(), (i64::MAX, false));
        assert_eq!(generator.next(), (i64::MAX, false));
    }

    #[test]
    fn chunk_flag_reflects_pre_call_position() {
        let source = ChunkSource::from([1, 2, 3, 4, 5]);
        let generator = ChunkGenerator::new(&source, 2).expect("合法分块");
        let (first, more) = generator.next_chunk();
        assert_eq!((first.to_vec(), more), (vec![1, 2], true));
        let (second, more) = generator.next_chunk();
        assert_eq!((second.to_vec(), more), (vec![3, 4], true));
        let (last, more) = generator.next_chunk();
        assert_eq!((last.to_vec(), more), (vec![5], true));
        assert_eq!(last.window(), 4..5);
        let (tail, more) = generator.next_chunk();
        assert!(tail.is_empty());
        assert_eq!(tail.window(), 5..5);
        assert!(!more);
        let (again, more) = generator.next_chunk();
        assert_eq!((again.window(), more), (5..5, false));
    }

    #[test]
    fn chunk_iter_collects_partition() {
        let source = ChunkSource::from([1, 2, 3]);
        let generator = ChunkGenerator::new(&source, 5).expect("合法分块");
        let chunks: Vec<Chunk> = generator.iter().collect();
        assert_eq!(chunks, vec![vec![1, 2, 3]]);
    }

    #[test]
    fn chunk_generator_rejects_negative_size() {
        let source = ChunkSource::from([1, 2]);
        assert_eq!(
            ChunkGenerator::new(&source, -1).err(),
            Some(SeqError::invalid_size(-1))
        );
    }
}
