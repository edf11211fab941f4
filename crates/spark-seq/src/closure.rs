//! # 闭包生成器：持锁的“检查-推进”事务
//!
//! ## 核心意图（Why）
//! - 构造函数返回一个零参数闭包，每次调用同步地推进游标并返回下一个值/分块，
//!   耗尽后返回 [`SeqError::StopIteration`]；
//! - 闭包满足 `Fn + Send + Sync`，可放进 `Arc` 由多个线程同时调用。
//!
//! ## 行为契约（What）
//! - 构造本身从不失败：步长/分块大小非法时返回的闭包在**每次**调用时都给出
//!   [`SeqError::InvalidOffset`]，且不产生任何元素；
//! - 读取游标、比较边界、推进游标在同一把锁内完成，并发调用方既不会看到重复值，也不会跳过值；
//! - 第一次返回 `StopIteration` 时区间闭包的内部步长清零、分块闭包置停止位，
//!   此后的调用不再做任何边界运算，恒返回 `StopIteration`。

use tracing::trace;

use crate::bounds::{ChunkPlan, Span};
use crate::error::{Result, SeqError};
use crate::observability::targets;
use crate::source::{Chunk, ChunkSource};
use crate::sync::Mutex;

/// 区间闭包的私有状态。
#[derive(Debug)]
struct RangeCursor {
    cursor: i64,
    stop: i64,
    step: i64,
}

impl RangeCursor {
    fn new(span: Span) -> Self {
        Self {
            cursor: span.start(),
            stop: span.stop(),
            step: span.step(),
        }
    }

    fn advance(&mut self) -> Result<i64> {
        if self.cursor >= self.stop {
            if self.step != 0 {
                trace!(target: targets::CLOSURE, cursor = self.cursor, "range closure exhausted");
                self.step = 0;
            }
            return Err(SeqError::StopIteration);
        }
        let value = self.cursor;
        self.cursor = self.cursor.saturating_add(self.step);
        Ok(value)
    }
}

/// 分块闭包的私有状态；窗口截断统一交给 [`ChunkPlan::window`]。
#[derive(Debug)]
struct ChunkCursor {
    source: ChunkSource,
    plan: ChunkPlan,
    offset: usize,
    stopped: bool,
}

impl ChunkCursor {
    fn new(source: ChunkSource, plan: ChunkPlan) -> Self {
        Self {
            source,
            plan,
            offset: 0,
            stopped: false,
        }
    }

    fn advance(&mut self) -> Result<Chunk> {
        if !self.stopped {
            if let Some(window) = self.plan.window(self.offset) {
                self.offset = window.end;
                return Ok(self.source.view(window));
            }
            trace!(target: targets::CLOSURE, offset = self.offset, "chunk closure exhausted");
            self.stopped = true;
        }
        Err(SeqError::StopIteration)
    }
}

/// 构造区间闭包 `[start, stop)`，步长 `step`。
///
/// # 教案式说明
/// - **意图 (Why)**：没有独立的构造步骤可以报错，非法配置被推迟到第一次调用时暴露；
/// - **执行 (How)**：闭包捕获 `Result<Mutex<RangeCursor>, SeqError>`，合法时加锁推进，非法时克隆错误；
/// - **契约 (What)**：调用返回 `Ok(value)`、`Err(StopIteration)` 或 `Err(InvalidOffset)` 三者之一。
///
/// ```
/// use spark_seq::closure::range_fn;
///
/// let next = range_fn(0, 3, 1);
/// assert_eq!(next(), Ok(0));
/// assert_eq!(next(), Ok(1));
/// assert_eq!(next(), Ok(2));
/// assert!(next().is_err_and(|err| err.is_stop()));
/// ```
pub fn range_fn(start: i64, stop: i64, step: i64) -> impl Fn() -> Result<i64> + Send + Sync {
    let state = Span::new(start, stop, step).map(|span| Mutex::new(RangeCursor::new(span)));
    move || match &state {
        Ok(cell) => cell.lock().advance(),
        Err(err) => Err(err.clone()),
    }
}

/// 构造分块闭包：每次调用返回 `source` 的下一个长度至多为 `size` 的连续分块。
///
/// 闭包持有数据源的引用计数克隆，不借用 `source`，可以移入其他线程。
pub fn chunk_fn(
    source: &ChunkSource,
    size: i64,
) -> impl Fn() -> Result<Chunk> + Send + Sync + use<> {
    let state = ChunkPlan::new(source.len(), size)
        .map(|plan| Mutex::new(ChunkCursor::new(source.clone(), plan)));
    move || match &state {
        Ok(cell) => cell.lock().advance(),
        Err(err) => Err(err.clone()),
    }
}
