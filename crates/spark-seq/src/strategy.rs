//! 策略选择与统一收集入口。
//!
//! # 教案式说明
//! - **意图 (Why)**：四种模型彼此独立，互不依赖；测试与基准需要用同一组输入驱动每一种模型，
//!   再比较输出是否逐元素相同。本模块只做“按各自消费协议读到结束”这一件事；
//! - **逻辑 (How)**：
//!   - `Channel`：迭代接收端直到队列关闭；
//!   - `Closure`：反复调用直到 `StopIteration`，其他错误原样返回；
//!   - `Object`：按“标志为 `true` 才接收”的约定读取；
//!   - `Lazy`：直接 `collect`；
//! - **契约 (What)**：合法输入下四种策略返回相同序列；非法偏移量统一返回
//!   [`SeqError::InvalidOffset`]，不会返回部分结果。

use std::fmt;

use crate::channel::{chunk_channel, range_channel};
use crate::closure::{chunk_fn, range_fn};
use crate::error::{Result, SeqError};
use crate::lazy::{ChunkSeq, RangeSeq};
use crate::object::{ChunkGenerator, RangeGenerator};
use crate::source::{Chunk, ChunkSource};

/// 序列生成模型。
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Strategy {
    /// 后台生产者 + 有界队列。
    Channel,
    /// 持锁闭包。
    Closure,
    /// 持锁状态对象。
    Object,
    /// 消费方驱动的惰性迭代器。
    Lazy,
}

impl Strategy {
    /// 全部策略，按上面的声明顺序。
    pub const ALL: [Strategy; 4] = [
        Strategy::Channel,
        Strategy::Closure,
        Strategy::Object,
        Strategy::Lazy,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Strategy::Channel => "channel",
            Strategy::Closure => "closure",
            Strategy::Object => "object",
            Strategy::Lazy => "lazy",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 用指定策略生成区间 `[start, stop)` 并收集全部元素。
pub fn collect_range(strategy: Strategy, start: i64, stop: i64, step: i64) -> Result<Vec<i64>> {
    match strategy {
        Strategy::Channel => Ok(range_channel(start, stop, step)?.collect()),
        Strategy::Closure => drain_fn(range_fn(start, stop, step)),
        Strategy::Object => Ok(RangeGenerator::new(start, stop, step)?.iter().collect()),
        Strategy::Lazy => Ok(RangeSeq::new(start, stop, step)?.into_iter().collect()),
    }
}

/// 用指定策略把 `source` 按 `size` 分块并收集全部分块。
pub fn collect_chunks(strategy: Strategy, source: &ChunkSource, size: i64) -> Result<Vec<Chunk>> {
    match strategy {
        Strategy::Channel => Ok(chunk_channel(source, size)?.collect()),
        Strategy::Closure => drain_fn(chunk_fn(source, size)),
        Strategy::Object => Ok(ChunkGenerator::new(source, size)?.iter().collect()),
        Strategy::Lazy => Ok(ChunkSeq::new(source, size)?.into_iter().collect()),
    }
}

fn drain_fn<T>(next: impl Fn() -> Result<T>) -> Result<Vec<T>> {
    let mut out = Vec::new();
    loop {
        match next() {
            Ok(item) => out.push(item),
            Err(SeqError::StopIteration) => return Ok(out),
            Err(err) => return Err(err),
        }
    }
}
