//! # error 模块说明
//!
//! ## 角色定位（Why）
//! - 为四种生成策略提供统一的错误语义：配置非法（步长/分块大小非正）、序列结束信号、
//!   生产者线程无法派生；
//! - 让通道、闭包、状态对象、惰性迭代器在“同一输入 → 同一错误”上保持可比较性，
//!   测试可以直接对 [`SeqError`] 做 `assert_eq!`。
//!
//! ## 设计要求（What）
//! - 所有错误类型派生 `thiserror::Error`，兼容 `std::error::Error`；
//! - [`SeqError::StopIteration`] 不是故障，而是闭包策略的“序列结束”信号，调用方应将其视为终止条件，
//!   而非向上传播的错误；
//! - 不存在重试语义：生成过程纯确定，没有可恢复的瞬时故障。

use std::fmt;

use thiserror::Error;

/// 统一的结果别名。
pub type Result<T, E = SeqError> = std::result::Result<T, E>;

/// 被校验的偏移量种类：区间步长或分块大小。
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum OffsetKind {
    /// 区间生成器的 `step`。
    Step,
    /// 分块生成器的 `size`。
    Size,
}

impl fmt::Display for OffsetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OffsetKind::Step => f.write_str("step"),
            OffsetKind::Size => f.write_str("size"),
        }
    }
}

/// 序列生成错误域。
///
/// # 教案式说明
/// - **意图 (Why)**：集中表达构造期失败与结束信号，避免每个策略自造一套哨兵值；
/// - **契约 (What)**：
///   - `InvalidOffset` 在构造时（闭包策略为首次调用时）同步返回，内部从不吞掉；
///   - `StopIteration` 仅由闭包策略产生，一旦出现，后续每次调用都会继续返回它；
///   - `ProducerSpawn` 仅由通道策略产生，表示操作系统拒绝创建生产者线程；
/// - **设计权衡 (Trade-offs)**：`ProducerSpawn` 携带 `String` 形式的底层错误描述，
///   以保持 `Clone + Eq`，代价是丢失原始 `io::Error` 的 `kind` 信息。
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum SeqError {
    /// 步长或分块大小小于 1。
    #[error("iteration offset must be positive: {kind} = {value}")]
    InvalidOffset { kind: OffsetKind, value: i64 },

    /// 序列已耗尽。
    #[error("stop iteration")]
    StopIteration,

    /// 通道策略无法派生后台生产者线程。
    #[error("failed to spawn sequence producer: {detail}")]
    ProducerSpawn { detail: String },
}

impl SeqError {
    /// 是否为序列结束信号。
    pub fn is_stop(&self) -> bool {
        matches!(self, SeqError::StopIteration)
    }

    /// 是否为偏移量配置错误。
    pub fn is_invalid_offset(&self) -> bool {
        matches!(self, SeqError::InvalidOffset { .. })
    }

    pub(crate) fn invalid_step(value: i64) -> Self {
        SeqError::InvalidOffset {
            kind: OffsetKind::Step,
            value,
        }
    }

    pub(crate) fn invalid_size(value: i64) -> Self {
        SeqError::InvalidOffset {
            kind: OffsetKind::Size,
            value,
        }
    }
}
