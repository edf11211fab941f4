#![deny(unsafe_code)]

//! # spark-seq
//!
//! ## 定位与职责（Why）
//! - 同一组“有界等差序列 + 固定大小分块”语义，在四种并发/控制流模型下各实现一遍：
//!   后台生产者通道、持锁闭包、持锁状态对象、消费方驱动的惰性迭代器；
//! - 工程重点不在算术本身，而在于保证四种执行模型对外**完全一致**：相同的值、相同的停止点、
//!   相同的错误行为。
//!
//! ## 架构嵌入（Where）
//! - `bounds`：步长/分块大小的唯一校验入口，所有策略共享；
//! - `source`：分块策略共享的只读数据源与零拷贝分块视图；
//! - `channel` / `closure` / `object` / `lazy`：四种策略，彼此之间没有依赖；
//! - `strategy`：按策略驱动并收集结果，供测试与基准横向比较；
//! - `config` / `observability` / `error`：通道参数、日志目标与错误域。
//!
//! ## 结束信号对照（What）
//! | 策略 | 结束信号 | 非法偏移量 |
//! |------|----------|------------|
//! | `channel` | 队列关闭（迭代返回 `None`） | 构造时返回错误，不派生线程 |
//! | `closure` | `Err(SeqError::StopIteration)` | 构造不失败，每次调用返回错误 |
//! | `object` | 标志 `false`（落后游标一拍） | 构造时返回错误 |
//! | `lazy` | 迭代返回 `None` | 构造时返回错误 |
//!
//! ## 并发模型（Trade-offs）
//! - `channel` 每个实例一个生产者线程；消费方持有接收端却不读取时生产者会永久阻塞；
//! - `closure` / `object` 以互斥锁把“检查-推进”合成一个原子事务，可被多线程共享；
//! - `lazy` 单线程协作式，无锁。

pub mod bounds;
pub mod channel;
pub mod closure;
pub mod config;
pub mod error;
pub mod lazy;
pub mod object;
pub mod observability;
pub mod source;
pub mod strategy;

mod sync;

pub use bounds::{ChunkPlan, Span};
pub use channel::{
    ChunkChannel, ProducerReport, RangeChannel, SeqChannel, chunk_channel, chunk_channel_with,
    range_channel, range_channel_with,
};
pub use closure::{chunk_fn, range_fn};
pub use config::ChannelOptions;
pub use error::{OffsetKind, Result, SeqError};
pub use lazy::{ChunkIter, ChunkSeq, RangeIter, RangeSeq};
pub use object::{ChunkGenerator, RangeGenerator};
pub use source::{Chunk, ChunkSource};
pub use strategy::{Strategy, collect_chunks, collect_range};
