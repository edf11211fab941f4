//! # 通道生成器：后台生产者 + 有界队列
//!
//! ## 核心意图（Why）
//! - 以“单生产者、单队列”的形态交付区间值或分块：构造时派生一个后台线程，逐个把元素推入
//!   `crossbeam_channel` 有界队列，消费者阻塞接收直到队列关闭；
//! - 关闭即结束信号：生产者在最后一个元素发出后丢弃 `Sender`，消费者看到的就是迭代终止。
//!
//! ## 行为契约（What）
//! - 步长/分块大小非法时在派生任何线程**之前**同步失败，返回 [`SeqError::InvalidOffset`]；
//! - 每个生成器实例独占一个线程与一条队列，元素严格按生成顺序到达；
//! - 空区间时生产者不发送任何元素，立即关闭队列并退出；
//! - 发送在队列满时阻塞；容量由 [`ChannelOptions`] 决定，只影响缓冲，不影响交付内容。
//!
//! ## 风险提示（Trade-offs）
//! - 不提供显式取消。若消费者丢弃接收端，生产者下一次发送失败后退出并在报告中标记 `abandoned`；
//!   若消费者持有接收端却不再读取，生产者会永久阻塞在发送上，线程随之泄漏。
//!   这是该模型的已知代价，调用方应当读完或丢弃通道。

use std::fmt;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, Sender, TryRecvError};
use tracing::debug;

use crate::bounds::{ChunkPlan, Span};
use crate::config::ChannelOptions;
use crate::error::{Result, SeqError};
use crate::observability::targets;
use crate::source::{Chunk, ChunkSource};

/// 区间通道。
pub type RangeChannel = SeqChannel<i64>;

/// 分块通道。
pub type ChunkChannel = SeqChannel<Chunk>;

/// 生产者退出时的交付统计。
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ProducerReport {
    /// 成功送达队列的元素数。
    pub delivered: u64,
    /// 是否因接收端被丢弃而提前退出。
    pub abandoned: bool,
}

/// 通道生成器的消费端。
///
/// # 教案式说明
/// - **意图 (Why)**：把 `Receiver` 与生产者线程句柄绑在一起，既能当迭代器直接 `for` 消费，
///   也能在测试中确认生产者已经确定性地退出；
/// - **契约 (What)**：[`Iterator::next`] 阻塞直到拿到下一个元素或队列关闭；关闭后每次调用都返回 `None`；
/// - **风险 (Trade-offs)**：直接丢弃 `SeqChannel` 不会等待生产者，线程在下一次发送失败后自行结束。
#[derive(Debug)]
pub struct SeqChannel<T> {
    receiver: Receiver<T>,
    producer: JoinHandle<ProducerReport>,
}

impl<T> SeqChannel<T> {
    /// 阻塞接收下一个元素；队列关闭后返回 `None`。
    pub fn recv(&self) -> Option<T> {
        self.receiver.recv().ok()
    }

    /// 非阻塞接收：队列暂时为空返回 [`TryRecvError::Empty`]，
    /// 生产者已关闭队列且元素取尽后返回 [`TryRecvError::Disconnected`]。
    pub fn try_recv(&self) -> std::result::Result<T, TryRecvError> {
        self.receiver.try_recv()
    }

    /// 底层接收端，供 `select!` 等组合使用。
    pub fn receiver(&self) -> &Receiver<T> {
        &self.receiver
    }

    /// 生产者线程是否已经退出。
    pub fn producer_finished(&self) -> bool {
        self.producer.is_finished()
    }

    /// 丢弃接收端并等待生产者退出，返回其交付统计。
    ///
    /// 生产者若正阻塞在发送上，会因接收端断开而立即返回。
    pub fn abandon(self) -> ProducerReport {
        let Self { receiver, producer } = self;
        drop(receiver);
        join_producer(producer)
    }

    /// 读完剩余元素并等待生产者退出。
    pub fn drain(self) -> (Vec<T>, ProducerReport) {
        let Self { receiver, producer } = self;
        let rest: Vec<T> = receiver.iter().collect();
        (rest, join_producer(producer))
    }
}

impl<T> Iterator for SeqChannel<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.recv()
    }
}

fn join_producer(producer: JoinHandle<ProducerReport>) -> ProducerReport {
    match producer.join() {
        Ok(report) => report,
        // 生产者循环内没有可 panic 的路径；若仍发生，继续向上展开。
        Err(payload) => std::panic::resume_unwind(payload),
    }
}

/// 以默认参数构造区间通道 `[start, stop)`，步长 `step`。
pub fn range_channel(start: i64, stop: i64, step: i64) -> Result<RangeChannel> {
    range_channel_with(start, stop, step, &ChannelOptions::default())
}

/// 以指定参数构造区间通道。
pub fn range_channel_with(
    start: i64,
    stop: i64,
    step: i64,
    options: &ChannelOptions,
) -> Result<RangeChannel> {
    let span = Span::new(start, stop, step)?;
    spawn_producer(options, &span, move |sender| produce_range(span, sender))
}

/// 以默认参数构造分块通道。
pub fn chunk_channel(source: &ChunkSource, size: i64) -> Result<ChunkChannel> {
    chunk_channel_with(source, size, &ChannelOptions::default())
}

/// 以指定参数构造分块通道；数据源以引用计数共享，不复制元素。
pub fn chunk_channel_with(
    source: &ChunkSource,
    size: i64,
    options: &ChannelOptions,
) -> Result<ChunkChannel> {
    let plan = ChunkPlan::new(source.len(), size)?;
    let source = source.clone();
    spawn_producer(options, &plan, move |sender| produce_chunks(&source, plan, sender))
}

fn spawn_producer<T, F>(
    options: &ChannelOptions,
    bounds: &dyn fmt::Debug,
    body: F,
) -> Result<SeqChannel<T>>
where
    T: Send + 'static,
    F: FnOnce(&Sender<T>) -> ProducerReport + Send + 'static,
{
    let (sender, receiver) = crossbeam_channel::bounded(options.capacity);
    let name = options.producer_name().to_owned();
    debug!(
        target: targets::CHANNEL,
        producer = %name,
        capacity = options.capacity,
        bounds = ?bounds,
        "spawning sequence producer"
    );

    let producer = thread::Builder::new()
        .name(name)
        .spawn(move || {
            let report = body(&sender);
            // 显式丢弃发送端：关闭队列即结束信号。
            drop(sender);
            debug!(
                target: targets::CHANNEL,
                delivered = report.delivered,
                abandoned = report.abandoned,
                "sequence producer finished"
            );
            report
        })
        .map_err(|err| SeqError::ProducerSpawn {
            detail: err.to_string(),
        })?;

    Ok(SeqChannel { receiver, producer })
}

fn produce_range(span: Span, sender: &Sender<i64>) -> ProducerReport {
    let mut report = ProducerReport::default();
    let mut cursor = span.start();
    while span.admits(cursor) {
        if sender.send(cursor).is_err() {
            report.abandoned = true;
            break;
        }
        report.delivered += 1;
        cursor = span.advance(cursor);
    }
    report
}

fn produce_chunks(source: &ChunkSource, plan: ChunkPlan, sender: &Sender<Chunk>) -> ProducerReport {
    let mut report = ProducerReport::default();
    let mut offset = 0;
    while let Some(window) = plan.window(offset) {
        offset = window.end;
        if sender.send(source.view(window)).is_err() {
            report.abandoned = true;
            break;
        }
        report.delivered += 1;
    }
    report
}
