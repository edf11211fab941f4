//! 多线程共享生成器的并发测试。
//!
//! # 教案级导览
//!
//! - **Why**：闭包与状态对象把“检查-推进”放在同一把锁里，多个调用方共享同一实例时，
//!   每个值必须恰好被一个调用方拿到，且任一调用方看到的值严格递增；通道策略则要求单生产者顺序
//!   不因消费方数量而改变。
//! - **How**：每个测试派生若干线程，各自读到结束信号为止，把拿到的值带回主线程合并；
//!   主线程检查“每线程严格递增 + 合并后无重复无缺口”。
//! - **What**：覆盖区间与分块两种形态；另验证丢弃通道接收端后生产者能确定性退出。

use std::sync::Arc;
use std::thread;

use spark_seq::{
    ChunkGenerator, ChunkSource, RangeGenerator, SeqError, chunk_channel, chunk_fn,
    range_channel, range_fn,
};

const WORKERS: usize = 8;
const STOP: i64 = 20_000;

fn assert_strictly_ascending(values: &[i64]) {
    assert!(
        values.windows(2).all(|pair| pair[0] < pair[1]),
        "单个调用方观察到的值必须严格递增"
    );
}

fn merge_sorted(parts: Vec<Vec<i64>>) -> Vec<i64> {
    let mut all: Vec<i64> = parts.into_iter().flatten().collect();
    all.sort_unstable();
    all
}

fn join_all<T>(handles: Vec<thread::JoinHandle<T>>) -> Vec<T> {
    handles
        .into_iter()
        .map(|handle| handle.join().expect("工作线程不应 panic"))
        .collect()
}

#[test]
fn shared_closure_hands_out_each_value_once() {
    let next = Arc::new(range_fn(0, STOP, 1));
    let handles = (0..WORKERS)
        .map(|_| {
            let next = Arc::clone(&next);
            thread::spawn(move || {
                let mut seen = Vec::new();
                loop {
                    match next() {
                        Ok(value) => seen.push(value),
                        Err(err) => {
                            assert_eq!(err, SeqError::StopIteration);
                            return seen;
                        }
                    }
                }
            })
        })
        .collect();

    let parts = join_all(handles);
    parts.iter().for_each(|part| assert_strictly_ascending(part));
    assert_eq!(merge_sorted(parts), (0..STOP).collect::<Vec<_>>());
    assert_eq!(next(), Err(SeqError::StopIteration));
}

#[test]
fn shared_object_hands_out_each_value_once() {
    let generator = Arc::new(RangeGenerator::new(-STOP, STOP, 3).expect("合法区间"));
    let handles = (0..WORKERS)
        .map(|_| {
            let generator = Arc::clone(&generator);
            thread::spawn(move || generator.iter().collect::<Vec<_>>())
        })
        .collect();

    let parts = join_all(handles);
    parts.iter().for_each(|part| assert_strictly_ascending(part));
    let expected: Vec<i64> = (-STOP..STOP).step_by(3).collect();
    assert_eq!(merge_sorted(parts), expected);
    assert!(!generator.next().1);
}

#[test]
fn shared_chunk_generators_partition_source_once() {
    let source: ChunkSource = (0..STOP).collect();
    let next_chunk = Arc::new(chunk_fn(&source, 7));
    let generator = Arc::new(ChunkGenerator::new(&source, 7).expect("合法分块"));

    let handles = (0..WORKERS)
        .map(|worker| {
            let next_chunk = Arc::clone(&next_chunk);
            let generator = Arc::clone(&generator);
            thread::spawn(move || {
                let mut seen = Vec::new();
                if worker % 2 == 0 {
                    while let Ok(chunk) = next_chunk() {
                        seen.push(chunk.window());
                    }
                } else {
                    seen.extend(generator.iter().map(|chunk| chunk.window()));
                }
                (worker % 2, seen)
            })
        })
        .collect();

    let mut from_closure = Vec::new();
    let mut from_object = Vec::new();
    for (kind, windows) in join_all(handles) {
        if kind == 0 {
            from_closure.extend(windows);
        } else {
            from_object.extend(windows);
        }
    }
    for mut windows in [from_closure, from_object] {
        windows.sort_by_key(|window| window.start);
        let covered: Vec<usize> = windows.iter().flat_map(|window| window.clone()).collect();
        assert_eq!(covered, (0..source.len()).collect::<Vec<_>>());
        assert!(windows.iter().all(|window| window.len() <= 7 && !window.is_empty()));
    }
}

#[test]
fn competing_channel_consumers_preserve_producer_order() {
    let channel = range_channel(0, STOP, 1).expect("合法区间");
    let handles = (0..WORKERS)
        .map(|_| {
            let receiver = channel.receiver().clone();
            thread::spawn(move || receiver.iter().collect::<Vec<_>>())
        })
        .collect();

    let parts = join_all(handles);
    parts.iter().for_each(|part| assert_strictly_ascending(part));
    assert_eq!(merge_sorted(parts), (0..STOP).collect::<Vec<_>>());
    let (rest, report) = channel.drain();
    assert!(rest.is_empty());
    assert_eq!(report.delivered, STOP as u64);
    assert!(!report.abandoned);
}

#[test]
fn independent_channels_do_not_interleave() {
    let source: ChunkSource = (0..1_000).collect();
    let handles: Vec<_> = (0..WORKERS as i64)
        .map(|offset| {
            let source = source.clone();
            thread::spawn(move || {
                let values: Vec<i64> = range_channel(offset, 1_000, WORKERS as i64)
                    .expect("合法区间")
                    .collect();
                let chunks: Vec<i64> = chunk_channel(&source, offset + 1)
                    .expect("合法分块")
                    .flat_map(|chunk| chunk.to_vec())
                    .collect();
                (offset, values, chunks)
            })
        })
        .collect();

    for (offset, values, chunks) in join_all(handles) {
        let expected: Vec<i64> = (offset..1_000).step_by(WORKERS).collect();
        assert_eq!(values, expected);
        assert_eq!(chunks, source.as_slice());
    }
}

#[test]
fn abandoned_channel_producer_terminates() {
    let channel = range_channel(0, i64::MAX, 1).expect("合法区间");
    let first: Vec<i64> = channel.receiver().iter().take(3).collect();
    assert_eq!(first, vec![0, 1, 2]);
    let report = channel.abandon();
    assert!(report.abandoned);
    assert!(report.delivered >= 3);
}
