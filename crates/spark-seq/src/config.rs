//! 通道策略的可调参数。
//!
//! # 教案式说明
//! - **意图 (Why)**：缓冲容量只影响生产者与消费者的耦合程度，不影响交付的值与顺序；
//!   将其外置为配置，便于在基准中对比“无缓冲会合”与“小缓冲”两种形态；
//! - **逻辑 (How)**：结构体派生 `serde`，每个字段单独声明缺省值，可直接从 TOML/JSON 片段反序列化；
//! - **契约 (What)**：`capacity = 0` 表示会合通道（每次发送都等待接收方），
//!   默认值 `1` 允许生产者领先一个元素；`thread_name` 为空时生产者线程使用
//!   [`DEFAULT_PRODUCER_NAME`]。

use serde::{Deserialize, Serialize};

/// 生产者线程的默认名称。
pub const DEFAULT_PRODUCER_NAME: &str = "spark-seq-producer";

/// 默认缓冲容量。
pub const DEFAULT_CAPACITY: usize = 1;

/// 通道生成器的构造参数。
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ChannelOptions {
    /// 有界队列容量，`0` 为会合通道。
    #[serde(default = "default_capacity")]
    pub capacity: usize,
    /// 生产者线程名称。
    #[serde(default)]
    pub thread_name: Option<String>,
}

fn default_capacity() -> usize {
    DEFAULT_CAPACITY
}

impl Default for ChannelOptions {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            thread_name: None,
        }
    }
}

impl ChannelOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn with_thread_name(mut self, name: impl Into<String>) -> Self {
        self.thread_name = Some(name.into());
        self
    }

    /// 实际用于派生线程的名称。
    pub fn producer_name(&self) -> &str {
        self.thread_name.as_deref().unwrap_or(DEFAULT_PRODUCER_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_single_slot_buffer() {
        let options = ChannelOptions::default();
        assert_eq!(options.capacity, 1);
        assert_eq!(options.producer_name(), DEFAULT_PRODUCER_NAME);
    }

    #[test]
    fn builder_overrides_fields() {
        let options = ChannelOptions::new()
            .with_capacity(0)
            .with_thread_name("range-feeder");
        assert_eq!(options.capacity, 0);
        assert_eq!(options.producer_name(), "range-feeder");
    }

    #[test]
    fn deserializes_partial_documents() {
        let options: ChannelOptions = toml::from_str("capacity = 16").expect("合法 TOML");
        assert_eq!(options, ChannelOptions::new().with_capacity(16));

        let options: ChannelOptions =
            serde_json::from_str(r#"{"thread_name":"feeder"}"#).expect("合法 JSON");
        assert_eq!(options.capacity, DEFAULT_CAPACITY);
        assert_eq!(options.producer_name(), "feeder");
    }

    #[test]
    fn empty_document_yields_defaults() {
        let options: ChannelOptions = toml::from_str("").expect("空 TOML");
        assert_eq!(options, ChannelOptions::default());
        let options: ChannelOptions = serde_json::from_str("{}").expect("空 JSON");
        assert_eq!(options, ChannelOptions::default());
    }
}
