//! 分块策略共享的只读数据源与零拷贝分块视图。
//!
//! # 模块定位（Why）
//! - 分块生成器只引用、从不复制或修改底层序列；通道策略还需把数据源带进后台线程，
//!   因此以 `Arc<[i64]>` 持有，克隆只增加引用计数；
//! - [`Chunk`] 持有同一个 `Arc` 与窗口区间，解引用为 `[i64]`，跨线程发送时不拷贝元素。
//!
//! # 契约说明（What）
//! - 多个分块生成器可以并发读取同一个 [`ChunkSource`]；
//! - [`Chunk`] 的相等性按元素比较，可直接与 `Vec<i64>`、切片、数组比较。

use std::fmt;
use std::ops::{Deref, Range};
use std::sync::Arc;

/// 分块生成器的只读底层序列。
#[derive(Clone, Default, Eq, PartialEq, Hash)]
pub struct ChunkSource {
    items: Arc<[i64]>,
}

impl ChunkSource {
    pub fn new(items: impl Into<Arc<[i64]>>) -> Self {
        Self {
            items: items.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn as_slice(&self) -> &[i64] {
        &self.items
    }

    /// 截取 `window` 对应的零拷贝视图。调用方保证窗口位于序列范围内。
    pub(crate) fn view(&self, window: Range<usize>) -> Chunk {
        debug_assert!(window.start <= window.end && window.end <= self.items.len());
        Chunk {
            items: Arc::clone(&self.items),
            window,
        }
    }
}

impl From<Vec<i64>> for ChunkSource {
    fn from(items: Vec<i64>) -> Self {
        Self::new(items)
    }
}

impl From<&[i64]> for ChunkSource {
    fn from(items: &[i64]) -> Self {
        Self::new(items)
    }
}

impl<const N: usize> From<[i64; N]> for ChunkSource {
    fn from(items: [i64; N]) -> Self {
        Self::new(Vec::from(items))
    }
}

impl FromIterator<i64> for ChunkSource {
    fn from_iter<I: IntoIterator<Item = i64>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect::<Vec<_>>())
    }
}

impl fmt::Debug for ChunkSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ChunkSource").field(&self.as_slice()).finish()
    }
}

/// 数据源上的一个连续分块。
#[derive(Clone)]
pub struct Chunk {
    items: Arc<[i64]>,
    window: Range<usize>,
}

impl Chunk {
    /// 分块在数据源中的位置。
    pub fn window(&self) -> Range<usize> {
        self.window.clone()
    }

    pub fn as_slice(&self) -> &[i64] {
        &self.items[self.window.clone()]
    }

    pub fn to_vec(&self) -> Vec<i64> {
        self.as_slice().to_vec()
    }
}

impl Deref for Chunk {
    type Target = [i64];

    fn deref(&self) -> &[i64] {
        self.as_slice()
    }
}

impl AsRef<[i64]> for Chunk {
    fn as_ref(&self) -> &[i64] {
        self.as_slice()
    }
}

impl PartialEq for Chunk {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl Eq for Chunk {}

impl PartialEq<[i64]> for Chunk {
    fn eq(&self, other: &[i64]) -> bool {
        self.as_slice() == other
    }
}

impl PartialEq<Vec<i64>> for Chunk {
    fn eq(&self, other: &Vec<i64>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<const N: usize> PartialEq<[i64; N]> for Chunk {
    fn eq(&self, other: &[i64; N]) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl fmt::Debug for Chunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_slice(), f)
    }
}
