//! 互斥原语垫片。
//!
//! 教案级说明：常规构建使用 `parking_lot::Mutex`（无中毒语义，`lock()` 直接返回守卫）；
//! 启用 `--cfg loom` 时切换为 `loom::sync::Mutex`，让模型检查能够穷举闭包/状态对象生成器
//! “检查-推进”临界区的所有调度交错。两者统一暴露 `lock()` → 守卫的接口。

#[cfg(not(any(loom, spark_loom)))]
pub(crate) use parking_lot::Mutex;

#[cfg(any(loom, spark_loom))]
pub(crate) struct Mutex<T> {
    inner: loom::sync::Mutex<T>,
}

#[cfg(any(loom, spark_loom))]
impl<T> Mutex<T> {
    pub(crate) fn new(value: T) -> Self {
        Self {
            inner: loom::sync::Mutex::new(value),
        }
    }

    pub(crate) fn lock(&self) -> loom::sync::MutexGuard<'_, T> {
        // 持锁线程 panic 只会发生在测试断言中，此时恢复守卫继续暴露内部状态。
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

#[cfg(any(loom, spark_loom))]
impl<T: std::fmt::Debug> std::fmt::Debug for Mutex<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mutex").finish_non_exhaustive()
    }
}
