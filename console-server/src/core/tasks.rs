//! 后台任务管理
//!
//! 统一管理所有后台任务的注册、启动和关闭。
//!
//! # 任务类型
//!
//! - [`TaskKind::Listener`] - 文档库变更监听
//! - [`TaskKind::Periodic`] - 快照定时刷新

use futures::FutureExt;
use std::fmt;
use std::panic::AssertUnwindSafe;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// 任务类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    /// 事件监听器
    Listener,
    /// 定时任务
    Periodic,
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskKind::Listener => write!(f, "Listener"),
            TaskKind::Periodic => write!(f, "Periodic"),
        }
    }
}

struct RegisteredTask {
    name: &'static str,
    kind: TaskKind,
    handle: JoinHandle<()>,
}

/// 后台任务管理器
///
/// 任务通过 [`BackgroundTasks::shutdown_token`] 监听关闭信号。
///
/// ```ignore
/// let mut tasks = BackgroundTasks::new();
/// let token = tasks.shutdown_token();
/// tasks.spawn("snapshot_refresh", TaskKind::Periodic, async move {
///     token.cancelled().await;
/// });
/// tasks.shutdown().await;
/// ```
pub struct BackgroundTasks {
    tasks: Vec<RegisteredTask>,
    shutdown: CancellationToken,
}

impl BackgroundTasks {
    pub fn new() -> Self {
        Self {
            tasks: Vec::new(),
            shutdown: CancellationToken::new(),
        }
    }

    /// 获取取消令牌（用于任务内部监听 shutdown 信号）
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// 注册并启动一个后台任务
    ///
    /// 任务 panic 会被捕获并记录，不会影响其他任务。
    pub fn spawn<F>(&mut self, name: &'static str, kind: TaskKind, future: F)
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let token = self.shutdown.clone();
        let wrapped_future = async move {
            let result = AssertUnwindSafe(future).catch_unwind().await;
            match result {
                Ok(()) if token.is_cancelled() => {
                    tracing::debug!(task = %name, kind = %kind, "Background task stopped");
                }
                Ok(()) => {
                    tracing::warn!(
                        task = %name,
                        kind = %kind,
                        "Background task completed unexpectedly"
                    );
                }
                Err(panic_info) => {
                    let panic_msg = if let Some(s) = panic_info.downcast_ref::<&str>() {
                        (*s).to_string()
                    } else if let Some(s) = panic_info.downcast_ref::<String>() {
                        s.clone()
                    } else {
                        "Unknown panic".to_string()
                    };
                    tracing::error!(
                        task = %name,
                        kind = %kind,
                        panic = %panic_msg,
                        "Background task panicked"
                    );
                }
            }
        };

        let handle = tokio::spawn(wrapped_future);
        tracing::debug!(task = %name, kind = %kind, "Registered background task");
        self.tasks.push(RegisteredTask { name, kind, handle });
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// 按类型统计任务数量 (listener, periodic)
    pub fn count_by_kind(&self) -> (usize, usize) {
        self.tasks.iter().fold((0, 0), |(l, p), task| match task.kind {
            TaskKind::Listener => (l + 1, p),
            TaskKind::Periodic => (l, p + 1),
        })
    }

    /// 打印任务摘要
    pub fn log_summary(&self) {
        let (listener, periodic) = self.count_by_kind();
        tracing::info!(
            "Background tasks registered: {} total (Listener: {}, Periodic: {})",
            self.tasks.len(),
            listener,
            periodic
        );
    }

    /// 返回已经退出的任务数量
    pub fn check_health(&self) -> usize {
        let failed: Vec<_> = self
            .tasks
            .iter()
            .filter(|t| t.handle.is_finished())
            .collect();
        for task in &failed {
            tracing::error!(
                task = %task.name,
                kind = %task.kind,
                "Background task unexpectedly finished"
            );
        }
        failed.len()
    }

    /// Graceful shutdown - 取消所有任务并等待完成
    pub async fn shutdown(self) {
        tracing::info!("Shutting down {} background tasks...", self.tasks.len());
        self.shutdown.cancel();

        for task in self.tasks {
            match task.handle.await {
                Ok(()) => tracing::debug!(task = %task.name, "Task completed"),
                Err(e) if e.is_cancelled() => tracing::debug!(task = %task.name, "Task cancelled"),
                Err(e) => tracing::error!(task = %task.name, error = ?e, "Task panicked"),
            }
        }

        tracing::info!("All background tasks stopped");
    }
}

impl Default for BackgroundTasks {
    fn default() -> Self {
        Self::new()
    }
}
