use shared::AppError;
use thiserror::Error;

/// 启动阶段错误
///
/// 请求处理阶段统一使用 [`AppError`]，这里只覆盖初始化和监听。
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("配置错误: {0}")]
    Config(#[from] AppError),

    #[error("外部服务初始化失败: {0}")]
    Collaborator(#[from] mixo_client::ClientError),

    #[error("端口绑定失败: {0}")]
    Bind(#[source] std::io::Error),

    #[error("服务器运行错误: {0}")]
    Serve(#[source] std::io::Error),
}

/// 启动流程的 Result 类型别名
pub type Result<T> = std::result::Result<T, ServerError>;
