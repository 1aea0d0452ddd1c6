use anyhow::Context;
use console_server::{Config, Server, ServerState, init_logger_with_file, print_banner};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. 加载 .env (不存在时忽略)
    let _ = dotenvy::dotenv();

    // 2. 加载并校验配置
    let config = Config::from_env();
    config.validate().context("invalid configuration")?;

    // 3. 初始化日志
    init_logger_with_file(&config.log_level, config.log_json, config.log_dir.as_deref())?;

    print_banner();
    tracing::info!(
        environment = %config.environment,
        store = %config.store_backend,
        "🍸 Mixo console starting..."
    );

    // 4. 初始化服务器状态
    let state = ServerState::initialize(&config)
        .await
        .context("failed to initialize server state")?;

    // 5. 启动 HTTP 服务器 (后台任务随服务器启停)
    let server = Server::with_state(config, state);
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
