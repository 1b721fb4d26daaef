// ==========================================
// 染整批次登记系统 - HTTP 服务主入口
// ==========================================
// 环境变量: 见 config::server_config
// ==========================================

use std::sync::Arc;

use anyhow::Context;
use dyeing_tracker::app::{router, AppState};
use dyeing_tracker::config::ServerConfig;
use dyeing_tracker::logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::from_env().context("读取进程配置失败")?;

    // 初始化日志系统
    logging::init(config.log_format);

    tracing::info!("==================================================");
    tracing::info!("{}", dyeing_tracker::APP_NAME);
    tracing::info!("系统版本: {}", dyeing_tracker::VERSION);
    tracing::info!("==================================================");
    tracing::info!("使用数据库: {}", config.db_path);

    // 迁移在 AppState 构造中完成，属于阻塞操作
    let db_path = config.db_path.clone();
    let state = tokio::task::spawn_blocking(move || AppState::new(db_path))
        .await
        .context("AppState 初始化任务异常退出")?
        .map_err(anyhow::Error::msg)
        .context("无法初始化AppState")?;

    let app = router(Arc::new(state));

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("无法监听 {}", config.bind_addr))?;
    tracing::info!("HTTP 服务已启动: http://{}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP 服务异常退出")?;

    tracing::info!("HTTP 服务已退出");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("无法监听退出信号: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("收到退出信号，正在停止...");
}
