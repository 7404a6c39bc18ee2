use pos_server::{Config, Server, ServerState, init_logger_with_file, print_banner};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. 环境变量 (.env 可选) + 配置
    dotenv::dotenv().ok();
    let config = Config::from_env();

    // 2. 日志 (设置了 LOG_DIR 则按天滚动写文件)
    init_logger_with_file(None, config.log_dir.as_deref());

    print_banner();

    tracing::info!("POS Server starting...");

    // 3. 初始化服务器状态 (数据库 + schema)
    let state = ServerState::initialize(&config).await?;

    // 4. 启动 HTTP 服务器
    let server = Server::with_state(config, state);

    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
