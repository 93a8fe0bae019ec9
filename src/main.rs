use actix_web::{App, HttpServer, middleware::Logger};
use anyhow::Context;
use chrono::Local; // timestamp in log lines
use env_logger::{Env, Target};
use std::io::Write; // for env_logger custom formatter

use prize_wheel_backend::{
    config::Config,
    database::build_store,
    handlers::{self, AppState},
    middlewares::{AuthMiddleware, create_cors},
    services::SeedService,
    swagger::swagger_config,
};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let ts = Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z");
            let level = record.level().as_str().to_ascii_lowercase();
            let msg_json = serde_json::to_string(&format!("{}", record.args()))
                .unwrap_or_else(|_| "\"<invalid utf8>\"".to_string());
            writeln!(
                buf,
                "{{\"timestamp\":\"{}\",\"level\":\"{}\",\"message\":{},\"target\":\"{}\"}}",
                ts,
                level,
                msg_json,
                record.target(),
            )
        })
        .target(Target::Stdout)
        .init();

    // 加载配置
    let config =
        Config::from_toml().map_err(|e| anyhow::anyhow!("Failed to load configuration: {e}"))?;

    // 创建存储（数据库后端会执行迁移）
    let store = build_store(&config.database)
        .await
        .context("Failed to initialize storage")?;

    // 默认扇区与站点设置
    if config.seed.defaults {
        SeedService::new(store.clone())
            .seed_defaults()
            .await
            .context("Failed to seed default data")?;
    }

    let state = AppState::new(store, &config);

    // 管理员账号
    match config.admin.password.as_deref() {
        Some(password) => {
            state
                .auth_service
                .ensure_admin(&config.admin.username, password)
                .await
                .context("Failed to create admin user")?;
        }
        None => log::warn!("admin.password is not set, no admin user will be created"),
    }

    // 启动HTTP服务器
    log::info!(
        "Starting HTTP server at {}:{}",
        config.server.host,
        config.server.port
    );

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(create_cors(&state.server.allowed_origins))
            .wrap(AuthMiddleware::new(state.jwt_service.clone()))
            .configure(|cfg| state.configure(cfg))
            .configure(swagger_config)
            .configure(handlers::api_config)
    })
    .bind((config.server.host.as_str(), config.server.port))?
    .run()
    .await?;

    Ok(())
}
