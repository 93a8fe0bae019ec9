pub mod auth;
pub mod health;
pub mod setting;
pub mod spin;
pub mod ticket;
pub mod wheel;

pub use auth::auth_config;
pub use health::health_config;
pub use setting::setting_config;
pub use spin::spin_config;
pub use ticket::ticket_config;
pub use wheel::wheel_config;

use crate::config::Config;
use crate::database::SharedStore;
use crate::error::AppError;
use crate::services::*;
use crate::utils::JwtService;
use actix_web::web;

/// 请求体上限
const JSON_LIMIT: usize = 64 * 1024;

/// 各 handler 依赖的共享状态，每个 worker 克隆一份注册为 app_data
#[derive(Clone)]
pub struct AppState {
    pub store: SharedStore,
    pub jwt_service: JwtService,
    pub server: crate::config::ServerConfig,
    pub segment_service: SegmentService,
    pub ticket_service: TicketService,
    pub spin_service: SpinService,
    pub setting_service: SettingService,
    pub auth_service: AuthService,
}

impl AppState {
    pub fn new(store: SharedStore, config: &Config) -> Self {
        let jwt_service = JwtService::new(&config.auth.jwt_secret, config.auth.session_expires_in);
        Self {
            segment_service: SegmentService::new(store.clone()),
            ticket_service: TicketService::new(store.clone()),
            spin_service: SpinService::new(store.clone()),
            setting_service: SettingService::new(store.clone()),
            auth_service: AuthService::new(
                store.clone(),
                jwt_service.clone(),
                config.auth.cookie_secure,
            ),
            server: config.server.clone(),
            jwt_service,
            store,
        }
    }

    /// 注册共享状态与请求解析配置
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(web::Data::new(self.store.clone()))
            .app_data(web::Data::new(self.server.clone()))
            .app_data(web::Data::new(self.segment_service.clone()))
            .app_data(web::Data::new(self.ticket_service.clone()))
            .app_data(web::Data::new(self.spin_service.clone()))
            .app_data(web::Data::new(self.setting_service.clone()))
            .app_data(web::Data::new(self.auth_service.clone()))
            .app_data(json_config())
            .app_data(path_config());
    }
}

/// 请求体解析失败统一返回 400
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(JSON_LIMIT)
        .error_handler(|err, _req| {
            AppError::ValidationError(format!("Invalid request body: {err}")).into()
        })
}

fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err, _req| {
        AppError::ValidationError(format!("Invalid path parameter: {err}")).into()
    })
}

/// /api 下的全部路由
pub fn api_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .configure(auth_config)
            .configure(health_config)
            .configure(wheel_config)
            .configure(ticket_config)
            .configure(spin_config)
            .configure(setting_config),
    );
}
