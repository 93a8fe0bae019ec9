pub mod auth_service;
pub mod seed_service;
pub mod segment_service;
pub mod setting_service;
pub mod spin_service;
pub mod ticket_service;

pub use auth_service::AuthService;
pub use seed_service::SeedService;
pub use segment_service::SegmentService;
pub use setting_service::SettingService;
pub use spin_service::SpinService;
pub use ticket_service::TicketService;
