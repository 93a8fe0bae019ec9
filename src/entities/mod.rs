pub mod settings;
pub mod tickets;
pub mod users;
pub mod wheel_segments;

pub use settings as setting_entity;
pub use tickets as ticket_entity;
pub use users as user_entity;
pub use wheel_segments as wheel_segment_entity;
