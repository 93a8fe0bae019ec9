pub mod common;
pub mod setting;
pub mod spin;
pub mod ticket;
pub mod user;
pub mod wheel_segment;

pub use common::*;
pub use setting::*;
pub use spin::*;
pub use ticket::*;
pub use user::*;
pub use wheel_segment::*;
