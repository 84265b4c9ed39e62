pub mod attendance;
pub mod holiday;
pub mod leave;
pub mod user;
