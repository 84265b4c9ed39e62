pub mod attendance;
pub mod holiday;
pub mod leave_application;
pub mod role;
pub mod user;
