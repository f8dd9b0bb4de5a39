pub mod argument;
pub mod discord;
pub mod permission;
pub mod rank;
