pub mod database;
pub mod discord;
pub mod lifecycle;
pub mod presence;
pub mod reddit;
pub mod repository;
