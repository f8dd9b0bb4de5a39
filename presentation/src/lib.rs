pub mod application_ports;
pub mod discord;
pub mod worker;
