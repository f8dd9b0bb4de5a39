pub mod argument;
pub mod cache;
pub mod feed;
pub mod guard;
pub mod guild;
pub mod permission;
pub mod ports;
pub mod rank;
pub mod site;
pub mod user;
pub mod webhook;
