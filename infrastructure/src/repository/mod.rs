pub mod guild;
pub mod user;
pub mod webhook;
