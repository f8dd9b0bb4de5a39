pub mod failsafe;
pub mod kill;
pub mod rank;
pub mod say;
pub mod status;
