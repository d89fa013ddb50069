pub mod action;
pub mod session;
