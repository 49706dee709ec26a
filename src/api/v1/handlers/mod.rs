pub mod backend;
pub mod health;
pub mod session;
pub mod ws;
