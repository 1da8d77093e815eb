pub mod search;
pub mod session;
