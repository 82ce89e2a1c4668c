pub mod message;
pub mod team;
