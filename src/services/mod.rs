pub mod bus;
pub mod codec;
pub mod node;
pub mod session;
