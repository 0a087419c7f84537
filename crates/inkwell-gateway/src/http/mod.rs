mod ack;
pub mod interactions;
