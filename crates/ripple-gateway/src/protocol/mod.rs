//! Gateway wire protocol
//!
//! Op codes, the frame envelope, and connection-level payloads shared
//! between the client and the transport.

pub mod frame;
pub mod opcodes;
pub mod payloads;

pub use frame::GatewayFrame;
pub use opcodes::OpCode;
pub use payloads::HelloPayload;
