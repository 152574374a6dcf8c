//! Domain entities - the objects mirrored from the server

mod channel;
mod guild;
mod message;
mod role;
mod user;
mod voice_region;

pub use channel::{Channel, ChannelKind};
pub use guild::Guild;
pub use message::Message;
pub use role::Role;
pub use user::User;
pub use voice_region::VoiceRegion;
