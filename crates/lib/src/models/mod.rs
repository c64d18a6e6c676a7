//! Typed wire entities: messages, users, channels, roles, invites.
//!
//! These deserialize directly from API JSON. Outbound payload structs
//! (`CreateMessage`, `EditChannel`, ...) live next to their entities.

mod channel;
mod invite;
mod message;
mod permissions;
mod role;
mod user;

pub use channel::{Channel, ChannelKind, EditChannel, OverwriteKind, PermissionOverwrite};
pub use invite::{CreateInvite, Invite, InviteTargetKind};
pub use message::{CreateMessage, Message, MessageFlags, MessageReference};
pub use permissions::Permissions;
pub use role::{to_image_data, EditRole, Role, RoleTags};
pub use user::User;
