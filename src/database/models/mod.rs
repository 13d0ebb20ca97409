pub mod group;
pub mod group_member;
pub mod message;
pub mod message_like;
pub mod user;

pub use group::Group;
pub use group_member::GroupMember;
pub use message::Message;
pub use message_like::MessageLike;
pub use user::User;
