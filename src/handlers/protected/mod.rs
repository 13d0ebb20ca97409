// Endpoints behind the bearer-token middleware. Every handler here takes
// the resolved account via `Extension<CurrentUser>`.
pub mod groups;
pub mod members;
pub mod messages;
pub mod users;
