pub mod auth;
pub mod help_types;
pub mod requests;
pub mod sessions;
pub mod users;

pub use self::users::model::User;
