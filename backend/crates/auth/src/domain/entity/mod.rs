pub mod reset_token;
pub mod user;

pub use reset_token::ResetToken;
pub use user::User;
