pub mod email;
pub mod reset_otp;
pub mod totp_secret;
pub mod user_name;
pub mod user_password;

pub use email::Email;
pub use reset_otp::ResetOtp;
pub use totp_secret::TotpSecret;
pub use user_name::UserName;
pub use user_password::UserPassword;
