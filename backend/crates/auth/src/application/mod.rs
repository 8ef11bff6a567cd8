pub mod complete_reset;
pub mod config;
pub mod login;
pub mod register;
pub mod request_reset;
pub mod token;
pub mod verify_otp;
pub mod verify_reset;

pub use complete_reset::CompleteResetUseCase;
pub use config::AuthConfig;
pub use login::{LoginOutcome, LoginUseCase};
pub use register::RegisterUseCase;
pub use request_reset::RequestResetUseCase;
pub use token::TokenIssuer;
pub use verify_otp::VerifyOtpUseCase;
pub use verify_reset::VerifyResetUseCase;
