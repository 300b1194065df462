pub mod otp;
pub mod password;
pub mod password_reset;
pub mod register;
pub mod session;
pub mod social;
pub mod token;
