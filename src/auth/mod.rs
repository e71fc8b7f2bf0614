//! Authentication
//!
//! Drives the client side of the FTP login sequence.

pub mod login;

pub use login::LoginState;
