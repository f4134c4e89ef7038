//! Application services for the portal.

pub mod account;

pub use account::{AccountError, AccountService, Registration, RegistrationOutcome, SignedIn};
