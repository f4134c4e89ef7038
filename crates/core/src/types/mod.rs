//! Core types for the quoting portal.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod chat;
pub mod cpf;
pub mod id;
pub mod numeric_input;
pub mod phone;
pub mod plan;
pub mod quote;
pub mod status;

pub use chat::{ChatMessage, ChatRole};
pub use cpf::Cpf;
pub use id::{PlanId, UserId};
pub use plan::{Accommodation, AgeRange, Coparticipation, CopayFee, HealthPlan, QuoteCategory};
pub use quote::{CalculatedPlan, PlanSelection, QuoteLine, quote_all};
pub use status::{AccountStatus, AdminAction, StatusParseError};
