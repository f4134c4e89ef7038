//! Integration tests for the Cotador portal.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p cotador-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `registration_flow` - Sign-up and sign-in scenarios over the in-memory
//!   gateway
//! - `admin_approval` - Status transitions driving the directory projection
//! - `platform_gateway` - The HTTP gateway client against a mock platform
//!
//! All tests are self-contained: the in-memory gateway stands in for the
//! platform, and the HTTP client tests run against a local mock server.

use std::sync::Arc;

use cotador_core::Cpf;
use cotador_portal::gateway::MemoryGateway;
use cotador_portal::services::{AccountService, Registration};

/// Digits of the reserved bootstrap administrator CPF used in tests.
pub const BOOTSTRAP_CPF: &str = "236616";

/// Synthetic login email domain used in tests.
pub const LOGIN_DOMAIN: &str = "temmaissaude.com";

/// An account service over a fresh in-memory gateway.
#[must_use]
pub fn memory_service() -> (Arc<MemoryGateway>, AccountService) {
    let gateway = Arc::new(MemoryGateway::new());
    let service = AccountService::new(gateway.clone(), BOOTSTRAP_CPF, LOGIN_DOMAIN);
    (gateway, service)
}

/// A complete registration form for the given CPF.
#[must_use]
pub fn registration_for(cpf: &str) -> Registration {
    Registration {
        name: "Maria Souza".to_owned(),
        email: "maria@example.com".to_owned(),
        phone: "(11) 98765-4321".to_owned(),
        cpf: Cpf::mask(cpf),
        password: "123456".to_owned(),
    }
}
