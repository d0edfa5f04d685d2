//! Business logic services.

pub mod auth;
pub mod guard;
pub mod provisioning;

pub use auth::{AuthError, AuthService};
pub use guard::{AuthorizationGuard, GuardError};
pub use provisioning::{ProvisioningReport, ProvisioningWorkflow, StoreDefaults};
