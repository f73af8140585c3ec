//! Domain value objects and types.
//!
//! Type-safe wrappers for customer ids, email addresses and phone numbers,
//! plus the identity-field vocabulary shared by the duplication checker and
//! the stores.

pub mod customer_id;
pub mod email;
pub mod errors;
pub mod identity;
pub mod phone;

pub use customer_id::CustomerId;
pub use email::EmailAddress;
pub use errors::ValidationError;
pub use identity::{Exclusion, IdentityField};
pub use phone::PhoneNumber;
