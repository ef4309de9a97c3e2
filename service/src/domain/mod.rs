//! Domain definitions.

pub mod contract;
pub mod user;

pub use self::{contract::Contract, user::User};
