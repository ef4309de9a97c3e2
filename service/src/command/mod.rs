//! [`Command`] definition.

pub mod authorize_user_session;
pub mod create_contract;
pub mod create_user;
pub mod create_user_session;
pub mod delete_contract;
pub mod update_contract;

/// [`Command`] of the [`Service`].
///
/// [`Service`]: crate::Service
pub use common::Handler as Command;

pub use self::{
    authorize_user_session::AuthorizeUserSession,
    create_contract::CreateContract, create_user::CreateUser,
    create_user_session::CreateUserSession, delete_contract::DeleteContract,
    update_contract::UpdateContract,
};
