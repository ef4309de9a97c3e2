//! [`Contract`] read model definition.

use crate::domain::{contract, user};
#[cfg(doc)]
use crate::domain::{Contract, User};

/// Selector of a [`Contract`] by its ID, visible to its owner only.
///
/// A [`Contract`] of another [`User`] is never matched, so it's
/// indistinguishable from a missing one.
#[derive(Clone, Copy, Debug)]
pub struct Owned {
    /// ID of the [`Contract`].
    pub id: contract::Id,

    /// ID of the [`User`] owning the [`Contract`].
    pub owner_id: user::Id,
}
