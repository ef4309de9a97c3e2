//! [`Query`] collection related to a single [`Contract`].

use common::operations::By;

use crate::{domain::Contract, read::contract::Owned};
#[cfg(doc)]
use crate::{domain::User, Query};

use super::DatabaseQuery;

/// Queries a [`Contract`] by its ID among the ones owned by a [`User`].
pub type ById = DatabaseQuery<By<Option<Contract>, Owned>>;
