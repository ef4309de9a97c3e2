//! [`Query`] collection related to the multiple [`Contract`]s.

use common::operations::By;

use crate::domain::{user, Contract};
#[cfg(doc)]
use crate::{domain::User, Query};

use super::DatabaseQuery;

/// Queries all the [`Contract`]s owned by a [`User`], newest first.
pub type List = DatabaseQuery<By<Vec<Contract>, user::Id>>;
