//! In-memory [`Database`] implementation.

use std::{collections::HashMap, sync::Arc};

use common::operations::{By, Commit, Delete, Insert, Select, Transact};
use tokio::sync::RwLock;
use tracerr::Traced;

use crate::{
    domain::{contract, user, Contract, User},
    infra::{database, Database},
    read::contract::Owned,
};

/// In-memory [`Database`].
///
/// Writes are visible immediately, so [`Commit`] is a no-op and a dropped
/// transaction is not rolled back.
#[derive(Clone, Debug, Default)]
pub struct Memory {
    /// Stored entities.
    state: Arc<RwLock<State>>,
}

/// Entities stored in a [`Memory`] database.
#[derive(Debug, Default)]
struct State {
    /// Stored [`Contract`]s along with their insertion sequence number.
    contracts: HashMap<contract::Id, (u64, Contract)>,

    /// Next insertion sequence number for [`State::contracts`].
    next_seq: u64,

    /// Stored [`User`]s.
    users: HashMap<user::Id, User>,
}

impl Database<Transact> for Memory {
    type Ok = Self;
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Transact) -> Result<Self::Ok, Self::Err> {
        Ok(self.clone())
    }
}

impl Database<Commit> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Commit) -> Result<Self::Ok, Self::Err> {
        Ok(())
    }
}

impl Database<Select<By<Option<Contract>, Owned>>> for Memory {
    type Ok = Option<Contract>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Contract>, Owned>>,
    ) -> Result<Self::Ok, Self::Err> {
        let Owned { id, owner_id } = by.into_inner();
        Ok(self
            .state
            .read()
            .await
            .contracts
            .get(&id)
            .filter(|(_, c)| c.owner_id == owner_id)
            .map(|(_, c)| c.clone()))
    }
}

impl Database<Select<By<Vec<Contract>, user::Id>>> for Memory {
    type Ok = Vec<Contract>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Contract>, user::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let owner_id = by.into_inner();
        let state = self.state.read().await;

        let mut owned = state
            .contracts
            .values()
            .filter(|(_, c)| c.owner_id == owner_id)
            .collect::<Vec<_>>();
        // Newest first, ties resolved by insertion order.
        owned.sort_unstable_by(|(a_seq, a), (b_seq, b)| {
            b.created_at.cmp(&a.created_at).then(b_seq.cmp(a_seq))
        });
        Ok(owned.into_iter().map(|(_, c)| c.clone()).collect())
    }
}

impl Database<Insert<Contract>> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(contract): Insert<Contract>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut state = self.state.write().await;
        let seq = match state.contracts.get(&contract.id) {
            Some((seq, _)) => *seq,
            None => {
                state.next_seq += 1;
                state.next_seq
            }
        };
        drop(state.contracts.insert(contract.id, (seq, contract)));
        Ok(())
    }
}

impl Database<Delete<By<Contract, Owned>>> for Memory {
    type Ok = bool;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Contract, Owned>>,
    ) -> Result<Self::Ok, Self::Err> {
        let Owned { id, owner_id } = by.into_inner();
        let mut state = self.state.write().await;

        let owned = state
            .contracts
            .get(&id)
            .is_some_and(|(_, c)| c.owner_id == owner_id);
        if owned {
            drop(state.contracts.remove(&id));
        }
        Ok(owned)
    }
}

impl Database<Select<By<Option<User>, user::Id>>> for Memory {
    type Ok = Option<User>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<User>, user::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(self.state.read().await.users.get(by.inner()).cloned())
    }
}

impl Database<Select<By<Option<User>, &user::Email>>> for Memory {
    type Ok = Option<User>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<User>, &user::Email>>,
    ) -> Result<Self::Ok, Self::Err> {
        let email = by.into_inner();
        Ok(self
            .state
            .read()
            .await
            .users
            .values()
            .find(|u| &u.email == email)
            .cloned())
    }
}

impl Database<Insert<User>> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(user): Insert<User>,
    ) -> Result<Self::Ok, Self::Err> {
        drop(self.state.write().await.users.insert(user.id, user));
        Ok(())
    }
}
