//! [`Command`] for updating an existing [`Contract`].

use common::operations::{By, Commit, Insert, Select, Transact, Transacted};
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::{contract::Status, User};
use crate::{
    document::{
        form::{self, Draft},
        Form, ValidationErrors,
    },
    domain::{contract, user, Contract},
    infra::{database, Database},
    read::contract::Owned,
    Service,
};

use super::Command;

/// [`Command`] for updating an existing [`Contract`] with a patch of its
/// editor snapshot.
#[derive(Clone, Debug)]
pub struct UpdateContract {
    /// ID of the [`Contract`] to be updated.
    pub contract_id: contract::Id,

    /// ID of the [`User`] owning the [`Contract`].
    pub owner_id: user::Id,

    /// Top-level keys replacing the ones of the stored snapshot.
    ///
    /// The current [`Status`] is kept unless the patched snapshot contains
    /// an explicit one.
    pub patch: contract::Content,
}

impl<Db> Command<UpdateContract> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Contract>, Owned>>,
            Ok = Option<Contract>,
            Err = Traced<database::Error>,
        > + Database<Insert<Contract>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Contract;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: UpdateContract) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdateContract {
            contract_id,
            owner_id,
            patch,
        } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let mut contract = tx
            .execute(Select(By::new(Owned {
                id: contract_id,
                owner_id,
            })))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ContractNotExists(contract_id))
            .map_err(tracerr::wrap!())?;

        let mut content = contract.content.clone();
        form::merge(&mut content, patch);
        let Draft { details, status } = Form::from_content(&content)
            .and_then(|form| form.validate())
            .map_err(tracerr::from_and_wrap!(=> E))?;
        contract.revise(details, status, content);

        tx.execute(Insert(contract.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(contract)
    }
}

/// Error of [`UpdateContract`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`Contract`] with the provided ID does not exist.
    #[display("`Contract(id: {_0})` does not exist")]
    #[from(ignore)]
    ContractNotExists(#[error(not(source))] contract::Id),

    /// Patched contents of the [`Contract`] are invalid.
    #[display("{_0}")]
    Invalid(ValidationErrors),
}
