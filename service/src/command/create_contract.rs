//! [`Command`] for creating a new [`Contract`].

use common::operations::{Commit, Insert, Transact, Transacted};
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::{contract::Status, User};
use crate::{
    document::{form::Draft, Form, ValidationErrors},
    domain::{contract, user, Contract},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for creating a new [`Contract`].
#[derive(Clone, Debug)]
pub struct CreateContract {
    /// ID of the [`User`] owning the new [`Contract`].
    pub owner_id: user::Id,

    /// Raw editor snapshot of the new [`Contract`].
    ///
    /// [`Status::Pending`] is used unless it contains an explicit status.
    pub content: contract::Content,
}

impl<Db> Command<CreateContract> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<Insert<Contract>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Contract;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: CreateContract) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateContract { owner_id, content } = cmd;

        let Draft { details, status } = Form::from_content(&content)
            .and_then(|form| form.validate())
            .map_err(tracerr::from_and_wrap!(=> E))?;
        let contract = Contract::new(owner_id, details, status, content);

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
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

/// Error of [`CreateContract`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// Provided contents of the [`Contract`] are invalid.
    #[display("{_0}")]
    Invalid(ValidationErrors),
}
