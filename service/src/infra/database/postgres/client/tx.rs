//! [`Tx`] client definitions.

use std::sync::Arc;

use tokio::sync::{MappedMutexGuard, Mutex, MutexGuard};
use tokio_postgres::{types::ToSql, Row};
use tracerr::Traced;

use crate::infra::database::{
    self,
    postgres::{connection, Connection},
};

use super::{delegate_connection, NonTx};

/// Transactional Postgres database client.
///
/// The transaction begins lazily on the first statement, and rolls back if
/// the client is dropped without being committed.
#[derive(Clone, Debug)]
pub struct Tx {
    /// [`NonTx`] client to take the transaction connection from.
    non_tx: NonTx,

    /// Running [`connection::Tx`], if any.
    tx: Arc<Mutex<Option<connection::Tx>>>,
}

impl Tx {
    /// Creates a new [`Tx`] client from the provided [`NonTx`] client.
    #[must_use]
    pub fn from_non_tx(client: NonTx) -> Self {
        Self {
            non_tx: client,
            tx: Arc::default(),
        }
    }

    /// Returns the running [`connection::Tx`], beginning it if required.
    async fn connection(
        &self,
    ) -> Result<MappedMutexGuard<'_, connection::Tx>, Traced<database::Error>>
    {
        let mut slot = self.tx.lock().await;
        let tx = match slot.take() {
            Some(tx) => tx,
            None => {
                let conn =
                    self.non_tx.connection().await.map_err(tracerr::wrap!())?;
                connection::Tx::begin(conn)
                    .await
                    .map_err(tracerr::wrap!())?
            }
        };
        Ok(MutexGuard::map(slot, |slot| slot.insert(tx)))
    }

    /// Commits the transaction of this [`Tx`] client.
    ///
    /// Committing a client without any statements executed is a no-op.
    ///
    /// # Errors
    ///
    /// If failed to commit the transaction.
    pub async fn commit(&self) -> Result<(), Traced<database::Error>> {
        let tx = self.tx.lock().await.take();
        match tx {
            Some(tx) => tx.commit().await.map_err(tracerr::wrap!()),
            None => Ok(()),
        }
    }
}

delegate_connection!(Tx);
