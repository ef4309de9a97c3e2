//! Postgres database client definitions.

/// Implements [`Connection`] for a client by delegating to the connection
/// returned by its `connection()` method.
///
/// [`Connection`]: super::Connection
macro_rules! delegate_connection {
    ($ty:ty) => {
        impl Connection for $ty {
            async fn query(
                &self,
                sql: &str,
                params: &[&(dyn ToSql + Sync)],
            ) -> Result<Vec<Row>, Traced<database::Error>> {
                self.connection()
                    .await
                    .map_err(tracerr::wrap!())?
                    .query(sql, params)
                    .await
                    .map_err(tracerr::wrap!())
            }

            async fn query_opt(
                &self,
                sql: &str,
                params: &[&(dyn ToSql + Sync)],
            ) -> Result<Option<Row>, Traced<database::Error>> {
                self.connection()
                    .await
                    .map_err(tracerr::wrap!())?
                    .query_opt(sql, params)
                    .await
                    .map_err(tracerr::wrap!())
            }

            async fn exec(
                &self,
                sql: &str,
                params: &[&(dyn ToSql + Sync)],
            ) -> Result<u64, Traced<database::Error>> {
                self.connection()
                    .await
                    .map_err(tracerr::wrap!())?
                    .exec(sql, params)
                    .await
                    .map_err(tracerr::wrap!())
            }
        }
    };
}
use delegate_connection;

pub mod non_tx;
pub mod tx;

pub use self::{non_tx::NonTx, tx::Tx};
