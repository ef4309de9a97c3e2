//! [`Contract`]-related [`Database`] implementations.

use common::operations::{By, Delete, Insert, Select};
use postgres_types::Json;
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{
        contract::{payment::Terms, Details},
        user, Contract,
    },
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
    read::contract::Owned,
};

/// Columns of a full [`Contract`] row.
macro_rules! columns {
    () => {
        "id, owner_id, \
         title, kind, \
         contracting_party, contracted_party, \
         objective, scope, place_of_execution, \
         start_date, deadline, \
         total_value, down_payment, down_payment_date, \
         payment_method, installments, first_due_date, due_day, \
         late_penalty, monthly_interest, \
         status, clauses, content, \
         created_at, updated_at"
    };
}

/// Reads a [`Contract`] out of a row with all the [`columns!`].
fn from_row(row: &Row) -> Contract {
    Contract {
        id: row.get("id"),
        owner_id: row.get("owner_id"),
        details: Details {
            title: row.get("title"),
            kind: row.get("kind"),
            contracting_party: row.get("contracting_party"),
            contracted_party: row.get("contracted_party"),
            objective: row.get("objective"),
            scope: row.get("scope"),
            place_of_execution: row.get("place_of_execution"),
            start_date: row.get("start_date"),
            deadline: row.get("deadline"),
            payment: Terms {
                total_value: row.get("total_value"),
                down_payment: row.get("down_payment"),
                down_payment_date: row.get("down_payment_date"),
                method: row.get("payment_method"),
                installments: row.get("installments"),
                first_due_date: row.get("first_due_date"),
                due_day: row.get("due_day"),
                late_penalty: row.get("late_penalty"),
                monthly_interest: row.get("monthly_interest"),
            },
            clauses: row.get::<_, Json<_>>("clauses").0,
        },
        status: row.get("status"),
        content: row.get::<_, Json<_>>("content").0,
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

impl<C> Database<Select<By<Option<Contract>, Owned>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Contract>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Contract>, Owned>>,
    ) -> Result<Self::Ok, Self::Err> {
        let Owned { id, owner_id } = by.into_inner();

        const SQL: &str = concat!(
            "SELECT ",
            columns!(),
            " FROM contracts \
              WHERE id = $1::UUID AND owner_id = $2::UUID",
        );
        Ok(self
            .query_opt(SQL, &[&id, &owner_id])
            .await
            .map_err(tracerr::wrap!())?
            .as_ref()
            .map(from_row))
    }
}

impl<C> Database<Select<By<Vec<Contract>, user::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Contract>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Contract>, user::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let owner_id = by.into_inner();

        const SQL: &str = concat!(
            "SELECT ",
            columns!(),
            " FROM contracts \
              WHERE owner_id = $1::UUID \
              ORDER BY created_at DESC, id DESC",
        );
        Ok(self
            .query(SQL, &[&owner_id])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(from_row)
            .collect())
    }
}

impl<C> Database<Insert<Contract>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(contract): Insert<Contract>,
    ) -> Result<Self::Ok, Self::Err> {
        let Contract {
            id,
            owner_id,
            details,
            status,
            content,
            created_at,
            updated_at,
        } = contract;
        let Details {
            title,
            kind,
            contracting_party,
            contracted_party,
            objective,
            scope,
            place_of_execution,
            start_date,
            deadline,
            payment,
            clauses,
        } = details;

        const SQL: &str = concat!(
            "INSERT INTO contracts (",
            columns!(),
            ") \
             VALUES (\
                 $1::UUID, $2::UUID, \
                 $3::VARCHAR, $4::INT2, \
                 $5::VARCHAR, $6::VARCHAR, \
                 $7::TEXT, $8::TEXT, $9::VARCHAR, \
                 $10::DATE, $11::DATE, \
                 $12::NUMERIC, $13::NUMERIC, $14::DATE, \
                 $15::INT2, $16::INT4, $17::DATE, $18::INT2, \
                 $19::NUMERIC, $20::NUMERIC, \
                 $21::INT2, $22::JSONB, $23::JSONB, \
                 $24::TIMESTAMPTZ, $25::TIMESTAMPTZ\
             ) \
             ON CONFLICT (id) DO UPDATE \
             SET title = EXCLUDED.title, \
                 kind = EXCLUDED.kind, \
                 contracting_party = EXCLUDED.contracting_party, \
                 contracted_party = EXCLUDED.contracted_party, \
                 objective = EXCLUDED.objective, \
                 scope = EXCLUDED.scope, \
                 place_of_execution = EXCLUDED.place_of_execution, \
                 start_date = EXCLUDED.start_date, \
                 deadline = EXCLUDED.deadline, \
                 total_value = EXCLUDED.total_value, \
                 down_payment = EXCLUDED.down_payment, \
                 down_payment_date = EXCLUDED.down_payment_date, \
                 payment_method = EXCLUDED.payment_method, \
                 installments = EXCLUDED.installments, \
                 first_due_date = EXCLUDED.first_due_date, \
                 due_day = EXCLUDED.due_day, \
                 late_penalty = EXCLUDED.late_penalty, \
                 monthly_interest = EXCLUDED.monthly_interest, \
                 status = EXCLUDED.status, \
                 clauses = EXCLUDED.clauses, \
                 content = EXCLUDED.content, \
                 updated_at = EXCLUDED.updated_at",
        );
        self.exec(
            SQL,
            &[
                &id,
                &owner_id,
                &title,
                &kind,
                &contracting_party,
                &contracted_party,
                &objective,
                &scope,
                &place_of_execution,
                &start_date,
                &deadline,
                &payment.total_value,
                &payment.down_payment,
                &payment.down_payment_date,
                &payment.method,
                &payment.installments,
                &payment.first_due_date,
                &payment.due_day,
                &payment.late_penalty,
                &payment.monthly_interest,
                &status,
                &Json(&clauses),
                &Json(&content),
                &created_at,
                &updated_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Delete<By<Contract, Owned>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = bool;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Contract, Owned>>,
    ) -> Result<Self::Ok, Self::Err> {
        let Owned { id, owner_id } = by.into_inner();

        const SQL: &str = "\
            DELETE FROM contracts \
            WHERE id = $1::UUID AND owner_id = $2::UUID";
        self.exec(SQL, &[&id, &owner_id])
            .await
            .map_err(tracerr::wrap!())
            .map(|deleted| deleted > 0)
    }
}
