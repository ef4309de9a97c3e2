//! [`Contract`]-related REST API definitions.

use axum::{
    extract::{rejection::JsonRejection, Path},
    Extension, Json,
};
use common::{Date, DateTime, Money, Percent};
use serde::Serialize;
use service::{
    command::{self, Command as _},
    document::{self, derive, Document, Form},
    domain::{self, contract, user},
    query,
    read::contract::Owned,
    Query as _,
};

use crate::{define_error, AsError, Error, Service, Session};

/// A [`domain::Contract`] as returned to its owner.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Contract {
    /// Unique identifier of this [`Contract`].
    pub id: contract::Id,

    /// ID of the user owning this [`Contract`].
    pub owner_id: user::Id,

    /// Title of this [`Contract`].
    pub title: String,

    /// Kind of this [`Contract`].
    pub kind: contract::Kind,

    /// Name of the contracting party.
    pub contracting_party: String,

    /// Name of the contracted party.
    pub contracted_party: String,

    /// Objective of this [`Contract`].
    pub objective: String,

    /// Detailed scope of this [`Contract`].
    pub scope: String,

    /// Place where the services are carried out.
    pub place_of_execution: String,

    /// [`Date`] when this [`Contract`] starts.
    pub start_date: Date,

    /// Final deadline of this [`Contract`].
    pub deadline: Date,

    /// Total value of this [`Contract`].
    pub total_value: Money,

    /// Amount paid upfront, if any.
    pub down_payment: Option<Money>,

    /// [`Date`] when the down payment is paid.
    pub down_payment_date: Option<Date>,

    /// Method of the payments.
    pub payment_method: contract::payment::Method,

    /// Number of installments.
    pub installments: u32,

    /// [`Date`] when the first installment is due.
    pub first_due_date: Option<Date>,

    /// Day of month every installment is due.
    pub due_day: u8,

    /// Penalty charged on a late installment.
    pub late_penalty: Percent,

    /// Interest charged monthly on a late installment.
    pub monthly_interest: Percent,

    /// Status of this [`Contract`].
    pub status: contract::Status,

    /// Specific clauses of this [`Contract`].
    pub clauses: contract::Clauses,

    /// Raw editor snapshot of this [`Contract`].
    pub content: contract::Content,

    /// [`DateTime`] when this [`Contract`] was created.
    pub created_at: DateTime,

    /// [`DateTime`] when this [`Contract`] was modified the last time.
    pub updated_at: DateTime,
}

impl From<domain::Contract> for Contract {
    fn from(contract: domain::Contract) -> Self {
        let domain::Contract {
            id,
            owner_id,
            details,
            status,
            content,
            created_at,
            updated_at,
        } = contract;
        let contract::Details {
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
        let contract::Terms {
            total_value,
            down_payment,
            down_payment_date,
            method,
            installments,
            first_due_date,
            due_day,
            late_penalty,
            monthly_interest,
        } = payment;

        Self {
            id,
            owner_id,
            title: title.to_string(),
            kind,
            contracting_party: contracting_party.to_string(),
            contracted_party: contracted_party.to_string(),
            objective,
            scope,
            place_of_execution,
            start_date,
            deadline,
            total_value,
            down_payment,
            down_payment_date,
            payment_method: method,
            installments: installments.get(),
            first_due_date,
            due_day: due_day.get(),
            late_penalty,
            monthly_interest,
            status,
            clauses,
            content,
            created_at: created_at.coerce(),
            updated_at: updated_at.coerce(),
        }
    }
}

/// Rendering of a not yet saved [`Form`].
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Preview {
    /// Rendered [`Document`].
    pub document: Document,

    /// Masked amount of a single installment, if the total value is
    /// positive.
    pub installment_amount: Option<String>,
}

/// Lists the [`Contract`]s of the current user, newest first.
///
/// # Errors
///
/// If the [`Service`] fails to query the [`Contract`]s.
#[tracing::instrument(skip_all, fields(user.id = %session.user_id))]
pub async fn list(
    Extension(service): Extension<Service>,
    session: Session,
) -> Result<Json<Vec<Contract>>, Error> {
    let contracts = service
        .execute(query::contracts::List::by(session.user_id))
        .await
        .map_err(AsError::into_error)?;

    Ok(Json(contracts.into_iter().map(Into::into).collect()))
}

/// Creates a new [`Contract`] from the provided editor snapshot.
///
/// # Errors
///
/// Possible error codes:
/// - `INVALID_CONTRACT` - the snapshot doesn't pass validation;
/// - `BAD_REQUEST` - the body is not a JSON object.
#[tracing::instrument(skip_all, fields(user.id = %session.user_id))]
pub async fn create(
    Extension(service): Extension<Service>,
    session: Session,
    body: Result<Json<contract::Content>, JsonRejection>,
) -> Result<(http::StatusCode, Json<Contract>), Error> {
    let Json(content) = body.map_err(AsError::into_error)?;

    let contract = service
        .execute(command::CreateContract {
            owner_id: session.user_id,
            content,
        })
        .await
        .map_err(AsError::into_error)?;

    tracing::info!(contract.id = %contract.id, "contract created");

    Ok((http::StatusCode::CREATED, Json(contract.into())))
}

/// Returns a single [`Contract`] of the current user.
///
/// # Errors
///
/// Possible error codes:
/// - `CONTRACT_NOT_EXISTS` - no such [`Contract`] is owned by the user.
#[tracing::instrument(skip_all, fields(contract.id = %id, user.id = %session.user_id))]
pub async fn get(
    Extension(service): Extension<Service>,
    session: Session,
    Path(id): Path<String>,
) -> Result<Json<Contract>, Error> {
    fetch(&service, &session, &id).await.map(|c| Json(c.into()))
}

/// Patches a [`Contract`] of the current user with the provided top-level
/// snapshot keys.
///
/// # Errors
///
/// Possible error codes:
/// - `CONTRACT_NOT_EXISTS` - no such [`Contract`] is owned by the user;
/// - `INVALID_CONTRACT` - the patched snapshot doesn't pass validation;
/// - `BAD_REQUEST` - the body is not a JSON object.
#[tracing::instrument(skip_all, fields(contract.id = %id, user.id = %session.user_id))]
pub async fn update(
    Extension(service): Extension<Service>,
    session: Session,
    Path(id): Path<String>,
    body: Result<Json<contract::Content>, JsonRejection>,
) -> Result<Json<Contract>, Error> {
    let contract_id = parse_id(&id)?;
    let Json(patch) = body.map_err(AsError::into_error)?;

    service
        .execute(command::UpdateContract {
            contract_id,
            owner_id: session.user_id,
            patch,
        })
        .await
        .map(|c| Json(c.into()))
        .map_err(AsError::into_error)
}

/// Deletes a [`Contract`] of the current user.
///
/// # Errors
///
/// Possible error codes:
/// - `CONTRACT_NOT_EXISTS` - no such [`Contract`] is owned by the user.
#[tracing::instrument(skip_all, fields(contract.id = %id, user.id = %session.user_id))]
pub async fn delete(
    Extension(service): Extension<Service>,
    session: Session,
    Path(id): Path<String>,
) -> Result<http::StatusCode, Error> {
    let contract_id = parse_id(&id)?;

    service
        .execute(command::DeleteContract {
            contract_id,
            owner_id: session.user_id,
        })
        .await
        .map_err(AsError::into_error)?;

    tracing::info!("contract deleted");

    Ok(http::StatusCode::NO_CONTENT)
}

/// Renders a [`Contract`] of the current user into a [`Document`].
///
/// # Errors
///
/// Possible error codes:
/// - `CONTRACT_NOT_EXISTS` - no such [`Contract`] is owned by the user.
#[tracing::instrument(skip_all, fields(contract.id = %id, user.id = %session.user_id))]
pub async fn document(
    Extension(service): Extension<Service>,
    session: Session,
    Path(id): Path<String>,
) -> Result<Json<Document>, Error> {
    let contract = fetch(&service, &session, &id).await?;
    Ok(Json(document::render(&Form::from(&contract))))
}

/// Renders a [`Contract`] of the current user into a print-ready plain
/// text.
///
/// # Errors
///
/// Possible error codes:
/// - `CONTRACT_NOT_EXISTS` - no such [`Contract`] is owned by the user.
#[tracing::instrument(skip_all, fields(contract.id = %id, user.id = %session.user_id))]
pub async fn print(
    Extension(service): Extension<Service>,
    session: Session,
    Path(id): Path<String>,
) -> Result<String, Error> {
    let contract = fetch(&service, &session, &id).await?;
    Ok(document::render(&Form::from(&contract)).to_string())
}

/// Renders a not yet saved editor snapshot.
///
/// # Errors
///
/// Possible error codes:
/// - `INVALID_CONTRACT` - some snapshot value has a wrong JSON type;
/// - `BAD_REQUEST` - the body is not a JSON object.
#[tracing::instrument(skip_all, fields(user.id = %session.user_id))]
pub async fn preview(
    session: Session,
    body: Result<Json<contract::Content>, JsonRejection>,
) -> Result<Json<Preview>, Error> {
    let Json(content) = body.map_err(AsError::into_error)?;
    let form = Form::from_content(&content).map_err(AsError::into_error)?;

    Ok(Json(Preview {
        installment_amount: derive::installment_amount(&form),
        document: document::render(&form),
    }))
}

/// Fetches the [`domain::Contract`] identified by the raw `id` among the
/// ones of the [`Session`] user.
async fn fetch(
    service: &Service,
    session: &Session,
    id: &str,
) -> Result<domain::Contract, Error> {
    let id = parse_id(id)?;
    service
        .execute(query::contract::ById::by(Owned {
            id,
            owner_id: session.user_id,
        }))
        .await
        .map_err(AsError::into_error)?
        .ok_or_else(|| ContractError::NotExists.into())
}

/// Parses the raw path `id` of a [`Contract`].
///
/// A malformed `id` can't identify any [`Contract`], so it's reported as a
/// missing one.
fn parse_id(id: &str) -> Result<contract::Id, Error> {
    id.parse().map_err(|_| ContractError::NotExists.into())
}

impl AsError for command::create_contract::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::Invalid(e) => e.try_as_error(),
        }
    }
}

impl AsError for command::update_contract::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::ContractNotExists(_) => Some(ContractError::NotExists.into()),
            Self::Invalid(e) => e.try_as_error(),
        }
    }
}

impl AsError for command::delete_contract::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::ContractNotExists(_) => Some(ContractError::NotExists.into()),
        }
    }
}

define_error! {
    enum ContractError {
        #[code = "CONTRACT_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Contract` with the provided ID does not exist"]
        NotExists,
    }
}
