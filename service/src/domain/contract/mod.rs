//! [`Contract`] definitions.

pub mod clause;
pub mod payment;

use common::{define_kind, unit, Date, DateTime, DateTimeOf};
use derive_more::{AsRef, Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::user;
#[cfg(doc)]
use crate::domain::User;

pub use self::{
    clause::{Clause, Clauses},
    payment::Terms,
};

/// Legal contract owned by a single [`User`].
#[derive(Clone, Debug)]
pub struct Contract {
    /// ID of this [`Contract`].
    pub id: Id,

    /// ID of the [`User`] owning this [`Contract`].
    pub owner_id: user::Id,

    /// Validated [`Details`] of this [`Contract`].
    pub details: Details,

    /// [`Status`] of this [`Contract`].
    pub status: Status,

    /// Raw editor snapshot this [`Contract`] was created from.
    pub content: Content,

    /// [`DateTime`] when this [`Contract`] was created.
    pub created_at: CreationDateTime,

    /// [`DateTime`] when this [`Contract`] was modified the last time.
    pub updated_at: ModificationDateTime,
}

impl Contract {
    /// Creates a new [`Contract`] owned by the provided [`User`].
    ///
    /// [`Status::Pending`] is used if no `status` is provided.
    #[must_use]
    pub fn new(
        owner_id: user::Id,
        details: Details,
        status: Option<Status>,
        content: Content,
    ) -> Self {
        let now = DateTime::now();
        Self {
            id: Id::new(),
            owner_id,
            details,
            status: status.unwrap_or(Status::Pending),
            content,
            created_at: now.coerce(),
            updated_at: now.coerce(),
        }
    }

    /// Replaces the contents of this [`Contract`], keeping its identity,
    /// owner and creation time.
    ///
    /// The current [`Status`] is kept if no `status` is provided.
    pub fn revise(
        &mut self,
        details: Details,
        status: Option<Status>,
        content: Content,
    ) {
        self.details = details;
        if let Some(status) = status {
            self.status = status;
        }
        self.content = content;
        self.updated_at = DateTime::now().coerce();
    }
}

/// Validated contents of a [`Contract`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Details {
    /// [`Title`] of the [`Contract`].
    pub title: Title,

    /// [`Kind`] of the [`Contract`].
    pub kind: Kind,

    /// Name of the contracting party.
    pub contracting_party: PartyName,

    /// Name of the contracted party.
    pub contracted_party: PartyName,

    /// Objective of the [`Contract`].
    pub objective: String,

    /// Detailed scope of the [`Contract`].
    pub scope: String,

    /// Place where the services are carried out.
    pub place_of_execution: String,

    /// [`Date`] when the [`Contract`] starts.
    pub start_date: Date,

    /// Final deadline of the [`Contract`].
    pub deadline: Date,

    /// Payment [`Terms`] of the [`Contract`].
    pub payment: Terms,

    /// Specific [`Clauses`] of the [`Contract`].
    pub clauses: Clauses,
}

/// Raw editor snapshot of a [`Contract`], retained verbatim.
pub type Content = serde_json::Map<String, serde_json::Value>;

/// ID of a [`Contract`].
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    PartialEq,
    Serialize,
)]
#[cfg_attr(feature = "postgres", derive(ToSql, FromSql), postgres(transparent))]
pub struct Id(Uuid);

impl Id {
    /// Creates a new random [`Id`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

/// Title of a [`Contract`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Title(String);

impl Title {
    /// Maximum length of a [`Title`] in bytes.
    pub const MAX_LEN: usize = 512;

    /// Creates a new [`Title`] if the given `title` is valid.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Option<Self> {
        let title = title.into();
        Self::check(&title).then_some(Self(title))
    }

    /// Checks whether the given `title` is a valid [`Title`].
    fn check(title: impl AsRef<str>) -> bool {
        let title = title.as_ref();
        title.trim() == title && !title.is_empty() && title.len() <= Self::MAX_LEN
    }
}

impl FromStr for Title {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Title`")
    }
}

/// Name of a [`Contract`] party.
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct PartyName(String);

impl PartyName {
    /// Maximum length of a [`PartyName`] in bytes.
    pub const MAX_LEN: usize = 512;

    /// Creates a new [`PartyName`] if the given `name` is valid.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        Self::check(&name).then_some(Self(name))
    }

    /// Checks whether the given `name` is a valid [`PartyName`].
    fn check(name: impl AsRef<str>) -> bool {
        let name = name.as_ref();
        name.trim() == name && !name.is_empty() && name.len() <= Self::MAX_LEN
    }
}

impl FromStr for PartyName {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `PartyName`")
    }
}

define_kind! {
    #[doc = "Kind of a [`Contract`]."]
    enum Kind {
        #[doc = "Provision of services."]
        #[label = "PRESTAÇÃO DE SERVIÇOS"]
        Service = 1,

        #[doc = "Employment."]
        #[label = "TRABALHO"]
        Employment = 2,

        #[doc = "Lease."]
        #[label = "ALUGUEL"]
        Lease = 3,

        #[doc = "Any other kind."]
        #[label = "OUTRO"]
        Other = 4,
    }
}

impl Default for Kind {
    fn default() -> Self {
        Self::Service
    }
}

define_kind! {
    #[doc = "Status of a [`Contract`]."]
    enum Status {
        #[doc = "The [`Contract`] is awaiting to be started."]
        #[label = "PENDENTE"]
        Pending = 1,

        #[doc = "The [`Contract`] is in force."]
        #[label = "ATIVO"]
        Active = 2,

        #[doc = "The [`Contract`] is finished."]
        #[label = "FINALIZADO"]
        Finished = 3,
    }
}

/// [`DateTime`] when a [`Contract`] was created.
pub type CreationDateTime = DateTimeOf<(Contract, unit::Creation)>;

/// [`DateTime`] when a [`Contract`] was modified.
pub type ModificationDateTime = DateTimeOf<(Contract, unit::Modification)>;

#[cfg(test)]
mod spec {
    use super::{Kind, PartyName, Status, Title};

    #[test]
    fn kinds_use_screaming_snake_case() {
        assert_eq!(Kind::Service.to_string(), "SERVICE");
        assert_eq!("LEASE".parse::<Kind>(), Ok(Kind::Lease));
        assert!("lease".parse::<Kind>().is_err());
        assert_eq!(Kind::default(), Kind::Service);
        assert_eq!(Kind::Service.label(), "PRESTAÇÃO DE SERVIÇOS");
        assert_eq!(
            serde_json::to_value(Status::Finished).unwrap(),
            serde_json::json!("FINISHED"),
        );
    }

    #[test]
    fn titles_and_names_must_be_trimmed_non_empty_and_bounded() {
        assert!(Title::new("CONTRATO").is_some());
        assert!(Title::new("").is_none());
        assert!(Title::new(" CONTRATO").is_none());
        assert!(PartyName::new("Maria").is_some());
        assert!(PartyName::new("   ").is_none());
        assert!(Title::new("A".repeat(Title::MAX_LEN)).is_some());
        assert!(Title::new("A".repeat(Title::MAX_LEN + 1)).is_none());
        assert!(PartyName::new("B".repeat(PartyName::MAX_LEN + 1)).is_none());
    }
}
