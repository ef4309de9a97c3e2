//! Editor [`Form`] definitions.

use std::str::FromStr as _;

use common::{mask, Date, Money, Percent};
use derive_more::{Display, Error};
use itertools::Itertools as _;
use serde::{de::Error as _, Deserialize, Deserializer, Serialize};
use smart_default::SmartDefault;

use crate::domain::{
    contract::{
        clause,
        payment::{DueDay, Installments, Method},
        Clause, Clauses, Content, Details, Kind, PartyName, Status, Terms,
        Title,
    },
    Contract,
};

/// Contract document as the editor holds it: every value is a display
/// string.
///
/// Missing keys take the editor defaults when deserializing.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize, SmartDefault)]
#[serde(default, rename_all = "camelCase")]
pub struct Form {
    /// Title of the contract.
    #[serde(deserialize_with = "text")]
    pub title: String,

    /// [`Kind`] of the contract.
    #[default(Kind::default().to_string())]
    #[serde(deserialize_with = "text")]
    pub kind: String,

    /// Objective of the contract.
    #[serde(deserialize_with = "text")]
    pub objective: String,

    /// Detailed scope of the contract.
    #[serde(deserialize_with = "text")]
    pub scope: String,

    /// Place where the services are carried out.
    #[default("Remoto".to_owned())]
    #[serde(deserialize_with = "text")]
    pub place_of_execution: String,

    /// Name of the contracting party.
    #[serde(deserialize_with = "text")]
    pub contracting_party: String,

    /// Name of the contracted party.
    #[serde(deserialize_with = "text")]
    pub contracted_party: String,

    /// Masked total value.
    #[serde(deserialize_with = "text")]
    pub total_value: String,

    /// Masked down payment.
    #[serde(deserialize_with = "text")]
    pub down_payment: String,

    /// Down payment date.
    #[serde(deserialize_with = "text")]
    pub down_payment_date: String,

    /// Payment [`Method`].
    #[default(Method::default().to_string())]
    #[serde(deserialize_with = "text")]
    pub payment_method: String,

    /// Number of installments.
    #[default("1".to_owned())]
    #[serde(deserialize_with = "text")]
    pub installments: String,

    /// Due date of the first installment.
    #[serde(deserialize_with = "text")]
    pub first_due_date: String,

    /// Day of a month every installment is due.
    #[default("10".to_owned())]
    #[serde(deserialize_with = "text")]
    pub due_day: String,

    /// Masked late payment penalty.
    #[default("2,00%".to_owned())]
    #[serde(deserialize_with = "text")]
    pub late_penalty: String,

    /// Masked monthly interest.
    #[default("1,00%".to_owned())]
    #[serde(deserialize_with = "text")]
    pub monthly_interest: String,

    /// Start date of the contract.
    #[serde(deserialize_with = "text")]
    pub start_date: String,

    /// Final deadline of the contract.
    #[serde(deserialize_with = "text")]
    pub deadline: String,

    /// [`Status`] of the contract, if set explicitly.
    #[serde(
        deserialize_with = "optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub status: Option<String>,

    /// Specific clauses of the contract.
    #[default(vec![FormClause {
        number: "1".to_owned(),
        title: "DO OBJETO".to_owned(),
        items: vec![FormItem::default()],
    }])]
    pub clauses: Vec<FormClause>,
}

/// [`Clause`] as the editor holds it.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct FormClause {
    /// Number of the clause.
    #[serde(deserialize_with = "text")]
    pub number: String,

    /// Title of the clause.
    #[serde(deserialize_with = "text")]
    pub title: String,

    /// Items of the clause.
    pub items: Vec<FormItem>,
}

impl From<Clause> for FormClause {
    fn from(clause: Clause) -> Self {
        Self {
            number: clause.number,
            title: clause.title,
            items: clause
                .items
                .into_iter()
                .map(|i| FormItem { text: i.text })
                .collect(),
        }
    }
}

/// [`clause::Item`] as the editor holds it.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct FormItem {
    /// Text of the item.
    #[serde(deserialize_with = "text")]
    pub text: String,
}

/// [`Form`] validated into [`Details`].
#[derive(Clone, Debug)]
pub struct Draft {
    /// Validated [`Details`].
    pub details: Details,

    /// Explicitly requested [`Status`], if any.
    pub status: Option<Status>,
}

impl Form {
    /// Parses a [`Form`] out of the provided raw [`Content`] snapshot.
    ///
    /// # Errors
    ///
    /// If the [`Content`] values have unexpected types.
    pub fn from_content(content: &Content) -> Result<Self, ValidationErrors> {
        serde_json::from_value(serde_json::Value::Object(content.clone()))
            .map_err(|e| ValidationErrors::single("", e.to_string()))
    }

    /// Validates this [`Form`] into a [`Draft`].
    ///
    /// An unset down payment defaults to the
    /// [`Terms::SUGGESTED_DOWN_PAYMENT`] share of a positive total value.
    ///
    /// # Errors
    ///
    /// With every field failing validation.
    pub fn validate(&self) -> Result<Draft, ValidationErrors> {
        let mut errs = ValidationErrors::default();

        let title = errs.check(
            "title",
            Title::new(self.title.trim()),
            &text_message(&self.title, Title::MAX_LEN),
        );
        let kind = errs.check(
            "kind",
            Kind::from_str(self.kind.trim()).ok(),
            "must be one of SERVICE, EMPLOYMENT, LEASE, OTHER",
        );
        let contracting_party = errs.check(
            "contractingParty",
            PartyName::new(self.contracting_party.trim()),
            &text_message(&self.contracting_party, PartyName::MAX_LEN),
        );
        let contracted_party = errs.check(
            "contractedParty",
            PartyName::new(self.contracted_party.trim()),
            &text_message(&self.contracted_party, PartyName::MAX_LEN),
        );
        let start_date = errs.check(
            "startDate",
            Date::from_str(self.start_date.trim()).ok(),
            DATE,
        );
        let deadline = errs.check(
            "deadline",
            Date::from_str(self.deadline.trim()).ok(),
            DATE,
        );

        let total_value = errs.check(
            "totalValue",
            Money::from_input(&self.total_value),
            MONEY,
        );
        let down_payment = if mask::digits(&self.down_payment).is_empty() {
            Some(None)
        } else {
            errs.check(
                "downPayment",
                Money::from_input(&self.down_payment),
                MONEY,
            )
            .map(Some)
        };
        let down_payment_date =
            errs.optional_date("downPaymentDate", &self.down_payment_date);
        let method = errs.check(
            "paymentMethod",
            Method::from_str(self.payment_method.trim()).ok(),
            "must be one of PIX, BOLETO, TRANSFER, CARD, CASH",
        );
        let installments = errs.check(
            "installments",
            self.installments
                .trim()
                .parse()
                .ok()
                .and_then(Installments::new),
            &format!(
                "must be an integer between 1 and {}",
                Installments::MAX,
            ),
        );
        let first_due_date =
            errs.optional_date("firstDueDate", &self.first_due_date);
        let due_day = errs.check(
            "dueDay",
            self.due_day.trim().parse().ok().and_then(DueDay::new),
            "must be a day of a month between 1 and 31",
        );
        let late_penalty = errs.check(
            "latePenalty",
            Percent::from_input(&self.late_penalty),
            PERCENT,
        );
        let monthly_interest = errs.check(
            "monthlyInterest",
            Percent::from_input(&self.monthly_interest),
            PERCENT,
        );

        let status = match self.status.as_deref().map(str::trim) {
            None | Some("") => Some(None),
            Some(s) => errs
                .check(
                    "status",
                    Status::from_str(s).ok(),
                    "must be one of PENDING, ACTIVE, FINISHED",
                )
                .map(Some),
        };

        let clauses = errs.clauses(&self.clauses);

        let draft = (|| {
            let total_value = total_value?;
            let down_payment = down_payment?.or_else(|| {
                (!total_value.is_zero())
                    .then(|| Terms::suggested_down_payment(total_value))
            });
            Some(Draft {
                details: Details {
                    title: title?,
                    kind: kind?,
                    contracting_party: contracting_party?,
                    contracted_party: contracted_party?,
                    objective: self.objective.trim().to_owned(),
                    scope: self.scope.trim().to_owned(),
                    place_of_execution: self
                        .place_of_execution
                        .trim()
                        .to_owned(),
                    start_date: start_date?,
                    deadline: deadline?,
                    payment: Terms {
                        total_value,
                        down_payment,
                        down_payment_date: down_payment_date?,
                        method: method?,
                        installments: installments?,
                        first_due_date: first_due_date?,
                        due_day: due_day?,
                        late_penalty: late_penalty?,
                        monthly_interest: monthly_interest?,
                    },
                    clauses: clauses?,
                },
                status: status?,
            })
        })();

        match draft {
            Some(draft) if errs.0.is_empty() => Ok(draft),
            _ => Err(errs),
        }
    }
}

impl From<&Contract> for Form {
    /// Regenerates the display strings of the provided [`Contract`].
    fn from(contract: &Contract) -> Self {
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
        } = &contract.details;
        let opt_date = |d: Option<Date>| d.map(|d| d.to_string());

        Self {
            title: title.to_string(),
            kind: kind.to_string(),
            objective: objective.clone(),
            scope: scope.clone(),
            place_of_execution: place_of_execution.clone(),
            contracting_party: contracting_party.to_string(),
            contracted_party: contracted_party.to_string(),
            total_value: payment.total_value.to_string(),
            down_payment: payment
                .down_payment
                .map(|m| m.to_string())
                .unwrap_or_default(),
            down_payment_date: opt_date(payment.down_payment_date)
                .unwrap_or_default(),
            payment_method: payment.method.to_string(),
            installments: payment.installments.to_string(),
            first_due_date: opt_date(payment.first_due_date)
                .unwrap_or_default(),
            due_day: payment.due_day.to_string(),
            late_penalty: payment.late_penalty.to_string(),
            monthly_interest: payment.monthly_interest.to_string(),
            start_date: start_date.to_string(),
            deadline: deadline.to_string(),
            status: Some(contract.status.to_string()),
            clauses: clauses.iter().cloned().map(FormClause::from).collect(),
        }
    }
}

/// Merges the top-level keys of the `patch` into the `content`, replacing
/// the existing values.
pub fn merge(content: &mut Content, patch: Content) {
    for (key, value) in patch {
        drop(content.insert(key, value));
    }
}

/// Message of a required text field.
const NON_EMPTY: &str = "must not be empty";

/// Picks the message of a required text field failing validation.
fn text_message(raw: &str, max_len: usize) -> String {
    if raw.trim().len() > max_len {
        format!("must be at most {max_len} characters")
    } else {
        NON_EMPTY.to_owned()
    }
}

/// Message of a monetary field.
const MONEY: &str = "must be a monetary amount of at most 28 digits";

/// Message of a date field.
const DATE: &str = "must be a `YYYY-MM-DD` date";

/// Message of a percentage field.
const PERCENT: &str = "must be a percentage between 0 and 100";

/// Validation failure of a single [`Form`] field.
#[derive(Clone, Debug, Display, Eq, PartialEq, Serialize)]
#[display("`{field}` {message}")]
pub struct FieldError {
    /// Dotted path to the field, like `clauses.0.items.1.text`.
    pub field: String,

    /// Description of the failure.
    pub message: String,
}

/// [`FieldError`]s of a [`Form`] validation.
#[derive(Clone, Debug, Default, Display, Error, Eq, PartialEq)]
#[display("invalid contract: {}", _0.iter().format(", "))]
pub struct ValidationErrors(#[error(not(source))] Vec<FieldError>);

impl ValidationErrors {
    /// Creates new [`ValidationErrors`] containing a single [`FieldError`].
    #[must_use]
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self(vec![FieldError {
            field: field.into(),
            message: message.into(),
        }])
    }

    /// Returns the [`FieldError`]s.
    #[must_use]
    pub fn fields(&self) -> &[FieldError] {
        &self.0
    }

    /// Records a [`FieldError`] if the `value` is [`None`].
    fn check<T>(
        &mut self,
        field: impl Into<String>,
        value: Option<T>,
        message: &str,
    ) -> Option<T> {
        if value.is_none() {
            self.0.push(FieldError {
                field: field.into(),
                message: message.to_owned(),
            });
        }
        value
    }

    /// Validates an optional date `field`, blank meaning unset.
    fn optional_date(&mut self, field: &str, raw: &str) -> Option<Option<Date>> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Some(None);
        }
        self.check(field, Date::from_str(raw).ok(), DATE).map(Some)
    }

    /// Validates the [`FormClause`]s into [`Clauses`].
    fn clauses(&mut self, clauses: &[FormClause]) -> Option<Clauses> {
        if clauses.is_empty() {
            self.0.push(FieldError {
                field: "clauses".to_owned(),
                message: "at least one clause is required".to_owned(),
            });
            return None;
        }

        let mut valid = Vec::with_capacity(clauses.len());
        for (i, c) in clauses.iter().enumerate() {
            let title = c.title.trim();
            if title.is_empty() {
                _ = self.check(format!("clauses.{i}.title"), None::<()>, NON_EMPTY);
            }
            if c.items.is_empty() {
                self.0.push(FieldError {
                    field: format!("clauses.{i}.items"),
                    message: "at least one item is required".to_owned(),
                });
            }
            let mut items = Vec::with_capacity(c.items.len());
            for (j, item) in c.items.iter().enumerate() {
                let text = item.text.trim();
                if text.is_empty() {
                    _ = self.check(
                        format!("clauses.{i}.items.{j}.text"),
                        None::<()>,
                        NON_EMPTY,
                    );
                }
                items.push(clause::Item {
                    text: text.to_owned(),
                });
            }
            valid.push(Clause {
                number: c.number.trim().to_owned(),
                title: title.to_owned(),
                items,
            });
        }
        Clauses::new(valid)
    }
}

/// Deserializes a lenient text value: numbers and booleans are stringified,
/// `null` is an empty string.
fn text<'de, D>(d: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    use serde_json::Value as V;

    match V::deserialize(d)? {
        V::Null => Ok(String::new()),
        V::String(s) => Ok(s),
        V::Number(n) => Ok(n.to_string()),
        V::Bool(b) => Ok(b.to_string()),
        V::Array(_) | V::Object(_) => Err(D::Error::custom("expected a text")),
    }
}

/// Same as [`text()`], but `null` is [`None`].
fn optional_text<'de, D>(d: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde_json::Value as V;

    match V::deserialize(d)? {
        V::Null => Ok(None),
        v => text(v).map(Some).map_err(D::Error::custom),
    }
}

#[cfg(test)]
mod spec {
    use serde_json::json;

    use crate::domain::contract::{payment::Method, Kind, Status};

    use super::{merge, Content, FieldError, Form};

    pub(crate) fn filled() -> Form {
        Form {
            title: "CONTRATO DE DESENVOLVIMENTO".to_owned(),
            objective: "Desenvolvimento de software".to_owned(),
            scope: "Aplicativo web completo".to_owned(),
            contracting_party: "ACME Ltda.".to_owned(),
            contracted_party: "Maria Souza".to_owned(),
            total_value: "R$\u{a0}100,00".to_owned(),
            installments: "4".to_owned(),
            start_date: "2024-01-10".to_owned(),
            deadline: "2024-06-30".to_owned(),
            clauses: vec![super::FormClause {
                number: "1".to_owned(),
                title: "DO OBJETO".to_owned(),
                items: vec![super::FormItem {
                    text: "Entrega do aplicativo.".to_owned(),
                }],
            }],
            ..Form::default()
        }
    }

    fn content(v: serde_json::Value) -> Content {
        match v {
            serde_json::Value::Object(m) => m,
            _ => unreachable!(),
        }
    }

    #[test]
    fn missing_keys_take_editor_defaults() {
        let form = Form::from_content(&Content::new()).unwrap();

        assert_eq!(form, Form::default());
        assert_eq!(form.kind, "SERVICE");
        assert_eq!(form.place_of_execution, "Remoto");
        assert_eq!(form.payment_method, "PIX");
        assert_eq!(form.installments, "1");
        assert_eq!(form.due_day, "10");
        assert_eq!(form.late_penalty, "2,00%");
        assert_eq!(form.monthly_interest, "1,00%");
        assert_eq!(form.clauses.len(), 1);
        assert_eq!(form.clauses[0].title, "DO OBJETO");
        assert_eq!(form.clauses[0].items.len(), 1);
    }

    #[test]
    fn parses_loosely_typed_content() {
        let form = Form::from_content(&content(json!({
            "title": "X",
            "installments": 3,
            "dueDay": null,
            "unknown": {"kept": true},
        })))
        .unwrap();

        assert_eq!(form.title, "X");
        assert_eq!(form.installments, "3");
        assert_eq!(form.due_day, "");

        assert!(Form::from_content(&content(json!({"title": []}))).is_err());
    }

    #[test]
    fn validates_filled_form() {
        let draft = filled().validate().unwrap();
        let details = draft.details;

        assert_eq!(details.title.to_string(), "CONTRATO DE DESENVOLVIMENTO");
        assert_eq!(details.kind, Kind::Service);
        assert_eq!(details.payment.method, Method::Pix);
        assert_eq!(details.payment.installments.get(), 4);
        assert_eq!(details.payment.due_day.get(), 10);
        assert_eq!(details.payment.late_penalty.to_string(), "2,00%");
        assert_eq!(details.clauses.len(), 1);
        assert_eq!(draft.status, None);
    }

    #[test]
    fn defaults_down_payment_to_a_quarter() {
        let details = filled().validate().unwrap().details;
        assert_eq!(
            details.payment.down_payment.map(|m| m.to_string()),
            Some("R$\u{a0}25,00".to_owned()),
        );

        let mut form = filled();
        form.total_value = "0".to_owned();
        let details = form.validate().unwrap().details;
        assert_eq!(details.payment.down_payment, None);

        let mut form = filled();
        form.down_payment = "R$\u{a0}10,00".to_owned();
        let details = form.validate().unwrap().details;
        assert_eq!(
            details.payment.down_payment.map(|m| m.to_string()),
            Some("R$\u{a0}10,00".to_owned()),
        );
    }

    #[test]
    fn reports_every_invalid_field() {
        let mut form = filled();
        form.title = "  ".to_owned();
        form.kind = "RENT".to_owned();
        form.total_value = String::new();
        form.deadline = "30/06/2024".to_owned();
        form.installments = "0".to_owned();
        form.due_day = "32".to_owned();
        form.status = Some("DONE".to_owned());
        form.clauses[0].items.push(super::FormItem::default());

        let errs = form.validate().unwrap_err();
        let fields = errs.fields().iter().map(|e| e.field.as_str()).collect::<Vec<_>>();

        assert_eq!(
            fields,
            [
                "title",
                "kind",
                "deadline",
                "totalValue",
                "installments",
                "dueDay",
                "status",
                "clauses.0.items.1.text",
            ],
        );
    }

    #[test]
    fn reports_out_of_range_values() {
        let mut form = filled();
        form.title = "A".repeat(600);
        form.installments = "3000000000".to_owned();
        form.down_payment = "1".repeat(29);

        let errs = form.validate().unwrap_err();

        assert_eq!(
            errs.fields(),
            [
                FieldError {
                    field: "title".to_owned(),
                    message: "must be at most 512 characters".to_owned(),
                },
                FieldError {
                    field: "downPayment".to_owned(),
                    message: "must be a monetary amount of at most 28 digits"
                        .to_owned(),
                },
                FieldError {
                    field: "installments".to_owned(),
                    message: "must be an integer between 1 and 1200".to_owned(),
                },
            ],
        );

        form.title = "A".repeat(512);
        form.installments = "1200".to_owned();
        form.down_payment = "1".repeat(28);
        assert!(form.validate().is_ok());
    }

    #[test]
    fn rejects_empty_clauses() {
        let mut form = filled();
        form.clauses.clear();
        let errs = form.validate().unwrap_err();
        assert_eq!(errs.fields()[0].field, "clauses");

        let mut form = filled();
        form.clauses[0].items.clear();
        form.clauses[0].title = String::new();
        let errs = form.validate().unwrap_err();
        let fields = errs.fields().iter().map(|e| e.field.as_str()).collect::<Vec<_>>();
        assert_eq!(fields, ["clauses.0.title", "clauses.0.items"]);
    }

    #[test]
    fn explicit_status_is_kept() {
        let mut form = filled();
        form.status = Some("ACTIVE".to_owned());
        assert_eq!(form.validate().unwrap().status, Some(Status::Active));
    }

    #[test]
    fn merge_replaces_top_level_keys() {
        let mut stored = content(json!({"title": "A", "scope": "S"}));
        merge(&mut stored, content(json!({"title": "B", "status": "ACTIVE"})));

        assert_eq!(
            serde_json::Value::Object(stored),
            json!({"title": "B", "scope": "S", "status": "ACTIVE"}),
        );
    }
}
