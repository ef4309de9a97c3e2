//! Explicit editing state of a [`Form`].

use std::mem;

use common::mask;
use derive_more::{Display, Error};

use crate::domain::contract::clause;

use super::{
    derive,
    form::{FormClause, FormItem},
    render, Document, Form,
};

/// Scalar field of a [`Form`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Field {
    /// [`Form::title`].
    Title,
    /// [`Form::kind`].
    Kind,
    /// [`Form::objective`].
    Objective,
    /// [`Form::scope`].
    Scope,
    /// [`Form::place_of_execution`].
    PlaceOfExecution,
    /// [`Form::contracting_party`].
    ContractingParty,
    /// [`Form::contracted_party`].
    ContractedParty,
    /// [`Form::total_value`].
    TotalValue,
    /// [`Form::down_payment`].
    DownPayment,
    /// [`Form::down_payment_date`].
    DownPaymentDate,
    /// [`Form::payment_method`].
    PaymentMethod,
    /// [`Form::installments`].
    Installments,
    /// [`Form::first_due_date`].
    FirstDueDate,
    /// [`Form::due_day`].
    DueDay,
    /// [`Form::late_penalty`].
    LatePenalty,
    /// [`Form::monthly_interest`].
    MonthlyInterest,
    /// [`Form::start_date`].
    StartDate,
    /// [`Form::deadline`].
    Deadline,
    /// [`Form::status`].
    Status,
}

/// Single change of a [`Form`].
///
/// Changes addressing a missing clause or item are ignored.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Change {
    /// Sets the raw input of a [`Field`], applying its input mask.
    Set(Field, String),

    /// Sets the number of a clause.
    SetClauseNumber {
        /// Index of the clause.
        clause: usize,
        /// New number.
        number: String,
    },

    /// Sets the title of a clause.
    SetClauseTitle {
        /// Index of the clause.
        clause: usize,
        /// New title.
        title: String,
    },

    /// Sets the text of a clause item.
    SetItemText {
        /// Index of the clause.
        clause: usize,
        /// Index of the item in the clause.
        item: usize,
        /// New text.
        text: String,
    },

    /// Appends an empty clause with a single empty item.
    AddClause,

    /// Appends a copy of a [`clause::Standard`] one.
    AddStandardClause(clause::Standard),

    /// Removes the clause at the index.
    RemoveClause(usize),

    /// Appends an empty item to the clause at the index.
    AddItem(usize),

    /// Removes an item of a clause.
    RemoveItem {
        /// Index of the clause.
        clause: usize,
        /// Index of the item in the clause.
        item: usize,
    },

    /// Overwrites the down payment with the suggested one.
    SuggestDownPayment,
}

impl Form {
    /// Applies the provided [`Change`] to this [`Form`], running the
    /// derivation passes it triggers.
    #[must_use]
    pub fn apply(mut self, change: Change) -> Self {
        match change {
            Change::Set(field, raw) => {
                self.set(field, raw);
                if field == Field::TotalValue {
                    derive::on_total_value_change(&mut self);
                }
            }
            Change::SetClauseNumber { clause, number } => {
                if let Some(c) = self.clauses.get_mut(clause) {
                    c.number = number;
                }
            }
            Change::SetClauseTitle { clause, title } => {
                if let Some(c) = self.clauses.get_mut(clause) {
                    c.title = title;
                }
            }
            Change::SetItemText { clause, item, text } => {
                if let Some(i) = self
                    .clauses
                    .get_mut(clause)
                    .and_then(|c| c.items.get_mut(item))
                {
                    i.text = text;
                }
            }
            Change::AddClause => {
                let number = self.next_clause_number();
                self.clauses.push(FormClause {
                    number,
                    title: String::new(),
                    items: vec![FormItem::default()],
                });
            }
            Change::AddStandardClause(standard) => {
                let number = self.next_clause_number();
                self.clauses.push(FormClause::from(standard.to_clause(number)));
            }
            Change::RemoveClause(clause) => {
                if clause < self.clauses.len() {
                    drop(self.clauses.remove(clause));
                }
            }
            Change::AddItem(clause) => {
                if let Some(c) = self.clauses.get_mut(clause) {
                    c.items.push(FormItem::default());
                }
            }
            Change::RemoveItem { clause, item } => {
                if let Some(c) = self.clauses.get_mut(clause) {
                    if item < c.items.len() {
                        drop(c.items.remove(item));
                    }
                }
            }
            Change::SuggestDownPayment => {
                self.down_payment =
                    derive::suggested_down_payment(&self.total_value);
            }
        }
        self
    }

    fn set(&mut self, field: Field, raw: String) {
        match field {
            Field::Title => self.title = raw,
            Field::Kind => self.kind = raw,
            Field::Objective => self.objective = raw,
            Field::Scope => self.scope = raw,
            Field::PlaceOfExecution => self.place_of_execution = raw,
            Field::ContractingParty => self.contracting_party = raw,
            Field::ContractedParty => self.contracted_party = raw,
            Field::TotalValue => self.total_value = mask::currency(&raw),
            Field::DownPayment => self.down_payment = mask::currency(&raw),
            Field::DownPaymentDate => self.down_payment_date = raw,
            Field::PaymentMethod => self.payment_method = raw,
            Field::Installments => self.installments = mask::digits(&raw),
            Field::FirstDueDate => self.first_due_date = raw,
            Field::DueDay => self.due_day = mask::digits(&raw),
            Field::LatePenalty => self.late_penalty = mask::percent(&raw),
            Field::MonthlyInterest => {
                self.monthly_interest = mask::percent(&raw);
            }
            Field::StartDate => self.start_date = raw,
            Field::Deadline => self.deadline = raw,
            Field::Status => {
                self.status = (!raw.trim().is_empty()).then_some(raw);
            }
        }
    }

    fn next_clause_number(&self) -> String {
        (self.clauses.len() + 1).to_string()
    }
}

/// Editing session of a single [`Form`].
#[derive(Clone, Debug, Default)]
pub struct Editor {
    /// Edited [`Form`].
    form: Form,

    /// Indicator whether a submission is in flight.
    submitting: bool,
}

impl Editor {
    /// Creates a new [`Editor`] of the provided [`Form`].
    #[must_use]
    pub fn new(form: Form) -> Self {
        Self {
            form,
            submitting: false,
        }
    }

    /// Returns the edited [`Form`].
    #[must_use]
    pub fn form(&self) -> &Form {
        &self.form
    }

    /// Applies the provided [`Change`] to the edited [`Form`].
    pub fn apply(&mut self, change: Change) {
        self.form = mem::take(&mut self.form).apply(change);
    }

    /// Returns the masked installment amount of the edited [`Form`].
    #[must_use]
    pub fn installment_amount(&self) -> Option<String> {
        derive::installment_amount(&self.form)
    }

    /// Renders the edited [`Form`] into a [`Document`].
    #[must_use]
    pub fn preview(&self) -> Document {
        render(&self.form)
    }

    /// Indicates whether a submission is in flight.
    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Starts a submission, returning a snapshot of the edited [`Form`] to
    /// send.
    ///
    /// # Errors
    ///
    /// If another submission is in flight.
    pub fn begin_submit(&mut self) -> Result<Form, SubmitInProgress> {
        if self.submitting {
            return Err(SubmitInProgress);
        }
        self.submitting = true;
        Ok(self.form.clone())
    }

    /// Finishes the submission in flight, if any.
    pub fn finish_submit(&mut self) {
        self.submitting = false;
    }
}

/// Error of starting a submission while another one is in flight.
#[derive(Clone, Copy, Debug, Display, Error)]
#[display("submission is already in progress")]
pub struct SubmitInProgress;

#[cfg(test)]
mod spec {
    use crate::domain::contract::clause::STANDARD;

    use super::{Change, Editor, Field, Form};

    #[test]
    fn masks_raw_input() {
        let form = Form::default()
            .apply(Change::Set(Field::TotalValue, "123456".to_owned()))
            .apply(Change::Set(Field::LatePenalty, "250".to_owned()))
            .apply(Change::Set(Field::Installments, "3x".to_owned()))
            .apply(Change::Set(Field::DueDay, "dia 5".to_owned()));

        assert_eq!(form.total_value, "R$\u{a0}1.234,56");
        assert_eq!(form.late_penalty, "2,50%");
        assert_eq!(form.installments, "3");
        assert_eq!(form.due_day, "5");
    }

    #[test]
    fn total_change_suggests_down_payment_once() {
        let form = Form::default()
            .apply(Change::Set(Field::TotalValue, "10000".to_owned()));
        assert_eq!(form.down_payment, "R$\u{a0}25,00");

        let form =
            form.apply(Change::Set(Field::TotalValue, "20000".to_owned()));
        assert_eq!(form.down_payment, "R$\u{a0}25,00", "never overwritten");

        let form = form.apply(Change::SuggestDownPayment);
        assert_eq!(form.down_payment, "R$\u{a0}50,00");
    }

    #[test]
    fn edits_clauses() {
        let form = Form::default()
            .apply(Change::AddStandardClause(STANDARD[0]))
            .apply(Change::AddClause)
            .apply(Change::SetClauseTitle {
                clause: 2,
                title: "DAS GARANTIAS".to_owned(),
            })
            .apply(Change::AddItem(2))
            .apply(Change::SetItemText {
                clause: 2,
                item: 1,
                text: "Garantia de 90 dias.".to_owned(),
            })
            .apply(Change::RemoveItem { clause: 2, item: 0 })
            .apply(Change::RemoveClause(7));

        assert_eq!(form.clauses.len(), 3);
        assert_eq!(form.clauses[1].number, "2");
        assert_eq!(form.clauses[1].title, "DA RESCISÃO");
        assert_eq!(form.clauses[1].items.len(), 2);
        assert_eq!(form.clauses[2].number, "3");
        assert_eq!(form.clauses[2].items.len(), 1);
        assert_eq!(form.clauses[2].items[0].text, "Garantia de 90 dias.");

        let form = form.apply(Change::RemoveClause(0));
        assert_eq!(form.clauses[0].title, "DA RESCISÃO");
    }

    #[test]
    fn guards_in_flight_submission() {
        let mut editor = Editor::default();
        editor.apply(Change::Set(Field::Title, "CONTRATO".to_owned()));

        let sent = editor.begin_submit().unwrap();
        assert_eq!(sent.title, "CONTRATO");
        assert!(editor.is_submitting());
        assert!(editor.begin_submit().is_err());

        editor.finish_submit();
        assert!(editor.begin_submit().is_ok());
    }

    #[test]
    fn previews_edited_form() {
        let mut editor = Editor::default();
        editor.apply(Change::Set(Field::TotalValue, "10000".to_owned()));
        editor.apply(Change::Set(Field::Installments, "3".to_owned()));

        assert_eq!(editor.installment_amount().as_deref(), Some("R$\u{a0}25,00"));
        assert_eq!(editor.preview().sections[2].blocks.len(), 3);
    }
}
