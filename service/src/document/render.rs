//! Rendering of a [`Form`] into a printable legal [`Document`].

use std::{fmt, str::FromStr};

use common::{mask, Date};
use itertools::Itertools as _;
use serde::Serialize;

use crate::domain::contract::{payment::Method, Kind};

use super::Form;

/// Placeholder of a missing party name.
const BLANK_NAME: &str = "____________________";

/// Placeholder of a missing date.
const BLANK_DATE: &str = "___/___/___";

/// Position of the first specific clause in a rendered [`Document`].
///
/// Clauses 1 to 5 are the fixed sections.
pub const FIRST_CLAUSE_NUMBER: usize = 6;

/// Linear legal document rendered out of a [`Form`].
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Title heading the [`Document`].
    pub title: String,

    /// Subtitle naming the contract kind.
    pub subtitle: String,

    /// [`Section`]s in their fixed order.
    pub sections: Vec<Section>,

    /// Roles of the signature lines.
    pub signatures: Vec<&'static str>,
}

/// Numbered section of a [`Document`].
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Section {
    /// Roman numeral of this [`Section`].
    pub numeral: &'static str,

    /// Title of this [`Section`].
    pub title: &'static str,

    /// Contents of this [`Section`].
    pub blocks: Vec<Block>,
}

/// Content block of a [`Section`].
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Block {
    /// Single [`Paragraph`].
    Paragraph(Paragraph),

    /// Specific clause with its item [`Paragraph`]s.
    Clause {
        /// Heading of the clause, like `Cláusula 6ª - DO OBJETO`.
        heading: String,

        /// Paragraphs of the clause items.
        paragraphs: Vec<Paragraph>,
    },
}

/// Optionally labelled paragraph of text.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Paragraph {
    /// Label preceding the text, like `3.1.`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    /// Text of this [`Paragraph`].
    pub text: String,
}

impl Paragraph {
    fn labelled(label: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            text: text.into(),
        }
    }
}

/// Renders the provided [`Form`] into a [`Document`].
///
/// Missing values are replaced with placeholders, so every [`Section`] has
/// some text. Specific clauses are numbered by their position starting from
/// [`FIRST_CLAUSE_NUMBER`], regardless of their own numbers.
#[must_use]
pub fn render(form: &Form) -> Document {
    let kind = label(&form.kind, Kind::label, Kind::default().label());
    Document {
        title: or(&form.title, "CONTRATO DE PRESTAÇÃO DE SERVIÇOS").to_owned(),
        subtitle: format!("INSTRUMENTO PARTICULAR DE {kind}"),
        sections: vec![
            parties(form),
            objective(form),
            payment(form),
            penalties(form),
            clauses(form),
        ],
        signatures: vec!["CONTRATANTE", "CONTRATADO"],
    }
}

fn parties(form: &Form) -> Section {
    Section {
        numeral: "I",
        title: "DAS PARTES",
        blocks: vec![
            Block::Paragraph(Paragraph::labelled(
                "CONTRATANTE:",
                or(&form.contracting_party, BLANK_NAME),
            )),
            Block::Paragraph(Paragraph::labelled(
                "CONTRATADO:",
                or(&form.contracted_party, BLANK_NAME),
            )),
        ],
    }
}

fn objective(form: &Form) -> Section {
    let place = form.place_of_execution.trim().to_lowercase();
    let place = or(&place, "remota");
    Section {
        numeral: "II",
        title: "DO OBJETO E ESCOPO",
        blocks: vec![
            Block::Paragraph(Paragraph::labelled(
                "2.1. Objetivo:",
                or(
                    &form.objective,
                    "O presente contrato tem como objetivo a prestação de \
                     serviços ora descritos.",
                ),
            )),
            Block::Paragraph(Paragraph::labelled(
                "2.2. Detalhamento do Escopo:",
                or(
                    &form.scope,
                    "As atividades serão executadas conforme acordado entre \
                     as partes.",
                ),
            )),
            Block::Paragraph(Paragraph::labelled(
                "2.3. Local de Execução:",
                format!("Os serviços serão realizados de forma {place}."),
            )),
        ],
    }
}

fn payment(form: &Form) -> Section {
    let total = mask::currency(&form.total_value);
    let total = or(&total, "R$\u{a0}0,00");
    let mut blocks = vec![Block::Paragraph(Paragraph::labelled(
        "3.1.",
        format!(
            "Pela execução dos serviços, o CONTRATANTE pagará ao CONTRATADO \
             o valor total de {total}.",
        ),
    ))];

    let down_payment = mask::currency(&form.down_payment);
    if !down_payment.is_empty() {
        let date = date(&form.down_payment_date);
        let date = or(&date, BLANK_DATE);
        blocks.push(Block::Paragraph(Paragraph::labelled(
            "3.2.",
            format!(
                "Será pago a título de entrada o valor de {down_payment} na \
                 data de {date}.",
            ),
        )));
    }

    let installments = mask::digits(&form.installments);
    let installments = or(&installments, "1");
    let method = label(
        &form.payment_method,
        Method::label,
        Method::default().label(),
    );
    let due_day = or(&form.due_day, "10");
    blocks.push(Block::Paragraph(Paragraph::labelled(
        "3.3.",
        format!(
            "O saldo remanescente será quitado em {installments} \
             parcela(s), via {method}, com vencimento todo dia {due_day}.",
        ),
    )));

    Section {
        numeral: "III",
        title: "DO VALOR E FORMA DE PAGAMENTO",
        blocks,
    }
}

fn penalties(form: &Form) -> Section {
    let penalty = mask::percent(&form.late_penalty);
    let interest = mask::percent(&form.monthly_interest);
    Section {
        numeral: "IV",
        title: "DAS PENALIDADES",
        blocks: vec![Block::Paragraph(Paragraph::labelled(
            "4.1.",
            format!(
                "Em caso de atraso no pagamento, incidirá multa de {} sobre \
                 o valor da parcela, acrescida de juros de mora de {} ao mês.",
                or(&penalty, "0,00%"),
                or(&interest, "0,00%"),
            ),
        ))],
    }
}

fn clauses(form: &Form) -> Section {
    let blocks = if form.clauses.is_empty() {
        vec![Block::Paragraph(Paragraph {
            label: None,
            text: "Nenhuma cláusula adicional definida.".to_owned(),
        })]
    } else {
        form.clauses
            .iter()
            .enumerate()
            .map(|(i, clause)| {
                let n = i + FIRST_CLAUSE_NUMBER;
                Block::Clause {
                    heading: format!("Cláusula {n}ª - {}", clause.title.trim()),
                    paragraphs: clause
                        .items
                        .iter()
                        .enumerate()
                        .map(|(j, item)| {
                            Paragraph::labelled(
                                format!("{n}.{}.", j + 1),
                                item.text.trim(),
                            )
                        })
                        .collect(),
                }
            })
            .collect()
    };
    Section {
        numeral: "V",
        title: "DAS CLÁUSULAS ESPECÍFICAS",
        blocks,
    }
}

/// Returns the trimmed `value`, or the `fallback` if it's blank.
fn or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    match value.trim() {
        "" => fallback,
        v => v,
    }
}

/// Formats a `YYYY-MM-DD` date as `DD/MM/YYYY`, leaving anything else as is.
fn date(raw: &str) -> String {
    Date::from_str(raw.trim())
        .map_or_else(|_| raw.trim().to_owned(), Date::to_br)
}

/// Returns the human-readable label of the `raw` kind, or the `raw` value
/// itself if it's not a known one.
fn label<K: FromStr>(
    raw: &str,
    to_label: fn(K) -> &'static str,
    default: &'static str,
) -> String {
    match raw.trim() {
        "" => default.to_owned(),
        raw => K::from_str(raw)
            .map_or_else(|_| raw.to_owned(), |k| to_label(k).to_owned()),
    }
}

impl fmt::Display for Paragraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.label {
            Some(label) => write!(f, "{label} {}", self.text),
            None => f.write_str(&self.text),
        }
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Paragraph(p) => write!(f, "{p}"),
            Self::Clause {
                heading,
                paragraphs,
            } => {
                writeln!(f, "{heading}")?;
                write!(f, "{}", paragraphs.iter().format("\n"))
            }
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}. {}", self.numeral, self.title)?;
        write!(f, "{}", self.blocks.iter().format("\n"))
    }
}

impl fmt::Display for Document {
    /// Formats this [`Document`] as print-ready plain text.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        writeln!(f, "{}", self.subtitle)?;
        for section in &self.sections {
            write!(f, "\n{section}\n")?;
        }
        for role in &self.signatures {
            write!(f, "\n{BLANK_NAME}\n{role}\n")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod spec {
    use serde_json::json;

    use super::{render, Block, Form};
    use crate::document::form::{FormClause, FormItem};

    fn clause(number: &str, title: &str, items: usize) -> FormClause {
        FormClause {
            number: number.to_owned(),
            title: title.to_owned(),
            items: (1..=items)
                .map(|i| FormItem {
                    text: format!("Item {i}"),
                })
                .collect(),
        }
    }

    fn texts(block: &Block) -> Vec<String> {
        match block {
            Block::Paragraph(p) => vec![p.to_string()],
            Block::Clause { paragraphs, .. } => {
                paragraphs.iter().map(ToString::to_string).collect()
            }
        }
    }

    #[test]
    fn empty_form_renders_five_non_blank_sections() {
        let form = Form {
            kind: String::new(),
            place_of_execution: String::new(),
            payment_method: String::new(),
            installments: String::new(),
            due_day: String::new(),
            late_penalty: String::new(),
            monthly_interest: String::new(),
            clauses: vec![],
            ..Form::default()
        };
        let doc = render(&form);

        assert_eq!(doc.title, "CONTRATO DE PRESTAÇÃO DE SERVIÇOS");
        assert_eq!(doc.subtitle, "INSTRUMENTO PARTICULAR DE PRESTAÇÃO DE SERVIÇOS");
        assert_eq!(doc.sections.len(), 5);
        for section in &doc.sections {
            assert!(!section.blocks.is_empty(), "{} is empty", section.numeral);
            for block in &section.blocks {
                assert!(texts(block).iter().all(|t| !t.trim().is_empty()));
            }
        }
        assert_eq!(
            texts(&doc.sections[0].blocks[0]),
            ["CONTRATANTE: ____________________"],
        );
        assert_eq!(
            texts(&doc.sections[1].blocks[2]),
            ["2.3. Local de Execução: Os serviços serão realizados de forma remota."],
        );
        assert_eq!(
            texts(&doc.sections[2].blocks[0]),
            ["3.1. Pela execução dos serviços, o CONTRATANTE pagará ao \
              CONTRATADO o valor total de R$\u{a0}0,00."],
        );
        assert_eq!(doc.sections[2].blocks.len(), 2, "no down payment");
        assert_eq!(
            texts(&doc.sections[4].blocks[0]),
            ["Nenhuma cláusula adicional definida."],
        );
    }

    #[test]
    fn numbers_clauses_by_position() {
        let form = Form {
            clauses: vec![
                clause("9", "DO OBJETO", 2),
                clause("1", "DO FORO", 3),
                clause("", "DO SIGILO", 1),
            ],
            ..Form::default()
        };
        let doc = render(&form);
        let section = &doc.sections[4];

        assert_eq!(section.blocks.len(), 3);
        for (i, block) in section.blocks.iter().enumerate() {
            let Block::Clause {
                heading,
                paragraphs,
            } = block
            else {
                panic!("expected a clause");
            };
            let n = i + 6;
            assert!(heading.starts_with(&format!("Cláusula {n}ª - ")));
            for (j, p) in paragraphs.iter().enumerate() {
                assert_eq!(p.label.as_deref(), Some(format!("{n}.{}.", j + 1).as_str()));
            }
        }
        assert_eq!(
            texts(&section.blocks[1]),
            ["7.1. Item 1", "7.2. Item 2", "7.3. Item 3"],
        );
    }

    #[test]
    fn renders_payment_terms() {
        let form = Form {
            total_value: "100000".to_owned(),
            down_payment: "R$\u{a0}250,00".to_owned(),
            down_payment_date: "2024-02-01".to_owned(),
            payment_method: "TRANSFER".to_owned(),
            installments: "3".to_owned(),
            place_of_execution: "Presencial".to_owned(),
            ..Form::default()
        };
        let doc = render(&form);
        let payment = &doc.sections[2];

        assert!(texts(&payment.blocks[0])[0].ends_with("R$\u{a0}1.000,00."));
        assert_eq!(
            texts(&payment.blocks[1]),
            ["3.2. Será pago a título de entrada o valor de R$\u{a0}250,00 na \
              data de 01/02/2024."],
        );
        assert_eq!(
            texts(&payment.blocks[2]),
            ["3.3. O saldo remanescente será quitado em 3 parcela(s), via \
              TRANSFERÊNCIA, com vencimento todo dia 10."],
        );
        assert_eq!(
            texts(&doc.sections[3].blocks[0]),
            ["4.1. Em caso de atraso no pagamento, incidirá multa de 2,00% \
              sobre o valor da parcela, acrescida de juros de mora de 1,00% \
              ao mês."],
        );
        assert!(texts(&doc.sections[1].blocks[2])[0].ends_with("de forma presencial."));
    }

    #[test]
    fn keeps_unknown_values_verbatim() {
        let form = Form {
            kind: "PARCERIA".to_owned(),
            down_payment: "50".to_owned(),
            down_payment_date: "amanhã".to_owned(),
            ..Form::default()
        };
        let doc = render(&form);

        assert_eq!(doc.subtitle, "INSTRUMENTO PARTICULAR DE PARCERIA");
        assert!(texts(&doc.sections[2].blocks[1])[0].ends_with("na data de amanhã."));
    }

    #[test]
    fn prints_plain_text() {
        let text = render(&Form::default()).to_string();

        assert!(text.starts_with(
            "CONTRATO DE PRESTAÇÃO DE SERVIÇOS\n\
             INSTRUMENTO PARTICULAR DE PRESTAÇÃO DE SERVIÇOS\n\n\
             I. DAS PARTES\n",
        ));
        assert!(text.contains("\nV. DAS CLÁUSULAS ESPECÍFICAS\nCláusula 6ª - DO OBJETO\n6.1. \n"));
        assert!(text.ends_with("CONTRATANTE\n\n____________________\nCONTRATADO\n"));
    }

    #[test]
    fn serializes_tagged_blocks() {
        let doc = render(&Form::default());
        let json = serde_json::to_value(&doc.sections[4]).unwrap();

        assert_eq!(
            json,
            json!({
                "numeral": "V",
                "title": "DAS CLÁUSULAS ESPECÍFICAS",
                "blocks": [{
                    "type": "clause",
                    "heading": "Cláusula 6ª - DO OBJETO",
                    "paragraphs": [{"label": "6.1.", "text": ""}],
                }],
            }),
        );
    }
}
