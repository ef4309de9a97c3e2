//! [`Clause`] definitions.

use std::ops::Deref;

use serde::{Deserialize, Serialize};

#[cfg(doc)]
use crate::domain::Contract;

/// Specific clause of a [`Contract`].
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Clause {
    /// User-editable number of this [`Clause`].
    ///
    /// Merely informational: rendered documents number clauses by position.
    pub number: String,

    /// Title of this [`Clause`].
    pub title: String,

    /// [`Item`]s (paragraphs) of this [`Clause`].
    pub items: Vec<Item>,
}

/// Paragraph of a [`Clause`].
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Item {
    /// Text of this [`Item`].
    pub text: String,
}

/// Non-empty ordered sequence of [`Clause`]s.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Clauses(Vec<Clause>);

impl Clauses {
    /// Creates new [`Clauses`] if the provided `clauses` are not empty.
    #[must_use]
    pub fn new(clauses: Vec<Clause>) -> Option<Self> {
        (!clauses.is_empty()).then_some(Self(clauses))
    }
}

impl Deref for Clauses {
    type Target = [Clause];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<'de> Deserialize<'de> for Clauses {
    fn deserialize<D>(d: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::Error as _;

        Self::new(Vec::deserialize(d)?)
            .ok_or_else(|| D::Error::custom("at least one clause is required"))
    }
}

/// Predefined [`Clause`] offered by the editor.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Standard {
    /// Title of the [`Clause`].
    pub title: &'static str,

    /// Texts of the [`Clause`] items.
    pub items: &'static [&'static str],
}

impl Standard {
    /// Converts this [`Standard`] clause into a [`Clause`] with the provided
    /// `number`.
    #[must_use]
    pub fn to_clause(self, number: impl Into<String>) -> Clause {
        Clause {
            number: number.into(),
            title: self.title.to_owned(),
            items: self
                .items
                .iter()
                .map(|&text| Item {
                    text: text.to_owned(),
                })
                .collect(),
        }
    }
}

/// All the [`Standard`] clauses, in the order the editor offers them.
pub const STANDARD: [Standard; 4] = [
    Standard {
        title: "DA RESCISÃO",
        items: &[
            "O presente contrato poderá ser rescindido por qualquer uma das \
             partes, mediante aviso prévio por escrito com antecedência \
             mínima de 30 (trinta) dias.",
            "O descumprimento de qualquer cláusula deste instrumento ensejará \
             a rescisão imediata, sujeitando a parte infratora à multa de 10% \
             sobre o valor total.",
        ],
    },
    Standard {
        title: "DO SIGILO E CONFIDENCIALIDADE",
        items: &["As partes comprometem-se a manter sigilo absoluto sobre \
                  quaisquer informações, dados ou segredos de negócio da outra \
                  parte a que venham a ter acesso."],
    },
    Standard {
        title: "DA PROPRIEDADE INTELECTUAL",
        items: &["Todos os direitos de propriedade intelectual resultantes \
                  dos serviços prestados pertencerão exclusivamente ao \
                  CONTRATANTE após a quitação integral dos valores."],
    },
    Standard {
        title: "DO FORO",
        items: &["Para dirimir quaisquer controvérsias oriundas deste \
                  contrato, as partes elegem o foro da comarca de domicílio \
                  do CONTRATANTE, com renúncia a qualquer outro."],
    },
];

#[cfg(test)]
mod spec {
    use super::{Clauses, STANDARD};

    #[test]
    fn clauses_cannot_be_empty() {
        assert!(Clauses::new(vec![]).is_none());
        assert!(serde_json::from_str::<Clauses>("[]").is_err());

        let clauses = Clauses::new(vec![STANDARD[3].to_clause("1")]).unwrap();
        assert_eq!(clauses.len(), 1);
        assert_eq!(clauses[0].title, "DO FORO");
    }

    #[test]
    fn standard_clauses_have_items() {
        let rescission = STANDARD[0].to_clause("2");
        assert_eq!(rescission.number, "2");
        assert_eq!(rescission.items.len(), 2);
        assert!(STANDARD.iter().all(|s| !s.items.is_empty()));
    }
}
