//! Core records: patent documents and their claims.
//!
//! A [`Document`] owns its [`Claim`]s conceptually; claims carry the owning
//! document's id rather than a back-pointer. Claims are derived artifacts:
//! they are fully regenerated whenever the document's claims text changes
//! (see [`crate::claims::ClaimProcessor`]).


use serde::{Deserialize, Serialize};

/// A patent document with an optional embedding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Opaque identifier.
    pub id: String,
    pub title: String,
    pub abstract_text: String,
    /// Raw claims section, if available.
    pub claims_text: Option<String>,
    /// Public patent number, e.g. `US1234567B2`.
    pub patent_number: Option<String>,
    pub applicant: Option<String>,
    /// Document-level embedding of dimension `D` (see [`crate::constants::DimConfig`]).
    pub embedding: Option<Vec<f32>>,
}

impl Document {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        abstract_text: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            abstract_text: abstract_text.into(),
            claims_text: None,
            patent_number: None,
            applicant: None,
            embedding: None,
        }
    }

    pub fn with_claims_text(mut self, claims_text: impl Into<String>) -> Self {
        self.claims_text = Some(claims_text.into());
        self
    }

    pub fn with_patent_number(mut self, patent_number: impl Into<String>) -> Self {
        self.patent_number = Some(patent_number.into());
        self
    }

    pub fn with_applicant(mut self, applicant: impl Into<String>) -> Self {
        self.applicant = Some(applicant.into());
        self
    }

    pub fn with_embedding(mut self, embedding: Vec<f32>) -> Self {
        self.embedding = Some(embedding);
        self
    }

    /// Text used for fuzzy matching against queries.
    pub fn search_text(&self) -> String {
        format!("{} {}", self.title, self.abstract_text)
    }

    /// Text the document-level embedding is computed from. Labeled
    /// sections keep the fields distinguishable to the model; the claims
    /// section is capped so one oversized document cannot dominate the
    /// embedding input.
    pub fn embedding_text(&self) -> String {
        let mut parts = vec![
            format!("Title: {}", self.title),
            format!("Abstract: {}", self.abstract_text),
        ];
        if let Some(claims) = self.claims_text.as_deref() {
            let capped: String = claims
                .chars()
                .take(crate::constants::DOCUMENT_CLAIMS_EMBED_LIMIT)
                .collect();
            parts.push(format!("Claims: {capped}"));
        }
        parts.join("\n\n")
    }
}

/// Statutory class of a claim, detected from its preamble.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClaimType {
    Method,
    Apparatus,
    System,
    Composition,
    Article,
    Process,
}

impl ClaimType {
    /// Lowercase label, matching the wire vocabulary.
    pub fn as_str(&self) -> &'static str {
        match self {
            ClaimType::Method => "method",
            ClaimType::Apparatus => "apparatus",
            ClaimType::System => "system",
            ClaimType::Composition => "composition",
            ClaimType::Article => "article",
            ClaimType::Process => "process",
        }
    }
}

impl std::fmt::Display for ClaimType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single structured claim extracted from a document's claims text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claim {
    /// Fresh per regeneration; claim identity across regenerations is
    /// `(document_id, number)` only.
    pub id: String,
    pub document_id: String,
    /// Positive and unique within a document.
    pub number: u32,
    pub text: String,
    pub is_independent: bool,
    /// Present iff the claim is dependent. Best-effort: not validated
    /// against the owning document's claim numbers.
    pub parent_number: Option<u32>,
    pub claim_type: Option<ClaimType>,
    /// Claim-level embedding of dimension `D`.
    pub embedding: Option<Vec<f32>>,
    /// Deduplicated technical elements, at most
    /// [`crate::constants::MAX_KEY_ELEMENTS`].
    pub key_elements: Vec<String>,
}

impl Claim {
    pub fn new(
        id: impl Into<String>,
        document_id: impl Into<String>,
        number: u32,
        text: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            document_id: document_id.into(),
            number,
            text: text.into(),
            is_independent: true,
            parent_number: None,
            claim_type: None,
            embedding: None,
            key_elements: Vec::new(),
        }
    }

    pub fn with_dependency(mut self, parent_number: u32) -> Self {
        self.is_independent = false;
        self.parent_number = Some(parent_number);
        self
    }

    pub fn with_claim_type(mut self, claim_type: ClaimType) -> Self {
        self.claim_type = Some(claim_type);
        self
    }

    pub fn with_embedding(mut self, embedding: Vec<f32>) -> Self {
        self.embedding = Some(embedding);
        self
    }

    pub fn with_key_elements(mut self, key_elements: Vec<String>) -> Self {
        self.key_elements = key_elements;
        self
    }
}
