//! Proof artifact types

use serde::{Deserialize, Serialize};

/// The four proof slots a lead can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProofField {
    #[serde(rename = "payment_ss")]
    Payment,
    #[serde(rename = "discount_ss")]
    Discount,
    #[serde(rename = "books_ss")]
    Books,
    #[serde(rename = "form_ss")]
    Form,
}

impl ProofField {
    /// Wire name of the field, as used in query strings and multipart parts
    pub fn as_str(&self) -> &'static str {
        match self {
            ProofField::Payment => "payment_ss",
            ProofField::Discount => "discount_ss",
            ProofField::Books => "books_ss",
            ProofField::Form => "form_ss",
        }
    }

    /// Human-readable label for viewers
    pub fn display_name(&self) -> &'static str {
        match self {
            ProofField::Payment => "Payment Proof",
            ProofField::Discount => "Discount Proof",
            ProofField::Books => "Books Proof",
            ProofField::Form => "Form Proof",
        }
    }
}

/// How a downloaded artifact should be presented
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProofKind {
    /// Renderable image
    Image,
    /// PDF document, offered as a download
    Pdf,
    /// Anything else; offered as an opaque download
    Other,
}

impl ProofKind {
    /// Classify from the declared MIME type, falling back to `Other`
    pub fn from_content_type(content_type: Option<&str>) -> Self {
        match content_type {
            Some(ct) if ct.starts_with("image/") => ProofKind::Image,
            Some(ct) if ct.starts_with("application/pdf") => ProofKind::Pdf,
            _ => ProofKind::Other,
        }
    }

    fn extension(&self) -> &'static str {
        match self {
            ProofKind::Image => "jpg",
            ProofKind::Pdf => "pdf",
            ProofKind::Other => "bin",
        }
    }
}

/// A downloaded proof artifact.
///
/// Holds the bytes for the duration of the viewing session only; dropping
/// the value releases them. Never cached by the client.
#[derive(Debug, Clone)]
pub struct ProofArtifact {
    /// The lead the artifact belongs to
    pub lead_id: i64,

    /// Which proof slot was fetched
    pub field: ProofField,

    /// The raw artifact bytes
    pub bytes: Vec<u8>,

    /// Declared MIME type, when the backend sent one
    pub content_type: Option<String>,
}

impl ProofArtifact {
    /// Presentation kind, from the declared MIME type when one was sent,
    /// else from the leading bytes of the artifact itself
    pub fn kind(&self) -> ProofKind {
        match ProofKind::from_content_type(self.content_type.as_deref()) {
            ProofKind::Other => sniff_kind(&self.bytes),
            kind => kind,
        }
    }

    /// Filename to suggest when the user downloads the artifact
    pub fn suggested_filename(&self) -> String {
        format!(
            "{}_proof_{}.{}",
            self.field.as_str(),
            self.lead_id,
            self.kind().extension()
        )
    }
}

/// Recognize the common signatures proofs actually arrive with (JPEG and
/// PNG screenshots, PDF receipts)
fn sniff_kind(bytes: &[u8]) -> ProofKind {
    if bytes.starts_with(b"%PDF") {
        ProofKind::Pdf
    } else if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) || bytes.starts_with(&[0x89, b'P', b'N', b'G'])
    {
        ProofKind::Image
    } else {
        ProofKind::Other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_wire_names() {
        assert_eq!(ProofField::Payment.as_str(), "payment_ss");
        assert_eq!(ProofField::Form.as_str(), "form_ss");
        assert_eq!(
            serde_json::to_string(&ProofField::Discount).unwrap(),
            "\"discount_ss\""
        );
    }

    #[test]
    fn kind_from_content_type() {
        assert_eq!(
            ProofKind::from_content_type(Some("image/png")),
            ProofKind::Image
        );
        assert_eq!(
            ProofKind::from_content_type(Some("application/pdf")),
            ProofKind::Pdf
        );
        assert_eq!(
            ProofKind::from_content_type(Some("text/plain")),
            ProofKind::Other
        );
        assert_eq!(ProofKind::from_content_type(None), ProofKind::Other);
    }

    #[test]
    fn kind_sniffed_when_mime_is_absent() {
        let artifact = ProofArtifact {
            lead_id: 1,
            field: ProofField::Payment,
            bytes: b"%PDF-1.7".to_vec(),
            content_type: None,
        };
        assert_eq!(artifact.kind(), ProofKind::Pdf);

        let image = ProofArtifact {
            bytes: vec![0xFF, 0xD8, 0xFF, 0xE0],
            ..artifact.clone()
        };
        assert_eq!(image.kind(), ProofKind::Image);

        let opaque = ProofArtifact {
            bytes: b"hello".to_vec(),
            ..artifact
        };
        assert_eq!(opaque.kind(), ProofKind::Other);
    }

    #[test]
    fn suggested_filenames() {
        let artifact = ProofArtifact {
            lead_id: 42,
            field: ProofField::Payment,
            bytes: vec![1, 2, 3],
            content_type: Some("image/jpeg".into()),
        };
        assert_eq!(artifact.suggested_filename(), "payment_ss_proof_42.jpg");

        let pdf = ProofArtifact {
            content_type: Some("application/pdf".into()),
            ..artifact.clone()
        };
        assert_eq!(pdf.suggested_filename(), "payment_ss_proof_42.pdf");
    }
}
