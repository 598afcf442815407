//! Resume Parser: base64 PDF payload to plain text.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use tracing::info;

use crate::workflow::collaborators::{ResumeParser, StepError};

pub struct PdfResumeParser;

#[async_trait]
impl ResumeParser for PdfResumeParser {
    async fn parse(&self, resume_source: &str) -> Result<String, StepError> {
        let bytes = decode_payload(resume_source)?;
        let byte_len = bytes.len();

        // PDF extraction is CPU-bound and may panic on malformed input;
        // a panic surfaces here as a JoinError.
        let text = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
            .await
            .map_err(|e| StepError::ResumeDecode(format!("PDF extraction aborted: {e}")))?
            .map_err(|e| StepError::ResumeDecode(format!("Invalid PDF: {e}")))?;

        let text = text.trim();
        if text.is_empty() {
            return Err(StepError::ResumeDecode(
                "PDF contains no extractable text".to_string(),
            ));
        }

        info!(pdf_bytes = byte_len, text_chars = text.len(), "Resume parsed");
        Ok(text.to_string())
    }
}

/// Decodes standard base64, tolerating embedded whitespace and a
/// `data:<mime>;base64,` prefix.
fn decode_payload(resume_source: &str) -> Result<Vec<u8>, StepError> {
    let payload = resume_source.trim();
    let payload = match payload.strip_prefix("data:") {
        Some(rest) => rest
            .split_once(";base64,")
            .map(|(_, data)| data)
            .ok_or_else(|| StepError::ResumeDecode("Data URL is not base64 encoded".to_string()))?,
        None => payload,
    };

    let compact: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.is_empty() {
        return Err(StepError::ResumeDecode("Resume payload is empty".to_string()));
    }

    STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| StepError::ResumeDecode(format!("Invalid base64: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// One-page PDF, Helvetica, two lines: "Jane Doe" and "Rust Engineer".
    const RESUME_PDF_B64: &str = "
        JVBERi0xLjQKMSAwIG9iago8PCAvVHlwZSAvQ2F0YWxvZyAvUGFnZXMgMiAwIFIgPj4KZW5kb2Jq
        CjIgMCBvYmoKPDwgL1R5cGUgL1BhZ2VzIC9LaWRzIFszIDAgUl0gL0NvdW50IDEgPj4KZW5kb2Jq
        CjMgMCBvYmoKPDwgL1R5cGUgL1BhZ2UgL1BhcmVudCAyIDAgUiAvTWVkaWFCb3ggWzAgMCA2MTIg
        NzkyXSAvUmVzb3VyY2VzIDw8IC9Gb250IDw8IC9GMSA1IDAgUiA+PiA+PiAvQ29udGVudHMgNCAw
        IFIgPj4KZW5kb2JqCjQgMCBvYmoKPDwgL0xlbmd0aCA2NyA+PgpzdHJlYW0KQlQgL0YxIDE4IFRm
        IDcyIDcyMCBUZCAoSmFuZSBEb2UpIFRqIDAgLTMwIFRkIChSdXN0IEVuZ2luZWVyKSBUaiBFVApl
        bmRzdHJlYW0KZW5kb2JqCjUgMCBvYmoKPDwgL1R5cGUgL0ZvbnQgL1N1YnR5cGUgL1R5cGUxIC9C
        YXNlRm9udCAvSGVsdmV0aWNhIC9FbmNvZGluZyAvV2luQW5zaUVuY29kaW5nID4+CmVuZG9iagp4
        cmVmCjAgNgowMDAwMDAwMDAwIDY1NTM1IGYgCjAwMDAwMDAwMDkgMDAwMDAgbiAKMDAwMDAwMDA1
        OCAwMDAwMCBuIAowMDAwMDAwMTE1IDAwMDAwIG4gCjAwMDAwMDAyNDEgMDAwMDAgbiAKMDAwMDAw
        MDM1OCAwMDAwMCBuIAp0cmFpbGVyCjw8IC9TaXplIDYgL1Jvb3QgMSAwIFIgPj4Kc3RhcnR4cmVm
        CjQ1NQolJUVPRgo=
    ";

    fn assert_resume_text(text: &str) {
        assert_eq!(text, text.trim());
        assert_eq!(
            text.split_whitespace().collect::<Vec<_>>(),
            vec!["Jane", "Doe", "Rust", "Engineer"]
        );
    }

    #[test]
    fn test_decode_plain_base64() {
        assert_eq!(decode_payload("aGVsbG8=").unwrap(), b"hello");
    }

    #[test]
    fn test_decode_wrapped_base64() {
        assert_eq!(decode_payload("  aGVs\nbG8=\n").unwrap(), b"hello");
    }

    #[test]
    fn test_decode_data_url() {
        let payload = "data:application/pdf;base64,aGVsbG8=";
        assert_eq!(decode_payload(payload).unwrap(), b"hello");
    }

    #[test]
    fn test_decode_rejects_non_base64_data_url() {
        let err = decode_payload("data:text/plain,hello").unwrap_err();
        assert!(matches!(err, StepError::ResumeDecode(_)));
    }

    #[test]
    fn test_decode_rejects_empty_payload() {
        assert!(matches!(
            decode_payload("   ").unwrap_err(),
            StepError::ResumeDecode(_)
        ));
    }

    #[test]
    fn test_decode_rejects_invalid_base64() {
        assert!(matches!(
            decode_payload("not base64 at all!").unwrap_err(),
            StepError::ResumeDecode(_)
        ));
    }

    #[tokio::test]
    async fn test_parse_extracts_pdf_text() {
        let text = PdfResumeParser.parse(RESUME_PDF_B64).await.unwrap();
        assert_resume_text(&text);
    }

    #[tokio::test]
    async fn test_parse_extracts_pdf_text_from_data_url() {
        let compact: String = RESUME_PDF_B64.split_whitespace().collect();
        let data_url = format!("data:application/pdf;base64,{compact}");
        let text = PdfResumeParser.parse(&data_url).await.unwrap();
        assert_resume_text(&text);
    }

    #[tokio::test]
    async fn test_parse_rejects_non_pdf_bytes() {
        // "hello world" is valid base64 input but not a PDF.
        let err = PdfResumeParser.parse("aGVsbG8gd29ybGQ=").await.unwrap_err();
        assert!(matches!(err, StepError::ResumeDecode(_)));
    }
}
