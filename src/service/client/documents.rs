use super::{ApiClient, Error};
use reqwest::multipart::{Form, Part};
use reqwest::Method;
use std::path::Path;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryLength {
    Short,
    #[default]
    Concise,
    Detailed,
}

#[derive(Debug, serde::Deserialize)]
struct ExtractedText {
    content: String,
}

#[derive(Debug, serde::Deserialize)]
struct Summary {
    summary: String,
}

/// Outcome of handing a document over to the chat.
#[derive(Debug, PartialEq, Eq, serde::Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ProcessedFile {
    /// A chat was created with the text as first message.
    Ok { chat_id: String },
    /// The text is too large for a chat and should be summarized first.
    TooLong {
        #[serde(default)]
        message: Option<String>,
        tokens: u64,
    },
}

/// Content types accepted by the text extraction endpoint.
fn content_type(path: &Path) -> Option<&'static str> {
    let extension = path.extension()?.to_str()?.to_ascii_lowercase();
    match extension.as_str() {
        "pdf" => Some("application/pdf"),
        "docx" => {
            Some("application/vnd.openxmlformats-officedocument.wordprocessingml.document")
        }
        "txt" | "text" => Some("text/plain"),
        _ => None,
    }
}

impl ApiClient {
    /// Uploads a pdf, docx or plain text file and returns its text.
    pub async fn extract_text(&self, path: &Path) -> Result<String, Error> {
        let display = path.display().to_string();
        let mime = content_type(path).ok_or_else(|| Error::FileReadFailed {
            path: display.clone(),
            source: std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "unsupported file type, expected pdf, docx or txt",
            ),
        })?;
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| Error::FileReadFailed {
                path: display.clone(),
                source,
            })?;
        let filename = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("document")
            .to_string();
        tracing::debug!("extracting text from {} ({})", path.display(), mime);
        let part = Part::bytes(bytes)
            .file_name(filename)
            .mime_str(mime)
            .map_err(Error::RequestFailed)?;
        let req = self
            .request(Method::POST, "/extract-text")?
            .multipart(Form::new().part("file", part));
        let res: ExtractedText = self.send(req).await?;
        Ok(res.content)
    }

    pub async fn summarize(&self, content: &str, length: SummaryLength) -> Result<String, Error> {
        tracing::debug!("summarizing {} bytes of text", content.len());
        let req = self
            .request(Method::POST, "/summarize")?
            .json(&serde_json::json!({ "content": content, "length": length }));
        let res: Summary = self.send(req).await?;
        Ok(res.summary)
    }

    pub async fn process_file(&self, text: &str) -> Result<ProcessedFile, Error> {
        let req = self
            .authorized(Method::POST, "/api/process-file")?
            .json(&serde_json::json!({ "text": text }));
        self.send(req).await
    }
}

#[cfg(test)]
mod tests {
    use super::{content_type, ProcessedFile, SummaryLength};
    use crate::service::client::tests::{client, logged_client};
    use crate::service::client::Error;
    use std::path::Path;
    use wiremock::matchers::{body_json, body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn should_guess_content_type() {
        assert_eq!(content_type(Path::new("a/b.PDF")), Some("application/pdf"));
        assert_eq!(content_type(Path::new("notes.txt")), Some("text/plain"));
        assert_eq!(content_type(Path::new("image.png")), None);
        assert_eq!(content_type(Path::new("README")), None);
    }

    #[tokio::test]
    async fn should_upload_file_for_extraction() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("notice.txt");
        std::fs::write(&file, "NOTICE\n\nPay within 15 days.").unwrap();

        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/extract-text"))
            .and(body_string_contains("filename=\"notice.txt\""))
            .and(body_string_contains("Pay within 15 days."))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "content": "NOTICE\n\nPay within 15 days.",
            })))
            .expect(1)
            .mount(&server)
            .await;
        let content = client(&server).extract_text(&file).await.unwrap();
        assert_eq!(content, "NOTICE\n\nPay within 15 days.");
    }

    #[tokio::test]
    async fn should_refuse_unsupported_file() {
        let server = MockServer::start().await;
        let err = client(&server)
            .extract_text(Path::new("photo.png"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::FileReadFailed { .. }));
    }

    #[tokio::test]
    async fn should_summarize() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/summarize"))
            .and(body_json(serde_json::json!({
                "content": "long text",
                "length": "detailed",
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "summary": "## Facts" })),
            )
            .mount(&server)
            .await;
        let summary = client(&server)
            .summarize("long text", SummaryLength::Detailed)
            .await
            .unwrap();
        assert_eq!(summary, "## Facts");
    }

    #[tokio::test]
    async fn should_read_process_outcomes() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/process-file"))
            .and(body_json(serde_json::json!({ "text": "short" })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "status": "ok", "chat_id": "66aa" })),
            )
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/process-file"))
            .and(body_json(serde_json::json!({ "text": "long" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "too_long",
                "message": "File too large, please use summarization.",
                "tokens": 9000,
            })))
            .mount(&server)
            .await;
        let client = logged_client(&server);
        assert_eq!(
            client.process_file("short").await.unwrap(),
            ProcessedFile::Ok {
                chat_id: "66aa".into()
            }
        );
        assert!(matches!(
            client.process_file("long").await.unwrap(),
            ProcessedFile::TooLong { tokens: 9000, .. }
        ));
    }
}
