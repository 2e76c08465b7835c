use super::{ApiClient, Error};
use reqwest::Method;

/// Above this many tokens a prompt goes through summarization instead.
pub const MAX_PROMPT_TOKENS: u64 = 6000;

#[derive(Debug, serde::Serialize)]
struct ChatRequest<'a> {
    prompt: &'a str,
    chat_id: Option<&'a str>,
}

#[derive(Debug, serde::Deserialize)]
pub struct ChatAnswer {
    pub answer: String,
    #[serde(default)]
    pub context: String,
    pub chat_id: String,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, serde::Deserialize)]
pub struct ChatSummary {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub preview: String,
    #[serde(default, rename = "createdAt")]
    pub created_at: Option<String>,
}

#[derive(Debug, serde::Deserialize)]
struct CreatedChat {
    chat_id: String,
}

#[derive(Debug, serde::Deserialize)]
struct TokenCount {
    tokens: u64,
}

#[derive(Debug, serde::Deserialize)]
struct Success {
    #[serde(default)]
    success: bool,
}

impl ApiClient {
    /// Sends a prompt, creating a new chat when `chat_id` is `None`.
    pub async fn ask(&self, prompt: &str, chat_id: Option<&str>) -> Result<ChatAnswer, Error> {
        tracing::debug!("sending prompt to chat {chat_id:?}");
        let req = self
            .authorized(Method::POST, "/api/chat")?
            .json(&ChatRequest { prompt, chat_id });
        self.send(req).await
    }

    pub async fn list_chats(&self) -> Result<Vec<ChatSummary>, Error> {
        let req = self.authorized(Method::GET, "/api/chats")?;
        self.send(req).await
    }

    pub async fn create_chat(&self) -> Result<String, Error> {
        let req = self.authorized(Method::POST, "/api/chats")?;
        let res: CreatedChat = self.send(req).await?;
        Ok(res.chat_id)
    }

    pub async fn get_chat(&self, chat_id: &str) -> Result<Vec<ChatMessage>, Error> {
        let req = self.authorized(Method::GET, &format!("/api/chats/{chat_id}"))?;
        self.send(req).await
    }

    pub async fn delete_chat(&self, chat_id: &str) -> Result<bool, Error> {
        let req = self.authorized(Method::DELETE, &format!("/api/chats/{chat_id}"))?;
        let res: Success = self.send(req).await?;
        Ok(res.success)
    }

    pub async fn rename_chat(&self, chat_id: &str, title: &str) -> Result<bool, Error> {
        let req = self
            .authorized(Method::PATCH, &format!("/api/chats/{chat_id}"))?
            .json(&serde_json::json!({ "title": title }));
        let res: Success = self.send(req).await?;
        Ok(res.success)
    }

    /// Sends a prompt once its size is known to fit, refusing prompts above
    /// [`MAX_PROMPT_TOKENS`]. A failing token count does not block the prompt.
    pub async fn send_prompt(
        &self,
        prompt: &str,
        chat_id: Option<&str>,
    ) -> Result<ChatAnswer, Error> {
        match self.count_tokens(prompt).await {
            Ok(tokens) if tokens > MAX_PROMPT_TOKENS => {
                tracing::debug!("prompt of {tokens} tokens refused");
                return Err(Error::PromptTooLong { tokens });
            }
            Ok(tokens) => tracing::debug!("prompt is {tokens} tokens long"),
            Err(err) => tracing::warn!("unable to count prompt tokens, sending anyway: {err}"),
        }
        self.ask(prompt, chat_id).await
    }

    pub async fn count_tokens(&self, text: &str) -> Result<u64, Error> {
        let req = self
            .authorized(Method::POST, "/api/count-tokens")?
            .json(&serde_json::json!({ "text": text }));
        let res: TokenCount = self.send(req).await?;
        Ok(res.tokens)
    }
}

#[cfg(test)]
mod tests {
    use crate::service::client::tests::logged_client;
    use crate::service::client::Error;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn should_ask_new_chat() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .and(header("authorization", "Bearer secret-token"))
            .and(body_json(serde_json::json!({
                "prompt": "What is a legal notice?",
                "chat_id": null,
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "answer": "A formal communication.",
                "context": "",
                "chat_id": "66aa",
            })))
            .expect(1)
            .mount(&server)
            .await;
        let answer = logged_client(&server)
            .ask("What is a legal notice?", None)
            .await
            .unwrap();
        assert_eq!(answer.answer, "A formal communication.");
        assert_eq!(answer.chat_id, "66aa");
    }

    #[tokio::test]
    async fn should_list_chats() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/chats"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                { "_id": "66aa", "title": "Chat 66aa", "preview": "What is", "createdAt": null },
                { "_id": "66bb", "title": "Chat 66bb", "preview": "" },
            ])))
            .mount(&server)
            .await;
        let chats = logged_client(&server).list_chats().await.unwrap();
        assert_eq!(chats.len(), 2);
        assert_eq!(chats[0].id, "66aa");
        assert!(chats[1].created_at.is_none());
    }

    #[tokio::test]
    async fn should_get_chat_messages() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/chats/66aa"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                { "role": "user", "content": "Hi" },
                { "role": "assistant", "content": "Hello" },
            ])))
            .mount(&server)
            .await;
        let messages = logged_client(&server).get_chat("66aa").await.unwrap();
        assert_eq!(messages[1].role, "assistant");
    }

    #[tokio::test]
    async fn should_fail_deleting_missing_chat() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/chats/nope"))
            .respond_with(
                ResponseTemplate::new(404)
                    .set_body_json(serde_json::json!({ "detail": "Chat not found." })),
            )
            .mount(&server)
            .await;
        let err = logged_client(&server).delete_chat("nope").await.unwrap_err();
        assert!(matches!(err, Error::NotFound(message) if message == "Chat not found."));
    }

    #[tokio::test]
    async fn should_rename_and_count() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/api/chats/66aa"))
            .and(body_json(serde_json::json!({ "title": "Lease dispute" })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "success": true })),
            )
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/count-tokens"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "tokens": 7001 })),
            )
            .mount(&server)
            .await;
        let client = logged_client(&server);
        assert!(client.rename_chat("66aa", "Lease dispute").await.unwrap());
        assert_eq!(client.count_tokens("long text").await.unwrap(), 7001);
    }

    fn mount_answer(expected: u64) -> Mock {
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "answer": "Under section 138, yes.",
                "context": "",
                "chat_id": "chat-1",
            })))
            .expect(expected)
    }

    #[tokio::test]
    async fn should_refuse_prompt_above_limit() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/count-tokens"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "tokens": 6001 })),
            )
            .mount(&server)
            .await;
        mount_answer(0).mount(&server).await;
        let err = logged_client(&server)
            .send_prompt("a very long prompt", None)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::PromptTooLong { tokens: 6001 }));
    }

    #[tokio::test]
    async fn should_send_prompt_at_limit() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/count-tokens"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "tokens": 6000 })),
            )
            .mount(&server)
            .await;
        mount_answer(1).mount(&server).await;
        let answer = logged_client(&server)
            .send_prompt("is a bounced cheque an offence?", Some("chat-1"))
            .await
            .unwrap();
        assert_eq!(answer.chat_id, "chat-1");
    }

    #[tokio::test]
    async fn should_send_prompt_when_count_fails() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/count-tokens"))
            .respond_with(ResponseTemplate::new(500).set_body_string("tokenizer down"))
            .expect(1)
            .mount(&server)
            .await;
        mount_answer(1).mount(&server).await;
        let answer = logged_client(&server)
            .send_prompt("is a bounced cheque an offence?", None)
            .await
            .unwrap();
        assert_eq!(answer.answer, "Under section 138, yes.");
    }
}
