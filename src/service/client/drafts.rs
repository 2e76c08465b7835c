use super::{Acknowledgement, ApiClient, Error};
use lexx_prelude::Draft;
use reqwest::Method;

impl ApiClient {
    pub async fn list_drafts(&self) -> Result<Vec<Draft>, Error> {
        let req = self.authorized(Method::GET, "/drafts/")?;
        self.send(req).await
    }

    pub async fn save_draft(&self, draft: &Draft) -> Result<(), Error> {
        tracing::debug!("saving draft {} of {}", draft.timestamp, draft.slug);
        let req = self.authorized(Method::POST, "/drafts/")?.json(draft);
        let _: Acknowledgement = self.send(req).await?;
        Ok(())
    }

    pub async fn update_draft(&self, draft: &Draft) -> Result<(), Error> {
        tracing::debug!("updating draft {} of {}", draft.timestamp, draft.slug);
        let req = self
            .authorized(Method::PUT, &format!("/drafts/{}", draft.timestamp))?
            .json(draft);
        let _: Acknowledgement = self.send(req).await?;
        Ok(())
    }

    pub async fn delete_draft(&self, timestamp: i64) -> Result<(), Error> {
        tracing::debug!("deleting draft {timestamp}");
        let req = self.authorized(Method::DELETE, &format!("/drafts/{timestamp}"))?;
        let _: Acknowledgement = self.send(req).await?;
        Ok(())
    }
}
