use super::{Acknowledgement, ApiClient, Error};
use reqwest::Method;

/// Professional profile of the signed-in user.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub professional_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bar_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub court_preferences: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature_block: Option<String>,
}

impl Profile {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

impl ApiClient {
    pub async fn get_profile(&self) -> Result<Profile, Error> {
        let req = self.authorized(Method::GET, "/user/me")?;
        self.send(req).await
    }

    /// Only the fields that are set are sent, the others stay untouched.
    pub async fn update_profile(&self, changes: &Profile) -> Result<(), Error> {
        let req = self.authorized(Method::PUT, "/user/me")?.json(changes);
        let _: Acknowledgement = self.send(req).await?;
        Ok(())
    }

    /// Deletes the account of the signed-in user on the server.
    pub async fn delete_account(&self) -> Result<(), Error> {
        tracing::debug!("deleting account");
        let req = self.authorized(Method::DELETE, "/user/me")?;
        let _: Acknowledgement = self.send(req).await?;
        Ok(())
    }
}
