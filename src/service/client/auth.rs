use super::{Acknowledgement, ApiClient, Error};
use crate::service::session::{BearerToken, PublicUser};
use reqwest::{Method, Url};

#[derive(Debug, serde::Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, serde::Deserialize)]
struct TokenResponse {
    token: BearerToken,
}

/// What the backend knows about the cookie session.
#[derive(Debug, Default, serde::Deserialize)]
pub struct SessionStatus {
    #[serde(default)]
    pub authenticated: bool,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub sub: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

impl SessionStatus {
    pub fn user(&self) -> Option<PublicUser> {
        self.authenticated.then(|| PublicUser {
            id: self.sub.clone(),
            email: self.email.clone().unwrap_or_default(),
            name: self.name.clone(),
            image: self.image.clone(),
        })
    }
}

impl ApiClient {
    pub async fn login(&self, credentials: &Credentials) -> Result<BearerToken, Error> {
        tracing::debug!("logging in as {}", credentials.email);
        let req = self.request(Method::POST, "/auth/login")?.json(credentials);
        let res: TokenResponse = self.send(req).await?;
        Ok(res.token)
    }

    pub async fn signup(&self, credentials: &Credentials) -> Result<BearerToken, Error> {
        tracing::debug!("signing up as {}", credentials.email);
        let req = self.request(Method::POST, "/auth/signup")?.json(credentials);
        let res: TokenResponse = self.send(req).await?;
        Ok(res.token)
    }

    pub async fn logout(&self) -> Result<(), Error> {
        let req = self.request(Method::POST, "/auth/logout")?;
        let _: Acknowledgement = self.send(req).await?;
        Ok(())
    }

    pub async fn session_status(&self) -> Result<SessionStatus, Error> {
        let req = self.request(Method::GET, "/auth/session")?;
        self.send(req).await
    }

    /// The page starting the Google sign-in, to be opened in a browser.
    pub fn google_login_url(&self) -> Result<Url, Error> {
        self.url("/auth/google/login")
    }
}
