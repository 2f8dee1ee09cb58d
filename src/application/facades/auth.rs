// Session facade: who is signed in, profile updates, and the OAuth round trip.
//
// Boundaries
// - The Google OAuth flow itself runs in the browser; the client only builds the
//   login URL and reads the token back out of the redirect.

use crate::application::errors::ApiError;
use crate::application::http_client::ApiClient;
use crate::application::query::Query;
use crate::core::entities::user::{ProfileUpdate, User};
use crate::core::ports::{Method, RequestBody};
use crate::core::session::token_from_redirect;
use reqwest::Url;
use tracing::{info, warn};

#[derive(Clone)]
pub struct AuthFacade {
    client: ApiClient,
}

impl AuthFacade {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn me(&self) -> Result<User, ApiError> {
        self.client.get_json("/me", &Query::new()).await
    }

    pub async fn update_me(&self, update: &ProfileUpdate) -> Result<User, ApiError> {
        self.client.send_json(Method::Put, "/me", update).await
    }

    pub fn login_url(&self, return_to: &str) -> Result<Url, ApiError> {
        self.client.build_url(
            "/auth/google/login",
            &Query::new().with("returnTo", return_to),
        )
    }

    /// Stores the token carried by the OAuth redirect. Returns false when the
    /// URL has none, which leaves any existing session untouched.
    pub fn complete_login(&self, redirect_url: &str) -> Result<bool, ApiError> {
        match token_from_redirect(redirect_url) {
            Some(token) => {
                self.client.tokens().set(&token)?;
                info!("stored access token from login redirect");
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn is_signed_in(&self) -> bool {
        self.client.tokens().get().is_some()
    }

    /// Ends the server session. The local token is cleared even when the
    /// backend call fails.
    pub async fn logout(&self) -> Result<(), ApiError> {
        if let Err(error) = self
            .client
            .request(Method::Post, "/auth/logout", &Query::new(), RequestBody::Empty)
            .await
        {
            warn!(%error, "logout request failed");
        }
        self.client.tokens().clear()?;
        Ok(())
    }
}
