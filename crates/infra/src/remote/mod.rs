//! Authority that delegates every operation to a remote identity service.
//!
//! Each operation is one JSON request/response over HTTP. This side owns no
//! key material; the shared [`reqwest::Client`] pools connections and is safe
//! for concurrent use. Every call is bounded by the configured timeout.
//!
//! Failure classes:
//! - the remote answered with a 4xx: [`AuthError::RemoteRejected`]
//! - the remote could not be reached, answered 5xx, or sent an unreadable
//!   reply: [`AuthError::Unavailable`]
//! - a register/login/refresh call timed out: [`AuthError::OutcomeUnknown`],
//!   since the remote may already have applied it
//!
//! No retries.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;

use forum_auth::rpc::{
    HEALTH_PATH, LOGIN_PATH, REFRESH_PATH, REGISTER_PATH, RefreshRequest, RpcError, SessionReply,
    VALIDATE_PATH, ValidateReply, ValidateRequest,
};
use forum_auth::{AuthError, Authority, AuthorityInitError, Session, TokenPair};
use forum_core::{Credentials, Identity, Registration, SubjectId};

#[derive(Debug, Clone)]
pub struct RemoteConfig {
    /// Base URL of the identity service, e.g. `http://127.0.0.1:50051`.
    pub address: String,
    /// Upper bound for a whole call, connect included.
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl RemoteConfig {
    pub fn new(address: impl Into<String>, timeout: Duration) -> Self {
        Self {
            address: address.into(),
            timeout,
            connect_timeout: timeout,
        }
    }
}

pub struct RemoteAuthority {
    client: reqwest::Client,
    base_url: String,
}

/// Whether a call may change remote state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Effect {
    ReadOnly,
    Mutating,
}

impl RemoteAuthority {
    /// Build the channel and probe the service once.
    ///
    /// Failure here is a startup error; there is no lazy reconnect path.
    pub async fn connect(config: RemoteConfig) -> Result<Self, AuthorityInitError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| AuthorityInitError::ConnectionUnavailable(e.to_string()))?;
        let base_url = config.address.trim_end_matches('/').to_string();

        let probe = client
            .get(format!("{base_url}{HEALTH_PATH}"))
            .send()
            .await
            .map_err(|e| AuthorityInitError::ConnectionUnavailable(e.to_string()))?;
        if !probe.status().is_success() {
            return Err(AuthorityInitError::ConnectionUnavailable(format!(
                "health probe returned {}",
                probe.status()
            )));
        }

        tracing::info!(address = %base_url, "connected to identity service");
        Ok(Self { client, base_url })
    }

    async fn call<Req, Resp>(
        &self,
        path: &str,
        body: &Req,
        effect: Effect,
    ) -> Result<Resp, AuthError>
    where
        Req: Serialize + ?Sized,
        Resp: DeserializeOwned,
    {
        let res = self
            .client
            .post(format!("{}{}", self.base_url, path))
            .json(body)
            .send()
            .await
            .map_err(|e| transport_error(path, e, effect))?;

        let status = res.status();
        if status.is_success() {
            return res.json::<Resp>().await.map_err(|e| {
                if e.is_timeout() {
                    transport_error(path, e, effect)
                } else {
                    AuthError::Unavailable(format!("{path}: unreadable reply: {e}"))
                }
            });
        }

        let detail = res.json::<RpcError>().await.ok();
        if status.is_client_error() {
            let (code, message) = match detail {
                Some(d) => (d.code, d.error),
                None => ("rejected".to_string(), status.to_string()),
            };
            tracing::debug!(path, %status, %code, "identity service rejected call");
            return Err(AuthError::RemoteRejected { code, message });
        }

        let message = detail.map(|d| d.error).unwrap_or_default();
        tracing::warn!(path, %status, %message, "identity service failed");
        Err(AuthError::Unavailable(format!("{path}: {status} {message}")))
    }
}

fn transport_error(path: &str, e: reqwest::Error, effect: Effect) -> AuthError {
    tracing::warn!(path, error = %e, "identity service call failed");
    if e.is_timeout() && effect == Effect::Mutating {
        AuthError::OutcomeUnknown(format!("{path}: {e}"))
    } else {
        AuthError::Unavailable(format!("{path}: {e}"))
    }
}

fn into_session(reply: SessionReply) -> Session {
    let tokens = TokenPair {
        access_token: reply.access_token,
        refresh_token: reply.refresh_token,
    };
    let user = reply.user;
    let identity = Identity::new(SubjectId::new(user.id), user.username, user.email);
    Session::new(tokens, identity)
}

#[async_trait]
impl Authority for RemoteAuthority {
    async fn register(&self, registration: Registration) -> Result<Session, AuthError> {
        let reply: SessionReply = self.call(REGISTER_PATH, &registration, Effect::Mutating).await?;
        Ok(into_session(reply))
    }

    async fn login(&self, credentials: Credentials) -> Result<Session, AuthError> {
        let reply: SessionReply = self.call(LOGIN_PATH, &credentials, Effect::Mutating).await?;
        Ok(into_session(reply))
    }

    async fn validate(&self, access_token: &str) -> Result<SubjectId, AuthError> {
        let request = ValidateRequest {
            token: access_token.to_string(),
        };
        let reply: ValidateReply = self.call(VALIDATE_PATH, &request, Effect::ReadOnly).await?;
        if !reply.valid {
            return Err(AuthError::RemoteRejected {
                code: "invalid_token".to_string(),
                message: reply.error.unwrap_or_else(|| "invalid token".to_string()),
            });
        }
        // Only the id is trusted; any profile fields in the reply are dropped.
        match reply.user_id {
            Some(id) if id != 0 => Ok(SubjectId::new(id)),
            _ => Err(AuthError::Unavailable(
                "validate: valid reply carries no user id".to_string(),
            )),
        }
    }

    async fn refresh(&self, refresh_token: &str) -> Result<Session, AuthError> {
        let request = RefreshRequest {
            refresh_token: refresh_token.to_string(),
        };
        let reply: SessionReply = self.call(REFRESH_PATH, &request, Effect::Mutating).await?;
        let tokens = TokenPair {
            access_token: reply.access_token,
            refresh_token: reply.refresh_token,
        };
        Ok(Session::refreshed(tokens, SubjectId::new(reply.user.id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn connect_to_closed_port_is_connection_unavailable() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let config = RemoteConfig::new(format!("http://{addr}"), Duration::from_millis(500));
        let err = RemoteAuthority::connect(config).await.err().unwrap();
        assert!(matches!(err, AuthorityInitError::ConnectionUnavailable(_)));
    }
}
