use crate::domain::model::{Credentials, LoginRequest, LogoutRequest};
use std::sync::atomic::{AtomicI64, Ordering};

/// Sophos/Cyberoam request mode for a login.
pub const LOGIN_MODE: &str = "191";
/// Sophos/Cyberoam request mode for a logout.
pub const LOGOUT_MODE: &str = "193";
pub const PRODUCT_TYPE: &str = "0";

/// Builds the vendor form bodies. The field set is fixed by the portal:
/// leaving any field out makes it reject the login without saying why.
///
/// The `a` nonce never goes backwards between calls on the same builder,
/// even if the wall clock is stepped back.
#[derive(Debug, Default)]
pub struct LoginRequestBuilder {
    last_nonce: AtomicI64,
}

impl LoginRequestBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn build(&self, credentials: &Credentials) -> LoginRequest {
        self.build_at(credentials, chrono::Utc::now().timestamp_millis())
    }

    pub fn build_logout(&self, username: &str) -> LogoutRequest {
        LogoutRequest {
            mode: LOGOUT_MODE,
            username: username.to_string(),
            a: self.next_nonce(chrono::Utc::now().timestamp_millis()),
            producttype: PRODUCT_TYPE,
        }
    }

    /// Same as [`build`](Self::build) with an explicit clock reading.
    pub fn build_at(&self, credentials: &Credentials, now_millis: i64) -> LoginRequest {
        LoginRequest {
            mode: LOGIN_MODE,
            username: credentials.username.clone(),
            password: credentials.password.clone(),
            a: self.next_nonce(now_millis),
            producttype: PRODUCT_TYPE,
        }
    }

    fn next_nonce(&self, now_millis: i64) -> i64 {
        let previous = self.last_nonce.fetch_max(now_millis, Ordering::SeqCst);
        previous.max(now_millis)
    }
}
