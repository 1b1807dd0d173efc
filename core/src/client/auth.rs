use super::models::{
    LoginRequest, LoginResponse, SetupTwoFactorRequest, VerifyTotpRequest, VerifyTwoFactorRequest,
};
use super::ApiClient;
use crate::error::ApiError;
use crate::session::TotpProvisioning;
use crate::transport::{ApiRequest, Credentials};

/// `/auth/*` endpoints. Login and 2FA calls are anonymous; unlock carries the
/// session token but never triggers a refresh.
#[derive(Clone)]
pub struct AuthApi {
    client: ApiClient,
}

impl AuthApi {
    pub(crate) fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn login(
        &self,
        username: &str,
        password: &str,
        totp_code: Option<&str>,
    ) -> Result<LoginResponse, ApiError> {
        let req = ApiRequest::post("/auth/login").anonymous().json(&LoginRequest {
            username,
            password,
            totp_code,
        });
        self.client.execute_json(req).await
    }

    pub async fn setup_two_factor(
        &self,
        username: &str,
        password: &str,
    ) -> Result<TotpProvisioning, ApiError> {
        let req = ApiRequest::post("/auth/setup-2fa")
            .anonymous()
            .json(&SetupTwoFactorRequest { username, password });
        self.client.execute_json(req).await
    }

    pub async fn verify_two_factor(
        &self,
        username: &str,
        password: &str,
        totp_code: &str,
    ) -> Result<LoginResponse, ApiError> {
        let req = ApiRequest::post("/auth/verify-2fa")
            .anonymous()
            .json(&VerifyTwoFactorRequest {
                username,
                password,
                totp_code,
            });
        self.client.execute_json(req).await
    }

    /// Checks a TOTP code for the signed-in user (screen unlock).
    pub async fn verify_totp(&self, totp_code: &str) -> Result<(), ApiError> {
        let req = ApiRequest::post("/auth/verify-totp")
            .credentials(Credentials::SessionNoRefresh)
            .json(&VerifyTotpRequest { totp_code });
        self.client.execute_unit(req).await
    }
}
