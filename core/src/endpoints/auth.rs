//! Account and session routes under `api/auth`.

use super::{Endpoint, Payload};
use crate::error::ApiError;
use crate::http::HttpMethod;
use crate::types::{
    Ack, AuthData, EmailRequest, Envelope, LoginRequest, OtpVerification, ResetPasswordRequest,
    SignUpRequest, User,
};

/// Create an account. The server replies with the unverified user and sends
/// an OTP to the given address.
#[derive(Debug, Clone)]
pub struct Register(pub SignUpRequest);

impl Endpoint for Register {
    type Response = Envelope<User>;
    const METHOD: HttpMethod = HttpMethod::Post;
    const NAME: &'static str = "register";

    fn path(&self) -> String {
        "api/auth/register".to_string()
    }

    fn payload(&self) -> Result<Payload, ApiError> {
        Payload::json(&self.0)
    }
}

#[derive(Debug, Clone)]
pub struct VerifyOtp(pub OtpVerification);

impl Endpoint for VerifyOtp {
    type Response = Envelope<AuthData>;
    const METHOD: HttpMethod = HttpMethod::Post;
    const NAME: &'static str = "verify_otp";

    fn path(&self) -> String {
        "api/auth/verify-otp".to_string()
    }

    fn payload(&self) -> Result<Payload, ApiError> {
        Payload::json(&self.0)
    }
}

#[derive(Debug, Clone)]
pub struct ResendOtp {
    pub email: String,
}

impl Endpoint for ResendOtp {
    type Response = Ack;
    const METHOD: HttpMethod = HttpMethod::Post;
    const NAME: &'static str = "resend_otp";

    fn path(&self) -> String {
        "api/auth/resend-otp".to_string()
    }

    fn payload(&self) -> Result<Payload, ApiError> {
        Payload::json(&EmailRequest {
            email: self.email.clone(),
        })
    }
}

#[derive(Debug, Clone)]
pub struct Login(pub LoginRequest);

impl Endpoint for Login {
    type Response = Envelope<AuthData>;
    const METHOD: HttpMethod = HttpMethod::Post;
    const NAME: &'static str = "login";

    fn path(&self) -> String {
        "api/auth/login".to_string()
    }

    fn payload(&self) -> Result<Payload, ApiError> {
        Payload::json(&self.0)
    }
}

#[derive(Debug, Clone)]
pub struct ForgotPassword {
    pub email: String,
}

impl Endpoint for ForgotPassword {
    type Response = Ack;
    const METHOD: HttpMethod = HttpMethod::Post;
    const NAME: &'static str = "forgot_password";

    fn path(&self) -> String {
        "api/auth/forgot-password".to_string()
    }

    fn payload(&self) -> Result<Payload, ApiError> {
        Payload::json(&EmailRequest {
            email: self.email.clone(),
        })
    }
}

#[derive(Debug, Clone)]
pub struct ResetPassword(pub ResetPasswordRequest);

impl Endpoint for ResetPassword {
    type Response = Ack;
    const METHOD: HttpMethod = HttpMethod::Post;
    const NAME: &'static str = "reset_password";

    fn path(&self) -> String {
        "api/auth/reset-password".to_string()
    }

    fn payload(&self) -> Result<Payload, ApiError> {
        Payload::json(&self.0)
    }
}

/// Change the password of the signed-in account.
///
/// Sent form-encoded. `token` lets the caller authenticate with a token that
/// has not been stored yet, e.g. straight after OTP verification.
#[derive(Debug, Clone)]
pub struct ChangePassword {
    pub current_password: String,
    pub new_password: String,
    pub token: Option<String>,
}

impl ChangePassword {
    pub fn new(current_password: impl Into<String>, new_password: impl Into<String>) -> Self {
        Self {
            current_password: current_password.into(),
            new_password: new_password.into(),
            token: None,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }
}

impl Endpoint for ChangePassword {
    type Response = Ack;
    const METHOD: HttpMethod = HttpMethod::Post;
    const NAME: &'static str = "change_password";

    fn path(&self) -> String {
        "api/auth/change-password".to_string()
    }

    fn payload(&self) -> Result<Payload, ApiError> {
        Ok(Payload::Form(vec![
            ("currentPassword", self.current_password.clone()),
            ("newPassword", self.new_password.clone()),
        ]))
    }

    fn authorization(&self) -> Option<&str> {
        self.token.as_deref().map(str::trim).filter(|t| !t.is_empty())
    }
}

#[derive(Debug, Clone, Default)]
pub struct Logout;

impl Endpoint for Logout {
    type Response = Ack;
    const METHOD: HttpMethod = HttpMethod::Post;
    const NAME: &'static str = "logout";

    fn path(&self) -> String {
        "api/auth/logout".to_string()
    }
}
