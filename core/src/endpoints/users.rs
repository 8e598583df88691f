use super::{Endpoint, Payload, Query};
use crate::error::ApiError;
use crate::http::HttpMethod;
use crate::types::{Envelope, ProfileUpdate, User};

/// Profile of the account the bearer token belongs to.
#[derive(Debug, Clone, Default)]
pub struct GetProfile;

impl Endpoint for GetProfile {
    type Response = Envelope<User>;
    const METHOD: HttpMethod = HttpMethod::Get;
    const NAME: &'static str = "get_profile";

    fn path(&self) -> String {
        "api/users/profile".to_string()
    }
}

#[derive(Debug, Clone)]
pub struct UpdateProfile(pub ProfileUpdate);

impl Endpoint for UpdateProfile {
    type Response = Envelope<User>;
    const METHOD: HttpMethod = HttpMethod::Put;
    const NAME: &'static str = "update_profile";

    fn path(&self) -> String {
        "api/users/profile".to_string()
    }

    fn payload(&self) -> Result<Payload, ApiError> {
        Payload::json(&self.0)
    }
}

#[derive(Debug, Clone)]
pub struct FindUserByEmail {
    pub email: String,
}

impl Endpoint for FindUserByEmail {
    type Response = Envelope<User>;
    const METHOD: HttpMethod = HttpMethod::Get;
    const NAME: &'static str = "find_user_by_email";

    fn path(&self) -> String {
        "api/users/by-email".to_string()
    }

    fn query(&self) -> Vec<(&'static str, String)> {
        Query::new().put("email", &self.email).finish()
    }
}
