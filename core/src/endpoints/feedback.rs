use super::{segment, Endpoint, Payload, Query};
use crate::error::ApiError;
use crate::http::HttpMethod;
use crate::types::{Ack, Envelope, Feedback, FeedbackUpdate, NewFeedback};

#[derive(Debug, Clone)]
pub struct CreateFeedback(pub NewFeedback);

impl Endpoint for CreateFeedback {
    type Response = Envelope<Feedback>;
    const METHOD: HttpMethod = HttpMethod::Post;
    const NAME: &'static str = "create_feedback";

    fn path(&self) -> String {
        "api/feedback".to_string()
    }

    fn payload(&self) -> Result<Payload, ApiError> {
        Payload::json(&self.0)
    }
}

/// Feedback submitted by the signed-in user.
#[derive(Debug, Clone, Default)]
pub struct ListMyFeedback;

impl Endpoint for ListMyFeedback {
    type Response = Envelope<Vec<Feedback>>;
    const METHOD: HttpMethod = HttpMethod::Get;
    const NAME: &'static str = "list_my_feedback";

    fn path(&self) -> String {
        "api/feedback/mine".to_string()
    }
}

#[derive(Debug, Clone)]
pub struct GetFeedback {
    pub id: String,
}

impl GetFeedback {
    pub fn new(id: impl ToString) -> Self {
        Self { id: id.to_string() }
    }
}

impl Endpoint for GetFeedback {
    type Response = Envelope<Feedback>;
    const METHOD: HttpMethod = HttpMethod::Get;
    const NAME: &'static str = "get_feedback";

    fn path(&self) -> String {
        format!("api/feedback/{}", segment(&self.id))
    }
}

#[derive(Debug, Clone)]
pub struct UpdateFeedback {
    pub id: String,
    pub update: FeedbackUpdate,
}

impl Endpoint for UpdateFeedback {
    type Response = Envelope<Feedback>;
    const METHOD: HttpMethod = HttpMethod::Put;
    const NAME: &'static str = "update_feedback";

    fn path(&self) -> String {
        format!("api/feedback/{}", segment(&self.id))
    }

    fn payload(&self) -> Result<Payload, ApiError> {
        Payload::json(&self.update)
    }
}

#[derive(Debug, Clone)]
pub struct DeleteFeedback {
    pub id: String,
}

impl DeleteFeedback {
    pub fn new(id: impl ToString) -> Self {
        Self { id: id.to_string() }
    }
}

impl Endpoint for DeleteFeedback {
    type Response = Ack;
    const METHOD: HttpMethod = HttpMethod::Delete;
    const NAME: &'static str = "delete_feedback";

    fn path(&self) -> String {
        format!("api/feedback/{}", segment(&self.id))
    }
}

/// Admin listing of every user's feedback.
#[derive(Debug, Clone, Default)]
pub struct ListAllFeedback {
    pub status: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl Endpoint for ListAllFeedback {
    type Response = Envelope<Vec<Feedback>>;
    const METHOD: HttpMethod = HttpMethod::Get;
    const NAME: &'static str = "list_all_feedback";

    fn path(&self) -> String {
        "api/admin/feedback".to_string()
    }

    fn query(&self) -> Vec<(&'static str, String)> {
        Query::new()
            .opt("status", self.status.as_deref())
            .opt("page", self.page)
            .opt("limit", self.limit)
            .finish()
    }
}
