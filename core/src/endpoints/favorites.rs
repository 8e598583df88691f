use super::{segment, Endpoint, Payload};
use crate::error::ApiError;
use crate::http::HttpMethod;
use crate::types::{Ack, Envelope, Favorite, FavoriteRequest};

#[derive(Debug, Clone)]
pub struct ListFavorites {
    pub user_id: String,
}

impl ListFavorites {
    pub fn new(user_id: impl ToString) -> Self {
        Self {
            user_id: user_id.to_string(),
        }
    }
}

impl Endpoint for ListFavorites {
    type Response = Envelope<Vec<Favorite>>;
    const METHOD: HttpMethod = HttpMethod::Get;
    const NAME: &'static str = "list_favorites";

    fn path(&self) -> String {
        format!("api/favorites/{}", segment(&self.user_id))
    }
}

#[derive(Debug, Clone)]
pub struct AddFavorite {
    pub user_id: String,
    pub book_id: String,
}

impl AddFavorite {
    pub fn new(user_id: impl ToString, book_id: impl ToString) -> Self {
        Self {
            user_id: user_id.to_string(),
            book_id: book_id.to_string(),
        }
    }
}

impl Endpoint for AddFavorite {
    type Response = Envelope<Favorite>;
    const METHOD: HttpMethod = HttpMethod::Post;
    const NAME: &'static str = "add_favorite";

    fn path(&self) -> String {
        "api/favorites".to_string()
    }

    fn payload(&self) -> Result<Payload, ApiError> {
        Payload::json(&FavoriteRequest {
            user_id: self.user_id.clone(),
            book_id: self.book_id.clone(),
        })
    }
}

#[derive(Debug, Clone)]
pub struct RemoveFavorite {
    pub user_id: String,
    pub book_id: String,
}

impl RemoveFavorite {
    pub fn new(user_id: impl ToString, book_id: impl ToString) -> Self {
        Self {
            user_id: user_id.to_string(),
            book_id: book_id.to_string(),
        }
    }
}

impl Endpoint for RemoveFavorite {
    type Response = Ack;
    const METHOD: HttpMethod = HttpMethod::Delete;
    const NAME: &'static str = "remove_favorite";

    fn path(&self) -> String {
        format!(
            "api/favorites/{}/{}",
            segment(&self.user_id),
            segment(&self.book_id)
        )
    }
}
