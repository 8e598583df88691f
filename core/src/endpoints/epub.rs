//! EPUB transport. The server downloads and unpacks the book; the client
//! only receives metadata, the chapter list and chapter XHTML.

use super::{Endpoint, Payload, Query};
use crate::error::ApiError;
use crate::http::HttpMethod;
use crate::types::{ChapterContent, EpubChapter, EpubMetadata, EpubUrl, EpubValidation, Envelope};

#[derive(Debug, Clone)]
pub struct ValidateEpubUrl {
    pub url: String,
}

impl Endpoint for ValidateEpubUrl {
    type Response = Envelope<EpubValidation>;
    const METHOD: HttpMethod = HttpMethod::Post;
    const NAME: &'static str = "validate_epub_url";

    fn path(&self) -> String {
        "api/epub/validate".to_string()
    }

    fn payload(&self) -> Result<Payload, ApiError> {
        Payload::json(&EpubUrl {
            url: self.url.clone(),
        })
    }
}

#[derive(Debug, Clone)]
pub struct GetEpubMetadata {
    pub url: String,
}

impl Endpoint for GetEpubMetadata {
    type Response = Envelope<EpubMetadata>;
    const METHOD: HttpMethod = HttpMethod::Get;
    const NAME: &'static str = "get_epub_metadata";

    fn path(&self) -> String {
        "api/epub/metadata".to_string()
    }

    fn query(&self) -> Vec<(&'static str, String)> {
        Query::new().put("url", &self.url).finish()
    }
}

#[derive(Debug, Clone)]
pub struct GetEpubChapters {
    pub url: String,
}

impl Endpoint for GetEpubChapters {
    type Response = Envelope<Vec<EpubChapter>>;
    const METHOD: HttpMethod = HttpMethod::Get;
    const NAME: &'static str = "get_epub_chapters";

    fn path(&self) -> String {
        "api/epub/chapters".to_string()
    }

    fn query(&self) -> Vec<(&'static str, String)> {
        Query::new().put("url", &self.url).finish()
    }
}

#[derive(Debug, Clone)]
pub struct GetChapterContent {
    pub url: String,
    pub chapter_id: String,
}

impl Endpoint for GetChapterContent {
    type Response = Envelope<ChapterContent>;
    const METHOD: HttpMethod = HttpMethod::Get;
    const NAME: &'static str = "get_chapter_content";

    fn path(&self) -> String {
        "api/epub/chapter".to_string()
    }

    fn query(&self) -> Vec<(&'static str, String)> {
        Query::new()
            .put("url", &self.url)
            .put("chapterId", &self.chapter_id)
            .finish()
    }
}
