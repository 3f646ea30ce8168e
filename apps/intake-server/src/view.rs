//! Index page view model.

use askama::Template;
use intake_core::{Configuration, PAGE_TITLE};

use crate::error::ApiError;

/// The intake form, showing the reference the next document will get.
#[derive(Debug, Template)]
#[template(path = "index.html")]
pub struct IndexPage {
    pub title: String,
    pub reference: String,
    pub city: String,
}

impl IndexPage {
    pub fn new(reference: String, config: &Configuration) -> Self {
        IndexPage {
            title: PAGE_TITLE.to_string(),
            reference,
            city: config.test_center.city.clone(),
        }
    }

    /// Renders the page to HTML.
    pub fn to_html(&self) -> Result<String, ApiError> {
        self.render().map_err(|e| ApiError::Render(e.to_string()))
    }
}
