//! Request-time failures of the blog server.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use maud::{html, DOCTYPE};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SiteError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid metadata index: {0}")]
    Index(#[from] serde_json::Error),

    #[error("Template error: {0}")]
    Template(#[from] handlebars::TemplateError),

    #[error("Render error: {0}")]
    Render(#[from] handlebars::RenderError),
}

impl SiteError {
    pub const fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

/// Built without the template registry so it still works when that is what failed.
pub fn error_page(status: StatusCode) -> String {
    let reason = status.canonical_reason().unwrap_or("Error");
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                title { (reason) }
            }
            body {
                main {
                    h1 { (status.as_u16()) " " (reason) }
                    p { "Something went wrong while loading this page." }
                    a href="/" { "Home" }
                }
            }
        }
    }
    .into_string()
}

impl IntoResponse for SiteError {
    fn into_response(self) -> Response {
        log::error!("{self}");
        let status = self.status_code();
        // details stay in the log
        (status, Html(error_page(status))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_become_generic_500_pages() {
        let err = SiteError::from(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "build/meta.json",
        ));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn error_page_hides_details() {
        let page = error_page(StatusCode::INTERNAL_SERVER_ERROR);
        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.contains("500 Internal Server Error"));
    }
}
