//! Home route.

use axum::response::Html;

use crate::middleware::OptionalCustomer;

/// Home page.
///
/// The real landing experience is rendered by the content tier; this handler
/// exists as the unconditional redirect target of the auth flows.
///
/// # Route
///
/// `GET /`
pub async fn home(OptionalCustomer(token): OptionalCustomer) -> Html<String> {
    let greeting = if token.is_some() {
        "Welcome back."
    } else {
        "Find your next home."
    };

    Html(format!(
        "<!doctype html>\
         <html><head><title>Haven</title></head>\
         <body><h1>Haven</h1><p>{greeting}</p></body></html>",
    ))
}
