use crate::api::models::{ArticleResponse, ErrorResponse, RecipeQueryRequest};
use crate::{Error, Result};
use reqwest::Client;

/// Request an article from a running server and print it
pub async fn query(server_url: &str, query: &str) -> Result<()> {
    let response = request_article(server_url, query).await?;

    println!("{}", response.html);
    eprintln!("\n✓ {}", response.summary);

    Ok(())
}

/// POST the query to `/recipe-query` and decode the reply
pub async fn request_article(server_url: &str, query: &str) -> Result<ArticleResponse> {
    let client = Client::new();
    let url = format!("{}/recipe-query", server_url.trim_end_matches('/'));

    let response = client
        .post(&url)
        .json(&RecipeQueryRequest {
            query: query.to_string(),
        })
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let body: ErrorResponse = response.json().await?;
        let message = match body.details {
            Some(details) => format!("{}: {details}", body.error),
            None => body.error,
        };
        return Err(if status.is_client_error() {
            Error::Validation(message)
        } else {
            Error::Generation(message)
        });
    }

    Ok(response.json().await?)
}
