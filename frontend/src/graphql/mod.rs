use crate::error::FrontendError;
use graphql_client::GraphQLQuery;
use graphql_client::Response;
use graphql_client::reqwest::post_graphql;
use lazy_static::lazy_static;
use reqwest::header::{AUTHORIZATION, HeaderMap};

pub mod anonymous;
pub mod authenticated;

lazy_static! {
    static ref GRAPHQL_AUTHENTICATED_URL: String = format!("{}/graphql", host());
    static ref GRAPHQL_ANONYMOUS_URL: String = format!("{}/graphql_anonymous", host());
}

pub fn host() -> String {
    let location = web_sys::window().expect("not running in a browser").location();
    let host = location.host().unwrap_or_default();
    let protocol = location.protocol().unwrap_or_default();
    format!("{protocol}//{host}")
}

/// Send Graphql-Query to server, authenticated by a device token
pub async fn query_authenticated<Q: GraphQLQuery>(
    token: &str,
    request: Q::Variables,
) -> Result<Q::ResponseData, FrontendError> {
    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, format!("Bearer {token}").parse()?);
    let client = reqwest::Client::builder()
        .default_headers(headers)
        .build()?;
    let response =
        post_graphql::<Q, _>(&client, GRAPHQL_AUTHENTICATED_URL.as_str(), request).await?;
    response_data(response)
}
pub async fn query_anonymous<Q: GraphQLQuery>(
    request: Q::Variables,
) -> Result<Q::ResponseData, FrontendError> {
    let client = reqwest::Client::builder().build()?;
    let response = post_graphql::<Q, _>(&client, GRAPHQL_ANONYMOUS_URL.as_str(), request).await?;
    response_data(response)
}

fn response_data<D>(response: Response<D>) -> Result<D, FrontendError> {
    match (response.data, response.errors) {
        (Some(data), _) => Ok(data),
        (None, Some(errors)) if !errors.is_empty() => Err(FrontendError::Graphql(errors)),
        (None, _) => Err(FrontendError::MissingData),
    }
}
