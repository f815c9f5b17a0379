use gloo::storage::errors::StorageError;
use patternfly_yew::prelude::{Alert, AlertGroup, AlertType};
use reqwest::header::InvalidHeaderValue;
use thiserror::Error;
use yew::{Html, ToHtml, html};

#[derive(Error, Debug)]
pub enum FrontendError {
    #[error("Graphql Execution Error")]
    Graphql(Vec<graphql_client::Error>),
    #[error("Error on http request")]
    Reqwest(#[from] reqwest::Error),
    #[error("Invalid http header")]
    InvalidHeader(#[from] InvalidHeaderValue),
    #[error("Cannot access browser storage")]
    Storage(#[from] StorageError),
    #[error("No data received")]
    MissingData,
}

impl ToHtml for FrontendError {
    fn to_html(&self) -> Html {
        match self {
            FrontendError::Graphql(graphql_error) => {
                let graphql_error = graphql_error.clone();
                html! {
                    <AlertGroup>
                        <Alert inline=true title="Error from Server" r#type={AlertType::Danger}>
                            <ul>
                        {
                          graphql_error.iter().map(|error| {
                                let message=&error.message;
                                if let Some(path) = error
                                    .path.as_ref()
                                    .map(|p|
                                        p.iter()
                                            .map(|path| path.to_string())
                                            .collect::<Vec<String>>()
                                            .join("/")
                                    )
                                {
                                    html!{<li>{message}{" at "}{path}</li>}
                                }else{
                                    html!{<li>{message}</li>}
                                }
                            }).collect::<Html>()
                        }
                            </ul>
                        </Alert>
                    </AlertGroup>
                }
            }
            FrontendError::Reqwest(reqwest_error) => {
                html! {
                    <AlertGroup>
                        <Alert inline=true title="Cannot call Server" r#type={AlertType::Danger}>{reqwest_error.to_string()}</Alert>
                    </AlertGroup>
                }
            }
            FrontendError::InvalidHeader(header_error) => {
                html! {
                    <AlertGroup>
                        <Alert inline=true title="Header Error" r#type={AlertType::Danger}>{header_error.to_string()}</Alert>
                    </AlertGroup>
                }
            }
            FrontendError::Storage(storage_error) => {
                html! {
                    <AlertGroup>
                        <Alert inline=true title="Storage Error" r#type={AlertType::Danger}>{storage_error.to_string()}</Alert>
                    </AlertGroup>
                }
            }
            FrontendError::MissingData => {
                html! {
                    <AlertGroup>
                        <Alert inline=true title="Missing Data" r#type={AlertType::Danger}>{"No data received from server"}</Alert>
                    </AlertGroup>
                }
            }
        }
    }
}
