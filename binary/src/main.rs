use actix_web::{
    App, HttpRequest, HttpServer, ResponseError,
    http::{StatusCode, header::AUTHORIZATION},
    web::{self, Data},
};
use actix_web_static_files::ResourceFiles;
use async_graphql_actix_web::{GraphQLRequest, GraphQLResponse};
use backend::{
    config::CONFIG,
    device::DeviceStore,
    graphql::{
        AnonymousGraphqlSchema, AuthenticatedGraphqlSchema, LoginSettings,
        create_anonymous_schema, create_schema,
    },
};
use chrono::Utc;
use log::info;
use std::{net::SocketAddr, sync::Arc};
use thiserror::Error;
use tracing_actix_web::TracingLogger;

include!(concat!(env!("OUT_DIR"), "/generated.rs"));

#[derive(Error, Debug)]
enum ServerError {
    #[error("Missing bearer token")]
    MissingToken,
    #[error("Unknown or expired token")]
    InvalidToken,
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        StatusCode::UNAUTHORIZED
    }
}

fn bearer_token(request: &HttpRequest) -> Option<&str> {
    request
        .headers()
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

async fn graphql_authenticated(
    schema: Data<AuthenticatedGraphqlSchema>,
    store: Data<DeviceStore>,
    http_request: HttpRequest,
    request: GraphQLRequest,
) -> Result<GraphQLResponse, ServerError> {
    let token = bearer_token(&http_request).ok_or(ServerError::MissingToken)?;
    let session = store
        .authenticate(token, Utc::now())
        .await
        .ok_or(ServerError::InvalidToken)?;
    Ok(schema.execute(request.into_inner().data(session)).await.into())
}

async fn graphql_anonymous(
    schema: Data<AnonymousGraphqlSchema>,
    request: GraphQLRequest,
) -> GraphQLResponse {
    schema.execute(request.into_inner()).await.into()
}

fn configure_graphql(
    store: Arc<DeviceStore>,
    schema: AuthenticatedGraphqlSchema,
    anonymous_schema: AnonymousGraphqlSchema,
) -> impl Fn(&mut web::ServiceConfig) + Clone {
    move |cfg: &mut web::ServiceConfig| {
        cfg.app_data(Data::new(schema.clone()))
            .app_data(Data::new(anonymous_schema.clone()))
            .app_data(Data::from(store.clone()))
            .route("/graphql", web::post().to(graphql_authenticated))
            .route("/graphql_anonymous", web::post().to(graphql_anonymous));
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));
    let store = Arc::new(DeviceStore::default());
    let schema = create_schema(store.clone());
    let anonymous_schema = create_anonymous_schema(
        store.clone(),
        LoginSettings {
            users: CONFIG.user_directory(),
            device_lifetime: CONFIG.device_lifetime(),
        },
    );
    let graphql = configure_graphql(store, schema, anonymous_schema);
    let bind_address = SocketAddr::new(CONFIG.server_bind_address(), CONFIG.server_port());
    info!("Listening on {bind_address}");
    HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .configure(graphql.clone())
            .service(ResourceFiles::new("/", generate()).resolve_not_found_to_root())
    })
    .bind(bind_address)?
    .run()
    .await
}
