use graphql_client::GraphQLQuery;

type Time = String;

#[derive(GraphQLQuery)]
#[graphql(
    schema_path = "target/authenticated_schema.graphql",
    query_path = "src/graphql/authenticated/devices.graphql",
    response_derives = "Debug"
)]
pub struct Devices;

#[derive(GraphQLQuery)]
#[graphql(
    schema_path = "target/authenticated_schema.graphql",
    query_path = "src/graphql/authenticated/devices.graphql",
    response_derives = "Debug"
)]
pub struct RemoveDevice;

#[derive(GraphQLQuery)]
#[graphql(
    schema_path = "target/authenticated_schema.graphql",
    query_path = "src/graphql/authenticated/devices.graphql",
    response_derives = "Debug"
)]
pub struct UpdateDevice;

#[derive(GraphQLQuery)]
#[graphql(
    schema_path = "target/authenticated_schema.graphql",
    query_path = "src/graphql/authenticated/devices.graphql",
    response_derives = "Debug"
)]
pub struct CreateDevice;

#[derive(GraphQLQuery)]
#[graphql(
    schema_path = "target/authenticated_schema.graphql",
    query_path = "src/graphql/authenticated/user.graphql",
    response_derives = "Debug"
)]
pub struct CurrentUser;
