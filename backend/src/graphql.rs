use crate::{
    Error,
    config::UserDirectory,
    context::Session,
    device::{Device, DeviceStore},
};
use async_graphql::{Context, EmptySubscription, Object, Schema, SimpleObject};
use chrono::{TimeDelta, Utc};
use scalars::Time;
use std::sync::Arc;

pub mod scalars;

pub type AuthenticatedGraphqlSchema =
    Schema<QueryAuthenticated, MutationAuthenticated, EmptySubscription>;
pub type AnonymousGraphqlSchema = Schema<QueryAnonymous, MutationAnonymous, EmptySubscription>;

pub struct QueryAuthenticated;
pub struct MutationAuthenticated;
pub struct QueryAnonymous;
pub struct MutationAnonymous;

/// Everything the anonymous schema needs to turn a login into a device.
#[derive(Debug, Clone)]
pub struct LoginSettings {
    pub users: UserDirectory,
    pub device_lifetime: TimeDelta,
}

impl Default for LoginSettings {
    fn default() -> Self {
        Self {
            users: UserDirectory::default(),
            device_lifetime: TimeDelta::days(30),
        }
    }
}

/// Requests must carry a [`Session`] as request data.
pub fn create_schema(store: Arc<DeviceStore>) -> AuthenticatedGraphqlSchema {
    Schema::build(QueryAuthenticated, MutationAuthenticated, EmptySubscription)
        .data(store)
        .finish()
}
pub fn create_anonymous_schema(
    store: Arc<DeviceStore>,
    login: LoginSettings,
) -> AnonymousGraphqlSchema {
    Schema::build(QueryAnonymous, MutationAnonymous, EmptySubscription)
        .data(store)
        .data(login)
        .finish()
}

fn session<'a>(ctx: &'a Context<'_>) -> async_graphql::Result<&'a Session> {
    ctx.data::<Session>()
        .map_err(|_| Error::NotAuthenticated.into())
}

#[Object]
impl QueryAuthenticated {
    /// all devices of the current user
    async fn devices(&self, ctx: &Context<'_>) -> async_graphql::Result<Vec<GraphqlDevice>> {
        let session = session(ctx)?;
        let store = ctx.data::<Arc<DeviceStore>>()?;
        Ok(store
            .list(&session.user)
            .await
            .into_iter()
            .map(GraphqlDevice::from)
            .collect())
    }
    /// the device authenticating this request
    async fn current_device(&self, ctx: &Context<'_>) -> async_graphql::Result<GraphqlDevice> {
        let session = session(ctx)?;
        let store = ctx.data::<Arc<DeviceStore>>()?;
        Ok(store.get(&session.user, session.device_id).await?.into())
    }
    async fn current_user(&self, ctx: &Context<'_>) -> async_graphql::Result<User> {
        let session = session(ctx)?;
        Ok(User {
            name: session.user.to_string(),
        })
    }
}

#[Object]
impl MutationAuthenticated {
    async fn remove_device(
        &self,
        ctx: &Context<'_>,
        id: i64,
    ) -> async_graphql::Result<GraphqlDevice> {
        let session = session(ctx)?;
        let store = ctx.data::<Arc<DeviceStore>>()?;
        Ok(store.remove(&session.user, id).await?.into())
    }
    async fn update_device(
        &self,
        ctx: &Context<'_>,
        id: i64,
        name: String,
        expires_at: Time,
    ) -> async_graphql::Result<GraphqlDevice> {
        let session = session(ctx)?;
        let store = ctx.data::<Arc<DeviceStore>>()?;
        Ok(store
            .update(&session.user, id, &name, expires_at.into())
            .await?
            .into())
    }
    /// creates a new device and returns its token, the token cannot be fetched later
    async fn create_device(
        &self,
        ctx: &Context<'_>,
        name: String,
        expires_at: Time,
    ) -> async_graphql::Result<AddDevice> {
        let session = session(ctx)?;
        let store = ctx.data::<Arc<DeviceStore>>()?;
        let (device, token) = store
            .create(&session.user, &name, expires_at.into(), Utc::now())
            .await?;
        Ok(AddDevice {
            token: token.into_string(),
            device: device.into(),
        })
    }
}

#[Object]
impl QueryAnonymous {
    async fn version(&self) -> &'static str {
        env!("CARGO_PKG_VERSION")
    }
}

#[Object]
impl MutationAnonymous {
    /// checks the credentials and registers a new device for the user
    async fn login(
        &self,
        ctx: &Context<'_>,
        username: String,
        password: String,
        device_name: String,
    ) -> async_graphql::Result<AddDevice> {
        let settings = ctx.data::<LoginSettings>()?;
        if !settings.users.verify(&username, &password) {
            log::warn!("Failed login for {username}");
            return Err(Error::InvalidCredentials.into());
        }
        let store = ctx.data::<Arc<DeviceStore>>()?;
        let now = Utc::now();
        let (device, token) = store
            .create(&username, &device_name, now + settings.device_lifetime, now)
            .await?;
        Ok(AddDevice {
            token: token.into_string(),
            device: device.into(),
        })
    }
}

#[derive(SimpleObject)]
#[graphql(name = "Device")]
pub struct GraphqlDevice {
    id: i64,
    name: String,
    created_at: Time,
    expires_at: Time,
    active_at: Time,
}

impl From<Device> for GraphqlDevice {
    fn from(device: Device) -> Self {
        GraphqlDevice {
            id: device.id,
            name: device.name.into_string(),
            created_at: device.created_at.into(),
            expires_at: device.expires_at.into(),
            active_at: device.active_at.into(),
        }
    }
}

#[derive(SimpleObject)]
pub struct User {
    name: String,
}

#[derive(SimpleObject)]
pub struct AddDevice {
    token: String,
    device: GraphqlDevice,
}

#[cfg(test)]
mod test {
    use super::{LoginSettings, create_anonymous_schema, create_schema};
    use crate::{context::Session, device::DeviceStore};
    use async_graphql::Request;
    use chrono::{TimeDelta, Utc};
    use serde_json::json;
    use std::sync::Arc;

    async fn store_with_devices() -> (Arc<DeviceStore>, Session) {
        let store = Arc::new(DeviceStore::default());
        let now = Utc::now();
        let expires = now + TimeDelta::days(1);
        store.create("alice", "phone", expires, now).await.unwrap();
        let (laptop, _) = store.create("alice", "laptop", expires, now).await.unwrap();
        store.create("bob", "desktop", expires, now).await.unwrap();
        let session = Session {
            user: Box::from("alice"),
            device_id: laptop.id,
        };
        (store, session)
    }

    #[test]
    fn login_settings_hide_passwords() {
        let settings = LoginSettings {
            users: [("alice", "secret")].into_iter().collect(),
            ..Default::default()
        };
        let debug = format!("{settings:?}");
        assert!(debug.contains("alice"));
        assert!(!debug.contains("secret"));
    }

    #[tokio::test]
    async fn lists_devices_of_current_user() {
        let (store, session) = store_with_devices().await;
        let schema = create_schema(store);
        let response = schema
            .execute(
                Request::new("{ devices { id name } currentDevice { id } currentUser { name } }")
                    .data(session),
            )
            .await;
        assert!(response.errors.is_empty(), "{:?}", response.errors);
        assert_eq!(
            response.data.into_json().unwrap(),
            json!({
                "devices": [{"id": 1, "name": "phone"}, {"id": 2, "name": "laptop"}],
                "currentDevice": {"id": 2},
                "currentUser": {"name": "alice"},
            })
        );
    }

    #[tokio::test]
    async fn rejects_requests_without_session() {
        let (store, _) = store_with_devices().await;
        let schema = create_schema(store);
        let response = schema.execute("{ devices { id } }").await;
        assert_eq!(response.errors[0].message, "not authenticated");
    }

    #[tokio::test]
    async fn remove_twice_fails() {
        let (store, session) = store_with_devices().await;
        let schema = create_schema(store.clone());
        let mutation = "mutation { removeDevice(id: 1) { id } }";
        let first = schema
            .execute(Request::new(mutation).data(session.clone()))
            .await;
        assert_eq!(
            first.data.into_json().unwrap(),
            json!({"removeDevice": {"id": 1}})
        );
        let second = schema.execute(Request::new(mutation).data(session)).await;
        assert_eq!(second.errors[0].message, "device not found: 1");
        assert_eq!(store.list("alice").await.len(), 1);
    }

    #[tokio::test]
    async fn cannot_remove_foreign_device() {
        let (store, session) = store_with_devices().await;
        let schema = create_schema(store.clone());
        let response = schema
            .execute(Request::new("mutation { removeDevice(id: 3) { id } }").data(session))
            .await;
        assert_eq!(response.errors[0].message, "device not found: 3");
        assert_eq!(store.list("bob").await.len(), 1);
    }

    #[tokio::test]
    async fn update_device_sets_name_and_expiry() {
        let (store, session) = store_with_devices().await;
        let schema = create_schema(store.clone());
        let response = schema
            .execute(
                Request::new(
                    r#"mutation { updateDevice(id: 1, name: "tablet", expiresAt: "2030-01-02T03:04:05+02:00") { id name expiresAt } }"#,
                )
                .data(session),
            )
            .await;
        assert!(response.errors.is_empty(), "{:?}", response.errors);
        assert_eq!(
            response.data.into_json().unwrap(),
            json!({"updateDevice": {"id": 1, "name": "tablet", "expiresAt": "2030-01-02T01:04:05+00:00"}})
        );
    }

    #[tokio::test]
    async fn update_rejects_malformed_time() {
        let (store, session) = store_with_devices().await;
        let schema = create_schema(store);
        let response = schema
            .execute(
                Request::new(
                    r#"mutation { updateDevice(id: 1, name: "tablet", expiresAt: "tomorrow") { id } }"#,
                )
                .data(session),
            )
            .await;
        assert!(!response.errors.is_empty());
    }

    #[tokio::test]
    async fn create_device_returns_usable_token() {
        let (store, session) = store_with_devices().await;
        let schema = create_schema(store.clone());
        let response = schema
            .execute(
                Request::new(
                    r#"mutation { device: createDevice(name: "watch", expiresAt: "2099-01-01T00:00:00Z") { token device { id } } }"#,
                )
                .data(session),
            )
            .await;
        assert!(response.errors.is_empty(), "{:?}", response.errors);
        let data = response.data.into_json().unwrap();
        assert_eq!(data["device"]["device"]["id"], json!(4));
        let token = data["device"]["token"].as_str().unwrap();
        let session = store.authenticate(token, Utc::now()).await.unwrap();
        assert_eq!(session.device_id, 4);
        assert_eq!(session.user.as_ref(), "alice");
    }

    #[tokio::test]
    async fn login_checks_credentials() {
        let store = Arc::new(DeviceStore::default());
        let schema = create_anonymous_schema(
            store.clone(),
            LoginSettings {
                users: [("alice", "secret")].into_iter().collect(),
                ..Default::default()
            },
        );
        let failed = schema
            .execute(r#"mutation { login(username: "alice", password: "nope", deviceName: "web") { token } }"#)
            .await;
        assert_eq!(failed.errors[0].message, "invalid username or password");
        let ok = schema
            .execute(r#"mutation { login(username: "alice", password: "secret", deviceName: "web") { token } }"#)
            .await;
        assert!(ok.errors.is_empty(), "{:?}", ok.errors);
        let devices = store.list("alice").await;
        assert_eq!(devices.len(), 1);
        assert_eq!(devices[0].name.as_ref(), "web");
    }
}
