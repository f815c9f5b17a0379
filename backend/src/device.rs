use crate::{Error, context::Session};
use chrono::{DateTime, Utc};
use log::{debug, info};
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Device {
    pub id: i64,
    pub user: Box<str>,
    pub name: Box<str>,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub active_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct Devices {
    last_id: i64,
    by_id: BTreeMap<i64, (Device, Box<str>)>,
    by_token: HashMap<Box<str>, i64>,
}

impl Devices {
    fn owned_mut(&mut self, user: &str, id: i64) -> Result<&mut Device, Error> {
        self.by_id
            .get_mut(&id)
            .map(|(device, _)| device)
            .filter(|device| device.user.as_ref() == user)
            .ok_or(Error::DeviceNotFound(id))
    }

    fn purge_expired(&mut self, now: DateTime<Utc>) {
        let expired: Vec<i64> = self
            .by_id
            .values()
            .filter(|(device, _)| device.expires_at <= now)
            .map(|(device, _)| device.id)
            .collect();
        for id in expired {
            if let Some((device, token)) = self.by_id.remove(&id) {
                self.by_token.remove(&token);
                debug!("Device {} of {} expired", device.id, device.user);
            }
        }
    }
}

/// In-memory registry of all devices and their tokens.
#[derive(Debug, Default)]
pub struct DeviceStore {
    devices: RwLock<Devices>,
}

fn validate_name(name: &str) -> Result<Box<str>, Error> {
    let name = name.trim();
    if name.is_empty() {
        Err(Error::EmptyDeviceName)
    } else {
        Ok(Box::from(name))
    }
}

impl DeviceStore {
    /// Registers a new device for `user` and returns it together with its token.
    pub async fn create(
        &self,
        user: &str,
        name: &str,
        expires_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<(Device, Box<str>), Error> {
        let name = validate_name(name)?;
        let token: Box<str> = Uuid::new_v4().simple().to_string().into_boxed_str();
        let mut devices = self.devices.write().await;
        devices.last_id += 1;
        let device = Device {
            id: devices.last_id,
            user: Box::from(user),
            name,
            created_at: now,
            expires_at,
            active_at: now,
        };
        devices.by_token.insert(token.clone(), device.id);
        devices
            .by_id
            .insert(device.id, (device.clone(), token.clone()));
        info!("Created device {} ({}) for {user}", device.id, device.name);
        Ok((device, token))
    }

    /// Resolves a token to its session and marks the device as active.
    pub async fn authenticate(&self, token: &str, now: DateTime<Utc>) -> Option<Session> {
        let mut devices = self.devices.write().await;
        devices.purge_expired(now);
        let id = *devices.by_token.get(token)?;
        let (device, _) = devices.by_id.get_mut(&id)?;
        device.active_at = now;
        Some(Session {
            user: device.user.clone(),
            device_id: device.id,
        })
    }

    /// All devices of `user`, ordered by id.
    pub async fn list(&self, user: &str) -> Box<[Device]> {
        self.devices
            .read()
            .await
            .by_id
            .values()
            .map(|(device, _)| device)
            .filter(|device| device.user.as_ref() == user)
            .cloned()
            .collect()
    }

    pub async fn get(&self, user: &str, id: i64) -> Result<Device, Error> {
        self.devices
            .read()
            .await
            .by_id
            .get(&id)
            .map(|(device, _)| device)
            .filter(|device| device.user.as_ref() == user)
            .cloned()
            .ok_or(Error::DeviceNotFound(id))
    }

    pub async fn update(
        &self,
        user: &str,
        id: i64,
        name: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<Device, Error> {
        let name = validate_name(name)?;
        let mut devices = self.devices.write().await;
        let device = devices.owned_mut(user, id)?;
        device.name = name;
        device.expires_at = expires_at;
        info!("Updated device {id} of {user}");
        Ok(device.clone())
    }

    pub async fn remove(&self, user: &str, id: i64) -> Result<Device, Error> {
        let mut devices = self.devices.write().await;
        devices.owned_mut(user, id)?;
        let (device, token) = devices.by_id.remove(&id).ok_or(Error::DeviceNotFound(id))?;
        devices.by_token.remove(&token);
        info!("Removed device {id} of {user}");
        Ok(device)
    }
}

#[cfg(test)]
mod test {
    use super::DeviceStore;
    use crate::Error;
    use chrono::{DateTime, TimeDelta, Utc};

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-05-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[tokio::test]
    async fn ids_are_assigned_in_order() {
        let store = DeviceStore::default();
        let expires = now() + TimeDelta::days(1);
        let (first, first_token) = store.create("alice", "phone", expires, now()).await.unwrap();
        let (second, second_token) = store.create("alice", "laptop", expires, now()).await.unwrap();
        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_ne!(first_token, second_token);
        let names: Vec<_> = store
            .list("alice")
            .await
            .iter()
            .map(|d| d.name.to_string())
            .collect();
        assert_eq!(names, vec!["phone", "laptop"]);
    }

    #[tokio::test]
    async fn create_rejects_blank_name() {
        let store = DeviceStore::default();
        let result = store.create("alice", "  ", now(), now()).await;
        assert_eq!(result.unwrap_err(), Error::EmptyDeviceName);
    }

    #[tokio::test]
    async fn authenticate_marks_device_active() {
        let store = DeviceStore::default();
        let (device, token) = store
            .create("alice", "phone", now() + TimeDelta::days(1), now())
            .await
            .unwrap();
        let later = now() + TimeDelta::hours(2);
        let session = store.authenticate(&token, later).await.unwrap();
        assert_eq!(session.device_id, device.id);
        assert_eq!(session.user.as_ref(), "alice");
        assert_eq!(store.get("alice", device.id).await.unwrap().active_at, later);
        assert_eq!(store.authenticate("unknown", later).await, None);
    }

    #[tokio::test]
    async fn expired_tokens_are_purged() {
        let store = DeviceStore::default();
        let (device, token) = store
            .create("alice", "phone", now() + TimeDelta::minutes(5), now())
            .await
            .unwrap();
        assert_eq!(
            store.authenticate(&token, now() + TimeDelta::minutes(5)).await,
            None
        );
        assert_eq!(
            store.get("alice", device.id).await,
            Err(Error::DeviceNotFound(device.id))
        );
    }

    #[tokio::test]
    async fn foreign_devices_are_invisible() {
        let store = DeviceStore::default();
        let expires = now() + TimeDelta::days(1);
        let (device, _) = store.create("alice", "phone", expires, now()).await.unwrap();
        assert!(store.list("bob").await.is_empty());
        assert_eq!(
            store.update("bob", device.id, "mine", expires).await,
            Err(Error::DeviceNotFound(device.id))
        );
        assert_eq!(
            store.remove("bob", device.id).await,
            Err(Error::DeviceNotFound(device.id))
        );
    }

    #[tokio::test]
    async fn second_remove_fails() {
        let store = DeviceStore::default();
        let (device, token) = store
            .create("alice", "phone", now() + TimeDelta::days(1), now())
            .await
            .unwrap();
        assert_eq!(store.remove("alice", device.id).await.unwrap().id, device.id);
        assert_eq!(
            store.remove("alice", device.id).await,
            Err(Error::DeviceNotFound(device.id))
        );
        assert_eq!(store.authenticate(&token, now()).await, None);
    }

    #[tokio::test]
    async fn update_changes_name_and_expiry() {
        let store = DeviceStore::default();
        let (device, _) = store
            .create("alice", "phone", now() + TimeDelta::days(1), now())
            .await
            .unwrap();
        let expires = now() + TimeDelta::days(7);
        let updated = store
            .update("alice", device.id, " tablet ", expires)
            .await
            .unwrap();
        assert_eq!(updated.name.as_ref(), "tablet");
        assert_eq!(updated.expires_at, expires);
        assert_eq!(updated.created_at, device.created_at);
    }
}
