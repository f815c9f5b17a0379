use super::edit::DeviceUpdate;
use crate::{
    data::{DeviceList, DeviceRow, UserInfo},
    error::FrontendError,
    graphql::{
        authenticated::{
            CreateDevice, CurrentUser, Devices, RemoveDevice, UpdateDevice, create_device,
            current_user, devices, remove_device, update_device,
        },
        query_authenticated,
    },
};
use futures_util::future::try_join;
use log::debug;
use std::rc::Rc;

/// Remote operations on the devices of the logged in user.
pub trait DeviceApi {
    async fn devices(&self) -> Result<DeviceList, FrontendError>;
    async fn current_user(&self) -> Result<UserInfo, FrontendError>;
    async fn remove_device(&self, id: i64) -> Result<i64, FrontendError>;
    async fn update_device(&self, update: DeviceUpdate) -> Result<i64, FrontendError>;
    /// returns the token of the new device
    async fn create_device(&self, name: &str, expires_at: &str)
    -> Result<Box<str>, FrontendError>;
}

/// State of the server after a mutation went through.
#[derive(Debug, Clone, PartialEq)]
pub struct Refreshed {
    pub devices: DeviceList,
    pub user: UserInfo,
}

/// Re-reads the device list and the current user.
pub async fn refetch<A: DeviceApi>(api: &A) -> Result<Refreshed, FrontendError> {
    let (devices, user) = try_join(api.devices(), api.current_user()).await?;
    Ok(Refreshed { devices, user })
}

pub async fn remove_device<A: DeviceApi>(api: &A, id: i64) -> Result<Refreshed, FrontendError> {
    let removed = api.remove_device(id).await?;
    debug!("Device {removed} removed");
    refetch(api).await
}

pub async fn update_device<A: DeviceApi>(
    api: &A,
    update: DeviceUpdate,
) -> Result<Refreshed, FrontendError> {
    let updated = api.update_device(update).await?;
    debug!("Device {updated} updated");
    refetch(api).await
}

pub async fn create_device<A: DeviceApi>(
    api: &A,
    name: &str,
    expires_at: &str,
) -> Result<(Box<str>, Refreshed), FrontendError> {
    let token = api.create_device(name, expires_at).await?;
    Ok((token, refetch(api).await?))
}

#[derive(Debug, Clone)]
pub struct GraphqlDeviceApi {
    token: Rc<str>,
}

impl GraphqlDeviceApi {
    pub fn new(token: Rc<str>) -> Self {
        Self { token }
    }
}

impl DeviceApi for GraphqlDeviceApi {
    async fn devices(&self) -> Result<DeviceList, FrontendError> {
        let data = query_authenticated::<Devices>(&self.token, devices::Variables {}).await?;
        Ok(DeviceList {
            devices: data
                .devices
                .into_iter()
                .map(|device| DeviceRow {
                    id: device.id,
                    name: device.name.into_boxed_str(),
                    created_at: device.created_at.into_boxed_str(),
                    expires_at: device.expires_at.into_boxed_str(),
                    active_at: device.active_at.into_boxed_str(),
                })
                .collect(),
            current_device: data.current_device.id,
        })
    }

    async fn current_user(&self) -> Result<UserInfo, FrontendError> {
        let data =
            query_authenticated::<CurrentUser>(&self.token, current_user::Variables {}).await?;
        Ok(UserInfo {
            name: data.current_user.name.into_boxed_str(),
        })
    }

    async fn remove_device(&self, id: i64) -> Result<i64, FrontendError> {
        let data =
            query_authenticated::<RemoveDevice>(&self.token, remove_device::Variables { id })
                .await?;
        Ok(data.remove_device.id)
    }

    async fn update_device(&self, update: DeviceUpdate) -> Result<i64, FrontendError> {
        let data = query_authenticated::<UpdateDevice>(
            &self.token,
            update_device::Variables {
                id: update.id,
                name: update.name.into_string(),
                expires_at: update.expires_at.into_string(),
            },
        )
        .await?;
        Ok(data.update_device.id)
    }

    async fn create_device(
        &self,
        name: &str,
        expires_at: &str,
    ) -> Result<Box<str>, FrontendError> {
        let data = query_authenticated::<CreateDevice>(
            &self.token,
            create_device::Variables {
                name: name.to_string(),
                expires_at: expires_at.to_string(),
            },
        )
        .await?;
        Ok(data.device.token.into_boxed_str())
    }
}

#[cfg(test)]
mod test {
    use super::{DeviceApi, Refreshed, create_device, remove_device, update_device};
    use crate::{
        data::{DeviceList, UserInfo, test::phone_and_laptop},
        error::FrontendError,
        pages::devices::edit::{DeviceUpdate, EditState},
    };
    use std::cell::RefCell;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Devices,
        CurrentUser,
        Remove(i64),
        Update(DeviceUpdate),
        Create(String, String),
    }

    #[derive(Default)]
    struct RecordingApi {
        calls: RefCell<Vec<Call>>,
        reject_mutations: bool,
    }

    impl RecordingApi {
        fn rejecting() -> Self {
            Self {
                reject_mutations: true,
                ..Default::default()
            }
        }
        fn record(&self, call: Call) -> Result<(), FrontendError> {
            let mutation = !matches!(call, Call::Devices | Call::CurrentUser);
            self.calls.borrow_mut().push(call);
            if mutation && self.reject_mutations {
                Err(FrontendError::Graphql(vec![]))
            } else {
                Ok(())
            }
        }
        fn calls(&self) -> Vec<Call> {
            self.calls.borrow().clone()
        }
    }

    impl DeviceApi for RecordingApi {
        async fn devices(&self) -> Result<DeviceList, FrontendError> {
            self.record(Call::Devices)?;
            Ok(phone_and_laptop())
        }
        async fn current_user(&self) -> Result<UserInfo, FrontendError> {
            self.record(Call::CurrentUser)?;
            Ok(UserInfo {
                name: Box::from("alice"),
            })
        }
        async fn remove_device(&self, id: i64) -> Result<i64, FrontendError> {
            self.record(Call::Remove(id))?;
            Ok(id)
        }
        async fn update_device(&self, update: DeviceUpdate) -> Result<i64, FrontendError> {
            let id = update.id;
            self.record(Call::Update(update))?;
            Ok(id)
        }
        async fn create_device(
            &self,
            name: &str,
            expires_at: &str,
        ) -> Result<Box<str>, FrontendError> {
            self.record(Call::Create(name.to_string(), expires_at.to_string()))?;
            Ok(Box::from("token-1"))
        }
    }

    fn expected_refresh() -> Refreshed {
        Refreshed {
            devices: phone_and_laptop(),
            user: UserInfo {
                name: Box::from("alice"),
            },
        }
    }

    #[tokio::test]
    async fn delete_removes_once_and_refetches_both() {
        let api = RecordingApi::default();
        let refreshed = remove_device(&api, 5).await.unwrap();
        assert_eq!(refreshed, expected_refresh());
        assert_eq!(
            api.calls(),
            vec![Call::Remove(5), Call::Devices, Call::CurrentUser]
        );
    }

    #[tokio::test]
    async fn submitted_draft_sends_single_update() {
        let api = RecordingApi::default();
        let list = phone_and_laptop();
        let mut state = EditState::begin(&list.devices[0]);
        state.set_name(Box::from("tablet"));
        let update = state.submit().unwrap();
        assert_eq!(state, EditState::NotEditing);
        update_device(&api, update).await.unwrap();
        assert_eq!(
            api.calls(),
            vec![
                Call::Update(DeviceUpdate {
                    id: 1,
                    name: Box::from("tablet"),
                    expires_at: list.devices[0].expires_at.clone(),
                }),
                Call::Devices,
                Call::CurrentUser
            ]
        );
    }

    #[tokio::test]
    async fn create_returns_token_and_refetches() {
        let api = RecordingApi::default();
        let (token, refreshed) = create_device(&api, "watch", "2030-01-01T00:00:00+00:00")
            .await
            .unwrap();
        assert_eq!(token.as_ref(), "token-1");
        assert_eq!(refreshed, expected_refresh());
        assert_eq!(api.calls().len(), 3);
    }

    #[tokio::test]
    async fn failed_mutation_skips_refetch() {
        let api = RecordingApi::rejecting();
        assert!(remove_device(&api, 5).await.is_err());
        assert_eq!(api.calls(), vec![Call::Remove(5)]);
    }
}
