use std::rc::Rc;
use yew::Callback;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserInfo {
    pub name: Box<str>,
}

/// Session shared with all pages below the app shell.
#[derive(Debug, Clone, PartialEq)]
pub struct UserSessionData {
    token: Rc<str>,
    user: UserInfo,
    on_user: Callback<UserInfo>,
    on_logout: Callback<()>,
}

impl UserSessionData {
    pub fn new(
        token: Rc<str>,
        user: UserInfo,
        on_user: Callback<UserInfo>,
        on_logout: Callback<()>,
    ) -> Self {
        Self {
            token,
            user,
            on_user,
            on_logout,
        }
    }
    pub fn token(&self) -> Rc<str> {
        self.token.clone()
    }
    pub fn user(&self) -> &UserInfo {
        &self.user
    }
    /// Hands a freshly fetched user back to the app shell
    pub fn update_user(&self, user: UserInfo) {
        self.on_user.emit(user);
    }
    pub fn logout(&self) {
        self.on_logout.emit(());
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceRow {
    pub id: i64,
    pub name: Box<str>,
    pub created_at: Box<str>,
    pub expires_at: Box<str>,
    pub active_at: Box<str>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceList {
    pub devices: Box<[DeviceRow]>,
    pub current_device: i64,
}

impl DeviceList {
    pub fn is_current(&self, device: &DeviceRow) -> bool {
        device.id == self.current_device
    }
    pub fn display_name(&self, device: &DeviceRow) -> String {
        if self.is_current(device) {
            format!("{} (current)", device.name)
        } else {
            device.name.to_string()
        }
    }
}
