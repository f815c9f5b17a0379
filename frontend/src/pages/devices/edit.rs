use crate::data::DeviceRow;
use std::mem;

/// Inline editing of at most one row of the device table.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EditState {
    #[default]
    NotEditing,
    Editing {
        id: i64,
        draft_name: Box<str>,
        draft_expires_at: Box<str>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceUpdate {
    pub id: i64,
    pub name: Box<str>,
    pub expires_at: Box<str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowMode<'a> {
    Viewing,
    Editing {
        draft_name: &'a str,
        draft_expires_at: &'a str,
    },
}

impl EditState {
    /// Starts editing `device`, seeded with its current values. Any other draft is dropped.
    pub fn begin(device: &DeviceRow) -> Self {
        EditState::Editing {
            id: device.id,
            draft_name: device.name.clone(),
            draft_expires_at: device.expires_at.clone(),
        }
    }

    pub fn mode(&self, device_id: i64) -> RowMode<'_> {
        match self {
            EditState::Editing {
                id,
                draft_name,
                draft_expires_at,
            } if *id == device_id => RowMode::Editing {
                draft_name,
                draft_expires_at,
            },
            _ => RowMode::Viewing,
        }
    }

    pub fn set_name(&mut self, name: Box<str>) {
        if let EditState::Editing { draft_name, .. } = self {
            *draft_name = name;
        }
    }

    pub fn set_expires_at(&mut self, expires_at: Box<str>) {
        if let EditState::Editing {
            draft_expires_at, ..
        } = self
        {
            *draft_expires_at = expires_at;
        }
    }

    pub fn cancel(&mut self) {
        *self = EditState::NotEditing;
    }

    /// Clears the draft and returns the update to send, if a row was being edited.
    pub fn submit(&mut self) -> Option<DeviceUpdate> {
        match mem::take(self) {
            EditState::NotEditing => None,
            EditState::Editing {
                id,
                draft_name,
                draft_expires_at,
            } => Some(DeviceUpdate {
                id,
                name: draft_name,
                expires_at: draft_expires_at,
            }),
        }
    }
}
