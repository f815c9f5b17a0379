use crate::{
    components::add_device::AddDeviceDialog,
    data::{DeviceList, DeviceRow, UserInfo, UserSessionData},
    error::FrontendError,
    time,
};
use actions::{DeviceApi, GraphqlDeviceApi, Refreshed};
use edit::{DeviceUpdate, EditState};
use log::{error, warn};
use patternfly_yew::prelude::{
    AlertType, Backdropper, Bullseye, Button, ButtonVariant, Spinner, Toast, Toaster,
};
use std::time::Duration;
use table::DeviceTable;
use yew::{Callback, Component, Context, Html, html, html::Scope, platform::spawn_local};

pub mod actions;
pub mod edit;
pub mod table;

pub struct DevicesPage {
    model: DevicesModel,
}

#[derive(Debug, Default, PartialEq)]
enum DevicesState {
    #[default]
    Loading,
    Data(DeviceList),
}

#[derive(Debug)]
pub enum DevicesMsg {
    Data(DeviceList),
    LoadFailed(FrontendError),
    Edit(DeviceRow),
    EditName(String),
    EditExpiresAt(String),
    Submit,
    Cancel,
    Delete(i64),
    OpenAdd,
    CloseAdd,
    Refreshed {
        refreshed: Refreshed,
        notice: &'static str,
    },
    MutationFailed(FrontendError),
}

/// Side effects of a page transition, run by the component.
#[derive(Debug, PartialEq)]
enum Command {
    Remove(i64),
    Update(DeviceUpdate),
    OpenAdd,
    CloseAdd,
    PublishUser(UserInfo),
    Toast(&'static str),
}

#[derive(Debug, Default)]
struct DevicesModel {
    state: DevicesState,
    edit: EditState,
}

impl DevicesModel {
    /// Applies `msg`, returning whether to re-render and what to run.
    fn apply(&mut self, msg: DevicesMsg) -> (bool, Vec<Command>) {
        match msg {
            DevicesMsg::Data(list) => {
                self.state = DevicesState::Data(list);
                (true, vec![])
            }
            DevicesMsg::LoadFailed(e) => {
                warn!("Cannot load devices: {e:?}");
                (false, vec![])
            }
            DevicesMsg::Edit(device) => {
                self.edit = EditState::begin(&device);
                (true, vec![])
            }
            DevicesMsg::EditName(name) => {
                self.edit.set_name(name.into_boxed_str());
                (true, vec![])
            }
            DevicesMsg::EditExpiresAt(value) => match time::from_input_value(&value) {
                Some(expires_at) => {
                    self.edit.set_expires_at(expires_at.into_boxed_str());
                    (true, vec![])
                }
                None => (false, vec![]),
            },
            DevicesMsg::Submit => match self.edit.submit() {
                Some(update) => (true, vec![Command::Update(update)]),
                None => (false, vec![]),
            },
            DevicesMsg::Cancel => {
                self.edit.cancel();
                (true, vec![])
            }
            DevicesMsg::Delete(id) => (false, vec![Command::Remove(id)]),
            DevicesMsg::OpenAdd => (false, vec![Command::OpenAdd]),
            DevicesMsg::CloseAdd => (false, vec![Command::CloseAdd]),
            DevicesMsg::Refreshed { refreshed, notice } => {
                self.state = DevicesState::Data(refreshed.devices);
                (
                    true,
                    vec![Command::PublishUser(refreshed.user), Command::Toast(notice)],
                )
            }
            DevicesMsg::MutationFailed(e) => {
                error!("Device mutation failed: {e:?}");
                (false, vec![])
            }
        }
    }
}

fn session(scope: &Scope<DevicesPage>) -> Option<UserSessionData> {
    scope
        .context::<UserSessionData>(Callback::noop())
        .map(|(session, _)| session)
}

fn backdropper(scope: &Scope<DevicesPage>) -> Option<Backdropper> {
    scope
        .context::<Backdropper>(Callback::noop())
        .map(|(backdropper, _)| backdropper)
}

fn device_api(scope: &Scope<DevicesPage>) -> Option<GraphqlDeviceApi> {
    session(scope).map(|session| GraphqlDeviceApi::new(session.token()))
}

fn send_refreshed(
    scope: &Scope<DevicesPage>,
    result: Result<Refreshed, FrontendError>,
    notice: &'static str,
) {
    scope.send_message(match result {
        Ok(refreshed) => DevicesMsg::Refreshed { refreshed, notice },
        Err(e) => DevicesMsg::MutationFailed(e),
    });
}

impl Component for DevicesPage {
    type Message = DevicesMsg;
    type Properties = ();

    fn create(_ctx: &Context<Self>) -> Self {
        Self {
            model: DevicesModel::default(),
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        let (render, commands) = self.model.apply(msg);
        for command in commands {
            self.run(ctx, command);
        }
        render
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let DevicesState::Data(list) = &self.model.state else {
            return html! {<Bullseye><Spinner/></Bullseye>};
        };
        let onmessage = ctx.link().callback(|msg: DevicesMsg| msg);
        html! {
            <div class="devices-page">
                <Button
                    variant={ButtonVariant::Secondary}
                    block=true
                    onclick={ctx.link().callback(|_| DevicesMsg::OpenAdd)}>
                    {"Create Device"}
                </Button>
                <DeviceTable list={list.clone()} edit={self.model.edit.clone()} {onmessage}/>
            </div>
        }
    }

    fn rendered(&mut self, ctx: &Context<Self>, first_render: bool) {
        if first_render {
            let Some(api) = device_api(ctx.link()) else {
                warn!("No session available");
                return;
            };
            let scope = ctx.link().clone();
            spawn_local(async move {
                match api.devices().await {
                    Ok(list) => scope.send_message(DevicesMsg::Data(list)),
                    Err(e) => scope.send_message(DevicesMsg::LoadFailed(e)),
                }
            });
        }
    }
}

impl DevicesPage {
    fn run(&self, ctx: &Context<Self>, command: Command) {
        match command {
            Command::Remove(id) => {
                let Some(api) = device_api(ctx.link()) else {
                    return;
                };
                let scope = ctx.link().clone();
                spawn_local(async move {
                    let result = actions::remove_device(&api, id).await;
                    send_refreshed(&scope, result, "device deleted");
                });
            }
            Command::Update(update) => {
                let Some(api) = device_api(ctx.link()) else {
                    return;
                };
                let scope = ctx.link().clone();
                spawn_local(async move {
                    let result = actions::update_device(&api, update).await;
                    send_refreshed(&scope, result, "device edited");
                });
            }
            Command::OpenAdd => {
                if let Some(backdropper) = backdropper(ctx.link()) {
                    let onclose = ctx.link().callback(|_| DevicesMsg::CloseAdd);
                    let oncreated = ctx.link().callback(|refreshed| DevicesMsg::Refreshed {
                        refreshed,
                        notice: "device created",
                    });
                    backdropper.open(html! {<AddDeviceDialog {onclose} {oncreated}/>});
                }
            }
            Command::CloseAdd => {
                if let Some(backdropper) = backdropper(ctx.link()) {
                    backdropper.close();
                }
            }
            Command::PublishUser(user) => {
                if let Some(session) = session(ctx.link()) {
                    session.update_user(user);
                }
            }
            Command::Toast(notice) => {
                if let Some((toaster, _)) = ctx.link().context::<Toaster>(Callback::noop()) {
                    toaster.toast(Toast {
                        title: notice.to_string(),
                        r#type: AlertType::Success,
                        timeout: Some(Duration::from_secs(4)),
                        ..Default::default()
                    });
                }
            }
        }
    }
}
