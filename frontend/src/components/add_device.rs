use crate::{
    data::UserSessionData,
    error::FrontendError,
    pages::devices::actions::{self, GraphqlDeviceApi, Refreshed},
    time,
};
use chrono::Utc;
use log::error;
use patternfly_yew::prelude::{
    ActionGroup, Button, ButtonType, ButtonVariant, Form, FormGroup, Modal, ModalVariant,
    TextInput, TextInputType,
};
use yew::{
    AttrValue, Callback, Component, Context, Html, Properties, ToHtml, events::SubmitEvent, html,
    platform::spawn_local,
};

/// Modal for registering a new device. Shows the issued token once.
pub struct AddDeviceDialog {
    name: String,
    expires_at: Box<str>,
    state: DialogState,
}

enum DialogState {
    Input { error: Option<FrontendError> },
    Creating,
    Created { token: Box<str> },
}

#[derive(Properties, Clone, PartialEq)]
pub struct AddDeviceDialogProps {
    #[prop_or_default]
    pub initial_name: AttrValue,
    pub onclose: Callback<()>,
    pub oncreated: Callback<Refreshed>,
}

pub enum AddDeviceMsg {
    Name(String),
    ExpiresAt(String),
    Submit,
    Created {
        token: Box<str>,
        refreshed: Refreshed,
    },
    Failed(FrontendError),
}

impl AddDeviceDialog {
    fn can_submit(&self) -> bool {
        matches!(self.state, DialogState::Input { .. }) && !self.name.trim().is_empty()
    }

    fn view_created(&self, ctx: &Context<Self>, token: &str) -> Html {
        let onclose = ctx.props().onclose.reform(|_| ());
        html! {
            <>
                <p>{"Copy the token now, it cannot be shown again."}</p>
                <pre class="device-token">{token}</pre>
                <Button variant={ButtonVariant::Primary} onclick={onclose}>{"Close"}</Button>
            </>
        }
    }

    fn view_form(&self, ctx: &Context<Self>, error: Option<&FrontendError>) -> Html {
        let onsubmit = ctx.link().callback(|e: SubmitEvent| {
            e.prevent_default();
            AddDeviceMsg::Submit
        });
        let onchange_name = ctx.link().callback(AddDeviceMsg::Name);
        let onchange_expires = ctx.link().callback(AddDeviceMsg::ExpiresAt);
        let onclose = ctx.props().onclose.reform(|_| ());
        let error = error.map(|e| e.to_html());
        html! {
            <Form {onsubmit}>
                {error}
                <FormGroup label="Name" required=true>
                    <TextInput value={self.name.clone()} onchange={onchange_name} placeholder="Name of the device"/>
                </FormGroup>
                <FormGroup label="Expires">
                    <TextInput
                        r#type={TextInputType::DateTimeLocal}
                        value={time::to_input_value(&self.expires_at)}
                        onchange={onchange_expires}/>
                </FormGroup>
                <ActionGroup>
                    <Button
                        variant={ButtonVariant::Primary}
                        r#type={ButtonType::Submit}
                        disabled={!self.can_submit()}>
                        {"Create"}
                    </Button>
                    <Button variant={ButtonVariant::Link} onclick={onclose}>{"Cancel"}</Button>
                </ActionGroup>
            </Form>
        }
    }
}

impl Component for AddDeviceDialog {
    type Message = AddDeviceMsg;
    type Properties = AddDeviceDialogProps;

    fn create(ctx: &Context<Self>) -> Self {
        Self {
            name: ctx.props().initial_name.to_string(),
            expires_at: time::default_expiry(Utc::now()).into_boxed_str(),
            state: DialogState::Input { error: None },
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            AddDeviceMsg::Name(name) => {
                self.name = name;
                true
            }
            AddDeviceMsg::ExpiresAt(value) => match time::from_input_value(&value) {
                Some(expires_at) => {
                    self.expires_at = expires_at.into_boxed_str();
                    true
                }
                None => false,
            },
            AddDeviceMsg::Submit => {
                if !self.can_submit() {
                    return false;
                }
                let Some((session, _)) = ctx.link().context::<UserSessionData>(Callback::noop())
                else {
                    return false;
                };
                self.state = DialogState::Creating;
                let api = GraphqlDeviceApi::new(session.token());
                let name = self.name.trim().to_string();
                let expires_at = self.expires_at.clone();
                let scope = ctx.link().clone();
                spawn_local(async move {
                    match actions::create_device(&api, &name, &expires_at).await {
                        Ok((token, refreshed)) => {
                            scope.send_message(AddDeviceMsg::Created { token, refreshed })
                        }
                        Err(e) => scope.send_message(AddDeviceMsg::Failed(e)),
                    }
                });
                true
            }
            AddDeviceMsg::Created { token, refreshed } => {
                self.state = DialogState::Created { token };
                ctx.props().oncreated.emit(refreshed);
                true
            }
            AddDeviceMsg::Failed(e) => {
                error!("Cannot create device: {e:?}");
                self.state = DialogState::Input { error: Some(e) };
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let body = match &self.state {
            DialogState::Created { token } => self.view_created(ctx, token),
            DialogState::Input { error } => self.view_form(ctx, error.as_ref()),
            DialogState::Creating => self.view_form(ctx, None),
        };
        html! {
            <Modal
                title="Create Device"
                variant={ModalVariant::Small}
                onclose={ctx.props().onclose.clone()}>
                {body}
            </Modal>
        }
    }
}
