use crate::{
    error::FrontendError,
    graphql::{
        anonymous::{Login, login},
        query_anonymous,
    },
};
use log::info;
use patternfly_yew::prelude::{
    Button, ButtonType, ButtonVariant, Card, CardBody, CardHeader, CardTitle, Form, FormGroup,
    TextInput, TextInputType,
};
use std::rc::Rc;
use yew::{
    Callback, Component, Context, Html, Properties, ToHtml, events::SubmitEvent, html,
    platform::spawn_local,
};

const DEFAULT_DEVICE_NAME: &str = "web browser";

#[derive(Debug, Default)]
pub struct LoginForm {
    username: String,
    password: String,
    device_name: String,
    error: Option<FrontendError>,
    running: bool,
}

#[derive(Properties, Clone, PartialEq)]
pub struct LoginFormProps {
    pub onlogin: Callback<Rc<str>>,
}

pub enum LoginMsg {
    Username(String),
    Password(String),
    DeviceName(String),
    Submit,
    Failed(FrontendError),
}

impl Component for LoginForm {
    type Message = LoginMsg;
    type Properties = LoginFormProps;

    fn create(_ctx: &Context<Self>) -> Self {
        Self {
            device_name: DEFAULT_DEVICE_NAME.to_string(),
            ..Default::default()
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            LoginMsg::Username(username) => {
                self.username = username;
                true
            }
            LoginMsg::Password(password) => {
                self.password = password;
                true
            }
            LoginMsg::DeviceName(device_name) => {
                self.device_name = device_name;
                true
            }
            LoginMsg::Submit => {
                if self.running {
                    return false;
                }
                self.running = true;
                self.error = None;
                let variables = login::Variables {
                    username: self.username.clone(),
                    password: self.password.clone(),
                    device_name: self.device_name.clone(),
                };
                let scope = ctx.link().clone();
                let onlogin = ctx.props().onlogin.clone();
                spawn_local(async move {
                    match query_anonymous::<Login>(variables).await {
                        Ok(data) => {
                            info!("Logged in");
                            onlogin.emit(Rc::from(data.login.token));
                        }
                        Err(e) => scope.send_message(LoginMsg::Failed(e)),
                    }
                });
                true
            }
            LoginMsg::Failed(e) => {
                self.running = false;
                self.error = Some(e);
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let onsubmit = ctx.link().callback(|e: SubmitEvent| {
            e.prevent_default();
            LoginMsg::Submit
        });
        let error = self.error.as_ref().map(|e| e.to_html());
        html! {
            <Card>
                <CardHeader><CardTitle>{"Login"}</CardTitle></CardHeader>
                <CardBody>
                    <Form {onsubmit}>
                        {error}
                        <FormGroup label="Username" required=true>
                            <TextInput value={self.username.clone()} onchange={ctx.link().callback(LoginMsg::Username)}/>
                        </FormGroup>
                        <FormGroup label="Password" required=true>
                            <TextInput r#type={TextInputType::Password} value={self.password.clone()} onchange={ctx.link().callback(LoginMsg::Password)}/>
                        </FormGroup>
                        <FormGroup label="Device Name">
                            <TextInput value={self.device_name.clone()} onchange={ctx.link().callback(LoginMsg::DeviceName)}/>
                        </FormGroup>
                        <Button variant={ButtonVariant::Primary} r#type={ButtonType::Submit} disabled={self.running}>{"Login"}</Button>
                    </Form>
                </CardBody>
            </Card>
        }
    }
}
