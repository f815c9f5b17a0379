use crate::{
    components::login_form::LoginForm,
    data::{UserInfo, UserSessionData},
    error::FrontendError,
    pages::devices::actions::{DeviceApi, GraphqlDeviceApi},
};
use gloo::storage::{LocalStorage, Storage};
use log::{info, warn};
use patternfly_yew::prelude::{BackdropViewer, Bullseye, Page, PageSidebar, Spinner, ToastViewer};
use routes::{AppRoute, Sidebar};
use std::rc::Rc;
use yew::{
    Context, ContextProvider, Html, ToHtml, function_component, html, html::Scope,
    html_nested, platform::spawn_local,
};
use yew_nested_router::{Router, prelude::Switch as RouterSwitch};

pub mod devices;
pub mod routes;

const TOKEN_KEY: &str = "device-token";

#[derive(Debug)]
pub struct App {
    session: SessionState,
    error_state: Option<FrontendError>,
}

#[derive(Debug)]
enum SessionState {
    LoggedOut,
    Checking(Rc<str>),
    LoggedIn { token: Rc<str>, user: UserInfo },
}

#[derive(Debug)]
pub enum AppMessage {
    TokenReceived(Rc<str>),
    UserReceived(UserInfo),
    SessionRejected(FrontendError),
    UserUpdated(UserInfo),
    Logout,
}

fn check_session(scope: Scope<App>, token: Rc<str>) {
    spawn_local(async move {
        match GraphqlDeviceApi::new(token).current_user().await {
            Ok(user) => scope.send_message(AppMessage::UserReceived(user)),
            Err(e) => scope.send_message(AppMessage::SessionRejected(e)),
        }
    });
}

impl yew::Component for App {
    type Message = AppMessage;
    type Properties = ();
    fn create(_ctx: &Context<Self>) -> Self {
        let session = match LocalStorage::get::<String>(TOKEN_KEY) {
            Ok(token) => SessionState::Checking(Rc::from(token)),
            Err(_) => SessionState::LoggedOut,
        };
        Self {
            session,
            error_state: None,
        }
    }
    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            AppMessage::TokenReceived(token) => {
                if let Err(e) = LocalStorage::set(TOKEN_KEY, token.as_ref()) {
                    warn!("Cannot store token: {e}");
                    self.error_state = Some(e.into());
                }
                check_session(ctx.link().clone(), token.clone());
                self.session = SessionState::Checking(token);
                true
            }
            AppMessage::UserReceived(user) => {
                if let SessionState::Checking(token) = &self.session {
                    info!("Session of {} accepted", user.name);
                    self.session = SessionState::LoggedIn {
                        token: token.clone(),
                        user,
                    };
                    self.error_state = None;
                    true
                } else {
                    false
                }
            }
            AppMessage::SessionRejected(error) => {
                warn!("Session rejected: {error:?}");
                LocalStorage::delete(TOKEN_KEY);
                self.session = SessionState::LoggedOut;
                self.error_state = Some(error);
                true
            }
            AppMessage::UserUpdated(updated) => {
                if let SessionState::LoggedIn { user, .. } = &mut self.session {
                    let changed = *user != updated;
                    *user = updated;
                    changed
                } else {
                    false
                }
            }
            AppMessage::Logout => {
                LocalStorage::delete(TOKEN_KEY);
                self.session = SessionState::LoggedOut;
                self.error_state = None;
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        match &self.session {
            SessionState::LoggedIn { token, user } => {
                let context = UserSessionData::new(
                    token.clone(),
                    user.clone(),
                    ctx.link().callback(AppMessage::UserUpdated),
                    ctx.link().callback(|_| AppMessage::Logout),
                );
                html! {
                <ContextProvider<UserSessionData> {context}>
                    <Router<AppRoute> default={AppRoute::default()}>
                        <MainPage/>
                    </Router<AppRoute>>
                </ContextProvider<UserSessionData>>
                }
            }
            SessionState::Checking(_) => html! {
                <Bullseye><Spinner/></Bullseye>
            },
            SessionState::LoggedOut => {
                let error_message = self.error_state.as_ref().map(|e| e.to_html());
                html! {
                    <Bullseye>
                        <div class="login">
                            {error_message}
                            <LoginForm onlogin={ctx.link().callback(AppMessage::TokenReceived)}/>
                        </div>
                    </Bullseye>
                }
            }
        }
    }

    fn rendered(&mut self, ctx: &Context<Self>, first_render: bool) {
        if first_render {
            if let SessionState::Checking(token) = &self.session {
                check_session(ctx.link().clone(), token.clone());
            }
        }
    }
}

#[function_component(MainPage)]
fn main_page() -> Html {
    html! {
        <BackdropViewer>
            <ToastViewer>
                    <Page sidebar={html_nested! {<PageSidebar><Sidebar/></PageSidebar>}}>
                        <RouterSwitch<AppRoute>
                            render = { AppRoute::content}
                        />
                    </Page>
            </ToastViewer>
        </BackdropViewer>
    }
}
