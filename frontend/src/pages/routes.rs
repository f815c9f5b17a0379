use crate::data::UserSessionData;
use crate::pages::devices::DevicesPage;
use patternfly_yew::prelude::{Button, ButtonVariant, Nav, NavRouterItem};
use yew::{Callback, Html, function_component, html, use_context};
use yew_nested_router::Target;

#[derive(Debug, Clone, PartialEq, Eq, Target)]
pub enum AppRoute {
    NotFound,
    Devices,
}

impl Default for AppRoute {
    fn default() -> Self {
        Self::Devices
    }
}

impl AppRoute {
    pub fn content(self) -> Html {
        match self {
            AppRoute::Devices => html! {<DevicesPage/>},
            AppRoute::NotFound => html! {<h1>{"Not Found"}</h1>},
        }
    }
}

#[function_component(Sidebar)]
pub fn sidebar() -> Html {
    let session = use_context::<UserSessionData>();
    let user = session.as_ref().map(|session| {
        let onclick = {
            let session = session.clone();
            Callback::from(move |_| session.logout())
        };
        html! {
            <div class="sidebar-user">
                <span>{session.user().name.as_ref()}</span>
                <Button variant={ButtonVariant::Link} {onclick}>{"Logout"}</Button>
            </div>
        }
    });
    html! {
        <>
            <Nav>
                <NavRouterItem<AppRoute> to={AppRoute::Devices}>{"Devices"}</NavRouterItem<AppRoute>>
            </Nav>
            {user}
        </>
    }
}
