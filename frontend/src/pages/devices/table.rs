use super::{
    DevicesMsg,
    edit::{EditState, RowMode},
};
use crate::{
    data::{DeviceList, DeviceRow},
    time,
};
use patternfly_yew::prelude::{Button, ButtonVariant, Form, TextInput, TextInputType};
use yew::{
    Callback, Html, Properties, classes,
    events::{MouseEvent, SubmitEvent},
    function_component, html,
};

#[derive(Properties, Clone, PartialEq)]
pub struct DeviceTableProps {
    pub list: DeviceList,
    pub edit: EditState,
    pub onmessage: Callback<DevicesMsg>,
}

#[function_component(DeviceTable)]
pub fn device_table(props: &DeviceTableProps) -> Html {
    let rows = props.list.devices.iter().map(|device| view_row(props, device));
    html! {
        <table class="pf-v5-c-table pf-m-compact" role="grid">
            <thead>
                <tr>
                    <th>{"ID"}</th>
                    <th>{"Name"}</th>
                    <th>{"Created"}</th>
                    <th>{"Expires"}</th>
                    <th>{"Last Active"}</th>
                    <th class="device-actions"></th>
                </tr>
            </thead>
            <tbody>
                {for rows}
            </tbody>
        </table>
    }
}

fn view_row(props: &DeviceTableProps, device: &DeviceRow) -> Html {
    let list = &props.list;
    let onmessage = &props.onmessage;
    let is_current = list.is_current(device);
    let (name, expires, actions) = match props.edit.mode(device.id) {
        RowMode::Viewing => {
            let edit = {
                let device = device.clone();
                onmessage.reform(move |_: MouseEvent| DevicesMsg::Edit(device.clone()))
            };
            let id = device.id;
            let delete = onmessage.reform(move |_: MouseEvent| DevicesMsg::Delete(id));
            (
                html! {<>{list.display_name(device)}</>},
                html! {<>{time::from_now(&device.expires_at)}</>},
                html! {
                    <>
                        <Button variant={ButtonVariant::Link} onclick={edit}>{"Edit"}</Button>
                        <Button variant={ButtonVariant::Link} onclick={delete}>{"Delete"}</Button>
                    </>
                },
            )
        }
        RowMode::Editing {
            draft_name,
            draft_expires_at,
        } => {
            // Enter in the name field submits the form
            let onsubmit = onmessage.reform(|e: SubmitEvent| {
                e.prevent_default();
                DevicesMsg::Submit
            });
            let save = onmessage.reform(|_: MouseEvent| DevicesMsg::Submit);
            let cancel = onmessage.reform(|_: MouseEvent| DevicesMsg::Cancel);
            (
                html! {
                    <Form {onsubmit}>
                        <TextInput
                            value={draft_name.to_string()}
                            onchange={onmessage.reform(DevicesMsg::EditName)}/>
                    </Form>
                },
                html! {
                    <TextInput
                        r#type={TextInputType::DateTimeLocal}
                        value={time::to_input_value(draft_expires_at)}
                        onchange={onmessage.reform(DevicesMsg::EditExpiresAt)}/>
                },
                html! {
                    <>
                        <Button variant={ButtonVariant::Link} onclick={save}>{"Save"}</Button>
                        <Button variant={ButtonVariant::Link} onclick={cancel}>{"Cancel"}</Button>
                    </>
                },
            )
        }
    };
    html! {
        <tr class={classes!(is_current.then_some("pf-m-selected"))} aria-selected={is_current.to_string()}>
            <td>{device.id}</td>
            <td>{name}</td>
            <td title={device.created_at.to_string()}>{time::from_now(&device.created_at)}</td>
            <td title={device.expires_at.to_string()}>{expires}</td>
            <td title={device.active_at.to_string()}>{time::from_now(&device.active_at)}</td>
            <td>{actions}</td>
        </tr>
    }
}
