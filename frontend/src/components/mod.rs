pub mod add_device;
pub mod login_form;
