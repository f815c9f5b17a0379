/// The authenticated caller of a request, resolved from its device token.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Session {
    pub user: Box<str>,
    pub device_id: i64,
}
