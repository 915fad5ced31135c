use crate::db::store::{RecordStore, UserFilter};
use crate::errors::{AppError, AppResult};
use crate::models::user::{NewUser, User};

pub struct UserLogic;

impl UserLogic {
    /// Create a user; both fields are required.
    pub fn add<S: RecordStore + ?Sized>(store: &S, name: &str, email: &str) -> AppResult<User> {
        let name = name.trim();
        let email = email.trim();
        if name.is_empty() || email.is_empty() {
            return Err(AppError::MissingUserField);
        }

        Ok(store.insert_user(&NewUser {
            name: name.to_string(),
            email: email.to_string(),
        })?)
    }

    /// All users in creation order.
    pub fn list<S: RecordStore + ?Sized>(store: &S) -> AppResult<Vec<User>> {
        Ok(store.fetch_users(&UserFilter::all())?)
    }

    /// Pick the user an operation applies to: the explicit id, then the
    /// configured default, then the first user ever created.
    pub fn resolve<S: RecordStore + ?Sized>(
        store: &S,
        explicit: Option<i64>,
        default: Option<i64>,
    ) -> AppResult<User> {
        if let Some(id) = explicit.or(default) {
            return store
                .fetch_users(&UserFilter::by_id(id))?
                .into_iter()
                .next()
                .ok_or(AppError::UnknownUser(id));
        }

        store
            .fetch_users(&UserFilter::all())?
            .into_iter()
            .next()
            .ok_or(AppError::NoUsers)
    }
}
