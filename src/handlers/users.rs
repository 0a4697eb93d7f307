//! User profile endpoints.

use serde::Serialize;

use crate::handlers::{Action, ActionResult, Call, Handler, OrNotFound};
use crate::http::response::ResponseEnvelope;
use crate::store::models::{Id, User};

/// Public profile.
#[derive(Debug, Serialize)]
pub struct UserView {
    pub id: Id,
    pub name: String,
    pub email: String,
    pub followed_categories: Vec<Id>,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            followed_categories: user.followed_categories.iter().copied().collect(),
        }
    }
}

/// Profile plus the credential a client keeps after signing in.
#[derive(Debug, Serialize)]
pub struct LoginView {
    #[serde(flatten)]
    pub user: UserView,
    pub auth_token: String,
    pub last4_credit_card: Option<String>,
}

impl From<&User> for LoginView {
    fn from(user: &User) -> Self {
        Self {
            user: UserView::from(user),
            auth_token: user.auth_token.clone(),
            last4_credit_card: user.card.as_ref().map(|c| c.last4.clone()),
        }
    }
}

#[derive(Debug, Default)]
pub struct UserApi;

impl Handler for UserApi {
    const NAME: &'static str = "UserAPI";

    fn action(id: &str) -> Option<Action<Self>> {
        let action: Action<Self> = match id {
            "show" => Self::show,
            "find_by_email" => Self::find_by_email,
            _ => return None,
        };
        Some(action)
    }
}

impl UserApi {
    fn show(&mut self, call: &Call<'_>) -> ActionResult {
        let user = call
            .params()
            .id("user_id")
            .and_then(|id| call.store().users.get(id))
            .or_not_found()?;
        Ok(ResponseEnvelope::json(200, &UserView::from(&user))?)
    }

    fn find_by_email(&mut self, call: &Call<'_>) -> ActionResult {
        let user = call
            .params()
            .present("email")
            .and_then(|email| call.store().user_by_email(email))
            .or_not_found()?;
        Ok(ResponseEnvelope::json(200, &UserView::from(&user))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::testing::*;
    use crate::handlers::HandlerError;

    fn run(action: &str, call: &Call<'_>) -> ActionResult {
        let f = UserApi::action(action).unwrap();
        f(&mut UserApi, call)
    }

    #[test]
    fn test_show_hides_token() {
        let (services, id) = services_with_user();
        let id = id.to_string();
        let body = json(&run("show", &call(&services, &[("user_id", id.as_str())])).unwrap());
        assert_eq!(body["email"], "ann@example.com");
        assert!(body.get("auth_token").is_none());
        assert!(body.get("password_hash").is_none());
    }

    #[test]
    fn test_find_by_email() {
        let (services, _) = services_with_user();
        let body = json(&run("find_by_email", &call(&services, &[("email", "ANN@example.com")])).unwrap());
        assert_eq!(body["name"], "Ann");

        let err = run("find_by_email", &call(&services, &[("email", "bob@example.com")])).unwrap_err();
        assert!(matches!(err, HandlerError::ResourceNotFound));
    }

    #[test]
    fn test_login_view_carries_token() {
        let (services, id) = services_with_user();
        let user = services.store.users.get(id).unwrap();
        let value = serde_json::to_value(LoginView::from(&user)).unwrap();
        assert_eq!(value["auth_token"], TOKEN);
        assert_eq!(value["name"], "Ann");
    }
}
