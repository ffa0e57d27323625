use std::sync::Arc;

use once_cell::sync::OnceCell;
use parking_lot::RwLock;
use serde_json::json;

use crate::http::{Client, HttpError, Method, RequestOptions};
use crate::models::{ExistsReply, ResetConfirmReply, SuccessReply, User, UserPatch};

pub const LOGIN_PATH: &str = "token/";
pub const IDENTITY_PATH: &str = "authenticated/";
pub const LOGOUT_PATH: &str = "logout/";
pub const REGISTER_PATH: &str = "register/";
pub const PASSWORD_RESET_PATH: &str = "password-reset/request/";
pub const PASSWORD_RESET_CONFIRM_PATH: &str = "password-reset/confirm/";
pub const EDIT_USER_PATH: &str = "edit-user/";
pub const DELETE_USER_PATH: &str = "delete-user/";
pub const USERNAME_EXISTS_PATH: &str = "username-exists/";
pub const EMAIL_EXISTS_PATH: &str = "email-exists/";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Uninitialized,
    Loading,
    Authenticated,
    Anonymous,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub identity: Option<User>,
    pub status: Status,
}

impl Session {
    fn uninitialized() -> Self {
        Self {
            identity: None,
            status: Status::Uninitialized,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("session: username and password are required")]
    MissingCredentials,
    #[error("session: credentials rejected")]
    Rejected,
    #[error("session: not signed in")]
    NotSignedIn,
    #[error(transparent)]
    Http(#[from] HttpError),
}

impl SessionError {
    /// Backend message suitable for display next to the offending form field.
    pub fn field_message(&self) -> Option<String> {
        match self {
            SessionError::Http(err) => err.field_message(),
            _ => None,
        }
    }
}

/// Settings form submission. Picture uploads are not supported; a picture can
/// only be kept or removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileEdit {
    pub username: String,
    pub name: String,
    pub bio: String,
    pub remove_picture: bool,
    pub password: Option<PasswordChange>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordChange {
    pub current: String,
    pub new: String,
}

/// Which side of the auth boundary a page lives on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    Private,
    Guest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Wait,
    Allow,
    Redirect(&'static str),
}

/// Owns the one session of a running client. Consumers read snapshots; only the
/// controller's own methods write.
pub struct Controller {
    client: Arc<Client>,
    session: RwLock<Session>,
    bootstrap: OnceCell<()>,
}

/// Puts the session back into a terminal state if a load is abandoned midway.
struct LoadingGuard<'a> {
    session: &'a RwLock<Session>,
    settled: bool,
}

impl<'a> LoadingGuard<'a> {
    fn begin(session: &'a RwLock<Session>) -> Self {
        session.write().status = Status::Loading;
        Self {
            session,
            settled: false,
        }
    }

    fn settle(mut self, identity: Option<User>) {
        let mut session = self.session.write();
        session.status = if identity.is_some() {
            Status::Authenticated
        } else {
            Status::Anonymous
        };
        session.identity = identity;
        self.settled = true;
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        if !self.settled {
            let mut session = self.session.write();
            session.identity = None;
            session.status = Status::Anonymous;
        }
    }
}

impl Controller {
    pub fn new(client: Arc<Client>) -> Self {
        Self {
            client,
            session: RwLock::new(Session::uninitialized()),
            bootstrap: OnceCell::new(),
        }
    }

    pub fn client(&self) -> &Arc<Client> {
        &self.client
    }

    pub fn snapshot(&self) -> Session {
        self.session.read().clone()
    }

    pub fn status(&self) -> Status {
        self.session.read().status
    }

    pub fn identity(&self) -> Option<User> {
        self.session.read().identity.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.status() == Status::Authenticated
    }

    /// Resolves the session once per controller. Concurrent callers block on the
    /// first call and observe its result; later calls return the current state.
    pub fn initialize(&self) -> Session {
        self.bootstrap.get_or_init(|| self.load_identity());
        self.snapshot()
    }

    /// Explicit re-fetch of the identity from a terminal state.
    pub fn refresh_identity(&self) -> Session {
        self.load_identity();
        self.snapshot()
    }

    fn load_identity(&self) {
        let guard = LoadingGuard::begin(&self.session);
        match self.fetch_identity() {
            Ok(user) => {
                tracing::info!(username = %user.username, "session authenticated");
                guard.settle(Some(user));
            }
            Err(err) => {
                tracing::info!(error = %err, "session anonymous");
                guard.settle(None);
            }
        }
    }

    fn fetch_identity(&self) -> Result<User, HttpError> {
        self.client.ensure_csrf()?;
        self.client.get_json::<User>(IDENTITY_PATH)
    }

    pub fn login(&self, username: &str, password: &str) -> Result<User, SessionError> {
        if username.trim().is_empty() || password.is_empty() {
            return Err(SessionError::MissingCredentials);
        }

        match self.exchange_credentials(username, password) {
            Ok(user) => {
                tracing::info!(username = %user.username, "logged in");
                let mut session = self.session.write();
                session.identity = Some(user.clone());
                session.status = Status::Authenticated;
                Ok(user)
            }
            Err(err) => {
                tracing::info!(error = %err, "login failed");
                self.force_anonymous();
                Err(err)
            }
        }
    }

    fn exchange_credentials(&self, username: &str, password: &str) -> Result<User, SessionError> {
        self.client.ensure_csrf()?;
        let reply: SuccessReply = self
            .client
            .send_json(
                Method::POST,
                LOGIN_PATH,
                Some(json!({ "username": username, "password": password })),
            )
            .map_err(|err| match err {
                err if err.is_unauthorized() => SessionError::Rejected,
                err => SessionError::Http(err),
            })?;
        if !reply.success {
            return Err(SessionError::Rejected);
        }
        // The login reply only carries a flag; the identity comes from its own endpoint.
        Ok(self.client.get_json::<User>(IDENTITY_PATH)?)
    }

    /// Always ends anonymous, whatever the server says.
    pub fn logout(&self) {
        let outcome = self.client.ensure_csrf().and_then(|_| {
            self.client
                .send(Method::POST, LOGOUT_PATH, None, RequestOptions::default())
        });
        self.force_anonymous();
        match outcome {
            Ok(_) => tracing::info!("logged out"),
            Err(err) => tracing::warn!(error = %err, "server logout failed, local session cleared"),
        }
    }

    fn force_anonymous(&self) {
        let mut session = self.session.write();
        session.identity = None;
        session.status = Status::Anonymous;
    }

    /// Applies a profile edit without a round trip. Returns false when nobody is signed in.
    pub fn update_identity_locally(&self, patch: UserPatch) -> bool {
        let mut session = self.session.write();
        match session.identity.as_mut() {
            Some(user) => {
                patch.apply(user);
                true
            }
            None => false,
        }
    }

    pub fn admit(&self, gate: Gate) -> Admission {
        match (self.status(), gate) {
            (Status::Uninitialized | Status::Loading, _) => Admission::Wait,
            (Status::Authenticated, Gate::Private) | (Status::Anonymous, Gate::Guest) => {
                Admission::Allow
            }
            (Status::Anonymous, Gate::Private) => Admission::Redirect("/login"),
            (Status::Authenticated, Gate::Guest) => Admission::Redirect("/"),
        }
    }

    pub fn register(
        &self,
        username: &str,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<(), SessionError> {
        if username.trim().is_empty() || email.trim().is_empty() || password.is_empty() {
            return Err(SessionError::MissingCredentials);
        }
        self.client.ensure_csrf()?;
        self.client.send(
            Method::POST,
            REGISTER_PATH,
            Some(json!({
                "username": username.trim(),
                "first_name": name.trim(),
                "email": email.trim(),
                "password": password,
            })),
            RequestOptions::default(),
        )?;
        Ok(())
    }

    /// Saves the settings form and mirrors the accepted fields into the local
    /// identity. Rejections keep the backend payload for `field_message`.
    pub fn edit_profile(&self, edit: ProfileEdit) -> Result<User, SessionError> {
        if !self.is_authenticated() {
            return Err(SessionError::NotSignedIn);
        }
        let username = edit.username.trim();
        if username.is_empty() {
            return Err(SessionError::MissingCredentials);
        }

        let mut form = vec![
            ("username".to_string(), username.to_string()),
            ("first_name".to_string(), edit.name.trim().to_string()),
            ("bio".to_string(), edit.bio.trim().to_string()),
        ];
        if edit.remove_picture {
            form.push(("profile_picture".into(), String::new()));
        }
        if let Some(change) = edit.password.as_ref().filter(|c| !c.new.is_empty()) {
            if change.current.is_empty() {
                return Err(SessionError::MissingCredentials);
            }
            form.push(("new_password".into(), change.new.clone()));
            form.push(("current_password".into(), change.current.clone()));
        }

        self.client.ensure_csrf()?;
        self.client.send(
            Method::PATCH,
            EDIT_USER_PATH,
            None,
            RequestOptions {
                form: Some(form),
                ..Default::default()
            },
        )?;
        tracing::info!(username, "profile updated");

        self.update_identity_locally(UserPatch {
            username: Some(username.to_string()),
            display_name: Some(edit.name.trim().to_string()),
            bio: Some(edit.bio.trim().to_string()),
            avatar: edit.remove_picture.then_some(None),
            counters: None,
        });
        self.identity().ok_or(SessionError::NotSignedIn)
    }

    /// Deletes the signed-in account. The session ends only once the server
    /// confirmed.
    pub fn delete_account(&self) -> Result<(), SessionError> {
        if !self.is_authenticated() {
            return Err(SessionError::NotSignedIn);
        }
        self.client.ensure_csrf()?;
        self.client
            .send(Method::DELETE, DELETE_USER_PATH, None, RequestOptions::default())?;
        tracing::info!("account deleted");
        self.force_anonymous();
        Ok(())
    }

    pub fn username_exists(&self, username: &str) -> Result<bool, HttpError> {
        self.exists(USERNAME_EXISTS_PATH, "username", username)
    }

    pub fn email_exists(&self, email: &str) -> Result<bool, HttpError> {
        self.exists(EMAIL_EXISTS_PATH, "email", email)
    }

    fn exists(&self, path: &str, key: &str, value: &str) -> Result<bool, HttpError> {
        let value = value.trim();
        if value.is_empty() {
            return Ok(false);
        }
        let reply: ExistsReply = self
            .client
            .send(
                Method::GET,
                path,
                None,
                RequestOptions {
                    query: vec![(key.to_string(), value.to_lowercase())],
                    ..Default::default()
                },
            )?
            .json()?;
        Ok(reply.exists)
    }

    /// Activates a freshly registered account from its e-mailed key.
    pub fn confirm_email(&self, activation_key: &str) -> Result<(), SessionError> {
        let key = activation_key.trim();
        if key.is_empty() {
            return Err(SessionError::MissingCredentials);
        }
        self.client.ensure_csrf()?;
        self.client.send(
            Method::POST,
            &format!("activate/{}/", key),
            None,
            RequestOptions::default(),
        )?;
        Ok(())
    }

    /// Sets a new password from a reset link. Returns the account's username.
    pub fn confirm_password_reset(
        &self,
        uid: &str,
        token: &str,
        new_password: &str,
    ) -> Result<String, SessionError> {
        if uid.is_empty() || token.is_empty() || new_password.is_empty() {
            return Err(SessionError::MissingCredentials);
        }
        self.client.ensure_csrf()?;
        let reply: ResetConfirmReply = self.client.send_json(
            Method::POST,
            PASSWORD_RESET_CONFIRM_PATH,
            Some(json!({ "uid": uid, "token": token, "new_password": new_password })),
        )?;
        if !reply.success {
            return Err(SessionError::Rejected);
        }
        Ok(reply.username.unwrap_or_default())
    }

    pub fn request_password_reset(&self, email: &str) -> Result<(), SessionError> {
        if email.trim().is_empty() {
            return Err(SessionError::MissingCredentials);
        }
        self.client.ensure_csrf()?;
        self.client.send(
            Method::POST,
            PASSWORD_RESET_PATH,
            Some(json!({ "email": email.trim() })),
            RequestOptions::default(),
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiConfig;
    use crate::http::{Request, Response};
    use crate::mock::MockTransport;
    use serde_json::{json, Value};
    use std::thread;
    use std::time::Duration;

    fn me() -> Value {
        json!({
            "username": "jan",
            "first_name": "Jan Pona",
            "bio": "",
            "profile_picture": null,
            "post_count": 4,
            "follower_count": 10,
            "following_count": 3
        })
    }

    fn csrf_or(req: &Request, rest: impl FnOnce() -> Result<Response, HttpError>) -> Result<Response, HttpError> {
        if req.url.path() == "/api/csrf/" {
            return Ok(Response::json_body(200, json!({}))
                .with_header("set-cookie", "csrftoken=tok; Path=/"));
        }
        rest()
    }

    fn controller(mock: &Arc<MockTransport>) -> Controller {
        let cfg = ApiConfig {
            base_url: "http://backend.test/api/".into(),
            ..ApiConfig::default()
        };
        Controller::new(Arc::new(Client::with_transport(&cfg, mock.clone()).unwrap()))
    }

    #[test]
    fn initialize_authenticates_with_identity() {
        let mock = Arc::new(MockTransport::new(|req| {
            csrf_or(req, || Ok(Response::json_body(200, me())))
        }));
        let controller = controller(&mock);
        assert_eq!(controller.status(), Status::Uninitialized);

        let session = controller.initialize();
        assert_eq!(session.status, Status::Authenticated);
        assert_eq!(session.identity.unwrap().counters.followers, 10);
    }

    #[test]
    fn initialize_failure_resolves_anonymous() {
        let mock = Arc::new(MockTransport::new(|req| {
            csrf_or(req, || Err(HttpError::Transport("connection refused".into())))
        }));
        let controller = controller(&mock);
        let session = controller.initialize();
        assert_eq!(session.status, Status::Anonymous);
        assert!(session.identity.is_none());
    }

    #[test]
    fn concurrent_initialize_issues_one_identity_call() {
        let mock = Arc::new(MockTransport::new(|req| {
            csrf_or(req, || {
                thread::sleep(Duration::from_millis(80));
                Ok(Response::json_body(200, me()))
            })
        }));
        let controller = Arc::new(controller(&mock));

        let handles: Vec<_> = (0..2)
            .map(|_| {
                let controller = controller.clone();
                thread::spawn(move || controller.initialize())
            })
            .collect();
        let results: Vec<Session> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert_eq!(mock.count(&Method::GET, "/api/authenticated/"), 1);
        assert_eq!(results[0], results[1]);
        assert_eq!(results[0].status, Status::Authenticated);

        controller.initialize();
        assert_eq!(mock.count(&Method::GET, "/api/authenticated/"), 1);
    }

    #[test]
    fn login_requires_both_fields_without_network() {
        let mock = Arc::new(MockTransport::new(|_| Ok(Response::json_body(200, json!({})))));
        let controller = controller(&mock);
        assert!(matches!(
            controller.login("jan", ""),
            Err(SessionError::MissingCredentials)
        ));
        assert!(matches!(
            controller.login("  ", "pw"),
            Err(SessionError::MissingCredentials)
        ));
        assert!(mock.requests().is_empty());
    }

    #[test]
    fn login_refetches_full_identity() {
        let mock = Arc::new(MockTransport::new(|req| {
            csrf_or(req, || match req.url.path() {
                "/api/token/" => Ok(Response::json_body(200, json!({"success": true}))),
                _ => Ok(Response::json_body(200, me())),
            })
        }));
        let controller = controller(&mock);
        let user = controller.login("jan", "secret").unwrap();
        assert_eq!(user.display_name, "Jan Pona");
        assert!(controller.is_authenticated());
        let login = mock.last(&Method::POST, "/api/token/").unwrap();
        assert_eq!(login.header("X-CSRFToken"), Some("tok"));
        assert_eq!(login.body.unwrap()["username"], "jan");
    }

    #[test]
    fn rejected_login_surfaces_error_and_stays_anonymous() {
        let mock = Arc::new(MockTransport::new(|req| {
            csrf_or(req, || Ok(Response::json_body(401, json!({"success": false}))))
        }));
        let controller = controller(&mock);
        let err = controller.login("jan", "wrong").unwrap_err();
        assert!(matches!(err, SessionError::Rejected));
        assert_eq!(controller.status(), Status::Anonymous);
        assert_eq!(mock.count(&Method::GET, "/api/authenticated/"), 0);
    }

    #[test]
    fn logout_clears_identity_even_when_server_fails() {
        let mock = Arc::new(MockTransport::new(|req| {
            csrf_or(req, || match req.url.path() {
                "/api/logout/" => Err(HttpError::Transport("network down".into())),
                _ => Ok(Response::json_body(200, me())),
            })
        }));
        let controller = controller(&mock);
        controller.initialize();
        assert!(controller.is_authenticated());

        controller.logout();
        let session = controller.snapshot();
        assert_eq!(session.status, Status::Anonymous);
        assert!(session.identity.is_none());
        assert_eq!(mock.count(&Method::POST, "/api/logout/"), 1);
    }

    #[test]
    fn local_identity_update_keeps_other_fields() {
        let mock = Arc::new(MockTransport::new(|req| {
            csrf_or(req, || Ok(Response::json_body(200, me())))
        }));
        let controller = controller(&mock);
        controller.initialize();
        assert!(controller.update_identity_locally(UserPatch {
            bio: Some("o toki".into()),
            ..Default::default()
        }));
        let user = controller.identity().unwrap();
        assert_eq!(user.bio, "o toki");
        assert_eq!(user.display_name, "Jan Pona");
        assert_eq!(user.counters.posts, 4);
    }

    #[test]
    fn refresh_identity_can_demote_to_anonymous() {
        let calls = Arc::new(parking_lot::Mutex::new(0));
        let seen = calls.clone();
        let mock = Arc::new(MockTransport::new(move |req| {
            csrf_or(req, || {
                let mut n = seen.lock();
                *n += 1;
                if *n == 1 {
                    Ok(Response::json_body(200, me()))
                } else {
                    Ok(Response::json_body(403, json!({"detail": "gone"})))
                }
            })
        }));
        let controller = controller(&mock);
        assert_eq!(controller.initialize().status, Status::Authenticated);
        assert_eq!(controller.refresh_identity().status, Status::Anonymous);
        assert!(*calls.lock() >= 2);
    }

    #[test]
    fn gates_follow_session_status() {
        let mock = Arc::new(MockTransport::new(|req| {
            csrf_or(req, || Ok(Response::json_body(401, json!({}))))
        }));
        let controller = controller(&mock);
        assert_eq!(controller.admit(Gate::Private), Admission::Wait);
        controller.initialize();
        assert_eq!(controller.admit(Gate::Private), Admission::Redirect("/login"));
        assert_eq!(controller.admit(Gate::Guest), Admission::Allow);
    }

    fn signed_in(mock: &Arc<MockTransport>) -> Controller {
        let controller = controller(mock);
        controller.initialize();
        assert!(controller.is_authenticated());
        controller
    }

    #[test]
    fn profile_edit_updates_identity_in_place() {
        let mock = Arc::new(MockTransport::new(|req| {
            csrf_or(req, || match req.url.path() {
                "/api/edit-user/" => Ok(Response::json_body(200, json!({"success": true}))),
                _ => Ok(Response::json_body(200, me())),
            })
        }));
        let controller = signed_in(&mock);

        let user = controller
            .edit_profile(ProfileEdit {
                username: "jan".into(),
                name: " Jan Sin ".into(),
                bio: "o toki ".into(),
                remove_picture: true,
                password: None,
            })
            .unwrap();
        assert_eq!(user.display_name, "Jan Sin");
        assert_eq!(user.bio, "o toki");
        assert_eq!(user.counters.followers, 10);
        assert_eq!(controller.identity(), Some(user));

        let edit = mock.last(&Method::PATCH, "/api/edit-user/").unwrap();
        let form = edit.form.clone().unwrap();
        assert!(form.contains(&("first_name".to_string(), "Jan Sin".to_string())));
        assert!(form.contains(&("profile_picture".to_string(), String::new())));
        assert!(form.iter().all(|(key, _)| key != "new_password"));
        assert_eq!(edit.header("X-CSRFToken"), Some("tok"));
        assert_eq!(mock.count(&Method::GET, "/api/authenticated/"), 1);
    }

    #[test]
    fn wrong_current_password_surfaces_field_message() {
        let mock = Arc::new(MockTransport::new(|req| {
            csrf_or(req, || match req.url.path() {
                "/api/edit-user/" => Ok(Response::json_body(
                    400,
                    json!({"error": "Current password is incorrect."}),
                )),
                _ => Ok(Response::json_body(200, me())),
            })
        }));
        let controller = signed_in(&mock);
        let before = controller.identity();

        let err = controller
            .edit_profile(ProfileEdit {
                username: "jan".into(),
                name: "Other".into(),
                password: Some(PasswordChange {
                    current: "wrong".into(),
                    new: "n3w".into(),
                }),
                ..Default::default()
            })
            .unwrap_err();
        assert_eq!(
            err.field_message().as_deref(),
            Some("Current password is incorrect.")
        );
        assert_eq!(controller.identity(), before);
    }

    #[test]
    fn account_calls_need_a_session() {
        let mock = Arc::new(MockTransport::new(|_| Ok(Response::json_body(200, json!({})))));
        let controller = controller(&mock);
        assert!(matches!(
            controller.edit_profile(ProfileEdit {
                username: "jan".into(),
                ..Default::default()
            }),
            Err(SessionError::NotSignedIn)
        ));
        assert!(matches!(
            controller.delete_account(),
            Err(SessionError::NotSignedIn)
        ));
        assert!(mock.requests().is_empty());
    }

    #[test]
    fn deleted_account_ends_the_session() {
        let mock = Arc::new(MockTransport::new(|req| {
            csrf_or(req, || match req.url.path() {
                "/api/delete-user/" => Ok(Response::json_body(200, json!({"success": true}))),
                _ => Ok(Response::json_body(200, me())),
            })
        }));
        let controller = signed_in(&mock);
        controller.delete_account().unwrap();
        assert_eq!(controller.status(), Status::Anonymous);
        assert!(controller.identity().is_none());
        assert_eq!(mock.count(&Method::DELETE, "/api/delete-user/"), 1);
    }

    #[test]
    fn availability_checks_send_normalized_query() {
        let mock = Arc::new(MockTransport::new(|req| {
            let taken = req.url.query() == Some("username=jan");
            Ok(Response::json_body(200, json!({ "exists": taken })))
        }));
        let controller = controller(&mock);
        assert!(controller.username_exists(" Jan ").unwrap());
        assert!(!controller.email_exists("new@example.test").unwrap());
        assert!(!controller.username_exists("   ").unwrap());
        assert_eq!(mock.requests().len(), 2);
        assert_eq!(
            mock.last(&Method::GET, "/api/email-exists/").unwrap().url.query(),
            Some("email=new%40example.test")
        );
    }

    #[test]
    fn password_reset_confirmation_returns_username() {
        let mock = Arc::new(MockTransport::new(|req| {
            csrf_or(req, || {
                Ok(Response::json_body(200, json!({"success": true, "username": "jan"})))
            })
        }));
        let controller = controller(&mock);
        assert_eq!(
            controller.confirm_password_reset("MQ", "tok-1", "n3w").unwrap(),
            "jan"
        );
        let sent = mock
            .last(&Method::POST, "/api/password-reset/confirm/")
            .unwrap();
        assert_eq!(sent.body.unwrap()["new_password"], "n3w");

        assert!(matches!(
            controller.confirm_password_reset("MQ", "", "n3w"),
            Err(SessionError::MissingCredentials)
        ));
    }

    #[test]
    fn email_confirmation_posts_activation_key() {
        let mock = Arc::new(MockTransport::new(|req| {
            csrf_or(req, || Ok(Response::json_body(200, json!({"success": true}))))
        }));
        let controller = controller(&mock);
        controller.confirm_email("abc123").unwrap();
        assert_eq!(mock.count(&Method::POST, "/api/activate/abc123/"), 1);
    }
}
