use std::time::Duration;

use crate::api::models::{AuthResponse, Credentials, Registration};
use crate::error::{ClientError, ClientResult};
use crate::ops::AppContext;
use crate::view::controller::Notice;

/// How long the success message stays up before the main tabs appear.
pub const TRANSITION_DELAY: Duration = Duration::from_millis(1000);

pub const MIN_USERNAME_LEN: usize = 3;
pub const MIN_PASSWORD_LEN: usize = 6;

pub fn validate_login(username: &str, password: &str) -> ClientResult<Credentials> {
    let username = username.trim();
    if username.is_empty() || password.is_empty() {
        return Err(ClientError::Validation(
            "Please enter username and password".to_string(),
        ));
    }
    Ok(Credentials {
        username: username.to_string(),
        password: password.to_string(),
    })
}

pub fn validate_registration(
    username: &str,
    password: &str,
    email: &str,
) -> ClientResult<Registration> {
    let username = username.trim();
    if username.is_empty() || password.is_empty() {
        return Err(ClientError::Validation(
            "Please enter username and password".to_string(),
        ));
    }
    if username.chars().count() < MIN_USERNAME_LEN {
        return Err(ClientError::Validation(format!(
            "Username must be at least {} characters",
            MIN_USERNAME_LEN
        )));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ClientError::Validation(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    Ok(Registration {
        username: username.to_string(),
        password: password.to_string(),
        email: email.trim().to_string(),
    })
}

pub async fn login(ctx: &mut AppContext, username: &str, password: &str) -> ClientResult<()> {
    authenticate(ctx, username, password).await?;
    finish_transition(ctx).await;
    Ok(())
}

pub async fn register(
    ctx: &mut AppContext,
    username: &str,
    password: &str,
    email: &str,
) -> ClientResult<()> {
    create_account(ctx, username, password, email).await?;
    finish_transition(ctx).await;
    Ok(())
}

/// Validate, log in and persist the session. The view stays on the auth
/// surface showing the success message until `finish_transition`.
pub async fn authenticate(ctx: &mut AppContext, username: &str, password: &str) -> ClientResult<()> {
    let credentials = match validate_login(username, password) {
        Ok(c) => c,
        Err(e) => return reject(ctx, e),
    };

    match ctx.api.login(&credentials).await {
        Ok(response) => {
            let greeting = format!("Login successful! Welcome back, {}", response.username);
            establish(ctx, response, greeting)
        }
        Err(e) => {
            tracing::info!(username = %credentials.username, error = %e, "login failed");
            ctx.view.auth_notice = Some(Notice::Error(e.user_message("Login failed")));
            Err(e)
        }
    }
}

/// Registration counterpart of `authenticate`.
pub async fn create_account(
    ctx: &mut AppContext,
    username: &str,
    password: &str,
    email: &str,
) -> ClientResult<()> {
    let registration = match validate_registration(username, password, email) {
        Ok(r) => r,
        Err(e) => return reject(ctx, e),
    };

    match ctx.api.register(&registration).await {
        Ok(response) => {
            let greeting = format!("Registration successful! Welcome, {}", response.username);
            establish(ctx, response, greeting)
        }
        Err(e) => {
            tracing::info!(username = %registration.username, error = %e, "registration failed");
            ctx.view.auth_notice = Some(Notice::Error(e.user_message("Registration failed")));
            Err(e)
        }
    }
}

/// Hold the success message for `TRANSITION_DELAY`, then show the main tabs.
pub async fn finish_transition(ctx: &mut AppContext) {
    tokio::time::sleep(TRANSITION_DELAY).await;
    if ctx.session.is_some() {
        ctx.view.enter_authenticated();
    }
}

pub fn logout(ctx: &mut AppContext) -> ClientResult<()> {
    let result = ctx.store.clear();
    if let Err(e) = &result {
        tracing::warn!(error = %e, "failed to clear stored session");
    }
    ctx.session = None;
    ctx.view.enter_unauthenticated();
    ctx.view.auth_notice = Some(Notice::Success("Logged out".to_string()));
    result
}

fn reject(ctx: &mut AppContext, err: ClientError) -> ClientResult<()> {
    ctx.view.auth_notice = Some(Notice::Error(err.to_string()));
    Err(err)
}

fn establish(ctx: &mut AppContext, response: AuthResponse, greeting: String) -> ClientResult<()> {
    let session = response.into_session();
    if let Err(e) = ctx.store.save(&session) {
        ctx.view.auth_notice = Some(Notice::Error(e.to_string()));
        return Err(e);
    }
    tracing::info!(username = %session.user.username, "session established");
    ctx.session = Some(session);
    ctx.view.auth_notice = Some(Notice::Success(greeting));
    Ok(())
}
