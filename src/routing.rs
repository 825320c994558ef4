//! Assembles the route handlers into the application's router.

use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use crate::{
    AppState,
    auth::{csrf_guard, get_tokens, refresh_token},
    categories::{
        create_category, delete_category, get_categories, get_category, update_category,
    },
    endpoints,
    expenses::{
        create_expense, delete_expense, get_expense, get_expenses, get_monthly_summary,
        update_expense,
    },
    priorities::{
        create_priority, delete_priority, get_priorities, get_priority, update_priority,
    },
    profile::{change_password, get_profile, update_profile},
    register::{activate_account, register_user},
};

/// Create the router for the server.
///
/// Registration, activation and log-in are open to everyone. Everything else
/// requires a bearer access token (enforced per handler by the [AuthUser]
/// extractor) and, for state changing methods, a CSRF token.
///
/// [AuthUser]: crate::auth::AuthUser
pub fn build_router(state: AppState) -> Router {
    let open_routes = Router::new()
        .route(endpoints::REGISTER, post(register_user))
        .route(endpoints::ACTIVATE, get(activate_account))
        .route(endpoints::GET_TOKENS, post(get_tokens));

    let protected_routes = Router::new()
        .route(endpoints::REFRESH_TOKEN, post(refresh_token))
        .route(endpoints::PROFILE, get(get_profile))
        .route(endpoints::PROFILE_UPDATE, put(update_profile))
        .route(endpoints::PASSWORD_CHANGE, put(change_password))
        .route(
            endpoints::EXPENSES,
            get(get_expenses).post(create_expense),
        )
        .route(
            endpoints::EXPENSE,
            get(get_expense).put(update_expense).delete(delete_expense),
        )
        .route(
            endpoints::CATEGORIES,
            get(get_categories).post(create_category),
        )
        .route(
            endpoints::CATEGORY,
            get(get_category).put(update_category).delete(delete_category),
        )
        .route(
            endpoints::PRIORITIES,
            get(get_priorities).post(create_priority),
        )
        .route(
            endpoints::PRIORITY,
            get(get_priority).put(update_priority).delete(delete_priority),
        )
        .route(endpoints::SUMMARY, get(get_monthly_summary))
        .layer(middleware::from_fn(csrf_guard));

    open_routes.merge(protected_routes).with_state(state)
}

#[cfg(test)]
mod routing_tests {
    use axum::http::StatusCode;
    use axum_extra::extract::cookie::Cookie;
    use axum_test::TestServer;
    use rusqlite::Connection;
    use serde_json::{Value, json};

    use crate::{
        AppState, PaginationConfig,
        auth::{CSRF_COOKIE_NAME, CSRF_HEADER_NAME, REFRESH_COOKIE_NAME},
        endpoints,
    };

    use super::build_router;

    const EMAIL: &str = "router@test.dev";
    const PASSWORD: &str = "correcthorsebatterystaple25";

    fn get_fixture() -> (AppState, TestServer) {
        let connection = Connection::open_in_memory().unwrap();
        let state =
            AppState::new(connection, "a test secret", PaginationConfig::default()).unwrap();
        let server = TestServer::new(build_router(state.clone()));

        (state, server)
    }

    async fn register_and_activate(state: &AppState, server: &TestServer) {
        use crate::stores::ActivationStore;

        server
            .post(endpoints::REGISTER)
            .json(&json!({ "email": EMAIL, "password": PASSWORD }))
            .await
            .assert_status(StatusCode::CREATED);

        let email = EMAIL.parse().unwrap();
        state
            .activation_store
            .create(&email, "router-test-token")
            .unwrap();

        server
            .get(&endpoints::format_endpoint(
                endpoints::ACTIVATE,
                "router-test-token",
            ))
            .await
            .assert_status_ok();
    }

    #[tokio::test]
    async fn full_login_flow_reaches_protected_routes() {
        let (state, server) = get_fixture();
        register_and_activate(&state, &server).await;

        let login = server
            .post(endpoints::GET_TOKENS)
            .json(&json!({ "email": EMAIL, "password": PASSWORD }))
            .await;
        login.assert_status_ok();

        let access_token = login.json::<Value>()["access_token"]
            .as_str()
            .unwrap()
            .to_owned();
        let csrf_token = login.cookie(CSRF_COOKIE_NAME).value().to_owned();

        // A read does not need CSRF.
        server
            .get(endpoints::EXPENSES)
            .authorization_bearer(&access_token)
            .await
            .assert_status_ok();

        // A write does.
        let blocked = server
            .post(endpoints::CATEGORIES)
            .authorization_bearer(&access_token)
            .json(&json!({ "name": "Groceries" }))
            .await;
        blocked.assert_status(StatusCode::FORBIDDEN);

        let allowed = server
            .post(endpoints::CATEGORIES)
            .authorization_bearer(&access_token)
            .add_cookie(Cookie::new(CSRF_COOKIE_NAME, csrf_token.clone()))
            .add_header(CSRF_HEADER_NAME, csrf_token)
            .json(&json!({ "name": "Groceries" }))
            .await;
        allowed.assert_status(StatusCode::CREATED);
    }

    #[tokio::test]
    async fn refresh_route_requires_csrf() {
        let (state, server) = get_fixture();
        register_and_activate(&state, &server).await;

        let login = server
            .post(endpoints::GET_TOKENS)
            .json(&json!({ "email": EMAIL, "password": PASSWORD }))
            .await;
        let refresh_cookie = login.cookie(REFRESH_COOKIE_NAME).value().to_owned();
        let csrf_token = login.cookie(CSRF_COOKIE_NAME).value().to_owned();

        let blocked = server
            .post(endpoints::REFRESH_TOKEN)
            .add_cookie(Cookie::new(REFRESH_COOKIE_NAME, refresh_cookie.clone()))
            .await;
        blocked.assert_status(StatusCode::FORBIDDEN);

        let allowed = server
            .post(endpoints::REFRESH_TOKEN)
            .add_cookie(Cookie::new(REFRESH_COOKIE_NAME, refresh_cookie))
            .add_cookie(Cookie::new(CSRF_COOKIE_NAME, csrf_token.clone()))
            .add_header(CSRF_HEADER_NAME, csrf_token)
            .await;
        allowed.assert_status_ok();
        assert!(
            allowed.json::<Value>()["access_token"]
                .as_str()
                .is_some_and(|token| !token.is_empty())
        );
    }

    #[tokio::test]
    async fn protected_routes_reject_anonymous_requests() {
        let (_state, server) = get_fixture();

        let response = server.get(endpoints::PROFILE).await;

        response.assert_status(StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.json::<Value>(),
            json!({ "detail": "Authentication credentials were not provided." })
        );
    }

    #[tokio::test]
    async fn open_routes_do_not_need_tokens() {
        let (_state, server) = get_fixture();

        // Registration is reachable without any token or cookie.
        let response = server
            .post(endpoints::REGISTER)
            .json(&json!({ "email": EMAIL, "password": PASSWORD }))
            .await;

        response.assert_status(StatusCode::CREATED);
    }
}
