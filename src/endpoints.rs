//! Defines the API routes.

/// Create a new account.
pub const REGISTER: &str = "/register";

/// Activate an account with the token from registration.
pub const ACTIVATE: &str = "/activate/{token}";

/// Trade an email and password for an access and refresh token.
pub const GET_TOKENS: &str = "/get-tokens";

/// Mint a new access token from the refresh token cookie.
pub const REFRESH_TOKEN: &str = "/refresh-token";

/// View the logged-in user's profile.
pub const PROFILE: &str = "/profile";

/// Update the logged-in user's name.
pub const PROFILE_UPDATE: &str = "/profile-update";

/// Change the logged-in user's password.
pub const PASSWORD_CHANGE: &str = "/password-change";

/// List, filter and create expenses.
pub const EXPENSES: &str = "/expenses";

/// View, edit or delete a single expense.
pub const EXPENSE: &str = "/expenses/{expense_id}";

/// List and create expense categories.
pub const CATEGORIES: &str = "/category";

/// View, rename or delete a single category.
pub const CATEGORY: &str = "/category/{category_id}";

/// List and create priority ranks.
pub const PRIORITIES: &str = "/priority";

/// View, rename or delete a single priority.
pub const PRIORITY: &str = "/priority/{priority_id}";

/// Sum the logged-in user's spending per month of a year.
pub const SUMMARY: &str = "/summary";

/// Replace the path parameter of `endpoint` (e.g. `{expense_id}`) with `id`.
pub fn format_endpoint(endpoint: &str, id: impl std::fmt::Display) -> String {
    let Some((prefix, parameter_and_rest)) = endpoint.split_once('{') else {
        return endpoint.to_owned();
    };

    let suffix = parameter_and_rest
        .split_once('}')
        .map(|(_, rest)| rest)
        .unwrap_or("");

    format!("{prefix}{id}{suffix}")
}

#[cfg(test)]
mod endpoints_tests {
    use axum::http::Uri;

    use super::format_endpoint;

    #[test]
    fn endpoints_are_valid_uris() {
        let endpoints = [
            super::REGISTER,
            super::ACTIVATE,
            super::GET_TOKENS,
            super::REFRESH_TOKEN,
            super::PROFILE,
            super::PROFILE_UPDATE,
            super::PASSWORD_CHANGE,
            super::EXPENSES,
            super::EXPENSE,
            super::CATEGORIES,
            super::CATEGORY,
            super::PRIORITIES,
            super::PRIORITY,
            super::SUMMARY,
        ];

        for endpoint in endpoints {
            let formatted = format_endpoint(endpoint, 42);

            assert!(
                formatted.parse::<Uri>().is_ok(),
                "endpoint {endpoint} formats to invalid URI {formatted}"
            );
            assert!(!formatted.contains(['{', '}']));
        }
    }

    #[test]
    fn format_endpoint_substitutes_the_id() {
        assert_eq!(format_endpoint(super::EXPENSE, 7), "/expenses/7");
        assert_eq!(format_endpoint(super::ACTIVATE, "abc"), "/activate/abc");
    }

    #[test]
    fn format_endpoint_leaves_plain_paths_alone() {
        assert_eq!(format_endpoint(super::EXPENSES, 7), "/expenses");
    }
}
