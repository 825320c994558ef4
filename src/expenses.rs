//! Endpoints for recording and querying expenses.
//!
//! The list endpoint is the workhorse of the API: it filters the logged-in
//! user's expenses by date range, category and priority, computes summary
//! statistics over everything that matched, and returns one page of the
//! results. The statistics always describe the full filtered set, not just
//! the returned page.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    AppState, Error,
    auth::AuthUser,
    date_range::{DateRange, DateRangeParams, parse_param},
    models::{DatabaseID, Expense, User},
    pagination::page_slice,
    statistics::{Statistics, compute_statistics},
    stores::{CategoryStore, ExpenseData, ExpenseQuery, ExpenseStore, MonthlyTotal, PriorityStore},
};

/// The filter and pagination query parameters of the list endpoint.
///
/// The ID filters are strings for the same reason as [DateRangeParams]: a
/// malformed value should produce the application's own validation message.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ExpenseFilterParams {
    /// Only include expenses filed under this category ID.
    #[serde(default)]
    pub cat: Option<String>,
    /// Only include expenses with this priority ID.
    #[serde(default)]
    pub pri: Option<String>,
    /// The number of expenses per page. Zero means the default page size.
    #[serde(default)]
    pub limit: Option<u64>,
    /// Which page of the results to return, starting from 1.
    #[serde(default)]
    pub page: Option<u64>,
}

/// The body of a successful list response.
#[derive(Debug, Serialize)]
pub struct ExpensesResponse {
    /// The resolved date range the expenses were filtered by.
    pub date_range: DateRange,
    /// Summary figures over the full filtered set.
    pub statistics: Statistics,
    /// How many expenses matched the filters, across all pages.
    pub count: usize,
    /// The requested page of expenses.
    pub results: Vec<Expense>,
}

/// The user supplied fields of an expense, as sent over the wire.
#[derive(Debug, Clone, Deserialize)]
pub struct ExpensePayload {
    /// The amount of money spent.
    pub price: Decimal,
    /// Where the money was spent.
    #[serde(default)]
    pub place: String,
    /// The category to file the expense under, if any.
    #[serde(rename = "category", default)]
    pub category_id: Option<DatabaseID>,
    /// The priority rank of the expense, if any.
    #[serde(rename = "priority", default)]
    pub priority_id: Option<DatabaseID>,
}

/// Handler for listing, filtering and summarizing the logged-in user's
/// expenses.
///
/// # Errors
/// Returns [Error::Validation] for malformed filter parameters and
/// [Error::InvalidPage] when the requested page does not exist.
pub async fn get_expenses(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Query(date_params): Query<DateRangeParams>,
    Query(filter_params): Query<ExpenseFilterParams>,
) -> Result<Json<ExpensesResponse>, Error> {
    let today = OffsetDateTime::now_utc().date();
    let date_range = DateRange::resolve(&date_params, today)?;

    let category_id = parse_id_param(filter_params.cat.as_deref())?;
    let priority_id = parse_id_param(filter_params.pri.as_deref())?;

    let expenses = state.expense_store.get_query(&ExpenseQuery {
        user_id: user.id(),
        date_range: date_range.as_range(),
        category_id,
        priority_id,
    })?;

    let statistics = compute_statistics(&expenses);

    let page = filter_params
        .page
        .unwrap_or(state.pagination_config.default_page);
    let page_size = match filter_params.limit {
        Some(0) | None => state.pagination_config.default_page_size,
        Some(limit) => limit,
    };

    let results = page_slice(&expenses, page, page_size)
        .ok_or(Error::InvalidPage)?
        .to_vec();

    Ok(Json(ExpensesResponse {
        date_range,
        statistics,
        count: expenses.len(),
        results,
    }))
}

/// Handler for recording a new expense.
///
/// The expense's day is the server's current date; clients cannot set or
/// change it.
///
/// # Errors
/// Returns [Error::InvalidForeignKey] when the category or priority does not
/// exist or belongs to another user.
pub async fn create_expense(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(payload): Json<ExpensePayload>,
) -> Result<(StatusCode, Json<Expense>), Error> {
    let data = validate_references(&state, &user, payload)?;

    let today = OffsetDateTime::now_utc().date();
    let expense = state.expense_store.create(user.id(), today, data)?;

    Ok((StatusCode::CREATED, Json(expense)))
}

/// Handler for fetching a single expense.
pub async fn get_expense(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(expense_id): Path<DatabaseID>,
) -> Result<Json<Expense>, Error> {
    get_owned_expense(&state, &user, expense_id).map(Json)
}

/// Handler for editing an expense.
///
/// Only the price, place, category and priority can change; the day the
/// expense was recorded on stays fixed.
pub async fn update_expense(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(expense_id): Path<DatabaseID>,
    Json(payload): Json<ExpensePayload>,
) -> Result<Json<Expense>, Error> {
    get_owned_expense(&state, &user, expense_id)?;

    let data = validate_references(&state, &user, payload)?;

    state.expense_store.update(expense_id, data).map(Json)
}

/// Handler for deleting an expense.
pub async fn delete_expense(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(expense_id): Path<DatabaseID>,
) -> Result<StatusCode, Error> {
    get_owned_expense(&state, &user, expense_id)?;

    state.expense_store.delete(expense_id)?;

    Ok(StatusCode::NO_CONTENT)
}

/// The query parameters of the summary endpoint.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct SummaryParams {
    /// Which year to summarize. Defaults to the current year.
    #[serde(default)]
    pub year: Option<String>,
}

/// Handler for summing the logged-in user's spending per month of a year.
///
/// Months without expenses are omitted.
pub async fn get_monthly_summary(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Query(params): Query<SummaryParams>,
) -> Result<Json<Vec<MonthlyTotal>>, Error> {
    let year = match parse_param(params.year.as_deref(), 1..=9999)? {
        Some(year) => year,
        None => OffsetDateTime::now_utc().date().year(),
    };

    state.expense_store.monthly_totals(user.id(), year).map(Json)
}

fn parse_id_param(value: Option<&str>) -> Result<Option<DatabaseID>, Error> {
    let Some(text) = value else {
        return Ok(None);
    };

    if text.is_empty() {
        return Ok(None);
    }

    text.parse()
        .map(Some)
        .map_err(|_| Error::Validation("Value must be numeric".to_owned()))
}

fn get_owned_expense(
    state: &AppState,
    user: &User,
    expense_id: DatabaseID,
) -> Result<Expense, Error> {
    let expense = state.expense_store.get(expense_id)?;

    if expense.user_id != user.id() {
        return Err(Error::NotFound);
    }

    Ok(expense)
}

/// Check that the referenced category and priority exist and belong to
/// `user`, then convert the payload into store data.
fn validate_references(
    state: &AppState,
    user: &User,
    payload: ExpensePayload,
) -> Result<ExpenseData, Error> {
    if let Some(category_id) = payload.category_id {
        let category = state
            .category_store
            .get(category_id)
            .map_err(reference_error)?;

        if category.user_id != user.id() {
            return Err(Error::InvalidForeignKey);
        }
    }

    if let Some(priority_id) = payload.priority_id {
        let priority = state
            .priority_store
            .get(priority_id)
            .map_err(reference_error)?;

        if priority.user_id != user.id() {
            return Err(Error::InvalidForeignKey);
        }
    }

    Ok(ExpenseData {
        price: payload.price,
        place: payload.place,
        category_id: payload.category_id,
        priority_id: payload.priority_id,
    })
}

fn reference_error(error: Error) -> Error {
    match error {
        Error::NotFound => Error::InvalidForeignKey,
        error => error,
    }
}
