// Fintrack - REST API
// Expense CRUD over axum, one storage session per request

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    response::Json,
    routing::{get, put},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::db::{self, Database, Expense, NewExpense, Session};
use crate::error::{ApiError, ApiResult};
use crate::schema::{ExpenseInput, ExpenseOutput, ExpenseUpdate, ListParams, Message, RootStatus};

pub const ROOT_MESSAGE: &str = "API Fintrack rodando!";
pub const DELETED_MESSAGE: &str = "Despesa deletada com sucesso";

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    db: Database,
}

impl From<ExpenseInput> for NewExpense {
    fn from(input: ExpenseInput) -> Self {
        Self {
            description: input.description,
            amount: input.amount,
            date: input.date,
        }
    }
}

impl From<Expense> for ExpenseOutput {
    fn from(expense: Expense) -> Self {
        Self {
            id: expense.id,
            description: expense.description,
            amount: expense.amount,
            date: expense.date,
        }
    }
}

/// Run one unit of work on its own session, off the async runtime.
/// The session is dropped inside the blocking task on every exit path.
async fn with_session<T, F>(state: &AppState, work: F) -> ApiResult<T>
where
    F: FnOnce(&Session) -> anyhow::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let db = state.db.clone();
    let result = tokio::task::spawn_blocking(move || db.with_session(work)).await??;
    Ok(result)
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET / - Liveness message
async fn root() -> Json<RootStatus> {
    Json(RootStatus {
        msg: ROOT_MESSAGE.to_string(),
    })
}

/// POST /expenses/ - Create an expense
async fn create_expense(
    State(state): State<AppState>,
    body: Result<Json<ExpenseInput>, JsonRejection>,
) -> ApiResult<Json<ExpenseOutput>> {
    let Json(input) = body?;
    let new_expense = NewExpense::from(input);

    let expense = with_session(&state, move |session| db::insert_expense(session, &new_expense)).await?;
    tracing::info!(id = expense.id, "expense created");

    Ok(Json(expense.into()))
}

/// GET /expenses/?skip=&limit= - List expenses in storage order
async fn list_expenses(
    State(state): State<AppState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> ApiResult<Json<Vec<ExpenseOutput>>> {
    let Query(ListParams { skip, limit }) = params?;

    let expenses = with_session(&state, move |session| db::list_expenses(session, skip, limit)).await?;
    tracing::debug!(skip, limit, returned = expenses.len(), "expenses listed");

    Ok(Json(expenses.into_iter().map(ExpenseOutput::from).collect()))
}

/// PUT /expenses/:id - Overwrite every field of an expense
async fn update_expense(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Json<ExpenseUpdate>, JsonRejection>,
) -> ApiResult<Json<ExpenseOutput>> {
    let Path(id) = id?;
    let Json(update) = body?;
    let new_values = NewExpense::from(update);

    match with_session(&state, move |session| db::update_expense(session, id, &new_values)).await? {
        Some(expense) => {
            tracing::info!(id, "expense updated");
            Ok(Json(expense.into()))
        }
        None => {
            tracing::warn!(id, "update of unknown expense");
            Err(ApiError::NotFound)
        }
    }
}

/// DELETE /expenses/:id - Remove an expense permanently
async fn delete_expense(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<Message>> {
    let Path(id) = id?;

    if with_session(&state, move |session| db::delete_expense(session, id)).await? {
        tracing::info!(id, "expense deleted");
        Ok(Json(Message::new(DELETED_MESSAGE)))
    } else {
        tracing::warn!(id, "delete of unknown expense");
        Err(ApiError::NotFound)
    }
}

// ============================================================================
// Router
// ============================================================================

/// Build the application router over an opened database
pub fn router(db: Database) -> Router {
    let state = AppState { db };

    let expense_routes = Router::new()
        .route("/expenses/", get(list_expenses).post(create_expense))
        .route("/expenses", get(list_expenses).post(create_expense))
        .route("/expenses/:id", put(update_expense).delete(delete_expense));

    Router::new()
        .route("/", get(root))
        .merge(expense_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        // Any origin, method and header, with credentials: mirrors the request back
        .layer(CorsLayer::very_permissive())
}
