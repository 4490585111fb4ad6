use crate::error::{DoelError, DoelResult};
use crate::middleware::auth::Claims;
use crate::models::{Transaction, TransactionType};
use crate::permissions::require_screen;
use crate::registry::{self, remove_by_id, replace_by_id, Registry};
use crate::state::AppState;
use axum::extract::{Json, Path, State};
use axum::Extension;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionInput {
    pub date: String,
    #[serde(rename = "type")]
    pub tx_type: TransactionType,
    pub category: String,
    pub amount: i64,
    pub description: String,
}

fn validate(input: &TransactionInput) -> DoelResult<()> {
    if input.date.trim().is_empty() || input.category.trim().is_empty() {
        return Err(DoelError::Validation(
            "Date and category are required.".to_string(),
        ));
    }
    if input.amount < 0 {
        return Err(DoelError::Validation(
            "Amount cannot be negative.".to_string(),
        ));
    }
    Ok(())
}

/// Manually entered ledger rows carry no sales-record provenance.
pub fn create_transaction_internal(
    registry: &mut Registry,
    input: TransactionInput,
) -> DoelResult<Transaction> {
    validate(&input)?;
    let tx = Transaction {
        id: registry::time_id("TX"),
        date: input.date,
        tx_type: input.tx_type,
        category: input.category,
        amount: input.amount,
        description: input.description,
        source_record_id: None,
        kind: None,
    };
    registry.transactions.insert(0, tx.clone());
    Ok(tx)
}

pub fn update_transaction_internal(
    registry: &mut Registry,
    id: &str,
    input: TransactionInput,
) -> DoelResult<Transaction> {
    validate(&input)?;
    let existing = registry
        .transactions
        .iter()
        .find(|tx| tx.id == id)
        .ok_or_else(|| DoelError::NotFound(format!("Transaction {id}")))?;
    // A hand-edited derived row keeps its provenance; the synchronizer
    // will re-assert amounts on the next sales update.
    let tx = Transaction {
        id: id.to_string(),
        date: input.date,
        tx_type: input.tx_type,
        category: input.category,
        amount: input.amount,
        description: input.description,
        source_record_id: existing.source_record_id.clone(),
        kind: existing.kind,
    };
    replace_by_id(&mut registry.transactions, id, tx.clone());
    Ok(tx)
}

#[derive(Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerTotals {
    pub income: i64,
    pub expense: i64,
    pub balance: i64,
}

pub fn ledger_totals(transactions: &[Transaction]) -> LedgerTotals {
    let mut totals = LedgerTotals::default();
    for tx in transactions {
        match tx.tx_type {
            TransactionType::Income => totals.income += tx.amount,
            TransactionType::Expense => totals.expense += tx.amount,
        }
    }
    totals.balance = totals.income - totals.expense;
    totals
}

pub async fn get_transactions(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> DoelResult<Json<Vec<Transaction>>> {
    require_screen(claims.role, "finance")?;
    let registry = state
        .registry
        .lock()
        .map_err(|e| DoelError::Internal(e.to_string()))?;
    Ok(Json(registry.transactions.clone()))
}

pub async fn get_ledger_totals(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> DoelResult<Json<LedgerTotals>> {
    require_screen(claims.role, "finance")?;
    let registry = state
        .registry
        .lock()
        .map_err(|e| DoelError::Internal(e.to_string()))?;
    Ok(Json(ledger_totals(&registry.transactions)))
}

pub async fn create_transaction(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(input): Json<TransactionInput>,
) -> DoelResult<Json<Transaction>> {
    require_screen(claims.role, "finance")?;
    let mut registry = state
        .registry
        .lock()
        .map_err(|e| DoelError::Internal(e.to_string()))?;
    let tx = create_transaction_internal(&mut registry, input)?;
    tracing::info!("Ledger entry {} added ({:?})", tx.id, tx.tx_type);
    Ok(Json(tx))
}

pub async fn update_transaction(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
    Json(input): Json<TransactionInput>,
) -> DoelResult<Json<Transaction>> {
    require_screen(claims.role, "finance")?;
    let mut registry = state
        .registry
        .lock()
        .map_err(|e| DoelError::Internal(e.to_string()))?;
    let tx = update_transaction_internal(&mut registry, &id, input)?;
    Ok(Json(tx))
}

pub async fn delete_transaction(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> DoelResult<Json<serde_json::Value>> {
    require_screen(claims.role, "finance")?;
    let mut registry = state
        .registry
        .lock()
        .map_err(|e| DoelError::Internal(e.to_string()))?;
    remove_by_id(&mut registry.transactions, &id)
        .ok_or_else(|| DoelError::NotFound(format!("Transaction {id}")))?;
    Ok(Json(serde_json::json!({ "success": true })))
}
