//! Ticket sales records and the ledger synchronizer that mirrors each
//! record as one income and one expense transaction.

use crate::error::{DoelError, DoelResult};
use crate::middleware::auth::Claims;
use crate::models::{
    LedgerKind, SalesDraft, TicketSalesRecord, Transaction, TransactionType, TripStatus,
};
use crate::permissions::require_screen;
use crate::registry::{self, find_by_id, find_by_id_mut, Registry};
use crate::state::AppState;
use axum::extract::{Json, Path, Query, State};
use axum::Extension;
use serde::Deserialize;
use std::collections::HashMap;

pub const INCOME_CATEGORY: &str = "Ticket Sales";
pub const EXPENSE_CATEGORY: &str = "Trip Operating Cost";

fn income_tx_id(record_id: &str) -> String {
    format!("TX-INC-{record_id}")
}

fn expense_tx_id(record_id: &str) -> String {
    format!("TX-EXP-{record_id}")
}

fn income_description(record: &TicketSalesRecord) -> String {
    format!(
        "Trip Income: {} (Coach: {})",
        record.reg_no, record.coach_no
    )
}

fn expense_description(record: &TicketSalesRecord) -> String {
    format!("Trip Cost: {} (Fuel + Exp)", record.reg_no)
}

/// Builds the derived income/expense pair for a record. Ids keep the
/// legacy TX-INC-/TX-EXP- shape; lookups go through the provenance fields.
pub fn derived_transactions(record: &TicketSalesRecord) -> (Transaction, Transaction) {
    let income = Transaction {
        id: income_tx_id(&record.id),
        date: record.date.clone(),
        tx_type: TransactionType::Income,
        category: INCOME_CATEGORY.to_string(),
        amount: record.total_taka,
        description: income_description(record),
        source_record_id: Some(record.id.clone()),
        kind: Some(LedgerKind::TripIncome),
    };
    let expense = Transaction {
        id: expense_tx_id(&record.id),
        date: record.date.clone(),
        tx_type: TransactionType::Expense,
        category: EXPENSE_CATEGORY.to_string(),
        amount: record.total_cost,
        description: expense_description(record),
        source_record_id: Some(record.id.clone()),
        kind: Some(LedgerKind::TripExpense),
    };
    (income, expense)
}

fn validate(record: &TicketSalesRecord) -> DoelResult<()> {
    if record.date.trim().is_empty() {
        return Err(DoelError::Validation("Record date is required.".to_string()));
    }
    if record.reg_no.trim().is_empty() || record.coach_no.trim().is_empty() {
        return Err(DoelError::Validation(
            "Registration and coach numbers are required.".to_string(),
        ));
    }
    Ok(())
}

/// Appends the record and its derived ledger pair. Runs entirely under the
/// registry lock, so either all three rows land or none do.
pub fn create_sales_record_internal(
    registry: &mut Registry,
    mut record: TicketSalesRecord,
) -> DoelResult<TicketSalesRecord> {
    if record.id.trim().is_empty() {
        record.id = registry::time_id("REC-");
    }
    if find_by_id(&registry.ticket_sales, &record.id).is_some() {
        return Err(DoelError::Validation(format!(
            "Sales record {} already exists",
            record.id
        )));
    }
    validate(&record)?;
    record.recompute();

    let (income, expense) = derived_transactions(&record);
    registry.ticket_sales.insert(0, record.clone());
    registry.transactions.insert(0, income);
    registry.transactions.insert(1, expense);
    Ok(record)
}

/// Replaces the record and patches the derived pair's amount and
/// description in place, preserving id, date and type. A derived entry
/// that was deleted out of band is skipped silently.
pub fn update_sales_record_internal(
    registry: &mut Registry,
    id: &str,
    mut updated: TicketSalesRecord,
) -> DoelResult<TicketSalesRecord> {
    if find_by_id(&registry.ticket_sales, id).is_none() {
        return Err(DoelError::NotFound(format!("Sales record {id}")));
    }
    updated.id = id.to_string();
    validate(&updated)?;
    updated.recompute();

    registry::replace_by_id(&mut registry.ticket_sales, id, updated.clone());

    for tx in registry
        .transactions
        .iter_mut()
        .filter(|tx| tx.source_record_id.as_deref() == Some(id))
    {
        match tx.kind {
            Some(LedgerKind::TripIncome) => {
                tx.amount = updated.total_taka;
                tx.description = income_description(&updated);
            }
            Some(LedgerKind::TripExpense) => {
                tx.amount = updated.total_cost;
                tx.description = expense_description(&updated);
            }
            None => {}
        }
    }

    Ok(updated)
}

/// Removes the record and both derived transactions, if present. Nothing
/// else in the ledger is touched.
pub fn delete_sales_record_internal(registry: &mut Registry, id: &str) -> DoelResult<()> {
    registry::remove_by_id(&mut registry.ticket_sales, id)
        .ok_or_else(|| DoelError::NotFound(format!("Sales record {id}")))?;
    registry
        .transactions
        .retain(|tx| tx.source_record_id.as_deref() != Some(id));
    Ok(())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CounterSaleInput {
    pub counter_id: String,
    pub trip_id: String,
    pub tickets_sold: u32,
    pub ticket_price: f64,
    #[serde(default)]
    pub discount: f64,
    #[serde(default)]
    pub sales_commission: f64,
}

/// Secondary entry path used by counter operators: a lightweight sale
/// against a trip, expanded into a full record before it hits the
/// synchronizer. The trip back-reference is always populated.
pub fn record_counter_sale_internal(
    registry: &mut Registry,
    input: CounterSaleInput,
    operator_name: &str,
) -> DoelResult<TicketSalesRecord> {
    let counter = find_by_id(&registry.counters, &input.counter_id)
        .ok_or_else(|| DoelError::NotFound(format!("Counter {}", input.counter_id)))?;
    if !counter.is_active {
        return Err(DoelError::Validation(format!(
            "Counter '{}' is inactive",
            counter.name
        )));
    }
    let counter_name = counter.name.clone();

    let trip = find_by_id(&registry.trips, &input.trip_id)
        .ok_or_else(|| DoelError::NotFound(format!("Trip {}", input.trip_id)))?;
    if input.tickets_sold == 0 {
        return Err(DoelError::Validation(
            "At least one ticket must be sold.".to_string(),
        ));
    }

    let total =
        (input.tickets_sold as f64 * input.ticket_price - input.discount).round() as i64;
    let now = chrono::Local::now();

    let record = TicketSalesRecord {
        id: registry::time_id("REC-"),
        date: now.format("%Y-%m-%d").to_string(),
        reg_no: trip.bus_number.clone(),
        coach_no: trip.coach_no.clone(),
        driver_name: trip.driver.clone(),
        guide_name: "Counter Staff".to_string(),
        departure_date: trip
            .departure_time
            .split(' ')
            .next()
            .unwrap_or_default()
            .to_string(),
        departure_seat_qty: input.tickets_sold,
        departure_taka: total,
        return_date: String::new(),
        return_seat_qty: 0,
        return_taka: 0,
        total_taka: 0,
        diesel_ltr: 0.0,
        diesel_cost: 0,
        trip_cost: 0,
        total_cost: 0,
        net_profit: 0,
        abdullahpur_office: 0,
        coxsbazar_office: 0,
        sonargaon_office: 0,
        dmd: 0,
        trip_id: Some(trip.id.clone()),
        bus_number: Some(trip.bus_number.clone()),
        counter_name: Some(counter_name),
        operator_name: Some(operator_name.to_string()),
        tickets_sold: Some(input.tickets_sold),
        ticket_price: Some(input.ticket_price),
        discount: Some(input.discount),
        sales_commission: Some(input.sales_commission),
        total_amount: Some(total),
        time: Some(now.format("%I:%M %p").to_string()),
    };

    let record = create_sales_record_internal(registry, record)?;

    if let Some(counter) = find_by_id_mut(&mut registry.counters, &input.counter_id) {
        counter.last_sync = Some(now.format("%Y-%m-%d %I:%M %p").to_string());
    }

    Ok(record)
}

#[derive(Debug, Default, Deserialize)]
pub struct SalesFilter {
    pub q: Option<String>,
    #[serde(rename = "startDate")]
    pub start_date: Option<String>,
    #[serde(rename = "endDate")]
    pub end_date: Option<String>,
}

pub fn filter_records(
    records: &[TicketSalesRecord],
    filter: &SalesFilter,
) -> Vec<TicketSalesRecord> {
    let query = filter.q.as_deref().unwrap_or("").to_lowercase();
    records
        .iter()
        .filter(|record| {
            let search_match = query.is_empty()
                || record.reg_no.to_lowercase().contains(&query)
                || record.driver_name.to_lowercase().contains(&query)
                || record.coach_no.to_lowercase().contains(&query);
            let after_start = filter
                .start_date
                .as_deref()
                .map(|start| record.date.as_str() >= start)
                .unwrap_or(true);
            let before_end = filter
                .end_date
                .as_deref()
                .map(|end| record.date.as_str() <= end)
                .unwrap_or(true);
            search_match && after_start && before_end
        })
        .cloned()
        .collect()
}

/// Daily totalTaka series for the sales chart, oldest date first.
pub fn daily_sales(records: &[TicketSalesRecord]) -> Vec<(String, i64)> {
    let mut by_date: HashMap<String, i64> = HashMap::new();
    for record in records {
        *by_date.entry(record.date.clone()).or_insert(0) += record.total_taka;
    }
    let mut series: Vec<(String, i64)> = by_date.into_iter().collect();
    series.sort_by(|a, b| a.0.cmp(&b.0));
    series
}

pub async fn get_sales_records(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(filter): Query<SalesFilter>,
) -> DoelResult<Json<Vec<TicketSalesRecord>>> {
    require_screen(claims.role, "ticketSalesRecord")?;
    let registry = state
        .registry
        .lock()
        .map_err(|e| DoelError::Internal(e.to_string()))?;
    Ok(Json(filter_records(&registry.ticket_sales, &filter)))
}

pub async fn create_sales_record(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(record): Json<TicketSalesRecord>,
) -> DoelResult<Json<TicketSalesRecord>> {
    require_screen(claims.role, "ticketSalesRecord")?;
    let mut registry = state
        .registry
        .lock()
        .map_err(|e| DoelError::Internal(e.to_string()))?;
    let record = create_sales_record_internal(&mut registry, record)?;
    tracing::info!(
        "Sales record {} booked: taka {} / cost {}",
        record.id,
        record.total_taka,
        record.total_cost
    );
    Ok(Json(record))
}

pub async fn update_sales_record(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
    Json(record): Json<TicketSalesRecord>,
) -> DoelResult<Json<TicketSalesRecord>> {
    require_screen(claims.role, "ticketSalesRecord")?;
    let mut registry = state
        .registry
        .lock()
        .map_err(|e| DoelError::Internal(e.to_string()))?;
    let record = update_sales_record_internal(&mut registry, &id, record)?;
    Ok(Json(record))
}

pub async fn delete_sales_record(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> DoelResult<Json<serde_json::Value>> {
    require_screen(claims.role, "ticketSalesRecord")?;
    let mut registry = state
        .registry
        .lock()
        .map_err(|e| DoelError::Internal(e.to_string()))?;
    delete_sales_record_internal(&mut registry, &id)?;
    Ok(Json(serde_json::json!({ "success": true })))
}

/// Hands the staged draft to the sales form. Take semantics: the first
/// call after a finalize gets it, any later call gets nothing.
pub async fn take_sales_draft(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> DoelResult<Json<Option<SalesDraft>>> {
    require_screen(claims.role, "ticketSalesRecord")?;
    let draft = state
        .pending_sale
        .lock()
        .map(|mut pending| pending.take())
        .unwrap_or(None);
    Ok(Json(draft))
}

pub async fn record_counter_sale(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(input): Json<CounterSaleInput>,
) -> DoelResult<Json<TicketSalesRecord>> {
    require_screen(claims.role, "ticketSalesRecord")?;
    let operator = claims.username.as_deref().unwrap_or("System").to_string();
    let mut registry = state
        .registry
        .lock()
        .map_err(|e| DoelError::Internal(e.to_string()))?;
    let record = record_counter_sale_internal(&mut registry, input, &operator)?;
    tracing::info!(
        "Counter sale {} recorded by {}",
        record.id,
        operator
    );
    Ok(Json(record))
}

// Trips completed recently surface on the sales screen for cross-checking.
pub async fn get_completed_trips(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> DoelResult<Json<Vec<crate::models::Trip>>> {
    require_screen(claims.role, "ticketSalesRecord")?;
    let registry = state
        .registry
        .lock()
        .map_err(|e| DoelError::Internal(e.to_string()))?;
    Ok(Json(
        registry
            .trips
            .iter()
            .filter(|trip| trip.status == TripStatus::Completed)
            .cloned()
            .collect(),
    ))
}
