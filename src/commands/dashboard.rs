use crate::commands::finance::ledger_totals;
use crate::commands::inventory::low_stock_count;
use crate::commands::sales::daily_sales;
use crate::error::{DoelError, DoelResult};
use crate::middleware::auth::Claims;
use crate::models::StaffStatus;
use crate::permissions::require_screen;
use crate::registry::Registry;
use crate::state::AppState;
use axum::extract::{Json, State};
use axum::Extension;
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub gross_income: i64,
    pub total_expense: i64,
    pub net_balance: i64,
    pub active_fleet: usize,
    pub ledger_entries: usize,
    pub active_staff: usize,
    pub low_stock_items: usize,
    pub pending_user_approvals: usize,
}

pub fn dashboard_stats(registry: &Registry) -> DashboardStats {
    let totals = ledger_totals(&registry.transactions);
    DashboardStats {
        gross_income: totals.income,
        total_expense: totals.expense,
        net_balance: totals.balance,
        active_fleet: registry.trips.len(),
        ledger_entries: registry.transactions.len(),
        active_staff: registry
            .staff
            .iter()
            .filter(|member| member.status == StaffStatus::Active)
            .count(),
        low_stock_items: low_stock_count(registry),
        pending_user_approvals: registry
            .users
            .iter()
            .filter(|user| !user.is_approved)
            .count(),
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CounterThroughput {
    pub name: String,
    pub sold: u32,
}

/// Tickets sold per counter, busiest first. Records without counter
/// metadata are attributed to the main station.
pub fn counter_performance(registry: &Registry) -> Vec<CounterThroughput> {
    let mut by_counter: HashMap<String, u32> = HashMap::new();
    for record in &registry.ticket_sales {
        let name = record
            .counter_name
            .clone()
            .unwrap_or_else(|| "Main Station".to_string());
        *by_counter.entry(name).or_insert(0) += record.tickets_sold.unwrap_or(0);
    }
    let mut rows: Vec<CounterThroughput> = by_counter
        .into_iter()
        .map(|(name, sold)| CounterThroughput { name, sold })
        .collect();
    rows.sort_by(|a, b| b.sold.cmp(&a.sold).then_with(|| a.name.cmp(&b.name)));
    rows
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySalesPoint {
    pub date: String,
    pub amount: i64,
}

pub async fn get_dashboard_stats(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> DoelResult<Json<DashboardStats>> {
    require_screen(claims.role, "dashboard")?;
    let registry = state
        .registry
        .lock()
        .map_err(|e| DoelError::Internal(e.to_string()))?;
    Ok(Json(dashboard_stats(&registry)))
}

pub async fn get_counter_performance(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> DoelResult<Json<Vec<CounterThroughput>>> {
    require_screen(claims.role, "dashboard")?;
    let registry = state
        .registry
        .lock()
        .map_err(|e| DoelError::Internal(e.to_string()))?;
    Ok(Json(counter_performance(&registry)))
}

pub async fn get_daily_sales(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> DoelResult<Json<Vec<DailySalesPoint>>> {
    require_screen(claims.role, "dashboard")?;
    let registry = state
        .registry
        .lock()
        .map_err(|e| DoelError::Internal(e.to_string()))?;
    let series = daily_sales(&registry.ticket_sales)
        .into_iter()
        .map(|(date, amount)| DailySalesPoint { date, amount })
        .collect();
    Ok(Json(series))
}
