use crate::commands::finance::ledger_totals;
use crate::error::{DoelError, DoelResult};
use crate::middleware::auth::Claims;
use crate::models::{StaffStatus, TransactionType};
use crate::permissions::require_screen;
use crate::registry::{self, Registry};
use crate::state::AppState;
use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use axum::{Extension, Json};
use serde::Serialize;
use std::collections::HashMap;

pub const CSV_HEADERS: [&str; 4] = ["Metric Group", "Label", "Value", "Notes"];

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutePerformance {
    pub route: String,
    pub passengers: u32,
}

/// Booked seats grouped per route, heaviest first.
pub fn route_performance(registry: &Registry) -> Vec<RoutePerformance> {
    let mut by_route: HashMap<String, u32> = HashMap::new();
    for trip in &registry.trips {
        *by_route.entry(trip.route.clone()).or_insert(0) += trip.booked_seats;
    }
    let mut rows: Vec<RoutePerformance> = by_route
        .into_iter()
        .map(|(route, passengers)| RoutePerformance { route, passengers })
        .collect();
    rows.sort_by(|a, b| b.passengers.cmp(&a.passengers).then_with(|| a.route.cmp(&b.route)));
    rows
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryShare {
    pub category: String,
    pub amount: i64,
}

pub fn income_by_category(registry: &Registry) -> Vec<CategoryShare> {
    let mut by_category: HashMap<String, i64> = HashMap::new();
    for tx in &registry.transactions {
        if tx.tx_type == TransactionType::Income {
            *by_category.entry(tx.category.clone()).or_insert(0) += tx.amount;
        }
    }
    let mut rows: Vec<CategoryShare> = by_category
        .into_iter()
        .map(|(category, amount)| CategoryShare { category, amount })
        .collect();
    rows.sort_by(|a, b| b.amount.cmp(&a.amount).then_with(|| a.category.cmp(&b.category)));
    rows
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub total_trips: usize,
    pub total_revenue: i64,
    pub total_expense: i64,
    pub active_staff: usize,
    pub route_performance: Vec<RoutePerformance>,
    pub income_by_category: Vec<CategoryShare>,
}

pub fn report_summary(registry: &Registry) -> ReportSummary {
    let totals = ledger_totals(&registry.transactions);
    ReportSummary {
        total_trips: registry.trips.len(),
        total_revenue: totals.income,
        total_expense: totals.expense,
        active_staff: registry
            .staff
            .iter()
            .filter(|member| member.status == StaffStatus::Active)
            .count(),
        route_performance: route_performance(registry),
        income_by_category: income_by_category(registry),
    }
}

/// Comma-joined CSV with the fixed header set the export dialog promises.
pub fn export_csv(registry: &Registry) -> String {
    let summary = report_summary(registry);
    let mut rows: Vec<[String; 4]> = vec![
        [
            "Summary".to_string(),
            "Total Trips Run".to_string(),
            summary.total_trips.to_string(),
            "Monthly period".to_string(),
        ],
        [
            "Summary".to_string(),
            "Total Revenue".to_string(),
            summary.total_revenue.to_string(),
            "Currency: BDT".to_string(),
        ],
        [
            "Summary".to_string(),
            "Active Staff".to_string(),
            summary.active_staff.to_string(),
            "Deployment status".to_string(),
        ],
    ];
    for route in &summary.route_performance {
        rows.push([
            "Route Performance".to_string(),
            route.route.clone(),
            route.passengers.to_string(),
            "Passengers".to_string(),
        ]);
    }
    for share in &summary.income_by_category {
        rows.push([
            "Income Channels".to_string(),
            share.category.clone(),
            share.amount.to_string(),
            "Revenue".to_string(),
        ]);
    }

    let mut csv = CSV_HEADERS.join(",");
    for row in rows {
        csv.push('\n');
        csv.push_str(&row.join(","));
    }
    csv
}

pub async fn get_report_summary(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> DoelResult<Json<ReportSummary>> {
    require_screen(claims.role, "reports")?;
    let registry = state
        .registry
        .lock()
        .map_err(|e| DoelError::Internal(e.to_string()))?;
    Ok(Json(report_summary(&registry)))
}

pub async fn export_report_csv(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> DoelResult<impl IntoResponse> {
    require_screen(claims.role, "reports")?;
    let csv = {
        let registry = state
            .registry
            .lock()
            .map_err(|e| DoelError::Internal(e.to_string()))?;
        export_csv(&registry)
    };
    let filename = format!("Doel_Express_Report_{}.csv", registry::today());
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        csv,
    ))
}
