//! Dashboard insight text from the Gemini generateContent endpoint. One
//! attempt per trigger, no retry; any failure degrades to a fixed
//! fallback string. A generation counter keeps a slow early call from
//! clobbering the result of a newer one.

use crate::error::{DoelError, DoelResult};
use crate::middleware::auth::Claims;
use crate::permissions::require_screen;
use crate::state::AppState;
use axum::extract::{Json, State};
use axum::Extension;
use serde::Serialize;

pub const INSIGHT_FALLBACK: &str = "Unable to load AI insights at this time.";

const SYSTEM_INSTRUCTION: &str =
    "You are a professional business analyst. Provide short, bulleted, actionable insights in English.";

fn gemini_model() -> String {
    std::env::var("GEMINI_MODEL").unwrap_or_else(|_| "gemini-1.5-flash".to_string())
}

pub fn build_prompt(context: &serde_json::Value) -> String {
    format!(
        "As an AI analyst for Doel Express Ltd. (a bus service company), analyze the following data and provide 3 brief strategic insights or warnings. Data: {context}"
    )
}

async fn call_gemini(api_key: &str, prompt: &str) -> DoelResult<String> {
    let clean_key = api_key.trim().trim_matches(|c: char| c == '"' || c == '\'');
    let url = format!(
        "https://generativelanguage.googleapis.com/v1beta/models/{}:generateContent?key={}",
        gemini_model(),
        clean_key
    );

    let body = serde_json::json!({
        "contents": [{ "parts": [{ "text": prompt }] }],
        "systemInstruction": { "parts": [{ "text": SYSTEM_INSTRUCTION }] }
    });

    let client = reqwest::Client::new();
    let resp = client.post(&url).json(&body).send().await?;

    if !resp.status().is_success() {
        return Err(DoelError::Internal(format!(
            "Gemini API error: {}",
            resp.status()
        )));
    }

    let json: serde_json::Value = resp.json().await?;
    json["candidates"][0]["content"]["parts"][0]["text"]
        .as_str()
        .map(|text| text.trim().to_string())
        .ok_or_else(|| DoelError::Internal("Empty response from Gemini".to_string()))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightResponse {
    pub insights: String,
    /// True when a newer fetch superseded this one; the text returned is
    /// whatever the board currently holds.
    pub stale: bool,
}

pub async fn get_smart_insights(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> DoelResult<Json<InsightResponse>> {
    require_screen(claims.role, "dashboard")?;

    let ticket = state.insights.begin();

    // Snapshot the context before awaiting anything.
    let context = {
        let registry = state
            .registry
            .lock()
            .map_err(|e| DoelError::Internal(e.to_string()))?;
        serde_json::json!({
            "trips": registry.trips,
            "transactions": registry.transactions,
            "ticketSales": registry.ticket_sales,
        })
    };

    let text = match std::env::var("GEMINI_API_KEY") {
        Ok(api_key) if !api_key.trim().is_empty() => {
            match call_gemini(&api_key, &build_prompt(&context)).await {
                Ok(text) => text,
                Err(e) => {
                    tracing::warn!("Gemini insight error: {}", e);
                    INSIGHT_FALLBACK.to_string()
                }
            }
        }
        _ => {
            tracing::warn!("GEMINI_API_KEY not configured");
            INSIGHT_FALLBACK.to_string()
        }
    };

    let fresh = state.insights.publish(ticket, text);
    let insights = state
        .insights
        .latest()
        .unwrap_or_else(|| INSIGHT_FALLBACK.to_string());

    Ok(Json(InsightResponse {
        insights,
        stale: !fresh,
    }))
}
