use std::collections::BTreeMap;

use actix_web::{web, HttpResponse, Responder};
use chrono::NaiveDate;
use serde::Deserialize;
use sqlx::SqlitePool;
use validator::Validate;

use crate::cache::QuoteCache;
use crate::pricing::{compute_day_price, compute_quote, resolve_availability};
use crate::ratelimit::RateLimiter;
use crate::store::{fetch_rule_inputs, StoreError};

#[derive(serde::Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    pub property_id: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    #[validate(range(min = 1))]
    pub guests: u32,
    /// Opaque caller identity for rate limiting; anonymous callers share
    /// one bucket per property.
    pub session_id: Option<String>,
}

/// Booking-time price quote: resolves each night in the requested range
/// against live rules and returns either a breakdown or a reason code.
/// Sits behind the per-session token bucket; over-limit callers get the
/// cached quote when one exists, 429 otherwise.
pub async fn create_quote(
    pool: web::Data<SqlitePool>,
    cache: web::Data<QuoteCache>,
    limiter: web::Data<RateLimiter>,
    body: web::Json<QuoteRequest>,
) -> impl Responder {
    if let Err(e) = body.validate() {
        return HttpResponse::BadRequest().json(e);
    }
    if body.check_in >= body.check_out {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Check-out must be after check-in".to_string(),
        });
    }

    let cache_key = QuoteCache::quote_key(
        &body.property_id,
        &body.check_in.to_string(),
        &body.check_out.to_string(),
        body.guests,
    );
    let limiter_key = format!(
        "{}:{}",
        body.session_id.as_deref().unwrap_or("anonymous"),
        body.property_id
    );
    if !limiter.try_acquire(&limiter_key) {
        if let Some(cached) = cache.get(&cache_key) {
            return HttpResponse::Ok().json(cached);
        }
        return HttpResponse::TooManyRequests().json(ErrorResponse {
            error: "Quote rate limit exceeded, retry shortly".to_string(),
        });
    }

    if let Some(cached) = cache.get(&cache_key) {
        return HttpResponse::Ok().json(cached);
    }

    let inputs = match fetch_rule_inputs(pool.get_ref(), &body.property_id).await {
        Ok(inputs) => inputs,
        Err(StoreError::PropertyNotFound(id)) => {
            return HttpResponse::NotFound().json(ErrorResponse {
                error: format!("Property {id} not found"),
            })
        }
        Err(err) => {
            log::error!("quote rule fetch failed: {err}");
            return HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Database error".to_string(),
            });
        }
    };

    let mut resolved_days = BTreeMap::new();
    let mut date = body.check_in;
    while date < body.check_out {
        let priced = compute_day_price(
            &inputs.config,
            date,
            &inputs.seasons,
            &inputs.overrides,
            &inputs.min_stay_rules,
        );
        resolved_days.insert(date, resolve_availability(priced, date, &inputs.booked_dates));
        match date.succ_opt() {
            Some(next) => date = next,
            None => break,
        }
    }

    let outcome = compute_quote(
        &inputs.config,
        &resolved_days,
        body.check_in,
        body.check_out,
        body.guests,
    );
    match serde_json::to_value(outcome.into_response()) {
        Ok(value) => {
            cache.insert(cache_key, value.clone());
            HttpResponse::Ok().json(value)
        }
        Err(err) => {
            log::error!("quote serialization failed: {err}");
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Internal error".to_string(),
            })
        }
    }
}
