use actix_web::{web, HttpResponse, Responder};
use chrono::{Datelike, NaiveDate, Utc};
use serde::Deserialize;
use sqlx::SqlitePool;

use crate::cache::QuoteCache;
use crate::pricing::{
    compute_day_price, days_in_month, generate_month, resolve_availability,
};
use crate::regen::regenerate_window;
use crate::store::{fetch_rule_inputs, CalendarStore, StoreError};

#[derive(serde::Serialize)]
struct ErrorResponse {
    error: String,
}

fn store_error_response(err: StoreError) -> HttpResponse {
    match err {
        StoreError::PropertyNotFound(id) => HttpResponse::NotFound().json(ErrorResponse {
            error: format!("Property {id} not found"),
        }),
        other => {
            log::error!("calendar request failed: {other}");
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Database error".to_string(),
            })
        }
    }
}

/// Stored calendar for a property-month. A missing calendar is not an
/// error: one is computed on demand from live rules and returned without
/// being persisted.
pub async fn get_calendar(
    pool: web::Data<SqlitePool>,
    path: web::Path<(String, i32, u32)>,
) -> impl Responder {
    let (property_id, year, month) = path.into_inner();
    if !(1..=12).contains(&month) || days_in_month(year, month) == 0 {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: format!("Invalid month {year}-{month}"),
        });
    }

    let store = CalendarStore::new(pool.get_ref().clone());
    match store.fetch(&property_id, year, month).await {
        Ok(Some(calendar)) => HttpResponse::Ok().json(calendar),
        Ok(None) => {
            log::info!("no stored calendar for {property_id} {year}-{month:02}, computing on demand");
            match fetch_rule_inputs(pool.get_ref(), &property_id).await {
                Ok(inputs) => HttpResponse::Ok().json(generate_month(
                    &property_id,
                    year,
                    month,
                    &inputs.config,
                    &inputs.seasons,
                    &inputs.overrides,
                    &inputs.min_stay_rules,
                    &inputs.booked_dates,
                )),
                Err(err) => store_error_response(err),
            }
        }
        Err(err) => store_error_response(err),
    }
}

/// Targeted single-day refresh: recompute one day from live rules and
/// patch it into the stored document. Used after an override edit or a
/// booking instead of a full regeneration.
pub async fn refresh_day(
    pool: web::Data<SqlitePool>,
    cache: web::Data<QuoteCache>,
    path: web::Path<(String, i32, u32, u32)>,
) -> impl Responder {
    let (property_id, year, month, day) = path.into_inner();
    let Some(date) = NaiveDate::from_ymd_opt(year, month, day) else {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: format!("Invalid date {year}-{month:02}-{day:02}"),
        });
    };

    let inputs = match fetch_rule_inputs(pool.get_ref(), &property_id).await {
        Ok(inputs) => inputs,
        Err(err) => return store_error_response(err),
    };
    let priced = compute_day_price(
        &inputs.config,
        date,
        &inputs.seasons,
        &inputs.overrides,
        &inputs.min_stay_rules,
    );
    let resolved = resolve_availability(priced, date, &inputs.booked_dates);

    let store = CalendarStore::new(pool.get_ref().clone());
    match store
        .patch_day(&property_id, date, resolved.clone(), inputs.config.base_price)
        .await
    {
        Ok(true) => {
            cache.invalidate_property(&property_id);
            HttpResponse::Ok().json(resolved)
        }
        Ok(false) => HttpResponse::NotFound().json(ErrorResponse {
            error: format!("No calendar generated for {property_id} {year}-{month:02}"),
        }),
        Err(err) => store_error_response(err),
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegenerateRequest {
    pub months: Option<u32>,
    pub write: Option<bool>,
}

/// Recompute a rolling window of calendars. Dry-run by default so rule
/// changes are reviewed as a diff report before anything is written.
pub async fn regenerate(
    pool: web::Data<SqlitePool>,
    cache: web::Data<QuoteCache>,
    path: web::Path<String>,
    body: web::Json<RegenerateRequest>,
) -> impl Responder {
    let property_id = path.into_inner();
    let months = body.months.unwrap_or(12).clamp(1, 24);
    let write = body.write.unwrap_or(false);
    let from = Utc::now().date_naive().with_day(1).unwrap_or_else(|| Utc::now().date_naive());

    match regenerate_window(pool.get_ref(), &property_id, from, months, write).await {
        Ok(report) => {
            if write {
                cache.invalidate_property(&property_id);
            }
            HttpResponse::Ok().json(report)
        }
        Err(err) => store_error_response(err),
    }
}
