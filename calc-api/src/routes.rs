use axum::body::Bytes;
use axum::http::StatusCode;
use axum::middleware::from_fn;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use crate::middleware;

/// Two-operand request body. Missing fields decode as zero, matching the
/// service's original wire behavior.
#[derive(Debug, Deserialize)]
struct Operands {
    #[serde(default)]
    number1: i64,
    #[serde(default)]
    number2: i64,
}

#[derive(Debug, Serialize)]
struct CalcResult {
    result: i64,
}

type CalcError = (StatusCode, &'static str);

const INVALID_INPUT: CalcError = (StatusCode::BAD_REQUEST, "Invalid input");
const OVERFLOW: CalcError = (StatusCode::BAD_REQUEST, "integer overflow");

pub fn app() -> Router {
    Router::new()
        .route("/add", post(add))
        .route("/subtract", post(subtract))
        .route("/multiply", post(multiply))
        .route("/divide", post(divide))
        .route("/sum", post(sum))
        // Logging is the outer layer so short-circuited OPTIONS requests
        // still get a line with their final status.
        .layer(from_fn(middleware::cors))
        .layer(from_fn(middleware::log_requests))
}

fn decode<T: serde::de::DeserializeOwned>(body: &Bytes) -> Result<T, CalcError> {
    serde_json::from_slice(body).map_err(|_| INVALID_INPUT)
}

async fn add(body: Bytes) -> Result<Json<CalcResult>, CalcError> {
    let ops: Operands = decode(&body)?;
    let result = ops.number1.checked_add(ops.number2).ok_or(OVERFLOW)?;
    Ok(Json(CalcResult { result }))
}

async fn subtract(body: Bytes) -> Result<Json<CalcResult>, CalcError> {
    let ops: Operands = decode(&body)?;
    let result = ops.number1.checked_sub(ops.number2).ok_or(OVERFLOW)?;
    Ok(Json(CalcResult { result }))
}

async fn multiply(body: Bytes) -> Result<Json<CalcResult>, CalcError> {
    let ops: Operands = decode(&body)?;
    let result = ops.number1.checked_mul(ops.number2).ok_or(OVERFLOW)?;
    Ok(Json(CalcResult { result }))
}

async fn divide(body: Bytes) -> Result<Json<CalcResult>, CalcError> {
    let ops: Operands = decode(&body)?;
    if ops.number2 == 0 {
        return Err(INVALID_INPUT);
    }
    // checked_div also catches i64::MIN / -1.
    let result = ops.number1.checked_div(ops.number2).ok_or(OVERFLOW)?;
    Ok(Json(CalcResult { result }))
}

async fn sum(body: Bytes) -> Result<Json<CalcResult>, CalcError> {
    let numbers: Vec<i64> = decode(&body)?;
    // Accumulate wide so a transiently large running total is fine; only
    // the final sum has to fit in i64.
    let total: i128 = numbers.into_iter().map(i128::from).sum();
    let result = i64::try_from(total).map_err(|_| OVERFLOW)?;
    Ok(Json(CalcResult { result }))
}
