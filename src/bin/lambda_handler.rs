//! AWS Lambda handler for scenario calculations
//!
//! `POST /calculate` accepts a scenario configuration as JSON and returns one
//! result per expanded scenario, each with its full monthly schedule.
//! `GET /health` reports liveness.
//!
//! Supports Lambda Function URLs for direct HTTP access.

use lambda_http::{run, service_fn, Body, Error, Request, Response};
use mortgage_scenarios::loan::parse_config;
use mortgage_scenarios::ScenarioRunner;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
}

fn error_response(status: u16, message: &str) -> Result<Response<Body>, Error> {
    let body = serde_json::json!({ "error": message }).to_string();
    Ok(Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .body(Body::Text(body))?)
}

fn json_response<T: Serialize>(body: &T) -> Result<Response<Body>, Error> {
    Ok(Response::builder()
        .status(200)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .header("Access-Control-Allow-Methods", "GET, POST, OPTIONS")
        .header("Access-Control-Allow-Headers", "Content-Type")
        .body(Body::Text(serde_json::to_string(body)?))?)
}

fn calculate(body: &Body) -> Result<Response<Body>, Error> {
    let body_str = match body {
        Body::Text(s) => s.clone(),
        Body::Binary(b) => String::from_utf8_lossy(b).to_string(),
        Body::Empty => String::new(),
    };

    let config = match parse_config(&body_str) {
        Ok(config) => config,
        Err(e) => return error_response(400, &e.to_string()),
    };

    let results = match ScenarioRunner::with_schedule().run(&config) {
        Ok(results) => results,
        Err(e) => return error_response(400, &e.to_string()),
    };

    log::info!("Calculated {} scenario(s)", results.len());
    json_response(&results)
}

/// Lambda handler function
async fn handler(event: Request) -> Result<Response<Body>, Error> {
    let method = event.method().as_str();
    let path = event.uri().path();

    match method {
        // CORS preflight
        "OPTIONS" => Ok(Response::builder()
            .status(200)
            .header("Access-Control-Allow-Origin", "*")
            .header("Access-Control-Allow-Methods", "GET, POST, OPTIONS")
            .header("Access-Control-Allow-Headers", "Content-Type")
            .body(Body::Empty)?),
        "GET" if path.ends_with("/health") => json_response(&HealthResponse { status: "ok" }),
        "POST" if path.ends_with("/calculate") || path == "/" => calculate(event.body()),
        _ => error_response(404, &format!("No route for {} {}", method, path)),
    }
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();
    run(service_fn(handler)).await
}
