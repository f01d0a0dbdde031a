//! Fixed-window rate limiting middleware.
//!
//! Clients are keyed by the peer address from `ConnectInfo` (IPv6 peers by
//! their /64). Every response carries `RateLimit-Limit`,
//! `RateLimit-Remaining` and `RateLimit-Reset`;
//! when layers nest, the innermost (strictest) values are kept.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use axum::{
    Json,
    extract::{ConnectInfo, Request, State},
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode, header::RETRY_AFTER},
    middleware::Next,
    response::{IntoResponse, Response},
};
use wema_core::utils::rate_limit::{FixedWindowLimiter, RateDecision};
use wema_sdk::objects::ErrorResponse;

use crate::state::AppState;

pub const RATE_LIMITED_MESSAGE: &str = "Too many requests, please try again later.";

pub const RATELIMIT_LIMIT: HeaderName = HeaderName::from_static("ratelimit-limit");
pub const RATELIMIT_REMAINING: HeaderName = HeaderName::from_static("ratelimit-remaining");
pub const RATELIMIT_RESET: HeaderName = HeaderName::from_static("ratelimit-reset");

/// Limit applied to every `/api` route.
pub async fn limit_api(State(state): State<AppState>, req: Request, next: Next) -> Response {
    enforce(&state.limiters.api, req, next).await
}

/// Limit applied to donation checkout creation.
pub async fn limit_checkout(State(state): State<AppState>, req: Request, next: Next) -> Response {
    enforce(&state.limiters.checkout, req, next).await
}

fn client_ip(req: &Request) -> IpAddr {
    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip())
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED))
}

async fn enforce(limiter: &FixedWindowLimiter, req: Request, next: Next) -> Response {
    let ip = client_ip(&req);
    let decision = limiter.check_now(ip).await;

    if !decision.allowed {
        tracing::warn!(
            client = %ip,
            path = %req.uri().path(),
            limit = decision.limit,
            "Rate limit exceeded"
        );
        let mut response = (
            StatusCode::TOO_MANY_REQUESTS,
            Json(ErrorResponse::new(RATE_LIMITED_MESSAGE)),
        )
            .into_response();
        let headers = response.headers_mut();
        set_rate_headers(headers, &decision);
        headers.insert(RETRY_AFTER, HeaderValue::from(reset_secs(&decision)));
        return response;
    }

    let mut response = next.run(req).await;
    set_rate_headers(response.headers_mut(), &decision);
    response
}

/// Whole seconds until the window resets, rounded up.
fn reset_secs(decision: &RateDecision) -> u64 {
    let reset = decision.reset_after;
    reset.as_secs() + u64::from(reset.subsec_nanos() > 0)
}

fn set_rate_headers(headers: &mut HeaderMap, decision: &RateDecision) {
    if headers.contains_key(&RATELIMIT_LIMIT) {
        return;
    }
    headers.insert(RATELIMIT_LIMIT.clone(), HeaderValue::from(decision.limit));
    headers.insert(
        RATELIMIT_REMAINING.clone(),
        HeaderValue::from(decision.remaining),
    );
    headers.insert(RATELIMIT_RESET.clone(), HeaderValue::from(reset_secs(decision)));
}
