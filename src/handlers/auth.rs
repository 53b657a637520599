use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;
use uuid::Uuid;

use crate::auth::{digest, generate_jwt, hash_password, verify_password, Claims};
use crate::cache::{ExpiringStore, PgExpiringStore};
use crate::config;
use crate::db::{store, Db};
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub gym_name: String,
    pub owner_name: String,
    pub phone: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct VerifyOtpRequest {
    pub phone: String,
    pub otp: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub phone: String,
    pub password: String,
}

/// Pending registration parked in the expiring cache until the OTP comes
/// back. The password is stored as an Argon2 hash, the OTP as a digest.
#[derive(Debug, serde::Serialize, Deserialize)]
struct PendingRegistration {
    gym_name: String,
    owner_name: String,
    phone: String,
    password_hash: String,
    otp_digest: String,
}

fn otp_key(phone: &str) -> String {
    format!("otp:{phone}")
}

/// POST /auth/register - start gym signup, parks the request behind an OTP
pub async fn register(Json(req): Json<RegisterRequest>) -> Result<Json<Value>, ApiError> {
    if req.phone.trim().is_empty() || req.password.len() < 8 {
        return Err(ApiError::bad_request(
            "phone is required and password must be at least 8 characters",
        ));
    }

    let pool = Db::pool().await?;
    if store::find_user_by_phone(&pool, &req.phone).await?.is_some() {
        return Err(ApiError::conflict("phone already registered"));
    }

    // Six digits derived from a fresh UUID. Delivery (SMS/WhatsApp) hooks in
    // here; until then the code is only visible at debug level so production
    // logs never carry it.
    let otp = format!("{:06}", Uuid::new_v4().as_u128() % 1_000_000);
    debug!(phone = %req.phone, otp = %otp, "registration OTP issued");

    let pending = PendingRegistration {
        gym_name: req.gym_name,
        owner_name: req.owner_name,
        phone: req.phone.clone(),
        password_hash: hash_password(&req.password)
            .map_err(|e| ApiError::internal_server_error(e.to_string()))?,
        otp_digest: digest(&otp),
    };
    let payload = serde_json::to_string(&pending)
        .map_err(|e| ApiError::internal_server_error(e.to_string()))?;

    let cache = PgExpiringStore::new(pool);
    let ttl = config::config().security.otp_ttl_secs;
    cache.put(&otp_key(&req.phone), &payload, ttl).await?;

    Ok(Json(json!({
        "success": true,
        "data": { "message": "OTP sent, verify to complete registration" }
    })))
}

/// POST /auth/verify-otp - complete signup, creates the gym admin account
pub async fn verify_otp(Json(req): Json<VerifyOtpRequest>) -> Result<Json<Value>, ApiError> {
    let pool = Db::pool().await?;
    let cache = PgExpiringStore::new(pool.clone());

    let payload = cache
        .take(&otp_key(&req.phone))
        .await?
        .ok_or_else(|| ApiError::unauthorized("OTP expired or not requested"))?;
    let pending: PendingRegistration = serde_json::from_str(&payload)
        .map_err(|e| ApiError::internal_server_error(e.to_string()))?;

    if digest(&req.otp) != pending.otp_digest {
        return Err(ApiError::unauthorized("incorrect OTP"));
    }

    let user = store::create_admin_user(
        &pool,
        &pending.owner_name,
        &pending.phone,
        &pending.password_hash,
    )
    .await?;

    let claims = Claims::new(user.gym_id, user.id, user.name.clone(), user.role);
    let token = generate_jwt(&claims).map_err(|e| ApiError::internal_server_error(e.to_string()))?;

    Ok(Json(json!({
        "success": true,
        "data": {
            "token": token,
            "gym_id": user.gym_id,
            "name": user.name,
            "role": user.role,
        }
    })))
}

/// POST /auth/login
pub async fn login(Json(req): Json<LoginRequest>) -> Result<Json<Value>, ApiError> {
    let pool = Db::pool().await?;
    let user = store::find_user_by_phone(&pool, &req.phone)
        .await?
        .ok_or_else(|| ApiError::unauthorized("invalid credentials"))?;

    verify_password(&req.password, &user.password_hash)
        .map_err(|_| ApiError::unauthorized("invalid credentials"))?;

    let claims = Claims::new(user.gym_id, user.id, user.name.clone(), user.role);
    let token = generate_jwt(&claims).map_err(|e| ApiError::internal_server_error(e.to_string()))?;

    Ok(Json(json!({
        "success": true,
        "data": {
            "token": token,
            "gym_id": user.gym_id,
            "name": user.name,
            "role": user.role,
        }
    })))
}
