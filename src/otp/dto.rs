use serde::Deserialize;

/// Request body for issuing a one-time code.
#[derive(Debug, Deserialize)]
pub struct OtpRequest {
    pub email: String,
}

/// Request body for verifying a one-time code.
#[derive(Debug, Deserialize)]
pub struct OtpVerifyRequest {
    pub email: String,
    pub code: String,
}
