use chrono::Duration;
use rand::RngCore;

/// How long a password reset link stays valid.
pub const RESET_TOKEN_LIFETIME: Duration = Duration::hours(1);

/// 20 random bytes, hex encoded.
pub fn new_reset_token() -> String {
    let mut bytes = [0u8; 20];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}
