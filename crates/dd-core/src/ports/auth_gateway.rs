use async_trait::async_trait;

use crate::credentials::{PhoneNumber, Pin};
use crate::identity::Identity;
use crate::ports::GatewayError;
use crate::security::SecretString;

/// Remote credential and PIN verification.
#[async_trait]
pub trait AuthGatewayPort: Send + Sync {
    /// Check phone and password. `Ok` means the PIN step may follow.
    async fn login(&self, phone: &PhoneNumber, password: &SecretString)
        -> Result<(), GatewayError>;

    /// Check the PIN for `phone` and return the user it belongs to.
    async fn verify_pin(&self, phone: &PhoneNumber, pin: &Pin) -> Result<Identity, GatewayError>;
}
