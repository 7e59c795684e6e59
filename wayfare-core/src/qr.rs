use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use constant_time_eq::constant_time_eq;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use uuid::Uuid;

use crate::{CoreError, CoreResult};

type HmacSha256 = Hmac<Sha256>;

pub const QR_VERSION: u8 = 1;

/// The signed portion of a QR payload. Kept minimal on purpose: the scanner
/// resolves everything else from the reference or the trip group.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TicketClaim {
    #[serde(rename = "ref")]
    pub reference: String,
    pub v: u8,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub trip_group_id: Option<Uuid>,
}

impl TicketClaim {
    pub fn new(reference: String, trip_group_id: Option<Uuid>) -> Self {
        Self {
            reference,
            v: QR_VERSION,
            trip_group_id,
        }
    }
}

/// Outcome of decoding a scanned payload. `authenticated` is false only for
/// the legacy unsigned form, which the signer may be configured to reject
/// outright.
#[derive(Debug, Clone)]
pub struct ScannedTicket {
    pub reference: Option<String>,
    pub trip_group_id: Option<Uuid>,
    pub authenticated: bool,
}

/// Envelope on the wire: `{"d": <claim>, "s": <hex HMAC-SHA256 over the exact
/// JSON bytes of d>}`, base64-encoded as a whole.
#[derive(Deserialize)]
struct SignedEnvelope<'a> {
    #[serde(borrow)]
    d: &'a serde_json::value::RawValue,
    s: String,
}

/// Pre-signature legacy payload: a bare JSON object carrying the reference
/// and, for multi-leg trips, the group id under its historical camelCase key.
#[derive(Deserialize)]
struct LegacyClaim {
    #[serde(rename = "ref", default)]
    reference: Option<String>,
    #[serde(rename = "tripGroupId", default)]
    trip_group_id: Option<Uuid>,
}

/// Signs ticket references into QR payloads and verifies scanned ones.
pub struct QrSigner {
    secret: Vec<u8>,
    allow_legacy: bool,
}

impl QrSigner {
    pub fn new(secret: &[u8], allow_legacy: bool) -> Self {
        Self {
            secret: secret.to_vec(),
            allow_legacy,
        }
    }

    fn sign(&self, data: &[u8]) -> CoreResult<String> {
        let mut mac = HmacSha256::new_from_slice(&self.secret)
            .map_err(|e| CoreError::Internal(format!("HMAC key setup failed: {e}")))?;
        mac.update(data);
        Ok(to_hex(&mac.finalize().into_bytes()))
    }

    /// Encode a claim into the base64 payload embedded in the QR image.
    pub fn encode(&self, claim: &TicketClaim) -> CoreResult<String> {
        let claim_json = serde_json::to_string(claim)
            .map_err(|e| CoreError::Internal(format!("claim serialization failed: {e}")))?;
        let signature = self.sign(claim_json.as_bytes())?;
        // The signature covers the exact claim bytes, so the envelope embeds
        // that same string rather than a re-serialization.
        let envelope = format!(r#"{{"d":{claim_json},"s":"{signature}"}}"#);
        Ok(BASE64.encode(envelope))
    }

    /// Decode and verify a scanned payload.
    ///
    /// Signed payloads must verify before the reference is trusted; a bad
    /// signature is reported without saying which check failed. Legacy
    /// unsigned payloads decode as unauthenticated when permitted.
    pub fn decode(&self, payload: &str) -> CoreResult<ScannedTicket> {
        let raw = BASE64
            .decode(payload.trim())
            .map_err(|_| CoreError::MalformedTicket)?;
        let text = std::str::from_utf8(&raw).map_err(|_| CoreError::MalformedTicket)?;

        if let Ok(envelope) = serde_json::from_str::<SignedEnvelope>(text) {
            let expected = self.sign(envelope.d.get().as_bytes())?;
            if !constant_time_eq(expected.as_bytes(), envelope.s.as_bytes()) {
                return Err(CoreError::SignatureMismatch);
            }
            let claim: TicketClaim =
                serde_json::from_str(envelope.d.get()).map_err(|_| CoreError::MalformedTicket)?;
            return Ok(ScannedTicket {
                reference: Some(claim.reference),
                trip_group_id: claim.trip_group_id,
                authenticated: true,
            });
        }

        let legacy: LegacyClaim =
            serde_json::from_str(text).map_err(|_| CoreError::MalformedTicket)?;
        if legacy.reference.is_none() && legacy.trip_group_id.is_none() {
            return Err(CoreError::MalformedTicket);
        }
        if !self.allow_legacy {
            return Err(CoreError::SignatureMismatch);
        }
        Ok(ScannedTicket {
            reference: legacy.reference,
            trip_group_id: legacy.trip_group_id,
            authenticated: false,
        })
    }
}

fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
