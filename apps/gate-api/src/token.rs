//! Signed ticket token codec.
//!
//! Every ticket carries an opaque signed token (rendered as a QR code by
//! the storefront) binding `{ticketId, eventId, userId, attendeeEmail}`.
//! The gate scanner presents the token instead of a raw ticket id, so a
//! forged or tampered code fails verification before any row is touched.
//!
//! ## Pinned algorithm
//! Encoding and decoding both use HS256 with the dedicated ticket secret.
//! Decoding rejects tokens whose header names any other algorithm - there
//! is no negotiation.
//!
//! ## No expiry
//! Ticket tokens are minted without an `exp` claim and expiry validation
//! is disabled: a ticket stays valid until it is redeemed, however far in
//! the future the event is.

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// The payload bound into a redemption token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketClaims {
    pub ticket_id: String,
    pub event_id: String,
    pub user_id: String,
    pub attendee_email: String,
}

/// Encodes and verifies ticket redemption tokens.
#[derive(Clone)]
pub struct TicketTokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TicketTokenCodec {
    /// Create a codec over the ticket signing secret.
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Tickets carry no exp claim; see module docs
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        TicketTokenCodec {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Sign a ticket payload into an opaque token string.
    pub fn encode(&self, claims: &TicketClaims) -> Result<String, ApiError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| ApiError::Internal(format!("Failed to sign ticket token: {}", e)))
    }

    /// Verify a presented token and recover its payload.
    ///
    /// Any failure - bad signature, malformed structure, wrong algorithm -
    /// collapses into `InvalidTicket`; the gate does not learn why a fake
    /// code was fake.
    pub fn decode(&self, token: &str) -> Result<TicketClaims, ApiError> {
        decode::<TicketClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|_| ApiError::InvalidTicket("Ticket verification failed".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-ticket-secret";

    fn sample_claims() -> TicketClaims {
        TicketClaims {
            ticket_id: "ticket-1".to_string(),
            event_id: "event-1".to_string(),
            user_id: "user-1".to_string(),
            attendee_email: "alice@example.com".to_string(),
        }
    }

    #[test]
    fn test_roundtrip() {
        let codec = TicketTokenCodec::new(SECRET);
        let claims = sample_claims();

        let token = codec.encode(&claims).unwrap();
        let decoded = codec.decode(&token).unwrap();

        assert_eq!(decoded, claims);
    }

    #[test]
    fn test_every_single_byte_flip_is_rejected() {
        let codec = TicketTokenCodec::new(SECRET);
        let token = codec.encode(&sample_claims()).unwrap();

        let bytes = token.as_bytes();
        for i in 0..bytes.len() {
            let mut tampered = bytes.to_vec();
            // Stay within ASCII so the string remains valid UTF-8
            tampered[i] = if tampered[i] == b'A' { b'B' } else { b'A' };
            if tampered == bytes {
                continue;
            }
            let tampered = String::from_utf8(tampered).unwrap();

            let result = codec.decode(&tampered);
            assert!(
                matches!(result, Err(ApiError::InvalidTicket(_))),
                "tampered byte {} was accepted",
                i
            );
        }
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let codec = TicketTokenCodec::new(SECRET);
        let other = TicketTokenCodec::new("a-different-secret");

        let token = other.encode(&sample_claims()).unwrap();
        assert!(matches!(codec.decode(&token), Err(ApiError::InvalidTicket(_))));
    }

    #[test]
    fn test_wrong_algorithm_rejected() {
        let codec = TicketTokenCodec::new(SECRET);

        // Same secret, different algorithm in the header: must be refused
        let token = encode(
            &Header::new(Algorithm::HS384),
            &sample_claims(),
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert!(matches!(codec.decode(&token), Err(ApiError::InvalidTicket(_))));
    }

    #[test]
    fn test_garbage_rejected() {
        let codec = TicketTokenCodec::new(SECRET);
        assert!(codec.decode("").is_err());
        assert!(codec.decode("not-a-jwt").is_err());
        assert!(codec.decode("a.b.c").is_err());
    }

    #[test]
    fn test_no_expiry_minted() {
        let codec = TicketTokenCodec::new(SECRET);
        let token = codec.encode(&sample_claims()).unwrap();

        // Re-verify into a raw JSON payload: no exp claim was minted
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        let data = decode::<serde_json::Value>(
            &token,
            &DecodingKey::from_secret(SECRET.as_bytes()),
            &validation,
        )
        .unwrap();
        assert!(data.claims.get("exp").is_none());
        assert_eq!(data.claims.get("ticketId").unwrap(), "ticket-1");
    }
}
