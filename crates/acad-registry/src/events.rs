//! Typed decoding of the mint confirmation event.

use acad_core::{Address, TokenId};
use serde_json::Value;

use crate::contract::Finalization;

/// Event emitted by `mintCredential` once a token is assigned.
pub const CREDENTIAL_MINTED_EVENT: &str = "CredentialMinted";

/// Decoded `CredentialMinted(tokenId, recipient, tokenURI)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialMinted {
    pub token_id: TokenId,
    pub recipient: Option<Address>,
    pub token_uri: Option<String>,
}

/// Find the first well-formed `CredentialMinted` event in `finalization`.
///
/// Logs from other contracts or with an undecodable `tokenId` are skipped.
pub fn decode_credential_minted(finalization: &Finalization) -> Option<CredentialMinted> {
    finalization
        .logs
        .iter()
        .filter(|log| log.name == CREDENTIAL_MINTED_EVENT)
        .find_map(|log| {
            let token_id = token_id_arg(log.args.get("tokenId")?)?;
            Some(CredentialMinted {
                token_id,
                recipient: log
                    .args
                    .get("recipient")
                    .and_then(Value::as_str)
                    .and_then(|s| Address::parse(s).ok()),
                token_uri: log.args.get("tokenURI").and_then(Value::as_str).map(str::to_string),
            })
        })
}

/// `uint256` arguments arrive either as JSON numbers or decimal strings.
fn token_id_arg(value: &Value) -> Option<TokenId> {
    match value {
        Value::Number(n) => n.as_u64().map(TokenId::from_u64),
        Value::String(s) => TokenId::parse(s).ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::EventLog;
    use serde_json::json;

    fn finalization(logs: Vec<EventLog>) -> Finalization {
        Finalization {
            transaction_hash: "0xabc".into(),
            logs,
        }
    }

    fn log(name: &str, args: Value) -> EventLog {
        EventLog {
            name: name.into(),
            args,
        }
    }

    #[test]
    fn decodes_string_token_id() {
        let fin = finalization(vec![
            log("Transfer", json!({"tokenId": "9"})),
            log(
                CREDENTIAL_MINTED_EVENT,
                json!({
                    "tokenId": "42",
                    "recipient": "0x2222222222222222222222222222222222222222",
                    "tokenURI": "ipfs://QmX",
                }),
            ),
        ]);
        let event = decode_credential_minted(&fin).unwrap();
        assert_eq!(event.token_id.as_str(), "42");
        assert_eq!(event.token_uri.as_deref(), Some("ipfs://QmX"));
        assert!(event.recipient.is_some());
    }

    #[test]
    fn decodes_numeric_token_id_zero() {
        let fin = finalization(vec![log(CREDENTIAL_MINTED_EVENT, json!({"tokenId": 0}))]);
        assert_eq!(decode_credential_minted(&fin).unwrap().token_id.as_str(), "0");
    }

    #[test]
    fn missing_event_is_none() {
        let fin = finalization(vec![log("Transfer", json!({"tokenId": "1"}))]);
        assert!(decode_credential_minted(&fin).is_none());
        assert!(decode_credential_minted(&finalization(vec![])).is_none());
    }

    #[test]
    fn malformed_event_is_skipped() {
        let fin = finalization(vec![
            log(CREDENTIAL_MINTED_EVENT, json!({"tokenId": "abc"})),
            log(CREDENTIAL_MINTED_EVENT, json!({"tokenId": "7"})),
        ]);
        assert_eq!(decode_credential_minted(&fin).unwrap().token_id.as_str(), "7");
    }
}
