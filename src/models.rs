//! Wire shapes shared by several gateway endpoints.

// self
use crate::_prelude::*;

/// Generic `{Key, Value}` pair used for parameters and reference data.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyValue {
	/// Entry name.
	#[serde(rename = "Key")]
	pub key: String,
	/// Entry value.
	#[serde(rename = "Value")]
	pub value: String,
}
impl KeyValue {
	/// Creates a new pair.
	pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
		Self { key: key.into(), value: value.into() }
	}
}

/// C2B payment parameter entry.
pub type Parameter = KeyValue;
/// Reference data entry (STK push and C2B).
pub type ReferenceItem = KeyValue;

/// Party that initiates a C2B transaction.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Initiator {
	/// Identifier type code.
	#[serde(rename = "IdentifierType")]
	pub identifier_type: i32,
	/// Identifier value (MSISDN, short code, ...).
	#[serde(rename = "Identifier")]
	pub identifier: String,
	/// Encrypted initiator credential.
	#[serde(rename = "SecurityCredential")]
	pub security_credential: String,
	/// Initiator secret key.
	#[serde(rename = "SecretKey")]
	pub secret_key: String,
}

/// Debit or credit party of a C2B transaction.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Party {
	/// Identifier type code.
	#[serde(rename = "IdentifierType")]
	pub identifier_type: i32,
	/// Identifier value.
	#[serde(rename = "Identifier")]
	pub identifier: String,
}

/// Receiving party of a C2B transaction.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiverParty {
	/// Identifier type code.
	#[serde(rename = "IdentifierType")]
	pub identifier_type: i32,
	/// Identifier value.
	#[serde(rename = "Identifier")]
	pub identifier: String,
	/// Receiving short code.
	#[serde(rename = "ShortCode")]
	pub short_code: String,
}

/// Error envelope returned by business endpoints on non-2xx statuses.
///
/// `errorCode` is required for a body to count as an envelope; anything else is surfaced as a raw
/// status + body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorEnvelope {
	/// Gateway request identifier, when echoed.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub request_id: Option<String>,
	/// Gateway error code.
	pub error_code: String,
	/// Human-readable message.
	#[serde(default)]
	pub error_message: String,
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn key_value_uses_pascal_case_fields() {
		let json = serde_json::to_string(&KeyValue::new("Amount", "500"))
			.expect("Key/value pair should serialize.");

		assert_eq!(json, r#"{"Key":"Amount","Value":"500"}"#);
	}

	#[test]
	fn error_envelope_requires_error_code() {
		let envelope: ErrorEnvelope = serde_json::from_str(
			r#"{"requestId":"r-1","errorCode":"404.001.03","errorMessage":"Invalid Access Token"}"#,
		)
		.expect("Envelope with an error code should decode.");

		assert_eq!(envelope.request_id.as_deref(), Some("r-1"));
		assert_eq!(envelope.error_code, "404.001.03");
		assert_eq!(envelope.error_message, "Invalid Access Token");
		assert!(serde_json::from_str::<ErrorEnvelope>(r#"{"message":"nope"}"#).is_err());
	}
}
