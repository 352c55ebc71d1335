//! Envelope unwrapping for successful transport responses

use crate::messages;
use crate::request::RawResponse;
use newsrag_core::{Envelope, Error, Notice, Notifier, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use tracing::warn;

/// Checks the envelope `code` and hands back `data`
#[derive(Clone)]
pub struct EnvelopeDecoder {
    notifier: Arc<dyn Notifier>,
}

impl EnvelopeDecoder {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self { notifier }
    }

    /// Return `data` unchanged when `code == 200`
    ///
    /// # Errors
    /// - `Error::Domain` carrying the server message for any other code
    /// - `Error::InvalidEnvelope` when the body is not an envelope
    pub fn decode(&self, response: RawResponse) -> Result<Value> {
        let envelope: Envelope = match serde_json::from_value(response.body) {
            Ok(envelope) => envelope,
            Err(e) => {
                warn!(status = response.status, error = %e, "Response is not an envelope");
                self.notify(messages::REQUEST_FAILED);
                return Err(Error::InvalidEnvelope(e.to_string()));
            }
        };

        if envelope.is_success() {
            return Ok(envelope.data);
        }

        let message = envelope
            .message()
            .unwrap_or(messages::REQUEST_FAILED)
            .to_string();
        warn!(code = envelope.code, message = %message, "Backend rejected the request");
        self.notify(&message);

        Err(Error::Domain {
            code: envelope.code,
            message,
        })
    }

    /// Like `decode`, then deserialize `data` into `T`
    pub fn decode_into<T: DeserializeOwned>(&self, response: RawResponse) -> Result<T> {
        let data = self.decode(response)?;
        serde_json::from_value(data).map_err(|e| {
            warn!(error = %e, "Response data has an unexpected shape");
            self.notify(messages::REQUEST_FAILED);
            Error::Serialization(e)
        })
    }

    fn notify(&self, message: &str) {
        self.notifier.notify(&Notice::error(message));
    }
}

impl std::fmt::Debug for EnvelopeDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnvelopeDecoder").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use newsrag_core::RecordingNotifier;
    use serde_json::json;

    fn decoder() -> (EnvelopeDecoder, RecordingNotifier) {
        let notifier = RecordingNotifier::new();
        (EnvelopeDecoder::new(Arc::new(notifier.clone())), notifier)
    }

    #[test]
    fn test_success_returns_data_exactly() {
        let (decoder, notifier) = decoder();
        let data = json!({
            "records": [{"id": 1, "title": "知识条目1"}, {"id": 2, "title": "知识条目2"}],
            "total": 2,
            "nested": {"list": [1, 2, 3], "flag": null}
        });

        let result = decoder
            .decode(RawResponse::new(
                200,
                json!({"code": 200, "message": "操作成功", "data": data.clone()}),
            ))
            .unwrap();

        assert_eq!(result, data);
        assert!(notifier.is_empty());
    }

    #[test]
    fn test_domain_failure_notifies_once_with_message() {
        let (decoder, notifier) = decoder();

        let err = decoder
            .decode(RawResponse::new(
                200,
                json!({"code": 500, "message": "用户名已存在", "data": null}),
            ))
            .unwrap_err();

        assert!(matches!(err, Error::Domain { code: 500, ref message } if message == "用户名已存在"));
        assert_eq!(notifier.messages(), vec!["用户名已存在"]);
    }

    #[test]
    fn test_domain_failure_without_message_uses_fallback() {
        let (decoder, notifier) = decoder();

        let err = decoder
            .decode(RawResponse::new(200, json!({"code": 401})))
            .unwrap_err();

        assert!(matches!(err, Error::Domain { code: 401, .. }));
        assert_eq!(notifier.messages(), vec![messages::REQUEST_FAILED]);
    }

    #[test]
    fn test_non_envelope_body() {
        let (decoder, notifier) = decoder();

        let err = decoder
            .decode(RawResponse::new(200, json!({"message": "<html>"})))
            .unwrap_err();

        assert!(matches!(err, Error::InvalidEnvelope(_)));
        assert_eq!(notifier.len(), 1);
    }

    #[test]
    fn test_decode_into_typed() {
        #[derive(serde::Deserialize)]
        struct Token {
            token: String,
        }

        let (decoder, notifier) = decoder();
        let token: Token = decoder
            .decode_into(RawResponse::new(
                200,
                json!({"code": 200, "data": {"token": "abc"}}),
            ))
            .unwrap();
        assert_eq!(token.token, "abc");

        let result: Result<Token> =
            decoder.decode_into(RawResponse::new(200, json!({"code": 200, "data": [1]})));
        assert!(matches!(result, Err(Error::Serialization(_))));
        assert_eq!(notifier.len(), 1);
    }
}
