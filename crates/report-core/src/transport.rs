//! Server replies as seen by the client

use serde::{Deserialize, Serialize};

/// A server reply: either a navigation or a JSON body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "body", rename_all = "lowercase")]
pub enum Reply<T> {
    /// The server redirected; the browser follows and the body is not read
    Redirected { url: String },
    Json(T),
}

impl<T> Reply<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Reply<U> {
        match self {
            Reply::Redirected { url } => Reply::Redirected { url },
            Reply::Json(body) => Reply::Json(f(body)),
        }
    }
}

impl<T: serde::de::DeserializeOwned> Reply<T> {
    /// Build a reply from a fetched response
    pub fn from_parts(redirected: bool, url: &str, body: &str) -> Result<Self, serde_json::Error> {
        if redirected {
            return Ok(Reply::Redirected {
                url: url.to_string(),
            });
        }
        serde_json::from_str(body).map(Reply::Json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use safety_types::ActionResponse;

    #[test]
    fn test_redirect_skips_body() {
        let reply: Reply<ActionResponse> =
            Reply::from_parts(true, "/police/dashboard", "<html>").unwrap();
        assert_eq!(
            reply,
            Reply::Redirected {
                url: "/police/dashboard".to_string()
            }
        );
    }

    #[test]
    fn test_json_body_parsed() {
        let reply: Reply<ActionResponse> =
            Reply::from_parts(false, "/x", r#"{"success":false,"error":"nope"}"#).unwrap();
        match reply {
            Reply::Json(body) => assert_eq!(body.error.as_deref(), Some("nope")),
            other => panic!("unexpected reply {:?}", other),
        }
    }

    #[test]
    fn test_bad_json_is_an_error() {
        assert!(Reply::<ActionResponse>::from_parts(false, "/x", "<html>").is_err());
    }
}
