//! Verified JWT claim set.

use serde::{Deserialize, Deserializer};

/// Claims carried by Stytch-issued JWTs.
///
/// Session cookies and OAuth access tokens share the registered claims;
/// `scope`, `client_id` and `jti` only appear on access tokens and are
/// optional here.
#[derive(Debug, Clone, Deserialize)]
pub struct Claims {
    pub iss: String,
    pub sub: String,
    #[serde(default, deserialize_with = "one_or_many")]
    pub aud: Vec<String>,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub jti: Option<String>,
    pub exp: i64,
    #[serde(default)]
    pub iat: Option<i64>,
    #[serde(default)]
    pub nbf: Option<i64>,
}

/// RFC 7519 allows `aud` to be a single string or an array of strings.
fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Audience {
        One(String),
        Many(Vec<String>),
    }

    Ok(match Audience::deserialize(deserializer)? {
        Audience::One(aud) => vec![aud],
        Audience::Many(auds) => auds,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn audience_accepts_single_string() {
        let claims: Claims = serde_json::from_value(json!({
            "iss": "stytch.com/project-test-1",
            "sub": "user-1",
            "aud": "project-test-1",
            "exp": 2000000000,
        }))
        .unwrap();
        assert_eq!(claims.aud, vec!["project-test-1"]);
    }

    #[test]
    fn audience_accepts_array() {
        let claims: Claims = serde_json::from_value(json!({
            "iss": "stytch.com/project-test-1",
            "sub": "user-1",
            "aud": ["project-test-1", "other"],
            "exp": 2000000000,
            "scope": "openid profile",
            "client_id": "client-1",
            "jti": "token-1",
        }))
        .unwrap();
        assert_eq!(claims.aud.len(), 2);
        assert_eq!(claims.scope.as_deref(), Some("openid profile"));
    }
}
