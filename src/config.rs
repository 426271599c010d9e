//! Application configuration.
//!
//! Holds the Stytch project identity and derives the provider endpoints
//! from it. Test and live projects are told apart by the naming convention
//! on the project id, matching the Stytch public API layout.

/// Stytch test-environment public API base.
const STYTCH_TEST_BASE: &str = "https://test.stytch.com/v1/public";
/// Stytch live-environment public API base.
const STYTCH_LIVE_BASE: &str = "https://api.stytch.com/v1/public";

/// Process-wide application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Stytch project id; doubles as the expected JWT audience.
    pub project_id: String,
    /// Origin the service is reachable at, used in OAuth discovery metadata.
    pub public_origin: String,
}

impl AppConfig {
    pub fn new(project_id: impl Into<String>, public_origin: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            public_origin: public_origin.into(),
        }
    }

    /// Build a Stytch public endpoint URL for this project.
    ///
    /// Project ids containing "test" route to the test environment.
    pub fn oauth_endpoint_url(&self, endpoint: &str) -> String {
        let base = if self.project_id.contains("test") {
            STYTCH_TEST_BASE
        } else {
            STYTCH_LIVE_BASE
        };
        format!("{}/{}/{}", base, self.project_id, endpoint)
    }

    /// URL of the project's JWKS document.
    pub fn jwks_url(&self) -> String {
        self.oauth_endpoint_url(".well-known/jwks.json")
    }

    /// Expected `iss` claim on Stytch-issued JWTs.
    pub fn issuer(&self) -> String {
        format!("stytch.com/{}", self.project_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_routes_to_test_environment() {
        let config = AppConfig::new("project-test-1234", "http://localhost:3000");
        assert_eq!(
            config.oauth_endpoint_url("oauth2/token"),
            "https://test.stytch.com/v1/public/project-test-1234/oauth2/token"
        );
    }

    #[test]
    fn live_project_routes_to_live_environment() {
        let config = AppConfig::new("project-live-1234", "https://todos.example.com");
        assert_eq!(
            config.jwks_url(),
            "https://api.stytch.com/v1/public/project-live-1234/.well-known/jwks.json"
        );
    }

    #[test]
    fn issuer_is_scoped_to_the_project() {
        let config = AppConfig::new("project-test-1234", "http://localhost:3000");
        assert_eq!(config.issuer(), "stytch.com/project-test-1234");
    }
}
