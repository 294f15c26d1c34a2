use std::fmt;

use serde::Deserialize;
use serde::Serialize;

/// Bearer token of a logged-in user. Every authenticated call takes the
/// session explicitly.
#[derive(Clone, PartialEq, Eq)]
pub struct Session
{
    token: String,
}

impl Session
{
    pub fn new(token: impl Into<String>) -> Self
    {
        Self { token: token.into() }
    }

    pub fn token(&self) -> &str
    {
        &self.token
    }
}

impl fmt::Debug for Session
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        f.debug_struct("Session").field("token", &"<redacted>").finish()
    }
}

/// Body of `POST /users/login`.
#[derive(Clone, Serialize)]
pub struct Credentials
{
    name: String,
    password: String,
}

impl Credentials
{
    pub fn new(name: impl Into<String>, password: impl Into<String>) -> Self
    {
        Self {
            name: name.into().trim().to_string(),
            password: password.into(),
        }
    }

    pub fn name(&self) -> &str
    {
        &self.name
    }
}

impl fmt::Debug for Credentials
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        f.debug_struct("Credentials")
            .field("name", &self.name)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Deserialize)]
pub(crate) struct LoginResponse
{
    pub(crate) token: String,
}

#[cfg(test)]
mod tests
{
    use super::Credentials;
    use super::Session;

    #[test]
    fn test_debug_output_hides_secrets()
    {
        let session = Session::new("eyJhbGciOi");
        assert!(!format!("{session:?}").contains("eyJhbGciOi"));
        assert_eq!(session.token(), "eyJhbGciOi");

        let credentials = Credentials::new(" admin ", "hunter2");
        assert_eq!(credentials.name(), "admin");
        assert!(!format!("{credentials:?}").contains("hunter2"));
        assert_eq!(
            serde_json::to_value(&credentials).unwrap(),
            serde_json::json!({"name": "admin", "password": "hunter2"})
        );
    }
}
