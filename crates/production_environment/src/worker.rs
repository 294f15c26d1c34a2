use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::wire;

pub type WorkerId = u64;
pub type RoleId = u64;

/// A job position a worker can hold.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Role
{
    #[serde(deserialize_with = "wire::deserialize_id")]
    pub role_id: RoleId,
    pub roleworker: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Worker
{
    #[serde(deserialize_with = "wire::deserialize_id")]
    pub worker_id: WorkerId,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, deserialize_with = "wire::deserialize_optional_id")]
    pub role_id: Option<RoleId>,
    #[serde(default)]
    pub roleworker: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum WorkerBuilderError
{
    #[error("worker field `{0}` must not be empty")]
    MissingField(&'static str),
    #[error("`{0}` is not an email address")]
    InvalidEmail(String),
}

/// Payload for `POST /workers`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NewWorker
{
    name: String,
    email: String,
    password: String,
    role_id: RoleId,
}

impl NewWorker
{
    pub fn builder(role_id: RoleId) -> WorkerBuilder
    {
        WorkerBuilder::new(role_id)
    }

    pub fn name(&self) -> &str
    {
        &self.name
    }

    pub fn email(&self) -> &str
    {
        &self.email
    }

    pub fn role_id(&self) -> RoleId
    {
        self.role_id
    }
}

pub struct WorkerBuilder
{
    role_id: RoleId,
    name: String,
    email: String,
    password: String,
}

impl WorkerBuilder
{
    pub fn new(role_id: RoleId) -> Self
    {
        Self {
            role_id,
            name: String::new(),
            email: String::new(),
            password: String::new(),
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self
    {
        self.name = name.into();
        self
    }

    pub fn email(mut self, email: impl Into<String>) -> Self
    {
        self.email = email.into();
        self
    }

    pub fn password(mut self, password: impl Into<String>) -> Self
    {
        self.password = password.into();
        self
    }

    pub fn build(self) -> Result<NewWorker, WorkerBuilderError>
    {
        let name = self.name.trim().to_string();
        let email = self.email.trim().to_string();

        if name.is_empty() {
            return Err(WorkerBuilderError::MissingField("name"));
        }
        if email.is_empty() {
            return Err(WorkerBuilderError::MissingField("email"));
        }
        if self.password.is_empty() {
            return Err(WorkerBuilderError::MissingField("password"));
        }
        if !email.contains('@') {
            return Err(WorkerBuilderError::InvalidEmail(email));
        }

        Ok(NewWorker {
            name,
            email,
            password: self.password,
            role_id: self.role_id,
        })
    }
}

/// Payload for `PUT /workers/{id}`. Unset fields are left untouched by the API.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct WorkerUpdate
{
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role_id: Option<RoleId>,
}

#[cfg(test)]
mod tests
{
    use super::NewWorker;
    use super::Role;
    use super::Worker;
    use super::WorkerBuilderError;
    use super::WorkerUpdate;

    #[test]
    fn test_worker_builder()
    {
        let worker = NewWorker::builder(3)
            .name("  Siti  ")
            .email("siti@example.com")
            .password("rahasia")
            .build()
            .unwrap();

        assert_eq!(worker.name(), "Siti");
        assert_eq!(worker.role_id(), 3);

        let missing_password = NewWorker::builder(3).name("Siti").email("siti@example.com").build();
        assert_eq!(missing_password, Err(WorkerBuilderError::MissingField("password")));

        let bad_email = NewWorker::builder(3).name("Siti").email("siti").password("x").build();
        assert_eq!(bad_email, Err(WorkerBuilderError::InvalidEmail("siti".to_string())));
    }

    #[test]
    fn test_worker_ids_accept_strings_and_numbers()
    {
        let workers: Vec<Worker> = serde_json::from_str(
            r#"[
                {"worker_id": 7, "name": "Budi", "email": "budi@example.com", "roleworker": "Penjahit"},
                {"worker_id": "8", "name": "Ani", "email": "ani@example.com", "role_id": "2"}
            ]"#,
        )
        .unwrap();

        assert_eq!(workers[0].worker_id, 7);
        assert_eq!(workers[0].role_id, None);
        assert_eq!(workers[1].worker_id, 8);
        assert_eq!(workers[1].role_id, Some(2));

        let role: Role = serde_json::from_str(r#"{"role_id": 2, "roleworker": "Pemotong"}"#).unwrap();
        assert_eq!(role.roleworker, "Pemotong");
    }

    #[test]
    fn test_worker_update_skips_unset_fields()
    {
        let update = WorkerUpdate {
            name: Some("Budi".to_string()),
            ..Default::default()
        };

        assert_eq!(serde_json::to_value(&update).unwrap(), serde_json::json!({"name": "Budi"}));
    }
}
