//! The collaborator sends identifiers as numbers on some endpoints and as
//! strings on others.

use serde::Deserialize;
use serde::Deserializer;
use serde::de::Error;

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId
{
    Number(u64),
    Text(String),
}

impl RawId
{
    fn into_id<E: Error>(self) -> Result<u64, E>
    {
        match self {
            RawId::Number(id) => Ok(id),
            RawId::Text(text) => text.trim().parse().map_err(|_| E::custom(format!("invalid identifier {text:?}"))),
        }
    }
}

pub(crate) fn deserialize_id<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    RawId::deserialize(deserializer)?.into_id()
}

pub(crate) fn deserialize_optional_id<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<RawId>::deserialize(deserializer)?
        .map(|raw| raw.into_id::<D::Error>())
        .transpose()
}
