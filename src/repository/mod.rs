//! Profile repositories: one [`Template`] per profile type, bundled in a
//! [`Database`] that answers questions spanning both collections.

mod individuals;
mod organizations;
pub mod template;

use std::{fmt, str::FromStr, sync::Arc};

use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::schema::ZipTable;
use crate::storage::{Collection, DocumentStore};

pub use individuals::Individuals;
pub use organizations::Organizations;
pub use template::{Entity, Template};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileType {
    Individual,
    Organization,
}

impl ProfileType {
    pub fn collection(self) -> Collection {
        match self {
            ProfileType::Individual => Collection::Individuals,
            ProfileType::Organization => Collection::Organizations,
        }
    }
}

impl fmt::Display for ProfileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProfileType::Individual => f.write_str("individual"),
            ProfileType::Organization => f.write_str("organization"),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct UnknownProfileType(pub String);

impl fmt::Display for UnknownProfileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown profile type: {}", self.0)
    }
}

impl std::error::Error for UnknownProfileType {}

impl FromStr for ProfileType {
    type Err = UnknownProfileType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "individual" => Ok(ProfileType::Individual),
            "organization" => Ok(ProfileType::Organization),
            other => Err(UnknownProfileType(other.to_string())),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Guest,
    Individual,
    Organization,
}

impl From<Option<ProfileType>> for Role {
    fn from(value: Option<ProfileType>) -> Self {
        match value {
            None => Role::Guest,
            Some(ProfileType::Individual) => Role::Individual,
            Some(ProfileType::Organization) => Role::Organization,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    pub registered: bool,
    pub role: Role,
}

impl Client {
    /// The client owning a profile of `kind`, or a guest when there is none.
    pub fn of(kind: Option<ProfileType>) -> Self {
        Self {
            registered: kind.is_some(),
            role: kind.into(),
        }
    }
}

pub struct Database<S> {
    pub inds: Template<Individuals, S>,
    pub orgs: Template<Organizations, S>,
}

impl<S: DocumentStore + Clone> Database<S> {
    pub fn new(store: S, zips: Arc<ZipTable>) -> Self {
        Self {
            inds: Template::new(store.clone(), zips.clone()),
            orgs: Template::new(store, zips),
        }
    }

    /// The stored profile for `uid` and the collection it lives in.
    pub fn find(&self, uid: &str) -> Result<Option<(ProfileType, Value)>> {
        if let Some(profile) = self.inds.by_id(uid)?.into_data() {
            return Ok(Some((ProfileType::Individual, serde_json::to_value(profile)?)));
        }
        if let Some(profile) = self.orgs.by_id(uid)?.into_data() {
            return Ok(Some((ProfileType::Organization, serde_json::to_value(profile)?)));
        }
        Ok(None)
    }

    pub fn profile_type(&self, uid: &str) -> Result<Option<ProfileType>> {
        Ok(self.find(uid)?.map(|(kind, _)| kind))
    }

    pub fn exists_profile(&self, uid: &str) -> Result<bool> {
        Ok(self.profile_type(uid)?.is_some())
    }

    pub fn delete_profile(&self, uid: &str) -> Result<bool> {
        match self.profile_type(uid)? {
            Some(ProfileType::Individual) => self.inds.delete(uid),
            Some(ProfileType::Organization) => self.orgs.delete(uid),
            None => Ok(false),
        }
    }
}
