//! Team member records and the team repository.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::store::{self, SharedStore, TEAM_MEMBERS_KEY};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Role {
    Admin,
    Manager,
    User,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::Manager => "Manager",
            Role::User => "User",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "manager" => Ok(Role::Manager),
            "user" => Ok(Role::User),
            _ => Err(Error::InvalidArgument(format!(
                "invalid role '{value}' (expected Admin|Manager|User)"
            ))),
        }
    }
}

/// A person on the team.
///
/// Older documents also carry `tasksAssigned`/`tasksCompleted`; those
/// counters are ignored on read and never written back. Workload comes
/// from [`crate::stats::member_workload`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(default)]
    pub avatar: String,
}

impl TeamMember {
    pub fn matches_search(&self, query: &str) -> bool {
        if query.is_empty() {
            return true;
        }
        let needle = query.to_lowercase();
        self.name.to_lowercase().contains(&needle) || self.email.to_lowercase().contains(&needle)
    }
}

/// Input for a new team member
#[derive(Debug, Clone, Default)]
pub struct NewMember {
    pub name: String,
    pub email: String,
    pub role: Option<Role>,
    pub avatar: Option<String>,
}

impl NewMember {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            ..Self::default()
        }
    }

    pub fn role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    pub fn avatar(mut self, avatar: impl Into<String>) -> Self {
        self.avatar = Some(avatar.into());
        self
    }

    /// Validate and assign an id. A missing role means `User`; the avatar
    /// stays empty here and is filled in by [`TeamRepository::create`].
    pub fn build(self) -> Result<TeamMember> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(Error::validation("name", "name cannot be empty"));
        }
        let email = self.email.trim();
        if email.is_empty() {
            return Err(Error::validation("email", "email cannot be empty"));
        }
        if !email.contains('@') {
            return Err(Error::validation("email", format!("'{email}' is not an email address")));
        }

        Ok(TeamMember {
            id: ulid::Ulid::new().to_string(),
            name: name.to_string(),
            email: email.to_string(),
            role: self.role.unwrap_or(Role::User),
            avatar: self.avatar.map(|a| a.trim().to_string()).unwrap_or_default(),
        })
    }
}

/// Durable access to the `teamMembers` collection
#[derive(Debug, Clone)]
pub struct TeamRepository {
    store: SharedStore,
    seed_fixtures: bool,
    avatar_base_url: String,
}

impl TeamRepository {
    pub fn new(store: SharedStore, seed_fixtures: bool, avatar_base_url: impl Into<String>) -> Self {
        Self {
            store,
            seed_fixtures,
            avatar_base_url: avatar_base_url.into(),
        }
    }

    /// Placeholder avatar for `name`
    pub fn avatar_for(&self, name: &str) -> String {
        avatar_url(&self.avatar_base_url, name)
    }

    /// All members. The first read of an absent key writes the fixture
    /// roster when seeding is enabled.
    pub fn list_all(&self) -> Result<Vec<TeamMember>> {
        if let Some(members) = store::read_json(self.store.as_ref(), TEAM_MEMBERS_KEY)? {
            return Ok(members);
        }
        if !self.seed_fixtures {
            return Ok(Vec::new());
        }

        let _lock = self.store.lock(TEAM_MEMBERS_KEY)?;
        // another process may have seeded while we waited for the lock
        if let Some(members) = store::read_json(self.store.as_ref(), TEAM_MEMBERS_KEY)? {
            return Ok(members);
        }
        let members = self.fixtures();
        store::write_json(self.store.as_ref(), TEAM_MEMBERS_KEY, &members)?;
        tracing::info!(count = members.len(), "seeded team roster");
        Ok(members)
    }

    pub fn find_by_name(&self, name: &str) -> Result<Option<TeamMember>> {
        Ok(self.list_all()?.into_iter().find(|member| member.name == name))
    }

    /// Append `member`, generating an avatar when none is set
    pub fn create(&self, mut member: TeamMember) -> Result<TeamMember> {
        if member.avatar.trim().is_empty() {
            member.avatar = self.avatar_for(&member.name);
        }

        let _lock = self.store.lock(TEAM_MEMBERS_KEY)?;
        let mut members: Vec<TeamMember> =
            match store::read_json(self.store.as_ref(), TEAM_MEMBERS_KEY)? {
                Some(members) => members,
                None if self.seed_fixtures => self.fixtures(),
                None => Vec::new(),
            };
        members.push(member.clone());
        store::write_json(self.store.as_ref(), TEAM_MEMBERS_KEY, &members)?;

        tracing::info!(member_id = %member.id, name = %member.name, "team member added");
        Ok(member)
    }

    /// The starter roster written on first access
    pub fn fixtures(&self) -> Vec<TeamMember> {
        [
            ("1", "John Doe", "john@example.com", Role::Admin),
            ("2", "Jane Smith", "jane@example.com", Role::Manager),
            ("3", "Mike Johnson", "mike@example.com", Role::User),
            ("4", "Sarah Williams", "sarah@example.com", Role::User),
        ]
        .into_iter()
        .map(|(id, name, email, role)| TeamMember {
            id: id.to_string(),
            name: name.to_string(),
            email: email.to_string(),
            role,
            avatar: self.avatar_for(name),
        })
        .collect()
    }
}

/// Members whose name or email contains `query`, ignoring case
pub fn filter_by_search<'a>(all: &'a [TeamMember], query: &str) -> Vec<&'a TeamMember> {
    all.iter().filter(|member| member.matches_search(query)).collect()
}

/// `<base>?name=<name>&background=random`, with the name percent-encoded
pub fn avatar_url(base: &str, name: &str) -> String {
    format!("{}?name={}&background=random", base, encode_component(name))
}

/// Upper-cased first letter of each word, `"U"` for a blank name
pub fn initials(name: &str) -> String {
    let initials: String = name
        .split_whitespace()
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_uppercase)
        .collect();
    if initials.is_empty() {
        "U".to_string()
    } else {
        initials
    }
}

// Percent-encodes everything outside the URI-component unreserved set.
fn encode_component(value: &str) -> String {
    const UNRESERVED: &[u8] = b"-_.!~*'()";
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        if byte.is_ascii_alphanumeric() || UNRESERVED.contains(&byte) {
            out.push(byte as char);
        } else {
            out.push_str(&format!("%{byte:02X}"));
        }
    }
    out
}
