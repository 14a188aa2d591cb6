use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanTier {
    #[default]
    Free,
    Pro,
    Lifetime,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
    Beta,
}

impl PlanTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanTier::Free => "free",
            PlanTier::Pro => "pro",
            PlanTier::Lifetime => "lifetime",
        }
    }
}

impl FromStr for PlanTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "free" => Ok(PlanTier::Free),
            "pro" => Ok(PlanTier::Pro),
            "lifetime" => Ok(PlanTier::Lifetime),
            other => Err(format!("Unknown plan: {}", other)),
        }
    }
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
            Role::Beta => "beta",
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            "beta" => Ok(Role::Beta),
            other => Err(format!("Unknown role: {}", other)),
        }
    }
}

/// Gamification and plan state for one user.
///
/// `level` is a cache of the band computed from `xp`; the ledger rewrites it
/// on every award and readers should prefer `gamification::level_for(xp)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub uid: String,
    pub email: String,
    pub display_name: Option<String>,
    pub plan: PlanTier,
    pub role: Role,
    pub xp: u64,
    pub level: u32,
    pub badges: BTreeSet<String>,
    pub streak: u32,
    pub last_trade_date: Option<NaiveDate>,
    pub created_at: i64,
}

impl UserProfile {
    pub fn new(uid: impl Into<String>, email: impl Into<String>, created_at: i64) -> Self {
        Self {
            uid: uid.into(),
            email: email.into(),
            display_name: None,
            plan: PlanTier::Free,
            role: Role::User,
            xp: 0,
            level: 1,
            badges: BTreeSet::new(),
            streak: 0,
            last_trade_date: None,
            created_at,
        }
    }

    pub fn has_pro_access(&self) -> bool {
        self.role == Role::Admin || matches!(self.plan, PlanTier::Pro | PlanTier::Lifetime)
    }
}
