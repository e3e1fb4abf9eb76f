//! Reservation lifecycle stages and the transition table.
//!
//! The lifecycle is strictly linear with no skipping and no regression:
//!
//! ```text
//! pre_dropoff -> pre_pickup -> post_dropoff -> post_pickup -> done
//! ```
//!
//! Legacy records may store `pending` or `service_booking` in place of
//! `pre_dropoff`; [`Stage::parse`] normalises those aliases once at read
//! time so the transition table never sees them.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Legacy stage tokens that normalise to [`Stage::PreDropoff`].
pub const LEGACY_PRE_DROPOFF_ALIASES: [&str; 2] = ["pending", "service_booking"];

/// One state in the reservation lifecycle.
///
/// Ordering follows lifecycle progression, so `a < b` means `a` happens
/// before `b`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Customer drops rented equipment off before the event.
    PreDropoff,
    /// Customer picks the equipment up for the event.
    PrePickup,
    /// Customer returns the equipment after the event.
    PostDropoff,
    /// Customer picks personal items up afterwards.
    PostPickup,
    /// Terminal stage; nothing left to hand over.
    Done,
}

impl Stage {
    /// All lifecycle stages in progression order.
    pub const ALL: [Self; 5] = [
        Self::PreDropoff,
        Self::PrePickup,
        Self::PostDropoff,
        Self::PostPickup,
        Self::Done,
    ];

    /// Parse a stored or user-supplied stage token, accepting legacy
    /// aliases for the first stage.
    ///
    /// # Examples
    /// ```
    /// use gearpass::domain::Stage;
    ///
    /// assert_eq!(Stage::parse("pending"), Some(Stage::PreDropoff));
    /// assert_eq!(Stage::parse("post_pickup"), Some(Stage::PostPickup));
    /// assert_eq!(Stage::parse("bogus"), None);
    /// ```
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "pre_dropoff" => Some(Self::PreDropoff),
            "pre_pickup" => Some(Self::PrePickup),
            "post_dropoff" => Some(Self::PostDropoff),
            "post_pickup" => Some(Self::PostPickup),
            "done" => Some(Self::Done),
            other if LEGACY_PRE_DROPOFF_ALIASES.contains(&other) => Some(Self::PreDropoff),
            _ => None,
        }
    }

    /// Canonical storage/display token.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PreDropoff => "pre_dropoff",
            Self::PrePickup => "pre_pickup",
            Self::PostDropoff => "post_dropoff",
            Self::PostPickup => "post_pickup",
            Self::Done => "done",
        }
    }

    /// The single legal successor, or `None` at the terminal stage.
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::PreDropoff => Some(Self::PrePickup),
            Self::PrePickup => Some(Self::PostDropoff),
            Self::PostDropoff => Some(Self::PostPickup),
            Self::PostPickup => Some(Self::Done),
            Self::Done => None,
        }
    }

    /// Whether leaving this stage is gated by a completed checklist.
    ///
    /// True for the four hand-off stages; `done` has nothing to check out
    /// of. Administrative direct-set bypasses the gate regardless.
    pub const fn requires_checklist(self) -> bool {
        !matches!(self, Self::Done)
    }

    /// Storage tokens that may represent this stage, canonical first.
    ///
    /// Used by conditional writes so a compare-and-swap on `pre_dropoff`
    /// also matches rows still carrying a legacy alias.
    pub fn accepted_tokens(self) -> Vec<&'static str> {
        let mut tokens = vec![self.as_str()];
        if self == Self::PreDropoff {
            tokens.extend(LEGACY_PRE_DROPOFF_ALIASES);
        }
        tokens
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One of the four stages that carries a verification-code slot and a
/// checklist. `done` is terminal and carries neither.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum HandoffStage {
    /// See [`Stage::PreDropoff`].
    PreDropoff,
    /// See [`Stage::PrePickup`].
    PrePickup,
    /// See [`Stage::PostDropoff`].
    PostDropoff,
    /// See [`Stage::PostPickup`].
    PostPickup,
}

impl HandoffStage {
    /// All hand-off stages in progression order.
    pub const ALL: [Self; 4] = [
        Self::PreDropoff,
        Self::PrePickup,
        Self::PostDropoff,
        Self::PostPickup,
    ];

    /// Parse a stage token naming a hand-off stage (legacy aliases
    /// included). Returns `None` for `done` and unknown tokens.
    pub fn parse(raw: &str) -> Option<Self> {
        Stage::parse(raw).and_then(|stage| Self::try_from(stage).ok())
    }

    /// Canonical storage/display token.
    pub const fn as_str(self) -> &'static str {
        self.stage().as_str()
    }

    /// Widen to the full lifecycle enum.
    pub const fn stage(self) -> Stage {
        match self {
            Self::PreDropoff => Stage::PreDropoff,
            Self::PrePickup => Stage::PrePickup,
            Self::PostDropoff => Stage::PostDropoff,
            Self::PostPickup => Stage::PostPickup,
        }
    }

    /// The successor stage; always defined because every hand-off stage
    /// has one (`post_pickup`'s successor is `done`).
    pub const fn next_stage(self) -> Stage {
        match self {
            Self::PreDropoff => Stage::PrePickup,
            Self::PrePickup => Stage::PostDropoff,
            Self::PostDropoff => Stage::PostPickup,
            Self::PostPickup => Stage::Done,
        }
    }
}

impl TryFrom<Stage> for HandoffStage {
    type Error = Stage;

    /// Fails only for [`Stage::Done`], returning it unchanged.
    fn try_from(stage: Stage) -> Result<Self, Stage> {
        match stage {
            Stage::PreDropoff => Ok(Self::PreDropoff),
            Stage::PrePickup => Ok(Self::PrePickup),
            Stage::PostDropoff => Ok(Self::PostDropoff),
            Stage::PostPickup => Ok(Self::PostPickup),
            Stage::Done => Err(Stage::Done),
        }
    }
}

impl std::fmt::Display for HandoffStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
