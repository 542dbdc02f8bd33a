//! Likes and reposts: toggleable per-(user, track) relations.

/// Which relation a toggle or listing operates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reaction {
    Like,
    Repost,
}

impl Reaction {
    /// Backing table. Both tables share the same shape and the
    /// `(user_id, track_id)` unique constraint.
    pub(crate) fn table(self) -> &'static str {
        match self {
            Self::Like => "likes",
            Self::Repost => "reposts",
        }
    }
}

/// Result of a toggle: whether the relation now exists, and the track's
/// total count after the toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleOutcome {
    pub active: bool,
    pub count: i64,
}
