//! UI-side models shared across controllers and views.

/// Severity of a transient notice.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeKind {
    /// Informational notice (e.g. download started).
    Info,
    /// Error notice (e.g. favorite rollback, scoped fetch failure).
    Error,
}

/// Transient user-visible notice rendered into the notice area.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    /// Monotonic notice identifier.
    pub id: u64,
    /// Display message.
    pub message: String,
    /// Severity classification.
    pub kind: NoticeKind,
}

/// Lifecycle of a logical view (browse or search).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ViewPhase {
    /// Nothing fetched yet.
    #[default]
    Idle,
    /// A request is in flight.
    Loading,
    /// A response has been painted.
    Displayed,
}

/// Result of a content load after it resolves. A response superseded by a
/// newer request never produces an outcome; it surfaces as a
/// [`StateConflict`](crate::error::ClientError::StateConflict) error that the
/// app shell logs and drops.
#[derive(Clone, Debug, PartialEq, Eq)]
#[must_use]
pub enum LoadOutcome {
    /// The response was painted.
    Displayed {
        /// Total pages reported by the response.
        total_pages: u32,
    },
    /// The response was a confirmed empty result set.
    NoResults,
}
