//! Event correlation and paginated responses.
//!
//! Callers register waits against a [`Registry`] keyed by the message they
//! concern; the gateway loop offers every incoming event to
//! [`Registry::dispatch`]. Pagination sessions are driven by [`paginate`],
//! which holds one [`Registry::subscribe`] stream for the whole session,
//! moves a [`Cursor`] over caller-supplied pages and applies a
//! [`CleanupPolicy`] when the session ends.

/// Button control set for component pagination.
pub mod buttons;
/// Cancellation tokens and deadlines.
pub mod cancel;
/// Finalization policies.
pub mod cleanup;
mod collector;
/// Single-resolution completion slots.
pub mod completion;
/// Pure cursor state machine.
pub mod cursor;
/// Reaction control set for legacy pagination.
pub mod emojis;
pub mod error;
/// Events that can press a control.
pub mod event;
pub mod page;
pub mod paginator;
/// Pending request registry and dispatcher.
pub mod registry;
/// Pagination request kinds.
pub mod request;
pub mod stream;
/// Render/update/delete boundary for paginated messages.
pub mod surface;

pub use buttons::{ButtonSpec, PaginationButtons};
pub use cancel::{CancelSubscription, CancelToken};
pub use cleanup::CleanupPolicy;
pub use collector::CollectHandle;
pub use completion::{CompletionSlot, Resolution, WaitHandle};
pub use cursor::{Affordances, Control, Cursor, Navigation, WrapPolicy};
pub use emojis::PaginationEmojis;
pub use error::InteractivityError;
pub use event::ControlEvent;
pub use page::Page;
pub use paginator::{PaginationEnd, paginate};
pub use registry::{DispatchOutcome, Registry};
pub use request::{ButtonPagination, PageView, PaginationRequest, ReactionPagination};
pub use stream::EventStream;
pub use surface::{ControlPress, Surface};
