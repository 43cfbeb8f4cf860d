//! Drives a pagination session from control presses.

use std::hash::Hash;

use tracing::{debug, warn};

use crate::{
    cancel::CancelToken,
    error::InteractivityError,
    event::ControlEvent,
    registry::Registry,
    request::PaginationRequest,
    surface::{ControlPress, Surface},
};

/// Why a session ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PaginationEnd {
    /// The owner pressed stop.
    Stopped,
    /// The cancellation token fired.
    TimedOut,
}

/// Run a session on an already-sent message until it stops or `token` fires.
///
/// Only presses by `owner_id` on this session's own controls are matched.
/// The session stays registered on `key` from start to end, so presses that
/// arrive while a page is being rendered are queued, not dropped.
/// The initial page must already be rendered by the caller. The cleanup
/// policy is applied exactly once before returning; a failed re-render while
/// navigating is logged and the session continues.
pub async fn paginate<K, E, S>(
    registry: &Registry<K, E>,
    key: K,
    mut request: PaginationRequest,
    surface: &S,
    owner_id: u64,
    token: CancelToken,
) -> Result<PaginationEnd, InteractivityError>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    E: ControlEvent + Clone + 'static,
    S: Surface + ?Sized,
{
    let control_ids = request.control_ids();
    let mut presses = registry.subscribe(
        key,
        move |event: &E| {
            event.actor_id() == Some(owner_id)
                && event
                    .control_id()
                    .is_some_and(|id| control_ids.iter().any(|known| known == id))
        },
        token,
    );

    let end = loop {
        let Some(event) = presses.next().await else {
            break PaginationEnd::TimedOut;
        };

        let Some(raw_id) = event.control_id() else {
            continue;
        };
        let Some(control) = request.control_for(raw_id) else {
            continue;
        };

        if matches!(request, PaginationRequest::Reactions(_)) {
            let press = ControlPress {
                control,
                raw_id: raw_id.to_owned(),
                actor_id: owner_id,
            };
            if let Err(source) = surface.release(&press).await {
                warn!(?source, "failed to release control press");
            }
        }

        let Some(navigation) = control.navigation() else {
            break PaginationEnd::Stopped;
        };

        request.advance(navigation);
        debug!(
            ?navigation,
            index = request.index(),
            page_count = request.page_count(),
            "pagination moved"
        );

        if let Err(source) = request.render(surface).await {
            warn!(?source, "failed to render pagination page");
        }
    };

    drop(presses);

    debug!(?end, kind = request.kind(), "pagination session ended");
    request.cleanup(surface).await?;

    Ok(end)
}
