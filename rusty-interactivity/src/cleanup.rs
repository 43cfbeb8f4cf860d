//! Finalization policies applied when a session ends.

use std::{fmt, str::FromStr};

use tracing::debug;
use twilight_model::channel::message::component::Component;

use crate::{error::InteractivityError, page::Page, surface::Surface};

/// What to do with the paginated message once its session ends.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CleanupPolicy {
    /// Re-render the current page with every control disabled.
    #[default]
    DisableControls,
    /// Re-render the current page without controls.
    StripControls,
    /// Delete the message.
    DeleteResource,
    /// Leave the message untouched.
    Ignore,
}

impl FromStr for CleanupPolicy {
    type Err = InteractivityError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "disable" | "disable-controls" => Ok(Self::DisableControls),
            "strip" | "strip-controls" | "delete-buttons" => Ok(Self::StripControls),
            "delete" | "delete-message" => Ok(Self::DeleteResource),
            "ignore" | "keep" | "none" => Ok(Self::Ignore),
            _ => Err(InteractivityError::InvalidPolicy {
                kind: "cleanup",
                value: value.to_owned(),
            }),
        }
    }
}

impl fmt::Display for CleanupPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::DisableControls => "disable",
            Self::StripControls => "strip",
            Self::DeleteResource => "delete",
            Self::Ignore => "ignore",
        };
        f.write_str(name)
    }
}

/// How the controls of a session are attached to the message.
#[derive(Clone, Debug)]
pub(crate) enum ControlSurface {
    /// Components; carries the all-disabled control row.
    Components(Component),
    /// Reactions on the message.
    Reactions,
}

/// Apply `policy` to the message showing `page`.
pub(crate) async fn finalize<S>(
    policy: CleanupPolicy,
    page: &Page,
    controls: ControlSurface,
    surface: &S,
) -> Result<(), InteractivityError>
where
    S: Surface + ?Sized,
{
    debug!(%policy, "finalizing pagination session");

    let result = match (policy, controls) {
        (CleanupPolicy::Ignore, _) => Ok(()),
        (CleanupPolicy::DeleteResource, _) => surface.delete().await,
        (CleanupPolicy::DisableControls, ControlSurface::Components(disabled_row)) => {
            let mut components = page.components.clone();
            components.push(disabled_row);
            surface.update(page, &components).await
        }
        (CleanupPolicy::StripControls, ControlSurface::Components(_)) => {
            surface.update(page, &page.components).await
        }
        (CleanupPolicy::StripControls, ControlSurface::Reactions) => {
            surface.clear_reactions().await
        }
        (CleanupPolicy::DisableControls, ControlSurface::Reactions) => {
            return Err(InteractivityError::unsupported(
                "disabling controls",
                "reaction",
            ));
        }
    };

    result.map_err(InteractivityError::Finalization)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        buttons::PaginationButtons,
        surface::testing::{RecordingSurface, SurfaceCall},
    };

    fn disabled_row() -> Component {
        PaginationButtons::default().render_disabled()
    }

    #[tokio::test]
    async fn disable_rerenders_with_disabled_row() {
        let surface = RecordingSurface::default();
        let page = Page::text("last seen");

        finalize(
            CleanupPolicy::DisableControls,
            &page,
            ControlSurface::Components(disabled_row()),
            &surface,
        )
        .await
        .unwrap();

        assert_eq!(
            surface.calls(),
            vec![SurfaceCall::Update {
                content: Some("last seen".to_owned()),
                components: vec![disabled_row()],
            }]
        );
    }

    #[tokio::test]
    async fn strip_rerenders_without_controls() {
        let surface = RecordingSurface::default();
        let page = Page::text("done");

        finalize(
            CleanupPolicy::StripControls,
            &page,
            ControlSurface::Components(disabled_row()),
            &surface,
        )
        .await
        .unwrap();

        assert_eq!(
            surface.calls(),
            vec![SurfaceCall::Update {
                content: Some("done".to_owned()),
                components: vec![],
            }]
        );
    }

    #[tokio::test]
    async fn strip_clears_reactions_for_reaction_sessions() {
        let surface = RecordingSurface::default();

        finalize(
            CleanupPolicy::StripControls,
            &Page::text("x"),
            ControlSurface::Reactions,
            &surface,
        )
        .await
        .unwrap();

        assert_eq!(surface.calls(), vec![SurfaceCall::ClearReactions]);
    }

    #[tokio::test]
    async fn delete_and_ignore() {
        let surface = RecordingSurface::default();
        let page = Page::text("x");

        finalize(CleanupPolicy::Ignore, &page, ControlSurface::Reactions, &surface)
            .await
            .unwrap();
        assert!(surface.calls().is_empty());

        finalize(
            CleanupPolicy::DeleteResource,
            &page,
            ControlSurface::Reactions,
            &surface,
        )
        .await
        .unwrap();
        assert_eq!(surface.calls(), vec![SurfaceCall::Delete]);
    }

    #[tokio::test]
    async fn surface_failure_is_reported_as_finalization_error() {
        let surface = RecordingSurface::failing();

        let error = finalize(
            CleanupPolicy::DeleteResource,
            &Page::text("x"),
            ControlSurface::Reactions,
            &surface,
        )
        .await
        .unwrap_err();

        assert!(matches!(error, InteractivityError::Finalization(_)));
    }

    #[test]
    fn policies_parse_from_config_strings() {
        assert_eq!(
            "DELETE".parse::<CleanupPolicy>().unwrap(),
            CleanupPolicy::DeleteResource
        );
        assert_eq!(
            "strip".parse::<CleanupPolicy>().unwrap(),
            CleanupPolicy::StripControls
        );
        assert!("explode".parse::<CleanupPolicy>().is_err());
    }
}
