//! Pagination request kinds behind one capability interface.
//!
//! Operations a kind cannot support fail with
//! [`InteractivityError::UnsupportedOperation`] instead of silently degrading.

use twilight_model::channel::message::component::Component;

use crate::{
    buttons::PaginationButtons,
    cleanup::{CleanupPolicy, ControlSurface, finalize},
    cursor::{Affordances, Control, Cursor, Navigation, WrapPolicy},
    emojis::PaginationEmojis,
    error::InteractivityError,
    page::Page,
    surface::Surface,
};

/// Pages, cursor and cleanup policy shared by every kind.
#[derive(Clone, Debug)]
struct PageDeck {
    pages: Vec<Page>,
    cursor: Cursor,
    cleanup: CleanupPolicy,
    affordances: Affordances,
}

impl PageDeck {
    fn new(
        pages: Vec<Page>,
        wrap: WrapPolicy,
        cleanup: CleanupPolicy,
    ) -> Result<Self, InteractivityError> {
        if pages.is_empty() {
            return Err(InteractivityError::EmptyPages);
        }

        let cursor = Cursor::new(pages.len(), wrap);
        Ok(Self {
            affordances: cursor.affordances(),
            pages,
            cursor,
            cleanup,
        })
    }

    /// Current page and its freshly evaluated control enablement.
    fn current(&mut self) -> (&Page, Affordances) {
        self.affordances = self.cursor.affordances();
        (&self.pages[self.cursor.index()], self.affordances)
    }
}

/// Button-driven pagination.
#[derive(Clone, Debug)]
pub struct ButtonPagination {
    deck: PageDeck,
    buttons: PaginationButtons,
}

/// Legacy reaction-driven pagination.
#[derive(Clone, Debug)]
pub struct ReactionPagination {
    deck: PageDeck,
    emojis: PaginationEmojis,
}

/// The rendered state of a session.
#[derive(Clone, Copy, Debug)]
pub struct PageView<'a> {
    pub page: &'a Page,
    pub index: usize,
    pub page_count: usize,
    pub affordances: Affordances,
}

/// A pagination session of either kind.
#[derive(Clone, Debug)]
pub enum PaginationRequest {
    Buttons(ButtonPagination),
    Reactions(ReactionPagination),
}

impl PaginationRequest {
    /// Create a button-driven session starting on the first page.
    pub fn buttons(
        pages: Vec<Page>,
        wrap: WrapPolicy,
        cleanup: CleanupPolicy,
        buttons: PaginationButtons,
    ) -> Result<Self, InteractivityError> {
        Ok(Self::Buttons(ButtonPagination {
            deck: PageDeck::new(pages, wrap, cleanup)?,
            buttons,
        }))
    }

    /// Create a reaction-driven session starting on the first page.
    ///
    /// Reactions cannot be disabled, so [`CleanupPolicy::DisableControls`]
    /// is rejected.
    pub fn reactions(
        pages: Vec<Page>,
        wrap: WrapPolicy,
        cleanup: CleanupPolicy,
        emojis: PaginationEmojis,
    ) -> Result<Self, InteractivityError> {
        if cleanup == CleanupPolicy::DisableControls {
            return Err(InteractivityError::unsupported(
                "disabling controls",
                "reaction",
            ));
        }

        Ok(Self::Reactions(ReactionPagination {
            deck: PageDeck::new(pages, wrap, cleanup)?,
            emojis,
        }))
    }

    /// Start the session on page `index` (zero-based, clamped into range).
    pub fn starting_at(mut self, index: usize) -> Self {
        let deck = self.deck_mut();
        deck.cursor = Cursor::at(index, deck.pages.len(), deck.cursor.policy());
        deck.affordances = deck.cursor.affordances();
        self
    }

    /// Short name of the request kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Buttons(_) => "button",
            Self::Reactions(_) => "reaction",
        }
    }

    fn deck(&self) -> &PageDeck {
        match self {
            Self::Buttons(request) => &request.deck,
            Self::Reactions(request) => &request.deck,
        }
    }

    fn deck_mut(&mut self) -> &mut PageDeck {
        match self {
            Self::Buttons(request) => &mut request.deck,
            Self::Reactions(request) => &mut request.deck,
        }
    }

    pub fn page_count(&self) -> usize {
        self.deck().pages.len()
    }

    pub fn index(&self) -> usize {
        self.deck().cursor.index()
    }

    pub fn cleanup_policy(&self) -> CleanupPolicy {
        self.deck().cleanup
    }

    /// Current page, refreshing control enablement first.
    pub fn current_view(&mut self) -> PageView<'_> {
        let deck = self.deck_mut();
        let index = deck.cursor.index();
        let page_count = deck.pages.len();
        let (page, affordances) = deck.current();

        PageView {
            page,
            index,
            page_count,
            affordances,
        }
    }

    /// Move the cursor.
    pub fn advance(&mut self, navigation: Navigation) {
        let deck = self.deck_mut();
        deck.cursor.navigate(navigation);
        deck.affordances = deck.cursor.affordances();
    }

    /// Component rows to render with the current page.
    ///
    /// Includes the page's own rows followed by the navigation row.
    pub fn controls(&mut self) -> Result<Vec<Component>, InteractivityError> {
        let Self::Buttons(request) = self else {
            return Err(InteractivityError::unsupported("button controls", "reaction"));
        };

        let (page, affordances) = request.deck.current();
        let mut components = page.components.clone();
        components.push(request.buttons.render(affordances));
        Ok(components)
    }

    /// Emojis to add to the message.
    pub fn emojis(&self) -> Result<&PaginationEmojis, InteractivityError> {
        match self {
            Self::Reactions(request) => Ok(&request.emojis),
            Self::Buttons(_) => Err(InteractivityError::unsupported("emojis", "button")),
        }
    }

    /// Map a raw button ID or emoji name to one of this session's controls.
    pub fn control_for(&self, raw_id: &str) -> Option<Control> {
        match self {
            Self::Buttons(request) => request.buttons.control_for(raw_id),
            Self::Reactions(request) => request.emojis.control_for(raw_id),
        }
    }

    /// Every raw ID that presses one of this session's controls.
    pub fn control_ids(&self) -> Vec<String> {
        Control::ALL
            .into_iter()
            .map(|control| match self {
                Self::Buttons(request) => request.buttons.spec(control).custom_id.clone(),
                Self::Reactions(request) => request.emojis.emoji(control).to_owned(),
            })
            .collect()
    }

    /// Render the current page onto `surface`.
    pub async fn render<S>(&mut self, surface: &S) -> anyhow::Result<()>
    where
        S: Surface + ?Sized,
    {
        match self {
            Self::Buttons(_) => {
                let components = self.controls()?;
                let page = self.current_view().page;
                surface.update(page, &components).await
            }
            Self::Reactions(_) => {
                let page = self.current_view().page;
                surface.update(page, &page.components).await
            }
        }
    }

    /// Apply the cleanup policy. Consumes the session so it runs once.
    pub async fn cleanup<S>(mut self, surface: &S) -> Result<(), InteractivityError>
    where
        S: Surface + ?Sized,
    {
        let controls = match &self {
            Self::Buttons(request) => {
                ControlSurface::Components(request.buttons.render_disabled())
            }
            Self::Reactions(_) => ControlSurface::Reactions,
        };
        let policy = self.cleanup_policy();
        let page = self.current_view().page;

        finalize(policy, page, controls, surface).await
    }
}
