//! Collapsible mobile navigation.

use shared::{domain::ElementId, protocol::RenderCommand};

use crate::{context::AppContext, page::NavStructure};

pub const OVERLAY_ID: &str = "burger-overlay";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MenuState {
    #[default]
    Closed,
    Open,
}

impl MenuState {
    pub fn is_open(self) -> bool {
        self == Self::Open
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuElements {
    pub toggle: ElementId,
    pub nav: ElementId,
    pub menu: Option<ElementId>,
    pub first_link: Option<ElementId>,
    pub overlay: ElementId,
}

impl MenuElements {
    /// `None` unless both the toggle control and the nav container exist.
    pub fn locate(nav: &NavStructure) -> Option<Self> {
        Some(Self {
            toggle: nav.toggle.clone()?,
            nav: nav.nav.clone()?,
            menu: nav.menu.clone(),
            first_link: nav.links.first().cloned(),
            overlay: ElementId::from(OVERLAY_ID),
        })
    }
}

/// Everything about the menu that is visible, as a function of its state.
/// Expanded marks, scroll lock, overlay and panel always move together.
pub fn project(state: MenuState, elements: &MenuElements) -> Vec<RenderCommand> {
    let open = state.is_open();
    let mut commands = vec![
        RenderCommand::SetMenuExpanded {
            nav: elements.nav.clone(),
            toggle: elements.toggle.clone(),
            expanded: open,
        },
        RenderCommand::SetScrollLock { locked: open },
        RenderCommand::SetOverlayVisible {
            overlay: elements.overlay.clone(),
            visible: open,
        },
    ];
    if let Some(menu) = &elements.menu {
        commands.push(RenderCommand::SlideMenuPanel {
            menu: menu.clone(),
            open,
        });
    }
    commands
}

#[derive(Debug)]
pub struct NavMenu {
    elements: MenuElements,
    state: MenuState,
}

impl NavMenu {
    /// Mount the (hidden) backdrop and park the panel off-screen.
    pub fn attach(elements: MenuElements, ctx: &mut AppContext) -> Self {
        ctx.outbox.push(RenderCommand::MountOverlay {
            overlay: elements.overlay.clone(),
        });
        if let Some(menu) = &elements.menu {
            ctx.outbox.push(RenderCommand::SlideMenuPanel {
                menu: menu.clone(),
                open: false,
            });
        }
        Self {
            elements,
            state: MenuState::Closed,
        }
    }

    pub fn state(&self) -> MenuState {
        self.state
    }

    pub fn elements(&self) -> &MenuElements {
        &self.elements
    }

    pub fn toggle(&mut self, ctx: &mut AppContext) {
        match self.state {
            MenuState::Closed => self.open(ctx),
            MenuState::Open => self.close(ctx),
        }
    }

    pub fn open(&mut self, ctx: &mut AppContext) {
        if self.state.is_open() {
            return;
        }
        self.transition(MenuState::Open, ctx);
        if let Some(link) = &self.elements.first_link {
            ctx.outbox.push(RenderCommand::Focus {
                element: link.clone(),
            });
        }
    }

    /// No-op when already closed. Focus stays where it is.
    pub fn close(&mut self, ctx: &mut AppContext) {
        if !self.state.is_open() {
            return;
        }
        self.transition(MenuState::Closed, ctx);
    }

    pub fn close_if_wide(&mut self, width: u32, ctx: &mut AppContext) {
        if width >= ctx.config.breakpoint_px {
            self.close(ctx);
        }
    }

    fn transition(&mut self, next: MenuState, ctx: &mut AppContext) {
        tracing::debug!(from = ?self.state, to = ?next, "menu transition");
        self.state = next;
        ctx.set_scroll_lock(next.is_open());
        ctx.outbox.extend(project(next, &self.elements));
    }
}
