//! The floating chat widget surface.
//!
//! A minimizable, draggable chat window that docks to the bottom-right
//! corner of the viewport. The widget owns its own [`ChatSession`]
//! (bootstrapped lazily on first open) and exposes the send/message
//! surface only; session persistence belongs to the full-page surface.

use crate::chat::config::ChatConfig;
use crate::chat::session::ChatSession;
use crate::client::ChatClient;
use crate::types::{ContextType, Message};

/// Margin kept between the docked window and the viewport edges.
pub const WIDGET_MARGIN: f64 = 24.0;

/// Default window size, in CSS pixels.
const DEFAULT_SIZE: Size = Size {
    width: 360.0,
    height: 520.0,
};

/// A point in viewport coordinates (origin top-left).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Position {
    /// Horizontal offset from the viewport's left edge.
    pub x: f64,

    /// Vertical offset from the viewport's top edge.
    pub y: f64,
}

/// The widget window's dimensions.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Size {
    /// Window width.
    pub width: f64,

    /// Window height.
    pub height: f64,
}

/// The visible area the widget lives in.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Viewport {
    /// Viewport width.
    pub width: f64,

    /// Viewport height.
    pub height: f64,
}

/// The widget's display state.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum WidgetState {
    /// Only the launcher button is visible.
    Closed,

    /// The chat window is visible and accepts input.
    Open,

    /// The header bar is visible; messages and input are hidden.
    Minimized,
}

/// The floating chat widget.
pub struct ChatWidget {
    session: ChatSession,
    state: WidgetState,
    position: Position,
    size: Size,
    viewport: Viewport,
}

impl ChatWidget {
    /// Creates a closed widget for the given context.
    pub fn new(client: ChatClient, context_type: ContextType, viewport: Viewport) -> Self {
        let config = ChatConfig::for_widget().with_context_type(context_type);
        Self {
            session: ChatSession::new(client, config),
            state: WidgetState::Closed,
            position: Position { x: 0.0, y: 0.0 },
            size: DEFAULT_SIZE,
            viewport,
        }
    }

    /// Sets the window size and re-clamps the position.
    pub fn with_size(mut self, size: Size) -> Self {
        self.size = size;
        self.position = self.clamped(self.position, 0.0);
        self
    }

    /// Opens the widget.
    ///
    /// From `Closed` the window docks to the bottom-right corner and the
    /// session bootstraps lazily (a no-op on reopen). From `Minimized`
    /// the window is restored.
    pub async fn open(&mut self) {
        match self.state {
            WidgetState::Closed => {
                self.position = self.docked_position();
                self.state = WidgetState::Open;
                self.session.initialize().await;
            }
            WidgetState::Minimized => self.state = WidgetState::Open,
            WidgetState::Open => {}
        }
    }

    /// Collapses the window to its header bar.
    pub fn minimize(&mut self) {
        if self.state == WidgetState::Open {
            self.state = WidgetState::Minimized;
        }
    }

    /// Restores a minimized window.
    pub fn restore(&mut self) {
        if self.state == WidgetState::Minimized {
            self.state = WidgetState::Open;
        }
    }

    /// Closes the widget, discarding any minimization.
    pub fn close(&mut self) {
        self.state = WidgetState::Closed;
    }

    /// Sends a message through the widget's session.
    ///
    /// Rejected unless the window is open; the session applies its own
    /// blank-input and in-flight guards on top.
    pub async fn send(&mut self, input: &str) -> Option<&Message> {
        if self.state != WidgetState::Open {
            return None;
        }
        self.session.send(input).await
    }

    /// Moves the window while dragging, clamped inside the viewport.
    pub fn drag_to(&mut self, x: f64, y: f64) {
        if self.state == WidgetState::Closed {
            return;
        }
        self.position = self.clamped(Position { x, y }, 0.0);
    }

    /// Adapts to a viewport change, keeping the window on screen with the
    /// docking margin.
    pub fn handle_resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        if self.state == WidgetState::Closed {
            return;
        }
        self.position = self.clamped(self.position, WIDGET_MARGIN);
    }

    fn docked_position(&self) -> Position {
        Position {
            x: (self.viewport.width - self.size.width - WIDGET_MARGIN).max(0.0),
            y: (self.viewport.height - self.size.height - WIDGET_MARGIN).max(0.0),
        }
    }

    fn clamped(&self, position: Position, margin: f64) -> Position {
        let max_x = (self.viewport.width - self.size.width - margin).max(0.0);
        let max_y = (self.viewport.height - self.size.height - margin).max(0.0);
        Position {
            x: position.x.clamp(0.0, max_x),
            y: position.y.clamp(0.0, max_y),
        }
    }

    /// The widget's display state.
    pub fn state(&self) -> WidgetState {
        self.state
    }

    /// The window's current position.
    pub fn position(&self) -> Position {
        self.position
    }

    /// The messages exchanged through the widget.
    pub fn messages(&self) -> &[Message] {
        self.session.messages()
    }

    /// The widget's underlying session, read-only.
    pub fn session(&self) -> &ChatSession {
        &self.session
    }
}
