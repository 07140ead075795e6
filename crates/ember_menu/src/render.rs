//! Render command collection.
//!
//! Drawables never touch the graphics API. They push [`RenderCommand`]s into
//! a [`UIRenderer`]; the host rasterizes the resulting batches with its own
//! line, sprite and font primitives.

use crate::layout::Rect;
use crate::style::Color;

/// A render command for the overlay.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCommand {
    /// Filled rectangle.
    Rect {
        /// Bounds.
        bounds: Rect,
        /// Fill color.
        color: Color,
    },
    /// Rectangle outline.
    RectOutline {
        /// Bounds.
        bounds: Rect,
        /// Stroke color.
        color: Color,
        /// Line width.
        width: f32,
    },
    /// Straight line.
    Line {
        /// Start point (x, y).
        from: (f32, f32),
        /// End point (x, y).
        to: (f32, f32),
        /// Stroke color.
        color: Color,
        /// Line width.
        width: f32,
    },
    /// Text.
    Text {
        /// Text content.
        text: String,
        /// X position.
        x: f32,
        /// Y position.
        y: f32,
        /// Text color.
        color: Color,
        /// Font size.
        font_size: f32,
    },
    /// Scissor rect (clip following commands).
    PushClip {
        /// Clip bounds.
        bounds: Rect,
    },
    /// Pop scissor rect.
    PopClip,
}

/// A batch of render commands with the same state.
#[derive(Debug, Clone)]
pub struct UIBatch {
    /// Commands in this batch.
    pub commands: Vec<RenderCommand>,
    /// Z-index for sorting.
    pub z_index: i32,
}

/// Collects commands for one frame.
///
/// Commands pushed with [`UIRenderer::push_overlay`] land in a second batch
/// drawn above everything else (expanded dropdowns, color editors).
pub struct UIRenderer {
    /// Commands from the frame.
    commands: Vec<RenderCommand>,
    /// Commands that must be drawn on top.
    overlay: Vec<RenderCommand>,
    /// Clip stack.
    clip_stack: Vec<Rect>,
    /// Final batches for rendering.
    batches: Vec<UIBatch>,
}

impl UIRenderer {
    /// Creates a new renderer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            commands: Vec::with_capacity(512),
            overlay: Vec::with_capacity(64),
            clip_stack: Vec::with_capacity(8),
            batches: Vec::with_capacity(2),
        }
    }

    /// Begins a new frame.
    pub fn begin_frame(&mut self) {
        self.commands.clear();
        self.overlay.clear();
        self.clip_stack.clear();
        self.batches.clear();
    }

    /// Adds a render command.
    pub fn push(&mut self, command: RenderCommand) {
        self.commands.push(command);
    }

    /// Adds a command to the top-most batch.
    pub fn push_overlay(&mut self, command: RenderCommand) {
        self.overlay.push(command);
    }

    /// Filled rectangle shorthand.
    pub fn fill(&mut self, bounds: Rect, color: Color) {
        self.push(RenderCommand::Rect { bounds, color });
    }

    /// Outline shorthand.
    pub fn outline(&mut self, bounds: Rect, color: Color) {
        self.push(RenderCommand::RectOutline {
            bounds,
            color,
            width: 1.0,
        });
    }

    /// Text shorthand.
    pub fn text(&mut self, text: impl Into<String>, x: f32, y: f32, color: Color, font_size: f32) {
        self.push(RenderCommand::Text {
            text: text.into(),
            x,
            y,
            color,
            font_size,
        });
    }

    /// Pushes a clip rect.
    pub fn push_clip(&mut self, bounds: Rect) {
        self.clip_stack.push(bounds);
        self.commands.push(RenderCommand::PushClip { bounds });
    }

    /// Pops the current clip rect.
    pub fn pop_clip(&mut self) {
        if self.clip_stack.pop().is_some() {
            self.commands.push(RenderCommand::PopClip);
        }
    }

    /// Returns the current clip rect.
    #[must_use]
    pub fn current_clip(&self) -> Option<Rect> {
        self.clip_stack.last().copied()
    }

    /// Ends the frame and returns batches for rendering, bottom first.
    pub fn end_frame(&mut self) -> &[UIBatch] {
        while self.clip_stack.pop().is_some() {
            self.commands.push(RenderCommand::PopClip);
        }

        self.batches.clear();
        self.batches.push(UIBatch {
            commands: std::mem::take(&mut self.commands),
            z_index: 0,
        });
        if !self.overlay.is_empty() {
            self.batches.push(UIBatch {
                commands: std::mem::take(&mut self.overlay),
                z_index: 1,
            });
        }

        &self.batches
    }

    /// Returns the number of commands recorded so far this frame.
    #[must_use]
    pub fn command_count(&self) -> usize {
        self.commands.len() + self.overlay.len()
    }

    /// Commands recorded so far this frame (main batch).
    #[must_use]
    pub fn commands(&self) -> &[RenderCommand] {
        &self.commands
    }

    /// Commands recorded so far this frame (overlay batch).
    #[must_use]
    pub fn overlay_commands(&self) -> &[RenderCommand] {
        &self.overlay
    }
}

impl Default for UIRenderer {
    fn default() -> Self {
        Self::new()
    }
}
