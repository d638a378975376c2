//! Host-side gesture plumbing.
//!
//! Tools never poll for input. The host owns a [`GestureDispatcher`], tools
//! register with it for a pointer button, and the dispatcher calls into them
//! with `on_drag_start` / `on_drag_move` / `on_drag_end` as drags happen. The
//! plot is exposed to tools only through [`PlotFrame`]: a viewport test plus
//! screen-to-data inversion for each axis.

use egui::{pos2, Pos2};
use egui_plot::PlotTransform;

// ─────────────────────────────────────────────────────────────────────────────
// PlotFrame
// ─────────────────────────────────────────────────────────────────────────────

/// Viewport of a plot and its screen-to-data mapping.
pub trait PlotFrame {
    /// Whether the screen position lies inside the visible plot area.
    fn contains(&self, sx: f32, sy: f32) -> bool;
    /// Data-space x for a screen x.
    fn invert_x(&self, sx: f32) -> f64;
    /// Data-space y for a screen y.
    fn invert_y(&self, sy: f32) -> f64;
}

/// Axis-aligned viewport with linear scales on both axes.
///
/// Screen y grows downwards, so the top edge maps to `y_range.1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFrame {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
    pub x_range: (f64, f64),
    pub y_range: (f64, f64),
}

impl LinearFrame {
    pub fn new(
        left: f32,
        top: f32,
        width: f32,
        height: f32,
        x_range: (f64, f64),
        y_range: (f64, f64),
    ) -> Self {
        Self {
            left,
            top,
            width,
            height,
            x_range,
            y_range,
        }
    }

    /// Screen position of a data point; the inverse of `invert_x`/`invert_y`.
    pub fn project(&self, x: f64, y: f64) -> (f32, f32) {
        let fx = (x - self.x_range.0) / (self.x_range.1 - self.x_range.0);
        let fy = (self.y_range.1 - y) / (self.y_range.1 - self.y_range.0);
        (
            self.left + (fx * self.width as f64) as f32,
            self.top + (fy * self.height as f64) as f32,
        )
    }
}

impl PlotFrame for LinearFrame {
    fn contains(&self, sx: f32, sy: f32) -> bool {
        sx >= self.left
            && sx <= self.left + self.width
            && sy >= self.top
            && sy <= self.top + self.height
    }

    fn invert_x(&self, sx: f32) -> f64 {
        let f = ((sx - self.left) / self.width) as f64;
        self.x_range.0 + f * (self.x_range.1 - self.x_range.0)
    }

    fn invert_y(&self, sy: f32) -> f64 {
        let f = ((sy - self.top) / self.height) as f64;
        self.y_range.1 - f * (self.y_range.1 - self.y_range.0)
    }
}

/// [`PlotFrame`] backed by the transform of the last rendered `egui_plot` frame.
pub struct EguiPlotFrame<'a> {
    transform: &'a PlotTransform,
}

impl<'a> EguiPlotFrame<'a> {
    pub fn new(transform: &'a PlotTransform) -> Self {
        Self { transform }
    }
}

impl PlotFrame for EguiPlotFrame<'_> {
    fn contains(&self, sx: f32, sy: f32) -> bool {
        self.transform.frame().contains(pos2(sx, sy))
    }

    fn invert_x(&self, sx: f32) -> f64 {
        let cy = self.transform.frame().center().y;
        self.transform.value_from_position(pos2(sx, cy)).x
    }

    fn invert_y(&self, sy: f32) -> f64 {
        let cx = self.transform.frame().center().x;
        self.transform.value_from_position(pos2(cx, sy)).y
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Events and tools
// ─────────────────────────────────────────────────────────────────────────────

/// Pointer position (screen pixels) at the time of a drag callback.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DragEvent {
    pub sx: f32,
    pub sy: f32,
}

impl DragEvent {
    pub fn new(sx: f32, sy: f32) -> Self {
        Self { sx, sy }
    }
}

impl From<Pos2> for DragEvent {
    fn from(p: Pos2) -> Self {
        Self::new(p.x, p.y)
    }
}

/// Pointer button a tool is registered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DragButton {
    Primary,
    Secondary,
}

impl DragButton {
    pub const ALL: [DragButton; 2] = [DragButton::Primary, DragButton::Secondary];

    pub fn pointer_button(self) -> egui::PointerButton {
        match self {
            DragButton::Primary => egui::PointerButton::Primary,
            DragButton::Secondary => egui::PointerButton::Secondary,
        }
    }
}

/// A drag-driven tool. The host calls these; tools never call the host.
pub trait GestureTool {
    fn name(&self) -> &'static str;
    fn on_drag_start(&mut self, frame: &dyn PlotFrame, event: &DragEvent);
    fn on_drag_move(&mut self, frame: &dyn PlotFrame, event: &DragEvent);
    fn on_drag_end(&mut self, frame: &dyn PlotFrame, event: &DragEvent);
}

/// Drag phase of one pointer button during a single frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ButtonDrag {
    pub started: bool,
    pub dragging: bool,
    pub stopped: bool,
}

/// Pointer state of one UI frame, as far as the gesture tools care.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerDrag {
    pub pos: Option<Pos2>,
    /// Whether the pointer moved since the previous frame.
    pub moved: bool,
    pub primary: ButtonDrag,
    pub secondary: ButtonDrag,
}

impl PointerDrag {
    pub fn from_response(response: &egui::Response) -> Self {
        let (pos, moved) = response.ctx.input(|i| {
            (
                i.pointer.latest_pos(),
                i.pointer.delta() != egui::Vec2::ZERO,
            )
        });
        let drag = |b: DragButton| {
            let pb = b.pointer_button();
            ButtonDrag {
                started: response.drag_started_by(pb),
                dragging: response.dragged_by(pb),
                stopped: response.drag_stopped_by(pb),
            }
        };
        Self {
            pos,
            moved,
            primary: drag(DragButton::Primary),
            secondary: drag(DragButton::Secondary),
        }
    }

    pub fn button(&self, button: DragButton) -> ButtonDrag {
        match button {
            DragButton::Primary => self.primary,
            DragButton::Secondary => self.secondary,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// GestureDispatcher
// ─────────────────────────────────────────────────────────────────────────────

/// Event source that routes drags to the tools registered for each button.
#[derive(Default)]
pub struct GestureDispatcher {
    tools: Vec<(DragButton, Box<dyn GestureTool>)>,
    last_event: Option<DragEvent>,
}

impl GestureDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, button: DragButton, tool: Box<dyn GestureTool>) {
        log::debug!("Registered gesture tool {:?} on {:?}", tool.name(), button);
        self.tools.push((button, tool));
    }

    /// Names of the tools registered for `button`, in registration order.
    pub fn tool_names(&self, button: DragButton) -> Vec<&'static str> {
        self.tools
            .iter()
            .filter(|(b, _)| *b == button)
            .map(|(_, t)| t.name())
            .collect()
    }

    pub fn drag_start(&mut self, button: DragButton, frame: &dyn PlotFrame, event: DragEvent) {
        self.last_event = Some(event);
        self.for_button(button, |t| t.on_drag_start(frame, &event));
    }

    pub fn drag_move(&mut self, button: DragButton, frame: &dyn PlotFrame, event: DragEvent) {
        self.last_event = Some(event);
        self.for_button(button, |t| t.on_drag_move(frame, &event));
    }

    pub fn drag_end(&mut self, button: DragButton, frame: &dyn PlotFrame, event: DragEvent) {
        self.last_event = Some(event);
        self.for_button(button, |t| t.on_drag_end(frame, &event));
    }

    /// Translate this frame's egui drag state on the plot into tool callbacks.
    pub fn dispatch_egui(&mut self, response: &egui::Response, transform: &PlotTransform) {
        let input = PointerDrag::from_response(response);
        self.dispatch(&input, &EguiPlotFrame::new(transform));
    }

    /// Route one frame of pointer state to the registered tools.
    ///
    /// A move is only dispatched when the pointer actually moved this frame.
    /// A release without a pointer position reuses the last dispatched one.
    pub fn dispatch(&mut self, input: &PointerDrag, frame: &dyn PlotFrame) {
        for button in DragButton::ALL {
            let state = input.button(button);
            if state.started {
                if let Some(p) = input.pos {
                    self.drag_start(button, frame, p.into());
                }
            }
            if state.dragging && input.moved {
                if let Some(p) = input.pos {
                    self.drag_move(button, frame, p.into());
                }
            }
            if state.stopped {
                let event = input
                    .pos
                    .map(DragEvent::from)
                    .or(self.last_event)
                    .unwrap_or_default();
                self.drag_end(button, frame, event);
            }
        }
    }

    fn for_button(&mut self, button: DragButton, mut f: impl FnMut(&mut dyn GestureTool)) {
        for (b, tool) in self.tools.iter_mut() {
            if *b == button {
                f(tool.as_mut());
            }
        }
    }
}
