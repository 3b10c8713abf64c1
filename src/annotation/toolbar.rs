use super::{Annotation, AnnotationType, Rect, ToolbarPosition};

/// Vertical gap between the toolbar's anchor point and the highlight's top edge.
pub const TOOLBAR_OFFSET: f64 = 48.0;

/// What the reviewer is currently doing with the toolbar.
///
/// Composing text only exists for comments, so a deletion with a draft
/// cannot be represented.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolbarStep {
    /// Choosing an annotation type.
    Menu,
    /// Writing a comment.
    Input { draft: String },
}

/// Choices offered by the menu step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Annotate(AnnotationType),
    Cancel,
}

/// Keys the input step reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    /// Enter with the platform modifier held (Cmd on macOS, Ctrl elsewhere).
    ModifierEnter,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ToolbarEvent {
    /// A highlight became active (or was replaced).
    Highlight { id: u64, rect: Rect },
    Select(MenuChoice),
    Edit(String),
    Key(Key),
    /// Explicit save button in the input step.
    Submit,
    /// Explicit cancel button in the input step.
    CancelInput,
    /// Scroll or resize; carries the highlight's fresh bounding box.
    Viewport { rect: Rect, viewport_height: f64 },
}

/// Result of feeding one event to the toolbar.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolbarOutcome {
    Idle,
    Emit(Annotation),
    Closed,
}

#[derive(Debug, Clone, PartialEq)]
struct ActiveHighlight {
    id: u64,
    step: ToolbarStep,
    position: ToolbarPosition,
}

/// Floating toolbar attached to the active highlight.
///
/// Closed when no highlight is active. Emitting an annotation or cancelling
/// closes it; a new highlight reopens it at the menu with an empty draft.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnnotationToolbar {
    active: Option<ActiveHighlight>,
}

impl AnnotationToolbar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.active.is_some()
    }

    pub fn step(&self) -> Option<&ToolbarStep> {
        self.active.as_ref().map(|active| &active.step)
    }

    pub fn position(&self) -> Option<ToolbarPosition> {
        self.active.as_ref().map(|active| active.position)
    }

    pub fn highlight_id(&self) -> Option<u64> {
        self.active.as_ref().map(|active| active.id)
    }

    /// Whether the input step currently holds submittable text.
    pub fn can_submit(&self) -> bool {
        matches!(
            self.step(),
            Some(ToolbarStep::Input { draft }) if !draft.trim().is_empty()
        )
    }

    /// Apply one event and report what the host UI should do.
    pub fn handle(&mut self, event: ToolbarEvent) -> ToolbarOutcome {
        if let ToolbarEvent::Highlight { id, rect } = event {
            self.active = Some(ActiveHighlight {
                id,
                step: ToolbarStep::Menu,
                position: ToolbarPosition::above(&rect),
            });
            return ToolbarOutcome::Idle;
        }

        let Some(active) = self.active.as_mut() else {
            return ToolbarOutcome::Idle;
        };

        match (&mut active.step, event) {
            (ToolbarStep::Menu, ToolbarEvent::Select(MenuChoice::Cancel)) => self.close(),
            (ToolbarStep::Menu, ToolbarEvent::Select(MenuChoice::Annotate(kind))) => {
                if kind.requires_text() {
                    active.step = ToolbarStep::Input {
                        draft: String::new(),
                    };
                    ToolbarOutcome::Idle
                } else {
                    self.active = None;
                    ToolbarOutcome::Emit(Annotation::Deletion)
                }
            }
            (ToolbarStep::Input { draft }, ToolbarEvent::Edit(text)) => {
                *draft = text;
                ToolbarOutcome::Idle
            }
            (
                ToolbarStep::Input { .. },
                ToolbarEvent::Key(Key::Escape) | ToolbarEvent::CancelInput,
            ) => {
                active.step = ToolbarStep::Menu;
                ToolbarOutcome::Idle
            }
            (
                ToolbarStep::Input { draft },
                ToolbarEvent::Key(Key::ModifierEnter) | ToolbarEvent::Submit,
            ) => {
                if draft.trim().is_empty() {
                    return ToolbarOutcome::Idle;
                }
                let text = std::mem::take(draft);
                self.active = None;
                ToolbarOutcome::Emit(Annotation::Comment { text })
            }
            (
                step,
                ToolbarEvent::Viewport {
                    rect,
                    viewport_height,
                },
            ) => {
                // Scrolling away only dismisses an untouched menu; drafts survive.
                let untouched = matches!(step, ToolbarStep::Menu);
                if untouched && !rect.intersects_viewport(viewport_height) {
                    return self.close();
                }
                active.position = ToolbarPosition::above(&rect);
                ToolbarOutcome::Idle
            }
            _ => ToolbarOutcome::Idle,
        }
    }

    /// Dismiss without emitting.
    pub fn close(&mut self) -> ToolbarOutcome {
        self.active = None;
        ToolbarOutcome::Closed
    }
}
