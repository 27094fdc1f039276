//! [`FrameHost`] on top of egui's repaint requests.

use backdrop_core::scheduler::{FrameHost, FrameId};

/// Turns a frame request into an egui repaint and hands the id back to
/// the next `update` via [`RepaintHost::take_due`].
#[derive(Debug)]
pub struct RepaintHost {
    ctx: egui::Context,
    next: u64,
    due: Option<FrameId>,
}

impl RepaintHost {
    pub fn new(ctx: egui::Context) -> Self {
        Self {
            ctx,
            next: 0,
            due: None,
        }
    }

    /// Returns the request to deliver in the current egui frame, if any.
    pub fn take_due(&mut self) -> Option<FrameId> {
        self.due.take()
    }
}

impl FrameHost for RepaintHost {
    fn request_frame(&mut self) -> FrameId {
        let id = FrameId(self.next);
        self.next += 1;
        self.due = Some(id);
        self.ctx.request_repaint();
        id
    }

    fn cancel_frame(&mut self, id: FrameId) {
        if self.due == Some(id) {
            self.due = None;
        }
    }
}
