use posebridge_listener::FrameSource;

use crate::clip::{ClipConvention, ClipPlanes};
use crate::offset::HeadsetOffset;
use crate::view::StereoView;

/// Per-tick consumer of a [`FrameSource`].
///
/// Holds the current recentre offset and the projection settings for the
/// content being drawn. Call [`poll`](Self::poll) once per render tick.
#[derive(Debug, Clone)]
pub struct ViewTracker {
    offset: HeadsetOffset,
    planes: ClipPlanes,
    convention: ClipConvention,
}

impl ViewTracker {
    pub fn new(planes: ClipPlanes, convention: ClipConvention) -> Self {
        Self {
            offset: HeadsetOffset::default(),
            planes,
            convention,
        }
    }

    /// Run one render tick.
    ///
    /// With `recentre` set, the latest frame is taken whether or not it is
    /// unread, becomes the new offset, and its view is returned. Otherwise a
    /// view is returned only when the source holds an unread frame, so an idle
    /// producer leaves the previous view in place.
    pub fn poll<S: FrameSource + ?Sized>(&mut self, source: &S, recentre: bool) -> Option<StereoView> {
        if recentre {
            let frame = source.take_frame();
            self.offset = HeadsetOffset::centered(&frame);
            return Some(StereoView::compose(
                &frame,
                &self.offset,
                self.planes,
                self.convention,
            ));
        }

        if !source.has_unread_frame() {
            return None;
        }
        let frame = source.take_frame();
        Some(StereoView::compose(
            &frame,
            &self.offset,
            self.planes,
            self.convention,
        ))
    }

    /// Forget any recentre and pass poses through unchanged.
    pub fn reset_offset(&mut self) {
        self.offset = HeadsetOffset::default();
    }

    pub fn offset(&self) -> &HeadsetOffset {
        &self.offset
    }

    pub fn planes(&self) -> ClipPlanes {
        self.planes
    }

    pub fn set_planes(&mut self, planes: ClipPlanes) {
        self.planes = planes;
    }

    pub fn convention(&self) -> ClipConvention {
        self.convention
    }
}
