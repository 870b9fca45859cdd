use parking_lot::Mutex;
use posebridge_frame::PoseFrame;

/// Something a render loop can poll for pose frames.
pub trait FrameSource {
    /// True if a frame has been stored since the last [`take_frame`](Self::take_frame).
    fn has_unread_frame(&self) -> bool;

    /// Return the latest frame and mark it consumed.
    fn take_frame(&self) -> PoseFrame;
}

#[derive(Debug)]
struct Slot {
    frame: PoseFrame,
    consumed: bool,
}

/// Single-slot, lock-guarded store for the most recent pose frame.
///
/// One writer overwrites the slot; any number of readers poll it. Writes that
/// land between two polls replace each other silently: there is no backlog.
/// The whole frame is swapped under the lock, so a reader never observes a
/// partially written frame.
#[derive(Debug)]
pub struct FrameBuffer {
    slot: Mutex<Slot>,
}

impl FrameBuffer {
    /// An empty buffer: no unread frame, zero-valued contents.
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(Slot {
                frame: PoseFrame::ZERO,
                consumed: true,
            }),
        }
    }

    /// Overwrite the stored frame and mark it unread.
    pub fn store(&self, frame: PoseFrame) {
        let mut slot = self.slot.lock();
        slot.frame = frame;
        slot.consumed = false;
    }

    /// True if a frame has been stored since the last take.
    pub fn has_unread_frame(&self) -> bool {
        !self.slot.lock().consumed
    }

    /// Mark the stored frame consumed and return a copy of it.
    ///
    /// Before the first [`store`](Self::store) this returns
    /// [`PoseFrame::ZERO`].
    pub fn take_frame(&self) -> PoseFrame {
        let mut slot = self.slot.lock();
        slot.consumed = true;
        slot.frame
    }

    /// Take the frame only if it is unread, in one lock acquisition.
    pub fn try_take_frame(&self) -> Option<PoseFrame> {
        let mut slot = self.slot.lock();
        if slot.consumed {
            return None;
        }
        slot.consumed = true;
        Some(slot.frame)
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameSource for FrameBuffer {
    fn has_unread_frame(&self) -> bool {
        FrameBuffer::has_unread_frame(self)
    }

    fn take_frame(&self) -> PoseFrame {
        FrameBuffer::take_frame(self)
    }
}

impl<S: FrameSource + ?Sized> FrameSource for std::sync::Arc<S> {
    fn has_unread_frame(&self) -> bool {
        (**self).has_unread_frame()
    }

    fn take_frame(&self) -> PoseFrame {
        (**self).take_frame()
    }
}
