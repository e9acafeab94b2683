//! Mock transport recording every frame the board sends

use mwsignal::common::Transport;
use std::cell::RefCell;
use std::rc::Rc;

/// Shared state for the mock transport (uses interior mutability)
#[derive(Debug, Default)]
struct MockState {
    /// Frames accepted, in send order
    sent: Vec<Vec<u8>>,

    /// Failure injection flags
    fail_next_send: bool,
    link_down: bool,

    /// `WouldBlock` results to return before accepting the next frame
    busy_polls: usize,
}

/// Transport error raised by the mock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockError;

/// Cloneable handle to one mock link. The board owns one clone, the test
/// keeps another to inspect and steer it.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    state: Rc<RefCell<MockState>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// All frames sent so far
    pub fn sent(&self) -> Vec<Vec<u8>> {
        self.state.borrow().sent.clone()
    }

    /// Most recent frame, if any
    pub fn last_sent(&self) -> Option<Vec<u8>> {
        self.state.borrow().sent.last().cloned()
    }

    pub fn clear(&self) {
        self.state.borrow_mut().sent.clear();
    }

    /// Fail the next send only
    pub fn fail_next_send(&self) {
        self.state.borrow_mut().fail_next_send = true;
    }

    /// Fail every send until cleared
    pub fn set_link_down(&self, down: bool) {
        self.state.borrow_mut().link_down = down;
    }

    /// Report `WouldBlock` for the next `polls` sends
    pub fn set_busy(&self, polls: usize) {
        self.state.borrow_mut().busy_polls = polls;
    }
}

impl Transport for MockTransport {
    type Error = MockError;

    fn send(&mut self, frame: &[u8]) -> nb::Result<(), Self::Error> {
        let mut state = self.state.borrow_mut();
        if state.busy_polls > 0 {
            state.busy_polls -= 1;
            return Err(nb::Error::WouldBlock);
        }
        if state.link_down || state.fail_next_send {
            state.fail_next_send = false;
            return Err(nb::Error::Other(MockError));
        }
        state.sent.push(frame.to_vec());
        Ok(())
    }
}
