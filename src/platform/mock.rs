// src/platform/mock.rs

//! In-memory terminal used to exercise the raw-mode state machine and the
//! interrupt path without a real tty.

use crate::error::{Error, Result};
use crate::geometry::TerminalSize;
use crate::interrupt::{handle_interrupt, EmergencySink, InterruptPolicy};
use crate::platform::platform_trait::TerminalDevice;
use crate::state::ProcessTerminalState;
use std::collections::VecDeque;
use std::io;

/// Line-discipline flags the mock tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockAttributes {
    pub echo: bool,
    pub canonical: bool,
    pub signals: bool,
}

impl MockAttributes {
    pub const COOKED: MockAttributes = MockAttributes {
        echo: true,
        canonical: true,
        signals: true,
    };
}

pub struct MockTerminal {
    attributes: MockAttributes,
    input: VecDeque<u8>,
    size: Option<TerminalSize>,
    state: ProcessTerminalState<MockAttributes>,
    /// Every attribute set applied, in order.
    applied: Vec<MockAttributes>,
    /// Attributes in effect at each byte read.
    attributes_at_read: Vec<MockAttributes>,
    /// Bytes written through the unbuffered emergency path.
    emergency_output: Vec<u8>,
    exit_status: Option<i32>,
    /// Attributes in effect when the emergency path terminated.
    attributes_at_exit: Option<MockAttributes>,
    fail_get: bool,
    fail_restore: bool,
    interrupt_next_read: Option<i32>,
    interrupted_reads: usize,
}

impl MockTerminal {
    pub fn new(size: Option<TerminalSize>) -> Self {
        Self {
            attributes: MockAttributes::COOKED,
            input: VecDeque::new(),
            size,
            state: ProcessTerminalState::new(),
            applied: Vec::new(),
            attributes_at_read: Vec::new(),
            emergency_output: Vec::new(),
            exit_status: None,
            attributes_at_exit: None,
            fail_get: false,
            fail_restore: false,
            interrupt_next_read: None,
            interrupted_reads: 0,
        }
    }

    pub fn push_input(&mut self, bytes: &[u8]) {
        self.input.extend(bytes);
    }

    pub fn pending_input(&self) -> usize {
        self.input.len()
    }

    pub fn current_attributes(&self) -> MockAttributes {
        self.attributes
    }

    pub fn applied(&self) -> &[MockAttributes] {
        &self.applied
    }

    pub fn attributes_at_read(&self) -> &[MockAttributes] {
        &self.attributes_at_read
    }

    pub fn emergency_output(&self) -> &[u8] {
        &self.emergency_output
    }

    pub fn exit_status(&self) -> Option<i32> {
        self.exit_status
    }

    pub fn attributes_at_exit(&self) -> Option<MockAttributes> {
        self.attributes_at_exit
    }

    /// Makes `attributes()` fail, as it does when stdin is not a tty.
    pub fn fail_attribute_query(&mut self) {
        self.fail_get = true;
    }

    /// Makes every restore of canonical-mode attributes fail, including the
    /// emergency path's.
    pub fn fail_restore(&mut self) {
        self.fail_restore = true;
    }

    /// The next read delivers a terminating interrupt, running the emergency
    /// path with `exit_status` before any byte is consumed.
    pub fn interrupt_next_read(&mut self, exit_status: i32) {
        self.interrupt_next_read = Some(exit_status);
    }

    /// The next `count` reads fail with `EINTR` before succeeding.
    pub fn interrupt_reads(&mut self, count: usize) {
        self.interrupted_reads = count;
    }
}

impl TerminalDevice for MockTerminal {
    type Attributes = MockAttributes;

    fn attributes(&self) -> Result<MockAttributes> {
        if self.fail_get {
            return Err(Error::AttributesUnavailable(io::Error::new(
                io::ErrorKind::Unsupported,
                "mock terminal is not a tty",
            )));
        }
        Ok(self.attributes)
    }

    fn apply(&mut self, attrs: &MockAttributes) -> io::Result<()> {
        if self.fail_restore && attrs.canonical {
            return Err(io::Error::new(io::ErrorKind::Other, "tcsetattr failed"));
        }
        self.attributes = *attrs;
        self.applied.push(*attrs);
        Ok(())
    }

    fn raw_from(&self, _attrs: &MockAttributes) -> MockAttributes {
        MockAttributes {
            echo: false,
            canonical: false,
            signals: false,
        }
    }

    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        if let Some(status) = self.interrupt_next_read.take() {
            let policy = InterruptPolicy {
                exit_status: status,
                restore_attributes: true,
            };
            handle_interrupt(self, policy);
            return Err(io::Error::new(
                io::ErrorKind::Other,
                "process terminated by interrupt",
            ));
        }
        if self.interrupted_reads > 0 {
            self.interrupted_reads -= 1;
            return Err(io::Error::from(io::ErrorKind::Interrupted));
        }
        self.attributes_at_read.push(self.attributes);
        Ok(self.input.pop_front())
    }

    fn size(&self) -> Result<TerminalSize> {
        self.size.ok_or_else(|| {
            Error::GeometryUnavailable(io::Error::new(
                io::ErrorKind::NotFound,
                "mock terminal has no controlling terminal",
            ))
        })
    }

    fn process_state(&self) -> &ProcessTerminalState<MockAttributes> {
        &self.state
    }
}

impl EmergencySink for MockTerminal {
    fn restore_saved_attributes(&mut self) -> bool {
        match self.state.raw_snapshot() {
            Some(_) if self.fail_restore => false,
            Some(saved) => {
                self.attributes = saved;
                true
            }
            None => false,
        }
    }

    fn write_unbuffered(&mut self, bytes: &[u8]) {
        self.emergency_output.extend_from_slice(bytes);
    }

    fn terminate(&mut self, status: i32) {
        self.exit_status = Some(status);
        self.attributes_at_exit = Some(self.attributes);
    }
}
