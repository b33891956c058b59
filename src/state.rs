// src/state.rs

//! The attributes snapshot shared between raw-mode reads and the interrupt
//! handler.
//!
//! The handler runs preemptively on top of the main flow, so it can neither
//! lock nor allocate. Instead the cell carries a phase marker: the main flow
//! marks the cell `WRITING` while it copies attributes in, then publishes
//! `RAW` with release ordering. The handler only reads the value after
//! observing `RAW` with acquire ordering; during a write it sees `WRITING` and
//! skips attribute restoration.
//!
//! Writes come only from [`crate::raw_mode::RawModeController`], at most once
//! per raw-mode entry. Entries are sequential, and a second entry while `RAW`
//! is rejected.

use std::cell::UnsafeCell;
use std::mem::MaybeUninit;
use std::sync::atomic::{AtomicU8, Ordering};

const EMPTY: u8 = 0;
const WRITING: u8 = 1;
const SAVED: u8 = 2;
const RAW: u8 = 3;

/// Observable phase of a [`ProcessTerminalState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No raw-mode entry has happened yet.
    Empty,
    /// A snapshot is being written.
    Writing,
    /// A snapshot exists and the terminal is back in its saved mode.
    Saved,
    /// A raw-mode read is in progress; the snapshot is the state to restore.
    Raw,
}

pub struct ProcessTerminalState<A> {
    phase: AtomicU8,
    snapshot: UnsafeCell<MaybeUninit<A>>,
}

// SAFETY: the snapshot is only written while the phase is WRITING, which is
// entered via a compare-exchange, so at most one writer exists. Readers only
// touch the snapshot after an acquire load that observed SAVED or RAW, which
// happens-after the release store that completed the write.
unsafe impl<A: Copy + Send> Sync for ProcessTerminalState<A> {}

impl<A: Copy> ProcessTerminalState<A> {
    pub const fn new() -> Self {
        Self {
            phase: AtomicU8::new(EMPTY),
            snapshot: UnsafeCell::new(MaybeUninit::uninit()),
        }
    }

    pub fn phase(&self) -> Phase {
        match self.phase.load(Ordering::Acquire) {
            EMPTY => Phase::Empty,
            WRITING => Phase::Writing,
            SAVED => Phase::Saved,
            _ => Phase::Raw,
        }
    }

    pub fn is_raw(&self) -> bool {
        self.phase.load(Ordering::Acquire) == RAW
    }

    /// Records `attrs` as the state to restore and marks the cell raw.
    ///
    /// Returns `false` without touching the snapshot if a raw-mode read (or
    /// another write) is already in progress.
    pub fn begin_raw(&self, attrs: A) -> bool {
        let current = self.phase.load(Ordering::Acquire);
        if current == RAW || current == WRITING {
            return false;
        }
        if self
            .phase
            .compare_exchange(current, WRITING, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return false;
        }
        // SAFETY: WRITING was acquired exclusively above.
        unsafe {
            (*self.snapshot.get()).write(attrs);
        }
        self.phase.store(RAW, Ordering::Release);
        true
    }

    /// Marks the raw-mode read as finished. The snapshot stays readable.
    pub fn end_raw(&self) {
        let _ = self
            .phase
            .compare_exchange(RAW, SAVED, Ordering::AcqRel, Ordering::Acquire);
    }

    /// The snapshot to restore, but only while a raw-mode read is in progress.
    ///
    /// This is the read used from signal context; it performs one atomic load
    /// and a plain copy.
    pub fn raw_snapshot(&self) -> Option<A> {
        if self.phase.load(Ordering::Acquire) == RAW {
            // SAFETY: RAW is only published after the snapshot was written.
            Some(unsafe { (*self.snapshot.get()).assume_init() })
        } else {
            None
        }
    }

    /// The most recently saved snapshot, if any.
    pub fn last_known_good(&self) -> Option<A> {
        match self.phase.load(Ordering::Acquire) {
            // SAFETY: both phases are only published after a completed write.
            SAVED | RAW => Some(unsafe { (*self.snapshot.get()).assume_init() }),
            _ => None,
        }
    }
}

impl<A: Copy> Default for ProcessTerminalState<A> {
    fn default() -> Self {
        Self::new()
    }
}
