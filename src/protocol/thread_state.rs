//! The debuggee's thread-state bitmask and the priority mapping used to summarize it.

use bitflags::bitflags;

bitflags! {
    /// The raw bits the debuggee reports for a thread's CLR `System.Threading.ThreadState`.
    ///
    /// Most callers want [`ThreadState`] instead; this is kept around for callers that need the
    /// full mask.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ThreadStateFlags: u32 {
        /// No flag set.
        const RUNNING = 0x0;
        const STOP_REQUESTED = 0x1;
        const SUSPEND_REQUESTED = 0x2;
        const BACKGROUND = 0x4;
        const UNSTARTED = 0x8;
        const STOPPED = 0x10;
        const WAIT_SLEEP_JOIN = 0x20;
        const SUSPENDED = 0x40;
        const ABORT_REQUESTED = 0x80;
        const ABORTED = 0x100;
    }
}

/// A simplified summary of a thread's state, in the priority order the debuggee expects callers
/// to apply when several bits are set simultaneously.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ThreadState {
    /// The thread hasn't started running managed code yet.
    Unstarted,
    /// The thread has aborted.
    Aborted,
    /// The thread has stopped.
    Stopped,
    /// The thread is suspended.
    Suspended,
    /// None of the above; the thread is running.
    Running,
}

/// Maps a raw bitmask to a [`ThreadState`] by priority: Unstarted > Aborted > Stopped > Suspended
/// > else Running.
pub fn thread_state_from_flags(flags: ThreadStateFlags) -> ThreadState {
    if flags.contains(ThreadStateFlags::UNSTARTED) {
        ThreadState::Unstarted
    } else if flags.contains(ThreadStateFlags::ABORTED) {
        ThreadState::Aborted
    } else if flags.contains(ThreadStateFlags::STOPPED) {
        ThreadState::Stopped
    } else if flags.contains(ThreadStateFlags::SUSPENDED) {
        ThreadState::Suspended
    } else {
        ThreadState::Running
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unstarted_outranks_everything() {
        let flags = ThreadStateFlags::UNSTARTED | ThreadStateFlags::ABORTED;
        assert_eq!(thread_state_from_flags(flags), ThreadState::Unstarted);
    }

    #[test]
    fn aborted_outranks_stopped_and_suspended() {
        let flags = ThreadStateFlags::ABORTED | ThreadStateFlags::SUSPENDED;
        assert_eq!(thread_state_from_flags(flags), ThreadState::Aborted);
    }

    #[test]
    fn no_recognized_bit_is_running() {
        let flags = ThreadStateFlags::BACKGROUND | ThreadStateFlags::WAIT_SLEEP_JOIN;
        assert_eq!(thread_state_from_flags(flags), ThreadState::Running);
    }
}
