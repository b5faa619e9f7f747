//! Carousel auto-scroll state machine.
//!
//! The best-sellers carousel auto-scrolls until the shopper interacts with
//! it, then resumes after a quiet period. The transition logic lives here as
//! a pure state machine; the UI shell owns the actual scroll position and
//! timers and executes the [`TimerCommand`] each transition returns.
//!
//! Resume timers carry a generation number: scheduling a new timer
//! invalidates any older one, so a cancelled timer that still fires is
//! ignored instead of resuming mid-interaction.

use std::time::Duration;

/// Resume delay after the pointer leaves the carousel.
pub const POINTER_RESUME_DELAY: Duration = Duration::from_millis(1_500);

/// Resume delay after an explicit arrow click.
pub const ARROW_RESUME_DELAY: Duration = Duration::from_millis(2_000);

/// What the carousel is currently doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarqueeState {
    /// Auto-scroll is running.
    Scrolling,
    /// The shopper is interacting; no resume is scheduled.
    PausedByUser,
    /// Interaction ended; the resume timer of the given generation is pending.
    ResumePending {
        generation: u64,
    },
}

/// An interaction or timer event fed into the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarqueeEvent {
    PointerEnter,
    PointerLeave,
    ArrowClick,
    /// The resume timer of this generation fired.
    ResumeTimerFired {
        generation: u64,
    },
}

/// Timer side effect the UI shell must execute after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerCommand {
    None,
    /// Cancel any pending resume timer.
    Cancel,
    /// Cancel any pending resume timer and schedule a new one.
    Schedule {
        generation: u64,
        delay: Duration,
    },
}

/// The carousel state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marquee {
    state: MarqueeState,
    next_generation: u64,
}

impl Default for Marquee {
    fn default() -> Self {
        Self::new()
    }
}

impl Marquee {
    /// Start in the scrolling state.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: MarqueeState::Scrolling,
            next_generation: 0,
        }
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> MarqueeState {
        self.state
    }

    /// Whether auto-scroll should be advancing right now.
    #[must_use]
    pub const fn is_scrolling(&self) -> bool {
        matches!(self.state, MarqueeState::Scrolling)
    }

    /// Apply an event, returning the timer command to execute.
    pub fn apply(&mut self, event: MarqueeEvent) -> TimerCommand {
        match event {
            MarqueeEvent::PointerEnter => {
                self.state = MarqueeState::PausedByUser;
                TimerCommand::Cancel
            }
            MarqueeEvent::PointerLeave => self.schedule_resume(POINTER_RESUME_DELAY),
            MarqueeEvent::ArrowClick => self.schedule_resume(ARROW_RESUME_DELAY),
            MarqueeEvent::ResumeTimerFired { generation } => {
                match self.state {
                    MarqueeState::ResumePending { generation: pending }
                        if pending == generation =>
                    {
                        self.state = MarqueeState::Scrolling;
                    }
                    // Stale timer (superseded or cancelled): ignore.
                    _ => {}
                }
                TimerCommand::None
            }
        }
    }

    fn schedule_resume(&mut self, delay: Duration) -> TimerCommand {
        let generation = self.next_generation;
        self.next_generation += 1;
        self.state = MarqueeState::ResumePending { generation };
        TimerCommand::Schedule { generation, delay }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pointer_enter_pauses_and_cancels() {
        let mut marquee = Marquee::new();
        assert!(marquee.is_scrolling());

        let cmd = marquee.apply(MarqueeEvent::PointerEnter);
        assert_eq!(cmd, TimerCommand::Cancel);
        assert_eq!(marquee.state(), MarqueeState::PausedByUser);
    }

    #[test]
    fn pointer_leave_schedules_a_single_resume() {
        let mut marquee = Marquee::new();
        marquee.apply(MarqueeEvent::PointerEnter);

        let cmd = marquee.apply(MarqueeEvent::PointerLeave);
        let TimerCommand::Schedule { generation, delay } = cmd else {
            panic!("expected a scheduled resume, got {cmd:?}");
        };
        assert_eq!(delay, POINTER_RESUME_DELAY);
        assert_eq!(marquee.state(), MarqueeState::ResumePending { generation });

        marquee.apply(MarqueeEvent::ResumeTimerFired { generation });
        assert!(marquee.is_scrolling());
    }

    #[test]
    fn arrow_click_uses_the_longer_delay() {
        let mut marquee = Marquee::new();
        let cmd = marquee.apply(MarqueeEvent::ArrowClick);
        assert!(matches!(
            cmd,
            TimerCommand::Schedule {
                delay: ARROW_RESUME_DELAY,
                ..
            }
        ));
    }

    #[test]
    fn stale_resume_timer_is_ignored() {
        let mut marquee = Marquee::new();

        let TimerCommand::Schedule { generation: old, .. } =
            marquee.apply(MarqueeEvent::PointerLeave)
        else {
            panic!("expected schedule");
        };

        // A new interaction supersedes the pending timer.
        marquee.apply(MarqueeEvent::PointerEnter);
        let TimerCommand::Schedule { generation: new, .. } =
            marquee.apply(MarqueeEvent::ArrowClick)
        else {
            panic!("expected schedule");
        };
        assert_ne!(old, new);

        // The old timer firing late must not resume scrolling.
        marquee.apply(MarqueeEvent::ResumeTimerFired { generation: old });
        assert_eq!(marquee.state(), MarqueeState::ResumePending { generation: new });

        // The current one does.
        marquee.apply(MarqueeEvent::ResumeTimerFired { generation: new });
        assert!(marquee.is_scrolling());
    }

    #[test]
    fn timer_fired_while_paused_is_ignored() {
        let mut marquee = Marquee::new();
        marquee.apply(MarqueeEvent::PointerLeave);
        marquee.apply(MarqueeEvent::PointerEnter);

        marquee.apply(MarqueeEvent::ResumeTimerFired { generation: 0 });
        assert_eq!(marquee.state(), MarqueeState::PausedByUser);
    }

    #[test]
    fn repeated_interaction_reschedules_one_timer() {
        let mut marquee = Marquee::new();
        let mut last = None;
        for _ in 0..3 {
            if let TimerCommand::Schedule { generation, .. } =
                marquee.apply(MarqueeEvent::ArrowClick)
            {
                last = Some(generation);
            }
        }
        let current = last.expect("scheduled");
        // Only the latest generation is live.
        assert_eq!(
            marquee.state(),
            MarqueeState::ResumePending { generation: current }
        );
    }
}
