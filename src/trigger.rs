//! Debounced warning triggers.
//!
//! Three independent state machines, each either armed or cooling down
//! until a deadline. Deadlines are checked lazily against the caller's
//! clock, so a trigger rearms on time even when no frames arrive and while
//! the session is stopped.
//!
//! Per frame the triggers are tried in a fixed order (person count,
//! prohibited object, movement). The first one that is armed and whose
//! condition holds fires; the rest are skipped for that frame.

use std::time::{Duration, Instant};

use crate::classify::ClassifiedFrame;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TriggerKind {
    PersonCount,
    ProhibitedObject,
    Movement,
}

impl TriggerKind {
    /// Evaluation order.
    pub const ALL: [TriggerKind; 3] = [
        TriggerKind::PersonCount,
        TriggerKind::ProhibitedObject,
        TriggerKind::Movement,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TriggerKind::PersonCount => "person_count",
            TriggerKind::ProhibitedObject => "prohibited_object",
            TriggerKind::Movement => "movement",
        }
    }
}

impl std::fmt::Display for TriggerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Armed, or cooling down until `cooldown_deadline`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TriggerState {
    cooldown_deadline: Option<Instant>,
}

impl TriggerState {
    /// A deadline at or before `now` counts as elapsed.
    pub fn is_armed(&self, now: Instant) -> bool {
        match self.cooldown_deadline {
            None => true,
            Some(deadline) => now >= deadline,
        }
    }

    /// Time left before rearming; `None` when armed.
    pub fn cooldown_remaining(&self, now: Instant) -> Option<Duration> {
        self.cooldown_deadline
            .and_then(|deadline| deadline.checked_duration_since(now))
            .filter(|remaining| !remaining.is_zero())
    }

    fn fire(&mut self, now: Instant, cooldown: Duration) -> Instant {
        let deadline = now + cooldown;
        self.cooldown_deadline = Some(deadline);
        deadline
    }

    /// Drop an elapsed deadline. Returns true if the trigger just rearmed.
    fn rearm_if_elapsed(&mut self, now: Instant) -> bool {
        match self.cooldown_deadline {
            Some(deadline) if now >= deadline => {
                self.cooldown_deadline = None;
                true
            }
            _ => false,
        }
    }
}

/// A trigger that fired on this frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Firing {
    pub kind: TriggerKind,
    /// When the trigger rearms.
    pub rearm_at: Instant,
}

#[derive(Clone, Debug)]
pub struct TriggerBank {
    person_count: TriggerState,
    prohibited_object: TriggerState,
    movement: TriggerState,
    cooldown: Duration,
    movement_threshold_px: f32,
}

impl TriggerBank {
    pub fn new(cooldown: Duration, movement_threshold_px: f32) -> Self {
        Self {
            person_count: TriggerState::default(),
            prohibited_object: TriggerState::default(),
            movement: TriggerState::default(),
            cooldown,
            movement_threshold_px,
        }
    }

    pub fn state(&self, kind: TriggerKind) -> &TriggerState {
        match kind {
            TriggerKind::PersonCount => &self.person_count,
            TriggerKind::ProhibitedObject => &self.prohibited_object,
            TriggerKind::Movement => &self.movement,
        }
    }

    fn state_mut(&mut self, kind: TriggerKind) -> &mut TriggerState {
        match kind {
            TriggerKind::PersonCount => &mut self.person_count,
            TriggerKind::ProhibitedObject => &mut self.prohibited_object,
            TriggerKind::Movement => &mut self.movement,
        }
    }

    pub fn is_armed(&self, kind: TriggerKind, now: Instant) -> bool {
        self.state(kind).is_armed(now)
    }

    /// Evaluate one classified frame. `displacement` is the anchor movement
    /// since the previous person frame, if known.
    pub fn evaluate(
        &mut self,
        frame: &ClassifiedFrame,
        displacement: Option<f32>,
        now: Instant,
    ) -> Option<Firing> {
        for kind in TriggerKind::ALL {
            let state = self.state_mut(kind);
            if state.rearm_if_elapsed(now) {
                log::debug!("{} trigger rearmed", kind);
            }
        }

        let threshold = self.movement_threshold_px;
        let kind = TriggerKind::ALL.into_iter().find(|kind| {
            self.is_armed(*kind, now)
                && match kind {
                    TriggerKind::PersonCount => frame.person_count_anomaly(),
                    TriggerKind::ProhibitedObject => !frame.prohibited_labels.is_empty(),
                    TriggerKind::Movement => {
                        frame.first_person_anchor.is_some()
                            && displacement.is_some_and(|d| d > threshold)
                    }
                }
        })?;

        let cooldown = self.cooldown;
        let rearm_at = self.state_mut(kind).fire(now, cooldown);
        Some(Firing { kind, rearm_at })
    }

    /// Rearm everything immediately.
    pub fn reset(&mut self) {
        for kind in TriggerKind::ALL {
            *self.state_mut(kind) = TriggerState::default();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::Point;

    const COOLDOWN: Duration = Duration::from_secs(5);

    fn bank() -> TriggerBank {
        TriggerBank::new(COOLDOWN, 15.0)
    }

    fn one_person() -> ClassifiedFrame {
        ClassifiedFrame {
            person_count: 1,
            first_person_anchor: Some(Point::new(0.0, 0.0)),
            prohibited_labels: vec![],
        }
    }

    #[test]
    fn person_count_fires_once_per_cooldown() {
        let mut triggers = bank();
        let t0 = Instant::now();
        let empty = ClassifiedFrame::default();

        let fired = triggers.evaluate(&empty, None, t0).expect("fires");
        assert_eq!(fired.kind, TriggerKind::PersonCount);
        assert_eq!(fired.rearm_at, t0 + COOLDOWN);

        assert!(triggers
            .evaluate(&empty, None, t0 + Duration::from_millis(4999))
            .is_none());
        let again = triggers.evaluate(&empty, None, t0 + COOLDOWN).expect("rearmed");
        assert_eq!(again.kind, TriggerKind::PersonCount);
    }

    #[test]
    fn priority_person_count_then_object_then_movement() {
        let mut triggers = bank();
        let t0 = Instant::now();
        let frame = ClassifiedFrame {
            person_count: 2,
            first_person_anchor: Some(Point::new(40.0, 0.0)),
            prohibited_labels: vec!["laptop".to_string()],
        };

        let first = triggers.evaluate(&frame, Some(40.0), t0).expect("fires");
        assert_eq!(first.kind, TriggerKind::PersonCount);
        assert!(triggers.is_armed(TriggerKind::ProhibitedObject, t0));
        assert!(triggers.is_armed(TriggerKind::Movement, t0));

        // Person count cooling down: the next match in order fires.
        let second = triggers.evaluate(&frame, Some(40.0), t0).expect("fires");
        assert_eq!(second.kind, TriggerKind::ProhibitedObject);
        let third = triggers.evaluate(&frame, Some(40.0), t0).expect("fires");
        assert_eq!(third.kind, TriggerKind::Movement);
        assert!(triggers.evaluate(&frame, Some(40.0), t0).is_none());
    }

    #[test]
    fn movement_needs_displacement_above_threshold() {
        let mut triggers = bank();
        let t0 = Instant::now();
        let frame = one_person();

        assert!(triggers.evaluate(&frame, None, t0).is_none());
        assert!(triggers.evaluate(&frame, Some(15.0), t0).is_none());
        let fired = triggers.evaluate(&frame, Some(15.5), t0).expect("fires");
        assert_eq!(fired.kind, TriggerKind::Movement);
    }

    #[test]
    fn cooldowns_are_independent() {
        let mut triggers = bank();
        let t0 = Instant::now();
        triggers.evaluate(&ClassifiedFrame::default(), None, t0);

        assert!(!triggers.is_armed(TriggerKind::PersonCount, t0));
        assert!(triggers.is_armed(TriggerKind::ProhibitedObject, t0));
        assert!(triggers.is_armed(TriggerKind::Movement, t0));
        assert_eq!(
            triggers
                .state(TriggerKind::PersonCount)
                .cooldown_remaining(t0 + Duration::from_secs(2)),
            Some(Duration::from_secs(3))
        );
    }

    #[test]
    fn past_deadline_self_heals() {
        let state = TriggerState {
            cooldown_deadline: Some(Instant::now()),
        };
        assert!(state.is_armed(Instant::now() + Duration::from_secs(1)));
    }

    #[test]
    fn reset_rearms_all() {
        let mut triggers = bank();
        let t0 = Instant::now();
        triggers.evaluate(&ClassifiedFrame::default(), None, t0);
        triggers.reset();
        assert!(TriggerKind::ALL
            .iter()
            .all(|kind| triggers.is_armed(*kind, t0)));
    }
}
