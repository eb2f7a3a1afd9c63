//! Per-tick movement events.
//!
//! The controller returns a fresh [`MovementEvents`] from every tick. Audio
//! and animation code polls it after simulation; nothing is kept between
//! ticks.

use serde::{Deserialize, Serialize};

/// A state transition observed during one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum MovementEvent {
    /// Landed on walkable ground.
    Grounded = 0,
    /// Left the ground without jumping.
    Airborne = 1,
    /// Jumped.
    Jump = 2,
    /// Climbed a step.
    Step = 3,
    /// Thrust started.
    ThrustStart = 4,
    /// Thrust stopped while the resource remained.
    ThrustStop = 5,
    /// The thrust resource ran out.
    ThrustDepleted = 6,
    /// The thrust resource recharged past its cutoff and re-armed.
    ThrustReady = 7,
}

impl MovementEvent {
    /// Every event, in tag order.
    pub const ALL: [Self; 8] = [
        Self::Grounded,
        Self::Airborne,
        Self::Jump,
        Self::Step,
        Self::ThrustStart,
        Self::ThrustStop,
        Self::ThrustDepleted,
        Self::ThrustReady,
    ];

    /// Stable identifier polled by presentation code.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Grounded => "grounded",
            Self::Airborne => "airborne",
            Self::Jump => "jump",
            Self::Step => "step",
            Self::ThrustStart => "thrust_start",
            Self::ThrustStop => "thrust_stop",
            Self::ThrustDepleted => "thrust_depleted",
            Self::ThrustReady => "thrust_ready",
        }
    }

    /// Look up an event by its tag.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|e| e.tag() == tag)
    }

    #[inline]
    fn bit(self) -> u16 {
        1 << self as u8
    }
}

/// Set of events raised during a single tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementEvents(u16);

impl MovementEvents {
    /// An empty set.
    pub const fn new() -> Self {
        Self(0)
    }

    /// Record an event. Recording twice has no further effect.
    #[inline]
    pub fn insert(&mut self, event: MovementEvent) {
        self.0 |= event.bit();
    }

    /// Check whether an event was raised.
    #[inline]
    pub fn contains(self, event: MovementEvent) -> bool {
        (self.0 & event.bit()) != 0
    }

    /// Check whether an event with the given tag was raised.
    pub fn contains_tag(self, tag: &str) -> bool {
        MovementEvent::from_tag(tag).is_some_and(|e| self.contains(e))
    }

    /// Check whether no events were raised.
    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Iterate raised events in tag order.
    pub fn iter(self) -> impl Iterator<Item = MovementEvent> {
        MovementEvent::ALL.into_iter().filter(move |e| self.contains(*e))
    }

    /// Tags of the raised events, in tag order.
    pub fn tags(self) -> Vec<&'static str> {
        self.iter().map(MovementEvent::tag).collect()
    }
}

impl Extend<MovementEvent> for MovementEvents {
    fn extend<I: IntoIterator<Item = MovementEvent>>(&mut self, iter: I) {
        for event in iter {
            self.insert(event);
        }
    }
}

impl FromIterator<MovementEvent> for MovementEvents {
    fn from_iter<I: IntoIterator<Item = MovementEvent>>(iter: I) -> Self {
        let mut events = Self::new();
        events.extend(iter);
        events
    }
}
