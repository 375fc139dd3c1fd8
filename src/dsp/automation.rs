//! Timestamped parameter automation.

/*
Parameter Automation
====================

Control code rarely wants to poke a value "right now". It wants to say
"be at 0.8 in 100ms, then settle at 0.4 over the next 200ms". An automation
timeline stores those requests as events on the audio clock and answers
"what is the value at time t?" for the render path.

Vocabulary
----------

  intrinsic   The value the parameter holds when no event applies. Frozen
              to the interpolated value whenever events are cancelled.

  set event   Jump to `value` at `time`.

  ramp event  Arrive at `value` at `time`, moving linearly from the previous
              event (its time and value).

  anchor      A ramp needs a starting point. If nothing precedes a new ramp
              we insert a set event holding the value current when the ramp
              was scheduled. Without it the ramp would start from t = 0.


Evaluating the Timeline
-----------------------

    value
      1.0 ┤          ╭────────── ramp(1.0 @ 0.3)
          │        ╱
          │      ╱
      0.2 ┤────●                 set(0.2 @ 0.1)
          └────┴─────┴─────→ time
              0.1   0.3

  - Before the first event: intrinsic value.
  - Between a reached event and a ramp: linear interpolation.
  - Between a reached event and a set: hold the reached value.
  - After the last event: hold its value.


Last Writer Wins
----------------

`cancel(from, now)` drops every event at or after `from` and freezes the
intrinsic value at whatever the timeline produced at `now`. A trigger that
cancels before scheduling therefore never stacks with a previous schedule.


Realtime Notes
--------------

Events live in a Vec allocated once with a fixed capacity. Inserting into a
full timeline is refused rather than growing. `prune(t)` drops events that
can no longer influence any time >= t so the timeline stays short.
*/

/// Upper bound on events held by one timeline.
pub const MAX_EVENTS: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EventKind {
    SetValue,
    LinearRamp,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AutomationEvent {
    pub kind: EventKind,
    pub value: f32,
    pub time: f64,
}

#[derive(Debug, Clone)]
pub struct Automation {
    intrinsic: f32,
    events: Vec<AutomationEvent>,
}

impl Automation {
    pub fn new(initial: f32) -> Self {
        Self {
            intrinsic: initial,
            events: Vec::with_capacity(MAX_EVENTS),
        }
    }

    /// Jump to `value` at `time`. Returns false if the timeline is full.
    pub fn set_value_at_time(&mut self, value: f32, time: f64) -> bool {
        self.insert(AutomationEvent {
            kind: EventKind::SetValue,
            value,
            time,
        })
    }

    /// Ramp linearly to `value`, arriving at `time`.
    ///
    /// `now` is the clock time the ramp was requested at; it anchors the ramp
    /// when no earlier event exists.
    pub fn linear_ramp_to_value_at_time(&mut self, value: f32, time: f64, now: f64) -> bool {
        let anchored = self.events.iter().any(|e| e.time <= time);
        if !anchored {
            let start = self.value_at(now);
            if !self.set_value_at_time(start, now.min(time)) {
                return false;
            }
        }

        self.insert(AutomationEvent {
            kind: EventKind::LinearRamp,
            value,
            time,
        })
    }

    /// Drop every event at or after `from`, freezing the intrinsic value at
    /// the value the timeline produces at `now`.
    pub fn cancel_scheduled_values(&mut self, from: f64, now: f64) {
        self.intrinsic = self.value_at(now);
        self.events.retain(|e| e.time < from);
    }

    /// Value of the parameter at `time`.
    pub fn value_at(&self, time: f64) -> f32 {
        let mut prev_value = self.intrinsic;
        let mut prev_time: Option<f64> = None;

        for event in &self.events {
            if event.time <= time {
                prev_value = event.value;
                prev_time = Some(event.time);
                continue;
            }

            return match (event.kind, prev_time) {
                (EventKind::LinearRamp, Some(start)) => {
                    let span = event.time - start;
                    if span <= 0.0 {
                        event.value
                    } else {
                        let progress = ((time - start) / span) as f32;
                        prev_value + (event.value - prev_value) * progress
                    }
                }
                _ => prev_value,
            };
        }

        prev_value
    }

    /// Forget events that cannot affect any time at or after `time`.
    pub fn prune(&mut self, time: f64) {
        while let Some(first) = self.events.first().copied() {
            let next_reached = self.events.get(1).map_or(true, |next| next.time <= time);
            if first.time > time || !next_reached {
                break;
            }
            self.intrinsic = first.value;
            self.events.remove(0);
        }
    }

    /// Number of events still ahead of `time`.
    pub fn pending(&self, time: f64) -> usize {
        self.events.iter().filter(|e| e.time > time).count()
    }

    /// Number of ramps still ahead of `time`.
    pub fn pending_ramps(&self, time: f64) -> usize {
        self.events
            .iter()
            .filter(|e| e.kind == EventKind::LinearRamp && e.time > time)
            .count()
    }

    pub fn events(&self) -> &[AutomationEvent] {
        &self.events
    }

    /// Insert keeping events ordered by time; equal times keep call order.
    fn insert(&mut self, event: AutomationEvent) -> bool {
        if self.events.len() >= MAX_EVENTS || !event.time.is_finite() {
            return false;
        }

        let index = self.events.partition_point(|e| e.time <= event.time);
        self.events.insert(index, event);
        true
    }
}
