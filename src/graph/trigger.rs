use log::debug;

use crate::graph::param::ParamHandle;

/*
Envelope Trigger
================

Drives an automatable parameter through ADSR ramps instead of rendering an
envelope signal itself. Point it at a gain to shape loudness, or at any
other parameter.

  value
    │      ╱╲
 target ──╱  ╲___________ target × sustain
    │    ╱               ╲
    │   ╱                 ╲
    └──┴──┴──┴───────────┴──┴──→ time
       on  A  D           off R

on(target, attack, decay, sustain)
  1. cancel everything scheduled on the parameter
  2. ramp from the current value to `target`, arriving after `attack`
  3. ramp to `target × sustain`, arriving `decay` later

off(target, release)
  1. cancel everything scheduled on the parameter
  2. pin the current value as the start of the ramp
  3. ramp to `target`, arriving after `release`

Every call cancels first, so a new note never stacks on an old schedule.
Times are measured from the audio clock at the moment of the call.
*/

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeState {
    Idle,
    Attack,
    Decay,
    Sustain,
    Release,
}

#[derive(Debug, Clone, Copy)]
enum Schedule {
    On { attack_end: f64, decay_end: f64 },
    Off { release_end: f64 },
}

pub struct Trigger {
    param: ParamHandle,
    schedule: Option<Schedule>,
}

impl Trigger {
    pub const ON_TARGET: f32 = 1.0;
    pub const ATTACK: f64 = 0.1;
    pub const DECAY: f64 = 0.1;
    pub const SUSTAIN: f32 = 1.0;
    pub const OFF_TARGET: f32 = 0.0;
    pub const RELEASE: f64 = 0.5;

    pub fn new(param: ParamHandle) -> Self {
        Self {
            param,
            schedule: None,
        }
    }

    pub fn on(&mut self, target: f32, attack: f64, decay: f64, sustain: f32) -> &mut Self {
        let now = self.param.now();
        let attack_end = now + attack.max(0.0);
        let decay_end = attack_end + decay.max(0.0);

        self.param
            .cancel_scheduled_values(0.0)
            .linear_ramp_to_value_at_time(target, attack_end)
            .linear_ramp_to_value_at_time(target * sustain, decay_end);

        debug!("envelope on at {now:.3}s: {target} over {attack}s, sustain {sustain}");
        self.schedule = Some(Schedule::On {
            attack_end,
            decay_end,
        });
        self
    }

    pub fn off(&mut self, target: f32, release: f64) -> &mut Self {
        let now = self.param.now();
        let release_end = now + release.max(0.0);
        let start = self.param.value();

        self.param
            .cancel_scheduled_values(0.0)
            .set_value_at_time(start, now)
            .linear_ramp_to_value_at_time(target, release_end);

        debug!("envelope off at {now:.3}s: {start} -> {target} over {release}s");
        self.schedule = Some(Schedule::Off { release_end });
        self
    }

    pub fn on_default(&mut self) -> &mut Self {
        self.on(Self::ON_TARGET, Self::ATTACK, Self::DECAY, Self::SUSTAIN)
    }

    pub fn off_default(&mut self) -> &mut Self {
        self.off(Self::OFF_TARGET, Self::RELEASE)
    }

    /// Stage of the most recent schedule at the current clock time.
    pub fn stage(&self) -> EnvelopeState {
        let now = self.param.now();
        match self.schedule {
            None => EnvelopeState::Idle,
            Some(Schedule::On {
                attack_end,
                decay_end,
            }) => {
                if now < attack_end {
                    EnvelopeState::Attack
                } else if now < decay_end {
                    EnvelopeState::Decay
                } else {
                    EnvelopeState::Sustain
                }
            }
            Some(Schedule::Off { release_end }) => {
                if now < release_end {
                    EnvelopeState::Release
                } else {
                    EnvelopeState::Idle
                }
            }
        }
    }

    /// True while a ramp from the most recent call is still ahead.
    pub fn is_pending(&self) -> bool {
        let now = self.param.now();
        match self.schedule {
            None => false,
            Some(Schedule::On { decay_end, .. }) => now < decay_end,
            Some(Schedule::Off { release_end }) => now < release_end,
        }
    }

    pub fn param(&self) -> &ParamHandle {
        &self.param
    }

    pub fn param_mut(&mut self) -> &mut ParamHandle {
        &mut self.param
    }
}
