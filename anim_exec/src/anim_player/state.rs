//! Implementations for the AnimPlayer state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{info, warn};
use serde::Serialize;

// Internal
use super::{AnimLibrary, AnimPlayerError, Params};
use crate::servo_cal::{ServoCal, ServoId, NUM_SERVOS};
use crate::sweep;
use util::{
    archive::{Archived, Archiver},
    module::State,
    params,
    session::Session,
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Animation player module state
#[derive(Default)]
pub struct AnimPlayer {
    pub(crate) params: Params,

    pub(crate) cal: Option<ServoCal>,

    pub(crate) library: AnimLibrary,

    pub(crate) playback: Playback,

    pub(crate) report: StatusReport,
    arch_report: Archiver,
}

/// Input data to the animation player.
#[derive(Default)]
pub struct InputData {
    /// Time elapsed since the previous cycle.
    ///
    /// Units: milliseconds
    pub delta_ms: u32,

    /// A new animation selection to execute, or `None` if playback simply
    /// continues on this cycle.
    pub select: Option<AnimSelect>,
}

/// PWM demands the sink must write to the driver board.
#[derive(Clone, Copy, Default, Serialize, Debug)]
pub struct PwmDemands {
    /// Hardware channel per servo, in [`ServoId`] index order.
    pub channel: [u8; NUM_SERVOS],

    /// Pulse width count per servo, each inside the servo's safe envelope.
    pub pulse: [u16; NUM_SERVOS],
}

/// Status report for AnimPlayer processing.
#[derive(Clone, Copy, Default, Serialize, Debug)]
pub struct StatusReport {
    /// Index of the animation being played.
    pub anim_index: usize,

    /// Elapsed time into the animation.
    pub elapsed_ms: u32,

    /// True once a non-looping animation has run to completion.
    pub finished: bool,

    /// True if a selection request on this cycle was rejected.
    pub selection_rejected: bool,

    /// The interpolated joint angles for this cycle.
    pub angles_deg: [i32; NUM_SERVOS],

    /// The calibrated pulse widths for this cycle.
    pub pulse: [u16; NUM_SERVOS],
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// A request to play a particular animation from the library.
#[derive(Debug, Clone)]
pub enum AnimSelect {
    /// Select by library index.
    Index(usize),

    /// Select by animation name (ASCII case insensitive).
    Name(String),
}

/// Playback state of the animation player.
///
/// The only mutable runtime entity in the core: everything else is fixed at
/// initialisation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Playback {
    /// No animation selected yet.
    Stopped,

    /// An animation is advancing with the given elapsed time.
    Playing { anim_idx: usize, elapsed_ms: u32 },

    /// A non-looping animation has run to completion. Further ticks are
    /// no-ops, the pose holds at the final keyframe.
    Finished { anim_idx: usize },
}

impl Default for Playback {
    fn default() -> Self {
        Playback::Stopped
    }
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl State for AnimPlayer {
    type InitData = String;
    type InitError = AnimPlayerError;

    type InputData = InputData;
    type OutputData = PwmDemands;
    type StatusReport = StatusReport;
    type ProcError = AnimPlayerError;

    /// Initialise the AnimPlayer module.
    ///
    /// Expected init data is the name of the device profile parameter file.
    fn init(&mut self, init_data: Self::InitData, session: &Session)
        -> Result<(), Self::InitError>
    {
        let params: Params = params::load(&init_data)?;
        *self = Self::from_params(params)?;

        // Create the arch folder for anim_player
        let mut arch_path = session.arch_root.clone();
        arch_path.push("anim_player");
        std::fs::create_dir_all(arch_path)
            .map_err(|e| AnimPlayerError::ArchiveInitError(e.to_string()))?;

        self.arch_report =
            Archiver::from_path(session, "anim_player/status_report.csv")
                .map_err(|e| AnimPlayerError::ArchiveInitError(e.to_string()))?;

        Ok(())
    }

    /// Perform cyclic processing of the animation player.
    ///
    /// Handles any selection request, advances playback by the input delta,
    /// then emits the calibrated PWM demands for the current instant. A
    /// rejected selection falls back to the default resting animation rather
    /// than erroring, there must always be a safe output.
    fn proc(&mut self, input_data: &Self::InputData)
        -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError>
    {
        // Clear the status report
        self.report = StatusReport::default();

        if let Some(select) = &input_data.select {
            if let Err(e) = self.select(select) {
                warn!("{}, falling back to the default animation", e);
                self.report.selection_rejected = true;
                self.start(self.library.default_idx());
            }
        }

        // Never idle: with nothing selected play the default resting
        // animation
        if self.playback == Playback::Stopped {
            info!("Nothing selected, starting the default animation");
            self.start(self.library.default_idx());
        }

        self.tick(input_data.delta_ms);

        let angles_deg = self.current_angles();
        let pulse = self.current_pwms()?;

        let cal = self.cal.as_ref().ok_or(AnimPlayerError::NotInitialised)?;
        let mut channel = [0; NUM_SERVOS];
        for (i, &id) in ServoId::ALL.iter().enumerate() {
            channel[i] = cal.channel(id);
        }

        match self.playback {
            Playback::Playing { anim_idx, elapsed_ms } => {
                self.report.anim_index = anim_idx;
                self.report.elapsed_ms = elapsed_ms;
            }
            Playback::Finished { anim_idx } => {
                self.report.anim_index = anim_idx;
                self.report.finished = true;
                if let Some(anim) = self.library.get(anim_idx) {
                    self.report.elapsed_ms = anim.duration_ms;
                }
            }
            Playback::Stopped => (),
        }
        self.report.angles_deg = angles_deg;
        self.report.pulse = pulse;

        if self.arch_report.is_ready() {
            if let Err(e) = self.write() {
                warn!("Could not archive the status report: {}", e);
            }
        }

        Ok((PwmDemands { channel, pulse }, self.report))
    }
}

impl Archived for AnimPlayer {
    fn write(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        self.arch_report.serialise(self.report)
    }
}

impl AnimPlayer {
    /// Build a player directly from in-memory parameters.
    ///
    /// Used by `init` once the parameter file is loaded, and by tests and
    /// tools which construct profiles programmatically. No status report
    /// archive is attached.
    pub fn from_params(params: Params) -> Result<Self, AnimPlayerError> {
        let cal = ServoCal::new(&params.servos, params.max_angle_deg)?;
        let library = AnimLibrary::new(
            params.animations.clone(),
            params.default_animation,
            params.max_angle_deg,
        )?;

        Ok(Self {
            params,
            cal: Some(cal),
            library,
            playback: Playback::Stopped,
            report: StatusReport::default(),
            arch_report: Archiver::default(),
        })
    }

    /// Select and start an animation from the library.
    ///
    /// Fails with `InvalidSelection` if the index is out of bounds or no
    /// animation matches the name.
    pub fn select(&mut self, select: &AnimSelect) -> Result<(), AnimPlayerError> {
        let anim_idx = match select {
            AnimSelect::Index(idx) => {
                if *idx < self.library.len() {
                    *idx
                } else {
                    return Err(AnimPlayerError::InvalidSelection(format!("{}", idx)));
                }
            }
            AnimSelect::Name(name) => match self.library.find(name) {
                Some(idx) => idx,
                None => return Err(AnimPlayerError::InvalidSelection(name.clone())),
            },
        };

        self.start(anim_idx);
        Ok(())
    }

    /// Start playing the animation at the given library index from zero
    /// elapsed time. Restarting the current animation resets it.
    pub fn start(&mut self, anim_idx: usize) {
        if let Some(anim) = self.library.get(anim_idx) {
            info!("Starting animation {} ({:?})", anim_idx, anim.name);
            self.playback = Playback::Playing {
                anim_idx,
                elapsed_ms: 0,
            };
        }
    }

    /// Generate the sweep self-test animation for this device and play it.
    pub fn start_sweep(&mut self, half_period_ms: u32) -> Result<(), AnimPlayerError> {
        let anim = sweep::sweep_animation(self.params.max_angle_deg, half_period_ms);
        let anim_idx = self.library.push(anim, self.params.max_angle_deg)?;
        self.start(anim_idx);
        Ok(())
    }

    /// Advance playback by the given delta.
    ///
    /// Only a `Playing` animation advances. Looping animations wrap their
    /// elapsed time at the duration, non-looping animations clamp to the
    /// duration and finish.
    pub fn tick(&mut self, delta_ms: u32) {
        if let Playback::Playing { anim_idx, elapsed_ms } = self.playback {
            let anim = match self.library.get(anim_idx) {
                Some(a) => a,
                None => return,
            };

            let mut elapsed_ms = elapsed_ms.saturating_add(delta_ms);

            if elapsed_ms >= anim.duration_ms {
                if anim.looping {
                    elapsed_ms %= anim.duration_ms;
                } else {
                    self.playback = Playback::Finished { anim_idx };
                    return;
                }
            }

            self.playback = Playback::Playing { anim_idx, elapsed_ms };
        }
    }

    /// The four joint angles for the current instant.
    ///
    /// In `Stopped` the default animation's opening pose is returned so that
    /// there is always a safe pose to command.
    pub fn current_angles(&self) -> [i32; NUM_SERVOS] {
        let (anim_idx, elapsed_ms) = match self.playback {
            Playback::Playing { anim_idx, elapsed_ms } => (anim_idx, elapsed_ms),
            Playback::Finished { anim_idx } => match self.library.get(anim_idx) {
                Some(anim) => (anim_idx, anim.duration_ms),
                None => (anim_idx, 0),
            },
            Playback::Stopped => (self.library.default_idx(), 0),
        };

        match self.library.get(anim_idx) {
            Some(anim) => anim.pose_at(elapsed_ms),
            None => [0; NUM_SERVOS],
        }
    }

    /// The four calibrated pulse widths for the current instant.
    pub fn current_pwms(&self) -> Result<[u16; NUM_SERVOS], AnimPlayerError> {
        let cal = self.cal.as_ref().ok_or(AnimPlayerError::NotInitialised)?;

        let angles = self.current_angles();

        let mut pulse = [0; NUM_SERVOS];
        for (i, &id) in ServoId::ALL.iter().enumerate() {
            // The envelope is validated to lie within the driver's counter
            // range, so the cast cannot truncate
            pulse[i] = cal.angle_to_pwm(angles[i], id) as u16;
        }

        Ok(pulse)
    }

    /// The current playback state.
    pub fn playback(&self) -> Playback {
        self.playback
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::anim_player::{Animation, Keyframe};
    use crate::servo_cal::{ServoProfile, ServoProfileSet};

    fn egg_params(animations: Vec<Animation>, default_animation: usize) -> Params {
        Params {
            max_angle_deg: 90,
            default_animation,
            servos: ServoProfileSet {
                right_elbow: ServoProfile {
                    channel: 0,
                    pwm_at_zero_deg: 150,
                    pwm_at_max_deg: 330,
                },
                right_shoulder: ServoProfile {
                    channel: 1,
                    pwm_at_zero_deg: 150,
                    pwm_at_max_deg: 280,
                },
                left_shoulder: ServoProfile {
                    channel: 14,
                    pwm_at_zero_deg: 440,
                    pwm_at_max_deg: 300,
                },
                left_elbow: ServoProfile {
                    channel: 15,
                    pwm_at_zero_deg: 530,
                    pwm_at_max_deg: 360,
                },
            },
            animations,
        }
    }

    fn ramp(looping: bool) -> Animation {
        Animation {
            name: "Ramp".into(),
            duration_ms: 1000,
            looping,
            keyframes: vec![
                Keyframe {
                    time_ms: 0,
                    angles_deg: [10, 10, 10, 10],
                },
                Keyframe {
                    time_ms: 1000,
                    angles_deg: [50, 50, 50, 50],
                },
            ],
        }
    }

    fn resting() -> Animation {
        Animation {
            name: "Resting".into(),
            duration_ms: 3000,
            looping: true,
            keyframes: vec![Keyframe {
                time_ms: 0,
                angles_deg: [8, 5, 5, 8],
            }],
        }
    }

    #[test]
    fn test_select_by_index_and_name() {
        let mut player =
            AnimPlayer::from_params(egg_params(vec![resting(), ramp(true)], 0)).unwrap();

        player.select(&AnimSelect::Index(1)).unwrap();
        assert_eq!(
            player.playback(),
            Playback::Playing {
                anim_idx: 1,
                elapsed_ms: 0
            }
        );

        player.select(&AnimSelect::Name("resting".into())).unwrap();
        assert_eq!(
            player.playback(),
            Playback::Playing {
                anim_idx: 0,
                elapsed_ms: 0
            }
        );

        assert!(player.select(&AnimSelect::Index(2)).is_err());
        assert!(player
            .select(&AnimSelect::Name("missing".into()))
            .is_err());
    }

    #[test]
    fn test_restart_resets_elapsed_time() {
        let mut player =
            AnimPlayer::from_params(egg_params(vec![ramp(false)], 0)).unwrap();

        player.start(0);
        player.tick(400);
        assert_eq!(
            player.playback(),
            Playback::Playing {
                anim_idx: 0,
                elapsed_ms: 400
            }
        );

        player.start(0);
        assert_eq!(
            player.playback(),
            Playback::Playing {
                anim_idx: 0,
                elapsed_ms: 0
            }
        );
    }

    #[test]
    fn test_looping_wraps_at_duration() {
        let mut player =
            AnimPlayer::from_params(egg_params(vec![ramp(true)], 0)).unwrap();

        player.start(0);
        player.tick(1000);

        // Ticking exactly to the duration wraps to zero and reproduces the
        // first keyframe
        assert_eq!(
            player.playback(),
            Playback::Playing {
                anim_idx: 0,
                elapsed_ms: 0
            }
        );
        assert_eq!(player.current_angles(), [10; 4]);

        player.tick(1500);
        assert_eq!(
            player.playback(),
            Playback::Playing {
                anim_idx: 0,
                elapsed_ms: 500
            }
        );
    }

    #[test]
    fn test_non_looping_finishes_and_holds() {
        let mut player =
            AnimPlayer::from_params(egg_params(vec![ramp(false)], 0)).unwrap();

        player.start(0);
        player.tick(500);
        assert_eq!(player.current_angles(), [30; 4]);

        player.tick(500);
        assert_eq!(player.playback(), Playback::Finished { anim_idx: 0 });
        assert_eq!(player.current_angles(), [50; 4]);

        // Further ticks are no-ops
        player.tick(10_000);
        assert_eq!(player.playback(), Playback::Finished { anim_idx: 0 });
        assert_eq!(player.current_angles(), [50; 4]);
    }

    #[test]
    fn test_current_pwms_are_calibrated() {
        let mut player =
            AnimPlayer::from_params(egg_params(vec![ramp(false)], 0)).unwrap();

        player.start(0);
        player.tick(875);

        // 10 + round(875 * 40 / 1000) = 45 degrees on every joint
        assert_eq!(player.current_angles(), [45; 4]);

        // Midpoint of each calibrated range, inverted ranges included
        assert_eq!(player.current_pwms().unwrap(), [240, 215, 370, 445]);
    }

    #[test]
    fn test_proc_plays_default_when_stopped() {
        let mut player =
            AnimPlayer::from_params(egg_params(vec![resting(), ramp(true)], 0)).unwrap();

        let (dems, report) = player.proc(&InputData::default()).unwrap();

        assert_eq!(report.anim_index, 0);
        assert!(!report.selection_rejected);
        assert_eq!(report.angles_deg, [8, 5, 5, 8]);
        assert_eq!(dems.channel, [0, 1, 14, 15]);
    }

    #[test]
    fn test_proc_rejected_selection_falls_back_to_default() {
        let mut player =
            AnimPlayer::from_params(egg_params(vec![resting(), ramp(true)], 0)).unwrap();

        let input = InputData {
            delta_ms: 0,
            select: Some(AnimSelect::Name("no such animation".into())),
        };
        let (_, report) = player.proc(&input).unwrap();

        assert!(report.selection_rejected);
        assert_eq!(report.anim_index, 0);
    }

    #[test]
    fn test_proc_output_always_safe() {
        let mut player =
            AnimPlayer::from_params(egg_params(vec![ramp(true)], 0)).unwrap();

        let envelopes: [(u16, u16); 4] = [(150, 330), (150, 280), (300, 440), (360, 530)];

        let mut input = InputData {
            delta_ms: 0,
            select: Some(AnimSelect::Index(0)),
        };
        for _ in 0..100 {
            let (dems, _) = player.proc(&input).unwrap();
            input = InputData {
                delta_ms: 37,
                select: None,
            };

            for (i, &(lo, hi)) in envelopes.iter().enumerate() {
                assert!(
                    dems.pulse[i] >= lo && dems.pulse[i] <= hi,
                    "pulse {} outside [{}, {}]",
                    dems.pulse[i],
                    lo,
                    hi
                );
            }
        }
    }

    #[test]
    fn test_sweep_plays_through_player() {
        let mut player =
            AnimPlayer::from_params(egg_params(vec![resting()], 0)).unwrap();

        player.start_sweep(2000).unwrap();

        // Quarter of the way up
        player.tick(1000);
        assert_eq!(player.current_angles(), [45; 4]);

        // Top of the sweep
        player.tick(1000);
        assert_eq!(player.current_angles(), [90; 4]);

        // Back at the bottom, wrapped and still playing
        player.tick(2000);
        assert_eq!(player.current_angles(), [0; 4]);
        assert!(matches!(player.playback(), Playback::Playing { .. }));
    }
}
