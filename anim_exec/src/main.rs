//! # Animatronic Control Executable
//!
//! This executable drives the hatchling animatronic: four joint servos
//! (shoulder and elbow on each of two legs) behind a PCA9685 PWM driver
//! board. Each control cycle the animation player interpolates the current
//! pose and the calibrated pulse widths are written to the sink.
//!
//! The first command line argument optionally selects the animation to play,
//! by library index or by name. The special argument `sweep` runs the servo
//! sweep self test instead.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

// External
use color_eyre::{eyre::WrapErr, Result};
use log::{info, warn};
use std::time::{Duration, Instant};

// Internal
use anim_lib::{
    anim_player::{AnimPlayer, AnimSelect, InputData},
    params::AnimExecParams,
    pwm_sink::PwmSink,
};
use util::{
    logger::{logger_init, LevelFilter},
    module::State,
    session::Session,
};

// ------------------------------------------------------------------------------------------------
// MAIN
// ------------------------------------------------------------------------------------------------

fn main() -> Result<()> {
    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session =
        Session::new("anim_exec", "sessions").wrap_err("Failed to create the session")?;

    // Initialise logger
    logger_init(LevelFilter::Trace, &session).wrap_err("Failed to initialise logging")?;

    // Log information on this execution.
    info!("Animatronic Control Executable\n");
    info!("Session directory: {:?}\n", session.session_root);

    info!("Initialising...");

    // ---- LOAD PARAMETERS ----

    let exec_params: AnimExecParams = util::params::load("anim_exec.toml")?;

    info!(
        "Parameters loaded, device profile: {:?}",
        exec_params.device_profile
    );

    // Snapshot the parameters into the session for traceability
    session.save("anim_exec_params.json", exec_params.clone());

    // ---- PLAYER INITIALISATION ----

    let mut player = AnimPlayer::default();
    player
        .init(exec_params.device_profile.clone(), &session)
        .wrap_err("Failed to initialise the animation player")?;

    info!("Animation player initialised");

    // ---- SINK INITIALISATION ----

    let mut sink = init_sink(&exec_params).wrap_err("Failed to initialise the PWM sink")?;

    info!("PWM sink initialised");

    // ---- ANIMATION SELECTION ----

    let mut select: Option<AnimSelect> = None;

    match std::env::args().nth(1).as_deref() {
        Some("sweep") => {
            player
                .start_sweep(exec_params.sweep_half_period_ms)
                .wrap_err("Failed to start the sweep self test")?;
        }
        Some(arg) => {
            select = Some(match arg.parse::<usize>() {
                Ok(idx) => AnimSelect::Index(idx),
                Err(_) => AnimSelect::Name(arg.to_string()),
            });
        }
        None => (),
    }

    // ---- MAIN LOOP ----

    info!("Initialisation complete, entering main loop");

    let cycle_period = Duration::from_millis(exec_params.cycle_period_ms);
    let mut last_cycle = Instant::now();

    loop {
        let cycle_start = Instant::now();
        let delta_ms = cycle_start.duration_since(last_cycle).as_millis() as u32;
        last_cycle = cycle_start;

        let input = InputData {
            delta_ms,
            select: select.take(),
        };

        // The player always produces demands inside the safe envelope, an
        // error here is unrecoverable
        let (dems, report) = player
            .proc(&input)
            .wrap_err("Animation player processing failed")?;

        for i in 0..dems.channel.len() {
            if let Err(e) = sink.set_pwm(dems.channel[i], dems.pulse[i]) {
                warn!("Could not write CH{}: {}", dems.channel[i], e);
            }
        }

        // A non-looping animation running to completion ends the execution
        if report.finished {
            info!("Animation finished, exiting");
            break;
        }

        if let Some(remaining) = cycle_period.checked_sub(cycle_start.elapsed()) {
            std::thread::sleep(remaining);
        }
    }

    session.exit();

    Ok(())
}

// ------------------------------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Build the PWM sink for this host.
///
/// On the Pi the PCA9685 is driven over the hardware I2C bus.
#[cfg(all(target_arch = "arm", target_os = "linux"))]
fn init_sink(params: &AnimExecParams) -> Result<impl PwmSink> {
    use color_eyre::eyre::eyre;
    use pwm_pca9685::Pca9685;

    let i2c = rppal::i2c::I2c::new().wrap_err("Could not open the I2C bus")?;

    let mut driver = Pca9685::new(i2c, params.i2c_address)
        .map_err(|_| eyre!("Could not create the PCA9685 driver"))?;
    driver
        .set_prescale(params.pwm_prescale)
        .map_err(|_| eyre!("Could not set the PWM prescale"))?;
    driver
        .enable()
        .map_err(|_| eyre!("Could not enable the PCA9685"))?;

    Ok(driver)
}

/// Build the PWM sink for this host.
///
/// Off the robot there is no I2C bus, writes are traced instead.
#[cfg(not(all(target_arch = "arm", target_os = "linux")))]
fn init_sink(_params: &AnimExecParams) -> Result<impl PwmSink> {
    Ok(anim_lib::pwm_sink::LogSink::default())
}
