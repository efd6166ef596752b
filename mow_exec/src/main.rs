//! Main mow executable entry point.
//!
//! # Architecture
//!
//! The executable consists of:
//!
//!     - The input sampler, running on the main thread, which polls the gamepad and updates the
//!       mode state
//!     - The drivers, each on its own thread, which read the mode state and publish:
//!         - Velocity commands (manual driving)
//!         - The autonomous mowing pattern
//!         - Light ring colours
//!         - Audio cues
//!
//! On interrupt every loop is stopped, the robot is sent a final lights off and zero velocity
//! command, and the topics are withdrawn.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use color_eyre::{
    eyre::{eyre, WrapErr},
    Report,
};
use log::{debug, error, info, warn};
use std::sync::Arc;
use structopt::StructOpt;

// Internal
use comms_if::net::{Bus, RosBridge};
use mow_lib::{
    drivers::{DriverPeriods, Drivers, Outputs},
    input::{
        sampler::{self, ModeLogic, SamplerParams},
        GilrsJoystick,
    },
    mode_state,
    params::MowExecParams,
    shutdown::Shutdown,
};
use util::{
    logger::{logger_init, LevelFilter},
    session::Session,
    time::hz_to_period,
};

// ---------------------------------------------------------------------------
// STRUCTS
// ---------------------------------------------------------------------------

#[derive(Debug, StructOpt)]
#[structopt(name = "mow_exec", about = "Gamepad teleoperation and mowing for the Create 3")]
struct Opts {
    /// Parameter file, relative to the params directory
    #[structopt(long, default_value = "mow_exec.toml")]
    params: String,

    /// Log at trace level
    #[structopt(short, long)]
    verbose: bool,
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {
    color_eyre::install()?;

    let opts = Opts::from_args();

    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session = Session::new("mow_exec", "sessions").wrap_err("Failed to create the session")?;

    // Initialise logger
    let level = if opts.verbose {
        LevelFilter::Trace
    } else {
        LevelFilter::Debug
    };
    logger_init(level, &session).wrap_err("Failed to initialise logging")?;

    info!("Create Mow Executable\n");
    info!("Session directory: {:?}\n", session.session_root);

    // ---- LOAD PARAMETERS ----

    let params: MowExecParams = util::params::load(&opts.params)
        .wrap_err_with(|| format!("Could not load parameters from {}", opts.params))?;
    params.validate().wrap_err("Invalid parameters")?;

    debug!("Parameters: {:#?}", params);
    info!("Exec parameters loaded");

    let sample_period = hz_to_period(params.sample_rate_hz)
        .ok_or_else(|| eyre!("Invalid sample rate: {} Hz", params.sample_rate_hz))?;
    let periods = DriverPeriods::from_params(&params).wrap_err("Invalid driver rates")?;

    // ---- INITIALISE JOYSTICK ----

    let mut joystick = GilrsJoystick::new().wrap_err("Failed to initialise the joystick")?;
    info!("Using joystick: {}", joystick.name());

    // ---- INITIALISE NETWORK ----

    let bridge = Arc::new(
        RosBridge::connect(&params.bridge_host, params.bridge_port)
            .wrap_err("Failed to connect to the rosbridge server")?,
    );
    info!("Connected to {}", bridge.url());

    let bus: Arc<dyn Bus> = bridge.clone();
    let outputs = Arc::new(
        Outputs::advertise(bus, &params).wrap_err("Failed to advertise the robot's topics")?,
    );

    // ---- INITIALISE SHUTDOWN ----

    let shutdown = Shutdown::new();
    {
        let shutdown = shutdown.clone();
        ctrlc::set_handler(move || {
            info!("Interrupt received, shutting down");
            shutdown.trigger();
        })
        .wrap_err("Failed to install the interrupt handler")?;
    }

    // ---- START DRIVERS ----

    let (writer, reader) = mode_state::channel();

    let drivers = match Drivers::spawn(&reader, &outputs, &params, periods, &shutdown.token()) {
        Ok(d) => d,
        Err(e) => {
            shutdown.trigger();
            return Err(e).wrap_err("Failed to start the drivers");
        }
    };

    info!("Initialisation complete, press Ctrl-C to exit\n");

    // ---- MAIN LOOP ----

    let mut logic = ModeLogic::new(SamplerParams::from(&params));
    sampler::run(
        &mut joystick,
        &mut logic,
        &writer,
        sample_period,
        &shutdown.token(),
    );

    // ---- SHUTDOWN ----

    info!("Stopping drivers");
    shutdown.trigger();

    for e in drivers.join() {
        warn!("Driver failure: {}", e);
    }

    // Teardown continues past a failed safe command so the bridge is always closed
    let safe = outputs.make_safe();
    if let Err(e) = &safe {
        error!("Could not send the final safe commands: {}", e);
    }
    if let Err(e) = outputs.unadvertise() {
        warn!("Could not unadvertise topics: {}", e);
    }
    bridge.close().wrap_err("Failed to close the bridge connection")?;
    safe.wrap_err("Failed to send the final safe commands")?;

    info!("Shutdown complete.");

    Ok(())
}
