//! # Drivers
//!
//! Each driver reads the latest mode state snapshot at its own fixed rate and publishes one kind
//! of command to the robot. Drivers run on their own named threads and end when the shutdown is
//! triggered or when one of their publishes fails.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

pub mod audio;
pub mod auto_mow;
pub mod drive;
pub mod light;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use std::{
    sync::Arc,
    thread::{self, JoinHandle},
    time::Duration,
};
use comms_if::{
    msg::{AudioNoteVector, LightringLeds, Twist},
    net::{Bus, BusError, Topic},
};
use log::{info, warn};

use crate::{mode_state::ModeStateReader, params::MowExecParams, shutdown::ShutdownToken};
use auto_mow::MowParams;
use util::time::hz_to_period;

// ---------------------------------------------------------------------------
// STRUCTS
// ---------------------------------------------------------------------------

/// The advertised topics the drivers publish to.
pub struct Outputs {
    pub drive: Topic<Twist>,
    pub light: Topic<LightringLeds>,
    pub audio: Topic<AudioNoteVector>,
}

/// Cycle period of each driver.
#[derive(Debug, Clone, Copy)]
pub struct DriverPeriods {
    pub drive: Duration,
    pub light: Duration,
    pub audio: Duration,
    pub auto_mow: Duration,
}

/// Handles to the running driver threads.
pub struct Drivers {
    handles: Vec<(&'static str, JoinHandle<Result<(), DriverError>>)>,
}

// ---------------------------------------------------------------------------
// ENUMS
// ---------------------------------------------------------------------------

#[derive(thiserror::Error, Debug)]
pub enum DriverError {
    #[error("The {0} driver could not publish: {1}")]
    PublishError(&'static str, BusError),

    #[error("Could not spawn the {0} driver thread: {1}")]
    SpawnError(&'static str, std::io::Error),

    #[error("The {0} driver thread panicked")]
    Panicked(&'static str),

    #[error("The {0} rate must be a positive number of hertz")]
    InvalidRate(&'static str),
}

// ---------------------------------------------------------------------------
// IMPLS
// ---------------------------------------------------------------------------

impl Outputs {
    /// Advertise the robot's command topics on the bus.
    pub fn advertise(bus: Arc<dyn Bus>, params: &MowExecParams) -> Result<Self, BusError> {
        Ok(Self {
            drive: Topic::advertise(bus.clone(), params.topic("cmd_vel"))?,
            light: Topic::advertise(bus.clone(), params.topic("cmd_lightring"))?,
            audio: Topic::advertise(bus, params.topic("cmd_audio"))?,
        })
    }

    /// Turn the lights off and stop the robot.
    ///
    /// The zero velocity command is sent even if the lights off command fails. The first error
    /// is returned once both have been attempted.
    pub fn make_safe(&self) -> Result<(), BusError> {
        let light = self.light.publish(&LightringLeds::off());
        let drive = self.drive.publish(&Twist::zero());

        light.and(drive)
    }

    /// Withdraw every topic, returning the first error once all have been attempted.
    pub fn unadvertise(&self) -> Result<(), BusError> {
        let drive = self.drive.unadvertise();
        let light = self.light.unadvertise();
        let audio = self.audio.unadvertise();

        drive.and(light).and(audio)
    }
}

impl DriverPeriods {
    pub fn from_params(params: &MowExecParams) -> Result<Self, DriverError> {
        let drive =
            hz_to_period(params.drive_rate_hz).ok_or(DriverError::InvalidRate("drive"))?;
        let audio =
            hz_to_period(params.sample_rate_hz).ok_or(DriverError::InvalidRate("audio"))?;

        Ok(Self {
            drive,
            light: light::LIGHT_TICK_PERIOD,
            audio,
            auto_mow: drive,
        })
    }
}

impl Drivers {
    /// Start every driver on its own thread.
    ///
    /// If a thread cannot be spawned the ones already started are left running, they will end
    /// when the shutdown is triggered.
    pub fn spawn(
        reader: &ModeStateReader,
        outputs: &Arc<Outputs>,
        params: &MowExecParams,
        periods: DriverPeriods,
        token: &ShutdownToken,
    ) -> Result<Self, DriverError> {
        let mut drivers = Self {
            handles: Vec::with_capacity(4),
        };

        drivers.start("drive", {
            let (r, o, t) = (reader.clone(), outputs.clone(), token.clone());
            move || drive::run(r, o, periods.drive, t)
        })?;

        drivers.start("light", {
            let (r, o, t) = (reader.clone(), outputs.clone(), token.clone());
            move || light::run(r, o, periods.light, t)
        })?;

        drivers.start("audio", {
            let (r, o, t) = (reader.clone(), outputs.clone(), token.clone());
            move || audio::run(r, o, periods.audio, t)
        })?;

        drivers.start("auto_mow", {
            let (r, o, t) = (reader.clone(), outputs.clone(), token.clone());
            let mow_params = MowParams::from(params);
            move || auto_mow::run(r, o, mow_params, periods.auto_mow, t)
        })?;

        Ok(drivers)
    }

    fn start<F>(&mut self, name: &'static str, f: F) -> Result<(), DriverError>
    where
        F: FnOnce() -> Result<(), DriverError> + Send + 'static,
    {
        let handle = thread::Builder::new()
            .name(name.into())
            .spawn(f)
            .map_err(|e| DriverError::SpawnError(name, e))?;

        info!("Started {} driver", name);

        self.handles.push((name, handle));

        Ok(())
    }

    /// Wait for every driver to end, returning the errors of those which failed.
    pub fn join(self) -> Vec<DriverError> {
        let mut errors = Vec::new();

        for (name, handle) in self.handles {
            match handle.join() {
                Ok(Ok(())) => info!("{} driver stopped", name),
                Ok(Err(e)) => {
                    warn!("{} driver ended with an error: {}", name, e);
                    errors.push(e);
                }
                Err(_) => {
                    warn!("{} driver panicked", name);
                    errors.push(DriverError::Panicked(name));
                }
            }
        }

        errors
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        mode_state::{self, Colour, Mode, ModeState},
        shutdown::Shutdown,
    };
    use comms_if::net::{Op, RecordingBus};
    use serde_json::json;

    /// Rejects publishes on topics ending in `suffix`, records everything else.
    struct RejectingBus {
        inner: RecordingBus,
        suffix: &'static str,
    }

    impl Bus for RejectingBus {
        fn advertise(&self, topic: &str, msg_type: &str) -> Result<(), BusError> {
            self.inner.advertise(topic, msg_type)
        }

        fn publish(&self, topic: &str, msg: serde_json::Value) -> Result<(), BusError> {
            if topic.ends_with(self.suffix) {
                return Err(BusError::Rejected(topic.into()));
            }
            self.inner.publish(topic, msg)
        }

        fn unadvertise(&self, topic: &str) -> Result<(), BusError> {
            self.inner.unadvertise(topic)
        }
    }

    fn fast_periods() -> DriverPeriods {
        DriverPeriods {
            drive: Duration::from_millis(10),
            light: Duration::from_millis(20),
            audio: Duration::from_millis(10),
            auto_mow: Duration::from_millis(10),
        }
    }

    fn setup() -> (Arc<RecordingBus>, Arc<Outputs>, MowExecParams) {
        let bus = Arc::new(RecordingBus::new());
        let params = MowExecParams::default();
        let outputs = Arc::new(Outputs::advertise(bus.clone(), &params).unwrap());
        (bus, outputs, params)
    }

    #[test]
    fn test_advertise_topics() {
        let (bus, _outputs, _) = setup();

        assert_eq!(
            bus.ops(),
            vec![
                Op::Advertise {
                    topic: "/foxtrot/cmd_vel".into(),
                    msg_type: "geometry_msgs/Twist".into()
                },
                Op::Advertise {
                    topic: "/foxtrot/cmd_lightring".into(),
                    msg_type: "irobot_create_msgs/LightringLeds".into()
                },
                Op::Advertise {
                    topic: "/foxtrot/cmd_audio".into(),
                    msg_type: "irobot_create_msgs/AudioNoteVector".into()
                },
            ]
        );
    }

    #[test]
    fn test_make_safe_stops_robot_when_lights_fail() {
        let bus = Arc::new(RejectingBus {
            inner: RecordingBus::new(),
            suffix: "cmd_lightring",
        });
        let outputs = Outputs::advertise(bus.clone(), &MowExecParams::default()).unwrap();
        bus.inner.clear();

        let result = outputs.make_safe();

        assert!(matches!(result, Err(BusError::Rejected(t)) if t == "/foxtrot/cmd_lightring"));
        assert_eq!(
            bus.inner.published(outputs.drive.name()),
            vec![serde_json::to_value(Twist::zero()).unwrap()]
        );

        // Teardown still goes ahead afterwards
        outputs.unadvertise().unwrap();
        assert_eq!(bus.inner.ops().len(), 4);
    }

    #[test]
    fn test_periods_from_params() {
        let periods = DriverPeriods::from_params(&MowExecParams::default()).unwrap();
        assert_eq!(periods.drive, Duration::from_millis(100));
        assert_eq!(periods.light, Duration::from_millis(500));

        let mut params = MowExecParams::default();
        params.drive_rate_hz = 0.0;
        assert!(matches!(
            DriverPeriods::from_params(&params),
            Err(DriverError::InvalidRate("drive"))
        ));
    }

    #[test]
    fn test_run_then_shutdown() {
        let (bus, outputs, params) = setup();
        let (writer, reader) = mode_state::channel();
        let shutdown = Shutdown::new();

        writer.store(ModeState {
            armed: true,
            mode: Mode::Manual,
            linear_ms: 0.5,
            angular_rads: 0.0,
            colour: Colour::Green,
            blink: true,
        });

        let drivers = Drivers::spawn(
            &reader,
            &outputs,
            &params,
            fast_periods(),
            &shutdown.token(),
        )
        .unwrap();

        std::thread::sleep(Duration::from_millis(150));

        shutdown.trigger();
        assert!(drivers.join().is_empty());

        assert!(bus
            .published("/foxtrot/cmd_vel")
            .contains(&json!({"linear": {"x": 0.5, "y": 0.0, "z": 0.0}, "angular": {"x": 0.0, "y": 0.0, "z": 0.0}})));
        assert_eq!(bus.published("/foxtrot/cmd_audio").len(), 1);

        outputs.make_safe().unwrap();
        outputs.unadvertise().unwrap();

        // Off, then zero, then every topic withdrawn
        let ops = bus.ops();
        let tail = &ops[ops.len() - 5..];
        assert_eq!(
            tail[0],
            Op::Publish {
                topic: "/foxtrot/cmd_lightring".into(),
                msg: serde_json::to_value(LightringLeds::off()).unwrap()
            }
        );
        assert_eq!(
            tail[1],
            Op::Publish {
                topic: "/foxtrot/cmd_vel".into(),
                msg: serde_json::to_value(Twist::zero()).unwrap()
            }
        );
        assert!(tail[2..]
            .iter()
            .all(|op| matches!(op, Op::Unadvertise { .. })));
    }

    #[test]
    fn test_failing_bus_ends_drivers() {
        let (bus, outputs, params) = setup();
        let (_writer, reader) = mode_state::channel();
        let shutdown = Shutdown::new();

        bus.set_failing(true);

        // Idle and disarmed, so the drive, light and audio drivers all publish
        let drivers = Drivers::spawn(
            &reader,
            &outputs,
            &params,
            fast_periods(),
            &shutdown.token(),
        )
        .unwrap();

        // The auto driver has nothing to publish and only ends on shutdown
        std::thread::sleep(Duration::from_millis(200));
        shutdown.trigger();

        let errors = drivers.join();

        assert_eq!(errors.len(), 3);
        assert!(errors
            .iter()
            .all(|e| matches!(e, DriverError::PublishError(_, BusError::Rejected(_)))));
    }
}
