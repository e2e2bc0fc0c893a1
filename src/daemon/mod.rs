//! Control loop for the fan regulator daemon

pub mod signals;

use crate::{
    actuator::{self, FanActuator},
    config::{ConfigSource, ParamFile},
    errors::Result,
    pidfile::PidFile,
    policy::{decide, FanLevel, ThresholdModifier},
    sensor::{SensorReader, ThermalFile},
    settings::Settings,
};
use log::{debug, error, info, warn};
use std::sync::Arc;
use std::time::Duration;

pub use signals::ControlFlags;

/// What the loop believes the hardware is doing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ControlState {
    pub modifier: ThresholdModifier,
    pub fan_level: FanLevel,
}

/// Outcome of one loop iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Sleep the fixed interval before the next iteration
    Wait,
    /// Start the next iteration right away
    Immediate,
    /// Leave the loop and restore automatic control
    Shutdown,
}

/// Single-owner loop: sensor read, policy decision, actuation
pub struct ControlLoop<S, C, A> {
    sensor: S,
    config: C,
    actuator: A,
    state: ControlState,
    flags: Arc<ControlFlags>,
    interval: Duration,
}

impl<S, C, A> ControlLoop<S, C, A>
where
    S: SensorReader,
    C: ConfigSource,
    A: FanActuator,
{
    pub fn new(sensor: S, config: C, actuator: A, flags: Arc<ControlFlags>) -> Self {
        Self {
            sensor,
            config,
            actuator,
            state: ControlState::default(),
            flags,
            interval: Duration::from_secs(crate::settings::DEFAULT_INTERVAL_SECS),
        }
    }

    pub fn with_modifier(mut self, modifier: ThresholdModifier) -> Self {
        self.state.modifier = modifier;
        self
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn state(&self) -> ControlState {
        self.state
    }

    /// Run one iteration and report how the caller should proceed
    pub fn tick(&mut self) -> Tick {
        if self.flags.shutdown_requested() {
            return Tick::Shutdown;
        }

        if self.flags.take_reload() {
            return match self.config.reload() {
                Ok(modifier) => {
                    info!("Reloaded threshold modifier: {} -> {}", self.state.modifier, modifier);
                    self.state.modifier = modifier;
                    Tick::Immediate
                }
                Err(e) => {
                    warn!("Reload failed, keeping modifier {}: {}", self.state.modifier, e);
                    Tick::Wait
                }
            };
        }

        let readings = match self.sensor.read() {
            Ok(readings) => readings,
            Err(e) => {
                warn!("Failed to read temperatures: {}", e);
                return Tick::Wait;
            }
        };

        let level = decide(&readings, self.state.modifier);
        debug!(
            "Max temperature {}°C with modifier {} selects level {}",
            readings.max(),
            self.state.modifier,
            level
        );
        self.actuate(level);

        Tick::Wait
    }

    /// Push `level` to the actuator unless it is already commanded.
    ///
    /// Returns whether the actuator was invoked. The recorded level only changes
    /// on success so a failed write is retried on the next evaluation.
    pub fn actuate(&mut self, level: FanLevel) -> bool {
        if level == self.state.fan_level {
            return false;
        }

        match self.actuator.apply(level) {
            Ok(()) => {
                info!("Fan level {} -> {}", self.state.fan_level, level);
                self.state.fan_level = level;
            }
            Err(e) => error!("Failed to set fan level {}: {}", level, e),
        }
        true
    }

    /// Hand the fan back to automatic control
    pub fn shutdown(&mut self) {
        info!("Shutting down, restoring automatic fan control");
        match self.actuator.apply(FanLevel::Auto) {
            Ok(()) => self.state.fan_level = FanLevel::Auto,
            Err(e) => error!("Failed to restore automatic fan control: {}", e),
        }
    }

    /// Loop until shutdown is requested, then restore automatic control
    pub async fn run(mut self) -> ControlState {
        info!(
            "Control loop running every {}s with modifier {}",
            self.interval.as_secs(),
            self.state.modifier
        );

        loop {
            match self.tick() {
                Tick::Shutdown => break,
                Tick::Immediate => continue,
                Tick::Wait => self.flags.wait(self.interval).await,
            }
        }

        self.shutdown();
        self.state
    }
}

/// Run the daemon with the given settings until a termination signal arrives
pub async fn daemon(settings: Settings) -> Result<()> {
    settings.validate()?;

    let flags = Arc::new(ControlFlags::new());
    let signal_task = signals::install(flags.clone())?;

    let pid_file = PidFile::write(&settings.pid_file);

    info!(
        "Monitoring {} and driving {} ({:?} actuator)",
        settings.thermal_path.display(),
        settings.fan_path.display(),
        settings.actuator
    );

    let control = ControlLoop::new(
        ThermalFile::new(&settings.thermal_path),
        ParamFile::new(&settings.config_path),
        actuator::from_kind(settings.actuator, &settings.fan_path),
        flags,
    )
    .with_modifier(settings.modifier)
    .with_interval(settings.interval());

    let final_state = control.run().await;

    signal_task.abort();
    drop(pid_file);

    info!("daemon exited from loop with fan level {}", final_state.fan_level);
    Ok(())
}
