//! Fixed-cadence host loop for a [`Flock`].
//!
//! The driver plays the role of the window timer: it fires ticks at a set
//! rate and hands finished frames to a [`FrameSink`], which stands in for the
//! renderer.

use std::io::Write;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use flock_core::{Flock, TickReport};
use flock_shared::{Frame, RunSummary};

/// Receives the population after completed ticks.
pub trait FrameSink {
    fn on_frame(&mut self, frame: &Frame) -> Result<()>;

    /// Called once after the last tick of a run.
    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Writes each frame as one JSON line.
pub struct JsonLinesSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> FrameSink for JsonLinesSink<W> {
    fn on_frame(&mut self, frame: &Frame) -> Result<()> {
        let line = frame.to_json_line().context("Failed to encode frame")?;
        writeln!(self.writer, "{}", line).context("Failed to write frame")?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush().context("Failed to flush frames")
    }
}

/// Keeps every frame in memory.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub frames: Vec<Frame>,
}

impl FrameSink for RecordingSink {
    fn on_frame(&mut self, frame: &Frame) -> Result<()> {
        self.frames.push(frame.clone());
        Ok(())
    }
}

/// Discards frames.
pub struct NullSink;

impl FrameSink for NullSink {
    fn on_frame(&mut self, _frame: &Frame) -> Result<()> {
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct DriverOptions {
    /// Number of ticks to run.
    pub ticks: u64,
    /// Target ticks per second; `None` runs as fast as possible.
    pub tick_rate: Option<f64>,
    /// Emit a frame every this many ticks.
    pub frame_every: u64,
    /// Update agents on the rayon pool. Only honoured with the `parallel`
    /// feature.
    pub parallel: bool,
}

impl Default for DriverOptions {
    fn default() -> Self {
        Self {
            ticks: 600,
            tick_rate: Some(60.0),
            frame_every: 1,
            parallel: false,
        }
    }
}

pub struct TickDriver<const N: usize> {
    flock: Flock<N>,
    options: DriverOptions,
}

impl<const N: usize> TickDriver<N> {
    pub fn new(flock: Flock<N>, options: DriverOptions) -> Self {
        Self { flock, options }
    }

    pub fn flock(&self) -> &Flock<N> {
        &self.flock
    }

    /// Access for collaborators that reconfigure the flock between runs.
    pub fn flock_mut(&mut self) -> &mut Flock<N> {
        &mut self.flock
    }

    /// Runs the configured number of ticks, feeding frames to `sink`.
    pub fn run(&mut self, sink: &mut dyn FrameSink) -> Result<RunSummary> {
        let period = match self.options.tick_rate.filter(|rate| *rate > 0.0) {
            Some(rate) => Some(
                Duration::try_from_secs_f64(1.0 / rate)
                    .with_context(|| format!("Tick rate {} is out of range", rate))?,
            ),
            None => None,
        };
        let frame_every = self.options.frame_every.max(1);

        log::info!(
            "Running {} ticks for {} agents ({})",
            self.options.ticks,
            self.flock.len(),
            match self.options.tick_rate {
                Some(rate) => format!("{:.1} ticks/s", rate),
                None => "unthrottled".to_string(),
            }
        );

        let started = Instant::now();
        let mut deadline = started;
        let mut stale_ticks = 0u64;

        for _ in 0..self.options.ticks {
            let report = self.step();

            if report.tick % frame_every == 0 {
                let frame = Frame::capture(report.tick, self.flock.population());
                sink.on_frame(&frame)
                    .with_context(|| format!("Frame sink failed at tick {}", report.tick))?;
            }

            if let Some(period) = period {
                deadline = deadline
                    .checked_add(period)
                    .context("Tick deadline is out of range")?;
                let now = Instant::now();
                if now < deadline {
                    std::thread::sleep(deadline - now);
                } else {
                    stale_ticks += 1;
                    log::debug!("Tick {} missed its deadline", report.tick);
                }
            }
        }

        sink.finish().context("Frame sink failed to finish")?;

        if stale_ticks > 0 {
            log::warn!(
                "{} of {} ticks missed the target cadence",
                stale_ticks,
                self.options.ticks
            );
        }

        let elapsed = started.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            log::info!(
                "Completed {} ticks in {:.2}s ({:.1} ticks/s)",
                self.options.ticks,
                elapsed,
                self.options.ticks as f64 / elapsed
            );
        }

        Ok(RunSummary::from_population(
            self.flock.tick(),
            self.flock.population(),
        ))
    }

    #[cfg(feature = "parallel")]
    fn step(&mut self) -> TickReport {
        if self.options.parallel {
            self.flock.advance_parallel()
        } else {
            self.flock.advance()
        }
    }

    #[cfg(not(feature = "parallel"))]
    fn step(&mut self) -> TickReport {
        self.flock.advance()
    }
}
