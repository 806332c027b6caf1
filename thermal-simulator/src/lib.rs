//! Simulated printer for the thermal receipt store.
//!
//! Nothing talks to hardware. Creating a print job schedules a single delayed
//! transition to `completed` or `failed`, chosen by a weighted coin flip.
//!
//! # Seams
//!
//! - [`Scheduler`] - Where delayed transitions run ([`TokioScheduler`] in the
//!   server, [`ManualScheduler`] for explicit simulated time)
//! - [`OutcomeSource`] - How verdicts are drawn ([`RandomOutcomes`] with an
//!   80% success weight by default, [`ScriptedOutcomes`] to force results)
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use thermal_simulator::{PrintSimulator, RandomOutcomes, SimulatorSettings, TokioScheduler};
//! use thermal_store::PrintStore;
//!
//! #[tokio::main]
//! async fn main() {
//!     let simulator = PrintSimulator::new(
//!         PrintStore::new(),
//!         Arc::new(TokioScheduler),
//!         Arc::new(RandomOutcomes::new(0.8)),
//!         SimulatorSettings::default(),
//!     );
//!     let job = simulator.start_test_print().await;
//!     println!("started test print {}", job.id);
//! }
//! ```

mod error;
mod outcome;
mod scheduler;
mod simulator;

pub use error::SimulatorError;
pub use outcome::{OutcomeSource, RandomOutcomes, ScriptedOutcomes, Verdict};
pub use scheduler::{ManualScheduler, ScheduledTask, Scheduler, TokioScheduler};
pub use simulator::{PrintSimulator, SimulatorSettings};
