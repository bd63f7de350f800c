//! # Robot Communication Simulation
//!
//! `rcs` decides whether two robots in a running simulation can talk
//! to each other, using one of four radio link models:
//!
//! - `distance`: closer than a threshold (m)
//! - `line_of_sight`: in view of each other
//! - `free_space_loss`: Friis path loss under a threshold (dB)
//! - `plm`: achievable data rate, read off precomputed path loss maps
//!
//! ```no_run
//! use rcs::{morse::Morse, LinkUpdate, RobotPair};
//!
//! let sim = Morse::connect("localhost", rcs::morse::DEFAULT_PORT)?;
//! let mut pair = RobotPair::builder(sim)
//!     .robots("robo1", "robo2")
//!     .specs(LinkUpdate::default().model("free_space_loss").freq(750.0))
//!     .build()?;
//! println!("{}", pair.can_communicate()?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod config;
mod error;
mod fspl;
mod model;
mod params;
mod pair;
mod sim;

pub use {
    crate::{
        config::{LinkConfig, LinkUpdate},
        error::{ParseModelError, PlmParamsError, RcsError, SimError},
        fspl::{free_space_loss, wavelength},
        model::{LinkModel, ModelKind, Verdict},
        params::{Band, PlmParams},
        pair::{RobotPair, RobotPairBuilder},
        sim::{find_pose_stream, Simulator},
    },
    geo, morse, plm,
};
