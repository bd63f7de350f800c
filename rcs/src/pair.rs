use crate::{
    config::{LinkConfig, LinkUpdate},
    error::RcsError,
    fspl::free_space_loss,
    model::{LinkModel, Verdict},
    params::PlmParams,
    sim::{find_pose_stream, Simulator},
};
use log::{debug, error, info};
use plm::{MapSource, PlmDir};

/// Two robots sharing a radio link, and the model used to decide
/// whether they can communicate.
pub struct RobotPair<S> {
    sim: S,
    robots: [Robot; 2],
    config: LinkConfig,
    maps: Box<dyn MapSource>,
}

#[derive(Debug, Clone)]
struct Robot {
    name: String,

    /// Full (`robot.component`) name of this robot's pose stream.
    pose_stream: String,
}

impl<S> RobotPair<S>
where
    S: Simulator,
{
    /// Starts building a pair whose robots live in `sim`.
    pub fn builder(sim: S) -> RobotPairBuilder<S> {
        RobotPairBuilder {
            sim,
            robots: None,
            update: LinkUpdate::default(),
            maps: None,
        }
    }

    /// Evaluates the active model against the current state of the
    /// simulation.
    ///
    /// Simulator failures degrade to [`Verdict::Unavailable`]. Path
    /// loss map failures (unreadable rasters, robots outside their
    /// map) are returned as errors.
    pub fn can_communicate(&mut self) -> Result<Verdict, RcsError> {
        let verdict = match self.config.model() {
            LinkModel::Distance { threshold_m } => self.by_distance(threshold_m),
            LinkModel::LineOfSight => self.by_line_of_sight(),
            LinkModel::FreeSpaceLoss {
                frequency_mhz,
                threshold_db,
            } => self.by_free_space_loss(frequency_mhz, threshold_db),
            LinkModel::PathLossMap { params } => self.by_path_loss_map(&params)?,
        };
        Ok(verdict)
    }

    /// Applies `update` on top of the current configuration and logs
    /// the resulting model.
    pub fn set_model_specifications(&mut self, update: &LinkUpdate) {
        self.config = self.config.apply(update);

        let [a, b] = self.upper_names();
        info!(
            "communication model between '{a}' and '{b}': '{}'",
            self.config.model.as_str().to_uppercase()
        );
        match self.config.model() {
            LinkModel::Distance { threshold_m } => {
                info!("distance threshold (m): {threshold_m}");
            }
            LinkModel::LineOfSight => (),
            LinkModel::FreeSpaceLoss {
                frequency_mhz,
                threshold_db,
            } => {
                info!("frequency (MHz): {frequency_mhz}");
                info!("free space path loss threshold (dB): {threshold_db}");
            }
            LinkModel::PathLossMap { params } => {
                info!("path loss map parameters: {params}");
            }
        }
    }

    /// Returns the active model's name, or a description of the model
    /// and its parameters when `with_details` is set.
    pub fn get_model_specifications(&self, with_details: bool) -> String {
        if with_details {
            self.config.model().to_string()
        } else {
            self.config.model.as_str().to_owned()
        }
    }

    pub fn config(&self) -> &LinkConfig {
        &self.config
    }

    pub fn names(&self) -> [&str; 2] {
        [&self.robots[0].name, &self.robots[1].name]
    }

    pub fn simulator_mut(&mut self) -> &mut S {
        &mut self.sim
    }

    fn upper_names(&self) -> [String; 2] {
        [
            self.robots[0].name.to_uppercase(),
            self.robots[1].name.to_uppercase(),
        ]
    }

    /// Queries distance and line of sight, logging failures.
    fn distance_and_sight(&mut self) -> Option<(f64, bool)> {
        let [a, b] = &self.robots;
        match self.sim.distance_and_sight(&a.name, &b.name) {
            Ok(answer) => Some(answer),
            Err(e) => {
                error!("distance_and_view({}, {}): {e}", a.name, b.name);
                None
            }
        }
    }

    fn by_distance(&mut self, threshold_m: f64) -> Verdict {
        let Some((distance, _)) = self.distance_and_sight() else {
            return Verdict::Unavailable;
        };
        let [a, b] = self.upper_names();
        let link = distance < threshold_m;
        if link {
            info!("'{a}' & '{b}' can communicate, because DISTANCE is: {distance:.2} (<{threshold_m})");
        } else {
            info!("'{a}' & '{b}' CANNOT communicate, because DISTANCE is: {distance:.2} (>={threshold_m})");
        }
        Verdict::Link(link)
    }

    fn by_line_of_sight(&mut self) -> Verdict {
        let Some((_, sight)) = self.distance_and_sight() else {
            return Verdict::Unavailable;
        };
        let [a, b] = self.upper_names();
        if sight {
            info!("'{a}' & '{b}' can communicate, because LINE-of-SIGHT is: {sight}");
        } else {
            info!("'{a}' & '{b}' CANNOT communicate, because LINE-of-SIGHT is: {sight}");
        }
        Verdict::Link(sight)
    }

    fn by_free_space_loss(&mut self, frequency_mhz: f64, threshold_db: f64) -> Verdict {
        let Some((distance, _)) = self.distance_and_sight() else {
            return Verdict::Unavailable;
        };
        let loss = free_space_loss(frequency_mhz, distance);
        let [a, b] = self.upper_names();
        let link = loss < threshold_db;
        if link {
            info!("'{a}' & '{b}' can communicate, because FREE SPACE LOSS is: {loss:.2} (<{threshold_db})");
        } else {
            info!("'{a}' & '{b}' CANNOT communicate, because FREE SPACE LOSS is: {loss:.2} (>={threshold_db})");
        }
        Verdict::Link(link)
    }

    fn by_path_loss_map(&mut self, params: &PlmParams) -> Result<Verdict, RcsError> {
        let mut losses = [0.0; 2];
        for (loss, robot) in losses.iter_mut().zip(&self.robots) {
            let map = self.maps.load(&robot.name)?;
            let position = match self.sim.position(&robot.pose_stream) {
                Ok(position) => position,
                Err(e) => {
                    error!("position of {}: {e}", robot.name);
                    return Ok(Verdict::Unavailable);
                }
            };
            *loss = f64::from(map.path_loss(position)?);
            debug!("{} at {position:?}: {loss} dB", robot.name);
        }

        let [pl_a, pl_b] = losses;
        let pl = if pl_a.is_nan() || pl_b.is_nan() {
            f64::NAN
        } else {
            pl_a.max(pl_b)
        };
        let [a, b] = self.upper_names();
        let rate = params.data_rate(pl).unwrap_or_else(|| {
            error!(
                "the maximum path loss between {a} & {b} is {pl}, \
                 there is no data rate condition for a negative path loss"
            );
            0.0
        });
        info!(
            "'{a}' & '{b}' have a data rate of {rate:.2} (Mb/s), \
             because the maximum path loss is: {pl:.2}"
        );
        Ok(Verdict::DataRate(rate))
    }
}

pub struct RobotPairBuilder<S> {
    sim: S,

    /// Names of both robots (required).
    robots: Option<[String; 2]>,

    /// Overrides applied to the default configuration.
    update: LinkUpdate,

    /// Where path loss maps are loaded from (defaults to the working
    /// directory).
    maps: Option<Box<dyn MapSource>>,
}

impl<S> RobotPairBuilder<S>
where
    S: Simulator,
{
    /// Names of both robots (required).
    #[must_use]
    pub fn robots<A, B>(mut self, a: A, b: B) -> Self
    where
        A: Into<String>,
        B: Into<String>,
    {
        self.robots = Some([a.into(), b.into()]);
        self
    }

    /// Configuration overrides (defaults to none).
    #[must_use]
    pub fn specs(mut self, update: LinkUpdate) -> Self {
        self.update = update;
        self
    }

    /// Where path loss maps are loaded from (defaults to
    /// `plm_<robot>.tif` files in the working directory).
    #[must_use]
    pub fn maps<M>(mut self, maps: M) -> Self
    where
        M: MapSource + 'static,
    {
        self.maps = Some(Box::new(maps));
        self
    }

    /// Verifies that both robots exist and have a pose sensor, then
    /// applies the configuration overrides.
    pub fn build(self) -> Result<RobotPair<S>, RcsError> {
        let RobotPairBuilder {
            mut sim,
            robots,
            update,
            maps,
        } = self;
        let [a, b] = robots.ok_or(RcsError::Builder("robots"))?;
        let maps: Box<dyn MapSource> = match maps {
            Some(maps) => maps,
            None => Box::new(PlmDir::new(".")),
        };

        let scene = sim.list_robots()?;
        for name in [&a, &b] {
            if !scene.contains(name) {
                error!("robot {name:?} does not exist in the current scene");
                return Err(RcsError::UnknownRobot(name.clone()));
            }
        }
        info!("robot names are correct");

        let streams = sim.list_streams()?;
        let discover = |name: String| match find_pose_stream(&name, &streams) {
            Some(stream) => {
                let pose_stream = stream.to_owned();
                Ok(Robot { name, pose_stream })
            }
            None => {
                error!("robot {name:?} was not configured with a pose sensor");
                Err(RcsError::MissingPose(name))
            }
        };
        let robots = [discover(a)?, discover(b)?];
        info!(
            "pose sensors found: {}, {}",
            robots[0].pose_stream, robots[1].pose_stream
        );

        let mut pair = RobotPair {
            sim,
            robots,
            config: LinkConfig::default(),
            maps,
        };
        pair.set_model_specifications(&update);
        Ok(pair)
    }
}
