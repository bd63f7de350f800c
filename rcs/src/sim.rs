use crate::error::SimError;
use geo::geometry::Coord;
use morse::Morse;

/// The queries a link model needs answered by the simulation.
pub trait Simulator {
    /// Names of every robot in the scene.
    fn list_robots(&mut self) -> Result<Vec<String>, SimError>;

    /// Names (`robot.component`) of every data stream.
    fn list_streams(&mut self) -> Result<Vec<String>, SimError>;

    /// Distance (m) between robots `a` and `b` and whether they are in
    /// line of sight of each other.
    fn distance_and_sight(&mut self, a: &str, b: &str) -> Result<(f64, bool), SimError>;

    /// Current position, in the scene's local frame, published on
    /// pose `stream`.
    fn position(&mut self, stream: &str) -> Result<Coord<f64>, SimError>;
}

impl Simulator for Morse {
    fn list_robots(&mut self) -> Result<Vec<String>, SimError> {
        Ok(Morse::list_robots(self)?)
    }

    fn list_streams(&mut self) -> Result<Vec<String>, SimError> {
        Ok(Morse::list_streams(self)?)
    }

    fn distance_and_sight(&mut self, a: &str, b: &str) -> Result<(f64, bool), SimError> {
        Ok(self.distance_and_view(a, b)?)
    }

    fn position(&mut self, stream: &str) -> Result<Coord<f64>, SimError> {
        let pose = self.pose(stream)?;
        Ok(Coord {
            x: pose.x,
            y: pose.y,
        })
    }
}

/// Returns the first of `streams` which is a pose sensor of `robot`.
///
/// A pose sensor stream is named `<robot>.<component>` where the
/// component contains "pose", in any case.
pub fn find_pose_stream<'a>(robot: &str, streams: &'a [String]) -> Option<&'a str> {
    streams
        .iter()
        .map(String::as_str)
        .find(|stream| match stream.split_once('.') {
            Some((owner, component)) => {
                owner == robot && component.to_ascii_lowercase().contains("pose")
            }
            None => false,
        })
}

#[cfg(test)]
mod tests {
    use super::find_pose_stream;

    fn streams() -> Vec<String> {
        [
            "robo1.motion",
            "robo10.pose",
            "robo1.Pose_Sensor",
            "robo1.pose2",
            "robo2.odometry",
            "robo2pose",
        ]
        .iter()
        .map(|s| (*s).to_owned())
        .collect()
    }

    #[test]
    fn test_find_pose_stream() {
        let streams = streams();
        assert_eq!(
            find_pose_stream("robo1", &streams),
            Some("robo1.Pose_Sensor")
        );
        assert_eq!(find_pose_stream("robo10", &streams), Some("robo10.pose"));
    }

    #[test]
    fn test_missing_pose_stream() {
        let streams = streams();
        assert_eq!(find_pose_stream("robo2", &streams), None);
        assert_eq!(find_pose_stream("robo3", &streams), None);
    }
}
