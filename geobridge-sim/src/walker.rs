use geobridge_core::LocationSample;

// Rough conversion at mid latitudes, plenty for a simulated stroll
const DEGREES_PER_METER: f64 = 1.0 / 111_320.0;

/// A position model that wanders from an origin one bounded step at a time
#[derive(Debug, Clone)]
pub struct RandomWalk {
    position: LocationSample,
    step_meters: f64,
}

impl RandomWalk {
    pub fn new(origin: LocationSample, step_meters: f64) -> Self {
        Self {
            position: origin,
            step_meters,
        }
    }

    /// Take one step and return the new position
    pub fn step(&mut self) -> LocationSample {
        let max_degrees = self.step_meters * DEGREES_PER_METER;
        self.position.latitude += rand::random_range(-max_degrees..=max_degrees);
        self.position.longitude += rand::random_range(-max_degrees..=max_degrees);
        self.position.latitude = self.position.latitude.clamp(-90.0, 90.0);
        self.position.longitude = self.position.longitude.clamp(-180.0, 180.0);
        self.position
    }

    pub fn position(&self) -> LocationSample {
        self.position
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steps_are_bounded() {
        let origin = LocationSample::new(51.4769, -0.0005);
        let mut walk = RandomWalk::new(origin, 25.0);
        let max_degrees = 25.0 * DEGREES_PER_METER;

        let mut previous = origin;
        for _ in 0..100 {
            let next = walk.step();
            assert!((next.latitude - previous.latitude).abs() <= max_degrees);
            assert!((next.longitude - previous.longitude).abs() <= max_degrees);
            previous = next;
        }
    }

    #[test]
    fn position_tracks_latest_step() {
        let mut walk = RandomWalk::new(LocationSample::new(0.0, 0.0), 10.0);
        let stepped = walk.step();
        assert_eq!(walk.position(), stepped);
    }

    #[test]
    fn coordinates_stay_in_range() {
        // Start at a pole so clamping actually has to kick in
        let mut walk = RandomWalk::new(LocationSample::new(90.0, 180.0), 500.0);
        for _ in 0..50 {
            let next = walk.step();
            assert!(next.latitude <= 90.0 && next.latitude >= -90.0);
            assert!(next.longitude <= 180.0 && next.longitude >= -180.0);
        }
    }
}
