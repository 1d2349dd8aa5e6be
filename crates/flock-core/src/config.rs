use crate::forces::Archetype;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Boundary behaviour of the position space.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TopologyKind {
    /// Both axes periodic: agents leaving one edge reappear at the opposite edge.
    #[default]
    Toroidal,
    /// Unbounded Euclidean plane.
    Planar,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScenarioConfig {
    /// Deterministic seed for initial placement.
    pub seed: u64,
    /// Boundary behaviour of the position space.
    pub topology: TopologyKind,
    /// Extent of the x axis in world units (circumference when toroidal).
    pub width: f64,
    /// Extent of the y axis in world units (circumference when toroidal).
    pub height: f64,
    /// Number of agents. Fixed for the lifetime of the scenario.
    pub population: usize,
    /// Simulation timestep (seconds in model time).
    pub dt: f64,
    /// Maximum speed clamp for agent velocity.
    pub max_speed: f64,
    /// Agents strictly closer than this are neighbours. On a torus it may not exceed half the
    /// smaller extent, so no neighbour sits at an antipode.
    pub neighbourhood_radius: f64,
    /// Draw initial velocities uniformly in a disc of radius `max_speed` instead of starting at rest.
    pub randomise_velocities: bool,
    /// Archetype shared by every agent.
    pub archetype: Archetype,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            topology: TopologyKind::Toroidal,
            width: 800.0,
            height: 400.0,
            population: 100,
            dt: 1.0 / 60.0,
            max_speed: 10.0,
            neighbourhood_radius: 50.0,
            randomise_velocities: true,
            archetype: Archetype::default(),
        }
    }
}

macro_rules! define_scenario_config_error {
    (
        $(
            $variant:ident $( { $($field:ident : $type:ty),* } )? => $fmt:literal $(, $arg:expr)*
        );* $(;)?
    ) => {
        #[derive(Debug, Clone, PartialEq)]
        pub enum ScenarioConfigError {
            $(
                $variant $( { $($field : $type),* } )?,
            )*
        }

        impl std::fmt::Display for ScenarioConfigError {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(
                        Self::$variant $( { $($field),* } )? => write!(f, $fmt $(, $arg)*),
                    )*
                }
            }
        }
    };
}

define_scenario_config_error! {
    InvalidPopulation => "population must be greater than 0";
    TooManyAgents { max: usize, actual: usize } => "Too many agents: {} > max {}", actual, max;
    InvalidWidth => "width must be positive and finite";
    InvalidHeight => "height must be positive and finite";
    WorldSizeTooLarge { max: f64, actual: f64 } => "world extent ({actual}) exceeds supported maximum ({max})";
    InvalidDt => "dt must be positive, finite and at least one nanosecond";
    InvalidMaxSpeed => "max_speed must be positive and finite";
    InvalidNeighbourhoodRadius => "neighbourhood_radius must be non-negative and finite";
    NeighbourhoodRadiusTooLarge { max: f64, actual: f64 } => "neighbourhood_radius ({actual}) exceeds half the smaller toroidal extent ({max})";
    InvalidArchetypeCharges => "archetype charges must be finite";
}

impl std::error::Error for ScenarioConfigError {}

impl ScenarioConfig {
    pub const MAX_WORLD_EXTENT: f64 = crate::constants::MAX_WORLD_EXTENT;

    pub const MAX_POPULATION: usize = crate::constants::MAX_POPULATION;

    pub fn validate(&self) -> Result<(), ScenarioConfigError> {
        self.validate_population()?;
        self.validate_world()?;
        self.validate_motion()?;
        self.validate_archetype()?;
        Ok(())
    }

    /// `dt` as a [`Duration`]. Only meaningful for a validated config.
    pub fn time_step(&self) -> Result<Duration, ScenarioConfigError> {
        Duration::try_from_secs_f64(self.dt)
            .ok()
            .filter(|step| !step.is_zero())
            .ok_or(ScenarioConfigError::InvalidDt)
    }

    /// Half the smaller world extent: the largest neighbourhood radius a torus admits.
    pub fn max_toroidal_radius(&self) -> f64 {
        self.width.min(self.height) / 2.0
    }

    fn validate_population(&self) -> Result<(), ScenarioConfigError> {
        if self.population == 0 {
            return Err(ScenarioConfigError::InvalidPopulation);
        }
        if self.population > Self::MAX_POPULATION {
            return Err(ScenarioConfigError::TooManyAgents {
                max: Self::MAX_POPULATION,
                actual: self.population,
            });
        }
        Ok(())
    }

    fn validate_world(&self) -> Result<(), ScenarioConfigError> {
        if !(self.width.is_finite() && self.width > 0.0) {
            return Err(ScenarioConfigError::InvalidWidth);
        }
        if !(self.height.is_finite() && self.height > 0.0) {
            return Err(ScenarioConfigError::InvalidHeight);
        }
        let extent = self.width.max(self.height);
        if extent > Self::MAX_WORLD_EXTENT {
            return Err(ScenarioConfigError::WorldSizeTooLarge {
                max: Self::MAX_WORLD_EXTENT,
                actual: extent,
            });
        }
        Ok(())
    }

    fn validate_motion(&self) -> Result<(), ScenarioConfigError> {
        self.time_step()?;
        if !(self.max_speed.is_finite() && self.max_speed > 0.0) {
            return Err(ScenarioConfigError::InvalidMaxSpeed);
        }
        if !(self.neighbourhood_radius.is_finite() && self.neighbourhood_radius >= 0.0) {
            return Err(ScenarioConfigError::InvalidNeighbourhoodRadius);
        }
        if self.topology == TopologyKind::Toroidal {
            let max = self.max_toroidal_radius();
            if self.neighbourhood_radius > max {
                return Err(ScenarioConfigError::NeighbourhoodRadiusTooLarge {
                    max,
                    actual: self.neighbourhood_radius,
                });
            }
        }
        Ok(())
    }

    fn validate_archetype(&self) -> Result<(), ScenarioConfigError> {
        if !self.archetype.is_finite() {
            return Err(ScenarioConfigError::InvalidArchetypeCharges);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charges::{Charges, Field};

    #[test]
    fn validate_accepts_default() {
        let config = ScenarioConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_invalid_extents() {
        let config = ScenarioConfig {
            width: -1.0,
            ..ScenarioConfig::default()
        };
        assert_eq!(config.validate(), Err(ScenarioConfigError::InvalidWidth));

        let config = ScenarioConfig {
            height: f64::NAN,
            ..ScenarioConfig::default()
        };
        assert_eq!(config.validate(), Err(ScenarioConfigError::InvalidHeight));

        let config = ScenarioConfig {
            width: ScenarioConfig::MAX_WORLD_EXTENT + 1.0,
            ..ScenarioConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ScenarioConfigError::WorldSizeTooLarge { .. })
        ));
    }

    #[test]
    fn validate_rejects_invalid_population() {
        let config = ScenarioConfig {
            population: 0,
            ..ScenarioConfig::default()
        };
        assert_eq!(config.validate(), Err(ScenarioConfigError::InvalidPopulation));

        let config = ScenarioConfig {
            population: ScenarioConfig::MAX_POPULATION + 1,
            ..ScenarioConfig::default()
        };
        match config.validate() {
            Err(ScenarioConfigError::TooManyAgents { .. }) => (),
            _ => panic!("Expected TooManyAgents error"),
        }
    }

    #[test]
    fn validate_rejects_invalid_motion() {
        for dt in [0.0, -0.1, f64::INFINITY, 1e-12] {
            let config = ScenarioConfig {
                dt,
                ..ScenarioConfig::default()
            };
            assert_eq!(config.validate(), Err(ScenarioConfigError::InvalidDt), "dt={dt}");
        }

        let config = ScenarioConfig {
            max_speed: 0.0,
            ..ScenarioConfig::default()
        };
        assert_eq!(config.validate(), Err(ScenarioConfigError::InvalidMaxSpeed));

        let config = ScenarioConfig {
            neighbourhood_radius: -1.0,
            ..ScenarioConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ScenarioConfigError::InvalidNeighbourhoodRadius)
        );
    }

    #[test]
    fn toroidal_radius_is_capped_at_half_the_smaller_extent() {
        let config = ScenarioConfig {
            width: 100.0,
            height: 60.0,
            neighbourhood_radius: 30.0,
            ..ScenarioConfig::default()
        };
        assert!(config.validate().is_ok());

        let config = ScenarioConfig {
            neighbourhood_radius: 30.5,
            ..config
        };
        assert_eq!(
            config.validate(),
            Err(ScenarioConfigError::NeighbourhoodRadiusTooLarge {
                max: 30.0,
                actual: 30.5
            })
        );

        let config = ScenarioConfig {
            topology: TopologyKind::Planar,
            ..config
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_non_finite_archetype() {
        let config = ScenarioConfig {
            archetype: Archetype::define_reciprocal(Field::Cohesion.basis_charges(f64::NAN)),
            ..ScenarioConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ScenarioConfigError::InvalidArchetypeCharges)
        );
    }

    #[test]
    fn time_step_matches_dt() {
        let config = ScenarioConfig {
            dt: 0.5,
            ..ScenarioConfig::default()
        };
        assert_eq!(config.time_step(), Ok(Duration::from_millis(500)));
    }

    #[test]
    fn partial_config_json_deserializes_with_defaults() {
        let json = r#"{
            "topology": "planar",
            "width": 100.0,
            "population": 3,
            "archetype": {"influence": {"separation": 1.0}, "sensitivity": {"separation": 1.0}}
        }"#;
        let cfg: ScenarioConfig = serde_json::from_str(json).expect("partial config should parse");
        assert_eq!(cfg.topology, TopologyKind::Planar);
        assert_eq!(cfg.width, 100.0);
        assert_eq!(cfg.height, 400.0);
        assert_eq!(cfg.population, 3);
        assert_eq!(cfg.seed, 42);
        assert!(cfg.randomise_velocities);
        assert_eq!(
            cfg.archetype,
            Archetype::define_reciprocal(Field::Separation.basis_charges(1.0))
        );
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn deserialize_rejects_unknown_topology() {
        let result = serde_json::from_str::<ScenarioConfig>(r#"{"topology": "klein_bottle"}"#);
        assert!(result.is_err(), "unknown topology should fail during deserialization");
    }

    #[test]
    fn default_config_round_trips_through_json() {
        let json = serde_json::to_string(&ScenarioConfig::default()).unwrap();
        let parsed: ScenarioConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, ScenarioConfig::default());
        assert_eq!(parsed.archetype.sensitivity(), &Charges::uniform(1.0));
    }

    #[test]
    fn error_display_messages_are_preserved() {
        let cases = vec![
            (
                ScenarioConfigError::InvalidPopulation,
                "population must be greater than 0",
            ),
            (
                ScenarioConfigError::TooManyAgents {
                    max: 100,
                    actual: 200,
                },
                "Too many agents: 200 > max 100",
            ),
            (
                ScenarioConfigError::InvalidWidth,
                "width must be positive and finite",
            ),
            (
                ScenarioConfigError::WorldSizeTooLarge {
                    max: 10.0,
                    actual: 20.0,
                },
                "world extent (20) exceeds supported maximum (10)",
            ),
            (
                ScenarioConfigError::InvalidMaxSpeed,
                "max_speed must be positive and finite",
            ),
            (
                ScenarioConfigError::NeighbourhoodRadiusTooLarge {
                    max: 25.0,
                    actual: 50.0,
                },
                "neighbourhood_radius (50) exceeds half the smaller toroidal extent (25)",
            ),
            (
                ScenarioConfigError::InvalidArchetypeCharges,
                "archetype charges must be finite",
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(err.to_string(), expected);
        }
    }
}
