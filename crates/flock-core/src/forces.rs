//! Force fields and the archetypes that carry them.
//!
//! A [`Force`] binds one field's source charge to that field's [`Action`]. Actions only ever
//! accumulate into the acceleration they are handed, so the order in which [`Forces::act`]
//! visits the fields does not change the result.

use crate::charges::{Charge, Charges, Field};
use crate::neighbourhood::Neighbourhood;
use crate::space::{MetricSpace2D, SpaceError, Vector};
use serde::{Deserialize, Serialize};

/// How a field turns a neighbourhood into acceleration.
///
/// `d_j` below is the geodesic displacement from neighbour `j` to the owner and `q` the
/// effective charge (source charge times subject sensitivity).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    /// `q * Σ d_j / |d_j|²`. Coincident neighbours have no direction and are skipped.
    Separation,
    /// `q * -mean(d_j)`: toward the neighbourhood centroid.
    Cohesion,
    /// `q * (mean(v_j) - v_owner)`: toward the neighbourhood's mean velocity.
    Alignment,
}

impl Action {
    pub fn for_field(field: Field) -> Self {
        match field {
            Field::Separation => Action::Separation,
            Field::Cohesion => Action::Cohesion,
            Field::Alignment => Action::Alignment,
        }
    }

    /// Accumulate this action's contribution into `acc`, which lives in `space`.
    pub fn act(
        self,
        space: &MetricSpace2D,
        acc: &mut Vector,
        neighbourhood: &Neighbourhood,
        q: Charge,
    ) -> Result<(), SpaceError> {
        space.check(acc)?;
        if q == 0.0 || neighbourhood.is_empty() {
            return Ok(());
        }
        let contribution = match self {
            Action::Separation => separation(space, neighbourhood)?,
            Action::Cohesion => cohesion(space, neighbourhood)?,
            Action::Alignment => alignment(space, neighbourhood)?,
        };
        acc.accumulate(space, &[contribution.times(space, q)?])?;
        Ok(())
    }
}

fn separation(space: &MetricSpace2D, neighbourhood: &Neighbourhood) -> Result<Vector, SpaceError> {
    let terms: Vec<Vector> = neighbourhood
        .displacements()
        .iter()
        .filter_map(|d| {
            let [dx, dy] = d.components();
            let squared = dx * dx + dy * dy;
            (squared > 0.0).then(|| space.vector(dx / squared, dy / squared))
        })
        .collect();
    let mut total = space.zero();
    total.accumulate(space, &terms)?;
    Ok(total)
}

fn cohesion(space: &MetricSpace2D, neighbourhood: &Neighbourhood) -> Result<Vector, SpaceError> {
    let terms: Vec<Vector> = neighbourhood
        .displacements()
        .iter()
        .map(|d| space.rebase(d))
        .collect();
    let mut centroid = space.zero();
    centroid
        .accumulate(space, &terms)?
        .scale(space, -1.0 / neighbourhood.population() as f64)?;
    Ok(centroid)
}

fn alignment(space: &MetricSpace2D, neighbourhood: &Neighbourhood) -> Result<Vector, SpaceError> {
    let mut mean = space.zero();
    mean.accumulate(space, neighbourhood.velocities())?
        .scale(space, 1.0 / neighbourhood.population() as f64)?;
    match neighbourhood.own_velocity() {
        Some(own) => mean.minus(space, own),
        None => Ok(mean),
    }
}

/// One field's source charge bound to that field's action.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Force {
    source: Charge,
    field: Field,
    action: Action,
}

impl Force {
    pub fn new(field: Field, source: Charge) -> Self {
        Self {
            source,
            field,
            action: Action::for_field(field),
        }
    }

    pub fn field(&self) -> Field {
        self.field
    }

    pub fn source(&self) -> Charge {
        self.source
    }

    pub fn action(&self) -> Action {
        self.action
    }

    /// Act on a subject with the given sensitivity to this field.
    pub fn apply(
        &self,
        space: &MetricSpace2D,
        acc: &mut Vector,
        neighbourhood: &Neighbourhood,
        sensitivity: Charge,
    ) -> Result<(), SpaceError> {
        self.action
            .act(space, acc, neighbourhood, self.source * sensitivity)
    }
}

/// The action of a full set of source charges on another body.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Forces([Force; Field::COUNT]);

impl Forces {
    pub fn from_charges(source: &Charges) -> Self {
        Self(Field::ALL.map(|field| Force::new(field, source[field])))
    }

    pub fn get(&self, field: Field) -> &Force {
        &self.0[field.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Force> {
        self.0.iter()
    }

    pub fn source_charges(&self) -> Charges {
        let mut charges = Charges::zero();
        for force in &self.0 {
            charges.set(force.field, force.source);
        }
        charges
    }

    /// Accumulate every field's force on a subject with `sensitivities` into `acc`.
    pub fn act(
        &self,
        space: &MetricSpace2D,
        acc: &mut Vector,
        sensitivities: &Charges,
        neighbourhood: &Neighbourhood,
    ) -> Result<(), SpaceError> {
        for force in &self.0 {
            force.apply(space, acc, neighbourhood, sensitivities[force.field])?;
        }
        Ok(())
    }
}

/// An agent's behavioural identity: the forces it exerts and how strongly it feels each field.
/// Immutable once built and shared read-only by every agent of that kind.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "ArchetypeCharges", into = "ArchetypeCharges")]
pub struct Archetype {
    influence: Forces,
    sensitivity: Charges,
}

impl Archetype {
    pub fn new(influence: Charges, sensitivity: Charges) -> Self {
        Self {
            influence: Forces::from_charges(&influence),
            sensitivity,
        }
    }

    /// Influence and sensitivity are the same charges.
    pub fn define_reciprocal(charges: Charges) -> Self {
        Self::new(charges, charges)
    }

    pub fn influence(&self) -> &Forces {
        &self.influence
    }

    pub fn sensitivity(&self) -> &Charges {
        &self.sensitivity
    }

    pub fn is_finite(&self) -> bool {
        self.sensitivity.is_finite() && self.influence.source_charges().is_finite()
    }

    /// Accumulate this archetype's forces on its own sensitivities into `acc`.
    pub fn act(
        &self,
        space: &MetricSpace2D,
        acc: &mut Vector,
        neighbourhood: &Neighbourhood,
    ) -> Result<(), SpaceError> {
        self.influence
            .act(space, acc, &self.sensitivity, neighbourhood)
    }
}

impl Default for Archetype {
    /// Separation, cohesion and alignment all active at unit charge.
    fn default() -> Self {
        Self::define_reciprocal(Charges::uniform(1.0))
    }
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ArchetypeCharges {
    influence: Charges,
    sensitivity: Charges,
}

impl From<ArchetypeCharges> for Archetype {
    fn from(charges: ArchetypeCharges) -> Self {
        Archetype::new(charges.influence, charges.sensitivity)
    }
}

impl From<Archetype> for ArchetypeCharges {
    fn from(archetype: Archetype) -> Self {
        ArchetypeCharges {
            influence: archetype.influence.source_charges(),
            sensitivity: archetype.sensitivity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::GEOMETRY_TOLERANCE;
    use crate::space::Topology;

    struct Fixture {
        positions: MetricSpace2D,
        velocities: MetricSpace2D,
    }

    impl Fixture {
        fn new() -> Self {
            let mut topology = Topology::new();
            Self {
                positions: topology.euclidean_plane(),
                velocities: topology.euclidean_plane(),
            }
        }

        /// Neighbourhood of agent 0 over the given positions and velocities.
        fn neighbourhood(&self, positions: &[[f64; 2]], velocities: &[[f64; 2]]) -> Neighbourhood {
            let points: Vec<Vector> = positions
                .iter()
                .map(|p| self.positions.vector(p[0], p[1]))
                .collect();
            let displacements: Vec<Vector> = points
                .iter()
                .map(|p| points[0].minus(&self.positions, p).unwrap())
                .collect();
            let distances: Vec<f64> = displacements
                .iter()
                .map(|d| d.magnitude(&self.positions).unwrap())
                .collect();
            let v: Vec<Vector> = velocities
                .iter()
                .map(|v| self.velocities.vector(v[0], v[1]))
                .collect();
            let mut nb = Neighbourhood::new(0, points.len(), 10.0);
            nb.calculate_displacements(&displacements, &distances, &v);
            nb
        }

        fn act(&self, archetype: &Archetype, nb: &Neighbourhood) -> Vector {
            let mut acc = self.velocities.zero();
            archetype.act(&self.velocities, &mut acc, nb).unwrap();
            acc
        }
    }

    fn assert_close(v: &Vector, expected: [f64; 2]) {
        let [x, y] = v.components();
        assert!(
            (x - expected[0]).abs() < GEOMETRY_TOLERANCE && (y - expected[1]).abs() < GEOMETRY_TOLERANCE,
            "expected {expected:?}, got {:?}",
            v.components()
        );
    }

    #[test]
    fn separation_pushes_away_from_neighbours() {
        let f = Fixture::new();
        let nb = f.neighbourhood(&[[0.0, 0.0], [1.0, 0.0], [0.0, -2.0]], &[[0.0; 2]; 3]);
        let acc = f.act(&Archetype::define_reciprocal(Field::Separation.basis_charges(1.0)), &nb);
        assert_close(&acc, [-1.0, 0.5]);
    }

    #[test]
    fn separation_skips_coincident_neighbours() {
        let f = Fixture::new();
        let nb = f.neighbourhood(&[[3.0, 3.0], [3.0, 3.0]], &[[0.0; 2]; 2]);
        assert_eq!(nb.population(), 1);
        let acc = f.act(&Archetype::define_reciprocal(Field::Separation.basis_charges(1.0)), &nb);
        assert_close(&acc, [0.0, 0.0]);
    }

    #[test]
    fn cohesion_pulls_toward_centroid() {
        let f = Fixture::new();
        let nb = f.neighbourhood(&[[0.0, 0.0], [2.0, 0.0], [0.0, 2.0]], &[[0.0; 2]; 3]);
        let acc = f.act(&Archetype::define_reciprocal(Field::Cohesion.basis_charges(1.0)), &nb);
        assert_close(&acc, [1.0, 1.0]);
    }

    #[test]
    fn alignment_steers_toward_mean_velocity() {
        let f = Fixture::new();
        let nb = f.neighbourhood(
            &[[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]],
            &[[1.0, 1.0], [2.0, 0.0], [4.0, 0.0]],
        );
        let acc = f.act(&Archetype::define_reciprocal(Field::Alignment.basis_charges(2.0)), &nb);
        // mean velocity (3, 0), own (1, 1): steer (2, -1), effective charge 2 * 2
        assert_close(&acc, [8.0, -4.0]);
    }

    #[test]
    fn effective_charge_is_source_times_sensitivity() {
        let f = Fixture::new();
        let nb = f.neighbourhood(&[[0.0, 0.0], [2.0, 0.0]], &[[0.0; 2]; 2]);
        let unit = f.act(&Archetype::define_reciprocal(Field::Cohesion.basis_charges(1.0)), &nb);
        let mixed = f.act(
            &Archetype::new(
                Field::Cohesion.basis_charges(4.0),
                Field::Cohesion.basis_charges(0.25),
            ),
            &nb,
        );
        assert_eq!(unit, mixed);

        let deaf = Archetype::new(Charges::uniform(5.0), Charges::zero());
        assert_close(&f.act(&deaf, &nb), [0.0, 0.0]);
    }

    #[test]
    fn empty_neighbourhood_contributes_nothing() {
        let f = Fixture::new();
        let nb = f.neighbourhood(&[[0.0, 0.0], [100.0, 0.0]], &[[1.0, 0.0], [0.0, 0.0]]);
        assert!(nb.is_empty());
        let acc = f.act(&Archetype::define_reciprocal(Charges::uniform(3.0)), &nb);
        assert_eq!(acc, f.velocities.zero());
    }

    #[test]
    fn actions_accumulate_and_commute() {
        let f = Fixture::new();
        let nb = f.neighbourhood(
            &[[0.0, 0.0], [1.0, 2.0], [-3.0, 1.0]],
            &[[0.5, 0.5], [1.0, -1.0], [2.0, 0.0]],
        );
        let q = 0.7;
        let mut forward = f.velocities.vector(1.0, 1.0);
        for field in Field::ALL {
            Action::for_field(field)
                .act(&f.velocities, &mut forward, &nb, q)
                .unwrap();
        }
        let mut backward = f.velocities.vector(1.0, 1.0);
        for field in Field::ALL.iter().rev() {
            Action::for_field(*field)
                .act(&f.velocities, &mut backward, &nb, q)
                .unwrap();
        }
        assert_close(&forward, backward.components());
        assert_ne!(forward, f.velocities.vector(1.0, 1.0));
    }

    #[test]
    fn accumulator_from_another_space_is_rejected() {
        let f = Fixture::new();
        let nb = f.neighbourhood(&[[0.0, 0.0], [1.0, 0.0]], &[[0.0; 2]; 2]);
        let mut wrong = f.positions.zero();
        let result = Archetype::default().act(&f.velocities, &mut wrong, &nb);
        assert!(matches!(result, Err(SpaceError::Mismatch { .. })));
    }

    #[test]
    fn forces_round_trip_their_source_charges() {
        let charges = Charges::zero()
            .with(Field::Separation, 1.5)
            .with(Field::Alignment, -0.5);
        let forces = Forces::from_charges(&charges);
        assert_eq!(forces.source_charges(), charges);
        assert_eq!(forces.get(Field::Alignment).action(), Action::Alignment);
        assert_eq!(forces.iter().count(), Field::COUNT);
    }

    #[test]
    fn archetype_deserializes_from_named_charges() {
        let archetype: Archetype = serde_json::from_str(
            r#"{"influence": {"separation": 2.0}, "sensitivity": {"separation": 1.0, "cohesion": 1.0}}"#,
        )
        .unwrap();
        assert_eq!(archetype.influence().get(Field::Separation).source(), 2.0);
        assert_eq!(archetype.sensitivity()[Field::Cohesion], 1.0);
        assert_eq!(archetype.influence().get(Field::Cohesion).source(), 0.0);
    }
}
