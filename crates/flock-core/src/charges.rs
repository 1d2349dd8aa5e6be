use serde::{Deserialize, Serialize};
use std::ops::Index;

/// Label of one force acting in the simulation. Forces and charges are indexed by field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    /// Collision avoidance: pushes away from close neighbours.
    Separation,
    /// Pulls toward the neighbourhood centroid.
    Cohesion,
    /// Matches the neighbourhood's mean velocity.
    Alignment,
}

impl Field {
    pub const COUNT: usize = 3;
    pub const ALL: [Field; Field::COUNT] = [Field::Separation, Field::Cohesion, Field::Alignment];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Charges of `q` on this field and zero on every other.
    pub fn basis_charges(self, q: Charge) -> Charges {
        Charges::zero().with(self, q)
    }
}

/// Scalar strength associated with one field.
pub type Charge = f64;

/// Total mapping from [`Field`] to [`Charge`]. Every field is always present; missing entries
/// in serialized form default to zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "ChargeTable", into = "ChargeTable")]
pub struct Charges([Charge; Field::COUNT]);

impl Charges {
    pub fn zero() -> Self {
        Self([0.0; Field::COUNT])
    }

    pub fn uniform(q: Charge) -> Self {
        Self([q; Field::COUNT])
    }

    pub fn get(&self, field: Field) -> Charge {
        self.0[field.index()]
    }

    pub fn set(&mut self, field: Field, q: Charge) {
        self.0[field.index()] = q;
    }

    pub fn with(mut self, field: Field, q: Charge) -> Self {
        self.set(field, q);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, Charge)> + '_ {
        Field::ALL.iter().map(move |&field| (field, self.get(field)))
    }

    /// Replace every charge with `transform(field, charge)`.
    pub fn apply<F>(&mut self, mut transform: F) -> &mut Self
    where
        F: FnMut(Field, Charge) -> Charge,
    {
        for field in Field::ALL {
            self.0[field.index()] = transform(field, self.get(field));
        }
        self
    }

    /// Transform that adds these charges field-wise to whichever charges apply it:
    ///
    /// ```
    /// use flock_core::charges::{Charges, Field};
    /// let mut c = Field::Cohesion.basis_charges(1.0);
    /// c.apply(Field::Alignment.basis_charges(1.0).add());
    /// assert_eq!(c, Charges::zero().with(Field::Cohesion, 1.0).with(Field::Alignment, 1.0));
    /// ```
    pub fn add(&self) -> impl Fn(Field, Charge) -> Charge + '_ {
        move |field, q| q + self.get(field)
    }

    pub fn is_finite(&self) -> bool {
        self.0.iter().all(|q| q.is_finite())
    }
}

impl Index<Field> for Charges {
    type Output = Charge;

    fn index(&self, field: Field) -> &Charge {
        &self.0[field.index()]
    }
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ChargeTable {
    separation: Charge,
    cohesion: Charge,
    alignment: Charge,
}

impl From<ChargeTable> for Charges {
    fn from(table: ChargeTable) -> Self {
        Charges::zero()
            .with(Field::Separation, table.separation)
            .with(Field::Cohesion, table.cohesion)
            .with(Field::Alignment, table.alignment)
    }
}

impl From<Charges> for ChargeTable {
    fn from(charges: Charges) -> Self {
        ChargeTable {
            separation: charges[Field::Separation],
            cohesion: charges[Field::Cohesion],
            alignment: charges[Field::Alignment],
        }
    }
}
