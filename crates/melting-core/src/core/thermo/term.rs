use std::ops::{Add, AddAssign, Mul, Sub};

/// Gas constant in cal/(mol·K) shared by every formula of the crate.
pub const GAS_CONSTANT: f64 = 1.99;

/// Offset between degrees Celsius and Kelvin.
pub const KELVIN_OFFSET: f64 = 273.15;

/// An enthalpy (cal/mol) and entropy (cal/(mol·K)) contribution.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Thermodynamics {
    pub enthalpy: f64,
    pub entropy: f64,
}

impl Thermodynamics {
    pub fn new(enthalpy: f64, entropy: f64) -> Self {
        Self { enthalpy, entropy }
    }

    /// Free energy at `temperature` in Kelvin.
    #[inline]
    pub fn free_energy(&self, temperature: f64) -> f64 {
        self.enthalpy - temperature * self.entropy
    }
}

impl Add for Thermodynamics {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            enthalpy: self.enthalpy + rhs.enthalpy,
            entropy: self.entropy + rhs.entropy,
        }
    }
}

impl AddAssign for Thermodynamics {
    fn add_assign(&mut self, rhs: Self) {
        self.enthalpy += rhs.enthalpy;
        self.entropy += rhs.entropy;
    }
}

impl Sub for Thermodynamics {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self {
            enthalpy: self.enthalpy - rhs.enthalpy,
            entropy: self.entropy - rhs.entropy,
        }
    }
}

impl Mul<f64> for Thermodynamics {
    type Output = Self;

    fn mul(self, factor: f64) -> Self::Output {
        Self {
            enthalpy: self.enthalpy * factor,
            entropy: self.entropy * factor,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_sums_each_field_correctly() {
        let a = Thermodynamics::new(-7900.0, -22.2);
        let b = Thermodynamics::new(100.0, -2.8);
        assert_eq!(a + b, Thermodynamics::new(-7800.0, -25.0));
    }

    #[test]
    fn add_assign_accumulates_each_field_correctly() {
        let mut total = Thermodynamics::default();
        total += Thermodynamics::new(1.0, 2.0);
        total += Thermodynamics::new(4.0, 5.0);
        assert_eq!(total, Thermodynamics::new(5.0, 7.0));
    }

    #[test]
    fn scaling_multiplies_both_fields() {
        let per_pair = Thermodynamics::new(2300.0, 4.1);
        assert_eq!(per_pair * 2.0, Thermodynamics::new(4600.0, 8.2));
    }

    #[test]
    fn sub_with_itself_is_zero() {
        let value = Thermodynamics::new(-8400.0, -22.4);
        assert_eq!(value - value, Thermodynamics::default());
    }

    #[test]
    fn free_energy_uses_kelvin_temperature() {
        let value = Thermodynamics::new(-1000.0, -2.0);
        assert_eq!(value.free_energy(310.15), -1000.0 + 620.3);
    }
}
