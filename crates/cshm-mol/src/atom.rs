//! Atoms of a coordination complex

use lin_alg::f64::Vec3;

use crate::element::Element;
use crate::error::{AnalysisError, AnalysisResult};

/// An atom with its element and Cartesian position (Å)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Atom {
    pub element: Element,
    pub position: Vec3,
}

impl Atom {
    pub fn new(element: Element, position: Vec3) -> Self {
        Self { element, position }
    }

    /// Build from an element symbol, e.g. `Atom::from_symbol("Fe", 0.0, 0.0, 0.0)`
    pub fn from_symbol(symbol: &str, x: f64, y: f64, z: f64) -> AnalysisResult<Self> {
        let element = Element::from_symbol(symbol).ok_or_else(|| AnalysisError::InvalidElement(symbol.to_string()))?;
        Ok(Self::new(element, Vec3::new(x, y, z)))
    }

    #[inline]
    pub fn distance_to(&self, other: &Atom) -> f64 {
        (self.position - other.position).magnitude()
    }
}

/// Convert a position into the plain array form used by the shape solver
#[inline]
pub(crate) fn to_array(v: Vec3) -> [f64; 3] {
    [v.x, v.y, v.z]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_symbol() {
        let fe = Atom::from_symbol("Fe", 1.0, 2.0, 3.0).unwrap();
        assert_eq!(fe.element, Element::IRON);
        assert_eq!(to_array(fe.position), [1.0, 2.0, 3.0]);
        assert_eq!(
            Atom::from_symbol("Qq", 0.0, 0.0, 0.0),
            Err(AnalysisError::InvalidElement("Qq".to_string()))
        );
    }

    #[test]
    fn test_distance() {
        let a = Atom::new(Element::CARBON, Vec3::new(0.0, 0.0, 0.0));
        let b = Atom::new(Element::CARBON, Vec3::new(0.0, 3.0, 4.0));
        assert!((a.distance_to(&b) - 5.0).abs() < 1e-12);
    }
}
