#![warn(missing_docs)]
//! An ordered train of optical elements.
use std::fmt::Display;

use log::debug;
use serde::{Deserialize, Serialize};
use uom::{num_traits::Zero, si::f64::Length};

use crate::{
    element::OpticalElement,
    error::{BeamPathError, BpResult},
    ray_transfer_matrix::RayTransferMatrix,
};

/// The optical system a beam traverses.
///
/// An [`OpticalSystem`] is an ordered sequence of [`OpticalElement`]s in the order a ray physically encounters them.
/// Free-space gaps and lenses may be interleaved arbitrarily. A trailing free-space gap (propagation to an
/// observation plane) is permitted and typical.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpticalSystem {
    elements: Vec<OpticalElement>,
}
impl OpticalSystem {
    /// Creates a new [`OpticalSystem`] from the given elements.
    ///
    /// # Errors
    ///
    /// This function will return an error if one of the elements violates its invariants.
    pub fn new(elements: Vec<OpticalElement>) -> BpResult<Self> {
        let system = Self { elements };
        system.validate()?;
        Ok(system)
    }
    /// Creates an [`OpticalSystem`] from a list of optional element slots.
    ///
    /// Only the `Some(_)` slots are used (in their given order). This allows to switch elements on and off
    /// (e.g. a disabled lens) without modifying the remaining train.
    ///
    /// # Errors
    ///
    /// This function will return an error if one of the enabled elements violates its invariants.
    pub fn from_slots(slots: &[Option<OpticalElement>]) -> BpResult<Self> {
        let elements: Vec<OpticalElement> = slots.iter().flatten().copied().collect();
        debug!(
            "compacted {} slots into {} elements",
            slots.len(),
            elements.len()
        );
        Self::new(elements)
    }
    /// Append an element to the end of this [`OpticalSystem`].
    ///
    /// # Errors
    ///
    /// This function will return an error if the element violates its invariants. In this case the system is not modified.
    pub fn add_element(&mut self, element: OpticalElement) -> BpResult<&mut Self> {
        element.validate()?;
        self.elements.push(element);
        Ok(self)
    }
    /// Returns the elements of this [`OpticalSystem`].
    #[must_use]
    pub fn elements(&self) -> &[OpticalElement] {
        &self.elements
    }
    /// Returns `true` if this [`OpticalSystem`] contains no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
    /// Returns the number of free-space gaps of this [`OpticalSystem`].
    #[must_use]
    pub fn number_of_gaps(&self) -> usize {
        self.elements.iter().filter(|e| !e.is_lens()).count()
    }
    /// Returns the number of thin lenses of this [`OpticalSystem`].
    #[must_use]
    pub fn number_of_lenses(&self) -> usize {
        self.elements.iter().filter(|e| e.is_lens()).count()
    }
    /// Returns the total length of this [`OpticalSystem`] along the optical axis.
    #[must_use]
    pub fn total_length(&self) -> Length {
        self.elements
            .iter()
            .fold(Length::zero(), |sum, e| sum + e.axial_length())
    }
    /// Returns the ray-transfer matrix of the whole system.
    ///
    /// This is the ordered product `M_n * ... * M_2 * M_1` of all element matrices. An empty system yields the identity.
    ///
    /// # Errors
    ///
    /// This function will return an error if one of the elements violates its invariants.
    pub fn system_matrix(&self) -> BpResult<RayTransferMatrix> {
        self.elements
            .iter()
            .try_fold(RayTransferMatrix::identity(), |m, e| Ok(e.matrix()? * m))
    }
    /// Check all elements of this [`OpticalSystem`].
    ///
    /// # Errors
    ///
    /// This function will return an error naming the position of the first element violating its invariants.
    pub fn validate(&self) -> BpResult<()> {
        for (idx, element) in self.elements.iter().enumerate() {
            element.validate().map_err(|e| {
                BeamPathError::Element(format!("element #{idx} ({element:?}) is invalid: {e}"))
            })?;
        }
        Ok(())
    }
}
impl Display for OpticalSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.elements.is_empty() {
            return write!(f, "empty system");
        }
        let elements: Vec<String> = self.elements.iter().map(ToString::to_string).collect();
        write!(f, "{}", elements.join(" -> "))
    }
}
