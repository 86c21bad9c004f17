//! Reconciling the mass calculated from the annotated peptide with the masses reported by the search tool

use context_error::*;

use crate::{
    chemistry::{
        MassAdjustment, PeptideMassCalculator,
        constants::{ISOTOPE_CORRECTION_LIMIT, MASS_C13_DELTA},
        mass_to_ppm,
    },
    psm::SearchResult,
};

/// The smallest tolerance (in Da) between the calculated and reported mass
pub const MINIMAL_MASS_TOLERANCE: f64 = 0.1;

/// The number of residues of a peptide shown in mass mismatch warnings
const WARNING_PEPTIDE_LENGTH: usize = 27;

/// The outcome of reconciling one peptide
#[derive(Clone, Debug)]
pub struct MassReconciliation {
    /// The monoisotopic mass calculated from the peptide and its modifications
    pub computed_mass: f64,
    /// The isotope corrected mass difference between the observed and calculated mass
    pub delta_mass: f64,
    /// The delta mass in ppm of the calculated mass
    pub delta_mass_ppm: f64,
    /// The number of C13 isotopes that the precursor was corrected for, positive if the wrong
    /// isotope was heavier than the monoisotopic one
    pub isotope_error: i32,
    /// Set if the calculated mass and the mass reported by the search tool are too different
    pub warning: Option<BoxedError<'static, BasicKind>>,
}

/// The maximal difference allowed between the calculated and reported mass, 20 ppm with a floor
/// of [`MINIMAL_MASS_TOLERANCE`]
pub fn mass_tolerance(mass: f64) -> f64 {
    MINIMAL_MASS_TOLERANCE.max(mass / 50_000.0)
}

/// Correct a mass difference for the selection of the wrong isotope as precursor. Whole C13
/// steps are removed until the difference is within ±0.5 Da. Returns the corrected difference
/// and the number of C13 steps removed.
pub fn isotope_corrected_delta_mass(delta_mass: f64) -> (f64, i32) {
    if !delta_mass.is_finite() || delta_mass.abs() <= ISOTOPE_CORRECTION_LIMIT {
        return (delta_mass, 0);
    }
    let direction = delta_mass.signum();
    let magnitude = delta_mass.abs();
    #[allow(clippy::cast_possible_truncation)]
    let mut steps = ((magnitude - ISOTOPE_CORRECTION_LIMIT) / MASS_C13_DELTA).ceil() as i32;
    let mut corrected = f64::from(steps).mul_add(-MASS_C13_DELTA, magnitude);
    // Floating point error can leave the value just outside the window
    while corrected > ISOTOPE_CORRECTION_LIMIT {
        corrected -= MASS_C13_DELTA;
        steps += 1;
    }
    #[allow(clippy::cast_possible_truncation)]
    let sign = direction as i32;
    (direction * corrected, sign * steps)
}

/// Compute the isotope corrected delta mass and its ppm. If `adjust_precursor` is set and a
/// correction was applied the precursor mass is shifted by the corrected number of isotopes and
/// the delta mass is derived from that precursor mass.
pub fn compute_delm_corrected_ppm(
    delta_mass: f64,
    precursor_mass: f64,
    computed_mass: f64,
    adjust_precursor: bool,
) -> (f64, f64, i32) {
    let (mut corrected, isotope_error) = isotope_corrected_delta_mass(delta_mass);
    if adjust_precursor && isotope_error != 0 && precursor_mass.abs() > f64::EPSILON {
        let precursor = f64::from(isotope_error).mul_add(-MASS_C13_DELTA, precursor_mass);
        corrected = precursor - computed_mass;
    }
    (corrected, mass_to_ppm(corrected, computed_mass), isotope_error)
}

/// Reconcile the masses of a peptide. If the reported mass is not set (zero) the computed mass
/// is used in its place, no warning is generated in that case.
pub fn reconcile_mass(
    peptide: &str,
    computed_mass: f64,
    reported_mass: f64,
    precursor_mass: f64,
    adjust_precursor: bool,
) -> MassReconciliation {
    let reported_mass = if reported_mass.abs() < f64::EPSILON {
        computed_mass
    } else {
        reported_mass
    };
    let warning = ((computed_mass - reported_mass).abs() > mass_tolerance(computed_mass)).then(|| {
        let shown: String = peptide.chars().take(WARNING_PEPTIDE_LENGTH).collect();
        BoxedError::new(
            BasicKind::Warning,
            "Mass mismatch",
            format!(
                "The calculated mass ({computed_mass:.5}) and the mass reported by the search tool ({reported_mass:.5}) differ by more than {:.5} Da for peptide {shown}",
                mass_tolerance(computed_mass)
            ),
            Context::show(peptide.to_string()),
        )
    });
    let (delta_mass, delta_mass_ppm, isotope_error) = compute_delm_corrected_ppm(
        precursor_mass - computed_mass,
        precursor_mass,
        computed_mass,
        adjust_precursor,
    );
    MassReconciliation {
        computed_mass,
        delta_mass,
        delta_mass_ppm,
        isotope_error,
        warning,
    }
}

impl<Extra> SearchResult<Extra> {
    /// The mass adjustments of all annotated modifications
    pub fn mass_adjustments(&self) -> Vec<MassAdjustment> {
        self.modifications
            .iter()
            .map(|m| MassAdjustment {
                position: m.position,
                mass: m.definition.mass,
                affected_atom: m.definition.affected_atom,
            })
            .collect()
    }

    /// Calculate the monoisotopic mass of the annotated peptide
    pub fn compute_monoisotopic_mass(&self, calculator: &PeptideMassCalculator) -> f64 {
        calculator.compute_sequence_mass(&self.clean_sequence, &self.mass_adjustments())
    }

    /// Calculate the mass of the annotated peptide and store the computed mass and (isotope
    /// corrected) delta mass. A mass mismatch with the search tool is returned and stored as warning.
    pub fn reconcile_mass(
        &mut self,
        calculator: &PeptideMassCalculator,
        adjust_precursor: bool,
    ) -> MassReconciliation {
        let reconciliation = reconcile_mass(
            &self.clean_sequence,
            self.compute_monoisotopic_mass(calculator),
            self.reported_mass,
            self.precursor_mass,
            adjust_precursor,
        );
        self.computed_mass = reconciliation.computed_mass;
        self.delta_mass = reconciliation.delta_mass;
        self.delta_mass_ppm = reconciliation.delta_mass_ppm;
        if let Some(warning) = &reconciliation.warning {
            self.warnings.push(warning.clone());
        }
        reconciliation
    }
}
