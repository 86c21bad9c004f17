use crate::helper_functions::masses_equal;

/// A commonly seen modification with its UniMod name and mass correction tag
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KnownModification {
    /// The UniMod (PSI-MS) name
    pub name: &'static str,
    /// The mass correction tag
    pub tag: &'static str,
    /// The monoisotopic mass shift
    pub mass: f64,
}

const fn known(name: &'static str, tag: &'static str, mass: f64) -> KnownModification {
    KnownModification { name, tag, mass }
}

/// Built in list of modifications that search tools report by name, and the tags used for them.
/// When multiple entries share a mass the first one is used when naming by mass.
pub const KNOWN_MODIFICATIONS: &[KnownModification] = &[
    known("Oxidation", "Plus1Oxy", 15.994_915),
    known("Dioxidation", "Plus2Oxy", 31.989_829),
    known("Trioxidation", "Plus3Oxy", 47.984_744),
    known("Carbamidomethyl", "IodoAcet", 57.021_464),
    known("Carboxymethyl", "IodoAcid", 58.005_479),
    known("Acetyl", "Acetyl", 42.010_565),
    known("Phospho", "Phosph", 79.966_331),
    known("Sulfo", "Sulfo", 79.956_815),
    known("Deamidated", "Deamide", 0.984_016),
    known("Amidated", "Amide", -0.984_016),
    known("Methyl", "Methyl", 14.015_650),
    known("Dimethyl", "DiMethyl", 28.031_300),
    known("Trimethyl", "TriMeth", 42.046_950),
    known("Gln->pyro-Glu", "NH3_Loss", -17.026_549),
    known("Ammonia-loss", "NH3_Loss", -17.026_549),
    known("Glu->pyro-Glu", "MinusH2O", -18.010_565),
    known("Dehydrated", "MinusH2O", -18.010_565),
    known("Carbamyl", "Carbamyl", 43.005_814),
    known("Formyl", "Formyl", 27.994_915),
    known("GG", "GlyGly", 114.042_927),
    known("Succinyl", "Succinyl", 100.016_044),
    known("Nitro", "NO2_Addn", 44.985_078),
    known("Cation:Na", "Plus_Na", 21.981_943),
    known("Biotin", "Biotinyl", 226.077_598),
    known("Hex", "Hexose", 162.052_824),
    known("HexNAc", "HexNAc", 203.079_373),
    known("TMT6plex", "TMT6Tag", 229.162_932),
    known("TMTpro", "TMT16Tag", 304.207_146),
    known("iTRAQ4plex", "itrac", 144.102_063),
    known("iTRAQ8plex", "iTRAQ8", 304.205_360),
    known("Label:13C(6)15N(2)", "Lys8", 8.014_199),
    known("Label:13C(6)15N(4)", "Arg10", 10.008_269),
    known("Cysteinyl", "Cystnyl", 119.004_099),
    known("Delta:H(2)C(2)", "Ethyl", 26.015_650),
    known("Ethyl", "Ethyl2", 28.031_300),
    known("Crotonyl", "Crotonyl", 68.026_215),
    known("Malonyl", "Malonyl", 86.000_394),
    known("Hydroxylation", "Hydroxy", 15.994_915),
    known("Pyro-carbamidomethyl", "PyroCmC", 39.994_915),
    known("Met-loss", "MetLoss", -131.040_485),
    known("Met-loss+Acetyl", "MetLsAc", -89.029_920),
];

/// Find a known modification by its UniMod name or mass correction tag, case insensitive
pub fn known_modification_by_name(name: &str) -> Option<&'static KnownModification> {
    let name = name.trim();
    KNOWN_MODIFICATIONS
        .iter()
        .find(|m| m.name.eq_ignore_ascii_case(name))
        .or_else(|| {
            KNOWN_MODIFICATIONS
                .iter()
                .find(|m| m.tag.eq_ignore_ascii_case(name))
        })
}

/// Find the first known modification with the given mass at the given precision
pub fn known_modification_by_mass(mass: f64, digits: u8) -> Option<&'static KnownModification> {
    KNOWN_MODIFICATIONS
        .iter()
        .find(|m| masses_equal(m.mass, mass, digits))
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc)]
mod tests {
    use super::*;
    use crate::modification::validate_mass_correction_tag;

    #[test]
    fn all_tags_valid() {
        for known in KNOWN_MODIFICATIONS {
            assert!(
                validate_mass_correction_tag(known.tag).is_ok(),
                "{}",
                known.tag
            );
        }
    }

    #[test]
    fn lookup() {
        assert_eq!(known_modification_by_name("oxidation").unwrap().tag, "Plus1Oxy");
        assert_eq!(known_modification_by_name("Plus1Oxy").unwrap().name, "Oxidation");
        assert_eq!(known_modification_by_mass(15.9949, 3).unwrap().tag, "Plus1Oxy");
        assert_eq!(known_modification_by_mass(-18.0106, 3).unwrap().tag, "MinusH2O");
        assert!(known_modification_by_name("NotAModification").is_none());
        assert!(known_modification_by_mass(123.456, 3).is_none());
    }
}
