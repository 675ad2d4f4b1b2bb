//! Application constants for the m.life processor
//!
//! This module contains section names, known parameter sets, datetime
//! formats, placeholder tokens and default policy values used throughout
//! the processor.

// =============================================================================
// Export Section Names
// =============================================================================

/// Export section names as they appear in `[...]` marker lines
pub mod sections {
    pub const VITALS: &str = "Vitalwerte";
    pub const LAB: &str = "Labor";
    pub const RESPIRATORY: &str = "Beatmung";
    pub const DEVICE: &str = "Geraete";
    pub const FLUID_BALANCE: &str = "Bilanz";
    pub const MEDICATION: &str = "Medikation";
    pub const PATIENT_INFO: &str = "Patientendaten";
    pub const DOCUMENTATION: &str = "Dokumentation";

    /// All section names recognized by the export parser
    pub const ALL: &[&str] = &[
        VITALS,
        LAB,
        RESPIRATORY,
        DEVICE,
        FLUID_BALANCE,
        MEDICATION,
        PATIENT_INFO,
        DOCUMENTATION,
    ];
}

// =============================================================================
// Categories and Known Parameters
// =============================================================================

/// Vitals sub-categories distinguishing monitor feed from manual entry
pub const VITALS_CATEGORIES: &[&str] = &["Vitalwerte online", "Vitalwerte manuell"];

/// Laboratory panels emitted by the export
pub const LAB_PANELS: &[&str] = &[
    "Blutgase arteriell",
    "Blutgase venoes",
    "Klinische Chemie",
    "Haematologie",
    "Gerinnung",
];

/// Fixed category for online respiratory settings
pub const RESPIRATORY_CATEGORY: &str = "Beatmung online";

/// Fixed category for medication administration events
pub const MEDICATION_CATEGORY: &str = "Medikation";

/// Fixed category for static patient data
pub const PATIENT_INFO_CATEGORY: &str = "Stammdaten";

/// Device categories (each names a connected device feed)
pub const DEVICE_CATEGORIES: &[&str] = &["Impella", "ECMO", "IABP", "Dialyse"];

/// Known parameter names per structured source type
pub mod parameters {
    pub const VITALS: &[&str] = &[
        "HF",
        "AF",
        "SpO2",
        "NIBP systolisch",
        "NIBP diastolisch",
        "NIBP Mittel",
        "ABP systolisch",
        "ABP diastolisch",
        "ABP Mittel",
        "ZVD",
        "Temperatur",
    ];

    pub const LAB: &[&str] = &[
        "pH",
        "pCO2",
        "pO2",
        "BE",
        "HCO3",
        "SO2",
        "Lactat",
        "Natrium",
        "Kalium",
        "Calcium",
        "Chlorid",
        "Glucose",
        "Haemoglobin",
        "Haematokrit",
        "Kreatinin",
        "Harnstoff",
        "CRP",
        "Leukozyten",
        "Thrombozyten",
        "Quick",
        "INR",
        "PTT",
    ];

    pub const RESPIRATORY: &[&str] = &[
        "FiO2",
        "PEEP",
        "AF",
        "Pinsp",
        "Pmax",
        "Vt",
        "AMV",
        "Compliance",
    ];

    pub const DEVICE: &[&str] = &[
        "HF",
        "ABP Mittel",
        "Fluss",
        "P-Niveau",
        "Drehzahl",
        "Blutfluss",
        "Gasfluss",
        "FiO2",
        "Sweep",
        "Augmentation",
        "Umsatz",
    ];

    pub const FLUID_BALANCE: &[&str] = &["Einfuhr", "Ausfuhr", "Bilanz"];
}

/// Documentation categories carrying free text with potentially sensitive
/// content; rows in these categories are eligible for entity recognition
pub const FREETEXT_CATEGORIES: &[&str] = &[
    "Arztnotizen",
    "Anamnese",
    "Visite",
    "Status",
    "Anaesthesieuebergabe",
    "Kardiotechnik (Notizen)",
    "Mikrobiologie",
    "Atmungstherapie",
    "Bronchoskopie",
    "Meilensteine",
    "Visite durchgefuehrt von",
    "weitere TeilnehmerInnen",
    "fachaerztliche Behandlungsleitung",
    "Anaesthesiepflege",
    "HK Befund",
    "Reanimation",
    "Intensivmedizin",
    "Operation/Datum/Operateur",
    "Therapieplanung Folgewoche/Ziele/Sonstiges",
    "Behandlungsergebnisse/akt. Situation",
];

/// Cross-source auto-mapped measurements: `(device_category,
/// device_parameter, vitals_parameter)`. A device row matching the first
/// two fields duplicates an interval-aggregated vitals row carrying the
/// third.
pub const AUTO_MAPPED_PARAMETERS: &[(&str, &str, &str)] = &[
    ("Impella", "HF", "HF"),
    ("Impella", "ABP Mittel", "ABP Mittel"),
];

// =============================================================================
// Timestamp Formats
// =============================================================================

/// Export timestamp format with seconds
pub const MLIFE_DATETIME_FORMAT: &str = "%d.%m.%Y %H:%M:%S";

/// Export timestamp format without seconds (the common case)
pub const MLIFE_DATETIME_FORMAT_SHORT: &str = "%d.%m.%Y %H:%M";

/// Output timestamp format; sorts lexically
pub const OUTPUT_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// =============================================================================
// Aggregation Policy Defaults
// =============================================================================

/// Vitals first-of-interval bucket length in minutes
pub const VITALS_INTERVAL_MINUTES: u32 = 60;

/// Minute offset at which hourly vitals buckets are stamped. Empirically
/// observed in exports; configurable via [`crate::Config`].
pub const DEFAULT_VITALS_OFFSET_MINUTES: u32 = 50;

/// Laboratory first-of-interval bucket length in minutes
pub const LAB_INTERVAL_MINUTES: u32 = 30;

/// Online respiratory settings bucket length in minutes
pub const RESPIRATORY_INTERVAL_MINUTES: u32 = 1;

/// Accepted fluid-balance summary window bounds in hours
pub const DEFAULT_FLUID_WINDOW_MIN_HOURS: i64 = 71;
pub const DEFAULT_FLUID_WINDOW_MAX_HOURS: i64 = 73;

// =============================================================================
// De-identification Defaults
// =============================================================================

/// Placeholder substituted for person names and blacklist matches
pub const PLACEHOLDER_ANONYM: &str = "<ANONYM>";

/// Placeholder substituted for phone numbers and email addresses
pub const PLACEHOLDER_KONTAKT: &str = "<KONTAKT>";

/// Minimum similarity percentage for a fuzzy blacklist match
pub const DEFAULT_FUZZY_THRESHOLD: f64 = 85.0;

/// Maximum token/term length difference considered for fuzzy comparison
pub const FUZZY_LENGTH_WINDOW: usize = 2;

/// Text values shorter than this are never scanned or modified
pub const MIN_REDACTION_TEXT_LEN: usize = 5;

/// Default per-field detection timeout in seconds (0 disables the bound)
pub const DEFAULT_DETECTION_TIMEOUT_SECS: u64 = 30;

/// Default blacklist filename looked up next to the working directory
pub const DEFAULT_BLACKLIST_FILENAME: &str = "blacklist.txt";

/// Default language model artifact filename
pub const DEFAULT_MODEL_FILENAME: &str = "de_clinical_lexicon.json";

// =============================================================================
// Reporting
// =============================================================================

/// Progress reporting update interval (number of processed rows)
pub const PROGRESS_UPDATE_INTERVAL: usize = 100;

// =============================================================================
// Helper Functions
// =============================================================================

/// Check whether a documentation category carries free text
pub fn is_freetext_category(category: &str) -> bool {
    FREETEXT_CATEGORIES.contains(&category)
}

/// Check whether a device parameter is auto-mapped into the vitals feed,
/// returning the vitals parameter name it duplicates
pub fn auto_mapped_vitals_parameter(
    device_category: &str,
    device_parameter: &str,
) -> Option<&'static str> {
    AUTO_MAPPED_PARAMETERS
        .iter()
        .find(|(cat, param, _)| *cat == device_category && *param == device_parameter)
        .map(|(_, _, vitals)| *vitals)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_freetext_category_lookup() {
        assert!(is_freetext_category("Arztnotizen"));
        assert!(is_freetext_category("Visite"));
        assert!(!is_freetext_category("Vitalwerte online"));
        assert!(!is_freetext_category(""));
    }

    #[test]
    fn test_auto_mapped_lookup() {
        assert_eq!(auto_mapped_vitals_parameter("Impella", "HF"), Some("HF"));
        assert_eq!(
            auto_mapped_vitals_parameter("Impella", "ABP Mittel"),
            Some("ABP Mittel")
        );
        assert_eq!(auto_mapped_vitals_parameter("Impella", "Fluss"), None);
        assert_eq!(auto_mapped_vitals_parameter("ECMO", "HF"), None);
    }

    #[test]
    fn test_section_names_complete() {
        assert_eq!(sections::ALL.len(), 8);
        assert!(sections::ALL.contains(&sections::VITALS));
        assert!(sections::ALL.contains(&sections::DOCUMENTATION));
    }

    #[test]
    fn test_auto_mapped_parameters_are_known() {
        for (category, device_param, vitals_param) in AUTO_MAPPED_PARAMETERS {
            assert!(DEVICE_CATEGORIES.contains(category));
            assert!(parameters::DEVICE.contains(device_param));
            assert!(parameters::VITALS.contains(vitals_param));
        }
    }
}
