//! Per-section record parsing and schema validation
//!
//! Each function checks one export row against its source type's typed
//! contract: required fields present, numeric fields parse, the timestamp
//! parses under the export format, and names fall into the known sets.
//! A failed record yields a classified [`RecordError`]; it never aborts
//! the batch.

use super::field_parsers::{
    parse_decimal, parse_timestamp, require_field, require_known, require_text_tail,
};
use crate::app::models::{RawRecord, RecordError, SourceType};
use crate::constants::{
    parameters, DEVICE_CATEGORIES, FREETEXT_CATEGORIES, LAB_PANELS, MEDICATION_CATEGORY,
    PATIENT_INFO_CATEGORY, RESPIRATORY_CATEGORY, VITALS_CATEGORIES,
};

/// Parse one data row for the given source type
pub fn parse_record(
    source_type: SourceType,
    fields: &[&str],
    record_id: &str,
) -> Result<RawRecord, RecordError> {
    match source_type {
        SourceType::Vitals => parse_vitals(fields, record_id),
        SourceType::Lab => parse_lab(fields, record_id),
        SourceType::RespiratorySetting => parse_respiratory(fields, record_id),
        SourceType::Device => parse_device(fields, record_id),
        SourceType::FluidBalance => parse_fluid_balance(fields, record_id),
        SourceType::Medication => parse_medication(fields, record_id),
        SourceType::PatientInfo => parse_patient_info(fields, record_id),
        SourceType::Documentation => parse_documentation(fields, record_id),
    }
}

/// `Zeitpunkt;Kategorie;Parameter;Wert` with a numeric value
fn parse_vitals(fields: &[&str], record_id: &str) -> Result<RawRecord, RecordError> {
    let timestamp = parse_timestamp(require_field(fields, 0, "Zeitpunkt")?)?;
    let category = require_field(fields, 1, "Kategorie")?;
    let parameter = require_field(fields, 2, "Parameter")?;
    let value = require_field(fields, 3, "Wert")?;

    require_known(category, VITALS_CATEGORIES, || {
        RecordError::malformed_value(format!("unknown vitals category '{}'", category))
    })?;
    require_known(parameter, parameters::VITALS, || {
        RecordError::unknown_parameter(SourceType::Vitals, parameter)
    })?;
    let numeric = parse_decimal("Wert", value)?;

    Ok(RawRecord {
        source_type: SourceType::Vitals,
        record_id: record_id.to_string(),
        timestamp,
        window_end: None,
        category: category.to_string(),
        parameter: parameter.to_string(),
        value: value.to_string(),
        numeric_value: Some(numeric),
    })
}

/// `Zeitpunkt;Panel;Parameter;Wert` with a numeric value
fn parse_lab(fields: &[&str], record_id: &str) -> Result<RawRecord, RecordError> {
    let timestamp = parse_timestamp(require_field(fields, 0, "Zeitpunkt")?)?;
    let panel = require_field(fields, 1, "Panel")?;
    let parameter = require_field(fields, 2, "Parameter")?;
    let value = require_field(fields, 3, "Wert")?;

    require_known(panel, LAB_PANELS, || {
        RecordError::malformed_value(format!("unknown laboratory panel '{}'", panel))
    })?;
    require_known(parameter, parameters::LAB, || {
        RecordError::unknown_parameter(SourceType::Lab, parameter)
    })?;
    let numeric = parse_decimal("Wert", value)?;

    Ok(RawRecord {
        source_type: SourceType::Lab,
        record_id: record_id.to_string(),
        timestamp,
        window_end: None,
        category: panel.to_string(),
        parameter: parameter.to_string(),
        value: value.to_string(),
        numeric_value: Some(numeric),
    })
}

/// `Zeitpunkt;Parameter;Wert` with a numeric value; fixed category
fn parse_respiratory(fields: &[&str], record_id: &str) -> Result<RawRecord, RecordError> {
    let timestamp = parse_timestamp(require_field(fields, 0, "Zeitpunkt")?)?;
    let parameter = require_field(fields, 1, "Parameter")?;
    let value = require_field(fields, 2, "Wert")?;

    require_known(parameter, parameters::RESPIRATORY, || {
        RecordError::unknown_parameter(SourceType::RespiratorySetting, parameter)
    })?;
    let numeric = parse_decimal("Wert", value)?;

    Ok(RawRecord {
        source_type: SourceType::RespiratorySetting,
        record_id: record_id.to_string(),
        timestamp,
        window_end: None,
        category: RESPIRATORY_CATEGORY.to_string(),
        parameter: parameter.to_string(),
        value: value.to_string(),
        numeric_value: Some(numeric),
    })
}

/// `Zeitpunkt;Geraet;Parameter;Wert` with a numeric value
fn parse_device(fields: &[&str], record_id: &str) -> Result<RawRecord, RecordError> {
    let timestamp = parse_timestamp(require_field(fields, 0, "Zeitpunkt")?)?;
    let device = require_field(fields, 1, "Geraet")?;
    let parameter = require_field(fields, 2, "Parameter")?;
    let value = require_field(fields, 3, "Wert")?;

    require_known(device, DEVICE_CATEGORIES, || {
        RecordError::malformed_value(format!("unknown device '{}'", device))
    })?;
    require_known(parameter, parameters::DEVICE, || {
        RecordError::unknown_parameter(SourceType::Device, parameter)
    })?;
    let numeric = parse_decimal("Wert", value)?;

    Ok(RawRecord {
        source_type: SourceType::Device,
        record_id: record_id.to_string(),
        timestamp,
        window_end: None,
        category: device.to_string(),
        parameter: parameter.to_string(),
        value: value.to_string(),
        numeric_value: Some(numeric),
    })
}

/// `Beginn;Ende;Parameter;Wert`; the window itself is validated against the
/// configured duration bounds by the normalizer
fn parse_fluid_balance(fields: &[&str], record_id: &str) -> Result<RawRecord, RecordError> {
    let window_start = parse_timestamp(require_field(fields, 0, "Beginn")?)?;
    let window_end = parse_timestamp(require_field(fields, 1, "Ende")?)?;
    let parameter = require_field(fields, 2, "Parameter")?;
    let value = require_field(fields, 3, "Wert")?;

    if window_end <= window_start {
        return Err(RecordError::invalid_window(format!(
            "window end {} is not after start {}",
            window_end, window_start
        )));
    }
    require_known(parameter, parameters::FLUID_BALANCE, || {
        RecordError::unknown_parameter(SourceType::FluidBalance, parameter)
    })?;
    let numeric = parse_decimal("Wert", value)?;

    Ok(RawRecord {
        source_type: SourceType::FluidBalance,
        record_id: record_id.to_string(),
        timestamp: window_start,
        window_end: Some(window_end),
        category: "Bilanz".to_string(),
        parameter: parameter.to_string(),
        value: value.to_string(),
        numeric_value: Some(numeric),
    })
}

/// `Zeitpunkt;Medikament;Gabe`; open drug set, dose kept as structured text
fn parse_medication(fields: &[&str], record_id: &str) -> Result<RawRecord, RecordError> {
    let timestamp = parse_timestamp(require_field(fields, 0, "Zeitpunkt")?)?;
    let drug = require_field(fields, 1, "Medikament")?;
    let dose = require_text_tail(fields, 2, "Gabe")?;

    Ok(RawRecord {
        source_type: SourceType::Medication,
        record_id: record_id.to_string(),
        timestamp,
        window_end: None,
        category: MEDICATION_CATEGORY.to_string(),
        parameter: drug.to_string(),
        value: dose,
        numeric_value: None,
    })
}

/// `Zeitpunkt;Feld;Wert`; open field set, static patient data
fn parse_patient_info(fields: &[&str], record_id: &str) -> Result<RawRecord, RecordError> {
    let timestamp = parse_timestamp(require_field(fields, 0, "Zeitpunkt")?)?;
    let field = require_field(fields, 1, "Feld")?;
    let value = require_text_tail(fields, 2, "Wert")?;

    Ok(RawRecord {
        source_type: SourceType::PatientInfo,
        record_id: record_id.to_string(),
        timestamp,
        window_end: None,
        category: PATIENT_INFO_CATEGORY.to_string(),
        parameter: field.to_string(),
        value,
        numeric_value: None,
    })
}

/// `Zeitpunkt;Kategorie;Text`; category must be a known free-text category
fn parse_documentation(fields: &[&str], record_id: &str) -> Result<RawRecord, RecordError> {
    let timestamp = parse_timestamp(require_field(fields, 0, "Zeitpunkt")?)?;
    let category = require_field(fields, 1, "Kategorie")?;
    let text = require_text_tail(fields, 2, "Text")?;

    require_known(category, FREETEXT_CATEGORIES, || {
        RecordError::unknown_parameter(SourceType::Documentation, category)
    })?;

    Ok(RawRecord {
        source_type: SourceType::Documentation,
        record_id: record_id.to_string(),
        timestamp,
        window_end: None,
        category: category.to_string(),
        parameter: "Eintrag".to_string(),
        value: text,
        numeric_value: None,
    })
}
