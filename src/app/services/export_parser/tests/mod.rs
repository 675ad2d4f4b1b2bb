//! Test utilities for export parser testing
//!
//! Shared fixture builders used across the parser test modules.

mod parser_tests;

/// A small but complete export covering every section type
pub fn create_test_export() -> String {
    r#"# m.life Export Patient 4711
[Vitalwerte]
06.08.2024 14:50;Vitalwerte online;HF;82
06.08.2024 14:50;Vitalwerte online;SpO2;97
06.08.2024 15:50;Vitalwerte manuell;Temperatur;38,2

[Labor]
06.08.2024 14:30;Blutgase arteriell;pH;7,31
06.08.2024 14:30;Blutgase arteriell;Lactat;2,4

[Beatmung]
06.08.2024 14:59;FiO2;0,45
06.08.2024 14:59;PEEP;8

[Geraete]
06.08.2024 14:59;Impella;HF;84
06.08.2024 14:59;Impella;Fluss;3,1

[Bilanz]
03.08.2024 06:00;06.08.2024 06:00;Einfuhr;8450
03.08.2024 06:00;06.08.2024 06:00;Ausfuhr;7900

[Medikation]
06.08.2024 13:12;Noradrenalin;0,12 ug/kg/min

[Patientendaten]
06.08.2024 08:00;Station;WDA1I
06.08.2024 08:00;Groesse;182 cm

[Dokumentation]
06.08.2024 15:10;Visite;Patient wach und orientiert, Kreislauf stabil
"#
    .to_string()
}

/// An export with one malformed row per failure class
pub fn create_faulty_export() -> String {
    r#"[Vitalwerte]
gestern;Vitalwerte online;HF;82
06.08.2024 14:50;Vitalwerte online;Unbekannt;82
06.08.2024 14:50;Vitalwerte online;HF;schnell
06.08.2024 14:50;Vitalwerte online;HF;78

[Labor]
06.08.2024 14:30;Blutgase arteriell;pH
"#
    .to_string()
}
