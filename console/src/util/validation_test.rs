use super::*;

#[test]
fn required_trims_and_rejects_blank() {
    assert_eq!(required("  Acme  ", "x"), Ok("Acme".to_owned()));
    assert_eq!(required("   ", "El nombre es obligatorio."), Err("El nombre es obligatorio."));
}

#[test]
fn required_id_accepts_positive_integers_only() {
    assert_eq!(required_id("7", "m"), Ok(7));
    assert_eq!(required_id(" 12 ", "m"), Ok(12));
    assert_eq!(required_id("", "Selecciona una empresa."), Err("Selecciona una empresa."));
    assert_eq!(required_id("0", "m"), Err("m"));
    assert_eq!(required_id("abc", "m"), Err("m"));
}

#[test]
fn optional_id_maps_blank_to_none() {
    assert_eq!(optional_id("", "m"), Ok(None));
    assert_eq!(optional_id("4", "m"), Ok(Some(4)));
    assert_eq!(optional_id("x", "m"), Err("m"));
}

#[test]
fn non_negative_numbers() {
    assert_eq!(non_negative_int("0", "m"), Ok(0));
    assert_eq!(non_negative_int("-1", "m"), Err("m"));
    assert_eq!(non_negative_int("1.5", "m"), Err("m"));
    assert_eq!(non_negative_number("92.5", "m"), Ok(92.5));
    assert_eq!(non_negative_number("-0.1", "m"), Err("m"));
    assert_eq!(non_negative_number("NaN", "m"), Err("m"));
}

#[test]
fn email_shape() {
    assert!(is_valid_email("ana@acme.test"));
    assert!(is_valid_email(" rrhh@empresa.com.pe "));
    assert!(!is_valid_email("ana@acme"));
    assert!(!is_valid_email("ana@.test"));
    assert!(!is_valid_email("ana@acme."));
    assert!(!is_valid_email("@acme.test"));
    assert!(!is_valid_email("ana@@acme.test"));
    assert!(!is_valid_email("ana ruiz@acme.test"));
}

#[test]
fn iso_dates() {
    assert!(is_iso_date("1990-02-28"));
    assert!(!is_iso_date("1990-02-30"));
    assert!(!is_iso_date("28/02/1990"));
}

#[test]
fn cron_expressions() {
    assert!(is_cron_expression("0 8 * * 1"));
    assert!(is_cron_expression("*/15 8-18 * * MON-FRI"));
    assert!(!is_cron_expression("0 8 * *"));
    assert!(!is_cron_expression("0 8 * * 1 2026"));
    assert!(!is_cron_expression("0 8 * * $"));
}

#[test]
fn bool_parsing() {
    assert_eq!(parse_bool("Sí"), Some(true));
    assert_eq!(parse_bool("0"), Some(false));
    assert_eq!(parse_bool("maybe"), None);
}

#[test]
fn logo_mime_by_extension() {
    assert_eq!(mime_for("logo.PNG"), "image/png");
    assert_eq!(mime_for("foto.jpeg"), "image/jpeg");
    assert_eq!(mime_for("archivo"), "application/octet-stream");
}
