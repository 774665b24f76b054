use super::*;

struct Row {
    id: i64,
    nombre: &'static str,
    email: &'static str,
    estado: Option<&'static str>,
}

impl Listable for Row {
    fn row_id(&self) -> i64 {
        self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.nombre, self.email]
    }

    fn status_label(&self) -> Option<&'static str> {
        self.estado
    }
}

fn rows() -> Vec<Row> {
    vec![
        Row { id: 1, nombre: "Ana Ruiz", email: "ana@acme.test", estado: Some("activo") },
        Row { id: 2, nombre: "Luis Paz", email: "luis@acme.test", estado: Some("baja") },
        Row { id: 3, nombre: "Sin Estado", email: "x@acme.test", estado: None },
    ]
}

fn ids(rows: &[Row]) -> Vec<i64> {
    rows.iter().map(Listable::row_id).collect()
}

#[test]
fn empty_filter_keeps_everything() {
    assert_eq!(ids(&ListFilter::default().apply(rows())), vec![1, 2, 3]);
}

#[test]
fn search_is_case_insensitive_over_all_fields() {
    let filter = ListFilter { search: "  LUIS ".to_owned(), ..Default::default() };
    assert_eq!(ids(&filter.apply(rows())), vec![2]);

    let filter = ListFilter { search: "acme.test".to_owned(), ..Default::default() };
    assert_eq!(ids(&filter.apply(rows())), vec![1, 2, 3]);
}

#[test]
fn status_filter_matches_label_and_excludes_unknown() {
    let filter = ListFilter { estado: Some("Activo".to_owned()), ..Default::default() };
    assert_eq!(ids(&filter.apply(rows())), vec![1]);
}

#[test]
fn blank_status_is_ignored() {
    let filter = ListFilter { estado: Some(" ".to_owned()), ..Default::default() };
    assert_eq!(ids(&filter.apply(rows())), vec![1, 2, 3]);
}

#[test]
fn search_and_status_combine() {
    let filter = ListFilter { search: "ana".to_owned(), estado: Some("baja".to_owned()), ..Default::default() };
    assert!(filter.apply(rows()).is_empty());
}
