use super::*;

const COLUMNS: &[&str] = &["Código", "Nombre", "Acciones"];

fn render(item: &(i64, &str)) -> (i64, Vec<String>) {
    (item.0, vec![format!("K{}", item.0), item.1.to_owned(), "Editar | Eliminar".to_owned()])
}

#[test]
fn empty_ready_state_yields_single_spanning_placeholder() {
    let view = TableView::build(COLUMNS, &LoadState::<(i64, &str)>::Ready(vec![]), render);
    assert_eq!(view.rows, vec![TableRow::Placeholder { text: EMPTY_TEXT.to_owned(), col_span: 3 }]);
    assert_eq!(view.placeholder(), Some("No hay registros."));
}

#[test]
fn loading_and_idle_show_loading_placeholder() {
    for state in [LoadState::<(i64, &str)>::Idle, LoadState::Loading] {
        let view = TableView::build(COLUMNS, &state, render);
        assert_eq!(view.placeholder(), Some(LOADING_TEXT));
    }
}

#[test]
fn failure_shows_error_text_across_all_columns() {
    let view = TableView::build(COLUMNS, &LoadState::<(i64, &str)>::Failed("Error de conexión con el servidor.".to_owned()), render);
    assert_eq!(
        view.rows,
        vec![TableRow::Placeholder { text: "Error de conexión con el servidor.".to_owned(), col_span: COLUMNS.len() }]
    );
}

#[test]
fn ready_rows_render_one_cell_per_column() {
    let view = TableView::build(COLUMNS, &LoadState::Ready(vec![(1, "Puntualidad"), (2, "Ausentismo")]), render);
    assert_eq!(view.placeholder(), None);
    let rows: Vec<_> = view.data_rows().collect();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1].0, 2);
    assert_eq!(rows[1].1.len(), COLUMNS.len());
}

#[test]
fn to_text_pads_columns() {
    let view = TableView::build(COLUMNS, &LoadState::Ready(vec![(1, "Puntualidad")]), render);
    let text = view.to_text();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "Código  Nombre       Acciones");
    assert_eq!(lines[2], "K1      Puntualidad  Editar | Eliminar");
}

#[test]
fn to_text_prints_placeholder_below_header() {
    let view = TableView::build(COLUMNS, &LoadState::<(i64, &str)>::Ready(vec![]), render);
    assert_eq!(view.to_text().lines().last(), Some(EMPTY_TEXT));
}
