//! Route-level page models.
//!
//! ARCHITECTURE
//! ============
//! `list` and `form` hold the generic list/create/edit machinery; each
//! entity module plugs its columns, fields, validation and endpoints into
//! it through `ListEntity` and `EntityForm`.


pub mod empleados;
pub mod empresas;
pub mod form;
pub mod kpis;
pub mod list;
pub mod login;
pub mod plantillas_kpi;
pub mod reglas_asistencia;
pub mod reportes_programados;
pub mod tipos_ausencia;
pub mod unidades_org;
pub mod usuarios;

pub use form::{EntityForm, FieldError, Form, FormMode, FormPage, SubmitOutcome};
pub use list::{ListEntity, ListPage};

/// Console screens a workflow can send the operator to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Route {
    Login,
    Empresas,
    Empleados,
    Kpis,
    PlantillasKpi,
    ReglasAsistencia,
    ReportesProgramados,
    TiposAusencia,
    UnidadesOrg,
    Usuarios,
}

impl Route {
    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            Self::Login => "/login",
            Self::Empresas => "/admin/empresas",
            Self::Empleados => "/admin/empleados",
            Self::Kpis => "/admin/kpis",
            Self::PlantillasKpi => "/admin/plantillas-kpi",
            Self::ReglasAsistencia => "/admin/reglas-asistencia",
            Self::ReportesProgramados => "/admin/reportes-programados",
            Self::TiposAusencia => "/admin/tipos-ausencias",
            Self::UnidadesOrg => "/admin/unidades-organizacionales",
            Self::Usuarios => "/admin/usuarios",
        }
    }

    #[must_use]
    pub fn create_path(self) -> String {
        format!("{}/crear", self.path())
    }

    #[must_use]
    pub fn edit_path(self, id: i64) -> String {
        format!("{}/editar/{id}", self.path())
    }
}

/// Yes/no cell text.
pub(crate) fn yes_no(value: bool) -> String {
    if value { "Sí" } else { "No" }.to_owned()
}

/// Cell text for an optional value, `-` when absent or blank.
pub(crate) fn or_dash(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(text) if !text.is_empty() => text.to_owned(),
        _ => "-".to_owned(),
    }
}

/// Cell text for an optional value, `N/A` when absent or blank.
pub(crate) fn or_na(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(text) if !text.is_empty() => text.to_owned(),
        _ => "N/A".to_owned(),
    }
}

/// Label for a coded column, falling back to the raw code.
pub(crate) fn coded_cell<E>(code: Option<i64>, decode: fn(i64) -> Option<E>, label: fn(E) -> &'static str) -> String {
    match code {
        Some(code) => decode(code).map_or_else(|| code.to_string(), |value| label(value).to_owned()),
        None => "-".to_owned(),
    }
}
