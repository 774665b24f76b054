//! Organizational units: a per-company tree of sites, areas and
//! departments. The parent select lists the company's other units.

#[cfg(test)]
#[path = "unidades_org_test.rs"]
mod unidades_org_test;

use serde::Serialize;

use super::form::{EntityForm, FieldError, Form, FormPage, json_body, validated};
use super::list::ListEntity;
use super::{Route, coded_cell, or_dash};
use crate::net::error::FormError;
use crate::net::transport::RequestBody;
use crate::net::types::{EstadoUnidad, LookupOption, TipoUnidad, UnidadOrganizacional};
use crate::state::list_filter::Listable;
use crate::state::lookups::LookupKind;
use crate::util::validation::{optional_id, required, required_id};

const SELF_PARENT: &str = "Una unidad no puede ser su propia unidad padre.";

impl Listable for UnidadOrganizacional {
    fn row_id(&self) -> i64 {
        self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.nombre.as_str(),
            self.ubicacion.as_str(),
            self.unidad_padre_nombre.as_deref().unwrap_or_default(),
            self.empresa_nombre.as_deref().unwrap_or_default(),
        ]
    }

    fn status_label(&self) -> Option<&'static str> {
        self.estado().map(EstadoUnidad::label)
    }
}

impl ListEntity for UnidadOrganizacional {
    const RESOURCE: &'static str = "unidades-organizacionales";
    const LIST_PATH: &'static str = "/api/unidades-organizacionales/";
    const ROUTE: Route = Route::UnidadesOrg;
    const COLUMNS: &'static [&'static str] = &[
        "Unidad Organizacional",
        "Unidad Organizacional Padre",
        "Nombre Empresa",
        "Tipo",
        "Ubicación",
        "Estado",
        "Acciones",
    ];
    const TOGGLE: Option<&'static str> = Some("toggle-estado");

    fn cells(&self) -> Vec<String> {
        vec![
            self.nombre.clone(),
            self.unidad_padre_nombre.clone().unwrap_or_else(|| "N/A".to_owned()),
            or_dash(self.empresa_nombre.as_deref()),
            coded_cell(self.tipo, TipoUnidad::from_code, TipoUnidad::label),
            or_dash(Some(self.ubicacion.as_str())),
            coded_cell(self.estado, EstadoUnidad::from_code, EstadoUnidad::label),
            Self::actions_cell(),
        ]
    }

    fn display_name(&self) -> String {
        format!("la unidad {}", self.nombre)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnidadOrgForm {
    /// Set when editing; a unit cannot become its own parent.
    pub editing_id: Option<i64>,
    pub empresa: String,
    pub unidad_padre: String,
    pub nombre: String,
    pub tipo: TipoUnidad,
    pub ubicacion: String,
    pub estado: EstadoUnidad,
}

impl Default for UnidadOrgForm {
    fn default() -> Self {
        Self {
            editing_id: None,
            empresa: String::new(),
            unidad_padre: String::new(),
            nombre: String::new(),
            tipo: TipoUnidad::Sede,
            ubicacion: String::new(),
            estado: EstadoUnidad::Activa,
        }
    }
}

/// Parent options for the form: the company's units minus the one being edited.
#[must_use]
pub fn parent_choices(page: &FormPage<UnidadOrgForm>) -> Vec<LookupOption> {
    let editing = page.form().editing_id;
    page.options(LookupKind::ParentUnits)
        .into_iter()
        .filter(|option| Some(option.id) != editing)
        .collect()
}

#[derive(Debug, Serialize)]
pub struct UnidadOrgPayload {
    pub empresa: i64,
    pub unidad_padre: Option<i64>,
    pub nombre: String,
    pub tipo: TipoUnidad,
    pub ubicacion: String,
}

/// Company is fixed after creation; status is only editable afterwards.
#[derive(Debug, Serialize)]
struct UnidadOrgUpdatePayload {
    unidad_padre: Option<i64>,
    nombre: String,
    tipo: TipoUnidad,
    ubicacion: String,
    estado: EstadoUnidad,
}

impl Form for UnidadOrgForm {
    type Payload = UnidadOrgPayload;

    fn handle_change(&mut self, field: &str, value: &str) -> Result<(), FieldError> {
        match field {
            "empresa" | "empresa_id" => self.empresa = value.to_owned(),
            "unidad_padre" => {
                if self.editing_id.is_some() && value.trim().parse().ok() == self.editing_id {
                    return Err(FieldError::Rejected(SELF_PARENT));
                }
                self.unidad_padre = value.to_owned();
            }
            "nombre" => self.nombre = value.to_owned(),
            "tipo" => self.tipo = TipoUnidad::parse(value).ok_or_else(|| FieldError::invalid(field, value))?,
            "ubicacion" => self.ubicacion = value.to_owned(),
            "estado" => self.estado = EstadoUnidad::parse(value).ok_or_else(|| FieldError::invalid(field, value))?,
            _ => return Err(FieldError::Unknown(field.to_owned())),
        }
        Ok(())
    }

    fn validate(&self) -> Result<UnidadOrgPayload, &'static str> {
        let empresa = required_id(&self.empresa, "Selecciona una empresa.")?;
        let unidad_padre = optional_id(&self.unidad_padre, "Unidad padre inválida.")?;
        if unidad_padre.is_some() && unidad_padre == self.editing_id {
            return Err(SELF_PARENT);
        }
        let nombre = required(&self.nombre, "El nombre es obligatorio.")?;
        let ubicacion = required(&self.ubicacion, "La ubicación es obligatoria.")?;
        Ok(UnidadOrgPayload { empresa, unidad_padre, nombre, tipo: self.tipo, ubicacion })
    }
}

impl EntityForm for UnidadOrgForm {
    type Record = UnidadOrganizacional;

    const RESOURCE: &'static str = "unidades-organizacionales";
    const ROUTE: Route = Route::UnidadesOrg;
    const LOOKUPS: &'static [LookupKind] = &[LookupKind::ParentUnits];
    const CREATED: &'static str = "Unidad creada";
    const UPDATED: &'static str = "Unidad actualizada";
    const CREATE_FAILED: &'static str = "No se pudo crear la unidad.";
    const UPDATE_FAILED: &'static str = "No se pudo actualizar la unidad.";

    fn from_record(record: UnidadOrganizacional) -> Self {
        Self {
            editing_id: Some(record.id),
            empresa: record.empresa.map(|id| id.to_string()).unwrap_or_default(),
            unidad_padre: record.unidad_padre.map(|id| id.to_string()).unwrap_or_default(),
            tipo: record.tipo.and_then(TipoUnidad::from_code).unwrap_or(TipoUnidad::Sede),
            estado: record.estado().unwrap_or(EstadoUnidad::Activa),
            nombre: record.nombre,
            ubicacion: record.ubicacion,
        }
    }

    fn empresa_id(&self) -> Option<i64> {
        self.empresa.trim().parse().ok()
    }

    fn reset_dependents(&mut self) {
        self.unidad_padre.clear();
    }

    fn update_body(&self) -> Result<RequestBody, FormError> {
        let payload = validated(self.validate())?;
        json_body(&UnidadOrgUpdatePayload {
            unidad_padre: payload.unidad_padre,
            nombre: payload.nombre,
            tipo: payload.tipo,
            ubicacion: payload.ubicacion,
            estado: self.estado,
        })
    }
}
