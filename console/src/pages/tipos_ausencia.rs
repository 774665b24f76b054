//! Absence types per company (vacation, sick leave, ...).

#[cfg(test)]
#[path = "tipos_ausencia_test.rs"]
mod tipos_ausencia_test;

use serde::Serialize;

use super::form::{EntityForm, FieldError, Form, json_body, validated};
use super::list::ListEntity;
use super::{Route, yes_no};
use crate::net::error::FormError;
use crate::net::transport::RequestBody;
use crate::net::types::TipoAusencia;
use crate::state::list_filter::Listable;
use crate::util::validation::{parse_bool, required, required_id};

impl Listable for TipoAusencia {
    fn row_id(&self) -> i64 {
        self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.nombre.as_str(), self.empresa_nombre.as_deref().unwrap_or_default()]
    }
}

impl ListEntity for TipoAusencia {
    const RESOURCE: &'static str = "tipos-ausencias";
    const LIST_PATH: &'static str = "/api/tipos-ausencias/";
    const ROUTE: Route = Route::TiposAusencia;
    const COLUMNS: &'static [&'static str] = &["Nombre", "Empresa", "Afecta sueldo", "Requiere soporte", "Acciones"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.nombre.clone(),
            self.empresa_nombre.clone().unwrap_or_else(|| "N/A".to_owned()),
            yes_no(self.afecta_sueldo),
            yes_no(self.requiere_soporte),
            Self::actions_cell(),
        ]
    }

    fn display_name(&self) -> String {
        self.nombre.clone()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TipoAusenciaForm {
    pub empresa: String,
    pub nombre: String,
    pub afecta_sueldo: bool,
    pub requiere_soporte: bool,
}

#[derive(Debug, Serialize)]
pub struct TipoAusenciaPayload {
    pub empresa: i64,
    pub nombre: String,
    pub afecta_sueldo: bool,
    pub requiere_soporte: bool,
}

#[derive(Debug, Serialize)]
struct TipoAusenciaUpdatePayload {
    nombre: String,
    afecta_sueldo: bool,
    requiere_soporte: bool,
}

impl Form for TipoAusenciaForm {
    type Payload = TipoAusenciaPayload;

    fn handle_change(&mut self, field: &str, value: &str) -> Result<(), FieldError> {
        let flag = || parse_bool(value).ok_or_else(|| FieldError::invalid(field, value));
        match field {
            "empresa" | "empresa_id" => self.empresa = value.to_owned(),
            "nombre" => self.nombre = value.to_owned(),
            "afecta_sueldo" => self.afecta_sueldo = flag()?,
            "requiere_soporte" => self.requiere_soporte = flag()?,
            _ => return Err(FieldError::Unknown(field.to_owned())),
        }
        Ok(())
    }

    fn validate(&self) -> Result<TipoAusenciaPayload, &'static str> {
        let empresa = required_id(&self.empresa, "Selecciona una empresa.")?;
        let nombre = required(&self.nombre, "El nombre es obligatorio.")?;
        Ok(TipoAusenciaPayload {
            empresa,
            nombre,
            afecta_sueldo: self.afecta_sueldo,
            requiere_soporte: self.requiere_soporte,
        })
    }
}

impl EntityForm for TipoAusenciaForm {
    type Record = TipoAusencia;

    const RESOURCE: &'static str = "tipos-ausencias";
    const ROUTE: Route = Route::TiposAusencia;
    const CREATED: &'static str = "Tipo de ausencia creado";
    const UPDATED: &'static str = "Actualizado correctamente";
    const CREATE_FAILED: &'static str = "No se pudo crear";
    const UPDATE_FAILED: &'static str = "No se pudo actualizar";

    fn from_record(record: TipoAusencia) -> Self {
        Self {
            empresa: record.empresa.map(|id| id.to_string()).unwrap_or_default(),
            nombre: record.nombre,
            afecta_sueldo: record.afecta_sueldo,
            requiere_soporte: record.requiere_soporte,
        }
    }

    fn empresa_id(&self) -> Option<i64> {
        self.empresa.trim().parse().ok()
    }

    fn update_body(&self) -> Result<RequestBody, FormError> {
        let payload = validated(self.validate())?;
        json_body(&TipoAusenciaUpdatePayload {
            nombre: payload.nombre,
            afecta_sueldo: payload.afecta_sueldo,
            requiere_soporte: payload.requiere_soporte,
        })
    }
}
