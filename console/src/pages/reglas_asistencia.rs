//! Attendance rules: per-company lateness threshold and overtime mode.

#[cfg(test)]
#[path = "reglas_asistencia_test.rs"]
mod reglas_asistencia_test;

use serde::Serialize;

use super::form::{EntityForm, FieldError, Form, json_body, validated};
use super::list::ListEntity;
use super::{Route, coded_cell};
use crate::net::api::action_path;
use crate::net::error::FormError;
use crate::net::transport::{Method, RequestBody};
use crate::net::types::{CalculoHorasExtra, ReglaAsistencia};
use crate::state::list_filter::Listable;
use crate::util::validation::{non_negative_int, required_id};

impl Listable for ReglaAsistencia {
    fn row_id(&self) -> i64 {
        self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.empresa_nombre.as_deref().unwrap_or_default()]
    }
}

impl ListEntity for ReglaAsistencia {
    const RESOURCE: &'static str = "reglas-asistencia";
    const LIST_PATH: &'static str = "/api/reglas-asistencia/";
    const ROUTE: Route = Route::ReglasAsistencia;
    const COLUMNS: &'static [&'static str] = &["Empresa", "Tardanza desde (min)", "Cálculo horas extra", "Acciones"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.empresa_nombre.clone().unwrap_or_else(|| "N/A".to_owned()),
            self.considera_tardanza_desde_min.to_string(),
            coded_cell(self.calculo_horas_extra, CalculoHorasExtra::from_code, CalculoHorasExtra::label),
            Self::actions_cell(),
        ]
    }

    fn display_name(&self) -> String {
        match &self.empresa_nombre {
            Some(empresa) => format!("la regla de {empresa}"),
            None => format!("la regla #{}", self.id),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReglaAsistenciaForm {
    pub empresa: String,
    pub considera_tardanza_desde_min: String,
    pub calculo_horas_extra: CalculoHorasExtra,
}

impl Default for ReglaAsistenciaForm {
    fn default() -> Self {
        Self {
            empresa: String::new(),
            considera_tardanza_desde_min: "0".to_owned(),
            calculo_horas_extra: CalculoHorasExtra::TopeDiario,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ReglaAsistenciaPayload {
    pub empresa: i64,
    pub considera_tardanza_desde_min: i64,
    pub calculo_horas_extra: CalculoHorasExtra,
}

#[derive(Debug, Serialize)]
struct ReglaAsistenciaUpdatePayload {
    considera_tardanza_desde_min: i64,
    calculo_horas_extra: CalculoHorasExtra,
}

impl Form for ReglaAsistenciaForm {
    type Payload = ReglaAsistenciaPayload;

    fn handle_change(&mut self, field: &str, value: &str) -> Result<(), FieldError> {
        match field {
            "empresa" | "empresa_id" => self.empresa = value.to_owned(),
            "considera_tardanza_desde_min" | "tardanza" => self.considera_tardanza_desde_min = value.to_owned(),
            "calculo_horas_extra" => {
                self.calculo_horas_extra =
                    CalculoHorasExtra::parse(value).ok_or_else(|| FieldError::invalid(field, value))?;
            }
            _ => return Err(FieldError::Unknown(field.to_owned())),
        }
        Ok(())
    }

    /// The threshold is checked before the company.
    fn validate(&self) -> Result<ReglaAsistenciaPayload, &'static str> {
        let tardanza =
            non_negative_int(&self.considera_tardanza_desde_min, "considera_tardanza_desde_min debe ser >= 0")?;
        let empresa = required_id(&self.empresa, "Selecciona una empresa")?;
        Ok(ReglaAsistenciaPayload {
            empresa,
            considera_tardanza_desde_min: tardanza,
            calculo_horas_extra: self.calculo_horas_extra,
        })
    }
}

impl EntityForm for ReglaAsistenciaForm {
    type Record = ReglaAsistencia;

    const RESOURCE: &'static str = "reglas-asistencia";
    const ROUTE: Route = Route::ReglasAsistencia;
    const CREATED: &'static str = "Regla creada";
    const UPDATED: &'static str = "Regla actualizada";
    const CREATE_FAILED: &'static str = "Error creando regla";
    const UPDATE_FAILED: &'static str = "Error actualizando";

    fn from_record(record: ReglaAsistencia) -> Self {
        Self {
            empresa: record.empresa.map(|id| id.to_string()).unwrap_or_default(),
            considera_tardanza_desde_min: record.considera_tardanza_desde_min.to_string(),
            calculo_horas_extra: record
                .calculo_horas_extra
                .and_then(CalculoHorasExtra::from_code)
                .unwrap_or(CalculoHorasExtra::TopeDiario),
        }
    }

    fn empresa_id(&self) -> Option<i64> {
        self.empresa.trim().parse().ok()
    }

    fn create_target() -> (Method, String) {
        (Method::Post, "/api/reglas-asistencia/crear/".to_owned())
    }

    fn update_target(id: i64) -> (Method, String) {
        (Method::Put, action_path(Self::RESOURCE, id, "actualizar"))
    }

    fn update_body(&self) -> Result<RequestBody, FormError> {
        let payload = validated(self.validate())?;
        json_body(&ReglaAsistenciaUpdatePayload {
            considera_tardanza_desde_min: payload.considera_tardanza_desde_min,
            calculo_horas_extra: payload.calculo_horas_extra,
        })
    }
}
