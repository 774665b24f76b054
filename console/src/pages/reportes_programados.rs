//! Scheduled reports: cron-driven exports mailed to a recipient list.

#[cfg(test)]
#[path = "reportes_programados_test.rs"]
mod reportes_programados_test;

use serde::Serialize;

use super::form::{EntityForm, FieldError, Form, json_body, validated};
use super::list::ListEntity;
use super::{Route, coded_cell, or_dash, yes_no};
use crate::net::error::FormError;
use crate::net::transport::RequestBody;
use crate::net::types::{FormatoReporte, ReporteProgramado, TipoReporte};
use crate::state::list_filter::Listable;
use crate::util::validation::{is_cron_expression, is_valid_email, parse_bool, required, required_id};

impl Listable for ReporteProgramado {
    fn row_id(&self) -> i64 {
        self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.nombre.as_str(), self.empresa_nombre.as_deref().unwrap_or_default()];
        fields.extend(self.destinatarios.iter().map(String::as_str));
        fields
    }

    fn status_label(&self) -> Option<&'static str> {
        Some(if self.activo { "activo" } else { "inactivo" })
    }
}

impl ListEntity for ReporteProgramado {
    const RESOURCE: &'static str = "reportes-programados";
    const LIST_PATH: &'static str = "/api/reportes-programados/";
    const ROUTE: Route = Route::ReportesProgramados;
    const COLUMNS: &'static [&'static str] =
        &["Nombre", "Empresa", "Tipo", "Frecuencia cron", "Formato", "Destinatarios", "Activo", "Acciones"];
    const TOGGLE: Option<&'static str> = Some("toggle-activo");

    fn cells(&self) -> Vec<String> {
        vec![
            self.nombre.clone(),
            or_dash(self.empresa_nombre.as_deref()),
            coded_cell(self.tipo, TipoReporte::from_code, TipoReporte::label),
            self.frecuencia_cron.clone(),
            coded_cell(self.formato, FormatoReporte::from_code, FormatoReporte::label),
            or_dash(Some(self.destinatarios.join(", ").as_str())),
            yes_no(self.activo),
            Self::actions_cell(),
        ]
    }

    fn display_name(&self) -> String {
        format!("el reporte {}", self.nombre)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReporteProgramadoForm {
    pub empresa_id: String,
    pub nombre: String,
    pub tipo: TipoReporte,
    pub frecuencia_cron: String,
    pub formato: FormatoReporte,
    pub destinatarios: Vec<String>,
    pub activo: bool,
}

impl Default for ReporteProgramadoForm {
    fn default() -> Self {
        Self {
            empresa_id: String::new(),
            nombre: String::new(),
            tipo: TipoReporte::Asistencia,
            frecuencia_cron: String::new(),
            formato: FormatoReporte::Csv,
            destinatarios: Vec::new(),
            activo: true,
        }
    }
}

impl ReporteProgramadoForm {
    /// Append a recipient; an address already listed is ignored.
    ///
    /// # Errors
    ///
    /// `"Correo inválido."` for anything that is not an email address.
    pub fn add_destinatario(&mut self, email: &str) -> Result<(), &'static str> {
        let email = email.trim();
        if !is_valid_email(email) {
            return Err("Correo inválido.");
        }
        if !self.destinatarios.iter().any(|d| d == email) {
            self.destinatarios.push(email.to_owned());
        }
        Ok(())
    }

    pub fn remove_destinatario(&mut self, email: &str) {
        let email = email.trim();
        self.destinatarios.retain(|d| d != email);
    }
}

#[derive(Debug, Serialize)]
pub struct ReporteProgramadoPayload {
    pub empresa: i64,
    pub nombre: String,
    pub tipo: TipoReporte,
    pub frecuencia_cron: String,
    pub formato: FormatoReporte,
    pub destinatarios: Vec<String>,
    pub activo: bool,
}

#[derive(Debug, Serialize)]
struct ReporteProgramadoUpdatePayload {
    nombre: String,
    tipo: TipoReporte,
    frecuencia_cron: String,
    formato: FormatoReporte,
    destinatarios: Vec<String>,
    activo: bool,
}

impl Form for ReporteProgramadoForm {
    type Payload = ReporteProgramadoPayload;

    fn handle_change(&mut self, field: &str, value: &str) -> Result<(), FieldError> {
        let invalid = || FieldError::invalid(field, value);
        match field {
            "empresa_id" | "empresa" => self.empresa_id = value.to_owned(),
            "nombre" => self.nombre = value.to_owned(),
            "tipo" => self.tipo = TipoReporte::parse(value).ok_or_else(invalid)?,
            "frecuencia_cron" => self.frecuencia_cron = value.to_owned(),
            "formato" => self.formato = FormatoReporte::parse(value).ok_or_else(invalid)?,
            "activo" => self.activo = parse_bool(value).ok_or_else(invalid)?,
            "destinatario" => self.add_destinatario(value).map_err(FieldError::Rejected)?,
            "quitar_destinatario" => self.remove_destinatario(value),
            _ => return Err(FieldError::Unknown(field.to_owned())),
        }
        Ok(())
    }

    fn validate(&self) -> Result<ReporteProgramadoPayload, &'static str> {
        let empresa = required_id(&self.empresa_id, "Selecciona empresa.")?;
        let nombre = required(&self.nombre, "Nombre obligatorio.")?;
        let frecuencia_cron = required(&self.frecuencia_cron, "Frecuencia cron obligatoria.")?;
        if !is_cron_expression(&frecuencia_cron) {
            return Err("Frecuencia cron inválida: usa 5 campos (min hora día mes día-semana).");
        }
        if self.destinatarios.is_empty() {
            return Err("Agrega al menos 1 destinatario.");
        }
        Ok(ReporteProgramadoPayload {
            empresa,
            nombre,
            tipo: self.tipo,
            frecuencia_cron,
            formato: self.formato,
            destinatarios: self.destinatarios.clone(),
            activo: self.activo,
        })
    }
}

impl EntityForm for ReporteProgramadoForm {
    type Record = ReporteProgramado;

    const RESOURCE: &'static str = "reportes-programados";
    const ROUTE: Route = Route::ReportesProgramados;
    const CREATED: &'static str = "Creado correctamente.";
    const UPDATED: &'static str = "Actualizado correctamente.";
    const CREATE_FAILED: &'static str = "Error creando reporte.";
    const UPDATE_FAILED: &'static str = "Error actualizando reporte.";

    fn from_record(record: ReporteProgramado) -> Self {
        Self {
            empresa_id: record.empresa.map(|id| id.to_string()).unwrap_or_default(),
            nombre: record.nombre,
            tipo: record.tipo.and_then(TipoReporte::from_code).unwrap_or(TipoReporte::Asistencia),
            frecuencia_cron: record.frecuencia_cron,
            formato: record.formato.and_then(FormatoReporte::from_code).unwrap_or(FormatoReporte::Csv),
            destinatarios: record.destinatarios,
            activo: record.activo,
        }
    }

    fn empresa_id(&self) -> Option<i64> {
        self.empresa_id.trim().parse().ok()
    }

    fn update_body(&self) -> Result<RequestBody, FormError> {
        let payload = validated(self.validate())?;
        json_body(&ReporteProgramadoUpdatePayload {
            nombre: payload.nombre,
            tipo: payload.tipo,
            frecuencia_cron: payload.frecuencia_cron,
            formato: payload.formato,
            destinatarios: payload.destinatarios,
            activo: payload.activo,
        })
    }
}
