//! KPI catalogue: list, create and edit.

#[cfg(test)]
#[path = "kpis_test.rs"]
mod kpis_test;

use serde::Serialize;

use super::form::{EntityForm, FieldError, Form, json_body, validated};
use super::list::ListEntity;
use super::{Route, coded_cell, or_dash};
use crate::net::error::FormError;
use crate::net::transport::RequestBody;
use crate::net::types::{Kpi, OrigenDatos, UnidadKpi};
use crate::state::list_filter::Listable;
use crate::util::validation::{required, required_id};

impl Listable for Kpi {
    fn row_id(&self) -> i64 {
        self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.codigo.as_str(), self.nombre.as_str(), self.empresa_nombre.as_deref().unwrap_or_default()]
    }
}

impl ListEntity for Kpi {
    const RESOURCE: &'static str = "kpis";
    const LIST_PATH: &'static str = "/api/kpis/";
    const ROUTE: Route = Route::Kpis;
    const COLUMNS: &'static [&'static str] =
        &["Código", "Nombre", "Empresa", "Descripción", "Unidad", "Origen datos", "Acciones"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.codigo.clone(),
            self.nombre.clone(),
            self.empresa_nombre.clone().unwrap_or_else(|| "N/A".to_owned()),
            or_dash(Some(self.descripcion.as_str())),
            coded_cell(self.unidad, UnidadKpi::from_code, UnidadKpi::label),
            coded_cell(self.origen_datos, OrigenDatos::from_code, OrigenDatos::label),
            Self::actions_cell(),
        ]
    }

    fn display_name(&self) -> String {
        format!("KPI {}", self.codigo)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KpiForm {
    pub empresa_id: String,
    pub codigo: String,
    pub nombre: String,
    pub descripcion: String,
    pub unidad: UnidadKpi,
    pub origen_datos: OrigenDatos,
}

impl Default for KpiForm {
    fn default() -> Self {
        Self {
            empresa_id: String::new(),
            codigo: String::new(),
            nombre: String::new(),
            descripcion: String::new(),
            unidad: UnidadKpi::Porcentaje,
            origen_datos: OrigenDatos::Asistencia,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct KpiPayload {
    pub empresa: i64,
    pub codigo: String,
    pub nombre: String,
    pub descripcion: String,
    pub unidad: UnidadKpi,
    pub origen_datos: OrigenDatos,
}

/// Edits keep the KPI's company; it is not sent.
#[derive(Debug, Serialize)]
struct KpiUpdatePayload {
    codigo: String,
    nombre: String,
    descripcion: String,
    unidad: UnidadKpi,
    origen_datos: OrigenDatos,
}

impl Form for KpiForm {
    type Payload = KpiPayload;

    fn handle_change(&mut self, field: &str, value: &str) -> Result<(), FieldError> {
        match field {
            "empresa_id" | "empresa" => self.empresa_id = value.to_owned(),
            "codigo" => self.codigo = value.to_owned(),
            "nombre" => self.nombre = value.to_owned(),
            "descripcion" => self.descripcion = value.to_owned(),
            "unidad" => self.unidad = UnidadKpi::parse(value).ok_or_else(|| FieldError::invalid(field, value))?,
            "origen_datos" => {
                self.origen_datos = OrigenDatos::parse(value).ok_or_else(|| FieldError::invalid(field, value))?;
            }
            _ => return Err(FieldError::Unknown(field.to_owned())),
        }
        Ok(())
    }

    fn validate(&self) -> Result<KpiPayload, &'static str> {
        let empresa = required_id(&self.empresa_id, "Selecciona una empresa.")?;
        let codigo = required(&self.codigo, "El código es obligatorio.")?;
        let nombre = required(&self.nombre, "El nombre es obligatorio.")?;
        Ok(KpiPayload {
            empresa,
            codigo,
            nombre,
            descripcion: self.descripcion.trim().to_owned(),
            unidad: self.unidad,
            origen_datos: self.origen_datos,
        })
    }
}

impl EntityForm for KpiForm {
    type Record = Kpi;

    const RESOURCE: &'static str = "kpis";
    const ROUTE: Route = Route::Kpis;
    const CREATED: &'static str = "KPI creado";
    const UPDATED: &'static str = "KPI actualizado";
    const CREATE_FAILED: &'static str = "No se pudo crear KPI";
    const UPDATE_FAILED: &'static str = "No se pudo actualizar KPI";

    fn from_record(record: Kpi) -> Self {
        Self {
            empresa_id: record.empresa.map(|id| id.to_string()).unwrap_or_default(),
            codigo: record.codigo,
            nombre: record.nombre,
            descripcion: record.descripcion,
            unidad: record.unidad.and_then(UnidadKpi::from_code).unwrap_or(UnidadKpi::Porcentaje),
            origen_datos: record.origen_datos.and_then(OrigenDatos::from_code).unwrap_or(OrigenDatos::Asistencia),
        }
    }

    fn empresa_id(&self) -> Option<i64> {
        self.empresa_id.trim().parse().ok()
    }

    fn update_body(&self) -> Result<RequestBody, FormError> {
        let payload = validated(self.validate())?;
        json_body(&KpiUpdatePayload {
            codigo: payload.codigo,
            nombre: payload.nombre,
            descripcion: payload.descripcion,
            unidad: payload.unidad,
            origen_datos: payload.origen_datos,
        })
    }
}
