//! Companies (super-admin): list, create and edit.
//!
//! Company create/update is sent as `multipart/form-data` so a logo file can
//! ride along. Picking a country also fixes the currency.

#[cfg(test)]
#[path = "empresas_test.rs"]
mod empresas_test;

use serde::Serialize;

use super::form::{Attachment, EntityForm, FieldError, Form, validated};
use super::list::ListEntity;
use super::{Route, coded_cell};
use crate::net::api::item_path;
use crate::net::error::FormError;
use crate::net::transport::{FormPart, Method, RequestBody};
use crate::net::types::{Empresa, EstadoEmpresa, Pais};
use crate::state::list_filter::Listable;
use crate::util::validation::required;

impl Listable for Empresa {
    fn row_id(&self) -> i64 {
        self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.razon_social.as_str(), self.nombre_comercial.as_str(), self.ruc_nit.as_str()]
    }

    fn status_label(&self) -> Option<&'static str> {
        self.estado().map(EstadoEmpresa::label)
    }
}

impl ListEntity for Empresa {
    const RESOURCE: &'static str = "empresas";
    const LIST_PATH: &'static str = "/api/listado-empresas/";
    const ROUTE: Route = Route::Empresas;
    const COLUMNS: &'static [&'static str] =
        &["ID", "Razón social", "Nombre comercial", "RUC/NIT", "País", "Moneda", "Estado", "Acciones"];
    const TOGGLE: Option<&'static str> = Some("toggle-estado");

    fn cells(&self) -> Vec<String> {
        let pais = self.pais.and_then(Pais::by_id);
        vec![
            self.id.to_string(),
            self.razon_social.clone(),
            self.nombre_comercial.clone(),
            self.ruc_nit.clone(),
            pais.map_or_else(|| raw_or_dash(self.pais), |p| p.nombre.to_owned()),
            self.moneda
                .and_then(Pais::by_id)
                .map_or_else(|| raw_or_dash(self.moneda), |p| p.moneda.to_owned()),
            coded_cell(self.estado, EstadoEmpresa::from_code, EstadoEmpresa::label),
            Self::actions_cell(),
        ]
    }

    fn display_name(&self) -> String {
        self.razon_social.clone()
    }
}

fn raw_or_dash(code: Option<i64>) -> String {
    code.map_or_else(|| "-".to_owned(), |code| code.to_string())
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EmpresaForm {
    pub razon_social: String,
    pub nombre_comercial: String,
    pub ruc_nit: String,
    pub pais: Option<&'static Pais>,
    /// Only edited on existing companies; new ones start active server-side.
    pub estado: Option<EstadoEmpresa>,
    pub logo: Option<Attachment>,
    /// URL of the logo already stored, shown while no new file is picked.
    pub logo_actual: Option<String>,
}

#[derive(Debug, PartialEq, Serialize)]
pub struct EmpresaPayload {
    pub razon_social: String,
    pub nombre_comercial: String,
    pub ruc_nit: String,
    pub pais: i64,
    pub moneda: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estado: Option<EstadoEmpresa>,
}

impl EmpresaForm {
    /// Currency implied by the selected country.
    #[must_use]
    pub fn moneda(&self) -> Option<&'static str> {
        self.pais.map(|pais| pais.moneda)
    }

    fn multipart(&self) -> Result<RequestBody, FormError> {
        let payload = validated(self.validate())?;
        let mut parts = vec![
            FormPart::text("razon_social", payload.razon_social),
            FormPart::text("nombre_comercial", payload.nombre_comercial),
            FormPart::text("ruc_nit", payload.ruc_nit),
            FormPart::text("pais", payload.pais.to_string()),
            FormPart::text("moneda", payload.moneda.to_string()),
        ];
        if let Some(estado) = payload.estado {
            parts.push(FormPart::text("estado", estado.code().to_string()));
        }
        if let Some(logo) = &self.logo {
            parts.push(FormPart::File {
                name: "logo".to_owned(),
                filename: logo.filename.clone(),
                mime: logo.mime.clone(),
                bytes: logo.bytes.clone(),
            });
        }
        Ok(RequestBody::Multipart(parts))
    }
}

impl Form for EmpresaForm {
    type Payload = EmpresaPayload;

    fn handle_change(&mut self, field: &str, value: &str) -> Result<(), FieldError> {
        match field {
            "razon_social" => self.razon_social = value.to_owned(),
            "nombre_comercial" => self.nombre_comercial = value.to_owned(),
            "ruc_nit" => self.ruc_nit = value.to_owned(),
            "pais" => {
                // Unknown countries leave the previous selection untouched.
                if let Some(pais) = Pais::parse(value) {
                    self.pais = Some(pais);
                } else if !value.trim().is_empty() {
                    return Err(FieldError::invalid(field, value));
                }
            }
            "estado" => self.estado = Some(EstadoEmpresa::parse(value).ok_or_else(|| FieldError::invalid(field, value))?),
            _ => return Err(FieldError::Unknown(field.to_owned())),
        }
        Ok(())
    }

    fn validate(&self) -> Result<EmpresaPayload, &'static str> {
        let razon_social = required(&self.razon_social, "La razón social es obligatoria.")?;
        let nombre_comercial = required(&self.nombre_comercial, "El nombre comercial es obligatorio.")?;
        let ruc_nit = required(&self.ruc_nit, "El RUC/NIT es obligatorio.")?;
        let pais = self.pais.ok_or("Selecciona un país para asignar país y moneda.")?;
        Ok(EmpresaPayload {
            razon_social,
            nombre_comercial,
            ruc_nit,
            pais: pais.id,
            moneda: pais.moneda_id,
            estado: self.estado,
        })
    }
}

impl EntityForm for EmpresaForm {
    type Record = Empresa;

    const RESOURCE: &'static str = "empresas";
    const ROUTE: Route = Route::Empresas;
    const NEEDS_COMPANIES: bool = false;
    const CREATED: &'static str = "Empresa creada exitosamente";
    const UPDATED: &'static str = "Empresa actualizada correctamente";
    const CREATE_FAILED: &'static str = "Error al crear empresa.";
    const UPDATE_FAILED: &'static str = "Error al actualizar.";

    fn from_record(record: Empresa) -> Self {
        Self {
            pais: record.pais.and_then(Pais::by_id),
            estado: record.estado(),
            razon_social: record.razon_social,
            nombre_comercial: record.nombre_comercial,
            ruc_nit: record.ruc_nit,
            logo: None,
            logo_actual: record.logo,
        }
    }

    fn empresa_id(&self) -> Option<i64> {
        None
    }

    fn attach_file(&mut self, field: &str, file: Attachment) -> Result<(), FieldError> {
        if field != "logo" {
            return Err(FieldError::Unknown(field.to_owned()));
        }
        self.logo = Some(file);
        Ok(())
    }

    fn create_target() -> (Method, String) {
        (Method::Post, "/api/crear-empresa/".to_owned())
    }

    fn update_target(id: i64) -> (Method, String) {
        (Method::Put, item_path("actualizar-empresa", id))
    }

    fn create_body(&self) -> Result<RequestBody, FormError> {
        self.multipart()
    }
}
