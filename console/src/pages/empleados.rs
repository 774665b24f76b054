//! Company employees: list, create and edit.
//!
//! The unit, position and manager selects are scoped to the selected
//! company; changing company empties them and reloads all three.

#[cfg(test)]
#[path = "empleados_test.rs"]
mod empleados_test;

use serde::Serialize;

use super::form::{EntityForm, FieldError, Form, json_body, validated};
use super::list::ListEntity;
use super::{Route, coded_cell, or_dash, or_na};
use crate::net::error::FormError;
use crate::net::transport::RequestBody;
use crate::net::types::{EmpleadoEmpresa, EstadoEmpleado};
use crate::state::list_filter::Listable;
use crate::state::lookups::LookupKind;
use crate::util::validation::{is_iso_date, optional_id, required, required_id};

impl Listable for EmpleadoEmpresa {
    fn row_id(&self) -> i64 {
        self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.nombres.as_str(),
            self.apellidos.as_str(),
            self.email.as_str(),
            self.empresa_nombre.as_deref().unwrap_or_default(),
            self.unidad_nombre.as_deref().unwrap_or_default(),
            self.puesto_nombre.as_deref().unwrap_or_default(),
        ]
    }

    fn status_label(&self) -> Option<&'static str> {
        self.estado().map(EstadoEmpleado::label)
    }
}

impl ListEntity for EmpleadoEmpresa {
    const RESOURCE: &'static str = "empleados-empresa";
    const LIST_PATH: &'static str = "/api/empleados-empresa/";
    const ROUTE: Route = Route::Empleados;
    const COLUMNS: &'static [&'static str] = &[
        "Nombres",
        "Apellidos",
        "Empresa",
        "Unidad",
        "Manager",
        "Puesto",
        "Email",
        "Teléfono",
        "Dirección",
        "Fecha nacimiento",
        "Fecha ingreso",
        "Estado",
        "Acciones",
    ];
    const TOGGLE: Option<&'static str> = Some("toggle-estado");

    fn cells(&self) -> Vec<String> {
        vec![
            self.nombres.clone(),
            self.apellidos.clone(),
            or_na(self.empresa_nombre.as_deref()),
            or_na(self.unidad_nombre.as_deref()),
            or_na(self.manager_nombre.as_deref()),
            or_na(self.puesto_nombre.as_deref()),
            self.email.clone(),
            or_dash(self.telefono.as_deref()),
            or_dash(self.direccion.as_deref()),
            or_na(self.fecha_nacimiento.as_deref()),
            or_na(self.fecha_ingreso.as_deref()),
            coded_cell(self.estado, EstadoEmpleado::from_code, EstadoEmpleado::label),
            Self::actions_cell(),
        ]
    }

    fn display_name(&self) -> String {
        format!("{} {}", self.nombres, self.apellidos).trim().to_owned()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EmpleadoForm {
    pub empresa_id: String,
    pub unidad_id: String,
    pub puesto_id: String,
    /// Optional; blank sends `null`.
    pub manager_id: String,
    pub nombres: String,
    pub apellidos: String,
    pub email: String,
    pub telefono: String,
    pub direccion: String,
    pub fecha_nacimiento: String,
    pub estado: EstadoEmpleado,
}

impl Default for EmpleadoForm {
    fn default() -> Self {
        Self {
            empresa_id: String::new(),
            unidad_id: String::new(),
            puesto_id: String::new(),
            manager_id: String::new(),
            nombres: String::new(),
            apellidos: String::new(),
            email: String::new(),
            telefono: String::new(),
            direccion: String::new(),
            fecha_nacimiento: String::new(),
            estado: EstadoEmpleado::Activo,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct EmpleadoPayload {
    pub empresa_id: i64,
    pub unidad_id: i64,
    pub puesto_id: i64,
    pub manager_id: Option<i64>,
    pub nombres: String,
    pub apellidos: String,
    pub email: String,
    pub telefono: String,
    pub direccion: String,
    pub fecha_nacimiento: String,
    pub estado: EstadoEmpleado,
}

/// The employee's company is fixed once created.
#[derive(Debug, Serialize)]
struct EmpleadoUpdatePayload {
    unidad_id: i64,
    puesto_id: i64,
    manager_id: Option<i64>,
    nombres: String,
    apellidos: String,
    email: String,
    telefono: String,
    direccion: String,
    fecha_nacimiento: String,
    estado: EstadoEmpleado,
}

impl Form for EmpleadoForm {
    type Payload = EmpleadoPayload;

    fn handle_change(&mut self, field: &str, value: &str) -> Result<(), FieldError> {
        let slot = match field {
            "empresa_id" => &mut self.empresa_id,
            "unidad_id" => &mut self.unidad_id,
            "puesto_id" => &mut self.puesto_id,
            "manager_id" => &mut self.manager_id,
            "nombres" => &mut self.nombres,
            "apellidos" => &mut self.apellidos,
            "email" => &mut self.email,
            "telefono" => &mut self.telefono,
            "direccion" => &mut self.direccion,
            "fecha_nacimiento" => &mut self.fecha_nacimiento,
            "estado" => {
                self.estado = EstadoEmpleado::parse(value).ok_or_else(|| FieldError::invalid(field, value))?;
                return Ok(());
            }
            _ => return Err(FieldError::Unknown(field.to_owned())),
        };
        value.clone_into(slot);
        Ok(())
    }

    fn validate(&self) -> Result<EmpleadoPayload, &'static str> {
        let empresa_id = required_id(&self.empresa_id, "Selecciona empresa.")?;
        let unidad_id = required_id(&self.unidad_id, "Selecciona unidad.")?;
        let puesto_id = required_id(&self.puesto_id, "Selecciona puesto.")?;
        let nombres = required(&self.nombres, "Nombres obligatorios.")?;
        let apellidos = required(&self.apellidos, "Apellidos obligatorios.")?;
        let email = required(&self.email, "Email obligatorio.")?;
        let telefono = required(&self.telefono, "Teléfono obligatorio.")?;
        let direccion = required(&self.direccion, "Dirección obligatoria.")?;
        let fecha_nacimiento = required(&self.fecha_nacimiento, "Fecha de nacimiento obligatoria.")?;
        if !is_iso_date(&fecha_nacimiento) {
            return Err("Fecha de nacimiento inválida (AAAA-MM-DD).");
        }
        let manager_id = optional_id(&self.manager_id, "Manager inválido.")?;

        Ok(EmpleadoPayload {
            empresa_id,
            unidad_id,
            puesto_id,
            manager_id,
            nombres,
            apellidos,
            email,
            telefono,
            direccion,
            fecha_nacimiento,
            estado: self.estado,
        })
    }
}

impl EntityForm for EmpleadoForm {
    type Record = EmpleadoEmpresa;

    const RESOURCE: &'static str = "empleados-empresa";
    const ROUTE: Route = Route::Empleados;
    const LOOKUPS: &'static [LookupKind] = &[LookupKind::Units, LookupKind::Positions, LookupKind::Employees];
    const CREATED: &'static str = "Empleado creado.";
    const UPDATED: &'static str = "Empleado actualizado.";
    const CREATE_FAILED: &'static str = "Error creando empleado.";
    const UPDATE_FAILED: &'static str = "Error actualizando empleado.";

    fn from_record(record: EmpleadoEmpresa) -> Self {
        let id = |value: Option<i64>| value.map(|id| id.to_string()).unwrap_or_default();
        Self {
            empresa_id: id(record.empresa_id),
            unidad_id: id(record.unidad_id),
            puesto_id: id(record.puesto_id),
            manager_id: id(record.manager_id),
            estado: record.estado().unwrap_or(EstadoEmpleado::Activo),
            nombres: record.nombres,
            apellidos: record.apellidos,
            email: record.email,
            telefono: record.telefono.unwrap_or_default(),
            direccion: record.direccion.unwrap_or_default(),
            fecha_nacimiento: record.fecha_nacimiento.unwrap_or_default(),
        }
    }

    fn empresa_id(&self) -> Option<i64> {
        self.empresa_id.trim().parse().ok()
    }

    fn reset_dependents(&mut self) {
        self.unidad_id.clear();
        self.puesto_id.clear();
        self.manager_id.clear();
    }

    fn update_body(&self) -> Result<RequestBody, FormError> {
        let payload = validated(self.validate())?;
        json_body(&EmpleadoUpdatePayload {
            unidad_id: payload.unidad_id,
            puesto_id: payload.puesto_id,
            manager_id: payload.manager_id,
            nombres: payload.nombres,
            apellidos: payload.apellidos,
            email: payload.email,
            telefono: payload.telefono,
            direccion: payload.direccion,
            fecha_nacimiento: payload.fecha_nacimiento,
            estado: payload.estado,
        })
    }
}
