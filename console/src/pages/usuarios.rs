//! Company user accounts: login identity linked to an employee and a role.
//!
//! Creation sets the initial password. Editing never sends the password
//! unless all three change fields (old, new, confirmation) are filled.

#[cfg(test)]
#[path = "usuarios_test.rs"]
mod usuarios_test;

use serde::Serialize;

use super::form::{EntityForm, FieldError, Form, json_body, validated};
use super::list::ListEntity;
use super::{Route, or_na, yes_no};
use crate::net::error::FormError;
use crate::net::transport::RequestBody;
use crate::net::types::{EstadoUsuario, UsuarioEmpresa};
use crate::state::list_filter::Listable;
use crate::state::lookups::LookupKind;
use crate::util::validation::{is_valid_email, parse_bool, required, required_id};

impl Listable for UsuarioEmpresa {
    fn row_id(&self) -> i64 {
        self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.email.as_str(),
            self.nombres.as_deref().unwrap_or_default(),
            self.apellidos.as_deref().unwrap_or_default(),
            self.rol_nombre.as_deref().unwrap_or_default(),
        ]
    }

    fn status_label(&self) -> Option<&'static str> {
        self.estado().map(EstadoUsuario::label)
    }
}

impl ListEntity for UsuarioEmpresa {
    const RESOURCE: &'static str = "usuarios-empresa";
    const LIST_PATH: &'static str = "/api/usuarios-empresa/";
    const ROUTE: Route = Route::Usuarios;
    const COLUMNS: &'static [&'static str] = &[
        "Email",
        "Nombre",
        "Apellido",
        "Rol",
        "Empresa",
        "Phone",
        "MFA",
        "Estado",
        "Último acceso",
        "Acciones",
    ];
    const TOGGLE: Option<&'static str> = Some("toggle-estado");

    fn cells(&self) -> Vec<String> {
        vec![
            self.email.clone(),
            or_na(self.nombres.as_deref()),
            or_na(self.apellidos.as_deref()),
            or_na(self.rol_nombre.as_deref()),
            or_na(self.empresa_nombre.as_deref()),
            or_na(self.phone.as_deref()),
            yes_no(self.mfa_habilitado),
            self.estado().map_or_else(|| "N/A".to_owned(), |estado| estado.label().to_owned()),
            or_na(self.ultimo_acceso.as_deref()),
            Self::actions_cell(),
        ]
    }

    fn display_name(&self) -> String {
        format!("el usuario {}", self.email)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UsuarioForm {
    pub empresa_id: String,
    pub empleado_id: String,
    pub rol_id: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub password2: String,
    pub mfa_habilitado: bool,
    pub estado: EstadoUsuario,
    pub old_password: String,
    pub new_password: String,
    pub new_password2: String,
}

impl Default for UsuarioForm {
    fn default() -> Self {
        Self {
            empresa_id: String::new(),
            empleado_id: String::new(),
            rol_id: String::new(),
            email: String::new(),
            phone: String::new(),
            password: String::new(),
            password2: String::new(),
            mfa_habilitado: false,
            estado: EstadoUsuario::Activo,
            old_password: String::new(),
            new_password: String::new(),
            new_password2: String::new(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UsuarioPayload {
    pub empresa_id: i64,
    pub empleado_id: i64,
    pub rol_id: i64,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub password2: String,
    pub mfa_habilitado: bool,
    pub estado: EstadoUsuario,
}

#[derive(Debug, Serialize)]
pub struct UsuarioUpdatePayload {
    pub empleado_id: i64,
    pub email: String,
    pub phone: String,
    pub mfa_habilitado: bool,
    pub estado: EstadoUsuario,
    pub old_password: String,
    pub new_password: String,
    pub new_password2: String,
}

impl UsuarioForm {
    fn checked_email(&self) -> Result<String, &'static str> {
        let email = required(&self.email, "Email obligatorio.")?;
        if is_valid_email(&email) { Ok(email) } else { Err("Correo inválido.") }
    }

    /// Rules for an existing account.
    ///
    /// # Errors
    ///
    /// The first failing rule's message.
    pub fn validate_update(&self) -> Result<UsuarioUpdatePayload, &'static str> {
        let empleado_id = required_id(&self.empleado_id, "Selecciona empleado.")?;
        let email = self.checked_email()?;

        let passwords = [&self.old_password, &self.new_password, &self.new_password2];
        if passwords.iter().any(|p| !p.is_empty()) {
            if passwords.iter().any(|p| p.is_empty()) {
                return Err("Para cambiar password: antigua, nueva y confirmación.");
            }
            if self.new_password != self.new_password2 {
                return Err("La nueva contraseña no coincide.");
            }
        }

        Ok(UsuarioUpdatePayload {
            empleado_id,
            email,
            phone: self.phone.trim().to_owned(),
            mfa_habilitado: self.mfa_habilitado,
            estado: self.estado,
            old_password: self.old_password.clone(),
            new_password: self.new_password.clone(),
            new_password2: self.new_password2.clone(),
        })
    }
}

impl Form for UsuarioForm {
    type Payload = UsuarioPayload;

    fn handle_change(&mut self, field: &str, value: &str) -> Result<(), FieldError> {
        let slot = match field {
            "empresa_id" => &mut self.empresa_id,
            "empleado_id" => &mut self.empleado_id,
            "rol_id" => &mut self.rol_id,
            "email" => &mut self.email,
            "phone" => &mut self.phone,
            "password" => &mut self.password,
            "password2" => &mut self.password2,
            "old_password" => &mut self.old_password,
            "new_password" => &mut self.new_password,
            "new_password2" => &mut self.new_password2,
            "mfa_habilitado" => {
                self.mfa_habilitado = parse_bool(value).ok_or_else(|| FieldError::invalid(field, value))?;
                return Ok(());
            }
            "estado" => {
                self.estado = EstadoUsuario::parse(value).ok_or_else(|| FieldError::invalid(field, value))?;
                return Ok(());
            }
            _ => return Err(FieldError::Unknown(field.to_owned())),
        };
        value.clone_into(slot);
        Ok(())
    }

    /// Rules for a new account.
    fn validate(&self) -> Result<UsuarioPayload, &'static str> {
        let empresa_id = required_id(&self.empresa_id, "Selecciona empresa.")?;
        let empleado_id = required_id(&self.empleado_id, "Selecciona empleado.")?;
        let rol_id = required_id(&self.rol_id, "Selecciona rol.")?;
        let email = self.checked_email()?;
        if self.password.is_empty() {
            return Err("Password obligatorio.");
        }
        if self.password != self.password2 {
            return Err("Las contraseñas no coinciden.");
        }
        Ok(UsuarioPayload {
            empresa_id,
            empleado_id,
            rol_id,
            email,
            phone: self.phone.trim().to_owned(),
            password: self.password.clone(),
            password2: self.password2.clone(),
            mfa_habilitado: self.mfa_habilitado,
            estado: self.estado,
        })
    }
}

impl EntityForm for UsuarioForm {
    type Record = UsuarioEmpresa;

    const RESOURCE: &'static str = "usuarios-empresa";
    const ROUTE: Route = Route::Usuarios;
    const LOOKUPS: &'static [LookupKind] = &[LookupKind::Employees, LookupKind::Roles];
    const CREATED: &'static str = "Usuario creado.";
    const UPDATED: &'static str = "Usuario actualizado.";
    const CREATE_FAILED: &'static str = "Error creando usuario.";
    const UPDATE_FAILED: &'static str = "Error actualizando usuario.";

    fn from_record(record: UsuarioEmpresa) -> Self {
        let id = |value: Option<i64>| value.map(|id| id.to_string()).unwrap_or_default();
        Self {
            empresa_id: id(record.empresa_id),
            empleado_id: id(record.empleado_id),
            rol_id: id(record.rol_id),
            estado: record.estado().unwrap_or(EstadoUsuario::Activo),
            email: record.email,
            phone: record.phone.unwrap_or_default(),
            mfa_habilitado: record.mfa_habilitado,
            ..Self::default()
        }
    }

    fn empresa_id(&self) -> Option<i64> {
        self.empresa_id.trim().parse().ok()
    }

    fn reset_dependents(&mut self) {
        self.empleado_id.clear();
        self.rol_id.clear();
    }

    fn update_body(&self) -> Result<RequestBody, FormError> {
        json_body(&validated(self.validate_update())?)
    }
}
