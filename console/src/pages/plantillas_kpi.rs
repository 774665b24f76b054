//! KPI templates: a named set of objectives (target plus red/yellow
//! thresholds per KPI) applied to positions, units or employees.

#[cfg(test)]
#[path = "plantillas_kpi_test.rs"]
mod plantillas_kpi_test;

use serde::Serialize;

use super::form::{EntityForm, FieldError, Form, json_body, validated};
use super::list::ListEntity;
use super::{Route, coded_cell};
use crate::net::error::FormError;
use crate::net::transport::{Method, RequestBody};
use crate::net::types::{AplicaA, Objetivo, PlantillaKpi};
use crate::state::list_filter::Listable;
use crate::state::lookups::LookupKind;
use crate::util::validation::{non_negative_number, required, required_id};

impl Listable for PlantillaKpi {
    fn row_id(&self) -> i64 {
        self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.nombre.as_str(), self.empresa_nombre.as_deref().unwrap_or_default()]
    }
}

impl ListEntity for PlantillaKpi {
    const RESOURCE: &'static str = "plantillas-kpi";
    const LIST_PATH: &'static str = "/api/plantillas-kpi/";
    const ROUTE: Route = Route::PlantillasKpi;
    const COLUMNS: &'static [&'static str] = &["Empresa", "Nombre", "Aplica a", "Objetivos", "Acciones"];

    fn cells(&self) -> Vec<String> {
        let objetivos = if self.objetivos_resumen.is_empty() {
            "N/A".to_owned()
        } else {
            self.objetivos_resumen
                .iter()
                .map(|o| format!("{} | meta={} | rojo={} | amarillo={}", o.kpi_label, o.meta, o.umbral_rojo, o.umbral_amarillo))
                .collect::<Vec<_>>()
                .join("; ")
        };
        vec![
            self.empresa_nombre.clone().unwrap_or_else(|| "N/A".to_owned()),
            self.nombre.clone(),
            coded_cell(self.aplica_a, AplicaA::from_code, AplicaA::label),
            objetivos,
            Self::actions_cell(),
        ]
    }

    fn display_name(&self) -> String {
        format!("la plantilla {}", self.nombre)
    }
}

/// Objective being typed before it is added to the list.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ObjetivoDraft {
    pub kpi_id: String,
    pub meta: String,
    pub umbral_rojo: String,
    pub umbral_amarillo: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PlantillaKpiForm {
    pub empresa_id: String,
    pub nombre: String,
    pub aplica_a: AplicaA,
    pub objetivos: Vec<Objetivo>,
    pub draft: ObjetivoDraft,
}

impl Default for PlantillaKpiForm {
    fn default() -> Self {
        Self {
            empresa_id: String::new(),
            nombre: String::new(),
            aplica_a: AplicaA::Puesto,
            objetivos: Vec::new(),
            draft: ObjetivoDraft::default(),
        }
    }
}

impl PlantillaKpiForm {
    /// Move the draft into the objective list.
    ///
    /// # Errors
    ///
    /// The alert text when no company or KPI is selected, the KPI is already
    /// listed, or a number is negative or malformed.
    pub fn add_objetivo(&mut self) -> Result<(), &'static str> {
        required_id(&self.empresa_id, "Selecciona una empresa primero.")?;
        let kpi_id = required_id(&self.draft.kpi_id, "Selecciona un KPI.")?;
        if self.objetivos.iter().any(|o| o.kpi_id == kpi_id) {
            return Err("Ya agregaste ese KPI en objetivos.");
        }
        let number = |raw: &str| {
            let raw = if raw.trim().is_empty() { "0" } else { raw };
            non_negative_number(raw, "Meta y umbrales deben ser números >= 0.")
        };
        let objetivo = Objetivo {
            kpi_id,
            meta: number(&self.draft.meta)?,
            umbral_rojo: number(&self.draft.umbral_rojo)?,
            umbral_amarillo: number(&self.draft.umbral_amarillo)?,
        };
        self.objetivos.push(objetivo);
        self.draft = ObjetivoDraft::default();
        Ok(())
    }

    /// Returns whether an objective for `kpi_id` was removed.
    pub fn remove_objetivo(&mut self, kpi_id: i64) -> bool {
        let before = self.objetivos.len();
        self.objetivos.retain(|o| o.kpi_id != kpi_id);
        self.objetivos.len() != before
    }
}

#[derive(Debug, Serialize)]
pub struct PlantillaKpiPayload {
    pub empresa_id: i64,
    pub nombre: String,
    pub aplica_a: AplicaA,
    pub objetivos: Vec<Objetivo>,
}

#[derive(Debug, Serialize)]
struct PlantillaKpiUpdatePayload {
    nombre: String,
    aplica_a: AplicaA,
    objetivos: Vec<Objetivo>,
}

impl Form for PlantillaKpiForm {
    type Payload = PlantillaKpiPayload;

    fn handle_change(&mut self, field: &str, value: &str) -> Result<(), FieldError> {
        match field {
            "empresa_id" => self.empresa_id = value.to_owned(),
            "nombre" => self.nombre = value.to_owned(),
            "aplica_a" => self.aplica_a = AplicaA::parse(value).ok_or_else(|| FieldError::invalid(field, value))?,
            "objetivo_kpi" => self.draft.kpi_id = value.to_owned(),
            "objetivo_meta" => self.draft.meta = value.to_owned(),
            "objetivo_rojo" => self.draft.umbral_rojo = value.to_owned(),
            "objetivo_amarillo" => self.draft.umbral_amarillo = value.to_owned(),
            // `kpi,meta,rojo,amarillo` fills the draft and adds it in one go.
            "objetivo" => {
                let mut parts = value.split(',').map(str::trim);
                let mut next = || parts.next().unwrap_or_default().to_owned();
                self.draft = ObjetivoDraft { kpi_id: next(), meta: next(), umbral_rojo: next(), umbral_amarillo: next() };
                self.add_objetivo().map_err(FieldError::Rejected)?;
            }
            "quitar_objetivo" => {
                let kpi_id = value.trim().parse().map_err(|_| FieldError::invalid(field, value))?;
                if !self.remove_objetivo(kpi_id) {
                    return Err(FieldError::invalid(field, value));
                }
            }
            _ => return Err(FieldError::Unknown(field.to_owned())),
        }
        Ok(())
    }

    fn validate(&self) -> Result<PlantillaKpiPayload, &'static str> {
        let empresa_id = required_id(&self.empresa_id, "Selecciona empresa.")?;
        let nombre = required(&self.nombre, "Nombre es obligatorio.")?;
        if self.objetivos.is_empty() {
            return Err("Debes agregar al menos 1 objetivo.");
        }
        Ok(PlantillaKpiPayload { empresa_id, nombre, aplica_a: self.aplica_a, objetivos: self.objetivos.clone() })
    }
}

impl EntityForm for PlantillaKpiForm {
    type Record = PlantillaKpi;

    const RESOURCE: &'static str = "plantillas-kpi";
    const ROUTE: Route = Route::PlantillasKpi;
    const LOOKUPS: &'static [LookupKind] = &[LookupKind::Kpis];
    const CREATED: &'static str = "Plantilla KPI creada.";
    const UPDATED: &'static str = "Plantilla KPI actualizada.";
    const CREATE_FAILED: &'static str = "Error creando.";
    const UPDATE_FAILED: &'static str = "Error actualizando.";
    const LOAD_FAILED: &'static str = "Error cargando plantilla.";

    fn from_record(record: PlantillaKpi) -> Self {
        Self {
            empresa_id: record.empresa_id.map(|id| id.to_string()).unwrap_or_default(),
            nombre: record.nombre,
            aplica_a: record.aplica_a.and_then(AplicaA::from_code).unwrap_or(AplicaA::Puesto),
            objetivos: record.objetivos,
            draft: ObjetivoDraft::default(),
        }
    }

    fn empresa_id(&self) -> Option<i64> {
        self.empresa_id.trim().parse().ok()
    }

    /// Objectives reference the previous company's KPIs.
    fn reset_dependents(&mut self) {
        self.objetivos.clear();
        self.draft = ObjetivoDraft::default();
    }

    fn create_target() -> (Method, String) {
        (Method::Post, "/api/plantillas-kpi/crear/".to_owned())
    }

    fn update_body(&self) -> Result<RequestBody, FormError> {
        let payload = validated(self.validate())?;
        json_body(&PlantillaKpiUpdatePayload {
            nombre: payload.nombre,
            aplica_a: payload.aplica_a,
            objetivos: payload.objetivos,
        })
    }
}
