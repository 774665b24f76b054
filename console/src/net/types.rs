//! Wire DTOs for the TalentTrack REST API.
//!
//! DESIGN
//! ======
//! Records mirror the backend JSON 1:1 and keep coded fields (`estado`,
//! `unidad`, `tipo`, ...) as raw integers so an unknown code never fails a
//! whole list decode. Typed views over those codes live in the coded enums
//! below, which also serialize back to integers for outgoing payloads.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

// =============================================================================
// CODED ENUMS
// =============================================================================

macro_rules! coded_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident = $code:literal => $label:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "i64", into = "i64")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            #[must_use]
            pub fn code(self) -> i64 {
                match self {
                    $(Self::$variant => $code),+
                }
            }

            #[must_use]
            pub fn label(self) -> &'static str {
                match self {
                    $(Self::$variant => $label),+
                }
            }

            #[must_use]
            pub fn from_code(code: i64) -> Option<Self> {
                match code {
                    $($code => Some(Self::$variant),)+
                    _ => None,
                }
            }

            /// Accept either the numeric code or the label, case-insensitively.
            #[must_use]
            pub fn parse(raw: &str) -> Option<Self> {
                let raw = raw.trim();
                if let Ok(code) = raw.parse::<i64>() {
                    return Self::from_code(code);
                }
                Self::ALL.iter().copied().find(|value| value.label().eq_ignore_ascii_case(raw))
            }
        }

        impl TryFrom<i64> for $name {
            type Error = String;

            fn try_from(code: i64) -> Result<Self, Self::Error> {
                Self::from_code(code)
                    .ok_or_else(|| format!("unknown {} code {code}", stringify!($name)))
            }
        }

        impl From<$name> for i64 {
            fn from(value: $name) -> Self {
                value.code()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

coded_enum!(
    /// Company status.
    EstadoEmpresa { Activo = 1 => "activo", Inactivo = 2 => "inactivo" }
);

coded_enum!(
    /// Employee status.
    EstadoEmpleado { Activo = 1 => "activo", Suspendido = 2 => "suspendido", Baja = 3 => "baja" }
);

coded_enum!(
    /// Org unit status.
    EstadoUnidad { Activa = 1 => "activa", Inactiva = 2 => "inactiva" }
);

coded_enum!(
    /// Org unit kind.
    TipoUnidad { Sede = 1 => "sede", Area = 2 => "area", Departamento = 3 => "depto" }
);

coded_enum!(
    /// Company user account status.
    EstadoUsuario { Activo = 1 => "activo", Bloqueado = 2 => "bloqueado" }
);

coded_enum!(
    /// Measurement unit of a KPI.
    UnidadKpi { Porcentaje = 1 => "%", Puntos = 2 => "puntos", Minutos = 3 => "minutos", Horas = 4 => "horas" }
);

coded_enum!(
    /// Where a KPI's data comes from.
    OrigenDatos { Asistencia = 1 => "asistencia", Evaluacion = 2 => "evaluacion", Mixto = 3 => "mixto" }
);

coded_enum!(
    /// Target population of a KPI template.
    AplicaA { Puesto = 1 => "puesto", Unidad = 2 => "unidad", Empleado = 3 => "empleado" }
);

coded_enum!(
    /// Overtime accounting mode of an attendance rule.
    CalculoHorasExtra { TopeDiario = 1 => "tope diario", TopeSemanal = 2 => "tope semanal" }
);

coded_enum!(
    /// Scheduled report subject.
    TipoReporte { Asistencia = 1 => "asistencia", Kpi = 2 => "kpi", Ausencias = 3 => "ausencias" }
);

coded_enum!(
    /// Scheduled report output format.
    FormatoReporte { Csv = 1 => "CSV", Xls = 2 => "XLS", Pdf = 3 => "PDF" }
);

// =============================================================================
// COUNTRY CATALOGUE
// =============================================================================

/// A selectable country; picking one also fixes the company currency.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pais {
    pub id: i64,
    pub nombre: &'static str,
    pub moneda_id: i64,
    pub moneda: &'static str,
}

pub const PAISES: &[Pais] = &[
    Pais { id: 1, nombre: "Argentina", moneda_id: 1, moneda: "Peso argentino (ARS)" },
    Pais { id: 2, nombre: "Bolivia", moneda_id: 2, moneda: "Boliviano (BOB)" },
    Pais { id: 3, nombre: "Chile", moneda_id: 3, moneda: "Peso chileno (CLP)" },
    Pais { id: 4, nombre: "Colombia", moneda_id: 4, moneda: "Peso colombiano (COP)" },
    Pais { id: 5, nombre: "Costa Rica", moneda_id: 5, moneda: "Colón costarricense (CRC)" },
    Pais { id: 6, nombre: "Cuba", moneda_id: 6, moneda: "Peso cubano (CUP)" },
    Pais { id: 7, nombre: "República Dominicana", moneda_id: 7, moneda: "Peso dominicano (DOP)" },
    Pais { id: 8, nombre: "Ecuador", moneda_id: 8, moneda: "Dólar estadounidense (USD)" },
    Pais { id: 9, nombre: "El Salvador", moneda_id: 9, moneda: "Dólar estadounidense (USD)" },
    Pais { id: 10, nombre: "España", moneda_id: 10, moneda: "Euro (EUR)" },
    Pais { id: 11, nombre: "Guatemala", moneda_id: 11, moneda: "Quetzal (GTQ)" },
    Pais { id: 12, nombre: "Honduras", moneda_id: 12, moneda: "Lempira (HNL)" },
    Pais { id: 13, nombre: "México", moneda_id: 13, moneda: "Peso mexicano (MXN)" },
    Pais { id: 14, nombre: "Nicaragua", moneda_id: 14, moneda: "Córdoba (NIO)" },
    Pais { id: 15, nombre: "Panamá", moneda_id: 15, moneda: "Balboa (PAB) y Dólar (USD)" },
    Pais { id: 16, nombre: "Paraguay", moneda_id: 16, moneda: "Guaraní (PYG)" },
    Pais { id: 17, nombre: "Perú", moneda_id: 17, moneda: "Sol (PEN)" },
    Pais { id: 18, nombre: "Uruguay", moneda_id: 18, moneda: "Peso uruguayo (UYU)" },
    Pais { id: 19, nombre: "Venezuela", moneda_id: 19, moneda: "Bolívar (VES)" },
];

impl Pais {
    #[must_use]
    pub fn by_id(id: i64) -> Option<&'static Self> {
        PAISES.iter().find(|pais| pais.id == id)
    }

    /// Look up by numeric id or by name (case-insensitive).
    #[must_use]
    pub fn parse(raw: &str) -> Option<&'static Self> {
        let raw = raw.trim();
        if let Ok(id) = raw.parse::<i64>() {
            return Self::by_id(id);
        }
        let wanted = raw.to_lowercase();
        PAISES.iter().find(|pais| pais.nombre.to_lowercase() == wanted)
    }
}

// =============================================================================
// ENTITY RECORDS
// =============================================================================

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Empresa {
    pub id: i64,
    pub razon_social: String,
    #[serde(default)]
    pub nombre_comercial: String,
    #[serde(default)]
    pub ruc_nit: String,
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub pais: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub moneda: Option<i64>,
    #[serde(default)]
    pub estado: Option<i64>,
    /// Absolute or server-relative logo URL.
    #[serde(default, alias = "logo_url")]
    pub logo: Option<String>,
}

impl Empresa {
    #[must_use]
    pub fn estado(&self) -> Option<EstadoEmpresa> {
        self.estado.and_then(EstadoEmpresa::from_code)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EmpleadoEmpresa {
    pub id: i64,
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub empresa_id: Option<i64>,
    #[serde(default, alias = "empresa_razon_social")]
    pub empresa_nombre: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub unidad_id: Option<i64>,
    #[serde(default)]
    pub unidad_nombre: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub puesto_id: Option<i64>,
    #[serde(default)]
    pub puesto_nombre: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub manager_id: Option<i64>,
    #[serde(default)]
    pub manager_nombre: Option<String>,
    pub nombres: String,
    #[serde(default)]
    pub apellidos: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub telefono: Option<String>,
    #[serde(default)]
    pub direccion: Option<String>,
    #[serde(default)]
    pub fecha_nacimiento: Option<String>,
    #[serde(default)]
    pub fecha_ingreso: Option<String>,
    #[serde(default)]
    pub estado: Option<i64>,
}

impl EmpleadoEmpresa {
    #[must_use]
    pub fn estado(&self) -> Option<EstadoEmpleado> {
        self.estado.and_then(EstadoEmpleado::from_code)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Kpi {
    pub id: i64,
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub empresa: Option<i64>,
    #[serde(default)]
    pub empresa_nombre: Option<String>,
    pub codigo: String,
    pub nombre: String,
    #[serde(default)]
    pub descripcion: String,
    #[serde(default)]
    pub unidad: Option<i64>,
    #[serde(default)]
    pub origen_datos: Option<i64>,
}

/// One target inside a KPI template.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Objetivo {
    pub kpi_id: i64,
    pub meta: f64,
    pub umbral_rojo: f64,
    pub umbral_amarillo: f64,
}

/// Display row of a template objective, as the list endpoint renders it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ObjetivoResumen {
    #[serde(default)]
    pub kpi_label: String,
    #[serde(default)]
    pub meta: f64,
    #[serde(default)]
    pub umbral_rojo: f64,
    #[serde(default)]
    pub umbral_amarillo: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlantillaKpi {
    pub id: i64,
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub empresa_id: Option<i64>,
    #[serde(default, alias = "empresa_razon_social")]
    pub empresa_nombre: Option<String>,
    pub nombre: String,
    #[serde(default)]
    pub aplica_a: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_objetivos")]
    pub objetivos: Vec<Objetivo>,
    #[serde(default)]
    pub objetivos_resumen: Vec<ObjetivoResumen>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReglaAsistencia {
    pub id: i64,
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub empresa: Option<i64>,
    #[serde(default, alias = "empresa_razon_social")]
    pub empresa_nombre: Option<String>,
    #[serde(default)]
    pub considera_tardanza_desde_min: i64,
    #[serde(default)]
    pub calculo_horas_extra: Option<i64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReporteProgramado {
    pub id: i64,
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub empresa: Option<i64>,
    #[serde(default, alias = "empresa_razon_social")]
    pub empresa_nombre: Option<String>,
    pub nombre: String,
    #[serde(default)]
    pub tipo: Option<i64>,
    #[serde(default)]
    pub frecuencia_cron: String,
    #[serde(default)]
    pub formato: Option<i64>,
    #[serde(default)]
    pub destinatarios: Vec<String>,
    #[serde(default)]
    pub activo: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TipoAusencia {
    pub id: i64,
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub empresa: Option<i64>,
    #[serde(default)]
    pub empresa_nombre: Option<String>,
    pub nombre: String,
    #[serde(default)]
    pub afecta_sueldo: bool,
    #[serde(default)]
    pub requiere_soporte: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UnidadOrganizacional {
    pub id: i64,
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub empresa: Option<i64>,
    #[serde(default)]
    pub empresa_nombre: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub unidad_padre: Option<i64>,
    #[serde(default)]
    pub unidad_padre_nombre: Option<String>,
    pub nombre: String,
    #[serde(default)]
    pub tipo: Option<i64>,
    #[serde(default)]
    pub ubicacion: String,
    #[serde(default)]
    pub estado: Option<i64>,
}

impl UnidadOrganizacional {
    #[must_use]
    pub fn estado(&self) -> Option<EstadoUnidad> {
        self.estado.and_then(EstadoUnidad::from_code)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UsuarioEmpresa {
    pub id: i64,
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub empresa_id: Option<i64>,
    #[serde(default, alias = "empresa_razon_social")]
    pub empresa_nombre: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub empleado_id: Option<i64>,
    #[serde(default, alias = "empleado_nombres")]
    pub nombres: Option<String>,
    #[serde(default, alias = "empleado_apellidos")]
    pub apellidos: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub rol_id: Option<i64>,
    #[serde(default)]
    pub rol_nombre: Option<String>,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub mfa_habilitado: bool,
    #[serde(default)]
    pub estado: Option<i64>,
    #[serde(default)]
    pub ultimo_acceso: Option<String>,
}

impl UsuarioEmpresa {
    #[must_use]
    pub fn estado(&self) -> Option<EstadoUsuario> {
        self.estado.and_then(EstadoUsuario::from_code)
    }
}

// =============================================================================
// LOOKUP OPTIONS
// =============================================================================

/// One entry of a company-scoped select (units, positions, employees,
/// KPIs, roles) or of the company select itself.
///
/// The helper endpoints return differently shaped rows; every known naming
/// field is optional and `label` picks the most descriptive one.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupOption {
    pub id: i64,
    #[serde(default)]
    pub nombre: Option<String>,
    #[serde(default)]
    pub nombres: Option<String>,
    #[serde(default)]
    pub apellidos: Option<String>,
    #[serde(default)]
    pub codigo: Option<String>,
    #[serde(default)]
    pub razon_social: Option<String>,
}

impl LookupOption {
    #[must_use]
    pub fn label(&self) -> String {
        if let Some(razon_social) = non_blank(self.razon_social.as_deref()) {
            return razon_social.to_owned();
        }
        if let Some(nombres) = non_blank(self.nombres.as_deref()) {
            return match non_blank(self.apellidos.as_deref()) {
                Some(apellidos) => format!("{nombres} {apellidos}"),
                None => nombres.to_owned(),
            };
        }
        match (non_blank(self.codigo.as_deref()), non_blank(self.nombre.as_deref())) {
            (Some(codigo), Some(nombre)) => format!("{codigo} - {nombre}"),
            (None, Some(nombre)) => nombre.to_owned(),
            (Some(codigo), None) => codigo.to_owned(),
            (None, None) => format!("#{}", self.id),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

// =============================================================================
// LENIENT ID DECODING
// =============================================================================

/// Foreign keys arrive as a number, a numeric string, a nested `{ "id": n }`
/// object, or `null` depending on the serializer behind the endpoint.
fn deserialize_optional_id<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    match value {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::Number(number)) => number
            .as_i64()
            .map(Some)
            .ok_or_else(|| D::Error::custom("id must be an integer")),
        Some(serde_json::Value::String(text)) if text.trim().is_empty() => Ok(None),
        Some(serde_json::Value::String(text)) => text
            .trim()
            .parse::<i64>()
            .map(Some)
            .map_err(|_| D::Error::custom("id string must be numeric")),
        Some(serde_json::Value::Object(object)) => match object.get("id") {
            Some(serde_json::Value::Number(number)) => Ok(number.as_i64()),
            _ => Err(D::Error::custom("nested object is missing a numeric id")),
        },
        Some(_) => Err(D::Error::custom("unsupported id shape")),
    }
}

/// Template objectives are stored as free-form JSON; anything that is not a
/// list of well-formed objectives reads as no objectives.
fn deserialize_objetivos<'de, D>(deserializer: D) -> Result<Vec<Objetivo>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    let Some(serde_json::Value::Array(items)) = value else {
        return Ok(Vec::new());
    };
    Ok(items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect())
}
