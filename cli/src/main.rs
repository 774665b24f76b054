use std::io::{self, BufRead, Write};
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use console::config::{ConfigError, ConsoleConfig};
use console::net::api::{ApiClient, item_path};
use console::net::auth;
use console::net::error::{ApiError, FormError};
use console::net::transport::{HttpTransport, TransportError};
use console::net::types::{
    EmpleadoEmpresa, Empresa, Kpi, PlantillaKpi, ReglaAsistencia, ReporteProgramado, TipoAusencia,
    UnidadOrganizacional, UsuarioEmpresa,
};
use console::pages::empleados::EmpleadoForm;
use console::pages::empresas::EmpresaForm;
use console::pages::form::Attachment;
use console::pages::kpis::KpiForm;
use console::pages::login::LoginPage;
use console::pages::plantillas_kpi::PlantillaKpiForm;
use console::pages::reglas_asistencia::ReglaAsistenciaForm;
use console::pages::reportes_programados::ReporteProgramadoForm;
use console::pages::tipos_ausencia::TipoAusenciaForm;
use console::pages::unidades_org::UnidadOrgForm;
use console::pages::usuarios::UsuarioForm;
use console::pages::{EntityForm, FieldError, FormPage, ListEntity, ListPage};
use console::session::{ACCESS_KEY, FileStore, KeyValueStore, MemoryStore, Session, StorageKind, StoreError};
use console::state::data_source::LoadState;
use console::state::delete_flow::FlowError;
use console::state::list_filter::ListFilter;
use console::util::validation::mime_for;
use serde_json::{Value, json};
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("configuración inválida: {0}")]
    Config(#[from] ConfigError),
    #[error("{0}")]
    Transport(#[from] TransportError),
    #[error("{0}")]
    Store(#[from] StoreError),
    #[error("{}", .0.alert_message())]
    Form(#[from] FormError),
    #[error("{}", .0.alert_message())]
    Api(#[from] ApiError),
    #[error("{0}")]
    Field(#[from] FieldError),
    #[error("{0}")]
    Flow(#[from] FlowError),
    #[error("{0}")]
    Load(String),
    #[error("se esperaba campo=valor, se recibió `{0}`")]
    InvalidAssignment(String),
    #[error("no se pudo leer {path}: {source}")]
    ReadFile { path: String, source: io::Error },
    #[error("operación cancelada")]
    Cancelled,
    #[error("io: {0}")]
    Io(#[from] io::Error),
}

#[derive(Parser, Debug)]
#[command(name = "talenttrack", about = "TalentTrack super-admin console")]
struct Cli {
    #[arg(long, env = "TALENTTRACK_API_BASE")]
    api_base: Option<String>,

    /// Use this access token instead of the stored session.
    #[arg(long, env = "TALENTTRACK_ACCESS_TOKEN")]
    access_token: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign in. Without --remember the session ends with this process.
    Login(LoginArgs),
    Logout,
    /// Print the stored session context.
    Whoami,
    Empresas(EntityCommand),
    Empleados(EntityCommand),
    Kpis(EntityCommand),
    Plantillas(EntityCommand),
    Reglas(EntityCommand),
    Reportes(EntityCommand),
    TiposAusencia(EntityCommand),
    Unidades(EntityCommand),
    Usuarios(EntityCommand),
}

#[derive(Args, Debug)]
struct LoginArgs {
    #[arg(long)]
    email: String,
    #[arg(long, env = "TALENTTRACK_PASSWORD", hide_env_values = true)]
    password: String,
    #[arg(long)]
    remember: bool,
}

#[derive(Args, Debug)]
struct EntityCommand {
    #[command(subcommand)]
    command: EntitySubcommand,
}

#[derive(Subcommand, Debug)]
enum EntitySubcommand {
    List {
        #[arg(long)]
        empresa: Option<i64>,
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long)]
        estado: Option<String>,
    },
    Show {
        id: i64,
    },
    /// Fields apply in order; set the company before fields that depend on it.
    Create {
        /// `campo=valor`, or `campo=@ruta` for a file field.
        #[arg(long = "set", value_name = "CAMPO=VALOR")]
        fields: Vec<String>,
    },
    Edit {
        id: i64,
        #[arg(long = "set", value_name = "CAMPO=VALOR")]
        fields: Vec<String>,
    },
    Delete {
        id: i64,
        /// Skip both confirmation prompts.
        #[arg(long)]
        yes: bool,
    },
    Toggle {
        id: i64,
        #[arg(long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("{error}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let mut config = ConsoleConfig::from_env()?;
    if let Some(base) = cli.api_base.as_deref() {
        config = config.with_api_base(base)?;
    }
    tracing::debug!(api_base = %config.api_base, session_file = %config.session_file.display(), "configured");
    let session = open_session(&config, cli.access_token.as_deref())?;
    let transport = Arc::new(HttpTransport::new(config.timeouts)?);
    let api = ApiClient::new(config, transport, session);

    match cli.command {
        Command::Login(args) => run_login(&api, args).await,
        Command::Logout => {
            auth::logout(&api)?;
            println!("Sesión cerrada.");
            Ok(())
        }
        Command::Whoami => run_whoami(&api),
        Command::Empresas(cmd) => run_entity::<Empresa, EmpresaForm>(&api, cmd.command).await,
        Command::Empleados(cmd) => run_entity::<EmpleadoEmpresa, EmpleadoForm>(&api, cmd.command).await,
        Command::Kpis(cmd) => run_entity::<Kpi, KpiForm>(&api, cmd.command).await,
        Command::Plantillas(cmd) => run_entity::<PlantillaKpi, PlantillaKpiForm>(&api, cmd.command).await,
        Command::Reglas(cmd) => run_entity::<ReglaAsistencia, ReglaAsistenciaForm>(&api, cmd.command).await,
        Command::Reportes(cmd) => run_entity::<ReporteProgramado, ReporteProgramadoForm>(&api, cmd.command).await,
        Command::TiposAusencia(cmd) => run_entity::<TipoAusencia, TipoAusenciaForm>(&api, cmd.command).await,
        Command::Unidades(cmd) => run_entity::<UnidadOrganizacional, UnidadOrgForm>(&api, cmd.command).await,
        Command::Usuarios(cmd) => run_entity::<UsuarioEmpresa, UsuarioForm>(&api, cmd.command).await,
    }
}

/// An explicit token bypasses the session file entirely.
fn open_session(config: &ConsoleConfig, access_token: Option<&str>) -> Result<Session, CliError> {
    let ephemeral: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new(StorageKind::SessionScoped));
    if let Some(token) = access_token.filter(|t| !t.trim().is_empty()) {
        ephemeral.set(ACCESS_KEY, token.trim())?;
        let detached: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new(StorageKind::Persistent));
        return Ok(Session::load(detached, ephemeral));
    }
    let persistent: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(config.session_file.clone())?);
    Ok(Session::load(persistent, ephemeral))
}

async fn run_login(api: &ApiClient, args: LoginArgs) -> Result<(), CliError> {
    let mut page = LoginPage { email: args.email, password: args.password, remember: args.remember, ..LoginPage::default() };
    let Some(result) = page.submit(api).await else {
        return Ok(());
    };
    let outcome = result?;
    match outcome.full_name {
        Some(name) => println!("Bienvenido, {name}."),
        None => println!("Sesión iniciada."),
    }
    println!("Inicio: {}", outcome.redirect_to);
    Ok(())
}

fn run_whoami(api: &ApiClient) -> Result<(), CliError> {
    let session = api.session();
    if !session.is_authenticated() {
        return Err(CliError::Api(ApiError::Unauthenticated));
    }
    let snapshot = session.snapshot();
    let context = snapshot.context.unwrap_or_default();
    print_json(&json!({
        "full_name": snapshot.full_name,
        "rol": context.rol,
        "empresa_id": context.empresa_id,
        "redirect_to": context.redirect_to,
        "remembered": session.active_storage() == StorageKind::Persistent,
    }))
}

async fn run_entity<T, F>(api: &ApiClient, command: EntitySubcommand) -> Result<(), CliError>
where
    T: ListEntity,
    F: EntityForm,
{
    match command {
        EntitySubcommand::List { empresa, search, estado } => {
            let filter = ListFilter { empresa_id: empresa, search, estado };
            let mut page = ListPage::<T>::mount_with(api, filter);
            page.settled().await;
            if let LoadState::Failed(alert) = page.state() {
                return Err(CliError::Load(alert));
            }
            println!("{}", page.table().to_text());
            Ok(())
        }
        EntitySubcommand::Show { id } => {
            let record: Value = api.get_json(&item_path(T::RESOURCE, id)).await?;
            print_json(&record)
        }
        EntitySubcommand::Create { fields } => {
            let mut page = FormPage::<F>::create(api).await?;
            fill_form(&mut page, &fields).await?;
            let outcome = page.submit().await?;
            println!("{}", outcome.message);
            Ok(())
        }
        EntitySubcommand::Edit { id, fields } => {
            let mut page = FormPage::<F>::edit(api, id).await?;
            fill_form(&mut page, &fields).await?;
            let outcome = page.submit().await?;
            println!("{}", outcome.message);
            Ok(())
        }
        EntitySubcommand::Delete { id, yes } => {
            let mut page = ListPage::<T>::mount(api);
            page.settled().await;
            page.handle_delete_click(id)?;
            walk_dialog(&mut page, yes).await
        }
        EntitySubcommand::Toggle { id, yes } => {
            let mut page = ListPage::<T>::mount(api);
            page.settled().await;
            page.handle_toggle_click(id)?;
            walk_dialog(&mut page, yes).await
        }
    }
}

async fn fill_form<F: EntityForm>(page: &mut FormPage<F>, fields: &[String]) -> Result<(), CliError> {
    for assignment in fields {
        let (field, value) = assignment
            .split_once('=')
            .ok_or_else(|| CliError::InvalidAssignment(assignment.clone()))?;
        let field = field.trim();
        match value.strip_prefix('@') {
            Some(path) => page.attach_file(field, read_attachment(Path::new(path))?)?,
            None => page.handle_change(field, value)?,
        }
        page.wait_for_lookups().await;
    }
    Ok(())
}

fn read_attachment(path: &Path) -> Result<Attachment, CliError> {
    let bytes = std::fs::read(path).map_err(|source| CliError::ReadFile { path: path.display().to_string(), source })?;
    let filename = path
        .file_name()
        .map_or_else(|| path.display().to_string(), |name| name.to_string_lossy().into_owned());
    Ok(Attachment { mime: mime_for(&filename).to_owned(), filename, bytes })
}

async fn walk_dialog<T: ListEntity>(page: &mut ListPage<T>, assume_yes: bool) -> Result<(), CliError> {
    if !confirm_step(page, assume_yes)? {
        page.cancel();
        return Err(CliError::Cancelled);
    }
    page.proceed_to_confirm()?;
    if !confirm_step(page, assume_yes)? {
        page.cancel();
        return Err(CliError::Cancelled);
    }
    page.execute_delete().await?;
    if let Some(message) = page.flow().message() {
        println!("{message}");
    }
    page.close_success()?;
    Ok(())
}

fn confirm_step<T: ListEntity>(page: &ListPage<T>, assume_yes: bool) -> Result<bool, CliError> {
    if let Some(message) = page.flow().message() {
        println!("{message}");
    }
    if assume_yes {
        return Ok(true);
    }
    print!("¿Continuar? [s/N] ");
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "s" | "si" | "sí" | "y" | "yes"))
}

fn print_json(value: &Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value).map_err(|e| CliError::Load(e.to_string()))?;
    println!("{rendered}");
    Ok(())
}
