use std::io::Write;

use clap::Subcommand;
use serde_json::json;
use uuid::Uuid;

use super::read_patch;
use crate::backend::{AuthApi, TableApi};
use crate::cli::utils::*;
use crate::cli::{connect, OutputFormat};
use crate::models::{Cargo, NovoUsuario, Usuario};
use crate::services::UserService;

#[derive(Subcommand)]
pub enum UsuarioCommands {
    #[command(about = "List users")]
    List {
        #[arg(long, help = "Only users whose name, email, role or phone contain this text")]
        search: Option<String>,
        #[arg(long, help = "Only users with the supervisor role")]
        supervisors: bool,
        #[arg(long, default_value = "nome asc", help = "Ordering, e.g. \"cargo asc, nome asc\"")]
        order: String,
    },

    #[command(about = "Show one user")]
    Show {
        #[arg(help = "User ID")]
        id: Uuid,
    },

    #[command(about = "Create an account and its user record")]
    Create {
        #[arg(long)]
        nome: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "PDV_ADMIN_SENHA", hide_env_values = true)]
        senha: String,
        #[arg(long, default_value = "promotor", help = "admin, supervisor, promotor or parceiro")]
        cargo: Cargo,
        #[arg(long, help = "ID of the supervisor this user reports to")]
        supervisor: Option<String>,
        #[arg(long)]
        telefone: Option<String>,
    },

    #[command(about = "Update a user from a JSON patch (--data or stdin)")]
    Update {
        #[arg(help = "User ID")]
        id: Uuid,
        #[arg(long, help = "JSON object with the fields to change")]
        data: Option<String>,
    },

    #[command(about = "Delete a user record")]
    Delete {
        #[arg(help = "User ID")]
        id: Uuid,
    },
}

fn line(usuario: &Usuario) -> String {
    format!(
        "{}  {:<30} {:<32} {:<10} supervisor={} {}",
        usuario.id,
        usuario.nome,
        usuario.email,
        usuario.cargo,
        or_dash(usuario.supervisor_id.as_deref()),
        if usuario.ativo { "" } else { "(inativo)" }
    )
}

pub async fn handle(cmd: UsuarioCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let (service, _) = connect()?;
    execute(cmd, &service, &output_format, &mut std::io::stdout()).await
}

pub async fn execute<T: TableApi, A: AuthApi>(
    cmd: UsuarioCommands,
    service: &UserService<T, A>,
    output_format: &OutputFormat,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    match cmd {
        UsuarioCommands::List { search, supervisors, order } => {
            let usuarios = if supervisors {
                service.list_supervisors().await?
            } else {
                service.list_ordered(&order).await?
            };

            let selected: Vec<Usuario> = match search.as_deref() {
                Some(term) => service.search(&usuarios, term).into_iter().cloned().collect(),
                None => usuarios,
            };

            if selected.is_empty() {
                return output_empty_collection(out, output_format, "usuarios", "No users found");
            }
            output_records(out, output_format, "usuarios", &selected, line)
        }
        UsuarioCommands::Show { id } => {
            let usuario = service.get(id).await?;
            output_record(out, output_format, "usuario", &usuario)
        }
        UsuarioCommands::Create { nome, email, senha, cargo, supervisor, telefone } => {
            let usuario = service
                .create(NovoUsuario {
                    nome,
                    email,
                    senha,
                    cargo,
                    supervisor_id: supervisor.map(serde_json::Value::String),
                    telefone,
                })
                .await?;

            output_success(
                out,
                output_format,
                &format!("User '{}' created with id {}", usuario.nome, usuario.id),
                Some(json!({ "usuario": usuario })),
            )
        }
        UsuarioCommands::Update { id, data } => {
            let patch = read_patch(data)?;
            let usuario = service.update(id, patch).await?;

            output_success(
                out,
                output_format,
                &format!("User {} updated", usuario.id),
                Some(json!({ "usuario": usuario })),
            )
        }
        UsuarioCommands::Delete { id } => {
            service.delete(id).await?;
            output_success(out, output_format, &format!("User {} deleted", id), Some(json!({ "id": id })))
        }
    }
}
