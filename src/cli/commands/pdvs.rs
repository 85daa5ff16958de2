use std::io::Write;

use clap::Subcommand;
use serde_json::{json, Value};
use uuid::Uuid;

use super::read_patch;
use crate::backend::TableApi;
use crate::cli::utils::*;
use crate::cli::{connect, OutputFormat};
use crate::models::{NovoPdv, Pdv};
use crate::services::PdvService;

#[derive(Subcommand)]
pub enum PdvCommands {
    #[command(about = "List points of sale")]
    List {
        #[arg(long, help = "Only points of sale whose name, CNPJ or address contain this text")]
        search: Option<String>,
        #[arg(long, help = "Only points of sale assigned to this promoter")]
        promotor: Option<Uuid>,
        #[arg(long, default_value = "nome asc", help = "Ordering, e.g. \"cidade asc, nome asc\"")]
        order: String,
    },

    #[command(about = "Show one point of sale")]
    Show {
        #[arg(help = "Point of sale ID")]
        id: Uuid,
    },

    #[command(about = "Create a point of sale")]
    Create {
        #[arg(long)]
        nome: String,
        #[arg(long)]
        cnpj: Option<String>,
        #[arg(long)]
        endereco: Option<String>,
        #[arg(long)]
        cidade: Option<String>,
        #[arg(long)]
        estado: Option<String>,
        #[arg(long, help = "ID of the partner that runs it")]
        parceiro: Option<String>,
        #[arg(long, help = "ID of the promoter assigned to it")]
        promotor: Option<String>,
    },

    #[command(about = "Update a point of sale from a JSON patch (--data or stdin)")]
    Update {
        #[arg(help = "Point of sale ID")]
        id: Uuid,
        #[arg(long, help = "JSON object with the fields to change")]
        data: Option<String>,
    },

    #[command(about = "Delete a point of sale")]
    Delete {
        #[arg(help = "Point of sale ID")]
        id: Uuid,
    },
}

fn line(pdv: &Pdv) -> String {
    format!(
        "{}  {:<30} {:<20} {:<2} promotor={} parceiro={} {}",
        pdv.id,
        pdv.nome,
        or_dash(pdv.cidade.as_deref()),
        or_dash(pdv.estado.as_deref()),
        or_dash(pdv.promotor_id.as_deref()),
        or_dash(pdv.parceiro_id.as_deref()),
        if pdv.ativo { "" } else { "(inativo)" }
    )
}

pub async fn handle(cmd: PdvCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let (_, service) = connect()?;
    execute(cmd, &service, &output_format, &mut std::io::stdout()).await
}

pub async fn execute<T: TableApi>(
    cmd: PdvCommands,
    service: &PdvService<T>,
    output_format: &OutputFormat,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    match cmd {
        PdvCommands::List { search, promotor, order } => {
            let pdvs = match promotor {
                Some(promotor_id) => service.list_by_promotor(promotor_id).await?,
                None => service.list_ordered(&order).await?,
            };

            let selected: Vec<Pdv> = match search.as_deref() {
                Some(term) => service.search(&pdvs, term).into_iter().cloned().collect(),
                None => pdvs,
            };

            if selected.is_empty() {
                return output_empty_collection(out, output_format, "pdvs", "No points of sale found");
            }
            output_records(out, output_format, "pdvs", &selected, line)
        }
        PdvCommands::Show { id } => {
            let pdv = service.get(id).await?;
            output_record(out, output_format, "pdv", &pdv)
        }
        PdvCommands::Create { nome, cnpj, endereco, cidade, estado, parceiro, promotor } => {
            let pdv = service
                .create(NovoPdv {
                    nome,
                    cnpj,
                    endereco,
                    cidade,
                    estado,
                    parceiro_id: parceiro.map(Value::String),
                    promotor_id: promotor.map(Value::String),
                })
                .await?;

            output_success(
                out,
                output_format,
                &format!("Point of sale '{}' created with id {}", pdv.nome, pdv.id),
                Some(json!({ "pdv": pdv })),
            )
        }
        PdvCommands::Update { id, data } => {
            let patch = read_patch(data)?;
            let pdv = service.update(id, patch).await?;

            output_success(
                out,
                output_format,
                &format!("Point of sale {} updated", pdv.id),
                Some(json!({ "pdv": pdv })),
            )
        }
        PdvCommands::Delete { id } => {
            service.delete(id).await?;
            output_success(out, output_format, &format!("Point of sale {} deleted", id), Some(json!({ "id": id })))
        }
    }
}
