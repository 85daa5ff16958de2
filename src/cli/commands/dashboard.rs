use std::io::Write;

use serde_json::{json, Map, Value};

use crate::cli::{connect, OutputFormat};
use crate::models::Cargo;
use crate::services::{load_dashboard, Dashboard};

const CARGOS: [Cargo; 5] = [Cargo::Admin, Cargo::Supervisor, Cargo::Promotor, Cargo::Parceiro, Cargo::Desconhecido];

pub async fn handle(output_format: OutputFormat) -> anyhow::Result<()> {
    let (users, pdvs) = connect()?;
    let dashboard = load_dashboard(&users, &pdvs).await?;
    render(&dashboard, &output_format, &mut std::io::stdout())
}

pub fn render(dashboard: &Dashboard, output_format: &OutputFormat, out: &mut impl Write) -> anyhow::Result<()> {
    let by_cargo = CARGOS.map(|cargo| (cargo, dashboard.count_by_cargo(cargo)));

    match output_format {
        OutputFormat::Json => {
            let cargos: Map<String, Value> = by_cargo
                .iter()
                .map(|(cargo, count)| (cargo.to_string(), json!(count)))
                .collect();

            writeln!(out, "{}", serde_json::to_string_pretty(&json!({
                "usuarios": dashboard.usuarios.len(),
                "cargos": cargos,
                "pdvs": dashboard.pdvs.len(),
                "pdvs_ativos": dashboard.active_pdvs(),
                "pdvs_sem_promotor": dashboard.unassigned_pdvs(),
            }))?)?;
        }
        OutputFormat::Text => {
            writeln!(out, "Users: {}", dashboard.usuarios.len())?;
            for (cargo, count) in by_cargo {
                if cargo == Cargo::Desconhecido && count == 0 {
                    continue;
                }
                writeln!(out, "  {:<12} {}", cargo, count)?;
            }
            writeln!(out, "Points of sale: {} ({} active, {} without promoter)",
                dashboard.pdvs.len(),
                dashboard.active_pdvs(),
                dashboard.unassigned_pdvs()
            )?;
        }
    }
    Ok(())
}
