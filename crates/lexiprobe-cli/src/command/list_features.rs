use std::{io::Write as _, path::PathBuf};

use anyhow::Context;
use clap::Args;
use lexiprobe_analysis::report::ReportFormat;
use lexiprobe_features::{feature::FeatureInfo, registry::FeatureRegistry};
use lexiprobe_lexicon::Resources;

use crate::{command::resources::ResourceArg, util::Output};

#[derive(Debug, Clone, Args)]
pub(crate) struct ListFeaturesArg {
    /// Listing format (text, json)
    #[arg(long, default_value = "text")]
    pub format: ReportFormat,

    /// Output file path (stdout when omitted)
    #[arg(long)]
    pub output: Option<PathBuf>,

    #[clap(flatten)]
    pub resources: ResourceArg,
}

pub(crate) fn run(arg: &ListFeaturesArg) -> anyhow::Result<()> {
    let resources = arg.resources.load()?;
    let registry =
        FeatureRegistry::standard(&resources).context("Failed to build feature catalog")?;
    let infos = registry.infos();

    let mut output = Output::from_output_path(arg.output.clone())?;
    match arg.format {
        ReportFormat::Json => output.write_json(&infos)?,
        ReportFormat::Text => {
            write_table(&mut output, &infos, &resources).with_context(|| {
                format!("Failed to write feature list to {}", output.display_path())
            })?;
            output.finish()?;
        }
    }
    Ok(())
}

fn write_table(
    output: &mut Output,
    infos: &[FeatureInfo],
    resources: &Resources,
) -> std::io::Result<()> {
    writeln!(
        output,
        "  {:<32} {:<40} {:<7} {:<8} {}",
        "ID", "Name", "Default", "Measure", "Resource"
    )?;
    writeln!(output, "  {}", "-".repeat(104))?;
    for info in infos {
        let resource = match info.resource {
            Some(kind) if resources.is_available(kind) => kind.to_string(),
            Some(kind) => format!("{kind} (not loaded)"),
            None => "-".to_owned(),
        };
        writeln!(
            output,
            "  {:<32} {:<40} {:<7} {:<8} {resource}",
            info.id,
            info.name,
            if info.default_enabled { "on" } else { "off" },
            info.measure.to_string(),
        )?;
    }
    writeln!(output)?;
    writeln!(
        output,
        "{} features, {} enabled by default",
        infos.len(),
        infos.iter().filter(|info| info.default_enabled).count()
    )
}
