use colored::*;
use std::io::Write;

use crate::cli::OutputFormat;
use crate::diagnostics::Severity;
use crate::plan::PlanReport;

pub trait OutputWriter {
    fn write_reports(&mut self, reports: &[PlanReport]) -> anyhow::Result<()>;
}

pub struct JsonWriter<W: Write> {
    writer: W,
}

impl<W: Write> JsonWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputWriter for JsonWriter<W> {
    fn write_reports(&mut self, reports: &[PlanReport]) -> anyhow::Result<()> {
        serde_json::to_writer_pretty(&mut self.writer, reports)?;
        writeln!(self.writer)?;
        Ok(())
    }
}

pub struct YamlWriter<W: Write> {
    writer: W,
}

impl<W: Write> YamlWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputWriter for YamlWriter<W> {
    fn write_reports(&mut self, reports: &[PlanReport]) -> anyhow::Result<()> {
        serde_yaml::to_writer(&mut self.writer, reports)?;
        Ok(())
    }
}

/// Human-readable summary, one block per contract.
pub struct TextWriter<W: Write> {
    writer: W,
}

impl<W: Write> TextWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    fn write_report(&mut self, report: &PlanReport) -> anyhow::Result<()> {
        let plan = &report.plan;
        let entity = plan.entity();
        let identifier = plan.identifier();

        writeln!(
            self.writer,
            "{} {} -> {} ({})",
            "Contract".bold(),
            plan.contract().simple_name.bold().blue(),
            entity.name.bold(),
            plan.table_name()
        )?;
        writeln!(
            self.writer,
            "  id: {} [{}]{}",
            identifier.unwrapped_type,
            identifier.strategy,
            if identifier.is_composite { " composite" } else { "" }
        )?;

        for property in plan.properties() {
            let mut notes = Vec::new();
            if let Some(length) = property.length {
                notes.push(format!("length={length}"));
            }
            if !property.nullable {
                notes.push("not null".to_string());
            }
            if property.unique {
                notes.push("unique".to_string());
            }
            for (flag, label) in [
                (property.lob, "lob"),
                (property.enumerated, "enumerated"),
                (property.temporal, "temporal"),
                (property.embedded, "embedded"),
            ] {
                if flag {
                    notes.push(label.to_string());
                }
            }
            writeln!(
                self.writer,
                "  {} {}: {} {}",
                "col".dimmed(),
                property.column_name,
                property.type_ref,
                notes.join(", ").dimmed()
            )?;
        }

        for relationship in plan.relationships() {
            writeln!(
                self.writer,
                "  {} {} -> {} [{}]",
                "rel".dimmed(),
                relationship.property_name,
                relationship.target_simple_name(),
                format!("{} {}", relationship.relationship_type, relationship.scope).cyan()
            )?;
        }

        for query in plan.query_methods() {
            writeln!(
                self.writer,
                "  {} {} {} ({})",
                "query".dimmed(),
                query.method_name,
                query.query_type,
                query.property_paths.join(", ")
            )?;
        }

        for diagnostic in &report.diagnostics {
            let label = match diagnostic.severity {
                Severity::Error => diagnostic.severity.to_string().red().bold(),
                Severity::Warning => diagnostic.severity.to_string().yellow(),
                Severity::Info => diagnostic.severity.to_string().normal(),
            };
            writeln!(
                self.writer,
                "  {label} [{}] {}: {}",
                diagnostic.code, diagnostic.plugin_context, diagnostic.message
            )?;
        }
        writeln!(self.writer)?;
        Ok(())
    }
}

impl<W: Write> OutputWriter for TextWriter<W> {
    fn write_reports(&mut self, reports: &[PlanReport]) -> anyhow::Result<()> {
        for report in reports {
            self.write_report(report)?;
        }
        let errors: usize = reports.iter().map(|r| r.counts().error).sum();
        let warnings: usize = reports.iter().map(|r| r.counts().warning).sum();
        writeln!(
            self.writer,
            "{} contract(s) planned, {} error(s), {} warning(s)",
            reports.len(),
            errors,
            warnings
        )?;
        Ok(())
    }
}

pub fn create_writer<'w>(format: OutputFormat, writer: Box<dyn Write + 'w>) -> Box<dyn OutputWriter + 'w> {
    match format {
        OutputFormat::Json => Box::new(JsonWriter::new(writer)),
        OutputFormat::Yaml => Box::new(YamlWriter::new(writer)),
        OutputFormat::Text => Box::new(TextWriter::new(writer)),
    }
}
